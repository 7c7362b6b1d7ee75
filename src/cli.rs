use anyhow::{Context, Result};
use clap::Parser;

use crate::commit::{CommitMode, CommitRequest};
use crate::select::SelectMode;
use crate::skip::parse_skip_entries;

pub const BASE_CODE_DIR_ENV: &str = "BASE_CODE_DIR";

#[derive(Parser, Debug)]
#[command(
    name = "pyfmt",
    version,
    about = "Python auto-formatting using isort and black",
    long_about = None
)]
pub struct Cli {
  /// Paths to format; defaults to $BASE_CODE_DIR (shell-split) or the current directory
  #[arg(value_name = "PATH")]
  pub paths: Vec<String>,

  /// Which files to format
  #[arg(long, value_enum, default_value_t = SelectMode::All)]
  pub select: SelectMode,

  /// Don't write changes, just print the files that would be formatted
  #[arg(long)]
  pub check: bool,

  /// Max characters per line
  #[arg(long, env = "MAX_LINE_LENGTH", default_value_t = 100)]
  pub line_length: u32,

  /// Additional args to pass to isort (shell-split)
  #[arg(long, default_value = "", allow_hyphen_values = true)]
  pub extra_isort_args: String,

  /// Additional args to pass to black (shell-split)
  #[arg(long, default_value = "", allow_hyphen_values = true)]
  pub extra_black_args: String,

  /// Comma-separated directories (e.g. env/foo) or files (e.g. cool.py) to skip
  #[arg(long, default_value = "")]
  pub skip: String,

  /// Python version black should target, e.g. py311 (default: detected from python3)
  #[arg(long, env = "BLACK_TARGET_VERSION")]
  pub target_version: Option<String>,

  /// Commit the formatted files; optionally combine patch, amend and all
  #[arg(long, value_enum, num_args = 0.., value_delimiter = ',')]
  pub commit: Option<Vec<CommitMode>>,

  /// Commit message (implies --commit); with no words, reuse the HEAD message
  #[arg(long, num_args = 0.., value_name = "WORDS")]
  pub commit_message: Option<Vec<String>>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
  pub paths: Vec<String>,
  pub select: SelectMode,
  pub check: bool,
  pub line_length: u32,
  pub extra_isort_args: Vec<String>,
  pub extra_black_args: Vec<String>,
  pub skip: Vec<String>,
  pub target_version: Option<String>,
  pub commit: Option<CommitRequest>,
}

/// Positional paths, else `$BASE_CODE_DIR` split like a shell would, else `.`.
pub fn resolve_paths(cli_paths: Vec<String>, env_value: Option<&str>) -> Result<Vec<String>> {
  if !cli_paths.is_empty() {
    return Ok(cli_paths);
  }
  let from_env = match env_value {
    Some(v) => shell_words::split(v).with_context(|| format!("parsing ${}", BASE_CODE_DIR_ENV))?,
    None => vec![],
  };
  if from_env.is_empty() {
    Ok(vec![".".into()])
  } else {
    Ok(from_env)
  }
}

fn split_args(flag: &str, raw: &str) -> Result<Vec<String>> {
  shell_words::split(raw).with_context(|| format!("parsing {}", flag))
}

pub fn normalize(cli: Cli) -> Result<RunConfig> {
  let env_paths = std::env::var(BASE_CODE_DIR_ENV).ok();
  let paths = resolve_paths(cli.paths, env_paths.as_deref())?;

  // a message alone still means "commit"
  let commit = match (cli.commit, cli.commit_message) {
    (None, None) => None,
    (modes, words) => Some(CommitRequest {
      modes: modes.unwrap_or_default(),
      message: words.map(|w| w.join(" ")),
    }),
  };

  Ok(RunConfig {
    paths,
    select: cli.select,
    check: cli.check,
    line_length: cli.line_length,
    extra_isort_args: split_args("--extra-isort-args", &cli.extra_isort_args)?,
    extra_black_args: split_args("--extra-black-args", &cli.extra_black_args)?,
    skip: parse_skip_entries(&cli.skip),
    target_version: cli.target_version,
    commit,
  })
}
