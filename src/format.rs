// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build and run the isort/black command lines; capture output and combine exit codes
// role: formatter runner
// inputs: selected files, line length, check flag, extra per-tool args, optional black target version
// outputs: RunResult per tool (output lines + exit code); combined exit code
// side_effects: Spawns isort and black, which rewrite files in place unless --check is set
// invariants:
// - check mode appends --check-only (isort) / --check (black) after extra args
// - black summary noise is stripped only when black exits 0
// - combined exit code is 0 iff every tool exited 0
// errors: Spawn failures (missing binary) propagate with the program name as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::select::has_source_extension;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
  Isort,
  Black,
}

impl Tool {
  pub fn program(self) -> &'static str {
    match self {
      Tool::Isort => "isort",
      Tool::Black => "black",
    }
  }
}

impl fmt::Display for Tool {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.program())
  }
}

#[derive(Debug, Clone)]
pub struct FormatOptions {
  pub line_length: u32,
  pub check: bool,
  pub target_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
  pub tool: Tool,
  pub lines: Vec<String>,
  pub code: i32,
}

pub fn isort_command(opts: &FormatOptions, extra: &[String], files: &[String]) -> Vec<String> {
  let mut argv: Vec<String> = vec![
    Tool::Isort.program().into(),
    "--force-grid-wrap=0".into(),
    format!("--line-width={}", opts.line_length),
    "--multi-line=3".into(),
    "--use-parentheses".into(),
    "--trailing-comma".into(),
  ];
  argv.extend(extra.iter().cloned());
  if opts.check {
    argv.push("--check-only".into());
  }
  argv.extend(files.iter().cloned());
  argv
}

pub fn black_command(opts: &FormatOptions, extra: &[String], files: &[String]) -> Vec<String> {
  let mut argv: Vec<String> = vec![
    Tool::Black.program().into(),
    format!("--line-length={}", opts.line_length),
  ];
  if let Some(target) = &opts.target_version {
    argv.push(format!("--target-version={}", target));
  }
  argv.extend(extra.iter().cloned());
  if opts.check {
    argv.push("--check".into());
  }
  argv.extend(files.iter().cloned());
  argv
}

static BLACK_SUMMARY: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"^(All done!|No Python files are present to be formatted|\d+ files? (would be )?(reformatted|left unchanged))",
  )
  .expect("valid black summary regex")
});

/// Drops black's closing summary lines from a successful run.
pub fn filter_black_output(lines: Vec<String>, code: i32) -> Vec<String> {
  if code != 0 {
    return lines;
  }
  lines
    .into_iter()
    .filter(|l| !l.trim().is_empty() && !BLACK_SUMMARY.is_match(l.trim()))
    .collect()
}

pub fn run_formatter(tool: Tool, argv: &[String], workdir: &Path) -> Result<RunResult> {
  let (program, args) = argv.split_first().context("empty formatter command line")?;
  debug!(workdir = %workdir.display(), "{}", shell_words::join(argv));

  let out = Command::new(program)
    .args(args)
    .current_dir(workdir)
    .output()
    .with_context(|| format!("spawning {}", program))?;

  let mut lines: Vec<String> = String::from_utf8_lossy(&out.stdout).lines().map(str::to_string).collect();
  lines.extend(String::from_utf8_lossy(&out.stderr).lines().map(str::to_string));

  // killed by a signal
  let code = out.status.code().unwrap_or(1);
  let lines = match tool {
    Tool::Black => filter_black_output(lines, code),
    Tool::Isort => lines,
  };

  Ok(RunResult { tool, lines, code })
}

/// First nonzero exit code across `results`, or 0.
pub fn combined_exit_code(results: &[&RunResult]) -> i32 {
  results.iter().map(|r| r.code).find(|c| *c != 0).unwrap_or(0)
}

/// Paths a line might name: each whitespace token, plus everything after the
/// leading verb (`reformatted my file.py`).
fn path_candidates(line: &str) -> impl Iterator<Item = &str> {
  let rest = line.trim().split_once(char::is_whitespace).map(|(_, r)| r.trim());
  line.split_whitespace().chain(rest)
}

/// Source files named in tool output (`Fixing /abs/pkg/a.py`, `reformatted pkg/b.py`).
///
/// A mention counts only if it is an existing `.py`/`.pyi` file under one of
/// the `selected` paths (files or directories). Results are relative to `root`,
/// in order of first mention.
pub fn changed_files(root: &Path, selected: &[String], results: &[&RunResult]) -> Vec<String> {
  let Ok(root) = root.canonicalize() else {
    return vec![];
  };
  let scopes: Vec<PathBuf> = selected
    .iter()
    .filter_map(|s| root.join(s).canonicalize().ok())
    .collect();

  let mut changed: Vec<String> = Vec::new();
  for candidate in results.iter().flat_map(|r| r.lines.iter()).flat_map(|l| path_candidates(l)) {
    if !has_source_extension(candidate) {
      continue;
    }
    let Ok(path) = root.join(candidate).canonicalize() else {
      continue;
    };
    if !path.is_file() || !scopes.iter().any(|scope| path.starts_with(scope)) {
      continue;
    }
    if let Ok(rel) = path.strip_prefix(&root) {
      let rel = rel.to_string_lossy().to_string();
      if !changed.contains(&rel) {
        changed.push(rel);
      }
    }
  }
  changed
}

static PYTHON_VERSION: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"Python (\d+)\.(\d+)").expect("valid python version regex"));

/// `Python 3.11.4` -> `py311`.
pub fn target_from_version_string(s: &str) -> Option<String> {
  let caps = PYTHON_VERSION.captures(s)?;
  Some(format!("py{}{}", &caps[1], &caps[2]))
}

/// Black target derived from the local `python3`, if one is on PATH.
pub fn detect_target_version() -> Option<String> {
  let out = Command::new("python3").arg("--version").output().ok()?;
  let text = format!(
    "{}{}",
    String::from_utf8_lossy(&out.stdout),
    String::from_utf8_lossy(&out.stderr)
  );
  target_from_version_string(&text)
}
