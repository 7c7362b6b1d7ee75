// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Thin wrappers over the git CLI for status, diff, toplevel discovery, staging and committing
// role: vcs io
// inputs: working directory, pathspecs, revision ranges, commit arguments
// outputs: raw stdout text or exit status; GitError carrying exit code + stderr on failure
// side_effects: Invokes git subprocesses; add/commit mutate the index and history
// invariants:
// - git runs with LC_ALL=C so stderr classification (e.g. "no upstream") is locale-independent
// - commit inherits the terminal so editors and --patch prompts work
// errors: GitError::Spawn when git cannot start; GitError::Failed with code and stderr otherwise
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GitError {
  #[error("spawning git {args:?}")]
  Spawn {
    args: Vec<String>,
    #[source]
    source: std::io::Error,
  },
  #[error("git {args:?} failed (exit {code:?}): {stderr}")]
  Failed {
    args: Vec<String>,
    code: Option<i32>,
    stderr: String,
  },
}

impl GitError {
  /// True when git refused a `@{upstream}` lookup because the branch tracks nothing.
  pub fn is_no_upstream(&self) -> bool {
    match self {
      GitError::Failed { code: Some(128), stderr, .. } => stderr.to_ascii_lowercase().contains("no upstream"),
      _ => false,
    }
  }
}

fn git_command(repo: &Path, args: &[String]) -> Command {
  debug!(repo = %repo.display(), "git {}", shell_words::join(args));
  let mut cmd = Command::new("git");
  cmd.args(args).current_dir(repo).env("LC_ALL", "C");
  cmd
}

pub fn run_git(repo: &Path, args: &[String]) -> Result<String, GitError> {
  let out = git_command(repo, args).output().map_err(|source| GitError::Spawn {
    args: args.to_vec(),
    source,
  })?;

  if out.status.success() {
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
  } else {
    Err(GitError::Failed {
      args: args.to_vec(),
      code: out.status.code(),
      stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
    })
  }
}

fn with_pathspec(mut args: Vec<String>, paths: &[String]) -> Vec<String> {
  args.push("--".into());
  args.extend(paths.iter().cloned());
  args
}

/// `git status --porcelain -z` restricted to `paths`; entries are NUL-terminated,
/// unquoted, and relative to the repository root.
pub fn status_porcelain(repo: &Path, paths: &[String]) -> Result<String, GitError> {
  let args = with_pathspec(
    vec![
      "status".into(),
      "--porcelain".into(),
      "-z".into(),
      "--untracked-files=all".into(),
    ],
    paths,
  );
  run_git(repo, &args)
}

/// NUL-separated names of files changed across `range` (e.g. `HEAD^1..HEAD`), deleted files excluded.
pub fn diff_names(repo: &Path, range: &str, paths: &[String]) -> Result<String, GitError> {
  let args = with_pathspec(
    vec![
      "--no-pager".into(),
      "diff".into(),
      "--name-only".into(),
      "-z".into(),
      "--diff-filter=d".into(),
      range.into(),
    ],
    paths,
  );
  run_git(repo, &args)
}

pub fn toplevel(repo: &Path) -> Result<String, GitError> {
  let out = run_git(repo, &["rev-parse".into(), "--show-toplevel".into()])?;
  Ok(out.trim().to_string())
}

pub fn add(repo: &Path, files: &[String]) -> Result<(), GitError> {
  run_git(repo, &with_pathspec(vec!["add".into()], files)).map(|_| ())
}

/// Runs `git <args> -- <files>` attached to the terminal and returns its exit status.
pub fn commit_interactive(repo: &Path, args: &[String], files: &[String]) -> Result<ExitStatus, GitError> {
  let args = with_pathspec(args.to_vec(), files);
  git_command(repo, &args)
    .status()
    .map_err(|source| GitError::Spawn { args, source })
}
