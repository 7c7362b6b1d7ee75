// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Optionally commit formatter results; resolve commit flags, message, and file scope
// role: committer
// inputs: CommitRequest (modes + optional message), selected files, formatter results
// outputs: A git commit in the repository (or a logged warning)
// side_effects: git add (unless patch mode) and an interactive git commit
// invariants:
// - explicit message > empty+amend (--no-edit) > empty (--reuse-message=HEAD) > editor
// - "all" commits every selected file; otherwise only files named in formatter output
// errors: Git failures are returned to the caller, which logs them without changing the exit code
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::warn;

use crate::format::{changed_files, RunResult};
use crate::gitio;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitMode {
  /// Interactively choose hunks to commit
  Patch,
  /// Fold the changes into the previous commit
  Amend,
  /// Commit every selected file, not only the reformatted ones
  All,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitRequest {
  pub modes: Vec<CommitMode>,
  /// `None`: let git open the editor. `Some("")`: reuse an existing message.
  pub message: Option<String>,
}

impl CommitRequest {
  pub fn has(&self, mode: CommitMode) -> bool {
    self.modes.contains(&mode)
  }
}

/// `git commit` arguments (without the trailing pathspec) for `req`.
pub fn commit_args(req: &CommitRequest) -> Vec<String> {
  let mut args: Vec<String> = vec!["commit".into()];
  if req.has(CommitMode::Patch) {
    args.push("--patch".into());
  }
  if req.has(CommitMode::Amend) {
    args.push("--amend".into());
  }
  match req.message.as_deref() {
    Some("") if req.has(CommitMode::Amend) => args.push("--no-edit".into()),
    Some("") => args.push("--reuse-message=HEAD".into()),
    Some(msg) => {
      args.push("-m".into());
      args.push(msg.into());
    }
    None => {}
  }
  args
}

pub fn files_to_commit(req: &CommitRequest, root: &Path, selected: &[String], results: &[&RunResult]) -> Vec<String> {
  if req.has(CommitMode::All) {
    selected.to_vec()
  } else {
    changed_files(root, selected, results)
  }
}

pub fn commit(repo: &Path, req: &CommitRequest, files: &[String]) -> Result<()> {
  if files.is_empty() {
    warn!("nothing was reformatted; skipping commit");
    return Ok(());
  }

  if !req.has(CommitMode::Patch) {
    gitio::add(repo, files).context("staging formatted files")?;
  }

  let status = gitio::commit_interactive(repo, &commit_args(req), files)?;
  if !status.success() {
    anyhow::bail!("git commit exited with {}", status);
  }
  Ok(())
}
