//! File selection: maps a [`SelectMode`] and base paths to the files handed to the formatters.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::warn;

use crate::gitio;

/// Extensions the formatters understand.
pub const SOURCE_EXTENSIONS: &[&str] = &["py", "pyi"];

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectMode {
  /// Format everything under the given paths
  All,
  /// Files with changes in the index
  Staged,
  /// Staged, unstaged and untracked files
  Modified,
  /// Files changed by the most recent commit
  Head,
  /// Files changed since the upstream branch (falls back to all)
  Local,
}

/// Two-character code from `git status --porcelain`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusCode {
  index: char,
  work_tree: char,
}

impl StatusCode {
  pub fn new(index: char, work_tree: char) -> Self {
    Self { index, work_tree }
  }

  pub fn parse(xy: &str) -> Option<Self> {
    let mut chars = xy.chars();
    match (chars.next(), chars.next(), chars.next()) {
      (Some(index), Some(work_tree), None) => Some(Self::new(index, work_tree)),
      _ => None,
    }
  }

  /// Rename and copy entries carry a second (old path) record in `-z` output.
  fn has_source_path(&self) -> bool {
    matches!(self.index, 'R' | 'C') || matches!(self.work_tree, 'R' | 'C')
  }

  pub fn index_has_changes(&self) -> bool {
    matches!(self.index, 'M' | 'A' | 'R' | 'C')
  }

  pub fn has_changes(&self) -> bool {
    self.index_has_changes() || matches!(self.work_tree, 'M' | 'A' | 'C')
  }

  pub fn is_untracked(&self) -> bool {
    self.index == '?' && self.work_tree == '?'
  }

  pub fn is_deleted(&self) -> bool {
    self.work_tree == 'D'
  }

  pub fn is_renamed(&self) -> bool {
    self.index == 'R'
  }
}

/// Files picked for a run, relative to `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
  pub root: PathBuf,
  pub files: Vec<String>,
}

pub fn has_source_extension(path: &str) -> bool {
  Path::new(path)
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Parses `git status --porcelain -z` output into codes and paths.
///
/// Each entry is `XY <path>` terminated by NUL; rename and copy entries
/// are followed by one extra record holding the old path, which is skipped
/// so the entry resolves to its new name.
pub fn parse_status_z(output: &str) -> Vec<(StatusCode, String)> {
  let mut entries = Vec::new();
  let mut records = output.split('\0');
  while let Some(record) = records.next() {
    let Some(code) = record.get(..2).and_then(StatusCode::parse) else {
      continue;
    };
    if code.has_source_path() {
      records.next();
    }
    match record.get(3..) {
      Some(path) if !path.is_empty() => entries.push((code, path.to_string())),
      _ => {}
    }
  }
  entries
}

/// Source files from porcelain output that still exist in the work tree.
pub fn iter_changed(output: &str) -> impl Iterator<Item = (StatusCode, String)> {
  parse_status_z(output)
    .into_iter()
    .filter(|(code, file)| !code.is_deleted() && has_source_extension(file))
}

/// Source files from `git diff --name-only -z` output.
pub fn iter_committed(output: &str) -> impl Iterator<Item = String> + '_ {
  output
    .split('\0')
    .filter(|f| !f.is_empty() && has_source_extension(f))
    .map(str::to_string)
}

pub fn select_all(paths: &[String]) -> Vec<String> {
  paths.to_vec()
}

pub fn select_staged(repo: &Path, paths: &[String]) -> Result<Vec<String>> {
  let out = gitio::status_porcelain(repo, paths)?;
  Ok(
    iter_changed(&out)
      .filter(|(code, _)| code.index_has_changes())
      .map(|(_, file)| file)
      .collect(),
  )
}

pub fn select_modified(repo: &Path, paths: &[String]) -> Result<Vec<String>> {
  let out = gitio::status_porcelain(repo, paths)?;
  Ok(
    iter_changed(&out)
      .filter(|(code, _)| code.has_changes() || code.is_untracked())
      .map(|(_, file)| file)
      .collect(),
  )
}

pub fn select_head(repo: &Path, paths: &[String]) -> Result<Vec<String>> {
  let out = gitio::diff_names(repo, "HEAD^1..HEAD", paths)?;
  Ok(iter_committed(&out).collect())
}

/// Files committed locally but not yet on the upstream branch.
///
/// Without an upstream this warns and returns `paths` unchanged, like [`select_all`].
pub fn select_local(repo: &Path, paths: &[String]) -> Result<Vec<String>> {
  Ok(local_or_fallback(repo, paths)?.unwrap_or_else(|| select_all(paths)))
}

fn local_or_fallback(repo: &Path, paths: &[String]) -> Result<Option<Vec<String>>> {
  match gitio::diff_names(repo, "@{upstream}..HEAD", paths) {
    Ok(out) => Ok(Some(iter_committed(&out).collect())),
    Err(e) if e.is_no_upstream() => {
      warn!("no upstream configured for the current branch; selecting all of {:?}", paths);
      Ok(None)
    }
    Err(e) => Err(e.into()),
  }
}

fn repo_root(cwd: &Path) -> Result<PathBuf> {
  let top = gitio::toplevel(cwd).context("locating repository root")?;
  Ok(PathBuf::from(top))
}

/// Resolves `mode` against live repository state.
///
/// Git reports paths relative to the repository root, so git-backed modes
/// return a selection rooted there; `all` (and the `local` fallback) stay
/// relative to `cwd`.
pub fn select(mode: SelectMode, cwd: &Path, paths: &[String]) -> Result<Selection> {
  let in_repo = |files: Vec<String>| -> Result<Selection> {
    Ok(Selection {
      root: repo_root(cwd)?,
      files,
    })
  };
  let unchanged = || Selection {
    root: cwd.to_path_buf(),
    files: select_all(paths),
  };

  match mode {
    SelectMode::All => Ok(unchanged()),
    SelectMode::Staged => in_repo(select_staged(cwd, paths)?),
    SelectMode::Modified => in_repo(select_modified(cwd, paths)?),
    SelectMode::Head => in_repo(select_head(cwd, paths)?),
    SelectMode::Local => match local_or_fallback(cwd, paths)? {
      Some(files) => in_repo(files),
      None => Ok(unchanged()),
    },
  }
}
