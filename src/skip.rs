//! `--skip` handling: resolve files/directories to source file names excluded from a run.

use std::path::Path;

use anyhow::{bail, Result};
use walkdir::WalkDir;

use crate::select::has_source_extension;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
  names: Vec<String>,
}

impl SkipList {
  /// Resolves each entry relative to `cwd`. Directories contribute every source file beneath them.
  pub fn resolve(cwd: &Path, entries: &[String]) -> Result<Self> {
    let mut list = SkipList::default();
    for entry in entries {
      let path = cwd.join(entry);
      if path.is_file() {
        if has_source_extension(entry) {
          list.push_file_name(&path);
        }
      } else if path.is_dir() {
        for item in WalkDir::new(&path).sort_by_file_name() {
          let item = item?;
          if item.file_type().is_file() && has_source_extension(&item.file_name().to_string_lossy()) {
            list.push_file_name(item.path());
          }
        }
      } else {
        bail!(
          "one of the files or directories marked as skipped was not found ({:?}); check its spelling",
          entry
        );
      }
    }
    Ok(list)
  }

  fn push_file_name(&mut self, path: &Path) {
    if let Some(name) = path.file_name() {
      let name = name.to_string_lossy().to_string();
      if !self.names.contains(&name) {
        self.names.push(name);
      }
    }
  }

  pub fn names(&self) -> &[String] {
    &self.names
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// Drops selected files whose file name is skipped.
  pub fn filter(&self, files: Vec<String>) -> Vec<String> {
    files
      .into_iter()
      .filter(|f| {
        let name = Path::new(f).file_name().map(|n| n.to_string_lossy().to_string());
        !name.is_some_and(|n| self.names.contains(&n))
      })
      .collect()
  }

  pub fn isort_args(&self) -> Vec<String> {
    self.names.iter().map(|n| format!("--skip={}", n)).collect()
  }

  pub fn black_args(&self) -> Vec<String> {
    if self.names.is_empty() {
      return vec![];
    }
    let pattern: Vec<String> = self.names.iter().map(|n| regex::escape(n)).collect();
    vec![format!("--exclude={}", pattern.join("|"))]
  }
}

/// Splits the comma-separated `--skip` value.
pub fn parse_skip_entries(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}
