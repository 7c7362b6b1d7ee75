use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Appends `<tool> <args>` to $FAKE_TOOL_LOG; rewrites the file named by
/// $FAKE_ISORT_FIX when it is passed directly or lies under a passed
/// directory, unless --check-only was given.
const FAKE_ISORT: &str = r##"#!/bin/sh
echo "isort $*" >> "$FAKE_TOOL_LOG"
check=0
for a in "$@"; do
  if [ "$a" = "--check-only" ]; then check=1; fi
done
if [ "$check" = 0 ] && [ -n "$FAKE_ISORT_FIX" ]; then
  for a in "$@"; do
    hit=0
    case "$FAKE_ISORT_FIX" in
      "$a"|"$a"/*) hit=1 ;;
    esac
    if [ "$a" = "." ]; then hit=1; fi
    if [ "$hit" = 1 ] && [ -f "$FAKE_ISORT_FIX" ]; then
      echo "# sorted" >> "$FAKE_ISORT_FIX"
      echo "Fixing $(pwd)/$FAKE_ISORT_FIX"
    fi
  done
fi
exit "${FAKE_ISORT_EXIT:-0}"
"##;

const FAKE_BLACK: &str = r#"#!/bin/sh
echo "black $*" >> "$FAKE_TOOL_LOG"
echo "All done! ✨ 🍰 ✨" >&2
echo "1 file left unchanged." >&2
exit "${FAKE_BLACK_EXIT:-0}"
"#;

#[allow(dead_code)]
pub fn run(repo: &Path, args: &[&str]) {
  let status = Command::new("git").args(args).current_dir(repo).status().unwrap();
  assert!(status.success(), "git {:?} failed", args);
}

#[allow(dead_code)]
pub fn git_out(repo: &Path, args: &[&str]) -> String {
  let out = Command::new("git").args(args).current_dir(repo).output().unwrap();
  assert!(out.status.success(), "git {:?} failed", args);
  String::from_utf8_lossy(&out.stdout).trim().to_string()
}

/// Repository on `main` with one commit ("initial") holding `base.py`.
#[allow(dead_code)]
pub fn init_fixture_repo() -> tempfile::TempDir {
  let dir = tempfile::TempDir::new().unwrap();

  run(dir.path(), &["init", "-q", "-b", "main"]);
  run(dir.path(), &["config", "user.name", "Fixture Bot"]);
  run(dir.path(), &["config", "user.email", "fixture@example.com"]);
  run(dir.path(), &["config", "commit.gpgsign", "false"]);

  std::fs::write(dir.path().join("base.py"), "import os\n").unwrap();
  run(dir.path(), &["add", "."]);
  run(dir.path(), &["commit", "-q", "-m", "initial"]);

  dir
}

/// Directory holding executable fake `isort` and `black` scripts.
pub struct FakeTools {
  dir: tempfile::TempDir,
}

impl FakeTools {
  pub fn new() -> Self {
    let dir = tempfile::TempDir::new().unwrap();
    for (name, body) in [("isort", FAKE_ISORT), ("black", FAKE_BLACK)] {
      let path = dir.path().join(name);
      std::fs::write(&path, body).unwrap();
      std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    Self { dir }
  }

  pub fn log_path(&self) -> PathBuf {
    self.dir.path().join("calls.log")
  }

  /// Logged invocations, one line per tool run.
  #[allow(dead_code)]
  pub fn calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.log_path())
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  #[allow(dead_code)]
  pub fn call(&self, tool: &str) -> String {
    self
      .calls()
      .into_iter()
      .find(|l| l.starts_with(&format!("{} ", tool)))
      .unwrap_or_else(|| panic!("{} was not invoked", tool))
  }

  /// `pyfmt` running in `cwd` with the fakes first on PATH and a clean environment.
  pub fn pyfmt(&self, cwd: &Path) -> assert_cmd::Command {
    let path = format!(
      "{}:{}",
      self.dir.path().display(),
      std::env::var("PATH").unwrap_or_default()
    );
    let mut cmd = assert_cmd::Command::cargo_bin("pyfmt").unwrap();
    cmd
      .current_dir(cwd)
      .env("PATH", path)
      .env("FAKE_TOOL_LOG", self.log_path())
      .env("BLACK_TARGET_VERSION", "py311")
      .env("GIT_EDITOR", "true")
      .env_remove("BASE_CODE_DIR")
      .env_remove("MAX_LINE_LENGTH")
      .env_remove("RUST_LOG")
      .env_remove("FAKE_ISORT_FIX")
      .env_remove("FAKE_ISORT_EXIT")
      .env_remove("FAKE_BLACK_EXIT");
    cmd
  }
}

/// Splits a logged call into its arguments (tool name first).
#[allow(dead_code)]
pub fn args_of(call: &str) -> Vec<&str> {
  call.split_whitespace().collect()
}
