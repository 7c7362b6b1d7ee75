#![cfg(unix)]

mod common;

use common::{args_of, FakeTools};
use predicates::prelude::*;

fn repo_with_change() -> tempfile::TempDir {
  let repo = common::init_fixture_repo();
  std::fs::write(repo.path().join("a.py"), "import sys\nimport os\n").unwrap();
  repo
}

#[test]
fn check_only_never_alters_files() {
  let repo = repo_with_change();
  let tools = FakeTools::new();

  tools
    .pyfmt(repo.path())
    .args(["--select", "modified", "--check"])
    .env("FAKE_ISORT_FIX", "a.py")
    .assert()
    .success();

  let content = std::fs::read_to_string(repo.path().join("a.py")).unwrap();
  assert_eq!(content, "import sys\nimport os\n");
}

#[test]
fn write_mode_reports_changed_files() {
  let repo = repo_with_change();
  let tools = FakeTools::new();

  tools
    .pyfmt(repo.path())
    .args(["--select", "modified"])
    .env("FAKE_ISORT_FIX", "a.py")
    .assert()
    .success()
    .stdout(predicate::str::contains("Fixing").and(predicate::str::contains("a.py")));

  let content = std::fs::read_to_string(repo.path().join("a.py")).unwrap();
  assert!(content.ends_with("# sorted\n"));
}

#[test]
fn clean_run_prints_no_changes_and_strips_black_summary() {
  let repo = repo_with_change();
  let tools = FakeTools::new();

  tools
    .pyfmt(repo.path())
    .arg("a.py")
    .assert()
    .success()
    .stdout(predicate::str::contains("No changes."))
    .stdout(predicate::str::contains("ISORT"))
    .stdout(predicate::str::contains("BLACK"))
    .stdout(predicate::str::contains("All done!").not())
    .stdout(predicate::str::contains("pyfmt Execution Time"));
}

#[test]
fn black_failure_makes_exit_code_nonzero() {
  let repo = repo_with_change();
  let tools = FakeTools::new();

  tools
    .pyfmt(repo.path())
    .arg("a.py")
    .env("FAKE_BLACK_EXIT", "3")
    .assert()
    .code(3)
    .stdout(predicate::str::contains("All done!"));
}

#[test]
fn isort_failure_makes_exit_code_nonzero_and_black_still_runs() {
  let repo = repo_with_change();
  let tools = FakeTools::new();

  tools
    .pyfmt(repo.path())
    .arg("a.py")
    .env("FAKE_ISORT_EXIT", "2")
    .assert()
    .code(2);

  assert_eq!(tools.calls().len(), 2);
}

#[test]
fn line_length_and_target_reach_both_tools() {
  let repo = repo_with_change();
  let tools = FakeTools::new();

  tools
    .pyfmt(repo.path())
    .arg("a.py")
    .env("MAX_LINE_LENGTH", "79")
    .args(["--extra-isort-args", "--profile black"])
    .assert()
    .success();

  let isort = tools.call("isort");
  let isort_args = args_of(&isort);
  assert!(isort_args.contains(&"--line-width=79"));
  assert!(isort_args.windows(2).any(|w| w == ["--profile", "black"]));

  let black = tools.call("black");
  let black_args = args_of(&black);
  assert!(black_args.contains(&"--line-length=79"));
  assert!(black_args.contains(&"--target-version=py311"));
}

#[test]
fn skip_list_is_passed_to_both_tools() {
  let repo = repo_with_change();
  std::fs::create_dir_all(repo.path().join("vendor")).unwrap();
  std::fs::write(repo.path().join("vendor/lib.py"), "z = 1\n").unwrap();
  let tools = FakeTools::new();

  tools
    .pyfmt(repo.path())
    .args([".", "--skip", "vendor"])
    .assert()
    .success()
    .stdout(predicate::str::contains("SKIPPING: lib.py"));

  assert!(args_of(&tools.call("isort")).contains(&"--skip=lib.py"));
  assert!(args_of(&tools.call("black")).contains(&r"--exclude=lib\.py"));
}

#[test]
fn missing_skip_target_aborts_before_formatting() {
  let repo = repo_with_change();
  let tools = FakeTools::new();

  tools
    .pyfmt(repo.path())
    .args(["--skip", "nope"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not found"));

  assert!(tools.calls().is_empty());
}

#[test]
fn missing_formatter_binary_is_fatal() {
  let repo = repo_with_change();
  let tools = FakeTools::new();
  let empty = tempfile::TempDir::new().unwrap();

  tools
    .pyfmt(repo.path())
    .arg("a.py")
    .env("PATH", empty.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("spawning isort"));
}
