// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one pyfmt invocation: select files, apply skips, run isort then black, optionally commit
// role: processing/orchestrator
// inputs: RunConfig, current working directory
// outputs: Divider-separated tool output on stdout; combined exit code
// side_effects: Spawns git/isort/black; formatters rewrite files unless check mode; optional git commit
// invariants:
// - isort always runs before black; nothing runs concurrently
// - an empty selection runs no formatter and exits 0
// - commit only when combined exit code is 0 and check mode is off
// errors: Selection and spawn errors propagate; commit errors are logged and do not alter the exit code
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::warn;

use crate::cli::RunConfig;
use crate::commit;
use crate::format::{self, FormatOptions, RunResult, Tool};
use crate::select;
use crate::skip::SkipList;
use crate::util::{print_divider, print_title};

fn print_result(result: &RunResult) {
  print_divider(result.tool.program());
  if result.lines.iter().all(|l| l.trim().is_empty()) {
    println!("No changes.");
  } else {
    println!("{}", result.lines.join("\n"));
  }
}

fn print_skipped(skips: &SkipList) {
  print_divider("skipping files");
  for name in skips.names() {
    println!("SKIPPING: {}", name);
  }
  println!("\nNumber of files to be skipped: {}", skips.names().len());
}

pub fn run(cfg: &RunConfig) -> Result<i32> {
  print_title();
  let started = Instant::now();
  let cwd = std::env::current_dir().context("resolving current directory")?;

  let skips = SkipList::resolve(&cwd, &cfg.skip)?;
  let mut selection = select::select(cfg.select, &cwd, &cfg.paths)?;

  if !skips.is_empty() {
    print_skipped(&skips);
    selection.files = skips.filter(selection.files);
  }

  if selection.files.is_empty() {
    println!("No files selected.");
    return Ok(0);
  }

  let opts = FormatOptions {
    line_length: cfg.line_length,
    check: cfg.check,
    target_version: cfg.target_version.clone().or_else(format::detect_target_version),
  };

  let mut isort_extra = cfg.extra_isort_args.clone();
  isort_extra.extend(skips.isort_args());
  let mut black_extra = cfg.extra_black_args.clone();
  black_extra.extend(skips.black_args());

  let isort_argv = format::isort_command(&opts, &isort_extra, &selection.files);
  let isort = format::run_formatter(Tool::Isort, &isort_argv, &selection.root)?;
  print_result(&isort);

  let black_argv = format::black_command(&opts, &black_extra, &selection.files);
  let black = format::run_formatter(Tool::Black, &black_argv, &selection.root)?;
  print_result(&black);

  let code = format::combined_exit_code(&[&isort, &black]);

  if let Some(req) = &cfg.commit {
    if code != 0 || cfg.check {
      warn!("not committing: formatting did not complete cleanly or --check was given");
    } else {
      let files = commit::files_to_commit(req, &selection.root, &selection.files, &[&isort, &black]);
      if let Err(e) = commit::commit(&selection.root, req, &files) {
        warn!("commit failed: {:#}", e);
      }
    }
  }

  println!("\npyfmt Execution Time: {:.2} seconds", started.elapsed().as_secs_f64());
  Ok(code)
}
