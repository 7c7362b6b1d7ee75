// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Logging setup, splash title and section dividers for terminal output, and man page rendering
// role: utilities/helpers
// inputs: RUST_LOG; COLUMNS; clap CommandFactory
// outputs: Configured tracing subscriber, title and divider strings, man page text
// side_effects: init_tracing installs the global subscriber
// invariants:
// - diagnostics go to stderr; tool output goes to stdout
// - divider width is stable when stdout is not a terminal
// errors: render_man_page surfaces IO errors from the renderer
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::IsTerminal;

use clap::CommandFactory;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_WIDTH: usize = 79;
const BLUE: &str = "\x1b[94m";
const RESET: &str = "\x1b[0m";

const TITLE: &[&str] = &[
  r"               __           _    ",
  r"              / _|         | |   ",
  r"  _ __  _   _| |_ _ __ ___ | |_  ",
  r" | '_ \| | | |  _| '_ ` _ \| __| ",
  r" | |_) | |_| | | | | | | | | |_  ",
  r" | .__/ \__, |_| |_| |_| |_|\__| ",
  r" | |     __/ |                   ",
  r" |_|    |___/                    ",
];

/// Install the stderr subscriber, honoring `RUST_LOG` (default: warn).
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .with_target(false)
    .without_time()
    .try_init();
}

pub fn term_width() -> usize {
  std::env::var("COLUMNS")
    .ok()
    .and_then(|c| c.trim().parse::<usize>().ok())
    .filter(|w| *w > 0)
    .unwrap_or(DEFAULT_WIDTH)
}

/// `title` upper-cased and centered in a line of `fill` characters.
pub fn divider(title: &str, fill: char, width: usize) -> String {
  if title.is_empty() {
    return fill.to_string().repeat(width);
  }
  let label = format!("  {}  ", title.to_uppercase());
  let pad = width.saturating_sub(label.chars().count());
  let left = pad / 2;
  format!(
    "{}{}{}",
    fill.to_string().repeat(left),
    label,
    fill.to_string().repeat(pad - left)
  )
}

/// The ascii-art title, each row centered in `width` columns.
pub fn title_lines(width: usize) -> Vec<String> {
  TITLE
    .iter()
    .map(|row| {
      let pad = width.saturating_sub(row.chars().count());
      let left = pad / 2;
      format!("{}{}{}", " ".repeat(left), row, " ".repeat(pad - left))
    })
    .collect()
}

/// Splash title; interactive terminals only so piped output stays clean.
pub fn print_title() {
  if !std::io::stdout().is_terminal() {
    return;
  }
  println!("{}", BLUE);
  for row in title_lines(term_width()) {
    println!("{}", row);
  }
  println!("{}", RESET);
}

pub fn print_divider(title: &str) {
  let line = divider(title, '=', term_width());
  if std::io::stdout().is_terminal() {
    println!("\n{}{}{}", BLUE, line, RESET);
  } else {
    println!("\n{}", line);
  }
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
