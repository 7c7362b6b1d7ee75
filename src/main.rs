use anyhow::Result;
use clap::Parser;

mod cli;
mod commit;
mod format;
mod gitio;
mod run;
mod select;
mod skip;
mod util;

use crate::cli::{normalize, Cli};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  util::init_tracing();

  // Phase 1: normalize CLI + environment
  let cfg = normalize(cli)?;

  // Phase 2: select, format, maybe commit
  let code = run::run(&cfg)?;
  std::process::exit(code);
}
