// src/bin/cli.rs
use clap::Parser;
use color_eyre::Result;

use oac_scrape::cli::{self, Cli};
use oac_scrape::log;

fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();

    let args = Cli::parse();
    log::init(args.trace.into(), args.log_file.as_deref())?;

    cli::run(args)
}
