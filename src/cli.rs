// src/cli.rs
use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{eyre, Result};
use tracing::{info, warn, Level};

use crate::config::consts::{DEFAULT_OUT_DIR, ENV_OUT_DIR, ENV_USER_AGENT, REQUEST_TIMEOUT_SECS};
use crate::config::options::{RunOptions, Schedule};
use crate::config::sources::ProviderKind;
use crate::csv::write_row;
use crate::model::{Cycle, RequestKey, SourceKind};
use crate::progress::RunTally;
use crate::runner;

#[derive(Parser, Debug)]
#[command(version, about = "Scrape pipeline operationally available capacity reports", long_about = None)]
pub struct Cli {
    /// Provider family: energy-transfer, enable, williams, one-line
    #[arg(long, short, required_unless_present = "list")]
    pub provider: Option<ProviderKind>,

    /// Gas day, YYYY-MM-DD. Defaults to today.
    #[arg(long, short)]
    pub date: Option<NaiveDate>,

    /// timely, evening, id1, id2, id3, final
    #[arg(long, short, default_value = "timely")]
    pub cycle: Cycle,

    /// Worker threads; 1 scrapes sources one at a time
    #[arg(long, default_value_t = 1)]
    pub parallel: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Output directory (else $OAC_OUT_DIR, else ./out)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Write CSV to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Also scrape the N days before --date, oldest first
    #[arg(long, value_name = "DAYS")]
    pub backfill: Option<u32>,

    /// Sets the level of tracing
    #[arg(long, value_enum, ignore_case = true, default_value = "info")]
    pub trace: TraceLevel,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print the configured sources and exit
    #[arg(long)]
    pub list: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<TraceLevel> for Level {
    fn from(t: TraceLevel) -> Self {
        match t {
            TraceLevel::Trace => Level::TRACE,
            TraceLevel::Debug => Level::DEBUG,
            TraceLevel::Info => Level::INFO,
            TraceLevel::Warn => Level::WARN,
            TraceLevel::Error => Level::ERROR,
        }
    }
}

impl Cli {
    /// Options for the first key; environment overrides apply where flags are absent.
    pub fn run_options(&self, provider: ProviderKind, key: RequestKey) -> RunOptions {
        let mut opts = RunOptions::new(provider, key);
        opts.schedule = Schedule::parallel(self.parallel);
        opts.timeout = Duration::from_secs(self.timeout);
        opts.write_local = !self.stdout;
        opts.out_dir = self
            .out
            .clone()
            .or_else(|| env::var(ENV_OUT_DIR).ok().filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
        if let Ok(ua) = env::var(ENV_USER_AGENT) {
            if !ua.is_empty() {
                opts.user_agent = ua;
            }
        }
        opts
    }

    /// Every key this invocation covers, oldest first.
    pub fn keys(&self, today: NaiveDate) -> Vec<RequestKey> {
        let end = self.date.unwrap_or(today);
        match self.backfill {
            Some(days) => runner::backfill_keys(end, days, self.cycle),
            None => vec![RequestKey::new(end, self.cycle)],
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.list {
        return list_sources(cli.provider);
    }
    let provider = cli.provider.ok_or_else(|| eyre!("--provider is required"))?;

    let keys = cli.keys(Local::now().date_naive());
    let Some(first) = keys.first() else { return Ok(()) };
    let base = cli.run_options(provider, *first);

    for key in keys {
        let mut tally = RunTally::default();
        let result = runner::run(&base.with_key(key), &mut tally)?;
        info!(
            "{key}: {} records; {} ok, {} skipped, {} failed",
            result.len(),
            tally.done.len(),
            tally.skipped.len(),
            tally.failed.len()
        );
        for (tag, err) in &tally.failed {
            warn!("{tag}: {err}");
        }
    }
    Ok(())
}

fn list_sources(only: Option<ProviderKind>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let kinds: Vec<ProviderKind> = match only {
        Some(k) => vec![k],
        None => ProviderKind::ALL.to_vec(),
    };
    for kind in kinds {
        let provider = kind.provider();
        for src in provider.sources {
            let url = match src.kind {
                SourceKind::CsvDownload { post_url, .. } => post_url,
                SourceKind::Listing { listing_url, .. } => listing_url,
                SourceKind::HtmlTable { download_url } => download_url,
                SourceKind::CsvQuery { query_url, .. } => query_url,
            };
            write_row(&mut out, &row![kind.key(), src.asset_id, src.provider_id, src.name, url], ',')?;
        }
    }
    Ok(())
}
