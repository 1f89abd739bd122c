// src/runner.rs
use chrono::{Days, NaiveDate};
use tracing::info;

use crate::{
    config::options::RunOptions,
    config::sources::Provider,
    core::net::{Fetch, HttpFetcher},
    engine::aggregate::aggregate,
    error::Result,
    model::{AggregateResult, Cycle, RequestKey},
    progress::Progress,
    scrape::collect_source,
    store::{CsvStore, Persist},
};

/// Top-level run against the live sites: one HTTP session, one CSV store.
pub fn run(opts: &RunOptions, progress: &mut dyn Progress) -> Result<AggregateResult> {
    let http = HttpFetcher::new(&opts.user_agent, opts.timeout)?;
    let mut store = CsvStore::new(opts.provider, &opts.out_dir);
    run_with(opts.provider.provider(), opts, &http, &mut store, progress)
}

/// Aggregate every source of `provider`, then persist exactly once.
/// Only a persist failure makes the run fail.
pub fn run_with(
    provider: &Provider,
    opts: &RunOptions,
    http: &dyn Fetch,
    store: &mut dyn Persist,
    progress: &mut dyn Progress,
) -> Result<AggregateResult> {
    info!("Scraping {} ({} sources) for {}", provider.kind, provider.sources.len(), opts.key);

    let result = aggregate(provider.sources, &opts.key, opts.schedule, progress, |src, key| {
        collect_source(http, provider, src, key)
    });

    store.persist(&result, opts.key.date, opts.write_local)?;
    Ok(result)
}

/// Keys for `end - days ..= end`, oldest first.
pub fn backfill_keys(end: NaiveDate, days: u32, cycle: Cycle) -> Vec<RequestKey> {
    (0..=days)
        .rev()
        .filter_map(|back| end.checked_sub_days(Days::new(u64::from(back))))
        .map(|date| RequestKey::new(date, cycle))
        .collect()
}
