// tests/end_to_end.rs
mod common;

use chrono::NaiveDate;

use common::{enable_listing, enable_posting_page, enable_report, key, MockFetch, Reply};
use oac_scrape::config::consts::REASON_HEADER;
use oac_scrape::config::options::{RunOptions, Schedule};
use oac_scrape::config::sources::{Provider, ProviderKind, ENABLE, ENABLE_LAYOUT};
use oac_scrape::engine::normalize::Schema;
use oac_scrape::model::{AggregateResult, Cycle, CycleCodes, SourceDescriptor, SourceKind};
use oac_scrape::progress::RunTally;
use oac_scrape::runner::run_with;
use oac_scrape::store::Persist;
use oac_scrape::{Result, ScrapeError};

const fn listing_source(asset_id: &'static str, listing_url: &'static str) -> SourceDescriptor {
    SourceDescriptor {
        provider_id: "000000001",
        asset_id,
        name: "MOCK PIPELINE",
        site: "mock",
        kind: SourceKind::Listing { api_url: "https://mock.test", listing_url },
    }
}

static MOCK_SOURCES: [SourceDescriptor; 3] = [
    listing_source("EMPTY", "https://mock.test/empty/list"),
    listing_source("SLOW", "https://mock.test/slow/list"),
    listing_source("GOOD", "https://mock.test/good/list"),
];

static MOCK_PROVIDER: Provider = Provider {
    kind: ProviderKind::Enable,
    sources: &MOCK_SOURCES,
    cycles: CycleCodes(&[(Cycle::Intraday1, 2)]),
    schema: Schema::FixedWidth,
    get_headers: &[("Accept", "text/html")],
    post_headers: &[],
    layout: Some(ENABLE_LAYOUT),
};

#[derive(Default)]
struct RecordingStore {
    calls: Vec<(AggregateResult, NaiveDate, bool)>,
}

impl Persist for RecordingStore {
    fn persist(&mut self, data: &AggregateResult, requested_date: NaiveDate, write_local: bool) -> Result<()> {
        self.calls.push((data.clone(), requested_date, write_local));
        Ok(())
    }
}

struct FailingStore;

impl Persist for FailingStore {
    fn persist(&mut self, _: &AggregateResult, _: NaiveDate, _: bool) -> Result<()> {
        Err(ScrapeError::Persist("disk full".into()))
    }
}

fn mock_sites() -> MockFetch {
    let title = "OAC 2022-09-11 INTRADAY 1";
    MockFetch::new()
        .body("https://mock.test/empty/list", enable_listing(&[(title, "/empty/view")]))
        .body("https://mock.test/empty/view", enable_posting_page(&enable_report(0)))
        .on("https://mock.test/slow/list", Reply::Timeout)
        .body("https://mock.test/good/list", enable_listing(&[("OAC 2022-09-11 TIMELY", "/good/old"), (title, "/good/view")]))
        .body("https://mock.test/good/view", enable_posting_page(&enable_report(2)))
}

fn run_mock(schedule: Schedule) {
    let http = mock_sites();
    let mut opts = RunOptions::new(ProviderKind::Enable, key("2022-09-11", Cycle::Intraday1));
    opts.schedule = schedule;
    let mut store = RecordingStore::default();
    let mut tally = RunTally::default();

    let result = run_with(&MOCK_PROVIDER, &opts, &http, &mut store, &mut tally).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.headers.len(), 19);
    assert_eq!(result.headers[18], REASON_HEADER);
    assert_eq!(result.records[0].get(0), Some("000000001"));
    assert_eq!(result.records[0].get(3), Some("09/12/2022 9:00 AM"));
    assert_eq!(result.records[0].get(4), Some("INTRADAY 1"));
    assert_eq!(result.records[0].get(6), Some("10001"));
    assert_eq!(result.records[1].get(6), Some("10002"));

    assert_eq!(store.calls.len(), 1);
    let (persisted, date, write_local) = &store.calls[0];
    assert_eq!(persisted, &result);
    assert_eq!(*date, NaiveDate::from_ymd_opt(2022, 9, 11).unwrap());
    assert!(*write_local);

    assert_eq!(tally.done, vec![("mock/EMPTY".to_string(), 0), ("mock/GOOD".to_string(), 2)]);
    assert_eq!(tally.failed.len(), 1);
    assert_eq!(tally.failed[0].0, "mock/SLOW");
    assert!(tally.failed[0].1.contains("timed out"));

    // the old TIMELY posting was never opened
    assert!(!http.calls().iter().any(|(_, url)| url.ends_with("/good/old")));
}

#[test]
fn empty_timeout_and_good_source_sequential() {
    run_mock(Schedule::Sequential);
}

#[test]
fn empty_timeout_and_good_source_parallel() {
    run_mock(Schedule::parallel(3));
}

#[test]
fn empty_run_is_still_persisted() {
    let http = MockFetch::new(); // every URL answers 404
    let opts = RunOptions::new(ProviderKind::Enable, key("2022-09-11", Cycle::Intraday1));
    let mut store = RecordingStore::default();
    let mut tally = RunTally::default();

    let result = run_with(&MOCK_PROVIDER, &opts, &http, &mut store, &mut tally).unwrap();

    assert!(result.is_empty());
    assert_eq!(store.calls.len(), 1);
    assert_eq!(tally.failed.len(), 3);
    assert!(tally.failed.iter().all(|(_, e)| e.contains("404")));
}

#[test]
fn persist_failure_fails_the_run() {
    let http = mock_sites();
    let opts = RunOptions::new(ProviderKind::Enable, key("2022-09-11", Cycle::Intraday1));
    let err = run_with(&MOCK_PROVIDER, &opts, &http, &mut FailingStore, &mut RunTally::default()).unwrap_err();
    assert!(matches!(err, ScrapeError::Persist(_)));
}

#[test]
fn real_enable_provider_skips_when_listing_has_no_match() {
    let http = MockFetch::new()
        .body(
            "https://pipelines.energytransfer.com/ipost/EGT/capacity/enbl-operationally-available?max=ALL",
            enable_listing(&[("OAC 2022-09-10 EVENING", "/x")]),
        )
        .body(
            "https://pipelines.energytransfer.com/ipost/MRT/capacity/enbl-operationally-available?max=ALL",
            enable_listing(&[]),
        );
    let opts = RunOptions::new(ProviderKind::Enable, key("2022-09-11", Cycle::Evening));
    let mut store = RecordingStore::default();
    let mut tally = RunTally::default();

    let result = run_with(&ENABLE, &opts, &http, &mut store, &mut tally).unwrap();

    assert!(result.is_empty());
    assert_eq!(tally.skipped.len(), 2);
    assert!(tally.failed.is_empty());
    assert_eq!(store.calls.len(), 1);
}
