// tests/aggregate.rs
mod common;

use std::thread;
use std::time::{Duration, Instant};

use common::key;
use oac_scrape::config::consts::REQUEST_PAUSE_MS;
use oac_scrape::config::options::Schedule;
use oac_scrape::engine::aggregate::{aggregate, Skip, SourceOutcome};
use oac_scrape::engine::normalize::NormalizedTable;
use oac_scrape::model::{CanonicalRecord, Cycle, RequestKey, SourceDescriptor, SourceKind};
use oac_scrape::progress::{NullProgress, RunTally};
use oac_scrape::{row, ScrapeError};

const fn source(asset_id: &'static str) -> SourceDescriptor {
    SourceDescriptor {
        provider_id: "1",
        asset_id,
        name: asset_id,
        site: "mock",
        kind: SourceKind::HtmlTable { download_url: "https://mock.test/detail" },
    }
}

static SOURCES: [SourceDescriptor; 3] = [source("S1"), source("S2"), source("S3")];

fn records(src: &SourceDescriptor, n: usize) -> SourceOutcome {
    SourceOutcome::Records(NormalizedTable {
        headers: row!["Source", "Row"],
        records: (0..n).map(|i| CanonicalRecord::new(row![src.asset_id, i.to_string()])).collect(),
    })
}

fn s2_fails(src: &SourceDescriptor, _key: &RequestKey) -> SourceOutcome {
    match src.asset_id {
        "S1" => {
            // finish last under a parallel schedule
            thread::sleep(Duration::from_millis(50));
            records(src, 2)
        }
        "S2" => SourceOutcome::Failed(ScrapeError::malformed("garbled")),
        _ => records(src, 1),
    }
}

fn tags(result: &oac_scrape::model::AggregateResult) -> Vec<String> {
    result.records.iter().map(|r| format!("{}:{}", r.cells()[0], r.cells()[1])).collect()
}

#[test]
fn failing_source_is_skipped_sequential() {
    let mut tally = RunTally::default();
    let result = aggregate(&SOURCES, &key("2022-09-11", Cycle::Timely), Schedule::Sequential, &mut tally, s2_fails);

    assert_eq!(tags(&result), ["S1:0", "S1:1", "S3:0"]);
    assert_eq!(result.headers, row!["Source", "Row"]);
    assert_eq!(tally.total, 3);
    assert_eq!(tally.done, vec![("mock/S1".to_string(), 2), ("mock/S3".to_string(), 1)]);
    assert_eq!(tally.failed.len(), 1);
    assert_eq!(tally.failed[0].0, "mock/S2");
    assert_eq!(tally.records, 3);
}

#[test]
fn failing_source_is_skipped_parallel_and_order_kept() {
    let mut tally = RunTally::default();
    let result = aggregate(&SOURCES, &key("2022-09-11", Cycle::Timely), Schedule::parallel(3), &mut tally, s2_fails);

    assert_eq!(tags(&result), ["S1:0", "S1:1", "S3:0"]);
    assert_eq!(tally.done.len(), 2);
    assert_eq!(tally.failed.len(), 1);
}

#[test]
fn more_workers_than_sources_is_fine() {
    let result = aggregate(&SOURCES, &key("2022-09-11", Cycle::Timely), Schedule::parallel(16), &mut NullProgress, |src, _| {
        records(src, 1)
    });
    assert_eq!(tags(&result), ["S1:0", "S2:0", "S3:0"]);
}

#[test]
fn skips_are_not_failures() {
    let mut tally = RunTally::default();
    let result = aggregate(&SOURCES, &key("2022-09-11", Cycle::Final), Schedule::Sequential, &mut tally, |src, key| {
        if src.asset_id == "S3" {
            records(src, 1)
        } else {
            SourceOutcome::Skipped(Skip::CycleNotPublished(key.cycle))
        }
    });

    assert_eq!(result.len(), 1);
    assert_eq!(tally.skipped.len(), 2);
    assert!(tally.failed.is_empty());
    assert_eq!(tally.skipped[0].1, "cycle FINAL not published");
}

#[test]
fn all_sources_failing_gives_empty_result() {
    let result = aggregate(&SOURCES, &key("2022-09-11", Cycle::Timely), Schedule::Sequential, &mut NullProgress, |src, _| {
        SourceOutcome::Failed(ScrapeError::Transport { url: src.asset_id.to_string(), reason: "timed out".into() })
    });
    assert!(result.is_empty());
    assert!(result.headers.is_empty());
    assert_eq!(result.key, key("2022-09-11", Cycle::Timely));
}

#[test]
fn differing_width_is_a_schema_mismatch() {
    let mut tally = RunTally::default();
    let result = aggregate(&SOURCES, &key("2022-09-11", Cycle::Timely), Schedule::Sequential, &mut tally, |src, _| {
        if src.asset_id == "S2" {
            SourceOutcome::Records(NormalizedTable {
                headers: row!["Source", "Row", "Extra"],
                records: vec![CanonicalRecord::new(row!["S2", "0", "x"])],
            })
        } else {
            records(src, 1)
        }
    });

    assert_eq!(tags(&result), ["S1:0", "S3:0"]);
    assert_eq!(tally.failed.len(), 1);
    assert!(tally.failed[0].1.contains("schema mismatch"));
}

#[test]
fn reordered_columns_are_a_schema_mismatch() {
    let mut tally = RunTally::default();
    let result = aggregate(&SOURCES, &key("2022-09-11", Cycle::Timely), Schedule::Sequential, &mut tally, |src, _| {
        let table = match src.asset_id {
            "S2" => NormalizedTable {
                headers: row!["Capacity", "Loc"],
                records: vec![CanonicalRecord::new(row!["200", "B"])],
            },
            _ => NormalizedTable {
                headers: row!["Loc", "Capacity"],
                records: vec![CanonicalRecord::new(row![src.asset_id, "100"])],
            },
        };
        SourceOutcome::Records(table)
    });

    assert_eq!(result.headers, row!["Loc", "Capacity"]);
    assert_eq!(tags(&result), ["S1:100", "S3:100"]);
    assert_eq!(tally.done.len(), 2);
    assert_eq!(tally.failed.len(), 1);
    assert_eq!(tally.failed[0].0, "mock/S2");
    assert!(tally.failed[0].1.contains("schema mismatch"));
    assert!(tally.failed[0].1.contains("Capacity"));
}

#[test]
fn sequential_pauses_between_sources() {
    let started = Instant::now();
    aggregate(&SOURCES, &key("2022-09-11", Cycle::Timely), Schedule::Sequential, &mut NullProgress, |src, _| {
        records(src, 1)
    });
    // two gaps for three sources
    assert!(started.elapsed() >= Duration::from_millis(2 * REQUEST_PAUSE_MS));
}

#[test]
fn no_pause_after_the_last_source() {
    for schedule in [Schedule::Sequential, Schedule::Parallel { workers: 4 }] {
        let started = Instant::now();
        let result = aggregate(&SOURCES[..1], &key("2022-09-11", Cycle::Timely), schedule, &mut NullProgress, |src, _| {
            records(src, 1)
        });
        assert_eq!(result.len(), 1);
        assert!(started.elapsed() < Duration::from_millis(REQUEST_PAUSE_MS), "{schedule:?}");
    }
}

#[test]
fn panicking_source_is_isolated() {
    for schedule in [Schedule::Sequential, Schedule::parallel(2)] {
        let mut tally = RunTally::default();
        let result = aggregate(&SOURCES, &key("2022-09-11", Cycle::Timely), schedule, &mut tally, |src, _| {
            if src.asset_id == "S2" {
                panic!("boom");
            }
            records(src, 1)
        });
        assert_eq!(tags(&result), ["S1:0", "S3:0"]);
        assert_eq!(tally.failed.len(), 1);
        assert!(tally.failed[0].1.contains("boom"));
    }
}
