// src/engine/aggregate.rs
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    mpsc,
};
use std::thread;
use std::time::Duration;

use tracing::{error, info, info_span, warn};

use super::normalize::NormalizedTable;
use crate::config::consts::{JITTER_MS, REQUEST_PAUSE_MS};
use crate::config::options::Schedule;
use crate::error::{Result, ScrapeError};
use crate::model::{AggregateResult, Cycle, RequestKey, SourceDescriptor};
use crate::progress::Progress;

/// Why a source legitimately had nothing for this key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Skip {
    /// No posting in the listing matched date and cycle.
    NoCandidate,
    /// The provider never publishes this cycle.
    CycleNotPublished(Cycle),
    /// The download came back without even a header row (cycle not out yet).
    EmptyReport,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::NoCandidate => f.write_str("no matching posting"),
            Skip::EmptyReport => f.write_str("empty report"),
            Skip::CycleNotPublished(c) => write!(f, "cycle {c} not published"),
        }
    }
}

/// Result of one source's fetch → parse → normalize pipeline.
#[derive(Debug)]
pub enum SourceOutcome {
    Records(NormalizedTable),
    Skipped(Skip),
    Failed(ScrapeError),
}

impl From<Result<SourceOutcome>> for SourceOutcome {
    fn from(r: Result<SourceOutcome>) -> Self {
        r.unwrap_or_else(SourceOutcome::Failed)
    }
}

/// Visit every source once, in order, and concatenate what they produce.
///
/// A failing source is logged and reported to `progress`; it never aborts the run.
/// Output order is the order of `sources`, whatever the schedule.
pub fn aggregate<F>(
    sources: &[SourceDescriptor],
    key: &RequestKey,
    schedule: Schedule,
    progress: &mut dyn Progress,
    pipeline: F,
) -> AggregateResult
where
    F: Fn(&SourceDescriptor, &RequestKey) -> SourceOutcome + Sync,
{
    let _run = info_span!("run", key = %key).entered();
    progress.begin(sources.len());

    let mut result = AggregateResult::new(*key);

    match schedule {
        Schedule::Sequential => {
            for (i, src) in sources.iter().enumerate() {
                if i > 0 {
                    pause(i);
                }
                let outcome = run_one(src, key, &pipeline);
                absorb(&mut result, src, outcome, progress);
            }
        }
        Schedule::Parallel { workers } => {
            let outcomes = run_parallel(sources, key, workers, &pipeline);
            for (src, outcome) in sources.iter().zip(outcomes) {
                absorb(&mut result, src, outcome, progress);
            }
        }
    }

    info!("{} records from {} sources", result.len(), sources.len());
    progress.finish(result.len());
    result
}

fn run_one<F>(src: &SourceDescriptor, key: &RequestKey, pipeline: &F) -> SourceOutcome
where
    F: Fn(&SourceDescriptor, &RequestKey) -> SourceOutcome,
{
    let _span = info_span!("source", src = %src.tag()).entered();
    info!("Scraping {} for {key}", src.name);

    match panic::catch_unwind(AssertUnwindSafe(|| pipeline(src, key))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| s!("panic"));
            SourceOutcome::Failed(ScrapeError::Internal(msg))
        }
    }
}

/// Worker pool over an atomic cursor; results land in per-index slots so the
/// caller sees them in list order.
fn run_parallel<F>(sources: &[SourceDescriptor], key: &RequestKey, workers: usize, pipeline: &F) -> Vec<SourceOutcome>
where
    F: Fn(&SourceDescriptor, &RequestKey) -> SourceOutcome + Sync,
{
    let cursor = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, SourceOutcome)>();
    let mut slots: Vec<Option<SourceOutcome>> = sources.iter().map(|_| None).collect();
    let workers = workers.min(sources.len()).max(1);

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let cursor = &cursor;
            scope.spawn(move || {
                let mut first = true;
                loop {
                    let i = cursor.fetch_add(1, Ordering::Relaxed);
                    if i >= sources.len() {
                        break;
                    }
                    if !first {
                        pause(i);
                    }
                    first = false;
                    let outcome = run_one(&sources[i], key, pipeline);
                    if tx.send((i, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx); // collector is the sole receiver now

        for (i, outcome) in rx {
            slots[i] = Some(outcome);
        }
    });

    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| SourceOutcome::Failed(ScrapeError::Internal(s!("worker exited before reporting")))))
        .collect()
}

/// Gap before a worker's next source; never after its last one.
fn pause(i: usize) {
    let jitter = (i as u64 * 17) % JITTER_MS;
    thread::sleep(Duration::from_millis(REQUEST_PAUSE_MS + jitter)); // be polite
}

fn absorb(result: &mut AggregateResult, src: &SourceDescriptor, outcome: SourceOutcome, progress: &mut dyn Progress) {
    let tag = src.tag();
    match outcome {
        SourceOutcome::Records(table) => {
            if result.headers.is_empty() {
                result.headers = table.headers;
            } else if table.headers != result.headers {
                // same width is not enough: reordered columns would shift cells
                let err = ScrapeError::SchemaMismatch { expected: result.headers.clone(), got: table.headers };
                error!("{tag}: {err}");
                progress.source_failed(src, &err);
                return;
            }
            let n = table.records.len();
            result.records.extend(table.records);
            info!("{tag}: {n} records");
            progress.source_done(src, n);
        }
        SourceOutcome::Skipped(why) => {
            warn!("{tag}: skipped, {why}");
            progress.source_skipped(src, &why);
        }
        SourceOutcome::Failed(err) => {
            error!("{tag}: {err}");
            progress.source_failed(src, &err);
        }
    }
}
