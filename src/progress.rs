// src/progress.rs
use crate::error::ScrapeError;
use crate::model::SourceDescriptor;
use crate::engine::aggregate::Skip;

/// Per-run observer for the aggregator. Frontends implement this to surface status;
/// one value lives exactly as long as one run.
pub trait Progress {
    /// Called at the start with the number of sources.
    fn begin(&mut self, _total: usize) {}

    /// A source contributed `rows` canonical records.
    fn source_done(&mut self, _src: &SourceDescriptor, _rows: usize) {}

    /// A source had nothing to contribute for this key (not a failure).
    fn source_skipped(&mut self, _src: &SourceDescriptor, _why: &Skip) {}

    /// A source failed; the run carries on.
    fn source_failed(&mut self, _src: &SourceDescriptor, _err: &ScrapeError) {}

    /// Called at the end with the total record count.
    fn finish(&mut self, _records: usize) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Tally of one run, for CLI summaries and tests.
#[derive(Debug, Default)]
pub struct RunTally {
    pub total: usize,
    pub done: Vec<(String, usize)>,
    pub skipped: Vec<(String, String)>,
    pub failed: Vec<(String, String)>,
    pub records: usize,
}

impl Progress for RunTally {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn source_done(&mut self, src: &SourceDescriptor, rows: usize) {
        self.done.push((src.tag(), rows));
    }

    fn source_skipped(&mut self, src: &SourceDescriptor, why: &Skip) {
        self.skipped.push((src.tag(), why.to_string()));
    }

    fn source_failed(&mut self, src: &SourceDescriptor, err: &ScrapeError) {
        self.failed.push((src.tag(), err.to_string()));
    }

    fn finish(&mut self, records: usize) {
        self.records = records;
    }
}
