// src/store.rs
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::config::sources::ProviderKind;
use crate::csv::write_dataset;
use crate::error::{Result, ScrapeError};
use crate::file::{dataset_path, write_dataset_file};
use crate::model::AggregateResult;

/// Where a finished run goes. Called exactly once per run, even for an empty dataset.
pub trait Persist {
    fn persist(&mut self, data: &AggregateResult, requested_date: NaiveDate, write_local: bool) -> Result<()>;
}

/// CSV files under `<out_dir>/<provider>/`, or stdout.
pub struct CsvStore {
    provider: ProviderKind,
    out_dir: PathBuf,
    /// Files written by this store, in order.
    pub written: Vec<PathBuf>,
}

impl CsvStore {
    pub fn new(provider: ProviderKind, out_dir: impl Into<PathBuf>) -> Self {
        Self { provider, out_dir: out_dir.into(), written: Vec::new() }
    }

    pub fn path_for(&self, data: &AggregateResult, requested_date: NaiveDate) -> PathBuf {
        dataset_path(&self.out_dir, self.provider.key(), requested_date, data.key.cycle)
    }
}

impl Persist for CsvStore {
    fn persist(&mut self, data: &AggregateResult, requested_date: NaiveDate, write_local: bool) -> Result<()> {
        if !write_local {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_dataset(&mut lock, data).map_err(|e| ScrapeError::Persist(format!("stdout: {e}")))?;
            return lock.flush().map_err(|e| ScrapeError::Persist(format!("stdout: {e}")));
        }

        let path = self.path_for(data, requested_date);
        write_dataset_file(&path, data).map_err(|e| match e {
            ScrapeError::Persist(_) => e,
            other => ScrapeError::Persist(format!("{}: {other}", path.display())),
        })?;
        info!("Saved {} records to {}", data.len(), path.display());
        self.written.push(path);
        Ok(())
    }
}
