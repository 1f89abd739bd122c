// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::core::sanitize::sanitize_file_stem;
use crate::csv::write_dataset;
use crate::error::{Result, ScrapeError};
use crate::model::{AggregateResult, Cycle};

/// `<out>/<provider>/<provider>_<YYYY-MM-DD>_<cycle>.csv`
pub fn dataset_path(out_dir: &Path, provider: &str, date: NaiveDate, cycle: Cycle) -> PathBuf {
    let stem = sanitize_file_stem(provider, "provider");
    out_dir
        .join(&stem)
        .join(format!("{stem}_{}_{}.csv", date.format("%Y-%m-%d"), cycle.slug()))
}

/// Create/truncate `path` (and its parents) and write the whole dataset.
pub fn write_dataset_file(path: &Path, data: &AggregateResult) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let file = File::create(path)?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    write_dataset(&mut out, data)?;
    out.flush()?;
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScrapeError::Persist(format!("Path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
