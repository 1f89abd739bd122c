// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;
use super::sources::ProviderKind;
use crate::model::RequestKey;

/// How the aggregator walks the source list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Schedule {
    /// One source at a time, in list order.
    #[default]
    Sequential,
    /// Scoped worker pool; output still follows list order.
    Parallel { workers: usize },
}

impl Schedule {
    pub fn parallel(workers: usize) -> Self {
        if workers <= 1 { Schedule::Sequential } else { Schedule::Parallel { workers } }
    }
}

/// Everything one run needs, fixed before the first request goes out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub provider: ProviderKind,
    pub key: RequestKey,
    pub schedule: Schedule,
    pub timeout: Duration,
    /// Write the dataset under `out_dir`; otherwise stream it to stdout.
    pub write_local: bool,
    pub out_dir: PathBuf,
    pub user_agent: String,
}

impl RunOptions {
    pub fn new(provider: ProviderKind, key: RequestKey) -> Self {
        Self {
            provider,
            key,
            schedule: Schedule::default(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            write_local: true,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            user_agent: s!(USER_AGENT),
        }
    }

    /// Same options, different request key (backfill loops).
    pub fn with_key(&self, key: RequestKey) -> Self {
        Self { key, ..self.clone() }
    }
}
