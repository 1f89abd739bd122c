// src/error.rs
use std::io;

use thiserror::Error;

use crate::model::MetaKey;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Everything that can go wrong while turning one source into canonical records,
/// plus the one run-level failure (persisting the dataset).
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },

    /// A response arrived with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Text did not match the positional/structural layout we expect.
    #[error("malformed report: {0}")]
    MalformedReport(String),

    /// A header field needed to build canonical records was not found.
    #[error("missing report metadata: {0}")]
    MissingMetadata(MetaKey),

    /// Static column layout is inconsistent (offsets vs. column names).
    #[error("invalid fixed-width layout: {0}")]
    InvalidLayout(String),

    /// The source produced a different canonical header than earlier sources
    /// (other names, other order, or other width).
    #[error("schema mismatch: expected columns {expected:?}, got {got:?}")]
    SchemaMismatch { expected: Vec<String>, got: Vec<String> },

    /// The per-source pipeline panicked or its worker vanished.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("persist failed: {0}")]
    Persist(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ScrapeError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        ScrapeError::MalformedReport(msg.into())
    }
}
