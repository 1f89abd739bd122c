// src/specs/mod.rs
//! # Provider "specs"
//!
//! One module per provider family. Each spec knows *where a provider keeps its
//! report* and *how to get it out*: which requests to send, in what order, and how
//! to lift the table body and the header fields (post time, effective gas day,
//! measurement basis) from what comes back.
//!
//! ## What lives here
//! - Request construction (query strings, form bodies, header overrides).
//! - Pure extraction from captured HTML/text, callable offline from tests.
//!
//! ## What does **not** live here
//! - Table parsing of the payload (`csv`, `engine::fixed_width`).
//! - Column injection (`engine::normalize`).
//! - Error isolation, ordering and persistence (`engine::aggregate`, `runner`).
//!
//! ## Call chain
//! ```text
//! runner → engine::aggregate → scrape::collect_source → specs::<provider>::fetch
//!                                               ↘ parse body, normalize
//! ```
//!
//! Every `fetch` returns a [`Fetched`]: either the raw posting with whatever metadata
//! sat outside the body, or a [`Skip`] when the provider has nothing for this key.

use crate::engine::aggregate::Skip;
use crate::model::{RawReportBody, ReportMetadata};

pub mod enable;
pub mod energy_transfer;
pub mod one_line;
pub mod williams;

/// The selected report, still unparsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Posting {
    pub body: RawReportBody,
    /// Fields found outside the body (a separate page, labelled cells).
    pub meta: ReportMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fetched {
    Posting(Posting),
    Skipped(Skip),
}

impl Fetched {
    pub fn posting(body: RawReportBody, meta: ReportMetadata) -> Self {
        Fetched::Posting(Posting { body, meta })
    }
}
