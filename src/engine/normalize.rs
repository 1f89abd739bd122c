// src/engine/normalize.rs
//! Canonical schema construction.
//!
//! Every record is built from scratch: identity and metadata columns first, then the
//! parsed cells. Column count and order are fixed per schema variant:
//!
//! | variant      | leading columns                                   | trailing            | width  |
//! |--------------|---------------------------------------------------|---------------------|--------|
//! | `Delimited`  | TSP, TSP Name, Post, Effective, Meas Basis        | none                | `m + 5` |
//! | `FixedWidth` | TSP, TSP Name, Post, Effective, Cycle, Meas Basis | `Qty Reason` at 18  | `m + 7` |
//! | `Published`  | none                                              | none                | `m`     |

use crate::config::consts::{REASON_COLUMN_INDEX, REASON_HEADER, REASON_PLACEHOLDER};
use crate::error::Result;
use crate::model::{CanonicalRecord, MetaKey, ParsedTable, ReportMetadata, SourceDescriptor};

pub const DELIMITED_LEAD: [&str; 5] = [
    "TSP",
    "TSP Name",
    "Post Date/Time",
    "Effective Gas Day/Time",
    "Meas Basis Desc",
];

pub const FIXED_WIDTH_LEAD: [&str; 6] = [
    "TSP",
    "TSP Name",
    "Post Date/Time",
    "Effective Gas Day/Time",
    "Cycle",
    "Meas Basis Desc",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
    Delimited,
    FixedWidth,
    /// The provider's columns already carry identity; taken as-is.
    Published,
}

/// Post/effective/basis strings stamped onto delimited-source records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stamp {
    pub posted: String,
    pub effective: String,
    pub basis: String,
}

impl Stamp {
    pub fn from_metadata(meta: &ReportMetadata) -> Result<Self> {
        Ok(Self {
            posted: s!(meta.require(MetaKey::PostingDateTime)?),
            effective: s!(meta.require(MetaKey::EffectiveDateTime)?),
            basis: s!(meta.require(MetaKey::MeasBasis)?),
        })
    }
}

/// Canonical header plus records, as produced for one source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedTable {
    pub headers: Vec<String>,
    pub records: Vec<CanonicalRecord>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

pub fn normalize(schema: Schema, table: &ParsedTable, src: &SourceDescriptor, meta: &ReportMetadata) -> Result<NormalizedTable> {
    match schema {
        Schema::Delimited => Ok(delimited(table, src, &Stamp::from_metadata(meta)?)),
        Schema::FixedWidth => fixed_width(table, src, meta),
        Schema::Published => Ok(published(table)),
    }
}

/// Five leading columns, nothing trailing.
pub fn delimited(table: &ParsedTable, src: &SourceDescriptor, stamp: &Stamp) -> NormalizedTable {
    let lead: [&str; 5] = [src.provider_id, src.name, &stamp.posted, &stamp.effective, &stamp.basis];

    let headers = build(&DELIMITED_LEAD, table.columns(), None);
    let records = table
        .rows()
        .iter()
        .map(|row| CanonicalRecord::new(build(&lead, row, None)))
        .collect();

    NormalizedTable { headers, records }
}

/// Six leading columns and the reserved reason column.
/// Fails with `MissingMetadata` when any of the four preamble fields is absent.
pub fn fixed_width(table: &ParsedTable, src: &SourceDescriptor, meta: &ReportMetadata) -> Result<NormalizedTable> {
    let posted = meta.require(MetaKey::PostingDateTime)?;
    let effective = meta.require(MetaKey::EffectiveDateTime)?;
    let cycle = meta.require(MetaKey::Cycle)?;
    let basis = meta.require(MetaKey::MeasBasis)?;
    let lead = [src.provider_id, src.name, posted, effective, cycle, basis];

    let headers = build(&FIXED_WIDTH_LEAD, table.columns(), Some(REASON_HEADER));
    let records = table
        .rows()
        .iter()
        .map(|row| CanonicalRecord::new(build(&lead, row, Some(REASON_PLACEHOLDER))))
        .collect();

    Ok(NormalizedTable { headers, records })
}

/// Columns exactly as the provider publishes them.
pub fn published(table: &ParsedTable) -> NormalizedTable {
    NormalizedTable {
        headers: table.columns().to_vec(),
        records: table.rows().iter().cloned().map(CanonicalRecord::new).collect(),
    }
}

fn build(lead: &[&str], cells: &[String], reason: Option<&str>) -> Vec<String> {
    let mut out = Vec::with_capacity(lead.len() + cells.len() + 1);
    out.extend(lead.iter().map(|s| s!(*s)));
    out.extend(cells.iter().cloned());
    if let Some(r) = reason {
        out.insert(REASON_COLUMN_INDEX.min(out.len()), s!(r));
    }
    out
}
