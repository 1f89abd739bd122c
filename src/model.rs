// src/model.rs
//
// Shared data model: what a source is, what a run asks for, and the table shapes
// that flow between parser, normalizer and aggregator.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{Result, ScrapeError};

/* ---------------- Request key ---------------- */

/// Intraday publication slot of a gas day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cycle {
    Timely,
    Evening,
    Intraday1,
    Intraday2,
    Intraday3,
    Final,
}

impl Cycle {
    pub const ALL: [Cycle; 6] = [
        Cycle::Timely,
        Cycle::Evening,
        Cycle::Intraday1,
        Cycle::Intraday2,
        Cycle::Intraday3,
        Cycle::Final,
    ];

    /// Label as printed in posting titles; matched by substring.
    pub fn label(self) -> &'static str {
        match self {
            Cycle::Timely => "TIMELY",
            Cycle::Evening => "EVENING",
            Cycle::Intraday1 => "INTRADAY 1",
            Cycle::Intraday2 => "INTRADAY 2",
            Cycle::Intraday3 => "INTRADAY 3",
            Cycle::Final => "FINAL",
        }
    }

    /// Short form used in file names and on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Cycle::Timely => "timely",
            Cycle::Evening => "evening",
            Cycle::Intraday1 => "id1",
            Cycle::Intraday2 => "id2",
            Cycle::Intraday3 => "id3",
            Cycle::Final => "final",
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cycle {
    type Err = String;

    /// Accepts `timely`, `Evening`, `id2`, `intraday 2`, `INTRADAY-2`, `final`, ...
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "timely" => Ok(Cycle::Timely),
            "evening" => Ok(Cycle::Evening),
            "id1" | "intraday1" => Ok(Cycle::Intraday1),
            "id2" | "intraday2" => Ok(Cycle::Intraday2),
            "id3" | "intraday3" => Ok(Cycle::Intraday3),
            "final" => Ok(Cycle::Final),
            _ => Err(format!("Unknown cycle: {s}")),
        }
    }
}

/// What one run asks every source for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestKey {
    pub date: NaiveDate,
    pub cycle: Cycle,
}

impl RequestKey {
    pub fn new(date: NaiveDate, cycle: Cycle) -> Self {
        Self { date, cycle }
    }

    /// Date as upstream query forms expect it: `MM/DD/YYYY`.
    pub fn outbound_date(&self) -> String {
        self.date.format("%m/%d/%Y").to_string()
    }

    /// Date as it appears inside posting titles: `YYYY-MM-DD`.
    pub fn listing_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.listing_date(), self.cycle)
    }
}

/// Provider-specific numeric codes for each cycle it publishes.
#[derive(Clone, Copy, Debug)]
pub struct CycleCodes(pub &'static [(Cycle, u8)]);

impl CycleCodes {
    /// `None` means the provider never publishes this cycle.
    pub fn code(&self, cycle: Cycle) -> Option<u8> {
        self.0.iter().find(|(c, _)| *c == cycle).map(|(_, code)| *code)
    }
}

/* ---------------- Sources ---------------- */

/// Where and how one provider-asset pair publishes its report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// CSV download, metadata scraped from a separate HTML page.
    CsvDownload {
        download_url: &'static str,
        post_url: &'static str,
    },
    /// Listing of postings; the chosen posting is a fixed-width `<pre>` report.
    Listing {
        api_url: &'static str,
        listing_url: &'static str,
    },
    /// Single HTML page with a sortable table and labelled dates.
    HtmlTable { download_url: &'static str },
    /// Query form (POST), report page, then CSV download within one session.
    CsvQuery {
        query_url: &'static str,
        report_url: &'static str,
        download_url: &'static str,
        bu_id: u32,
    },
}

/// Immutable identity of one provider-asset pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// TSP id; empty when the provider does not publish one.
    pub provider_id: &'static str,
    pub asset_id: &'static str,
    pub name: &'static str,
    /// Host key, e.g. `pipelines.energytransfer`
    pub site: &'static str,
    pub kind: SourceKind,
}

impl SourceDescriptor {
    /// Short tag for logs.
    pub fn tag(&self) -> String {
        format!("{}/{}", self.site, self.asset_id)
    }
}

/* ---------------- Report shapes ---------------- */

/// One entry of a provider's posting listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportCandidate {
    pub label: String,
    pub locator: String,
}

/// Unparsed payload of the selected posting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawReportBody {
    Delimited(String),
    FixedWidth(String),
    /// Already columnar (extracted from an HTML `<table>`).
    Table(ParsedTable),
}

/// Header fields we know how to lift out of report preambles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaKey {
    PostingDateTime,
    EffectiveDateTime,
    MeasBasis,
    Cycle,
}

impl MetaKey {
    /// Scan order; `Cycle` is the last field of a preamble.
    pub const ALL: [MetaKey; 4] = [
        MetaKey::PostingDateTime,
        MetaKey::EffectiveDateTime,
        MetaKey::MeasBasis,
        MetaKey::Cycle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetaKey::PostingDateTime => "Posting Date/Posting Time",
            MetaKey::EffectiveDateTime => "Effective Gas Day/Effective Time",
            MetaKey::MeasBasis => "Meas Basis Desc",
            MetaKey::Cycle => "Cycle",
        }
    }
}

impl fmt::Display for MetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportMetadata(BTreeMap<MetaKey, String>);

impl ReportMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: MetaKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    pub fn get(&self, key: MetaKey) -> Option<&str> {
        self.0.get(&key).map(|s| s.as_str())
    }

    pub fn require(&self, key: MetaKey) -> Result<&str> {
        self.get(key).ok_or(ScrapeError::MissingMetadata(key))
    }

    pub fn contains(&self, key: MetaKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fill keys this map lacks from `other`; existing values win.
    pub fn fill_from(&mut self, other: ReportMetadata) {
        for (k, v) in other.0 {
            self.0.entry(k).or_insert(v);
        }
    }
}

/// Rectangular table of trimmed cells. Every row has `columns().len()` cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ParsedTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ScrapeError::malformed(format!(
                "row {} has {} cells, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] { &self.columns }
    pub fn rows(&self) -> &[Vec<String>] { &self.rows }
    pub fn width(&self) -> usize { self.columns.len() }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/// One row of the canonical schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalRecord(Vec<String>);

impl CanonicalRecord {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[String] { &self.0 }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn get(&self, ix: usize) -> Option<&str> { self.0.get(ix).map(|s| s.as_str()) }
}

/// Ordered records of one run, in source-list order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateResult {
    pub key: RequestKey,
    /// Canonical header of the first contributing source; empty if none contributed.
    pub headers: Vec<String>,
    pub records: Vec<CanonicalRecord>,
}

impl AggregateResult {
    pub fn new(key: RequestKey) -> Self {
        Self { key, headers: Vec::new(), records: Vec::new() }
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}
