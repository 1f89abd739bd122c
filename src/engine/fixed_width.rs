// src/engine/fixed_width.rs
//! Fixed-column report parser.
//!
//! Reports of this shape look like:
//!
//! ```text
//! Posting Date/Posting Time : 09/11/2022 4:01 PM     <- metadata preamble
//! Effective Gas Day/Effective Time : 09/12/2022 9:00 AM
//! Meas Basis Desc : MMBtu
//! Cycle : INTRADAY 1                                  <- last preamble field
//! ...column captions...
//! 10001   LOCATION ONE              Z1   ...          <- body (from `body_start`)
//! 10002   LOCATION TWO              Z2   ...
//!         TOTALS                         ...          <- footer row, dropped
//! COMMENTS AND NOTES                                  <- sentinel, body ends
//! ```
//!
//! Columns are character ranges `[offsets[i], offsets[i + 1])`; short lines give
//! empty or partial cells rather than errors.

use crate::error::{Result, ScrapeError};
use crate::model::{MetaKey, ParsedTable, ReportMetadata};

/// Static description of one fixed-width report layout.
#[derive(Clone, Copy, Debug)]
pub struct FixedLayout<'a> {
    /// `n + 1` ascending character offsets for `n` columns.
    pub offsets: &'a [usize],
    pub columns: &'a [&'a str],
    /// Substring that opens the trailing comments section.
    pub sentinel: &'a str,
    /// Physical line where the tabular body starts.
    pub body_start: usize,
}

impl FixedLayout<'_> {
    pub fn validate(&self) -> Result<()> {
        if self.offsets.len() != self.columns.len() + 1 {
            return Err(ScrapeError::InvalidLayout(format!(
                "{} offsets for {} columns",
                self.offsets.len(),
                self.columns.len()
            )));
        }
        if self.offsets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ScrapeError::InvalidLayout(s!("offsets must be strictly ascending")));
        }
        Ok(())
    }
}

/// Parse a raw report into its table and the recognized preamble fields.
pub fn parse(text: &str, layout: &FixedLayout) -> Result<(ParsedTable, ReportMetadata)> {
    layout.validate()?;

    let lines: Vec<&str> = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
    if lines.len() < layout.body_start {
        return Err(ScrapeError::malformed(format!(
            "{} lines, body starts at line {}",
            lines.len(),
            layout.body_start
        )));
    }

    let meta = read_metadata(&lines[..layout.body_start]);

    let body = &lines[layout.body_start..];
    let end = body
        .iter()
        .position(|l| l.contains(layout.sentinel))
        .ok_or_else(|| ScrapeError::malformed(format!("sentinel {:?} not found", layout.sentinel)))?;

    // the line right above the sentinel is the totals/footer row
    let keep = end.saturating_sub(1);

    let columns = layout.columns.iter().map(|c| s!(*c)).collect();
    let mut table = ParsedTable::new(columns);
    for line in &body[..keep] {
        table.push_row(slice_columns(line, layout.offsets))?;
    }

    Ok((table, meta))
}

/// `key : value` preamble lines; scanning stops once `Cycle` is seen.
pub fn read_metadata(lines: &[&str]) -> ReportMetadata {
    let mut meta = ReportMetadata::new();
    for line in lines {
        let Some(key) = MetaKey::ALL.into_iter().find(|k| line.contains(k.label())) else { continue };
        let Some((_, value)) = line.split_once(':') else { continue };
        meta.insert(key, value.trim());
        if key == MetaKey::Cycle {
            break;
        }
    }
    meta
}

/// Cut one line into trimmed cells by character offsets.
pub fn slice_columns(line: &str, offsets: &[usize]) -> Vec<String> {
    // byte index of every char boundary, plus the end
    let bounds: Vec<usize> = line.char_indices().map(|(i, _)| i).chain(std::iter::once(line.len())).collect();
    let at = |char_ix: usize| bounds.get(char_ix).copied().unwrap_or(line.len());

    offsets
        .windows(2)
        .map(|w| line[at(w[0])..at(w[1])].trim().to_string())
        .collect()
}
