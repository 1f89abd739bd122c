// src/specs/williams.rs
//! Williams detail pages (Discovery, Black Marlin).
//!
//! `oa_detail.jsp?id=<cycle code>&nomDate=MM-DD-YYYY` returns one page holding:
//! - the capacity table, `<table class="sortable">` with `<th>` captions;
//! - the dates, each in the `<td>` following a bold caption:
//!   `<b>Posting Date:</b></td><td>09/13/2022 08:12</td>`.
//!
//! The measurement basis is not printed per report; the site states MMBTU once for
//! everything. No TSP id is published, so the identity column stays empty.

use chrono::NaiveDate;

use crate::config::sources::{Provider, WILLIAMS_BASIS};
use crate::core::html::{block_text_after_label, blocks_ci, cell_text, has_class};
use crate::core::net::{pairs, Fetch, Request};
use crate::error::{Result, ScrapeError};
use crate::model::{MetaKey, ParsedTable, RawReportBody, ReportMetadata, RequestKey, SourceDescriptor, SourceKind};

use super::Fetched;

/// `nomDate` wants dashes, unlike the other providers' slash format.
pub fn nom_date(date: NaiveDate) -> String {
    date.format("%m-%d-%Y").to_string()
}

pub fn query(key: &RequestKey, code: u8) -> Vec<(String, String)> {
    vec![(s!("id"), code.to_string()), (s!("nomDate"), nom_date(key.date))]
}

/// The `sortable` table as headers plus rows. Short rows are padded with empty
/// cells; a row wider than the header is malformed.
pub fn parse_table(html: &str) -> Result<ParsedTable> {
    let (_, table) = blocks_ci(html, "<table", "</table>")
        .find(|(_, b)| has_class(b, "sortable"))
        .ok_or_else(|| ScrapeError::malformed("no table.sortable on page"))?;

    let headers: Vec<String> = blocks_ci(table, "<th", "</th>").map(|(_, b)| cell_text(b)).collect();
    if headers.is_empty() {
        return Err(ScrapeError::malformed("table.sortable has no <th> captions"));
    }

    let mut parsed = ParsedTable::new(headers);
    for (_, tr) in blocks_ci(table, "<tr", "</tr>") {
        let mut cells: Vec<String> = blocks_ci(tr, "<td", "</td>").map(|(_, b)| cell_text(b)).collect();
        if cells.is_empty() {
            continue; // caption row
        }
        if cells.len() < parsed.width() {
            cells.resize(parsed.width(), s!());
        }
        parsed.push_row(cells)?;
    }
    Ok(parsed)
}

/// Posting/effective dates from their labelled cells, plus the fixed basis.
pub fn parse_metadata(html: &str) -> ReportMetadata {
    let mut meta = ReportMetadata::new();
    let labelled = [("Posting Date:", MetaKey::PostingDateTime), ("Effective Date:", MetaKey::EffectiveDateTime)];
    for (label, key) in labelled {
        if let Some(v) = block_text_after_label(html, ("<b", "</b>"), label, ("<td", "</td>")) {
            meta.insert(key, v);
        }
    }
    meta.insert(MetaKey::MeasBasis, WILLIAMS_BASIS);
    meta
}

pub fn fetch(http: &dyn Fetch, provider: &Provider, src: &SourceDescriptor, key: &RequestKey, code: u8) -> Result<Fetched> {
    let SourceKind::HtmlTable { download_url } = src.kind else {
        return Err(ScrapeError::Internal(format!("{} is not an HTML table source", src.tag())));
    };

    let req = Request::get(download_url)
        .headers(pairs(provider.get_headers))
        .query(query(key, code));
    let page = http.fetch_ok(&req)?;

    let table = parse_table(&page)?;
    Ok(Fetched::posting(RawReportBody::Table(table), parse_metadata(&page)))
}
