// src/specs/enable.rs
//! Enable Gas Transmission and Enable Mississippi River Transmission.
//!
//! Each asset publishes a listing of postings, one table row per report:
//!
//! ```text
//! <tr>
//!   <td class="id"><a href="/ipost/EGT/capacity/enbl-operationally-available/view?id=123">View</a></td>
//!   <td class="reportTitle text-center">OAC 2022-09-11 INTRADAY 1</td>
//! </tr>
//! ```
//!
//! The chosen posting is an HTML page with the fixed-width report inside `<pre>`.
//! All four header fields are in the report preamble, so no metadata comes from here.

use crate::config::sources::Provider;
use crate::core::html::{attr_value, blocks_ci, cell_text, has_class, next_tag_block_ci, opener, slice_between_ci, text_content};
use crate::core::net::{pairs, Fetch, Request};
use crate::core::sanitize::normalize_entities;
use crate::engine::aggregate::Skip;
use crate::engine::select::select;
use crate::error::{Result, ScrapeError};
use crate::model::{RawReportBody, ReportCandidate, ReportMetadata, RequestKey, SourceDescriptor, SourceKind};

use super::Fetched;

/// Every listing row with a `td.reportTitle` label and a link in `td.id`.
/// Rows missing either are ignored (table captions, paging rows).
pub fn parse_listing(html: &str) -> Vec<ReportCandidate> {
    let mut out = Vec::new();
    for (_, tr) in blocks_ci(html, "<tr", "</tr>") {
        let mut title = None;
        let mut link = None;
        for (_, td) in blocks_ci(tr, "<td", "</td>") {
            if title.is_none() && has_class(td, "reportTitle") {
                title = Some(cell_text(td));
            } else if link.is_none() && has_class(td, "id") {
                link = href_in(td);
            }
        }
        if let (Some(label), Some(locator)) = (title, link) {
            out.push(ReportCandidate { label, locator });
        }
    }
    out
}

fn href_in(td: &str) -> Option<String> {
    let (s, e) = next_tag_block_ci(td, "<a", "</a>", 0)?;
    let href = attr_value(opener(&td[s..e]), "href")?;
    Some(normalize_entities(&href))
}

/// Absolute URL of a posting link.
pub fn posting_url(api_url: &str, locator: &str) -> String {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        s!(locator)
    } else {
        format!("{}{}", api_url.trim_end_matches('/'), locator)
    }
}

/// Report text inside `<pre>`, entities decoded, whitespace kept.
pub fn report_text(html: &str) -> Result<String> {
    let inner = slice_between_ci(html, "<pre", "</pre>").ok_or_else(|| ScrapeError::malformed("posting has no <pre> block"))?;
    let text = text_content(inner);
    // a newline right after <pre> is not content
    let text = text.strip_prefix("\r\n").or_else(|| text.strip_prefix('\n')).unwrap_or(&text);
    Ok(s!(text))
}

pub fn fetch(http: &dyn Fetch, provider: &Provider, src: &SourceDescriptor, key: &RequestKey) -> Result<Fetched> {
    let SourceKind::Listing { api_url, listing_url } = src.kind else {
        return Err(ScrapeError::Internal(format!("{} is not a listing source", src.tag())));
    };

    let listing = http.fetch_ok(&Request::get(listing_url).headers(pairs(provider.get_headers)))?;
    let candidates = parse_listing(&listing);

    let Some(chosen) = select(&candidates, key) else {
        return Ok(Fetched::Skipped(Skip::NoCandidate));
    };

    let url = posting_url(api_url, &chosen.locator);
    let page = http.fetch_ok(&Request::get(url).headers(pairs(provider.get_headers)))?;

    Ok(Fetched::posting(RawReportBody::FixedWidth(report_text(&page)?), ReportMetadata::new()))
}
