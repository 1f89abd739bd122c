// src/specs/energy_transfer.rs
//! Energy Transfer interstate assets (FEP, TW, TGR).
//!
//! The capacity CSV and its header fields live in different places:
//! - the CSV comes from a shared download endpoint, keyed by `asset`, `gasDay`, `cycle`;
//! - post time, effective gas day and measurement basis are only on the asset's HTML
//!   page, which must be POSTed the same search form. They sit in the first three
//!   `<p class="pad">` blocks, as bare text after a `<strong>` caption:
//!
//! ```text
//! <p class="pad"><strong>Post Date/Time:</strong> 08/30/2022 4:00 PM</p>
//! <p class="pad"><strong>Effective Gas Day/Time:</strong> 08/30/2022 9:00 AM</p>
//! <p class="pad"><strong>Meas Basis Desc:</strong> MMBtu</p>
//! ```

use tracing::debug;

use crate::config::sources::Provider;
use crate::core::html::{blocks_ci, has_class, strip_tags, to_lower};
use crate::core::net::{effective_headers, origin, Fetch, Request};
use crate::core::sanitize::normalize_entities;
use crate::error::{Result, ScrapeError};
use crate::model::{MetaKey, RawReportBody, ReportMetadata, RequestKey, SourceDescriptor, SourceKind};

use super::Fetched;

/// Order of the `p.pad` blocks on the asset page.
const PAD_FIELDS: [MetaKey; 3] = [MetaKey::PostingDateTime, MetaKey::EffectiveDateTime, MetaKey::MeasBasis];

/// Search filters shared by the CSV query and the page form.
fn search_filters() -> Vec<(String, String)> {
    vec![
        (s!("searchType"), s!("NOM")),
        (s!("searchString"), s!()),
        (s!("locType"), s!("ALL")),
        (s!("locZone"), s!("ALL")),
    ]
}

/// Query string for the CSV download.
pub fn download_query(asset: &str, key: &RequestKey, code: u8) -> Vec<(String, String)> {
    let mut q = vec![(s!("f"), s!("csv")), (s!("extension"), s!("csv"))];
    q.extend(search_filters());
    q.push((s!("asset"), s!(asset)));
    q.push((s!("gasDay"), key.outbound_date()));
    q.push((s!("cycle"), code.to_string()));
    q
}

/// Form body POSTed to the asset page.
pub fn page_form(key: &RequestKey, code: u8) -> Vec<(String, String)> {
    let mut form = search_filters();
    form.push((s!("gasDay"), key.outbound_date()));
    form.push((s!("cycle"), code.to_string()));
    form
}

/// Header fields from the first three `p.pad` blocks. Missing blocks just leave
/// their keys out; the normalizer reports which one it needed.
pub fn parse_metadata(html: &str) -> ReportMetadata {
    let mut meta = ReportMetadata::new();
    let pads = blocks_ci(html, "<p", "</p>").filter(|(_, b)| has_class(b, "pad"));

    for (key, (_, block)) in PAD_FIELDS.into_iter().zip(pads) {
        match text_after_strong(block) {
            Some(v) => meta.insert(key, v),
            None => debug!("p.pad block for {key} has no <strong> caption"),
        }
    }
    meta
}

/// Bare text following `</strong>` up to the end of the block.
fn text_after_strong(block: &str) -> Option<String> {
    let lc = to_lower(block);
    let after = lc.find("</strong>")? + "</strong>".len();
    let end = lc.rfind("</p>").filter(|&e| e >= after).unwrap_or(block.len());
    Some(strip_tags(normalize_entities(&block[after..end])))
}

pub fn fetch(
    http: &dyn Fetch,
    provider: &Provider,
    src: &SourceDescriptor,
    key: &RequestKey,
    code: u8,
) -> Result<Fetched> {
    let SourceKind::CsvDownload { download_url, post_url } = src.kind else {
        return Err(ScrapeError::Internal(format!("{} is not a CSV download source", src.tag())));
    };

    let csv_req = Request::get(download_url)
        .headers(effective_headers(provider.get_headers, &[("Referer", format!("{post_url}?max=ALL"))]))
        .query(download_query(src.asset_id, key, code));
    let csv = http.fetch_ok(&csv_req)?;

    let page_req = Request::post(post_url, page_form(key, code)).headers(effective_headers(
        provider.post_headers,
        &[("Origin", origin(post_url)), ("Referer", format!("{post_url}?max=10"))],
    ));
    let page = http.fetch_ok(&page_req)?;

    Ok(Fetched::posting(RawReportBody::Delimited(csv), parse_metadata(&page)))
}

