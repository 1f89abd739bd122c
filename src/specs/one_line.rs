// src/specs/one_line.rs
//! 1Line sites (Pine Needle, Transco, Gulfstream).
//!
//! The CSV export only reflects the query last submitted in the same session, so
//! three requests go out in order over one cookie jar:
//! 1. POST the OAC query form (date range and cycle) to `OACQueryRequest.jsp`;
//! 2. GET `OACreport.jsp`, which renders the query result;
//! 3. GET `OACreportCSV.jsp`, the same result as CSV.
//!
//! The CSV already carries TSP and posting columns, so it is taken as published.

use crate::config::sources::Provider;
use crate::core::net::{effective_headers, origin, Fetch, Request};
use crate::error::{Result, ScrapeError};
use crate::model::{RawReportBody, ReportMetadata, RequestKey, SourceDescriptor, SourceKind};

use super::Fetched;

/// Earliest date the query form accepts; sent verbatim with every query.
const SSD_START_DATE: &str = "06/15/2011";

pub fn query_form(key: &RequestKey, code: u8) -> Vec<(String, String)> {
    let day = key.outbound_date();
    vec![
        (s!("MapID"), s!("0")),
        (s!("submitflag"), s!("true")),
        (s!("recordCount"), s!("550")),
        (s!("recordLimit"), s!("52000")),
        (s!("SSDStartDate"), s!(SSD_START_DATE)),
        (s!("tbGasFlowBeginDate"), day.clone()),
        (s!("tbGasFlowEndDate"), day),
        (s!("cycle"), code.to_string()),
        (s!("locationIDs"), s!()),
        (s!("reportType"), s!()),
    ]
}

/// `Referer` the site expects on every step: the query page for this business unit.
pub fn referer(site: &str, bu_id: u32) -> String {
    format!("https://www.{site}.com/ebbCode/OACQueryRequest.jsp?BUID={bu_id}")
}

pub fn fetch(http: &dyn Fetch, provider: &Provider, src: &SourceDescriptor, key: &RequestKey, code: u8) -> Result<Fetched> {
    let SourceKind::CsvQuery { query_url, report_url, download_url, bu_id } = src.kind else {
        return Err(ScrapeError::Internal(format!("{} is not a query source", src.tag())));
    };
    let referer = referer(src.site, bu_id);

    let post_headers = effective_headers(
        provider.post_headers,
        &[("Origin", origin(query_url)), ("Referer", referer.clone()), ("Sec-Fetch-Dest", s!("iframe"))],
    );
    http.fetch_ok(&Request::post(query_url, query_form(key, code)).headers(post_headers))?;

    let get_headers = effective_headers(provider.get_headers, &[("Referer", referer)]);
    http.fetch_ok(&Request::get(report_url).headers(get_headers.clone()))?;
    let csv = http.fetch_ok(&Request::get(download_url).headers(get_headers))?;

    Ok(Fetched::posting(RawReportBody::Delimited(csv), ReportMetadata::new()))
}
