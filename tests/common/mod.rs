// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use oac_scrape::config::sources::{ENABLE_COLUMNS, ENABLE_OFFSETS};
use oac_scrape::core::net::{Fetch, Method, Request, Response};
use oac_scrape::model::{Cycle, RequestKey};
use oac_scrape::{Result, ScrapeError};

pub fn key(date: &str, cycle: Cycle) -> RequestKey {
    RequestKey::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), cycle)
}

/* ---------------- Mock fetcher ---------------- */

#[derive(Clone)]
pub enum Reply {
    Body(String),
    Status(u16),
    Timeout,
}

/// Canned responses keyed by URL; records every request it sees.
#[derive(Default)]
pub struct MockFetch {
    replies: HashMap<String, Reply>,
    pub seen: Mutex<Vec<Request>>,
}

impl MockFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    pub fn body(self, url: &str, text: impl Into<String>) -> Self {
        self.on(url, Reply::Body(text.into()))
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.seen.lock().unwrap().iter().map(|r| (r.method, r.url.clone())).collect()
    }
}

impl Fetch for MockFetch {
    fn fetch(&self, req: &Request) -> Result<Response> {
        self.seen.lock().unwrap().push(req.clone());
        match self.replies.get(&req.url) {
            Some(Reply::Body(text)) => Ok(Response { status: 200, text: text.clone() }),
            Some(Reply::Status(status)) => Ok(Response { status: *status, text: String::new() }),
            Some(Reply::Timeout) => Err(ScrapeError::Transport { url: req.url.clone(), reason: "timed out".into() }),
            None => Ok(Response { status: 404, text: String::new() }),
        }
    }
}

/* ---------------- Fixed-width fixtures ---------------- */

/// One report line with each cell left-aligned in its column.
pub fn fixed_line(cells: &[&str]) -> String {
    let mut out = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let width = ENABLE_OFFSETS[i + 1] - ENABLE_OFFSETS[i];
        out.push_str(&format!("{:<width$}", cell, width = width));
    }
    out.trim_end().to_string()
}

pub fn data_line(loc: &str, name: &str) -> String {
    fixed_line(&[loc, name, "Z1", "Receipt", "RPQ", "Y", "100000", "95000", "40000", "55000", "Delivery", "N"])
}

/// 15 preamble lines (metadata plus captions), then the body.
pub fn preamble(cycle: Option<&str>) -> Vec<String> {
    let mut lines = vec![
        "ENABLE GAS TRANSMISSION, LLC".to_string(),
        "Operationally Available Capacity".to_string(),
        "Posting Date/Posting Time : 09/11/2022 4:01 PM".to_string(),
        "Effective Gas Day/Effective Time : 09/12/2022 9:00 AM".to_string(),
        "Meas Basis Desc : MMBtu".to_string(),
    ];
    if let Some(c) = cycle {
        lines.push(format!("Cycle : {c}"));
    }
    while lines.len() < 14 {
        lines.push(String::new());
    }
    lines.push(fixed_line(&ENABLE_COLUMNS));
    assert_eq!(lines.len(), 15);
    lines
}

/// A complete report: preamble, `rows` data lines, a totals line, the sentinel.
pub fn enable_report(rows: usize) -> String {
    let mut lines = preamble(Some("INTRADAY 1"));
    for i in 0..rows {
        lines.push(data_line(&format!("{}", 10001 + i), &format!("LOCATION {}", i + 1)));
    }
    if rows > 0 {
        lines.push(fixed_line(&["", "TOTALS", "", "", "", "", "100000", "95000", "40000", "55000"]));
    }
    lines.push("COMMENTS AND NOTES".to_string());
    lines.push("None.".to_string());
    lines.join("\n")
}

pub fn enable_posting_page(report: &str) -> String {
    let escaped = report.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;");
    format!("<html><body><h3>Posting</h3><pre>\n{escaped}</pre></body></html>")
}

pub fn enable_listing(rows: &[(&str, &str)]) -> String {
    let mut html = String::from("<table class=\"table\"><thead><tr><th>View</th><th>Report</th></tr></thead><tbody>");
    for (title, href) in rows {
        html.push_str(&format!(
            "<tr><td class=\"id\"><a href=\"{href}\">View</a></td><td class=\"reportTitle text-center\">{title}</td></tr>"
        ));
    }
    html.push_str("</tbody></table>");
    html
}
