// src/core/net.rs
//
// The fetch boundary. The engine only sees `Fetch`; `HttpFetcher` is the
// production implementation (blocking reqwest, one cookie session per run).

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, trace};

use crate::error::{Result, ScrapeError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound request, built fresh for every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// `application/x-www-form-urlencoded` body
    pub form: Option<Vec<(String, String)>>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into(), method: Method::Get, headers: Vec::new(), query: Vec::new(), form: None }
    }

    pub fn post(url: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self { url: url.into(), method: Method::Post, headers: Vec::new(), query: Vec::new(), form: Some(form) }
    }

    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub text: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Fetch: Send + Sync {
    fn fetch(&self, req: &Request) -> Result<Response>;

    /// Fetch and require a 2xx status; returns the body text.
    fn fetch_ok(&self, req: &Request) -> Result<String> {
        let resp = self.fetch(req)?;
        if !resp.is_success() {
            return Err(ScrapeError::Status { url: req.url.clone(), status: resp.status });
        }
        Ok(resp.text)
    }
}

/// Base header table plus per-request overrides, as a new list.
/// Overrides replace same-named base headers (case-insensitive) or are appended.
pub fn effective_headers(base: &[(&str, &str)], overrides: &[(&str, String)]) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = base
        .iter()
        .filter(|(k, _)| !overrides.iter().any(|(o, _)| o.eq_ignore_ascii_case(k)))
        .map(|(k, v)| (s!(*k), s!(*v)))
        .collect();
    out.extend(overrides.iter().map(|(k, v)| (s!(*k), v.clone())));
    out
}

/// Owned key/value pairs from a static table.
pub fn pairs(table: &[(&str, &str)]) -> Vec<(String, String)> {
    table.iter().map(|(k, v)| (s!(*k), s!(*v))).collect()
}

/// `scheme://host` of an absolute URL, for `Origin` headers.
pub fn origin(url: &str) -> String {
    let host_start = url.find("://").map(|i| i + 3).unwrap_or(0);
    let host_end = url[host_start..].find('/').map(|i| host_start + i).unwrap_or(url.len());
    s!(&url[..host_end])
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ScrapeError::Transport { url: s!(), reason: e.to_string() })?;
        Ok(Self { client })
    }
}

fn transport(url: &str, e: &reqwest::Error) -> ScrapeError {
    let reason = if e.is_timeout() { s!("timed out") } else { e.to_string() };
    ScrapeError::Transport { url: url.to_string(), reason }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, req: &Request) -> Result<Response> {
        let mut rb = match req.method {
            Method::Get => self.client.get(&req.url),
            Method::Post => self.client.post(&req.url),
        };
        for (k, v) in &req.headers {
            rb = rb.header(k.as_str(), v.as_str());
        }
        if !req.query.is_empty() {
            rb = rb.query(&req.query);
        }
        if let Some(form) = &req.form {
            rb = rb.form(form);
        }

        debug!("{:?} {}", req.method, req.url);
        let resp = rb.send().map_err(|e| transport(&req.url, &e))?;
        let status = resp.status().as_u16();
        let text = resp.text().map_err(|e| transport(&req.url, &e))?;
        trace!("{} -> {} ({} bytes)", req.url, status, text.len());

        Ok(Response { status, text })
    }
}
