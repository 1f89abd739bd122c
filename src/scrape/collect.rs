// src/scrape/collect.rs
use tracing::debug;

use crate::config::sources::Provider;
use crate::core::net::Fetch;
use crate::csv;
use crate::engine::aggregate::{Skip, SourceOutcome};
use crate::engine::fixed_width;
use crate::engine::normalize::normalize;
use crate::error::{Result, ScrapeError};
use crate::model::{ParsedTable, RawReportBody, ReportMetadata, RequestKey, SourceDescriptor, SourceKind};
use crate::specs::{enable, energy_transfer, one_line, williams, Fetched, Posting};

/// Fetch → parse → normalize for one source. Every error becomes `Failed`.
pub fn collect_source(http: &dyn Fetch, provider: &Provider, src: &SourceDescriptor, key: &RequestKey) -> SourceOutcome {
    run(http, provider, src, key).into()
}

fn run(http: &dyn Fetch, provider: &Provider, src: &SourceDescriptor, key: &RequestKey) -> Result<SourceOutcome> {
    let code = provider.cycle_code(key.cycle);

    let fetched = match (src.kind, code) {
        // postings are picked by title, the code is never sent
        (SourceKind::Listing { .. }, _) => enable::fetch(http, provider, src, key)?,
        (_, None) => return Ok(SourceOutcome::Skipped(Skip::CycleNotPublished(key.cycle))),
        (SourceKind::CsvDownload { .. }, Some(c)) => energy_transfer::fetch(http, provider, src, key, c)?,
        (SourceKind::HtmlTable { .. }, Some(c)) => williams::fetch(http, provider, src, key, c)?,
        (SourceKind::CsvQuery { .. }, Some(c)) => one_line::fetch(http, provider, src, key, c)?,
    };

    let posting = match fetched {
        Fetched::Posting(p) => p,
        Fetched::Skipped(why) => return Ok(SourceOutcome::Skipped(why)),
    };

    let Some((table, meta)) = parse_body(provider, posting)? else {
        return Ok(SourceOutcome::Skipped(Skip::EmptyReport));
    };
    debug!("{}: parsed {} rows x {} columns", src.tag(), table.len(), table.width());

    Ok(SourceOutcome::Records(normalize(provider.schema, &table, src, &meta)?))
}

/// Turn a raw posting into a table; preamble fields of fixed-width reports are merged
/// into the posting's metadata. `None` for a delimited body with no header row.
pub fn parse_body(provider: &Provider, posting: Posting) -> Result<Option<(ParsedTable, ReportMetadata)>> {
    let Posting { body, mut meta } = posting;

    let table = match body {
        RawReportBody::Delimited(text) => match csv::parse_table(&text)? {
            Some(t) => t,
            None => return Ok(None),
        },
        RawReportBody::FixedWidth(text) => {
            let layout = provider
                .layout
                .ok_or_else(|| ScrapeError::InvalidLayout(format!("{} has no fixed-width layout", provider.kind)))?;
            let (t, preamble) = fixed_width::parse(&text, &layout)?;
            meta.fill_from(preamble);
            t
        }
        RawReportBody::Table(t) => t,
    };

    Ok(Some((table, meta)))
}
