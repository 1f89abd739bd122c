// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

use crate::error::Result;
use crate::model::{AggregateResult, ParsedTable};

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant). Blank lines are dropped.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // trailing field/row even if quotes were unterminated
    row.push(field);
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }

    rows
}

/// First row is the header. `None` when the text has no rows at all.
///
/// Cells are trimmed. Rows shorter than the header are padded with empty cells;
/// a row longer than the header is malformed.
pub fn parse_table(text: &str) -> Result<Option<ParsedTable>> {
    let mut rows = parse_rows(text, ',').into_iter().map(|r| r.into_iter().map(|c| s!(c.trim())).collect::<Vec<_>>());
    let Some(headers) = rows.next() else { return Ok(None) };

    let mut table = ParsedTable::new(headers);
    for mut row in rows {
        if row.len() < table.width() {
            row.resize(table.width(), s!());
        }
        table.push_row(row)?;
    }
    Ok(Some(table))
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{}", sep)?;
        } else {
            first = false;
        }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header row, then every record, in order.
pub fn write_dataset<W: Write>(mut w: W, data: &AggregateResult) -> io::Result<()> {
    if !data.headers.is_empty() {
        write_row(&mut w, &data.headers, ',')?;
    }
    for record in &data.records {
        write_row(&mut w, record.cells(), ',')?;
    }
    w.flush()
}

/// The whole dataset as CSV text.
pub fn dataset_to_string(data: &AggregateResult) -> io::Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_dataset(&mut buf, data)?;
    String::from_utf8(buf).map_err(io::Error::other)
}
