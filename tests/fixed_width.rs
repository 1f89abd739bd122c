// tests/fixed_width.rs
mod common;

use common::{data_line, enable_report, preamble};
use oac_scrape::config::sources::{ENABLE_COLUMNS, ENABLE_LAYOUT};
use oac_scrape::engine::fixed_width::{parse, read_metadata, slice_columns, FixedLayout};
use oac_scrape::model::MetaKey;
use oac_scrape::ScrapeError;

#[test]
fn rows_are_body_lines_minus_footer() {
    let (table, _) = parse(&enable_report(3), &ENABLE_LAYOUT).unwrap();
    assert_eq!(table.len(), 3);
    assert!(table.rows().iter().all(|r| r.len() == ENABLE_COLUMNS.len()));

    let first = &table.rows()[0];
    assert_eq!(first[0], "10001");
    assert_eq!(first[1], "LOCATION 1");
    assert_eq!(first[2], "Z1");
    assert_eq!(first[9], "55000");
    assert_eq!(first[11], "N");
    assert!(!table.rows().iter().any(|r| r[1] == "TOTALS"));
}

#[test]
fn metadata_comes_from_preamble() {
    let (_, meta) = parse(&enable_report(1), &ENABLE_LAYOUT).unwrap();
    assert_eq!(meta.get(MetaKey::PostingDateTime), Some("09/11/2022 4:01 PM"));
    assert_eq!(meta.get(MetaKey::EffectiveDateTime), Some("09/12/2022 9:00 AM"));
    assert_eq!(meta.get(MetaKey::MeasBasis), Some("MMBtu"));
    assert_eq!(meta.get(MetaKey::Cycle), Some("INTRADAY 1"));
}

#[test]
fn immediate_sentinel_gives_empty_table() {
    let (table, meta) = parse(&enable_report(0), &ENABLE_LAYOUT).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.width(), 12);
    assert_eq!(meta.len(), 4);
}

#[test]
fn missing_sentinel_is_malformed() {
    let mut lines = preamble(Some("EVENING"));
    lines.push(data_line("10001", "LOCATION 1"));
    lines.push(data_line("10002", "LOCATION 2"));
    let err = parse(&lines.join("\n"), &ENABLE_LAYOUT).unwrap_err();
    assert!(matches!(err, ScrapeError::MalformedReport(_)), "{err:?}");
}

#[test]
fn too_few_lines_is_malformed() {
    let err = parse("Cycle : TIMELY\nCOMMENTS AND NOTES", &ENABLE_LAYOUT).unwrap_err();
    assert!(matches!(err, ScrapeError::MalformedReport(_)));
}

#[test]
fn crlf_line_endings_are_tolerated() {
    let text = enable_report(2).replace('\n', "\r\n");
    let (table, meta) = parse(&text, &ENABLE_LAYOUT).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1][11], "N");
    assert_eq!(meta.get(MetaKey::Cycle), Some("INTRADAY 1"));
}

#[test]
fn short_lines_yield_empty_trailing_cells() {
    let mut lines = preamble(Some("TIMELY"));
    lines.push("10001   SHORT LINE".to_string());
    lines.push("        TOTALS".to_string());
    lines.push("COMMENTS AND NOTES".to_string());
    let (table, _) = parse(&lines.join("\n"), &ENABLE_LAYOUT).unwrap();
    assert_eq!(table.len(), 1);
    let row = &table.rows()[0];
    assert_eq!(row[0], "10001");
    assert_eq!(row[1], "SHORT LINE");
    assert!(row[2..].iter().all(|c| c.is_empty()));
}

#[test]
fn slices_by_char_not_byte() {
    let cells = slice_columns("ab\u{e9}cd", &[0, 2, 4, 6]);
    assert_eq!(cells, vec!["ab", "\u{e9}c", "d"]);
}

#[test]
fn metadata_scan_stops_at_cycle() {
    let lines = [
        "Cycle : FINAL",
        "Meas Basis Desc : Dth",
    ];
    let meta = read_metadata(&lines);
    assert_eq!(meta.get(MetaKey::Cycle), Some("FINAL"));
    assert!(!meta.contains(MetaKey::MeasBasis));
}

#[test]
fn layout_offsets_must_match_columns() {
    let bad = FixedLayout { offsets: &[0, 5, 10], columns: &["A"], sentinel: "END", body_start: 0 };
    assert!(matches!(bad.validate(), Err(ScrapeError::InvalidLayout(_))));

    let unordered = FixedLayout { offsets: &[0, 5, 5], columns: &["A", "B"], sentinel: "END", body_start: 0 };
    assert!(matches!(parse("END", &unordered), Err(ScrapeError::InvalidLayout(_))));

    assert!(ENABLE_LAYOUT.validate().is_ok());
}
