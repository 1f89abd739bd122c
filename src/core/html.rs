// src/core/html.rs
// Low-level HTML string helpers. Deliberately naive: case-insensitive on ASCII
// tag/attribute names, no nesting awareness. Good enough for the report pages we read.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// HTML *inside* the first `open_pat ... close_pat` pair, case-insensitive.
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lower(s);
    let o = lc.find(&to_lower(open_pat))?;
    let after = s[o..].find('>')? + o + 1;
    let cr = lc[after..].find(&to_lower(close_pat))?;
    Some(&s[after..after + cr])
}

/// Next complete `<tag ...> ... </tag>` block at or after `from`, as byte range.
pub fn next_tag_block_ci(s: &str, open_tag: &str, close_tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    find_block(s, &lc, &to_lower(open_tag), &to_lower(close_tag), from)
}

fn find_block(s: &str, lc: &str, open_lc: &str, close_lc: &str, from: usize) -> Option<(usize, usize)> {
    // `<th` must not match `<thead`, `<b` must not match `<body`
    let bare_name = open_lc.ends_with(|c: char| c.is_ascii_alphanumeric());
    let mut at = from;
    let start = loop {
        let hit = lc.get(at..)?.find(open_lc)? + at;
        let next = lc[hit + open_lc.len()..].chars().next();
        if !bare_name || matches!(next, Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace()) {
            break hit;
        }
        at = hit + open_lc.len();
    };
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(close_lc)?;
    Some((start, open_end + end_rel + close_lc.len()))
}

/// Iterator over consecutive tag blocks; lowercases the haystack once.
pub struct TagBlocks<'a> {
    s: &'a str,
    lc: String,
    open: String,
    close: String,
    pos: usize,
}

impl<'a> Iterator for TagBlocks<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let (start, end) = find_block(self.s, &self.lc, &self.open, &self.close, self.pos)?;
        self.pos = end;
        Some((start, &self.s[start..end]))
    }
}

/// All `open_tag ... close_tag` blocks in `s`, with their start offsets.
pub fn blocks_ci<'a>(s: &'a str, open_tag: &str, close_tag: &str) -> TagBlocks<'a> {
    TagBlocks {
        s,
        lc: to_lower(s),
        open: to_lower(open_tag),
        close: to_lower(close_tag),
        pos: 0,
    }
}

/// The opening tag of a block, `<td class="x">` for `<td class="x">...</td>`.
pub fn opener(block: &str) -> &str {
    match block.find('>') {
        Some(gt) => &block[..=gt],
        None => block,
    }
}

/// Given a complete tag block like `<td ...>INNER</td>`, return INNER.
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// Attribute value from an opening tag; quotes optional in source.
pub fn attr_value(opener: &str, name: &str) -> Option<String> {
    let lc = to_lower(opener);
    let needle = format!("{}=", to_lower(name));
    let mut from = 0usize;
    // skip matches that are a suffix of a longer attribute name (data-href=)
    let hp = loop {
        let rel = lc[from..].find(&needle)?;
        let at = from + rel;
        let boundary = at == 0 || lc[..at].ends_with(|c: char| c.is_ascii_whitespace());
        if boundary { break at; }
        from = at + needle.len();
    };
    let val = opener[hp + needle.len()..].trim_start();
    let (quote, start_off) = match val.as_bytes().first() {
        Some(b'"') => (Some('"'), 1),
        Some(b'\'') => (Some('\''), 1),
        _ => (None, 0),
    };
    let end = match quote {
        Some(q) => val[start_off..].find(q).map(|e| start_off + e),
        None => val.find(|c: char| c.is_ascii_whitespace() || c == '>'),
    }
    .unwrap_or(val.len());
    Some(val[start_off..end].to_string())
}

/// True if the block's opening tag lists every class token in `class`.
pub fn has_class(block: &str, class: &str) -> bool {
    let Some(value) = attr_value(opener(block), "class") else { return false };
    class
        .split_whitespace()
        .all(|want| value.split_whitespace().any(|tok| tok.eq_ignore_ascii_case(want)))
}

/// Remove all tags, then collapse whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    normalize_ws(&remove_tags(s.as_ref()))
}

/// Remove tags and decode entities, keeping whitespace exactly (for `<pre>` text).
pub fn text_content(s: &str) -> String {
    normalize_entities(&remove_tags(s))
}

/// Visible text of a cell block: inner HTML, entities decoded, whitespace collapsed.
pub fn cell_text(block: &str) -> String {
    strip_tags(normalize_entities(&inner_after_open_tag(block)))
}

fn remove_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Text of the first `open ... close` block that follows the `label_open ... label_close`
/// element whose visible text equals `label` (the `<td>` after `<b>Posting Date:</b>`).
pub fn block_text_after_label(
    doc: &str,
    (label_open, label_close): (&str, &str),
    label: &str,
    (open, close): (&str, &str),
) -> Option<String> {
    let label_end = blocks_ci(doc, label_open, label_close)
        .find(|(_, b)| cell_text(b).eq_ignore_ascii_case(label))
        .map(|(at, b)| at + b.len())?;
    let (s, e) = next_tag_block_ci(doc, open, close, label_end)?;
    Some(cell_text(&doc[s..e]))
}
