// src/scrape/mod.rs
mod collect;

pub use collect::{collect_source, parse_body};
