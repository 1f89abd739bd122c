// src/engine/select.rs
use tracing::{debug, warn};

use crate::model::{ReportCandidate, RequestKey};

/// Substrings a posting title must contain to match `key`.
pub fn match_terms(key: &RequestKey) -> [String; 2] {
    [key.listing_date(), s!(key.cycle.label())]
}

/// First candidate whose label contains both the `YYYY-MM-DD` date and the cycle label.
///
/// `None` means "nothing posted for this key", which callers treat as an empty
/// result rather than an error. Several matches are tolerated: the first in listing
/// order wins and the ambiguity is logged.
pub fn select<'a>(candidates: &'a [ReportCandidate], key: &RequestKey) -> Option<&'a ReportCandidate> {
    let terms = match_terms(key);
    let mut matches = candidates
        .iter()
        .filter(|c| terms.iter().all(|t| c.label.contains(t.as_str())));

    let first = matches.next();
    let extra = matches.count();

    match first {
        Some(c) if extra > 0 => {
            warn!("{} postings match {key}; using the first: {:?}", extra + 1, c.label);
        }
        Some(c) => debug!("selected posting {:?}", c.label),
        None => debug!("no posting among {} matches {key}", candidates.len()),
    }
    first
}
