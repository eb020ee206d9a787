//! Phrase, cover and ranking queries over the inverted index

mod cover;
mod phrase;
mod rank;

use serde::{Deserialize, Serialize};

use crate::index::Position;

pub(crate) use rank::sort_matches;

/// A ranked search result
///
/// `offsets` carries query-dependent evidence: the first cover's endpoints
/// for proximity ranking, and the query terms' positions within the
/// document for BM25. It is best-effort evidence, non-empty whenever the
/// score is non-zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub doc_id: u32,
    pub offsets: Vec<Position>,
    pub score: f64,
}

impl Match {
    pub fn new(doc_id: u32, offsets: Vec<Position>, score: f64) -> Self {
        Self {
            doc_id,
            offsets,
            score,
        }
    }
}
