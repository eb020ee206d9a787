//! Per-document and corpus statistics backing BM25 scoring

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// BM25 tuning parameters
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term frequency saturation
    pub k1: f64,
    /// Document length normalization
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Statistics for a single indexed document
///
/// `length` counts the analyzed tokens that were emitted for the document,
/// and `term_freqs` maps each of those tokens to its occurrence count. The
/// keys of `term_freqs` are exactly the terms whose posting lists carry a
/// position for this document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DocumentStats {
    pub length: u32,
    pub term_freqs: HashMap<String, u32>,
}

impl DocumentStats {
    pub fn new(length: u32, term_freqs: HashMap<String, u32>) -> Self {
        Self { length, term_freqs }
    }

    /// Occurrences of `term` in this document
    pub fn term_frequency(&self, term: &str) -> u32 {
        self.term_freqs.get(term).copied().unwrap_or(0)
    }
}

/// Inverse document frequency with the BM25 smoothing term
///
/// `idf(t) = ln((N - df + 0.5) / (df + 0.5) + 1)`; strictly decreasing in
/// `df`, never negative.
pub fn idf(doc_frequency: u64, total_docs: u32) -> f64 {
    if doc_frequency == 0 {
        return 0.0;
    }
    let n = total_docs as f64;
    let df = doc_frequency as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// One term's BM25 contribution to a document score
pub fn bm25_term_score(
    tf: u32,
    doc_frequency: u64,
    total_docs: u32,
    doc_len: u32,
    avg_doc_len: f64,
    params: &Bm25Params,
) -> f64 {
    if tf == 0 {
        return 0.0;
    }
    let tf = tf as f64;
    let norm = 1.0 - params.b + params.b * (doc_len as f64 / avg_doc_len);
    let saturation = (tf * (params.k1 + 1.0)) / (tf + params.k1 * norm);
    idf(doc_frequency, total_docs) * saturation
}
