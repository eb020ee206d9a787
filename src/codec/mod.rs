//! Binary index codec
//!
//! Serializes the whole index into one little-endian byte stream:
//!
//! 1. Header: `total_docs: u32`, `total_terms: u64`, `bm25_k1: f64`,
//!    `bm25_b: f64`, `num_doc_stats: u32`.
//! 2. Document statistics: per document, `doc_id: u32`, `length: u32`,
//!    `num_terms: u32`, then length-prefixed term bytes with a `freq: u32`
//!    each.
//! 3. Posting lists, repeated until the end of the stream: length-prefixed
//!    term bytes, a byte-length-prefixed run of `(doc_id: i32, offset: i32)`
//!    pairs in ascending order, then one tower record per position. A tower
//!    record is a `u32` byte length followed by `u16` forward links naming
//!    peer positions by 1-based rank; a single zero link marks the empty
//!    tower of the final position.
//!
//! Towers are stored as ranks rather than addresses so the skip-list shape
//! survives the round trip. Per-term document-id sets are not stored at
//! all; the decoder rebuilds them by scanning the position pairs.
//!
//! Encoding sorts documents by id and terms lexicographically, so equal
//! indexes produce identical bytes and re-encoding a decoded index is
//! byte-identical.

mod decoder;
mod encoder;

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::index::InvertedIndex;

impl InvertedIndex {
    /// Serialize the index into a byte blob
    ///
    /// Fails only if a posting list has more positions than a `u16` tower
    /// link can address.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encoder::encode_index(self)
    }

    /// Rebuild an index from an encoded blob, with the default analyzer
    ///
    /// Corrupt input is rejected; no partially-decoded state escapes.
    pub fn decode(data: &[u8]) -> Result<Self> {
        decoder::decode_index(data, AnalyzerConfig::default())
    }

    /// Rebuild an index from an encoded blob with an explicit analyzer
    ///
    /// The blob stores BM25 parameters but not analyzer settings; an index
    /// built with a non-default analyzer must be decoded with the same
    /// configuration for queries to analyze consistently.
    pub fn decode_with_analyzer(data: &[u8], config: AnalyzerConfig) -> Result<Self> {
        decoder::decode_index(data, config)
    }
}
