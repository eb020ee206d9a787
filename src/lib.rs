//! Embeddable, in-process full-text search.
//!
//! Feed documents to an [`InvertedIndex`] (or the thread-safe
//! [`SearchEngine`]), then query with exact phrases, boolean composition,
//! proximity ranking or BM25. The whole index round-trips through a single
//! compact byte blob via [`InvertedIndex::encode`] and
//! [`InvertedIndex::decode`].
//!
//! ```
//! use cinder::InvertedIndex;
//!
//! let mut index = InvertedIndex::new();
//! index.index(1, "the quick brown fox").unwrap();
//! index.index(2, "lazy dog sleeps").unwrap();
//!
//! let results = index.rank_bm25("quick fox", 10);
//! assert_eq!(results[0].doc_id, 1);
//! ```

pub mod analyzer;
mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod search;

pub use config::{AnalyzerConfig, IndexSettings};
pub use engine::SearchEngine;
pub use error::{CinderError, Result};
pub use index::{Bm25Params, DocumentStats, InvertedIndex, Position};
pub use query::{all_of, any_of, term_excluding, QueryBuilder};
pub use search::Match;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
