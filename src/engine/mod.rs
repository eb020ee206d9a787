//! Thread-safe engine wrapper
//!
//! Wraps the index in a reader/writer lock: `index` and `encode` take the
//! lock exclusively, every query path takes shared access. Readers always
//! observe a document either fully indexed or not at all.

use parking_lot::RwLock;

use crate::config::IndexSettings;
use crate::error::Result;
use crate::index::{InvertedIndex, Position};
use crate::query::QueryBuilder;
use crate::search::Match;

/// Concurrent front door to an [`InvertedIndex`]
///
/// Safe for one writer and any number of readers across threads:
///
/// ```
/// use cinder::SearchEngine;
///
/// let engine = SearchEngine::new();
/// engine.index(1, "the quick brown fox").unwrap();
///
/// let results = engine.rank_bm25("quick fox", 10);
/// assert_eq!(results[0].doc_id, 1);
/// ```
pub struct SearchEngine {
    inner: RwLock<InvertedIndex>,
}

impl SearchEngine {
    /// Create an engine around an empty index with default settings
    pub fn new() -> Self {
        Self::from_index(InvertedIndex::new())
    }

    /// Create an engine with explicit settings
    pub fn with_settings(settings: IndexSettings) -> Self {
        Self::from_index(InvertedIndex::with_settings(settings))
    }

    /// Wrap an existing index
    pub fn from_index(index: InvertedIndex) -> Self {
        Self {
            inner: RwLock::new(index),
        }
    }

    /// Add a document under the exclusive lock
    pub fn index(&self, doc_id: u32, text: &str) -> Result<()> {
        self.inner.write().index(doc_id, text)
    }

    pub fn first(&self, token: &str) -> Position {
        self.inner.read().first(token)
    }

    pub fn last(&self, token: &str) -> Position {
        self.inner.read().last(token)
    }

    pub fn next(&self, token: &str, current: Position) -> Position {
        self.inner.read().next(token, current)
    }

    pub fn previous(&self, token: &str, current: Position) -> Position {
        self.inner.read().previous(token, current)
    }

    pub fn next_phrase(&self, query: &str, start: Position) -> (Position, Position) {
        self.inner.read().next_phrase(query, start)
    }

    pub fn find_all_phrases(&self, query: &str) -> Vec<(Position, Position)> {
        self.inner.read().find_all_phrases(query)
    }

    pub fn next_cover(&self, tokens: &[String], start: Position) -> (Position, Position) {
        self.inner.read().next_cover(tokens, start)
    }

    pub fn rank_proximity(&self, query: &str, max_results: usize) -> Vec<Match> {
        self.inner.read().rank_proximity(query, max_results)
    }

    pub fn rank_bm25(&self, query: &str, max_results: usize) -> Vec<Match> {
        self.inner.read().rank_bm25(query, max_results)
    }

    /// Compose and run a boolean query under one shared lock
    ///
    /// ```
    /// use cinder::SearchEngine;
    ///
    /// let engine = SearchEngine::new();
    /// engine.index(1, "python scripting").unwrap();
    /// engine.index(2, "python snake care").unwrap();
    ///
    /// let docs = engine.query(|q| q.term("python").and().not().term("snake").execute());
    /// assert_eq!(docs.iter().collect::<Vec<u32>>(), vec![1]);
    /// ```
    pub fn query<R>(&self, build: impl FnOnce(QueryBuilder<'_>) -> R) -> R {
        let guard = self.inner.read();
        build(guard.query_builder())
    }

    /// Serialize the index; takes the exclusive lock for the duration
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.inner.write().encode()
    }

    /// Rebuild an engine from an encoded blob
    pub fn decode(data: &[u8]) -> Result<Self> {
        Ok(Self::from_index(InvertedIndex::decode(data)?))
    }

    pub fn total_docs(&self) -> u32 {
        self.inner.read().total_docs()
    }

    pub fn total_terms(&self) -> u64 {
        self.inner.read().total_terms()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_round_trip() {
        let engine = SearchEngine::new();
        engine.index(1, "the quick brown fox").unwrap();
        engine.index(2, "lazy dog").unwrap();

        let bytes = engine.encode().unwrap();
        let restored = SearchEngine::decode(&bytes).unwrap();

        assert_eq!(restored.total_docs(), 2);
        assert_eq!(restored.first("quick"), Position::at(1, 0));
    }

    #[test]
    fn test_engine_query_closure() {
        let engine = SearchEngine::new();
        engine.index(1, "machine learning").unwrap();
        engine.index(2, "machine vision").unwrap();

        let docs = engine.query(|q| q.term("machine").and().term("vision").execute());
        assert_eq!(docs.iter().collect::<Vec<u32>>(), vec![2]);

        let ranked = engine.query(|q| q.term("machine").execute_with_bm25(10));
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_concurrent_readers_during_writes() {
        let engine = SearchEngine::new();
        for doc in 0..50 {
            engine.index(doc, "shared corpus text with quick brown foxes").unwrap();
        }

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let results = engine.rank_bm25("quick foxes", 5);
                        assert!(!results.is_empty());
                        let (start, _) = engine.next_phrase("quick brown", Position::Bof);
                        assert!(!start.is_eof());
                    }
                });
            }
            scope.spawn(|| {
                for doc in 50..100 {
                    engine.index(doc, "more quick brown foxes arriving").unwrap();
                }
            });
        });

        assert_eq!(engine.total_docs(), 100);
    }
}
