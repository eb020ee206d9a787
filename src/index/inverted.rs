//! Inverted index with hybrid posting storage
//!
//! Every term carries two parallel structures: a skip list of exact
//! `(doc_id, offset)` positions for phrase and proximity walks, and a
//! roaring bitmap of document ids for boolean set algebra. Document and
//! corpus statistics accumulate alongside for BM25 scoring.

use std::collections::HashMap;

use roaring::RoaringBitmap;

use crate::analyzer::Analyzer;
use crate::config::IndexSettings;
use crate::error::{CinderError, Result};
use crate::index::position::Position;
use crate::index::skiplist::SkipList;
use crate::index::statistics::{bm25_term_score, Bm25Params, DocumentStats};

/// In-process full-text index
///
/// Build one with [`InvertedIndex::new`], feed it documents with
/// [`index`](InvertedIndex::index), then query through the phrase, cover,
/// ranking and boolean APIs. The index owns all posting data; queries only
/// ever borrow it.
pub struct InvertedIndex {
    /// Term -> ordered positions
    pub(crate) postings: HashMap<String, SkipList>,
    /// Term -> document ids containing it
    pub(crate) doc_bitmaps: HashMap<String, RoaringBitmap>,
    /// Document id -> length and term frequencies
    pub(crate) doc_stats: HashMap<u32, DocumentStats>,
    pub(crate) total_docs: u32,
    pub(crate) total_terms: u64,
    pub(crate) bm25: Bm25Params,
    pub(crate) analyzer: Analyzer,
}

impl InvertedIndex {
    /// Create an empty index with default settings
    pub fn new() -> Self {
        Self::with_settings(IndexSettings::default())
    }

    /// Create an empty index with explicit analyzer and BM25 settings
    pub fn with_settings(settings: IndexSettings) -> Self {
        Self {
            postings: HashMap::new(),
            doc_bitmaps: HashMap::new(),
            doc_stats: HashMap::new(),
            total_docs: 0,
            total_terms: 0,
            bm25: settings.bm25,
            analyzer: Analyzer::new(settings.analyzer),
        }
    }

    /// Add a document to the index
    ///
    /// The text is analyzed into terms; term `i` of the output is recorded
    /// at position `(doc_id, i)`. Empty text is accepted: the document then
    /// exists with length zero. A `doc_id` that was already indexed is
    /// rejected, since positions cannot be retracted.
    pub fn index(&mut self, doc_id: u32, text: &str) -> Result<()> {
        if self.doc_stats.contains_key(&doc_id) {
            return Err(CinderError::DuplicateDocument(doc_id));
        }

        let tokens = self.analyzer.analyze(text);
        let mut term_freqs: HashMap<String, u32> = HashMap::new();

        for (offset, token) in tokens.iter().enumerate() {
            self.postings
                .entry(token.clone())
                .or_default()
                .insert((doc_id, offset as u32));
            self.doc_bitmaps
                .entry(token.clone())
                .or_default()
                .insert(doc_id);
            *term_freqs.entry(token.clone()).or_insert(0) += 1;
        }

        let length = tokens.len() as u32;
        self.doc_stats
            .insert(doc_id, DocumentStats::new(length, term_freqs));
        self.total_docs += 1;
        self.total_terms += u64::from(length);
        Ok(())
    }

    /// First occurrence of `token` in the corpus, or `Eof`
    pub fn first(&self, token: &str) -> Position {
        self.postings
            .get(token)
            .and_then(SkipList::first)
            .map_or(Position::Eof, into_position)
    }

    /// Last occurrence of `token` in the corpus, or `Eof`
    pub fn last(&self, token: &str) -> Position {
        self.postings
            .get(token)
            .and_then(SkipList::last)
            .map_or(Position::Eof, into_position)
    }

    /// Next occurrence of `token` strictly after `current`
    ///
    /// From `Bof` this is the first occurrence; from `Eof` it stays `Eof`.
    pub fn next(&self, token: &str, current: Position) -> Position {
        match current {
            Position::Bof => self.first(token),
            Position::Eof => Position::Eof,
            Position::At(doc_id, offset) => self
                .postings
                .get(token)
                .and_then(|list| list.find_gt((doc_id, offset)))
                .map_or(Position::Eof, into_position),
        }
    }

    /// Previous occurrence of `token` strictly before `current`
    ///
    /// From `Eof` this is the last occurrence; from `Bof` it stays `Bof`.
    pub fn previous(&self, token: &str, current: Position) -> Position {
        match current {
            Position::Eof => self.last(token),
            Position::Bof => Position::Bof,
            Position::At(doc_id, offset) => self
                .postings
                .get(token)
                .and_then(|list| list.find_lt((doc_id, offset)))
                .map_or(Position::Bof, into_position),
        }
    }

    /// Number of documents containing `token`
    pub fn doc_frequency(&self, token: &str) -> u64 {
        self.doc_bitmaps.get(token).map_or(0, RoaringBitmap::len)
    }

    /// Count of successfully indexed documents
    pub fn total_docs(&self) -> u32 {
        self.total_docs
    }

    /// Sum of analyzed lengths across all documents
    pub fn total_terms(&self) -> u64 {
        self.total_terms
    }

    /// Statistics for one document, if indexed
    pub fn doc_stats(&self, doc_id: u32) -> Option<&DocumentStats> {
        self.doc_stats.get(&doc_id)
    }

    /// The BM25 parameters this index scores with
    pub fn bm25_params(&self) -> Bm25Params {
        self.bm25
    }

    /// Analyze text with this index's analyzer configuration
    pub fn analyze(&self, text: &str) -> Vec<String> {
        self.analyzer.analyze(text)
    }

    /// Document ids containing `token`, if any
    pub(crate) fn doc_ids(&self, token: &str) -> Option<&RoaringBitmap> {
        self.doc_bitmaps.get(token)
    }

    /// Every indexed document id as a bitmap
    pub(crate) fn universe(&self) -> RoaringBitmap {
        self.doc_stats.keys().copied().collect()
    }

    /// All positions of `token` inside one document, in offset order
    pub(crate) fn positions_in_doc(&self, token: &str, doc_id: u32) -> Vec<Position> {
        match self.postings.get(token) {
            Some(list) => list
                .iter_from((doc_id, 0))
                .take_while(|&(doc, _)| doc == doc_id)
                .map(into_position)
                .collect(),
            None => Vec::new(),
        }
    }

    /// BM25 score of one document against pre-analyzed query terms
    pub(crate) fn bm25_score(&self, doc_id: u32, query_terms: &[String]) -> f64 {
        let Some(stats) = self.doc_stats.get(&doc_id) else {
            return 0.0;
        };
        if self.total_docs == 0 || self.total_terms == 0 {
            return 0.0;
        }
        let avg_doc_len = self.total_terms as f64 / f64::from(self.total_docs);

        query_terms
            .iter()
            .map(|term| {
                bm25_term_score(
                    stats.term_frequency(term),
                    self.doc_frequency(term),
                    self.total_docs,
                    stats.length,
                    avg_doc_len,
                    &self.bm25,
                )
            })
            .sum()
    }
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InvertedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvertedIndex")
            .field("terms", &self.postings.len())
            .field("total_docs", &self.total_docs)
            .field("total_terms", &self.total_terms)
            .finish()
    }
}

fn into_position((doc_id, offset): (u32, u32)) -> Position {
    Position::at(doc_id, offset)
}
