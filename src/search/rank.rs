//! Ranking: proximity covers and Okapi BM25
//!
//! Both rankers analyze the raw query with the index's configuration and
//! return deterministic results: descending score, ties broken by ascending
//! document id.

use std::cmp::Ordering;
use std::collections::HashSet;

use roaring::RoaringBitmap;

use crate::index::{InvertedIndex, Position};
use crate::search::Match;

impl InvertedIndex {
    /// Rank documents by term proximity
    ///
    /// Enumerates every minimal cover of the query terms and credits the
    /// covering document `1 / (width + 1)` per cover, so documents where
    /// the terms sit close together, or appear together repeatedly, score
    /// higher. Match offsets hold the first cover's endpoints.
    pub fn rank_proximity(&self, query: &str, max_results: usize) -> Vec<Match> {
        let tokens = self.analyze(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut matches = self.collect_proximity_matches(&tokens);
        sort_matches(&mut matches);
        matches.truncate(max_results);
        matches
    }

    /// Rank documents with Okapi BM25
    ///
    /// Candidates are all documents containing at least one query term.
    /// Zero-scoring candidates are dropped. Match offsets carry the query
    /// terms' positions within the document as evidence.
    pub fn rank_bm25(&self, query: &str, max_results: usize) -> Vec<Match> {
        let tokens = self.analyze(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut candidates = RoaringBitmap::new();
        for token in &tokens {
            if let Some(bitmap) = self.doc_ids(token) {
                candidates |= bitmap;
            }
        }

        let mut matches = Vec::new();
        for doc_id in &candidates {
            let score = self.bm25_score(doc_id, &tokens);
            if score > 0.0 {
                matches.push(Match::new(doc_id, self.term_evidence(&tokens, doc_id), score));
            }
        }

        sort_matches(&mut matches);
        matches.truncate(max_results);
        matches
    }

    /// Walk all covers in position order, merging per-document scores.
    ///
    /// Covers arrive grouped by document, so a document is finished
    /// exactly when the cover's document id moves past it; the last
    /// document flushes when the walk hits EOF.
    fn collect_proximity_matches(&self, tokens: &[String]) -> Vec<Match> {
        let mut matches = Vec::new();

        let mut cover = self.next_cover(tokens, Position::Bof);
        let (Position::At(first_doc, _), _) = cover else {
            return matches;
        };

        let mut current_doc = first_doc;
        let mut evidence = cover;
        let mut score = 0.0;

        while let (Position::At(doc, start_off), Position::At(_, end_off)) = cover {
            if doc != current_doc {
                matches.push(Match::new(current_doc, vec![evidence.0, evidence.1], score));
                current_doc = doc;
                evidence = cover;
                score = 0.0;
            }

            score += 1.0 / f64::from(end_off - start_off + 1);
            cover = self.next_cover(tokens, cover.0);
        }

        matches.push(Match::new(current_doc, vec![evidence.0, evidence.1], score));
        matches
    }

    /// Positions of the query terms inside one document, token order first
    pub(crate) fn term_evidence(&self, tokens: &[String], doc_id: u32) -> Vec<Position> {
        let mut offsets = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for token in tokens {
            if seen.insert(token) {
                offsets.extend(self.positions_in_doc(token, doc_id));
            }
        }
        offsets
    }
}

/// Order matches by descending score, then ascending document id
pub(crate) fn sort_matches(matches: &mut [Match]) {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
}
