//! Exact phrase search
//!
//! A phrase matches where its analyzed terms occur at consecutive offsets
//! of a single document. The walk finds the minimal feasible end of a
//! candidate by hopping forward through each term's postings, recovers the
//! latest possible start by walking backwards, and accepts the candidate
//! exactly when the span width equals the term count. A rejected candidate
//! restarts the forward walk past its own start, which guarantees progress.

use crate::index::{InvertedIndex, Position};

impl InvertedIndex {
    /// Next occurrence of `query` as an exact phrase strictly after `start`
    ///
    /// The query is analyzed with the index's own configuration, so raw
    /// text matches the stemmed vocabulary. Returns the `(start, end)`
    /// positions of the match, or `(Eof, Eof)` when none remains.
    pub fn next_phrase(&self, query: &str, start: Position) -> (Position, Position) {
        let terms = self.analyze(query);
        self.next_phrase_terms(&terms, start)
    }

    /// All occurrences of `query` as an exact phrase, in position order
    pub fn find_all_phrases(&self, query: &str) -> Vec<(Position, Position)> {
        let terms = self.analyze(query);
        self.find_all_phrases_terms(&terms)
    }

    /// Phrase walk over pre-analyzed terms
    pub(crate) fn next_phrase_terms(
        &self,
        terms: &[String],
        start: Position,
    ) -> (Position, Position) {
        if terms.is_empty() {
            return (Position::Eof, Position::Eof);
        }

        let mut from = start;
        loop {
            // forward: earliest feasible position of the final term
            let mut cursor = from;
            for term in terms {
                cursor = self.next(term, cursor);
                if cursor.is_eof() {
                    return (Position::Eof, Position::Eof);
                }
            }
            let end = cursor;

            // backward: latest possible first term at or before that end
            let mut back = end;
            for term in terms[..terms.len() - 1].iter().rev() {
                back = self.previous(term, back);
            }
            let candidate = back;

            // consecutive iff the span is exactly the term count wide
            if let (Position::At(start_doc, start_off), Position::At(end_doc, end_off)) =
                (candidate, end)
            {
                if start_doc == end_doc && end_off - start_off == (terms.len() - 1) as u32 {
                    return (candidate, end);
                }
            }

            // some inner term repeated; resume past the failed start
            from = candidate;
        }
    }

    /// Exhaustive phrase walk over pre-analyzed terms
    pub(crate) fn find_all_phrases_terms(&self, terms: &[String]) -> Vec<(Position, Position)> {
        let mut matches = Vec::new();
        let mut cursor = Position::Bof;

        while !cursor.is_eof() {
            let (start, end) = self.next_phrase_terms(terms, cursor);
            if !start.is_eof() {
                matches.push((start, end));
            }
            cursor = start;
        }

        matches
    }
}
