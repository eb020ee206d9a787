//! Minimal cover search
//!
//! A cover is the smallest interval of one document containing every query
//! term at least once. The walk bounds a candidate by the furthest next
//! occurrence among all terms, then pulls the start back to the earliest
//! occurrence that still reaches the bound. Candidates spanning documents
//! restart from their own start, so iteration always advances.

use crate::index::{InvertedIndex, Position};

impl InvertedIndex {
    /// Next cover of `tokens` strictly after `start`
    ///
    /// Tokens must already be analyzed terms. Returns the inclusive
    /// `(start, end)` bounds of the cover, or `(Eof, Eof)` when no document
    /// past `start` contains every token.
    pub fn next_cover(&self, tokens: &[String], start: Position) -> (Position, Position) {
        if tokens.is_empty() {
            return (Position::Eof, Position::Eof);
        }

        let mut from = start;
        loop {
            // the furthest next occurrence bounds the candidate
            let mut cover_end = from;
            for token in tokens {
                let pos = self.next(token, from);
                if pos.is_eof() {
                    return (Position::Eof, Position::Eof);
                }
                if pos > cover_end {
                    cover_end = pos;
                }
            }
            let Position::At(end_doc, end_off) = cover_end else {
                return (Position::Eof, Position::Eof);
            };
            // bound one past the end so backward walks still see the end itself
            let bound = Position::at(end_doc, end_off + 1);

            // earliest occurrence of each token that still reaches the bound
            let mut cover_start = Position::Bof;
            for token in tokens {
                let pos = self.previous(token, bound);
                if cover_start.is_bof() || pos < cover_start {
                    cover_start = pos;
                }
            }

            match cover_start {
                Position::At(start_doc, _) if start_doc == end_doc => {
                    return (cover_start, Position::at(end_doc, end_off));
                }
                _ => from = cover_start,
            }
        }
    }
}
