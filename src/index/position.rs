//! Word positions and the BOF/EOF sentinels
//!
//! A position identifies one word in one document. The two sentinels bound
//! the whole corpus: `Bof` sorts before every real position and `Eof` after,
//! which lets the search primitives walk forwards and backwards without
//! special-casing "before the first" and "past the last".

use serde::{Deserialize, Serialize};

/// A location in the indexed corpus
///
/// Ordered first by document id, then by word offset, with the sentinels at
/// the extremes:
///
/// ```
/// use cinder::Position;
///
/// assert!(Position::Bof < Position::at(0, 0));
/// assert!(Position::at(1, 9) < Position::at(2, 0));
/// assert!(Position::at(u32::MAX, u32::MAX) < Position::Eof);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Before every indexed position
    Bof,
    /// Word `offset` (0-based) of document `doc_id`
    At(u32, u32),
    /// After every indexed position
    Eof,
}

impl Position {
    /// A real position within a document
    pub fn at(doc_id: u32, offset: u32) -> Self {
        Position::At(doc_id, offset)
    }

    /// Document id, or `None` for a sentinel
    pub fn doc_id(&self) -> Option<u32> {
        match self {
            Position::At(doc_id, _) => Some(*doc_id),
            _ => None,
        }
    }

    /// Word offset within the document, or `None` for a sentinel
    pub fn offset(&self) -> Option<u32> {
        match self {
            Position::At(_, offset) => Some(*offset),
            _ => None,
        }
    }

    pub fn is_bof(&self) -> bool {
        matches!(self, Position::Bof)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Position::Eof)
    }

    /// Whether two positions fall in the same document
    ///
    /// Sentinels belong to no document.
    pub fn same_doc(&self, other: &Position) -> bool {
        match (self, other) {
            (Position::At(a, _), Position::At(b, _)) => a == b,
            _ => false,
        }
    }
}
