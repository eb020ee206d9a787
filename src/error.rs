use thiserror::Error;

/// Main error type for cinder operations
///
/// Search primitives and rankers are total functions: an unknown token
/// surfaces as a sentinel position or an empty set, never as an error.
/// The binary codec is the only recoverable failure source; the remaining
/// variant guards the ingestion contract.
#[derive(Error, Debug)]
pub enum CinderError {
    #[error("document {0} is already indexed")]
    DuplicateDocument(u32),

    #[error("posting list for term {term:?} holds {count} positions, codec limit is 65535")]
    PostingListTooLarge { term: String, count: usize },

    #[error("unexpected end of index data at byte {0}")]
    UnexpectedEof(usize),

    #[error("invalid {field} length {len} at byte {offset}")]
    InvalidLength {
        field: &'static str,
        len: u32,
        offset: usize,
    },

    #[error("negative position ({doc_id}, {offset}) in posting list")]
    NegativePosition { doc_id: i32, offset: i32 },

    #[error("tower points at node {index} but the posting list has {count} positions")]
    TowerIndexOutOfRange { index: u16, count: usize },

    #[error("posting list for term {0:?} is not in ascending position order")]
    UnsortedPositions(String),

    #[error("posting node {rank} does not link to its successor")]
    BrokenTowerChain { rank: usize },

    #[error("tower of {levels} levels exceeds the maximum height {max}")]
    TowerTooTall { levels: usize, max: usize },

    #[error("term bytes are not valid UTF-8: {0}")]
    InvalidTermBytes(#[from] std::string::FromUtf8Error),
}

/// Result type alias for cinder operations
pub type Result<T> = std::result::Result<T, CinderError>;
