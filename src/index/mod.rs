//! Index storage: positions, posting lists, statistics and the facade

mod inverted;
mod position;
mod skiplist;
mod statistics;

pub use inverted::InvertedIndex;
pub use position::Position;
pub use skiplist::SkipList;
pub use statistics::{idf, Bm25Params, DocumentStats};

pub(crate) use skiplist::PostingKey;
