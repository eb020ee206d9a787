use serde::{Deserialize, Serialize};

use crate::index::Bm25Params;

/// Analyzer configuration
///
/// Controls the text analysis pipeline that turns raw text into index
/// terms. Queries are analyzed with the same configuration as documents,
/// so these settings are fixed when an index is created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Minimum token length in Unicode code points; shorter tokens are dropped
    pub min_token_length: usize,
    /// Apply Snowball (Porter2) English stemming
    pub stem: bool,
    /// Drop tokens found in the English stopword table
    pub remove_stopwords: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_token_length: 2,
            stem: true,
            remove_stopwords: true,
        }
    }
}

/// Index settings bundle
///
/// Everything an index needs at construction time. There is no mutation
/// API once the first document has been indexed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IndexSettings {
    pub analyzer: AnalyzerConfig,
    pub bm25: Bm25Params,
}
