//! Text analysis pipeline
//!
//! Turns raw text into the ordered token stream the index stores. The
//! pipeline runs tokenization, lowercasing, stopword removal, length
//! filtering and Snowball (Porter2) stemming, in that order. The offset of
//! token `i` in the output is `i`; those offsets become index positions.

mod stopwords;

pub use stopwords::{is_stopword, ENGLISH_STOPWORDS};

use std::collections::HashMap;

use rust_stemmers::{Algorithm, Stemmer};

use crate::config::AnalyzerConfig;

/// Configured text analyzer
///
/// Holds the stemmer so repeated calls do not rebuild it. Analysis is pure:
/// the same input always yields the same token stream.
pub struct Analyzer {
    config: AnalyzerConfig,
    stemmer: Option<Stemmer>,
}

impl Analyzer {
    /// Create an analyzer from configuration
    pub fn new(config: AnalyzerConfig) -> Self {
        let stemmer = config.stem.then(|| Stemmer::create(Algorithm::English));
        Self { config, stemmer }
    }

    /// The configuration this analyzer was built with
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze text into an ordered list of index terms
    ///
    /// # Example
    ///
    /// ```
    /// use cinder::analyzer::Analyzer;
    /// use cinder::AnalyzerConfig;
    ///
    /// let analyzer = Analyzer::new(AnalyzerConfig::default());
    /// let tokens = analyzer.analyze("The Quick Brown Foxes!");
    /// assert_eq!(tokens, vec!["quick", "brown", "fox"]);
    /// ```
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let mut tokens: Vec<String> = tokenize(text)
            .map(|word| word.to_lowercase())
            .filter(|token| !self.config.remove_stopwords || !is_stopword(token))
            .filter(|token| token.chars().count() >= self.config.min_token_length)
            .collect();

        if let Some(stemmer) = &self.stemmer {
            tokens = tokens
                .into_iter()
                .map(|token| stemmer.stem(&token).into_owned())
                .collect();
        }

        tokens
    }

    /// Compute term frequencies for a text
    pub fn term_frequencies(&self, text: &str) -> HashMap<String, u32> {
        let mut freqs = HashMap::new();
        for token in self.analyze(text) {
            *freqs.entry(token).or_insert(0) += 1;
        }
        freqs
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

/// Analyze text with the default configuration
pub fn analyze(text: &str) -> Vec<String> {
    Analyzer::default().analyze(text)
}

/// Split text into words on runs of non-alphanumeric code points
///
/// Any code point that is neither a Unicode letter nor a Unicode number is
/// a delimiter; empty segments are discarded.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|segment| !segment.is_empty())
}
