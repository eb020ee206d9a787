//! Boolean query builder
//!
//! Fluent composition of term and phrase leaves with AND, OR and NOT over
//! roaring bitmaps. Operators fold strictly left to right with no
//! precedence; use [`QueryBuilder::group`] for anything mixed:
//!
//! ```
//! use cinder::InvertedIndex;
//!
//! let mut index = InvertedIndex::new();
//! index.index(1, "cats are pets").unwrap();
//! index.index(2, "dogs are pets").unwrap();
//! index.index(3, "snakes in the garden").unwrap();
//!
//! // (cat OR dog) AND pet
//! let docs = index
//!     .query_builder()
//!     .group(|q| q.term("cats").or().term("dogs"))
//!     .and()
//!     .term("pets")
//!     .execute();
//! assert_eq!(docs.iter().collect::<Vec<u32>>(), vec![1, 2]);
//! ```

use roaring::RoaringBitmap;

use crate::index::InvertedIndex;
use crate::search::{sort_matches, Match};

/// Pending boolean operator between two operands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QueryOp {
    And,
    Or,
}

/// Fluent boolean query over an index
///
/// Leaves resolve to document-id bitmaps as they are pushed; `execute`
/// folds the operand stack left-associatively through the recorded
/// operators. Negation applies to the next leaf only.
pub struct QueryBuilder<'a> {
    index: &'a InvertedIndex,
    stack: Vec<RoaringBitmap>,
    ops: Vec<QueryOp>,
    negate: bool,
    /// Non-negated leaf terms, kept for BM25 rescoring
    terms: Vec<String>,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self {
            index,
            stack: Vec::new(),
            ops: Vec::new(),
            negate: false,
            terms: Vec::new(),
        }
    }

    /// Add a single-term leaf
    ///
    /// The input is analyzed and the first resulting token is looked up;
    /// input that analyzes to nothing (stopwords, too-short tokens)
    /// resolves to the empty set.
    pub fn term(mut self, term: &str) -> Self {
        let tokens = self.index.analyze(term);
        let bitmap = match tokens.first() {
            Some(token) => {
                if !self.negate {
                    self.terms.push(token.clone());
                }
                self.index.doc_ids(token).cloned().unwrap_or_default()
            }
            None => RoaringBitmap::new(),
        };
        self.push_leaf(bitmap);
        self
    }

    /// Add an exact-phrase leaf
    ///
    /// Matches documents containing the analyzed terms at consecutive
    /// positions, via the positional phrase walk.
    pub fn phrase(mut self, phrase: &str) -> Self {
        let tokens = self.index.analyze(phrase);
        let bitmap = if tokens.is_empty() {
            RoaringBitmap::new()
        } else {
            if !self.negate {
                self.terms.extend(tokens.iter().cloned());
            }
            self.index
                .find_all_phrases_terms(&tokens)
                .into_iter()
                .filter_map(|(start, _)| start.doc_id())
                .collect()
        };
        self.push_leaf(bitmap);
        self
    }

    /// Record an AND between the previous and the next operand
    pub fn and(mut self) -> Self {
        self.ops.push(QueryOp::And);
        self
    }

    /// Record an OR between the previous and the next operand
    pub fn or(mut self) -> Self {
        self.ops.push(QueryOp::Or);
        self
    }

    /// Negate the next leaf: it resolves to every indexed document not in
    /// its set. Negated leaves do not contribute terms to BM25 rescoring.
    pub fn not(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Evaluate a sub-query in its own scope and push its result
    ///
    /// This is the only way to control evaluation order, since operators
    /// otherwise fold strictly left to right.
    pub fn group(mut self, build: impl FnOnce(QueryBuilder<'a>) -> QueryBuilder<'a>) -> Self {
        let sub = build(QueryBuilder::new(self.index));
        let result = sub.execute();
        if !self.negate {
            self.terms.extend(sub.terms);
        }
        self.push_leaf(result);
        self
    }

    /// Run the query, returning the matching document ids
    pub fn execute(&self) -> RoaringBitmap {
        let Some(first) = self.stack.first() else {
            return RoaringBitmap::new();
        };

        let mut result = first.clone();
        for (i, operand) in self.stack.iter().enumerate().skip(1) {
            match self.ops.get(i - 1) {
                Some(QueryOp::And) => result &= operand,
                Some(QueryOp::Or) => result |= operand,
                None => {}
            }
        }
        result
    }

    /// Run the query, then rank the matches with BM25
    ///
    /// The score uses every non-negated leaf's analyzed terms; documents
    /// scoring zero are dropped.
    pub fn execute_with_bm25(&self, max_results: usize) -> Vec<Match> {
        let docs = self.execute();

        let mut matches = Vec::new();
        for doc_id in &docs {
            let score = self.index.bm25_score(doc_id, &self.terms);
            if score > 0.0 {
                matches.push(Match::new(
                    doc_id,
                    self.index.term_evidence(&self.terms, doc_id),
                    score,
                ));
            }
        }

        sort_matches(&mut matches);
        matches.truncate(max_results);
        matches
    }

    fn push_leaf(&mut self, bitmap: RoaringBitmap) {
        let resolved = if self.negate {
            self.negate = false;
            self.index.universe() - bitmap
        } else {
            bitmap
        };
        self.stack.push(resolved);
    }
}

impl InvertedIndex {
    /// Start composing a boolean query against this index
    pub fn query_builder(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(self)
    }
}

/// Documents containing every one of `terms`
pub fn all_of(index: &InvertedIndex, terms: &[&str]) -> RoaringBitmap {
    let Some((first, rest)) = terms.split_first() else {
        return RoaringBitmap::new();
    };
    let mut builder = index.query_builder().term(first);
    for term in rest {
        builder = builder.and().term(term);
    }
    builder.execute()
}

/// Documents containing at least one of `terms`
pub fn any_of(index: &InvertedIndex, terms: &[&str]) -> RoaringBitmap {
    let Some((first, rest)) = terms.split_first() else {
        return RoaringBitmap::new();
    };
    let mut builder = index.query_builder().term(first);
    for term in rest {
        builder = builder.or().term(term);
    }
    builder.execute()
}

/// Documents containing `include` but not `exclude`
pub fn term_excluding(index: &InvertedIndex, include: &str, exclude: &str) -> RoaringBitmap {
    index
        .query_builder()
        .term(include)
        .and()
        .not()
        .term(exclude)
        .execute()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.index(1, "machine learning is fun").unwrap();
        index.index(2, "deep learning and machine learning").unwrap();
        index.index(3, "python programming is great").unwrap();
        index.index(4, "machine learning with python").unwrap();
        index.index(5, "cats and dogs are pets").unwrap();
        index
    }

    fn docs(bitmap: &RoaringBitmap) -> Vec<u32> {
        bitmap.iter().collect()
    }

    #[test]
    fn test_single_term() {
        let index = fixture();
        let result = index.query_builder().term("machine").execute();
        assert_eq!(docs(&result), vec![1, 2, 4]);
    }

    #[test]
    fn test_and() {
        let index = fixture();
        let result = index
            .query_builder()
            .term("machine")
            .and()
            .term("python")
            .execute();
        assert_eq!(docs(&result), vec![4]);
    }

    #[test]
    fn test_or() {
        let index = fixture();
        let result = index
            .query_builder()
            .term("cats")
            .or()
            .term("python")
            .execute();
        assert_eq!(docs(&result), vec![3, 4, 5]);
    }

    #[test]
    fn test_not() {
        let index = fixture();
        let result = index
            .query_builder()
            .term("learning")
            .and()
            .not()
            .term("python")
            .execute();
        assert_eq!(docs(&result), vec![1, 2]);
    }

    #[test]
    fn test_leading_not() {
        let index = fixture();
        let result = index.query_builder().not().term("machine").execute();
        assert_eq!(docs(&result), vec![3, 5]);
    }

    #[test]
    fn test_group_controls_order() {
        let index = fixture();
        // (cats OR python) AND machine
        let result = index
            .query_builder()
            .group(|q| q.term("cats").or().term("python"))
            .and()
            .term("machine")
            .execute();
        assert_eq!(docs(&result), vec![4]);
    }

    #[test]
    fn test_left_to_right_fold_without_groups() {
        let index = fixture();
        // cats OR python AND machine folds as (cats OR python) AND machine
        let folded = index
            .query_builder()
            .term("cats")
            .or()
            .term("python")
            .and()
            .term("machine")
            .execute();
        assert_eq!(docs(&folded), vec![4]);
    }

    #[test]
    fn test_phrase_leaf() {
        let index = fixture();
        let result = index.query_builder().phrase("machine learning").execute();
        assert_eq!(docs(&result), vec![1, 2, 4]);

        // stopword removal makes doc 2 read "deep learn machin learn",
        // so the reversed phrase matches there and only there
        let reversed = index.query_builder().phrase("learning machine").execute();
        assert_eq!(docs(&reversed), vec![2]);

        let none = index.query_builder().phrase("python cats").execute();
        assert!(none.is_empty());
    }

    #[test]
    fn test_unknown_term_is_empty() {
        let index = fixture();
        let result = index.query_builder().term("zebra").execute();
        assert!(result.is_empty());
    }

    #[test]
    fn test_stopword_term_is_empty() {
        let index = fixture();
        let result = index.query_builder().term("the").execute();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_builder() {
        let index = fixture();
        let result = index.query_builder().execute();
        assert!(result.is_empty());
    }

    #[test]
    fn test_execute_with_bm25_ranks_and_filters() {
        let index = fixture();
        let matches = index
            .query_builder()
            .term("machine")
            .and()
            .term("learning")
            .execute_with_bm25(10);

        let ids: Vec<u32> = matches.iter().map(|m| m.doc_id).collect();
        assert_eq!(ids.len(), 3);
        // doc 2 mentions both terms twice
        assert_eq!(ids[0], 2);
        assert!(matches.iter().all(|m| m.score > 0.0));
        assert!(matches.iter().all(|m| !m.offsets.is_empty()));
    }

    #[test]
    fn test_negated_terms_do_not_score() {
        let index = fixture();
        let matches = index
            .query_builder()
            .term("learning")
            .and()
            .not()
            .term("python")
            .execute_with_bm25(10);

        // only "learn" contributes; docs 1 and 2 survive the exclusion
        let ids: Vec<u32> = matches.iter().map(|m| m.doc_id).collect();
        assert_eq!(ids[0], 2);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_all_of() {
        let index = fixture();
        assert_eq!(docs(&all_of(&index, &["machine", "learning"])), vec![1, 2, 4]);
        assert_eq!(docs(&all_of(&index, &["machine", "python"])), vec![4]);
        assert!(all_of(&index, &[]).is_empty());
    }

    #[test]
    fn test_any_of() {
        let index = fixture();
        assert_eq!(docs(&any_of(&index, &["cats", "python"])), vec![3, 4, 5]);
        assert!(any_of(&index, &[]).is_empty());
    }

    #[test]
    fn test_term_excluding() {
        let index = fixture();
        assert_eq!(docs(&term_excluding(&index, "learning", "python")), vec![1, 2]);
    }
}
