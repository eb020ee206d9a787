//! Structural invariants checked through the public API over a small
//! but non-trivial corpus.

use cinder::{index::idf, InvertedIndex, Position};

const CORPUS: &[(u32, &str)] = &[
    (1, "the quick brown fox jumps over the lazy dog"),
    (2, "machine learning algorithms learn from data"),
    (4, "quick thinking machines learn quickly"),
    (7, ""),
    (9, "data structures and algorithms in rust programming"),
];

fn build() -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for &(doc_id, text) in CORPUS {
        index.index(doc_id, text).unwrap();
    }
    index
}

/// Walk every occurrence of a token via the `next` primitive.
fn occurrences(index: &InvertedIndex, token: &str) -> Vec<Position> {
    let mut positions = Vec::new();
    let mut cursor = index.next(token, Position::Bof);
    while let Position::At(..) = cursor {
        positions.push(cursor);
        cursor = index.next(token, cursor);
    }
    positions
}

#[test]
fn every_emitted_token_is_a_posting() {
    let index = build();

    for &(doc_id, text) in CORPUS {
        let tokens = index.analyze(text);
        for (offset, token) in tokens.iter().enumerate() {
            let expected = Position::at(doc_id, offset as u32);
            assert!(
                occurrences(&index, token).contains(&expected),
                "({doc_id}, {offset}) missing from postings of {token:?}"
            );
            assert!(
                index.doc_stats(doc_id).unwrap().term_frequency(token) > 0,
                "{token:?} missing from doc {doc_id} stats"
            );
        }
    }
}

#[test]
fn document_frequency_matches_per_document_stats() {
    let index = build();

    let mut vocabulary: Vec<String> = Vec::new();
    for &(_, text) in CORPUS {
        for token in index.analyze(text) {
            if !vocabulary.contains(&token) {
                vocabulary.push(token);
            }
        }
    }

    for token in &vocabulary {
        let from_stats = CORPUS
            .iter()
            .filter(|&&(doc_id, _)| {
                index.doc_stats(doc_id).unwrap().term_frequency(token) > 0
            })
            .count() as u64;
        assert_eq!(
            index.doc_frequency(token),
            from_stats,
            "doc frequency mismatch for {token:?}"
        );
    }
}

#[test]
fn corpus_totals_are_consistent() {
    let index = build();

    let expected_terms: u64 = CORPUS
        .iter()
        .map(|&(_, text)| index.analyze(text).len() as u64)
        .sum();
    assert_eq!(index.total_terms(), expected_terms);
    assert_eq!(index.total_docs(), CORPUS.len() as u32);
}

#[test]
fn phrase_matches_span_exactly_their_terms() {
    let index = build();

    for query in ["quick brown", "machine learning", "learn from data", "lazy dog"] {
        let width = index.analyze(query).len() as u32;
        let mut cursor = Position::Bof;
        loop {
            let (start, end) = index.next_phrase(query, cursor);
            if start.is_eof() {
                break;
            }
            assert!(start.same_doc(&end), "phrase {query:?} crossed documents");
            assert_eq!(
                end.offset().unwrap() - start.offset().unwrap(),
                width - 1,
                "phrase {query:?} has the wrong width"
            );
            cursor = start;
        }
    }
}

#[test]
fn covers_contain_every_term_with_tight_bounds() {
    let index = build();
    let tokens: Vec<String> = vec!["learn".into(), "data".into()];

    let mut covers = 0;
    let mut cursor = Position::Bof;
    loop {
        let (start, end) = index.next_cover(&tokens, cursor);
        let (Position::At(doc, start_off), Position::At(_, end_off)) = (start, end) else {
            break;
        };
        covers += 1;
        assert!(start.same_doc(&end));

        let bound = Position::at(doc, end_off + 1);
        let mut hits_start = false;
        let mut hits_end = false;
        for token in &tokens {
            // the latest occurrence before the bound must sit inside the cover
            let latest = index.previous(token, bound);
            assert!(latest.same_doc(&start), "{token:?} escaped the cover");
            let off = latest.offset().unwrap();
            assert!(off >= start_off && off <= end_off);
            hits_start |= off == start_off;
            hits_end |= off == end_off;
        }
        // minimality: both endpoints are occupied by some query term
        assert!(hits_start && hits_end, "cover bounds are not tight");

        cursor = start;
    }
    assert!(covers > 0, "expected at least one cover");
}

#[test]
fn idf_is_strictly_decreasing_in_document_frequency() {
    for df in 1..50u64 {
        assert!(idf(df, 50) > idf(df + 1, 50));
    }
}

#[test]
fn rarer_terms_outrank_common_ones() {
    let mut index = InvertedIndex::new();
    index.index(1, "cobalt widget").unwrap();
    index.index(2, "common widget").unwrap();
    index.index(3, "common gadget").unwrap();
    index.index(4, "common gizmo").unwrap();

    // docs 1 and 2 are identical except for which query term they carry;
    // "cobalt" is rarer than "common", so doc 1 must win
    let results = index.rank_bm25("cobalt common", 10);
    let top_two: Vec<u32> = results.iter().take(2).map(|m| m.doc_id).collect();
    assert_eq!(top_two[0], 1);
    assert!(results[0].score > results[1].score);
}

#[test]
fn bm25_term_frequency_saturates() {
    let mut index = InvertedIndex::new();
    // equal lengths so only the term frequency of "rust" varies
    index.index(1, "rust alpha beta gamma").unwrap();
    index.index(2, "rust rust delta epsilon").unwrap();
    index.index(4, "rust rust rust rust").unwrap();

    let results = index.rank_bm25("rust", 10);
    let score = |doc: u32| {
        results
            .iter()
            .find(|m| m.doc_id == doc)
            .map(|m| m.score)
            .unwrap()
    };

    let (s1, s2, s4) = (score(1), score(2), score(4));
    assert!(s1 < s2 && s2 < s4, "score must grow with term frequency");
    assert!(
        s4 - s2 < s2 - s1,
        "each doubling must add less than the one before"
    );
}
