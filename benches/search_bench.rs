use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cinder::{InvertedIndex, Position};

const VOCAB: &[&str] = &[
    "rust", "search", "engine", "index", "quick", "brown", "fox", "machine", "learning", "data",
    "systems", "memory", "safety", "concurrency", "parser", "network", "storage", "cache",
    "query", "ranking",
];

fn synth_doc(doc_id: u32, words: usize) -> String {
    let mut text = String::new();
    for i in 0..words {
        let word = VOCAB[(doc_id as usize * 7 + i * 13) % VOCAB.len()];
        text.push_str(word);
        text.push(' ');
    }
    text
}

fn build_index(doc_count: u32, words_per_doc: usize) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for doc_id in 0..doc_count {
        index.index(doc_id, &synth_doc(doc_id, words_per_doc)).unwrap();
    }
    index
}

fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    for &doc_count in &[100u32, 1000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(doc_count),
            &doc_count,
            |b, &doc_count| {
                b.iter(|| build_index(black_box(doc_count), 50));
            },
        );
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let index = build_index(1000, 50);

    c.bench_function("rank_bm25", |b| {
        b.iter(|| index.rank_bm25(black_box("machine learning data"), 10));
    });

    c.bench_function("rank_proximity", |b| {
        b.iter(|| index.rank_proximity(black_box("rust memory safety"), 10));
    });

    c.bench_function("find_all_phrases", |b| {
        b.iter(|| index.find_all_phrases(black_box("search engine")));
    });

    c.bench_function("boolean_and_not", |b| {
        b.iter(|| {
            index
                .query_builder()
                .term(black_box("rust"))
                .and()
                .not()
                .term("cache")
                .execute()
        });
    });

    c.bench_function("next_primitive", |b| {
        b.iter(|| {
            let mut cursor = Position::Bof;
            loop {
                cursor = index.next("rust", cursor);
                if cursor.is_eof() {
                    break;
                }
            }
        });
    });
}

fn bench_codec(c: &mut Criterion) {
    let index = build_index(1000, 50);
    let encoded = index.encode().unwrap();

    c.bench_function("encode", |b| {
        b.iter(|| index.encode().unwrap());
    });

    c.bench_function("decode", |b| {
        b.iter(|| InvertedIndex::decode(black_box(&encoded)).unwrap());
    });
}

criterion_group!(benches, bench_indexing, bench_queries, bench_codec);
criterion_main!(benches);
