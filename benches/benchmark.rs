use cbf_recommender::{CbfEngine, Document, VocabularyIndex};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const WORDS: &[&str] = &[
    "neural", "network", "graph", "learning", "retrieval", "ranking", "sparse", "vector", "kernel",
    "protein", "sentiment", "analysis", "language", "model", "transformer", "attention", "image",
    "segmentation", "robot", "navigation", "policy", "gradient", "bayesian", "inference", "cluster",
    "federated", "privacy", "compression", "quantum", "circuit", "citation", "recommendation",
];

/// deterministic synthetic corpus
fn synthetic_corpus(n: usize) -> Vec<Document> {
    let mut state: u32 = 0x2545_F491;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state as usize
    };
    (0..n)
        .map(|i| {
            let title: Vec<&str> = (0..6).map(|_| WORDS[next() % WORDS.len()]).collect();
            let abstract_text: Vec<&str> = (0..80).map(|_| WORDS[next() % WORDS.len()]).collect();
            Document::new(title.join(" "), abstract_text.join(" ")).with_id(i)
        })
        .collect()
}

fn fit_and_rank_benchmark(c: &mut Criterion) {
    let corpus = synthetic_corpus(100);
    let engine = CbfEngine::new();

    c.bench_function("fit_vocabulary_index", |b| {
        b.iter(|| VocabularyIndex::fit(black_box(&corpus), true));
    });

    c.bench_function("rank_by_relevance", |b| {
        b.iter(|| engine.rank_by_relevance(black_box(&corpus), "graph neural network retrieval"));
    });

    let index = engine.fit(&corpus);
    c.bench_function("similarity_matrix", |b| {
        b.iter(|| index.similarity_matrix());
    });

    c.bench_function("recommend_from_selection", |b| {
        b.iter(|| {
            engine.recommend_from_selection(black_box(&corpus[..5]), black_box(&corpus[5..]), 10)
        });
    });
}

criterion_group!(benches, fit_and_rank_benchmark);
criterion_main!(benches);
