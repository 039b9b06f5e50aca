use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

use newsdex::core::config::Config;
use newsdex::core::types::DocId;
use newsdex::index::store::IndexStore;
use newsdex::parallel::indexer::Indexer;

fn make_corpus(n: usize, words_per_doc: usize) -> HashMap<DocId, String> {
    let vocabulary = [
        "market", "report", "hurricane", "election", "economy", "president",
        "stock", "congress", "trade", "weather", "senate", "company",
    ];
    let mut rng = rand::thread_rng();

    (0..n)
        .map(|i| {
            let text = (0..words_per_doc)
                .map(|_| vocabulary[rng.gen_range(0..vocabulary.len())])
                .collect::<Vec<_>>()
                .join(" ");
            (DocId::new(format!("d{}", i)), text)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for &doc_count in &[100usize, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(doc_count), &doc_count, |b, &doc_count| {
            b.iter_batched(
                || make_corpus(doc_count, 50),
                |documents| {
                    let config = Config::default();
                    let store = Arc::new(IndexStore::new(&config));
                    let indexer = Indexer::new(config, Arc::clone(&store));
                    indexer.build(black_box(documents), None).unwrap();
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
