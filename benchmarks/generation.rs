//! Token generation benchmark
//!
//! Measures derived token generation for single documents and for batches,
//! sequentially and on the rayon thread pool.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use fuzzy_fields::{Attributes, FuzzyConfig, FuzzyFields};

/// Number of documents per batch
const BATCH_SIZE: usize = 1_000;

fn random_words(rng: &mut StdRng, count: usize) -> String {
    (0..count)
        .map(|_| {
            let len = rng.gen_range(3..12);
            (0..len)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn random_document(rng: &mut StdRng) -> Attributes {
    let mut doc = Attributes::new();
    doc.add_field("title", random_words(rng, 4))
        .add_field("description", random_words(rng, 30))
        .add_field(
            "tags",
            json!([
                {"label": random_words(rng, 1), "lang": "en"},
                {"label": random_words(rng, 1), "lang": "de"}
            ]),
        );
    doc
}

fn config() -> FuzzyConfig {
    let specs = serde_json::from_value(json!([
        "title",
        {"name": "description", "weight": 2, "minSize": 3},
        {"name": "tags", "keys": ["label", "lang"]}
    ]))
    .expect("valid specifications");
    FuzzyConfig::new().with_fields(specs)
}

fn bench_generation(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let documents: Vec<Attributes> = (0..BATCH_SIZE).map(|_| random_document(&mut rng)).collect();

    let sequential = FuzzyFields::from_config(config()).expect("valid config");
    let parallel = FuzzyFields::from_config(config().with_parallel(true)).expect("valid config");

    c.bench_function("generate_single", |b| {
        b.iter_batched(
            || documents[0].clone(),
            |mut doc| sequential.generate(black_box(&mut doc)),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("generate_batch_sequential", |b| {
        b.iter_batched(
            || documents.clone(),
            |mut docs| sequential.generate_all(black_box(&mut docs)),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("generate_batch_parallel", |b| {
        b.iter_batched(
            || documents.clone(),
            |mut docs| parallel.generate_all(black_box(&mut docs)),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
