//! # Vote Tally Benchmarks
//!
//! | Path | Operation |
//! |------|-----------|
//! | shared-types | batch parse and name normalization |
//! | vt-01 Tally Store | increment under both strategies |
//! | vt-04 Tally Reporter | ranked snapshot of a populated tally |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_types::{TallyName, VoteBatch};
use std::sync::Arc;
use tokio::runtime::Runtime;
use vt_01_tally_store::{IncrementStrategy, InMemoryTallyStore, TallyService};
use vt_04_tally_reporter::TallyReporter;

fn batch_json(size: usize) -> Vec<u8> {
    let names: Vec<String> = (0..size).map(|i| format!("Candidate-{}", i % 16)).collect();
    serde_json::to_vec(&serde_json::json!({ "names": names })).unwrap()
}

fn bench_batch_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-types-batch");

    for size in [1, 10, 100, 1000] {
        let payload = batch_json(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("parse_normalize", size), &payload, |b, p| {
            b.iter(|| {
                let batch = VoteBatch::from_slice(black_box(p)).unwrap();
                black_box(batch.normalized().unwrap())
            })
        });
    }

    group.finish();
}

fn bench_increment(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("vt-01-increment");
    let name = TallyName::parse("Alice").unwrap();

    for strategy in [IncrementStrategy::AtomicUpsert, IncrementStrategy::ReadModifyWrite] {
        let service =
            TallyService::with_strategy(Arc::new(InMemoryTallyStore::new()), strategy);
        group.bench_function(BenchmarkId::new("single_name", strategy), |b| {
            b.iter(|| rt.block_on(service.increment(black_box(&name))).unwrap())
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("vt-04-snapshot");

    for distinct in [10, 100, 1000] {
        let store = Arc::new(InMemoryTallyStore::new());
        let service = TallyService::new(store.clone());
        rt.block_on(async {
            for i in 0..distinct {
                for _ in 0..(i % 7 + 1) {
                    service.record_vote(&format!("name-{i}")).await.unwrap();
                }
            }
        });
        let reporter = TallyReporter::new(store);

        group.throughput(Throughput::Elements(distinct as u64));
        group.bench_with_input(BenchmarkId::new("ranked", distinct), &reporter, |b, r| {
            b.iter(|| black_box(rt.block_on(r.snapshot()).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_batch_parse, bench_increment, bench_snapshot);
criterion_main!(benches);
