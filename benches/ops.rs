//! Benchmarks racing the flat-array tree against its boxed-node sibling and
//! the standard library's B-tree.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

use sgtree_rs::naive::NaiveSgTree;
use sgtree_rs::SgTree;

const SIZES: [usize; 2] = [1_000, 10_000];

fn shuffled_keys(n: usize) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..n as u64).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(42));
    keys
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in SIZES.iter() {
        let keys = shuffled_keys(*size);

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), size, |b, _| {
            b.iter(|| {
                let mut map: BTreeMap<u64, u64> = BTreeMap::new();
                for &key in &keys {
                    map.insert(key, key);
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("SgTree", size), size, |b, _| {
            b.iter(|| {
                let mut map: SgTree<u64, u64> = SgTree::new();
                for &key in &keys {
                    map.insert(key, key);
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("NaiveSgTree", size), size, |b, _| {
            b.iter(|| {
                let mut map: NaiveSgTree<u64, u64> = NaiveSgTree::new();
                for &key in &keys {
                    map.insert(key, key);
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in SIZES.iter() {
        let keys = shuffled_keys(*size);

        let mut btree: BTreeMap<u64, u64> = BTreeMap::new();
        let mut sgtree: SgTree<u64, u64> = SgTree::new();
        let mut naive: NaiveSgTree<u64, u64> = NaiveSgTree::new();
        for &key in &keys {
            btree.insert(key, key);
            sgtree.insert(key, key);
            naive.insert(key, key);
        }

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), size, |b, _| {
            b.iter(|| {
                let mut sum = 0u64;
                for key in &keys {
                    if let Some(v) = btree.get(key) {
                        sum += v;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("SgTree", size), size, |b, _| {
            b.iter(|| {
                let mut sum = 0u64;
                for key in &keys {
                    if let Some(v) = sgtree.get(key) {
                        sum += v;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("NaiveSgTree", size), size, |b, _| {
            b.iter(|| {
                let mut sum = 0u64;
                for key in &keys {
                    if let Some(v) = naive.get(key) {
                        sum += v;
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for size in SIZES.iter() {
        let keys = shuffled_keys(*size);

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), size, |b, _| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<u64, u64>>(),
                |mut map| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("SgTree", size), size, |b, _| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<SgTree<u64, u64>>(),
                |mut map| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("NaiveSgTree", size), size, |b, _| {
            b.iter_batched(
                || {
                    let mut map: NaiveSgTree<u64, u64> = NaiveSgTree::new();
                    for &key in &keys {
                        map.insert(key, key);
                    }
                    map
                },
                |mut map| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");

    for size in SIZES.iter() {
        let keys = shuffled_keys(*size);

        let mut btree: BTreeMap<u64, u64> = BTreeMap::new();
        let mut sgtree: SgTree<u64, u64> = SgTree::new();
        let mut naive: NaiveSgTree<u64, u64> = NaiveSgTree::new();
        for &key in &keys {
            btree.insert(key, key);
            sgtree.insert(key, key);
            naive.insert(key, key);
        }

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), size, |b, _| {
            b.iter(|| black_box(btree.iter().map(|(_, v)| v).sum::<u64>()));
        });

        group.bench_with_input(BenchmarkId::new("SgTree", size), size, |b, _| {
            b.iter(|| black_box(sgtree.iter().map(|(_, v)| v).sum::<u64>()));
        });

        group.bench_with_input(BenchmarkId::new("NaiveSgTree", size), size, |b, _| {
            b.iter(|| black_box(naive.iter().map(|(_, v)| v).sum::<u64>()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_remove, bench_iteration);
criterion_main!(benches);
