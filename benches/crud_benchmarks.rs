use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use grove::BTree;
use std::collections::BTreeSet;

const N: usize = 10_000;
const ORDER: usize = 16;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Insert Benchmarks ──────────────────────────────────────────────────────

fn bench_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_ordered");
    let keys = ordered_keys(N);

    group.bench_function(BenchmarkId::new("BTree", N), |b| {
        b.iter(|| {
            let mut tree = BTree::new(ORDER);
            for &key in &keys {
                tree.insert(key).unwrap();
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &key in &keys {
                set.insert(key);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_random");
    let keys = random_keys(N);

    group.bench_function(BenchmarkId::new("BTree", N), |b| {
        b.iter(|| {
            let mut tree = BTree::new(ORDER);
            for &key in &keys {
                tree.insert(key).unwrap();
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &key in &keys {
                set.insert(key);
            }
            set
        });
    });

    group.finish();
}

// ─── Delete Benchmarks ──────────────────────────────────────────────────────

fn bench_delete_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_random");
    let keys = random_keys(N);

    group.bench_function(BenchmarkId::new("BTree", N), |b| {
        b.iter_with_setup(
            || {
                let mut tree = BTree::new(ORDER);
                for &key in &keys {
                    tree.insert(key).unwrap();
                }
                tree
            },
            |mut tree| {
                // the LCG sequence may repeat a key; ignore the second delete
                for &key in &keys {
                    let _ = tree.delete(key);
                }
                tree
            },
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_with_setup(
            || keys.iter().copied().collect::<BTreeSet<i64>>(),
            |mut set| {
                for &key in &keys {
                    set.remove(&key);
                }
                set
            },
        );
    });

    group.finish();
}

criterion_group!(benches, bench_insert_ordered, bench_insert_random, bench_delete_random);
criterion_main!(benches);
