//! Benchmarks for SortedQueue insertion, lookup and cursor walks.
//!
//! Run with: cargo bench -p agenda-collections
//!
//! Insertion is a linear scan, so sizes stay modest.

use agenda_collections::{Highest, SortedQueue};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const SIZES: [u32; 3] = [64, 512, 2048];

/// Cheap deterministic priorities with plenty of ties.
fn priority(i: u32) -> u32 {
    i.wrapping_mul(2_654_435_761) % 97
}

fn filled(n: u32) -> SortedQueue<Highest<u32, u32>> {
    let mut queue = SortedQueue::with_capacity(Highest::new(), n as usize);
    for i in 0..n {
        queue.insert(&i, &priority(i)).unwrap();
    }
    queue
}

// ============================================================================
// Insert
// ============================================================================

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for n in SIZES {
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut queue = SortedQueue::with_capacity(Highest::<u32, u32>::new(), n as usize);
            b.iter(|| {
                for i in 0..n {
                    black_box(queue.insert(&i, &priority(i))).unwrap();
                }
                queue.clear();
            });
        });
    }

    group.finish();
}

// ============================================================================
// Lookup / reposition
// ============================================================================

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains_last");

    for n in SIZES {
        let queue = filled(n);
        let last = *queue.iter().last().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(queue.contains(black_box(&last))));
        });
    }

    group.finish();
}

fn bench_remove_element(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_element");

    for n in SIZES {
        let mut queue = filled(n);
        let target = n / 2;
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let (element, priority) = queue.remove_where(|&e| e == target).unwrap();
                black_box(queue.insert_owned(element, priority)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_change_priority(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_priority");

    for n in SIZES {
        let mut queue = filled(n);
        let target = n / 2;
        let mut current = priority(target);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let next = (current + 1) % 97;
                queue.change_priority(&target, &current, &next).unwrap();
                current = next;
            });
        });
    }

    group.finish();
}

// ============================================================================
// Traversal
// ============================================================================

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    for n in SIZES {
        let mut queue = filled(n);
        group.throughput(Throughput::Elements(u64::from(n)));

        group.bench_with_input(BenchmarkId::new("iter", n), &n, |b, _| {
            b.iter(|| queue.iter().fold(0u64, |acc, &e| acc + u64::from(e)));
        });

        group.bench_with_input(BenchmarkId::new("cursor", n), &n, |b, _| {
            b.iter(|| {
                let mut acc = 0u64;
                let mut next = queue.get_first().copied();
                while let Some(e) = next {
                    acc += u64::from(e);
                    next = queue.get_next().copied();
                }
                black_box(acc)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_contains,
    bench_remove_element,
    bench_change_priority,
    bench_walk
);
criterion_main!(benches);
