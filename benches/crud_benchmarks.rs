use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::VecDeque;
use wabi_list::OSList;

const N: usize = 10_000;

// ─── Helper functions to generate index sequences ───────────────────────────

/// Returns `n` pseudo-random indices, the i-th of which is valid for a
/// sequence of length `i + offset`.
fn random_indices(n: usize, offset: usize) -> Vec<usize> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut indices = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for i in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        indices.push((x >> 33) as usize % (i + offset));
    }
    indices
}

/// Returns `n` pseudo-random indices for removing every element of a
/// sequence of length `n`, one at a time.
fn removal_indices(n: usize) -> Vec<usize> {
    let mut indices = random_indices(n, 1);
    indices.reverse();
    indices
}

// ─── Insertion ──────────────────────────────────────────────────────────────

fn bench_push_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_back");

    group.bench_function(BenchmarkId::new("OSList", N), |b| {
        b.iter(|| {
            let mut list = OSList::new();
            for i in 0..N {
                list.push_back(i);
            }
            list
        });
    });

    group.bench_function(BenchmarkId::new("VecDeque", N), |b| {
        b.iter(|| {
            let mut deque = VecDeque::new();
            for i in 0..N {
                deque.push_back(i);
            }
            deque
        });
    });

    group.finish();
}

fn bench_push_front(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_front");

    group.bench_function(BenchmarkId::new("OSList", N), |b| {
        b.iter(|| {
            let mut list = OSList::new();
            for i in 0..N {
                list.push_front(i);
            }
            list
        });
    });

    group.bench_function(BenchmarkId::new("VecDeque", N), |b| {
        b.iter(|| {
            let mut deque = VecDeque::new();
            for i in 0..N {
                deque.push_front(i);
            }
            deque
        });
    });

    group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
    let indices = random_indices(N, 1);
    let mut group = c.benchmark_group("insert_random");

    group.bench_function(BenchmarkId::new("OSList", N), |b| {
        b.iter(|| {
            let mut list = OSList::new();
            for (value, &index) in indices.iter().enumerate() {
                let pos = list.position_at(index).unwrap();
                list.insert(pos, value);
            }
            list
        });
    });

    group.bench_function(BenchmarkId::new("Vec", N), |b| {
        b.iter(|| {
            let mut vec = Vec::new();
            for (value, &index) in indices.iter().enumerate() {
                vec.insert(index, value);
            }
            vec
        });
    });

    group.bench_function(BenchmarkId::new("VecDeque", N), |b| {
        b.iter(|| {
            let mut deque = VecDeque::new();
            for (value, &index) in indices.iter().enumerate() {
                deque.insert(index, value);
            }
            deque
        });
    });

    group.finish();
}

// ─── Lookup ─────────────────────────────────────────────────────────────────

fn bench_get_random(c: &mut Criterion) {
    let indices = random_indices(N, N);
    let list: OSList<usize> = (0..N).collect();
    let vec: Vec<usize> = (0..N).collect();

    let mut group = c.benchmark_group("get_random");

    group.bench_function(BenchmarkId::new("OSList", N), |b| {
        b.iter(|| {
            let mut sum = 0usize;
            for &index in &indices {
                sum = sum.wrapping_add(list[index % N]);
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("Vec", N), |b| {
        b.iter(|| {
            let mut sum = 0usize;
            for &index in &indices {
                sum = sum.wrapping_add(vec[index % N]);
            }
            sum
        });
    });

    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let list: OSList<usize> = (0..N).collect();
    let deque: VecDeque<usize> = (0..N).collect();

    let mut group = c.benchmark_group("iterate");

    group.bench_function(BenchmarkId::new("OSList", N), |b| {
        b.iter(|| list.iter().fold(0usize, |sum, &v| sum.wrapping_add(v)));
    });

    group.bench_function(BenchmarkId::new("VecDeque", N), |b| {
        b.iter(|| deque.iter().fold(0usize, |sum, &v| sum.wrapping_add(v)));
    });

    group.finish();
}

fn bench_cursor_advance(c: &mut Criterion) {
    let list: OSList<usize> = (0..N).collect();
    let offsets = random_indices(N, N);

    let mut group = c.benchmark_group("cursor_advance");

    group.bench_function(BenchmarkId::new("OSList", N), |b| {
        b.iter(|| {
            let mut cursor = list.cursor_front();
            let mut sum = 0usize;
            for &target in &offsets {
                let offset = (target % N) as isize - cursor.index() as isize;
                cursor.advance(offset).unwrap();
                sum = sum.wrapping_add(*cursor.current().unwrap());
            }
            sum
        });
    });

    group.finish();
}

// ─── Removal ────────────────────────────────────────────────────────────────

fn bench_remove_random(c: &mut Criterion) {
    let indices = removal_indices(N);

    let mut group = c.benchmark_group("remove_random");

    group.bench_function(BenchmarkId::new("OSList", N), |b| {
        b.iter_batched(
            || (0..N).collect::<OSList<usize>>(),
            |mut list| {
                for &index in &indices {
                    list.remove(index);
                }
                list
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("Vec", N), |b| {
        b.iter_batched(
            || (0..N).collect::<Vec<usize>>(),
            |mut vec| {
                for &index in &indices {
                    vec.remove(index);
                }
                vec
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("VecDeque", N), |b| {
        b.iter_batched(
            || (0..N).collect::<VecDeque<usize>>(),
            |mut deque| {
                for &index in &indices {
                    deque.remove(index);
                }
                deque
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_pop_front(c: &mut Criterion) {
    let mut group = c.benchmark_group("pop_front");

    group.bench_function(BenchmarkId::new("OSList", N), |b| {
        b.iter_batched(
            || (0..N).collect::<OSList<usize>>(),
            |mut list| {
                while list.pop_front().is_some() {}
                list
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("VecDeque", N), |b| {
        b.iter_batched(
            || (0..N).collect::<VecDeque<usize>>(),
            |mut deque| {
                while deque.pop_front().is_some() {}
                deque
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(insert_benches, bench_push_back, bench_push_front, bench_insert_random,);

criterion_group!(lookup_benches, bench_get_random, bench_iterate, bench_cursor_advance,);

criterion_group!(remove_benches, bench_remove_random, bench_pop_front,);

criterion_main!(insert_benches, lookup_benches, remove_benches,);
