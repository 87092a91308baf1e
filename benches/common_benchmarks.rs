use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use parking_lot::RwLock;
use tether_dict::OrderedDict;

type LockedIndexMap<K, V> = RwLock<indexmap::IndexMap<K, V>>;

const SIZES: &[usize] = &[10000];

fn bench_insertion_at_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion_at_end");

    for &size in SIZES {
        group.throughput(criterion::Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("tether_dict", size), &size, |b, &size| {
            b.iter(|| {
                let dict = OrderedDict::new();
                for i in 0..size {
                    dict.set(black_box(i), black_box(i * 2));
                }
                dict
            })
        });

        group.bench_with_input(
            BenchmarkId::new("tether_dict_preallocated", size),
            &size,
            |b, &size| {
                b.iter(|| {
                    let dict = OrderedDict::with_capacity(size);
                    for i in 0..size {
                        dict.set(black_box(i), black_box(i * 2));
                    }
                    dict
                })
            },
        );

        group.bench_with_input(BenchmarkId::new("indexmap", size), &size, |b, &size| {
            b.iter(|| {
                let map = LockedIndexMap::default();
                for i in 0..size {
                    map.write().insert(black_box(i), black_box(i * 2));
                }
                map
            })
        });
    }

    group.finish();
}

fn bench_remove_from_middle(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_from_middle");

    for &size in SIZES {
        group.throughput(criterion::Throughput::Elements(size as u64 / 2));

        group.bench_with_input(BenchmarkId::new("tether_dict", size), &size, |b, &size| {
            b.iter_batched(
                || (0..size).map(|i| (i, i)).collect::<OrderedDict<_, _>>(),
                |dict| {
                    for i in (size / 4)..(3 * size / 4) {
                        black_box(dict.delete(&i));
                    }
                    dict
                },
                criterion::BatchSize::LargeInput,
            )
        });

        group.bench_with_input(
            BenchmarkId::new("indexmap_shift", size),
            &size,
            |b, &size| {
                b.iter_batched(
                    || LockedIndexMap::new((0..size).map(|i| (i, i)).collect()),
                    |map| {
                        for i in (size / 4)..(3 * size / 4) {
                            black_box(map.write().shift_remove(&i));
                        }
                        map
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_move_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_to_end");

    for &size in SIZES {
        group.throughput(criterion::Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("tether_dict", size), &size, |b, &size| {
            let dict: OrderedDict<_, _> = (0..size).map(|i| (i, i)).collect();
            b.iter(|| {
                for i in (0..size).step_by(7) {
                    black_box(dict.move_to_end(&i));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("indexmap", size), &size, |b, &size| {
            let map = LockedIndexMap::new((0..size).map(|i| (i, i)).collect());
            b.iter(|| {
                for i in (0..size).step_by(7) {
                    let mut guard = map.write();
                    if let Some(index) = guard.get_index_of(&i) {
                        let last = guard.len() - 1;
                        guard.move_index(index, last);
                    }
                }
            })
        });
    }

    group.finish();
}

fn bench_random_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_access");

    for &size in SIZES {
        group.throughput(criterion::Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("tether_dict", size), &size, |b, &size| {
            let dict: OrderedDict<_, _> = (0..size).map(|i| (i, i * 2)).collect();
            b.iter(|| {
                let mut sum = 0;
                for i in (0..size).rev() {
                    sum += dict.get(&black_box(i)).unwrap_or_default();
                }
                sum
            })
        });

        group.bench_with_input(BenchmarkId::new("indexmap", size), &size, |b, &size| {
            let map = LockedIndexMap::new((0..size).map(|i| (i, i * 2)).collect());
            b.iter(|| {
                let mut sum = 0;
                for i in (0..size).rev() {
                    sum += map.read().get(&black_box(i)).copied().unwrap_or_default();
                }
                sum
            })
        });
    }

    group.finish();
}

fn bench_iteration_sparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration_sparse");

    for &size in SIZES {
        group.throughput(criterion::Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("tether_dict", size), &size, |b, &size| {
            let dict: OrderedDict<_, _> = (0..size).map(|i| (i, i * 2)).collect();
            for i in (0..size).step_by(3) {
                dict.remove(&i);
            }

            b.iter(|| {
                let mut sum = 0;
                for (key, value) in dict.iter() {
                    sum += black_box(key) + black_box(value);
                }
                sum
            })
        });

        group.bench_with_input(BenchmarkId::new("indexmap", size), &size, |b, &size| {
            let map = LockedIndexMap::new((0..size).map(|i| (i, i * 2)).collect());
            for i in (0..size).step_by(3) {
                map.write().shift_remove(&i);
            }

            b.iter(|| {
                let mut sum = 0;
                for (key, value) in map.read().iter() {
                    sum += black_box(*key) + black_box(*value);
                }
                sum
            })
        });
    }

    group.finish();
}

fn bench_contended_writers(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_writers");
    let threads = 4;

    for &size in SIZES {
        group.throughput(criterion::Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("tether_dict", size), &size, |b, &size| {
            b.iter(|| {
                let dict = Arc::new(OrderedDict::with_capacity(size));
                let per_thread = size / threads;
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let dict = Arc::clone(&dict);
                        thread::spawn(move || {
                            for i in 0..per_thread {
                                let key = t * per_thread + i;
                                dict.set(key, i);
                                if i % 4 == 0 {
                                    dict.move_to_start(&key);
                                }
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
                dict
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insertion_at_end,
    bench_remove_from_middle,
    bench_move_to_end,
    bench_random_access,
    bench_iteration_sparse,
    bench_contended_writers,
);
criterion_main!(benches);
