use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::VecDeque;
use std::hint::black_box;
use std::time::Instant;

use taskheap::{Deque, Heap, LargeDeque, MinOrder, Queue, SmallDeque};

// ==================== Deque Benchmarks ====================

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("deque");

    group.bench_function("push_back_pop_front", |b| {
        let mut deque: Deque<u64> = Deque::new();

        b.iter(|| {
            deque.push_back(black_box(1));
            black_box(deque.pop_front())
        });
    });

    group.bench_function("push_front_pop_back", |b| {
        let mut deque: Deque<u64> = Deque::new();

        b.iter(|| {
            deque.push_front(black_box(1));
            black_box(deque.pop_back())
        });
    });

    for count in [1_000u64, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("fill_from_empty", count),
            &count,
            |b, &count| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let mut deque: Deque<u64> = Deque::new();
                        for i in 0..count {
                            if i % 2 == 0 {
                                deque.push_back(i);
                            } else {
                                deque.push_front(i);
                            }
                        }
                        black_box(deque.len());
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

fn bench_bucket_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_size");
    const COUNT: u64 = 50_000;

    group.bench_function("small_16", |b| {
        b.iter(|| {
            let mut deque: SmallDeque<u64> = SmallDeque::new();
            for i in 0..COUNT {
                deque.push_back(i);
            }
            while let Some(item) = deque.pop_front() {
                black_box(item);
            }
        });
    });

    group.bench_function("default_64", |b| {
        b.iter(|| {
            let mut deque: Deque<u64> = Deque::new();
            for i in 0..COUNT {
                deque.push_back(i);
            }
            while let Some(item) = deque.pop_front() {
                black_box(item);
            }
        });
    });

    group.bench_function("large_256", |b| {
        b.iter(|| {
            let mut deque: LargeDeque<u64> = LargeDeque::new();
            for i in 0..COUNT {
                deque.push_back(i);
            }
            while let Some(item) = deque.pop_front() {
                black_box(item);
            }
        });
    });

    group.bench_function("std_vecdeque", |b| {
        b.iter(|| {
            let mut deque: VecDeque<u64> = VecDeque::new();
            for i in 0..COUNT {
                deque.push_back(i);
            }
            while let Some(item) = deque.pop_front() {
                black_box(item);
            }
        });
    });

    group.finish();
}

// ==================== Adapter Benchmarks ====================

fn bench_queue(c: &mut Criterion) {
    c.bench_function("queue_steady_state", |b| {
        let mut queue: Queue<u64> = (0..1024).collect();

        b.iter(|| {
            queue.enqueue(black_box(7));
            black_box(queue.dequeue())
        });
    });
}

// ==================== Heap Benchmarks ====================

fn bench_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap");

    for size in [100usize, 10_000] {
        group.bench_with_input(BenchmarkId::new("push_pop", size), &size, |b, &size| {
            let mut heap: Heap<u64> = (0..size as u64).map(|i| i * 7 % 1013).collect();
            let mut i = 0u64;

            b.iter(|| {
                i = i.wrapping_add(1);
                heap.push(black_box(i % 1013));
                black_box(heap.pop())
            });
        });

        group.bench_with_input(BenchmarkId::new("heapify", size), &size, |b, &size| {
            let data: Vec<u64> = (0..size as u64).rev().collect();

            b.iter(|| black_box(Heap::from_vec(data.clone(), MinOrder)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_push_pop,
    bench_bucket_sizes,
    bench_queue,
    bench_heap,
);

criterion_main!(benches);
