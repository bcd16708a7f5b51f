use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::{Duration, Instant};

use taskheap::{ManualDriver, Scheduler, TaskId};

// ==================== Helpers ====================

type BenchScheduler = Scheduler<ManualDriver>;

fn bench_scheduler() -> BenchScheduler {
    Scheduler::with_driver(ManualDriver::new())
}

fn noop(_: &mut BenchScheduler) -> anyhow::Result<()> {
    Ok(())
}

// ==================== Schedule Benchmarks ====================

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule");

    group.bench_function("timeout_then_clear", |b| {
        let mut scheduler = bench_scheduler();

        b.iter(|| {
            let id = scheduler.set_timeout(noop, Duration::from_millis(100));
            black_box(scheduler.clear_timeout(id))
        });
    });

    group.bench_function("spread_delays", |b| {
        b.iter_custom(|iters| {
            let mut scheduler = bench_scheduler();
            let start = Instant::now();

            for i in 0..iters {
                let delay = 10 + (i % 990);
                black_box(scheduler.set_timeout(noop, Duration::from_millis(delay)));
            }

            start.elapsed()
        });
    });

    group.finish();
}

// ==================== Fire Benchmarks ====================

fn bench_fire(c: &mut Criterion) {
    let mut group = c.benchmark_group("fire");

    for pending in [10u64, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("oneshot_drain", pending),
            &pending,
            |b, &pending| {
                b.iter_custom(|iters| {
                    let mut total = Duration::ZERO;

                    for _ in 0..iters {
                        let mut scheduler = bench_scheduler();
                        for i in 0..pending {
                            scheduler.set_timeout(noop, Duration::from_millis(1 + i % 500));
                        }

                        let start = Instant::now();
                        black_box(scheduler.run());
                        total += start.elapsed();
                    }

                    total
                });
            },
        );
    }

    group.bench_function("interval_tick", |b| {
        let mut scheduler = bench_scheduler();
        for period in 1..=64 {
            scheduler.set_interval(noop, Duration::from_millis(period));
        }

        b.iter(|| black_box(scheduler.run_for(Duration::from_millis(1))));
    });

    group.finish();
}

// ==================== Cancellation Benchmarks ====================

fn bench_tombstones(c: &mut Criterion) {
    c.bench_function("tombstone_heavy_drain", |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;

            for _ in 0..iters {
                let mut scheduler = bench_scheduler();
                let ids: Vec<TaskId> = (0..1_000u64)
                    .map(|i| scheduler.set_timeout(noop, Duration::from_millis(1 + i)))
                    .collect();
                // Cancel 90%
                for (i, id) in ids.into_iter().enumerate() {
                    if i % 10 != 0 {
                        scheduler.cancel(id);
                    }
                }

                let start = Instant::now();
                black_box(scheduler.run());
                total += start.elapsed();
            }

            total
        });
    });
}

criterion_group!(benches, bench_schedule, bench_fire, bench_tombstones);

criterion_main!(benches);
