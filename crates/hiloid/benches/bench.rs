use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use hiloid::{GeneratorConfig, HiLoGenerator, Lease, NoopLogger, Result};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

type Generator = HiLoGenerator<NoopLogger>;

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn loaded(config: GeneratorConfig) -> Generator {
    let generator = Generator::new(config);
    generator
        .load_epoch(|| Ok::<_, hiloid::BoxError>(Lease::new(1)))
        .expect("fixed epoch is valid");
    generator
}

fn plain() -> Generator {
    loaded(GeneratorConfig::new("bench"))
}

fn obfuscated() -> Generator {
    loaded(
        GeneratorConfig::builder("bench")
            .obfuscation(0x5eed)
            .build()
            .expect("valid config"),
    )
}

fn floored() -> Generator {
    loaded(
        GeneratorConfig::builder("bench")
            .step(1024, 659)
            .obfuscation(0x5eed)
            .build()
            .expect("valid config"),
    )
}

/// Benchmarks a single caller issuing IDs back to back.
fn bench_sequential(c: &mut Criterion, group_name: &str, generator_fn: impl Fn() -> Generator) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_fn();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one generator shared by an increasing number of threads.
fn bench_contended(c: &mut Criterion, group_name: &str, generator_fn: impl Fn() -> Generator) {
    let mut group = c.benchmark_group(group_name);
    let max_threads = num_cpus::get().clamp(1, 16);

    for thread_count in [1, 2, 4, 8, 16].into_iter().filter(|&n| n <= max_threads) {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_IDS, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator = generator_fn();
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = generator.clone();
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        black_box(generator.next());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

/// Benchmarks the fallible path, which callers use to shed load instead of
/// panicking.
fn bench_try_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("try_next");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = plain();
                for _ in 0..TOTAL_IDS {
                    let id: Result<i64> = generator.try_next();
                    black_box(id.ok());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

fn benchmark_sequential_plain(c: &mut Criterion) {
    bench_sequential(c, "sequential/plain", plain);
}

fn benchmark_sequential_obfuscated(c: &mut Criterion) {
    bench_sequential(c, "sequential/obfuscated", obfuscated);
}

fn benchmark_sequential_floored(c: &mut Criterion) {
    bench_sequential(c, "sequential/floored", floored);
}

fn benchmark_contended_plain(c: &mut Criterion) {
    bench_contended(c, "contended/plain", plain);
}

fn benchmark_contended_floored(c: &mut Criterion) {
    bench_contended(c, "contended/floored", floored);
}

criterion_group!(
    benches,
    benchmark_sequential_plain,
    benchmark_sequential_obfuscated,
    benchmark_sequential_floored,
    benchmark_contended_plain,
    benchmark_contended_floored,
    bench_try_next,
);
criterion_main!(benches);
