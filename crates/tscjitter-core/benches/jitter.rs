//! Sampling function benchmarks.
//!
//! Set `NUM_THREADS` to run every timed batch on that many threads at once
//! (clamped to the available parallelism). Jitter under contention differs
//! from jitter on an idle core, so both are worth timing.

use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tscjitter_core::capability::{has_rdrand, has_rdseed};
use tscjitter_core::{
    EntropyEstimate, SamplerFn, rdrand_sample, rdseed_sample, rdtsc_jitter_entropy,
    rdtscp_jitter_entropy,
};

fn num_threads() -> usize {
    let max = std::thread::available_parallelism().map_or(1, |n| n.get());
    std::env::var("NUM_THREADS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(max)
        .clamp(1, max)
}

/// Run `iters` calls of `f` split across `threads` threads; returns wall time.
fn timed<F>(iters: u64, threads: usize, f: F) -> Duration
where
    F: Fn() -> u64 + Sync,
{
    if threads == 1 {
        let start = Instant::now();
        for _ in 0..iters {
            black_box(f());
        }
        return start.elapsed();
    }

    let per_thread = iters.div_ceil(threads as u64);
    let start = Instant::now();
    std::thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                for _ in 0..per_thread {
                    black_box(f());
                }
            });
        }
    });
    start.elapsed()
}

fn bench_jitter_entropy(c: &mut Criterion) {
    let threads = num_threads();
    let functions: [(&str, SamplerFn); 2] = [
        ("rdtsc_jitter_entropy", rdtsc_jitter_entropy),
        ("rdtscp_jitter_entropy", rdtscp_jitter_entropy),
    ];
    let mut group = c.benchmark_group(format!("jitter_entropy/threads={threads}"));

    for k in (1..=9).step_by(2) {
        let Some(est) = EntropyEstimate::new(k) else {
            continue;
        };
        for (name, func) in functions {
            group.bench_with_input(BenchmarkId::new(name, k), &est, |b, &est| {
                b.iter_custom(|iters| timed(iters, threads, || func(black_box(est), false)));
            });
        }
    }
    group.finish();
}

fn bench_hardware_rng(c: &mut Criterion) {
    let threads = num_threads();
    let est = EntropyEstimate::default();
    let baselines: [(&str, SamplerFn, bool); 2] = [
        ("rdrand64", rdrand_sample, has_rdrand()),
        ("rdseed64", rdseed_sample, has_rdseed()),
    ];
    let mut group = c.benchmark_group(format!("hardware_rng/threads={threads}"));

    for (name, func, available) in baselines {
        if !available {
            continue;
        }
        group.bench_function(name, |b| {
            b.iter_custom(|iters| timed(iters, threads, || func(est, false)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_jitter_entropy, bench_hardware_rng);
criterion_main!(benches);
