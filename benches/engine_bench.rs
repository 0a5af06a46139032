//! Criterion benchmarks for the generational engine.
//!
//! ZeroCount measures raw loop overhead (trivial operators); N-Queens adds
//! permutation operators and the local-search hook.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use genloop::ga::{roulette, EngineConfig, GaEngine, SelectionMethod};
use genloop::problems::{NQueens, ZeroCount};
use genloop::random::RandomStream;

fn bench_zero_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("zero_count");
    group.sample_size(10);

    for (len, pop, gen) in [(32usize, 50usize, 50usize), (128, 100, 50), (512, 100, 20)] {
        let config = EngineConfig::new(42, pop, 0.05, 0.9);
        group.bench_with_input(
            BenchmarkId::new(format!("l{len}_p{pop}_g{gen}"), len),
            &config,
            |b, config| {
                b.iter(|| {
                    let mut engine =
                        GaEngine::new(ZeroCount::new(len, gen), config.clone()).unwrap();
                    let ranked = engine
                        .start(true, SelectionMethod::DeterministicTournament, None)
                        .unwrap();
                    black_box(ranked)
                })
            },
        );
    }
    group.finish();
}

fn bench_n_queens(c: &mut Criterion) {
    let mut group = c.benchmark_group("n_queens");
    group.sample_size(10);

    for &n in &[8usize, 16, 32] {
        for hybrid in [false, true] {
            let id = if hybrid { "hybrid" } else { "plain" };
            group.bench_with_input(BenchmarkId::new(id, n), &n, |b, &n| {
                b.iter(|| {
                    let config = EngineConfig::new(42, 60, 0.1, 0.9);
                    let mut engine = NQueens::new(n, 50)
                        .unwrap()
                        .into_engine(config, hybrid)
                        .unwrap();
                    let ranked = engine
                        .start(true, SelectionMethod::ProbabilisticTournament, None)
                        .unwrap();
                    black_box(ranked)
                })
            });
        }
    }
    group.finish();
}

fn bench_roulette(c: &mut Criterion) {
    let mut group = c.benchmark_group("roulette");

    for &n in &[100usize, 1_000, 10_000] {
        let fitness: Vec<f64> = (0..n).map(|i| (i % 17) as f64 + 1.0).collect();
        let mut rng = RandomStream::new(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &fitness, |b, f| {
            b.iter(|| black_box(roulette(black_box(f), &mut rng)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_zero_count, bench_n_queens, bench_roulette);
criterion_main!(benches);
