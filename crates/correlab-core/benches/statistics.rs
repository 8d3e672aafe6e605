use criterion::{black_box, criterion_group, criterion_main, Criterion};

use correlab_core::generator::generate_round;
use correlab_core::judge::judge_numeric;
use correlab_core::statistics::{classify_strength, correlation, regression};
use correlab_core::traits::RngSource;

fn series(n: usize) -> (Vec<f64>, Vec<f64>) {
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|x| 0.5 * x + ((x * 7.3).sin() * 10.0))
        .collect();
    (xs, ys)
}

fn bench_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation");

    for n in [10, 100, 10_000] {
        let (xs, ys) = series(n);
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| correlation(black_box(&xs), black_box(&ys)))
        });
    }

    group.finish();
}

fn bench_regression(c: &mut Criterion) {
    let (xs, ys) = series(1000);
    c.bench_function("regression n=1000", |b| {
        b.iter(|| regression(black_box(&xs), black_box(&ys)))
    });
}

fn bench_judging(c: &mut Criterion) {
    let mut group = c.benchmark_group("judging");

    group.bench_function("classify_strength", |b| {
        b.iter(|| classify_strength(black_box(-0.53)))
    });

    group.bench_function("judge_numeric", |b| {
        b.iter(|| judge_numeric(black_box(0.8), black_box(0.55)))
    });

    group.finish();
}

fn bench_round_generation(c: &mut Criterion) {
    let mut source = RngSource::seeded(Some(1));
    c.bench_function("generate_round 30 points", |b| {
        b.iter(|| generate_round(&mut source, black_box(30)))
    });
}

criterion_group!(
    benches,
    bench_correlation,
    bench_regression,
    bench_judging,
    bench_round_generation
);
criterion_main!(benches);
