//! Apportionment benchmarks — division-scale and full-roster-scale inputs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swimsampler_core::apportion::apportion;

fn division_scale(c: &mut Criterion) {
    // Four divisions, realistic population weights.
    let weights = [4800usize, 2100, 1900, 1400];
    c.bench_function("apportion/divisions", |b| {
        b.iter(|| apportion(black_box(&weights), black_box(1000), black_box(10), None))
    });
}

fn team_scale(c: &mut Criterion) {
    // A large division's worth of teams with capacities.
    let weights: Vec<usize> = (0..200).map(|i| 15 + (i * 7) % 30).collect();
    let caps = weights.clone();
    c.bench_function("apportion/teams", |b| {
        b.iter(|| {
            apportion(
                black_box(&weights),
                black_box(250),
                black_box(0),
                Some(black_box(&caps)),
            )
        })
    });
}

criterion_group!(benches, division_scale, team_scale);
criterion_main!(benches);
