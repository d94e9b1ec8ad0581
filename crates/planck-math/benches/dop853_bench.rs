use criterion::{criterion_group, criterion_main, Criterion};
use planck_math::dop853::{solve, Dop853Options, FnSystem};
use std::hint::black_box;

fn bench_oscillator(c: &mut Criterion) {
    let sys = FnSystem(|_t: f64, y: &[f64; 2]| [y[1], -y[0]]);
    let opts = Dop853Options {
        rtol: 1e-10,
        atol: 1e-12,
        ..Dop853Options::default()
    };

    c.bench_function("dop853_oscillator_10_periods", |b| {
        b.iter(|| {
            let sol = solve(&sys, (0.0, 20.0 * std::f64::consts::PI), [1.0, 0.0], &opts);
            black_box(sol.map(|s| s.n_accepted).unwrap_or(0));
        })
    });
}

fn bench_stiffish_decay(c: &mut Criterion) {
    let sys = FnSystem(|_t: f64, y: &[f64; 4]| [-y[0], -10.0 * y[1], -100.0 * y[2], -y[3] * y[3]]);
    let opts = Dop853Options::default();

    let mut group = c.benchmark_group("dop853_decay");
    group.sample_size(20);
    group.bench_function("four_rates", |b| {
        b.iter(|| {
            let sol = solve(&sys, (0.0, 10.0), [1.0; 4], &opts);
            black_box(sol.map(|s| s.n_evaluations).unwrap_or(0));
        })
    });
    group.finish();
}

criterion_group!(benches, bench_oscillator, bench_stiffish_decay);
criterion_main!(benches);
