// ─────────────────────────────────────────────────────────────────────
// Nawa — Readout Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for feature collection, the Jacobi eigensolver,
//! ridge readout fitting and byte decoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use nawa_engine::{NawaConfig, System};
use nawa_readout::{symmetric_eigen, FeatureCollector, ResonantTokenizer, RidgeReadout};

const DIM: usize = 16;

fn make_system() -> System {
    System::new(NawaConfig {
        dim: DIM,
        n_layers: 5,
        ..NawaConfig::default()
    })
    .expect("bench config is valid")
}

fn make_inputs(n: usize) -> Vec<(Vec<f64>, Vec<f64>)> {
    (0..n)
        .map(|t| {
            let p = t as f64 * 0.1;
            (
                (0..DIM).map(|i| (p + i as f64).sin() * 0.5).collect(),
                (0..DIM).map(|i| (p - i as f64).cos() * 0.5).collect(),
            )
        })
        .collect()
}

fn bench_collect(c: &mut Criterion) {
    let inputs = make_inputs(64);
    let collector = FeatureCollector::new(vec![0, 4]);
    c.bench_function("collect_64_steps", |b| {
        b.iter(|| {
            let mut sys = make_system();
            collector.collect(&mut sys, black_box(&inputs))
        })
    });
}

fn bench_eigen(c: &mut Criterion) {
    let n = 2 * 2 * DIM;
    let a: Vec<f64> = (0..n * n)
        .map(|k| {
            let (i, j) = (k / n, k % n);
            if i == j {
                n as f64
            } else {
                1.0 / (1.0 + i.abs_diff(j) as f64)
            }
        })
        .collect();
    c.bench_function("symmetric_eigen_64", |b| {
        b.iter(|| symmetric_eigen(black_box(&a), n))
    });
}

fn bench_fit(c: &mut Criterion) {
    let inputs = make_inputs(200);
    let collector = FeatureCollector::new(vec![0, 4]);
    let mut sys = make_system();
    let rows = collector.collect(&mut sys, &inputs);
    let targets: Vec<Vec<f64>> = inputs.iter().map(|(re, im)| vec![re[0], im[0]]).collect();
    let width = collector.feature_len(&sys);
    c.bench_function("ridge_fit_200x64", |b| {
        b.iter(|| {
            let mut r = RidgeReadout::new(width, 2, 1.0).expect("alpha is valid");
            r.fit(black_box(&rows), &targets)
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let tok = ResonantTokenizer::new(DIM);
    let seq = tok.encode_str("resonant decoding benchmark");
    c.bench_function("decode_sequence_27", |b| {
        b.iter(|| tok.decode_sequence(black_box(&seq)))
    });
}

criterion_group!(readout, bench_collect, bench_eigen, bench_fit, bench_decode,);

criterion_main!(readout);
