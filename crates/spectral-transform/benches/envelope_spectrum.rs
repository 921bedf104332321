use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spectral_transform::{EnvelopeAnalyzer, OrderTracking};
use std::f64::consts::PI;

fn modulated_carrier(len: usize, fs: f64) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64 / fs;
            (1.0 + 0.3 * (2.0 * PI * 120.0 * t).sin()) * (2.0 * PI * 2800.0 * t).sin()
        })
        .collect()
}

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope_spectrum");
    for len in [1024usize, 8192, 65536] {
        let signal = modulated_carrier(len, 10000.0);
        group.bench_with_input(BenchmarkId::from_parameter(len), &signal, |b, signal| {
            let mut analyzer = EnvelopeAnalyzer::new(10000.0).unwrap();
            b.iter(|| analyzer.analyze(black_box(signal)))
        });
    }
    group.finish();
}

fn bench_order_tracking(c: &mut Criterion) {
    let amplitude = vec![0.0; 8192];
    let tracking = OrderTracking::new(0.25, 1485.0, 1500.0);
    c.bench_function("shift_frequency_8192", |b| {
        b.iter(|| tracking.shift_frequency(black_box(&amplitude)))
    });
}

criterion_group!(benches, bench_envelope, bench_order_tracking);
criterion_main!(benches);
