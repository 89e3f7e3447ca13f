use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lowpass_core::prelude::*;

const SR: f64 = 48_000.0;

fn held_parameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_in_place/held");
    for block_len in [64_usize, 256, 1024] {
        let mut engine = FilterEngine::new();
        let mut block = vec![0.25_f32; block_len];
        let params = FilterParameters::new(1_000.0, 6.0);
        group.bench_with_input(BenchmarkId::from_parameter(block_len), &block_len, |b, _| {
            b.iter(|| engine.process_in_place(black_box(&mut block), SR, params));
        });
    }
    group.finish();
}

fn moving_cutoff(c: &mut Criterion) {
    let mut engine = FilterEngine::new();
    let mut block = vec![0.25_f32; 256];
    let mut cutoff = 20.0_f32;
    c.bench_function("process_in_place/moving_cutoff_256", |b| {
        b.iter(|| {
            cutoff = if cutoff > 19_000.0 { 20.0 } else { cutoff * 1.01 };
            engine.process_in_place(black_box(&mut block), SR, FilterParameters::new(cutoff, 6.0));
        });
    });
}

fn response_curve(c: &mut Criterion) {
    let coeffs = calculate(1_000.0 * 2.0 / SR, 6.0);
    let mut curve = [Response::default(); NUM_RESPONSE_FREQUENCIES];
    c.bench_function("fill_response/512", |b| {
        b.iter(|| fill_response(black_box(&coeffs), SR, &mut curve));
    });
}

criterion_group!(benches, held_parameters, moving_cutoff, response_curve);
criterion_main!(benches);
