// ─────────────────────────────────────────────────────────────────────
// Wavefield — Frame Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the single-point evaluator, both grid
//! strategies and a complete engine frame.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wavefield_core::{Engine, OrbitScenario};
use wavefield_physics::{probability_at, EvaluationStrategy, FieldKernel, GridMapping};
use wavefield_types::{EngineConfig, SimulationParameters};

fn params() -> SimulationParameters {
    SimulationParameters::new(80.0, 5.0, 0.9)
}

// ── probability_at() ────────────────────────────────────────────────

fn bench_point(c: &mut Criterion) {
    let landmarks = OrbitScenario::default().observations(1.3);
    let p = params();
    c.bench_function("probability_at_3lm", |b| {
        b.iter(|| probability_at(black_box([0.1, -0.2]), landmarks.as_slice(), &p))
    });
}

// ── FieldKernel::evaluate() ─────────────────────────────────────────

fn bench_grid(c: &mut Criterion) {
    let landmarks = OrbitScenario::default().observations(1.3);
    let mapping = GridMapping::new(256, 256, [0.0, 0.0], 1.0);
    let kernel = FieldKernel::new(mapping, landmarks.as_slice(), params());
    let mut out = vec![0.0; mapping.cells()];

    c.bench_function("grid_256_sequential", |b| {
        b.iter(|| kernel.evaluate(EvaluationStrategy::Sequential, black_box(&mut out)))
    });
    c.bench_function("grid_256_parallel", |b| {
        b.iter(|| kernel.evaluate(EvaluationStrategy::Parallel, black_box(&mut out)))
    });
}

// ── Engine::drive() ─────────────────────────────────────────────────

fn bench_frame(c: &mut Criterion) {
    let mut engine = Engine::with_config(EngineConfig::with_size(512, 512)).unwrap();
    let scenario = OrbitScenario::default();
    c.bench_function("frame_512", |b| b.iter(|| engine.drive(black_box(&scenario))));
}

criterion_group!(benches, bench_point, bench_grid, bench_frame);
criterion_main!(benches);
