//! Benchmarks for the turbidity-current solver.
//!
//! Run with: `cargo bench --bench sakura_bench`
//!
//! Benchmarks the velocity predictor, the TVD face interpolation and a
//! complete short run.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sakura::solver::{BoundaryNode, FlowArray};
use sakura::time::{HeadCelerity, HeadTracker, StepContext, predict_mid_velocity};
use sakura::{
    FloodRecord, FlowConstants, PlanarBed, RunConfig, SedimentClass, run_sakura, tvd_left,
};

/// Channel filled with a uniform current over every node.
fn setup_channel(len: usize) -> (FlowArray, HeadTracker) {
    let mut state = FlowArray::new(len, 2);
    let x: Vec<f64> = (0..len).map(|i| 10.0 * i as f64).collect();
    state.set_x(&x).unwrap();
    state.set_width(&vec![100.0; len]).unwrap();
    state.set_boundary(&BoundaryNode::new(1.0, 3.0, vec![0.005, 0.005]), &BoundaryNode::zero(2));
    for i in 0..len as isize {
        state.set_u(i, 1.0);
        state.set_h(i, 3.0);
        state.c_grain_mut(i).copy_from_slice(&[0.005, 0.005]);
        state.sync_total_concentration(i);
    }
    let head = HeadTracker::at_node(&state, len - 1, HeadCelerity::Capped);
    (state, head)
}

/// Benchmark the half-step velocity predictor.
fn bench_predictor(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_mid_velocity");

    let constants = FlowConstants::default().to_model_units();
    let sediment = [SedimentClass::sand(0.002), SedimentClass::mud(1.0e-4)];
    let reduced_gravity: Vec<f64> = sediment
        .iter()
        .map(|s| s.reduced_gravity(constants.rho_sea_water))
        .collect();
    let ctx = StepContext {
        constants: &constants,
        sediment: &sediment,
        reduced_gravity: &reduced_gravity,
        dt: 1.0,
    };

    for len in [256, 2048, 16384] {
        let (prev, head) = setup_channel(len);
        let mut mid = prev.clone();
        let slopes = vec![0.01; len];

        group.bench_with_input(BenchmarkId::new("faces", len), &len, |b, _| {
            b.iter(|| predict_mid_velocity(black_box(&prev), &mut mid, &head, &slopes, &ctx));
        });
    }

    group.finish();
}

/// Benchmark the limited face interpolation.
fn bench_tvd(c: &mut Criterion) {
    let stencil = [1.0, 1.3, 2.0, 1.8, 0.4];

    c.bench_function("tvd_left", |b| {
        b.iter(|| tvd_left(black_box(0.7), black_box(&stencil), 1e-5));
    });
}

/// Benchmark a complete short run.
fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_sakura");
    group.sample_size(10);

    let sediment = [SedimentClass::sand(0.001)];
    let constants = FlowConstants::default();
    let flood = FloodRecord::new(1.0, 0.01, 2.0, 60.0, vec![1.0]);

    for len in [100, 400] {
        let config = RunConfig::uniform(len, 10.0, 50.0, 1.0);
        group.bench_with_input(BenchmarkId::new("flat_bed", len), &len, |b, _| {
            b.iter(|| {
                let mut bed = PlanarBed::flat(-100.0, 1);
                run_sakura(black_box(&config), &flood, &sediment, &constants, &mut bed)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_predictor, bench_tvd, bench_run);
criterion_main!(benches);
