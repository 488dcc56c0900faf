//! Benchmarks for the per-sample hot path and whole-tick advancing.
//!
//! Run with: `cargo bench --bench synthesis`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ecg_synth::engine::{
    beat_interval, BeatQueue, RhythmScheduler, RhythmState, SchedulerParams, SynthesisContext,
    WaveformSynthesizer,
};
use ecg_synth::prelude::*;

const MODES: [(&str, RhythmMode); 4] = [
    ("sinus", RhythmMode::Sinus),
    ("afib", RhythmMode::AtrialFibrillation),
    ("vfib", RhythmMode::VentricularFibrillation),
    ("complete_block", RhythmMode::CompleteBlock),
];

// =============================================================================
// SYNTHESIS
// =============================================================================

/// One sample: gaussian sums over every beat in the window plus artifacts.
fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");
    let params = ParameterSet::default();
    let synth = WaveformSynthesizer::default();

    for (name, mode) in MODES {
        let mut scheduler = RhythmScheduler::new(SchedulerParams::default());
        let mut beats = BeatQueue::new();
        let mut rng = Random::new(42);
        let state = RhythmState {
            rate: 80.0,
            mode,
            params: &params,
        };
        scheduler.advance(5.0, &mut beats, state, &mut rng);

        let ctx = SynthesisContext {
            beats: &beats,
            atrial: scheduler.atrial(),
            params: &params,
            mode,
            alert_regions: AlertRegion::ALL.into_iter().collect(),
            noise_level: 0.02,
        };

        group.throughput(Throughput::Elements(100));
        group.bench_function(BenchmarkId::new("one_second", name), |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for i in 0..100 {
                    let t = 5.0 + f64::from(i) * 0.01;
                    sum += synth.sample(black_box(t), &ctx, &mut rng).voltage;
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

/// Scheduler refresh once the queue is already populated.
fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule");
    let params = ParameterSet::default();

    for rate in [40.0, 120.0, 300.0] {
        group.bench_with_input(BenchmarkId::new("steady_state", rate), &rate, |b, &rate| {
            let mut scheduler = RhythmScheduler::new(SchedulerParams::default());
            let mut beats = BeatQueue::new();
            let mut rng = Random::new(7);
            let mut now = 0.0;
            let step = beat_interval(rate) / 4.0;
            b.iter(|| {
                let state = RhythmState {
                    rate,
                    mode: RhythmMode::Sinus,
                    params: &params,
                };
                scheduler.advance(now, &mut beats, state, &mut rng);
                now += step;
                black_box(beats.len())
            });
        });
    }

    group.finish();
}

// =============================================================================
// MONITOR
// =============================================================================

/// Full display tick at 60 Hz, fast paper.
fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    let catalog = Arc::new(ConditionCatalog::builtin());

    for id in ["normal", "afib", "stemi_ant", "complete_block", "torsades"] {
        let params = MonitorParams {
            seed: Some(1),
            paper_speed: PaperSpeed::Fast,
            lead: Lead::V2,
            ..Default::default()
        };
        let mut monitor = Monitor::with_params(1200, Arc::clone(&catalog), params)
            .expect("default params are valid");
        monitor.set_condition(id);

        group.bench_function(BenchmarkId::new("tick_60hz", id), |b| {
            b.iter(|| black_box(monitor.advance(black_box(1.0 / 60.0))));
        });
    }

    group.finish();
}

/// Condition switch, including lead-localized resolution.
fn bench_set_condition(c: &mut Criterion) {
    let catalog = Arc::new(ConditionCatalog::builtin());
    let mut monitor = Monitor::new(600, catalog);
    let ids = ["stemi_inf", "hyperkalemia", "afib", "normal"];
    let mut i = 0;

    c.bench_function("set_condition", |b| {
        b.iter(|| {
            monitor.set_condition(black_box(ids[i % ids.len()]));
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    bench_sample,
    bench_schedule,
    bench_advance,
    bench_set_condition
);
criterion_main!(benches);
