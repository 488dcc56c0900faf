//! Instantaneous voltage synthesis from scheduled beats.
//!
//! Each beat within [`SynthParams::beat_window`] of the sample time
//! contributes a sum of gaussian deflections. Rhythm modes suppress some
//! components and add a baseline artifact (fibrillatory, flutter, torsades
//! or ventricular fibrillation activity) on top.

use std::f64::consts::TAU;

use crate::engine::scheduler::BeatQueue;
use crate::types::{gaussian, AlertRegions, ParameterSet, RhythmMode, WaveName};
use crate::utils::RandomSource;

/// ST amplitude magnitude above which the segment is drawn twice as wide.
pub const WIDE_ST_THRESHOLD: f64 = 0.2;

/// Synthesizer tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    /// Beats farther than this from the sample time are ignored, in seconds.
    pub beat_window: f64,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self { beat_window: 1.0 }
    }
}

/// Everything a sample depends on besides time and randomness.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    /// Ventricular beats.
    pub beats: &'a BeatQueue,
    /// Independent atrial beats (complete block only).
    pub atrial: &'a BeatQueue,
    /// Active shapes.
    pub params: &'a ParameterSet,
    /// Active rhythm.
    pub mode: RhythmMode,
    /// Enabled alert regions.
    pub alert_regions: AlertRegions,
    /// Peak-to-peak uniform noise, in mV.
    pub noise_level: f64,
}

/// One synthesized value before lead projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Synthesized {
    /// Voltage in mV.
    pub voltage: f64,
    /// Whether the sample falls in an enabled alert region.
    pub alert: bool,
}

/// Maps simulation time and beat queues to voltage.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveformSynthesizer {
    params: SynthParams,
}

impl WaveformSynthesizer {
    /// Creates a synthesizer.
    pub fn new(params: SynthParams) -> Self {
        Self { params }
    }

    /// Synthesizer tuning.
    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    /// Voltage and alert flag at simulation time `t`.
    pub fn sample(
        &self,
        t: f64,
        ctx: &SynthesisContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Synthesized {
        let window = self.params.beat_window;
        let mut voltage = 0.0;
        let mut alert = false;

        for beat in ctx.beats.near(t, window) {
            let dt = t - beat;
            voltage += beat_morphology(dt, ctx.params, ctx.mode);
            alert = alert || ctx.alert_regions.iter().any(|region| region.contains(dt, ctx.params));
        }

        if ctx.mode.has_independent_atria() {
            voltage += ctx
                .atrial
                .near(t, window)
                .map(|beat| ctx.params.p.evaluate(t - beat))
                .sum::<f64>();
        }

        voltage += baseline_artifact(t, ctx.mode, rng);
        if ctx.noise_level > 0.0 {
            voltage += (rng.next_unit() - 0.5) * ctx.noise_level;
        }

        Synthesized { voltage, alert }
    }
}

/// Contribution of one beat `dt` seconds after its fiducial instant.
pub fn beat_morphology(dt: f64, params: &ParameterSet, mode: RhythmMode) -> f64 {
    WaveName::ALL
        .iter()
        .filter(|&&name| mode.shows(name))
        .map(|&name| {
            let component = params.get(name);
            let width = if name == WaveName::St && component.amplitude.abs() > WIDE_ST_THRESHOLD {
                component.width * 2.0
            } else {
                component.width
            };
            gaussian(dt, component.offset, width, component.amplitude)
        })
        .sum()
}

/// Rhythm-specific activity independent of individual beats.
pub fn baseline_artifact(t: f64, mode: RhythmMode, rng: &mut dyn RandomSource) -> f64 {
    match mode {
        RhythmMode::Torsades => 1.5 * (25.0 * t).sin() * (3.0 * t).sin(),
        RhythmMode::AtrialFibrillation => {
            0.05 * (45.0 * t).sin() + (rng.next_unit() - 0.5) * 0.03
        }
        RhythmMode::AtrialFlutter => {
            0.15 * (TAU * 5.0 * t).sin() + 0.05 * (TAU * 10.0 * t).sin()
        }
        RhythmMode::VentricularFibrillation => 0.4 * (20.0 * t).sin() + 0.3 * (15.0 * t).sin(),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlertRegion;
    use crate::utils::Random;

    fn queue(times: &[f64]) -> BeatQueue {
        let mut q = BeatQueue::new();
        for &t in times {
            q.push(t);
        }
        q
    }

    fn context<'a>(
        beats: &'a BeatQueue,
        atrial: &'a BeatQueue,
        params: &'a ParameterSet,
        mode: RhythmMode,
    ) -> SynthesisContext<'a> {
        SynthesisContext {
            beats,
            atrial,
            params,
            mode,
            alert_regions: AlertRegions::empty(),
            noise_level: 0.0,
        }
    }

    #[test]
    fn test_r_peak_dominates_at_beat_instant() {
        let beats = queue(&[1.0]);
        let atrial = BeatQueue::new();
        let params = ParameterSet::default();
        let synth = WaveformSynthesizer::default();
        let ctx = context(&beats, &atrial, &params, RhythmMode::Sinus);
        let mut rng = Random::new(0);

        let peak = synth.sample(1.0, &ctx, &mut rng).voltage;
        assert!((peak - 1.0).abs() < 0.05, "peak {peak}");
        let t_wave = synth.sample(1.3, &ctx, &mut rng).voltage;
        assert!((t_wave - 0.3).abs() < 0.01);
    }

    #[test]
    fn test_beats_outside_window_are_ignored() {
        let beats = queue(&[0.0]);
        let atrial = BeatQueue::new();
        let mut params = ParameterSet::default();
        params.t.width = 5.0;
        let synth = WaveformSynthesizer::default();
        let ctx = context(&beats, &atrial, &params, RhythmMode::Sinus);

        assert_eq!(synth.sample(1.01, &ctx, &mut Random::new(0)).voltage, 0.0);
        assert!(synth.sample(0.99, &ctx, &mut Random::new(0)).voltage > 0.0);
    }

    #[test]
    fn test_vf_has_no_qrs_or_t() {
        let beats = queue(&[0.5, 1.0, 1.5]);
        let atrial = BeatQueue::new();
        let params = ParameterSet::default();
        let synth = WaveformSynthesizer::default();
        let ctx = context(&beats, &atrial, &params, RhythmMode::VentricularFibrillation);
        let mut rng = Random::new(0);

        for i in 0..200 {
            let t = i as f64 * 0.01;
            let v = synth.sample(t, &ctx, &mut rng).voltage;
            let expected = 0.4 * (20.0 * t).sin() + 0.3 * (15.0 * t).sin();
            assert!((v - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_p_suppressed_when_atria_dissociated() {
        let params = ParameterSet::default();
        let p_time = params.p.offset;
        assert!(beat_morphology(p_time, &params, RhythmMode::Sinus) > 0.1);
        assert!(beat_morphology(p_time, &params, RhythmMode::CompleteBlock).abs() < 1e-3);
    }

    #[test]
    fn test_complete_block_sums_atrial_p_waves() {
        let beats = BeatQueue::new();
        let atrial = queue(&[1.0]);
        let params = ParameterSet::default();
        let synth = WaveformSynthesizer::default();
        let ctx = context(&beats, &atrial, &params, RhythmMode::CompleteBlock);

        let t = 1.0 + params.p.offset;
        let v = synth.sample(t, &ctx, &mut Random::new(0)).voltage;
        assert!((v - params.p.amplitude).abs() < 1e-12);

        let sinus = context(&beats, &atrial, &params, RhythmMode::Sinus);
        assert_eq!(synth.sample(t, &sinus, &mut Random::new(0)).voltage, 0.0);
    }

    #[test]
    fn test_large_st_is_wider() {
        let mut params = ParameterSet::default();
        params.p.amplitude = 0.0;
        params.q.amplitude = 0.0;
        params.r.amplitude = 0.0;
        params.s.amplitude = 0.0;
        params.t.amplitude = 0.0;

        let at = params.st.offset + params.st.width * 1.5;
        params.st.amplitude = 0.2;
        let narrow = beat_morphology(at, &params, RhythmMode::Sinus) / 0.2;
        params.st.amplitude = 0.5;
        let wide = beat_morphology(at, &params, RhythmMode::Sinus) / 0.5;
        assert!(wide > narrow + 0.2);
    }

    #[test]
    fn test_alert_follows_enabled_regions() {
        let beats = queue(&[1.0]);
        let atrial = BeatQueue::new();
        let params = ParameterSet::default();
        let synth = WaveformSynthesizer::default();
        let mut ctx = context(&beats, &atrial, &params, RhythmMode::Sinus);
        let mut rng = Random::new(0);

        assert!(!synth.sample(1.1, &ctx, &mut rng).alert);
        ctx.alert_regions.insert(AlertRegion::St);
        assert!(synth.sample(1.1, &ctx, &mut rng).alert);
        assert!(!synth.sample(1.0, &ctx, &mut rng).alert);
        ctx.alert_regions.insert(AlertRegion::Qrs);
        assert!(synth.sample(1.0, &ctx, &mut rng).alert);
    }

    #[test]
    fn test_noise_is_bounded() {
        let beats = BeatQueue::new();
        let atrial = BeatQueue::new();
        let params = ParameterSet::default();
        let synth = WaveformSynthesizer::default();
        let mut ctx = context(&beats, &atrial, &params, RhythmMode::Sinus);
        ctx.noise_level = 0.2;
        let mut rng = Random::new(8);

        for i in 0..1000 {
            let v = synth.sample(i as f64 * 0.01, &ctx, &mut rng).voltage;
            assert!(v.abs() <= 0.1);
        }
    }

    #[test]
    fn test_artifacts_per_mode() {
        let mut rng = Random::new(0);
        assert_eq!(baseline_artifact(0.7, RhythmMode::Sinus, &mut rng), 0.0);
        assert_eq!(baseline_artifact(0.7, RhythmMode::Mobitz2Block, &mut rng), 0.0);
        let torsades = baseline_artifact(0.1, RhythmMode::Torsades, &mut rng);
        assert!((torsades - 1.5 * 2.5f64.sin() * 0.3f64.sin()).abs() < 1e-12);
        for i in 0..100 {
            let af = baseline_artifact(i as f64 * 0.013, RhythmMode::AtrialFibrillation, &mut rng);
            assert!(af.abs() <= 0.05 + 0.015);
        }
        let flutter = baseline_artifact(0.05, RhythmMode::AtrialFlutter, &mut rng);
        assert!((flutter - 0.15).abs() < 1e-9);
    }
}
