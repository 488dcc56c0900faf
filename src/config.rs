//! Monitor configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::{PaperSpeed, SchedulerParams, SynthParams};
use crate::error::{EcgError, Result};
use crate::types::Lead;

/// Lowest accepted heart rate, beats per minute.
pub const MIN_RATE: f64 = 1.0;

/// Highest accepted heart rate, beats per minute.
pub const MAX_RATE: f64 = 400.0;

/// Parameters for creating a [`Monitor`](crate::Monitor).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorParams {
    /// Starting heart rate (current and target), beats per minute.
    pub initial_rate: f64,

    /// Default peak-to-peak noise, restored on every condition switch.
    pub noise_level: f64,

    /// Initial paper speed.
    pub paper_speed: PaperSpeed,

    /// Vertical pixel position of 0 mV.
    pub baseline: f64,

    /// Pixels per millivolt before zoom.
    pub pixels_per_millivolt: f64,

    /// Initial amplitude zoom.
    pub amplitude_zoom: f64,

    /// Largest elapsed time honored by a single `advance`, in seconds.
    pub max_elapsed: f64,

    /// Scheduler lookahead, in seconds.
    pub lookahead: f64,

    /// Scheduler history, in seconds.
    pub history: f64,

    /// Annotation retention, in seconds.
    pub annotation_retention: f64,

    /// Independent atrial rate under complete block, beats per minute.
    pub atrial_rate: f64,

    /// Synthesis contribution radius around each beat, in seconds.
    pub beat_window: f64,

    /// Fixed seed for reproducible output; `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Initial lead.
    pub lead: Lead,
}

impl Default for MonitorParams {
    fn default() -> Self {
        Self {
            initial_rate: 72.0,
            noise_level: 0.02,
            paper_speed: PaperSpeed::Standard,
            baseline: 100.0,
            pixels_per_millivolt: 40.0,
            amplitude_zoom: 1.0,
            max_elapsed: 0.1,
            lookahead: 2.0,
            history: 4.0,
            annotation_retention: 5.0,
            atrial_rate: 75.0,
            beat_window: 1.0,
            seed: None,
            lead: Lead::II,
        }
    }
}

impl MonitorParams {
    /// Checks every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<()> {
        rate("initial_rate", self.initial_rate)?;
        positive("pixels_per_millivolt", self.pixels_per_millivolt)?;
        positive("amplitude_zoom", self.amplitude_zoom)?;
        positive("max_elapsed", self.max_elapsed)?;
        positive("lookahead", self.lookahead)?;
        positive("history", self.history)?;
        positive("annotation_retention", self.annotation_retention)?;
        rate("atrial_rate", self.atrial_rate)?;
        positive("beat_window", self.beat_window)?;

        if !(0.0..=1.0).contains(&self.noise_level) {
            return Err(EcgError::InvalidParameter {
                name: "noise_level",
                message: format!("{} is outside [0, 1]", self.noise_level),
            });
        }
        if !self.baseline.is_finite() {
            return Err(EcgError::InvalidParameter {
                name: "baseline",
                message: "Must be finite".to_string(),
            });
        }
        Ok(())
    }

    /// Scheduler horizons derived from these parameters.
    pub fn scheduler_params(&self) -> SchedulerParams {
        SchedulerParams {
            lookahead: self.lookahead,
            history: self.history,
            annotation_retention: self.annotation_retention,
            atrial_rate: self.atrial_rate,
        }
    }

    /// Synthesizer tuning derived from these parameters.
    pub fn synth_params(&self) -> SynthParams {
        SynthParams {
            beat_window: self.beat_window,
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EcgError::InvalidParameter {
            name,
            message: format!("{value} must be finite and > 0"),
        })
    }
}

fn rate(name: &'static str, value: f64) -> Result<()> {
    if (MIN_RATE..=MAX_RATE).contains(&value) {
        Ok(())
    } else {
        Err(EcgError::InvalidParameter {
            name,
            message: format!("{value} is outside [{MIN_RATE}, {MAX_RATE}] bpm"),
        })
    }
}
