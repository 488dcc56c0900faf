//! Fixed-rate simulation clock.
//!
//! Wall-clock time arrives in irregular chunks; the [`Stepper`] turns it into
//! a whole number of fixed-duration samples at the paper speed's sample
//! rate, carrying the remainder to the next call. One sample is one pixel,
//! so the trace scrolls at the same speed on any display refresh rate.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EcgError, Result};

/// Rate convergence gain, per second.
pub const RATE_CONVERGENCE_GAIN: f64 = 2.0;

/// Distance from the target (beats per minute) at which the rate snaps.
pub const RATE_SNAP_THRESHOLD: f64 = 1.0;

/// Display scroll speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaperSpeed {
    /// 25 mm/s, 100 samples per second.
    #[default]
    Standard,
    /// 50 mm/s, 200 samples per second.
    Fast,
}

impl PaperSpeed {
    /// Millimeters per second.
    pub fn mm_per_second(&self) -> u32 {
        match self {
            PaperSpeed::Standard => 25,
            PaperSpeed::Fast => 50,
        }
    }

    /// Samples (pixels) produced per simulated second.
    pub fn samples_per_second(&self) -> f64 {
        match self {
            PaperSpeed::Standard => 100.0,
            PaperSpeed::Fast => 200.0,
        }
    }

    /// Simulated seconds per sample.
    pub fn sample_period(&self) -> f64 {
        1.0 / self.samples_per_second()
    }
}

impl TryFrom<u32> for PaperSpeed {
    type Error = EcgError;

    fn try_from(mm_per_second: u32) -> Result<Self> {
        match mm_per_second {
            25 => Ok(PaperSpeed::Standard),
            50 => Ok(PaperSpeed::Fast),
            other => Err(EcgError::InvalidParameter {
                name: "paper_speed",
                message: format!("{other} mm/s is not supported, expected 25 or 50"),
            }),
        }
    }
}

/// Result of feeding elapsed time to the stepper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    /// Whole samples to produce now.
    pub steps: usize,
    /// Elapsed time after clamping, in seconds.
    pub elapsed: f64,
    /// Simulated seconds per step.
    pub period: f64,
}

/// Simulation clock with an elapsed-time accumulator and rate smoothing.
#[derive(Debug, Clone)]
pub struct Stepper {
    time: f64,
    accumulator: f64,
    max_elapsed: f64,
    current_rate: f64,
    target_rate: f64,
}

impl Stepper {
    /// Creates a clock at time zero running at `rate` beats per minute.
    pub fn new(rate: f64, max_elapsed: f64) -> Self {
        Self {
            time: 0.0,
            accumulator: 0.0,
            max_elapsed,
            current_rate: rate,
            target_rate: rate,
        }
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Simulation time plus the not-yet-stepped remainder.
    pub fn horizon(&self) -> f64 {
        self.time + self.accumulator
    }

    /// Unspent elapsed time.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Heart rate currently used for scheduling.
    pub fn current_rate(&self) -> f64 {
        self.current_rate
    }

    /// Heart rate the current rate converges toward.
    pub fn target_rate(&self) -> f64 {
        self.target_rate
    }

    /// Sets the convergence target.
    pub fn set_target_rate(&mut self, rate: f64) {
        self.target_rate = rate;
    }

    /// Adds `elapsed` (clamped) to the accumulator and withdraws the whole
    /// number of samples it now covers.
    pub fn plan(&mut self, elapsed: f64, speed: PaperSpeed) -> StepPlan {
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, self.max_elapsed)
        } else {
            0.0
        };
        let period = speed.sample_period();
        self.accumulator += elapsed;

        let steps = (self.accumulator * speed.samples_per_second()).floor() as usize;
        self.accumulator = (self.accumulator - steps as f64 * period).max(0.0);

        StepPlan {
            steps,
            elapsed,
            period,
        }
    }

    /// Advances simulation time by one sample period and returns the new time.
    pub fn step(&mut self, period: f64) -> f64 {
        self.time += period;
        self.time
    }

    /// Moves the current rate toward the target; snaps once within one beat per minute.
    pub fn converge_rate(&mut self, elapsed: f64) {
        let gain = (elapsed * RATE_CONVERGENCE_GAIN).clamp(0.0, 1.0);
        self.current_rate += (self.target_rate - self.current_rate) * gain;
        if (self.target_rate - self.current_rate).abs() < RATE_SNAP_THRESHOLD {
            self.current_rate = self.target_rate;
        }
    }
}
