//! Signal-generation pipeline.
//!
//! - [`scheduler`]: beat queues per rhythm mode
//! - [`synth`]: gaussian morphology and rhythm artifacts
//! - [`lead`]: per-lead projection
//! - [`stepper`]: fixed-rate simulation clock
//! - [`buffer`]: circular sample store

pub mod buffer;
pub mod lead;
pub mod scheduler;
pub mod stepper;
pub mod synth;

pub use buffer::{SignalBuffer, SignalSample};
pub use lead::{project_lead, LeadTransform};
pub use scheduler::{
    beat_interval, BeatQueue, BeatQueueView, BeatQueueWriter, RhythmScheduler, RhythmState,
    SchedulerParams, WaveMeta,
};
pub use stepper::{PaperSpeed, StepPlan, Stepper};
pub use synth::{SynthParams, Synthesized, SynthesisContext, WaveformSynthesizer};
