//! Core value types for ECG synthesis.
//!
//! This module holds the deflection shapes and parameter sets, the rhythm
//! modes with their alert regions, and the lead enumeration.

mod lead;
mod rhythm;
mod wave;

pub use lead::Lead;
pub use rhythm::{AlertRegion, AlertRegions, RhythmMode};
pub use wave::{gaussian, ComponentDelta, ParameterDeltas, ParameterSet, WaveComponent, WaveName};
