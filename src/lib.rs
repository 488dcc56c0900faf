//! # ecg-synth - Educational ECG signal synthesis in Rust
//!
//! ecg-synth generates a continuous, physiologically plausible
//! electrocardiogram trace for teaching and visualization. It covers normal
//! sinus rhythm and a catalog of about twenty clinical conditions:
//! arrhythmias, conduction blocks, infarctions, electrolyte disturbances and
//! drug effects.
//!
//! ## Overview
//!
//! The signal pipeline runs once per display tick:
//!
//! - **Stepper**: turns wall-clock elapsed time into whole fixed-rate samples
//! - **RhythmScheduler**: keeps a rolling queue of beat instants per rhythm
//! - **WaveformSynthesizer**: sums gaussian P/Q/R/S/J/ST/T deflections
//! - **LeadTransform**: scales the voltage as seen from one of 12 leads
//! - **SignalBuffer**: stores one sample per horizontal pixel
//!
//! Conditions come from an immutable [`ConditionCatalog`] shared between
//! monitors. Rendering is left to the host application.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use ecg_synth::prelude::*;
//!
//! let catalog = Arc::new(ConditionCatalog::builtin());
//! let mut monitor = Monitor::with_params(
//!     800,
//!     Arc::clone(&catalog),
//!     MonitorParams {
//!         seed: Some(7),
//!         ..Default::default()
//!     },
//! )?;
//!
//! monitor.set_condition("afib");
//! for _ in 0..60 {
//!     monitor.advance(1.0 / 60.0);
//! }
//!
//! let y = monitor.read_sample(0).map(|s| s.vertical_position);
//! assert!(y.is_some());
//! # Ok::<(), ecg_synth::EcgError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): serialization of catalogs, parameter sets and
//!   monitor configuration (binary and JSON)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod monitor;
pub mod types;
pub mod utils;

#[cfg(feature = "serde")]
pub mod serialization;

pub use catalog::ConditionCatalog;
pub use config::MonitorParams;
pub use monitor::Monitor;

/// Re-export of commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::types::{
        AlertRegion, AlertRegions, ComponentDelta, Lead, ParameterDeltas, ParameterSet,
        RhythmMode, WaveComponent, WaveName,
    };
    pub use crate::catalog::{ConditionCatalog, ConditionProfile, ResolvedCondition};
    pub use crate::engine::{
        project_lead, BeatQueue, BeatQueueView, LeadTransform, PaperSpeed, SignalSample,
        WaveMeta,
    };
    pub use crate::config::MonitorParams;
    pub use crate::monitor::Monitor;
    pub use crate::utils::{Random, RandomSource};

    #[cfg(feature = "serde")]
    pub use crate::serialization::{Serializable, SerializableFormat};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for the library.
pub mod error {
    use thiserror::Error;

    /// Main error type for ecg-synth operations.
    #[derive(Error, Debug)]
    pub enum EcgError {
        /// Invalid parameter value.
        #[error("Invalid parameter '{name}': {message}")]
        InvalidParameter {
            /// Name of the invalid parameter.
            name: &'static str,
            /// Description of the error.
            message: String,
        },

        /// Lead code outside the 12 standard leads.
        #[error("Unknown lead: {0}")]
        UnknownLead(String),

        /// Serialization error.
        #[cfg(feature = "serde")]
        #[error("Serialization error: {message}")]
        SerializationError {
            /// Description of the serialization error.
            message: String,
        },

        /// I/O error.
        #[error("I/O error: {message}")]
        IoError {
            /// Description of the I/O error.
            message: String,
        },
    }

    /// Result type alias using EcgError.
    pub type Result<T> = std::result::Result<T, EcgError>;
}

pub use error::{EcgError, Result};
