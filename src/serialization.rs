//! Saving and loading catalogs and monitor configuration.
//!
//! With the `serde` feature every data type in the crate (condition
//! catalogs, profiles, parameter sets, [`MonitorParams`](crate::MonitorParams),
//! the seeded [`Random`](crate::utils::Random)) implements `Serialize` and
//! `Deserialize`, and picks up the [`Serializable`] helpers below. Rendered
//! traces are never persisted.
//!
//! # Supported Formats
//!
//! - **Binary** - compact bincode encoding (default)
//! - **JSON** - human-editable, handy for custom condition tables
//!
//! # Example
//!
//! ```rust
//! use ecg_synth::catalog::ConditionCatalog;
//! use ecg_synth::serialization::{Serializable, SerializableFormat};
//!
//! let catalog = ConditionCatalog::builtin();
//! let json = catalog.to_json()?;
//! let restored = ConditionCatalog::from_json(&json)?;
//! assert_eq!(restored.len(), catalog.len());
//!
//! let bytes = catalog.to_bytes(SerializableFormat::Binary)?;
//! let restored = ConditionCatalog::from_bytes(&bytes, SerializableFormat::Binary)?;
//! assert!(restored.contains("stemi_ant"));
//! # Ok::<(), ecg_synth::EcgError>(())
//! ```

use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::{EcgError, Result};

/// Serialization format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerializableFormat {
    /// Compact bincode encoding.
    #[default]
    Binary,

    /// Human-readable JSON.
    Json,
}

impl SerializableFormat {
    /// Infers the format from a file extension: `.json` (any case) is JSON,
    /// everything else binary.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SerializableFormat::Json,
            _ => SerializableFormat::Binary,
        }
    }
}

impl std::fmt::Display for SerializableFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializableFormat::Binary => write!(f, "BINARY"),
            SerializableFormat::Json => write!(f, "JSON"),
        }
    }
}

impl std::str::FromStr for SerializableFormat {
    type Err = EcgError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "BINARY" | "BIN" => Ok(SerializableFormat::Binary),
            "JSON" => Ok(SerializableFormat::Json),
            _ => Err(EcgError::InvalidParameter {
                name: "format",
                message: format!("Unknown format '{s}'. Expected: BINARY, JSON"),
            }),
        }
    }
}

fn encode_error(format: SerializableFormat, e: impl Display) -> EcgError {
    EcgError::SerializationError {
        message: format!("{format} serialization failed: {e}"),
    }
}

fn decode_error(format: SerializableFormat, e: impl Display) -> EcgError {
    EcgError::SerializationError {
        message: format!("{format} deserialization failed: {e}"),
    }
}

/// Unified save/load interface, implemented for every serde type.
pub trait Serializable: Serialize + DeserializeOwned + Sized {
    /// Serializes to a byte vector.
    fn to_bytes(&self, format: SerializableFormat) -> Result<Vec<u8>> {
        match format {
            SerializableFormat::Binary => {
                bincode::serialize(self).map_err(|e| encode_error(format, e))
            }
            SerializableFormat::Json => {
                serde_json::to_vec_pretty(self).map_err(|e| encode_error(format, e))
            }
        }
    }

    /// Deserializes from a byte slice.
    fn from_bytes(bytes: &[u8], format: SerializableFormat) -> Result<Self> {
        match format {
            SerializableFormat::Binary => {
                bincode::deserialize(bytes).map_err(|e| decode_error(format, e))
            }
            SerializableFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| decode_error(format, e))
            }
        }
    }

    /// Serializes to a pretty-printed JSON string.
    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| encode_error(SerializableFormat::Json, e))
    }

    /// Deserializes from a JSON string.
    fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| decode_error(SerializableFormat::Json, e))
    }

    /// Serializes to a writer.
    fn save<W: Write>(&self, writer: W, format: SerializableFormat) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        match format {
            SerializableFormat::Binary => bincode::serialize_into(&mut writer, self)
                .map_err(|e| encode_error(format, e))?,
            SerializableFormat::Json => serde_json::to_writer_pretty(&mut writer, self)
                .map_err(|e| encode_error(format, e))?,
        }
        writer.flush().map_err(|e| EcgError::IoError {
            message: format!("Failed to flush: {e}"),
        })
    }

    /// Deserializes from a reader.
    fn load<R: Read>(reader: R, format: SerializableFormat) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        match format {
            SerializableFormat::Binary => {
                bincode::deserialize_from(&mut reader).map_err(|e| decode_error(format, e))
            }
            SerializableFormat::Json => {
                serde_json::from_reader(&mut reader).map_err(|e| decode_error(format, e))
            }
        }
    }

    /// Saves to a file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P, format: SerializableFormat) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| EcgError::IoError {
            message: format!("Failed to create {}: {e}", path.display()),
        })?;
        debug!(path = %path.display(), %format, "saving");
        self.save(file, format)
    }

    /// Loads from a file.
    fn load_from_file<P: AsRef<Path>>(path: P, format: SerializableFormat) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| EcgError::IoError {
            message: format!("Failed to open {}: {e}", path.display()),
        })?;
        debug!(path = %path.display(), %format, "loading");
        Self::load(file, format)
    }

    /// Saves to a file, choosing the format with [`SerializableFormat::from_path`].
    fn save_to_file_auto<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let format = SerializableFormat::from_path(path.as_ref());
        self.save_to_file(path, format)
    }

    /// Loads from a file, choosing the format with [`SerializableFormat::from_path`].
    fn load_from_file_auto<P: AsRef<Path>>(path: P) -> Result<Self> {
        let format = SerializableFormat::from_path(path.as_ref());
        Self::load_from_file(path, format)
    }
}

impl<T> Serializable for T where T: Serialize + DeserializeOwned + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ConditionCatalog, ConditionProfile};
    use crate::config::MonitorParams;
    use crate::types::{ComponentDelta, Lead, ParameterDeltas, ParameterSet, RhythmMode, WaveName};
    use crate::utils::{Random, RandomSource};

    #[test]
    fn test_format_parsing() {
        assert_eq!(
            "bin".parse::<SerializableFormat>().unwrap(),
            SerializableFormat::Binary
        );
        assert_eq!(
            "Json".parse::<SerializableFormat>().unwrap(),
            SerializableFormat::Json
        );
        assert!("yaml".parse::<SerializableFormat>().is_err());
        assert_eq!(SerializableFormat::Json.to_string(), "JSON");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SerializableFormat::from_path(Path::new("conditions.json")),
            SerializableFormat::Json
        );
        assert_eq!(
            SerializableFormat::from_path(Path::new("CONDITIONS.JSON")),
            SerializableFormat::Json
        );
        assert_eq!(
            SerializableFormat::from_path(Path::new("conditions.bin")),
            SerializableFormat::Binary
        );
        assert_eq!(
            SerializableFormat::from_path(Path::new("conditions")),
            SerializableFormat::Binary
        );
    }

    #[test]
    fn test_catalog_survives_both_formats() {
        let catalog = ConditionCatalog::builtin();
        let defaults = ParameterSet::default();

        for format in [SerializableFormat::Binary, SerializableFormat::Json] {
            let bytes = catalog.to_bytes(format).unwrap();
            let restored = ConditionCatalog::from_bytes(&bytes, format).unwrap();

            assert!(restored.ids().eq(catalog.ids()), "{format}");
            for id in catalog.ids() {
                for lead in [Lead::II, Lead::V2, Lead::AVL] {
                    assert_eq!(
                        restored.resolve(id, lead, &defaults),
                        catalog.resolve(id, lead, &defaults),
                        "{format} {id} {lead}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_hand_written_catalog() {
        let json = r#"[
            {
                "id": "slow_af",
                "profile": {
                    "name": "Slow AF",
                    "base_rate": 55.0,
                    "rhythm_mode": "AtrialFibrillation",
                    "parameter_deltas": { "t": { "amplitude": 0.2 } }
                }
            }
        ]"#;
        let catalog = ConditionCatalog::from_json(json).unwrap();
        let resolved = catalog.resolve("slow_af", Lead::II, &ParameterSet::default());
        assert_eq!(resolved.rhythm_mode, RhythmMode::AtrialFibrillation);
        assert_eq!(resolved.parameters.t.amplitude, 0.2);
        assert_eq!(resolved.parameters.t.width, ParameterSet::default().t.width);
        assert_eq!(resolved.target_rate, Some(55.0));
    }

    #[test]
    fn test_profile_roundtrip() {
        let profile = ConditionProfile::new("Custom", 64.0).with_deltas(
            ParameterDeltas::new().with(WaveName::Q, ComponentDelta::amplitude(-0.4)),
        );
        let bytes = profile.to_bytes(SerializableFormat::Binary).unwrap();
        assert_eq!(
            ConditionProfile::from_bytes(&bytes, SerializableFormat::Binary).unwrap(),
            profile
        );
    }

    #[test]
    fn test_params_file_roundtrip() {
        let params = MonitorParams {
            seed: Some(99),
            lead: Lead::V5,
            noise_level: 0.0,
            ..Default::default()
        };
        let dir = std::env::temp_dir();
        let path = dir.join(format!("ecg_synth_params_{}.json", std::process::id()));

        params.save_to_file_auto(&path).unwrap();
        let restored = MonitorParams::load_from_file_auto(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(restored, params);
    }

    #[test]
    fn test_random_resumes_stream() {
        let mut rng = Random::new(12);
        for _ in 0..10 {
            rng.next_unit();
        }
        let bytes = rng.to_bytes(SerializableFormat::Binary).unwrap();
        let mut restored = Random::from_bytes(&bytes, SerializableFormat::Binary).unwrap();
        assert_eq!(restored.next_unit(), rng.next_unit());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = MonitorParams::load_from_file("/nonexistent/dir/params.bin", SerializableFormat::Binary);
        assert!(matches!(result, Err(EcgError::IoError { .. })));
    }
}
