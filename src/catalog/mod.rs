//! Read-only registry of clinical condition profiles.
//!
//! A [`ConditionCatalog`] is built once (usually with
//! [`ConditionCatalog::builtin`] or loaded from JSON) and shared by every
//! monitor through an `Arc`. Monitors never mutate it.
//!
//! # Example
//!
//! ```rust
//! use ecg_synth::catalog::ConditionCatalog;
//! use ecg_synth::types::{AlertRegion, Lead, ParameterSet};
//!
//! let catalog = ConditionCatalog::builtin();
//! let defaults = ParameterSet::default();
//!
//! let v2 = catalog.resolve("stemi_ant", Lead::V2, &defaults);
//! assert_eq!(v2.parameters.st.amplitude, 0.5);
//! assert!(v2.alert_regions.contains(AlertRegion::St));
//!
//! let iii = catalog.resolve("stemi_ant", Lead::III, &defaults);
//! assert_eq!(iii.parameters.st.amplitude, 0.0);
//! assert!(iii.alert_regions.is_empty());
//! ```

mod builtin;
mod profile;

use ahash::AHashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Lead, ParameterSet};

pub use profile::{ConditionProfile, LeadLocalizedSt, ResolvedCondition};

/// Condition profiles keyed by id, listed in insertion order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Vec<CatalogEntry>", into = "Vec<CatalogEntry>")
)]
pub struct ConditionCatalog {
    entries: AHashMap<String, ConditionProfile>,
    order: Vec<String>,
}

/// One serialized catalog row.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct CatalogEntry {
    id: String,
    profile: ConditionProfile,
}

#[cfg(feature = "serde")]
impl From<Vec<CatalogEntry>> for ConditionCatalog {
    fn from(rows: Vec<CatalogEntry>) -> Self {
        let mut catalog = ConditionCatalog::new();
        for row in rows {
            catalog.insert(row.id, row.profile);
        }
        catalog
    }
}

#[cfg(feature = "serde")]
impl From<ConditionCatalog> for Vec<CatalogEntry> {
    fn from(mut catalog: ConditionCatalog) -> Self {
        catalog
            .order
            .into_iter()
            .filter_map(|id| {
                let profile = catalog.entries.remove(&id)?;
                Some(CatalogEntry { id, profile })
            })
            .collect()
    }
}

impl ConditionCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table: normal sinus rhythm plus the clinical conditions.
    pub fn builtin() -> Self {
        builtin::builtin_catalog()
    }

    /// Adds or replaces a profile. Replacing keeps the original position.
    pub fn insert(&mut self, id: impl Into<String>, profile: ConditionProfile) {
        let id = id.into();
        if self.entries.insert(id.clone(), profile).is_none() {
            self.order.push(id);
        }
    }

    /// Looks up a profile.
    pub fn get(&self, id: &str) -> Option<&ConditionProfile> {
        self.entries.get(id)
    }

    /// Whether `id` is known.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// `(id, profile)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConditionProfile)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entries.get(id).map(|p| (id.as_str(), p)))
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Resolves `id` for `lead`. Unknown ids resolve to the defaults.
    pub fn resolve(&self, id: &str, lead: Lead, defaults: &ParameterSet) -> ResolvedCondition {
        match self.get(id) {
            Some(profile) => profile.resolve(lead, defaults),
            None => ResolvedCondition::fallback(defaults),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlertRegion, RhythmMode};

    #[test]
    fn test_builtin_has_normal_and_twenty_plus_conditions() {
        let catalog = ConditionCatalog::builtin();
        assert_eq!(catalog.ids().next(), Some("normal"));
        assert!(catalog.len() >= 21);
        assert!(catalog.contains("stemi_ant"));
        assert!(catalog.contains("complete_block"));
        assert_eq!(catalog.ids().count(), catalog.len());
    }

    #[test]
    fn test_every_rhythm_mode_is_reachable() {
        let catalog = ConditionCatalog::builtin();
        let modes: Vec<RhythmMode> = catalog
            .iter()
            .map(|(_, p)| p.rhythm_mode.unwrap_or_default())
            .collect();
        for mode in [
            RhythmMode::Sinus,
            RhythmMode::AtrialFibrillation,
            RhythmMode::AtrialFlutter,
            RhythmMode::VentricularTachycardia,
            RhythmMode::VentricularFibrillation,
            RhythmMode::Torsades,
            RhythmMode::Mobitz2Block,
            RhythmMode::CompleteBlock,
        ] {
            assert!(modes.contains(&mode), "no condition uses {mode:?}");
        }
    }

    #[test]
    fn test_anterior_stemi_by_lead() {
        let catalog = ConditionCatalog::builtin();
        let defaults = ParameterSet::default();

        let v2 = catalog.resolve("stemi_ant", Lead::V2, &defaults);
        assert_eq!(v2.parameters.st.amplitude, 0.5);
        assert_eq!(v2.parameters.t.amplitude, 0.4);
        assert_eq!(v2.alert_regions.iter().collect::<Vec<_>>(), vec![AlertRegion::St]);

        let iii = catalog.resolve("stemi_ant", Lead::III, &defaults);
        assert_eq!(iii.parameters.st.amplitude, 0.0);
        assert!(iii.alert_regions.is_empty());
    }

    #[test]
    fn test_unknown_id_falls_back() {
        let catalog = ConditionCatalog::builtin();
        let defaults = ParameterSet::default();
        let resolved = catalog.resolve("no_such_condition", Lead::II, &defaults);
        assert_eq!(resolved.parameters, defaults);
        assert_eq!(resolved.rhythm_mode, RhythmMode::Sinus);
        assert_eq!(resolved.target_rate, None);
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut catalog = ConditionCatalog::new();
        catalog.insert("a", ConditionProfile::new("A", 60.0));
        catalog.insert("b", ConditionProfile::new("B", 70.0));
        catalog.insert("a", ConditionProfile::new("A2", 65.0));
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(catalog.get("a").map(|p| p.base_rate), Some(65.0));
    }
}
