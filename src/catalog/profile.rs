//! Condition profiles and their resolution against a lead.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{AlertRegion, AlertRegions, Lead, ParameterDeltas, ParameterSet, RhythmMode};

/// ST/T change visible only on a subset of leads.
///
/// Models a localized infarct or ischemic territory: leads outside the set
/// keep the default ST and T amplitudes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeadLocalizedSt {
    /// Leads facing the affected territory.
    pub leads: Vec<Lead>,
    /// ST amplitude (mV) on matching leads.
    pub st_amplitude: f64,
    /// T amplitude (mV) on matching leads, if changed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub t_amplitude: Option<f64>,
}

impl LeadLocalizedSt {
    /// Creates a localized change.
    pub fn new(leads: &[Lead], st_amplitude: f64, t_amplitude: Option<f64>) -> Self {
        Self {
            leads: leads.to_vec(),
            st_amplitude,
            t_amplitude,
        }
    }

    /// Whether `lead` shows this change.
    pub fn covers(&self, lead: Lead) -> bool {
        self.leads.contains(&lead)
    }

    fn apply_to(&self, params: &mut ParameterSet) {
        params.st.amplitude = self.st_amplitude;
        if let Some(t) = self.t_amplitude {
            params.t.amplitude = t;
        }
    }
}

/// Immutable catalog entry describing one clinical condition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConditionProfile {
    /// Human-readable name.
    pub name: String,
    /// Target heart rate in beats per minute.
    pub base_rate: f64,
    /// Rhythm mode; `None` keeps sinus rhythm.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rhythm_mode: Option<RhythmMode>,
    /// Overrides applied on every lead.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameter_deltas: ParameterDeltas,
    /// Lead-localized ST elevation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub st_elevation: Option<LeadLocalizedSt>,
    /// Lead-localized ST depression (including reciprocal change).
    #[cfg_attr(feature = "serde", serde(default))]
    pub st_depression: Option<LeadLocalizedSt>,
    /// Regions highlighted regardless of lead.
    #[cfg_attr(feature = "serde", serde(default))]
    pub alert_regions: AlertRegions,
}

impl ConditionProfile {
    /// Creates a sinus-rhythm profile with no overrides.
    pub fn new(name: impl Into<String>, base_rate: f64) -> Self {
        Self {
            name: name.into(),
            base_rate,
            rhythm_mode: None,
            parameter_deltas: ParameterDeltas::new(),
            st_elevation: None,
            st_depression: None,
            alert_regions: AlertRegions::empty(),
        }
    }

    /// Sets the rhythm mode.
    #[must_use]
    pub fn with_rhythm(mut self, mode: RhythmMode) -> Self {
        self.rhythm_mode = Some(mode);
        self
    }

    /// Sets the lead-independent overrides.
    #[must_use]
    pub fn with_deltas(mut self, deltas: ParameterDeltas) -> Self {
        self.parameter_deltas = deltas;
        self
    }

    /// Sets a lead-localized ST elevation.
    #[must_use]
    pub fn with_st_elevation(mut self, leads: &[Lead], st: f64, t: Option<f64>) -> Self {
        self.st_elevation = Some(LeadLocalizedSt::new(leads, st, t));
        self
    }

    /// Sets a lead-localized ST depression.
    #[must_use]
    pub fn with_st_depression(mut self, leads: &[Lead], st: f64, t: Option<f64>) -> Self {
        self.st_depression = Some(LeadLocalizedSt::new(leads, st, t));
        self
    }

    /// Sets the unconditional alert regions.
    #[must_use]
    pub fn with_alerts(mut self, regions: &[AlertRegion]) -> Self {
        self.alert_regions = regions.iter().copied().collect();
        self
    }

    /// Whether any part of this profile depends on the lead.
    pub fn is_lead_localized(&self) -> bool {
        self.st_elevation.is_some() || self.st_depression.is_some()
    }

    /// Resolves this profile for one lead, starting from `defaults`.
    ///
    /// Elevation takes precedence when a lead appears in both sets.
    pub fn resolve(&self, lead: Lead, defaults: &ParameterSet) -> ResolvedCondition {
        let mut parameters = defaults.merged(&self.parameter_deltas);
        let mut alert_regions = self.alert_regions;

        let localized = [self.st_elevation.as_ref(), self.st_depression.as_ref()]
            .into_iter()
            .flatten()
            .find(|change| change.covers(lead));
        if let Some(change) = localized {
            change.apply_to(&mut parameters);
            alert_regions.insert(AlertRegion::St);
        }

        ResolvedCondition {
            parameters,
            rhythm_mode: self.rhythm_mode.unwrap_or_default(),
            target_rate: Some(self.base_rate),
            alert_regions,
            localized_change_applied: localized.is_some(),
        }
    }
}

/// A condition profile evaluated for a specific lead.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCondition {
    /// Complete parameter set to install.
    pub parameters: ParameterSet,
    /// Rhythm mode to adopt.
    pub rhythm_mode: RhythmMode,
    /// New target rate, `None` to keep the current one.
    pub target_rate: Option<f64>,
    /// Enabled alert regions.
    pub alert_regions: AlertRegions,
    /// Whether a lead-localized ST change matched this lead.
    pub localized_change_applied: bool,
}

impl ResolvedCondition {
    /// Fallback for unknown condition ids: defaults, sinus, no alerts.
    pub fn fallback(defaults: &ParameterSet) -> Self {
        Self {
            parameters: *defaults,
            rhythm_mode: RhythmMode::Sinus,
            target_rate: None,
            alert_regions: AlertRegions::empty(),
            localized_change_applied: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComponentDelta, WaveName};

    fn inferior() -> ConditionProfile {
        ConditionProfile::new("Inferior", 80.0)
            .with_st_elevation(&[Lead::II, Lead::III, Lead::AVF], 0.4, Some(0.35))
            .with_st_depression(&[Lead::I, Lead::AVL], -0.15, None)
    }

    #[test]
    fn test_localized_elevation_on_matching_lead() {
        let resolved = inferior().resolve(Lead::III, &ParameterSet::default());
        assert_eq!(resolved.parameters.st.amplitude, 0.4);
        assert_eq!(resolved.parameters.t.amplitude, 0.35);
        assert!(resolved.alert_regions.contains(AlertRegion::St));
        assert!(resolved.localized_change_applied);
    }

    #[test]
    fn test_reciprocal_depression_keeps_t() {
        let defaults = ParameterSet::default();
        let resolved = inferior().resolve(Lead::AVL, &defaults);
        assert_eq!(resolved.parameters.st.amplitude, -0.15);
        assert_eq!(resolved.parameters.t.amplitude, defaults.t.amplitude);
        assert!(resolved.alert_regions.contains(AlertRegion::St));
    }

    #[test]
    fn test_unlisted_lead_sees_defaults() {
        let defaults = ParameterSet::default();
        let resolved = inferior().resolve(Lead::V2, &defaults);
        assert_eq!(resolved.parameters, defaults);
        assert!(resolved.alert_regions.is_empty());
        assert!(!resolved.localized_change_applied);
    }

    #[test]
    fn test_unconditional_alerts_survive_localization_miss() {
        let profile = inferior().with_alerts(&[AlertRegion::Qt]);
        let resolved = profile.resolve(Lead::V5, &ParameterSet::default());
        assert_eq!(resolved.alert_regions.iter().collect::<Vec<_>>(), vec![AlertRegion::Qt]);
    }

    #[test]
    fn test_global_deltas_and_mode() {
        let profile = ConditionProfile::new("Hyper", 70.0)
            .with_rhythm(RhythmMode::AtrialFlutter)
            .with_deltas(ParameterDeltas::new().with(WaveName::T, ComponentDelta::amplitude(0.7)));
        let resolved = profile.resolve(Lead::I, &ParameterSet::default());
        assert_eq!(resolved.parameters.t.amplitude, 0.7);
        assert_eq!(resolved.rhythm_mode, RhythmMode::AtrialFlutter);
        assert_eq!(resolved.target_rate, Some(70.0));
    }
}
