//! Rhythm modes and alert-region classification.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{ParameterSet, WaveName};

/// Discrete rhythm state governing scheduling and visible components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RhythmMode {
    /// Regular sinus rhythm.
    #[default]
    Sinus,
    /// Irregularly irregular ventricular response, no P waves.
    AtrialFibrillation,
    /// Regular flutter waves replacing P waves.
    AtrialFlutter,
    /// Wide-complex ventricular rhythm.
    VentricularTachycardia,
    /// Chaotic activity, no organized complexes.
    VentricularFibrillation,
    /// Polymorphic VT with amplitude-modulated oscillation.
    Torsades,
    /// Second-degree block with intermittently dropped beats.
    Mobitz2Block,
    /// Third-degree block: atria and ventricles paced independently.
    CompleteBlock,
}

impl RhythmMode {
    /// Whether the ventricular beat carries its own P wave.
    pub fn shows_p_wave(&self) -> bool {
        !matches!(
            self,
            RhythmMode::AtrialFibrillation
                | RhythmMode::AtrialFlutter
                | RhythmMode::VentricularTachycardia
                | RhythmMode::VentricularFibrillation
                | RhythmMode::CompleteBlock
        )
    }

    /// Whether Q, R and S are drawn.
    pub fn shows_qrs(&self) -> bool {
        *self != RhythmMode::VentricularFibrillation
    }

    /// Whether the T wave is drawn.
    pub fn shows_t_wave(&self) -> bool {
        *self != RhythmMode::VentricularFibrillation
    }

    /// Whether a given component contributes to the per-beat morphology.
    pub fn shows(&self, name: WaveName) -> bool {
        match name {
            WaveName::P => self.shows_p_wave(),
            WaveName::Q | WaveName::R | WaveName::S => self.shows_qrs(),
            WaveName::T => self.shows_t_wave(),
            WaveName::J | WaveName::St => true,
        }
    }

    /// Whether an independent atrial queue is paced.
    pub fn has_independent_atria(&self) -> bool {
        *self == RhythmMode::CompleteBlock
    }
}

/// Named interval relative to a beat whose samples are highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlertRegion {
    /// End of P wave to QRS onset.
    Pr,
    /// ST segment.
    St,
    /// QRS complex.
    Qrs,
    /// QRS onset to end of T wave.
    Qt,
}

impl AlertRegion {
    /// All regions.
    pub const ALL: [AlertRegion; 4] = [
        AlertRegion::Pr,
        AlertRegion::St,
        AlertRegion::Qrs,
        AlertRegion::Qt,
    ];

    /// Open interval `(start, end)` of beat-relative offsets covered by this region.
    pub fn window(&self, params: &ParameterSet) -> (f64, f64) {
        match self {
            AlertRegion::Pr => (params.get(WaveName::P).offset + 0.1, -0.05),
            AlertRegion::St => (0.08, 0.25),
            AlertRegion::Qrs => (-0.06, 0.06),
            AlertRegion::Qt => (-0.05, params.get(WaveName::T).offset + 0.1),
        }
    }

    /// Whether `dt` lies strictly inside this region.
    pub fn contains(&self, dt: f64, params: &ParameterSet) -> bool {
        let (start, end) = self.window(params);
        dt > start && dt < end
    }

    fn bit(self) -> u8 {
        match self {
            AlertRegion::Pr => 1,
            AlertRegion::St => 1 << 1,
            AlertRegion::Qrs => 1 << 2,
            AlertRegion::Qt => 1 << 3,
        }
    }
}

/// Set of enabled alert regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Vec<AlertRegion>", into = "Vec<AlertRegion>")
)]
pub struct AlertRegions(u8);

impl AlertRegions {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Adds a region.
    pub fn insert(&mut self, region: AlertRegion) {
        self.0 |= region.bit();
    }

    /// Adds every region of `other`.
    pub fn extend_from(&mut self, other: AlertRegions) {
        self.0 |= other.0;
    }

    /// Whether `region` is enabled.
    pub fn contains(&self, region: AlertRegion) -> bool {
        self.0 & region.bit() != 0
    }

    /// Whether no region is enabled.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of enabled regions.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Removes all regions.
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Iterates over enabled regions.
    pub fn iter(&self) -> impl Iterator<Item = AlertRegion> + '_ {
        AlertRegion::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<AlertRegion> for AlertRegions {
    fn from_iter<I: IntoIterator<Item = AlertRegion>>(iter: I) -> Self {
        let mut set = AlertRegions::empty();
        for region in iter {
            set.insert(region);
        }
        set
    }
}

impl From<Vec<AlertRegion>> for AlertRegions {
    fn from(regions: Vec<AlertRegion>) -> Self {
        regions.into_iter().collect()
    }
}

impl From<AlertRegions> for Vec<AlertRegion> {
    fn from(regions: AlertRegions) -> Self {
        regions.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_visibility() {
        assert!(RhythmMode::Sinus.shows(WaveName::P));
        assert!(RhythmMode::Mobitz2Block.shows(WaveName::P));
        assert!(RhythmMode::Torsades.shows(WaveName::P));
        for mode in [
            RhythmMode::AtrialFibrillation,
            RhythmMode::AtrialFlutter,
            RhythmMode::VentricularTachycardia,
            RhythmMode::VentricularFibrillation,
            RhythmMode::CompleteBlock,
        ] {
            assert!(!mode.shows(WaveName::P), "{mode:?} should hide P");
        }
        let vf = RhythmMode::VentricularFibrillation;
        assert!(!vf.shows(WaveName::R));
        assert!(!vf.shows(WaveName::T));
        assert!(RhythmMode::VentricularTachycardia.shows(WaveName::R));
    }

    #[test]
    fn test_windows_follow_parameters() {
        let params = ParameterSet::default();
        let (start, end) = AlertRegion::Pr.window(&params);
        assert!((start - (params.p.offset + 0.1)).abs() < 1e-12);
        assert_eq!(end, -0.05);
        assert!(AlertRegion::Qrs.contains(0.0, &params));
        assert!(!AlertRegion::Qrs.contains(0.06, &params));
        assert!(AlertRegion::St.contains(0.1, &params));
        assert!(AlertRegion::Qt.contains(params.t.offset, &params));
    }

    #[test]
    fn test_region_set() {
        let mut set = AlertRegions::empty();
        assert!(set.is_empty());
        set.insert(AlertRegion::St);
        set.insert(AlertRegion::St);
        set.insert(AlertRegion::Qt);
        assert_eq!(set.len(), 2);
        assert!(set.contains(AlertRegion::St));
        assert!(!set.contains(AlertRegion::Pr));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![AlertRegion::St, AlertRegion::Qt]
        );
        set.clear();
        assert!(set.is_empty());
    }
}
