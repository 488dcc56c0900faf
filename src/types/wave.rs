//! Deflection shapes that make up one cardiac cycle.
//!
//! A beat is the sum of seven gaussian deflections (P, Q, R, S, J, ST, T),
//! each placed relative to the fiducial R-wave instant. A [`ParameterSet`]
//! always holds all seven; conditions only ever describe partial changes
//! through [`ParameterDeltas`], which are merged field by field.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of one deflection in the PQRST complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WaveName {
    /// Atrial depolarization.
    P,
    /// Initial septal deflection.
    Q,
    /// Main ventricular spike.
    R,
    /// Terminal ventricular deflection.
    S,
    /// J point at the end of the QRS.
    J,
    /// ST segment.
    St,
    /// Ventricular repolarization.
    T,
}

impl WaveName {
    /// All components in cycle order.
    pub const ALL: [WaveName; 7] = [
        WaveName::P,
        WaveName::Q,
        WaveName::R,
        WaveName::S,
        WaveName::J,
        WaveName::St,
        WaveName::T,
    ];

    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            WaveName::P => "P",
            WaveName::Q => "Q",
            WaveName::R => "R",
            WaveName::S => "S",
            WaveName::J => "J",
            WaveName::St => "ST",
            WaveName::T => "T",
        }
    }
}

impl std::fmt::Display for WaveName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single gaussian deflection.
///
/// `offset` and `width` are in seconds relative to the beat instant,
/// `amplitude` in millivolts. `width` is always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaveComponent {
    /// Peak height in mV (negative for downward deflections).
    pub amplitude: f64,
    /// Center of the deflection relative to the beat instant, in seconds.
    pub offset: f64,
    /// Gaussian standard deviation, in seconds.
    pub width: f64,
}

impl WaveComponent {
    /// Creates a component.
    pub const fn new(amplitude: f64, offset: f64, width: f64) -> Self {
        Self {
            amplitude,
            offset,
            width,
        }
    }

    /// Value of this deflection `dt` seconds after the beat instant.
    #[inline]
    pub fn evaluate(&self, dt: f64) -> f64 {
        gaussian(dt, self.offset, self.width, self.amplitude)
    }
}

/// `amplitude * exp(-(t - center)^2 / (2 * width^2))`.
#[inline]
pub fn gaussian(t: f64, center: f64, width: f64, amplitude: f64) -> f64 {
    let x = t - center;
    amplitude * (-(x * x) / (2.0 * width * width)).exp()
}

/// The complete set of deflection shapes for one monitor.
///
/// Never partial: every component is always present.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterSet {
    /// P wave.
    pub p: WaveComponent,
    /// Q wave.
    pub q: WaveComponent,
    /// R wave.
    pub r: WaveComponent,
    /// S wave.
    pub s: WaveComponent,
    /// J point.
    pub j: WaveComponent,
    /// ST segment.
    pub st: WaveComponent,
    /// T wave.
    pub t: WaveComponent,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            p: WaveComponent::new(0.15, -0.2, 0.025),
            q: WaveComponent::new(-0.1, -0.035, 0.008),
            r: WaveComponent::new(1.0, 0.0, 0.01),
            s: WaveComponent::new(-0.25, 0.035, 0.01),
            j: WaveComponent::new(0.0, 0.06, 0.01),
            st: WaveComponent::new(0.0, 0.15, 0.04),
            t: WaveComponent::new(0.3, 0.3, 0.05),
        }
    }
}

impl ParameterSet {
    /// Returns the named component.
    pub fn get(&self, name: WaveName) -> &WaveComponent {
        match name {
            WaveName::P => &self.p,
            WaveName::Q => &self.q,
            WaveName::R => &self.r,
            WaveName::S => &self.s,
            WaveName::J => &self.j,
            WaveName::St => &self.st,
            WaveName::T => &self.t,
        }
    }

    /// Returns the named component mutably.
    pub fn get_mut(&mut self, name: WaveName) -> &mut WaveComponent {
        match name {
            WaveName::P => &mut self.p,
            WaveName::Q => &mut self.q,
            WaveName::R => &mut self.r,
            WaveName::S => &mut self.s,
            WaveName::J => &mut self.j,
            WaveName::St => &mut self.st,
            WaveName::T => &mut self.t,
        }
    }

    /// Iterates over all components in cycle order.
    pub fn iter(&self) -> impl Iterator<Item = (WaveName, &WaveComponent)> + '_ {
        WaveName::ALL.iter().map(move |&name| (name, self.get(name)))
    }

    /// Merges partial overrides into this set. Unspecified fields keep their value.
    pub fn merge(&mut self, deltas: &ParameterDeltas) {
        for name in WaveName::ALL {
            if let Some(delta) = deltas.get(name) {
                delta.apply_to(self.get_mut(name));
            }
        }
    }

    /// Returns a copy of `self` with `deltas` merged in.
    #[must_use]
    pub fn merged(mut self, deltas: &ParameterDeltas) -> Self {
        self.merge(deltas);
        self
    }
}

/// Partial override for one component.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComponentDelta {
    /// New amplitude, if overridden.
    pub amplitude: Option<f64>,
    /// New offset, if overridden.
    pub offset: Option<f64>,
    /// New width, if overridden. Non-positive widths are ignored on merge.
    pub width: Option<f64>,
}

impl ComponentDelta {
    /// Overrides only the amplitude.
    pub const fn amplitude(amplitude: f64) -> Self {
        Self {
            amplitude: Some(amplitude),
            offset: None,
            width: None,
        }
    }

    /// Overrides only the offset.
    pub const fn offset(offset: f64) -> Self {
        Self {
            amplitude: None,
            offset: Some(offset),
            width: None,
        }
    }

    /// Overrides all three fields.
    pub const fn full(amplitude: f64, offset: f64, width: f64) -> Self {
        Self {
            amplitude: Some(amplitude),
            offset: Some(offset),
            width: Some(width),
        }
    }

    /// Adds a width override.
    #[must_use]
    pub const fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Adds an offset override.
    #[must_use]
    pub const fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Writes the overridden fields into `component`.
    pub fn apply_to(&self, component: &mut WaveComponent) {
        if let Some(amplitude) = self.amplitude {
            component.amplitude = amplitude;
        }
        if let Some(offset) = self.offset {
            component.offset = offset;
        }
        if let Some(width) = self.width.filter(|w| w.is_finite() && *w > 0.0) {
            component.width = width;
        }
    }
}

/// Strongly typed partial update of a [`ParameterSet`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParameterDeltas {
    p: Option<ComponentDelta>,
    q: Option<ComponentDelta>,
    r: Option<ComponentDelta>,
    s: Option<ComponentDelta>,
    j: Option<ComponentDelta>,
    st: Option<ComponentDelta>,
    t: Option<ComponentDelta>,
}

impl ParameterDeltas {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the override for one component (builder style).
    #[must_use]
    pub fn with(mut self, name: WaveName, delta: ComponentDelta) -> Self {
        self.set(name, delta);
        self
    }

    /// Sets the override for one component.
    pub fn set(&mut self, name: WaveName, delta: ComponentDelta) {
        *self.slot_mut(name) = Some(delta);
    }

    /// Returns the override for one component, if any.
    pub fn get(&self, name: WaveName) -> Option<&ComponentDelta> {
        match name {
            WaveName::P => self.p.as_ref(),
            WaveName::Q => self.q.as_ref(),
            WaveName::R => self.r.as_ref(),
            WaveName::S => self.s.as_ref(),
            WaveName::J => self.j.as_ref(),
            WaveName::St => self.st.as_ref(),
            WaveName::T => self.t.as_ref(),
        }
    }

    /// Returns `true` when no component is overridden.
    pub fn is_empty(&self) -> bool {
        WaveName::ALL.iter().all(|&name| self.get(name).is_none())
    }

    fn slot_mut(&mut self, name: WaveName) -> &mut Option<ComponentDelta> {
        match name {
            WaveName::P => &mut self.p,
            WaveName::Q => &mut self.q,
            WaveName::R => &mut self.r,
            WaveName::S => &mut self.s,
            WaveName::J => &mut self.j,
            WaveName::St => &mut self.st,
            WaveName::T => &mut self.t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_peak_and_decay() {
        assert_eq!(gaussian(0.3, 0.3, 0.05, 0.4), 0.4);
        let one_sigma = gaussian(0.35, 0.3, 0.05, 1.0);
        assert!((one_sigma - (-0.5f64).exp()).abs() < 1e-12);
        assert!(gaussian(1.0, 0.0, 0.01, 1.0) < 1e-100);
    }

    #[test]
    fn test_default_set_is_complete_and_positive_width() {
        let params = ParameterSet::default();
        assert_eq!(params.iter().count(), 7);
        assert!(params.iter().all(|(_, c)| c.width > 0.0));
        assert_eq!(params.st.amplitude, 0.0);
    }

    #[test]
    fn test_partial_merge_keeps_unspecified_fields() {
        let deltas = ParameterDeltas::new()
            .with(WaveName::T, ComponentDelta::amplitude(0.6))
            .with(WaveName::P, ComponentDelta::offset(-0.3));
        let merged = ParameterSet::default().merged(&deltas);
        let defaults = ParameterSet::default();

        assert_eq!(merged.t.amplitude, 0.6);
        assert_eq!(merged.t.offset, defaults.t.offset);
        assert_eq!(merged.t.width, defaults.t.width);
        assert_eq!(merged.p.offset, -0.3);
        assert_eq!(merged.p.amplitude, defaults.p.amplitude);
        assert_eq!(merged.r, defaults.r);
    }

    #[test]
    fn test_merge_rejects_non_positive_width() {
        let deltas =
            ParameterDeltas::new().with(WaveName::R, ComponentDelta::amplitude(2.0).with_width(0.0));
        let merged = ParameterSet::default().merged(&deltas);
        assert_eq!(merged.r.amplitude, 2.0);
        assert_eq!(merged.r.width, ParameterSet::default().r.width);
    }

    #[test]
    fn test_empty_deltas() {
        assert!(ParameterDeltas::new().is_empty());
        assert!(!ParameterDeltas::new()
            .with(WaveName::J, ComponentDelta::amplitude(0.1))
            .is_empty());
    }
}
