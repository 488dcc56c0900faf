//! Per-lead scalar projection of the synthesized voltage.

use crate::types::Lead;

/// Projection coefficients in [`Lead::ALL`] order. aVR views the heart from
/// the opposite side and is the only inverted lead.
const COEFFICIENTS: [f64; 12] = [
    0.7,  // I
    1.0,  // II
    0.6,  // III
    -0.8, // aVR
    0.4,  // aVL
    0.8,  // aVF
    0.5,  // V1
    0.8,  // V2
    1.0,  // V3
    1.2,  // V4
    1.1,  // V5
    0.9,  // V6
];

/// Fixed table mapping each lead to a signed scale factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadTransform;

impl LeadTransform {
    /// Coefficient for `lead`.
    pub fn coefficient(lead: Lead) -> f64 {
        let index = Lead::ALL.iter().position(|&l| l == lead).unwrap_or(1);
        COEFFICIENTS[index]
    }

    /// Coefficient for a lead code; unknown codes project with 1.0.
    pub fn coefficient_for_code(code: &str) -> f64 {
        code.parse::<Lead>().map_or(1.0, Self::coefficient)
    }

    /// Scales `voltage` as seen from `lead`.
    #[inline]
    pub fn project(voltage: f64, lead: Lead) -> f64 {
        voltage * Self::coefficient(lead)
    }
}

/// Scales `voltage` as seen from the lead named `code`.
pub fn project_lead(voltage: f64, code: &str) -> f64 {
    voltage * LeadTransform::coefficient_for_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avr_inverts() {
        assert!(LeadTransform::project(1.0, Lead::AVR) < 0.0);
        assert!(project_lead(0.5, "aVR") < 0.0);
    }

    #[test]
    fn test_only_avr_is_negative() {
        for lead in Lead::ALL {
            let c = LeadTransform::coefficient(lead);
            assert_eq!(c < 0.0, lead == Lead::AVR, "{lead}");
            assert!(c != 0.0);
        }
    }

    #[test]
    fn test_unknown_code_is_identity() {
        assert_eq!(project_lead(0.42, "V9"), 0.42);
        assert_eq!(project_lead(0.42, "II"), 0.42);
    }
}
