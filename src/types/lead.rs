//! The twelve standard ECG leads.

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EcgError;

/// A standard lead of the 12-lead ECG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Lead {
    /// Limb lead I.
    I,
    /// Limb lead II.
    #[default]
    II,
    /// Limb lead III.
    III,
    /// Augmented right arm (inverted polarity).
    #[cfg_attr(feature = "serde", serde(rename = "aVR"))]
    AVR,
    /// Augmented left arm.
    #[cfg_attr(feature = "serde", serde(rename = "aVL"))]
    AVL,
    /// Augmented foot.
    #[cfg_attr(feature = "serde", serde(rename = "aVF"))]
    AVF,
    /// Precordial V1.
    V1,
    /// Precordial V2.
    V2,
    /// Precordial V3.
    V3,
    /// Precordial V4.
    V4,
    /// Precordial V5.
    V5,
    /// Precordial V6.
    V6,
}

impl Lead {
    /// All leads in conventional display order.
    pub const ALL: [Lead; 12] = [
        Lead::I,
        Lead::II,
        Lead::III,
        Lead::AVR,
        Lead::AVL,
        Lead::AVF,
        Lead::V1,
        Lead::V2,
        Lead::V3,
        Lead::V4,
        Lead::V5,
        Lead::V6,
    ];

    /// Conventional lead code, e.g. `"aVR"`.
    pub fn code(&self) -> &'static str {
        match self {
            Lead::I => "I",
            Lead::II => "II",
            Lead::III => "III",
            Lead::AVR => "aVR",
            Lead::AVL => "aVL",
            Lead::AVF => "aVF",
            Lead::V1 => "V1",
            Lead::V2 => "V2",
            Lead::V3 => "V3",
            Lead::V4 => "V4",
            Lead::V5 => "V5",
            Lead::V6 => "V6",
        }
    }
}

impl std::fmt::Display for Lead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lead {
    type Err = EcgError;

    /// Case-insensitive: `"avr"`, `"aVR"` and `"AVR"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Lead::ALL
            .into_iter()
            .find(|lead| lead.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EcgError::UnknownLead(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("II".parse::<Lead>().unwrap(), Lead::II);
        assert_eq!("avr".parse::<Lead>().unwrap(), Lead::AVR);
        assert_eq!(" V6 ".parse::<Lead>().unwrap(), Lead::V6);
        assert!("V7".parse::<Lead>().is_err());
    }

    #[test]
    fn test_display_round_trips_every_lead() {
        for lead in Lead::ALL {
            assert_eq!(lead.to_string().parse::<Lead>().unwrap(), lead);
        }
    }
}
