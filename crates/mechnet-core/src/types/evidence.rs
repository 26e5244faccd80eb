//! Evidence grade tiers, their path weights, and mechanism direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MechanismError;

/// Ordered rating of how well a mechanism's existence is supported in the
/// literature. Declaration order is the tier order: `Weak < Moderate < Strong`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceGrade {
    Weak,
    Moderate,
    Strong,
}

impl EvidenceGrade {
    pub const ALL: [EvidenceGrade; 3] = [Self::Weak, Self::Moderate, Self::Strong];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
        }
    }
}

impl fmt::Display for EvidenceGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvidenceGrade {
    type Err = MechanismError;

    /// Accepts tier names and the A/B/C letter grades used by review tables.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong" | "a" => Ok(Self::Strong),
            "moderate" | "b" => Ok(Self::Moderate),
            "weak" | "c" => Ok(Self::Weak),
            _ => Err(MechanismError::invalid(format!("unknown evidence grade '{s}'"))),
        }
    }
}

/// Grade → path weight map. Weights are expected in (0, 1]; the pathfinding
/// service floors anything non-positive and reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeWeights {
    pub strong: f64,
    pub moderate: f64,
    pub weak: f64,
}

impl GradeWeights {
    pub fn weight(&self, grade: EvidenceGrade) -> f64 {
        match grade {
            EvidenceGrade::Strong => self.strong,
            EvidenceGrade::Moderate => self.moderate,
            EvidenceGrade::Weak => self.weak,
        }
    }
}

impl Default for GradeWeights {
    fn default() -> Self {
        Self {
            strong: 1.0,
            moderate: 0.7,
            weak: 0.4,
        }
    }
}

/// Whether a mechanism increases or dampens its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MechanismDirection {
    Amplifying,
    Attenuating,
}

impl MechanismDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amplifying => "amplifying",
            Self::Attenuating => "attenuating",
        }
    }
}

impl fmt::Display for MechanismDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MechanismDirection {
    type Err = MechanismError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amplifying" | "positive" | "+" => Ok(Self::Amplifying),
            "attenuating" | "negative" | "-" => Ok(Self::Attenuating),
            _ => Err(MechanismError::invalid(format!("unknown direction '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_ordering() {
        assert!(EvidenceGrade::Weak < EvidenceGrade::Moderate);
        assert!(EvidenceGrade::Moderate < EvidenceGrade::Strong);
        assert_eq!(EvidenceGrade::ALL.iter().max(), Some(&EvidenceGrade::Strong));
    }

    #[test]
    fn test_letter_grades() {
        assert_eq!("A".parse::<EvidenceGrade>().unwrap(), EvidenceGrade::Strong);
        assert_eq!("b".parse::<EvidenceGrade>().unwrap(), EvidenceGrade::Moderate);
        assert!("D".parse::<EvidenceGrade>().is_err());
    }

    #[test]
    fn test_default_weights_in_unit_interval() {
        let weights = GradeWeights::default();
        for grade in EvidenceGrade::ALL {
            let w = weights.weight(grade);
            assert!(w > 0.0 && w <= 1.0, "{grade} weight {w} outside (0, 1]");
        }
        assert!(weights.weight(EvidenceGrade::Strong) > weights.weight(EvidenceGrade::Weak));
    }

    #[test]
    fn test_direction_aliases() {
        assert_eq!("+".parse::<MechanismDirection>().unwrap(), MechanismDirection::Amplifying);
        assert_eq!(
            "Attenuating".parse::<MechanismDirection>().unwrap(),
            MechanismDirection::Attenuating
        );
    }
}
