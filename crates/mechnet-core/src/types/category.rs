//! Closed category tag set shared by factors and mechanisms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MechanismError;

/// Domain category of a causal factor or mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Economic,
    Social,
    Political,
    Healthcare,
    Environmental,
    Behavioral,
    Biological,
    BuiltEnvironment,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Economic,
        Self::Social,
        Self::Political,
        Self::Healthcare,
        Self::Environmental,
        Self::Behavioral,
        Self::Biological,
        Self::BuiltEnvironment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economic => "economic",
            Self::Social => "social",
            Self::Political => "political",
            Self::Healthcare => "healthcare",
            Self::Environmental => "environmental",
            Self::Behavioral => "behavioral",
            Self::Biological => "biological",
            Self::BuiltEnvironment => "built_environment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MechanismError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| MechanismError::invalid(format!("unknown category '{s}'")))
    }
}
