//! Ordinal causal-distance scale (1 = structural/policy, 7 = individual outcome).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::MechanismError;

/// Structural classification of a factor, invariant once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Scale(u8);

impl Scale {
    /// Most-upstream structural tier. Nodes here are policy-lever candidates.
    pub const MOST_UPSTREAM: Scale = Scale(1);
    pub const MOST_DOWNSTREAM: Scale = Scale(7);

    pub fn new(value: u8) -> Result<Self, MechanismError> {
        if (Self::MOST_UPSTREAM.0..=Self::MOST_DOWNSTREAM.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(MechanismError::invalid(format!(
                "scale {value} outside 1..=7"
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_most_upstream(self) -> bool {
        self == Self::MOST_UPSTREAM
    }
}

impl TryFrom<u8> for Scale {
    type Error = MechanismError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Scale> for u8 {
    fn from(scale: Scale) -> Self {
        scale.0
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
