//! Spirit die sizes
//!
//! Die sizes form a strict ladder ordered by face count. A failed roll walks
//! one rung down the ladder; a failed d4 falls off the bottom and the slot
//! is exhausted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A spirit die, ordered by ascending face count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieSize {
    D4,
    D6,
    D8,
    D10,
    D12,
}

impl DieSize {
    /// Every die size from smallest to largest.
    pub const ALL: [DieSize; 5] = [Self::D4, Self::D6, Self::D8, Self::D10, Self::D12];

    /// Number of faces on the die.
    pub fn faces(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
        }
    }

    /// The die one step down the ladder, or `None` when a d4 is exhausted.
    ///
    /// d12 -> d10 -> d8 -> d6 -> d4 -> exhausted
    pub fn degraded(self) -> Option<DieSize> {
        match self {
            Self::D12 => Some(Self::D10),
            Self::D10 => Some(Self::D8),
            Self::D8 => Some(Self::D6),
            Self::D6 => Some(Self::D4),
            Self::D4 => None,
        }
    }

    /// Wire label (`"d4"` .. `"d12"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::D4 => "d4",
            Self::D6 => "d6",
            Self::D8 => "d8",
            Self::D10 => "d10",
            Self::D12 => "d12",
        }
    }
}

impl fmt::Display for DieSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DieSize {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d4" => Ok(Self::D4),
            "d6" => Ok(Self::D6),
            "d8" => Ok(Self::D8),
            "d10" => Ok(Self::D10),
            "d12" => Ok(Self::D12),
            other => Err(DomainError::parse(format!("Unknown die size: {}", other))),
        }
    }
}
