//! Character level and the spirit die provisioning table.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DieSize;
use crate::error::DomainError;

use DieSize::{D10, D12, D4, D6, D8};

/// Baseline spirit dice per level, index 0 = level 1.
///
/// Existing characters depend on these exact values.
const LEVEL_DICE: [&[DieSize]; 20] = [
    &[D4],
    &[D4],
    &[D4, D4],
    &[D4, D4],
    &[D4, D4],
    &[D4, D6],
    &[D4, D6],
    &[D6, D6],
    &[D6, D6],
    &[D6, D8],
    &[D6, D8],
    &[D8, D8],
    &[D8, D8],
    &[D8, D10],
    &[D8, D10],
    &[D10, D10],
    &[D10, D10],
    &[D10, D12],
    &[D10, D12],
    &[D12, D12],
];

/// Baseline dice for an arbitrary level.
///
/// Total: any level outside 1..=20 falls back to a single d4.
pub fn provision_for_level(level: i64) -> Vec<DieSize> {
    usize::try_from(level)
        .ok()
        .and_then(|l| l.checked_sub(1))
        .and_then(|idx| LEVEL_DICE.get(idx))
        .map(|dice| dice.to_vec())
        .unwrap_or_else(|| vec![D4])
}

/// A validated character level (1..=20)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 20;

    /// Create a new validated level.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the level is outside 1..=20.
    pub fn new(level: i64) -> Result<Self, DomainError> {
        if level < i64::from(Self::MIN) || level > i64::from(Self::MAX) {
            return Err(DomainError::validation(format!(
                "Level must be between {} and {}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(level as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Baseline spirit dice for this level.
    pub fn baseline_dice(self) -> Vec<DieSize> {
        provision_for_level(i64::from(self.0))
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Level {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}
