//! SP investment tiers for techniques
//!
//! A technique defines effects only at specific SP amounts. The amounts are
//! kept in a sorted map so the valid investments, stepping between tiers and
//! exact lookups are all explicit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::DomainError;

/// How a technique's effect is used at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    #[default]
    Action,
    Bonus,
    Reaction,
    Passive,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action => write!(f, "action"),
            Self::Bonus => write!(f, "bonus"),
            Self::Reaction => write!(f, "reaction"),
            Self::Passive => write!(f, "passive"),
        }
    }
}

/// The effect a technique produces at one SP investment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpEffectTier {
    pub effect: String,
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_name: Option<String>,
}

impl SpEffectTier {
    pub fn new(effect: impl Into<String>, action_type: ActionType) -> Self {
        Self {
            effect: effect.into(),
            action_type,
            alternate_name: None,
        }
    }

    pub fn with_alternate_name(mut self, name: impl Into<String>) -> Self {
        self.alternate_name = Some(name.into());
        self
    }
}

/// Sorted SP amount -> effect tier mapping.
///
/// # Invariants
///
/// - At least one tier is defined
/// - Every SP amount is >= 1
///
/// Serialized as a JSON object keyed by the decimal SP amount
/// (`{"2": {...}, "4": {...}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u32, SpEffectTier>", into = "BTreeMap<u32, SpEffectTier>")]
pub struct SpEffectTable(BTreeMap<u32, SpEffectTier>);

impl SpEffectTable {
    /// Build a validated table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an empty table or a zero SP key.
    pub fn new(tiers: BTreeMap<u32, SpEffectTier>) -> Result<Self, DomainError> {
        if tiers.is_empty() {
            return Err(DomainError::validation(
                "A technique needs at least one SP effect tier",
            ));
        }
        if tiers.contains_key(&0) {
            return Err(DomainError::validation(
                "SP effect amounts must be positive integers",
            ));
        }
        Ok(Self(tiers))
    }

    /// Build a table from `(sp, tier)` pairs.
    pub fn from_tiers(
        tiers: impl IntoIterator<Item = (u32, SpEffectTier)>,
    ) -> Result<Self, DomainError> {
        Self::new(tiers.into_iter().collect())
    }

    /// Effect tier for an exact SP amount.
    ///
    /// # Errors
    ///
    /// `DomainError::NotFound` when `sp` is not one of the defined amounts.
    pub fn resolve(&self, sp: u32) -> Result<&SpEffectTier, DomainError> {
        self.0
            .get(&sp)
            .ok_or_else(|| DomainError::not_found("SpEffectTier", sp.to_string()))
    }

    /// The defined SP amounts, ascending.
    pub fn valid_investments(&self) -> Vec<u32> {
        self.0.keys().copied().collect()
    }

    /// Lowest defined SP amount.
    pub fn default_investment(&self) -> u32 {
        self.0.keys().next().copied().unwrap_or(1)
    }

    /// Tier at the lowest defined SP amount.
    pub fn lowest_tier(&self) -> Option<&SpEffectTier> {
        self.0.values().next()
    }

    pub fn highest_investment(&self) -> u32 {
        self.0.keys().next_back().copied().unwrap_or(1)
    }

    /// Next defined amount above `sp`, staying at the top tier.
    pub fn next_investment(&self, sp: u32) -> u32 {
        self.0
            .range(sp.saturating_add(1)..)
            .next()
            .map(|(k, _)| *k)
            .unwrap_or_else(|| self.highest_investment())
    }

    /// Previous defined amount below `sp`, staying at the bottom tier.
    pub fn previous_investment(&self, sp: u32) -> u32 {
        self.0
            .range(..sp)
            .next_back()
            .map(|(k, _)| *k)
            .unwrap_or_else(|| self.default_investment())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &SpEffectTier)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

impl TryFrom<BTreeMap<u32, SpEffectTier>> for SpEffectTable {
    type Error = DomainError;

    fn try_from(tiers: BTreeMap<u32, SpEffectTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<SpEffectTable> for BTreeMap<u32, SpEffectTier> {
    fn from(table: SpEffectTable) -> Self {
        table.0
    }
}
