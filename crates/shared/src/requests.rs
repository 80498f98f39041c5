//! REST request bodies
//!
//! Bodies carry raw values. Validation into domain newtypes happens in the
//! engine's use cases so every rule violation surfaces as a 400.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use spiritdice_domain::{ActionType, DieSize, SpEffectTier};

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates.
fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Characters
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacterRequest {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub level: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCharacterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    /// `null` clears the portrait reference
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub portrait_url: Option<Option<String>>,
}

// =============================================================================
// Spirit die pool
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequest {
    /// Absent or `null` is rejected by the roll handler
    #[serde(default)]
    pub sp_investment: Option<i64>,
    #[serde(default)]
    pub die_index: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolRequest {
    /// Provisioned from the character's level when absent
    #[serde(default)]
    pub current_dice: Option<Vec<DieSize>>,
    #[serde(default)]
    pub override_dice: Option<Vec<DieSize>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePoolRequest {
    #[serde(default)]
    pub current_dice: Option<Vec<Option<DieSize>>>,
    /// `null` clears the override
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub override_dice: Option<Option<Vec<DieSize>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequest {
    pub override_dice: Vec<DieSize>,
}

// =============================================================================
// Techniques
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTechniqueRequest {
    pub name: String,
    /// Taken from the lowest tier when absent
    #[serde(default)]
    pub trigger_type: Option<ActionType>,
    #[serde(default)]
    pub trigger_description: String,
    pub sp_effects: BTreeMap<u32, SpEffectTier>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTechniqueRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trigger_type: Option<ActionType>,
    #[serde(default)]
    pub trigger_description: Option<String>,
    #[serde(default)]
    pub sp_effects: Option<BTreeMap<u32, SpEffectTier>>,
}

// =============================================================================
// Glossary
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGlossaryTermRequest {
    pub keyword: String,
    pub definition: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGlossaryTermRequest {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
}

// =============================================================================
// Active effects
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActiveEffectRequest {
    pub name: String,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}
