//! REST response bodies that are not plain aggregates

use serde::{Deserialize, Serialize};

use spiritdice_domain::{DieSize, RollOutcome, SpEffectTier};

/// Body of `POST /api/character/{id}/roll`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResponse {
    pub value: u32,
    pub success: bool,
    pub die_rolled: DieSize,
    pub die_index: usize,
    pub new_dice_pool: Vec<Option<DieSize>>,
}

impl From<RollOutcome> for RollResponse {
    fn from(outcome: RollOutcome) -> Self {
        Self {
            value: outcome.value,
            success: outcome.success,
            die_rolled: outcome.die_rolled,
            die_index: outcome.die_index,
            new_dice_pool: outcome.new_dice_pool,
        }
    }
}

/// Body of `GET /api/levels/{level}/dice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDiceResponse {
    pub level: i64,
    pub dice: Vec<DieSize>,
}

/// Body of `GET /api/techniques/{id}/effects/{sp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueEffectResponse {
    pub sp_investment: u32,
    #[serde(flatten)]
    pub tier: SpEffectTier,
}

/// Body of `POST /api/character/{id}/portrait`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortraitResponse {
    pub portrait_url: String,
}

/// Error body for every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
