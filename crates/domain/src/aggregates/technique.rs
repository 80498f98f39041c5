//! Technique aggregate - an ability whose effect scales with invested SP

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CharacterId, TechniqueId};
use crate::value_objects::{ActionType, Description, SpEffectTable, SpEffectTier, TechniqueName};

/// A named technique belonging to a character.
///
/// # Invariants
///
/// - `sp_effects` has at least one tier and every key is >= 1
/// - `trigger_type` says how the technique is activated; each tier still
///   carries its own action type
/// - Deactivated techniques are kept for history but hidden from listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technique {
    id: TechniqueId,
    character_id: CharacterId,
    name: TechniqueName,
    #[serde(default)]
    trigger_type: ActionType,
    #[serde(default = "Description::empty")]
    trigger_description: Description,
    sp_effects: SpEffectTable,
    #[serde(default = "active_by_default")]
    is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl Technique {
    /// The trigger type starts as the action type of the lowest tier.
    pub fn new(character_id: CharacterId, name: TechniqueName, sp_effects: SpEffectTable) -> Self {
        let trigger_type = sp_effects
            .lowest_tier()
            .map(|tier| tier.action_type)
            .unwrap_or_default();
        Self {
            id: TechniqueId::new(),
            character_id,
            name,
            trigger_type,
            trigger_description: Description::empty(),
            sp_effects,
            is_active: true,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> TechniqueId {
        self.id
    }

    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    pub fn name(&self) -> &TechniqueName {
        &self.name
    }

    pub fn trigger_type(&self) -> ActionType {
        self.trigger_type
    }

    pub fn trigger_description(&self) -> &Description {
        &self.trigger_description
    }

    pub fn sp_effects(&self) -> &SpEffectTable {
        &self.sp_effects
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    // =========================================================================
    // Builders
    // =========================================================================

    pub fn with_id(mut self, id: TechniqueId) -> Self {
        self.id = id;
        self
    }

    pub fn with_trigger_type(mut self, trigger_type: ActionType) -> Self {
        self.trigger_type = trigger_type;
        self
    }

    pub fn with_trigger_description(mut self, description: Description) -> Self {
        self.trigger_description = description;
        self
    }

    // =========================================================================
    // Effect resolution
    // =========================================================================

    /// The tier unlocked by investing exactly `sp`.
    ///
    /// # Errors
    ///
    /// `DomainError::NotFound` when no tier is defined for `sp`.
    pub fn resolve_effect(&self, sp: u32) -> Result<&SpEffectTier, DomainError> {
        self.sp_effects.resolve(sp)
    }

    /// Defined investment levels, ascending.
    pub fn valid_investments(&self) -> Vec<u32> {
        self.sp_effects.valid_investments()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn rename(&mut self, name: TechniqueName) {
        self.name = name;
    }

    pub fn set_trigger_type(&mut self, trigger_type: ActionType) {
        self.trigger_type = trigger_type;
    }

    pub fn set_trigger_description(&mut self, description: Description) {
        self.trigger_description = description;
    }

    pub fn set_sp_effects(&mut self, sp_effects: SpEffectTable) {
        self.sp_effects = sp_effects;
    }

    /// Soft delete. Returns `false` if already inactive.
    pub fn deactivate(&mut self) -> bool {
        std::mem::replace(&mut self.is_active, false)
    }
}
