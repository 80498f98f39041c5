//! Active effect - a lingering condition shown on a character sheet

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ActiveEffectId, CharacterId};
use crate::value_objects::{Description, EffectName};

/// A named effect currently applied to a character, such as a stacking
/// toxin. Effects are created and removed but never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEffect {
    id: ActiveEffectId,
    character_id: CharacterId,
    name: EffectName,
    level: u32,
    #[serde(default = "Description::empty")]
    description: Description,
}

impl ActiveEffect {
    pub const DEFAULT_LEVEL: u32 = 1;

    pub fn new(character_id: CharacterId, name: EffectName) -> Self {
        Self {
            id: ActiveEffectId::new(),
            character_id,
            name,
            level: Self::DEFAULT_LEVEL,
            description: Description::empty(),
        }
    }

    pub fn id(&self) -> ActiveEffectId {
        self.id
    }

    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    pub fn name(&self) -> &EffectName {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Set the stack level.
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` when `level` is zero.
    pub fn with_level(mut self, level: u32) -> Result<Self, DomainError> {
        if level == 0 {
            return Err(DomainError::validation("Effect level must be at least 1"));
        }
        self.level = level;
        Ok(self)
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = description;
        self
    }
}
