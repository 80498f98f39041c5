//! Technique use cases.
//!
//! Techniques are soft deleted: a deactivated technique disappears from
//! listings and can no longer be edited or resolved.

use std::collections::BTreeMap;
use std::sync::Arc;

use spiritdice_domain::{
    ActionType, CharacterId, Description, DomainError, SpEffectTable, SpEffectTier, Technique,
    TechniqueId, TechniqueName,
};

use crate::infrastructure::ports::{CharacterRepo, RepoError, TechniqueRepo};

#[derive(Debug, thiserror::Error)]
pub enum TechniqueError {
    #[error("Technique not found: {0}")]
    NotFound(TechniqueId),
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("No effect defined for {sp} SP on technique {technique_id}")]
    EffectNotFound { technique_id: TechniqueId, sp: i64 },
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateTechniqueInput {
    pub name: String,
    /// Taken from the lowest tier when absent
    pub trigger_type: Option<ActionType>,
    pub trigger_description: String,
    pub sp_effects: BTreeMap<u32, SpEffectTier>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTechniqueInput {
    pub name: Option<String>,
    pub trigger_type: Option<ActionType>,
    pub trigger_description: Option<String>,
    pub sp_effects: Option<BTreeMap<u32, SpEffectTier>>,
}

pub struct TechniqueOps {
    characters: Arc<dyn CharacterRepo>,
    techniques: Arc<dyn TechniqueRepo>,
}

impl TechniqueOps {
    pub fn new(characters: Arc<dyn CharacterRepo>, techniques: Arc<dyn TechniqueRepo>) -> Self {
        Self {
            characters,
            techniques,
        }
    }

    /// Active techniques for a character, in creation order.
    pub async fn list_active(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<Technique>, TechniqueError> {
        Ok(self
            .techniques
            .list_for_character(character_id)
            .await?
            .into_iter()
            .filter(Technique::is_active)
            .collect())
    }

    pub async fn create(
        &self,
        character_id: CharacterId,
        input: CreateTechniqueInput,
    ) -> Result<Technique, TechniqueError> {
        let name = TechniqueName::new(input.name)?;
        let trigger = Description::new(input.trigger_description)?;
        let sp_effects = SpEffectTable::new(input.sp_effects)?;

        if self.characters.get(character_id).await?.is_none() {
            return Err(TechniqueError::CharacterNotFound(character_id));
        }

        let mut technique =
            Technique::new(character_id, name, sp_effects).with_trigger_description(trigger);
        if let Some(trigger_type) = input.trigger_type {
            technique.set_trigger_type(trigger_type);
        }
        self.techniques.save(&technique).await?;
        tracing::info!(
            character_id = %character_id,
            technique_id = %technique.id(),
            name = %technique.name(),
            "Technique created"
        );
        Ok(technique)
    }

    pub async fn update(
        &self,
        id: TechniqueId,
        input: UpdateTechniqueInput,
    ) -> Result<Technique, TechniqueError> {
        let name = input.name.map(TechniqueName::new).transpose()?;
        let trigger = input.trigger_description.map(Description::new).transpose()?;
        let sp_effects = input.sp_effects.map(SpEffectTable::new).transpose()?;

        let mut technique = self.get_active(id).await?;
        if let Some(name) = name {
            technique.rename(name);
        }
        if let Some(trigger_type) = input.trigger_type {
            technique.set_trigger_type(trigger_type);
        }
        if let Some(trigger) = trigger {
            technique.set_trigger_description(trigger);
        }
        if let Some(sp_effects) = sp_effects {
            technique.set_sp_effects(sp_effects);
        }
        self.techniques.save(&technique).await?;
        tracing::debug!(technique_id = %id, "Technique updated");
        Ok(technique)
    }

    /// Soft delete.
    pub async fn deactivate(&self, id: TechniqueId) -> Result<(), TechniqueError> {
        let mut technique = self.get_active(id).await?;
        technique.deactivate();
        self.techniques.save(&technique).await?;
        tracing::info!(technique_id = %id, "Technique deactivated");
        Ok(())
    }

    pub async fn valid_investments(&self, id: TechniqueId) -> Result<Vec<u32>, TechniqueError> {
        Ok(self.get_active(id).await?.valid_investments())
    }

    /// The tier unlocked by investing exactly `sp`.
    pub async fn resolve_effect(
        &self,
        id: TechniqueId,
        sp: i64,
    ) -> Result<(u32, SpEffectTier), TechniqueError> {
        let technique = self.get_active(id).await?;
        let not_found = TechniqueError::EffectNotFound {
            technique_id: id,
            sp,
        };
        let Ok(amount) = u32::try_from(sp) else {
            return Err(not_found);
        };
        match technique.resolve_effect(amount) {
            Ok(tier) => Ok((amount, tier.clone())),
            Err(DomainError::NotFound { .. }) => Err(not_found),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_active(&self, id: TechniqueId) -> Result<Technique, TechniqueError> {
        self.techniques
            .get(id)
            .await?
            .filter(Technique::is_active)
            .ok_or(TechniqueError::NotFound(id))
    }
}
