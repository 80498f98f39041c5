//! Active effect use cases.
//!
//! Lingering conditions tracked on a character sheet. Effects are applied and
//! cleared; there is no partial edit.

use std::sync::Arc;

use spiritdice_domain::{
    ActiveEffect, ActiveEffectId, CharacterId, Description, DomainError, EffectName,
};

use crate::infrastructure::ports::{ActiveEffectRepo, CharacterRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum ActiveEffectError {
    #[error("Active effect not found: {0}")]
    NotFound(ActiveEffectId),
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default)]
pub struct CreateActiveEffectInput {
    pub name: String,
    /// Defaults to 1
    pub level: Option<i64>,
    pub description: Option<String>,
}

pub struct ActiveEffectOps {
    characters: Arc<dyn CharacterRepo>,
    effects: Arc<dyn ActiveEffectRepo>,
}

impl ActiveEffectOps {
    pub fn new(characters: Arc<dyn CharacterRepo>, effects: Arc<dyn ActiveEffectRepo>) -> Self {
        Self {
            characters,
            effects,
        }
    }

    pub async fn list(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<ActiveEffect>, ActiveEffectError> {
        Ok(self.effects.list_for_character(character_id).await?)
    }

    pub async fn create(
        &self,
        character_id: CharacterId,
        input: CreateActiveEffectInput,
    ) -> Result<ActiveEffect, ActiveEffectError> {
        let name = EffectName::new(input.name)?;
        let description = input
            .description
            .map(Description::new)
            .transpose()?
            .unwrap_or_default();
        let level = match input.level {
            Some(level) => u32::try_from(level)
                .map_err(|_| DomainError::validation("Effect level must be at least 1"))?,
            None => ActiveEffect::DEFAULT_LEVEL,
        };
        let effect = ActiveEffect::new(character_id, name)
            .with_level(level)?
            .with_description(description);

        if self.characters.get(character_id).await?.is_none() {
            return Err(ActiveEffectError::CharacterNotFound(character_id));
        }

        self.effects.save(&effect).await?;
        tracing::debug!(
            character_id = %character_id,
            effect_id = %effect.id(),
            name = %effect.name(),
            level = effect.level(),
            "Active effect applied"
        );
        Ok(effect)
    }

    pub async fn delete(&self, id: ActiveEffectId) -> Result<(), ActiveEffectError> {
        match self.effects.delete(id).await {
            Ok(()) => {
                tracing::debug!(effect_id = %id, "Active effect cleared");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(ActiveEffectError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryRepositories;
    use crate::infrastructure::ports::{MockActiveEffectRepo, MockCharacterRepo};
    use chrono::Utc;
    use spiritdice_domain::{Character, CharacterName, Level, PathName};

    async fn fixture() -> (ActiveEffectOps, CharacterId) {
        let repos = InMemoryRepositories::new();
        let character = Character::new(
            CharacterName::new("R'aan Fames").unwrap(),
            PathName::new("Path of Gluttony").unwrap(),
            Level::new(8).unwrap(),
            Utc::now(),
        );
        repos.character.save(&character).await.unwrap();
        (
            ActiveEffectOps::new(repos.character.clone(), repos.active_effect.clone()),
            character.id(),
        )
    }

    fn toxin(level: Option<i64>) -> CreateActiveEffectInput {
        CreateActiveEffectInput {
            name: "Grung Toxin".into(),
            level,
            description: Some("Poisoned".into()),
        }
    }

    #[tokio::test]
    async fn create_list_and_delete() {
        let (ops, owner) = fixture().await;
        let first = ops.create(owner, toxin(None)).await.unwrap();
        assert_eq!(first.level(), 1);
        let second = ops.create(owner, toxin(Some(2))).await.unwrap();

        let levels: Vec<u32> = ops
            .list(owner)
            .await
            .unwrap()
            .iter()
            .map(ActiveEffect::level)
            .collect();
        assert_eq!(levels, vec![1, 2]);

        ops.delete(first.id()).await.unwrap();
        let remaining: Vec<ActiveEffectId> = ops
            .list(owner)
            .await
            .unwrap()
            .iter()
            .map(ActiveEffect::id)
            .collect();
        assert_eq!(remaining, vec![second.id()]);
        assert!(matches!(
            ops.delete(first.id()).await,
            Err(ActiveEffectError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rejects_bad_input_and_unknown_owner() {
        let (ops, owner) = fixture().await;
        for level in [0, -1] {
            assert!(matches!(
                ops.create(owner, toxin(Some(level))).await,
                Err(ActiveEffectError::Validation(_))
            ));
        }
        assert!(matches!(
            ops.create(
                owner,
                CreateActiveEffectInput {
                    name: "  ".into(),
                    ..Default::default()
                }
            )
            .await,
            Err(ActiveEffectError::Validation(_))
        ));
        assert!(matches!(
            ops.create(CharacterId::new(), toxin(None)).await,
            Err(ActiveEffectError::CharacterNotFound(_))
        ));
        assert!(ops.list(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let mut effects = MockActiveEffectRepo::new();
        effects.expect_save().never();
        let ops = ActiveEffectOps::new(Arc::new(MockCharacterRepo::new()), Arc::new(effects));

        let result = ops.create(CharacterId::new(), toxin(Some(0))).await;
        assert!(matches!(result, Err(ActiveEffectError::Validation(_))));
    }

    #[tokio::test]
    async fn storage_failure_is_propagated() {
        let mut effects = MockActiveEffectRepo::new();
        effects
            .expect_delete()
            .returning(|_| Err(RepoError::database("delete", "disk full")));
        let ops = ActiveEffectOps::new(Arc::new(MockCharacterRepo::new()), Arc::new(effects));

        assert!(matches!(
            ops.delete(ActiveEffectId::new()).await,
            Err(ActiveEffectError::Repo(_))
        ));
    }
}
