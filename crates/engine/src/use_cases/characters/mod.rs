//! Character use cases.
//!
//! Creating a character also provisions its spirit die pool, and a level
//! change through an update reprovisions it.

use std::sync::Arc;

use spiritdice_domain::{Character, CharacterId, CharacterName, DomainError, Level, PathName};

use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};
use crate::use_cases::portraits::{PortraitError, PortraitOps};
use crate::use_cases::spirit_dice::{PoolOps, SpiritDiceError};

#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error("Character not found: {0}")]
    NotFound(CharacterId),
    #[error("No characters found")]
    NoCharacters,
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error(transparent)]
    SpiritDice(#[from] SpiritDiceError),
    #[error(transparent)]
    Portrait(#[from] PortraitError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateCharacterInput {
    pub name: String,
    pub path: String,
    /// Defaults to level 1
    pub level: Option<i64>,
}

/// Partial update. `portrait_url: Some(None)` clears the portrait reference.
#[derive(Debug, Clone, Default)]
pub struct UpdateCharacterInput {
    pub name: Option<String>,
    pub path: Option<String>,
    pub level: Option<i64>,
    pub portrait_url: Option<Option<String>>,
}

pub struct CharacterOps {
    characters: Arc<dyn CharacterRepo>,
    pool: Arc<PoolOps>,
    portraits: Arc<PortraitOps>,
    clock: Arc<dyn ClockPort>,
}

impl CharacterOps {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        pool: Arc<PoolOps>,
        portraits: Arc<PortraitOps>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            characters,
            pool,
            portraits,
            clock,
        }
    }

    /// All characters, oldest first, with dangling portrait references cleared.
    pub async fn list(&self) -> Result<Vec<Character>, CharacterError> {
        let characters = self.characters.list().await?;
        Ok(self.portraits.prune_missing(characters).await?)
    }

    pub async fn get(&self, id: CharacterId) -> Result<Character, CharacterError> {
        self.characters
            .get(id)
            .await?
            .ok_or(CharacterError::NotFound(id))
    }

    /// The first character created.
    pub async fn get_default(&self) -> Result<Character, CharacterError> {
        self.characters
            .list()
            .await?
            .into_iter()
            .next()
            .ok_or(CharacterError::NoCharacters)
    }

    pub async fn create(&self, input: CreateCharacterInput) -> Result<Character, CharacterError> {
        let name = CharacterName::new(input.name)?;
        let path = PathName::new(input.path)?;
        let level = input.level.map(Level::new).transpose()?.unwrap_or_default();

        let character = Character::new(name, path, level, self.clock.now());
        self.characters.save(&character).await?;
        self.pool.reprovision(character.id(), level).await?;

        tracing::info!(
            character_id = %character.id(),
            name = %character.name(),
            level = %level,
            "Character created"
        );
        Ok(character)
    }

    /// Apply a partial update. Every field is validated before anything is saved.
    pub async fn update(
        &self,
        id: CharacterId,
        input: UpdateCharacterInput,
    ) -> Result<Character, CharacterError> {
        let name = input.name.map(CharacterName::new).transpose()?;
        let path = input.path.map(PathName::new).transpose()?;
        let level = input.level.map(Level::new).transpose()?;

        let mut character = self.get(id).await?;
        if let Some(name) = name {
            character.set_name(name);
        }
        if let Some(path) = path {
            character.set_path(path);
        }
        if let Some(portrait_url) = input.portrait_url {
            character.set_portrait(portrait_url.filter(|url| !url.trim().is_empty()));
        }
        let level_change = level.and_then(|level| character.set_level(level));

        self.characters.save(&character).await?;

        if let Some(change) = level_change {
            tracing::info!(
                character_id = %id,
                from = %change.from,
                to = %change.to,
                "Character level changed"
            );
            self.pool.reprovision(id, change.to).await?;
        }
        Ok(character)
    }
}
