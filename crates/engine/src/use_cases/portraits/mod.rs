//! Portrait use cases.
//!
//! Upload, removal, and pruning of portrait references whose files are gone.

use std::sync::Arc;

use spiritdice_domain::{Character, CharacterId};

use crate::infrastructure::ports::{BlobError, CharacterRepo, PortraitStore, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum PortraitError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("Portrait must be an image (got {0})")]
    UnsupportedContentType(String),
    #[error("No portrait file provided")]
    Empty,
    #[error("Portrait is {size} bytes, the limit is {max}")]
    TooLarge { size: usize, max: usize },
    #[error("Portrait storage error: {0}")]
    Blob(#[from] BlobError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

pub struct PortraitOps {
    characters: Arc<dyn CharacterRepo>,
    store: Arc<dyn PortraitStore>,
    max_bytes: usize,
}

impl PortraitOps {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        store: Arc<dyn PortraitStore>,
        max_bytes: usize,
    ) -> Self {
        Self {
            characters,
            store,
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Store a new portrait and point the character at it.
    ///
    /// The previous portrait file, if any, is removed afterwards.
    pub async fn upload(
        &self,
        character_id: CharacterId,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<String, PortraitError> {
        let content_type = content_type.unwrap_or_default();
        if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(PortraitError::UnsupportedContentType(if content_type.is_empty() {
                "no content type".to_string()
            } else {
                content_type.to_string()
            }));
        }
        if bytes.is_empty() {
            return Err(PortraitError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(PortraitError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(PortraitError::CharacterNotFound(character_id))?;

        let url = self.store.put(character_id, content_type, bytes).await?;
        let previous = character.portrait_url().map(str::to_string);
        character.set_portrait(Some(url.clone()));

        if let Err(e) = self.characters.save(&character).await {
            self.discard(&url).await;
            return Err(e.into());
        }

        if let Some(previous) = previous.filter(|p| *p != url) {
            self.discard(&previous).await;
        }

        tracing::info!(character_id = %character_id, portrait_url = %url, "Portrait uploaded");
        Ok(url)
    }

    /// Remove the character's portrait.
    pub async fn remove(&self, character_id: CharacterId) -> Result<Character, PortraitError> {
        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(PortraitError::CharacterNotFound(character_id))?;

        if let Some(url) = character.portrait_url().map(str::to_string) {
            self.discard(&url).await;
            character.set_portrait(None);
            self.characters.save(&character).await?;
            tracing::info!(character_id = %character_id, "Portrait removed");
        }
        Ok(character)
    }

    /// Clear portrait references whose files no longer exist.
    pub async fn prune_missing(
        &self,
        characters: Vec<Character>,
    ) -> Result<Vec<Character>, PortraitError> {
        let mut pruned = 0usize;
        let mut result = Vec::with_capacity(characters.len());

        for mut character in characters {
            if let Some(url) = character.portrait_url().map(str::to_string) {
                match self.store.exists(&url).await {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::info!(
                            character_id = %character.id(),
                            portrait_url = %url,
                            "Clearing missing portrait"
                        );
                        character.set_portrait(None);
                        self.characters.save(&character).await?;
                        pruned += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            character_id = %character.id(),
                            error = %e,
                            "Could not check portrait, keeping reference"
                        );
                    }
                }
            }
            result.push(character);
        }

        if pruned > 0 {
            tracing::info!(count = pruned, "Cleaned up missing portrait references");
        }
        Ok(result)
    }

    async fn discard(&self, url: &str) {
        if let Err(e) = self.store.remove(url).await {
            tracing::warn!(portrait_url = %url, error = %e, "Failed to delete portrait file");
        }
    }
}
