//! Glossary use cases.
//!
//! Each character keeps its own glossary. Keywords are unique per character,
//! compared case-insensitively.

use std::sync::Arc;

use spiritdice_domain::{CharacterId, Definition, DomainError, GlossaryTerm, GlossaryTermId, Keyword};

use crate::infrastructure::ports::{CharacterRepo, GlossaryRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum GlossaryError {
    #[error("Glossary term not found: {0}")]
    NotFound(GlossaryTermId),
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("Keyword already defined: {0}")]
    DuplicateKeyword(String),
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default)]
pub struct UpdateGlossaryTermInput {
    pub keyword: Option<String>,
    pub definition: Option<String>,
}

pub struct GlossaryOps {
    characters: Arc<dyn CharacterRepo>,
    glossary: Arc<dyn GlossaryRepo>,
}

impl GlossaryOps {
    pub fn new(characters: Arc<dyn CharacterRepo>, glossary: Arc<dyn GlossaryRepo>) -> Self {
        Self {
            characters,
            glossary,
        }
    }

    pub async fn list(&self, character_id: CharacterId) -> Result<Vec<GlossaryTerm>, GlossaryError> {
        Ok(self.glossary.list_for_character(character_id).await?)
    }

    pub async fn create(
        &self,
        character_id: CharacterId,
        keyword: String,
        definition: String,
    ) -> Result<GlossaryTerm, GlossaryError> {
        let keyword = Keyword::new(keyword)?;
        let definition = Definition::new(definition)?;

        if self.characters.get(character_id).await?.is_none() {
            return Err(GlossaryError::CharacterNotFound(character_id));
        }
        self.ensure_unique(character_id, &keyword, None).await?;

        let term = GlossaryTerm::new(character_id, keyword, definition);
        self.glossary.save(&term).await?;
        tracing::debug!(
            character_id = %character_id,
            keyword = %term.keyword(),
            "Glossary term created"
        );
        Ok(term)
    }

    pub async fn update(
        &self,
        id: GlossaryTermId,
        input: UpdateGlossaryTermInput,
    ) -> Result<GlossaryTerm, GlossaryError> {
        let keyword = input.keyword.map(Keyword::new).transpose()?;
        let definition = input.definition.map(Definition::new).transpose()?;

        let mut term = self
            .glossary
            .get(id)
            .await?
            .ok_or(GlossaryError::NotFound(id))?;

        if let Some(keyword) = keyword {
            self.ensure_unique(term.character_id(), &keyword, Some(id))
                .await?;
            term.set_keyword(keyword);
        }
        if let Some(definition) = definition {
            term.set_definition(definition);
        }
        self.glossary.save(&term).await?;
        Ok(term)
    }

    pub async fn delete(&self, id: GlossaryTermId) -> Result<(), GlossaryError> {
        match self.glossary.delete(id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Err(GlossaryError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_unique(
        &self,
        character_id: CharacterId,
        keyword: &Keyword,
        except: Option<GlossaryTermId>,
    ) -> Result<(), GlossaryError> {
        let taken = self
            .glossary
            .list_for_character(character_id)
            .await?
            .iter()
            .any(|t| Some(t.id()) != except && t.matches_keyword(keyword.as_str()));
        if taken {
            return Err(GlossaryError::DuplicateKeyword(keyword.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryRepositories;
    use chrono::Utc;
    use spiritdice_domain::{Character, CharacterName, Level, PathName};

    async fn fixture() -> (GlossaryOps, CharacterId) {
        let repos = InMemoryRepositories::new();
        let character = Character::new(
            CharacterName::new("R'aan Fames").unwrap(),
            PathName::new("Path of Gluttony").unwrap(),
            Level::new(8).unwrap(),
            Utc::now(),
        );
        repos.character.save(&character).await.unwrap();
        (
            GlossaryOps::new(repos.character.clone(), repos.glossary.clone()),
            character.id(),
        )
    }

    #[tokio::test]
    async fn create_list_and_delete() {
        let (ops, owner) = fixture().await;
        let term = ops
            .create(owner, "Hunger".into(), "Accumulated appetite".into())
            .await
            .unwrap();
        ops.create(owner, "Aura".into(), "Visible spirit".into())
            .await
            .unwrap();

        let keywords: Vec<String> = ops
            .list(owner)
            .await
            .unwrap()
            .iter()
            .map(|t| t.keyword().to_string())
            .collect();
        assert_eq!(keywords, vec!["Aura", "Hunger"]);

        ops.delete(term.id()).await.unwrap();
        assert_eq!(ops.list(owner).await.unwrap().len(), 1);
        assert!(matches!(
            ops.delete(term.id()).await,
            Err(GlossaryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn keywords_are_unique_per_character() {
        let (ops, owner) = fixture().await;
        ops.create(owner, "Hunger".into(), "first".into())
            .await
            .unwrap();
        assert!(matches!(
            ops.create(owner, " hunger ".into(), "second".into()).await,
            Err(GlossaryError::DuplicateKeyword(_))
        ));
    }

    #[tokio::test]
    async fn update_may_keep_own_keyword() {
        let (ops, owner) = fixture().await;
        let term = ops
            .create(owner, "Hunger".into(), "first".into())
            .await
            .unwrap();
        let other = ops
            .create(owner, "Aura".into(), "second".into())
            .await
            .unwrap();

        let updated = ops
            .update(
                term.id(),
                UpdateGlossaryTermInput {
                    keyword: Some("HUNGER".into()),
                    definition: Some("revised".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.keyword().as_str(), "HUNGER");
        assert_eq!(updated.definition().as_str(), "revised");

        assert!(matches!(
            ops.update(
                other.id(),
                UpdateGlossaryTermInput {
                    keyword: Some("hunger".into()),
                    ..Default::default()
                },
            )
            .await,
            Err(GlossaryError::DuplicateKeyword(_))
        ));
    }

    #[tokio::test]
    async fn rejects_blank_input_and_unknown_owner() {
        let (ops, owner) = fixture().await;
        assert!(matches!(
            ops.create(owner, "".into(), "text".into()).await,
            Err(GlossaryError::Validation(_))
        ));
        assert!(matches!(
            ops.create(CharacterId::new(), "Aura".into(), "text".into())
                .await,
            Err(GlossaryError::CharacterNotFound(_))
        ));
    }
}
