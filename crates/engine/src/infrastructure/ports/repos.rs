//! Repository port traits for record storage.

use async_trait::async_trait;
use spiritdice_domain::{
    ActiveEffect, ActiveEffectId, Character, CharacterId, GlossaryTerm, GlossaryTermId,
    SpiritDiePool, Technique, TechniqueId,
};

use super::error::RepoError;

// =============================================================================
// Record Store Ports (one per aggregate)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    /// All characters, oldest first.
    async fn list(&self) -> Result<Vec<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpiritDiePoolRepo: Send + Sync {
    async fn get(&self, character_id: CharacterId) -> Result<Option<SpiritDiePool>, RepoError>;

    /// Save the whole pool with a version check.
    ///
    /// The stored version must equal `pool.version()` (any version is
    /// accepted when nothing is stored). Returns the pool as stored, with its
    /// version bumped. Fails with `RepoError::Conflict` otherwise.
    async fn save(&self, pool: &SpiritDiePool) -> Result<SpiritDiePool, RepoError>;

    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TechniqueRepo: Send + Sync {
    async fn get(&self, id: TechniqueId) -> Result<Option<Technique>, RepoError>;
    /// Active and inactive techniques for a character, in insertion order.
    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<Technique>, RepoError>;
    async fn save(&self, technique: &Technique) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GlossaryRepo: Send + Sync {
    async fn get(&self, id: GlossaryTermId) -> Result<Option<GlossaryTerm>, RepoError>;
    /// Terms for a character, sorted by keyword.
    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<GlossaryTerm>, RepoError>;
    async fn save(&self, term: &GlossaryTerm) -> Result<(), RepoError>;
    async fn delete(&self, id: GlossaryTermId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActiveEffectRepo: Send + Sync {
    /// Effects on a character, in the order they were applied.
    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<ActiveEffect>, RepoError>;
    async fn save(&self, effect: &ActiveEffect) -> Result<(), RepoError>;
    async fn delete(&self, id: ActiveEffectId) -> Result<(), RepoError>;
}
