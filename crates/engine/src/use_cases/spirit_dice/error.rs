//! Spirit dice operation errors.

use crate::infrastructure::ports::RepoError;
use spiritdice_domain::{CharacterId, DomainError};

/// Errors that can occur during spirit die pool operations.
#[derive(Debug, thiserror::Error)]
pub enum SpiritDiceError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("Spirit die pool not found for character {0}")]
    PoolNotFound(CharacterId),
    #[error("Spirit die pool already exists for character {0}")]
    PoolExists(CharacterId),
    #[error("Override may contain at most {max} dice (got {len})")]
    OverrideTooLong { len: usize, max: usize },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
