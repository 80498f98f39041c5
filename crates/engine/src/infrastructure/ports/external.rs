//! External storage ports.

use async_trait::async_trait;
use spiritdice_domain::CharacterId;

use super::error::BlobError;

/// Blob store for character portraits.
///
/// Portraits are addressed by the public URL the store hands out, which is
/// what `Character::portrait_url` records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortraitStore: Send + Sync {
    /// Store image bytes and return the public URL.
    async fn put(
        &self,
        character_id: CharacterId,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobError>;

    /// Remove a stored portrait. Missing files are not an error.
    async fn remove(&self, url: &str) -> Result<(), BlobError>;

    /// Whether the portrait behind `url` still exists.
    async fn exists(&self, url: &str) -> Result<bool, BlobError>;
}
