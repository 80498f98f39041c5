//! Filesystem portrait store.
//!
//! Portraits are written as-is to a single directory and served statically
//! under a URL prefix (`/uploads/portraits/<file>`).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use spiritdice_domain::CharacterId;

use crate::infrastructure::ports::{BlobError, PortraitStore};

pub struct FsPortraitStore {
    dir: PathBuf,
    url_prefix: String,
}

impl FsPortraitStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a public URL back to a file in the store directory.
    ///
    /// Returns `None` for references that do not belong to this store.
    fn file_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(&self.url_prefix)?.strip_prefix('/')?;
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return None;
        }
        Some(self.dir.join(name))
    }
}

fn extension_for(content_type: &str) -> &'static str {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "img",
    }
}

#[async_trait]
impl PortraitStore for FsPortraitStore {
    async fn put(
        &self,
        character_id: CharacterId,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| BlobError::io("create_dir", e))?;

        let filename = format!(
            "portrait-{}-{}.{}",
            character_id,
            Uuid::new_v4().simple(),
            extension_for(content_type)
        );
        tokio::fs::write(self.dir.join(&filename), bytes)
            .await
            .map_err(|e| BlobError::io("write", e))?;

        tracing::debug!(character_id = %character_id, file = %filename, "Portrait stored");
        Ok(format!("{}/{}", self.url_prefix, filename))
    }

    async fn remove(&self, url: &str) -> Result<(), BlobError> {
        let path = self
            .file_for(url)
            .ok_or_else(|| BlobError::InvalidReference(url.to_string()))?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::io("remove", e)),
        }
    }

    async fn exists(&self, url: &str) -> Result<bool, BlobError> {
        // References outside this store are left alone.
        let Some(path) = self.file_for(url) else {
            return Ok(true);
        };
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| BlobError::io("exists", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FsPortraitStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsPortraitStore::new(dir.path().join("portraits"), "/uploads/portraits/");
        (dir, store)
    }

    #[tokio::test]
    async fn put_writes_bytes_and_returns_url() {
        let (_dir, store) = store();
        let url = store
            .put(CharacterId::new(), "image/png", vec![1, 2, 3])
            .await
            .unwrap();

        assert!(url.starts_with("/uploads/portraits/portrait-"));
        assert!(url.ends_with(".png"));
        let path = store.file_for(&url).unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![1, 2, 3]);
        assert!(store.exists(&url).await.unwrap());
    }

    #[tokio::test]
    async fn remove_deletes_and_tolerates_missing_file() {
        let (_dir, store) = store();
        let url = store
            .put(CharacterId::new(), "image/jpeg; charset=binary", vec![9])
            .await
            .unwrap();
        assert!(url.ends_with(".jpg"));

        store.remove(&url).await.unwrap();
        assert!(!store.exists(&url).await.unwrap());
        store.remove(&url).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_traversal_references() {
        let (_dir, store) = store();
        assert!(matches!(
            store.remove("/uploads/portraits/../secret").await,
            Err(BlobError::InvalidReference(_))
        ));
        assert!(store.file_for("/elsewhere/a.png").is_none());
        assert!(store.exists("https://example.com/a.png").await.unwrap());
    }
}
