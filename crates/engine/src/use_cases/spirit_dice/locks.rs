//! Per-character pool locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use spiritdice_domain::CharacterId;

/// Serializes read-modify-write cycles on each character's pool.
///
/// Locks for different characters are independent.
#[derive(Default)]
pub struct PoolLocks {
    locks: DashMap<CharacterId, Arc<Mutex<()>>>,
}

impl PoolLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `character_id`'s pool.
    pub async fn acquire(&self, character_id: CharacterId) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(character_id).or_default().clone();
        lock.lock_owned().await
    }
}
