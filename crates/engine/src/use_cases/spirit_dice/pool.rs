//! Spirit die pool maintenance: CRUD, rests, restores, overrides, resets.
//!
//! Every mutation runs under the character's pool lock and ends with a
//! versioned save of the whole pool.

use std::sync::Arc;

use spiritdice_domain::{CharacterId, DieSize, Level, SpiritDiePool};

use crate::infrastructure::ports::{CharacterRepo, SpiritDiePoolRepo};

use super::error::SpiritDiceError;
use super::locks::PoolLocks;

/// Input for creating a pool explicitly.
#[derive(Debug, Clone, Default)]
pub struct CreatePoolInput {
    /// Provisioned from the character's level when `None`
    pub current_dice: Option<Vec<DieSize>>,
    pub override_dice: Option<Vec<DieSize>>,
}

/// Partial pool update. `override_dice: Some(None)` clears the override.
#[derive(Debug, Clone, Default)]
pub struct UpdatePoolInput {
    pub current_dice: Option<Vec<Option<DieSize>>>,
    pub override_dice: Option<Option<Vec<DieSize>>>,
}

pub struct PoolOps {
    characters: Arc<dyn CharacterRepo>,
    pools: Arc<dyn SpiritDiePoolRepo>,
    locks: Arc<PoolLocks>,
    max_override_dice: usize,
}

impl PoolOps {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        pools: Arc<dyn SpiritDiePoolRepo>,
        locks: Arc<PoolLocks>,
        max_override_dice: usize,
    ) -> Self {
        Self {
            characters,
            pools,
            locks,
            max_override_dice,
        }
    }

    pub async fn get(&self, character_id: CharacterId) -> Result<SpiritDiePool, SpiritDiceError> {
        self.pools
            .get(character_id)
            .await?
            .ok_or(SpiritDiceError::PoolNotFound(character_id))
    }

    pub async fn create(
        &self,
        character_id: CharacterId,
        input: CreatePoolInput,
    ) -> Result<SpiritDiePool, SpiritDiceError> {
        let level = self.level_of(character_id).await?;
        if let Some(dice) = &input.override_dice {
            self.check_override_len(dice)?;
        }

        let _guard = self.locks.acquire(character_id).await;
        if self.pools.get(character_id).await?.is_some() {
            return Err(SpiritDiceError::PoolExists(character_id));
        }

        let dice = input
            .current_dice
            .unwrap_or_else(|| level.baseline_dice());
        let mut pool = SpiritDiePool::new(character_id, dice);
        pool.set_override_baseline(input.override_dice)?;

        let saved = self.pools.save(&pool).await?;
        tracing::info!(character_id = %character_id, "Spirit die pool created");
        Ok(saved)
    }

    pub async fn update(
        &self,
        character_id: CharacterId,
        input: UpdatePoolInput,
    ) -> Result<SpiritDiePool, SpiritDiceError> {
        if let Some(Some(dice)) = &input.override_dice {
            self.check_override_len(dice)?;
        }
        self.modify(character_id, move |pool, _level| {
            if let Some(override_dice) = input.override_dice {
                pool.set_override_baseline(override_dice)?;
            }
            if let Some(slots) = input.current_dice {
                pool.set_current_dice(slots);
            }
            Ok(())
        })
        .await
    }

    pub async fn delete(&self, character_id: CharacterId) -> Result<(), SpiritDiceError> {
        let _guard = self.locks.acquire(character_id).await;
        self.pools.delete(character_id).await.map_err(|e| {
            if e.is_not_found() {
                SpiritDiceError::PoolNotFound(character_id)
            } else {
                e.into()
            }
        })?;
        tracing::info!(character_id = %character_id, "Spirit die pool deleted");
        Ok(())
    }

    /// Restore every slot to the baseline.
    pub async fn long_rest(
        &self,
        character_id: CharacterId,
    ) -> Result<SpiritDiePool, SpiritDiceError> {
        let pool = self
            .modify(character_id, |pool, level| {
                let baseline = pool.baseline(level);
                pool.long_rest(baseline);
                Ok(())
            })
            .await?;
        tracing::info!(character_id = %character_id, dice = ?pool.live_dice(), "Long rest");
        Ok(pool)
    }

    /// Restore a single slot from the baseline.
    pub async fn restore_slot(
        &self,
        character_id: CharacterId,
        index: usize,
    ) -> Result<SpiritDiePool, SpiritDiceError> {
        self.modify(character_id, move |pool, level| {
            let baseline = pool.baseline(level);
            let outcome = pool.restore_slot(index, &baseline)?;
            tracing::debug!(
                character_id = %character_id,
                index = outcome.index,
                from = ?outcome.from,
                to = %outcome.to,
                "Spirit die slot restored"
            );
            Ok(())
        })
        .await
    }

    pub async fn apply_override(
        &self,
        character_id: CharacterId,
        dice: Vec<DieSize>,
    ) -> Result<SpiritDiePool, SpiritDiceError> {
        self.check_override_len(&dice)?;
        self.modify(character_id, move |pool, _level| {
            pool.apply_override(dice)?;
            Ok(())
        })
        .await
    }

    /// Drop any override and reprovision from the character's level.
    pub async fn reset_to_level(
        &self,
        character_id: CharacterId,
    ) -> Result<SpiritDiePool, SpiritDiceError> {
        self.modify(character_id, |pool, level| {
            pool.reset_to_level(level);
            Ok(())
        })
        .await
    }

    /// Reprovision after a level change, creating the pool if it is missing.
    pub async fn reprovision(
        &self,
        character_id: CharacterId,
        level: Level,
    ) -> Result<SpiritDiePool, SpiritDiceError> {
        let _guard = self.locks.acquire(character_id).await;
        let pool = match self.pools.get(character_id).await? {
            Some(mut pool) => {
                pool.reset_to_level(level);
                pool
            }
            None => SpiritDiePool::provisioned(character_id, level),
        };
        let saved = self.pools.save(&pool).await?;
        tracing::info!(
            character_id = %character_id,
            level = %level,
            dice = ?saved.live_dice(),
            "Spirit die pool reprovisioned"
        );
        Ok(saved)
    }

    fn check_override_len(&self, dice: &[DieSize]) -> Result<(), SpiritDiceError> {
        if dice.len() > self.max_override_dice {
            return Err(SpiritDiceError::OverrideTooLong {
                len: dice.len(),
                max: self.max_override_dice,
            });
        }
        Ok(())
    }

    async fn level_of(&self, character_id: CharacterId) -> Result<Level, SpiritDiceError> {
        self.characters
            .get(character_id)
            .await?
            .map(|c| c.level())
            .ok_or(SpiritDiceError::CharacterNotFound(character_id))
    }

    /// Load, mutate and save the pool under its lock.
    async fn modify<F>(
        &self,
        character_id: CharacterId,
        mutate: F,
    ) -> Result<SpiritDiePool, SpiritDiceError>
    where
        F: FnOnce(&mut SpiritDiePool, Level) -> Result<(), SpiritDiceError> + Send,
    {
        let level = self.level_of(character_id).await?;
        let _guard = self.locks.acquire(character_id).await;
        let mut pool = self
            .pools
            .get(character_id)
            .await?
            .ok_or(SpiritDiceError::PoolNotFound(character_id))?;
        mutate(&mut pool, level)?;
        Ok(self.pools.save(&pool).await?)
    }
}
