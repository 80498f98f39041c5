//! Roll a spirit die.
//!
//! Resolves one roll against the stored pool under the character's lock and
//! hands back the broadcast payload. Publishing is left to the caller so that
//! observers are notified only after the lock is released.

use std::sync::Arc;

use spiritdice_domain::{Character, CharacterId, RollOutcome};
use spiritdice_shared::{BroadcastCharacter, BroadcastRoll, RollBroadcastEvent};

use crate::infrastructure::ports::{CharacterRepo, ClockPort, RandomPort, SpiritDiePoolRepo};

use super::error::SpiritDiceError;
use super::locks::PoolLocks;

/// A resolved roll and the event to announce it.
#[derive(Debug, Clone)]
pub struct RollResult {
    pub outcome: RollOutcome,
    pub broadcast: RollBroadcastEvent,
}

pub struct RollSpiritDie {
    characters: Arc<dyn CharacterRepo>,
    pools: Arc<dyn SpiritDiePoolRepo>,
    locks: Arc<PoolLocks>,
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
}

impl RollSpiritDie {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        pools: Arc<dyn SpiritDiePoolRepo>,
        locks: Arc<PoolLocks>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            characters,
            pools,
            locks,
            random,
            clock,
        }
    }

    /// Execute the roll use case.
    ///
    /// # Arguments
    /// * `character_id` - Owner of the pool
    /// * `sp_investment` - SP spent; the roll succeeds when the die shows at least this
    /// * `die_index` - Slot to roll
    ///
    /// # Returns
    /// * `Ok(RollResult)` - The roll was resolved and the pool saved
    /// * `Err(SpiritDiceError)` - Nothing was changed
    pub async fn execute(
        &self,
        character_id: CharacterId,
        sp_investment: i64,
        die_index: i64,
    ) -> Result<RollResult, SpiritDiceError> {
        let sp_investment = u32::try_from(sp_investment)
            .ok()
            .filter(|sp| *sp >= 1)
            .ok_or_else(|| SpiritDiceError::InvalidRequest("Invalid SP investment".into()))?;
        let die_index = usize::try_from(die_index)
            .map_err(|_| SpiritDiceError::InvalidRequest(format!("Invalid die index {die_index}")))?;

        let character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(SpiritDiceError::CharacterNotFound(character_id))?;

        let outcome = {
            let _guard = self.locks.acquire(character_id).await;
            let mut pool = self
                .pools
                .get(character_id)
                .await?
                .ok_or(SpiritDiceError::PoolNotFound(character_id))?;

            let outcome = pool.resolve_roll(die_index, sp_investment, |faces| {
                let max = i32::try_from(faces).unwrap_or(i32::MAX);
                u32::try_from(self.random.gen_range(1, max)).unwrap_or(1)
            })?;
            self.pools.save(&pool).await?;
            outcome
        };

        tracing::info!(
            character_id = %character_id,
            sp_investment = outcome.sp_investment,
            die_index = outcome.die_index,
            die = %outcome.die_rolled,
            value = outcome.value,
            success = outcome.success,
            "Spirit die rolled"
        );

        let broadcast = self.broadcast_event(&character, &outcome);
        Ok(RollResult { outcome, broadcast })
    }

    fn broadcast_event(&self, character: &Character, outcome: &RollOutcome) -> RollBroadcastEvent {
        RollBroadcastEvent {
            character: BroadcastCharacter {
                id: character.id().to_uuid(),
                name: character.name().to_string(),
                path: character.path().to_string(),
                level: character.level().value(),
                portrait_url: character.portrait_url().map(str::to_string),
            },
            roll: BroadcastRoll {
                sp_investment: outcome.sp_investment,
                die_size: outcome.die_rolled,
                die_index: outcome.die_index,
                value: outcome.value,
                success: outcome.success,
                timestamp: self.clock.now(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, FixedRandom, SequenceRandom};
    use crate::infrastructure::memory::InMemoryRepositories;
    use crate::infrastructure::ports::{MockCharacterRepo, MockSpiritDiePoolRepo};
    use chrono::{DateTime, TimeZone, Utc};
    use spiritdice_domain::{CharacterName, DieSize, DomainError, Level, PathName, SpiritDiePool};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    async fn seeded(level: i64) -> (InMemoryRepositories, Character) {
        let repos = InMemoryRepositories::new();
        let character = Character::new(
            CharacterName::new("R'aan Fames").unwrap(),
            PathName::new("Path of Gluttony").unwrap(),
            Level::new(level).unwrap(),
            now(),
        )
        .with_portrait("/uploads/portraits/raan.png");
        repos.character.save(&character).await.unwrap();
        repos
            .spirit_die_pool
            .save(&SpiritDiePool::provisioned(character.id(), character.level()))
            .await
            .unwrap();
        (repos, character)
    }

    fn use_case(repos: &InMemoryRepositories, random: Arc<dyn RandomPort>) -> RollSpiritDie {
        RollSpiritDie::new(
            repos.character.clone(),
            repos.spirit_die_pool.clone(),
            Arc::new(PoolLocks::new()),
            random,
            Arc::new(FixedClock(now())),
        )
    }

    #[tokio::test]
    async fn level_eight_failures_degrade_then_exhaust() {
        let (repos, character) = seeded(8).await;
        let roll = use_case(&repos, Arc::new(SequenceRandom::new([3, 1])));

        let first = roll.execute(character.id(), 5, 0).await.unwrap();
        assert!(!first.outcome.success);
        assert_eq!(first.outcome.value, 3);
        assert_eq!(
            first.outcome.new_dice_pool,
            vec![Some(DieSize::D4), Some(DieSize::D6)]
        );

        let second = roll.execute(character.id(), 5, 0).await.unwrap();
        assert_eq!(second.outcome.die_rolled, DieSize::D4);
        assert_eq!(second.outcome.new_dice_pool, vec![None, Some(DieSize::D6)]);

        let stored = repos
            .spirit_die_pool
            .get(character.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.slots(), &[None, Some(DieSize::D6)]);
    }

    #[tokio::test]
    async fn broadcast_carries_character_and_roll() {
        let (repos, character) = seeded(8).await;
        let roll = use_case(&repos, Arc::new(FixedRandom(6)));

        let result = roll.execute(character.id(), 4, 1).await.unwrap();
        let event = result.broadcast;
        assert_eq!(event.character.id, character.id().to_uuid());
        assert_eq!(event.character.level, 8);
        assert_eq!(
            event.character.portrait_url.as_deref(),
            Some("/uploads/portraits/raan.png")
        );
        assert_eq!(event.roll.die_size, DieSize::D6);
        assert_eq!(event.roll.die_index, 1);
        assert_eq!(event.roll.value, 6);
        assert!(event.roll.success);
        assert_eq!(event.roll.timestamp, now());
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_loading() {
        let characters = MockCharacterRepo::new();
        let pools = MockSpiritDiePoolRepo::new();
        let roll = RollSpiritDie::new(
            Arc::new(characters),
            Arc::new(pools),
            Arc::new(PoolLocks::new()),
            Arc::new(FixedRandom(1)),
            Arc::new(FixedClock(now())),
        );

        for (sp, index) in [(0, 0), (-2, 0), (1, -1)] {
            let result = roll.execute(CharacterId::new(), sp, index).await;
            assert!(matches!(result, Err(SpiritDiceError::InvalidRequest(_))));
        }
    }

    #[tokio::test]
    async fn bad_index_leaves_pool_untouched() {
        let (repos, character) = seeded(8).await;
        let roll = use_case(&repos, Arc::new(FixedRandom(1)));

        let result = roll.execute(character.id(), 1, 5).await;
        assert!(matches!(
            result,
            Err(SpiritDiceError::Domain(DomainError::InvalidRequest(_)))
        ));
        let stored = repos
            .spirit_die_pool
            .get(character.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.version(), 1);
    }

    #[tokio::test]
    async fn unknown_character_is_not_found() {
        let (repos, _) = seeded(8).await;
        let roll = use_case(&repos, Arc::new(FixedRandom(1)));
        let result = roll.execute(CharacterId::new(), 1, 0).await;
        assert!(matches!(result, Err(SpiritDiceError::CharacterNotFound(_))));
    }

    #[tokio::test]
    async fn missing_pool_is_not_found() {
        let repos = InMemoryRepositories::new();
        let character = Character::new(
            CharacterName::new("No Pool").unwrap(),
            PathName::new("Path").unwrap(),
            Level::new(1).unwrap(),
            now(),
        );
        repos.character.save(&character).await.unwrap();
        let roll = use_case(&repos, Arc::new(FixedRandom(1)));
        let result = roll.execute(character.id(), 1, 0).await;
        assert!(matches!(result, Err(SpiritDiceError::PoolNotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_rolls_never_lose_a_degradation() {
        let (repos, character) = seeded(1).await;
        let single_d12 = SpiritDiePool::new(character.id(), vec![DieSize::D12]).with_version(1);
        repos.spirit_die_pool.save(&single_d12).await.unwrap();

        let roll = Arc::new(use_case(&repos, Arc::new(FixedRandom(1))));
        let mut handles = Vec::new();
        for _ in 0..10 {
            let roll = roll.clone();
            let id = character.id();
            handles.push(tokio::spawn(async move { roll.execute(id, 2, 0).await }));
        }

        let mut degraded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(result) => {
                    assert!(!result.outcome.success);
                    degraded += 1;
                }
                Err(SpiritDiceError::Domain(DomainError::InvalidRequest(_))) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        // d12 -> d10 -> d8 -> d6 -> d4 -> exhausted
        assert_eq!(degraded, 5);
        let stored = repos
            .spirit_die_pool
            .get(character.id())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_exhausted());
    }
}
