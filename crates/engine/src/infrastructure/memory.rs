//! In-memory record store.
//!
//! `DashMap`-backed implementations of every repository port. Records are
//! cloned in and out, so callers never hold a reference into the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use spiritdice_domain::{
    ActiveEffect, ActiveEffectId, Character, CharacterId, GlossaryTerm, GlossaryTermId,
    SpiritDiePool, Technique, TechniqueId,
};

use crate::infrastructure::ports::{
    ActiveEffectRepo, CharacterRepo, GlossaryRepo, RepoError, SpiritDiePoolRepo, TechniqueRepo,
};

/// All in-memory repositories, wired as a unit.
#[derive(Clone, Default)]
pub struct InMemoryRepositories {
    pub character: Arc<InMemoryCharacterRepo>,
    pub spirit_die_pool: Arc<InMemorySpiritDiePoolRepo>,
    pub technique: Arc<InMemoryTechniqueRepo>,
    pub glossary: Arc<InMemoryGlossaryRepo>,
    pub active_effect: Arc<InMemoryActiveEffectRepo>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Insertion counter so listings have a stable order.
#[derive(Default)]
struct Sequence(AtomicU64);

impl Sequence {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

// =============================================================================
// Characters
// =============================================================================

#[derive(Default)]
pub struct InMemoryCharacterRepo {
    records: DashMap<CharacterId, (u64, Character)>,
    sequence: Sequence,
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.records.get(&id).map(|r| r.value().1.clone()))
    }

    async fn list(&self) -> Result<Vec<Character>, RepoError> {
        let mut records: Vec<(u64, Character)> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|(a_seq, a), (b_seq, b)| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a_seq.cmp(b_seq))
        });
        Ok(records.into_iter().map(|(_, c)| c).collect())
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        match self.records.entry(character.id()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().1 = character.clone();
            }
            Entry::Vacant(entry) => {
                entry.insert((self.sequence.next(), character.clone()));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Spirit die pools
// =============================================================================

#[derive(Default)]
pub struct InMemorySpiritDiePoolRepo {
    pools: DashMap<CharacterId, SpiritDiePool>,
}

#[async_trait]
impl SpiritDiePoolRepo for InMemorySpiritDiePoolRepo {
    async fn get(&self, character_id: CharacterId) -> Result<Option<SpiritDiePool>, RepoError> {
        Ok(self.pools.get(&character_id).map(|p| p.value().clone()))
    }

    async fn save(&self, pool: &SpiritDiePool) -> Result<SpiritDiePool, RepoError> {
        let character_id = pool.character_id();
        let mut stored = pool.clone();
        stored.bump_version();

        match self.pools.entry(character_id) {
            Entry::Occupied(mut entry) => {
                let found = entry.get().version();
                if found != pool.version() {
                    return Err(RepoError::conflict(
                        "SpiritDiePool",
                        character_id,
                        pool.version(),
                        found,
                    ));
                }
                entry.insert(stored.clone());
            }
            Entry::Vacant(entry) => {
                entry.insert(stored.clone());
            }
        }
        Ok(stored)
    }

    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError> {
        self.pools
            .remove(&character_id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("SpiritDiePool", character_id))
    }
}

// =============================================================================
// Techniques
// =============================================================================

#[derive(Default)]
pub struct InMemoryTechniqueRepo {
    records: DashMap<TechniqueId, (u64, Technique)>,
    sequence: Sequence,
}

#[async_trait]
impl TechniqueRepo for InMemoryTechniqueRepo {
    async fn get(&self, id: TechniqueId) -> Result<Option<Technique>, RepoError> {
        Ok(self.records.get(&id).map(|r| r.value().1.clone()))
    }

    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<Technique>, RepoError> {
        let mut records: Vec<(u64, Technique)> = self
            .records
            .iter()
            .filter(|r| r.value().1.character_id() == character_id)
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|(seq, _)| *seq);
        Ok(records.into_iter().map(|(_, t)| t).collect())
    }

    async fn save(&self, technique: &Technique) -> Result<(), RepoError> {
        match self.records.entry(technique.id()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().1 = technique.clone();
            }
            Entry::Vacant(entry) => {
                entry.insert((self.sequence.next(), technique.clone()));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Glossary
// =============================================================================

#[derive(Default)]
pub struct InMemoryGlossaryRepo {
    terms: DashMap<GlossaryTermId, GlossaryTerm>,
}

#[async_trait]
impl GlossaryRepo for InMemoryGlossaryRepo {
    async fn get(&self, id: GlossaryTermId) -> Result<Option<GlossaryTerm>, RepoError> {
        Ok(self.terms.get(&id).map(|t| t.value().clone()))
    }

    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<GlossaryTerm>, RepoError> {
        let mut terms: Vec<GlossaryTerm> = self
            .terms
            .iter()
            .filter(|t| t.value().character_id() == character_id)
            .map(|t| t.value().clone())
            .collect();
        terms.sort_by_key(|t| t.keyword().as_str().to_lowercase());
        Ok(terms)
    }

    async fn save(&self, term: &GlossaryTerm) -> Result<(), RepoError> {
        self.terms.insert(term.id(), term.clone());
        Ok(())
    }

    async fn delete(&self, id: GlossaryTermId) -> Result<(), RepoError> {
        self.terms
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("GlossaryTerm", id))
    }
}

// =============================================================================
// Active effects
// =============================================================================

#[derive(Default)]
pub struct InMemoryActiveEffectRepo {
    records: DashMap<ActiveEffectId, (u64, ActiveEffect)>,
    sequence: Sequence,
}

#[async_trait]
impl ActiveEffectRepo for InMemoryActiveEffectRepo {
    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<ActiveEffect>, RepoError> {
        let mut records: Vec<(u64, ActiveEffect)> = self
            .records
            .iter()
            .filter(|r| r.value().1.character_id() == character_id)
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|(seq, _)| *seq);
        Ok(records.into_iter().map(|(_, e)| e).collect())
    }

    async fn save(&self, effect: &ActiveEffect) -> Result<(), RepoError> {
        match self.records.entry(effect.id()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().1 = effect.clone();
            }
            Entry::Vacant(entry) => {
                entry.insert((self.sequence.next(), effect.clone()));
            }
        }
        Ok(())
    }

    async fn delete(&self, id: ActiveEffectId) -> Result<(), RepoError> {
        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("ActiveEffect", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use spiritdice_domain::{
        CharacterName, Definition, DieSize, EffectName, Keyword, Level, PathName, SpEffectTable,
        SpEffectTier, TechniqueName,
    };

    fn character(name: &str, offset_secs: i64) -> Character {
        let created = Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(offset_secs);
        Character::new(
            CharacterName::new(name).unwrap(),
            PathName::new("Path of Gluttony").unwrap(),
            Level::new(8).unwrap(),
            created,
        )
    }

    #[tokio::test]
    async fn characters_list_oldest_first() {
        let repo = InMemoryCharacterRepo::default();
        let newer = character("Newer", 10);
        let older = character("Older", 0);
        repo.save(&newer).await.unwrap();
        repo.save(&older).await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["Older", "Newer"]);
    }

    #[tokio::test]
    async fn pool_save_bumps_version() {
        let repo = InMemorySpiritDiePoolRepo::default();
        let pool = SpiritDiePool::new(CharacterId::new(), vec![DieSize::D6]);

        let first = repo.save(&pool).await.unwrap();
        assert_eq!(first.version(), 1);
        let second = repo.save(&first).await.unwrap();
        assert_eq!(second.version(), 2);
        assert_eq!(repo.get(pool.character_id()).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn stale_pool_save_conflicts() {
        let repo = InMemorySpiritDiePoolRepo::default();
        let pool = SpiritDiePool::new(CharacterId::new(), vec![DieSize::D6]);
        let stored = repo.save(&pool).await.unwrap();

        let mut writer_a = stored.clone();
        let mut writer_b = stored;
        writer_a.long_rest(vec![DieSize::D12]);
        writer_b.long_rest(vec![DieSize::D4]);

        repo.save(&writer_a).await.unwrap();
        let err = repo.save(&writer_b).await.unwrap_err();
        assert!(err.is_conflict());

        let current = repo.get(writer_a.character_id()).await.unwrap().unwrap();
        assert_eq!(current.live_dice(), vec![DieSize::D12]);
    }

    #[tokio::test]
    async fn deleting_missing_pool_is_not_found() {
        let repo = InMemorySpiritDiePoolRepo::default();
        assert!(repo.delete(CharacterId::new()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn techniques_filtered_by_character_in_insertion_order() {
        let repo = InMemoryTechniqueRepo::default();
        let owner = CharacterId::new();
        let table = SpEffectTable::from_tiers([(
            1,
            SpEffectTier::new("Effect", spiritdice_domain::ActionType::Action),
        )])
        .unwrap();

        for name in ["Consume", "Scent of Blood", "Maw"] {
            let t = Technique::new(owner, TechniqueName::new(name).unwrap(), table.clone());
            repo.save(&t).await.unwrap();
        }
        let other = Technique::new(
            CharacterId::new(),
            TechniqueName::new("Other").unwrap(),
            table,
        );
        repo.save(&other).await.unwrap();

        let names: Vec<String> = repo
            .list_for_character(owner)
            .await
            .unwrap()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["Consume", "Scent of Blood", "Maw"]);
    }

    #[tokio::test]
    async fn glossary_sorted_by_keyword() {
        let repo = InMemoryGlossaryRepo::default();
        let owner = CharacterId::new();
        for keyword in ["spirit point", "Hunger", "aura"] {
            let term = GlossaryTerm::new(
                owner,
                Keyword::new(keyword).unwrap(),
                Definition::new("definition").unwrap(),
            );
            repo.save(&term).await.unwrap();
        }
        let keywords: Vec<String> = repo
            .list_for_character(owner)
            .await
            .unwrap()
            .iter()
            .map(|t| t.keyword().to_string())
            .collect();
        assert_eq!(keywords, vec!["aura", "Hunger", "spirit point"]);
    }

    #[tokio::test]
    async fn active_effects_listed_in_application_order_and_deleted() {
        let repo = InMemoryActiveEffectRepo::default();
        let owner = CharacterId::new();
        let mut ids = Vec::new();
        for name in ["Grung Toxin", "Blessed", "Prone"] {
            let effect = ActiveEffect::new(owner, EffectName::new(name).unwrap());
            repo.save(&effect).await.unwrap();
            ids.push(effect.id());
        }
        repo.save(&ActiveEffect::new(
            CharacterId::new(),
            EffectName::new("Elsewhere").unwrap(),
        ))
        .await
        .unwrap();

        let names: Vec<String> = repo
            .list_for_character(owner)
            .await
            .unwrap()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["Grung Toxin", "Blessed", "Prone"]);

        repo.delete(ids[1]).await.unwrap();
        assert_eq!(repo.list_for_character(owner).await.unwrap().len(), 2);
        assert!(repo.delete(ids[1]).await.unwrap_err().is_not_found());
    }
}
