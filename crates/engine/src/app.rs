//! Application state and composition.

use std::sync::Arc;

use spiritdice_domain::Character;

use crate::api::relay::RollBroadcastRelay;
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::EngineConfig,
    memory::InMemoryRepositories,
    portraits::FsPortraitStore,
    ports::{
        ActiveEffectRepo, CharacterRepo, ClockPort, GlossaryRepo, PortraitStore, RandomPort,
        SpiritDiePoolRepo, TechniqueRepo,
    },
};
use crate::use_cases;
use crate::use_cases::spirit_dice::{PoolLocks, PoolOps, RollSpiritDie};

/// Main application state.
///
/// Holds all repositories, use cases and the roll relay.
/// Passed to HTTP/WebSocket handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub relay: Arc<RollBroadcastRelay>,
    pub config: EngineConfig,
}

/// Container for all repository ports.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
    pub spirit_die_pool: Arc<dyn SpiritDiePoolRepo>,
    pub technique: Arc<dyn TechniqueRepo>,
    pub glossary: Arc<dyn GlossaryRepo>,
    pub active_effect: Arc<dyn ActiveEffectRepo>,
}

impl From<InMemoryRepositories> for Repositories {
    fn from(repos: InMemoryRepositories) -> Self {
        Self {
            character: repos.character,
            spirit_die_pool: repos.spirit_die_pool,
            technique: repos.technique,
            glossary: repos.glossary,
            active_effect: repos.active_effect,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub spirit_dice: use_cases::SpiritDiceUseCases,
    pub character: Arc<use_cases::CharacterOps>,
    pub technique: Arc<use_cases::TechniqueOps>,
    pub glossary: Arc<use_cases::GlossaryOps>,
    pub active_effect: Arc<use_cases::ActiveEffectOps>,
    pub portrait: Arc<use_cases::PortraitOps>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repositories: Repositories,
        portrait_store: Arc<dyn PortraitStore>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        config: EngineConfig,
    ) -> Self {
        let locks = Arc::new(PoolLocks::new());

        let pool = Arc::new(PoolOps::new(
            repositories.character.clone(),
            repositories.spirit_die_pool.clone(),
            locks.clone(),
            config.max_override_dice,
        ));
        let roll = Arc::new(RollSpiritDie::new(
            repositories.character.clone(),
            repositories.spirit_die_pool.clone(),
            locks,
            random,
            clock.clone(),
        ));
        let portrait = Arc::new(use_cases::PortraitOps::new(
            repositories.character.clone(),
            portrait_store,
            config.max_portrait_bytes,
        ));
        let character = Arc::new(use_cases::CharacterOps::new(
            repositories.character.clone(),
            pool.clone(),
            portrait.clone(),
            clock,
        ));
        let technique = Arc::new(use_cases::TechniqueOps::new(
            repositories.character.clone(),
            repositories.technique.clone(),
        ));
        let glossary = Arc::new(use_cases::GlossaryOps::new(
            repositories.character.clone(),
            repositories.glossary.clone(),
        ));
        let active_effect = Arc::new(use_cases::ActiveEffectOps::new(
            repositories.character.clone(),
            repositories.active_effect.clone(),
        ));

        let use_cases = UseCases {
            spirit_dice: use_cases::SpiritDiceUseCases::new(roll, pool),
            character,
            technique,
            glossary,
            active_effect,
            portrait,
        };

        Self {
            repositories,
            use_cases,
            relay: Arc::new(RollBroadcastRelay::new(config.observer_channel_buffer)),
            config,
        }
    }

    /// Production wiring: in-memory records, portraits on disk, real clock and RNG.
    pub fn from_config(config: EngineConfig) -> Self {
        let portraits = Arc::new(FsPortraitStore::new(
            config.portrait_dir.clone(),
            config.portrait_url_prefix.clone(),
        ));
        Self::new(
            InMemoryRepositories::new().into(),
            portraits,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
            config,
        )
    }

    /// Seed the default character if enabled and the store is empty.
    pub async fn seed(&self) -> Result<Option<Character>, use_cases::SeedError> {
        if !self.config.seed_default_character {
            return Ok(None);
        }
        use_cases::seed_default_character(&self.use_cases.character, &self.use_cases.technique)
            .await
    }
}
