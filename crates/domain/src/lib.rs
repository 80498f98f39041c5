//! Spirit Dice domain
//!
//! Pure game rules: die sizes and their degradation, the level provisioning
//! table, the die pool engine, and SP-scaled technique effects. No I/O and no
//! randomness source lives here; callers inject the random draw.

pub mod aggregates;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use aggregates::{ActiveEffect, Character, GlossaryTerm, SpiritDiePool, Technique};
pub use error::DomainError;
pub use events::{CharacterUpdate, LevelChange, RestoreOutcome, RollOutcome};
pub use ids::{ActiveEffectId, CharacterId, GlossaryTermId, ObserverId, TechniqueId};
pub use value_objects::{
    provision_for_level, ActionType, CharacterName, Definition, Description, DieSize, EffectName,
    Keyword, Level, PathName, SpEffectTable, SpEffectTier, TechniqueName,
};
