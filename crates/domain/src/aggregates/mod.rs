//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Keeps its fields private and exposes behavior through methods
//! - Validates before mutating, so a rejected call leaves it untouched
//! - Returns outcome types from mutations

pub mod active_effect;
pub mod character;
pub mod glossary_term;
pub mod spirit_die_pool;
pub mod technique;

pub use active_effect::ActiveEffect;
pub use character::Character;
pub use glossary_term::GlossaryTerm;
pub use spirit_die_pool::SpiritDiePool;
pub use technique::Technique;
