//! Value objects - Immutable objects defined by their attributes

mod die_size;
mod level;
mod names;
mod sp_effects;

pub use die_size::DieSize;
pub use level::{provision_for_level, Level};
pub use names::{
    CharacterName, Definition, Description, EffectName, Keyword, PathName, TechniqueName,
};
pub use sp_effects::{ActionType, SpEffectTable, SpEffectTier};
