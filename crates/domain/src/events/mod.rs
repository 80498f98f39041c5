//! Domain events - outcomes returned by aggregate mutations
//!
//! These types communicate what happened when state was modified,
//! allowing callers to persist, broadcast, or report the change.

mod character_events;
mod spirit_die_events;

pub use character_events::{CharacterUpdate, LevelChange};
pub use spirit_die_events::{RestoreOutcome, RollOutcome};
