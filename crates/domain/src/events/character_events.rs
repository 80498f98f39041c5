//! Character-related domain events

use crate::value_objects::{CharacterName, Level, PathName};

/// Outcome of updating character metadata fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterUpdate {
    NameChanged { from: CharacterName, to: CharacterName },
    PathChanged { from: PathName, to: PathName },
    PortraitChanged {
        from: Option<String>,
        to: Option<String>,
    },
    Unchanged,
}

/// A level change. The spirit die pool must be reprovisioned when this occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub from: Level,
    pub to: Level,
}
