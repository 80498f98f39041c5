//! Character aggregate - the owner of a spirit die pool and techniques
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: All fields are encapsulated
//! - **Newtypes**: `CharacterName`, `PathName` and `Level` are valid by construction
//! - **Domain events**: Mutations return outcome types (`CharacterUpdate`, `LevelChange`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::{CharacterUpdate, LevelChange};
use crate::ids::CharacterId;
use crate::value_objects::{CharacterName, Level, PathName};

/// A player character tracked by the spirit dice sheet.
///
/// # Invariants
///
/// - `name` and `path` are non-empty and <= 200 characters
/// - `level` is always within 1..=20
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    id: CharacterId,
    name: CharacterName,
    path: PathName,
    level: Level,
    #[serde(default)]
    portrait_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl Character {
    pub fn new(name: CharacterName, path: PathName, level: Level, created_at: DateTime<Utc>) -> Self {
        Self {
            id: CharacterId::new(),
            name,
            path,
            level,
            portrait_url: None,
            created_at,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn path(&self) -> &PathName {
        &self.path
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn portrait_url(&self) -> Option<&str> {
        self.portrait_url.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // =========================================================================
    // Builders
    // =========================================================================

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_portrait(mut self, url: impl Into<String>) -> Self {
        self.portrait_url = Some(url.into());
        self
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set_name(&mut self, name: CharacterName) -> CharacterUpdate {
        if self.name == name {
            return CharacterUpdate::Unchanged;
        }
        let from = std::mem::replace(&mut self.name, name.clone());
        CharacterUpdate::NameChanged { from, to: name }
    }

    pub fn set_path(&mut self, path: PathName) -> CharacterUpdate {
        if self.path == path {
            return CharacterUpdate::Unchanged;
        }
        let from = std::mem::replace(&mut self.path, path.clone());
        CharacterUpdate::PathChanged { from, to: path }
    }

    pub fn set_portrait(&mut self, url: Option<String>) -> CharacterUpdate {
        if self.portrait_url == url {
            return CharacterUpdate::Unchanged;
        }
        let from = std::mem::replace(&mut self.portrait_url, url.clone());
        CharacterUpdate::PortraitChanged { from, to: url }
    }

    /// Change the level. Returns `None` if the level is unchanged.
    pub fn set_level(&mut self, level: Level) -> Option<LevelChange> {
        if self.level == level {
            return None;
        }
        let from = self.level;
        self.level = level;
        Some(LevelChange { from, to: level })
    }
}
