//! WebSocket message types
//!
//! Frames are adjacently tagged: `{"type": "spirit_die_roll", "data": {...}}`.
//! Unit variants carry no `data` field (`{"type": "pong"}`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use spiritdice_domain::DieSize;

/// Messages sent from a viewer to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat ping
    Heartbeat,
}

/// Messages pushed from the engine to viewers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A roll completed for some character
    SpiritDieRoll(RollBroadcastEvent),
    /// Heartbeat response
    Pong,
    /// Error (bad frame)
    Error { code: String, message: String },
}

impl ServerMessage {
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::Error {
            code: "PARSE_ERROR".to_string(),
            message: message.into(),
        }
    }
}

/// Broadcast payload for one completed roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollBroadcastEvent {
    pub character: BroadcastCharacter,
    pub roll: BroadcastRoll,
}

/// Character summary included with a roll broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastCharacter {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub level: u8,
    pub portrait_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRoll {
    pub sp_investment: u32,
    pub die_size: DieSize,
    pub die_index: usize,
    pub value: u32,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}
