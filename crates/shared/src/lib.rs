//! Spirit Dice Protocol - Shared types for the engine and its viewers
//!
//! - WebSocket message types (`ClientMessage`, `ServerMessage`)
//! - REST request and response bodies
//!
//! No business logic lives here. Domain vocabulary types (`DieSize`,
//! `SpEffectTier`) are reused directly; identifiers travel as raw `Uuid`.

pub mod messages;
pub mod requests;
pub mod responses;

pub use messages::{
    BroadcastCharacter, BroadcastRoll, ClientMessage, RollBroadcastEvent, ServerMessage,
};
pub use requests::{
    CreateActiveEffectRequest, CreateCharacterRequest, CreateGlossaryTermRequest,
    CreatePoolRequest, CreateTechniqueRequest, OverrideRequest, RollRequest,
    UpdateCharacterRequest, UpdateGlossaryTermRequest, UpdatePoolRequest, UpdateTechniqueRequest,
};
pub use responses::{
    ErrorResponse, LevelDiceResponse, PortraitResponse, RollResponse, TechniqueEffectResponse,
};
