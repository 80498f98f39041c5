use super::test_support::*;

use std::time::Duration;

use spiritdice_shared::{ClientMessage, ServerMessage};

use crate::app::test_support::test_app;
use crate::use_cases::CreateCharacterInput;

mod heartbeat;
mod roll_broadcast;

const TIMEOUT: Duration = Duration::from_secs(2);

fn raan() -> CreateCharacterInput {
    CreateCharacterInput {
        name: "R'aan Fames".to_string(),
        path: "Path of Gluttony".to_string(),
        level: Some(8),
    }
}
