//! Spirit dice use cases.
//!
//! Rolling and pool maintenance share one `PoolLocks` so that every
//! read-modify-write on a character's pool is serialized.

use std::sync::Arc;

mod error;
mod locks;
mod pool;
mod roll;

pub use error::SpiritDiceError;
pub use locks::PoolLocks;
pub use pool::{CreatePoolInput, PoolOps, UpdatePoolInput};
pub use roll::{RollResult, RollSpiritDie};

/// Container for spirit dice use cases.
pub struct SpiritDiceUseCases {
    pub roll: Arc<RollSpiritDie>,
    pub pool: Arc<PoolOps>,
}

impl SpiritDiceUseCases {
    pub fn new(roll: Arc<RollSpiritDie>, pool: Arc<PoolOps>) -> Self {
        Self { roll, pool }
    }
}
