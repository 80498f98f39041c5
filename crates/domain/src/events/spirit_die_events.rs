//! Spirit die pool events

use serde::{Deserialize, Serialize};

use crate::value_objects::DieSize;

/// Result of resolving a single spirit die roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollOutcome {
    /// The number rolled, in `1..=faces`
    pub value: u32,
    /// `value >= sp_investment`
    pub success: bool,
    /// The die that was rolled (before any degradation)
    pub die_rolled: DieSize,
    /// Slot that was rolled
    pub die_index: usize,
    /// SP invested in the roll
    pub sp_investment: u32,
    /// Pool slots after the roll; `None` marks an exhausted slot
    pub new_dice_pool: Vec<Option<DieSize>>,
}

impl RollOutcome {
    /// What the rolled slot holds after the roll.
    pub fn resulting_die(&self) -> Option<DieSize> {
        self.new_dice_pool.get(self.die_index).copied().flatten()
    }

    /// True when the roll failed on a d4 and the slot is now empty.
    pub fn exhausted_slot(&self) -> bool {
        !self.success && self.resulting_die().is_none()
    }
}

/// Result of restoring one slot from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub index: usize,
    /// What the slot held before (`None` = exhausted or past the end)
    pub from: Option<DieSize>,
    pub to: DieSize,
}

impl RestoreOutcome {
    pub fn changed(&self) -> bool {
        self.from != Some(self.to)
    }
}
