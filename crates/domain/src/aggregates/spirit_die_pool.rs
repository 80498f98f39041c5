//! Spirit die pool aggregate - the die pool engine
//!
//! A pool is a fixed row of slots. Each slot holds a die or is exhausted.
//! Slot positions never shift: when a d4 fails its slot becomes a hole at the
//! same index, so restoring slot `i` always restores baseline die `i`.
//!
//! The baseline is the override dice when set, otherwise the dice provisioned
//! for the character's level.
//!
//! All operations validate before mutating. A rejected request leaves the
//! pool untouched.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::events::{RestoreOutcome, RollOutcome};
use crate::ids::CharacterId;
use crate::value_objects::{DieSize, Level};

/// The spirit dice owned by one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpiritDiePool {
    character_id: CharacterId,
    /// Live slots, index-stable; `None` is an exhausted slot
    current_dice: Vec<Option<DieSize>>,
    /// Manual baseline replacing the level-derived dice
    #[serde(default)]
    override_dice: Option<Vec<DieSize>>,
    /// Bumped by the repository on every successful save
    #[serde(default)]
    version: u64,
}

impl SpiritDiePool {
    /// Create a pool with every slot filled from `dice`.
    pub fn new(character_id: CharacterId, dice: Vec<DieSize>) -> Self {
        Self {
            character_id,
            current_dice: dice.into_iter().map(Some).collect(),
            override_dice: None,
            version: 0,
        }
    }

    /// Create a pool provisioned for `level`.
    pub fn provisioned(character_id: CharacterId, level: Level) -> Self {
        Self::new(character_id, level.baseline_dice())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    /// Slots including exhausted holes.
    pub fn slots(&self) -> &[Option<DieSize>] {
        &self.current_dice
    }

    /// Dice still available, in slot order.
    pub fn live_dice(&self) -> Vec<DieSize> {
        self.current_dice.iter().flatten().copied().collect()
    }

    /// Number of slots still holding a die.
    pub fn live_count(&self) -> usize {
        self.current_dice.iter().filter(|slot| slot.is_some()).count()
    }

    /// True when no slot holds a die.
    pub fn is_exhausted(&self) -> bool {
        self.live_count() == 0
    }

    pub fn die_at(&self, index: usize) -> Option<DieSize> {
        self.current_dice.get(index).copied().flatten()
    }

    pub fn override_dice(&self) -> Option<&[DieSize]> {
        self.override_dice.as_deref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The dice a rest restores to: override when set, else the level table.
    pub fn baseline(&self, level: Level) -> Vec<DieSize> {
        match &self.override_dice {
            Some(dice) => dice.clone(),
            None => level.baseline_dice(),
        }
    }

    // =========================================================================
    // Persistence support
    // =========================================================================

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Called by repositories after a successful compare-and-swap.
    pub fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    // =========================================================================
    // Die pool engine
    // =========================================================================

    /// Roll the die in slot `die_index` against `sp_investment`.
    ///
    /// `draw` receives the die's face count and must return a value in
    /// `1..=faces` (out-of-range values are clamped). On failure the die
    /// degrades one step, and a failed d4 exhausts the slot.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidRequest` when `sp_investment < 1`, the pool has
    /// no live dice, `die_index` is out of range, or the slot is exhausted.
    pub fn resolve_roll<F>(
        &mut self,
        die_index: usize,
        sp_investment: u32,
        draw: F,
    ) -> Result<RollOutcome, DomainError>
    where
        F: FnOnce(u32) -> u32,
    {
        if sp_investment < 1 {
            return Err(DomainError::invalid_request("Invalid SP investment"));
        }
        if self.is_exhausted() {
            return Err(DomainError::invalid_request("No dice available to roll"));
        }
        if die_index >= self.current_dice.len() {
            return Err(DomainError::invalid_request(format!(
                "Invalid die index {} (pool has {} slots)",
                die_index,
                self.current_dice.len()
            )));
        }
        let Some(die) = self.current_dice[die_index] else {
            return Err(DomainError::invalid_request(format!(
                "Die slot {} is exhausted",
                die_index
            )));
        };

        let faces = die.faces();
        let value = draw(faces).clamp(1, faces);
        let success = value >= sp_investment;

        if !success {
            self.current_dice[die_index] = die.degraded();
        }

        Ok(RollOutcome {
            value,
            success,
            die_rolled: die,
            die_index,
            sp_investment,
            new_dice_pool: self.current_dice.clone(),
        })
    }

    /// Set a manual override. The override becomes both the baseline and the
    /// live pool.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidRequest` for an empty override.
    pub fn apply_override(&mut self, dice: Vec<DieSize>) -> Result<(), DomainError> {
        if dice.is_empty() {
            return Err(DomainError::invalid_request(
                "Override must contain at least one die",
            ));
        }
        self.current_dice = dice.iter().copied().map(Some).collect();
        self.override_dice = Some(dice);
        Ok(())
    }

    /// Drop any override and reprovision from the level table.
    pub fn reset_to_level(&mut self, level: Level) {
        self.override_dice = None;
        self.current_dice = level.baseline_dice().into_iter().map(Some).collect();
    }

    /// Restore a single slot from `baseline`, refilling it if exhausted.
    ///
    /// Slots past the current end are padded with holes first.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidRequest` when `index` is not a baseline slot.
    pub fn restore_slot(
        &mut self,
        index: usize,
        baseline: &[DieSize],
    ) -> Result<RestoreOutcome, DomainError> {
        let Some(&to) = baseline.get(index) else {
            return Err(DomainError::invalid_request(format!(
                "Invalid slot index {} (baseline has {} slots)",
                index,
                baseline.len()
            )));
        };
        if self.current_dice.len() <= index {
            self.current_dice.resize(index + 1, None);
        }
        let from = self.current_dice[index].replace(to);
        Ok(RestoreOutcome { index, from, to })
    }

    /// Restore every slot to the baseline.
    pub fn long_rest(&mut self, baseline: Vec<DieSize>) {
        self.current_dice = baseline.into_iter().map(Some).collect();
    }

    // =========================================================================
    // Direct edits
    // =========================================================================

    /// Replace the live slots as given (manual edit).
    pub fn set_current_dice(&mut self, slots: Vec<Option<DieSize>>) {
        self.current_dice = slots;
    }

    /// Replace or clear the baseline override without touching live slots.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidRequest` for `Some(empty)`.
    pub fn set_override_baseline(&mut self, dice: Option<Vec<DieSize>>) -> Result<(), DomainError> {
        if matches!(&dice, Some(d) if d.is_empty()) {
            return Err(DomainError::invalid_request(
                "Override must contain at least one die",
            ));
        }
        self.override_dice = dice;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DieSize::{D10, D12, D4, D6, D8};

    fn pool(dice: Vec<DieSize>) -> SpiritDiePool {
        SpiritDiePool::new(CharacterId::new(), dice)
    }

    fn level(n: i64) -> Level {
        Level::new(n).unwrap()
    }

    mod resolve_roll {
        use super::*;

        #[test]
        fn value_stays_within_faces_and_success_matches_threshold() {
            for die in DieSize::ALL {
                for sp in 1..=13 {
                    for drawn in 1..=die.faces() {
                        let mut p = pool(vec![die]);
                        let outcome = p.resolve_roll(0, sp, |_| drawn).unwrap();
                        assert!((1..=die.faces()).contains(&outcome.value));
                        assert_eq!(outcome.success, outcome.value >= sp);
                        assert_eq!(outcome.die_rolled, die);
                    }
                }
            }
        }

        #[test]
        fn draw_receives_face_count() {
            let mut p = pool(vec![D10]);
            let mut seen = 0;
            p.resolve_roll(0, 1, |faces| {
                seen = faces;
                1
            })
            .unwrap();
            assert_eq!(seen, 10);
        }

        #[test]
        fn out_of_range_draw_is_clamped() {
            let mut p = pool(vec![D6]);
            assert_eq!(p.resolve_roll(0, 1, |_| 99).unwrap().value, 6);
            let mut p = pool(vec![D6]);
            assert_eq!(p.resolve_roll(0, 1, |_| 0).unwrap().value, 1);
        }

        #[test]
        fn success_leaves_pool_unchanged() {
            let mut p = pool(vec![D8, D6]);
            let outcome = p.resolve_roll(1, 4, |_| 4).unwrap();
            assert!(outcome.success);
            assert_eq!(outcome.new_dice_pool, vec![Some(D8), Some(D6)]);
            assert_eq!(p.slots(), &[Some(D8), Some(D6)]);
        }

        #[test]
        fn failure_degrades_exactly_one_step() {
            for (die, expected) in [(D12, D10), (D10, D8), (D8, D6), (D6, D4)] {
                let mut p = pool(vec![die, D12]);
                let outcome = p.resolve_roll(0, 13, |_| 1).unwrap();
                assert!(!outcome.success);
                assert_eq!(p.die_at(0), Some(expected));
                assert_eq!(p.live_count(), 2);
                assert_eq!(outcome.resulting_die(), Some(expected));
            }
        }

        #[test]
        fn failed_d4_exhausts_slot_in_place() {
            let mut p = pool(vec![D4, D6]);
            let outcome = p.resolve_roll(0, 5, |_| 2).unwrap();
            assert!(outcome.exhausted_slot());
            assert_eq!(outcome.new_dice_pool, vec![None, Some(D6)]);
            assert_eq!(p.live_count(), 1);
            assert_eq!(p.die_at(1), Some(D6));
        }

        #[test]
        fn rejects_zero_investment() {
            let mut p = pool(vec![D6]);
            let err = p.resolve_roll(0, 0, |_| 3).unwrap_err();
            assert!(matches!(err, DomainError::InvalidRequest(_)));
            assert_eq!(p.slots(), &[Some(D6)]);
        }

        #[test]
        fn rejects_out_of_range_index() {
            let mut p = pool(vec![D6, D6]);
            assert!(p.resolve_roll(2, 1, |_| 3).is_err());
            assert_eq!(p.live_count(), 2);
        }

        #[test]
        fn rejects_empty_pool() {
            let mut p = pool(vec![]);
            assert!(matches!(
                p.resolve_roll(0, 1, |_| 1),
                Err(DomainError::InvalidRequest(_))
            ));

            let mut holes = pool(vec![D4]);
            holes.resolve_roll(0, 4, |_| 1).unwrap();
            assert!(holes.is_exhausted());
            assert!(holes.resolve_roll(0, 1, |_| 1).is_err());
        }

        #[test]
        fn rejects_exhausted_slot() {
            let mut p = pool(vec![D4, D8]);
            p.resolve_roll(0, 4, |_| 1).unwrap();
            let err = p.resolve_roll(0, 1, |_| 1).unwrap_err();
            assert!(err.to_string().contains("exhausted"));
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn provisioned_pool_matches_level_table() {
            let p = SpiritDiePool::provisioned(CharacterId::new(), level(14));
            assert_eq!(p.live_dice(), vec![D8, D10]);
            assert!(p.override_dice().is_none());
        }

        #[test]
        fn override_replaces_live_pool_and_baseline() {
            let mut p = SpiritDiePool::provisioned(CharacterId::new(), level(3));
            p.apply_override(vec![D8, D10]).unwrap();
            assert_eq!(p.slots(), &[Some(D8), Some(D10)]);
            assert_eq!(p.override_dice(), Some(&[D8, D10][..]));
            assert_eq!(p.baseline(level(3)), vec![D8, D10]);
        }

        #[test]
        fn empty_override_is_rejected() {
            let mut p = pool(vec![D6]);
            assert!(p.apply_override(vec![]).is_err());
            assert_eq!(p.slots(), &[Some(D6)]);
        }

        #[test]
        fn reset_to_level_clears_override() {
            let mut p = pool(vec![D6]);
            p.apply_override(vec![D8, D10]).unwrap();
            p.reset_to_level(level(6));
            assert!(p.override_dice().is_none());
            assert_eq!(p.live_dice(), vec![D4, D6]);
        }

        #[test]
        fn long_rest_uses_override_when_present() {
            let mut p = pool(vec![D6, D6]);
            p.apply_override(vec![D12]).unwrap();
            p.resolve_roll(0, 13, |_| 1).unwrap();
            let baseline = p.baseline(level(8));
            p.long_rest(baseline);
            assert_eq!(p.slots(), &[Some(D12)]);
        }

        #[test]
        fn long_rest_then_roll_ignores_prior_degradation() {
            let lvl = level(8);
            let mut rested = SpiritDiePool::provisioned(CharacterId::new(), lvl);
            rested.resolve_roll(0, 6, |_| 1).unwrap();
            rested.resolve_roll(0, 6, |_| 1).unwrap();
            assert_eq!(rested.slots(), &[None, Some(D6)]);
            let baseline = rested.baseline(lvl);
            rested.long_rest(baseline);

            let mut fresh = SpiritDiePool::provisioned(rested.character_id(), lvl);
            let a = rested.resolve_roll(0, 5, |_| 3).unwrap();
            let b = fresh.resolve_roll(0, 5, |_| 3).unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn restore_slot_refills_hole_at_original_index() {
            let lvl = level(8);
            let mut p = SpiritDiePool::provisioned(CharacterId::new(), lvl);
            p.resolve_roll(0, 6, |_| 1).unwrap();
            p.resolve_roll(0, 6, |_| 1).unwrap();
            assert_eq!(p.slots(), &[None, Some(D6)]);

            let outcome = p.restore_slot(0, &p.baseline(lvl)).unwrap();
            assert_eq!(outcome.from, None);
            assert_eq!(outcome.to, D6);
            assert!(outcome.changed());
            assert_eq!(p.slots(), &[Some(D6), Some(D6)]);
        }

        #[test]
        fn restore_slot_pads_short_pools() {
            let mut p = pool(vec![D4]);
            p.restore_slot(2, &[D6, D8, D10]).unwrap();
            assert_eq!(p.slots(), &[Some(D4), None, Some(D10)]);
        }

        #[test]
        fn restore_slot_rejects_index_outside_baseline() {
            let mut p = pool(vec![D6, D6]);
            assert!(p.restore_slot(2, &[D6, D6]).is_err());
            assert_eq!(p.slots().len(), 2);
        }

        #[test]
        fn override_baseline_edit_leaves_live_slots() {
            let mut p = pool(vec![D4, D4]);
            p.set_override_baseline(Some(vec![D12])).unwrap();
            assert_eq!(p.slots(), &[Some(D4), Some(D4)]);
            assert!(p.set_override_baseline(Some(vec![])).is_err());
            p.set_override_baseline(None).unwrap();
            assert!(p.override_dice().is_none());
        }
    }

    mod scenarios {
        use super::*;

        #[test]
        fn level_eight_failure_chain() {
            let mut p = SpiritDiePool::provisioned(CharacterId::new(), level(8));
            assert_eq!(p.live_dice(), vec![D6, D6]);

            let first = p.resolve_roll(0, 5, |_| 3).unwrap();
            assert!(!first.success);
            assert_eq!(first.new_dice_pool, vec![Some(D4), Some(D6)]);

            let second = p.resolve_roll(0, 5, |_| 1).unwrap();
            assert!(!second.success);
            assert_eq!(second.die_rolled, D4);
            assert_eq!(second.new_dice_pool, vec![None, Some(D6)]);

            // The surviving d6 keeps its slot index.
            assert_eq!(p.die_at(1), Some(D6));
            assert!(p.resolve_roll(1, 1, |_| 1).unwrap().success);
        }
    }

    #[test]
    fn wire_format_marks_holes_as_null() {
        let mut p = pool(vec![D4, D10]);
        p.resolve_roll(0, 3, |_| 1).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["currentDice"], serde_json::json!([null, "d10"]));
        assert_eq!(json["overrideDice"], serde_json::Value::Null);

        let back: SpiritDiePool = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
