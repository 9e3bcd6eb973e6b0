//! Placement grid
//!
//! Fixed array of unit slots. Slot `i` defends lane `i % GRID_COLS`. Every
//! operation keeps `unit.slot` equal to the index the unit is stored at.
//! Indices outside the grid are caller bugs and panic.

use serde::{Deserialize, Serialize};

use super::state::{EntityIds, PlacedUnit};
use super::stats::UnitTier;
use crate::consts::TOTAL_SLOTS;

/// Result of a drag from one slot to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Source empty or same slot; nothing changed
    Rejected,
    /// Unit relocated to an empty slot
    Moved,
    /// Incompatible units traded places
    Swapped,
    /// Two equal units fused into one of the next tier
    Merged { tier: UnitTier },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementGrid {
    slots: [Option<PlacedUnit>; TOTAL_SLOTS],
}

fn check_slot(slot: usize) {
    assert!(slot < TOTAL_SLOTS, "slot {slot} outside grid of {TOTAL_SLOTS}");
}

impl PlacementGrid {
    pub fn get(&self, slot: usize) -> Option<&PlacedUnit> {
        check_slot(slot);
        self.slots[slot].as_ref()
    }

    pub fn is_occupied(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    /// All slots in index order
    pub fn slots(&self) -> &[Option<PlacedUnit>] {
        &self.slots
    }

    /// Occupied slots in index order
    pub fn units(&self) -> impl Iterator<Item = &PlacedUnit> {
        self.slots.iter().flatten()
    }

    pub(crate) fn units_mut(&mut self) -> impl Iterator<Item = &mut PlacedUnit> {
        self.slots.iter_mut().flatten()
    }

    pub fn empty_slots(&self) -> Vec<usize> {
        (0..TOTAL_SLOTS).filter(|&i| self.slots[i].is_none()).collect()
    }

    /// Slots whose unit can still be promoted
    pub fn upgradable_slots(&self) -> Vec<usize> {
        self.units().filter(|u| !u.tier.is_max()).map(|u| u.slot).collect()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn unit_count(&self) -> usize {
        self.units().count()
    }

    /// Put a unit on an empty slot. Returns false if the slot is taken.
    pub fn place(&mut self, slot: usize, mut unit: PlacedUnit) -> bool {
        check_slot(slot);
        if self.slots[slot].is_some() {
            return false;
        }
        unit.slot = slot;
        self.slots[slot] = Some(unit);
        true
    }

    pub fn remove(&mut self, slot: usize) -> Option<PlacedUnit> {
        check_slot(slot);
        self.slots[slot].take()
    }

    /// Raise the unit at `slot` by one tier. Returns the new tier, or None if
    /// the slot is empty or the unit is already at max tier.
    pub fn promote(&mut self, slot: usize) -> Option<UnitTier> {
        check_slot(slot);
        let unit = self.slots[slot].as_mut()?;
        let next = unit.tier.next()?;
        unit.tier = next;
        Some(next)
    }

    /// Drag the unit at `from` onto `to`.
    ///
    /// Empty target: relocate. Equal tiers below max: the source is absorbed
    /// and the target is promoted under a fresh identity. Anything else: the
    /// two units swap places.
    pub fn move_or_merge(&mut self, from: usize, to: usize, ids: &mut EntityIds) -> MoveOutcome {
        check_slot(from);
        check_slot(to);
        if from == to {
            return MoveOutcome::Rejected;
        }
        let Some(mut source) = self.slots[from].take() else {
            return MoveOutcome::Rejected;
        };

        match self.slots[to].take() {
            None => {
                source.slot = to;
                self.slots[to] = Some(source);
                MoveOutcome::Moved
            }
            Some(mut target) => match source.tier.next().filter(|_| source.tier == target.tier) {
                Some(tier) => {
                    target.tier = tier;
                    target.id = ids.next_id();
                    self.slots[to] = Some(target);
                    MoveOutcome::Merged { tier }
                }
                None => {
                    source.slot = to;
                    target.slot = from;
                    self.slots[to] = Some(source);
                    self.slots[from] = Some(target);
                    MoveOutcome::Swapped
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EntityId;

    fn tier(t: u8) -> UnitTier {
        UnitTier::new(t).unwrap()
    }

    fn grid_with(units: &[(usize, u8)], ids: &mut EntityIds) -> PlacementGrid {
        let mut grid = PlacementGrid::default();
        for &(slot, t) in units {
            assert!(grid.place(slot, PlacedUnit::new(ids.next_id(), tier(t), slot)));
        }
        grid
    }

    #[test]
    fn place_rejects_occupied_slot() {
        let mut ids = EntityIds::default();
        let mut grid = grid_with(&[(3, 1)], &mut ids);
        assert!(!grid.place(3, PlacedUnit::new(ids.next_id(), tier(2), 3)));
        assert_eq!(grid.get(3).map(|u| u.tier), Some(tier(1)));
    }

    #[test]
    fn place_fixes_slot_index() {
        let mut grid = PlacementGrid::default();
        assert!(grid.place(6, PlacedUnit::new(EntityId(1), tier(1), 0)));
        assert_eq!(grid.get(6).map(|u| u.slot), Some(6));
    }

    #[test]
    #[should_panic(expected = "outside grid")]
    fn out_of_range_slot_panics() {
        let grid = PlacementGrid::default();
        let _ = grid.get(TOTAL_SLOTS);
    }

    #[test]
    fn move_to_empty_slot() {
        let mut ids = EntityIds::default();
        let mut grid = grid_with(&[(0, 2)], &mut ids);
        let id = grid.get(0).map(|u| u.id);
        assert_eq!(grid.move_or_merge(0, 9, &mut ids), MoveOutcome::Moved);
        assert!(grid.get(0).is_none());
        let moved = grid.get(9).unwrap();
        assert_eq!(moved.slot, 9);
        assert_eq!(Some(moved.id), id);
    }

    #[test]
    fn empty_source_or_same_slot_is_rejected() {
        let mut ids = EntityIds::default();
        let mut grid = grid_with(&[(1, 1)], &mut ids);
        let before = grid.clone();
        assert_eq!(grid.move_or_merge(0, 1, &mut ids), MoveOutcome::Rejected);
        assert_eq!(grid.move_or_merge(1, 1, &mut ids), MoveOutcome::Rejected);
        assert_eq!(grid, before);
    }

    #[test]
    fn equal_tiers_merge_with_fresh_identity() {
        let mut ids = EntityIds::default();
        let mut grid = grid_with(&[(0, 3), (1, 3)], &mut ids);
        let old_target = grid.get(1).map(|u| u.id);
        assert_eq!(grid.move_or_merge(0, 1, &mut ids), MoveOutcome::Merged { tier: tier(4) });
        assert!(grid.get(0).is_none());
        let merged = grid.get(1).unwrap();
        assert_eq!(merged.tier, tier(4));
        assert_eq!(merged.slot, 1);
        assert_ne!(Some(merged.id), old_target);
        assert_eq!(grid.unit_count(), 1);
    }

    #[test]
    fn merge_keeps_target_cooldown() {
        let mut ids = EntityIds::default();
        let mut grid = PlacementGrid::default();
        let mut source = PlacedUnit::new(ids.next_id(), tier(2), 0);
        source.last_fired_ms = Some(900.0);
        let mut target = PlacedUnit::new(ids.next_id(), tier(2), 1);
        target.last_fired_ms = Some(400.0);
        grid.place(0, source);
        grid.place(1, target);

        grid.move_or_merge(0, 1, &mut ids);
        assert_eq!(grid.get(1).and_then(|u| u.last_fired_ms), Some(400.0));
    }

    #[test]
    fn different_tiers_swap() {
        let mut ids = EntityIds::default();
        let mut grid = grid_with(&[(2, 1), (7, 4)], &mut ids);
        assert_eq!(grid.move_or_merge(2, 7, &mut ids), MoveOutcome::Swapped);
        assert_eq!(grid.get(2).map(|u| (u.tier, u.slot)), Some((tier(4), 2)));
        assert_eq!(grid.get(7).map(|u| (u.tier, u.slot)), Some((tier(1), 7)));
    }

    #[test]
    fn max_tier_pair_swaps_instead_of_merging() {
        let mut ids = EntityIds::default();
        let mut grid = grid_with(&[(0, 10), (1, 10)], &mut ids);
        let a = grid.get(0).map(|u| u.id);
        assert_eq!(grid.move_or_merge(0, 1, &mut ids), MoveOutcome::Swapped);
        assert_eq!(grid.get(1).map(|u| u.id), a);
        assert!(grid.units().all(|u| u.tier == UnitTier::MAX));
    }

    #[test]
    fn promote_stops_at_max() {
        let mut ids = EntityIds::default();
        let mut grid = grid_with(&[(4, 9)], &mut ids);
        assert_eq!(grid.upgradable_slots(), vec![4]);
        assert_eq!(grid.promote(4), Some(UnitTier::MAX));
        assert_eq!(grid.promote(4), None);
        assert_eq!(grid.promote(5), None);
        assert!(grid.upgradable_slots().is_empty());
    }

    #[test]
    fn fullness() {
        let mut ids = EntityIds::default();
        let all: Vec<(usize, u8)> = (0..TOTAL_SLOTS).map(|s| (s, 1)).collect();
        let grid = grid_with(&all, &mut ids);
        assert!(grid.is_full());
        assert!(grid.empty_slots().is_empty());
    }
}
