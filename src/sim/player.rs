//! Player actions on the placement grid
//!
//! Illegal actions are silently ignored; the returned value tells the caller
//! what happened so the presentation can react.

use glam::Vec2;

use super::grid::MoveOutcome;
use super::random::RandomSource;
use super::state::{EffectStyle, Game, GameEvent, PlacedUnit};
use super::stats::{UnitTier, next_spawn_cost};
use crate::{lane_center_x, slot_center_y, slot_lane};

impl Game {
    /// Summon a tier-1 unit onto `slot`, paying the current spawn cost.
    ///
    /// Rejected (returns false) when mana is short, the slot is taken or the
    /// session is not accepting input. Panics if `slot` is outside the grid.
    pub fn place_unit(&mut self, slot: usize) -> bool {
        if self.grid.is_occupied(slot) || !self.accepts_input() || self.session.mana < self.session.spawn_cost {
            return false;
        }

        let id = self.next_entity_id();
        self.grid.place(slot, PlacedUnit::new(id, UnitTier::MIN, slot));
        self.session.mana -= self.session.spawn_cost;
        self.session.spawn_cost = next_spawn_cost(&self.tuning, self.session.spawn_cost);
        self.emit(GameEvent::UnitPlaced { slot });
        true
    }

    /// Summon onto a uniformly chosen empty slot. Returns the slot used.
    pub fn summon_unit(&mut self, rng: &mut impl RandomSource) -> Option<usize> {
        if !self.accepts_input() || self.session.mana < self.session.spawn_cost {
            return None;
        }
        let empty = self.grid.empty_slots();
        if empty.is_empty() {
            return None;
        }
        let slot = empty[rng.pick(empty.len())];
        self.place_unit(slot).then_some(slot)
    }

    /// Drag a unit from `from` onto `to`: move, merge or swap.
    ///
    /// Panics if either slot is outside the grid.
    pub fn move_or_merge(&mut self, from: usize, to: usize) -> MoveOutcome {
        if !self.accepts_input() {
            // Still validate indices so contract violations surface
            let _ = (self.grid.get(from), self.grid.get(to));
            return MoveOutcome::Rejected;
        }

        let outcome = self.grid.move_or_merge(from, to, &mut self.ids);
        match outcome {
            MoveOutcome::Rejected => {}
            MoveOutcome::Moved => self.emit(GameEvent::UnitMoved { from, to }),
            MoveOutcome::Swapped => {
                log::debug!("Swapped units in slots {} and {}", from, to);
                self.emit(GameEvent::UnitsSwapped { a: from, b: to });
            }
            MoveOutcome::Merged { tier } => {
                self.merges += 1;
                log::debug!("Merged into tier {} at slot {}", tier.get(), to);
                let pos = Vec2::new(lane_center_x(slot_lane(to)), slot_center_y(to));
                self.spawn_effect(pos, "MERGE!".to_string(), EffectStyle::Merge);
                self.emit(GameEvent::UnitMerged { slot: to, tier });
                if tier.is_max() {
                    self.emit(GameEvent::MaxTierReached { slot: to });
                }
            }
        }
        outcome
    }
}
