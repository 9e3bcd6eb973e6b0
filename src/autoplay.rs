//! Demo player
//!
//! A simple deterministic strategy used by the headless binary and by long
//! soak tests: collect every bonus, merge equal units, summon when affordable.

use crate::sim::{Game, MoveOutcome, RandomSource};

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoPlayer {
    /// Keep this much mana in reserve before summoning
    pub mana_reserve: i64,
}

impl AutoPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every action currently worth taking. Returns how many were taken.
    pub fn act(&self, game: &mut Game, rng: &mut impl RandomSource) -> u32 {
        if !game.accepts_input() {
            return 0;
        }
        let mut actions = 0;

        let bonuses: Vec<_> = game
            .registry
            .enemies()
            .iter()
            .filter(|e| e.kind.is_bonus())
            .map(|e| e.id)
            .collect();
        for id in bonuses {
            if game.resolve_bonus(id, rng).is_some() {
                actions += 1;
            }
        }

        while let Some((from, to)) = find_merge(game) {
            if !matches!(game.move_or_merge(from, to), MoveOutcome::Merged { .. }) {
                break;
            }
            actions += 1;
        }

        while game.session.mana - self.mana_reserve >= game.session.spawn_cost {
            if game.summon_unit(rng).is_none() {
                break;
            }
            actions += 1;
        }

        actions
    }
}

/// First pair of equal, non-max units. Merges toward the lower slot so
/// stronger units gather in the front row.
fn find_merge(game: &Game) -> Option<(usize, usize)> {
    let units: Vec<_> = game.grid.units().filter(|u| !u.tier.is_max()).collect();
    units.iter().enumerate().find_map(|(i, a)| {
        units[i + 1..]
            .iter()
            .find(|b| b.tier == a.tier)
            .map(|b| (b.slot, a.slot))
    })
}
