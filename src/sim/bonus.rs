//! Bonus resolution
//!
//! Tapping a bonus enemy removes it immediately and applies its reward.

use glam::Vec2;

use super::random::RandomSource;
use super::state::{BonusKind, EffectStyle, EntityId, Game, GameEvent, PlacedUnit};
use super::stats::UnitTier;
use crate::consts::GRID_START_Y;
use crate::{lane_center_x, slot_lane};

impl Game {
    /// Collect the bonus enemy `enemy_id`.
    ///
    /// Returns the bonus applied, or None if the id is unknown, names a
    /// combat enemy, or the session is not accepting input.
    pub fn resolve_bonus(&mut self, enemy_id: EntityId, rng: &mut impl RandomSource) -> Option<BonusKind> {
        if !self.accepts_input() {
            return None;
        }
        let kind = self.registry.enemy(enemy_id)?.kind.bonus()?;
        self.registry.take_enemy(enemy_id);

        log::debug!("Bonus collected: {:?}", kind);
        match kind {
            BonusKind::Bomb => self.detonate_bomb(),
            BonusKind::Upgrade => self.upgrade_random_unit(rng),
            BonusKind::GrantUnit => self.grant_free_unit(rng),
        }
        self.emit(GameEvent::BonusCollected { kind });
        Some(kind)
    }

    /// Destroy every regular enemy and hammer the boss; other bonuses survive
    fn detonate_bomb(&mut self) {
        let boss_damage = self.tuning.bomb_boss_damage_per_level * i64::from(self.session.level);
        let mut boss_hits = Vec::new();

        let destroyed = self.registry.remove_enemies_where(|enemy| {
            if enemy.kind.is_bonus() {
                return false;
            }
            if enemy.kind.is_boss() {
                enemy.hp -= boss_damage;
                boss_hits.push(enemy.y);
                return false;
            }
            true
        });

        for y in boss_hits {
            self.spawn_effect(Vec2::new(50.0, y), format!("-{boss_damage}"), EffectStyle::BossBomb);
        }
        for enemy in &destroyed {
            self.spawn_effect(
                Vec2::new(lane_center_x(enemy.lane), enemy.y),
                "BOOM!".to_string(),
                EffectStyle::Bomb,
            );
        }
        self.kills += destroyed.len() as u32;
    }

    fn upgrade_random_unit(&mut self, rng: &mut impl RandomSource) {
        let candidates = self.grid.upgradable_slots();
        if candidates.is_empty() {
            self.grant_mana(self.tuning.upgrade_fallback_mana);
            return;
        }

        let slot = candidates[rng.pick(candidates.len())];
        if let Some(tier) = self.grid.promote(slot) {
            self.spawn_effect(
                Vec2::new(lane_center_x(slot_lane(slot)), GRID_START_Y),
                "UPGRADE!".to_string(),
                EffectStyle::Upgrade,
            );
            self.emit(GameEvent::UnitUpgraded { slot, tier });
            if tier.is_max() {
                self.emit(GameEvent::MaxTierReached { slot });
            }
        }
    }

    fn grant_free_unit(&mut self, rng: &mut impl RandomSource) {
        let empty = self.grid.empty_slots();
        if empty.is_empty() {
            self.grant_mana(self.tuning.grant_fallback_mana);
            return;
        }

        let slot = empty[rng.pick(empty.len())];
        let id = self.next_entity_id();
        self.grid.place(slot, PlacedUnit::new(id, UnitTier::MIN, slot));
        self.spawn_effect(
            Vec2::new(lane_center_x(slot_lane(slot)), GRID_START_Y),
            "FREE!".to_string(),
            EffectStyle::FreeUnit,
        );
        self.emit(GameEvent::UnitGranted { slot });
    }

    fn grant_mana(&mut self, amount: i64) {
        self.session.mana += amount;
        self.spawn_effect(Vec2::new(50.0, 50.0), format!("+{amount} MANA"), EffectStyle::Mana);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TOTAL_SLOTS;
    use crate::sim::random::ScriptedRandom;
    use crate::sim::state::{Enemy, EnemyKind};
    use crate::tuning::Tuning;

    fn started(level: u32) -> Game {
        let mut game = Game::new(Tuning::default());
        game.start_session(level);
        game.drain_events();
        game
    }

    fn add_enemy(game: &mut Game, lane: usize, hp: i64, kind: EnemyKind) -> EntityId {
        let id = game.next_entity_id();
        game.registry.spawn_enemy(Enemy {
            id,
            lane,
            y: 30.0,
            hp,
            max_hp: hp,
            speed: 0.2,
            tier: 1,
            kind,
        })
    }

    fn put(game: &mut Game, slot: usize, tier: u8) {
        let id = game.next_entity_id();
        game.grid.place(slot, PlacedUnit::new(id, UnitTier::new(tier).unwrap(), slot));
    }

    #[test]
    fn bomb_clears_field_and_hurts_boss() {
        let mut game = started(3);
        let bomb = add_enemy(&mut game, 0, 1, EnemyKind::Bonus(BonusKind::Bomb));
        add_enemy(&mut game, 1, 50, EnemyKind::Normal);
        add_enemy(&mut game, 2, 50, EnemyKind::Fast);
        let boss = add_enemy(&mut game, 2, 100_000, EnemyKind::Boss);
        let other_bonus = add_enemy(&mut game, 4, 1, EnemyKind::Bonus(BonusKind::Upgrade));

        let applied = game.resolve_bonus(bomb, &mut ScriptedRandom::constant(0.5));

        assert_eq!(applied, Some(BonusKind::Bomb));
        let remaining: Vec<_> = game.registry.enemies().iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![boss, other_bonus]);
        assert_eq!(game.registry.enemy(boss).map(|e| e.hp), Some(100_000 - 15_000));
        assert_eq!(game.kills, 2);
        assert_eq!(game.session.mana, 200, "bomb kills carry no reward");
        assert_eq!(game.registry.effects().len(), 3);

        let boss_marker: Vec<_> = game
            .registry
            .effects()
            .iter()
            .filter(|e| e.style == EffectStyle::BossBomb)
            .map(|e| (e.text.as_str(), e.life))
            .collect();
        assert_eq!(boss_marker, vec![("-15000", 60)]);
    }

    #[test]
    fn combat_enemies_cannot_be_collected() {
        let mut game = started(1);
        let enemy = add_enemy(&mut game, 0, 10, EnemyKind::Normal);
        assert_eq!(game.resolve_bonus(enemy, &mut ScriptedRandom::constant(0.5)), None);
        assert!(game.registry.enemy(enemy).is_some());
        assert_eq!(game.resolve_bonus(EntityId(9_999), &mut ScriptedRandom::constant(0.5)), None);
    }

    #[test]
    fn upgrade_promotes_a_random_eligible_unit() {
        let mut game = started(1);
        put(&mut game, 0, 10);
        put(&mut game, 3, 2);
        put(&mut game, 7, 5);
        let bonus = add_enemy(&mut game, 0, 1, EnemyKind::Bonus(BonusKind::Upgrade));

        // eligible slots are [3, 7]; 0.9 picks slot 7
        game.resolve_bonus(bonus, &mut ScriptedRandom::constant(0.9));

        assert_eq!(game.grid.get(7).map(|u| u.tier.get()), Some(6));
        assert_eq!(game.grid.get(3).map(|u| u.tier.get()), Some(2));
        assert_eq!(game.grid.get(0).map(|u| u.tier.get()), Some(10));
        assert!(game.registry.enemies().is_empty());
    }

    #[test]
    fn upgrade_without_candidates_grants_mana() {
        let mut game = started(1);
        put(&mut game, 0, 10);
        let bonus = add_enemy(&mut game, 0, 1, EnemyKind::Bonus(BonusKind::Upgrade));
        game.resolve_bonus(bonus, &mut ScriptedRandom::constant(0.1));
        assert_eq!(game.session.mana, 300);
    }

    #[test]
    fn grant_places_free_unit() {
        let mut game = started(1);
        let bonus = add_enemy(&mut game, 0, 1, EnemyKind::Bonus(BonusKind::GrantUnit));
        game.resolve_bonus(bonus, &mut ScriptedRandom::constant(0.0));
        assert_eq!(game.grid.get(0).map(|u| u.tier), Some(UnitTier::MIN));
        assert_eq!(game.session.mana, 200, "free unit costs nothing");
        assert_eq!(game.session.spawn_cost, 100);
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::UnitGranted { slot: 0 },
                GameEvent::BonusCollected { kind: BonusKind::GrantUnit }
            ]
        );
    }

    #[test]
    fn grant_on_full_grid_pays_smaller_fallback() {
        let mut game = started(1);
        for slot in 0..TOTAL_SLOTS {
            put(&mut game, slot, 1);
        }
        let bonus = add_enemy(&mut game, 0, 1, EnemyKind::Bonus(BonusKind::GrantUnit));
        game.resolve_bonus(bonus, &mut ScriptedRandom::constant(0.0));
        assert_eq!(game.session.mana, 250);
        assert!(game.registry.enemies().is_empty());
    }
}
