//! Sound cues
//!
//! Maps simulation events to the sound effects a presentation layer should
//! play. Playback itself belongs to the platform; this only decides what.

use crate::sim::{BonusKind, GameEvent};

/// Shots from the whole grid collapse into one cue per window
pub const SHOOT_THROTTLE_MS: f64 = 50.0;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Unit summoned onto the grid
    Spawn,
    /// Two units merged
    Merge,
    /// Units fired
    Shoot,
    /// Projectile hit or wall breached
    Hit,
    /// Enemy killed
    Death,
    /// Bonus collected or level cleared
    Bonus,
    /// Bomb bonus detonated
    Bomb,
    /// Run lost
    GameOver,
}

/// Turns event batches into cues, throttling gunfire
#[derive(Debug, Clone, Default)]
pub struct SoundCues {
    last_shoot_ms: Option<f64>,
}

impl SoundCues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues for the events of one tick at simulation time `now_ms`
    pub fn cues_for(&mut self, events: &[GameEvent], now_ms: f64) -> Vec<SoundEffect> {
        let mut cues = Vec::new();
        let mut fired = false;

        for event in events {
            let cue = match event {
                GameEvent::UnitPlaced { .. } => SoundEffect::Spawn,
                GameEvent::UnitMerged { .. } => SoundEffect::Merge,
                GameEvent::UnitsFired { .. } => {
                    fired = true;
                    continue;
                }
                GameEvent::ProjectileHit { .. } | GameEvent::WallBreached { .. } => SoundEffect::Hit,
                GameEvent::EnemyKilled { .. } => SoundEffect::Death,
                GameEvent::LevelUp { .. } => SoundEffect::Bonus,
                GameEvent::BonusCollected { kind: BonusKind::Bomb } => SoundEffect::Bomb,
                GameEvent::BonusCollected { .. } => SoundEffect::Bonus,
                GameEvent::GameOver => SoundEffect::GameOver,
                _ => continue,
            };
            cues.push(cue);
        }

        let throttled = self
            .last_shoot_ms
            .is_some_and(|last| now_ms - last <= SHOOT_THROTTLE_MS);
        if fired && !throttled {
            cues.push(SoundEffect::Shoot);
            self.last_shoot_ms = Some(now_ms);
        }

        cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EntityId;

    #[test]
    fn maps_gameplay_events() {
        let mut cues = SoundCues::new();
        let events = [
            GameEvent::UnitPlaced { slot: 0 },
            GameEvent::EnemyKilled {
                id: EntityId(1),
                kind: crate::sim::EnemyKind::Normal,
                reward: 20,
            },
            GameEvent::BonusCollected { kind: BonusKind::Bomb },
            GameEvent::WaveAdvanced { level: 1, wave: 2 },
            GameEvent::GameOver,
        ];
        assert_eq!(
            cues.cues_for(&events, 0.0),
            vec![SoundEffect::Spawn, SoundEffect::Death, SoundEffect::Bomb, SoundEffect::GameOver]
        );
    }

    #[test]
    fn each_bonus_tap_plays_one_cue() {
        use crate::sim::{Enemy, EnemyKind, Game, PlacedUnit, ScriptedRandom, UnitTier};
        use crate::tuning::Tuning;

        for (kind, expected) in [
            (BonusKind::Upgrade, SoundEffect::Bonus),
            (BonusKind::GrantUnit, SoundEffect::Bonus),
            (BonusKind::Bomb, SoundEffect::Bomb),
        ] {
            let mut game = Game::new(Tuning::default());
            game.start_session(1);
            let unit = game.next_entity_id();
            game.grid.place(0, PlacedUnit::new(unit, UnitTier::MIN, 0));
            let id = game.next_entity_id();
            game.registry.spawn_enemy(Enemy {
                id,
                lane: 1,
                y: 30.0,
                hp: 1,
                max_hp: 1,
                speed: 0.2,
                tier: 0,
                kind: EnemyKind::Bonus(kind),
            });
            game.drain_events();

            assert_eq!(game.resolve_bonus(id, &mut ScriptedRandom::constant(0.5)), Some(kind));
            let cues = SoundCues::new().cues_for(&game.drain_events(), 0.0);
            assert_eq!(cues, vec![expected], "{kind:?}");
        }
    }

    #[test]
    fn gunfire_is_throttled() {
        let mut cues = SoundCues::new();
        let fired = [GameEvent::UnitsFired { units: 3, projectiles: 5 }];
        assert_eq!(cues.cues_for(&fired, 0.0), vec![SoundEffect::Shoot]);
        assert!(cues.cues_for(&fired, 16.7).is_empty());
        assert!(cues.cues_for(&fired, 50.0).is_empty());
        assert_eq!(cues.cues_for(&fired, 50.1), vec![SoundEffect::Shoot]);
    }
}
