//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one quantum. The phases run in a
//! fixed order and each sees what the previous ones did within the same tick:
//! spawn, projectiles, enemies, level resolution, unit fire, effects.

use glam::Vec2;

use super::random::RandomSource;
use super::state::{EffectStyle, Enemy, EnemyKind, Game, GameEvent, Projectile, SessionState};
use super::stats::enemy_stats;
use crate::consts::LANE_COUNT;
use crate::{lane_center_x, slot_center_y, slot_lane};

/// Advance the game by one tick.
///
/// `now_ms` is the simulation clock used for unit cooldowns. Does nothing
/// unless the session is playing, unpaused and not yet decided.
pub fn tick<'a>(game: &'a mut Game, now_ms: f64, rng: &mut impl RandomSource) -> &'a SessionState {
    if !game.session.is_running() {
        return &game.session;
    }

    spawn_enemies(game, rng);
    advance_projectiles(game);
    let boss_defeated = advance_enemies(game);
    resolve_progression(game, boss_defeated);
    fire_units(game, now_ms);
    game.registry.age_and_prune_effects(game.tuning.effect_drift);

    &game.session
}

/// Phase 1: countdown, spawn, wave advance
fn spawn_enemies(game: &mut Game, rng: &mut impl RandomSource) {
    game.session.spawn_timer -= 1.0;

    let level = game.session.level;
    let wave = game.session.wave;
    let boss_wave = game.tuning.is_boss_wave(wave);
    // The boss wave spawns exactly once
    let can_spawn = !boss_wave || game.session.enemies_spawned_in_wave == 0;

    if !can_spawn || game.session.spawn_timer > 0.0 {
        return;
    }

    let enemy = if boss_wave {
        game.session.enemies_spawned_in_wave = 1;
        let lane = game.tuning.boss_lane;
        build_enemy(game, level, wave, lane, true, rng)
    } else {
        let lane = rng.pick(LANE_COUNT);
        game.session.enemies_spawned_in_wave += 1;
        build_enemy(game, level, wave, lane, false, rng)
    };

    game.emit(GameEvent::EnemySpawned {
        id: enemy.id,
        kind: enemy.kind,
        lane: enemy.lane,
    });
    game.registry.spawn_enemy(enemy);

    game.session.spawn_timer = if boss_wave {
        game.tuning.boss_spawn_delay
    } else {
        game.tuning.spawn_interval(level, wave)
    };

    if !boss_wave && game.session.enemies_spawned_in_wave >= game.tuning.enemies_per_wave {
        game.session.wave += 1;
        game.session.enemies_spawned_in_wave = 0;
        game.session.spawn_timer = game.tuning.wave_delay;

        let wave = game.session.wave;
        log::info!("Level {} wave {}", level, wave);
        game.spawn_effect(Vec2::new(50.0, 40.0), format!("WAVE {wave}"), EffectStyle::WaveBanner);
        game.emit(GameEvent::WaveAdvanced { level, wave });
    }
}

/// Roll a new enemy: bosses are forced, other spawns may turn into bonuses
fn build_enemy(
    game: &mut Game,
    level: u32,
    wave: u32,
    lane: usize,
    boss: bool,
    rng: &mut impl RandomSource,
) -> Enemy {
    let id = game.next_entity_id();
    let y = game.tuning.spawn_y;

    if !boss && rng.next_f64() < game.tuning.bonus_chance {
        let kind = game.tuning.bonus_for_roll(rng.next_f64());
        return Enemy {
            id,
            lane,
            y,
            hp: 1,
            max_hp: 1,
            speed: game.tuning.bonus_speed,
            tier: 0,
            kind: EnemyKind::Bonus(kind),
        };
    }

    let stats = enemy_stats(&game.tuning, level, wave, boss);
    Enemy {
        id,
        lane,
        y,
        hp: stats.hp,
        max_hp: stats.hp,
        speed: stats.speed,
        tier: stats.tier,
        kind: stats.kind,
    }
}

/// Phase 2: move projectiles and resolve hits (first enemy in registry order wins)
fn advance_projectiles(game: &mut Game) {
    let tolerance = game.tuning.hit_tolerance;
    let exit_y = game.tuning.spawn_y;
    let mut hits = Vec::new();

    let (projectiles, enemies) = game.registry.projectiles_and_enemies_mut();
    projectiles.retain_mut(|proj| {
        proj.y -= proj.speed;

        let target = enemies
            .iter_mut()
            .find(|e| !e.kind.is_bonus() && e.lane == proj.lane && (e.y - proj.y).abs() < tolerance);

        if let Some(enemy) = target {
            enemy.hp -= proj.damage;
            hits.push((enemy.id, enemy.lane, enemy.y, proj.damage));
            return false;
        }

        proj.y > exit_y
    });

    for (enemy, lane, y, damage) in hits {
        game.emit(GameEvent::ProjectileHit { enemy, damage });
        game.spawn_effect(Vec2::new(lane_center_x(lane), y), format!("-{damage}"), EffectStyle::Damage);
    }
}

/// Phase 3: deaths, movement and wall impacts. Returns true if the boss died.
fn advance_enemies(game: &mut Game) -> bool {
    let level = game.session.level;
    let wall_y = game.tuning.wall_y;

    let removed = game.registry.remove_enemies_where(|enemy| {
        if !enemy.kind.is_bonus() && enemy.hp <= 0 {
            return true;
        }
        enemy.y += enemy.speed;
        enemy.y >= wall_y
    });

    let mut boss_defeated = false;
    for enemy in removed {
        let pos = Vec2::new(lane_center_x(enemy.lane), enemy.y);

        if enemy.kind.is_bonus() {
            game.emit(GameEvent::BonusEscaped { id: enemy.id });
        } else if enemy.hp <= 0 {
            let boss = enemy.kind.is_boss();
            let reward = game.tuning.kill_reward(boss, level);
            game.session.mana += reward;
            game.session.score = game.session.score.saturating_add(reward.max(0) as u64);
            game.kills += 1;
            boss_defeated |= boss;
            game.spawn_effect(pos, format!("+{reward}"), EffectStyle::Reward);
            game.emit(GameEvent::EnemyKilled {
                id: enemy.id,
                kind: enemy.kind,
                reward,
            });
        } else {
            game.session.health -= 1;
            game.spawn_effect(Vec2::new(pos.x, wall_y), "-1 HP".to_string(), EffectStyle::WallHit);
            game.emit(GameEvent::WallBreached {
                enemy: enemy.id,
                health: game.session.health,
            });
        }
    }

    boss_defeated
}

/// Phase 4: level up / victory / game over
fn resolve_progression(game: &mut Game, boss_defeated: bool) {
    if boss_defeated {
        if game.session.level >= game.tuning.max_levels {
            game.session.victory = true;
            log::info!("Victory! Score {}", game.session.score);
            game.emit(GameEvent::Victory);
        } else {
            game.session.level += 1;
            game.session.wave = 1;
            game.session.enemies_spawned_in_wave = 0;
            game.session.spawn_timer = game.tuning.level_delay;

            let level = game.session.level;
            log::info!("Level up: {}", level);
            game.spawn_effect(Vec2::new(50.0, 30.0), format!("LEVEL {level}!"), EffectStyle::LevelUp);
            game.emit(GameEvent::LevelUp { level });
        }
    }

    // Checked independently of victory: a tick can set both flags
    if game.session.health <= 0 && !game.session.game_over {
        game.session.game_over = true;
        log::info!(
            "Game over at level {} wave {}, score {}",
            game.session.level,
            game.session.wave,
            game.session.score
        );
        game.emit(GameEvent::GameOver);
    }
}

/// Phase 5: every ready unit with a target in reach fires
fn fire_units(game: &mut Game, now_ms: f64) {
    let max_y = game.tuning.target_max_y;
    let mut shots = Vec::new();
    let mut units_fired = 0u32;

    for unit in game.grid.units_mut() {
        if !unit.ready(now_ms) {
            continue;
        }
        let stats = unit.tier.stats();
        let lanes = target_lanes(slot_lane(unit.slot), stats.multi_lane);
        if !lanes.iter().any(|&lane| game.registry.has_target_in_lane(lane, max_y)) {
            continue;
        }

        let y = slot_center_y(unit.slot);
        for lane in lanes {
            shots.push((lane, y, stats.damage, stats.projectile_speed));
        }
        unit.last_fired_ms = Some(now_ms);
        units_fired += 1;
    }

    if shots.is_empty() {
        return;
    }

    let projectiles = shots.len() as u32;
    for (lane, y, damage, speed) in shots {
        let id = game.next_entity_id();
        game.registry.spawn_projectile(Projectile {
            id,
            lane,
            y,
            damage,
            speed,
        });
    }
    game.emit(GameEvent::UnitsFired {
        units: units_fired,
        projectiles,
    });
}

/// Lanes a unit in `lane` shoots into: its own, plus neighbours when multi-lane
pub fn target_lanes(lane: usize, multi_lane: bool) -> Vec<usize> {
    if !multi_lane {
        return vec![lane];
    }
    let first = lane.saturating_sub(1);
    let last = (lane + 1).min(LANE_COUNT - 1);
    (first..=last).collect()
}
