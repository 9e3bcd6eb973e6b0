//! Game balance tuning
//!
//! Every number that shapes difficulty lives here so balance can be tweaked
//! from a JSON file without touching the simulation. Missing fields fall back
//! to the reference balance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::BonusKind;

/// Balance constants read by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session start ===
    pub starting_mana: i64,
    pub starting_health: i32,
    pub starting_spawn_cost: i64,
    /// Added to the summon cost after every placement
    pub spawn_cost_increment: i64,

    // === Waves ===
    pub enemies_per_wave: u32,
    /// Last wave of each level is the boss wave
    pub waves_per_level: u32,
    pub max_levels: u32,

    // === Enemy scaling (by global wave index) ===
    pub enemy_base_hp: f64,
    pub enemy_hp_growth: f64,
    pub enemy_base_speed: f32,
    pub enemy_speed_per_wave: f32,
    /// Fast enemies appear on every Nth global wave
    pub fast_wave_period: u32,
    pub fast_hp_factor: f64,
    pub fast_speed_bonus: f32,
    pub boss_hp_factor: f64,
    pub boss_speed: f32,
    /// Lane the boss always walks down
    pub boss_lane: usize,

    // === Bonus enemies ===
    pub bonus_chance: f64,
    /// Cumulative roll thresholds: below `bonus_unit_weight` grants a unit,
    /// below `bonus_unit_weight + bonus_upgrade_weight` upgrades, else bomb
    pub bonus_unit_weight: f64,
    pub bonus_upgrade_weight: f64,
    pub bonus_speed: f32,

    // === Spawn timing (ticks) ===
    pub base_spawn_rate: f64,
    pub spawn_rate_per_wave: f64,
    pub min_spawn_rate: f64,
    pub boss_spawn_delay: f64,
    pub wave_delay: f64,
    pub level_delay: f64,

    // === Rewards ===
    pub boss_reward_per_level: i64,
    pub kill_reward_base: i64,
    pub kill_reward_per_level: i64,

    // === Bonus effects ===
    pub bomb_boss_damage_per_level: i64,
    pub upgrade_fallback_mana: i64,
    pub grant_fallback_mana: i64,

    // === Playfield (lane progress, percent) ===
    pub spawn_y: f32,
    pub wall_y: f32,
    /// Units only engage enemies above this line
    pub target_max_y: f32,
    /// Max lane-progress distance for a projectile to hit an enemy
    pub hit_tolerance: f32,
    /// Upward drift of floating effects per tick
    pub effect_drift: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_mana: 200,
            starting_health: 5,
            starting_spawn_cost: 100,
            spawn_cost_increment: 10,

            enemies_per_wave: 10,
            waves_per_level: 5,
            max_levels: 10,

            enemy_base_hp: 40.0,
            enemy_hp_growth: 1.18,
            enemy_base_speed: 0.15,
            enemy_speed_per_wave: 0.005,
            fast_wave_period: 3,
            fast_hp_factor: 0.6,
            fast_speed_bonus: 0.12,
            boss_hp_factor: 20.0,
            boss_speed: 0.04,
            boss_lane: 2,

            bonus_chance: 0.1,
            bonus_unit_weight: 0.4,
            bonus_upgrade_weight: 0.3,
            bonus_speed: 0.2,

            base_spawn_rate: 100.0,
            spawn_rate_per_wave: 1.5,
            min_spawn_rate: 25.0,
            boss_spawn_delay: 999_999.0,
            wave_delay: 180.0,
            level_delay: 300.0,

            boss_reward_per_level: 1000,
            kill_reward_base: 15,
            kill_reward_per_level: 5,

            bomb_boss_damage_per_level: 5000,
            upgrade_fallback_mana: 100,
            grant_fallback_mana: 50,

            spawn_y: -10.0,
            wall_y: 95.0,
            target_max_y: 85.0,
            hit_tolerance: 6.0,
            effect_drift: 0.2,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Global wave index (1-based, monotonic across levels)
    pub fn global_wave_index(&self, level: u32, wave: u32) -> u32 {
        level.saturating_sub(1) * self.waves_per_level + wave
    }

    /// True if `wave` is the boss wave of its level
    pub fn is_boss_wave(&self, wave: u32) -> bool {
        wave == self.waves_per_level
    }

    /// Ticks until the next spawn after a regular spawn
    pub fn spawn_interval(&self, level: u32, wave: u32) -> f64 {
        let difficulty = f64::from(self.global_wave_index(level, wave));
        (self.base_spawn_rate - difficulty * self.spawn_rate_per_wave).max(self.min_spawn_rate)
    }

    /// Reward for killing an enemy at the given level
    pub fn kill_reward(&self, boss: bool, level: u32) -> i64 {
        let level = i64::from(level);
        if boss {
            self.boss_reward_per_level * level
        } else {
            self.kill_reward_base + self.kill_reward_per_level * level
        }
    }

    /// Pick a bonus kind from a roll in [0, 1)
    pub fn bonus_for_roll(&self, roll: f64) -> BonusKind {
        if roll < self.bonus_unit_weight {
            BonusKind::GrantUnit
        } else if roll < self.bonus_unit_weight + self.bonus_upgrade_weight {
            BonusKind::Upgrade
        } else {
            BonusKind::Bomb
        }
    }
}
