//! Progression tables
//!
//! Pure lookups: unit tier -> combat stats, and wave position -> enemy stats.

use serde::{Deserialize, Serialize};

use super::state::EnemyKind;
use crate::consts::{MAX_TIER, MULTI_LANE_TIER};
use crate::tuning::Tuning;

/// Combat stats of a unit tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitStats {
    pub damage: i64,
    pub cooldown_ms: f64,
    pub projectile_speed: f32,
    /// Fires into both neighbouring lanes as well as its own
    pub multi_lane: bool,
    pub name: &'static str,
}

const fn unit(damage: i64, cooldown_ms: f64, projectile_speed: f32, name: &'static str) -> UnitStats {
    UnitStats {
        damage,
        cooldown_ms,
        projectile_speed,
        multi_lane: false,
        name,
    }
}

const UNIT_TABLE: [UnitStats; MAX_TIER as usize] = [
    unit(10, 1200.0, 0.8, "Rookie"),
    unit(25, 1000.0, 1.0, "Soldier"),
    unit(60, 800.0, 1.2, "Sniper"),
    unit(150, 500.0, 1.5, "Tank"),
    unit(400, 300.0, 2.0, "Legend"),
    unit(1000, 250.0, 2.5, "Mage"),
    unit(2500, 200.0, 3.0, "UFO"),
    unit(6000, 150.0, 3.5, "Ghost"),
    unit(15000, 100.0, 4.0, "Demon"),
    unit(40000, 50.0, 5.0, "King"),
];

/// A unit's upgrade level, always within 1..=MAX_TIER
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct UnitTier(u8);

impl UnitTier {
    pub const MIN: UnitTier = UnitTier(1);
    pub const MAX: UnitTier = UnitTier(MAX_TIER);

    /// Returns None outside 1..=MAX_TIER
    pub fn new(tier: u8) -> Option<Self> {
        (1..=MAX_TIER).contains(&tier).then_some(Self(tier))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    /// The next tier up, or None at max tier
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn stats(self) -> UnitStats {
        unit_stats(self)
    }
}

impl TryFrom<u8> for UnitTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("unit tier {value} outside 1..={MAX_TIER}"))
    }
}

impl From<UnitTier> for u8 {
    fn from(tier: UnitTier) -> u8 {
        tier.0
    }
}

/// Stats for a unit tier
pub fn unit_stats(tier: UnitTier) -> UnitStats {
    let mut stats = UNIT_TABLE[usize::from(tier.0 - 1)];
    stats.multi_lane = tier.0 >= MULTI_LANE_TIER;
    stats
}

/// Stats of a freshly spawned combat enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub hp: i64,
    pub speed: f32,
    pub kind: EnemyKind,
    /// Global wave index the enemy was scaled for
    pub tier: u32,
}

/// Enemy stats for a wave position.
///
/// Hit points grow geometrically with the global wave index and speed grows
/// linearly. Every `fast_wave_period`-th global wave (boss waves excepted)
/// spawns fast enemies with reduced hit points.
pub fn enemy_stats(tuning: &Tuning, level: u32, wave: u32, is_boss: bool) -> EnemyStats {
    let index = tuning.global_wave_index(level, wave);
    let exponent = index.saturating_sub(1) as i32;

    let mut hp = tuning.enemy_base_hp * tuning.enemy_hp_growth.powi(exponent);
    let mut speed = tuning.enemy_base_speed + index as f32 * tuning.enemy_speed_per_wave;
    let mut kind = EnemyKind::Normal;

    let is_fast = !is_boss && tuning.fast_wave_period > 0 && index % tuning.fast_wave_period == 0;

    if is_boss {
        hp *= tuning.boss_hp_factor;
        speed = tuning.boss_speed;
        kind = EnemyKind::Boss;
    } else if is_fast {
        hp *= tuning.fast_hp_factor;
        speed += tuning.fast_speed_bonus;
        kind = EnemyKind::Fast;
    }

    EnemyStats {
        hp: hp.floor() as i64,
        speed,
        kind,
        tier: index,
    }
}

/// Summon cost after one more placement
pub fn next_spawn_cost(tuning: &Tuning, current: i64) -> i64 {
    current.saturating_add(tuning.spawn_cost_increment)
}
