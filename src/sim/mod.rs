//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected randomness only
//! - Stable iteration order (registry insertion order, slot order)
//! - No rendering, audio or storage dependencies

mod bonus;
pub mod grid;
mod player;
pub mod random;
pub mod registry;
pub mod state;
pub mod stats;
pub mod tick;

pub use grid::{MoveOutcome, PlacementGrid};
pub use random::{RandomSource, ScriptedRandom};
pub use registry::EntityRegistry;
pub use state::{
    BonusKind, EffectStyle, Enemy, EnemyKind, EntityId, EntityIds, FloatingEffect, Game, GameEvent,
    PlacedUnit, Projectile, SessionState, SessionSummary,
};
pub use stats::{EnemyStats, UnitStats, UnitTier, enemy_stats, next_spawn_cost, unit_stats};
pub use tick::{target_lanes, tick};
