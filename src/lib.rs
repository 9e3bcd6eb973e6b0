//! Lane Merge Defense - deterministic lane defense simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, projectiles, merging, session state)
//! - `tuning`: Data-driven game balance
//! - `progress`: Persistent player progress and achievements
//! - `audio`: Sound cue mapping for simulation events
//! - `runner`: Fixed-timestep driver wiring the core to its collaborators
//! - `autoplay`: Demo player used by the headless binary

pub mod audio;
pub mod autoplay;
pub mod progress;
pub mod runner;
pub mod sim;
pub mod tuning;

pub use progress::{PlayerProgress, ProgressStore};
pub use runner::Runner;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Fixed simulation timestep in milliseconds (used for unit cooldowns)
    pub const TICK_MS: f64 = 1000.0 / SIM_HZ as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield layout. One lane per grid column.
    pub const GRID_ROWS: usize = 2;
    pub const GRID_COLS: usize = 5;
    pub const LANE_COUNT: usize = GRID_COLS;
    pub const TOTAL_SLOTS: usize = GRID_ROWS * GRID_COLS;

    /// Grid occupies the bottom 30% of the playfield
    pub const GRID_HEIGHT_PERCENT: f32 = 30.0;
    pub const GRID_START_Y: f32 = 100.0 - GRID_HEIGHT_PERCENT;

    /// Unit tiers
    pub const MAX_TIER: u8 = 10;
    /// First tier that fires into neighbouring lanes
    pub const MULTI_LANE_TIER: u8 = 5;
}

use consts::*;

/// Horizontal centre of a lane, in playfield percent
#[inline]
pub fn lane_center_x(lane: usize) -> f32 {
    let width = 100.0 / LANE_COUNT as f32;
    width * lane as f32 + width / 2.0
}

/// Lane defended by a grid slot
#[inline]
pub fn slot_lane(slot: usize) -> usize {
    slot % GRID_COLS
}

/// Grid row of a slot (0 = closest to the enemies)
#[inline]
pub fn slot_row(slot: usize) -> usize {
    slot / GRID_COLS
}

/// Vertical position projectiles fired from a slot start at
#[inline]
pub fn slot_center_y(slot: usize) -> f32 {
    let cell = GRID_HEIGHT_PERCENT / GRID_ROWS as f32;
    GRID_START_Y + slot_row(slot) as f32 * cell + cell / 2.0
}
