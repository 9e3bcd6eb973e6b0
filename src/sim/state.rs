//! Game state and core simulation types
//!
//! Everything that must survive between ticks lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::PlacementGrid;
use super::registry::EntityRegistry;
use super::stats::UnitTier;
use crate::tuning::Tuning;

/// Identity of any simulated entity (enemy, projectile, effect or unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Monotonic identity generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u64,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl EntityIds {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        EntityId(id)
    }
}

/// Reward granted when a bonus enemy is tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    /// Free tier-1 unit on a random empty slot
    GrantUnit,
    /// Promote a random unit by one tier
    Upgrade,
    /// Wipe the field, heavy damage to the boss
    Bomb,
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Fast,
    Boss,
    Bonus(BonusKind),
}

impl EnemyKind {
    /// Bonus enemies are tapped, never shot
    pub fn is_bonus(self) -> bool {
        matches!(self, EnemyKind::Bonus(_))
    }

    pub fn is_boss(self) -> bool {
        self == EnemyKind::Boss
    }

    pub fn bonus(self) -> Option<BonusKind> {
        match self {
            EnemyKind::Bonus(kind) => Some(kind),
            _ => None,
        }
    }
}

/// An enemy walking down a lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub lane: usize,
    /// Lane progress: spawn edge at the top, wall at the bottom
    pub y: f32,
    /// May go negative between a hit and the death check
    pub hp: i64,
    pub max_hp: i64,
    pub speed: f32,
    /// Global wave index the enemy was scaled for (0 for bonus enemies)
    pub tier: u32,
    pub kind: EnemyKind,
}

/// A projectile travelling up a lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub lane: usize,
    pub y: f32,
    pub damage: i64,
    pub speed: f32,
}

/// What a floating effect represents (presentation picks colour/size from it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectStyle {
    Damage,
    Reward,
    WallHit,
    WaveBanner,
    LevelUp,
    Merge,
    Bomb,
    /// Damage number on a boss caught by a bomb
    BossBomb,
    Upgrade,
    FreeUnit,
    Mana,
}

impl EffectStyle {
    /// Lifetime in ticks
    pub fn lifetime(self) -> u32 {
        match self {
            EffectStyle::Damage | EffectStyle::Bomb => 30,
            EffectStyle::Reward | EffectStyle::Merge | EffectStyle::FreeUnit | EffectStyle::Mana => 40,
            EffectStyle::WallHit | EffectStyle::Upgrade => 50,
            EffectStyle::BossBomb => 60,
            EffectStyle::WaveBanner => 100,
            EffectStyle::LevelUp => 200,
        }
    }
}

/// Floating text effect (observational only, never read by gameplay)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingEffect {
    pub id: EntityId,
    /// Playfield position in percent
    pub pos: Vec2,
    pub text: String,
    pub style: EffectStyle,
    /// Ticks remaining
    pub life: u32,
}

/// A unit standing on the placement grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedUnit {
    pub id: EntityId,
    pub tier: UnitTier,
    /// Simulation time (ms) of the last shot, None if it never fired
    pub last_fired_ms: Option<f64>,
    pub slot: usize,
}

impl PlacedUnit {
    pub fn new(id: EntityId, tier: UnitTier, slot: usize) -> Self {
        Self {
            id,
            tier,
            last_fired_ms: None,
            slot,
        }
    }

    /// True if the cooldown of its tier has elapsed at `now_ms`
    pub fn ready(&self, now_ms: f64) -> bool {
        match self.last_fired_ms {
            None => true,
            Some(last) => now_ms - last >= self.tier.stats().cooldown_ms,
        }
    }
}

/// Per-session counters and flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Resource pool spent on summoning units
    pub mana: i64,
    /// Wall health; zero or below ends the run
    pub health: i32,
    pub level: u32,
    pub wave: u32,
    pub score: u64,
    /// Cost of the next unit summon
    pub spawn_cost: i64,
    /// Ticks until the next enemy spawn
    pub spawn_timer: f64,
    /// Spawns so far this wave; in the boss wave a non-zero value means the boss is out
    pub enemies_spawned_in_wave: u32,
    pub playing: bool,
    pub paused: bool,
    pub game_over: bool,
    pub victory: bool,
}

impl SessionState {
    pub fn new(tuning: &Tuning, level: u32) -> Self {
        Self {
            mana: tuning.starting_mana,
            health: tuning.starting_health,
            level,
            wave: 1,
            score: 0,
            spawn_cost: tuning.starting_spawn_cost,
            spawn_timer: 0.0,
            enemies_spawned_in_wave: 0,
            playing: false,
            paused: false,
            game_over: false,
            victory: false,
        }
    }

    /// True while ticks should advance the simulation
    pub fn is_running(&self) -> bool {
        self.playing && !self.paused && !self.game_over && !self.victory
    }

    /// True once the run ended either way
    pub fn is_finished(&self) -> bool {
        self.game_over || self.victory
    }
}

/// Notifications emitted by the core for presentation, audio and persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { level: u32 },
    EnemySpawned { id: EntityId, kind: EnemyKind, lane: usize },
    WaveAdvanced { level: u32, wave: u32 },
    ProjectileHit { enemy: EntityId, damage: i64 },
    EnemyKilled { id: EntityId, kind: EnemyKind, reward: i64 },
    WallBreached { enemy: EntityId, health: i32 },
    /// A bonus enemy reached the wall untapped
    BonusEscaped { id: EntityId },
    LevelUp { level: u32 },
    Victory,
    GameOver,
    UnitsFired { units: u32, projectiles: u32 },
    UnitPlaced { slot: usize },
    /// Free unit from a bonus; the matching `BonusCollected` follows
    UnitGranted { slot: usize },
    UnitMoved { from: usize, to: usize },
    UnitsSwapped { a: usize, b: usize },
    UnitMerged { slot: usize, tier: UnitTier },
    UnitUpgraded { slot: usize, tier: UnitTier },
    /// A unit reached the top tier
    MaxTierReached { slot: usize },
    BonusCollected { kind: BonusKind },
}

/// End-of-run figures handed to progress tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub kills: u32,
    pub merges: u32,
    pub level_reached: u32,
    pub won: bool,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub tuning: Tuning,
    pub session: SessionState,
    pub registry: EntityRegistry,
    pub grid: PlacementGrid,
    /// Enemies killed this session
    pub kills: u32,
    /// Merges performed this session
    pub merges: u32,
    pub(crate) ids: EntityIds,
    /// Outbox of notifications not yet drained by the driver
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
}

impl Game {
    /// Create an idle game; call `start_session` to begin playing
    pub fn new(tuning: Tuning) -> Self {
        let session = SessionState::new(&tuning, 1);
        Self {
            tuning,
            session,
            registry: EntityRegistry::default(),
            grid: PlacementGrid::default(),
            kills: 0,
            merges: 0,
            ids: EntityIds::default(),
            events: Vec::new(),
        }
    }

    /// Reset everything and start playing at `level` (clamped to the valid range)
    pub fn start_session(&mut self, level: u32) {
        let level = level.clamp(1, self.tuning.max_levels.max(1));
        self.session = SessionState::new(&self.tuning, level);
        self.session.playing = true;
        self.registry.clear();
        self.grid = PlacementGrid::default();
        self.kills = 0;
        self.merges = 0;
        self.events.clear();
        log::info!("Session started at level {}", level);
        self.events.push(GameEvent::SessionStarted { level });
    }

    /// Pause or resume a live session
    pub fn toggle_pause(&mut self) {
        if self.session.playing && !self.session.is_finished() {
            self.session.paused = !self.session.paused;
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending notifications, oldest first
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Queue a floating text effect
    pub(crate) fn spawn_effect(&mut self, pos: Vec2, text: String, style: EffectStyle) {
        let id = self.ids.next_id();
        self.registry.spawn_effect(FloatingEffect {
            id,
            pos,
            text,
            style,
            life: style.lifetime(),
        });
    }

    /// True while the player may act on the grid or tap enemies
    pub fn accepts_input(&self) -> bool {
        self.session.is_running()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            kills: self.kills,
            merges: self.merges,
            level_reached: self.session.level,
            won: self.session.victory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut ids = EntityIds::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
        assert_eq!(EntityIds::starting_at(40).next_id(), EntityId(40));
    }

    #[test]
    fn new_game_is_idle() {
        let game = Game::new(Tuning::default());
        assert!(!game.session.playing);
        assert!(!game.session.is_running());
        assert!(!game.accepts_input());
    }

    #[test]
    fn start_session_resets_and_clamps() {
        let mut game = Game::new(Tuning::default());
        game.start_session(42);
        assert_eq!(game.session.level, 10);
        game.session.mana = 0;
        game.kills = 7;
        game.start_session(0);
        assert_eq!(game.session.level, 1);
        assert_eq!(game.session.mana, 200);
        assert_eq!(game.session.health, 5);
        assert_eq!(game.session.spawn_cost, 100);
        assert_eq!(game.kills, 0);
        assert!(game.session.is_running());
        assert_eq!(game.drain_events(), vec![GameEvent::SessionStarted { level: 1 }]);
    }

    #[test]
    fn pause_only_while_live() {
        let mut game = Game::new(Tuning::default());
        game.toggle_pause();
        assert!(!game.session.paused);

        game.start_session(1);
        game.toggle_pause();
        assert!(game.session.paused);
        assert!(!game.accepts_input());
        game.toggle_pause();
        assert!(game.session.is_running());

        game.session.game_over = true;
        game.toggle_pause();
        assert!(!game.session.paused);
    }

    #[test]
    fn unit_ready_after_cooldown() {
        let tier = UnitTier::new(1).unwrap();
        let mut unit = PlacedUnit::new(EntityId(1), tier, 0);
        assert!(unit.ready(0.0));
        unit.last_fired_ms = Some(100.0);
        assert!(!unit.ready(1299.0));
        assert!(unit.ready(1300.0));
    }

    #[test]
    fn game_state_serializes() {
        let mut game = Game::new(Tuning::default());
        game.start_session(3);
        let json = serde_json::to_string(&game).unwrap();
        let back: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(back.session, game.session);
        assert!(back.pending_events().is_empty());
    }
}
