//! Session driver
//!
//! Owns the simulation plus its external collaborators (RNG, clock, sound
//! cues, progress storage) and runs fixed ticks from variable frame times.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{SoundCues, SoundEffect};
use crate::autoplay::AutoPlayer;
use crate::consts::{MAX_SUBSTEPS, SIM_DT, TICK_MS};
use crate::progress::{MAX_UNIT, ProgressStore};
use crate::sim::{Game, GameEvent, SessionState, tick};
use crate::tuning::Tuning;

pub struct Runner {
    pub game: Game,
    rng: Pcg32,
    /// Simulation clock in milliseconds
    now_ms: f64,
    /// Unsimulated real time carried between frames (seconds)
    accumulator: f32,
    cues: SoundCues,
    pending_cues: Vec<SoundEffect>,
    progress: ProgressStore,
    autoplay: Option<AutoPlayer>,
    /// Set once the finished session has been recorded
    recorded: bool,
}

impl Runner {
    pub fn new(tuning: Tuning, seed: u64, progress: ProgressStore) -> Self {
        log::info!("Runner initialized with seed: {}", seed);
        Self {
            game: Game::new(tuning),
            rng: Pcg32::seed_from_u64(seed),
            now_ms: 0.0,
            accumulator: 0.0,
            cues: SoundCues::new(),
            pending_cues: Vec::new(),
            progress,
            autoplay: None,
            recorded: false,
        }
    }

    /// Let the demo player act before every tick
    pub fn with_autoplay(mut self, player: AutoPlayer) -> Self {
        self.autoplay = Some(player);
        self
    }

    /// Start a session at `level`, or at the highest unlocked level below it
    pub fn start(&mut self, level: u32) {
        let level = level.min(self.progress.progress().max_unlocked_level).max(1);
        self.game.start_session(level);
        self.recorded = false;
        self.accumulator = 0.0;
        self.dispatch();
    }

    pub fn session(&self) -> &SessionState {
        &self.game.session
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Sound cues produced since the last call
    pub fn take_cues(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.pending_cues)
    }

    /// Feed real elapsed time; runs as many fixed ticks as fit (capped).
    /// Returns the number of ticks run.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one tick
    pub fn step(&mut self) {
        if let Some(player) = self.autoplay {
            player.act(&mut self.game, &mut self.rng);
        }
        tick(&mut self.game, self.now_ms, &mut self.rng);
        self.now_ms += TICK_MS;
        self.dispatch();
    }

    /// Route pending simulation events to audio and progress
    fn dispatch(&mut self) {
        let events = self.game.drain_events();
        if events.is_empty() {
            return;
        }

        let cues = self.cues.cues_for(&events, self.now_ms);
        self.pending_cues.extend(cues);

        for event in &events {
            match event {
                GameEvent::MaxTierReached { .. } => self.progress.unlock_achievement(MAX_UNIT),
                GameEvent::GameOver | GameEvent::Victory if !self.recorded => {
                    self.recorded = true;
                    let summary = self.game.summary();
                    log::info!(
                        "Session over: {} kills, {} merges, level {}, won: {}",
                        summary.kills,
                        summary.merges,
                        summary.level_reached,
                        summary.won
                    );
                    self.progress.update_stats(
                        summary.kills,
                        summary.merges,
                        summary.level_reached,
                        summary.won,
                    );
                }
                _ => {}
            }
        }
    }
}
