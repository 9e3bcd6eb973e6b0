//! Player progress and achievements
//!
//! Persisted as JSON between sessions. The simulation never reads this; the
//! runner feeds it session results and mid-session unlocks.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Achievement catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const FIRST_BLOOD: &str = "first_blood";
pub const MERGER: &str = "merger";
pub const VETERAN: &str = "level_5";
pub const MAX_UNIT: &str = "max_unit";
pub const SURVIVOR: &str = "survivor";

pub const ACHIEVEMENTS: [Achievement; 5] = [
    Achievement {
        id: FIRST_BLOOD,
        title: "First Blood",
        description: "Kill 10 enemies",
    },
    Achievement {
        id: MERGER,
        title: "Merger",
        description: "Perform 50 merges",
    },
    Achievement {
        id: VETERAN,
        title: "Veteran",
        description: "Reach level 5",
    },
    Achievement {
        id: MAX_UNIT,
        title: "King",
        description: "Create a tier 10 unit",
    },
    Achievement {
        id: SURVIVOR,
        title: "Survivor",
        description: "Beat all 10 levels",
    },
];

/// Thresholds for the stat-driven achievements
const FIRST_BLOOD_KILLS: u64 = 10;
const MERGER_MERGES: u64 = 50;
const VETERAN_LEVEL: u32 = 5;

/// Look up an achievement by id
pub fn achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Lifetime counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifetimeStats {
    pub total_kills: u64,
    pub total_merges: u64,
    pub games_played: u32,
}

/// Everything remembered across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProgress {
    pub max_unlocked_level: u32,
    pub unlocked_achievements: Vec<String>,
    pub stats: LifetimeStats,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            max_unlocked_level: 1,
            unlocked_achievements: Vec::new(),
            stats: LifetimeStats::default(),
        }
    }
}

impl PlayerProgress {
    /// Fold a finished session into the lifetime record and unlock whatever
    /// achievements it earned
    pub fn update_stats(&mut self, kills: u32, merges: u32, level_reached: u32, won: bool) -> &Self {
        self.max_unlocked_level = self.max_unlocked_level.max(level_reached);
        self.stats.total_kills += u64::from(kills);
        self.stats.total_merges += u64::from(merges);
        self.stats.games_played += 1;

        if self.stats.total_kills >= FIRST_BLOOD_KILLS {
            self.unlock_achievement(FIRST_BLOOD);
        }
        if self.stats.total_merges >= MERGER_MERGES {
            self.unlock_achievement(MERGER);
        }
        if level_reached >= VETERAN_LEVEL {
            self.unlock_achievement(VETERAN);
        }
        if won {
            self.unlock_achievement(SURVIVOR);
        }
        self
    }

    /// Unlock an achievement. Returns true if it was newly unlocked.
    pub fn unlock_achievement(&mut self, id: &str) -> bool {
        if self.has_achievement(id) {
            return false;
        }
        self.unlocked_achievements.push(id.to_string());
        true
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.unlocked_achievements.iter().any(|a| a == id)
    }

    /// Whether level select should offer `level`
    pub fn is_level_unlocked(&self, level: u32) -> bool {
        level >= 1 && level <= self.max_unlocked_level
    }
}

/// Where progress lives between runs
#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    path: Option<PathBuf>,
    progress: PlayerProgress,
}

impl ProgressStore {
    /// Progress kept only for the lifetime of the process
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Progress backed by a JSON file, loaded immediately
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let progress = Self::load_from(&path);
        Self {
            path: Some(path),
            progress,
        }
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    /// Record a finished session and persist. Returns the updated progress.
    pub fn update_stats(&mut self, kills: u32, merges: u32, level_reached: u32, won: bool) -> PlayerProgress {
        self.progress.update_stats(kills, merges, level_reached, won);
        self.save();
        self.progress.clone()
    }

    /// Unlock an achievement mid-session and persist if it is new
    pub fn unlock_achievement(&mut self, id: &str) {
        if self.progress.unlock_achievement(id) {
            log::info!("Achievement unlocked: {}", id);
            self.save();
        }
    }

    fn load_from(path: &Path) -> PlayerProgress {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No progress at {} ({}), starting fresh", path.display(), e);
                return PlayerProgress::default();
            }
        };
        match serde_json::from_str::<PlayerProgress>(&json) {
            Ok(progress) => {
                log::info!(
                    "Loaded progress: level {} unlocked, {} achievements",
                    progress.max_unlocked_level,
                    progress.unlocked_achievements.len()
                );
                progress
            }
            Err(e) => {
                log::warn!("Corrupt progress file {}: {}", path.display(), e);
                PlayerProgress::default()
            }
        }
    }

    fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        match serde_json::to_string_pretty(&self.progress) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to save progress to {}: {}", path.display(), e);
                }
            }
            Err(e) => log::warn!("Failed to encode progress: {}", e),
        }
    }
}
