//! Lane Merge Defense entry point
//!
//! Headless driver: runs a seeded session with the demo player and logs the
//! outcome.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use lane_merge_defense::{ProgressStore, Runner, Tuning, autoplay::AutoPlayer};

/// Stop after this many ticks unless told otherwise (one hour of play)
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICK_LIMIT: u64 = 60 * 60 * 60;

/// Lane Merge Defense - headless simulation run with the demo player
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "lane-merge-defense")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Random seed
    #[arg(default_value_t = 0)]
    seed: u64,

    /// Starting level (capped at the highest unlocked level)
    #[arg(default_value_t = 1)]
    level: u32,

    /// Maximum ticks to simulate
    #[arg(long, default_value_t = DEFAULT_TICK_LIMIT)]
    ticks: u64,

    /// Balance overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Player progress file (JSON), created if missing
    #[arg(long)]
    progress: Option<PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    let args = Args::parse();
    log::info!("Lane Merge Defense (headless) starting...");

    let tuning = args.tuning.as_deref().map(Tuning::load).unwrap_or_default();
    let progress = args
        .progress
        .as_deref()
        .map(ProgressStore::at)
        .unwrap_or_else(ProgressStore::in_memory);

    if !progress.progress().is_level_unlocked(args.level) {
        log::warn!(
            "Level {} is locked (highest unlocked: {}), starting lower",
            args.level,
            progress.progress().max_unlocked_level
        );
    }

    let mut runner = Runner::new(tuning, args.seed, progress).with_autoplay(AutoPlayer::new());
    runner.start(args.level);

    let mut ticks = 0;
    while ticks < args.ticks && !runner.session().is_finished() {
        runner.step();
        ticks += 1;
        for cue in runner.take_cues() {
            log::trace!("cue {:?}", cue);
        }
    }

    let summary = runner.game.summary();
    let session = runner.session();
    log::info!(
        "Stopped after {} ticks: level {} wave {}, score {}, health {}, mana {}",
        ticks,
        session.level,
        session.wave,
        session.score,
        session.health,
        session.mana
    );
    log::info!(
        "Result: {} ({} kills, {} merges)",
        if summary.won {
            "victory"
        } else if session.game_over {
            "defeat"
        } else {
            "unfinished"
        },
        summary.kills,
        summary.merges
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["lane-merge-defense"]).unwrap();
        assert_eq!(args.seed, 0);
        assert_eq!(args.level, 1);
        assert_eq!(args.ticks, DEFAULT_TICK_LIMIT);
        assert!(args.tuning.is_none());
        assert!(args.progress.is_none());
    }

    #[test]
    fn positional_and_options() {
        let args = Args::try_parse_from([
            "lane-merge-defense",
            "7",
            "3",
            "--ticks",
            "100",
            "--progress",
            "p.json",
        ])
        .unwrap();
        assert_eq!(args.seed, 7);
        assert_eq!(args.level, 3);
        assert_eq!(args.ticks, 100);
        assert_eq!(args.progress, Some(PathBuf::from("p.json")));
        assert!(args.tuning.is_none());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Args::try_parse_from(["lane-merge-defense", "--ticks"]).is_err());
        assert!(Args::try_parse_from(["lane-merge-defense", "x"]).is_err());
        assert!(Args::try_parse_from(["lane-merge-defense", "1", "2", "3"]).is_err());
        assert!(Args::try_parse_from(["lane-merge-defense", "--fast"]).is_err());
    }
}
