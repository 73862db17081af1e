use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use cosmic_app::game_loop;
use cosmic_app::input;
use cosmic_app::state::{AppError, AppState, GameLoopCommand};
use cosmic_core::config::BattleConfig;
use cosmic_sim::BattleEngine;

/// Seconds to run when no duration is given.
const DEFAULT_RUN_SECS: u64 = 10;

/// Usage: `cosmic-battle [config.toml] [seconds]`
fn main() -> Result<(), AppError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            info!("Loading config from {path}");
            BattleConfig::load(&path)?
        }
        None => BattleConfig::default(),
    };
    let run_secs = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(secs)) => secs,
        Some(Err(err)) => {
            warn!("Ignoring bad duration ({err}); running {DEFAULT_RUN_SECS}s");
            DEFAULT_RUN_SECS
        }
        None => DEFAULT_RUN_SECS,
    };

    let state = AppState::new();
    let engine = BattleEngine::new(config);
    let spawner = engine.spawner();
    let frame_thread = game_loop::start(&state, engine)?;

    let running = Arc::new(AtomicBool::new(true));
    let tapper = input::spawn_tapper(spawner, Duration::from_millis(350), Arc::clone(&running))?;

    std::thread::sleep(Duration::from_secs(run_secs));

    running.store(false, Ordering::Relaxed);
    let taps = tapper.join().unwrap_or_default();
    state.send(GameLoopCommand::Shutdown)?;
    if frame_thread.join().is_err() {
        warn!("Frame thread panicked");
    }

    if let Some(snapshot) = state.snapshot() {
        info!(
            "Final score {} ({} hits, {} misses, max combo {}), {} taps",
            snapshot.score.points,
            snapshot.score.hits,
            snapshot.score.misses,
            snapshot.combo.max_combo,
            taps.taps
        );
        match serde_json::to_string_pretty(&snapshot.score) {
            Ok(json) => println!("{json}"),
            Err(err) => warn!("Failed to serialize score: {err}"),
        }
    }
    Ok(())
}
