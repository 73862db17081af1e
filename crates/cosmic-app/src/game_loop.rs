//! Frame thread: runs the battle engine at a fixed frame rate and
//! publishes snapshots.
//!
//! The engine is moved into this thread; the host keeps only the command
//! sender and the shared snapshot slot. Spawn requests from input bypass
//! the channel and go straight through a `Spawner`.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, info};

use cosmic_core::constants::FRAME_RATE;
use cosmic_core::state::BattleSnapshot;
use cosmic_sim::BattleEngine;

use crate::state::{AppError, AppState, GameLoopCommand};

/// Nominal duration of one frame.
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / FRAME_RATE as u64);

/// Start the frame thread for `engine` and register it in `state`.
pub fn start(state: &AppState, engine: BattleEngine) -> Result<JoinHandle<()>, AppError> {
    let mut running = state.running.lock().unwrap_or_else(PoisonError::into_inner);
    if *running {
        return Err(AppError::AlreadyRunning);
    }

    let (cmd_tx, handle) = spawn_game_loop(
        engine,
        Arc::clone(&state.latest_snapshot),
        Arc::clone(&state.running),
    )?;
    *state
        .command_tx
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(cmd_tx);
    *running = true;
    Ok(handle)
}

/// Spawn the frame loop in a new thread. Returns the command sender and
/// the thread handle. `running` is cleared when the thread exits.
pub fn spawn_game_loop(
    engine: BattleEngine,
    latest_snapshot: Arc<Mutex<Option<BattleSnapshot>>>,
    running: Arc<Mutex<bool>>,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>), AppError> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("cosmic-frame-loop".into())
        .spawn(move || {
            let _running = RunningGuard(running);
            run_game_loop(engine, cmd_rx, &latest_snapshot);
        })?;

    Ok((cmd_tx, handle))
}

/// Clears the running flag when the frame thread ends, panics included.
struct RunningGuard(Arc<Mutex<bool>>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }
}

/// The frame loop. Runs until a Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: BattleEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<BattleSnapshot>>,
) {
    let mut last_frame = Instant::now();
    let mut next_frame_time = last_frame;
    info!("Frame loop started at {FRAME_RATE} Hz");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.handle_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!("Frame loop stopped after {} frames", engine.time().frame);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance by the measured wall-clock delta (the engine clamps it)
        let now = Instant::now();
        engine.update((now - last_frame).as_secs_f32());
        last_frame = now;

        // 3. Publish the latest snapshot for polling
        let snapshot = engine.snapshot();
        *latest_snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);

        // 4. Sleep until the next frame
        next_frame_time += FRAME_DURATION;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > FRAME_DURATION * 2 {
            // Too far behind: reset to avoid a catch-up spiral
            debug!("Frame loop fell behind by {:?}", now - next_frame_time);
            next_frame_time = now;
        }
    }
}
