//! Application state shared between the host and the frame thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use cosmic_core::commands::PlayerCommand;
use cosmic_core::error::ConfigError;
use cosmic_core::state::BattleSnapshot;

/// Commands sent from the host to the frame thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the battle engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the frame thread gracefully.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("simulation not started")]
    NotStarted,
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("frame thread has shut down")]
    Disconnected,
    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` holds state that does not exist before the loop starts
/// - `Arc<Mutex<...>>` holds state shared with the frame thread
#[derive(Default)]
pub struct AppState {
    /// `None` until the frame thread is started.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the frame thread after every frame.
    pub latest_snapshot: Arc<Mutex<Option<BattleSnapshot>>>,
    /// Set by `start`, cleared by the frame thread when it exits.
    pub running: Arc<Mutex<bool>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a player command to the frame thread.
    pub fn send_command(&self, command: PlayerCommand) -> Result<(), AppError> {
        self.send(GameLoopCommand::PlayerCommand(command))
    }

    pub fn send(&self, command: GameLoopCommand) -> Result<(), AppError> {
        let tx = self
            .command_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match tx.as_ref() {
            Some(tx) => tx.send(command).map_err(|_| AppError::Disconnected),
            None => Err(AppError::NotStarted),
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Latest snapshot, if the frame thread produced one yet.
    pub fn snapshot(&self) -> Option<BattleSnapshot> {
        self.latest_snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
