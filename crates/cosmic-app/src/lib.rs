//! Headless runtime shell for the cosmic battle.
//!
//! Wires the simulation engine to a fixed-rate frame thread and an input
//! thread that issues spawn requests, the way a wallpaper host would.

pub mod game_loop;
pub mod input;
pub mod state;

pub use cosmic_core as core;
