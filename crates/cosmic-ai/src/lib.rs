//! Combat AI for the cosmic battle.
//!
//! Implements per-ship behaviour: profiles, the state machine that picks
//! a ship's state each frame, and steering/movement integration.

pub mod fsm;
pub mod profiles;
pub mod steering;

pub use cosmic_core as core;
