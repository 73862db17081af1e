//! Simulation engine for the cosmic battle.
//!
//! Owns the bounded entity pools, ships and planet, runs the per-frame
//! systems and produces `BattleSnapshot`s for UI overlays. Completely
//! headless: rendering happens through the collaborator traits in
//! [`render`].

pub mod backlog;
pub mod collision;
pub mod combatants;
pub mod combo;
pub mod engine;
pub mod motion;
pub mod pool;
pub mod render;
pub mod scratch;
pub mod spawner;
pub mod systems;

pub use cosmic_core as core;
pub use engine::BattleEngine;
pub use spawner::Spawner;

#[cfg(test)]
mod tests;
