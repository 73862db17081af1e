//! Commands the app shell forwards to the simulation.

use serde::{Deserialize, Serialize};

use crate::types::Vec3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Launch one meteor. `power` is the charge in `[0, 1]`.
    SpawnSingle { origin: Vec3, power: f32 },
    /// Fire the epic burst if the combo has armed it.
    SpawnEpicBurst,
    /// Reset pools, ships, planet, combo and score.
    Restart,
}
