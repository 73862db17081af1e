//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

pub use glam::Vec3;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of updates run since the session started.
    pub frame: u64,
    /// Elapsed simulation time in seconds (sum of clamped frame deltas).
    pub elapsed_secs: f32,
}

impl SimTime {
    /// Advance by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.frame += 1;
        self.elapsed_secs += dt;
    }
}

/// Axis-aligned box that ships are confined to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Nearest point of the box to `p`.
    pub fn clamp_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    /// Clamp `position` into the box. Any velocity component that points
    /// through a wall the position was pushed back from is zeroed.
    pub fn confine(&self, position: &mut Vec3, velocity: &mut Vec3) {
        for axis in 0..3 {
            if position[axis] < self.min[axis] {
                position[axis] = self.min[axis];
                if velocity[axis] < 0.0 {
                    velocity[axis] = 0.0;
                }
            } else if position[axis] > self.max[axis] {
                position[axis] = self.max[axis];
                if velocity[axis] > 0.0 {
                    velocity[axis] = 0.0;
                }
            }
        }
    }
}
