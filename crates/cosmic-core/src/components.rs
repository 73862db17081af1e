//! Plain-data components stored in pool slots and ships.
//!
//! Components carry no behaviour. Motion, collision and lifecycle rules live
//! in the simulation crate.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Vec3;

/// How an entity moves while `Traveling`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Trajectory {
    /// Straight-line travel evaluated in closed form from the spawn point.
    Ballistic {
        origin: Vec3,
        /// Unit vector, fixed at spawn.
        direction: Vec3,
        speed: f32,
    },
    /// Velocity turns toward the current aim point at a bounded rate.
    Homing { turn_rate: f32, max_speed: f32 },
}

impl Default for Trajectory {
    fn default() -> Self {
        Trajectory::Ballistic {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
            speed: 0.0,
        }
    }
}

/// A recyclable projectile, meteor or laser bolt. Owned exclusively by its
/// pool slot; `Default` is the zeroed, `Inactive` state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub state: EntityState,
    pub team: Team,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Collision sphere radius, fixed at spawn.
    pub radius: f32,
    /// Seconds since spawn. Strictly increasing until recycled.
    pub age: f32,
    pub max_lifetime: f32,
    /// Damage dealt on impact.
    pub payload: f32,
    /// Visual size factor at full grow-in.
    pub base_scale: f32,
    pub trajectory: Trajectory,
    /// Seconds spent in the current `Impacted`/`Fading` state.
    pub fade_elapsed: f32,
    /// Homing aim point, refreshed by the simulation each frame.
    pub aim: Option<Vec3>,
}

impl Entity {
    pub fn is_active(&self) -> bool {
        self.state != EntityState::Inactive
    }

    pub fn is_traveling(&self) -> bool {
        self.state == EntityState::Traveling
    }
}

/// Countdown timers for a ship's weapons and abilities. All clamp at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cooldowns {
    pub shoot: f32,
    /// Indexed by `SpecialAttack::index`.
    pub special: [f32; SpecialAttack::COUNT],
}

impl Cooldowns {
    pub fn tick(&mut self, dt: f32) {
        self.shoot = (self.shoot - dt).max(0.0);
        for remaining in &mut self.special {
            *remaining = (*remaining - dt).max(0.0);
        }
    }

    pub fn special_ready(&self, special: SpecialAttack) -> bool {
        self.special[special.index()] <= 0.0
    }

    /// Start `special`'s cooldown. A timed effect only begins recharging
    /// once it has run out.
    pub fn start_special(&mut self, special: SpecialAttack) {
        self.special[special.index()] = special.duration() + special.cooldown();
    }
}

/// Remaining seconds of each timed special. Zero means inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    remaining: [f32; SpecialAttack::COUNT],
}

impl ActiveEffects {
    pub fn activate(&mut self, special: SpecialAttack) {
        self.remaining[special.index()] = special.duration();
    }

    pub fn is_active(&self, special: SpecialAttack) -> bool {
        self.remaining[special.index()] > 0.0
    }

    pub fn tick(&mut self, dt: f32) {
        for remaining in &mut self.remaining {
            *remaining = (*remaining - dt).max(0.0);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
