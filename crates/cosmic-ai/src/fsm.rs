//! Ship behavior finite state machine.
//!
//! Pure function that picks a ship's state from its health, the distance
//! to the nearest hostile and its shoot cooldown. No pool or engine
//! dependency; operates on plain data.

use cosmic_core::enums::{ShipKind, ShipState};

use crate::profiles::get_profile;

/// Input to the FSM for a single ship.
#[derive(Debug, Clone, Copy)]
pub struct ShipContext {
    pub kind: ShipKind,
    pub health: i32,
    pub max_health: i32,
    /// `f32::INFINITY` when no hostile is alive.
    pub distance_to_threat: f32,
    pub shoot_cooldown: f32,
}

/// Output from the FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipDecision {
    pub state: ShipState,
    /// The ship fires its primary weapon this frame.
    pub fire: bool,
}

/// Evaluate the transition rules in priority order. Exactly one rule
/// applies for every input.
pub fn decide(ctx: &ShipContext) -> ShipDecision {
    let profile = get_profile(ctx.kind);

    let state = if ctx.health <= 0 {
        ShipState::Destroyed
    } else if ctx.distance_to_threat < profile.evade_range
        && health_fraction(ctx.health, ctx.max_health) < profile.low_health_fraction
    {
        ShipState::Evading
    } else if ctx.distance_to_threat < profile.attack_range && ctx.shoot_cooldown <= 0.0 {
        ShipState::Attacking
    } else if ctx.distance_to_threat < profile.attack_range {
        ShipState::Pursuing
    } else {
        ShipState::Patrolling
    };

    ShipDecision {
        state,
        fire: state == ShipState::Attacking,
    }
}

fn health_fraction(health: i32, max_health: i32) -> f32 {
    if max_health <= 0 {
        return 0.0;
    }
    health as f32 / max_health as f32
}
