//! Ship movement: desired velocity per state, acceleration-limited
//! integration and the random rolls the FSM relies on.

use rand::Rng;

use cosmic_core::enums::ShipState;
use cosmic_core::types::{Bounds, Vec3};

use crate::profiles::ShipProfile;

/// Pursuing ships stop closing in at this distance.
pub const PURSUE_STANDOFF: f32 = 1.5;

/// Fraction of max speed used while patrolling.
pub const PATROL_SPEED_FACTOR: f32 = 0.5;

/// Velocity a ship in `state` wants to reach. `None` means coast and decay.
pub fn desired_velocity(
    state: ShipState,
    position: Vec3,
    threat: Option<Vec3>,
    wander_heading: Vec3,
    profile: &ShipProfile,
) -> Option<Vec3> {
    match state {
        ShipState::Destroyed | ShipState::Attacking => None,
        ShipState::Evading => {
            let away = (position - threat?).normalize_or_zero();
            if away == Vec3::ZERO {
                // Sitting on the threat: any way out is fine
                Some(wander_heading * profile.max_speed)
            } else {
                Some(away * profile.max_speed)
            }
        }
        ShipState::Pursuing => {
            let offset = threat? - position;
            if offset.length_squared() <= PURSUE_STANDOFF * PURSUE_STANDOFF {
                None
            } else {
                Some(offset.normalize_or_zero() * profile.max_speed)
            }
        }
        ShipState::Patrolling => Some(wander_heading * profile.max_speed * PATROL_SPEED_FACTOR),
    }
}

/// Advance one ship by `dt`: accelerate toward `desired` (or decay toward
/// rest), clamp to max speed, translate, then confine to `bounds`.
pub fn integrate(
    position: &mut Vec3,
    velocity: &mut Vec3,
    desired: Option<Vec3>,
    profile: &ShipProfile,
    bounds: &Bounds,
    dt: f32,
) {
    match desired {
        Some(target) => {
            let delta = (target - *velocity).clamp_length_max(profile.acceleration * dt);
            *velocity += delta;
        }
        None => {
            *velocity *= profile.deceleration.powf(dt);
        }
    }
    *velocity = velocity.clamp_length_max(profile.max_speed);
    *position += *velocity * dt;
    bounds.confine(position, velocity);
}

/// Random, mostly horizontal unit heading for patrol wandering.
pub fn random_heading<R: Rng>(rng: &mut R) -> Vec3 {
    let yaw = rng.gen_range(0.0..std::f32::consts::TAU);
    let climb = rng.gen_range(-0.3..=0.3);
    Vec3::new(yaw.cos(), climb, yaw.sin()).normalize_or_zero()
}

/// Roll a shoot cooldown uniformly inside the profile's interval.
pub fn roll_shoot_cooldown<R: Rng>(profile: &ShipProfile, rng: &mut R) -> f32 {
    let (min, max) = profile.shoot_interval;
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}
