//! Motion model: ballistic and homing trajectories plus the eased
//! scale/alpha curves used for visuals.
//!
//! Pure functions of entity state and elapsed time. Nothing here draws
//! randomness.

use glam::Quat;

use cosmic_core::components::{Entity, Trajectory};
use cosmic_core::constants::*;
use cosmic_core::enums::EntityState;
use cosmic_core::types::Vec3;

/// Unit direction from `start` toward `target`, or the default direction
/// when the two points are closer than the degeneracy epsilon.
pub fn ballistic_direction(start: Vec3, target: Vec3) -> Vec3 {
    let offset = target - start;
    if offset.length_squared() < DIRECTION_EPSILON * DIRECTION_EPSILON {
        return DEFAULT_DIRECTION;
    }
    offset.normalize()
}

/// Closed-form ballistic position after `t` seconds of flight.
pub fn ballistic_position(origin: Vec3, direction: Vec3, speed: f32, t: f32) -> Vec3 {
    origin + direction * (speed * t)
}

/// Ballistic trajectory from `start` toward `target` at `speed`.
pub fn ballistic(start: Vec3, target: Vec3, speed: f32) -> Trajectory {
    Trajectory::Ballistic {
        origin: start,
        direction: ballistic_direction(start, target),
        speed,
    }
}

/// One homing step. The velocity turns toward `aim` by at most
/// `turn_rate * dt` radians, is clamped to `max_speed`, and only then is
/// the position translated.
pub fn homing_step(
    position: &mut Vec3,
    velocity: &mut Vec3,
    aim: Option<Vec3>,
    turn_rate: f32,
    max_speed: f32,
    dt: f32,
) {
    if let Some(aim) = aim {
        let desired = (aim - *position).normalize_or_zero();
        let speed = velocity.length();
        if desired != Vec3::ZERO {
            if speed <= f32::EPSILON {
                *velocity = desired * max_speed;
            } else {
                let heading = *velocity / speed;
                let (axis, angle) = Quat::from_rotation_arc(heading, desired).to_axis_angle();
                let max_turn = turn_rate * dt;
                let turned = if angle > max_turn {
                    Quat::from_axis_angle(axis, max_turn) * heading
                } else {
                    desired
                };
                *velocity = turned.normalize_or_zero() * speed;
            }
        }
    }
    *velocity = velocity.clamp_length_max(max_speed);
    *position += *velocity * dt;
}

/// Cubic ease-in-out of a progress value in `[0, 1]`.
pub fn ease_in_out_cubic(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

/// Normalized time-based progress, clamped to `[0, 1]`.
pub fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Advance a traveling entity by `dt`: age first, then position.
pub fn advance(entity: &mut Entity, dt: f32) {
    entity.age += dt;
    match entity.trajectory {
        Trajectory::Ballistic {
            origin,
            direction,
            speed,
        } => {
            entity.position = ballistic_position(origin, direction, speed, entity.age);
            entity.velocity = direction * speed;
        }
        Trajectory::Homing {
            turn_rate,
            max_speed,
        } => {
            homing_step(
                &mut entity.position,
                &mut entity.velocity,
                entity.aim,
                turn_rate,
                max_speed,
                dt,
            );
        }
    }
}

/// Current `(scale, alpha)` of an entity for drawing.
pub fn visual(entity: &Entity) -> (f32, f32) {
    match entity.state {
        EntityState::Inactive => (0.0, 0.0),
        EntityState::Traveling => {
            let grow = ease_in_out_cubic(progress(entity.age, GROW_IN_DURATION));
            (entity.base_scale * grow, 1.0)
        }
        EntityState::Impacted => (entity.base_scale, 1.0),
        EntityState::Fading => {
            let e = ease_in_out_cubic(progress(entity.fade_elapsed, FADE_DURATION));
            (
                entity.base_scale * (1.0 + (FADE_SCALE_GROWTH - 1.0) * e),
                1.0 - e,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_direction_falls_back() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(ballistic_direction(p, p), DEFAULT_DIRECTION);
        assert_eq!(ballistic_direction(p, p + Vec3::splat(0.001)), DEFAULT_DIRECTION);
        let d = ballistic_direction(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(d, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn ballistic_is_bit_identical_for_equal_dt_sequences() {
        let make = || Entity {
            state: EntityState::Traveling,
            trajectory: ballistic(Vec3::new(0.0, -3.0, 4.0), Vec3::ZERO, 7.3),
            max_lifetime: 10.0,
            ..Default::default()
        };
        let dts = [0.016, 0.017, 0.033, 0.1, 0.0, 0.016];
        let mut a = make();
        let mut b = make();
        let mut trail_a = Vec::new();
        let mut trail_b = Vec::new();
        for dt in dts {
            advance(&mut a, dt);
            advance(&mut b, dt);
            trail_a.push(a.position.to_array().map(f32::to_bits));
            trail_b.push(b.position.to_array().map(f32::to_bits));
        }
        assert_eq!(trail_a, trail_b);
    }

    #[test]
    fn ballistic_follows_line() {
        let mut e = Entity {
            trajectory: ballistic(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.0),
            ..Default::default()
        };
        advance(&mut e, 0.5);
        advance(&mut e, 0.5);
        assert!((e.position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert!((e.age - 1.0).abs() < 1e-6);
    }

    #[test]
    fn homing_turn_is_rate_limited() {
        let mut pos = Vec3::ZERO;
        let mut vel = Vec3::new(1.0, 0.0, 0.0);
        // Aim straight along +z: a 90 degree turn
        homing_step(&mut pos, &mut vel, Some(Vec3::new(0.0, 0.0, 10.0)), 1.0, 5.0, 0.1);
        let turned = Vec3::X.angle_between(vel);
        assert!((turned - 0.1).abs() < 1e-4, "turned {turned}");
        assert!((vel.length() - 1.0).abs() < 1e-5);
        // Translation uses the already-turned velocity
        assert!((pos - vel * 0.1).length() < 1e-6);
    }

    #[test]
    fn homing_snaps_when_within_turn_budget() {
        let mut pos = Vec3::ZERO;
        let mut vel = Vec3::new(2.0, 0.0, 0.0);
        homing_step(&mut pos, &mut vel, Some(Vec3::new(10.0, 0.1, 0.0)), 3.0, 5.0, 0.1);
        let desired = Vec3::new(10.0, 0.1, 0.0).normalize();
        assert!(vel.normalize().angle_between(desired) < 1e-3);
    }

    #[test]
    fn homing_clamps_to_max_speed() {
        let mut pos = Vec3::ZERO;
        let mut vel = Vec3::new(9.0, 0.0, 0.0);
        homing_step(&mut pos, &mut vel, None, 3.0, 4.0, 0.1);
        assert!((vel.length() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn homing_reverses_from_antiparallel() {
        let mut pos = Vec3::ZERO;
        let mut vel = Vec3::new(1.0, 0.0, 0.0);
        homing_step(&mut pos, &mut vel, Some(Vec3::new(-5.0, 0.0, 0.0)), 3.0, 5.0, 0.1);
        assert!(vel.is_finite());
        assert!((Vec3::X.angle_between(vel) - 0.3).abs() < 1e-3);
    }

    #[test]
    fn ease_curve_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_in_out_cubic(0.25) - 0.0625).abs() < 1e-6);
        assert_eq!(ease_in_out_cubic(-1.0), 0.0);
        assert_eq!(ease_in_out_cubic(2.0), 1.0);
    }

    #[test]
    fn ease_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = ease_in_out_cubic(i as f32 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn fading_shrinks_alpha_and_grows_scale() {
        let mut e = Entity {
            state: EntityState::Fading,
            base_scale: 1.0,
            ..Default::default()
        };
        let (s0, a0) = visual(&e);
        assert_eq!((s0, a0), (1.0, 1.0));
        e.fade_elapsed = FADE_DURATION;
        let (s1, a1) = visual(&e);
        assert!((s1 - FADE_SCALE_GROWTH).abs() < 1e-6);
        assert_eq!(a1, 0.0);
    }
}
