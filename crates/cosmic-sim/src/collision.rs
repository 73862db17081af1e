//! Sphere-sphere collision between pooled entities and the few high-value
//! targets (ships and planet).
//!
//! A single O(entities x targets) pass with no broad phase. Distances are
//! compared squared; the exact distance is only taken to place the impact
//! point.

use cosmic_core::components::Entity;
use cosmic_core::enums::{TargetId, Team};
use cosmic_core::types::Vec3;

/// A live, collidable target for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub team: Team,
    pub position: Vec3,
    pub radius: f32,
    /// Only meteors and debris collide with this target.
    pub meteors_only: bool,
}

/// Symmetric sphere overlap test: touching spheres overlap.
pub fn overlaps(pos_a: Vec3, radius_a: f32, pos_b: Vec3, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    pos_a.distance_squared(pos_b) <= reach * reach
}

/// The nearest target `entity` overlaps, skipping same-team targets and
/// meteor-only targets for non-meteors. Only traveling entities can
/// impact. Equidistant targets resolve to the earliest in `targets`.
pub fn check_impact(entity: &Entity, targets: &[Target]) -> Option<Target> {
    if !entity.is_traveling() {
        return None;
    }
    let mut best: Option<(f32, Target)> = None;
    for target in targets {
        if entity.team.is_friendly_with(target.team) {
            continue;
        }
        if target.meteors_only && !entity.kind.is_meteor() {
            continue;
        }
        let reach = entity.radius + target.radius;
        let dist_sq = entity.position.distance_squared(target.position);
        if dist_sq > reach * reach {
            continue;
        }
        if best.map_or(true, |(d, _)| dist_sq < d) {
            best = Some((dist_sq, *target));
        }
    }
    best.map(|(_, target)| target)
}

/// Point on the target's surface facing `from`. Falls back to the target
/// center when `from` sits exactly on it.
pub fn impact_point(from: Vec3, target: &Target) -> Vec3 {
    let offset = from - target.position;
    let dist = offset.length();
    if dist <= f32::EPSILON {
        return target.position;
    }
    target.position + offset * (target.radius.min(dist) / dist)
}

/// Nearest target on `team`'s opposing side, if any.
pub fn nearest_opponent(position: Vec3, team: Team, targets: &[Target]) -> Option<Target> {
    let opponent = team.opponent()?;
    targets
        .iter()
        .filter(|t| t.team == opponent)
        .min_by(|a, b| {
            position
                .distance_squared(a.position)
                .total_cmp(&position.distance_squared(b.position))
        })
        .copied()
}
