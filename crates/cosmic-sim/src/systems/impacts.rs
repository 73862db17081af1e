//! Impact system: resolves traveling entities against the frame's targets.
//!
//! Each entity hits at most its nearest overlapping target and is then
//! retired from travel. Damage is applied by the engine afterwards from
//! the recorded impacts.

use cosmic_core::components::Entity;
use cosmic_core::enums::EntityState;
use cosmic_core::types::Vec3;

use crate::collision::{check_impact, impact_point, Target};
use crate::pool::EntityPool;
use crate::scratch::ImpactRecord;

pub fn run(pool: &mut EntityPool<Entity>, targets: &[Target], impacts: &mut Vec<ImpactRecord>) {
    if targets.is_empty() {
        return;
    }
    for (_handle, entity) in pool.iter_active_mut() {
        let Some(target) = check_impact(entity, targets) else {
            continue;
        };
        let position = impact_point(entity.position, &target);
        entity.state = EntityState::Impacted;
        entity.position = position;
        entity.velocity = Vec3::ZERO;
        entity.fade_elapsed = 0.0;
        impacts.push(ImpactRecord {
            kind: entity.kind,
            team: entity.team,
            target: target.id,
            position,
            payload: entity.payload,
        });
    }
}
