//! Integration system: ages every active entity, moves traveling ones and
//! steps the impact visual forward.

use cosmic_core::components::{Entity, Trajectory};
use cosmic_core::enums::EntityState;

use crate::collision::{nearest_opponent, Target};
use crate::motion;
use crate::pool::EntityPool;

pub fn run(pool: &mut EntityPool<Entity>, targets: &[Target], dt: f32) {
    for (_handle, entity) in pool.iter_active_mut() {
        match entity.state {
            EntityState::Traveling => {
                if matches!(entity.trajectory, Trajectory::Homing { .. }) {
                    // Keep flying at the last aim point if every target is gone
                    if let Some(target) = nearest_opponent(entity.position, entity.team, targets) {
                        entity.aim = Some(target.position);
                    }
                }
                motion::advance(entity, dt);
            }
            // Impacted is shown for exactly one frame
            EntityState::Impacted => {
                entity.age += dt;
                entity.state = EntityState::Fading;
                entity.fade_elapsed = 0.0;
            }
            EntityState::Fading => {
                entity.age += dt;
                entity.fade_elapsed += dt;
            }
            EntityState::Inactive => {}
        }
    }
}
