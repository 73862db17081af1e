//! Cleanup system: releases entities whose lifetime ran out, that left the
//! arena, or whose impact fade finished.

use cosmic_core::components::Entity;
use cosmic_core::constants::FADE_DURATION;
use cosmic_core::enums::{EntityKind, EntityState, Team};

use crate::pool::{EntityPool, Handle};

/// Release finished entities. Uses a pre-allocated buffer to avoid
/// per-frame allocation. Returns how many player meteors expired without
/// hitting anything.
pub fn run(pool: &mut EntityPool<Entity>, retire: &mut Vec<Handle>, arena_radius: f32) -> u32 {
    retire.clear();
    let radius_sq = arena_radius * arena_radius;
    let mut player_misses = 0;

    for (handle, entity) in pool.iter_active() {
        let done = match entity.state {
            EntityState::Traveling => {
                entity.age >= entity.max_lifetime || entity.position.length_squared() > radius_sq
            }
            EntityState::Fading => entity.fade_elapsed >= FADE_DURATION,
            EntityState::Impacted => false,
            // Acquired but never initialised
            EntityState::Inactive => true,
        };
        if !done {
            continue;
        }
        if entity.state == EntityState::Traveling
            && entity.kind == EntityKind::Meteor
            && entity.team == Team::Player
        {
            player_misses += 1;
        }
        retire.push(handle);
    }

    for handle in retire.drain(..) {
        pool.release(handle);
    }
    player_misses
}
