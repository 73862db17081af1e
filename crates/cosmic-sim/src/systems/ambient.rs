//! Ambient meteor shower: neutral debris falling toward the planet.

use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use cosmic_core::components::Entity;
use cosmic_core::constants::*;
use cosmic_core::enums::{EntityKind, EntityState, Team};
use cosmic_core::events::BattleEvent;
use cosmic_core::types::Vec3;

use crate::motion;
use crate::pool::{lock_recover, SharedPool};

/// Count the shower timer down and launch one meteor when it elapses.
pub fn run(
    timer: &mut f32,
    interval: f32,
    rng: &mut ChaCha8Rng,
    debris: &SharedPool,
    events: &mut Vec<BattleEvent>,
    dt: f32,
) {
    *timer -= dt;
    if *timer > 0.0 {
        return;
    }
    *timer = interval;

    let meteor = debris_meteor(random_shell_point(rng));
    if lock_recover(debris, "debris pool").spawn(meteor).is_err() {
        debug!("Debris pool full; skipping ambient meteor");
        events.push(BattleEvent::SpawnDropped {
            kind: EntityKind::Debris,
        });
    }
}

/// Random point on the upper half of the spawn shell.
fn random_shell_point(rng: &mut ChaCha8Rng) -> Vec3 {
    let yaw = rng.gen_range(0.0..std::f32::consts::TAU);
    let elevation: f32 = rng.gen_range(0.2..1.2);
    Vec3::new(
        elevation.cos() * yaw.cos(),
        elevation.sin(),
        elevation.cos() * yaw.sin(),
    ) * AMBIENT_SPAWN_RADIUS
}

fn debris_meteor(origin: Vec3) -> Entity {
    Entity {
        kind: EntityKind::Debris,
        state: EntityState::Traveling,
        team: Team::Neutral,
        position: origin,
        radius: AMBIENT_RADIUS,
        max_lifetime: AMBIENT_LIFETIME,
        payload: AMBIENT_DAMAGE,
        base_scale: AMBIENT_RADIUS * 2.0,
        trajectory: motion::ballistic(origin, PLANET_POSITION, AMBIENT_SPEED),
        ..Default::default()
    }
}
