//! Input-triggered spawn entry points.
//!
//! A `Spawner` is a cheap clone of the shared handles the input thread
//! needs. Each call takes one lock at a time and never nests them, so it
//! is safe to call while the simulation thread is mid-update.

use std::f32::consts::PI;
use std::sync::{Arc, Mutex};

use log::debug;

use cosmic_core::components::Entity;
use cosmic_core::constants::*;
use cosmic_core::enums::{EntityKind, EntityState, Team};
use cosmic_core::error::PoolExhausted;
use cosmic_core::events::BattleEvent;
use cosmic_core::types::Vec3;

use crate::combo::ComboTracker;
use crate::motion;
use crate::pool::{lock_recover, Handle, SharedPool};

/// Events raised outside `update`, drained at the start of the next one.
pub type Outbox = Arc<Mutex<Vec<BattleEvent>>>;

#[derive(Clone)]
pub struct Spawner {
    meteors: SharedPool,
    combo: Arc<Mutex<ComboTracker>>,
    outbox: Outbox,
    epic_burst_size: usize,
}

impl Spawner {
    pub fn new(
        meteors: SharedPool,
        combo: Arc<Mutex<ComboTracker>>,
        outbox: Outbox,
        epic_burst_size: usize,
    ) -> Self {
        Self {
            meteors,
            combo,
            outbox,
            epic_burst_size,
        }
    }

    /// Launch one player meteor from `origin` toward the planet. `power`
    /// is clamped to `[0, 1]`. A full pool drops the shot.
    pub fn spawn_single(&self, origin: Vec3, power: f32) -> Result<Handle, PoolExhausted> {
        let meteor = player_meteor(origin, power);
        let result = lock_recover(&self.meteors, "player meteor pool").spawn(meteor);
        if let Err(err) = result {
            debug!("Dropped player meteor: {err}");
            self.push_event(BattleEvent::SpawnDropped {
                kind: EntityKind::Meteor,
            });
        }
        result
    }

    /// Fire the epic burst if the combo armed it. Consumes the signal, then
    /// spawns as many of the burst's meteors as the pool has room for.
    /// Returns the number spawned; zero when the burst was not armed.
    pub fn spawn_epic_burst(&self) -> usize {
        let armed = lock_recover(&self.combo, "combo").consume_epic();
        if !armed {
            return 0;
        }

        let requested = self.epic_burst_size;
        let spawned = lock_recover(&self.meteors, "player meteor pool")
            .spawn_many(requested, |i| epic_meteor(i, requested));
        if spawned < requested {
            debug!(
                "Partial epic burst: {spawned}/{requested} meteors ({} dropped)",
                requested - spawned
            );
        }
        self.push_event(BattleEvent::EpicBurstFired { requested, spawned });
        spawned
    }

    pub fn combo_count(&self) -> u32 {
        lock_recover(&self.combo, "combo").count()
    }

    pub fn is_epic_ready(&self) -> bool {
        lock_recover(&self.combo, "combo").is_epic_ready()
    }

    fn push_event(&self, event: BattleEvent) {
        lock_recover(&self.outbox, "event outbox").push(event);
    }
}

/// A single player shot. Speed, size and damage scale with charge.
pub fn player_meteor(origin: Vec3, power: f32) -> Entity {
    let power = if power.is_nan() { 0.0 } else { power.clamp(0.0, 1.0) };
    let speed = METEOR_BASE_SPEED + METEOR_POWER_SPEED * power;
    let radius = METEOR_BASE_RADIUS + METEOR_POWER_RADIUS * power;
    let trajectory = motion::ballistic(origin, PLAYER_AIM_POINT, speed);
    Entity {
        kind: EntityKind::Meteor,
        state: EntityState::Traveling,
        team: Team::Player,
        position: origin,
        radius,
        max_lifetime: METEOR_LIFETIME,
        payload: METEOR_BASE_DAMAGE + METEOR_POWER_DAMAGE * power,
        base_scale: radius * 2.0,
        trajectory,
        ..Default::default()
    }
}

/// Meteor `index` of an epic burst of `count`, launched from an evenly
/// spaced point on a semicircle around the planet.
pub fn epic_meteor(index: usize, count: usize) -> Entity {
    let count = count.max(1);
    let t = (index as f32 + 0.5) / count as f32;
    let angle = PI * t;
    let origin = Vec3::new(
        EPIC_SPAWN_RADIUS * angle.cos(),
        EPIC_SPAWN_HEIGHT,
        EPIC_SPAWN_RADIUS * angle.sin(),
    );
    let speed = EPIC_MIN_SPEED + (EPIC_MAX_SPEED - EPIC_MIN_SPEED) * t;
    // Three size classes across the burst
    let size = match (index * 3) / count {
        0 => 1.0,
        1 => 1.3,
        _ => 1.6,
    };
    let radius = METEOR_BASE_RADIUS * size;
    Entity {
        kind: EntityKind::Meteor,
        state: EntityState::Traveling,
        team: Team::Player,
        position: origin,
        radius,
        max_lifetime: METEOR_LIFETIME,
        payload: EPIC_DAMAGE,
        base_scale: radius * 2.0,
        trajectory: motion::ballistic(origin, PLAYER_AIM_POINT, speed),
        ..Default::default()
    }
}
