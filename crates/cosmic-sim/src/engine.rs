//! Battle engine: the per-frame simulation step.
//!
//! `BattleEngine` owns the pools, ships, planet, combo and score. Each
//! `update(dt)` runs, in order: clocks, ship AI, ambient spawns, then for
//! every pool a single locked pass of integrate, collide and recycle, and
//! finally damage/score application. Completely headless, enabling
//! deterministic testing.
//!
//! `events()` holds only the current frame. Everything raised between two
//! snapshots is queued in a bounded backlog that `snapshot` hands over.

use std::sync::{Arc, Mutex};

use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cosmic_core::commands::PlayerCommand;
use cosmic_core::components::Entity;
use cosmic_core::config::BattleConfig;
use cosmic_core::constants::*;
use cosmic_core::enums::{EntityKind, ShipKind, TargetId, Team};
use cosmic_core::error::PoolExhausted;
use cosmic_core::events::BattleEvent;
use cosmic_core::state::BattleSnapshot;
use cosmic_core::types::{SimTime, Vec3};

use crate::backlog::EventBacklog;
use crate::combatants::{payload_damage, Damageable, Planet, Ship};
use crate::combo::{ComboTracker, ScoreState};
use crate::pool::{lock_recover, EntityPool, Handle, PoolStats, SharedPool};
use crate::render::{BattleRenderer, CameraProvider, Drawable, ImpactSink, NullSink, SharedRenderResources};
use crate::scratch::FrameScratch;
use crate::spawner::{Outbox, Spawner};
use crate::systems;
use crate::systems::ship_ai::Armory;

/// The battle engine. Owns every pool and all session state.
pub struct BattleEngine {
    config: BattleConfig,
    time: SimTime,
    rng: ChaCha8Rng,
    meteors: SharedPool,
    lasers: SharedPool,
    missiles: SharedPool,
    debris: SharedPool,
    combo: Arc<Mutex<ComboTracker>>,
    outbox: Outbox,
    ships: Vec<Ship>,
    planet: Planet,
    score: ScoreState,
    /// This frame's events.
    events: Vec<BattleEvent>,
    /// Events waiting for the next snapshot.
    backlog: EventBacklog,
    scratch: FrameScratch,
    ambient_timer: f32,
    impact_sink: Box<dyn ImpactSink>,
}

impl BattleEngine {
    /// Create an engine with all pools and ships pre-allocated. Invalid
    /// config values are replaced by their defaults.
    pub fn new(config: BattleConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!("{err}; falling back to defaults for invalid values");
                config.sanitized()
            }
        };
        let pools = &config.pools;
        let total_entities = pools.player_meteors + pools.lasers + pools.missiles + pools.debris;
        Self {
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.sim.seed),
            meteors: EntityPool::shared(pools.player_meteors),
            lasers: EntityPool::shared(pools.lasers),
            missiles: EntityPool::shared(pools.missiles),
            debris: EntityPool::shared(pools.debris),
            combo: Arc::new(Mutex::new(ComboTracker::new(
                config.combo.threshold,
                config.combo.window_secs,
            ))),
            outbox: Arc::new(Mutex::new(Vec::new())),
            ships: ShipKind::ALL.into_iter().map(Ship::new).collect(),
            planet: Planet::default(),
            score: ScoreState::default(),
            events: Vec::with_capacity(64),
            backlog: EventBacklog::with_capacity(EVENT_BACKLOG),
            // Ships, the planet and its force field
            scratch: FrameScratch::with_capacity(ShipKind::ALL.len() + 2, total_entities),
            ambient_timer: config.ambient.interval_secs,
            impact_sink: Box::new(NullSink),
            config,
        }
    }

    /// Route explosion notifications to `sink`.
    pub fn set_impact_sink(&mut self, sink: Box<dyn ImpactSink>) {
        self.impact_sink = sink;
    }

    /// A handle the input thread can spawn through while `update` runs.
    pub fn spawner(&self) -> Spawner {
        Spawner::new(
            Arc::clone(&self.meteors),
            Arc::clone(&self.combo),
            Arc::clone(&self.outbox),
            self.config.combo.epic_burst_size,
        )
    }

    pub fn spawn_single(&self, origin: Vec3, power: f32) -> Result<Handle, PoolExhausted> {
        self.spawner().spawn_single(origin, power)
    }

    pub fn spawn_epic_burst(&self) -> usize {
        self.spawner().spawn_epic_burst()
    }

    pub fn combo_count(&self) -> u32 {
        lock_recover(&self.combo, "combo").count()
    }

    pub fn is_epic_ready(&self) -> bool {
        lock_recover(&self.combo, "combo").is_epic_ready()
    }

    /// Apply a command from the app shell.
    pub fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SpawnSingle { origin, power } => {
                // A dropped shot is already logged and reported
                let _ = self.spawn_single(origin, power);
            }
            PlayerCommand::SpawnEpicBurst => {
                self.spawn_epic_burst();
            }
            PlayerCommand::Restart => self.restart(),
        }
    }

    /// Advance the simulation by `dt` seconds, clamped to
    /// `[0, sim.max_frame_dt]`.
    pub fn update(&mut self, dt: f32) {
        let dt = clamp_dt(dt, self.config.sim.max_frame_dt);
        self.time.advance(dt);
        self.scratch.clear();
        self.events.clear();
        drain_outbox(&self.outbox, &mut self.score, &mut self.events);

        // 1. Clocks
        lock_recover(&self.combo, "combo").update(dt);
        if self.planet.tick(dt) {
            info!("Planet respawned");
            self.events.push(BattleEvent::PlanetRespawned);
        }

        // 2. Ship AI (decide, fire, move)
        let armory = Armory {
            lasers: &self.lasers,
            missiles: &self.missiles,
        };
        systems::ship_ai::run(
            &mut self.ships,
            &mut self.scratch,
            &mut self.rng,
            &armory,
            &mut self.events,
            dt,
        );

        // 3. Ambient meteor shower
        if self.config.ambient.enabled {
            systems::ambient::run(
                &mut self.ambient_timer,
                self.config.ambient.interval_secs,
                &mut self.rng,
                &self.debris,
                &mut self.events,
                dt,
            );
        }

        // 4. Targets after ships moved
        self.scratch.targets.clear();
        self.scratch
            .targets
            .extend(self.ships.iter().filter_map(Ship::as_target));
        self.scratch.targets.extend(self.planet.targets());

        // 5. Integrate + collide + recycle, one lock per pool held for the
        //    whole pass
        for (pool, is_player_pool) in [
            (&self.meteors, true),
            (&self.lasers, false),
            (&self.missiles, false),
            (&self.debris, false),
        ] {
            let mut pool = lock_recover(pool, "entity pool");
            systems::integrate::run(&mut pool, &self.scratch.targets, dt);
            systems::impacts::run(&mut pool, &self.scratch.targets, &mut self.scratch.impacts);
            let misses = systems::cleanup::run(&mut pool, &mut self.scratch.retire, ARENA_RADIUS);
            if is_player_pool {
                self.scratch.player_misses += misses;
            }
        }

        // 6. Damage, combo and score
        self.apply_impacts();

        for event in &self.events {
            if matches!(event, BattleEvent::SpecialActivated { .. }) {
                self.score.specials_used += 1;
            }
        }
        self.backlog.extend(self.events.iter().cloned());
    }

    fn apply_impacts(&mut self) {
        let mut combo = lock_recover(&self.combo, "combo");

        for impact in &self.scratch.impacts {
            let (damage, destroyed) = match impact.target {
                TargetId::ForceField => {
                    self.score.force_field_impacts += 1;
                    if self.planet.force_field.register_impact() {
                        info!("Force field down");
                        self.events.push(BattleEvent::ForceFieldDown);
                    }
                    (1, false)
                }
                TargetId::Planet => {
                    let damage = payload_damage(impact.payload);
                    (damage, self.planet.damage(damage))
                }
                TargetId::Ship(kind) => {
                    let damage = payload_damage(impact.payload);
                    let destroyed = self
                        .ships
                        .iter_mut()
                        .find(|s| s.kind == kind)
                        .is_some_and(|s| s.damage(damage));
                    (damage, destroyed)
                }
            };

            self.impact_sink
                .on_impact(impact.position, impact.team.color(), impact.payload);
            self.events.push(BattleEvent::Impact {
                kind: impact.kind,
                team: impact.team,
                target: impact.target,
                position: impact.position,
                damage,
            });

            if destroyed {
                match impact.target {
                    TargetId::Planet => {
                        info!("Planet destroyed by {:?} {:?}", impact.team, impact.kind);
                        self.events.push(BattleEvent::PlanetDestroyed);
                        if impact.team == Team::Player {
                            self.score.award_planet();
                        }
                    }
                    TargetId::Ship(kind) => {
                        info!("{kind:?} destroyed by {:?} {:?}", impact.team, impact.kind);
                        self.events.push(BattleEvent::ShipDestroyed { ship: kind });
                        match kind.team() {
                            Team::Hostile => self.score.hostile_kills += 1,
                            _ => self.score.player_kills += 1,
                        }
                    }
                    TargetId::ForceField => {}
                }
            }

            if impact.is_player_meteor() {
                self.score.award_hit(combo.count() + 1);
                if combo.register_hit() {
                    info!("Epic burst ready at combo {}", combo.count());
                    self.events.push(BattleEvent::EpicReady {
                        combo: combo.count(),
                    });
                }
            }
        }

        for _ in 0..self.scratch.player_misses {
            combo.register_miss();
            self.score.record_miss();
        }
    }

    /// Read-only render pass: the planet, live ships and every active
    /// entity, each pool visited under its own lock.
    pub fn draw(
        &self,
        resources: &SharedRenderResources,
        camera: &dyn CameraProvider,
        renderer: &mut dyn BattleRenderer,
    ) {
        self.planet.draw(resources, camera, renderer);
        for ship in &self.ships {
            ship.draw(resources, camera, renderer);
        }
        for pool in [&self.debris, &self.meteors, &self.missiles, &self.lasers] {
            let pool = lock_recover(pool, "entity pool");
            for (_, entity) in pool.iter_active() {
                entity.draw(resources, camera, renderer);
            }
        }
    }

    /// Copy the battle into a snapshot and hand over the events raised
    /// since the previous snapshot, at most `EVENT_BACKLOG` of them.
    pub fn snapshot(&mut self) -> BattleSnapshot {
        drain_outbox(&self.outbox, &mut self.score, &mut self.backlog);
        let combo = lock_recover(&self.combo, "combo").view();
        let events = self.backlog.take();
        systems::snapshot::build_snapshot(
            self.time,
            &[&self.debris, &self.meteors, &self.missiles, &self.lasers],
            &self.ships,
            &self.planet,
            combo,
            self.score.view(),
            events,
        )
    }

    /// Reset pools, ships, planet, combo, score and the RNG to session
    /// start.
    pub fn restart(&mut self) {
        for pool in [&self.meteors, &self.lasers, &self.missiles, &self.debris] {
            lock_recover(pool, "entity pool").clear();
        }
        lock_recover(&self.combo, "combo").reset();
        lock_recover(&self.outbox, "event outbox").clear();
        for ship in &mut self.ships {
            ship.reset();
        }
        self.planet.reset();
        self.score = ScoreState::default();
        self.events.clear();
        self.backlog.clear();
        self.time = SimTime::default();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.sim.seed);
        self.ambient_timer = self.config.ambient.interval_secs;
        info!("Battle restarted");
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, kind: ShipKind) -> Option<&Ship> {
        self.ships.iter().find(|s| s.kind == kind)
    }

    /// Mutable access for scenario setup.
    pub fn ship_mut(&mut self, kind: ShipKind) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.kind == kind)
    }

    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    /// Mutable access for scenario setup.
    pub fn planet_mut(&mut self) -> &mut Planet {
        &mut self.planet
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Events raised by the most recent `update`.
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Events queued for the next snapshot.
    pub fn pending_events(&self) -> usize {
        self.backlog.len()
    }

    /// Number of active slots in the pool holding `kind`.
    pub fn active_count(&self, kind: EntityKind) -> usize {
        lock_recover(self.pool_for(kind), "entity pool").active_count()
    }

    pub fn pool_stats(&self, kind: EntityKind) -> PoolStats {
        lock_recover(self.pool_for(kind), "entity pool").stats()
    }

    /// Copies of the active entities of `kind`'s pool.
    pub fn active_entities(&self, kind: EntityKind) -> Vec<Entity> {
        lock_recover(self.pool_for(kind), "entity pool")
            .iter_active()
            .map(|(_, e)| *e)
            .collect()
    }

    fn pool_for(&self, kind: EntityKind) -> &SharedPool {
        match kind {
            EntityKind::Meteor => &self.meteors,
            EntityKind::Laser => &self.lasers,
            EntityKind::Missile => &self.missiles,
            EntityKind::Debris => &self.debris,
        }
    }
}

impl Default for BattleEngine {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}

/// Move events raised by spawner calls into `sink`.
fn drain_outbox(outbox: &Outbox, score: &mut ScoreState, sink: &mut impl Extend<BattleEvent>) {
    let mut outbox = lock_recover(outbox, "event outbox");
    for event in outbox.drain(..) {
        if matches!(event, BattleEvent::EpicBurstFired { .. }) {
            score.epic_bursts += 1;
        }
        sink.extend(Some(event));
    }
}

/// Clamp a frame delta into `[0, max]`. A non-finite `dt` counts as zero;
/// a `max` that is not a positive number falls back to `MAX_FRAME_DT`.
pub fn clamp_dt(dt: f32, max: f32) -> f32 {
    let max = if max.is_finite() && max > 0.0 { max } else { MAX_FRAME_DT };
    if !dt.is_finite() {
        return 0.0;
    }
    dt.max(0.0).min(max)
}
