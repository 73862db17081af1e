//! Ship AI system: runs the FSM for every ship, fires weapons and moves
//! ships inside the arena.

use glam::Quat;
use log::{debug, info};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use cosmic_ai::fsm::{decide, ShipContext};
use cosmic_ai::profiles::SpecialAttack;
use cosmic_ai::steering::{desired_velocity, integrate, random_heading, roll_shoot_cooldown};
use cosmic_core::components::{Entity, Trajectory};
use cosmic_core::constants::*;
use cosmic_core::enums::{EntityKind, EntityState, ShipState};
use cosmic_core::events::BattleEvent;
use cosmic_core::types::Vec3;

use crate::collision::nearest_opponent;
use crate::combatants::{Damageable, Ship};
use crate::motion::ballistic_direction;
use crate::pool::{lock_recover, SharedPool};
use crate::scratch::FrameScratch;

/// Weapon pools ships fire into.
pub struct Armory<'a> {
    pub lasers: &'a SharedPool,
    pub missiles: &'a SharedPool,
}

/// Run the AI for every ship. `scratch.targets` is rebuilt here from the
/// live ships before any decision is taken.
pub fn run(
    ships: &mut [Ship],
    scratch: &mut FrameScratch,
    rng: &mut ChaCha8Rng,
    armory: &Armory<'_>,
    events: &mut Vec<BattleEvent>,
    dt: f32,
) {
    for ship in ships.iter_mut() {
        if ship.tick(dt) {
            info!("{:?} respawned", ship.kind);
            events.push(BattleEvent::ShipRespawned { ship: ship.kind });
        }
    }

    scratch.targets.clear();
    scratch.targets.extend(ships.iter().filter_map(Ship::as_target));
    scratch.threats.clear();
    scratch.threats.extend(ships.iter().map(|ship| {
        nearest_opponent(ship.position, ship.team(), &scratch.targets).map(|t| t.position)
    }));

    for (ship, threat) in ships.iter_mut().zip(scratch.threats.iter().copied()) {
        let distance_to_threat = threat.map_or(f32::INFINITY, |t| ship.position.distance(t));
        let decision = decide(&ShipContext {
            kind: ship.kind,
            health: ship.health(),
            max_health: ship.max_health(),
            distance_to_threat,
            shoot_cooldown: ship.cooldowns.shoot,
        });
        ship.state = decision.state;
        if decision.state == ShipState::Destroyed {
            continue;
        }

        ship.wander_timer -= dt;
        if ship.wander_timer <= 0.0 {
            ship.wander_heading = random_heading(rng);
            ship.wander_timer = WANDER_INTERVAL;
        }

        use_abilities(ship, threat, distance_to_threat, rng, events);

        if decision.fire {
            if let Some(threat) = threat {
                fire(ship, threat, armory, events);
                let rolled = roll_shoot_cooldown(&ship.profile, rng);
                ship.cooldowns.shoot = ship.adjust_shoot_cooldown(rolled);
            }
        }

        let profile = ship.movement_profile();
        let desired = desired_velocity(ship.state, ship.position, threat, ship.wander_heading, &profile);
        integrate(
            &mut ship.position,
            &mut ship.velocity,
            desired,
            &profile,
            &SHIP_BOUNDS,
            dt,
        );
    }
}

/// Trigger every non-weapon special whose cooldown is ready and whose
/// situation applies this frame.
fn use_abilities(
    ship: &mut Ship,
    threat: Option<Vec3>,
    distance: f32,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<BattleEvent>,
) {
    for &special in ship.profile.specials {
        if special.is_weapon() || !ship.cooldowns.special_ready(special) {
            continue;
        }
        let used = match special {
            SpecialAttack::EnergyShield => {
                let low = ship.hull.health_fraction() <= ship.profile.low_health_fraction;
                if low {
                    ship.hull.raise_shield(special.duration());
                }
                low
            }
            SpecialAttack::PlasmaOvercharge => ship.state == ShipState::Attacking,
            SpecialAttack::Afterburner => {
                matches!(ship.state, ShipState::Pursuing | ShipState::Evading)
            }
            SpecialAttack::Teleport => {
                match teleport_destination(ship.state, ship.position, threat, distance, rng) {
                    Some(destination) => {
                        ship.position = destination;
                        ship.velocity = Vec3::ZERO;
                        true
                    }
                    None => false,
                }
            }
            SpecialAttack::HomingVolley | SpecialAttack::TripleBurst => false,
        };
        if used {
            activate(ship, special, events);
        }
    }
}

fn activate(ship: &mut Ship, special: SpecialAttack, events: &mut Vec<BattleEvent>) {
    ship.cooldowns.start_special(special);
    ship.effects.activate(special);
    info!("{:?} used {special:?}", ship.kind);
    events.push(BattleEvent::SpecialActivated {
        ship: ship.kind,
        special,
    });
}

/// Where a teleport lands, if the situation calls for one. Evading ships
/// jump to a random point clear of the threat; attackers at mid range jump
/// behind it.
fn teleport_destination(
    state: ShipState,
    position: Vec3,
    threat: Option<Vec3>,
    distance: f32,
    rng: &mut ChaCha8Rng,
) -> Option<Vec3> {
    let threat = threat?;
    match state {
        ShipState::Evading => {
            let (min, max) = (SHIP_BOUNDS.min, SHIP_BOUNDS.max);
            let mut destination = Vec3::new(
                rng.gen_range(min.x..=max.x),
                rng.gen_range(min.y..=max.y),
                rng.gen_range(min.z..=max.z),
            );
            if destination.distance(threat) < TELEPORT_MIN_CLEARANCE {
                // Step toward the middle of the box so the clamp cannot undo it
                let inward = |v: f32, lo: f32, hi: f32| if v > (lo + hi) * 0.5 { -1.0 } else { 1.0 };
                destination = threat
                    + Vec3::new(
                        inward(threat.x, min.x, max.x) * TELEPORT_SIDESTEP,
                        0.0,
                        inward(threat.z, min.z, max.z) * TELEPORT_SIDESTEP,
                    );
            }
            Some(SHIP_BOUNDS.clamp_point(destination))
        }
        ShipState::Attacking
            if distance > TELEPORT_FLANK_RANGE.0 && distance < TELEPORT_FLANK_RANGE.1 =>
        {
            let behind = (threat - position).normalize_or_zero();
            Some(SHIP_BOUNDS.clamp_point(threat + behind * TELEPORT_FLANK_OFFSET))
        }
        _ => None,
    }
}

/// Fire the primary weapon at `threat`, upgraded to the ship's weapon
/// special when its cooldown is ready.
fn fire(ship: &mut Ship, threat: Vec3, armory: &Armory<'_>, events: &mut Vec<BattleEvent>) {
    let direction = ballistic_direction(ship.position, threat);
    let muzzle = ship.position + direction * (ship.profile.radius + LASER_RADIUS + 0.01);
    let special = ship
        .profile
        .weapon_special()
        .filter(|&s| ship.cooldowns.special_ready(s));
    if let Some(special) = special {
        activate(ship, special, events);
    }

    match special {
        Some(SpecialAttack::TripleBurst) => {
            let angles = [-TRIPLE_BURST_SPREAD, 0.0, TRIPLE_BURST_SPREAD];
            let requested = angles.len();
            let spawned = lock_recover(armory.lasers, "laser pool").spawn_many(requested, |i| {
                let dir = Quat::from_rotation_y(angles[i]) * direction;
                laser(ship, muzzle, dir)
            });
            report_shortfall(EntityKind::Laser, requested, spawned, events);
        }
        Some(SpecialAttack::HomingVolley) => {
            let requested = MISSILE_VOLLEY_SIZE;
            let spawned = lock_recover(armory.missiles, "missile pool").spawn_many(requested, |i| {
                // Fan the launch so the volley converges from different sides
                let t = i as f32 / (requested.max(2) - 1) as f32;
                let dir = Quat::from_rotation_y((t - 0.5) * 0.6) * direction;
                missile(ship, muzzle, dir, threat)
            });
            report_shortfall(EntityKind::Missile, requested, spawned, events);
        }
        _ => {
            let spawned = lock_recover(armory.lasers, "laser pool")
                .spawn(laser(ship, muzzle, direction))
                .is_ok();
            report_shortfall(EntityKind::Laser, 1, usize::from(spawned), events);
        }
    }
}

fn report_shortfall(kind: EntityKind, requested: usize, spawned: usize, events: &mut Vec<BattleEvent>) {
    if spawned < requested {
        debug!("{kind:?} pool full: {spawned}/{requested} spawned");
        events.push(BattleEvent::SpawnDropped { kind });
    }
}

fn laser(ship: &Ship, muzzle: Vec3, direction: Vec3) -> Entity {
    Entity {
        kind: EntityKind::Laser,
        state: EntityState::Traveling,
        team: ship.team(),
        position: muzzle,
        velocity: direction * LASER_SPEED,
        radius: LASER_RADIUS,
        max_lifetime: LASER_LIFETIME,
        payload: ship.profile.laser_damage,
        base_scale: 0.15,
        trajectory: Trajectory::Ballistic {
            origin: muzzle,
            direction,
            speed: LASER_SPEED,
        },
        ..Default::default()
    }
}

fn missile(ship: &Ship, muzzle: Vec3, direction: Vec3, aim: Vec3) -> Entity {
    Entity {
        kind: EntityKind::Missile,
        state: EntityState::Traveling,
        team: ship.team(),
        position: muzzle,
        velocity: direction * MISSILE_SPEED,
        radius: MISSILE_RADIUS,
        max_lifetime: MISSILE_LIFETIME,
        payload: MISSILE_DAMAGE,
        base_scale: 0.2,
        trajectory: Trajectory::Homing {
            turn_rate: MISSILE_TURN_RATE,
            max_speed: MISSILE_SPEED,
        },
        aim: Some(aim),
        ..Default::default()
    }
}
