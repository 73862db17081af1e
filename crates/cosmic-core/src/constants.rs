//! Simulation constants and tuning parameters.

use crate::types::{Bounds, Vec3};

// --- Timing ---

/// Default upper bound on a single frame's delta time (seconds).
pub const MAX_FRAME_DT: f32 = 0.1;

/// Frame rate the headless app shell drives the simulation at.
pub const FRAME_RATE: u32 = 60;

// --- Arena ---

/// Box that ship positions are confined to.
pub const SHIP_BOUNDS: Bounds = Bounds::new(Vec3::new(-2.5, 0.3, -3.5), Vec3::new(2.5, 3.5, 2.5));

/// Entities farther than this from the origin are retired.
pub const ARENA_RADIUS: f32 = 12.0;

/// Below this separation a spawn direction is degenerate.
pub const DIRECTION_EPSILON: f32 = 0.01;

/// Substituted when a spawn direction is degenerate.
pub const DEFAULT_DIRECTION: Vec3 = Vec3::Z;

// --- Entity visuals ---

/// Seconds an entity spends fading out after impact.
pub const FADE_DURATION: f32 = 0.4;

/// Scale multiplier reached at the end of the fade.
pub const FADE_SCALE_GROWTH: f32 = 1.8;

/// Seconds for a fresh entity to grow to full scale.
pub const GROW_IN_DURATION: f32 = 0.15;

// --- Pools ---

pub const PLAYER_METEOR_POOL: usize = 15;
pub const LASER_POOL: usize = 48;
pub const MISSILE_POOL: usize = 16;
pub const DEBRIS_POOL: usize = 6;

// --- Player meteors ---

/// Launch point of single shots.
pub const PLAYER_SPAWN_ORIGIN: Vec3 = Vec3::new(0.0, -3.0, 4.0);
/// Aim point of single shots.
pub const PLAYER_AIM_POINT: Vec3 = Vec3::ZERO;
pub const METEOR_BASE_SPEED: f32 = 5.0;
/// Extra speed at full charge.
pub const METEOR_POWER_SPEED: f32 = 10.0;
pub const METEOR_BASE_RADIUS: f32 = 0.12;
pub const METEOR_POWER_RADIUS: f32 = 0.08;
pub const METEOR_BASE_DAMAGE: f32 = 1.0;
pub const METEOR_POWER_DAMAGE: f32 = 2.0;
pub const METEOR_LIFETIME: f32 = 4.0;

// --- Epic burst ---

pub const EPIC_BURST_COUNT: usize = 7;
/// Radius of the semicircle epic meteors launch from.
pub const EPIC_SPAWN_RADIUS: f32 = 5.0;
pub const EPIC_SPAWN_HEIGHT: f32 = 1.5;
pub const EPIC_MIN_SPEED: f32 = 12.0;
pub const EPIC_MAX_SPEED: f32 = 16.0;
pub const EPIC_DAMAGE: f32 = 3.0;

// --- Combo ---

pub const COMBO_THRESHOLD: u32 = 5;
pub const COMBO_WINDOW: f32 = 5.0;

// --- Scoring ---

pub const SCORE_HIT: u64 = 10;
pub const SCORE_HIT_COMBO_3: u64 = 25;
pub const SCORE_HIT_COMBO_5: u64 = 50;
pub const SCORE_PLANET_DESTROYED: u64 = 1000;

// --- Events ---

/// Events kept for the next snapshot. Older ones are dropped first.
pub const EVENT_BACKLOG: usize = 256;

// --- Lasers and missiles ---

pub const LASER_SPEED: f32 = 6.0;
pub const LASER_LIFETIME: f32 = 3.0;
pub const LASER_RADIUS: f32 = 0.06;

pub const MISSILE_SPEED: f32 = 4.0;
pub const MISSILE_TURN_RATE: f32 = 3.0;
pub const MISSILE_LIFETIME: f32 = 5.0;
pub const MISSILE_RADIUS: f32 = 0.08;
pub const MISSILE_DAMAGE: f32 = 1.0;
pub const MISSILE_VOLLEY_SIZE: usize = 4;

/// Half-angle of the Interceptor triple-burst fan (radians).
pub const TRIPLE_BURST_SPREAD: f32 = 0.15;

/// Cooldown of the homing volley and the triple burst (seconds).
pub const SPECIAL_COOLDOWN: f32 = 12.0;

// --- Ship abilities ---

pub const SHIELD_DURATION: f32 = 4.0;
pub const SHIELD_COOLDOWN: f32 = 15.0;

pub const OVERCHARGE_DURATION: f32 = 4.0;
pub const OVERCHARGE_COOLDOWN: f32 = 15.0;
pub const OVERCHARGE_SPEED_MULT: f32 = 2.0;
/// Shoot interval factor while overcharged.
pub const OVERCHARGE_SHOOT_MULT: f32 = 0.33;
/// Floor on the overcharged shoot interval (seconds).
pub const OVERCHARGE_MIN_SHOOT: f32 = 0.3;

pub const AFTERBURNER_DURATION: f32 = 3.0;
pub const AFTERBURNER_COOLDOWN: f32 = 10.0;
pub const AFTERBURNER_SPEED_MULT: f32 = 1.8;

pub const TELEPORT_COOLDOWN: f32 = 10.0;
/// An escape jump never lands closer than this to the threat.
pub const TELEPORT_MIN_CLEARANCE: f32 = 2.0;
/// Sideways offset used when a random landing point is too close.
pub const TELEPORT_SIDESTEP: f32 = 3.0;
/// Distance band in which an attacking ship jumps behind its target.
pub const TELEPORT_FLANK_RANGE: (f32, f32) = (2.0, 5.0);
/// How far behind the target a flanking jump lands.
pub const TELEPORT_FLANK_OFFSET: f32 = 1.5;

// --- Ship wander ---

/// Seconds between wander heading changes.
pub const WANDER_INTERVAL: f32 = 2.0;

// --- Planet ---

pub const PLANET_POSITION: Vec3 = Vec3::ZERO;
pub const PLANET_RADIUS: f32 = 1.0;
pub const PLANET_MAX_HEALTH: i32 = 200;
pub const PLANET_RESPAWN_DELAY: f32 = 10.0;
pub const PLANET_INVINCIBILITY: f32 = 2.0;

/// Meteor impacts the force field absorbs before it drops.
pub const FORCE_FIELD_MAX_HEALTH: i32 = 50;
pub const FORCE_FIELD_RADIUS: f32 = 1.55;

// --- Ambient meteor shower ---

pub const AMBIENT_INTERVAL: f32 = 3.0;
/// Shell the ambient meteors launch from.
pub const AMBIENT_SPAWN_RADIUS: f32 = 8.0;
pub const AMBIENT_SPEED: f32 = 2.5;
pub const AMBIENT_RADIUS: f32 = 0.1;
pub const AMBIENT_DAMAGE: f32 = 1.0;
pub const AMBIENT_LIFETIME: f32 = 6.0;
