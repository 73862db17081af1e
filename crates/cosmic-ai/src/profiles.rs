//! Ship-specific behavioral profiles.
//!
//! Consolidates per-ship parameters for the combat FSM and steering.

use cosmic_core::enums::ShipKind;
use cosmic_core::types::Vec3;

pub use cosmic_core::enums::SpecialAttack;

/// Behavioral profile for a ship kind.
#[derive(Debug, Clone, Copy)]
pub struct ShipProfile {
    pub max_health: i32,
    /// Seconds between destruction and respawn.
    pub respawn_delay: f32,
    /// Grace window after respawn (seconds).
    pub invincibility: f32,
    pub max_speed: f32,
    /// Acceleration toward the desired velocity (units/s²).
    pub acceleration: f32,
    /// Fraction of velocity kept per second when coasting.
    pub deceleration: f32,
    pub attack_range: f32,
    pub evade_range: f32,
    /// Health fraction below which a close threat triggers evasion.
    pub low_health_fraction: f32,
    /// Shoot cooldown is re-rolled uniformly in `[min, max]`.
    pub shoot_interval: (f32, f32),
    pub radius: f32,
    pub laser_damage: f32,
    /// Specials this ship can use, each on its own cooldown.
    pub specials: &'static [SpecialAttack],
    pub spawn_position: Vec3,
}

impl ShipProfile {
    pub fn has_special(&self, special: SpecialAttack) -> bool {
        self.specials.contains(&special)
    }

    /// The weapon special that replaces the primary shot, if any.
    pub fn weapon_special(&self) -> Option<SpecialAttack> {
        self.specials.iter().copied().find(|s| s.is_weapon())
    }

    /// Copy with top speed and acceleration scaled by `factor`.
    pub fn with_speed_scale(mut self, factor: f32) -> Self {
        self.max_speed *= factor;
        self.acceleration *= factor;
        self
    }
}

/// Get the behavioral profile for a given ship.
pub fn get_profile(kind: ShipKind) -> ShipProfile {
    match kind {
        ShipKind::Defender => ShipProfile {
            max_health: 5,
            respawn_delay: 6.0,
            invincibility: 1.5,
            max_speed: 2.0,
            acceleration: 3.0,
            deceleration: 0.94,
            attack_range: 12.0,
            evade_range: 2.0,
            low_health_fraction: 0.4,
            shoot_interval: (1.2, 2.5),
            radius: 0.35,
            laser_damage: 1.0,
            specials: &[SpecialAttack::HomingVolley, SpecialAttack::EnergyShield],
            spawn_position: Vec3::new(-1.5, 1.5, 1.5),
        },
        ShipKind::Interceptor => ShipProfile {
            max_health: 4,
            respawn_delay: 7.0,
            invincibility: 1.2,
            max_speed: 2.5,
            acceleration: 2.5,
            deceleration: 0.92,
            attack_range: 15.0,
            evade_range: 2.5,
            low_health_fraction: 0.6,
            shoot_interval: (0.5, 1.0),
            radius: 0.3,
            laser_damage: 1.0,
            specials: &[
                SpecialAttack::TripleBurst,
                SpecialAttack::Afterburner,
                SpecialAttack::Teleport,
            ],
            spawn_position: Vec3::new(1.5, 2.0, 1.5),
        },
        ShipKind::Scout => ShipProfile {
            max_health: 3,
            respawn_delay: 5.0,
            invincibility: 1.0,
            max_speed: 2.2,
            acceleration: 2.0,
            deceleration: 0.93,
            attack_range: 15.0,
            evade_range: 2.5,
            low_health_fraction: 0.5,
            // Fixed interval
            shoot_interval: (2.5, 2.5),
            radius: 0.3,
            laser_damage: 1.0,
            specials: &[SpecialAttack::Teleport],
            spawn_position: Vec3::new(-1.5, 2.0, -2.5),
        },
        ShipKind::Attacker => ShipProfile {
            max_health: 6,
            respawn_delay: 8.0,
            invincibility: 1.5,
            max_speed: 1.8,
            acceleration: 1.8,
            deceleration: 0.95,
            attack_range: 8.0,
            evade_range: 1.5,
            low_health_fraction: 0.34,
            shoot_interval: (1.5, 2.5),
            radius: 0.35,
            laser_damage: 2.0,
            specials: &[SpecialAttack::PlasmaOvercharge],
            spawn_position: Vec3::new(1.5, 1.5, -2.5),
        },
    }
}
