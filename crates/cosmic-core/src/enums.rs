//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Allegiance of an entity or target. Used to filter friendly fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The human side: the player's meteors, Defender and Interceptor.
    Player,
    /// The alien side: Scout and Attacker.
    Hostile,
    /// Ambient debris and the planet. Never friendly with anything.
    #[default]
    Neutral,
}

impl Team {
    /// True when an entity of `self` must not impact a target of `other`.
    pub fn is_friendly_with(self, other: Team) -> bool {
        self == other && self != Team::Neutral
    }

    /// The side this team fights against, if any.
    pub fn opponent(self) -> Option<Team> {
        match self {
            Team::Player => Some(Team::Hostile),
            Team::Hostile => Some(Team::Player),
            Team::Neutral => None,
        }
    }

    /// RGBA tint handed to visual-effect collaborators.
    pub fn color(self) -> [f32; 4] {
        match self {
            Team::Player => [0.3, 0.7, 1.0, 1.0],
            Team::Hostile => [0.0, 1.0, 0.3, 1.0],
            Team::Neutral => [1.0, 0.6, 0.2, 1.0],
        }
    }
}

/// The four combatants of the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipKind {
    /// Heavy human ship. Fires homing volleys.
    Defender,
    /// Fast human fighter. Fires triple bursts.
    Interceptor,
    /// Light alien saucer.
    Scout,
    /// Heavy alien saucer.
    Attacker,
}

impl ShipKind {
    pub const ALL: [ShipKind; 4] = [
        ShipKind::Defender,
        ShipKind::Interceptor,
        ShipKind::Scout,
        ShipKind::Attacker,
    ];

    pub fn team(self) -> Team {
        match self {
            ShipKind::Defender | ShipKind::Interceptor => Team::Player,
            ShipKind::Scout | ShipKind::Attacker => Team::Hostile,
        }
    }
}

/// Per-ship behaviour state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipState {
    /// Wandering inside the arena.
    #[default]
    Patrolling,
    /// Facing the nearest hostile and firing.
    Attacking,
    /// Low on health with a threat close by: moving directly away.
    Evading,
    /// Closing distance while the shoot cooldown runs down.
    Pursuing,
    /// Health reached zero; waiting for the respawn timer.
    Destroyed,
}

/// Lifecycle of a pooled entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    /// Free slot: not drawn, not collision-tested, available to `acquire`.
    #[default]
    Inactive,
    /// In flight; the only state that is collision-tested.
    Traveling,
    /// Hit something this frame. One-shot visual feedback.
    Impacted,
    /// Impact effect playing out before the slot is released.
    Fading,
}

/// Closed set of simulation-relevant entity types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Player-launched meteor.
    #[default]
    Meteor,
    /// Ambient meteor falling toward the planet.
    Debris,
    /// Straight laser bolt fired by a ship.
    Laser,
    /// Homing missile from a Defender volley.
    Missile,
}

impl EntityKind {
    /// Meteors and debris: the kinds the planet's force field stops.
    pub fn is_meteor(self) -> bool {
        matches!(self, EntityKind::Meteor | EntityKind::Debris)
    }
}

/// A high-value collision target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetId {
    Planet,
    /// Barrier around the planet that absorbs meteors while it holds.
    ForceField,
    Ship(ShipKind),
}

/// Ship special abilities. Each runs on its own cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAttack {
    /// Volley of homing missiles.
    HomingVolley,
    /// Three lasers fanned around the aim direction.
    TripleBurst,
    /// Timed window in which the hull ignores damage.
    EnergyShield,
    /// Timed boost to speed and fire rate.
    PlasmaOvercharge,
    /// Timed speed boost.
    Afterburner,
    /// Instant jump to another point of the arena.
    Teleport,
}

impl SpecialAttack {
    pub const COUNT: usize = 6;

    pub const ALL: [SpecialAttack; SpecialAttack::COUNT] = [
        SpecialAttack::HomingVolley,
        SpecialAttack::TripleBurst,
        SpecialAttack::EnergyShield,
        SpecialAttack::PlasmaOvercharge,
        SpecialAttack::Afterburner,
        SpecialAttack::Teleport,
    ];

    /// Slot of this special in per-special timer arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Weapon specials replace the primary shot when ready.
    pub fn is_weapon(self) -> bool {
        matches!(self, SpecialAttack::HomingVolley | SpecialAttack::TripleBurst)
    }

    /// Seconds the effect stays active. Zero for instant specials.
    pub fn duration(self) -> f32 {
        match self {
            SpecialAttack::EnergyShield => SHIELD_DURATION,
            SpecialAttack::PlasmaOvercharge => OVERCHARGE_DURATION,
            SpecialAttack::Afterburner => AFTERBURNER_DURATION,
            SpecialAttack::HomingVolley | SpecialAttack::TripleBurst | SpecialAttack::Teleport => 0.0,
        }
    }

    /// Seconds between the end of one use and the next.
    pub fn cooldown(self) -> f32 {
        match self {
            SpecialAttack::HomingVolley | SpecialAttack::TripleBurst => SPECIAL_COOLDOWN,
            SpecialAttack::EnergyShield => SHIELD_COOLDOWN,
            SpecialAttack::PlasmaOvercharge => OVERCHARGE_COOLDOWN,
            SpecialAttack::Afterburner => AFTERBURNER_COOLDOWN,
            SpecialAttack::Teleport => TELEPORT_COOLDOWN,
        }
    }
}
