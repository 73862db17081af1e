//! Events emitted by the simulation each update.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Vec3;

/// Something noteworthy that happened during one `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleEvent {
    Impact {
        kind: EntityKind,
        team: Team,
        target: TargetId,
        position: Vec3,
        damage: i32,
    },
    ShipDestroyed {
        ship: ShipKind,
    },
    ShipRespawned {
        ship: ShipKind,
    },
    PlanetDestroyed,
    PlanetRespawned,
    /// The force field around the planet absorbed its last meteor.
    ForceFieldDown,
    /// A ship used one of its specials.
    SpecialActivated {
        ship: ShipKind,
        special: SpecialAttack,
    },
    /// The combo threshold was crossed; an epic burst may be fired.
    EpicReady {
        combo: u32,
    },
    EpicBurstFired {
        requested: usize,
        spawned: usize,
    },
    /// A spawn request found its pool full.
    SpawnDropped {
        kind: EntityKind,
    },
}
