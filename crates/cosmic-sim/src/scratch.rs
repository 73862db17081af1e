//! Per-frame scratch buffers owned by the engine.
//!
//! Contents are only valid within the `update` that filled them; every
//! buffer is cleared at the start of the next one. Capacity is reserved
//! once so steady-state frames do not allocate.

use cosmic_core::enums::{EntityKind, TargetId, Team};
use cosmic_core::types::Vec3;

use crate::collision::Target;
use crate::pool::Handle;

/// One resolved impact, applied to targets after the pool pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactRecord {
    pub kind: EntityKind,
    pub team: Team,
    pub target: TargetId,
    pub position: Vec3,
    pub payload: f32,
}

impl ImpactRecord {
    /// Player meteors feed the combo; lasers and missiles do not.
    pub fn is_player_meteor(&self) -> bool {
        self.kind == EntityKind::Meteor && self.team == Team::Player
    }
}

#[derive(Debug, Default)]
pub struct FrameScratch {
    pub targets: Vec<Target>,
    pub impacts: Vec<ImpactRecord>,
    pub retire: Vec<Handle>,
    /// Nearest opposing target per ship, index-aligned with the ship list.
    pub threats: Vec<Option<Vec3>>,
    /// Player meteors that expired without impact this frame.
    pub player_misses: u32,
}

impl FrameScratch {
    pub fn with_capacity(targets: usize, entities: usize) -> Self {
        Self {
            targets: Vec::with_capacity(targets),
            impacts: Vec::with_capacity(entities),
            retire: Vec::with_capacity(entities),
            threats: Vec::with_capacity(targets),
            player_misses: 0,
        }
    }

    pub fn clear(&mut self) {
        self.targets.clear();
        self.impacts.clear();
        self.retire.clear();
        self.threats.clear();
        self.player_misses = 0;
    }
}
