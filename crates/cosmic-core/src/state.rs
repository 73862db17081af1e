//! Read-only snapshot of the battle for UI overlays.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::BattleEvent;
use crate::types::{SimTime, Vec3};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub time: SimTime,
    pub entities: Vec<EntityView>,
    pub ships: Vec<ShipView>,
    pub planet: PlanetView,
    pub combo: ComboView,
    pub score: ScoreView,
    /// Events raised since the previous snapshot, oldest first. At most
    /// `EVENT_BACKLOG` are kept between snapshots.
    pub events: Vec<BattleEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub kind: EntityKind,
    pub state: EntityState,
    pub team: Team,
    pub position: Vec3,
    pub scale: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipView {
    pub kind: ShipKind,
    pub team: Team,
    pub state: ShipState,
    pub position: Vec3,
    pub velocity: Vec3,
    pub health: i32,
    pub max_health: i32,
    pub invincible: bool,
    pub shielded: bool,
    pub overcharged: bool,
    pub afterburner: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanetView {
    pub position: Vec3,
    pub health: i32,
    pub max_health: i32,
    pub destroyed: bool,
    pub force_field_health: i32,
    pub force_field_max_health: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboView {
    pub count: u32,
    pub max_combo: u32,
    pub threshold: u32,
    /// Seconds left before the combo breaks.
    pub window_remaining: f32,
    pub epic_ready: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreView {
    pub points: u64,
    pub hits: u32,
    pub misses: u32,
    pub epic_bursts: u32,
    pub hostile_kills: u32,
    pub player_kills: u32,
    pub planets_destroyed: u32,
    pub force_field_impacts: u32,
    pub specials_used: u32,
}
