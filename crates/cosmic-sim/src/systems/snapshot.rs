//! Snapshot builder: copies the battle into a serialisable
//! `BattleSnapshot` for UI overlays.

use cosmic_core::events::BattleEvent;
use cosmic_core::state::{BattleSnapshot, ComboView, EntityView, ScoreView};
use cosmic_core::types::SimTime;

use crate::combatants::{Planet, Ship};
use crate::motion;
use crate::pool::{lock_recover, SharedPool};

pub fn build_snapshot(
    time: SimTime,
    pools: &[&SharedPool],
    ships: &[Ship],
    planet: &Planet,
    combo: ComboView,
    score: ScoreView,
    events: Vec<BattleEvent>,
) -> BattleSnapshot {
    let mut entities = Vec::new();
    for pool in pools {
        let pool = lock_recover(pool, "entity pool");
        entities.extend(pool.iter_active().map(|(_, e)| {
            let (scale, alpha) = motion::visual(e);
            EntityView {
                kind: e.kind,
                state: e.state,
                team: e.team,
                position: e.position,
                scale,
                alpha,
            }
        }));
    }

    BattleSnapshot {
        time,
        entities,
        ships: ships.iter().map(Ship::view).collect(),
        planet: planet.view(),
        combo,
        score,
        events,
    }
}
