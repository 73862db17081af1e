//! Ships and the planet: the high-value targets entities collide with.

use cosmic_ai::profiles::{get_profile, ShipProfile};
use cosmic_core::components::{ActiveEffects, Cooldowns};
use cosmic_core::constants::*;
use cosmic_core::enums::{ShipKind, ShipState, SpecialAttack, TargetId, Team};
use cosmic_core::state::{PlanetView, ShipView};
use cosmic_core::types::Vec3;

use crate::collision::Target;

/// Health and damage contract shared by ships and the planet.
pub trait Damageable {
    /// Apply `amount` damage. Returns true when this call destroyed the
    /// target. A no-op on destroyed or invincible targets.
    fn damage(&mut self, amount: i32) -> bool;
    fn health(&self) -> i32;
    fn max_health(&self) -> i32;
    fn is_destroyed(&self) -> bool;
}

/// Health, respawn countdown, post-respawn grace window and the optional
/// energy shield window.
#[derive(Debug, Clone)]
pub struct Hull {
    health: i32,
    max_health: i32,
    respawn_delay: f32,
    invincibility: f32,
    respawn_timer: f32,
    /// Local clock (seconds) the grace window is measured against.
    clock: f32,
    invincible_until: f32,
    shielded_until: f32,
}

impl Hull {
    pub fn new(max_health: i32, respawn_delay: f32, invincibility: f32) -> Self {
        let max_health = max_health.max(1);
        Self {
            health: max_health,
            max_health,
            respawn_delay,
            invincibility,
            respawn_timer: 0.0,
            clock: 0.0,
            invincible_until: 0.0,
            shielded_until: 0.0,
        }
    }

    /// Advance the clock. Returns true when a pending respawn completed.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.clock += dt;
        if !self.is_destroyed() {
            return false;
        }
        self.respawn_timer -= dt;
        if self.respawn_timer <= 0.0 {
            self.health = self.max_health;
            self.respawn_timer = 0.0;
            self.invincible_until = self.clock + self.invincibility;
            return true;
        }
        false
    }

    pub fn damage(&mut self, amount: i32) -> bool {
        if amount <= 0 || self.is_destroyed() || self.is_invincible() || self.is_shielded() {
            return false;
        }
        self.health = (self.health - amount).clamp(0, self.max_health);
        if self.health == 0 {
            self.respawn_timer = self.respawn_delay;
            self.shielded_until = 0.0;
            return true;
        }
        false
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    pub fn is_invincible(&self) -> bool {
        self.clock < self.invincible_until
    }

    /// Ignore all damage for the next `duration` seconds. No-op on a
    /// destroyed hull.
    pub fn raise_shield(&mut self, duration: f32) {
        if !self.is_destroyed() {
            self.shielded_until = self.clock + duration;
        }
    }

    pub fn is_shielded(&self) -> bool {
        self.clock < self.shielded_until
    }

    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }

    /// Back to full health with no grace window and a fresh clock.
    pub fn reset(&mut self) {
        *self = Self::new(self.max_health, self.respawn_delay, self.invincibility);
    }

    /// Overwrite health, clamped to `[0, max_health]`. For scenario setup.
    pub fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.max_health);
    }
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub kind: ShipKind,
    pub profile: ShipProfile,
    pub position: Vec3,
    pub velocity: Vec3,
    pub state: ShipState,
    pub cooldowns: Cooldowns,
    pub effects: ActiveEffects,
    pub hull: Hull,
    pub wander_heading: Vec3,
    pub wander_timer: f32,
}

impl Ship {
    pub fn new(kind: ShipKind) -> Self {
        let profile = get_profile(kind);
        let hull = Hull::new(profile.max_health, profile.respawn_delay, profile.invincibility);
        Self {
            kind,
            position: profile.spawn_position,
            velocity: Vec3::ZERO,
            state: ShipState::Patrolling,
            cooldowns: Self::fresh_cooldowns(&profile),
            effects: ActiveEffects::default(),
            hull,
            wander_heading: Vec3::X,
            wander_timer: 0.0,
            profile,
        }
    }

    /// Specials start half charged.
    fn fresh_cooldowns(profile: &ShipProfile) -> Cooldowns {
        Cooldowns {
            shoot: profile.shoot_interval.0,
            special: SpecialAttack::ALL.map(|s| s.cooldown() * 0.5),
        }
    }

    pub fn team(&self) -> Team {
        self.kind.team()
    }

    /// Advance clocks and cooldowns. Returns true when the ship respawned
    /// this frame.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.cooldowns.tick(dt);
        self.effects.tick(dt);
        if self.hull.tick(dt) {
            self.position = self.profile.spawn_position;
            self.velocity = Vec3::ZERO;
            self.state = ShipState::Patrolling;
            self.cooldowns = Self::fresh_cooldowns(&self.profile);
            self.effects.clear();
            self.wander_timer = 0.0;
            return true;
        }
        false
    }

    /// Back to the session-start state.
    pub fn reset(&mut self) {
        *self = Self::new(self.kind);
    }

    /// Speed factor from the active movement specials.
    pub fn speed_multiplier(&self) -> f32 {
        let mut factor = 1.0;
        if self.effects.is_active(SpecialAttack::PlasmaOvercharge) {
            factor *= OVERCHARGE_SPEED_MULT;
        }
        if self.effects.is_active(SpecialAttack::Afterburner) {
            factor *= AFTERBURNER_SPEED_MULT;
        }
        factor
    }

    /// Profile used for steering this frame, with speed effects applied.
    pub fn movement_profile(&self) -> ShipProfile {
        self.profile.with_speed_scale(self.speed_multiplier())
    }

    /// Shoot cooldown after a shot, shortened while overcharged.
    pub fn adjust_shoot_cooldown(&self, rolled: f32) -> f32 {
        if self.effects.is_active(SpecialAttack::PlasmaOvercharge) {
            (rolled * OVERCHARGE_SHOOT_MULT).max(OVERCHARGE_MIN_SHOOT)
        } else {
            rolled
        }
    }

    pub fn as_target(&self) -> Option<Target> {
        (!self.is_destroyed()).then(|| Target {
            id: TargetId::Ship(self.kind),
            team: self.team(),
            position: self.position,
            radius: self.profile.radius,
            meteors_only: false,
        })
    }

    pub fn view(&self) -> ShipView {
        ShipView {
            kind: self.kind,
            team: self.team(),
            state: self.state,
            position: self.position,
            velocity: self.velocity,
            health: self.hull.health,
            max_health: self.hull.max_health,
            invincible: self.hull.is_invincible(),
            shielded: self.hull.is_shielded(),
            overcharged: self.effects.is_active(SpecialAttack::PlasmaOvercharge),
            afterburner: self.effects.is_active(SpecialAttack::Afterburner),
        }
    }
}

impl Damageable for Ship {
    fn damage(&mut self, amount: i32) -> bool {
        let destroyed = self.hull.damage(amount);
        if destroyed {
            self.state = ShipState::Destroyed;
            self.velocity = Vec3::ZERO;
            self.effects.clear();
        }
        destroyed
    }

    fn health(&self) -> i32 {
        self.hull.health
    }

    fn max_health(&self) -> i32 {
        self.hull.max_health
    }

    fn is_destroyed(&self) -> bool {
        self.hull.is_destroyed()
    }
}

/// Barrier around the planet. Every meteor it stops costs one point,
/// whatever the meteor's payload. Once down it stays down until the
/// planet respawns or the session restarts.
#[derive(Debug, Clone)]
pub struct ForceField {
    health: i32,
    max_health: i32,
    pub radius: f32,
}

impl ForceField {
    pub fn new(max_health: i32, radius: f32) -> Self {
        let max_health = max_health.max(0);
        Self {
            health: max_health,
            max_health,
            radius,
        }
    }

    /// Absorb one impact. Returns true when this impact took the field
    /// down.
    pub fn register_impact(&mut self) -> bool {
        if self.is_down() {
            return false;
        }
        self.health -= 1;
        self.is_down()
    }

    pub fn is_down(&self) -> bool {
        self.health <= 0
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn reset(&mut self) {
        self.health = self.max_health;
    }
}

#[derive(Debug, Clone)]
pub struct Planet {
    pub position: Vec3,
    pub radius: f32,
    pub hull: Hull,
    pub force_field: ForceField,
}

impl Planet {
    /// Returns true when the planet respawned this frame. The force field
    /// comes back with it.
    pub fn tick(&mut self, dt: f32) -> bool {
        let respawned = self.hull.tick(dt);
        if respawned {
            self.force_field.reset();
        }
        respawned
    }

    pub fn reset(&mut self) {
        self.hull.reset();
        self.force_field.reset();
    }

    /// Collision targets for this frame: the force field (meteors only)
    /// while it holds, then the planet itself. Both share a center, so a
    /// meteor touching both resolves against the field listed first.
    pub fn targets(&self) -> impl Iterator<Item = Target> {
        let alive = !self.is_destroyed();
        let field = (alive && !self.force_field.is_down()).then(|| Target {
            id: TargetId::ForceField,
            team: Team::Neutral,
            position: self.position,
            radius: self.force_field.radius,
            meteors_only: true,
        });
        let core = alive.then(|| Target {
            id: TargetId::Planet,
            team: Team::Neutral,
            position: self.position,
            radius: self.radius,
            meteors_only: false,
        });
        field.into_iter().chain(core)
    }

    pub fn view(&self) -> PlanetView {
        PlanetView {
            position: self.position,
            health: self.hull.health,
            max_health: self.hull.max_health,
            destroyed: self.is_destroyed(),
            force_field_health: self.force_field.health(),
            force_field_max_health: self.force_field.max_health(),
        }
    }
}

impl Default for Planet {
    fn default() -> Self {
        Self {
            position: PLANET_POSITION,
            radius: PLANET_RADIUS,
            hull: Hull::new(PLANET_MAX_HEALTH, PLANET_RESPAWN_DELAY, PLANET_INVINCIBILITY),
            force_field: ForceField::new(FORCE_FIELD_MAX_HEALTH, FORCE_FIELD_RADIUS),
        }
    }
}

impl Damageable for Planet {
    fn damage(&mut self, amount: i32) -> bool {
        self.hull.damage(amount)
    }

    fn health(&self) -> i32 {
        self.hull.health
    }

    fn max_health(&self) -> i32 {
        self.hull.max_health
    }

    fn is_destroyed(&self) -> bool {
        self.hull.is_destroyed()
    }
}

/// Integer damage for an entity payload: rounded, at least 1.
pub fn payload_damage(payload: f32) -> i32 {
    if !payload.is_finite() {
        return 1;
    }
    (payload.round() as i32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overkill_clamps_to_zero_and_destroys() {
        let mut ship = Ship::new(ShipKind::Scout);
        ship.hull.set_health(1);
        assert!(ship.damage(5));
        assert_eq!(ship.health(), 0);
        assert!(ship.is_destroyed());
        assert_eq!(ship.state, ShipState::Destroyed);
        assert!(ship.as_target().is_none());
    }

    #[test]
    fn damage_on_destroyed_is_noop() {
        let mut ship = Ship::new(ShipKind::Scout);
        assert!(ship.damage(100));
        assert!(!ship.damage(1));
        assert_eq!(ship.health(), 0);
    }

    #[test]
    fn respawn_after_delay_with_grace() {
        let mut ship = Ship::new(ShipKind::Scout);
        ship.position = Vec3::new(2.0, 2.0, 2.0);
        ship.damage(100);
        let delay = ship.profile.respawn_delay;
        assert!(!ship.tick(delay * 0.5));
        assert!(ship.is_destroyed());
        assert!(ship.tick(delay * 0.5 + 0.01));
        assert_eq!(ship.health(), ship.max_health());
        assert_eq!(ship.state, ShipState::Patrolling);
        assert_eq!(ship.position, ship.profile.spawn_position);
        assert!(ship.hull.is_invincible());

        // Grace window ignores damage
        assert!(!ship.damage(1));
        assert_eq!(ship.health(), ship.max_health());
        ship.tick(ship.profile.invincibility + 0.01);
        assert!(!ship.hull.is_invincible());
        ship.damage(1);
        assert_eq!(ship.health(), ship.max_health() - 1);
    }

    #[test]
    fn health_never_exceeds_max() {
        let mut hull = Hull::new(3, 1.0, 0.0);
        assert!(!hull.damage(-5));
        assert_eq!(hull.health_fraction(), 1.0);
    }

    #[test]
    fn planet_destroyed_and_respawns() {
        let mut planet = Planet::default();
        assert!(planet.damage(PLANET_MAX_HEALTH));
        assert_eq!(planet.targets().count(), 0);
        assert!(planet.tick(PLANET_RESPAWN_DELAY));
        assert_eq!(planet.health(), PLANET_MAX_HEALTH);
        assert_eq!(planet.targets().count(), 2);
    }

    #[test]
    fn force_field_absorbs_then_drops() {
        let mut field = ForceField::new(3, FORCE_FIELD_RADIUS);
        assert!(!field.register_impact());
        assert!(!field.register_impact());
        assert!(field.register_impact());
        assert!(field.is_down());
        // Further impacts on a downed field change nothing
        assert!(!field.register_impact());
        assert_eq!(field.health(), 0);
        field.reset();
        assert_eq!(field.health(), 3);
    }

    #[test]
    fn planet_targets_list_field_first_while_it_holds() {
        let mut planet = Planet::default();
        let ids: Vec<_> = planet.targets().map(|t| t.id).collect();
        assert_eq!(ids, [TargetId::ForceField, TargetId::Planet]);
        let field = planet.targets().next().unwrap();
        assert!(field.meteors_only);
        assert_eq!(field.radius, FORCE_FIELD_RADIUS);

        for _ in 0..FORCE_FIELD_MAX_HEALTH {
            planet.force_field.register_impact();
        }
        let ids: Vec<_> = planet.targets().map(|t| t.id).collect();
        assert_eq!(ids, [TargetId::Planet]);
    }

    #[test]
    fn force_field_returns_with_planet() {
        let mut planet = Planet::default();
        for _ in 0..FORCE_FIELD_MAX_HEALTH {
            planet.force_field.register_impact();
        }
        planet.damage(PLANET_MAX_HEALTH);
        planet.tick(PLANET_RESPAWN_DELAY);
        assert_eq!(planet.force_field.health(), FORCE_FIELD_MAX_HEALTH);

        for _ in 0..5 {
            planet.force_field.register_impact();
        }
        planet.reset();
        assert_eq!(planet.view().force_field_health, FORCE_FIELD_MAX_HEALTH);
    }

    #[test]
    fn shield_window_blocks_damage() {
        let mut ship = Ship::new(ShipKind::Defender);
        ship.hull.raise_shield(SHIELD_DURATION);
        assert!(ship.hull.is_shielded());
        assert!(!ship.damage(3));
        assert_eq!(ship.health(), ship.max_health());
        assert!(ship.view().shielded);

        ship.tick(SHIELD_DURATION + 0.01);
        assert!(!ship.hull.is_shielded());
        ship.damage(1);
        assert_eq!(ship.health(), ship.max_health() - 1);
    }

    #[test]
    fn destroyed_hull_cannot_raise_shield() {
        let mut hull = Hull::new(2, 1.0, 0.0);
        hull.damage(2);
        hull.raise_shield(5.0);
        assert!(!hull.is_shielded());
    }

    #[test]
    fn overcharge_speeds_up_movement_and_fire() {
        let mut ship = Ship::new(ShipKind::Attacker);
        assert_eq!(ship.speed_multiplier(), 1.0);
        assert_eq!(ship.adjust_shoot_cooldown(1.5), 1.5);

        ship.effects.activate(SpecialAttack::PlasmaOvercharge);
        assert_eq!(ship.speed_multiplier(), OVERCHARGE_SPEED_MULT);
        assert_eq!(
            ship.movement_profile().max_speed,
            ship.profile.max_speed * OVERCHARGE_SPEED_MULT
        );
        assert!((ship.adjust_shoot_cooldown(1.5) - 1.5 * OVERCHARGE_SHOOT_MULT).abs() < 1e-6);
        assert_eq!(ship.adjust_shoot_cooldown(0.5), OVERCHARGE_MIN_SHOOT);
        assert!(ship.view().overcharged);

        // Destruction ends every effect
        ship.damage(100);
        assert_eq!(ship.speed_multiplier(), 1.0);
    }

    #[test]
    fn afterburner_speed_multiplier() {
        let mut ship = Ship::new(ShipKind::Interceptor);
        ship.effects.activate(SpecialAttack::Afterburner);
        assert_eq!(ship.speed_multiplier(), AFTERBURNER_SPEED_MULT);
        ship.tick(AFTERBURNER_DURATION);
        assert_eq!(ship.speed_multiplier(), 1.0);
    }

    #[test]
    fn payload_rounding() {
        assert_eq!(payload_damage(0.2), 1);
        assert_eq!(payload_damage(1.4), 1);
        assert_eq!(payload_damage(2.6), 3);
        assert_eq!(payload_damage(f32::NAN), 1);
    }
}
