//! Collaborator interfaces for the read-only render pass.
//!
//! The simulation never owns GPU state. Shader and texture handles are
//! opaque ids resolved once into [`SharedRenderResources`] and passed by
//! reference; the camera and the visual-effect sink are traits the host
//! implements.

use glam::{Mat4, Quat};

use cosmic_core::components::Entity;
use cosmic_core::enums::{EntityKind, ShipKind};
use cosmic_core::types::Vec3;

use crate::combatants::{Damageable, Planet, Ship};
use crate::motion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    pub shader: ShaderHandle,
    pub texture: TextureHandle,
}

/// Shader/texture handles for every simulation-relevant kind. Created
/// once per renderer and passed to each draw call.
#[derive(Debug, Clone)]
pub struct SharedRenderResources {
    meteor: Material,
    debris: Material,
    laser: Material,
    missile: Material,
    ships: [Material; 4],
    planet: Material,
}

impl SharedRenderResources {
    /// Resolve every material through `resolve(shader_id, texture_id)`.
    pub fn load(mut resolve: impl FnMut(&str, &str) -> Material) -> Self {
        Self {
            meteor: resolve("billboard", "meteor"),
            debris: resolve("billboard", "debris"),
            laser: resolve("beam", "laser"),
            missile: resolve("billboard", "missile"),
            ships: [
                resolve("ship", "defender"),
                resolve("ship", "interceptor"),
                resolve("ship", "scout"),
                resolve("ship", "attacker"),
            ],
            planet: resolve("planet", "planet"),
        }
    }

    pub fn entity_material(&self, kind: EntityKind) -> Material {
        match kind {
            EntityKind::Meteor => self.meteor,
            EntityKind::Debris => self.debris,
            EntityKind::Laser => self.laser,
            EntityKind::Missile => self.missile,
        }
    }

    pub fn ship_material(&self, kind: ShipKind) -> Material {
        let index = ShipKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
        self.ships[index]
    }

    pub fn planet_material(&self) -> Material {
        self.planet
    }
}

pub trait CameraProvider {
    /// Model-view-projection for a model transform.
    fn compute_mvp(&self, model: Mat4) -> Mat4 {
        self.view_projection() * model
    }
    fn view_projection(&self) -> Mat4;
}

/// A static perspective camera.
#[derive(Debug, Clone, Copy)]
pub struct FixedCamera {
    view_projection: Mat4,
}

impl FixedCamera {
    pub fn looking_at(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(45f32.to_radians(), aspect, 0.1, 100.0);
        Self {
            view_projection: projection * view,
        }
    }
}

impl CameraProvider for FixedCamera {
    fn view_projection(&self) -> Mat4 {
        self.view_projection
    }
}

/// One draw request handed to the renderer. Plain data, no allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub material: Material,
    pub mvp: Mat4,
    /// RGBA; alpha carries the fade.
    pub tint: [f32; 4],
}

pub trait BattleRenderer {
    fn submit(&mut self, call: DrawCall);
}

/// Anything the renderer can draw. Simulation types implement it here;
/// purely decorative effects implement it on the host side.
pub trait Drawable {
    fn draw(
        &self,
        resources: &SharedRenderResources,
        camera: &dyn CameraProvider,
        renderer: &mut dyn BattleRenderer,
    );
}

impl Drawable for Entity {
    fn draw(
        &self,
        resources: &SharedRenderResources,
        camera: &dyn CameraProvider,
        renderer: &mut dyn BattleRenderer,
    ) {
        if !self.is_active() {
            return;
        }
        let (scale, alpha) = motion::visual(self);
        let model = Mat4::from_scale_rotation_translation(Vec3::splat(scale), Quat::IDENTITY, self.position);
        let [r, g, b, _] = self.team.color();
        renderer.submit(DrawCall {
            material: resources.entity_material(self.kind),
            mvp: camera.compute_mvp(model),
            tint: [r, g, b, alpha],
        });
    }
}

impl Drawable for Ship {
    fn draw(
        &self,
        resources: &SharedRenderResources,
        camera: &dyn CameraProvider,
        renderer: &mut dyn BattleRenderer,
    ) {
        if self.is_destroyed() {
            return;
        }
        let facing = self.velocity.normalize_or_zero();
        let rotation = if facing == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_arc(Vec3::NEG_Z, facing)
        };
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(self.profile.radius * 2.0),
            rotation,
            self.position,
        );
        // Blink at half alpha during the grace window
        let alpha = if self.hull.is_invincible() { 0.5 } else { 1.0 };
        renderer.submit(DrawCall {
            material: resources.ship_material(self.kind),
            mvp: camera.compute_mvp(model),
            tint: [1.0, 1.0, 1.0, alpha],
        });
    }
}

impl Drawable for Planet {
    fn draw(
        &self,
        resources: &SharedRenderResources,
        camera: &dyn CameraProvider,
        renderer: &mut dyn BattleRenderer,
    ) {
        if self.is_destroyed() {
            return;
        }
        let model = Mat4::from_scale_rotation_translation(Vec3::splat(self.radius * 2.0), Quat::IDENTITY, self.position);
        renderer.submit(DrawCall {
            material: resources.planet_material(),
            mvp: camera.compute_mvp(model),
            tint: [1.0; 4],
        });
    }
}

/// Fire-and-forget impact notifications for explosion effects.
/// Implementations must not block.
pub trait ImpactSink: Send {
    fn on_impact(&mut self, position: Vec3, team_color: [f32; 4], magnitude: f32);
}

/// Discards impact notifications.
#[derive(Debug, Default)]
pub struct NullSink;

impl ImpactSink for NullSink {
    fn on_impact(&mut self, _position: Vec3, _team_color: [f32; 4], _magnitude: f32) {}
}

