//! A single particle slot.

use glam::{Vec2, Vec3};

use super::projection::{self, Viewport};
use crate::color::Rgba;
use crate::config::FieldConfig;
use crate::spawn::Spawner;

/// What happened to a particle during one physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Bounced,
    Respawned,
}

/// Point mass with its last projection.
///
/// Slots are never freed: when a particle leaves play it is reset in place
/// with fresh random state.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub color: Rgba,
    /// Depth after the view rotation, as of the last projection.
    pub rotated_depth: f32,
    pub screen: Vec2,
    /// Perspective scale, `0.0` when not visible.
    pub scale: f32,
    pub visible: bool,
}

impl Particle {
    /// Create a particle with fresh spawn state.
    pub fn spawn(config: &FieldConfig, viewport: &Viewport, spawner: &mut Spawner) -> Self {
        let mut particle = Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            radius: 0.0,
            color: Rgba::WHITE,
            rotated_depth: 0.0,
            screen: Vec2::ZERO,
            scale: 0.0,
            visible: false,
        };
        particle.reset(config, viewport, spawner);
        particle
    }

    /// Reinitialize this slot.
    ///
    /// Depth is uniform in the spawn range. The horizontal spread narrows
    /// for far spawns so particles enter from a converging wedge.
    pub fn reset(&mut self, config: &FieldConfig, viewport: &Viewport, spawner: &mut Spawner) {
        let z = spawner.random_range(config.spawn_depth_min, config.spawn_depth_max);
        let depth_t = (z - config.spawn_depth_min) / (config.spawn_depth_max - config.spawn_depth_min);
        let spread = 1.0 + (config.far_spread - 1.0) * depth_t;
        let x = spawner.random_signed(0.5) * viewport.width * spread;
        let y = config.ground + spawner.random_range(0.0, config.spawn_height);

        self.position = Vec3::new(x, y, z);
        self.velocity = Vec3::new(
            spawner.random_signed(config.spawn_speed_x),
            spawner.random_range(config.launch_speed_min, config.launch_speed_max),
            -spawner.random_range(config.approach_speed_min, config.approach_speed_max),
        );
        self.radius = spawner.random_range(config.radius_min, config.radius_max);
        self.color = spawner.random_hue(config.saturation, config.lightness);

        self.rotated_depth = z;
        self.screen = Vec2::ZERO;
        self.scale = 0.0;
        self.visible = false;
    }

    /// Advance one frame: gravity, Euler integration, ground bounce.
    ///
    /// Returns `true` if the particle hit the ground this step.
    pub fn integrate(&mut self, config: &FieldConfig) -> bool {
        self.velocity.y -= config.gravity;
        self.position += self.velocity;

        if self.position.y < config.ground {
            self.position.y = config.ground;
            self.velocity.y = -self.velocity.y * config.elasticity;
            true
        } else {
            false
        }
    }

    /// Passed the viewer, or launched far above the visible area.
    pub fn is_out_of_play(&self, config: &FieldConfig, viewport: &Viewport) -> bool {
        self.position.z < config.near_clip || self.position.y > viewport.height * 2.0
    }

    /// Integrate, then respawn if the particle left play.
    pub fn step(&mut self, config: &FieldConfig, viewport: &Viewport, spawner: &mut Spawner) -> StepOutcome {
        let bounced = self.integrate(config);
        if self.is_out_of_play(config, viewport) {
            self.reset(config, viewport, spawner);
            StepOutcome::Respawned
        } else if bounced {
            StepOutcome::Bounced
        } else {
            StepOutcome::Moved
        }
    }

    /// Update the derived screen fields for the given view angle.
    pub fn project(&mut self, angle: f32, viewport: &Viewport) {
        let p = projection::project(self.position, angle, viewport);
        self.rotated_depth = p.rotated_depth;
        self.scale = p.scale;
        self.screen = p.screen;
        self.visible = p.visible;
    }

    /// On-screen radius for the last projection.
    #[inline]
    pub fn screen_radius(&self) -> f32 {
        self.radius * self.scale
    }
}
