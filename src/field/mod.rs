//! Particle field: bouncing point masses under a swaying perspective camera.
//!
//! Each frame runs in a fixed order:
//!
//! 1. [`ParticleField::step`]: gravity, Euler integration, ground bounce,
//!    in-place respawn of particles that left play.
//! 2. [`ParticleField::project`]: yaw every particle by the current sweep
//!    angle and perspective-project it.
//! 3. [`ParticleField::depth_sort`]: full sort, farthest first.
//! 4. [`ParticleField::draw`]: fade the previous frame, paint circles.
//!
//! [`ParticleField::frame`] does all four.

mod particle;
mod projection;

pub use particle::{Particle, StepOutcome};
pub use projection::{project, rotate_y, Projection, ViewSweep, Viewport};

use tracing::debug;

use crate::canvas::Canvas;
use crate::config::FieldConfig;
use crate::spawn::Spawner;

/// Per-step counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub bounced: usize,
    pub respawned: usize,
}

/// Fixed-size population of particles plus the camera that views them.
pub struct ParticleField {
    config: FieldConfig,
    viewport: Viewport,
    sweep: ViewSweep,
    view_angle: f32,
    particles: Vec<Particle>,
    spawner: Spawner,
}

impl ParticleField {
    /// Spawn `config.particle_count` particles for a `width` x `height` viewport.
    pub fn new(config: FieldConfig, width: f32, height: f32, mut spawner: Spawner) -> Self {
        let viewport = Viewport::new(width, height, &config);
        let particles = (0..config.particle_count)
            .map(|_| Particle::spawn(&config, &viewport, &mut spawner))
            .collect();

        Self {
            sweep: ViewSweep::from_config(&config),
            view_angle: 0.0,
            config,
            viewport,
            particles,
            spawner,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the slots. The population size cannot change.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// View angle used by the last projection.
    pub fn view_angle(&self) -> f32 {
        self.view_angle
    }

    /// Recompute viewport constants. Particle state is left alone.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Viewport::new(width, height, &self.config);
            debug!(width, height, focal = self.viewport.focal_length, "field viewport resized");
        }
    }

    /// Reset every slot with fresh spawn state.
    pub fn respawn_all(&mut self) {
        for particle in &mut self.particles {
            particle.reset(&self.config, &self.viewport, &mut self.spawner);
        }
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self) -> StepReport {
        let mut report = StepReport::default();
        for particle in &mut self.particles {
            match particle.step(&self.config, &self.viewport, &mut self.spawner) {
                StepOutcome::Bounced => report.bounced += 1,
                StepOutcome::Respawned => report.respawned += 1,
                StepOutcome::Moved => {}
            }
        }
        report
    }

    /// Project every particle for the sweep angle at `elapsed` seconds.
    pub fn project(&mut self, elapsed: f64) {
        self.project_at_angle(self.sweep.angle(elapsed));
    }

    /// Project every particle for an explicit view angle.
    pub fn project_at_angle(&mut self, angle: f32) {
        self.view_angle = angle;
        for particle in &mut self.particles {
            particle.project(angle, &self.viewport);
        }
    }

    /// Sort the whole population by rotated depth, farthest first.
    ///
    /// Any two particles may swap depth order between frames, so this is a
    /// full sort every time.
    pub fn depth_sort(&mut self) {
        self.particles
            .sort_unstable_by(|a, b| b.rotated_depth.total_cmp(&a.rotated_depth));
    }

    /// Fade the previous frame and paint visible particles in current order.
    ///
    /// Returns the number of circles drawn.
    pub fn draw(&self, canvas: &mut impl Canvas) -> usize {
        canvas.set_fill_color(self.config.background.with_alpha(self.config.trail_fade));
        canvas.fill_rect(0.0, 0.0, self.viewport.width, self.viewport.height);

        let mut drawn = 0;
        for particle in &self.particles {
            if !particle.visible || particle.scale <= 0.0 {
                continue;
            }
            let radius = particle.screen_radius();
            if !self
                .viewport
                .overlaps_circle(particle.screen, radius, self.config.cull_margin)
            {
                continue;
            }
            canvas.set_fill_color(particle.color);
            canvas.fill_circle(particle.screen.x, particle.screen.y, radius);
            drawn += 1;
        }
        drawn
    }

    /// Run one full frame: step, project, sort, draw.
    pub fn frame(&mut self, elapsed: f64, canvas: &mut impl Canvas) -> StepReport {
        let report = self.step();
        self.project(elapsed);
        self.depth_sort();
        self.draw(canvas);
        report
    }
}
