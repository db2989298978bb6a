//! Pendulum wave: a row of pendulums whose frequencies step by one
//! oscillation per cycle, so the row drifts through traveling-wave and
//! split patterns and realigns every `cycle_seconds`.
//!
//! Angles are evaluated in closed form from elapsed time,
//! `θ_i(t) = max_angle · cos(ω_i · t)`, never integrated, so missed or
//! uneven frames cannot knock the pendulums out of phase with each other.

use std::f64::consts::TAU;

use glam::Vec3;

use crate::color::Rgba;
use crate::config::PendulumConfig;
use crate::scene::{LineId, OrbitCamera, Scene, SphereId};

/// Angular frequency of pendulum `index`: `2π (base + index) / cycle`.
pub fn angular_frequency(base_oscillations: u32, index: usize, cycle_seconds: f64) -> f64 {
    TAU * (base_oscillations as f64 + index as f64) / cycle_seconds
}

/// Visual string length for angular frequency `omega`, proportional to
/// `1/ω²` and normalized so `omega_longest` gets `max_length`.
///
/// Floored at twice the bob radius.
pub fn visual_length(omega: f64, omega_longest: f64, max_length: f32, bob_radius: f32) -> f32 {
    let ratio = omega_longest / omega;
    let length = max_length as f64 * ratio * ratio;
    (length as f32).max(2.0 * bob_radius)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pendulum {
    pub pivot: Vec3,
    pub length: f32,
    /// Radians per second.
    pub omega: f64,
    pub max_angle: f64,
    bob: Option<SphereId>,
    string: Option<LineId>,
}

impl Pendulum {
    /// Angular displacement at `t` seconds.
    #[inline]
    pub fn angle(&self, t: f64) -> f64 {
        self.max_angle * (self.omega * t).cos()
    }

    /// Swing period in seconds.
    pub fn period(&self) -> f64 {
        TAU / self.omega
    }

    /// Bob position at `t`. The swing stays in the plane perpendicular to
    /// the row of pivots.
    pub fn bob_position(&self, t: f64) -> Vec3 {
        let theta = self.angle(t);
        let length = self.length as f64;
        Vec3::new(
            self.pivot.x,
            (self.pivot.y as f64 - length * theta.cos()) as f32,
            (self.pivot.z as f64 + length * theta.sin()) as f32,
        )
    }
}

/// The whole row of pendulums.
#[derive(Debug, Clone)]
pub struct PendulumWave {
    config: PendulumConfig,
    pendulums: Vec<Pendulum>,
}

impl PendulumWave {
    pub fn new(config: PendulumConfig) -> Self {
        let omega_longest = angular_frequency(config.base_oscillations, 0, config.cycle_seconds);
        let row_width = config.spacing * (config.count.saturating_sub(1)) as f32;

        let pendulums = (0..config.count)
            .map(|i| {
                let omega = angular_frequency(config.base_oscillations, i, config.cycle_seconds);
                Pendulum {
                    pivot: Vec3::new(
                        i as f32 * config.spacing - row_width * 0.5,
                        config.pivot_height,
                        0.0,
                    ),
                    length: visual_length(omega, omega_longest, config.max_length, config.bob_radius),
                    omega,
                    max_angle: config.max_angle,
                    bob: None,
                    string: None,
                }
            })
            .collect();

        Self { config, pendulums }
    }

    pub fn config(&self) -> &PendulumConfig {
        &self.config
    }

    pub fn pendulums(&self) -> &[Pendulum] {
        &self.pendulums
    }

    pub fn len(&self) -> usize {
        self.pendulums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pendulums.is_empty()
    }

    /// Populate `scene` with a beam, one string and one bob per pendulum,
    /// and return a camera framing the row.
    pub fn build_scene(&mut self, scene: &mut Scene) -> OrbitCamera {
        let count = self.pendulums.len().max(1) as f32;
        let half_row = self.config.spacing * (count - 1.0) * 0.5;
        let beam_y = self.config.pivot_height;
        let overhang = self.config.spacing;

        scene.add_line(
            Vec3::new(-half_row - overhang, beam_y, 0.0),
            Vec3::new(half_row + overhang, beam_y, 0.0),
            Rgba::rgb(0.7, 0.7, 0.75),
        );

        for (i, pendulum) in self.pendulums.iter_mut().enumerate() {
            let rest = pendulum.bob_position(0.0);
            let hue = 360.0 * i as f32 / count;
            pendulum.string = Some(scene.add_line(pendulum.pivot, rest, Rgba::rgb(0.55, 0.55, 0.6)));
            pendulum.bob = Some(scene.add_sphere(
                rest,
                self.config.bob_radius,
                Rgba::from_hsl(hue, 0.75, 0.55),
            ));
        }

        let target = Vec3::new(0.0, beam_y - self.config.max_length * 0.5, 0.0);
        let distance = (half_row * 2.0 + overhang * 2.0).max(self.config.max_length) * 1.4;
        OrbitCamera::new(target, distance)
    }

    /// Pose every pendulum for `t` seconds since start and write the
    /// results into the scene.
    pub fn update(&self, t: f64, scene: &mut Scene) {
        for pendulum in &self.pendulums {
            let bob = pendulum.bob_position(t);
            if let Some(id) = pendulum.bob {
                scene.set_sphere_position(id, bob);
            }
            if let Some(id) = pendulum.string {
                scene.set_line_end(id, bob);
            }
        }
    }
}
