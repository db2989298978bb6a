//! # fieldwave
//!
//! Two small real-time physics visualizations on wgpu.
//!
//! ## Particle field
//!
//! A few hundred colored balls are launched toward the viewer, fall under
//! gravity, and bounce off a ground plane. A camera slowly sweeps left and
//! right around the vertical axis. Each particle is projected by hand onto
//! the screen, sorted back to front, and painted as a flat circle over a
//! translucent fade of the previous frame, which leaves motion trails.
//!
//! ```ignore
//! use fieldwave::prelude::*;
//!
//! let mut field = ParticleField::new(FieldConfig::default(), 1280.0, 720.0, Spawner::from_seed(7));
//! let mut list = DrawList::new();
//! field.frame(0.0, &mut list);
//! ```
//!
//! ## Pendulum wave
//!
//! A row of pendulums whose frequencies differ by exactly one oscillation per
//! cycle. Angles are computed in closed form from elapsed time, so the row
//! drifts through traveling waves and realigns every cycle.
//!
//! ```ignore
//! use fieldwave::prelude::*;
//!
//! let mut scene = Scene::new(Rgba::BLACK);
//! let mut wave = PendulumWave::new(PendulumConfig::default());
//! let camera = wave.build_scene(&mut scene);
//! wave.update(1.25, &mut scene);
//! ```
//!
//! ## Running
//!
//! [`window::run`] hosts either demo in a window; see the `fieldwave` binary.

pub mod canvas;
pub mod color;
pub mod config;
pub mod demo;
pub mod error;
pub mod field;
pub mod gpu;
pub mod pendulum;
pub mod scene;
pub mod spawn;
pub mod time;
pub mod window;

pub use glam::{Vec2, Vec3};

/// Convenient re-exports.
pub mod prelude {
    pub use crate::canvas::{Canvas, DrawCommand, DrawList};
    pub use crate::color::Rgba;
    pub use crate::config::{DemoConfig, FieldConfig, PendulumConfig, WindowConfig};
    pub use crate::demo::{ParticleFieldDemo, PendulumWaveDemo};
    pub use crate::error::{ConfigError, GpuError, RunError};
    pub use crate::field::{Particle, ParticleField, StepReport, ViewSweep, Viewport};
    pub use crate::pendulum::{Pendulum, PendulumWave};
    pub use crate::scene::{DirectionalLight, OrbitCamera, OrbitControls, Scene};
    pub use crate::spawn::Spawner;
    pub use crate::time::Clock;
    pub use crate::window::{run, Demo, FrameTime};
    pub use glam::{Vec2, Vec3};
}
