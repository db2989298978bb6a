//! Manual perspective projection for the particle field.
//!
//! Simulation space is y-up with z pointing away from the viewer. The
//! camera yaws around the vertical axis, then points are divided by
//! `focal / (focal + depth)` and mapped to screen pixels (y down).

use glam::{Vec2, Vec3};

use crate::config::FieldConfig;

/// Viewport size and the constants derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Screen x of the optical axis.
    pub center_x: f32,
    /// Screen y where the ground plane's horizon converges.
    pub vanishing_y: f32,
    pub focal_length: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, config: &FieldConfig) -> Self {
        Self {
            width,
            height,
            center_x: width * 0.5,
            vanishing_y: height * config.horizon,
            focal_length: width.max(height) * config.focal_factor,
        }
    }

    /// Whether a circle touches the viewport grown by `margin` on every side.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32, margin: f32) -> bool {
        center.x + radius >= -margin
            && center.x - radius <= self.width + margin
            && center.y + radius >= -margin
            && center.y - radius <= self.height + margin
    }
}

/// Result of projecting one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Depth after the view rotation.
    pub rotated_depth: f32,
    /// Perspective scale, `0.0` when the point is behind the view plane.
    pub scale: f32,
    pub screen: Vec2,
    pub visible: bool,
}

/// Rotate `(x, z)` around the vertical axis by `angle`.
#[inline]
pub fn rotate_y(position: Vec3, angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    let x = position.x * cos - position.z * sin;
    let z = position.x * sin + position.z * cos;
    (x, z)
}

/// Project a simulation-space point for the given view angle.
pub fn project(position: Vec3, angle: f32, viewport: &Viewport) -> Projection {
    let (rotated_x, rotated_depth) = rotate_y(position, angle);

    // Behind the view plane: the perspective divide would flip or blow up.
    if rotated_depth <= 0.0 {
        return Projection {
            rotated_depth,
            scale: 0.0,
            screen: Vec2::ZERO,
            visible: false,
        };
    }

    let scale = viewport.focal_length / (viewport.focal_length + rotated_depth);
    let screen = Vec2::new(
        viewport.center_x + rotated_x * scale,
        viewport.vanishing_y - position.y * scale,
    );

    Projection {
        rotated_depth,
        scale,
        screen,
        visible: true,
    }
}

/// Automatic side-to-side camera sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSweep {
    pub max_angle: f32,
    /// Radians per second.
    pub rate: f32,
}

impl ViewSweep {
    pub fn from_config(config: &FieldConfig) -> Self {
        Self {
            max_angle: config.max_view_angle,
            rate: config.sweep_rate,
        }
    }

    /// View angle at `elapsed` seconds, oscillating within `±max_angle`.
    pub fn angle(&self, elapsed: f64) -> f32 {
        (self.max_angle as f64 * (elapsed * self.rate as f64).sin()) as f32
    }
}
