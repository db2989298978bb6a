//! Minimal 3D scene graph for the pendulum wave.
//!
//! Holds lit spheres and colored line segments plus an orbit camera. The
//! renderer reads it every frame; line vertex data is only re-uploaded
//! when a line has been flagged with `needs_update`.

use glam::{Mat4, Vec3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::color::Rgba;

/// Handle to a sphere node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SphereId(usize);

/// Handle to a line node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub color: Rgba,
}

/// A line segment whose endpoints live in a GPU vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    start: Vec3,
    end: Vec3,
    pub color: Rgba,
    needs_update: bool,
}

impl Line {
    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }
}

/// Single directional light with an ambient floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels, normalized.
    pub direction: Vec3,
    pub ambient: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, ambient: f32) -> Self {
        Self {
            direction: direction.normalize_or(Vec3::NEG_Y),
            ambient: ambient.clamp(0.0, 1.0),
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::new(-0.4, -1.0, -0.6), 0.25)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub background: Rgba,
    pub light: DirectionalLight,
    spheres: Vec<Sphere>,
    lines: Vec<Line>,
}

impl Scene {
    pub fn new(background: Rgba) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, color: Rgba) -> SphereId {
        self.spheres.push(Sphere {
            center,
            radius,
            color,
        });
        SphereId(self.spheres.len() - 1)
    }

    pub fn sphere(&self, id: SphereId) -> &Sphere {
        &self.spheres[id.0]
    }

    pub fn set_sphere_position(&mut self, id: SphereId, center: Vec3) {
        self.spheres[id.0].center = center;
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Add a segment. New lines start flagged for upload.
    pub fn add_line(&mut self, start: Vec3, end: Vec3, color: Rgba) -> LineId {
        self.lines.push(Line {
            start,
            end,
            color,
            needs_update: true,
        });
        LineId(self.lines.len() - 1)
    }

    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0]
    }

    /// Move the far endpoint of a line and flag it for upload.
    pub fn set_line_end(&mut self, id: LineId, end: Vec3) {
        let line = &mut self.lines[id.0];
        line.end = end;
        line.needs_update = true;
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Whether any line changed since the last upload.
    pub fn lines_need_update(&self) -> bool {
        self.lines.iter().any(|l| l.needs_update)
    }

    /// Clear every `needs_update` flag after the renderer has uploaded.
    pub fn mark_lines_uploaded(&mut self) {
        for line in &mut self.lines {
            line.needs_update = false;
        }
    }
}

/// Perspective camera orbiting a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    pub const MIN_DISTANCE: f32 = 2.0;
    pub const MAX_DISTANCE: f32 = 200.0;
    pub const MAX_PITCH: f32 = 1.5;

    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.25,
            distance: distance.clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE),
            target,
            fov_y: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Camera right and up vectors in world space.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.position()).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        (right, up)
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Rotate around the target by a mouse drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    /// Slide the target in the view plane by a mouse drag in pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let (right, up) = self.basis();
        let speed = self.distance * 0.0015;
        self.target += (-right * dx + up * dy) * speed;
    }

    /// Move toward (positive) or away from the target.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * (1.0 - scroll * 0.1))
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    Orbit,
    Pan,
}

/// Mouse-driven orbit/pan/zoom for an [`OrbitCamera`].
///
/// Left drag orbits, right drag pans, the wheel zooms.
#[derive(Debug, Default)]
pub struct OrbitControls {
    drag: Option<Drag>,
    last_mouse_pos: Option<(f64, f64)>,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a window event to the camera. Returns `true` if it was consumed.
    pub fn handle_event(&mut self, camera: &mut OrbitCamera, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let mode = match button {
                    MouseButton::Left => Drag::Orbit,
                    MouseButton::Right | MouseButton::Middle => Drag::Pan,
                    _ => return false,
                };
                if *state == ElementState::Pressed {
                    self.drag = Some(mode);
                } else if self.drag == Some(mode) {
                    self.drag = None;
                    self.last_mouse_pos = None;
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(mode) = self.drag else {
                    return false;
                };
                if let Some((last_x, last_y)) = self.last_mouse_pos {
                    let dx = (position.x - last_x) as f32;
                    let dy = (position.y - last_y) as f32;
                    match mode {
                        Drag::Orbit => camera.orbit(dx, dy),
                        Drag::Pan => camera.pan(dx, dy),
                    }
                }
                self.last_mouse_pos = Some((position.x, position.y));
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                camera.zoom(scroll);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lines_need_upload_until_marked() {
        let mut scene = Scene::new(Rgba::BLACK);
        let id = scene.add_line(Vec3::ZERO, Vec3::Y, Rgba::WHITE);
        assert!(scene.lines_need_update());
        scene.mark_lines_uploaded();
        assert!(!scene.line(id).needs_update());

        scene.set_line_end(id, Vec3::X);
        assert!(scene.lines_need_update());
        assert_eq!(scene.line(id).start(), Vec3::ZERO);
        assert_eq!(scene.line(id).end(), Vec3::X);
    }

    #[test]
    fn sphere_handles_address_their_node() {
        let mut scene = Scene::default();
        let a = scene.add_sphere(Vec3::ZERO, 1.0, Rgba::WHITE);
        let b = scene.add_sphere(Vec3::ONE, 2.0, Rgba::BLACK);
        scene.set_sphere_position(b, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(scene.sphere(a).center, Vec3::ZERO);
        assert_eq!(scene.sphere(b).center, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(scene.spheres().len(), 2);
    }

    #[test]
    fn camera_sits_at_distance_from_target() {
        let camera = OrbitCamera::new(Vec3::new(1.0, 2.0, 3.0), 10.0);
        let d = camera.position().distance(camera.target);
        assert!((d - 10.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 10.0);
        camera.orbit(0.0, 10_000.0);
        assert_eq!(camera.pitch, OrbitCamera::MAX_PITCH);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 10.0);
        for _ in 0..200 {
            camera.zoom(5.0);
        }
        assert_eq!(camera.distance, OrbitCamera::MIN_DISTANCE);
    }

    #[test]
    fn basis_is_orthonormal() {
        let camera = OrbitCamera::new(Vec3::ZERO, 10.0);
        let (right, up) = camera.basis();
        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!(right.dot(up).abs() < 1e-5);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = OrbitCamera::new(Vec3::new(0.0, 5.0, 0.0), 20.0);
        let clip = camera.view_proj() * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    }

    #[test]
    fn aspect_follows_viewport() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 10.0);
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }
}
