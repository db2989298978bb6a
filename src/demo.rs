//! The two runnable demos, wired to the window host.

use tracing::info;
use winit::event::WindowEvent;

use crate::canvas::DrawList;
use crate::config::{FieldConfig, PendulumConfig};
use crate::field::ParticleField;
use crate::gpu::{CanvasRenderer, GpuContext, SceneRenderer};
use crate::pendulum::PendulumWave;
use crate::scene::{OrbitCamera, OrbitControls, Scene};
use crate::spawn::Spawner;
use crate::window::{Demo, FrameTime};

/// Bouncing particles under a swaying perspective camera, painted with
/// fading trails.
pub struct ParticleFieldDemo {
    field: ParticleField,
    draw_list: DrawList,
    renderer: Option<CanvasRenderer>,
}

impl ParticleFieldDemo {
    pub fn new(config: FieldConfig, width: u32, height: u32, spawner: Spawner) -> Self {
        let draw_list = DrawList::with_capacity(config.particle_count + 1);
        info!(particles = config.particle_count, "particle field ready");
        Self {
            field: ParticleField::new(config, width as f32, height as f32, spawner),
            draw_list,
            renderer: None,
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Adopt the surface size before the first frame. The window's logical
    /// size may differ from its physical one, so the initial wave is
    /// respawned for the real viewport.
    fn prepare_viewport(&mut self, width: u32, height: u32) {
        self.field.resize(width as f32, height as f32);
        self.field.respawn_all();
    }
}

impl Demo for ParticleFieldDemo {
    fn title(&self) -> &str {
        "fieldwave - particle field"
    }

    fn attach(&mut self, gpu: &GpuContext) {
        let (width, height) = gpu.size();
        self.prepare_viewport(width, height);
        self.renderer = Some(CanvasRenderer::new(gpu, self.field.config().background));
    }

    fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        self.field.resize(width as f32, height as f32);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(gpu);
        }
    }

    fn restart(&mut self) {
        self.field.respawn_all();
        if let Some(renderer) = &mut self.renderer {
            renderer.clear();
        }
    }

    fn render(&mut self, gpu: &GpuContext, frame: FrameTime) -> Result<(), wgpu::SurfaceError> {
        self.draw_list.clear();
        // A paused canvas is re-presented as is.
        if !frame.paused {
            self.field.frame(frame.elapsed, &mut self.draw_list);
        }
        match &mut self.renderer {
            Some(renderer) => renderer.render(gpu, &self.draw_list),
            None => Ok(()),
        }
    }
}

/// A row of pendulums swinging in and out of phase, viewed through an
/// orbit camera.
pub struct PendulumWaveDemo {
    wave: PendulumWave,
    scene: Scene,
    camera: OrbitCamera,
    controls: OrbitControls,
    renderer: Option<SceneRenderer>,
}

impl PendulumWaveDemo {
    pub fn new(config: PendulumConfig) -> Self {
        let mut scene = Scene::new(config.background);
        let mut wave = PendulumWave::new(config);
        let camera = wave.build_scene(&mut scene);
        info!(
            pendulums = wave.len(),
            cycle_seconds = wave.config().cycle_seconds,
            "pendulum wave ready"
        );
        Self {
            wave,
            scene,
            camera,
            controls: OrbitControls::new(),
            renderer: None,
        }
    }

    pub fn wave(&self) -> &PendulumWave {
        &self.wave
    }
}

impl Demo for PendulumWaveDemo {
    fn title(&self) -> &str {
        "fieldwave - pendulum wave"
    }

    fn attach(&mut self, gpu: &GpuContext) {
        let (width, height) = gpu.size();
        self.camera.set_viewport(width, height);
        self.renderer = Some(SceneRenderer::new(gpu));
    }

    fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(gpu);
        }
    }

    fn window_event(&mut self, event: &WindowEvent) -> bool {
        self.controls.handle_event(&mut self.camera, event)
    }

    fn restart(&mut self) {
        self.wave.update(0.0, &mut self.scene);
    }

    fn render(&mut self, gpu: &GpuContext, frame: FrameTime) -> Result<(), wgpu::SurfaceError> {
        self.wave.update(frame.elapsed, &mut self.scene);
        match &mut self.renderer {
            Some(renderer) => renderer.render(gpu, &mut self.scene, &self.camera),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_demo_populates_field() {
        let config = FieldConfig {
            particle_count: 25,
            ..FieldConfig::default()
        };
        let demo = ParticleFieldDemo::new(config, 640, 480, Spawner::from_seed(1));
        assert_eq!(demo.field().len(), 25);
        assert_eq!(demo.field().viewport().width, 640.0);
    }

    #[test]
    fn initial_wave_respawns_for_physical_viewport() {
        let config = FieldConfig {
            particle_count: 400,
            far_spread: 1.0,
            ..FieldConfig::default()
        };
        let mut demo = ParticleFieldDemo::new(config, 640, 360, Spawner::from_seed(3));
        demo.prepare_viewport(2560, 1440);

        assert_eq!(demo.field().viewport().width, 2560.0);
        let widest = demo
            .field()
            .particles()
            .iter()
            .map(|p| p.position.x.abs())
            .fold(0.0_f32, f32::max);
        // Spawned against the 640 px width the spread would stop at 320.
        assert!(widest > 320.0, "widest spawn {widest}");
        assert!(widest <= 1280.0);
    }

    #[test]
    fn pendulum_demo_builds_scene() {
        let demo = PendulumWaveDemo::new(PendulumConfig::default());
        assert_eq!(demo.scene.spheres().len(), demo.wave().len());
        assert_eq!(demo.scene.background, PendulumConfig::default().background);
    }

    #[test]
    fn pendulum_restart_returns_to_rest_pose() {
        let mut demo = PendulumWaveDemo::new(PendulumConfig::default());
        demo.wave.update(7.3, &mut demo.scene);
        demo.restart();
        let first = &demo.wave().pendulums()[0];
        assert_eq!(demo.scene.spheres()[0].center, first.bob_position(0.0));
    }
}
