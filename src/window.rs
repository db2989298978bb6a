//! Window and event-loop host shared by both demos.
//!
//! [`run`] opens one window, creates the GPU context on `resumed`, and drives
//! a [`Demo`] from `RedrawRequested`, requesting the next redraw after every
//! frame. Presentation is vsynced, so this runs once per display refresh.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::WindowConfig;
use crate::error::RunError;
use crate::gpu::GpuContext;
use crate::time::Clock;

const FPS_LOG_INTERVAL: u64 = 300;

/// Timing handed to [`Demo::render`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since start, excluding paused time.
    pub elapsed: f64,
    pub paused: bool,
}

/// Something the host can drive one frame at a time.
pub trait Demo {
    fn title(&self) -> &str;

    /// Called once the GPU context exists. Create renderers here.
    fn attach(&mut self, gpu: &GpuContext);

    /// The surface was resized to `width` x `height` physical pixels.
    fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32);

    /// Offer a window event to the demo. Return `true` if consumed.
    fn window_event(&mut self, _event: &WindowEvent) -> bool {
        false
    }

    /// Start over from the initial state.
    fn restart(&mut self);

    fn render(&mut self, gpu: &GpuContext, frame: FrameTime) -> Result<(), wgpu::SurfaceError>;
}

struct App<D: Demo> {
    demo: D,
    window_config: WindowConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    clock: Clock,
    error: Option<RunError>,
}

impl<D: Demo> App<D> {
    fn new(demo: D, window_config: WindowConfig) -> Self {
        Self {
            demo,
            window_config,
            window: None,
            gpu: None,
            clock: Clock::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RunError) {
        error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let attrs = Window::default_attributes()
            .with_title(self.demo.title())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));

        let window = Arc::new(event_loop.create_window(attrs)?);
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;

        let (width, height) = gpu.size();
        info!(width, height, format = ?gpu.format(), "surface configured");

        self.demo.attach(&gpu);
        self.clock.restart();
        window.request_redraw();

        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            PhysicalKey::Code(KeyCode::Space) => {
                self.clock.toggle_pause();
                info!(paused = self.clock.is_paused(), "toggled pause");
            }
            PhysicalKey::Code(KeyCode::KeyR) => {
                self.clock.restart();
                self.demo.restart();
                info!("restarted");
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let elapsed = self.clock.tick();
        let frame = FrameTime {
            elapsed,
            paused: self.clock.is_paused(),
        };

        match self.demo.render(gpu, frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => warn!("render error: {e:?}"),
        }

        let frames = self.clock.frame();
        if logs_frame_stats(frames, frame.paused) {
            debug!(fps = self.clock.fps(), frames, elapsed, "frame stats");
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl<D: Demo> ApplicationHandler for App<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    if gpu.resize(size.width, size.height) {
                        debug!(width = size.width, height = size.height, "resized");
                        self.demo.resize(gpu, size.width, size.height);
                    }
                }
            }
            WindowEvent::KeyboardInput { ref event, .. } => {
                self.handle_key(event_loop, event);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            other => {
                self.demo.window_event(&other);
            }
        }
    }
}

/// Frame stats are logged every `FPS_LOG_INTERVAL` running frames. The
/// frame counter stands still while paused, so paused redraws never log.
fn logs_frame_stats(frames: u64, paused: bool) -> bool {
    !paused && frames > 0 && frames % FPS_LOG_INTERVAL == 0
}

/// Open a window and run `demo` until the window closes.
pub fn run<D: Demo>(demo: D, window: &WindowConfig) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(demo, window.clone());
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_stats_follow_interval() {
        assert!(!logs_frame_stats(0, false));
        assert!(!logs_frame_stats(FPS_LOG_INTERVAL - 1, false));
        assert!(logs_frame_stats(FPS_LOG_INTERVAL, false));
        assert!(logs_frame_stats(FPS_LOG_INTERVAL * 4, false));
    }

    #[test]
    fn paused_redraws_do_not_log_stats() {
        assert!(!logs_frame_stats(FPS_LOG_INTERVAL, true));
        assert!(!logs_frame_stats(FPS_LOG_INTERVAL * 2, true));
    }
}
