//! Immediate-mode 2D drawing surface.
//!
//! The particle field paints through the [`Canvas`] trait. [`DrawList`]
//! records the calls in order; the GPU canvas renderer replays them onto a
//! persistent target, so nothing is cleared between frames unless a caller
//! paints over it.

use crate::color::Rgba;

/// A 2D surface with pixel coordinates, origin top-left, y down.
pub trait Canvas {
    /// Set the color used by subsequent fills. Alpha is honored.
    fn set_fill_color(&mut self, color: Rgba);

    /// Fill an axis-aligned rectangle with the current fill color.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Fill a circle with the current fill color.
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32);
}

/// One recorded canvas call with its resolved color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgba,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Rgba,
    },
}

/// Ordered list of draw commands for one frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    fill: Rgba,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            fill: Rgba::default(),
        }
    }

    /// Drop all commands but keep the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of circles recorded.
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }
}

impl Canvas for DrawList {
    fn set_fill_color(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            color: self.fill,
        });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32) {
        self.commands.push(DrawCommand::Circle {
            cx,
            cy,
            radius,
            color: self.fill,
        });
    }
}
