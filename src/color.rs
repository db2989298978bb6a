//! Colors shared by the canvas and the scene graph.

use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Convert from HSL. `hue` is in degrees and wraps; saturation and
    /// lightness are clamped to `0.0..=1.0`.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Self::rgb(r + m, g + m, b + m)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgba, b: Rgba) -> bool {
        (a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5
    }

    #[test]
    fn primary_hues() {
        assert!(close(Rgba::from_hsl(0.0, 1.0, 0.5), Rgba::rgb(1.0, 0.0, 0.0)));
        assert!(close(Rgba::from_hsl(120.0, 1.0, 0.5), Rgba::rgb(0.0, 1.0, 0.0)));
        assert!(close(Rgba::from_hsl(240.0, 1.0, 0.5), Rgba::rgb(0.0, 0.0, 1.0)));
    }

    #[test]
    fn hue_wraps() {
        assert!(close(Rgba::from_hsl(360.0, 1.0, 0.5), Rgba::from_hsl(0.0, 1.0, 0.5)));
        assert!(close(Rgba::from_hsl(-120.0, 1.0, 0.5), Rgba::from_hsl(240.0, 1.0, 0.5)));
    }

    #[test]
    fn zero_saturation_is_gray() {
        let c = Rgba::from_hsl(200.0, 0.0, 0.25);
        assert!(close(c, Rgba::rgb(0.25, 0.25, 0.25)));
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = Rgba::rgb(0.1, 0.2, 0.3).with_alpha(0.5);
        assert_eq!(c.to_array(), [0.1, 0.2, 0.3, 0.5]);
    }
}
