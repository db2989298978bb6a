//! Demo configuration.
//!
//! Every section has defaults that reproduce the stock demos, so a partial
//! TOML file (or none at all) works:
//!
//! ```toml
//! [field]
//! particle_count = 500
//! elasticity = 0.8
//!
//! [pendulum]
//! count = 24
//! ```

use std::f64::consts::FRAC_PI_2;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::color::Rgba;
use crate::error::ConfigError;

/// Top-level configuration for both demos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub field: FieldConfig,
    pub pendulum: PendulumConfig,
}

/// Initial window size in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Parameters of the particle field. Units are pixels and frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    /// Downward acceleration per frame.
    pub gravity: f32,
    /// Fraction of vertical speed kept after a ground bounce.
    pub elasticity: f32,
    /// Height of the ground plane.
    pub ground: f32,
    /// Particles closer than this depth are respawned.
    pub near_clip: f32,
    pub spawn_depth_min: f32,
    pub spawn_depth_max: f32,
    /// Horizontal spread at the far edge of the spawn range, relative to the near edge.
    pub far_spread: f32,
    /// Particles spawn between `ground` and `ground + spawn_height`.
    pub spawn_height: f32,
    pub spawn_speed_x: f32,
    pub launch_speed_min: f32,
    pub launch_speed_max: f32,
    pub approach_speed_min: f32,
    pub approach_speed_max: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub saturation: f32,
    pub lightness: f32,
    /// Largest camera yaw in radians.
    pub max_view_angle: f32,
    /// Angular rate of the camera sweep in radians per second.
    pub sweep_rate: f32,
    /// Focal length as a fraction of the larger viewport side.
    pub focal_factor: f32,
    /// Vanishing point height as a fraction of the viewport height.
    pub horizon: f32,
    /// Circles further than this many pixels outside the viewport are skipped.
    pub cull_margin: f32,
    /// Alpha of the per-frame background overpaint.
    pub trail_fade: f32,
    pub background: Rgba,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 300,
            gravity: 0.25,
            elasticity: 1.0,
            ground: 0.0,
            near_clip: 10.0,
            spawn_depth_min: 400.0,
            spawn_depth_max: 1600.0,
            far_spread: 0.5,
            spawn_height: 20.0,
            spawn_speed_x: 1.0,
            launch_speed_min: 6.0,
            launch_speed_max: 12.0,
            approach_speed_min: 2.0,
            approach_speed_max: 6.0,
            radius_min: 3.0,
            radius_max: 8.0,
            saturation: 0.8,
            lightness: 0.6,
            max_view_angle: 0.35,
            sweep_rate: 0.3,
            focal_factor: 0.8,
            horizon: 0.8,
            cull_margin: 50.0,
            trail_fade: 0.2,
            background: Rgba::BLACK,
        }
    }
}

/// Parameters of the pendulum wave. Lengths are scene units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumConfig {
    pub count: usize,
    /// Oscillations the longest pendulum completes per cycle.
    pub base_oscillations: u32,
    /// Seconds until the whole pattern realigns.
    pub cycle_seconds: f64,
    /// Swing amplitude in radians.
    pub max_angle: f64,
    /// Visual string length of the longest pendulum.
    pub max_length: f32,
    pub bob_radius: f32,
    pub spacing: f32,
    pub pivot_height: f32,
    pub background: Rgba,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            count: 20,
            base_oscillations: 50,
            cycle_seconds: 60.0,
            max_angle: 0.4,
            max_length: 10.0,
            bob_radius: 0.35,
            spacing: 1.0,
            pivot_height: 12.0,
            background: Rgba::rgb(0.02, 0.02, 0.05),
        }
    }
}

fn ensure(condition: bool, message: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid(message.to_string()))
    }
}

/// Reject NaN and infinities, which TOML accepts as float literals.
fn ensure_finite(section: &str, values: &[(&str, f64)]) -> Result<(), ConfigError> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, _)) => Err(ConfigError::Invalid(format!(
            "{section}.{name} must be finite"
        ))),
        None => Ok(()),
    }
}

fn color_components(name: &'static str, color: &Rgba) -> [(&'static str, f64); 4] {
    let [r, g, b, a] = color.to_array();
    [(name, r as f64), (name, g as f64), (name, b as f64), (name, a as f64)]
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.particle_count > 0, "field.particle_count must be positive")?;
        ensure_finite(
            "field",
            &[
                ("gravity", self.gravity as f64),
                ("elasticity", self.elasticity as f64),
                ("ground", self.ground as f64),
                ("near_clip", self.near_clip as f64),
                ("spawn_depth_min", self.spawn_depth_min as f64),
                ("spawn_depth_max", self.spawn_depth_max as f64),
                ("far_spread", self.far_spread as f64),
                ("spawn_height", self.spawn_height as f64),
                ("spawn_speed_x", self.spawn_speed_x as f64),
                ("launch_speed_min", self.launch_speed_min as f64),
                ("launch_speed_max", self.launch_speed_max as f64),
                ("approach_speed_min", self.approach_speed_min as f64),
                ("approach_speed_max", self.approach_speed_max as f64),
                ("radius_min", self.radius_min as f64),
                ("radius_max", self.radius_max as f64),
                ("saturation", self.saturation as f64),
                ("lightness", self.lightness as f64),
                ("max_view_angle", self.max_view_angle as f64),
                ("sweep_rate", self.sweep_rate as f64),
                ("focal_factor", self.focal_factor as f64),
                ("horizon", self.horizon as f64),
                ("cull_margin", self.cull_margin as f64),
                ("trail_fade", self.trail_fade as f64),
            ],
        )?;
        ensure_finite("field", &color_components("background", &self.background))?;
        ensure(self.gravity >= 0.0, "field.gravity must not be negative")?;
        ensure(
            (0.0..=1.0).contains(&self.elasticity),
            "field.elasticity must be within 0..=1",
        )?;
        ensure(self.near_clip > 0.0, "field.near_clip must be positive")?;
        ensure(
            self.spawn_depth_min > self.near_clip && self.spawn_depth_max > self.spawn_depth_min,
            "field spawn depth range must lie beyond near_clip and be non-empty",
        )?;
        ensure(
            self.far_spread > 0.0 && self.far_spread <= 1.0,
            "field.far_spread must be within (0, 1]",
        )?;
        ensure(self.spawn_height >= 0.0, "field.spawn_height must not be negative")?;
        ensure(
            self.launch_speed_max > self.launch_speed_min && self.launch_speed_min >= 0.0,
            "field launch speed range must be non-empty and non-negative",
        )?;
        ensure(
            self.approach_speed_max > self.approach_speed_min && self.approach_speed_min >= 0.0,
            "field approach speed range must be non-empty and non-negative",
        )?;
        ensure(
            self.radius_max > self.radius_min && self.radius_min > 0.0,
            "field radius range must be non-empty and positive",
        )?;
        ensure(self.spawn_speed_x >= 0.0, "field.spawn_speed_x must not be negative")?;
        ensure(self.focal_factor > 0.0, "field.focal_factor must be positive")?;
        ensure(
            (0.0..=1.0).contains(&self.trail_fade),
            "field.trail_fade must be within 0..=1",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.horizon),
            "field.horizon must be within 0..=1",
        )?;
        ensure(self.cull_margin >= 0.0, "field.cull_margin must not be negative")?;
        Ok(())
    }
}

impl PendulumConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.count > 0, "pendulum.count must be positive")?;
        ensure(
            self.base_oscillations > 0,
            "pendulum.base_oscillations must be positive",
        )?;
        ensure_finite(
            "pendulum",
            &[
                ("cycle_seconds", self.cycle_seconds),
                ("max_angle", self.max_angle),
                ("max_length", self.max_length as f64),
                ("bob_radius", self.bob_radius as f64),
                ("spacing", self.spacing as f64),
                ("pivot_height", self.pivot_height as f64),
            ],
        )?;
        ensure_finite("pendulum", &color_components("background", &self.background))?;
        ensure(self.cycle_seconds > 0.0, "pendulum.cycle_seconds must be positive")?;
        // Keeps every bob below its pivot.
        ensure(
            self.max_angle > 0.0 && self.max_angle < FRAC_PI_2,
            "pendulum.max_angle must be within (0, pi/2)",
        )?;
        ensure(self.max_length > 0.0, "pendulum.max_length must be positive")?;
        ensure(self.bob_radius > 0.0, "pendulum.bob_radius must be positive")?;
        ensure(self.spacing > 0.0, "pendulum.spacing must be positive")?;
        Ok(())
    }
}

impl DemoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.window.width > 0 && self.window.height > 0,
            "window size must be positive",
        )?;
        self.field.validate()?;
        self.pendulum.validate()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        DemoConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config = DemoConfig::from_toml_str("").unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = DemoConfig::from_toml_str(
            r#"
            [field]
            particle_count = 42
            elasticity = 0.5

            [pendulum]
            count = 8
            background = { r = 0.1, g = 0.2, b = 0.3 }
            "#,
        )
        .unwrap();
        assert_eq!(config.field.particle_count, 42);
        assert_eq!(config.field.elasticity, 0.5);
        assert_eq!(config.field.gravity, FieldConfig::default().gravity);
        assert_eq!(config.pendulum.count, 8);
        assert_eq!(config.pendulum.background, Rgba::rgb(0.1, 0.2, 0.3));
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn rejects_elasticity_above_one() {
        let err = DemoConfig::from_toml_str("[field]\nelasticity = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_spawn_range_inside_near_clip() {
        let mut config = FieldConfig::default();
        config.spawn_depth_min = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_pendulums() {
        let err = DemoConfig::from_toml_str("[pendulum]\ncount = 0\n").unwrap_err();
        assert!(err.to_string().contains("pendulum.count"));
    }

    #[test]
    fn rejects_non_finite_values() {
        for doc in [
            "[pendulum]\nmax_angle = nan\n",
            "[pendulum]\ncycle_seconds = inf\n",
            "[pendulum]\npivot_height = -inf\n",
            "[field]\nhorizon = nan\n",
            "[field]\ngravity = inf\n",
            "[field]\nsweep_rate = nan\n",
            "[field]\nmax_view_angle = inf\n",
            "[field]\nground = nan\n",
            "[field]\nbackground = { r = nan, g = 0.0, b = 0.0 }\n",
        ] {
            let err = DemoConfig::from_toml_str(doc).unwrap_err();
            assert!(
                err.to_string().contains("must be finite"),
                "{doc:?} gave {err}"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_angles_and_margins() {
        assert!(DemoConfig::from_toml_str("[pendulum]\nmax_angle = 2.0\n").is_err());
        assert!(DemoConfig::from_toml_str("[pendulum]\nmax_angle = 0.0\n").is_err());
        assert!(DemoConfig::from_toml_str("[field]\nhorizon = 1.5\n").is_err());
        assert!(DemoConfig::from_toml_str("[field]\ncull_margin = -1.0\n").is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = DemoConfig::from_toml_str("[field\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DemoConfig::load(Path::new("/nonexistent/fieldwave.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fieldwave.toml"));
    }
}
