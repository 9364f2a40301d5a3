use std::{f32::consts::TAU, fs, path::Path};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Closed interval of `f32` values.
///
/// Used both for uniform random draws ([`Span::sample`]) and for values that
/// scale linearly with the transpiration rate ([`Span::lerp`]).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform draw in `[min, max)`, or `min` when the span is empty.
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    /// Linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t.clamp(0.0, 1.0)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }
        if self.min > self.max {
            return Err(ConfigError::Invalid(format!(
                "{name}: min {} is greater than max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Scene geometry and per-particle attribute ranges.
///
/// Coordinates are in scene units with `y` growing downward, so rising
/// particles move toward negative `y`. Defaults reproduce a 300x400 scene
/// with four stomata on each leaf.
///
/// ### Fields
/// - `origins` - Emission points (stomata); one is chosen uniformly per particle.
/// - `center_x` - Origins left of this line drift left, the others drift right.
/// - `exit_y` - Particles above this line (`pos.y < exit_y`) are removed.
/// - `drift_x` - Magnitude of the horizontal drift offset; the sign comes from the side.
/// - `drift_y` - Magnitude of the vertical drift offset; always applied upward.
/// - `amplitude` - Lateral wobble amplitude.
/// - `size` - Particle radius at rate 0 (`min`) and rate 100 (`max`).
/// - `opacity` - Particle opacity at rate 0 (`min`) and rate 100 (`max`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub origins: Vec<Vec2>,
    pub center_x: f32,
    pub exit_y: f32,
    pub drift_x: Span,
    pub drift_y: Span,
    pub amplitude: Span,
    pub size: Span,
    pub opacity: Span,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origins: vec![
                Vec2::new(85.0, 150.0),
                Vec2::new(75.0, 130.0),
                Vec2::new(90.0, 120.0),
                Vec2::new(80.0, 110.0),
                Vec2::new(215.0, 150.0),
                Vec2::new(225.0, 130.0),
                Vec2::new(210.0, 120.0),
                Vec2::new(220.0, 110.0),
            ],
            center_x: 150.0,
            exit_y: -50.0,
            drift_x: Span::new(20.0, 50.0),
            drift_y: Span::new(60.0, 100.0),
            amplitude: Span::new(3.0, 7.0),
            size: Span::new(1.5, 5.0),
            opacity: Span::new(0.5, 1.0),
        }
    }
}

impl Config {
    /// Full turn used for the random oscillation phase.
    pub const PHASE_RANGE: f32 = TAU;

    /// Parses and validates a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading scene config from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the config describes a usable scene.
    ///
    /// Rejects an empty origin set, non-finite numbers, inverted spans,
    /// negative drift magnitudes and an exit line that is not above every
    /// origin.
    pub fn validate(&self) -> Result<()> {
        if self.origins.is_empty() {
            return Err(ConfigError::Invalid("origins must not be empty".into()));
        }
        if let Some(bad) = self.origins.iter().find(|o| !o.is_finite()) {
            return Err(ConfigError::Invalid(format!("origin {bad} is not finite")));
        }
        if !self.center_x.is_finite() || !self.exit_y.is_finite() {
            return Err(ConfigError::Invalid(
                "center_x and exit_y must be finite".into(),
            ));
        }
        if let Some(low) = self.origins.iter().find(|o| o.y <= self.exit_y) {
            return Err(ConfigError::Invalid(format!(
                "origin {low} is already past exit_y {}",
                self.exit_y
            )));
        }

        self.drift_x.validate("drift_x")?;
        self.drift_y.validate("drift_y")?;
        self.amplitude.validate("amplitude")?;
        self.size.validate("size")?;
        self.opacity.validate("opacity")?;

        if self.drift_x.min < 0.0 || self.drift_y.min < 0.0 {
            return Err(ConfigError::Invalid(
                "drift magnitudes must not be negative".into(),
            ));
        }
        if self.drift_y.max <= 0.0 {
            return Err(ConfigError::Invalid(
                "drift_y must allow a non-zero rise".into(),
            ));
        }
        Ok(())
    }
}
