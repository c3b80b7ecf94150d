use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{GradientOrientation, Result, WaveViewError};

/// Top-level configuration structure for a wave view.
///
/// Every section falls back to its defaults when omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub animation: AnimationConfig,
    pub render: RenderConfig,
    pub palette: PaletteConfig,
}

impl ViewConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading view config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.animation.validate()?;
        self.render.validate()?;
        self.palette.validate()
    }
}

/// Configuration for the animation driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Upper bound for a single tick's elapsed time, in seconds.
    pub max_frame_seconds: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            max_frame_seconds: 0.1,
        }
    }
}

impl AnimationConfig {
    fn validate(&self) -> Result<()> {
        if !self.max_frame_seconds.is_finite() || self.max_frame_seconds <= 0.0 {
            return Err(WaveViewError::validation(
                "animation.max_frame_seconds must be > 0",
            ));
        }
        Ok(())
    }
}

/// Configuration for curve sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples taken along every wavelength.
    pub samples_per_wavelength: u32,
    /// Cubic control-point tension. `0.0` draws straight segments.
    pub smoothing: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_wavelength: 16,
            smoothing: 0.16,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<()> {
        if self.samples_per_wavelength < 2 {
            return Err(WaveViewError::validation(
                "render.samples_per_wavelength must be at least 2",
            ));
        }
        if !(0.0..=0.5).contains(&self.smoothing) {
            return Err(WaveViewError::validation(
                "render.smoothing must be within [0, 0.5]",
            ));
        }
        Ok(())
    }
}

/// Inclusive range that default values are spread across.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Linear interpolation with `t` in `[0, 1]`.
    pub fn lerp(self, t: f64) -> f64 {
        self.min + (self.max - self.min) * t.clamp(0.0, 1.0)
    }

    fn validate(self, name: &str, strictly_positive: bool) -> Result<()> {
        let lower_ok = if strictly_positive {
            self.min > 0.0
        } else {
            self.min >= 0.0
        };
        if !self.min.is_finite() || !self.max.is_finite() || !lower_ok || self.max < self.min {
            return Err(WaveViewError::validation(format!(
                "palette.{name} must be a finite range with {} min <= max",
                if strictly_positive { "0 <" } else { "0 <=" }
            )));
        }
        Ok(())
    }
}

/// Progression used when generating default waves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub wavelength: ValueRange,
    pub amplitude: ValueRange,
    /// Distance of the resting line above the surface's bottom edge.
    pub bottom_offset: ValueRange,
    pub period_seconds: ValueRange,
    pub opacity: f64,
    pub saturation: f64,
    pub value: f64,
    pub gradient: GradientOrientation,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            wavelength: ValueRange::new(800.0, 900.0),
            amplitude: ValueRange::new(50.0, 60.0),
            bottom_offset: ValueRange::new(200.0, 220.0),
            period_seconds: ValueRange::new(2.0, 3.0),
            opacity: 0.3,
            saturation: 0.8,
            value: 0.95,
            gradient: GradientOrientation::Horizontal,
        }
    }
}

impl PaletteConfig {
    fn validate(&self) -> Result<()> {
        self.wavelength.validate("wavelength", true)?;
        self.amplitude.validate("amplitude", false)?;
        self.bottom_offset.validate("bottom_offset", false)?;
        self.period_seconds.validate("period_seconds", true)?;
        for (name, value) in [
            ("opacity", self.opacity),
            ("saturation", self.saturation),
            ("value", self.value),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WaveViewError::validation(format!(
                    "palette.{name} must be within [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ViewConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            ViewConfig::from_json_str(r#"{ "render": { "samples_per_wavelength": 32 } }"#).unwrap();
        assert_eq!(config.render.samples_per_wavelength, 32);
        assert_eq!(config.render.smoothing, 0.16);
        assert_eq!(config.animation, AnimationConfig::default());
        assert_eq!(config.palette, PaletteConfig::default());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = ViewConfig::from_json_str(r#"{ "animation": { "max_frame_seconds": 0 } }"#)
            .unwrap_err();
        assert!(err.is_validation());

        let err = ViewConfig::from_json_str(
            r#"{ "palette": { "wavelength": { "min": 10, "max": 5 } } }"#,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = ViewConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, WaveViewError::Json(_)));
    }

    #[test]
    fn range_interpolates_and_clamps() {
        let range = ValueRange::new(2.0, 4.0);
        assert_eq!(range.lerp(0.5), 3.0);
        assert_eq!(range.lerp(2.0), 4.0);
    }
}
