use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::{Result, WaveViewError};

/// Wraps an angle into `[0, 2π)`.
pub fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    pub const BLUE: Color = Color::rgba(0, 0, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds an opaque colour from hue (turns, wrapped into `[0, 1)`),
    /// saturation and value in `[0, 1]`.
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let turns = hue.rem_euclid(1.0);
        // Same rounding hazard as wrap_phase: tiny negatives land on 1.0.
        let h = if turns >= 1.0 { 0.0 } else { turns * 6.0 };
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::rgba(to_channel(r), to_channel(g), to_channel(b), 255)
    }

    /// Multiplies the alpha channel by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = f64::from(self.a) * opacity.clamp(0.0, 1.0);
        Self { a: a.round() as u8, ..self }
    }

    /// Alpha as a `[0, 1]` fraction.
    pub fn alpha(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// `#rrggbb` notation, alpha excluded.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradientOrientation {
    /// Left to right across the full surface width.
    Horizontal,
    /// Top to bottom across the wave's own band.
    Vertical,
}

/// Paint used for the region under a wave's curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Fill {
    Solid(Color),
    LinearGradient {
        start: Color,
        end: Color,
        orientation: GradientOrientation,
    },
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Solid(Color::WHITE)
    }
}

/// Outline drawn along a wave's curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

/// Vertical resting position of a wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Baseline {
    /// Absolute y-coordinate measured down from the top edge.
    FromTop(f64),
    /// Distance above the surface's bottom edge.
    FromBottom(f64),
}

impl Baseline {
    /// Resting y-coordinate on a surface of the given height.
    pub fn resolve(self, height: f64) -> f64 {
        match self {
            Baseline::FromTop(y) => y,
            Baseline::FromBottom(offset) => height - offset,
        }
    }

    fn scaled(self, scale: f64) -> Self {
        match self {
            Baseline::FromTop(y) => Baseline::FromTop(y * scale),
            Baseline::FromBottom(offset) => Baseline::FromBottom(offset * scale),
        }
    }

    fn distance(self) -> f64 {
        match self {
            Baseline::FromTop(y) | Baseline::FromBottom(y) => y,
        }
    }
}

/// Horizontal travel direction of a wave's crests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Angular velocity for a wave that covers one wavelength per `period`
    /// seconds. Increasing phase moves crests toward -x, so rightward travel
    /// is a negative velocity.
    pub fn angular_velocity(self, period: f64) -> f64 {
        let speed = TAU / period;
        match self {
            Direction::Left => speed,
            Direction::Right => -speed,
        }
    }
}

/// Runtime multipliers applied on top of a wave's base parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveScale {
    pub length: f64,
    pub height: f64,
    pub period: f64,
    pub offset: f64,
}

impl Default for WaveScale {
    fn default() -> Self {
        Self {
            length: 1.0,
            height: 1.0,
            period: 1.0,
            offset: 1.0,
        }
    }
}

/// One sinusoidal layer.
///
/// Amplitude and wavelength are validated at construction and whenever a
/// scale is applied, so `amplitude() >= 0` and `wavelength() > 0` always hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wave {
    amplitude: f64,
    wavelength: f64,
    phase: f64,
    angular_velocity: f64,
    baseline: Baseline,
    fill: Fill,
    stroke: Option<StrokeStyle>,
    opacity: f64,
    scale: WaveScale,
}

impl Wave {
    /// Creates a still wave with a white fill.
    pub fn new(amplitude: f64, wavelength: f64, baseline: Baseline) -> Result<Self> {
        validate_amplitude(amplitude)?;
        validate_wavelength(wavelength)?;
        if !baseline.distance().is_finite() {
            return Err(WaveViewError::validation("baseline must be finite"));
        }

        Ok(Self {
            amplitude,
            wavelength,
            phase: 0.0,
            angular_velocity: 0.0,
            baseline,
            fill: Fill::default(),
            stroke: None,
            opacity: 1.0,
            scale: WaveScale::default(),
        })
    }

    pub fn with_phase(mut self, phase: f64) -> Result<Self> {
        if !phase.is_finite() {
            return Err(WaveViewError::validation("phase must be finite"));
        }
        self.phase = wrap_phase(phase);
        Ok(self)
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Result<Self> {
        if !angular_velocity.is_finite() {
            return Err(WaveViewError::validation(
                "angular velocity must be finite",
            ));
        }
        self.angular_velocity = angular_velocity;
        Ok(self)
    }

    /// Sets the velocity so one wavelength passes every `period` seconds.
    pub fn with_period(self, period: f64, direction: Direction) -> Result<Self> {
        validate_period(period)?;
        self.with_angular_velocity(direction.angular_velocity(period))
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Layer opacity, clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude * self.scale.height
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength * self.scale.length
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Phase advance per second, after the period scale is applied.
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity / self.scale.period
    }

    pub fn baseline(&self) -> Baseline {
        self.baseline.scaled(self.scale.offset)
    }

    pub fn fill(&self) -> &Fill {
        &self.fill
    }

    pub fn stroke(&self) -> Option<&StrokeStyle> {
        self.stroke.as_ref()
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn scale(&self) -> WaveScale {
        self.scale
    }

    /// Curve height at `x` for a wave resting at `baseline_y`.
    pub fn y_at(&self, x: f64, baseline_y: f64) -> f64 {
        baseline_y + self.amplitude() * (TAU * x / self.wavelength() + self.phase).sin()
    }

    /// Advances phase by `angular_velocity() * dt`, wrapped into `[0, 2π)`.
    /// A non-finite step leaves phase where it is.
    pub(crate) fn advance(&mut self, dt: f64) {
        let step = self.angular_velocity() * dt;
        if !step.is_finite() {
            tracing::trace!(dt, "non-finite phase step skipped");
            return;
        }
        self.phase = wrap_phase(self.phase + step);
    }

    pub(crate) fn set_length_scale(&mut self, scale: f64) -> Result<()> {
        validate_scale("wavelength", scale)?;
        validate_wavelength(self.wavelength * scale)?;
        self.scale.length = scale;
        Ok(())
    }

    pub(crate) fn set_height_scale(&mut self, scale: f64) -> Result<()> {
        validate_scale("amplitude", scale)?;
        validate_amplitude(self.amplitude * scale)?;
        self.scale.height = scale;
        Ok(())
    }

    pub(crate) fn set_period_scale(&mut self, scale: f64) -> Result<()> {
        validate_scale("period", scale)?;
        if scale == 0.0 {
            return Err(WaveViewError::validation("period scale must be > 0"));
        }
        let angular_velocity = self.angular_velocity / scale;
        if !angular_velocity.is_finite() {
            return Err(WaveViewError::validation(format!(
                "period scale {scale} gives a non-finite angular velocity"
            )));
        }
        self.scale.period = scale;
        Ok(())
    }

    pub(crate) fn set_offset_scale(&mut self, scale: f64) -> Result<()> {
        validate_scale("baseline offset", scale)?;
        if !(self.baseline.distance() * scale).is_finite() {
            return Err(WaveViewError::validation(format!(
                "baseline offset scale {scale} gives a non-finite baseline"
            )));
        }
        self.scale.offset = scale;
        Ok(())
    }
}

fn validate_amplitude(amplitude: f64) -> Result<()> {
    if !amplitude.is_finite() || amplitude < 0.0 {
        return Err(WaveViewError::validation(format!(
            "amplitude must be a finite value >= 0, got {amplitude}"
        )));
    }
    Ok(())
}

fn validate_wavelength(wavelength: f64) -> Result<()> {
    // Subnormal wavelengths would overflow the spatial frequency.
    if !wavelength.is_finite() || wavelength <= 0.0 || !(TAU / wavelength).is_finite() {
        return Err(WaveViewError::validation(format!(
            "wavelength must be a finite value > 0, got {wavelength}"
        )));
    }
    Ok(())
}

fn validate_period(period: f64) -> Result<()> {
    if !period.is_finite() || period <= 0.0 {
        return Err(WaveViewError::validation(format!(
            "period must be a finite value > 0, got {period}"
        )));
    }
    Ok(())
}

fn validate_scale(what: &str, scale: f64) -> Result<()> {
    if !scale.is_finite() || scale < 0.0 {
        return Err(WaveViewError::validation(format!(
            "{what} scale must be a finite value >= 0, got {scale}"
        )));
    }
    Ok(())
}
