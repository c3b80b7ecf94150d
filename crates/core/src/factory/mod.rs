//! Deterministic generation of default wave layers.
//!
//! Each generated layer is identified by a sequence number that keeps growing
//! for the lifetime of a stack. Parameters are spread over the configured
//! ranges with low-discrepancy (golden ratio) sequences, so neighbouring
//! layers never share a phase or a hue.

use std::f64::consts::PI;

use crate::{config::PaletteConfig, Baseline, Color, Direction, Fill, Result, Wave};

/// 1 / φ.
const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_894_9;

/// π(3 - √5): the golden angle in radians.
const GOLDEN_ANGLE: f64 = PI * 0.763_932_022_500_210_3;

/// Hue distance between a gradient's start and end colour, in turns.
const GRADIENT_HUE_SPAN: f64 = 1.0 / 3.0;

/// Builds the `sequence`-th default wave for the given palette.
pub fn default_wave(sequence: usize, palette: &PaletteConfig) -> Result<Wave> {
    let n = sequence as f64;
    let jitter = |stride: f64| fract(n * GOLDEN_RATIO_CONJUGATE * stride);

    let direction = if sequence % 2 == 0 {
        Direction::Right
    } else {
        Direction::Left
    };

    let hue = fract(n * GOLDEN_RATIO_CONJUGATE);
    let start = Color::from_hsv(hue, palette.saturation, palette.value);
    let end = Color::from_hsv(hue + GRADIENT_HUE_SPAN, palette.saturation, palette.value);
    let fill = Fill::LinearGradient {
        start,
        end,
        orientation: palette.gradient,
    };

    let wave = Wave::new(
        palette.amplitude.lerp(jitter(2.0)),
        palette.wavelength.lerp(jitter(3.0)),
        Baseline::FromBottom(palette.bottom_offset.lerp(jitter(5.0))),
    )?
    .with_phase(n * GOLDEN_ANGLE)?
    .with_period(palette.period_seconds.lerp(jitter(7.0)), direction)?
    .with_fill(fill)
    .with_opacity(palette.opacity);

    Ok(wave)
}

/// Builds `count` consecutive default waves starting at `first_sequence`.
pub fn default_waves(
    first_sequence: usize,
    count: usize,
    palette: &PaletteConfig,
) -> Result<Vec<Wave>> {
    (first_sequence..first_sequence + count)
        .map(|sequence| default_wave(sequence, palette))
        .collect()
}

fn fract(value: f64) -> f64 {
    value - value.floor()
}
