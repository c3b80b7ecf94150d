//! Turns a wave stack into fill and stroke geometry.
//!
//! Each wave is sampled at a fixed number of points per wavelength, starting
//! at `x = 0` and ending exactly at the surface's right edge. Samples are
//! joined with cubic segments whose control points follow the neighbouring
//! samples, and the filled region is closed along the bottom edge.

use kurbo::{BezPath, Point, Size, Vec2};

use crate::{
    config::RenderConfig, Color, Fill, GradientOrientation, StrokeStyle, Wave, WaveLayerStack,
};

/// Upper bound on samples per wave so very short wavelengths on wide
/// surfaces stay within a frame budget.
const MAX_SAMPLES_PER_WAVE: usize = 4096;

/// Drawing target provided by the host.
pub trait Surface {
    /// Current drawable size, or `None` while the surface is not ready.
    fn size(&self) -> Option<Size>;

    fn fill_path(&mut self, path: &BezPath, fill: &ResolvedFill);

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle);
}

/// A fill with colours and gradient endpoints resolved for one surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedFill {
    Solid(Color),
    LinearGradient {
        from: Point,
        to: Point,
        start: Color,
        end: Color,
    },
}

/// Drawable output for one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveGeometry {
    /// Position in the stack, 0 being the back layer.
    pub layer: usize,
    /// The sampled curve alone, used for strokes.
    pub curve: BezPath,
    /// The curve closed along the surface's bottom edge.
    pub region: BezPath,
    pub fill: ResolvedFill,
    pub stroke: Option<StrokeStyle>,
}

#[derive(Debug, Clone)]
pub struct WaveRenderer {
    samples_per_wavelength: u32,
    smoothing: f64,
}

impl Default for WaveRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl WaveRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            samples_per_wavelength: config.samples_per_wavelength.max(2),
            smoothing: config.smoothing,
        }
    }

    /// Geometry for every layer in stack order. Empty for a degenerate size.
    pub fn geometry(&self, stack: &WaveLayerStack, size: Size) -> Vec<WaveGeometry> {
        if !(size.width > 0.0 && size.height > 0.0) || !size.is_finite() {
            return Vec::new();
        }

        stack
            .iter()
            .enumerate()
            .map(|(layer, wave)| self.wave_geometry(layer, wave, size))
            .collect()
    }

    /// Paints the stack onto `surface`, back layer first. Returns `false`
    /// without drawing anything when the surface is not ready.
    pub fn render(&self, stack: &WaveLayerStack, surface: &mut impl Surface) -> bool {
        let Some(size) = surface.size() else {
            tracing::trace!("surface not ready, skipping frame");
            return false;
        };

        for geometry in self.geometry(stack, size) {
            surface.fill_path(&geometry.region, &geometry.fill);
            if let Some(stroke) = &geometry.stroke {
                surface.stroke_path(&geometry.curve, stroke);
            }
        }
        true
    }

    fn wave_geometry(&self, layer: usize, wave: &Wave, size: Size) -> WaveGeometry {
        let baseline_y = wave.baseline().resolve(size.height);
        let points = self.sample(wave, baseline_y, size.width);
        let curve = self.curve_through(&points);

        let mut region = curve.clone();
        region.line_to((size.width, size.height));
        region.line_to((0.0, size.height));
        region.close_path();

        WaveGeometry {
            layer,
            curve,
            region,
            fill: resolve_fill(wave, baseline_y, size),
            stroke: wave.stroke().map(|stroke| StrokeStyle {
                color: stroke.color.with_opacity(wave.opacity()),
                width: stroke.width,
            }),
        }
    }

    /// Samples `[0, width]` plus one guard sample past each end, which only
    /// shapes the first and last control points.
    fn sample(&self, wave: &Wave, baseline_y: f64, width: f64) -> Vec<Point> {
        let step = (wave.wavelength() / f64::from(self.samples_per_wavelength))
            .max(width / MAX_SAMPLES_PER_WAVE as f64);
        let intervals = (width / step).ceil().max(1.0) as usize;

        let mut xs = Vec::with_capacity(intervals + 3);
        xs.push(-step);
        xs.extend((0..intervals).map(|i| i as f64 * step));
        xs.push(width);
        xs.push(width + step);

        xs.into_iter()
            .map(|x| Point::new(x, wave.y_at(x, baseline_y)))
            .collect()
    }

    fn curve_through(&self, points: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        // points[0] and points[last] are guards.
        let visible = 1..points.len() - 1;
        path.move_to(points[visible.start]);

        for i in visible.start + 1..visible.end {
            let current = points[i];
            if self.smoothing == 0.0 {
                path.line_to(current);
                continue;
            }

            let previous = points[i - 1];
            let before = tangent(points[i - 2], current);
            let after = tangent(previous, points[i + 1]);
            path.curve_to(
                previous + before * self.smoothing,
                current - after * self.smoothing,
                current,
            );
        }
        path
    }
}

fn tangent(from: Point, to: Point) -> Vec2 {
    to - from
}

fn resolve_fill(wave: &Wave, baseline_y: f64, size: Size) -> ResolvedFill {
    let opacity = wave.opacity();
    match *wave.fill() {
        Fill::Solid(color) => ResolvedFill::Solid(color.with_opacity(opacity)),
        Fill::LinearGradient {
            start,
            end,
            orientation,
        } => {
            let start = start.with_opacity(opacity);
            let end = end.with_opacity(opacity);
            let (from, to) = match orientation {
                GradientOrientation::Horizontal => {
                    (Point::new(0.0, 0.0), Point::new(size.width, 0.0))
                }
                GradientOrientation::Vertical => {
                    let amplitude = wave.amplitude();
                    if amplitude == 0.0 {
                        return ResolvedFill::Solid(start);
                    }
                    (
                        Point::new(0.0, baseline_y - amplitude),
                        Point::new(0.0, baseline_y + amplitude),
                    )
                }
            };
            ResolvedFill::LinearGradient {
                from,
                to,
                start,
                end,
            }
        }
    }
}
