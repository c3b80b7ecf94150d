//! Core library for the Wave View component.
//!
//! A wave view paints a stack of sinusoidal bands whose phases advance
//! independently, producing a flowing wave. The crate owns the wave model,
//! the animation state machine and the geometry renderer; the host supplies a
//! drawing surface, a clock and a frame callback.

pub mod animation;
pub mod clock;
pub mod config;
pub mod error;
pub mod factory;
pub mod render;
pub mod stack;
pub mod view;
pub mod wave;

pub use animation::{AnimationDriver, AnimationState, FrameHost, FrameToken, TickOutcome};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{AnimationConfig, PaletteConfig, RenderConfig, ValueRange, ViewConfig};
pub use error::{Result, WaveViewError};
pub use kurbo::{BezPath, PathEl, Point, Size};
pub use render::{ResolvedFill, Surface, WaveGeometry, WaveRenderer};
pub use stack::WaveLayerStack;
pub use view::{ViewSnapshot, WaveView};
pub use wave::{
    wrap_phase, Baseline, Color, Direction, Fill, GradientOrientation, StrokeStyle, Wave,
    WaveScale,
};
