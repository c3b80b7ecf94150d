use kurbo::Size;
use serde::Serialize;

use crate::{
    animation::{AnimationDriver, AnimationState, FrameHost, FrameToken, TickOutcome},
    clock::{Clock, MonotonicClock},
    config::ViewConfig,
    render::{Surface, WaveGeometry, WaveRenderer},
    Result, Wave, WaveLayerStack,
};

/// Serializable view of the animation state and every layer.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot<'a> {
    pub state: AnimationState,
    pub waves: &'a [Wave],
}

/// The visual component the host embeds.
///
/// Owns the wave stack and the animation state exclusively; the host reaches
/// them only through the operations below. Lifecycle events map one to one:
/// foreground → [`resume_animation`](Self::resume_animation), background →
/// [`pause_animation`](Self::pause_animation).
#[derive(Debug)]
pub struct WaveView<C = MonotonicClock> {
    config: ViewConfig,
    stack: WaveLayerStack,
    driver: AnimationDriver<C>,
    renderer: WaveRenderer,
}

impl WaveView<MonotonicClock> {
    pub fn new(config: ViewConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> WaveView<C> {
    pub fn with_clock(config: ViewConfig, clock: C) -> Self {
        let driver = AnimationDriver::new(clock, &config.animation);
        let renderer = WaveRenderer::new(&config.render);
        Self {
            config,
            stack: WaveLayerStack::new(),
            driver,
            renderer,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn stack(&self) -> &WaveLayerStack {
        &self.stack
    }

    pub fn state(&self) -> AnimationState {
        self.driver.state()
    }

    pub fn is_paused(&self) -> bool {
        self.driver.state() == AnimationState::Paused
    }

    pub fn snapshot(&self) -> ViewSnapshot<'_> {
        ViewSnapshot {
            state: self.driver.state(),
            waves: self.stack.waves(),
        }
    }

    /// Pretty-printed JSON of [`snapshot`](Self::snapshot).
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Inserts `count` generated waves starting at `base_layer_index`.
    pub fn add_default_waves(&mut self, count: usize, base_layer_index: usize) -> Result<()> {
        self.stack
            .add_default_waves(count, base_layer_index, &self.config.palette)
    }

    /// Inserts a caller-built wave at `index`.
    pub fn insert_wave(&mut self, index: usize, wave: Wave) -> Result<()> {
        self.stack.insert_all(index, vec![wave])
    }

    pub fn start_animation(&mut self, host: &mut impl FrameHost) {
        self.driver.start(host);
    }

    pub fn pause_animation(&mut self, host: &mut impl FrameHost) {
        self.driver.pause(host);
    }

    pub fn resume_animation(&mut self, host: &mut impl FrameHost) {
        self.driver.resume(host);
    }

    /// Frame callback for hosts that let the view read its clock.
    pub fn on_frame(&mut self, token: FrameToken, host: &mut impl FrameHost) -> TickOutcome {
        self.driver.on_frame(token, &mut self.stack, host)
    }

    /// Frame callback for hosts that measure elapsed seconds themselves.
    pub fn on_tick(
        &mut self,
        token: FrameToken,
        dt: f64,
        host: &mut impl FrameHost,
    ) -> TickOutcome {
        self.driver.on_tick(token, dt, &mut self.stack, host)
    }

    pub fn render(&self, surface: &mut impl Surface) -> bool {
        self.renderer.render(&self.stack, surface)
    }

    pub fn geometry(&self, size: Size) -> Vec<WaveGeometry> {
        self.renderer.geometry(&self.stack, size)
    }

    /// Height the host should reserve so every band is visible.
    pub fn preferred_height(&self) -> f64 {
        self.stack.preferred_height()
    }

    pub fn set_wave_length_scale(&mut self, index: usize, scale: f64) -> Result<()> {
        self.stack.get_mut(index)?.set_length_scale(scale)?;
        tracing::debug!(index, scale, "wavelength scale updated");
        Ok(())
    }

    pub fn set_wave_height_scale(&mut self, index: usize, scale: f64) -> Result<()> {
        self.stack.get_mut(index)?.set_height_scale(scale)?;
        tracing::debug!(index, scale, "amplitude scale updated");
        Ok(())
    }

    /// Stretches the time one wavelength takes to pass. Phase is kept.
    pub fn set_wave_period_scale(&mut self, index: usize, scale: f64) -> Result<()> {
        self.stack.get_mut(index)?.set_period_scale(scale)?;
        tracing::debug!(index, scale, "period scale updated");
        Ok(())
    }

    pub fn set_wave_offset_scale(&mut self, index: usize, scale: f64) -> Result<()> {
        self.stack.get_mut(index)?.set_offset_scale(scale)?;
        tracing::debug!(index, scale, "baseline offset scale updated");
        Ok(())
    }
}
