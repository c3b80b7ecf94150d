//! Start / pause / resume state machine that turns host frame callbacks into
//! phase advances.
//!
//! Every scheduled callback carries a [`FrameToken`]. At most one token is
//! live, and only while [`AnimationState::Running`]; any other token handed
//! back by the host is stale and its tick is ignored. Pausing invalidates the
//! live token synchronously, so a callback that was already in flight cannot
//! advance phase after the pause.

use std::time::Duration;

use serde::Serialize;

use crate::{clock::Clock, config::AnimationConfig, WaveLayerStack};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AnimationState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Identifies one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Scheduling services the host provides to the driver.
pub trait FrameHost {
    /// Arranges for the driver to receive a tick carrying `token`.
    fn schedule_frame(&mut self, token: FrameToken);

    /// Withdraws a previously scheduled callback. Hosts that cannot withdraw
    /// may ignore this; the driver drops the stale tick anyway.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Asks for the surface to be repainted. Returns `false` when the surface
    /// is not ready, in which case the request is dropped.
    fn request_redraw(&mut self) -> bool;
}

/// What a delivered tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The driver is not running or the token is not the live one.
    Ignored,
    /// Phases advanced by `dt` seconds and the next frame was scheduled.
    Advanced { dt: f64, redrawn: bool },
}

#[derive(Debug)]
pub struct AnimationDriver<C> {
    clock: C,
    state: AnimationState,
    generation: u64,
    pending: Option<FrameToken>,
    baseline: Duration,
    max_frame_seconds: f64,
}

impl<C: Clock> AnimationDriver<C> {
    /// A ceiling that is not a positive finite number falls back to the
    /// default, so a clamped delta is always within `[0, max]`.
    pub fn new(clock: C, config: &AnimationConfig) -> Self {
        let max_frame_seconds =
            if config.max_frame_seconds.is_finite() && config.max_frame_seconds > 0.0 {
                config.max_frame_seconds
            } else {
                let fallback = AnimationConfig::default().max_frame_seconds;
                tracing::debug!(
                    configured = config.max_frame_seconds,
                    fallback,
                    "invalid frame delta ceiling replaced"
                );
                fallback
            };

        Self {
            clock,
            state: AnimationState::Stopped,
            generation: 0,
            pending: None,
            baseline: Duration::ZERO,
            max_frame_seconds,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// The live token, present only while running.
    pub fn pending_token(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Begins animating. From `Paused` this behaves like [`resume`](Self::resume);
    /// while already running it does nothing.
    pub fn start(&mut self, host: &mut impl FrameHost) {
        match self.state {
            AnimationState::Stopped => {
                self.baseline = self.clock.now();
                self.state = AnimationState::Running;
                self.schedule_next(host);
                tracing::debug!("animation started");
            }
            AnimationState::Paused => self.resume(host),
            AnimationState::Running => {
                tracing::trace!("start ignored, animation already running");
            }
        }
    }

    /// Freezes all phases and withdraws the live callback.
    pub fn pause(&mut self, host: &mut impl FrameHost) {
        if self.state != AnimationState::Running {
            tracing::trace!(state = ?self.state, "pause ignored");
            return;
        }

        if let Some(token) = self.pending.take() {
            host.cancel_frame(token);
        }
        // Bump the generation so even a token the host failed to withdraw
        // can never match again.
        self.generation += 1;
        self.state = AnimationState::Paused;
        tracing::debug!("animation paused");
    }

    /// Continues from the frozen phases. Time spent paused is discarded.
    pub fn resume(&mut self, host: &mut impl FrameHost) {
        if self.state != AnimationState::Paused {
            tracing::trace!(state = ?self.state, "resume ignored");
            return;
        }

        self.baseline = self.clock.now();
        self.state = AnimationState::Running;
        self.schedule_next(host);
        tracing::debug!("animation resumed");
    }

    /// Handles a tick and measures elapsed time from the clock.
    pub fn on_frame(
        &mut self,
        token: FrameToken,
        stack: &mut WaveLayerStack,
        host: &mut impl FrameHost,
    ) -> TickOutcome {
        if !self.accepts(token) {
            return TickOutcome::Ignored;
        }

        let now = self.clock.now();
        let elapsed = now.saturating_sub(self.baseline).as_secs_f64();
        self.baseline = now;
        self.advance(elapsed, stack, host)
    }

    /// Handles a tick whose elapsed time was measured by the host.
    pub fn on_tick(
        &mut self,
        token: FrameToken,
        dt: f64,
        stack: &mut WaveLayerStack,
        host: &mut impl FrameHost,
    ) -> TickOutcome {
        if !self.accepts(token) {
            return TickOutcome::Ignored;
        }

        self.baseline = self.clock.now();
        self.advance(dt, stack, host)
    }

    fn accepts(&self, token: FrameToken) -> bool {
        let live = self.state == AnimationState::Running && self.pending == Some(token);
        if !live {
            tracing::trace!(
                token = token.generation(),
                state = ?self.state,
                "dropping stale frame"
            );
        }
        live
    }

    fn advance(
        &mut self,
        dt: f64,
        stack: &mut WaveLayerStack,
        host: &mut impl FrameHost,
    ) -> TickOutcome {
        let dt = self.clamp_dt(dt);
        stack.advance(dt);

        let redrawn = host.request_redraw();
        if !redrawn {
            tracing::trace!("surface not ready, redraw dropped");
        }

        self.schedule_next(host);
        TickOutcome::Advanced { dt, redrawn }
    }

    fn clamp_dt(&self, dt: f64) -> f64 {
        if !dt.is_finite() || dt < 0.0 {
            tracing::trace!(dt, "malformed frame delta clamped to zero");
            return 0.0;
        }
        if dt > self.max_frame_seconds {
            tracing::trace!(dt, max = self.max_frame_seconds, "frame delta clamped");
            return self.max_frame_seconds;
        }
        dt
    }

    fn schedule_next(&mut self, host: &mut impl FrameHost) {
        self.generation += 1;
        let token = FrameToken(self.generation);
        self.pending = Some(token);
        host.schedule_frame(token);
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{PI, TAU};

    use super::*;
    use crate::{clock::ManualClock, Baseline, Wave};

    #[derive(Debug, Default)]
    struct RecordingHost {
        scheduled: Vec<FrameToken>,
        cancelled: Vec<FrameToken>,
        redraws: usize,
        surface_ready: bool,
    }

    impl RecordingHost {
        fn ready() -> Self {
            Self {
                surface_ready: true,
                ..Default::default()
            }
        }

        fn last(&self) -> FrameToken {
            *self.scheduled.last().expect("a frame was scheduled")
        }
    }

    impl FrameHost for RecordingHost {
        fn schedule_frame(&mut self, token: FrameToken) {
            self.scheduled.push(token);
        }

        fn cancel_frame(&mut self, token: FrameToken) {
            self.cancelled.push(token);
        }

        fn request_redraw(&mut self) -> bool {
            if self.surface_ready {
                self.redraws += 1;
            }
            self.surface_ready
        }
    }

    fn stack_with_velocity(angular_velocity: f64) -> WaveLayerStack {
        let mut stack = WaveLayerStack::new();
        stack.push(
            Wave::new(10.0, 100.0, Baseline::FromTop(50.0))
                .unwrap()
                .with_angular_velocity(angular_velocity)
                .unwrap(),
        );
        stack
    }

    fn driver(clock: &ManualClock) -> AnimationDriver<ManualClock> {
        AnimationDriver::new(clock.clone(), &AnimationConfig::default())
    }

    fn phase(stack: &WaveLayerStack) -> f64 {
        stack.get(0).unwrap().phase()
    }

    #[test]
    fn starts_stopped_without_tokens() {
        let clock = ManualClock::new();
        let driver = driver(&clock);
        assert_eq!(driver.state(), AnimationState::Stopped);
        assert!(driver.pending_token().is_none());
    }

    #[test]
    fn start_schedules_exactly_once() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();

        driver.start(&mut host);
        driver.start(&mut host);

        assert_eq!(driver.state(), AnimationState::Running);
        assert_eq!(host.scheduled.len(), 1);
    }

    #[test]
    fn ticks_accumulate_phase_modulo_tau() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();
        let mut stack = stack_with_velocity(PI);

        driver.start(&mut host);
        for dt in [0.05, 0.02, 0.09, 0.04] {
            let token = host.last();
            driver.on_tick(token, dt, &mut stack, &mut host);
        }
        for _ in 0..30 {
            clock.advance(Duration::from_millis(50));
            let token = host.last();
            driver.on_frame(token, &mut stack, &mut host);
        }

        let expected = (PI * (0.2 + 1.5)).rem_euclid(TAU);
        assert!((phase(&stack) - expected).abs() < 1e-9);
        assert_eq!(host.redraws, 34);
    }

    #[test]
    fn clock_ticks_measure_from_previous_tick() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(5));
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();
        let mut stack = stack_with_velocity(1.0);

        driver.start(&mut host);
        clock.advance(Duration::from_millis(16));
        let outcome = driver.on_frame(host.last(), &mut stack, &mut host);

        assert_eq!(
            outcome,
            TickOutcome::Advanced {
                dt: 0.016,
                redrawn: true
            }
        );
    }

    #[test]
    fn malformed_deltas_are_clamped_to_zero() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();
        let mut stack = stack_with_velocity(1.0);
        driver.start(&mut host);

        for dt in [-1.0, f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
            let outcome = driver.on_tick(host.last(), dt, &mut stack, &mut host);
            assert_eq!(
                outcome,
                TickOutcome::Advanced {
                    dt: 0.0,
                    redrawn: true
                }
            );
        }
        assert_eq!(phase(&stack), 0.0);
        assert_eq!(driver.state(), AnimationState::Running);
    }

    #[test]
    fn large_deltas_are_capped() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();
        let mut stack = stack_with_velocity(1.0);
        driver.start(&mut host);

        clock.advance(Duration::from_secs(3));
        driver.on_frame(host.last(), &mut stack, &mut host);
        assert!((phase(&stack) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn invalid_ceilings_never_yield_negative_deltas() {
        for max_frame_seconds in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let clock = ManualClock::new();
            let mut driver =
                AnimationDriver::new(clock.clone(), &AnimationConfig { max_frame_seconds });
            let mut host = RecordingHost::ready();
            let mut stack = stack_with_velocity(1.0);
            driver.start(&mut host);

            let outcome = driver.on_tick(host.last(), 0.016, &mut stack, &mut host);
            assert_eq!(
                outcome,
                TickOutcome::Advanced {
                    dt: 0.016,
                    redrawn: true
                }
            );

            let outcome = driver.on_tick(host.last(), 5.0, &mut stack, &mut host);
            assert_eq!(
                outcome,
                TickOutcome::Advanced {
                    dt: 0.1,
                    redrawn: true
                }
            );
        }
    }

    #[test]
    fn pause_cancels_and_ignores_late_ticks() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();
        let mut stack = stack_with_velocity(1.0);

        driver.start(&mut host);
        let in_flight = host.last();
        driver.pause(&mut host);

        assert_eq!(host.cancelled, vec![in_flight]);
        assert!(driver.pending_token().is_none());
        clock.advance(Duration::from_millis(16));
        assert_eq!(
            driver.on_frame(in_flight, &mut stack, &mut host),
            TickOutcome::Ignored
        );
        assert_eq!(
            driver.on_tick(in_flight, 0.016, &mut stack, &mut host),
            TickOutcome::Ignored
        );
        assert_eq!(phase(&stack), 0.0);
        assert_eq!(host.scheduled.len(), 1);
    }

    #[test]
    fn repeated_pause_is_idempotent() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();
        let mut stack = stack_with_velocity(1.0);

        driver.start(&mut host);
        driver.on_tick(host.last(), 0.05, &mut stack, &mut host);
        driver.pause(&mut host);
        let frozen = stack.clone();

        driver.pause(&mut host);
        driver.pause(&mut host);

        assert_eq!(driver.state(), AnimationState::Paused);
        assert_eq!(host.cancelled.len(), 1);
        assert_eq!(stack, frozen);
    }

    #[test]
    fn resume_discards_paused_time() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();
        let mut stack = stack_with_velocity(1.0);

        driver.start(&mut host);
        clock.advance(Duration::from_millis(20));
        driver.on_frame(host.last(), &mut stack, &mut host);
        driver.pause(&mut host);
        let before_pause = phase(&stack);

        clock.advance(Duration::from_secs(60));
        driver.resume(&mut host);
        assert_eq!(phase(&stack), before_pause);

        clock.advance(Duration::from_millis(10));
        driver.on_frame(host.last(), &mut stack, &mut host);
        assert!((phase(&stack) - (before_pause + 0.01)).abs() < 1e-12);
    }

    #[test]
    fn lifecycle_misuse_is_benign() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();

        driver.pause(&mut host);
        driver.resume(&mut host);
        assert_eq!(driver.state(), AnimationState::Stopped);
        assert!(host.scheduled.is_empty());

        driver.start(&mut host);
        driver.resume(&mut host);
        assert_eq!(host.scheduled.len(), 1);

        driver.pause(&mut host);
        driver.start(&mut host);
        assert_eq!(driver.state(), AnimationState::Running);
        assert_eq!(host.scheduled.len(), 2);
    }

    #[test]
    fn resume_issues_a_fresh_token() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();

        driver.start(&mut host);
        let first = host.last();
        driver.pause(&mut host);
        driver.resume(&mut host);

        assert_ne!(host.last(), first);
        assert_eq!(driver.pending_token(), Some(host.last()));
    }

    #[test]
    fn redraw_is_dropped_while_surface_is_not_ready() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::default();
        let mut stack = stack_with_velocity(1.0);

        driver.start(&mut host);
        let outcome = driver.on_tick(host.last(), 0.01, &mut stack, &mut host);

        assert_eq!(
            outcome,
            TickOutcome::Advanced {
                dt: 0.01,
                redrawn: false
            }
        );
        assert_eq!(host.redraws, 0);
        // The loop keeps going; the next tick supersedes the dropped redraw.
        assert_eq!(host.scheduled.len(), 2);
    }

    #[test]
    fn a_consumed_token_cannot_be_replayed() {
        let clock = ManualClock::new();
        let mut driver = driver(&clock);
        let mut host = RecordingHost::ready();
        let mut stack = stack_with_velocity(1.0);

        driver.start(&mut host);
        let token = host.last();
        driver.on_tick(token, 0.01, &mut stack, &mut host);
        assert_eq!(
            driver.on_tick(token, 0.01, &mut stack, &mut host),
            TickOutcome::Ignored
        );
        assert!((phase(&stack) - 0.01).abs() < 1e-12);
    }
}
