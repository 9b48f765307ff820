//! Animation clock.
//!
//! Simulation time is read from a [`FrameSource`] on every tick, never
//! counted in frames, so playback speed does not depend on the achieved
//! frame rate. Unpaused time is summed as a [`Duration`], which is exact:
//! a long-running scene keeps advancing at wall-clock speed. Spin angles are
//! the one thing that does step per tick.

use std::time::{Duration, Instant};

use serde::Deserialize;

/// Where elapsed wall-clock time comes from.
pub trait FrameSource {
    /// Time since the source started.
    fn elapsed(&self) -> Duration;
}

/// Monotonic wall clock used by the running app.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for WallClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Hand-driven source for deterministic tests and headless stepping.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock {
    pub now: Duration,
}

impl FixedClock {
    pub fn at_secs(secs: f32) -> Self {
        Self { now: Duration::from_secs_f32(secs.max(0.0)) }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl FrameSource for FixedClock {
    fn elapsed(&self) -> Duration {
        self.now
    }
}

/// Per-tick spin increments (radians per tick).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpinRates {
    pub body: f32,
    pub anchor: f32,
}

impl Default for SpinRates {
    fn default() -> Self {
        Self { body: 0.01, anchor: 0.005 }
    }
}

/// What a single tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Simulation time after the tick (seconds)
    pub time: f64,
    /// Simulation time advanced by this tick (seconds)
    pub dt: f32,
    /// Wall-clock time since the previous tick (seconds), even when paused
    pub wall_dt: f32,
}

/// Monotonic simulation clock.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    /// Unpaused wall-clock time
    elapsed: Duration,
    /// Wall-clock reading of the last tick
    last_wall: Option<Duration>,
    paused: bool,
    stopped: bool,
    /// Accumulated per-tick spin of bodies
    body_spin: f32,
    /// Accumulated per-tick spin of the anchor
    anchor_spin: f32,
    rates: SpinRates,
    ticks: u64,
}

impl AnimationClock {
    pub fn new(rates: SpinRates) -> Self {
        Self {
            elapsed: Duration::ZERO,
            last_wall: None,
            paused: false,
            stopped: false,
            body_spin: 0.0,
            anchor_spin: 0.0,
            rates,
            ticks: 0,
        }
    }

    /// Advance from a wall-clock reading. Readings that go backwards are
    /// treated as zero progress so simulation time never decreases.
    pub fn tick(&mut self, wall: Duration) -> Tick {
        let step = match self.last_wall {
            Some(prev) => wall.saturating_sub(prev),
            None => Duration::ZERO,
        };
        let wall_dt = step.as_secs_f32();
        if self.last_wall.map_or(true, |prev| wall > prev) {
            self.last_wall = Some(wall);
        }

        if self.stopped {
            return Tick { time: self.time(), dt: 0.0, wall_dt: 0.0 };
        }

        let dt = if self.paused { 0.0 } else { wall_dt };
        if !self.paused {
            self.elapsed += step;
            self.body_spin = (self.body_spin + self.rates.body) % std::f32::consts::TAU;
            self.anchor_spin = (self.anchor_spin + self.rates.anchor) % std::f32::consts::TAU;
        }
        self.ticks += 1;

        Tick { time: self.time(), dt, wall_dt }
    }

    /// Convenience for hosts that own a [`FrameSource`].
    pub fn tick_from(&mut self, source: &dyn FrameSource) -> Tick {
        self.tick(source.elapsed())
    }

    /// Simulation seconds.
    pub fn time(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn body_spin(&self) -> f32 {
        self.body_spin
    }

    pub fn anchor_spin(&self) -> f32 {
        self.anchor_spin
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Permanent stop; used on scene teardown.
    pub fn stop(&mut self) {
        self.stopped = true;
    }
}
