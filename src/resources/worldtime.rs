//! Game clock.
//!
//! [`WorldTime`] is the per-tick time resource every consumer reads its
//! delta from. [`FrameClock`] measures real time between frames for
//! frontends that do not get a delta from the window backend.

use std::time::{Duration, Instant};

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WorldTime {
    /// Scaled seconds since the clock was created.
    pub elapsed: f32,
    /// Scaled seconds of the current tick.
    pub delta: f32,
    pub time_scale: f32,
    /// Ticks since the clock was created.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Start a new tick with the raw frame delta `dt` in seconds.
    ///
    /// Negative, NaN and infinite deltas count as zero. Returns the scaled
    /// delta.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let raw = if dt > 0.0 && dt.is_finite() { dt } else { 0.0 };
        let scaled = raw * self.time_scale.max(0.0);
        self.elapsed += scaled;
        self.delta = scaled;
        self.frame_count += 1;
        scaled
    }
}

/// Measures wall-clock time between consecutive [`tick`](FrameClock::tick)s.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous call (or since construction).
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt.as_secs_f32()
    }

    /// Sleep until `frame` has passed since the last tick, then tick.
    pub fn wait_and_tick(&mut self, frame: Duration) -> f32 {
        let spent = self.last.elapsed();
        if spent < frame {
            std::thread::sleep(frame - spent);
        }
        self.tick()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        FrameClock::new()
    }
}
