//! Frontend without a window.
//!
//! Time advances by a fixed step, input comes from a script (one snapshot
//! per frame, then idle) and frames are replayed into a [`DrawLog`]. Used by
//! `--headless` runs and by tests. A paced platform also waits out each step
//! in real time.

use std::collections::VecDeque;
use std::time::Duration;

use log::trace;

use crate::components::mapposition::Vec2;
use crate::frontend::Platform;
use crate::resources::input::InputSnapshot;
use crate::resources::renderframe::{DrawLog, RenderFrame};
use crate::resources::worldtime::FrameClock;

pub struct HeadlessPlatform {
    step: f32,
    viewport: Vec2,
    frames_left: Option<u64>,
    script: VecDeque<InputSnapshot>,
    clock: Option<FrameClock>,
    /// Draw calls of the most recent frame.
    pub last_frame: DrawLog,
    pub frames_presented: u64,
}

impl HeadlessPlatform {
    /// Run `frames` frames of `step` seconds, or forever with `None`.
    pub fn new(step: f32, viewport: Vec2, frames: Option<u64>) -> Self {
        HeadlessPlatform {
            step,
            viewport,
            frames_left: frames,
            script: VecDeque::new(),
            clock: None,
            last_frame: DrawLog::default(),
            frames_presented: 0,
        }
    }

    /// Sleep so each frame takes at least one step of wall-clock time. The
    /// delta handed to the game stays the fixed step.
    pub fn paced(mut self, on: bool) -> Self {
        self.clock = on.then(FrameClock::new);
        self
    }

    /// Queue input for the next frames, one snapshot each.
    pub fn with_script(mut self, inputs: impl IntoIterator<Item = InputSnapshot>) -> Self {
        self.script.extend(inputs);
        self
    }
}

impl Platform for HeadlessPlatform {
    fn begin_frame(&mut self) -> f32 {
        if let Some(left) = &mut self.frames_left {
            *left = left.saturating_sub(1);
        }
        if let Some(clock) = &mut self.clock {
            let real = clock.wait_and_tick(Duration::from_secs_f32(self.step.max(0.0)));
            trace!("paced frame took {:.4}s", real);
        }
        self.step
    }

    fn poll_input(&mut self) -> InputSnapshot {
        self.script.pop_front().unwrap_or_default()
    }

    fn present(&mut self, frame: &RenderFrame) {
        self.last_frame.calls.clear();
        let calls = frame.dispatch(&mut self.last_frame);
        self.frames_presented += 1;
        trace!("frame {}: {} draw calls", self.frames_presented, calls);
    }

    fn should_close(&self) -> bool {
        self.frames_left == Some(0)
    }

    fn viewport(&self) -> Vec2 {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::Action;

    #[test]
    fn test_frame_budget_and_script() {
        let mut p = HeadlessPlatform::new(0.5, Vec2::new(8.0, 8.0), Some(2))
            .with_script([InputSnapshot::new().with_pressed(Action::Confirm)]);
        assert!(!p.should_close());
        assert_eq!(p.begin_frame(), 0.5);
        assert!(p.poll_input().just_pressed(Action::Confirm));
        p.begin_frame();
        assert!(!p.poll_input().just_pressed(Action::Confirm));
        assert!(p.should_close());
    }

    #[test]
    fn test_paced_frames_take_real_time() {
        let mut p = HeadlessPlatform::new(0.01, Vec2::new(8.0, 8.0), None).paced(true);
        let start = std::time::Instant::now();
        for _ in 0..3 {
            assert_eq!(p.begin_frame(), 0.01);
        }
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
