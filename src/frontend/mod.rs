//! Frontends drive the game loop.
//!
//! A [`Platform`] supplies frame time and input and presents each finished
//! [`RenderFrame`]. [`run_loop`] is the same for every platform: poll, tick
//! the [`ScreenManager`], present, until the window closes or a screen asks
//! to quit.
//!
//! - [`headless`] – fixed step, scripted input, draws into a log
//! - `window` – raylib window (feature `window`)

pub mod headless;
#[cfg(feature = "window")]
pub mod window;

use log::info;

use crate::components::mapposition::Vec2;
use crate::resources::input::InputSnapshot;
use crate::resources::renderframe::RenderFrame;
use crate::screens::manager::ScreenManager;

pub trait Platform {
    /// Seconds since the previous frame.
    fn begin_frame(&mut self) -> f32;
    fn poll_input(&mut self) -> InputSnapshot;
    fn present(&mut self, frame: &RenderFrame);
    fn should_close(&self) -> bool;
    /// Size of the drawable area in pixels.
    fn viewport(&self) -> Vec2;
}

/// Run frames until the platform closes or the game quits. Returns the
/// number of frames run.
pub fn run_loop(platform: &mut dyn Platform, manager: &mut ScreenManager) -> u64 {
    let mut frame = RenderFrame::new(platform.viewport());
    let mut frames = 0u64;
    while !platform.should_close() && !manager.should_quit() {
        let dt = platform.begin_frame();
        let input = platform.poll_input();
        frame.reset();
        frame.viewport = platform.viewport();
        manager.tick(dt, &input, &mut frame);
        platform.present(&frame);
        frames += 1;
    }
    info!("Game loop stopped after {} frames", frames);
    frames
}
