//! Per-entity animation playback.
//!
//! [`TimelinePlayer`] advances one [`Timeline`] by delta-time; [`Animator`] is
//! the component that binds a player to an animation key and swaps timelines
//! when the owning entity changes state.
//!
//! # Timing rules
//!
//! - Time accumulates inside the current frame; once it reaches the frame's
//!   duration the player moves on, carrying the remainder over.
//! - A single large delta advances as many frames as it covers.
//! - Looping timelines wrap to frame 0. Play-once timelines hold the final
//!   frame and report `finished` exactly once, when the final frame's
//!   duration has fully elapsed.
//! - Switching key resets to frame 0 with no accumulated time.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::warn;

use crate::resources::animationstore::{AnimationStore, FrameId, Timeline};

/// Result of a single [`TimelinePlayer::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// How many frame boundaries were crossed (wraps included).
    pub frames_advanced: u32,
    /// True only on the call that completed a play-once timeline.
    pub finished: bool,
}

/// Playback cursor over a shared timeline.
#[derive(Debug, Clone)]
pub struct TimelinePlayer {
    timeline: Arc<Timeline>,
    frame_index: usize,
    elapsed: f32,
    finished: bool,
}

impl TimelinePlayer {
    pub fn new(timeline: Arc<Timeline>) -> Self {
        TimelinePlayer {
            timeline,
            frame_index: 0,
            elapsed: 0.0,
            finished: false,
        }
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Seconds accumulated inside the current frame.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn timeline(&self) -> &Arc<Timeline> {
        &self.timeline
    }

    pub fn current_frame(&self) -> &FrameId {
        self.timeline.frame(self.frame_index)
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.elapsed = 0.0;
        self.finished = false;
    }

    /// Replace the timeline and start it from the first frame.
    pub fn play(&mut self, timeline: Arc<Timeline>) {
        self.timeline = timeline;
        self.reset();
    }

    /// Advance playback by `dt` seconds.
    ///
    /// Negative, zero, infinite and NaN deltas are ignored.
    pub fn advance(&mut self, dt: f32) -> AdvanceOutcome {
        let mut outcome = AdvanceOutcome::default();
        if !(dt > 0.0 && dt.is_finite()) || self.finished {
            return outcome;
        }
        self.elapsed += dt;

        let count = self.timeline.frame_count();
        let last = self.timeline.last_index();
        let looped = self.timeline.looped();

        // A whole cycle from any frame lands on the same frame, so skip them
        // in one step instead of walking every frame of a long stall.
        if looped {
            let total = self.timeline.total_duration();
            if self.elapsed >= total {
                let cycles = (self.elapsed / total).floor();
                self.elapsed %= total;
                outcome.frames_advanced = (cycles as u32).saturating_mul(count as u32);
            }
        }

        loop {
            let duration = self.timeline.duration(self.frame_index);
            if self.elapsed < duration {
                break;
            }
            if self.frame_index < last {
                self.elapsed -= duration;
                self.frame_index += 1;
                outcome.frames_advanced = outcome.frames_advanced.saturating_add(1);
            } else if looped {
                self.elapsed -= duration;
                self.frame_index = 0;
                outcome.frames_advanced = outcome.frames_advanced.saturating_add(1);
            } else {
                self.elapsed = duration;
                self.finished = true;
                outcome.finished = true;
                break;
            }
        }
        outcome
    }
}

/// Animation state of one entity: which timeline it plays and where it is.
#[derive(Component, Debug, Clone)]
pub struct Animator {
    key: String,
    player: TimelinePlayer,
}

impl Animator {
    /// Create an animator playing `key`, or `None` if the store lacks it.
    pub fn new(key: impl Into<String>, store: &AnimationStore) -> Option<Self> {
        let key = key.into();
        let timeline = store.get(&key)?.clone();
        Some(Animator {
            key,
            player: TimelinePlayer::new(timeline),
        })
    }

    /// Build directly from a timeline; used for props that are not driven
    /// by a state machine.
    pub fn from_timeline(key: impl Into<String>, timeline: Arc<Timeline>) -> Self {
        Animator {
            key: key.into(),
            player: TimelinePlayer::new(timeline),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn player(&self) -> &TimelinePlayer {
        &self.player
    }

    pub fn frame(&self) -> &FrameId {
        self.player.current_frame()
    }

    /// Switch to another animation key.
    ///
    /// Returns `true` when the key changed; playback then restarts at frame 0
    /// with no accumulated time. Setting the current key again is a no-op so
    /// that a walk cycle keeps running while the entity keeps walking.
    pub fn set_key(&mut self, key: &str, store: &AnimationStore) -> bool {
        if self.key == key {
            return false;
        }
        match store.get(key) {
            Some(timeline) => {
                self.key = key.to_string();
                self.player.play(timeline.clone());
                true
            }
            None => {
                warn!("Animation '{}' not found, keeping '{}'", key, self.key);
                false
            }
        }
    }

    /// Restart the current timeline.
    pub fn restart(&mut self) {
        self.player.reset();
    }

    pub fn advance(&mut self, dt: f32) -> AdvanceOutcome {
        self.player.advance(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::animationstore::FrameDurations;

    fn timeline(durations: &[f32], looped: bool) -> Arc<Timeline> {
        let frames = (0..durations.len())
            .map(|i| FrameId::new(format!("f{}", i)))
            .collect();
        Arc::new(
            Timeline::new(frames, FrameDurations::PerFrame(durations.to_vec()), looped).unwrap(),
        )
    }

    #[test]
    fn test_accumulates_within_frame() {
        let mut p = TimelinePlayer::new(timeline(&[0.5, 0.5], true));
        let out = p.advance(0.25);
        assert_eq!(out.frames_advanced, 0);
        assert_eq!(p.frame_index(), 0);
        assert_eq!(p.elapsed(), 0.25);
    }

    #[test]
    fn test_advances_on_exact_boundary() {
        let mut p = TimelinePlayer::new(timeline(&[0.5, 0.5], true));
        p.advance(0.5);
        assert_eq!(p.frame_index(), 1);
        assert_eq!(p.elapsed(), 0.0);
    }

    #[test]
    fn test_multiple_frames_in_one_tick() {
        let mut p = TimelinePlayer::new(timeline(&[0.25, 0.25, 0.25, 0.25], true));
        let out = p.advance(0.625);
        assert_eq!(out.frames_advanced, 2);
        assert_eq!(p.frame_index(), 2);
        assert_eq!(p.elapsed(), 0.125);
    }

    #[test]
    fn test_loop_wraps_to_zero() {
        let mut p = TimelinePlayer::new(timeline(&[0.25, 0.25], true));
        p.advance(0.5);
        assert_eq!(p.frame_index(), 0);
        assert!(!p.is_finished());
    }

    #[test]
    fn test_long_stall_skips_cycles() {
        let mut p = TimelinePlayer::new(timeline(&[0.25, 0.5], true));
        p.advance(7.5 * 100.0 + 0.25);
        assert_eq!(p.frame_index(), 1);
        assert_eq!(p.elapsed(), 0.0);
    }

    #[test]
    fn test_variable_duration_windup() {
        let mut p = TimelinePlayer::new(timeline(&[0.5, 0.125], false));
        p.advance(0.25);
        assert_eq!(p.frame_index(), 0);
        p.advance(0.25);
        assert_eq!(p.frame_index(), 1);
    }

    #[test]
    fn test_play_once_holds_last_frame_and_finishes_once() {
        let mut p = TimelinePlayer::new(timeline(&[0.25, 0.25], false));
        let first = p.advance(100.0);
        assert!(first.finished);
        assert_eq!(p.frame_index(), 1);
        assert_eq!(p.elapsed(), 0.25);
        let second = p.advance(100.0);
        assert!(!second.finished);
        assert_eq!(p.frame_index(), 1);
    }

    #[test]
    fn test_ignores_negative_and_nan() {
        let mut p = TimelinePlayer::new(timeline(&[0.25, 0.25], true));
        p.advance(-1.0);
        p.advance(f32::NAN);
        assert_eq!(p.frame_index(), 0);
        assert_eq!(p.elapsed(), 0.0);
    }

    #[test]
    fn test_infinite_delta_returns_without_advancing() {
        for looped in [true, false] {
            let mut p = TimelinePlayer::new(timeline(&[0.25, 0.25], looped));
            p.advance(0.3);
            let outcome = p.advance(f32::INFINITY);
            assert_eq!(outcome, AdvanceOutcome::default());
            assert_eq!(p.frame_index(), 1);
            assert!((p.elapsed() - 0.05).abs() < 1e-6);
            p.advance(f32::NEG_INFINITY);
            assert_eq!(p.frame_index(), 1);
        }
    }

    #[test]
    fn test_set_key_resets_mid_frame() {
        let mut store = AnimationStore::new();
        store.insert("a", (*timeline(&[0.5, 0.5], true)).clone());
        store.insert("b", (*timeline(&[0.5], true)).clone());
        let mut anim = Animator::new("a", &store).unwrap();
        anim.advance(0.75);
        assert_eq!(anim.player().frame_index(), 1);
        assert!(anim.set_key("b", &store));
        assert_eq!(anim.key(), "b");
        assert_eq!(anim.player().frame_index(), 0);
        assert_eq!(anim.player().elapsed(), 0.0);
    }

    #[test]
    fn test_set_same_key_keeps_progress() {
        let mut store = AnimationStore::new();
        store.insert("a", (*timeline(&[0.5, 0.5], true)).clone());
        let mut anim = Animator::new("a", &store).unwrap();
        anim.advance(0.75);
        assert!(!anim.set_key("a", &store));
        assert_eq!(anim.player().frame_index(), 1);
    }

    #[test]
    fn test_set_unknown_key_is_ignored() {
        let mut store = AnimationStore::new();
        store.insert("a", (*timeline(&[0.5], true)).clone());
        let mut anim = Animator::new("a", &store).unwrap();
        assert!(!anim.set_key("missing", &store));
        assert_eq!(anim.key(), "a");
    }
}
