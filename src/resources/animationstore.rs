//! Animation resource registry.
//!
//! A [`Timeline`] is immutable frame data: an ordered list of frame ids, a
//! duration for each frame and a loop flag. Timelines are validated once when
//! they are built and then shared read-only through `Arc` by every entity that
//! plays them. Per-entity playback state lives in
//! [`TimelinePlayer`](crate::components::animation::TimelinePlayer).

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::error::{GameError, GameResult};

/// Identifier of a single frame image, usually its path relative to the
/// assets directory without extension (e.g. `character/down_idle/0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(Arc<str>);

impl FrameId {
    pub fn new(id: impl AsRef<str>) -> Self {
        FrameId(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameId {
    fn from(value: &str) -> Self {
        FrameId::new(value)
    }
}

/// How long each frame of a timeline is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameDurations {
    /// Every frame is shown for the same number of seconds.
    Uniform(f32),
    /// One entry per frame, in seconds.
    PerFrame(Vec<f32>),
}

/// Immutable, validated animation data.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    frames: Vec<FrameId>,
    durations: Vec<f32>,
    looped: bool,
    total: f32,
}

impl Timeline {
    /// Build a timeline, rejecting empty frame lists and durations that are
    /// not strictly positive and finite.
    pub fn new(frames: Vec<FrameId>, durations: FrameDurations, looped: bool) -> GameResult<Self> {
        if frames.is_empty() {
            return Err(GameError::config("timeline has no frames"));
        }
        let durations = match durations {
            FrameDurations::Uniform(d) => vec![d; frames.len()],
            FrameDurations::PerFrame(list) => {
                if list.len() != frames.len() {
                    return Err(GameError::config(format!(
                        "timeline has {} frames but {} durations",
                        frames.len(),
                        list.len()
                    )));
                }
                list
            }
        };
        if let Some((index, bad)) = durations
            .iter()
            .enumerate()
            .find(|(_, d)| !(d.is_finite() && **d > 0.0))
        {
            return Err(GameError::config(format!(
                "frame {} has invalid duration {}",
                index, bad
            )));
        }
        let total = durations.iter().sum();
        Ok(Timeline {
            frames,
            durations,
            looped,
            total,
        })
    }

    /// Convenience constructor for fixed-rate animations.
    pub fn uniform(frames: Vec<FrameId>, frame_duration: f32, looped: bool) -> GameResult<Self> {
        Timeline::new(frames, FrameDurations::Uniform(frame_duration), looped)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_index(&self) -> usize {
        self.frames.len() - 1
    }

    /// Frame id at `index`, clamped to the last frame.
    pub fn frame(&self, index: usize) -> &FrameId {
        &self.frames[index.min(self.last_index())]
    }

    /// Duration of the frame at `index`, clamped to the last frame.
    pub fn duration(&self, index: usize) -> f32 {
        self.durations[index.min(self.last_index())]
    }

    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    pub fn looped(&self) -> bool {
        self.looped
    }

    /// Sum of all frame durations.
    pub fn total_duration(&self) -> f32 {
        self.total
    }
}

/// Central registry of reusable timelines keyed by animation name.
#[derive(Resource, Debug, Default, Clone)]
pub struct AnimationStore {
    pub animations: FxHashMap<String, Arc<Timeline>>,
}

impl AnimationStore {
    pub fn new() -> Self {
        AnimationStore {
            animations: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, timeline: Timeline) {
        self.animations.insert(key.into(), Arc::new(timeline));
    }

    pub fn get(&self, key: &str) -> Option<&Arc<Timeline>> {
        self.animations.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.animations.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Fail with a [`GameError::Config`] naming every key that is missing.
    pub fn require<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> GameResult<()> {
        let mut missing: Vec<&str> = keys.into_iter().filter(|k| !self.contains(k)).collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort_unstable();
        Err(GameError::config(format!(
            "missing animations: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<FrameId> {
        (0..n).map(|i| FrameId::new(format!("f{}", i))).collect()
    }

    #[test]
    fn test_rejects_empty_sequence() {
        assert!(Timeline::uniform(Vec::new(), 0.1, true).is_err());
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        assert!(Timeline::uniform(frames(2), 0.0, true).is_err());
        assert!(Timeline::uniform(frames(2), -1.0, true).is_err());
        assert!(Timeline::uniform(frames(2), f32::NAN, true).is_err());
        let per_frame = FrameDurations::PerFrame(vec![0.2, 0.0]);
        assert!(Timeline::new(frames(2), per_frame, false).is_err());
    }

    #[test]
    fn test_rejects_mismatched_durations() {
        let per_frame = FrameDurations::PerFrame(vec![0.2]);
        assert!(Timeline::new(frames(3), per_frame, false).is_err());
    }

    #[test]
    fn test_per_frame_durations_and_total() {
        let per_frame = FrameDurations::PerFrame(vec![0.5, 0.25, 0.25]);
        let tl = Timeline::new(frames(3), per_frame, false).unwrap();
        assert_eq!(tl.duration(0), 0.5);
        assert_eq!(tl.duration(7), 0.25);
        assert_eq!(tl.total_duration(), 1.0);
        assert_eq!(tl.frame(9).as_str(), "f2");
    }

    #[test]
    fn test_require_lists_missing_keys() {
        let mut store = AnimationStore::new();
        store.insert("down_idle", Timeline::uniform(frames(1), 0.1, true).unwrap());
        assert!(store.require(["down_idle"]).is_ok());
        let err = store.require(["down_idle", "up", "left"]).unwrap_err();
        assert_eq!(err.to_string(), "configuration error: missing animations: left, up");
    }
}
