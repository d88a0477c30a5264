//! Planted crops.
//!
//! A crop sits on one planted tile and grows a fraction of a stage every
//! day its tile was watered. The crop's animation timeline holds one frame
//! per growth stage, so the last stage index is also its maturity.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::resources::tilegrid::GridCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropKind {
    Corn,
    Tomato,
}

impl CropKind {
    pub const ALL: [CropKind; 2] = [CropKind::Corn, CropKind::Tomato];

    pub fn name(self) -> &'static str {
        match self {
            CropKind::Corn => "corn",
            CropKind::Tomato => "tomato",
        }
    }

    /// Stages gained per watered day.
    pub fn grow_speed(self) -> f32 {
        match self {
            CropKind::Corn => 1.0,
            CropKind::Tomato => 0.7,
        }
    }

    /// How far the sprite is raised above its tile, in world units.
    pub fn y_offset(self) -> f32 {
        match self {
            CropKind::Corn => 16.0,
            CropKind::Tomato => 8.0,
        }
    }

    /// Animation key of the growth stage strip.
    pub fn stages_key(self) -> String {
        format!("crop_{}", self.name())
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Crop {
    pub kind: CropKind,
    pub coord: GridCoord,
    pub age: f32,
    pub max_age: f32,
}

impl Crop {
    /// New seedling. `stages` is the number of frames in the stage strip.
    pub fn new(kind: CropKind, coord: GridCoord, stages: usize) -> Self {
        Crop {
            kind,
            coord,
            age: 0.0,
            max_age: stages.saturating_sub(1) as f32,
        }
    }

    /// Grow by one day. Returns `true` if the visible stage changed.
    pub fn grow(&mut self) -> bool {
        let before = self.stage();
        self.age = (self.age + self.kind.grow_speed()).min(self.max_age);
        self.stage() != before
    }

    pub fn stage(&self) -> usize {
        self.age.floor() as usize
    }

    pub fn is_harvestable(&self) -> bool {
        self.age >= self.max_age
    }
}
