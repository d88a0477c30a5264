//! Static sprite component.
//!
//! A [`Sprite`] names the frame image to draw at the entity's
//! [`MapPosition`](crate::components::mapposition::MapPosition). Entities that
//! also carry an [`Animator`](crate::components::animation::Animator) draw the
//! animator's current frame instead of `frame`.

use bevy_ecs::prelude::Component;

use crate::components::mapposition::Vec2;
use crate::resources::animationstore::FrameId;
use crate::resources::renderframe::Color;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub frame: FrameId,
    /// Size in world units; used for culling and depth.
    pub size: Vec2,
    pub tint: Color,
}

impl Sprite {
    pub fn new(frame: impl Into<FrameId>, width: f32, height: f32) -> Self {
        Sprite {
            frame: frame.into(),
            size: Vec2::new(width, height),
            tint: Color::WHITE,
        }
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}
