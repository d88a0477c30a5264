//! Axis-aligned collision box attached to an entity position.

use bevy_ecs::prelude::Component;

use crate::components::mapposition::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Hitbox {
    pub size: Vec2,
    /// Top-left corner relative to the entity position.
    pub offset: Vec2,
}

impl Hitbox {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Returns (min, max) of the box for a given entity position.
    pub fn aabb(&self, position: Vec2) -> (Vec2, Vec2) {
        let min = position + self.offset;
        (min, min + self.size)
    }

    pub fn center(&self, position: Vec2) -> Vec2 {
        position + self.offset + self.size * 0.5
    }

    /// Overlap test against another box at a different position. Touching
    /// edges do not overlap.
    pub fn overlaps(&self, position: Vec2, other: &Self, other_position: Vec2) -> bool {
        let (min_a, max_a) = self.aabb(position);
        let (min_b, max_b) = other.aabb(other_position);
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }

    pub fn contains_point(&self, position: Vec2, point: Vec2) -> bool {
        let (min, max) = self.aabb(position);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = Hitbox::new(1.0, 1.0);
        assert!(!a.overlaps(Vec2::new(0.0, 0.0), &a, Vec2::new(1.0, 0.0)));
        assert!(a.overlaps(Vec2::new(0.0, 0.0), &a, Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_offset_moves_center() {
        let hb = Hitbox::new(2.0, 2.0).with_offset(Vec2::new(1.0, 3.0));
        assert_eq!(hb.center(Vec2::new(10.0, 10.0)), Vec2::new(12.0, 14.0));
        assert!(hb.contains_point(Vec2::new(10.0, 10.0), Vec2::new(11.0, 13.0)));
    }
}
