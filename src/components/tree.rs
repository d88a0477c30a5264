//! Fruit trees.
//!
//! Trees block their tile, carry up to [`MAX_APPLES`] apples in fixed slots
//! and take [`TREE_HEALTH`] axe hits before only a stump is left.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::mapposition::Vec2;
use crate::resources::tilegrid::GridCoord;

pub const TREE_HEALTH: u8 = 5;
pub const MAX_APPLES: usize = 3;
pub const APPLE_SLOTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeSize {
    Small,
    Large,
}

impl TreeSize {
    pub fn name(self) -> &'static str {
        match self {
            TreeSize::Small => "small",
            TreeSize::Large => "large",
        }
    }

    /// Size of the tree sprite in world units. The sprite's bottom edge sits
    /// on the bottom of the tree's tile, centred on it.
    pub fn sprite_size(self) -> Vec2 {
        match self {
            TreeSize::Small => Vec2::new(64.0, 80.0),
            TreeSize::Large => Vec2::new(96.0, 128.0),
        }
    }

    /// Apple positions relative to the tree sprite's top-left corner.
    pub fn apple_slots(self) -> [Vec2; APPLE_SLOTS] {
        let raw: [(f32, f32); APPLE_SLOTS] = match self {
            TreeSize::Small => [(18., 17.), (30., 37.), (12., 50.), (30., 45.), (20., 30.), (30., 10.)],
            TreeSize::Large => [(30., 24.), (60., 65.), (50., 50.), (16., 40.), (45., 50.), (42., 70.)],
        };
        raw.map(|(x, y)| Vec2::new(x, y))
    }
}

/// Result of one axe hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chop {
    /// Nothing left to chop.
    Stump,
    Hit,
    /// This hit felled the tree; carries how many apples fell with it.
    Felled { apples: u32 },
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Tree {
    pub size: TreeSize,
    pub coord: GridCoord,
    pub health: u8,
    pub apples: [bool; APPLE_SLOTS],
}

impl Tree {
    pub fn new(size: TreeSize, coord: GridCoord) -> Self {
        Tree {
            size,
            coord,
            health: TREE_HEALTH,
            apples: [false; APPLE_SLOTS],
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn apple_count(&self) -> usize {
        self.apples.iter().filter(|a| **a).count()
    }

    /// Animation key for the current look of the tree.
    pub fn sprite_key(&self) -> String {
        if self.is_alive() {
            format!("tree_{}", self.size.name())
        } else {
            format!("stump_{}", self.size.name())
        }
    }

    pub fn chop(&mut self) -> Chop {
        if !self.is_alive() {
            return Chop::Stump;
        }
        self.health -= 1;
        if self.health > 0 {
            return Chop::Hit;
        }
        let apples = self.apple_count() as u32;
        self.apples = [false; APPLE_SLOTS];
        Chop::Felled { apples }
    }

    /// Remove one apple. Returns `false` if the tree has none.
    pub fn pick_apple(&mut self) -> bool {
        match self.apples.iter_mut().find(|a| **a) {
            Some(slot) => {
                *slot = false;
                true
            }
            None => false,
        }
    }

    /// Overnight regrowth: every empty slot has a 2 in 11 chance, up to
    /// [`MAX_APPLES`] in total. Stumps grow nothing.
    pub fn regrow_apples(&mut self, rng: &mut fastrand::Rng) -> usize {
        if !self.is_alive() {
            return 0;
        }
        let mut grown = 0;
        for i in 0..APPLE_SLOTS {
            if self.apple_count() >= MAX_APPLES {
                break;
            }
            if !self.apples[i] && rng.u32(0..=10) < 2 {
                self.apples[i] = true;
                grown += 1;
            }
        }
        grown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_hits_fell_tree_with_apples() {
        let mut tree = Tree::new(TreeSize::Small, GridCoord::new(1, 1));
        tree.apples[0] = true;
        tree.apples[4] = true;
        for _ in 0..4 {
            assert_eq!(tree.chop(), Chop::Hit);
        }
        assert_eq!(tree.chop(), Chop::Felled { apples: 2 });
        assert_eq!(tree.chop(), Chop::Stump);
        assert_eq!(tree.sprite_key(), "stump_small");
    }

    #[test]
    fn test_regrow_never_exceeds_max() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut tree = Tree::new(TreeSize::Large, GridCoord::new(0, 0));
        for _ in 0..50 {
            tree.regrow_apples(&mut rng);
            assert!(tree.apple_count() <= MAX_APPLES);
        }
        assert_eq!(tree.apple_count(), MAX_APPLES);
    }

    #[test]
    fn test_pick_apple_empties_slot() {
        let mut tree = Tree::new(TreeSize::Small, GridCoord::new(0, 0));
        assert!(!tree.pick_apple());
        tree.apples[2] = true;
        assert!(tree.pick_apple());
        assert_eq!(tree.apple_count(), 0);
    }
}
