//! State shared by every screen.
//!
//! The [`ScreenManager`](crate::screens::manager::ScreenManager) owns the one
//! [`GameContext`]; screens borrow it through
//! [`ScreenContext`](crate::screens::ScreenContext) for the duration of a
//! hook. It is also exactly what the save file contains.

use serde::{Deserialize, Serialize};

use crate::components::crop::CropKind;
use crate::components::tree::APPLE_SLOTS;
use crate::resources::inventory::{Inventory, Item};
use crate::resources::tilegrid::{GridCoord, TileChange};

pub const MAX_ENERGY: u32 = 100;
pub const STARTING_GOLD: u32 = 20;
pub const STARTING_SEEDS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSave {
    pub kind: CropKind,
    pub coord: GridCoord,
    pub age: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSave {
    pub coord: GridCoord,
    pub health: u8,
    pub apples: [bool; APPLE_SLOTS],
}

/// Everything about the farm that differs from the level file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmSnapshot {
    pub tiles: Vec<TileChange>,
    pub crops: Vec<CropSave>,
    pub trees: Vec<TreeSave>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameContext {
    pub inventory: Inventory,
    pub gold: u32,
    pub day: u32,
    pub energy: u32,
    pub raining: bool,
    /// Farm state carried between level sessions; `None` for a fresh farm.
    pub farm: Option<FarmSnapshot>,
}

impl Default for GameContext {
    fn default() -> Self {
        GameContext::new_game()
    }
}

impl GameContext {
    /// Starting state of a new game.
    pub fn new_game() -> Self {
        let mut inventory = Inventory::new();
        inventory.add(Item::Hoe, 1);
        inventory.add(Item::Axe, 1);
        inventory.add(Item::WateringCan, 1);
        for kind in CropKind::ALL {
            inventory.add(Item::Seed(kind), STARTING_SEEDS);
        }
        GameContext {
            inventory,
            gold: STARTING_GOLD,
            day: 1,
            energy: MAX_ENERGY,
            raining: false,
            farm: None,
        }
    }

    /// Spend energy on a tool swing. Returns `false` when exhausted.
    pub fn spend_energy(&mut self, amount: u32) -> bool {
        if self.energy == 0 {
            return false;
        }
        self.energy = self.energy.saturating_sub(amount);
        true
    }
}
