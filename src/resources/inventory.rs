//! Player inventory and the trader's price list.
//!
//! The inventory keeps one slot per item kind in pickup order. Tools and
//! seeds form the selectable hotbar; produce only piles up until it is sold.

use serde::{Deserialize, Serialize};

use crate::components::actor::Tool;
use crate::components::crop::CropKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    Hoe,
    Axe,
    WateringCan,
    Seed(CropKind),
    Produce(CropKind),
    Apple,
    Wood,
}

impl Item {
    pub fn name(self) -> String {
        match self {
            Item::Hoe => "hoe".into(),
            Item::Axe => "axe".into(),
            Item::WateringCan => "watering can".into(),
            Item::Seed(kind) => format!("{} seed", kind.name()),
            Item::Produce(kind) => kind.name().into(),
            Item::Apple => "apple".into(),
            Item::Wood => "wood".into(),
        }
    }

    /// Tool this item swings when used, if any.
    pub fn tool(self) -> Option<Tool> {
        match self {
            Item::Hoe => Some(Tool::Hoe),
            Item::Axe => Some(Tool::Axe),
            Item::WateringCan => Some(Tool::WateringCan),
            Item::Seed(kind) => Some(Tool::Seed(kind)),
            _ => None,
        }
    }

    pub fn is_tool(self) -> bool {
        matches!(self, Item::Hoe | Item::Axe | Item::WateringCan)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub item: Item,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<InventorySlot>,
    /// Index into `slots`; always a usable slot when one exists.
    selected: usize,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn count(&self, item: Item) -> u32 {
        self.slots
            .iter()
            .find(|s| s.item == item)
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    pub fn has(&self, item: Item, quantity: u32) -> bool {
        self.count(item) >= quantity
    }

    /// Add `quantity` of `item`. Tools are unique and stay at one.
    pub fn add(&mut self, item: Item, quantity: u32) {
        match self.slots.iter_mut().find(|s| s.item == item) {
            Some(slot) if item.is_tool() => slot.quantity = 1,
            Some(slot) => slot.quantity = slot.quantity.saturating_add(quantity),
            None => self.slots.push(InventorySlot {
                item,
                quantity: if item.is_tool() { 1 } else { quantity },
            }),
        }
        if !self.is_usable(self.selected) {
            self.select_next();
        }
    }

    /// Remove `quantity` of `item`. Returns `false` and changes nothing if
    /// there is not enough. Tools are never taken.
    pub fn take(&mut self, item: Item, quantity: u32) -> bool {
        if item.is_tool() {
            return self.has(item, 1);
        }
        match self.slots.iter_mut().find(|s| s.item == item) {
            Some(slot) if slot.quantity >= quantity => {
                slot.quantity -= quantity;
                true
            }
            _ => false,
        }
    }

    fn is_usable(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .is_some_and(|s| s.item.tool().is_some() && s.quantity > 0)
    }

    /// Item in the selected hotbar slot, if it can currently be used.
    pub fn selected(&self) -> Option<Item> {
        self.is_usable(self.selected).then(|| self.slots[self.selected].item)
    }

    /// Tool for the selected slot, if it can currently be used.
    pub fn selected_tool(&self) -> Option<Tool> {
        self.selected().and_then(Item::tool)
    }

    fn cycle(&mut self, forward: bool) -> Option<Item> {
        let len = self.slots.len();
        for step in 1..=len {
            let i = if forward {
                (self.selected + step) % len
            } else {
                (self.selected + len * step - step) % len
            };
            if self.is_usable(i) {
                self.selected = i;
                return Some(self.slots[i].item);
            }
        }
        None
    }

    pub fn select_next(&mut self) -> Option<Item> {
        self.cycle(true)
    }

    pub fn select_previous(&mut self) -> Option<Item> {
        self.cycle(false)
    }
}

/// Result of a shop trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOutcome {
    Done,
    NotEnoughGold,
    NothingToSell,
    NotForSale,
}

/// Fixed trader prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShopCatalog;

impl ShopCatalog {
    pub const STOCK: [Item; 2] = [Item::Seed(CropKind::Corn), Item::Seed(CropKind::Tomato)];
    pub const WANTED: [Item; 4] = [
        Item::Produce(CropKind::Corn),
        Item::Produce(CropKind::Tomato),
        Item::Apple,
        Item::Wood,
    ];

    pub fn buy_price(item: Item) -> Option<u32> {
        match item {
            Item::Seed(CropKind::Corn) => Some(4),
            Item::Seed(CropKind::Tomato) => Some(5),
            _ => None,
        }
    }

    pub fn sell_price(item: Item) -> Option<u32> {
        match item {
            Item::Produce(CropKind::Corn) => Some(10),
            Item::Produce(CropKind::Tomato) => Some(20),
            Item::Apple => Some(5),
            Item::Wood => Some(4),
            _ => None,
        }
    }

    /// Buy one `item`.
    pub fn buy(item: Item, inventory: &mut Inventory, gold: &mut u32) -> TradeOutcome {
        let Some(price) = Self::buy_price(item) else {
            return TradeOutcome::NotForSale;
        };
        if *gold < price {
            return TradeOutcome::NotEnoughGold;
        }
        *gold -= price;
        inventory.add(item, 1);
        TradeOutcome::Done
    }

    /// Sell one `item`.
    pub fn sell(item: Item, inventory: &mut Inventory, gold: &mut u32) -> TradeOutcome {
        let Some(price) = Self::sell_price(item) else {
            return TradeOutcome::NotForSale;
        };
        if !inventory.take(item, 1) {
            return TradeOutcome::NothingToSell;
        }
        *gold = gold.saturating_add(price);
        TradeOutcome::Done
    }
}
