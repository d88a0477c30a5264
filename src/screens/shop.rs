//! Trader screen: buy seeds, sell produce. Back returns to the farm.

use log::debug;

use crate::components::mapposition::Vec2;
use crate::resources::input::{Action, InputSnapshot};
use crate::resources::inventory::{Item, ShopCatalog, TradeOutcome};
use crate::resources::renderframe::{Color, RenderFrame};
use crate::screens::{LEVEL, Screen, ScreenContext, ScreenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Offer {
    Buy(Item),
    Sell(Item),
}

pub struct ShopScreen {
    offers: Vec<Offer>,
    selected: usize,
    last_outcome: Option<TradeOutcome>,
}

impl ShopScreen {
    pub fn new() -> Self {
        let offers = ShopCatalog::STOCK
            .iter()
            .map(|i| Offer::Buy(*i))
            .chain(ShopCatalog::WANTED.iter().map(|i| Offer::Sell(*i)))
            .collect();
        ShopScreen {
            offers,
            selected: 0,
            last_outcome: None,
        }
    }

    fn trade(&mut self, ctx: &mut ScreenContext<'_>) {
        let game = &mut *ctx.game;
        let (outcome, sound) = match self.offers[self.selected] {
            Offer::Buy(item) => (ShopCatalog::buy(item, &mut game.inventory, &mut game.gold), "buy"),
            Offer::Sell(item) => (ShopCatalog::sell(item, &mut game.inventory, &mut game.gold), "sell"),
        };
        debug!("Trade {:?}: {:?}", self.offers[self.selected], outcome);
        if outcome == TradeOutcome::Done {
            ctx.audio.play_fx(sound);
        }
        self.last_outcome = Some(outcome);
    }
}

impl Default for ShopScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for ShopScreen {
    fn activate(&mut self, _from: Option<&ScreenId>, _ctx: &mut ScreenContext<'_>) {
        self.selected = 0;
        self.last_outcome = None;
    }

    fn deactivate(&mut self, _to: &ScreenId, _ctx: &mut ScreenContext<'_>) {}

    fn update(&mut self, _dt: f32, input: &InputSnapshot, ctx: &mut ScreenContext<'_>) {
        if input.just_pressed(Action::Back) {
            let _ = ctx.request_transition(LEVEL);
            return;
        }
        let len = self.offers.len();
        if input.just_pressed(Action::Up) {
            self.selected = (self.selected + len - 1) % len;
        }
        if input.just_pressed(Action::Down) {
            self.selected = (self.selected + 1) % len;
        }
        if input.just_pressed(Action::Confirm) || input.just_pressed(Action::UseTool) {
            self.trade(ctx);
        }
    }

    fn render(&mut self, ctx: &ScreenContext<'_>, frame: &mut RenderFrame) {
        frame.clear = Color::rgb(48, 36, 28);
        frame.text("Trader", 80.0, 60.0, 44.0, Color::GOLD);
        frame.text(format!("Gold: {}", ctx.game.gold), 80.0, 110.0, 24.0, Color::WHITE);

        let origin = Vec2::new(80.0, 170.0);
        for (i, offer) in self.offers.iter().enumerate() {
            let (label, color) = match offer {
                Offer::Buy(item) => (
                    format!(
                        "Buy  {:<12} {:>3}g   (have {})",
                        item.name(),
                        ShopCatalog::buy_price(*item).unwrap_or(0),
                        ctx.game.inventory.count(*item)
                    ),
                    Color::rgb(200, 230, 200),
                ),
                Offer::Sell(item) => (
                    format!(
                        "Sell {:<12} {:>3}g   (have {})",
                        item.name(),
                        ShopCatalog::sell_price(*item).unwrap_or(0),
                        ctx.game.inventory.count(*item)
                    ),
                    Color::rgb(230, 210, 180),
                ),
            };
            let color = if i == self.selected { Color::GOLD } else { color };
            let cursor = if i == self.selected { ">" } else { " " };
            frame.text(
                format!("{} {}", cursor, label),
                origin.x,
                origin.y + i as f32 * 36.0,
                24.0,
                color,
            );
        }

        if let Some(outcome) = self.last_outcome {
            let text = match outcome {
                TradeOutcome::Done => "Thank you!",
                TradeOutcome::NotEnoughGold => "Not enough gold.",
                TradeOutcome::NothingToSell => "You have none of those.",
                TradeOutcome::NotForSale => "I don't trade that.",
            };
            frame.text(text, 80.0, frame.viewport.y - 90.0, 22.0, Color::WHITE);
        }
        frame.text("esc: back to the farm", 80.0, frame.viewport.y - 50.0, 18.0, Color::rgb(170, 170, 170));
    }
}
