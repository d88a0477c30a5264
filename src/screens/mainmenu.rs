//! Title screen: new game, continue from the save, quit.

use log::info;

use crate::components::mapposition::Vec2;
use crate::resources::gamecontext::GameContext;
use crate::resources::input::InputSnapshot;
use crate::resources::renderframe::{Color, RenderFrame};
use crate::screens::menu::Menu;
use crate::screens::{LEVEL, Screen, ScreenContext, ScreenId};

pub struct MainMenuScreen {
    menu: Menu,
}

impl MainMenuScreen {
    pub fn new() -> Self {
        MainMenuScreen {
            menu: Menu::new(
                &[("new", "New game"), ("continue", "Continue"), ("quit", "Quit")],
                Vec2::new(80.0, 260.0),
                32.0,
                48.0,
            ),
        }
    }
}

impl Default for MainMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for MainMenuScreen {
    fn activate(&mut self, _from: Option<&ScreenId>, ctx: &mut ScreenContext<'_>) {
        self.menu.set_enabled("continue", ctx.has_save());
        self.menu.reset();
    }

    fn deactivate(&mut self, _to: &ScreenId, _ctx: &mut ScreenContext<'_>) {}

    fn update(&mut self, _dt: f32, input: &InputSnapshot, ctx: &mut ScreenContext<'_>) {
        let Some(choice) = self.menu.handle_input(input) else {
            return;
        };
        ctx.audio.play_fx("interact");
        match choice.as_str() {
            "new" => {
                info!("Starting a new game");
                *ctx.game = GameContext::new_game();
                let _ = ctx.request_transition(LEVEL);
            }
            "continue" => {
                if ctx.load_game() {
                    info!("Continuing saved game on day {}", ctx.game.day);
                    let _ = ctx.request_transition(LEVEL);
                } else {
                    self.menu.set_enabled("continue", false);
                }
            }
            "quit" => ctx.request_quit(),
            _ => {}
        }
    }

    fn render(&mut self, _ctx: &ScreenContext<'_>, frame: &mut RenderFrame) {
        frame.clear = Color::rgb(34, 52, 38);
        frame.text("Dew Valley", 80.0, 120.0, 64.0, Color::GOLD);
        self.menu.render(frame);
        frame.text(
            "arrows move, enter selects",
            80.0,
            frame.viewport.y - 60.0,
            18.0,
            Color::rgb(180, 180, 180),
        );
    }
}
