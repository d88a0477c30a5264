//! Pause menu over the farm.

use crate::components::mapposition::Vec2;
use crate::resources::input::{Action, InputSnapshot};
use crate::resources::renderframe::{BlendMode, Color, DrawCmd, RenderFrame, RenderLayer, Space};
use crate::screens::menu::Menu;
use crate::screens::{LEVEL, MAIN_MENU, Screen, ScreenContext, ScreenId};

/// Seconds the save result stays on screen.
const NOTICE_SECONDS: f32 = 2.0;

pub struct PausedScreen {
    menu: Menu,
    notice: Option<(String, f32)>,
}

impl PausedScreen {
    pub fn new() -> Self {
        PausedScreen {
            menu: Menu::new(
                &[("resume", "Resume"), ("save", "Save"), ("menu", "Quit to menu")],
                Vec2::new(100.0, 220.0),
                30.0,
                44.0,
            )
            .with_colors(Color::rgb(230, 230, 230), Color::GOLD),
            notice: None,
        }
    }
}

impl Default for PausedScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for PausedScreen {
    fn activate(&mut self, _from: Option<&ScreenId>, _ctx: &mut ScreenContext<'_>) {
        self.menu.reset();
        self.notice = None;
    }

    fn deactivate(&mut self, _to: &ScreenId, _ctx: &mut ScreenContext<'_>) {}

    fn update(&mut self, dt: f32, input: &InputSnapshot, ctx: &mut ScreenContext<'_>) {
        if let Some((_, left)) = &mut self.notice {
            *left -= dt;
            if *left <= 0.0 {
                self.notice = None;
            }
        }
        if input.just_pressed(Action::Back) {
            let _ = ctx.request_transition(LEVEL);
            return;
        }
        match self.menu.handle_input(input).as_deref() {
            Some("resume") => {
                let _ = ctx.request_transition(LEVEL);
            }
            Some("save") => {
                let text = if ctx.save_game() {
                    "Game saved"
                } else {
                    "Could not save"
                };
                self.notice = Some((text.to_string(), NOTICE_SECONDS));
            }
            Some("menu") => {
                let _ = ctx.request_transition(MAIN_MENU);
            }
            _ => {}
        }
    }

    fn render(&mut self, ctx: &ScreenContext<'_>, frame: &mut RenderFrame) {
        frame.clear = Color::rgb(20, 24, 32);
        frame.push(
            RenderLayer::Sky,
            0.0,
            Space::Screen,
            DrawCmd::Fill {
                color: Color::BLACK.with_alpha(120),
                mode: BlendMode::Alpha,
            },
        );
        frame.text("Paused", 100.0, 120.0, 48.0, Color::WHITE);
        frame.text(
            format!("Day {}   Gold {}", ctx.game.day, ctx.game.gold),
            100.0,
            170.0,
            22.0,
            Color::rgb(200, 200, 200),
        );
        self.menu.render(frame);
        if let Some((text, _)) = &self.notice {
            frame.text(text.clone(), 100.0, 380.0, 22.0, Color::GREEN);
        }
    }
}
