//! raylib window frontend.
//!
//! Keyboard bindings:
//!
//! | Action      | Keys             |
//! |-------------|------------------|
//! | move        | WASD, arrows     |
//! | use tool    | Space            |
//! | interact    | F                |
//! | prev / next | Q / E            |
//! | confirm     | Enter            |
//! | back        | Esc              |
//! | debug       | F11              |
//!
//! Every frame image is loaded when the window opens. A missing timeline
//! frame fails startup; a missing decoration only warns and draws as a
//! magenta square so it is easy to spot.

use raylib::consts::BlendMode as RlBlend;
use raylib::ffi::KeyboardKey;
use raylib::prelude::*;
use rustc_hash::FxHashMap;
use log::{info, warn};

use crate::error::{GameError, GameResult};

use crate::components::mapposition::Vec2;
use crate::frontend::Platform;
use crate::resources::animationstore::{AnimationStore, FrameId};
use crate::resources::assets::FsAssets;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{Action, InputSnapshot};
use crate::resources::renderframe::{self, BlendMode, DrawCmd, RenderFrame, Space};
use crate::systems::render::{decoration_frames, timeline_frames};

fn bindings(action: Action) -> &'static [KeyboardKey] {
    use KeyboardKey::*;
    match action {
        Action::Up => &[KEY_W, KEY_UP],
        Action::Down => &[KEY_S, KEY_DOWN],
        Action::Left => &[KEY_A, KEY_LEFT],
        Action::Right => &[KEY_D, KEY_RIGHT],
        Action::UseTool => &[KEY_SPACE],
        Action::Interact => &[KEY_F],
        Action::NextItem => &[KEY_E],
        Action::PrevItem => &[KEY_Q],
        Action::Confirm => &[KEY_ENTER],
        Action::Back => &[KEY_ESCAPE],
        Action::ToggleDebug => &[KEY_F11],
    }
}

fn color(c: renderframe::Color) -> Color {
    Color::new(c.r, c.g, c.b, c.a)
}

fn v2(v: Vec2) -> Vector2 {
    Vector2 { x: v.x, y: v.y }
}

pub struct WindowPlatform {
    rl: RaylibHandle,
    thread: RaylibThread,
    textures: FxHashMap<FrameId, Texture2D>,
    previous: InputSnapshot,
}

impl WindowPlatform {
    pub fn open(config: &GameConfig, store: &AnimationStore) -> GameResult<Self> {
        let mut builder = raylib::init();
        builder
            .size(config.window_width as i32, config.window_height as i32)
            .title("Dew Valley")
            .resizable();
        if config.vsync {
            builder.vsync();
        }
        if config.fullscreen {
            builder.fullscreen();
        }
        let (mut rl, thread) = builder.build();
        rl.set_target_fps(config.target_fps);
        // Esc is a game button here.
        rl.set_exit_key(None);
        info!(
            "Window opened {}x{}",
            rl.get_screen_width(),
            rl.get_screen_height()
        );
        let mut platform = WindowPlatform {
            rl,
            thread,
            textures: FxHashMap::default(),
            previous: InputSnapshot::default(),
        };
        platform.preload(&FsAssets::new(config.assets_dir.clone()), store)?;
        Ok(platform)
    }

    fn preload(&mut self, assets: &FsAssets, store: &AnimationStore) -> GameResult<()> {
        for id in timeline_frames(store) {
            let path = assets.frame_path(&id);
            let texture = self
                .rl
                .load_texture(&self.thread, &path.to_string_lossy())
                .map_err(|e| GameError::asset(&path, e))?;
            self.textures.insert(id, texture);
        }
        for id in decoration_frames() {
            if self.textures.contains_key(&id) {
                continue;
            }
            let path = assets.frame_path(&id);
            match self.rl.load_texture(&self.thread, &path.to_string_lossy()) {
                Ok(texture) => {
                    self.textures.insert(id, texture);
                }
                Err(e) => warn!("Could not load '{}': {}", path.display(), e),
            }
        }
        info!("Loaded {} textures", self.textures.len());
        Ok(())
    }
}

impl Platform for WindowPlatform {
    fn begin_frame(&mut self) -> f32 {
        self.rl.get_frame_time()
    }

    fn poll_input(&mut self) -> InputSnapshot {
        let mut snapshot = InputSnapshot::new();
        for action in Action::ALL {
            let down = bindings(action).iter().any(|k| self.rl.is_key_down(*k));
            snapshot.update_from(&self.previous, action, down);
        }
        let mouse = self.rl.get_mouse_position();
        snapshot.pointer = Some(Vec2::new(mouse.x, mouse.y));
        self.previous = snapshot.clone();
        snapshot
    }

    fn present(&mut self, frame: &RenderFrame) {
        let (w, h) = (self.rl.get_screen_width(), self.rl.get_screen_height());
        let textures = &self.textures;
        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(color(frame.clear));
        for item in frame.sorted() {
            let offset = match item.space {
                Space::World => frame.camera,
                Space::Screen => Vec2::ZERO,
            };
            match &item.cmd {
                DrawCmd::Sprite { frame: id, pos, tint } => {
                    let at = v2(*pos - offset);
                    match textures.get(id) {
                        Some(texture) => d.draw_texture_v(texture, at, color(*tint)),
                        None => d.draw_rectangle_v(at, Vector2 { x: 16.0, y: 16.0 }, Color::MAGENTA),
                    }
                }
                DrawCmd::Rect {
                    pos,
                    size,
                    color: c,
                    filled,
                } => {
                    let at = *pos - offset;
                    if *filled {
                        d.draw_rectangle_v(v2(at), v2(*size), color(*c));
                    } else {
                        d.draw_rectangle_lines(
                            at.x as i32,
                            at.y as i32,
                            size.x as i32,
                            size.y as i32,
                            color(*c),
                        );
                    }
                }
                DrawCmd::Text {
                    text,
                    pos,
                    size,
                    color: c,
                } => {
                    let at = *pos - offset;
                    d.draw_text(text, at.x as i32, at.y as i32, *size as i32, color(*c));
                }
                DrawCmd::Fill { color: c, mode } => match mode {
                    BlendMode::Alpha => d.draw_rectangle(0, 0, w, h, color(*c)),
                    BlendMode::Multiply => {
                        let mut blend = d.begin_blend_mode(RlBlend::BLEND_MULTIPLIED);
                        blend.draw_rectangle(0, 0, w, h, color(*c));
                    }
                },
            }
        }
    }

    fn should_close(&self) -> bool {
        self.rl.window_should_close()
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(
            self.rl.get_screen_width() as f32,
            self.rl.get_screen_height() as f32,
        )
    }
}
