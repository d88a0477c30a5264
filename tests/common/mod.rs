//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use dewvalley::components::mapposition::Vec2;
use dewvalley::game::required_keys;
use dewvalley::resources::animationstore::{AnimationStore, FrameId, Timeline};
use dewvalley::resources::assets::{LevelTemplate, parse_level};
use dewvalley::resources::audio::AudioHandle;
use dewvalley::resources::gamecontext::GameContext;
use dewvalley::resources::input::{Action, InputSnapshot};
use dewvalley::resources::persistence::Persistence;
use dewvalley::resources::renderframe::RenderFrame;
use dewvalley::screens::level::LevelScreen;
use dewvalley::screens::mainmenu::MainMenuScreen;
use dewvalley::screens::manager::ScreenManager;
use dewvalley::screens::paused::PausedScreen;
use dewvalley::screens::shop::ShopScreen;
use dewvalley::screens::{LEVEL, MAIN_MENU, PAUSED, SHOP};

pub const DT: f32 = 1.0 / 60.0;

/// Every timeline the game needs, two frames of 0.1 s each. Walking and
/// idle loop; tool swings, hurt and crop strips play once. Crops get four
/// stages.
pub fn store() -> AnimationStore {
    let mut store = AnimationStore::new();
    for key in required_keys() {
        let looped = key.ends_with("_idle") || !key.contains('_');
        let count = if key.starts_with("crop_") { 4 } else { 2 };
        let frames = (0..count)
            .map(|i| FrameId::new(format!("{}/{}", key, i)))
            .collect();
        store.insert(key, Timeline::uniform(frames, 0.1, looped).unwrap());
    }
    for key in ["water", "rain_floor", "rain_drops", "tree_small", "tree_large", "stump_small"] {
        let frames = vec![FrameId::new(format!("{}/0", key))];
        store.insert(key, Timeline::uniform(frames, 0.25, true).unwrap());
    }
    store
}

/// 10x8 farm. The player starts on (4, 3) above open grass; the bed is two
/// tiles below at (4, 5) and the trader at (7, 5).
pub const FARM_ROWS: [&str; 8] = [
    "##########",
    "#gggggggg#",
    "#gggggggg#",
    "#ggg@gggg#",
    "#gggggggg#",
    "#T..B..$.#",
    "#~~..*...#",
    "##########",
];

/// Level file text for [`FARM_ROWS`].
pub fn farm_json() -> String {
    serde_json::json!({ "name": "test farm", "tile_size": 64, "rows": FARM_ROWS }).to_string()
}

pub fn level() -> LevelTemplate {
    parse_level(&farm_json(), "farm.json").unwrap()
}

/// Manager with every screen registered, started on `start`.
pub fn manager(start: &str, persistence: Box<dyn Persistence>) -> ScreenManager {
    let mut m = ScreenManager::new(GameContext::new_game(), AudioHandle::disabled(), persistence);
    m.register(MAIN_MENU, Box::new(MainMenuScreen::new())).unwrap();
    m.register(
        LEVEL,
        Box::new(LevelScreen::new(level(), Arc::new(store())).with_seed(11)),
    )
    .unwrap();
    m.register(SHOP, Box::new(ShopScreen::new())).unwrap();
    m.register(PAUSED, Box::new(PausedScreen::new())).unwrap();
    m.start(start).unwrap();
    m
}

pub fn frame() -> RenderFrame {
    RenderFrame::new(Vec2::new(800.0, 600.0))
}

pub fn tick(m: &mut ScreenManager, input: InputSnapshot) -> RenderFrame {
    let mut f = frame();
    m.tick(DT, &input, &mut f);
    f
}

pub fn press(m: &mut ScreenManager, action: Action) -> RenderFrame {
    tick(m, InputSnapshot::new().with_pressed(action))
}

pub fn hold(m: &mut ScreenManager, action: Action, ticks: usize) {
    for _ in 0..ticks {
        tick(m, InputSnapshot::new().with_held(action));
    }
}

pub fn idle(m: &mut ScreenManager, ticks: usize) {
    for _ in 0..ticks {
        tick(m, InputSnapshot::new());
    }
}
