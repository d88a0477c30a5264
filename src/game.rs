//! Startup and shutdown.
//!
//! [`load_content`] reads the animation manifest and the farm level through
//! [`FsAssets`]; [`build_manager`] registers every screen around them; and
//! [`run`] wires audio and a frontend to the result and drives the loop.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::components::actor::required_animation_keys;
use crate::components::crop::CropKind;
use crate::components::mapposition::Vec2;
use crate::error::{GameError, GameResult};
use crate::frontend::headless::HeadlessPlatform;
use crate::frontend::{Platform, run_loop};
use crate::resources::animationstore::AnimationStore;
use crate::resources::assets::{AssetLoader, FsAssets, LevelTemplate};
use crate::resources::audio::{AudioBridge, AudioHandle, SOUND_IDS, setup_headless_audio, shutdown_audio};
use crate::resources::gamecontext::GameContext;
use crate::resources::gameconfig::GameConfig;
use crate::resources::persistence::{JsonSaveStore, Persistence};
use crate::screens::level::LevelScreen;
use crate::screens::mainmenu::MainMenuScreen;
use crate::screens::manager::ScreenManager;
use crate::screens::paused::PausedScreen;
use crate::screens::shop::ShopScreen;
use crate::screens::{LEVEL, MAIN_MENU, PAUSED, SHOP};

pub const ANIMATIONS_PATH: &str = "animations.json";
pub const LEVEL_PATH: &str = "levels/farm.json";
/// How long startup waits for the audio thread to report on its sounds.
const SOUND_LOAD_TIMEOUT: Duration = Duration::from_secs(2);

/// Timelines the game cannot run without.
pub fn required_keys() -> Vec<String> {
    let mut keys = required_animation_keys();
    keys.extend(CropKind::ALL.iter().map(|k| k.stages_key()));
    keys
}

/// Load and validate everything the screens need from disk.
pub fn load_content(assets: &dyn AssetLoader) -> GameResult<(AnimationStore, LevelTemplate)> {
    let store = assets.load_animations(ANIMATIONS_PATH)?;
    let keys = required_keys();
    store.require(keys.iter().map(String::as_str))?;
    for optional in ["water", "rain_floor", "rain_drops", "tree_small", "tree_large"] {
        if !store.contains(optional) {
            warn!("Animation '{}' is missing; it will not be drawn", optional);
        }
    }
    let level = assets.load_tileset(LEVEL_PATH)?;
    Ok((store, level))
}

/// Register every screen and start on `start`.
pub fn build_manager(
    store: AnimationStore,
    level: LevelTemplate,
    audio: AudioHandle,
    persistence: Box<dyn Persistence>,
    start: &str,
) -> GameResult<ScreenManager> {
    let mut manager = ScreenManager::new(GameContext::new_game(), audio, persistence);
    manager.register(MAIN_MENU, Box::new(MainMenuScreen::new()))?;
    manager.register(LEVEL, Box::new(LevelScreen::new(level, Arc::new(store))))?;
    manager.register(SHOP, Box::new(ShopScreen::new()))?;
    manager.register(PAUSED, Box::new(PausedScreen::new()))?;
    manager.start(start).map_err(|e| match e {
        GameError::UnknownScreen(id) => {
            GameError::config(format!("start screen '{}' is not registered", id))
        }
        other => other,
    })?;
    Ok(manager)
}

fn start_audio(config: &GameConfig, headless: bool, assets: &FsAssets) -> Option<AudioBridge> {
    if !config.audio_enabled {
        info!("Audio disabled in config");
        return None;
    }
    let bridge = if headless {
        setup_headless_audio()
    } else {
        window_audio()
    };
    for id in SOUND_IDS {
        bridge.load_fx(id, &assets.sound_path(id).to_string_lossy());
    }
    let failed = bridge.await_loads(SOUND_IDS.len(), SOUND_LOAD_TIMEOUT);
    info!("{} of {} sounds loaded", SOUND_IDS.len() - failed, SOUND_IDS.len());
    Some(bridge)
}

#[cfg(feature = "window")]
fn window_audio() -> AudioBridge {
    crate::resources::audio::setup_audio(crate::systems::audio::raylib_audio_thread)
}

#[cfg(not(feature = "window"))]
fn window_audio() -> AudioBridge {
    setup_headless_audio()
}

fn open_platform(
    config: &GameConfig,
    store: &AnimationStore,
    headless: bool,
    frames: Option<u64>,
) -> GameResult<Box<dyn Platform>> {
    let viewport = Vec2::new(config.window_width as f32, config.window_height as f32);
    if headless {
        let platform = HeadlessPlatform::new(config.fixed_delta(), viewport, frames).paced(frames.is_none());
        return Ok(Box::new(platform));
    }
    open_window(config, store)
}

#[cfg(feature = "window")]
fn open_window(config: &GameConfig, store: &AnimationStore) -> GameResult<Box<dyn Platform>> {
    Ok(Box::new(crate::frontend::window::WindowPlatform::open(config, store)?))
}

#[cfg(not(feature = "window"))]
fn open_window(_config: &GameConfig, _store: &AnimationStore) -> GameResult<Box<dyn Platform>> {
    Err(GameError::config(
        "built without the `window` feature; run with --headless",
    ))
}

/// Run the game until the window closes, the player quits or `frames`
/// frames have passed (headless only).
pub fn run(config: &GameConfig, headless: bool, frames: Option<u64>) -> GameResult<()> {
    let assets = FsAssets::new(config.assets_dir.clone());
    let (store, level) = load_content(&assets)?;
    // The window must exist before raylib can load textures or sounds.
    let mut platform = open_platform(config, &store, headless, frames)?;
    let bridge = start_audio(config, headless, &assets);
    let audio = bridge.as_ref().map_or_else(AudioHandle::disabled, AudioBridge::handle);
    let persistence = Box::new(JsonSaveStore::new(config.save_path.clone()));

    let result = build_manager(store, level, audio, persistence, &config.start_screen).map(|mut manager| {
        manager.set_debug(config.debug);
        run_loop(platform.as_mut(), &mut manager)
    });

    if let Some(bridge) = bridge {
        bridge.drain_messages();
        shutdown_audio(bridge);
    }
    result.map(|frames| info!("Ran {} frames", frames))
}
