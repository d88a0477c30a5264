//! Game configuration.
//!
//! Settings loaded from an INI configuration file. Defaults are safe to start
//! with, so a missing file or missing keys never stop the game.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 720
//! fullscreen = false
//! vsync = true
//! target_fps = 120
//!
//! [game]
//! assets_dir = assets
//! save_path = saves/save.json
//! start_screen = main_menu
//! debug = false
//!
//! [audio]
//! enabled = true
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::{Path, PathBuf};

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 120;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";
const DEFAULT_ASSETS_DIR: &str = "assets";
const DEFAULT_SAVE_PATH: &str = "saves/save.json";
const DEFAULT_START_SCREEN: &str = "main_menu";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second; also the headless fixed step.
    pub target_fps: u32,
    pub vsync: bool,
    pub fullscreen: bool,
    pub assets_dir: PathBuf,
    pub save_path: PathBuf,
    /// Screen id shown first.
    pub start_screen: String,
    /// Start with debug overlays on.
    pub debug: bool,
    pub audio_enabled: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            fullscreen: DEFAULT_FULLSCREEN,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            start_screen: DEFAULT_START_SCREEN.to_string(),
            debug: false,
            audio_enabled: true,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = (fps as u32).max(1);
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        // [game] section
        if let Some(dir) = config.get("game", "assets_dir") {
            self.assets_dir = PathBuf::from(dir);
        }
        if let Some(path) = config.get("game", "save_path") {
            self.save_path = PathBuf::from(path);
        }
        if let Some(screen) = config.get("game", "start_screen") {
            self.start_screen = screen;
        }
        if let Some(debug) = config.getbool("game", "debug").ok().flatten() {
            self.debug = debug;
        }

        // [audio] section
        if let Some(enabled) = config.getbool("audio", "enabled").ok().flatten() {
            self.audio_enabled = enabled;
        }

        info!(
            "Loaded config: {}x{} window, fps={}, vsync={}, fullscreen={}, assets={:?}, start={}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.fullscreen,
            self.assets_dir,
            self.start_screen
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        // [game] section
        config.set("game", "assets_dir", Some(path_string(&self.assets_dir)));
        config.set("game", "save_path", Some(path_string(&self.save_path)));
        config.set("game", "start_screen", Some(self.start_screen.clone()));
        config.set("game", "debug", Some(self.debug.to_string()));

        // [audio] section
        config.set("audio", "enabled", Some(self.audio_enabled.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Set window size.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width.max(1);
        self.window_height = height.max(1);
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Fixed step used when no real frame timing is available.
    pub fn fixed_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_keeps_defaults() {
        let mut cfg = GameConfig::with_path("/definitely/not/here.ini");
        assert!(cfg.load_from_file().is_err());
        assert_eq!(cfg.window_size(), (1280, 720));
        assert_eq!(cfg.start_screen, "main_menu");
    }

    #[test]
    fn test_partial_file_overrides_some_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[window]\nwidth = 800\n\n[game]\ndebug = true\n").unwrap();
        let mut cfg = GameConfig::with_path(&path);
        cfg.load_from_file().unwrap();
        assert_eq!(cfg.window_size(), (800, 720));
        assert!(cfg.debug);
        assert!(cfg.audio_enabled);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        let mut cfg = GameConfig::with_path(&path);
        cfg.set_window_size(640, 360);
        cfg.audio_enabled = false;
        cfg.start_screen = "level".into();
        cfg.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, cfg);
    }
}
