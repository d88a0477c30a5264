//! Save-game storage.
//!
//! Screens reach storage only through the [`Persistence`] trait and only at
//! save points (sleeping, the pause menu's *Save*, the main menu's
//! *Continue*), never from the per-tick path.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::resources::gamecontext::GameContext;

pub const SAVE_VERSION: u32 = 1;

pub trait Persistence {
    /// Load the saved context. `Ok(None)` means there is no save yet.
    fn load_game_context(&self) -> GameResult<Option<GameContext>>;
    fn save_game_context(&mut self, ctx: &GameContext) -> GameResult<()>;
}

#[derive(Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    context: GameContext,
}

/// Pretty JSON file on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonSaveStore {
    path: PathBuf,
}

impl JsonSaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonSaveStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonSaveStore {
    fn load_game_context(&self) -> GameResult<Option<GameContext>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path).map_err(|e| {
            GameError::Persistence(format!("read failed for {}: {}", self.path.display(), e))
        })?;
        let file: SaveFile = serde_json::from_str(&json).map_err(|e| {
            GameError::Persistence(format!("corrupt save {}: {}", self.path.display(), e))
        })?;
        if file.version != SAVE_VERSION {
            return Err(GameError::Persistence(format!(
                "save version {} is not supported (expected {})",
                file.version, SAVE_VERSION
            )));
        }
        info!("Loaded save from {:?} (day {})", self.path, file.context.day);
        Ok(Some(file.context))
    }

    fn save_game_context(&mut self, ctx: &GameContext) -> GameResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                GameError::Persistence(format!("could not create {}: {}", dir.display(), e))
            })?;
        }
        let file = SaveFile {
            version: SAVE_VERSION,
            context: ctx.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| GameError::Persistence(format!("serialization failed: {}", e)))?;

        // Write to a temp file first, then rename so a crash never leaves
        // half a save behind.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| {
            GameError::Persistence(format!("write failed for {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| GameError::Persistence(format!("rename failed: {}", e)))?;

        info!("Saved game to {:?} (day {})", self.path, ctx.day);
        Ok(())
    }
}

/// Keeps the last save in memory. Used by tests and `--headless` runs
/// without a save path.
#[derive(Debug, Clone, Default)]
pub struct NullPersistence {
    pub saved: Option<GameContext>,
    pub saves: u32,
}

impl Persistence for NullPersistence {
    fn load_game_context(&self) -> GameResult<Option<GameContext>> {
        Ok(self.saved.clone())
    }

    fn save_game_context(&mut self, ctx: &GameContext) -> GameResult<()> {
        self.saved = Some(ctx.clone());
        self.saves += 1;
        Ok(())
    }
}
