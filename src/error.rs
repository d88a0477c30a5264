//! Crate-wide error type.
//!
//! Only startup and load-time code returns [`GameError`]. Code that runs inside
//! a tick reports recoverable conditions through booleans, `Option`s or log
//! lines instead, so a bad request never aborts the game loop.

use std::fmt;
use std::path::PathBuf;

use crate::screens::ScreenId;

/// Errors raised while configuring, loading or persisting the game.
#[derive(Debug)]
pub enum GameError {
    /// Invalid setup: duplicate screen ids, malformed tilesets or timelines.
    Config(String),
    /// A transition named a screen that was never registered.
    UnknownScreen(ScreenId),
    /// An asset could not be read or decoded.
    AssetLoad { path: PathBuf, reason: String },
    /// Reading or writing the save file failed.
    Persistence(String),
}

pub type GameResult<T> = Result<T, GameError>;

impl GameError {
    pub fn config(msg: impl Into<String>) -> Self {
        GameError::Config(msg.into())
    }

    pub fn asset(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        GameError::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Startup treats these as fatal; everything else degrades.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::Config(_) | GameError::AssetLoad { .. })
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Config(msg) => write!(f, "configuration error: {}", msg),
            GameError::UnknownScreen(id) => write!(f, "unknown screen '{}'", id),
            GameError::AssetLoad { path, reason } => {
                write!(f, "failed to load asset {}: {}", path.display(), reason)
            }
            GameError::Persistence(msg) => write!(f, "persistence error: {}", msg),
        }
    }
}

impl std::error::Error for GameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unknown_screen() {
        let err = GameError::UnknownScreen(ScreenId::from("nowhere"));
        assert_eq!(err.to_string(), "unknown screen 'nowhere'");
    }

    #[test]
    fn test_fatal_classes() {
        assert!(GameError::config("dup").is_fatal());
        assert!(GameError::asset("a.png", "missing").is_fatal());
        assert!(!GameError::UnknownScreen(ScreenId::from("x")).is_fatal());
        assert!(!GameError::Persistence("disk full".into()).is_fatal());
    }
}
