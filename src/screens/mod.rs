//! Screens: the mutually exclusive modes of the game.
//!
//! Every screen implements [`Screen`] and is registered once with the
//! [`ScreenManager`](manager::ScreenManager) at startup. Exactly one screen
//! is active; the manager forwards each tick to it as `update` then
//! `render`.
//!
//! Screens never hold the shared state themselves. Each hook receives a
//! [`ScreenContext`] that lends out the [`GameContext`], the audio handle and
//! the save store for the duration of the call, and collects requests
//! (transition, quit) that the manager applies afterwards.
//!
//! # Related
//!
//! - [`manager`] – registry, transitions and the tick entry point
//! - [`level`] – the farm itself

pub mod level;
pub mod mainmenu;
pub mod manager;
pub mod menu;
pub mod paused;
pub mod shop;

use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::error::{GameError, GameResult};
use crate::resources::audio::AudioHandle;
use crate::resources::gamecontext::GameContext;
use crate::resources::input::InputSnapshot;
use crate::resources::persistence::Persistence;
use crate::resources::renderframe::RenderFrame;

pub const MAIN_MENU: &str = "main_menu";
pub const LEVEL: &str = "level";
pub const SHOP: &str = "shop";
pub const PAUSED: &str = "paused";

/// Name of a registered screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(Arc<str>);

impl ScreenId {
    pub fn new(id: impl AsRef<str>) -> Self {
        ScreenId(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScreenId {
    fn from(value: &str) -> Self {
        ScreenId::new(value)
    }
}

impl From<String> for ScreenId {
    fn from(value: String) -> Self {
        ScreenId::new(value)
    }
}

impl PartialEq<str> for ScreenId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ScreenId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Capabilities of one game mode.
pub trait Screen {
    /// The screen became active. `from` is `None` for the first screen.
    fn activate(&mut self, from: Option<&ScreenId>, ctx: &mut ScreenContext<'_>);
    /// The screen stops being active; `to` is about to be activated.
    fn deactivate(&mut self, to: &ScreenId, ctx: &mut ScreenContext<'_>);
    fn update(&mut self, dt: f32, input: &InputSnapshot, ctx: &mut ScreenContext<'_>);
    /// Push this frame's draw items. Runs right after `update`.
    fn render(&mut self, ctx: &ScreenContext<'_>, frame: &mut RenderFrame);
}

/// What a screen may touch while one of its hooks runs.
pub struct ScreenContext<'a> {
    pub game: &'a mut GameContext,
    pub audio: &'a AudioHandle,
    /// Debug overlays on.
    pub debug: &'a mut bool,
    persistence: &'a mut dyn Persistence,
    registered: &'a [ScreenId],
    active: &'a ScreenId,
    pending: &'a mut Option<ScreenId>,
    quit: &'a mut bool,
}

impl<'a> ScreenContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        game: &'a mut GameContext,
        audio: &'a AudioHandle,
        debug: &'a mut bool,
        persistence: &'a mut dyn Persistence,
        registered: &'a [ScreenId],
        active: &'a ScreenId,
        pending: &'a mut Option<ScreenId>,
        quit: &'a mut bool,
    ) -> Self {
        ScreenContext {
            game,
            audio,
            debug,
            persistence,
            registered,
            active,
            pending,
            quit,
        }
    }

    /// Screen whose hook is running.
    pub fn active_id(&self) -> &ScreenId {
        self.active
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.registered.iter().any(|r| r == id)
    }

    /// Ask for a transition at the start of the next tick.
    ///
    /// Unknown ids are rejected here, so the caller learns about them
    /// immediately; the current screen stays active either way.
    pub fn request_transition(&mut self, id: &str) -> GameResult<()> {
        if !self.is_registered(id) {
            warn!("Ignoring transition to unknown screen '{}'", id);
            return Err(GameError::UnknownScreen(ScreenId::from(id)));
        }
        *self.pending = Some(ScreenId::from(id));
        Ok(())
    }

    /// Stop the game loop once the current tick has finished.
    pub fn request_quit(&mut self) {
        *self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        *self.quit
    }

    /// Save the shared context. Failures are logged and reported as `false`;
    /// the game keeps running.
    pub fn save_game(&mut self) -> bool {
        match self.persistence.save_game_context(self.game) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not save the game: {}", e);
                false
            }
        }
    }

    /// Replace the shared context with the saved one. Returns `false` when
    /// there is no save or it cannot be read; the context is then untouched.
    pub fn load_game(&mut self) -> bool {
        match self.persistence.load_game_context() {
            Ok(Some(saved)) => {
                *self.game = saved;
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Could not load the saved game: {}", e);
                false
            }
        }
    }

    /// Whether a save exists and can be read.
    pub fn has_save(&self) -> bool {
        matches!(self.persistence.load_game_context(), Ok(Some(_)))
    }
}
