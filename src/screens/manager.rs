//! Screen registry and tick dispatch.
//!
//! The manager owns every screen, the shared [`GameContext`] and the
//! services screens use. Transitions requested during a tick (or between
//! ticks) are parked in `pending` and applied at the start of the next
//! [`tick`](ScreenManager::tick): the outgoing screen's `deactivate` runs,
//! the active id swaps, then the incoming screen's `activate` runs. The
//! active screen is therefore never swapped while its own `update` is on
//! the stack.

use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::error::{GameError, GameResult};
use crate::resources::audio::AudioHandle;
use crate::resources::gamecontext::GameContext;
use crate::resources::input::{Action, InputSnapshot};
use crate::resources::persistence::Persistence;
use crate::resources::renderframe::RenderFrame;
use crate::screens::{Screen, ScreenContext, ScreenId};

pub struct ScreenManager {
    screens: FxHashMap<ScreenId, Box<dyn Screen>>,
    /// Registration order; also what screens validate requests against.
    order: Vec<ScreenId>,
    active: Option<ScreenId>,
    pending: Option<ScreenId>,
    quit: bool,
    debug: bool,
    game: GameContext,
    audio: AudioHandle,
    persistence: Box<dyn Persistence>,
}

impl ScreenManager {
    pub fn new(game: GameContext, audio: AudioHandle, persistence: Box<dyn Persistence>) -> Self {
        ScreenManager {
            screens: FxHashMap::default(),
            order: Vec::new(),
            active: None,
            pending: None,
            quit: false,
            debug: false,
            game,
            audio,
            persistence,
        }
    }

    /// Add a screen. Registering the same id twice is a configuration error.
    pub fn register(&mut self, id: impl Into<ScreenId>, screen: Box<dyn Screen>) -> GameResult<()> {
        let id = id.into();
        if self.screens.contains_key(&id) {
            warn!("Screen '{}' registered twice", id);
            return Err(GameError::config(format!("screen '{}' is already registered", id)));
        }
        debug!("Registered screen '{}'", id);
        self.order.push(id.clone());
        self.screens.insert(id, screen);
        Ok(())
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.order.iter().any(|r| r == id)
    }

    /// Activate the first screen.
    pub fn start(&mut self, id: &str) -> GameResult<()> {
        if !self.is_registered(id) {
            return Err(GameError::UnknownScreen(ScreenId::from(id)));
        }
        if let Some(current) = &self.active {
            return Err(GameError::config(format!(
                "screen manager already started on '{}'",
                current
            )));
        }
        let id = ScreenId::from(id);
        info!("Starting on screen '{}'", id);
        self.active = Some(id.clone());
        self.with_screen(&id, |screen, ctx| screen.activate(None, ctx));
        Ok(())
    }

    /// Queue a transition for the next tick boundary.
    ///
    /// Unknown ids fail with [`GameError::UnknownScreen`] and leave both the
    /// active screen and any earlier request untouched.
    pub fn request_transition(&mut self, id: &str) -> GameResult<()> {
        if !self.is_registered(id) {
            warn!("Ignoring transition to unknown screen '{}'", id);
            return Err(GameError::UnknownScreen(ScreenId::from(id)));
        }
        self.pending = Some(ScreenId::from(id));
        Ok(())
    }

    pub fn active_id(&self) -> Option<&ScreenId> {
        self.active.as_ref()
    }

    pub fn pending_id(&self) -> Option<&ScreenId> {
        self.pending.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn context(&self) -> &GameContext {
        &self.game
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.game
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, on: bool) {
        self.debug = on;
    }

    /// One frame: apply a pending transition, then update and render the
    /// active screen exactly once each.
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot, frame: &mut RenderFrame) {
        self.apply_pending();
        if input.just_pressed(Action::ToggleDebug) {
            self.debug = !self.debug;
            info!("Debug mode {}", if self.debug { "on" } else { "off" });
        }
        let Some(id) = self.active.clone() else {
            return;
        };
        self.with_screen(&id, |screen, ctx| {
            screen.update(dt, input, ctx);
            screen.render(ctx, frame);
        });
    }

    fn apply_pending(&mut self) {
        let Some(next) = self.pending.take() else {
            return;
        };
        let Some(current) = self.active.clone() else {
            return;
        };
        if next == current {
            debug!("Screen '{}' is already active", next);
            return;
        }
        info!("Transitioning from {:?} to {:?}", current.as_str(), next.as_str());
        self.with_screen(&current, |screen, ctx| screen.deactivate(&next, ctx));
        self.active = Some(next.clone());
        self.with_screen(&next, |screen, ctx| screen.activate(Some(&current), ctx));
    }

    /// Run `f` on the screen `id` with a context borrowed from the manager.
    fn with_screen<F>(&mut self, id: &ScreenId, f: F)
    where
        F: FnOnce(&mut dyn Screen, &mut ScreenContext<'_>),
    {
        let ScreenManager {
            screens,
            order,
            pending,
            quit,
            debug,
            game,
            audio,
            persistence,
            ..
        } = self;
        let Some(screen) = screens.get_mut(id) else {
            return;
        };
        let mut ctx = ScreenContext::new(
            game,
            audio,
            debug,
            persistence.as_mut(),
            order,
            id,
            pending,
            quit,
        );
        f(screen.as_mut(), &mut ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::persistence::NullPersistence;
    use crate::components::mapposition::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        log: Log,
        on_update: Option<&'static str>,
    }

    impl Screen for Probe {
        fn activate(&mut self, from: Option<&ScreenId>, _ctx: &mut ScreenContext<'_>) {
            let from = from.map(|f| f.to_string()).unwrap_or_else(|| "-".into());
            self.log.borrow_mut().push(format!("{}.activate({})", self.name, from));
        }
        fn deactivate(&mut self, to: &ScreenId, _ctx: &mut ScreenContext<'_>) {
            self.log.borrow_mut().push(format!("{}.deactivate({})", self.name, to));
        }
        fn update(&mut self, _dt: f32, _input: &InputSnapshot, ctx: &mut ScreenContext<'_>) {
            self.log.borrow_mut().push(format!("{}.update", self.name));
            if let Some(target) = self.on_update.take() {
                let _ = ctx.request_transition(target);
            }
        }
        fn render(&mut self, _ctx: &ScreenContext<'_>, _frame: &mut RenderFrame) {
            self.log.borrow_mut().push(format!("{}.render", self.name));
        }
    }

    fn manager(log: &Log, a_jumps_to: Option<&'static str>) -> ScreenManager {
        let mut m = ScreenManager::new(
            GameContext::new_game(),
            AudioHandle::disabled(),
            Box::new(NullPersistence::default()),
        );
        m.register(
            "a",
            Box::new(Probe {
                name: "a",
                log: log.clone(),
                on_update: a_jumps_to,
            }),
        )
        .unwrap();
        m.register(
            "b",
            Box::new(Probe {
                name: "b",
                log: log.clone(),
                on_update: None,
            }),
        )
        .unwrap();
        m
    }

    fn frame() -> RenderFrame {
        RenderFrame::new(Vec2::new(10.0, 10.0))
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let log = Log::default();
        let mut m = manager(&log, None);
        let err = m
            .register(
                "a",
                Box::new(Probe {
                    name: "a2",
                    log: log.clone(),
                    on_update: None,
                }),
            )
            .unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }

    #[test]
    fn test_unknown_transition_keeps_active() {
        let log = Log::default();
        let mut m = manager(&log, None);
        m.start("a").unwrap();
        assert!(matches!(
            m.request_transition("nowhere"),
            Err(GameError::UnknownScreen(_))
        ));
        m.tick(0.1, &InputSnapshot::new(), &mut frame());
        assert_eq!(m.active_id().unwrap(), &"a");
    }

    #[test]
    fn test_transition_requested_in_update_waits_for_next_tick() {
        let log = Log::default();
        let mut m = manager(&log, Some("b"));
        m.start("a").unwrap();
        let input = InputSnapshot::new();
        m.tick(0.1, &input, &mut frame());
        assert_eq!(m.active_id().unwrap(), &"a");
        m.tick(0.1, &input, &mut frame());
        assert_eq!(m.active_id().unwrap(), &"b");
        assert_eq!(
            *log.borrow(),
            vec![
                "a.activate(-)",
                "a.update",
                "a.render",
                "a.deactivate(b)",
                "b.activate(a)",
                "b.update",
                "b.render",
            ]
        );
    }

    #[test]
    fn test_transition_to_active_screen_is_noop() {
        let log = Log::default();
        let mut m = manager(&log, None);
        m.start("a").unwrap();
        m.request_transition("a").unwrap();
        m.tick(0.1, &InputSnapshot::new(), &mut frame());
        assert_eq!(*log.borrow(), vec!["a.activate(-)", "a.update", "a.render"]);
    }

    #[test]
    fn test_toggle_debug_flips_flag() {
        let log = Log::default();
        let mut m = manager(&log, None);
        m.start("a").unwrap();
        m.tick(0.1, &InputSnapshot::new().with_pressed(Action::ToggleDebug), &mut frame());
        assert!(m.debug());
        m.tick(0.1, &InputSnapshot::new().with_held(Action::ToggleDebug), &mut frame());
        assert!(m.debug());
        m.tick(0.1, &InputSnapshot::new().with_pressed(Action::ToggleDebug), &mut frame());
        assert!(!m.debug());
    }

    #[test]
    fn test_start_on_unknown_screen_fails() {
        let log = Log::default();
        let mut m = manager(&log, None);
        assert!(m.start("zzz").is_err());
        assert!(m.active_id().is_none());
    }
}
