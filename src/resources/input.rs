//! Per-tick input snapshot.
//!
//! Frontends translate their device state into an [`InputSnapshot`] once per
//! tick; screens only ever read it. Bindings from physical keys to
//! [`Action`]s live in the frontend, so nothing here depends on a window
//! backend.
use bevy_ecs::prelude::*;
use smallvec::SmallVec;

use crate::components::mapposition::Vec2;

/// Logical buttons the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    UseTool,
    Interact,
    NextItem,
    PrevItem,
    Confirm,
    Back,
    ToggleDebug,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::UseTool,
        Action::Interact,
        Action::NextItem,
        Action::PrevItem,
        Action::Confirm,
        Action::Back,
        Action::ToggleDebug,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// State of one button this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Held down this tick.
    pub active: bool,
    /// Went down this tick.
    pub just_pressed: bool,
    /// Went up this tick.
    pub just_released: bool,
}

/// Discrete edge event, in the order the frontend observed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Action),
    Released(Action),
}

/// Read-only input for one tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputSnapshot {
    buttons: [ButtonState; Action::ALL.len()],
    pub events: SmallVec<[InputEvent; 8]>,
    /// Pointer position in screen pixels, if the frontend has one.
    pub pointer: Option<Vec2>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button(&self, action: Action) -> ButtonState {
        self.buttons[action.index()]
    }

    pub fn is_down(&self, action: Action) -> bool {
        self.button(action).active
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.button(action).just_pressed
    }

    pub fn just_released(&self, action: Action) -> bool {
        self.button(action).just_released
    }

    /// Directional axis from the four direction buttons, each component in
    /// `-1..=1`. Not normalised.
    pub fn axis(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.is_down(Action::Left) {
            v.x -= 1.0;
        }
        if self.is_down(Action::Right) {
            v.x += 1.0;
        }
        if self.is_down(Action::Up) {
            v.y -= 1.0;
        }
        if self.is_down(Action::Down) {
            v.y += 1.0;
        }
        v
    }

    /// Record a full button state. Edge flags also push the matching event.
    pub fn set(&mut self, action: Action, state: ButtonState) {
        self.buttons[action.index()] = state;
        if state.just_pressed {
            self.events.push(InputEvent::Pressed(action));
        }
        if state.just_released {
            self.events.push(InputEvent::Released(action));
        }
    }

    /// Derive this tick's state from whether the button is down now and
    /// whether it was down in `previous`.
    pub fn update_from(&mut self, previous: &InputSnapshot, action: Action, down: bool) {
        let was_down = previous.is_down(action);
        self.set(
            action,
            ButtonState {
                active: down,
                just_pressed: down && !was_down,
                just_released: !down && was_down,
            },
        );
    }

    /// Builder: button held, pressed this tick.
    pub fn with_pressed(mut self, action: Action) -> Self {
        self.set(
            action,
            ButtonState {
                active: true,
                just_pressed: true,
                just_released: false,
            },
        );
        self
    }

    /// Builder: button held since an earlier tick.
    pub fn with_held(mut self, action: Action) -> Self {
        self.set(
            action,
            ButtonState {
                active: true,
                just_pressed: false,
                just_released: false,
            },
        );
        self
    }

    pub fn with_pointer(mut self, x: f32, y: f32) -> Self {
        self.pointer = Some(Vec2::new(x, y));
        self
    }
}
