//! Dew Valley library.
//!
//! Screens, the farm simulation and its ECS parts, exposed for the binary
//! and for integration tests.

pub mod components;
pub mod error;
pub mod events;
pub mod frontend;
pub mod game;
pub mod resources;
pub mod screens;
pub mod systems;
