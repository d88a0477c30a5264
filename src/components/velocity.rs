//! Constant velocity for free-moving props (falling rain drops).
//!
//! Props with a [`Velocity`] ignore the tile grid; actors move through
//! [`Actor::update`](crate::components::actor::Actor::update) instead.

use bevy_ecs::prelude::Component;

use crate::components::mapposition::Vec2;

/// World units per second.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Velocity(pub Vec2);
