//! Marks the actor driven by the player's input.
//!
//! The level spawns exactly one entity with [`PlayerControlled`] next to its
//! [`Actor`](crate::components::actor::Actor).

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct PlayerControlled;
