//! Free movement for props with a [`Velocity`].
//!
//! Actors are moved by their own collision-aware update; this only carries
//! decorations that ignore the grid.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::velocity::Velocity;
use crate::resources::worldtime::WorldTime;

pub fn movement(time: Res<WorldTime>, mut query: Query<(&mut MapPosition, &Velocity)>) {
    for (mut position, velocity) in query.iter_mut() {
        position.pos += velocity.0 * time.delta;
    }
}
