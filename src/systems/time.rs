//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per tick, before anything else in the level reads it.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the level's `WorldTime` by the raw frame delta and return the
/// scaled delta every other step of the tick should use.
pub fn update_world_time(world: &mut World, dt: f32) -> f32 {
    world.get_resource_or_insert_with(WorldTime::default).advance(dt)
}
