//! Playback of prop animations.
//!
//! Every entity with an [`Animator`] that is not an actor (water tiles,
//! swaying flowers) advances by the tick's delta. Actors advance their own
//! animator inside [`Actor::update`](crate::components::actor::Actor::update)
//! because their state machine needs the finished signal.

use bevy_ecs::prelude::*;

use crate::components::animation::Animator;
use crate::resources::worldtime::WorldTime;

pub fn animation(time: Res<WorldTime>, mut query: Query<&mut Animator>) {
    for mut animator in query.iter_mut() {
        animator.advance(time.delta);
    }
}
