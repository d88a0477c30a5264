//! Time-to-live component for automatic entity despawning.
//!
//! The [`Ttl`] component counts down time each tick. When the remaining time
//! reaches zero, the entity is despawned. Rain drops and harvest flashes use
//! it.
//!
//! # Related
//!
//! - [`crate::systems::ttl::ttl_system`] – system that updates and despawns entities

use bevy_ecs::prelude::Component;

/// Time-to-live component that automatically despawns entities after a duration.
///
/// The countdown follows [`WorldTime::delta`](crate::resources::worldtime::WorldTime),
/// so it respects the time scale.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Ttl {
    /// Remaining time in seconds before despawn.
    pub remaining: f32,
}

impl Ttl {
    /// Create a new Ttl with the given duration in seconds.
    pub fn new(seconds: f32) -> Self {
        Ttl { remaining: seconds }
    }
}
