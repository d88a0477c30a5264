//! Debug overlay marker.
//!
//! The level inserts this resource into its world while debug mode is on and
//! removes it when it is switched off; the render pass checks for it.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct DebugMode;
