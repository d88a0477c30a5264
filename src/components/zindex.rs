//! Render layer component.
//!
//! [`ZIndex`] picks the [`RenderLayer`] an entity is drawn in. Within a layer
//! the render pass orders entities by the bottom edge of their sprite.

use bevy_ecs::prelude::Component;

use crate::resources::renderframe::RenderLayer;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub RenderLayer);
