//! ECS components for entities in the level world.
//!
//! Submodules overview:
//! - [`actor`] – movable entity with facing, state machine and animator
//! - [`animation`] – timeline playback and the per-entity animator
//! - [`crop`] – planted crop growing on a tile
//! - [`hitbox`] – axis-aligned box used for tile collision
//! - [`inputcontrolled`] – marks the player's actor
//! - [`mapposition`] – world-space position and the shared [`Vec2`](mapposition::Vec2)
//! - [`sprite`] – frame image drawn at an entity's position
//! - [`tree`] – choppable tree with apples
//! - [`ttl`] – despawn after a lifetime
//! - [`velocity`] – constant drift for free props
//! - [`zindex`] – render layer of an entity

pub mod actor;
pub mod animation;
pub mod crop;
pub mod hitbox;
pub mod inputcontrolled;
pub mod mapposition;
pub mod sprite;
pub mod tree;
pub mod ttl;
pub mod velocity;
pub mod zindex;
