//! Systems and per-tick procedures of the level world.
//!
//! Submodules overview
//! - [`animation`] – advance prop animators
//! - [`audio`] – the audio thread loop and its sinks
//! - [`farming`] – tool effects, crop growth, trees, farm snapshots
//! - [`interaction`] – the interact button (bed, trader, apples)
//! - [`movement`] – carry props with a velocity
//! - [`render`] – collect the level's draw list
//! - [`time`] – advance [`WorldTime`](crate::resources::worldtime::WorldTime)
//! - [`ttl`] – despawn expired entities
//! - [`weather`] – spawn and clear rain drops

pub mod animation;
pub mod audio;
pub mod farming;
pub mod interaction;
pub mod movement;
pub mod render;
pub mod time;
pub mod ttl;
pub mod weather;
