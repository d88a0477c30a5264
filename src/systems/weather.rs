//! Rain drop spawning.
//!
//! Each tick while [`Weather::raining`] is set, [`rain`] spawns the due
//! number of floor splashes and falling drops at random points of the map.
//! Both carry a [`Ttl`]; falling drops also carry a [`Velocity`] so
//! [`movement`](crate::systems::movement::movement) carries them.
//!
//! Frames come from the `rain_floor` and `rain_drops` timelines. A store
//! without them spawns nothing.

use bevy_ecs::prelude::*;

use crate::components::mapposition::{MapPosition, Vec2};
use crate::components::sprite::Sprite;
use crate::components::ttl::Ttl;
use crate::components::velocity::Velocity;
use crate::components::zindex::ZIndex;
use crate::resources::animationstore::{AnimationStore, FrameId};
use crate::resources::renderframe::RenderLayer;
use crate::resources::tilegrid::TileWorldGrid;
use crate::resources::weather::{DROP_DIRECTION, DROP_SPEED, DROP_TTL, LevelRng, Weather};
use crate::resources::worldtime::WorldTime;

/// Marker for rain entities, so a dry morning can clear them.
#[derive(Component, Debug, Clone, Copy)]
pub struct RainDrop;

pub const FLOOR_KEY: &str = "rain_floor";
pub const DROPS_KEY: &str = "rain_drops";

fn pick_frame(store: &AnimationStore, key: &str, rng: &mut LevelRng) -> Option<FrameId> {
    let timeline = store.get(key)?;
    let index = rng.0.usize(0..timeline.frame_count());
    Some(timeline.frame(index).clone())
}

pub fn rain(
    mut commands: Commands,
    time: Res<WorldTime>,
    mut weather: ResMut<Weather>,
    mut rng: ResMut<LevelRng>,
    grid: Res<TileWorldGrid>,
    store: Res<AnimationStore>,
) {
    let due = weather.drops_due(time.delta);
    if due == 0 {
        return;
    }
    let size = grid.world_size();
    let ts = grid.tile_size();
    for _ in 0..due {
        if let Some(frame) = pick_frame(&store, FLOOR_KEY, &mut rng) {
            let x = rng.range(0.0, size.x);
            let y = rng.range(0.0, size.y);
            let ttl = rng.range(DROP_TTL.0, DROP_TTL.1);
            commands.spawn((
                RainDrop,
                Sprite::new(frame, ts, ts),
                MapPosition::new(x, y),
                ZIndex(RenderLayer::RainFloor),
                Ttl::new(ttl),
            ));
        }
        if let Some(frame) = pick_frame(&store, DROPS_KEY, &mut rng) {
            let x = rng.range(0.0, size.x);
            let y = rng.range(0.0, size.y);
            let ttl = rng.range(DROP_TTL.0, DROP_TTL.1);
            let speed = rng.range(DROP_SPEED.0, DROP_SPEED.1);
            let dir = Vec2::new(DROP_DIRECTION.0, DROP_DIRECTION.1);
            commands.spawn((
                RainDrop,
                Sprite::new(frame, ts, ts),
                MapPosition::new(x, y),
                ZIndex(RenderLayer::RainDrops),
                Velocity(dir * speed),
                Ttl::new(ttl),
            ));
        }
    }
}

/// Despawn every drop still alive.
pub fn clear_rain(world: &mut World) -> usize {
    let drops: Vec<Entity> = world
        .query_filtered::<Entity, With<RainDrop>>()
        .iter(world)
        .collect();
    for e in &drops {
        world.despawn(*e);
    }
    drops.len()
}
