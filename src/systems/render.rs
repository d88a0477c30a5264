//! Draw-list collection for the farm.
//!
//! [`render_level`] walks the level world and pushes everything visible into
//! the [`RenderFrame`]: tiles, props, crops, trees, the player, weather and
//! sky tints, then the HUD. It never talks to a graphics backend; the
//! frontend replays the frame in layer and depth order.
//!
//! Culling uses the camera's visible rectangle. Within the `Main` layer the
//! depth is the y of an object's base so things further down the screen
//! cover the ones behind them.

use bevy_ecs::prelude::*;

use crate::components::actor::{Actor, Tool};
use crate::components::animation::Animator;
use crate::components::crop::{Crop, CropKind};
use crate::components::mapposition::{MapPosition, Vec2};
use crate::components::sprite::Sprite;
use crate::components::tree::Tree;
use crate::components::zindex::ZIndex;
use crate::resources::animationstore::{AnimationStore, FrameId};
use crate::resources::daycycle::DayCycle;
use crate::resources::debugmode::DebugMode;
use crate::resources::gamecontext::{GameContext, MAX_ENERGY};
use crate::resources::renderframe::{BlendMode, Color, DrawCmd, RenderFrame, RenderLayer, Space};
use crate::resources::tilegrid::{GridCoord, Interactable, SOIL_VARIANTS, TileKind, TileWorldGrid};
use crate::resources::weather::{RAIN_DIM, Weather};
use crate::resources::worldtime::WorldTime;

/// Static frames the tile pass reuses every frame.
struct TileArt {
    ground: FrameId,
    grass: FrameId,
    fence: FrameId,
    floor: FrameId,
    soil_water: FrameId,
    bed: FrameId,
    trader: FrameId,
    apple: FrameId,
}

impl TileArt {
    fn new() -> Self {
        TileArt {
            ground: FrameId::new("tiles/ground"),
            grass: FrameId::new("tiles/grass"),
            fence: FrameId::new("tiles/fence"),
            floor: FrameId::new("tiles/floor"),
            soil_water: FrameId::new("soil_water/0"),
            bed: FrameId::new("objects/bed"),
            trader: FrameId::new("objects/trader"),
            apple: FrameId::new("objects/apple"),
        }
    }

    fn frames(&self) -> [&FrameId; 8] {
        [
            &self.ground,
            &self.grass,
            &self.fence,
            &self.floor,
            &self.soil_water,
            &self.bed,
            &self.trader,
            &self.apple,
        ]
    }
}

/// Frames drawn by name rather than through a timeline.
pub fn decoration_frames() -> Vec<FrameId> {
    let tools = [Tool::Hoe, Tool::Axe, Tool::WateringCan]
        .into_iter()
        .chain(CropKind::ALL.iter().map(|k| Tool::Seed(*k)));
    let mut frames: Vec<FrameId> = TileArt::new().frames().into_iter().cloned().collect();
    frames.extend(SOIL_VARIANTS.iter().map(|v| FrameId::new(format!("soil/{}", v))));
    frames.extend(tools.map(|t| FrameId::new(format!("overlay/{}", t.anim_name()))));
    frames.push(FrameId::new("objects/sunflower"));
    frames.push(FrameId::new("water/0"));
    frames.sort_unstable();
    frames.dedup();
    frames
}

/// Every frame of every timeline in `store`, sorted and without repeats.
pub fn timeline_frames(store: &AnimationStore) -> Vec<FrameId> {
    let mut frames: Vec<FrameId> = store
        .animations
        .values()
        .flat_map(|timeline| timeline.frames().iter().cloned())
        .collect();
    frames.sort_unstable();
    frames.dedup();
    frames
}

/// Top-left world position that keeps `focus` centred without showing
/// anything past the map's edges.
pub fn camera_for(focus: Vec2, viewport: Vec2, world_size: Vec2) -> Vec2 {
    let clamp = |v: f32, view: f32, size: f32| {
        let max = (size - view).max(0.0);
        (v - view / 2.0).clamp(0.0, max)
    };
    Vec2::new(
        clamp(focus.x, viewport.x, world_size.x),
        clamp(focus.y, viewport.y, world_size.y),
    )
}

pub fn render_level(world: &mut World, player: Entity, game: &GameContext, frame: &mut RenderFrame) {
    // The grid is lent out for the pass; the queries below need `&mut World`.
    world.try_resource_scope(|world, grid: Mut<TileWorldGrid>| {
        draw_level(world, &grid, player, game, frame);
    });
}

fn draw_level(world: &mut World, grid: &TileWorldGrid, player: Entity, game: &GameContext, frame: &mut RenderFrame) {
    let Some(focus) = world.get::<Actor>(player).map(Actor::center) else {
        return;
    };
    frame.camera = camera_for(focus, frame.viewport, grid.world_size());
    frame.clear = Color::rgb(28, 40, 30);

    let art = TileArt::new();
    draw_tiles(grid, &art, frame);
    draw_props(world, frame);
    draw_crops(world, grid, frame);
    draw_trees(world, grid, &art, frame);

    let world: &World = world;
    let Some(actor) = world.get::<Actor>(player) else {
        return;
    };
    frame.push_with_tie(
        RenderLayer::Main,
        actor.center().y,
        player.to_bits(),
        Space::World,
        DrawCmd::Sprite {
            frame: actor.animator().frame().clone(),
            pos: actor.pos(),
            tint: Color::WHITE,
        },
    );

    draw_weather(world, frame);
    draw_hud(game, frame);
    if world.contains_resource::<DebugMode>() {
        draw_debug(world, grid, actor, frame);
    }
}

fn visible_coords(grid: &TileWorldGrid, frame: &RenderFrame) -> Vec<GridCoord> {
    let (min, max) = frame.visible_rect();
    let ts = grid.tile_size();
    let x0 = ((min.x / ts).floor() as i32).max(0);
    let y0 = ((min.y / ts).floor() as i32).max(0);
    let x1 = ((max.x / ts).ceil() as i32).min(grid.width() - 1);
    let y1 = ((max.y / ts).ceil() as i32).min(grid.height() - 1);
    (y0..=y1)
        .flat_map(|y| (x0..=x1).map(move |x| GridCoord::new(x, y)))
        .collect()
}

fn draw_tiles(grid: &TileWorldGrid, art: &TileArt, frame: &mut RenderFrame) {
    let ts = grid.tile_size();
    for coord in visible_coords(grid, frame) {
        let tile = grid.tile_at(coord);
        let pos = grid.grid_to_world(coord);
        let base = pos.y + ts;
        match tile.kind {
            TileKind::Void | TileKind::Water => {}
            TileKind::Ground => frame.sprite(RenderLayer::Ground, pos.y, &art.ground, pos),
            TileKind::Grass => frame.sprite(RenderLayer::Ground, pos.y, &art.grass, pos),
            TileKind::Floor => frame.sprite(RenderLayer::Ground, pos.y, &art.floor, pos),
            TileKind::Wall => frame.sprite(RenderLayer::Main, base, &art.fence, pos),
            TileKind::Tilled | TileKind::Planted => {
                frame.sprite(RenderLayer::Ground, pos.y, &art.grass, pos);
                let soil = FrameId::new(format!("soil/{}", grid.soil_variant(coord)));
                frame.sprite(RenderLayer::Soil, pos.y, &soil, pos);
                if tile.watered {
                    frame.sprite(RenderLayer::SoilWater, pos.y, &art.soil_water, pos);
                }
            }
        }
        match tile.interactable {
            Interactable::Bed => frame.sprite(RenderLayer::HouseBottom, pos.y, &art.bed, pos),
            Interactable::Trader => frame.sprite(RenderLayer::Main, base, &art.trader, pos),
            Interactable::None => {}
        }
    }
}

fn draw_props(world: &mut World, frame: &mut RenderFrame) {
    let mut query = world.query::<(Entity, &MapPosition, &Sprite, &ZIndex, Option<&Animator>)>();
    for (entity, position, sprite, z, animator) in query.iter(world) {
        if !frame.is_visible(position.pos, sprite.size) {
            continue;
        }
        let image = animator.map_or(&sprite.frame, |a| a.frame()).clone();
        frame.push_with_tie(
            z.0,
            position.pos.y + sprite.size.y,
            entity.to_bits(),
            Space::World,
            DrawCmd::Sprite {
                frame: image,
                pos: position.pos,
                tint: sprite.tint,
            },
        );
    }
}

fn draw_crops(world: &mut World, grid: &TileWorldGrid, frame: &mut RenderFrame) {
    let ts = grid.tile_size();
    let mut query = world.query::<(Entity, &Crop, &MapPosition)>();
    let store = world.resource::<AnimationStore>();
    for (entity, crop, position) in query.iter(world) {
        let Some(timeline) = store.get(&crop.kind.stages_key()) else {
            continue;
        };
        let pos = Vec2::new(position.pos.x, position.pos.y - crop.kind.y_offset());
        if !frame.is_visible(pos, Vec2::new(ts, ts)) {
            continue;
        }
        let stage = crop.stage().min(timeline.last_index());
        // Seedlings lie flat; grown plants stand among the player and trees.
        let layer = if stage == 0 {
            RenderLayer::GroundPlant
        } else {
            RenderLayer::Main
        };
        frame.push_with_tie(
            layer,
            position.pos.y + ts,
            entity.to_bits(),
            Space::World,
            DrawCmd::Sprite {
                frame: timeline.frame(stage).clone(),
                pos,
                tint: Color::WHITE,
            },
        );
    }
}

fn draw_trees(world: &mut World, grid: &TileWorldGrid, art: &TileArt, frame: &mut RenderFrame) {
    let ts = grid.tile_size();
    let mut query = world.query::<(Entity, &Tree, &MapPosition)>();
    let store = world.resource::<AnimationStore>();
    for (entity, tree, position) in query.iter(world) {
        let size = tree.size.sprite_size();
        let pos = Vec2::new(
            position.pos.x + (ts - size.x) / 2.0,
            position.pos.y + ts - size.y,
        );
        if !frame.is_visible(pos, size) {
            continue;
        }
        let Some(timeline) = store.get(&tree.sprite_key()) else {
            continue;
        };
        let base = position.pos.y + ts;
        frame.push_with_tie(
            RenderLayer::Main,
            base,
            entity.to_bits(),
            Space::World,
            DrawCmd::Sprite {
                frame: timeline.frame(0).clone(),
                pos,
                tint: Color::WHITE,
            },
        );
        if tree.is_alive() {
            let slots = tree.size.apple_slots();
            for (slot, _) in slots.iter().zip(tree.apples).filter(|(_, on)| *on) {
                frame.sprite(RenderLayer::Fruit, base, &art.apple, pos + *slot);
            }
        }
    }
}

fn fill(frame: &mut RenderFrame, depth: f32, color: Color, mode: BlendMode) {
    frame.push(RenderLayer::Sky, depth, Space::Screen, DrawCmd::Fill { color, mode });
}

fn draw_weather(world: &World, frame: &mut RenderFrame) {
    if let Some(cycle) = world.get_resource::<DayCycle>() {
        fill(frame, 0.0, cycle.sky_color(), BlendMode::Multiply);
        if let Some(fade) = cycle.fade_color() {
            fill(frame, 2.0, fade, BlendMode::Multiply);
        }
    }
    if world.get_resource::<Weather>().is_some_and(|w| w.raining) {
        fill(frame, 1.0, RAIN_DIM, BlendMode::Multiply);
    }
}

fn draw_hud(game: &GameContext, frame: &mut RenderFrame) {
    let bottom = frame.viewport.y;
    if let Some(item) = game.inventory.selected() {
        let count = game.inventory.count(item);
        let label = if item.is_tool() {
            item.name()
        } else {
            format!("{} x{}", item.name(), count)
        };
        if let Some(tool) = item.tool() {
            let icon = FrameId::new(format!("overlay/{}", tool.anim_name()));
            frame.push(
                RenderLayer::Ui,
                0.0,
                Space::Screen,
                DrawCmd::Sprite {
                    frame: icon,
                    pos: Vec2::new(40.0, bottom - 140.0),
                    tint: Color::WHITE,
                },
            );
        }
        frame.text(label, 40.0, bottom - 50.0, 22.0, Color::WHITE);
    }

    frame.text(
        format!("Day {}   Gold {}", game.day, game.gold),
        40.0,
        20.0,
        22.0,
        Color::WHITE,
    );

    let width = 200.0;
    let filled = width * game.energy as f32 / MAX_ENERGY as f32;
    let origin = Vec2::new(frame.viewport.x - width - 40.0, 24.0);
    frame.push(
        RenderLayer::Ui,
        0.0,
        Space::Screen,
        DrawCmd::Rect {
            pos: origin,
            size: Vec2::new(filled, 16.0),
            color: Color::GREEN,
            filled: true,
        },
    );
    frame.push(
        RenderLayer::Ui,
        1.0,
        Space::Screen,
        DrawCmd::Rect {
            pos: origin,
            size: Vec2::new(width, 16.0),
            color: Color::WHITE,
            filled: false,
        },
    );
}

fn draw_debug(world: &World, grid: &TileWorldGrid, actor: &Actor, frame: &mut RenderFrame) {
    let ts = grid.tile_size();
    for coord in visible_coords(grid, frame) {
        if !grid.is_passable(coord) {
            frame.push(
                RenderLayer::Ui,
                0.0,
                Space::World,
                DrawCmd::Rect {
                    pos: grid.grid_to_world(coord),
                    size: Vec2::new(ts, ts),
                    color: Color::RED,
                    filled: false,
                },
            );
        }
    }
    let (min, max) = actor.hitbox.aabb(actor.pos());
    frame.push(
        RenderLayer::Ui,
        0.0,
        Space::World,
        DrawCmd::Rect {
            pos: min,
            size: max - min,
            color: Color::GREEN,
            filled: false,
        },
    );
    let target = grid.grid_to_world(actor.target_coord(grid));
    frame.push(
        RenderLayer::Ui,
        0.0,
        Space::World,
        DrawCmd::Rect {
            pos: target,
            size: Vec2::new(ts, ts),
            color: Color::GOLD,
            filled: false,
        },
    );

    let entities = world.entities().len();
    let fps = world
        .get_resource::<WorldTime>()
        .filter(|t| t.delta > 0.0)
        .map_or(0.0, |t| 1.0 / t.delta);
    let center = actor.center();
    frame.text(
        format!(
            "DEBUG (F11)  fps: {:.0}  entities: {}  pos: ({:.0}, {:.0})  state: {:?}",
            fps,
            entities,
            center.x,
            center.y,
            actor.state()
        ),
        10.0,
        frame.viewport.y - 24.0,
        14.0,
        Color::GOLD,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::animationstore::Timeline;

    #[test]
    fn test_camera_clamps_to_map() {
        let view = Vec2::new(100.0, 100.0);
        let map = Vec2::new(400.0, 300.0);
        assert_eq!(camera_for(Vec2::new(10.0, 10.0), view, map), Vec2::ZERO);
        assert_eq!(camera_for(Vec2::new(200.0, 150.0), view, map), Vec2::new(150.0, 100.0));
        assert_eq!(camera_for(Vec2::new(395.0, 295.0), view, map), Vec2::new(300.0, 200.0));
    }

    #[test]
    fn test_preload_lists_cover_drawn_frames() {
        let mut store = AnimationStore::new();
        let walk = vec![FrameId::new("character/down/0"), FrameId::new("character/down/1")];
        store.insert("down", Timeline::uniform(walk.clone(), 0.1, true).unwrap());
        store.insert("down_alias", Timeline::uniform(walk.clone(), 0.2, true).unwrap());
        assert_eq!(timeline_frames(&store), walk);

        let decorations = decoration_frames();
        for id in ["tiles/grass", "soil/x", "soil/o", "overlay/seed", "objects/apple", "objects/sunflower"] {
            assert!(decorations.contains(&FrameId::new(id)), "missing {}", id);
        }
        assert!(decorations.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_small_map_stays_at_origin() {
        let view = Vec2::new(800.0, 600.0);
        let map = Vec2::new(320.0, 320.0);
        assert_eq!(camera_for(Vec2::new(160.0, 160.0), view, map), Vec2::ZERO);
    }
}
