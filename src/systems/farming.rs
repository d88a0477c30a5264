//! Crops, soil and trees.
//!
//! These run on the level [`World`] directly rather than in the schedule:
//! the level calls them at fixed points of its tick (a finished tool swing,
//! the overnight update) with the shared [`GameContext`] at hand.
//!
//! Tile state lives in the [`TileWorldGrid`] resource. Crops and trees are
//! entities carrying their grid coordinate, and there is at most one crop per
//! tile: a tile is `Planted` exactly while a [`Crop`] entity sits on it.

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::actor::Tool;
use crate::components::crop::{Crop, CropKind};
use crate::components::mapposition::MapPosition;
use crate::components::sprite::Sprite;
use crate::components::tree::{Chop, Tree};
use crate::components::ttl::Ttl;
use crate::components::zindex::ZIndex;
use crate::resources::animationstore::AnimationStore;
use crate::resources::gamecontext::{CropSave, FarmSnapshot, GameContext, TreeSave};
use crate::resources::inventory::Item;
use crate::resources::renderframe::{Color, RenderLayer};
use crate::resources::tilegrid::{GridCoord, InteractionKind, TileKind, TileWorldGrid};
use crate::resources::weather::LevelRng;

/// Seconds the white flash of a harvested crop stays visible.
pub const FLASH_SECONDS: f32 = 0.2;
/// Produce gained per harvested crop.
pub const HARVEST_YIELD: u32 = 2;

/// What a finished tool swing did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolEffect {
    /// The target tile does not react to this tool.
    Nothing,
    Tilled,
    Watered,
    Planted(CropKind),
    /// Hit a tree; `apple` is set when an apple fell into the inventory.
    Chopped { apple: bool },
    Felled,
}

pub fn crop_at(world: &mut World, coord: GridCoord) -> Option<Entity> {
    world
        .query::<(Entity, &Crop)>()
        .iter(world)
        .find(|(_, c)| c.coord == coord)
        .map(|(e, _)| e)
}

pub fn tree_at(world: &mut World, coord: GridCoord) -> Option<Entity> {
    world
        .query::<(Entity, &Tree)>()
        .iter(world)
        .find(|(_, t)| t.coord == coord)
        .map(|(e, _)| e)
}

/// Spawn a crop on `coord` with the given age. The number of growth stages
/// comes from the crop's timeline; without one nothing is spawned.
pub fn spawn_crop(
    world: &mut World,
    store: &AnimationStore,
    kind: CropKind,
    coord: GridCoord,
    age: f32,
) -> Option<Entity> {
    let stages = store.get(&kind.stages_key())?.frame_count();
    let mut crop = Crop::new(kind, coord, stages);
    crop.age = age.clamp(0.0, crop.max_age);
    let pos = world.resource::<TileWorldGrid>().grid_to_world(coord);
    Some(world.spawn((crop, MapPosition { pos })).id())
}

/// Spawn a tree standing on `coord`.
pub fn spawn_tree(world: &mut World, tree: Tree) -> Entity {
    let pos = world.resource::<TileWorldGrid>().grid_to_world(tree.coord);
    world.spawn((tree, MapPosition { pos })).id()
}

/// Resolve a finished swing of `tool` against the tile at `target`.
pub fn apply_tool(
    world: &mut World,
    store: &AnimationStore,
    tool: Tool,
    target: GridCoord,
    game: &mut GameContext,
) -> ToolEffect {
    let effect = match tool {
        Tool::Hoe => {
            let mut grid = world.resource_mut::<TileWorldGrid>();
            if grid.apply_interaction(target, InteractionKind::Till) {
                if game.raining {
                    grid.apply_interaction(target, InteractionKind::Water);
                }
                ToolEffect::Tilled
            } else {
                ToolEffect::Nothing
            }
        }
        Tool::WateringCan => {
            let mut grid = world.resource_mut::<TileWorldGrid>();
            if grid.apply_interaction(target, InteractionKind::Water) {
                ToolEffect::Watered
            } else {
                ToolEffect::Nothing
            }
        }
        Tool::Seed(kind) => plant(world, store, kind, target, game),
        Tool::Axe => chop(world, target, game),
    };
    debug!("{:?} on ({}, {}): {:?}", tool, target.x, target.y, effect);
    effect
}

fn plant(
    world: &mut World,
    store: &AnimationStore,
    kind: CropKind,
    target: GridCoord,
    game: &mut GameContext,
) -> ToolEffect {
    let seed = Item::Seed(kind);
    if !game.inventory.has(seed, 1) || crop_at(world, target).is_some() {
        return ToolEffect::Nothing;
    }
    if !store.contains(&kind.stages_key()) {
        return ToolEffect::Nothing;
    }
    if !world
        .resource_mut::<TileWorldGrid>()
        .apply_interaction(target, InteractionKind::Plant)
    {
        return ToolEffect::Nothing;
    }
    game.inventory.take(seed, 1);
    spawn_crop(world, store, kind, target, 0.0);
    ToolEffect::Planted(kind)
}

fn chop(world: &mut World, target: GridCoord, game: &mut GameContext) -> ToolEffect {
    let Some(entity) = tree_at(world, target) else {
        return ToolEffect::Nothing;
    };
    let Some(mut tree) = world.get_mut::<Tree>(entity) else {
        return ToolEffect::Nothing;
    };
    match tree.chop() {
        Chop::Stump => ToolEffect::Nothing,
        Chop::Hit => {
            let apple = tree.pick_apple();
            if apple {
                game.inventory.add(Item::Apple, 1);
            }
            ToolEffect::Chopped { apple }
        }
        Chop::Felled { apples } => {
            info!("Felled a tree at ({}, {})", target.x, target.y);
            game.inventory.add(Item::Wood, 1);
            if apples > 0 {
                game.inventory.add(Item::Apple, apples);
            }
            ToolEffect::Felled
        }
    }
}

/// Harvest the crop on `coord` if it is fully grown: the produce goes to the
/// inventory, the crop is replaced by a short white flash and the tile goes
/// back to tilled soil.
pub fn harvest(
    world: &mut World,
    store: &AnimationStore,
    coord: GridCoord,
    game: &mut GameContext,
) -> Option<CropKind> {
    let entity = crop_at(world, coord)?;
    let crop = world.get::<Crop>(entity)?.clone();
    if !crop.is_harvestable() {
        return None;
    }
    let pos = world.get::<MapPosition>(entity)?.pos;
    world.despawn(entity);
    world
        .resource_mut::<TileWorldGrid>()
        .apply_interaction(coord, InteractionKind::Harvest);
    game.inventory.add(Item::Produce(crop.kind), HARVEST_YIELD);

    let ts = world.resource::<TileWorldGrid>().tile_size();
    if let Some(timeline) = store.get(&crop.kind.stages_key()) {
        let frame = timeline.frame(crop.stage().min(timeline.last_index())).clone();
        world.spawn((
            Sprite::new(frame, ts, ts).with_tint(Color::WHITE.with_alpha(200)),
            MapPosition::new(pos.x, pos.y - crop.kind.y_offset()),
            ZIndex(RenderLayer::Main),
            Ttl::new(FLASH_SECONDS),
        ));
    }
    debug!("Harvested {} at ({}, {})", crop.kind.name(), coord.x, coord.y);
    Some(crop.kind)
}

/// Overnight update of the farm.
///
/// Crops on watered soil grow one day, then all soil dries. When `raining`
/// is set for the new day every worked tile is watered again. Trees regrow
/// apples. Returns how many crops grew.
pub fn overnight(world: &mut World, raining: bool, rng: &mut LevelRng) -> usize {
    let mut grown = 0;
    let mut crops = world.query::<&mut Crop>();
    let watered: Vec<GridCoord> = {
        let grid = world.resource::<TileWorldGrid>();
        grid.coords().filter(|c| grid.tile_at(*c).watered).collect()
    };
    for mut crop in crops.iter_mut(world) {
        if watered.contains(&crop.coord) {
            crop.grow();
            grown += 1;
        }
    }

    {
        let mut grid = world.resource_mut::<TileWorldGrid>();
        let coords: Vec<GridCoord> = grid.coords().collect();
        for coord in coords {
            grid.apply_interaction(coord, InteractionKind::Dry);
            if raining {
                grid.apply_interaction(coord, InteractionKind::Water);
            }
        }
    }

    let mut trees = world.query::<&mut Tree>();
    for mut tree in trees.iter_mut(world) {
        tree.regrow_apples(&mut rng.0);
    }
    grown
}

/// Everything about the farm that differs from `template`.
pub fn snapshot_farm(world: &mut World, template: &TileWorldGrid) -> FarmSnapshot {
    let tiles = world.resource::<TileWorldGrid>().changes_since(template);
    let mut crops: Vec<CropSave> = world
        .query::<&Crop>()
        .iter(world)
        .map(|c| CropSave {
            kind: c.kind,
            coord: c.coord,
            age: c.age,
        })
        .collect();
    crops.sort_by_key(|c| c.coord);
    let mut trees: Vec<TreeSave> = world
        .query::<&Tree>()
        .iter(world)
        .map(|t| TreeSave {
            coord: t.coord,
            health: t.health,
            apples: t.apples,
        })
        .collect();
    trees.sort_by_key(|t| t.coord);
    FarmSnapshot {
        tiles,
        crops,
        trees,
    }
}

/// Put a saved farm back onto a freshly built level world.
///
/// Trees are matched by coordinate with the ones the level spawned; saved
/// crops whose tile is not planted are dropped.
pub fn restore_farm(world: &mut World, store: &AnimationStore, snapshot: &FarmSnapshot) {
    world
        .resource_mut::<TileWorldGrid>()
        .restore(&snapshot.tiles);

    for saved in &snapshot.crops {
        let planted = world.resource::<TileWorldGrid>().tile_at(saved.coord).kind == TileKind::Planted;
        if planted && crop_at(world, saved.coord).is_none() {
            spawn_crop(world, store, saved.kind, saved.coord, saved.age);
        }
    }

    for saved in &snapshot.trees {
        if let Some(entity) = tree_at(world, saved.coord)
            && let Some(mut tree) = world.get_mut::<Tree>(entity)
        {
            tree.health = saved.health;
            tree.apples = saved.apples;
        }
    }
    debug!(
        "Restored {} tiles, {} crops, {} trees",
        snapshot.tiles.len(),
        snapshot.crops.len(),
        snapshot.trees.len()
    );
}
