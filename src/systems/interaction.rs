//! The interact button.
//!
//! Interactables are fixed on tiles: the bed starts the sleep fade, the
//! trader opens the shop. Both react when the player stands on them or faces
//! them. Facing a tree with apples picks one.

use bevy_ecs::prelude::*;

use crate::components::actor::Actor;
use crate::components::tree::Tree;
use crate::resources::gamecontext::GameContext;
use crate::resources::inventory::Item;
use crate::resources::tilegrid::{Interactable, TileWorldGrid};
use crate::systems::farming::tree_at;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Nothing,
    Sleep,
    Shop,
    PickedApple,
}

pub fn interact(world: &mut World, actor: &Actor, game: &mut GameContext) -> Interaction {
    let (standing, target) = {
        let grid = world.resource::<TileWorldGrid>();
        (actor.standing_coord(grid), actor.target_coord(grid))
    };
    for coord in [standing, target] {
        match world.resource::<TileWorldGrid>().tile_at(coord).interactable {
            Interactable::Bed => return Interaction::Sleep,
            Interactable::Trader => return Interaction::Shop,
            Interactable::None => {}
        }
    }
    if let Some(entity) = tree_at(world, target)
        && let Some(mut tree) = world.get_mut::<Tree>(entity)
        && tree.pick_apple()
    {
        game.inventory.add(Item::Apple, 1);
        return Interaction::PickedApple;
    }
    Interaction::Nothing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::actor::{MoveIntent, required_animation_keys};
    use crate::components::hitbox::Hitbox;
    use crate::components::mapposition::Vec2;
    use crate::components::tree::TreeSize;
    use crate::resources::animationstore::{AnimationStore, FrameId, Timeline};
    use crate::resources::tilegrid::{GridCoord, Tile, TileKind};
    use crate::systems::farming::spawn_tree;

    fn store() -> AnimationStore {
        let mut store = AnimationStore::new();
        for key in required_animation_keys() {
            let frames = vec![FrameId::new(format!("{}/0", key))];
            store.insert(key, Timeline::uniform(frames, 0.1, false).unwrap());
        }
        store
    }

    /// 5x5 floor with a bed at (2, 4) and a trader at (4, 2).
    fn world() -> World {
        let mut rows: Vec<Vec<Tile>> = (0..5)
            .map(|_| (0..5).map(|_| Tile::of(TileKind::Floor)).collect())
            .collect();
        rows[4][2] = Tile::of(TileKind::Floor).with_interactable(Interactable::Bed);
        rows[2][4] = Tile::of(TileKind::Ground).with_interactable(Interactable::Trader);
        let mut world = World::new();
        world.insert_resource(TileWorldGrid::from_rows(rows, 10.0).unwrap());
        world
    }

    /// Actor whose hitbox (a point-sized box) is centred on `at`'s tile.
    fn actor_at(at: GridCoord, store: &AnimationStore) -> Actor {
        let pos = Vec2::new(at.x as f32 * 10.0 + 4.0, at.y as f32 * 10.0 + 4.0);
        Actor::new(pos, 10.0, Hitbox::new(2.0, 2.0), store).unwrap()
    }

    #[test]
    fn test_bed_underfoot_or_ahead() {
        let store = store();
        let mut w = world();
        let mut game = GameContext::new_game();
        let on_bed = actor_at(GridCoord::new(2, 4), &store);
        assert_eq!(interact(&mut w, &on_bed, &mut game), Interaction::Sleep);
        // Default facing is down, so (2, 3) faces the bed.
        let above = actor_at(GridCoord::new(2, 3), &store);
        assert_eq!(interact(&mut w, &above, &mut game), Interaction::Sleep);
        let away = actor_at(GridCoord::new(0, 0), &store);
        assert_eq!(interact(&mut w, &away, &mut game), Interaction::Nothing);
    }

    #[test]
    fn test_trader_opens_shop() {
        let store = store();
        let mut w = world();
        let mut game = GameContext::new_game();
        let mut actor = actor_at(GridCoord::new(3, 2), &store);
        let grid = w.resource::<TileWorldGrid>().clone();
        actor.update(0.0, &grid, &MoveIntent::walk(1.0, 0.0), &store);
        assert_eq!(interact(&mut w, &actor, &mut game), Interaction::Shop);
    }

    #[test]
    fn test_picks_apples_until_bare() {
        let store = store();
        let mut w = world();
        let mut game = GameContext::new_game();
        let mut tree = Tree::new(TreeSize::Small, GridCoord::new(0, 1));
        tree.apples[2] = true;
        spawn_tree(&mut w, tree);
        let actor = actor_at(GridCoord::new(0, 0), &store);
        assert_eq!(interact(&mut w, &actor, &mut game), Interaction::PickedApple);
        assert_eq!(interact(&mut w, &actor, &mut game), Interaction::Nothing);
        assert_eq!(game.inventory.count(Item::Apple), 1);
    }
}
