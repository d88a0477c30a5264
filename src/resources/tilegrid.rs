//! Tile world grid.
//!
//! The grid maps integer [`GridCoord`]s to [`Tile`]s. Walkability, farmability
//! and interactables are fixed when the level loads; only the tile kind and
//! the watered flag change afterwards, and only through
//! [`TileWorldGrid::apply_interaction`].
//!
//! Queries never fail: coordinates outside the grid return [`Tile::VOID`],
//! which is not walkable, so nothing can leave the world through its edges.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::components::mapposition::Vec2;

/// Every suffix [`TileWorldGrid::soil_variant`] can return.
pub const SOIL_VARIANTS: [&str; 16] = [
    "o", "x", "l", "r", "t", "b", "lr", "tb", "tl", "tr", "bl", "br", "tbl", "tbr", "lrt", "lrb",
];

/// Integer tile coordinate (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        GridCoord { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        GridCoord::new(self.x + dx, self.y + dy)
    }
}

/// Mutable kind of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Outside the grid.
    Void,
    Ground,
    Grass,
    Tilled,
    Planted,
    Water,
    Wall,
    Floor,
}

/// Fixed interactable attached to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interactable {
    None,
    Bed,
    Trader,
}

/// Requests that can change a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Till,
    Plant,
    Water,
    Dry,
    Harvest,
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub walkable: bool,
    pub farmable: bool,
    pub interactable: Interactable,
    pub watered: bool,
}

impl Tile {
    /// Sentinel returned for every out-of-bounds query.
    pub const VOID: Tile = Tile {
        kind: TileKind::Void,
        walkable: false,
        farmable: false,
        interactable: Interactable::None,
        watered: false,
    };

    /// Build a tile with the default properties of `kind`.
    pub fn of(kind: TileKind) -> Tile {
        let walkable = !matches!(kind, TileKind::Void | TileKind::Water | TileKind::Wall);
        Tile {
            kind,
            walkable,
            farmable: kind == TileKind::Grass,
            interactable: Interactable::None,
            watered: false,
        }
    }

    pub fn with_interactable(mut self, interactable: Interactable) -> Tile {
        self.interactable = interactable;
        self
    }

    pub fn blocking(mut self) -> Tile {
        self.walkable = false;
        self
    }

    /// Soil that has been worked by the hoe, with or without a crop.
    pub fn is_soil(&self) -> bool {
        matches!(self.kind, TileKind::Tilled | TileKind::Planted)
    }
}

/// A tile whose mutable state differs from the level template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileChange {
    pub coord: GridCoord,
    pub kind: TileKind,
    pub watered: bool,
}

/// The level's tile grid. Bounds never change after load.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TileWorldGrid {
    width: i32,
    height: i32,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl TileWorldGrid {
    /// Grid of `width` x `height` copies of `fill`.
    pub fn new(width: u32, height: u32, tile_size: f32, fill: Tile) -> Self {
        TileWorldGrid {
            width: width as i32,
            height: height as i32,
            tile_size,
            tiles: vec![fill; (width * height) as usize],
        }
    }

    /// Build from rows of tiles. Rows must all have the same length.
    pub fn from_rows(rows: Vec<Vec<Tile>>, tile_size: f32) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(TileWorldGrid {
            width: width as i32,
            height: height as i32,
            tile_size,
            tiles: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Size of the whole map in world units.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.y * self.width + coord.x) as usize)
        } else {
            None
        }
    }

    /// Tile at `coord`, or [`Tile::VOID`] outside the grid.
    pub fn tile_at(&self, coord: GridCoord) -> Tile {
        self.index(coord)
            .map(|i| self.tiles[i])
            .unwrap_or(Tile::VOID)
    }

    /// Whether an entity may occupy `coord`.
    pub fn is_passable(&self, coord: GridCoord) -> bool {
        self.tile_at(coord).walkable
    }

    /// Grid cell containing a world position.
    pub fn world_to_grid(&self, pos: Vec2) -> GridCoord {
        GridCoord::new(
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        )
    }

    /// Top-left world position of a grid cell.
    pub fn grid_to_world(&self, coord: GridCoord) -> Vec2 {
        Vec2::new(
            coord.x as f32 * self.tile_size,
            coord.y as f32 * self.tile_size,
        )
    }

    /// Iterate every in-bounds coordinate, row by row.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + use<> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| GridCoord::new(x, y)))
    }

    /// Apply an interaction to one tile.
    ///
    /// Returns `false` and leaves the tile untouched when the tile does not
    /// support the interaction in its current kind, or when `coord` is out of
    /// bounds.
    pub fn apply_interaction(&mut self, coord: GridCoord, interaction: InteractionKind) -> bool {
        let Some(i) = self.index(coord) else {
            return false;
        };
        let tile = &mut self.tiles[i];
        match (interaction, tile.kind) {
            (InteractionKind::Till, TileKind::Grass) if tile.farmable => {
                tile.kind = TileKind::Tilled;
                true
            }
            (InteractionKind::Plant, TileKind::Tilled) => {
                tile.kind = TileKind::Planted;
                true
            }
            (InteractionKind::Water, TileKind::Tilled | TileKind::Planted) if !tile.watered => {
                tile.watered = true;
                true
            }
            (InteractionKind::Dry, _) if tile.watered => {
                tile.watered = false;
                true
            }
            (InteractionKind::Harvest, TileKind::Planted) => {
                tile.kind = TileKind::Tilled;
                true
            }
            _ => false,
        }
    }

    /// Autotile suffix for a worked soil tile, chosen from which of its four
    /// neighbours are worked soil too. Letters name the open sides.
    pub fn soil_variant(&self, coord: GridCoord) -> &'static str {
        let soil = |dx, dy| self.tile_at(coord.offset(dx, dy)).is_soil();
        let (t, b, l, r) = (soil(0, -1), soil(0, 1), soil(-1, 0), soil(1, 0));
        match (t, b, l, r) {
            (true, true, true, true) => "x",
            (false, false, true, false) => "r",
            (false, false, false, true) => "l",
            (false, false, true, true) => "lr",
            (true, false, false, false) => "b",
            (false, true, false, false) => "t",
            (true, true, false, false) => "tb",
            (false, true, true, false) => "tr",
            (false, true, false, true) => "tl",
            (true, false, true, false) => "br",
            (true, false, false, true) => "bl",
            (true, true, false, true) => "tbr",
            (true, true, true, false) => "tbl",
            (true, false, true, true) => "lrb",
            (false, true, true, true) => "lrt",
            (false, false, false, false) => "o",
        }
    }

    /// Every tile whose kind or watered flag differs from `template`.
    pub fn changes_since(&self, template: &TileWorldGrid) -> Vec<TileChange> {
        self.coords()
            .filter_map(|coord| {
                let now = self.tile_at(coord);
                let then = template.tile_at(coord);
                (now.kind != then.kind || now.watered != then.watered).then_some(TileChange {
                    coord,
                    kind: now.kind,
                    watered: now.watered,
                })
            })
            .collect()
    }

    /// Re-apply changes recorded by [`changes_since`](Self::changes_since).
    ///
    /// Only used when a saved farm is loaded; out-of-bounds entries are
    /// skipped. Returns how many tiles were restored.
    pub fn restore(&mut self, changes: &[TileChange]) -> usize {
        let mut restored = 0;
        for change in changes {
            if let Some(i) = self.index(change.coord) {
                self.tiles[i].kind = change.kind;
                self.tiles[i].watered = change.watered;
                restored += 1;
            }
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grass_grid(w: u32, h: u32) -> TileWorldGrid {
        TileWorldGrid::new(w, h, 1.0, Tile::of(TileKind::Grass))
    }

    #[test]
    fn test_out_of_bounds_is_void_and_blocked() {
        let grid = grass_grid(10, 10);
        for coord in [
            GridCoord::new(-1, 0),
            GridCoord::new(0, -1),
            GridCoord::new(10, 5),
            GridCoord::new(5, 10),
            GridCoord::new(i32::MAX, i32::MIN),
        ] {
            let tile = grid.tile_at(coord);
            assert_eq!(tile.kind, TileKind::Void);
            assert!(!tile.walkable);
        }
    }

    #[test]
    fn test_till_plant_sequence() {
        let mut grid = grass_grid(10, 10);
        let c = GridCoord::new(3, 3);
        assert!(grid.apply_interaction(c, InteractionKind::Till));
        assert_eq!(grid.tile_at(c).kind, TileKind::Tilled);
        assert!(!grid.apply_interaction(c, InteractionKind::Till));
        assert_eq!(grid.tile_at(c).kind, TileKind::Tilled);
        assert!(grid.apply_interaction(c, InteractionKind::Plant));
        assert_eq!(grid.tile_at(c).kind, TileKind::Planted);
    }

    #[test]
    fn test_water_and_dry() {
        let mut grid = grass_grid(4, 4);
        let c = GridCoord::new(1, 1);
        assert!(!grid.apply_interaction(c, InteractionKind::Water));
        grid.apply_interaction(c, InteractionKind::Till);
        assert!(grid.apply_interaction(c, InteractionKind::Water));
        assert!(!grid.apply_interaction(c, InteractionKind::Water));
        assert!(grid.tile_at(c).watered);
        assert!(grid.apply_interaction(c, InteractionKind::Dry));
        assert!(!grid.apply_interaction(c, InteractionKind::Dry));
    }

    #[test]
    fn test_harvest_returns_to_tilled() {
        let mut grid = grass_grid(4, 4);
        let c = GridCoord::new(2, 2);
        assert!(!grid.apply_interaction(c, InteractionKind::Harvest));
        grid.apply_interaction(c, InteractionKind::Till);
        grid.apply_interaction(c, InteractionKind::Plant);
        assert!(grid.apply_interaction(c, InteractionKind::Harvest));
        assert_eq!(grid.tile_at(c).kind, TileKind::Tilled);
    }

    #[test]
    fn test_interactions_outside_grid_fail() {
        let mut grid = grass_grid(2, 2);
        assert!(!grid.apply_interaction(GridCoord::new(5, 5), InteractionKind::Till));
    }

    #[test]
    fn test_non_farmable_ground_cannot_be_tilled() {
        let mut grid = TileWorldGrid::new(2, 2, 1.0, Tile::of(TileKind::Ground));
        assert!(!grid.apply_interaction(GridCoord::new(0, 0), InteractionKind::Till));
    }

    #[test]
    fn test_world_grid_conversion() {
        let grid = TileWorldGrid::new(4, 4, 64.0, Tile::of(TileKind::Ground));
        assert_eq!(grid.world_to_grid(Vec2::new(65.0, 127.9)), GridCoord::new(1, 1));
        assert_eq!(grid.world_to_grid(Vec2::new(-0.5, 0.0)), GridCoord::new(-1, 0));
        assert_eq!(grid.grid_to_world(GridCoord::new(2, 3)), Vec2::new(128.0, 192.0));
    }

    #[test]
    fn test_soil_variant_neighbours() {
        let mut grid = grass_grid(5, 5);
        let centre = GridCoord::new(2, 2);
        grid.apply_interaction(centre, InteractionKind::Till);
        assert_eq!(grid.soil_variant(centre), "o");
        grid.apply_interaction(GridCoord::new(1, 2), InteractionKind::Till);
        grid.apply_interaction(GridCoord::new(3, 2), InteractionKind::Till);
        assert_eq!(grid.soil_variant(centre), "lr");
        grid.apply_interaction(GridCoord::new(2, 1), InteractionKind::Till);
        grid.apply_interaction(GridCoord::new(2, 3), InteractionKind::Till);
        assert_eq!(grid.soil_variant(centre), "x");
    }

    #[test]
    fn test_every_soil_layout_has_a_listed_variant() {
        let around = [GridCoord::new(2, 1), GridCoord::new(2, 3), GridCoord::new(1, 2), GridCoord::new(3, 2)];
        let centre = GridCoord::new(2, 2);
        let mut seen = Vec::new();
        for mask in 0..16u8 {
            let mut grid = grass_grid(5, 5);
            grid.apply_interaction(centre, InteractionKind::Till);
            for (bit, coord) in around.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    grid.apply_interaction(*coord, InteractionKind::Till);
                }
            }
            let variant = grid.soil_variant(centre);
            assert!(SOIL_VARIANTS.contains(&variant), "unlisted variant {}", variant);
            seen.push(variant);
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), SOIL_VARIANTS.len());
    }

    #[test]
    fn test_changes_roundtrip_through_restore() {
        let template = grass_grid(4, 4);
        let mut grid = template.clone();
        grid.apply_interaction(GridCoord::new(0, 0), InteractionKind::Till);
        grid.apply_interaction(GridCoord::new(0, 0), InteractionKind::Water);
        let changes = grid.changes_since(&template);
        assert_eq!(changes.len(), 1);
        let mut fresh = template.clone();
        assert_eq!(fresh.restore(&changes), 1);
        assert_eq!(fresh, grid);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![Tile::of(TileKind::Grass); 3], vec![Tile::of(TileKind::Grass); 2]];
        assert!(TileWorldGrid::from_rows(rows, 1.0).is_none());
    }
}
