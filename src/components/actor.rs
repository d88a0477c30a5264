//! Movable entities.
//!
//! An [`Actor`] owns its position, velocity, facing, logical state and the
//! [`Animator`] that plays the timeline for that state. [`Actor::update`]
//! runs one tick:
//!
//! 1. turn the [`MoveIntent`] into a displacement,
//! 2. sweep the hitbox across the tile grid, horizontal axis first and then
//!    vertical, so an actor slides along walls instead of stopping dead,
//! 3. derive the new [`ActorState`] from the displacement actually applied,
//! 4. re-key the animator when the state or facing changed, otherwise
//!    advance it by the tick's delta.
//!
//! Tool use and hurt are play-once states: the actor cannot move until the
//! timeline finishes. The finished tool is reported in
//! [`ActorUpdate::completed_action`] so the level can resolve its effect on
//! the grid through [`TileWorldGrid::apply_interaction`]; the actor itself
//! never mutates tiles.
//!
//! # Related
//!
//! - [`crate::screens::level`] – drives the player actor every tick
//! - [`crate::systems::farming`] – resolves completed tool actions

use bevy_ecs::prelude::Component;

use crate::components::animation::Animator;
use crate::components::crop::CropKind;
use crate::components::hitbox::Hitbox;
use crate::components::mapposition::Vec2;
use crate::error::{GameError, GameResult};
use crate::resources::animationstore::AnimationStore;
use crate::resources::tilegrid::{GridCoord, TileWorldGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Down, Facing::Left, Facing::Right];

    pub fn name(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::new(0.0, -1.0),
            Facing::Down => Vec2::new(0.0, 1.0),
            Facing::Left => Vec2::new(-1.0, 0.0),
            Facing::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Facing for a movement direction. Horizontal input wins on diagonals.
    pub fn from_direction(dir: Vec2) -> Option<Facing> {
        if dir.x < 0.0 {
            Some(Facing::Left)
        } else if dir.x > 0.0 {
            Some(Facing::Right)
        } else if dir.y < 0.0 {
            Some(Facing::Up)
        } else if dir.y > 0.0 {
            Some(Facing::Down)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Hoe,
    Axe,
    WateringCan,
    Seed(CropKind),
}

impl Tool {
    /// Suffix used in animation keys.
    pub fn anim_name(self) -> &'static str {
        match self {
            Tool::Hoe => "hoe",
            Tool::Axe => "axe",
            Tool::WateringCan => "water",
            Tool::Seed(_) => "seed",
        }
    }

    /// Sound played when the swing starts.
    pub fn sound(self) -> &'static str {
        match self {
            Tool::Hoe => "hoe",
            Tool::Axe => "axe",
            Tool::WateringCan => "water",
            Tool::Seed(_) => "plant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorState {
    Idle,
    Moving,
    Acting(Tool),
    Hurt,
}

impl ActorState {
    /// States that hold the actor in place until their animation ends.
    pub fn is_locked(self) -> bool {
        matches!(self, ActorState::Acting(_) | ActorState::Hurt)
    }
}

/// Animation key for a state seen from a facing.
pub fn animation_key(state: ActorState, facing: Facing) -> String {
    let dir = facing.name();
    match state {
        ActorState::Idle => format!("{}_idle", dir),
        ActorState::Moving => dir.to_string(),
        ActorState::Acting(tool) => format!("{}_{}", dir, tool.anim_name()),
        ActorState::Hurt => format!("{}_hurt", dir),
    }
}

/// Every key an actor can ask for. Loaders check these up front.
pub fn required_animation_keys() -> Vec<String> {
    let states = [
        ActorState::Idle,
        ActorState::Moving,
        ActorState::Acting(Tool::Hoe),
        ActorState::Acting(Tool::Axe),
        ActorState::Acting(Tool::WateringCan),
        ActorState::Acting(Tool::Seed(CropKind::Corn)),
        ActorState::Hurt,
    ];
    Facing::ALL
        .iter()
        .flat_map(|f| states.iter().map(move |s| animation_key(*s, *f)))
        .collect()
}

/// What the actor wants to do this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    /// Desired direction; normalised internally.
    pub direction: Vec2,
    pub use_tool: Option<Tool>,
}

impl MoveIntent {
    pub fn walk(x: f32, y: f32) -> Self {
        MoveIntent {
            direction: Vec2::new(x, y),
            use_tool: None,
        }
    }

    pub fn tool(tool: Tool) -> Self {
        MoveIntent {
            direction: Vec2::ZERO,
            use_tool: Some(tool),
        }
    }
}

/// Outcome of one [`Actor::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorUpdate {
    pub previous: ActorState,
    pub state: ActorState,
    /// Tool whose swing finished this tick.
    pub completed_action: Option<Tool>,
    /// World displacement actually applied.
    pub moved: Vec2,
}

impl ActorUpdate {
    pub fn state_changed(&self) -> bool {
        self.previous != self.state
    }
}

#[derive(Component, Debug, Clone)]
pub struct Actor {
    pos: Vec2,
    velocity: Vec2,
    facing: Facing,
    state: ActorState,
    /// World units per second.
    pub speed: f32,
    pub hitbox: Hitbox,
    animator: Animator,
}

impl Actor {
    /// New idle actor facing down. Fails if the store has no `down_idle`.
    pub fn new(pos: Vec2, speed: f32, hitbox: Hitbox, store: &AnimationStore) -> GameResult<Self> {
        let key = animation_key(ActorState::Idle, Facing::Down);
        let animator = Animator::new(key.as_str(), store)
            .ok_or_else(|| GameError::config(format!("missing animation '{}'", key)))?;
        Ok(Actor {
            pos,
            velocity: Vec2::ZERO,
            facing: Facing::Down,
            state: ActorState::Idle,
            speed,
            hitbox,
            animator,
        })
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Hitbox centre in world space.
    pub fn center(&self) -> Vec2 {
        self.hitbox.center(self.pos)
    }

    /// Place the actor without collision checks (spawn, load).
    pub fn teleport(&mut self, pos: Vec2) {
        self.pos = pos;
        self.velocity = Vec2::ZERO;
    }

    /// Tile a tool used now would hit: three quarters of a tile ahead of the
    /// hitbox centre.
    pub fn target_coord(&self, grid: &TileWorldGrid) -> GridCoord {
        let reach = self.facing.unit() * (grid.tile_size() * 0.75);
        grid.world_to_grid(self.center() + reach)
    }

    /// Tile under the hitbox centre.
    pub fn standing_coord(&self, grid: &TileWorldGrid) -> GridCoord {
        grid.world_to_grid(self.center())
    }

    /// Force the hurt state, interrupting whatever the actor was doing.
    pub fn hurt(&mut self, store: &AnimationStore) -> bool {
        self.velocity = Vec2::ZERO;
        self.enter(ActorState::Hurt, self.facing, store)
    }

    /// Switch state and facing, re-keying the animator if the key changed.
    fn enter(&mut self, state: ActorState, facing: Facing, store: &AnimationStore) -> bool {
        self.state = state;
        self.facing = facing;
        let key = animation_key(state, facing);
        let changed = self.animator.set_key(&key, store);
        if !changed && self.animator.key() == key && state.is_locked() {
            // Re-entering the same play-once state starts the swing over.
            self.animator.restart();
            return true;
        }
        changed
    }

    /// Run one tick. See the module docs for the order of steps.
    pub fn update(
        &mut self,
        dt: f32,
        grid: &TileWorldGrid,
        intent: &MoveIntent,
        store: &AnimationStore,
    ) -> ActorUpdate {
        let dt = if dt > 0.0 && dt.is_finite() { dt } else { 0.0 };
        let previous = self.state;
        let mut result = ActorUpdate {
            previous,
            state: previous,
            completed_action: None,
            moved: Vec2::ZERO,
        };

        if previous.is_locked() {
            self.velocity = Vec2::ZERO;
            let outcome = self.animator.advance(dt);
            if outcome.finished || self.animator.player().is_finished() {
                if let ActorState::Acting(tool) = previous {
                    result.completed_action = Some(tool);
                }
                self.enter(ActorState::Idle, self.facing, store);
            }
            result.state = self.state;
            return result;
        }

        if let Some(tool) = intent.use_tool {
            self.velocity = Vec2::ZERO;
            self.enter(ActorState::Acting(tool), self.facing, store);
            result.state = self.state;
            return result;
        }

        let dir = intent.direction.normalize_or_zero();
        let facing = Facing::from_direction(dir).unwrap_or(self.facing);
        let moved = self.move_and_collide(dir * (self.speed * dt), grid);
        self.velocity = if dt > 0.0 { moved * (1.0 / dt) } else { Vec2::ZERO };
        result.moved = moved;

        // Walking into a wall stands still; a zero-length tick keeps the walk.
        let state = if !moved.is_zero() || (dt == 0.0 && !dir.is_zero() && previous == ActorState::Moving) {
            ActorState::Moving
        } else {
            ActorState::Idle
        };
        if !self.enter(state, facing, store) {
            self.animator.advance(dt);
        }
        result.state = self.state;
        result
    }

    /// Apply `delta` one axis at a time, clamping each axis against blocking
    /// tiles. Returns the displacement actually applied.
    pub fn move_and_collide(&mut self, delta: Vec2, grid: &TileWorldGrid) -> Vec2 {
        let start = self.pos;
        let ts = grid.tile_size();

        let (min, max) = self.hitbox.aabb(self.pos);
        let dx = sweep(grid, min.x / ts, max.x / ts, min.y / ts, max.y / ts, delta.x / ts, Axis::X);
        self.pos.x += dx * ts;

        let (min, max) = self.hitbox.aabb(self.pos);
        let dy = sweep(grid, min.y / ts, max.y / ts, min.x / ts, max.x / ts, delta.y / ts, Axis::Y);
        self.pos.y += dy * ts;

        self.pos - start
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Span of tile indices covered by `[lo, hi)` in tile units.
fn covered(lo: f32, hi: f32) -> std::ops::RangeInclusive<i32> {
    let first = lo.floor() as i32;
    let last = (hi.ceil() as i32 - 1).max(first);
    first..=last
}

/// Move the box `[lo, hi)` along one axis by `delta` (all in tile units),
/// stopping at the first line of tiles that is not passable across the
/// perpendicular span `[perp_lo, perp_hi)`. Returns the allowed delta.
fn sweep(
    grid: &TileWorldGrid,
    lo: f32,
    hi: f32,
    perp_lo: f32,
    perp_hi: f32,
    delta: f32,
    axis: Axis,
) -> f32 {
    if delta == 0.0 || !delta.is_finite() {
        return 0.0;
    }
    let perp = covered(perp_lo, perp_hi);
    let line_blocked = |line: i32| {
        perp.clone().any(|p| {
            let coord = match axis {
                Axis::X => GridCoord::new(line, p),
                Axis::Y => GridCoord::new(p, line),
            };
            !grid.is_passable(coord)
        })
    };

    if delta > 0.0 {
        let first = hi.ceil() as i32;
        let last = (hi + delta).ceil() as i32 - 1;
        let mut line = first;
        while line <= last {
            if line_blocked(line) {
                return (line as f32 - hi).max(0.0);
            }
            line += 1;
        }
    } else {
        let first = lo.floor() as i32 - 1;
        let last = (lo + delta).floor() as i32;
        let mut line = first;
        while line >= last {
            if line_blocked(line) {
                return ((line + 1) as f32 - lo).min(0.0);
            }
            line -= 1;
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::animationstore::{FrameId, Timeline};
    use crate::resources::tilegrid::{Tile, TileKind};

    fn store() -> AnimationStore {
        let mut store = AnimationStore::new();
        for key in required_animation_keys() {
            let frames = vec![FrameId::new(format!("{}/0", key)), FrameId::new(format!("{}/1", key))];
            let looped = !key.ends_with("_hoe")
                && !key.ends_with("_axe")
                && !key.ends_with("_water")
                && !key.ends_with("_seed")
                && !key.ends_with("_hurt");
            store.insert(key, Timeline::uniform(frames, 0.25, looped).unwrap());
        }
        store
    }

    fn open_grid() -> TileWorldGrid {
        TileWorldGrid::new(10, 10, 1.0, Tile::of(TileKind::Ground))
    }

    fn unit_actor(x: f32, y: f32, speed: f32) -> Actor {
        Actor::new(Vec2::new(x, y), speed, Hitbox::new(1.0, 1.0), &store()).unwrap()
    }

    #[test]
    fn test_clamps_at_grid_edge() {
        let store = store();
        let grid = open_grid();
        let mut actor = unit_actor(5.0, 5.0, 5.0);
        actor.update(1.0, &grid, &MoveIntent::walk(0.0, 1.0), &store);
        assert_eq!(actor.pos(), Vec2::new(5.0, 9.0));
    }

    #[test]
    fn test_slides_along_wall() {
        let store = store();
        let mut rows = vec![vec![Tile::of(TileKind::Ground); 10]; 10];
        rows[4] = vec![Tile::of(TileKind::Wall); 10];
        let grid = TileWorldGrid::from_rows(rows, 1.0).unwrap();
        let mut actor = unit_actor(2.0, 5.0, 2.0_f32.sqrt());
        // Diagonal up-right: vertical is blocked by the wall, horizontal slides.
        actor.update(1.0, &grid, &MoveIntent::walk(1.0, -1.0), &store);
        assert!((actor.pos().x - 3.0).abs() < 1e-5);
        assert_eq!(actor.pos().y, 5.0);
        assert_eq!(actor.state(), ActorState::Moving);
        assert_eq!(actor.facing(), Facing::Right);
    }

    #[test]
    fn test_large_delta_does_not_tunnel() {
        let store = store();
        let mut rows = vec![vec![Tile::of(TileKind::Ground); 10]; 10];
        rows[5][7] = Tile::of(TileKind::Water);
        let grid = TileWorldGrid::from_rows(rows, 1.0).unwrap();
        let mut actor = unit_actor(1.0, 5.0, 100.0);
        actor.update(1.0, &grid, &MoveIntent::walk(1.0, 0.0), &store);
        assert_eq!(actor.pos(), Vec2::new(6.0, 5.0));
    }

    #[test]
    fn test_negative_sweep_stops_at_edge() {
        let store = store();
        let grid = open_grid();
        let mut actor = unit_actor(3.5, 2.0, 10.0);
        actor.update(1.0, &grid, &MoveIntent::walk(-1.0, 0.0), &store);
        assert_eq!(actor.pos(), Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_state_change_resets_animation() {
        let store = store();
        let grid = open_grid();
        let mut actor = unit_actor(5.0, 5.0, 1.0);
        actor.update(0.375, &grid, &MoveIntent::default(), &store);
        assert_eq!(actor.animator().player().frame_index(), 1);
        actor.update(0.125, &grid, &MoveIntent::walk(0.0, 1.0), &store);
        assert_eq!(actor.state(), ActorState::Moving);
        assert_eq!(actor.animator().key(), "down");
        assert_eq!(actor.animator().player().frame_index(), 0);
        assert_eq!(actor.animator().player().elapsed(), 0.0);
    }

    #[test]
    fn test_pushing_into_wall_is_idle() {
        let store = store();
        let mut rows = vec![vec![Tile::of(TileKind::Ground); 10]; 10];
        rows[4] = vec![Tile::of(TileKind::Wall); 10];
        let grid = TileWorldGrid::from_rows(rows, 1.0).unwrap();
        let mut actor = unit_actor(2.0, 5.0, 1.0);
        actor.update(0.25, &grid, &MoveIntent::walk(1.0, 0.0), &store);
        assert_eq!(actor.state(), ActorState::Moving);

        let out = actor.update(0.25, &grid, &MoveIntent::walk(0.0, -1.0), &store);
        assert_eq!(out.moved, Vec2::ZERO);
        assert_eq!(actor.velocity(), Vec2::ZERO);
        assert_eq!(actor.state(), ActorState::Idle);
        assert_eq!(actor.facing(), Facing::Up);
        assert_eq!(actor.animator().key(), "up_idle");

        // A skipped tick does not interrupt a walk.
        actor.update(0.25, &grid, &MoveIntent::walk(1.0, 0.0), &store);
        actor.update(0.0, &grid, &MoveIntent::walk(1.0, 0.0), &store);
        assert_eq!(actor.state(), ActorState::Moving);
    }

    #[test]
    fn test_tool_locks_until_swing_finishes() {
        let store = store();
        let grid = open_grid();
        let mut actor = unit_actor(5.0, 5.0, 1.0);
        let up = actor.update(0.1, &grid, &MoveIntent::tool(Tool::Hoe), &store);
        assert!(up.state_changed());
        assert_eq!(actor.animator().key(), "down_hoe");

        let mid = actor.update(0.25, &grid, &MoveIntent::walk(1.0, 0.0), &store);
        assert_eq!(mid.completed_action, None);
        assert_eq!(actor.pos(), Vec2::new(5.0, 5.0));

        let done = actor.update(0.25, &grid, &MoveIntent::walk(1.0, 0.0), &store);
        assert_eq!(done.completed_action, Some(Tool::Hoe));
        assert_eq!(actor.state(), ActorState::Idle);
        assert_eq!(actor.animator().key(), "down_idle");
    }

    #[test]
    fn test_hurt_interrupts_and_recovers() {
        let store = store();
        let grid = open_grid();
        let mut actor = unit_actor(5.0, 5.0, 1.0);
        actor.update(0.1, &grid, &MoveIntent::walk(1.0, 0.0), &store);
        assert!(actor.hurt(&store));
        assert_eq!(actor.animator().key(), "right_hurt");
        let out = actor.update(1.0, &grid, &MoveIntent::default(), &store);
        assert_eq!(out.completed_action, None);
        assert_eq!(actor.state(), ActorState::Idle);
    }

    #[test]
    fn test_target_coord_faces_ahead() {
        let store = store();
        let grid = TileWorldGrid::new(10, 10, 64.0, Tile::of(TileKind::Ground));
        let mut actor = Actor::new(
            Vec2::new(128.0, 128.0),
            0.0,
            Hitbox::new(64.0, 64.0),
            &store,
        )
        .unwrap();
        assert_eq!(actor.target_coord(&grid), GridCoord::new(2, 3));
        actor.update(0.0, &grid, &MoveIntent::walk(-1.0, 0.0), &store);
        assert_eq!(actor.target_coord(&grid), GridCoord::new(1, 2));
    }
}
