//! The farm.
//!
//! The level screen owns an ECS [`World`] built from a [`LevelTemplate`]:
//! the [`TileWorldGrid`] and the other level resources, one entity per
//! tree, crop, flower and water tile, and the player's [`Actor`]. The world
//! survives trips to the pause menu and the shop and is rebuilt when the
//! level is entered from the main menu, restoring any farm saved in the
//! [`GameContext`].
//!
//! A tick runs in this order:
//!
//! 1. advance [`WorldTime`],
//! 2. while sleeping, only the fade and the overnight update run,
//! 3. hotbar cycling, the pause button,
//! 4. player intent (movement axis, tool swing, energy),
//! 5. [`Actor::update`], then the effect of a finished swing,
//! 6. interact button and harvesting,
//! 7. sky drift and the schedule (rain, props, expiry).
//!
//! # Related
//!
//! - [`crate::systems::farming`] – tool effects, growth, save snapshots
//! - [`crate::systems::render`] – the draw list for this world

use std::sync::Arc;

use bevy_ecs::prelude::*;
use log::{debug, error, info};

use crate::components::actor::{Actor, ActorState, MoveIntent};
use crate::components::animation::Animator;
use crate::components::hitbox::Hitbox;
use crate::components::inputcontrolled::PlayerControlled;
use crate::components::mapposition::{MapPosition, Vec2};
use crate::components::sprite::Sprite;
use crate::components::tree::{Tree, TreeSize};
use crate::components::zindex::ZIndex;
use crate::error::GameResult;
use crate::resources::animationstore::AnimationStore;
use crate::resources::assets::{LevelTemplate, PropKind};
use crate::resources::daycycle::{DayCycle, FadeStep};
use crate::resources::debugmode::DebugMode;
use crate::resources::gamecontext::MAX_ENERGY;
use crate::resources::input::{Action, InputSnapshot};
use crate::resources::renderframe::{RenderFrame, RenderLayer};
use crate::resources::tilegrid::{TileKind, TileWorldGrid};
use crate::resources::weather::{LevelRng, Weather};
use crate::resources::worldtime::WorldTime;
use crate::screens::{MAIN_MENU, PAUSED, SHOP, Screen, ScreenContext, ScreenId};
use crate::systems::animation::animation;
use crate::systems::farming::{ToolEffect, apply_tool, harvest, overnight, restore_farm, snapshot_farm, spawn_tree};
use crate::systems::interaction::{Interaction, interact};
use crate::systems::movement::movement;
use crate::systems::render::render_level;
use crate::systems::time::update_world_time;
use crate::systems::ttl::ttl_system;
use crate::systems::weather::{clear_rain, rain};

/// Player walking speed in world units per second.
pub const PLAYER_SPEED: f32 = 300.0;
/// Player sprite size; the hitbox sits at the feet.
pub const PLAYER_SPRITE: f32 = 192.0;
pub const PLAYER_HITBOX: (f32, f32) = (60.0, 40.0);
pub const PLAYER_HITBOX_OFFSET: (f32, f32) = (66.0, 116.0);
/// Energy one tool swing costs.
pub const TOOL_ENERGY: u32 = 2;

struct LevelWorld {
    world: World,
    schedule: Schedule,
    player: Entity,
}

pub struct LevelScreen {
    template: LevelTemplate,
    store: Arc<AnimationStore>,
    level: Option<LevelWorld>,
    seed: Option<u64>,
}

impl LevelScreen {
    pub fn new(template: LevelTemplate, store: Arc<AnimationStore>) -> Self {
        LevelScreen {
            template,
            store,
            level: None,
            seed: None,
        }
    }

    /// Fix the level's random source, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn world(&self) -> Option<&World> {
        self.level.as_ref().map(|l| &l.world)
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.level.as_mut().map(|l| &mut l.world)
    }

    pub fn player(&self) -> Option<Entity> {
        self.level.as_ref().map(|l| l.player)
    }

    fn build(&self, ctx: &ScreenContext<'_>) -> GameResult<LevelWorld> {
        let store = &*self.store;
        let mut world = World::new();
        world.insert_resource(self.template.grid.clone());
        world.insert_resource(WorldTime::default());
        world.insert_resource(store.clone());
        world.insert_resource(DayCycle::new());
        world.insert_resource(Weather::new(ctx.game.raining));
        world.insert_resource(match self.seed {
            Some(seed) => LevelRng::with_seed(seed),
            None => LevelRng::new(),
        });

        let ts = self.template.grid.tile_size();
        for prop in &self.template.props {
            match prop.kind {
                PropKind::SmallTree => {
                    spawn_tree(&mut world, Tree::new(TreeSize::Small, prop.coord));
                }
                PropKind::LargeTree => {
                    spawn_tree(&mut world, Tree::new(TreeSize::Large, prop.coord));
                }
                PropKind::Wildflower => {
                    let pos = self.template.grid.grid_to_world(prop.coord);
                    world.spawn((
                        Sprite::new("objects/sunflower", ts, ts),
                        MapPosition { pos },
                        ZIndex(RenderLayer::Main),
                    ));
                }
            }
        }

        let water: Vec<_> = self
            .template
            .grid
            .coords()
            .filter(|c| self.template.grid.tile_at(*c).kind == TileKind::Water)
            .collect();
        for coord in &water {
            let pos = self.template.grid.grid_to_world(*coord);
            let mut entity = world.spawn((
                Sprite::new("water/0", ts, ts),
                MapPosition { pos },
                ZIndex(RenderLayer::Water),
            ));
            if let Some(animator) = Animator::new("water", store) {
                entity.insert(animator);
            }
        }

        if let Some(farm) = &ctx.game.farm {
            restore_farm(&mut world, store, farm);
        }

        let hitbox = Hitbox::new(PLAYER_HITBOX.0, PLAYER_HITBOX.1)
            .with_offset(Vec2::new(PLAYER_HITBOX_OFFSET.0, PLAYER_HITBOX_OFFSET.1));
        let start = self.template.grid.grid_to_world(self.template.start);
        let tile_center = start + Vec2::new(ts / 2.0, ts / 2.0);
        let pos = tile_center - hitbox.center(Vec2::ZERO);
        let actor = Actor::new(pos, PLAYER_SPEED, hitbox, store)?;
        let player = world.spawn((actor, PlayerControlled)).id();

        let mut schedule = Schedule::default();
        schedule.add_systems((rain, movement, animation, ttl_system).chain());

        info!(
            "Built level '{}': {} props, {} water tiles",
            self.template.name,
            self.template.props.len(),
            water.len()
        );
        Ok(LevelWorld {
            world,
            schedule,
            player,
        })
    }

    /// Run the overnight update and persist the new morning.
    fn start_new_day(&mut self, ctx: &mut ScreenContext<'_>) {
        let Some(level) = &mut self.level else {
            return;
        };
        let world = &mut level.world;
        let (raining, grown) = world.resource_scope(|world, mut rng: Mut<LevelRng>| {
            let raining = Weather::roll(&mut rng.0);
            let grown = overnight(world, raining, &mut rng);
            (raining, grown)
        });
        world.resource_mut::<Weather>().raining = raining;
        if !raining {
            clear_rain(world);
        }
        world.resource_mut::<DayCycle>().reset_sky();

        let game = &mut *ctx.game;
        game.day += 1;
        game.energy = MAX_ENERGY;
        game.raining = raining;
        game.farm = Some(snapshot_farm(world, &self.template.grid));
        info!(
            "Day {} begins{}; {} crops grew",
            game.day,
            if raining { " with rain" } else { "" },
            grown
        );
        ctx.save_game();
    }

    fn sync_debug(world: &mut World, on: bool) {
        match (on, world.contains_resource::<DebugMode>()) {
            (true, false) => world.insert_resource(DebugMode),
            (false, true) => {
                world.remove_resource::<DebugMode>();
            }
            _ => {}
        }
    }
}

impl Screen for LevelScreen {
    fn activate(&mut self, from: Option<&ScreenId>, ctx: &mut ScreenContext<'_>) {
        let fresh = from.is_none_or(|f| f == MAIN_MENU);
        if self.level.is_some() && !fresh {
            debug!("Resuming level from {:?}", from.map(ScreenId::as_str));
            return;
        }
        match self.build(ctx) {
            Ok(level) => self.level = Some(level),
            Err(e) => {
                error!("Could not build the level: {}", e);
                self.level = None;
                if from.is_some() {
                    let _ = ctx.request_transition(MAIN_MENU);
                }
            }
        }
    }

    fn deactivate(&mut self, to: &ScreenId, ctx: &mut ScreenContext<'_>) {
        if let Some(level) = &mut self.level {
            ctx.game.farm = Some(snapshot_farm(&mut level.world, &self.template.grid));
        }
        if to == MAIN_MENU {
            self.level = None;
        }
    }

    fn update(&mut self, dt: f32, input: &InputSnapshot, ctx: &mut ScreenContext<'_>) {
        let store = Arc::clone(&self.store);
        let Some(level) = &mut self.level else {
            return;
        };
        let player = level.player;
        let dt = update_world_time(&mut level.world, dt);
        Self::sync_debug(&mut level.world, *ctx.debug);

        if level.world.resource::<DayCycle>().is_sleeping() {
            let step = level.world.resource_mut::<DayCycle>().advance_fade(dt);
            level.schedule.run(&mut level.world);
            match step {
                FadeStep::Midnight => self.start_new_day(ctx),
                FadeStep::Awake => debug!("Woke up on day {}", ctx.game.day),
                FadeStep::None => {}
            }
            return;
        }

        if input.just_pressed(Action::Back) {
            let _ = ctx.request_transition(PAUSED);
            return;
        }
        if input.just_pressed(Action::NextItem) {
            ctx.game.inventory.select_next();
        }
        if input.just_pressed(Action::PrevItem) {
            ctx.game.inventory.select_previous();
        }

        let world = &mut level.world;
        let Some(locked) = world.get::<Actor>(player).map(|a| a.state().is_locked()) else {
            return;
        };

        let mut intent = MoveIntent {
            direction: input.axis(),
            use_tool: None,
        };
        if !locked && input.just_pressed(Action::UseTool) {
            if let Some(tool) = ctx.game.inventory.selected_tool() {
                if ctx.game.spend_energy(TOOL_ENERGY) {
                    intent.use_tool = Some(tool);
                } else if let Some(mut actor) = world.get_mut::<Actor>(player) {
                    debug!("Too tired to swing {:?}", tool);
                    actor.hurt(&store);
                    ctx.audio.play_fx("hurt");
                }
            }
        }

        let step = world.resource_scope(|world, grid: Mut<TileWorldGrid>| {
            let mut actor = world.get_mut::<Actor>(player)?;
            let result = actor.update(dt, &grid, &intent, &store);
            Some((result, actor.clone()))
        });
        let Some((result, actor)) = step else {
            return;
        };
        if result.state_changed()
            && let ActorState::Acting(tool) = result.state
        {
            ctx.audio.play_fx(tool.sound());
        }

        if let Some(tool) = result.completed_action {
            let target = actor.target_coord(world.resource::<TileWorldGrid>());
            let effect = apply_tool(world, &store, tool, target, ctx.game);
            if effect == ToolEffect::Felled {
                ctx.audio.play_fx("axe");
            }
        }

        if !actor.state().is_locked() && input.just_pressed(Action::Interact) {
            match interact(world, &actor, ctx.game) {
                Interaction::Sleep => {
                    if world.resource_mut::<DayCycle>().start_sleep() {
                        info!("Going to sleep on day {}", ctx.game.day);
                    }
                }
                Interaction::Shop => {
                    let _ = ctx.request_transition(SHOP);
                }
                Interaction::PickedApple => ctx.audio.play_fx("interact"),
                Interaction::Nothing => {}
            }
        }

        let standing = actor.standing_coord(world.resource::<TileWorldGrid>());
        if harvest(world, &store, standing, ctx.game).is_some() {
            ctx.audio.play_fx("interact");
        }

        world.resource_mut::<DayCycle>().advance_sky(dt);
        level.schedule.run(world);
    }

    fn render(&mut self, ctx: &ScreenContext<'_>, frame: &mut RenderFrame) {
        if let Some(level) = &mut self.level {
            render_level(&mut level.world, level.player, ctx.game, frame);
        }
    }
}
