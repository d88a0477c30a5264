//! The farm driven through the screen manager with scripted input.

mod common;

use common::*;
use tempfile::TempDir;

use dewvalley::components::crop::CropKind;
use dewvalley::resources::gamecontext::MAX_ENERGY;
use dewvalley::resources::input::Action;
use dewvalley::resources::inventory::Item;
use dewvalley::resources::persistence::{JsonSaveStore, NullPersistence, Persistence};
use dewvalley::resources::renderframe::{DrawCmd, RenderFrame, RenderLayer};
use dewvalley::resources::tilegrid::{GridCoord, TileChange, TileKind};
use dewvalley::screens::manager::ScreenManager;
use dewvalley::screens::{LEVEL, PAUSED};

const PLOT: GridCoord = GridCoord::new(4, 4);

/// Swing the selected tool and wait for the swing to finish.
fn swing(m: &mut ScreenManager) {
    press(m, Action::UseTool);
    idle(m, 30);
}

/// Pause and come back so the level writes its farm into the context.
fn pause_and_resume(m: &mut ScreenManager) {
    press(m, Action::Back);
    idle(m, 1);
    assert_eq!(m.active_id().unwrap(), &PAUSED);
    press(m, Action::Back);
    idle(m, 1);
    assert_eq!(m.active_id().unwrap(), &LEVEL);
}

fn plot_tile(m: &ScreenManager) -> Option<TileChange> {
    let farm = m.context().farm.as_ref()?;
    farm.tiles.iter().find(|t| t.coord == PLOT).copied()
}

#[test]
fn test_first_day_till_plant_water_sleep() {
    let dir = TempDir::new().unwrap();
    let save = dir.path().join("save.json");
    let mut m = manager(LEVEL, Box::new(JsonSaveStore::new(&save)));

    swing(&mut m);
    pause_and_resume(&mut m);
    assert_eq!(
        plot_tile(&m),
        Some(TileChange {
            coord: PLOT,
            kind: TileKind::Tilled,
            watered: false
        })
    );

    for _ in 0..3 {
        press(&mut m, Action::NextItem);
    }
    assert_eq!(m.context().inventory.selected(), Some(Item::Seed(CropKind::Corn)));
    swing(&mut m);
    press(&mut m, Action::PrevItem);
    assert_eq!(m.context().inventory.selected(), Some(Item::WateringCan));
    swing(&mut m);

    pause_and_resume(&mut m);
    assert_eq!(
        plot_tile(&m),
        Some(TileChange {
            coord: PLOT,
            kind: TileKind::Planted,
            watered: true
        })
    );
    assert_eq!(m.context().inventory.count(Item::Seed(CropKind::Corn)), 4);
    assert_eq!(m.context().energy, MAX_ENERGY - 6);

    // One tile down, facing the bed.
    hold(&mut m, Action::Down, 14);
    press(&mut m, Action::Interact);
    idle(&mut m, 200);

    let ctx = m.context();
    assert_eq!(ctx.day, 2);
    assert_eq!(ctx.energy, MAX_ENERGY);
    let farm = ctx.farm.as_ref().unwrap();
    assert_eq!(farm.crops.len(), 1);
    assert_eq!(farm.crops[0].coord, PLOT);
    assert_eq!(farm.crops[0].age, 1.0);

    let saved = JsonSaveStore::new(&save).load_game_context().unwrap().unwrap();
    assert_eq!(saved.day, 2);
}

#[test]
fn test_exhausted_swing_hurts_and_does_nothing() {
    let mut m = manager(LEVEL, Box::new(NullPersistence::default()));
    m.context_mut().energy = 0;
    swing(&mut m);
    pause_and_resume(&mut m);
    assert_eq!(plot_tile(&m), None);
    assert_eq!(m.context().energy, 0);
}

#[test]
fn test_render_covers_world_and_hud() {
    let mut m = manager(LEVEL, Box::new(NullPersistence::default()));
    let frame = tick(&mut m, Default::default());
    let layers: Vec<RenderLayer> = frame.sorted().iter().map(|i| i.layer).collect();
    assert!(layers.contains(&RenderLayer::Ground));
    assert!(layers.contains(&RenderLayer::Main));
    assert!(layers.contains(&RenderLayer::Sky));
    assert_eq!(layers.last(), Some(&RenderLayer::Ui));
    let player = frame.items().iter().any(|i| {
        matches!(&i.cmd, DrawCmd::Sprite { frame, .. } if frame.as_str().starts_with("down_idle/"))
    });
    assert!(player);
}

#[test]
fn test_debug_overlay_follows_toggle() {
    let mut m = manager(LEVEL, Box::new(NullPersistence::default()));
    let count = |f: &RenderFrame| {
        f.items()
            .iter()
            .filter(|i| matches!(&i.cmd, DrawCmd::Text { text, .. } if text.starts_with("DEBUG")))
            .count()
    };
    assert_eq!(count(&idle_frame(&mut m)), 0);
    let f = press(&mut m, Action::ToggleDebug);
    assert_eq!(count(&f), 1);
    press(&mut m, Action::ToggleDebug);
    assert_eq!(count(&idle_frame(&mut m)), 0);
}

fn idle_frame(m: &mut ScreenManager) -> RenderFrame {
    tick(m, Default::default())
}
