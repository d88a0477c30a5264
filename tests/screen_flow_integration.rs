//! Moving between the title, the farm, the pause menu and the trader.

mod common;

use common::*;
use tempfile::TempDir;

use dewvalley::components::crop::CropKind;
use dewvalley::resources::gamecontext::STARTING_GOLD;
use dewvalley::resources::input::Action;
use dewvalley::resources::inventory::Item;
use dewvalley::resources::persistence::{JsonSaveStore, NullPersistence};
use dewvalley::screens::{LEVEL, MAIN_MENU, PAUSED, SHOP};

#[test]
fn test_new_game_pause_save_and_continue() {
    let dir = TempDir::new().unwrap();
    let save = dir.path().join("save.json");
    let mut m = manager(MAIN_MENU, Box::new(JsonSaveStore::new(&save)));

    press(&mut m, Action::Confirm);
    assert_eq!(m.pending_id().unwrap(), &LEVEL);
    idle(&mut m, 1);
    assert_eq!(m.active_id().unwrap(), &LEVEL);

    m.context_mut().gold = 77;
    press(&mut m, Action::Back);
    idle(&mut m, 1);
    assert_eq!(m.active_id().unwrap(), &PAUSED);

    press(&mut m, Action::Down);
    press(&mut m, Action::Confirm);
    assert!(save.exists());
    press(&mut m, Action::Down);
    press(&mut m, Action::Confirm);
    idle(&mut m, 1);
    assert_eq!(m.active_id().unwrap(), &MAIN_MENU);

    m.context_mut().gold = 0;
    press(&mut m, Action::Down);
    press(&mut m, Action::Confirm);
    idle(&mut m, 1);
    assert_eq!(m.active_id().unwrap(), &LEVEL);
    assert_eq!(m.context().gold, 77);
    assert!(m.context().farm.is_some());
}

#[test]
fn test_continue_is_skipped_without_a_save() {
    let dir = TempDir::new().unwrap();
    let mut m = manager(MAIN_MENU, Box::new(JsonSaveStore::new(dir.path().join("none.json"))));
    // Down skips the disabled entry and lands on quit.
    press(&mut m, Action::Down);
    press(&mut m, Action::Confirm);
    assert!(m.should_quit());
    assert_eq!(m.active_id().unwrap(), &MAIN_MENU);
}

#[test]
fn test_shop_buys_and_returns_to_farm() {
    let mut m = manager(SHOP, Box::new(NullPersistence::default()));
    press(&mut m, Action::Confirm);
    let ctx = m.context();
    assert_eq!(ctx.gold, STARTING_GOLD - 4);
    assert_eq!(ctx.inventory.count(Item::Seed(CropKind::Corn)), 6);

    press(&mut m, Action::Back);
    idle(&mut m, 1);
    assert_eq!(m.active_id().unwrap(), &LEVEL);
}

#[test]
fn test_selling_nothing_keeps_gold() {
    let mut m = manager(SHOP, Box::new(NullPersistence::default()));
    // Third offer is the first thing the trader buys: corn.
    press(&mut m, Action::Down);
    press(&mut m, Action::Down);
    press(&mut m, Action::Confirm);
    assert_eq!(m.context().gold, STARTING_GOLD);

    m.context_mut().inventory.add(Item::Produce(CropKind::Corn), 2);
    press(&mut m, Action::Confirm);
    assert_eq!(m.context().gold, STARTING_GOLD + 10);
    assert_eq!(m.context().inventory.count(Item::Produce(CropKind::Corn)), 1);
}

