//! Screen sessions driven through list events and frame ticks.

use std::time::Duration;

use armory_ledger::{
    Base, Catalog, Craft, Ledger, LedgerMode, RowColor, RowKind, SavedGame, ScreenOrigin,
};
use armory_ui::{
    Arrow, Column, ListEvent, MouseButton, RepeatConfig, ScreenController, TextList, WarningLog,
    MUST_RESOLVE_STORES, STORES_FULL,
};

const RULESET: &str = r#"
[[items]]
id = 1
name = "Rifle"
battle_type = "firearm"
size = 0.2
sell_cost = 900

[[items]]
id = 2
name = "Rifle Clip"
battle_type = "ammo"
size = 0.1
clip_size = 20

[[items]]
id = 3
name = "Tank/Rocket Launcher"
battle_type = "firearm"
fixed = true
footprint = 2
clip_size = 12
compatible_ammo = [4]

[[items]]
id = 4
name = "HWP Rockets"
battle_type = "ammo"
clip_size = 6

[[crafts]]
id = "skyranger"
crew_space = 14
max_vehicles = 3
max_items = 8
"#;

const RIFLE_ROW: usize = 0;
const TANK_ROW: usize = 2;
const ROCKETS_ROW: usize = 3;

type Screen = ScreenController<TextList, WarningLog>;

fn game() -> SavedGame {
    let mut base = Base::new(1, "Nairobi");
    base.stores_capacity = 50.0;
    base.storage.add(1, 10);
    base.storage.add(2, 20);
    base.storage.add(3, 2);
    base.storage.add(4, 10);
    base.crafts.push(Craft::new(7, "skyranger", "Skyranger-1"));
    SavedGame {
        funds: 1_000,
        bases: vec![base],
        ..SavedGame::default()
    }
}

fn open(game: &SavedGame, catalog: &Catalog, mode: LedgerMode) -> Screen {
    let ledger = Ledger::build(game, 1, mode, catalog, ScreenOrigin::Geoscape).unwrap();
    ScreenController::new(ledger, TextList::new(), WarningLog::new(), RepeatConfig::default())
}

fn equip(game: &SavedGame, catalog: &Catalog) -> Screen {
    open(game, catalog, LedgerMode::CraftEquipment { craft: 7 })
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_hold_repeats_until_release() {
    let catalog = Catalog::from_toml_str(RULESET).unwrap();
    let game = game();
    let mut screen = equip(&game, &catalog);

    screen
        .handle(ListEvent::ArrowPress {
            row: RIFLE_ROW,
            arrow: Arrow::Right,
            button: MouseButton::Left,
        })
        .unwrap();
    screen.think(ms(100)).unwrap();
    assert_eq!(screen.ledger().rows()[RIFLE_ROW].pending, 0);
    screen.think(ms(150)).unwrap();
    assert_eq!(screen.ledger().rows()[RIFLE_ROW].pending, 1);
    screen.think(ms(100)).unwrap();
    assert_eq!(screen.ledger().rows()[RIFLE_ROW].pending, 3);

    screen
        .handle(ListEvent::ArrowRelease {
            arrow: Arrow::Right,
            button: MouseButton::Left,
        })
        .unwrap();
    assert!(!screen.is_repeating());
    screen.think(ms(500)).unwrap();
    assert_eq!(screen.ledger().rows()[RIFLE_ROW].pending, 3);
    assert_eq!(screen.list().cell(RIFLE_ROW, Column::Source), Some("7"));
    assert_eq!(screen.list().color(RIFLE_ROW), Some(RowColor::Changed));
}

#[test]
fn test_warning_stops_held_arrow() {
    let catalog = Catalog::from_toml_str(RULESET).unwrap();
    let game = game();
    let mut screen = equip(&game, &catalog);

    screen
        .handle(ListEvent::ArrowPress {
            row: RIFLE_ROW,
            arrow: Arrow::Right,
            button: MouseButton::Left,
        })
        .unwrap();
    // enough time for far more than the 8 item cap
    screen.think(ms(250 + 50 * 20)).unwrap();

    assert_eq!(screen.ledger().rows()[RIFLE_ROW].pending, 8);
    assert!(!screen.is_repeating());
    assert_eq!(screen.warnings().messages().len(), 1);
}

#[test]
fn test_vehicle_click_redraws_ammo_row() {
    let catalog = Catalog::from_toml_str(RULESET).unwrap();
    let game = game();
    let mut screen = equip(&game, &catalog);

    screen
        .handle(ListEvent::ArrowClick {
            row: TANK_ROW,
            arrow: Arrow::Right,
            button: MouseButton::Left,
        })
        .unwrap();

    assert_eq!(screen.list().cell(TANK_ROW, Column::Destination), Some("1"));
    assert_eq!(screen.list().cell(ROCKETS_ROW, Column::Destination), Some("2"));
    assert_eq!(screen.list().cell(ROCKETS_ROW, Column::Source), Some("8"));
    let header = screen.list().header().unwrap();
    assert_eq!(header.vehicle_usage, "1:3");
    assert_eq!(header.space_used, 4);
}

#[test]
fn test_confirm_and_cancel() {
    let catalog = Catalog::from_toml_str(RULESET).unwrap();
    let mut game = game();
    let mut screen = equip(&game, &catalog);

    screen
        .handle(ListEvent::ArrowClick {
            row: RIFLE_ROW,
            arrow: Arrow::Right,
            button: MouseButton::Left,
        })
        .unwrap();
    assert!(screen.cancel());
    assert!(!screen.ledger().has_pending());
    assert_eq!(screen.list().cell(RIFLE_ROW, Column::Destination), Some("0"));

    screen
        .handle(ListEvent::ArrowClick {
            row: RIFLE_ROW,
            arrow: Arrow::Right,
            button: MouseButton::Left,
        })
        .unwrap();
    let report = screen.confirm(&mut game, &catalog).unwrap().unwrap();
    assert_eq!(report.rows_reconciled, 1);
    assert_eq!(game.bases[0].storage.quantity(1), 9);
    assert_eq!(game.bases[0].crafts[0].items.quantity(1), 1);
}

#[test]
fn test_sell_screen_over_full_stores() {
    let catalog = Catalog::from_toml_str(RULESET).unwrap();
    let mut game = game();
    // 10 rifles, 20 clips, 10 rockets: 4.0 used
    game.bases[0].stores_capacity = 3.0;
    let mut screen = open(&game, &catalog, LedgerMode::Sell);

    assert!(!screen.cancel());
    assert_eq!(screen.warnings().messages(), [MUST_RESOLVE_STORES]);

    let rifle = screen.ledger().row_for_item(1).unwrap();
    let list_row = screen
        .visible_rows()
        .iter()
        .position(|&index| index == rifle)
        .unwrap();
    let sell_one = ListEvent::ArrowClick {
        row: list_row,
        arrow: Arrow::Left,
        button: MouseButton::Left,
    };

    screen.handle(sell_one).unwrap();
    assert_eq!(screen.confirm(&mut game, &catalog).unwrap(), None);
    assert_eq!(screen.warnings().messages().last().unwrap(), STORES_FULL);

    for _ in 0..4 {
        screen.handle(sell_one).unwrap();
    }
    let report = screen.confirm(&mut game, &catalog).unwrap().unwrap();
    assert_eq!(report.funds_delta, 4_500);
    assert_eq!(game.funds, 5_500);
    assert_eq!(game.bases[0].storage.quantity(1), 5);
}

#[test]
fn test_rebuild_after_nested_screen() {
    let catalog = Catalog::from_toml_str(RULESET).unwrap();
    let mut game = game();
    let mut screen = equip(&game, &catalog);
    screen
        .handle(ListEvent::ArrowClick {
            row: RIFLE_ROW,
            arrow: Arrow::Right,
            button: MouseButton::Right,
        })
        .unwrap();

    // the inventory screen took two rifles out of the stores
    game.bases[0].storage.remove(1, 2).unwrap();
    screen.rebuild(&game, &catalog).unwrap();

    assert!(!screen.ledger().has_pending());
    assert_eq!(screen.list().cell(RIFLE_ROW, Column::Source), Some("8"));
}

#[test]
fn test_sold_craft_leaves_the_list() {
    let catalog = Catalog::from_toml_str(RULESET).unwrap();
    let mut game = game();
    let mut screen = open(&game, &catalog, LedgerMode::Sell);
    let craft = screen
        .ledger()
        .rows()
        .iter()
        .position(|r| r.kind == RowKind::Craft(7))
        .unwrap();
    let list_row = screen
        .visible_rows()
        .iter()
        .position(|&index| index == craft)
        .unwrap();

    screen
        .handle(ListEvent::ArrowClick {
            row: list_row,
            arrow: Arrow::Left,
            button: MouseButton::Left,
        })
        .unwrap();
    screen.confirm(&mut game, &catalog).unwrap().unwrap();

    assert!(game.bases[0].crafts.is_empty());
    assert_eq!(screen.visible_rows().len(), screen.ledger().len());
    assert_eq!(screen.list().len(), screen.ledger().len());
    assert!(screen.list().lines().iter().all(|line| !line.contains("Skyranger-1")));
}
