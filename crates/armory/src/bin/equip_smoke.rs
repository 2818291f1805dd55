//! # Equipment Smoke Run
//!
//! Headless walk through one craft equipment screen and one soldier's
//! inventory, printing what a player would see.
//!
//! ```text
//! RUST_LOG=armory_ui=debug cargo run --bin equip_smoke [ruleset.toml]
//! ```
//!
//! Without an argument the shipped ruleset is used.

use std::error::Error;
use std::time::Duration;

use armory::battle::{BattleItem, BattleUnit, Hover, InventoryPreview, UnitStats, RIGHT_HAND};
use armory::ledger::{
    format_funds, Base, Catalog, Craft, LedgerMode, SavedGame, ScreenOrigin, Soldier, Vehicle,
};
use armory::ui::{Arrow, MouseButton};
use armory::{Ledger, ListEvent, RepeatConfig, ScreenController, TextList, WarningLog};
use tracing::info;
use tracing_subscriber::EnvFilter;

const BASE: u32 = 1;
const CRAFT: u32 = 7;
const RIFLE: u32 = 3;
const RIFLE_CLIP: u32 = 4;
const TANK: u32 = 20;
const SHELLS: u32 = 21;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let catalog = match std::env::args().nth(1) {
        Some(path) => Catalog::from_toml_file(path)?,
        None => armory::shipped_catalog()?,
    };
    info!(items = catalog.item_count(), "ruleset loaded");

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    ARMORY EQUIPMENT SMOKE RUN");
    println!("═══════════════════════════════════════════════════════════════════");

    let mut game = starting_game();
    equip_craft(&mut game, &catalog)?;
    inspect_inventory(&catalog)?;

    println!();
    println!("  Funds: {}", format_funds(game.funds));
    Ok(())
}

/// One base with a docked transport, a squad and a stocked store room.
fn starting_game() -> SavedGame {
    let mut base = Base::new(BASE, "Nairobi");
    base.stores_capacity = 50.0;
    base.quarters_capacity = 14;
    base.hangar_capacity = 2;
    for (item, quantity) in [(1, 4), (2, 12), (RIFLE, 10), (RIFLE_CLIP, 30), (9, 8), (12, 2)] {
        base.storage.add(item, quantity);
    }
    base.storage.add(TANK, 1);
    base.storage.add(SHELLS, 12);

    let mut craft = Craft::new(CRAFT, "skyranger", "Skyranger-1");
    craft.vehicles.push(Vehicle::new(TANK, 30, 4));
    base.crafts.push(craft);

    for (id, name) in [(1, "Ito Hana"), (2, "Ada Okafor"), (3, "Lars Berg")] {
        let mut soldier = Soldier::new(id, name);
        soldier.craft = Some(CRAFT);
        soldier.layout = vec![RIFLE, RIFLE_CLIP];
        base.soldiers.push(soldier);
    }

    SavedGame {
        funds: 2_500_000,
        bases: vec![base],
        ..SavedGame::default()
    }
}

/// Loads rifles and a second tank, then confirms.
fn equip_craft(game: &mut SavedGame, catalog: &Catalog) -> Result<(), Box<dyn Error>> {
    let ledger = Ledger::build(
        game,
        BASE,
        LedgerMode::CraftEquipment { craft: CRAFT },
        catalog,
        ScreenOrigin::Geoscape,
    )?;
    let mut screen =
        ScreenController::new(ledger, TextList::new(), WarningLog::new(), RepeatConfig::default());

    let rifle_row = list_row(&screen, RIFLE)?;
    screen.handle(ListEvent::ArrowPress {
        row: rifle_row,
        arrow: Arrow::Right,
        button: MouseButton::Left,
    })?;
    // roughly half a second held, one frame at a time
    for _ in 0..30 {
        screen.think(Duration::from_millis(16))?;
    }
    screen.handle(ListEvent::ArrowRelease {
        arrow: Arrow::Right,
        button: MouseButton::Left,
    })?;

    let clip_row = list_row(&screen, RIFLE_CLIP)?;
    screen.handle(ListEvent::ArrowClick {
        row: clip_row,
        arrow: Arrow::Right,
        button: MouseButton::Right,
    })?;

    let tank_row = list_row(&screen, TANK)?;
    screen.handle(ListEvent::ArrowClick {
        row: tank_row,
        arrow: Arrow::Right,
        button: MouseButton::Left,
    })?;

    println!();
    println!("  CRAFT EQUIPMENT");
    for line in screen.list().lines() {
        println!("    {line}");
    }
    if let Some(header) = screen.list().header() {
        println!(
            "    space {}/{}  vehicles {}  items {}",
            header.space_used, header.space_available, header.vehicle_usage, header.craft_items
        );
    }
    for warning in screen.warnings().messages() {
        println!("    ! {warning}");
    }

    if let Some(report) = screen.confirm(game, catalog)? {
        info!(rows = report.rows_reconciled, "loadout confirmed");
    }
    Ok(())
}

/// Position of an item's row in the list.
fn list_row(
    screen: &ScreenController<TextList, WarningLog>,
    item: u32,
) -> Result<usize, Box<dyn Error>> {
    let row = screen
        .ledger()
        .row_for_item(item)
        .ok_or_else(|| format!("item {item} is not listed"))?;
    let position = screen
        .visible_rows()
        .iter()
        .position(|&index| index == row)
        .ok_or_else(|| format!("row {row} is filtered out"))?;
    Ok(position)
}

/// Previews picking a loaded rifle up off the ground.
fn inspect_inventory(catalog: &Catalog) -> Result<(), Box<dyn Error>> {
    let slots = armory::shipped_slots()?;
    let preview = InventoryPreview::new(catalog, &slots, true);

    let unit = BattleUnit::new(
        "Ito Hana",
        UnitStats {
            time_units: 54,
            health: 30,
            strength: 24,
            firing: 65,
            throwing: 58,
            melee: 45,
        },
    );
    let clip = BattleItem::on_ground(RIFLE_CLIP).with_rounds(20);
    let rifle = BattleItem::on_ground(RIFLE).loaded_with(clip);
    let hover = Hover {
        slot: Some(RIGHT_HAND),
        ..Hover::default()
    };

    let placement = preview.preview(&unit, Some(&rifle), hover)?;
    let stats = preview.item_stats(&unit, &rifle, Some(RIGHT_HAND))?;

    println!();
    println!("  INVENTORY: {}", unit.name);
    println!("    TUs after pickup: {}", placement.time_units);
    let overloaded = if placement.weight.is_overloaded() {
        " (overloaded)"
    } else {
        ""
    };
    println!(
        "    Weight: {}/{}{overloaded}",
        placement.weight.weight, placement.weight.strength
    );
    println!("    Accuracy: {}%", placement.accuracy);
    println!("    Rifle: {stats:?}");
    Ok(())
}
