//! Benchmark for change requests over a large catalog.
//!
//! Run with: cargo bench --package armory_ledger --bench transfer_benchmark

#![allow(missing_docs)]

use armory_ledger::{
    Base, BattleType, Catalog, Craft, CraftRule, Direction, ItemRule, Ledger, LedgerMode,
    SavedGame, ScreenOrigin, MAX_CHANGE,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const ITEM_TYPES: u32 = 5_000;

fn create_catalog() -> Catalog {
    let mut items: Vec<ItemRule> = (0..ITEM_TYPES)
        .map(|id| {
            let mut rule = ItemRule::new(id, format!("Item_{id}"), BattleType::Firearm);
            rule.size = 0.1;
            rule
        })
        .collect();
    let mut ammo = ItemRule::new(ITEM_TYPES, "Shells", BattleType::Ammo);
    ammo.clip_size = 6;
    let mut tank = ItemRule::new(ITEM_TYPES + 1, "Tank", BattleType::Firearm);
    tank.fixed = true;
    tank.clip_size = 12;
    tank.compatible_ammo = vec![ITEM_TYPES];
    items.extend([ammo, tank]);

    let craft = CraftRule {
        id: "carrier".to_string(),
        crew_space: 1_000,
        max_vehicles: 100,
        max_items: 0,
        sell_cost: 0,
        transfer_cost: 0,
        refuel_item: None,
    };
    Catalog::new(items, vec![craft]).unwrap()
}

fn create_game() -> SavedGame {
    let mut base = Base::new(1, "Home");
    for id in 0..ITEM_TYPES + 2 {
        base.storage.add(id, 1_000);
    }
    base.crafts.push(Craft::new(1, "carrier", "Carrier-1"));
    SavedGame {
        funds: 0,
        bases: vec![base],
        ..SavedGame::default()
    }
}

fn benchmark_build(c: &mut Criterion) {
    let catalog = create_catalog();
    let game = create_game();

    c.bench_function("build_5000_rows", |b| {
        b.iter(|| {
            black_box(
                Ledger::build(
                    &game,
                    1,
                    LedgerMode::CraftEquipment { craft: 1 },
                    &catalog,
                    ScreenOrigin::Geoscape,
                )
                .unwrap(),
            )
        });
    });
}

fn benchmark_request_change(c: &mut Criterion) {
    let catalog = create_catalog();
    let game = create_game();
    let mut ledger = Ledger::build(
        &game,
        1,
        LedgerMode::CraftEquipment { craft: 1 },
        &catalog,
        ScreenOrigin::Geoscape,
    )
    .unwrap();
    let row = ledger.row_for_item(ITEM_TYPES / 2).unwrap();

    c.bench_function("request_change_item_step", |b| {
        b.iter(|| {
            ledger.request_change(row, 1, Direction::ToDestination).unwrap();
            black_box(ledger.request_change(row, 1, Direction::ToSource).unwrap())
        });
    });

    let tank = ledger.row_for_item(ITEM_TYPES + 1).unwrap();
    c.bench_function("request_change_vehicle_cascade", |b| {
        b.iter(|| {
            ledger.request_change(tank, 1, Direction::ToDestination).unwrap();
            black_box(ledger.request_change(tank, 1, Direction::ToSource).unwrap())
        });
    });

    c.bench_function("request_change_max_then_rollback", |b| {
        b.iter(|| {
            black_box(
                ledger
                    .request_change(row, MAX_CHANGE, Direction::ToDestination)
                    .unwrap(),
            );
            ledger.rollback();
        });
    });
}

criterion_group!(benches, benchmark_build, benchmark_request_change);
criterion_main!(benches);
