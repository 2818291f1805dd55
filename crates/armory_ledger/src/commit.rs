//! # Commit and Rollback
//!
//! Commit writes every pending delta into the savegame in one go. Either
//! all rows reconcile or the savegame is restored from a snapshot taken
//! before the first write.
//!
//! Rollback never touches the savegame.

use tracing::{debug, info, warn};

use crate::capacity::row_footprint;
use crate::catalog::{Catalog, ItemId};
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Ledger, LedgerMode};
use crate::row::{Row, RowKind};
use crate::savegame::{Base, SavedGame, Transfer, TransferCargo, Vehicle};

/// What a commit did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Rows that had a pending change.
    pub rows_reconciled: usize,
    /// Money gained (positive) or spent (negative).
    pub funds_delta: i64,
}

fn stale(reason: impl Into<String>) -> LedgerError {
    LedgerError::StaleLedger {
        reason: reason.into(),
    }
}

fn stale_quantity(err: LedgerError) -> LedgerError {
    match err {
        LedgerError::InsufficientQuantity {
            item_id,
            required,
            available,
        } => stale(format!(
            "item {item_id}: {required} pending but only {available} in store"
        )),
        other => other,
    }
}

fn units(delta: i32) -> u32 {
    delta.unsigned_abs()
}

impl Ledger {
    /// Applies every pending change to the savegame.
    ///
    /// Afterwards the ledger is rebuilt from the savegame, so rows that
    /// changed as a side effect (a sold craft's vehicles and ammo, a sold
    /// soldier's armour) show their new stock too.
    ///
    /// # Errors
    ///
    /// Returns `StaleLedger` when the savegame no longer holds what the
    /// ledger was built from, or a lookup error for a vanished entity. The
    /// savegame is left as it was.
    pub fn commit(&mut self, game: &mut SavedGame, catalog: &Catalog) -> LedgerResult<CommitReport> {
        let snapshot = game.snapshot();
        let funds_delta: i64 = self
            .rows
            .iter()
            .map(|row| i64::from(row.pending) * row.unit_cost)
            .sum();
        let funds_delta = match self.mode {
            LedgerMode::Sell => funds_delta,
            LedgerMode::Transfer { .. } => -funds_delta,
            LedgerMode::CraftEquipment { .. } => 0,
        };

        let result = match self.mode {
            LedgerMode::CraftEquipment { craft } => self.reconcile_craft(game, catalog, craft),
            LedgerMode::Sell => self.reconcile_sell(game, catalog),
            LedgerMode::Transfer { to, hours } => self.reconcile_transfer(game, to, hours),
        };

        if let Err(err) = result {
            warn!(base = self.base, %err, "commit failed, savegame restored");
            game.restore(snapshot);
            return Err(err);
        }
        game.funds += funds_delta;

        let rebuilt = match Self::build(game, self.base, self.mode, catalog, self.origin) {
            Ok(ledger) => ledger,
            Err(err) => {
                warn!(base = self.base, %err, "rebuild after commit failed, savegame restored");
                game.restore(snapshot);
                return Err(err);
            }
        };
        let rows_reconciled = self.rows.iter().filter(|r| r.is_changed()).count();
        *self = rebuilt;
        info!(base = self.base, rows = rows_reconciled, funds_delta, "ledger committed");
        Ok(CommitReport {
            rows_reconciled,
            funds_delta,
        })
    }

    /// Discards every pending change.
    pub fn rollback(&mut self) {
        for row in &mut self.rows {
            row.pending = 0;
            row.pending_reserved = 0;
        }
        self.totals = self.baseline;
        debug!(base = self.base, "ledger rolled back");
    }

    fn changed_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.is_changed())
    }

    fn reconcile_craft(
        &self,
        game: &mut SavedGame,
        catalog: &Catalog,
        craft_id: u32,
    ) -> LedgerResult<()> {
        let base = game.base_mut(self.base)?;
        let Base {
            storage, crafts, ..
        } = base;
        let craft = crafts
            .iter_mut()
            .find(|c| c.id == craft_id)
            .ok_or(LedgerError::CraftNotFound(craft_id))?;

        for row in self.changed_rows() {
            match row.kind {
                RowKind::Item(id) => {
                    let loose = row.pending - row.pending_reserved;
                    if row.pending > 0 {
                        storage.remove(id, units(row.pending)).map_err(stale_quantity)?;
                    } else {
                        storage.add(id, units(row.pending));
                    }
                    if loose > 0 {
                        craft.items.add(id, units(loose));
                    } else if loose < 0 {
                        craft.items.remove(id, units(loose)).map_err(stale_quantity)?;
                    }
                }
                RowKind::Vehicle(id) => {
                    if row.pending > 0 {
                        storage.remove(id, units(row.pending)).map_err(stale_quantity)?;
                        let rounds = match &row.vehicle {
                            Some(link) => link.loaded_ammo,
                            None => catalog.require_item(id)?.clip_size,
                        };
                        for _ in 0..row.pending {
                            craft.vehicles.push(Vehicle::new(id, rounds, row_footprint(row)));
                        }
                    } else {
                        let mut left = units(row.pending);
                        craft.vehicles.retain(|v| {
                            if left > 0 && v.item() == id {
                                left -= 1;
                                false
                            } else {
                                true
                            }
                        });
                        if left > 0 {
                            return Err(stale(format!("craft {craft_id} lost vehicles of {id}")));
                        }
                        storage.add(id, units(row.pending));
                    }
                }
                _ => {}
            }
            debug!(row = %row.name, pending = row.pending, "craft row reconciled");
        }
        Ok(())
    }

    fn reconcile_sell(&self, game: &mut SavedGame, catalog: &Catalog) -> LedgerResult<()> {
        let base = game.base_mut(self.base)?;

        for row in self.changed_rows() {
            let count = units(row.pending);
            match row.kind {
                RowKind::Soldier(id) => {
                    let position = base
                        .soldiers
                        .iter()
                        .position(|s| s.id == id)
                        .ok_or(LedgerError::SoldierNotFound(id))?;
                    let soldier = base.soldiers.remove(position);
                    if let Some(armor) = soldier.armor_item {
                        base.storage.add(armor, 1);
                    }
                }
                RowKind::Craft(id) => {
                    let position = base
                        .crafts
                        .iter()
                        .position(|c| c.id == id)
                        .ok_or(LedgerError::CraftNotFound(id))?;
                    let mut craft = base.crafts.remove(position);
                    craft.unload_into(&mut base.storage, catalog);
                    for soldier in base.soldiers.iter_mut().filter(|s| s.craft == Some(id)) {
                        soldier.craft = None;
                    }
                }
                RowKind::Scientist => {
                    if base.available_scientists() < count {
                        return Err(stale("not enough scientists"));
                    }
                    base.scientists -= count;
                }
                RowKind::Engineer => {
                    if base.available_engineers() < count {
                        return Err(stale("not enough engineers"));
                    }
                    base.engineers -= count;
                }
                RowKind::Item(id) | RowKind::Vehicle(id) => remove_for_sale(base, id, count)?,
            }
            debug!(row = %row.name, count, "sell row reconciled");
        }
        Ok(())
    }

    fn reconcile_transfer(&self, game: &mut SavedGame, to: u32, hours: u32) -> LedgerResult<()> {
        let (from, dest) = game.two_bases_mut(self.base, to)?;

        for row in self.changed_rows() {
            let count = units(row.pending);
            let cargo = match row.kind {
                RowKind::Soldier(id) => {
                    let position = from
                        .soldiers
                        .iter()
                        .position(|s| s.id == id)
                        .ok_or(LedgerError::SoldierNotFound(id))?;
                    TransferCargo::Soldier(from.soldiers.remove(position))
                }
                RowKind::Craft(id) => {
                    let position = from
                        .crafts
                        .iter()
                        .position(|c| c.id == id)
                        .ok_or(LedgerError::CraftNotFound(id))?;
                    // the crew stays behind
                    for soldier in from.soldiers.iter_mut().filter(|s| s.craft == Some(id)) {
                        soldier.craft = None;
                    }
                    TransferCargo::Craft(Box::new(from.crafts.remove(position)))
                }
                RowKind::Scientist => {
                    if from.available_scientists() < count {
                        return Err(stale("not enough scientists"));
                    }
                    from.scientists -= count;
                    TransferCargo::Scientist
                }
                RowKind::Engineer => {
                    if from.available_engineers() < count {
                        return Err(stale("not enough engineers"));
                    }
                    from.engineers -= count;
                    TransferCargo::Engineer
                }
                RowKind::Item(id) | RowKind::Vehicle(id) => {
                    from.storage.remove(id, count).map_err(stale_quantity)?;
                    TransferCargo::Item(id)
                }
            };
            dest.transfers.push(Transfer {
                cargo,
                quantity: count,
                hours,
            });
            debug!(row = %row.name, count, to, "transfer queued");
        }
        Ok(())
    }
}

/// Takes sold items from incoming transfers first, then stores, then
/// loose craft equipment.
fn remove_for_sale(base: &mut Base, id: ItemId, count: u32) -> LedgerResult<()> {
    let mut left = count;
    base.transfers.retain_mut(|transfer| {
        if left == 0 || transfer.item() != Some(id) {
            return true;
        }
        if transfer.quantity <= left {
            left -= transfer.quantity;
            false
        } else {
            transfer.quantity -= left;
            left = 0;
            true
        }
    });
    left -= base.storage.remove_up_to(id, left);
    for craft in &mut base.crafts {
        if left == 0 {
            break;
        }
        left -= craft.items.remove_up_to(id, left);
    }
    if left > 0 {
        return Err(stale(format!("item {id}: {left} short for sale")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BattleType, CraftRule, ItemRule};
    use crate::ledger::ScreenOrigin;
    use crate::row::Direction;
    use crate::savegame::Craft;

    fn catalog() -> Catalog {
        let mut rifle = ItemRule::new(1, "Rifle", BattleType::Firearm);
        rifle.sell_cost = 100;
        rifle.transfer_cost = 5;
        let craft = CraftRule {
            id: "skyranger".to_string(),
            crew_space: 14,
            max_vehicles: 3,
            max_items: 0,
            sell_cost: 1000,
            transfer_cost: 0,
            refuel_item: None,
        };
        Catalog::new(vec![rifle], vec![craft]).unwrap()
    }

    fn game() -> SavedGame {
        let mut home = Base::new(1, "Home");
        home.storage.add(1, 4);
        home.stores_capacity = 100.0;
        let mut craft = Craft::new(1, "skyranger", "Skyranger-1");
        craft.items.add(1, 2);
        home.crafts.push(craft);
        let mut outpost = Base::new(2, "Outpost");
        outpost.stores_capacity = 100.0;
        SavedGame {
            funds: 0,
            bases: vec![home, outpost],
            research: std::collections::HashSet::new(),
        }
    }

    #[test]
    fn test_sale_takes_transfers_then_storage_then_crafts() {
        let mut game = game();
        game.bases[0].transfers.push(Transfer::items(1, 1, 5));
        let mut ledger =
            Ledger::build(&game, 1, LedgerMode::Sell, &catalog(), ScreenOrigin::Battlescape)
                .unwrap();
        let rifle = ledger.row_for_item(1).unwrap();
        ledger
            .request_change(rifle, crate::MAX_CHANGE, Direction::ToDestination)
            .unwrap();
        assert_eq!(ledger.rows()[rifle].pending, 7);

        let report = ledger.commit(&mut game, &catalog()).unwrap();
        assert_eq!(report.funds_delta, 700);
        assert_eq!(game.funds, 700);
        let home = game.base(1).unwrap();
        assert!(home.transfers.is_empty());
        assert_eq!(home.storage.quantity(1), 0);
        assert_eq!(home.crafts[0].items.quantity(1), 0);
    }

    #[test]
    fn test_stale_commit_restores_savegame() {
        let mut game = game();
        let mut ledger = Ledger::build(
            &game,
            1,
            LedgerMode::CraftEquipment { craft: 1 },
            &catalog(),
            ScreenOrigin::Geoscape,
        )
        .unwrap();
        ledger.request_change(0, 4, Direction::ToDestination).unwrap();

        // stores emptied behind the ledger's back
        game.bases[0].storage.set(1, 1);
        let before = game.clone();

        let result = ledger.commit(&mut game, &catalog());
        assert!(matches!(result, Err(LedgerError::StaleLedger { .. })));
        assert_eq!(game, before);
        assert_eq!(ledger.rows()[0].pending, 4);
    }

    #[test]
    fn test_transfer_queues_records() {
        let mut game = game();
        let mut ledger = Ledger::build(
            &game,
            1,
            LedgerMode::Transfer { to: 2, hours: 6 },
            &catalog(),
            ScreenOrigin::Geoscape,
        )
        .unwrap();
        let rifle = ledger.row_for_item(1).unwrap();
        ledger.request_change(rifle, 3, Direction::ToDestination).unwrap();

        let report = ledger.commit(&mut game, &catalog()).unwrap();
        assert_eq!(report.funds_delta, -15);
        assert_eq!(game.base(1).unwrap().storage.quantity(1), 1);
        let outpost = game.base(2).unwrap();
        assert_eq!(outpost.transfers, vec![Transfer::items(1, 3, 6)]);
        assert_eq!(outpost.storage.quantity(1), 0);
    }

    #[test]
    fn test_rollback_restores_totals() {
        let game = game();
        let mut ledger = Ledger::build(
            &game,
            1,
            LedgerMode::CraftEquipment { craft: 1 },
            &catalog(),
            ScreenOrigin::Geoscape,
        )
        .unwrap();
        ledger.request_change(0, 3, Direction::ToDestination).unwrap();
        assert_eq!(ledger.totals().craft_items, 5);

        ledger.rollback();
        assert!(!ledger.has_pending());
        assert_eq!(ledger.totals().craft_items, 2);
    }
}
