//! # Quantity Ledger
//!
//! The row set a screen works on. Built fresh from the savegame every time
//! a screen opens (or returns from a nested screen), changed only through
//! [`Ledger::request_change`], and written back by [`Ledger::commit`],
//! which rebuilds the rows from the savegame it just changed.
//!
//! Quantities are read once, at build time. Nothing re-reads backing
//! storage until commit.

use std::collections::HashMap;

use tracing::debug;

use crate::capacity::{
    clips_per_vehicle, vehicle_loaded_ammo, CraftLimits, DestinationLimits, Totals,
};
use crate::catalog::{BattleType, Catalog, ItemId, ItemRule, LedgerOptions};
use crate::container::ItemContainer;
use crate::error::{LedgerError, LedgerResult};
use crate::row::{Category, Row, RowKind, VehicleLink};
use crate::savegame::{Base, BaseId, CraftId, CraftStatus, SavedGame};

/// Which pair of stores a ledger reconciles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerMode {
    /// Base stores to a craft's hold and vehicle bay.
    CraftEquipment {
        /// The craft being equipped.
        craft: CraftId,
    },
    /// Base to the market.
    Sell,
    /// Base to another base.
    Transfer {
        /// Receiving base.
        to: BaseId,
        /// Travel time given to the queued transfers.
        hours: u32,
    },
}

/// Where the screen was opened from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScreenOrigin {
    /// The strategic map.
    #[default]
    Geoscape,
    /// Straight after a mission. Relaxes reserved-stock protection on the sell screen.
    Battlescape,
}

/// The rows of one screen session plus their running totals.
#[derive(Clone, Debug)]
pub struct Ledger {
    pub(crate) mode: LedgerMode,
    pub(crate) origin: ScreenOrigin,
    pub(crate) base: BaseId,
    pub(crate) rows: Vec<Row>,
    /// Item type to row position.
    pub(crate) index: HashMap<ItemId, usize>,
    pub(crate) craft_limits: CraftLimits,
    pub(crate) dest_limits: DestinationLimits,
    /// Totals as of the last build or commit.
    pub(crate) baseline: Totals,
    pub(crate) totals: Totals,
    pub(crate) options: LedgerOptions,
    pub(crate) funds: i64,
    pub(crate) used_stores: f64,
    pub(crate) stores_capacity: f64,
    pub(crate) overfull_on_open: bool,
}

/// Builds item rows over two containers, in catalog order.
///
/// A row is produced for every rule that passes `filter` and is present
/// in at least one of the containers.
pub fn build_rows<F>(
    source: &ItemContainer,
    dest: &ItemContainer,
    catalog: &Catalog,
    mut filter: F,
) -> Vec<Row>
where
    F: FnMut(&ItemRule) -> bool,
{
    catalog
        .items()
        .filter(|rule| source.contains(rule.id) || dest.contains(rule.id))
        .filter(|rule| filter(rule))
        .map(|rule| {
            let mut row = Row::new(
                RowKind::Item(rule.id),
                rule.name.clone(),
                to_qty(source.quantity(rule.id)),
                to_qty(dest.quantity(rule.id)),
            );
            row.ammo = rule.is_ammo_like();
            row.category = item_category(rule);
            row
        })
        .collect()
}

/// Listing category of an item type.
#[must_use]
pub fn item_category(rule: &ItemRule) -> Category {
    if rule.battle_type == BattleType::Corpse || rule.alien {
        Category::Aliens
    } else if rule.battle_type == BattleType::None {
        if rule.craft_armament {
            Category::CraftArmament
        } else if rule.armor {
            Category::Equipment
        } else {
            Category::Components
        }
    } else {
        Category::Equipment
    }
}

fn to_qty(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn count_qty(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

impl Ledger {
    /// Snapshots the savegame into a fresh row set.
    ///
    /// # Errors
    ///
    /// Returns `BaseNotFound`, `CraftNotFound` or `CraftRuleNotFound` when
    /// the handles in `mode` do not resolve.
    pub fn build(
        game: &SavedGame,
        base_id: BaseId,
        mode: LedgerMode,
        catalog: &Catalog,
        origin: ScreenOrigin,
    ) -> LedgerResult<Self> {
        let base = game.base(base_id)?;
        let options = *catalog.options();

        let mut ledger = Self {
            mode,
            origin,
            base: base_id,
            rows: Vec::new(),
            index: HashMap::new(),
            craft_limits: CraftLimits::default(),
            dest_limits: DestinationLimits::default(),
            baseline: Totals::default(),
            totals: Totals::default(),
            options,
            funds: game.funds,
            used_stores: base.used_stores(catalog),
            stores_capacity: base.stores_capacity,
            overfull_on_open: false,
        };

        match mode {
            LedgerMode::CraftEquipment { craft } => ledger.build_craft(game, base, craft, catalog)?,
            LedgerMode::Sell => ledger.build_sell(base, catalog)?,
            LedgerMode::Transfer { to, .. } => {
                let dest = game.base(to)?;
                ledger.build_transfer(base, dest, catalog)?;
            }
        }

        ledger.reindex();
        ledger.totals = ledger.baseline;
        debug!(
            base = base_id,
            rows = ledger.rows.len(),
            mode = ?mode,
            "ledger built"
        );
        Ok(ledger)
    }

    fn build_craft(
        &mut self,
        game: &SavedGame,
        base: &Base,
        craft_id: CraftId,
        catalog: &Catalog,
    ) -> LedgerResult<()> {
        let craft = base
            .craft(craft_id)
            .ok_or(LedgerError::CraftNotFound(craft_id))?;
        let rule = catalog.require_craft_rule(&craft.rule)?;

        // Vehicles and the clips loaded into them count as aboard.
        let mut aboard = craft.items.clone();
        let mut loaded = ItemContainer::new();
        for vehicle in &craft.vehicles {
            aboard.add(vehicle.item(), 1);
            let vehicle_rule = catalog.require_item(vehicle.item())?;
            if let Some(ammo) = vehicle_rule.primary_ammo() {
                let ammo_rule = catalog.require_item(ammo)?;
                let clips = u32::try_from(clips_per_vehicle(vehicle_rule, ammo_rule)).unwrap_or(0);
                aboard.add(ammo, clips);
                loaded.add(ammo, clips);
            }
        }

        let mut rows = build_rows(&base.storage, &aboard, catalog, |item| {
            item.is_craft_equipment() && game.is_researched(&item.requires)
        });

        for row in &mut rows {
            let Some(id) = row.item() else { continue };
            let item = catalog.require_item(id)?;
            row.reserved_dest = to_qty(loaded.quantity(id));
            let claimed = base.claimed_by_crew(craft_id, id);
            if claimed > 0 {
                row.claimed_qty = Some(to_qty(claimed));
            }
            row.ammo = item.battle_type == BattleType::Ammo;
            if item.fixed {
                row.kind = RowKind::Vehicle(id);
                row.capacity_weight = f64::from(item.vehicle_footprint());
                if let Some(ammo) = item.primary_ammo() {
                    let ammo_rule = catalog.require_item(ammo)?;
                    row.vehicle = Some(VehicleLink {
                        ammo,
                        ammo_name: ammo_rule.name.clone(),
                        clips_per_vehicle: clips_per_vehicle(item, ammo_rule),
                        loaded_ammo: vehicle_loaded_ammo(item, Some(ammo_rule)),
                    });
                }
            }
        }

        let crew = count_qty(base.craft_crew(craft_id));
        self.craft_limits = CraftLimits {
            crew_space: rule.crew_space,
            max_vehicles: rule.max_vehicles,
            max_items: rule.max_items,
        };
        self.baseline = Totals {
            craft_items: to_qty(u32::try_from(craft.items.total()).unwrap_or(u32::MAX)),
            craft_vehicles: count_qty(craft.vehicles.len()),
            craft_space_used: crew + craft.vehicle_space(),
            crew,
            ..Totals::default()
        };
        self.rows = rows;
        Ok(())
    }

    fn build_sell(&mut self, base: &Base, catalog: &Catalog) -> LedgerResult<()> {
        let mut rows = Vec::new();

        for soldier in base.soldiers.iter().filter(|s| s.craft.is_none()) {
            let mut row = Row::new(RowKind::Soldier(soldier.id), soldier.name.clone(), 1, 0);
            // the armour goes back into stores
            if let Some(armor) = soldier.armor_item {
                row.capacity_weight = -catalog.require_item(armor)?.size;
            }
            row.category = Category::Personnel;
            rows.push(row);
        }

        for craft in base.crafts.iter().filter(|c| c.status != CraftStatus::Out) {
            let rule = catalog.require_craft_rule(&craft.rule)?;
            let mut row = Row::new(RowKind::Craft(craft.id), craft.name.clone(), 1, 0);
            row.unit_cost = rule.sell_cost;
            let mut armament = 0.0;
            for weapon in &craft.weapons {
                armament += catalog.require_item(weapon.launcher)?.size;
                if let Some(clip) = weapon.clip.and_then(|c| catalog.item(c)) {
                    armament += clip.size * f64::from(weapon.clips_loaded);
                }
            }
            row.capacity_weight = -armament;
            row.category = Category::CraftArmament;
            rows.push(row);
        }

        for (kind, name, total, allocated) in [
            (RowKind::Scientist, "Scientist", base.scientists, base.allocated_scientists),
            (RowKind::Engineer, "Engineer", base.engineers, base.allocated_engineers),
        ] {
            if total > 0 {
                let mut row = Row::new(kind, name, to_qty(total), 0);
                row.reserved_src = to_qty(allocated);
                row.category = Category::Personnel;
                rows.push(row);
            }
        }

        let battlescape = self.origin == ScreenOrigin::Battlescape;
        for rule in catalog.items() {
            let id = rule.id;
            let reserved = base.craft_item_count(id) + base.soldier_armor_count(id);
            let in_transfer = base.transfer_item_count(id);
            let total = base.storage.quantity(id) + reserved + in_transfer;
            if total == 0 || (rule.alien && !self.options.allow_selling_live_aliens) {
                continue;
            }

            let mut row = Row::new(RowKind::Item(id), rule.name.clone(), to_qty(total), 0);
            row.unit_cost = rule.sell_cost;
            row.reserved_src = to_qty(reserved);
            row.in_transfer_qty = to_qty(in_transfer);
            row.capacity_weight = rule.size;
            row.protect_reserved = !battlescape || always_protected(base, rule, catalog);
            row.ammo = rule.is_ammo_like();
            row.category = item_category(rule);
            rows.push(row);
        }

        for row in &mut rows {
            row.dest_is_movable = false;
        }
        self.overfull_on_open =
            self.options.storage_limits_enforced && base.stores_overfull(catalog, 0.0);
        self.rows = rows;
        Ok(())
    }

    fn build_transfer(&mut self, from: &Base, to: &Base, catalog: &Catalog) -> LedgerResult<()> {
        let mut rows = Vec::new();

        for soldier in from.soldiers.iter().filter(|s| s.craft.is_none()) {
            let mut row = Row::new(RowKind::Soldier(soldier.id), soldier.name.clone(), 1, 0);
            row.capacity_weight = 1.0;
            row.category = Category::Personnel;
            rows.push(row);
        }

        for craft in from.crafts.iter().filter(|c| c.status != CraftStatus::Out) {
            let rule = catalog.require_craft_rule(&craft.rule)?;
            let mut row = Row::new(RowKind::Craft(craft.id), craft.name.clone(), 1, 0);
            row.unit_cost = rule.transfer_cost;
            row.capacity_weight = 1.0;
            row.category = Category::CraftArmament;
            rows.push(row);
        }

        for (kind, name, available, there) in [
            (RowKind::Scientist, "Scientist", from.available_scientists(), to.scientists),
            (RowKind::Engineer, "Engineer", from.available_engineers(), to.engineers),
        ] {
            if available > 0 {
                let mut row = Row::new(kind, name, to_qty(available), to_qty(there));
                row.capacity_weight = 1.0;
                row.category = Category::Personnel;
                rows.push(row);
            }
        }

        for mut row in build_rows(&from.storage, &ItemContainer::new(), catalog, |_| true) {
            let Some(id) = row.item() else { continue };
            let rule = catalog.require_item(id)?;
            row.dest_qty = to_qty(to.storage.quantity(id));
            row.in_transfer_qty = to_qty(from.transfer_item_count(id));
            row.unit_cost = rule.transfer_cost;
            row.capacity_weight = rule.size;
            rows.push(row);
        }

        for row in &mut rows {
            row.dest_is_movable = false;
        }

        let free = |capacity: u32, used: u32| i32::try_from(i64::from(capacity) - i64::from(used)).unwrap_or(0);
        self.dest_limits = DestinationLimits {
            free_stores: to.stores_capacity - to.used_stores(catalog),
            free_quarters: free(to.quarters_capacity, to.used_quarters()),
            free_hangars: free(to.hangar_capacity, to.used_hangars()),
        };
        self.rows = rows;
        Ok(())
    }

    pub(crate) fn reindex(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .filter_map(|(position, row)| row.item().map(|id| (id, position)))
            .collect();
    }

    /// Screen this ledger serves.
    #[must_use]
    pub const fn mode(&self) -> LedgerMode {
        self.mode
    }

    /// Where the screen was opened from.
    #[must_use]
    pub const fn origin(&self) -> ScreenOrigin {
        self.origin
    }

    /// Source base.
    #[must_use]
    pub const fn base(&self) -> BaseId {
        self.base
    }

    /// All rows, in catalog order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the ledger has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a row.
    ///
    /// # Errors
    ///
    /// Returns `RowOutOfRange` for a bad index.
    pub fn row(&self, index: usize) -> LedgerResult<&Row> {
        self.rows.get(index).ok_or(LedgerError::RowOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    /// Row position of an item or vehicle type.
    #[must_use]
    pub fn row_for_item(&self, item: ItemId) -> Option<usize> {
        self.index.get(&item).copied()
    }

    /// Running totals including pending changes.
    #[must_use]
    pub const fn totals(&self) -> &Totals {
        &self.totals
    }

    /// Totals as of the last build or commit.
    #[must_use]
    pub const fn baseline(&self) -> &Totals {
        &self.baseline
    }

    /// Limits of the craft being equipped.
    #[must_use]
    pub const fn craft_limits(&self) -> &CraftLimits {
        &self.craft_limits
    }

    /// Free room at the receiving base.
    #[must_use]
    pub const fn destination_limits(&self) -> &DestinationLimits {
        &self.dest_limits
    }

    /// Player options captured at build time.
    #[must_use]
    pub const fn options(&self) -> &LedgerOptions {
        &self.options
    }

    /// Returns true if any row has an uncommitted change.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.rows.iter().any(Row::is_changed)
    }

    /// Categories present, in first-seen order, after [`Category::All`].
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = vec![Category::All];
        for row in &self.rows {
            if !categories.contains(&row.category) {
                categories.push(row.category);
            }
        }
        categories
    }

    /// Ledger row positions listed under `category`.
    #[must_use]
    pub fn visible_rows(&self, category: Category) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| category == Category::All || row.category == category)
            .map(|(position, _)| position)
            .collect()
    }

    /// Whether the confirm button may be used. On the sell screen the stores
    /// must not end up over capacity when limits are enforced.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        match self.mode {
            LedgerMode::Sell if self.options.storage_limits_enforced => {
                self.used_stores + self.totals.storage_delta
                    <= self.stores_capacity + crate::savegame::STORES_TOLERANCE
            }
            _ => true,
        }
    }

    /// Whether the screen may be left without committing. A sell screen
    /// opened over full stores must be resolved first.
    #[must_use]
    pub const fn can_cancel(&self) -> bool {
        !self.overfull_on_open
    }
}

/// Reserved stock that stays protected even after a mission: craft fuel,
/// mounted craft armament, vehicles and their ammo, and armour.
fn always_protected(base: &Base, rule: &ItemRule, catalog: &Catalog) -> bool {
    if rule.armor {
        return true;
    }
    base.crafts.iter().any(|craft| {
        let fuel = catalog
            .craft_rule(&craft.rule)
            .and_then(|r| r.refuel_item)
            .is_some_and(|fuel| fuel == rule.id);
        fuel
            || craft.armament_count(rule.id) > 0
            || craft.vehicle_count(rule.id) > 0
            || craft.vehicle_ammo_count(rule.id, catalog) > 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CraftRule;
    use crate::savegame::{Craft, Soldier, Transfer, Vehicle};

    fn catalog() -> Catalog {
        let mut rifle = ItemRule::new(1, "Rifle", BattleType::Firearm);
        rifle.compatible_ammo = vec![2];
        rifle.size = 0.2;
        rifle.sell_cost = 900;
        let mut clip = ItemRule::new(2, "Rifle Clip", BattleType::Ammo);
        clip.clip_size = 20;
        let mut tank = ItemRule::new(3, "Tank/Cannon", BattleType::Firearm);
        tank.fixed = true;
        tank.clip_size = 30;
        tank.compatible_ammo = vec![4];
        let mut shells = ItemRule::new(4, "Cannon Shells", BattleType::Ammo);
        shells.clip_size = 6;
        let mut plasma = ItemRule::new(5, "Plasma Rifle", BattleType::Firearm);
        plasma.requires = vec!["plasma".to_string()];
        let corpse = ItemRule::new(6, "Sectoid Corpse", BattleType::Corpse);
        let mut alloys = ItemRule::new(7, "Alien Alloys", BattleType::None);
        alloys.size = 0.1;
        let mut armor = ItemRule::new(8, "Personal Armor", BattleType::None);
        armor.armor = true;
        armor.size = 0.5;

        let craft = CraftRule {
            id: "skyranger".to_string(),
            crew_space: 14,
            max_vehicles: 3,
            max_items: 80,
            sell_cost: 50_000,
            transfer_cost: 1000,
            refuel_item: None,
        };
        Catalog::new(
            vec![rifle, clip, tank, shells, plasma, corpse, alloys, armor],
            vec![craft],
        )
        .unwrap()
    }

    fn game() -> SavedGame {
        let mut base = Base::new(1, "Home");
        base.storage = [(1, 10), (2, 30), (3, 1), (4, 12), (5, 2), (6, 3), (7, 50)]
            .into_iter()
            .collect();
        base.stores_capacity = 50.0;
        let mut craft = Craft::new(1, "skyranger", "Skyranger-1");
        craft.items.add(1, 2);
        craft.vehicles.push(Vehicle::new(3, 30, 4));
        base.crafts.push(craft);
        let mut soldier = Soldier::new(1, "Ada");
        soldier.craft = Some(1);
        soldier.layout = vec![1, 2];
        base.soldiers.push(soldier);
        let mut spare = Soldier::new(2, "Bo");
        spare.armor_item = Some(8);
        base.soldiers.push(spare);
        base.scientists = 4;
        base.allocated_scientists = 3;

        let mut other = Base::new(2, "Outpost");
        other.storage.add(1, 1);
        other.stores_capacity = 10.0;
        other.quarters_capacity = 5;
        other.hangar_capacity = 1;

        SavedGame {
            funds: 1000,
            bases: vec![base, other],
            research: std::collections::HashSet::new(),
        }
    }

    #[test]
    fn test_craft_rows_follow_catalog_order() {
        let ledger = Ledger::build(
            &game(),
            1,
            LedgerMode::CraftEquipment { craft: 1 },
            &catalog(),
            ScreenOrigin::Geoscape,
        )
        .unwrap();

        // plasma is not researched, the corpse and alloys are not equipment
        let kinds: Vec<RowKind> = ledger.rows().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::Item(1),
                RowKind::Item(2),
                RowKind::Vehicle(3),
                RowKind::Item(4),
            ]
        );
    }

    #[test]
    fn test_craft_vehicle_ammo_is_reserved() {
        let ledger = Ledger::build(
            &game(),
            1,
            LedgerMode::CraftEquipment { craft: 1 },
            &catalog(),
            ScreenOrigin::Geoscape,
        )
        .unwrap();

        let shells = ledger.row(ledger.row_for_item(4).unwrap()).unwrap();
        assert_eq!(shells.dest_qty, 5);
        assert_eq!(shells.reserved_dest, 5);

        let tank = ledger.row(ledger.row_for_item(3).unwrap()).unwrap();
        assert_eq!(tank.dest_qty, 1);
        assert_eq!(tank.vehicle.as_ref().unwrap().clips_per_vehicle, 5);

        let rifle = ledger.row(0).unwrap();
        assert_eq!(rifle.claimed_qty, Some(1));

        let totals = ledger.totals();
        assert_eq!(totals.crew, 1);
        assert_eq!(totals.craft_space_used, 5);
        assert_eq!(totals.craft_items, 2);
        assert_eq!(totals.craft_vehicles, 1);
    }

    #[test]
    fn test_unknown_craft() {
        let result = Ledger::build(
            &game(),
            1,
            LedgerMode::CraftEquipment { craft: 9 },
            &catalog(),
            ScreenOrigin::Geoscape,
        );
        assert_eq!(result.unwrap_err(), LedgerError::CraftNotFound(9));
    }

    #[test]
    fn test_sell_rows_and_categories() {
        let ledger = Ledger::build(&game(), 1, LedgerMode::Sell, &catalog(), ScreenOrigin::Geoscape)
            .unwrap();

        // assigned soldier is hidden
        assert!(ledger
            .rows()
            .iter()
            .all(|r| r.kind != RowKind::Soldier(1)));
        assert!(ledger.rows().iter().any(|r| r.kind == RowKind::Soldier(2)));

        let scientists = ledger
            .rows()
            .iter()
            .find(|r| r.kind == RowKind::Scientist)
            .unwrap();
        assert_eq!(scientists.available(crate::row::Direction::ToDestination), 1);

        assert_eq!(
            ledger.categories(),
            vec![
                Category::All,
                Category::Personnel,
                Category::CraftArmament,
                Category::Equipment,
                Category::Aliens,
                Category::Components,
            ]
        );
        let aliens = ledger.visible_rows(Category::Aliens);
        assert_eq!(aliens.len(), 1);
        assert_eq!(ledger.rows()[aliens[0]].kind, RowKind::Item(6));
    }

    #[test]
    fn test_sell_reserved_policy() {
        let mut game = game();
        game.bases[0].transfers.push(Transfer::items(1, 3, 10));

        let geoscape =
            Ledger::build(&game, 1, LedgerMode::Sell, &catalog(), ScreenOrigin::Geoscape).unwrap();
        let rifle = geoscape.row(geoscape.row_for_item(1).unwrap()).unwrap();
        assert_eq!(rifle.source_qty, 15);
        assert_eq!(rifle.reserved_src, 2);
        assert_eq!(rifle.in_transfer_qty, 3);
        assert!(rifle.protect_reserved);

        let battlescape =
            Ledger::build(&game, 1, LedgerMode::Sell, &catalog(), ScreenOrigin::Battlescape)
                .unwrap();
        let rifle = battlescape
            .row(battlescape.row_for_item(1).unwrap())
            .unwrap();
        assert!(!rifle.protect_reserved);
        // vehicles parked on a craft stay protected
        let tank = battlescape
            .row(battlescape.row_for_item(3).unwrap())
            .unwrap();
        assert!(tank.protect_reserved);
    }

    #[test]
    fn test_sell_overfull_blocks_cancel() {
        let mut game = game();
        game.bases[0].stores_capacity = 1.0;
        let ledger =
            Ledger::build(&game, 1, LedgerMode::Sell, &catalog(), ScreenOrigin::Geoscape).unwrap();
        assert!(!ledger.can_cancel());
        assert!(!ledger.can_confirm());
    }

    #[test]
    fn test_transfer_rows() {
        let ledger = Ledger::build(
            &game(),
            1,
            LedgerMode::Transfer { to: 2, hours: 24 },
            &catalog(),
            ScreenOrigin::Geoscape,
        )
        .unwrap();

        let rifle = ledger.row(ledger.row_for_item(1).unwrap()).unwrap();
        assert_eq!(rifle.source_qty, 10);
        assert_eq!(rifle.dest_qty, 1);
        assert!(!rifle.dest_is_movable);

        let limits = ledger.destination_limits();
        assert_eq!(limits.free_quarters, 5);
        assert_eq!(limits.free_hangars, 1);
    }

    #[test]
    fn test_build_rows_filters_and_orders() {
        let catalog = catalog();
        let source: ItemContainer = [(7, 1), (1, 1)].into_iter().collect();
        let dest: ItemContainer = [(4, 2)].into_iter().collect();

        let rows = build_rows(&source, &dest, &catalog, |rule| rule.id != 7);
        let kinds: Vec<RowKind> = rows.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![RowKind::Item(1), RowKind::Item(4)]);
        assert!(rows[1].ammo);
        assert_eq!(rows[1].dest_qty, 2);
    }
}
