//! # Savegame Entities
//!
//! The durable state the equipment screens reconcile against: bases, their
//! stores, crafts, vehicles, soldiers and queued transfers.
//!
//! Ledgers never hold references into this state. Rows carry IDs and are
//! resolved here again at commit time.

use std::collections::HashSet;

use crate::catalog::{Catalog, ItemId, ItemRule};
use crate::container::ItemContainer;
use crate::error::{LedgerError, LedgerResult};

/// Base identifier.
pub type BaseId = u32;
/// Craft identifier.
pub type CraftId = u32;
/// Soldier identifier.
pub type SoldierId = u32;

/// Ammo value reported by a vehicle that never runs dry.
pub const UNLIMITED_AMMO: i32 = 255;

/// A vehicle (HWP) parked on a craft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vehicle {
    item: ItemId,
    /// Rounds carried, or -1 for unlimited.
    ammo: i32,
    /// Crew space taken on the craft.
    size: i32,
}

impl Vehicle {
    /// Creates a vehicle carrying `ammo` rounds (-1 for unlimited).
    #[must_use]
    pub const fn new(item: ItemId, ammo: i32, size: i32) -> Self {
        Self { item, ammo, size }
    }

    /// The vehicle's item type.
    #[inline]
    #[must_use]
    pub const fn item(&self) -> ItemId {
        self.item
    }

    /// Crew space taken on the craft.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> i32 {
        self.size
    }

    /// Returns true if the vehicle never runs out of ammo.
    #[inline]
    #[must_use]
    pub const fn has_unlimited_ammo(&self) -> bool {
        self.ammo == -1
    }

    /// Rounds carried. Unlimited vehicles report [`UNLIMITED_AMMO`].
    #[inline]
    #[must_use]
    pub const fn ammo(&self) -> i32 {
        if self.has_unlimited_ammo() {
            UNLIMITED_AMMO
        } else {
            self.ammo
        }
    }

    /// Sets the rounds carried. Ignored for unlimited vehicles.
    pub fn set_ammo(&mut self, ammo: i32) {
        if !self.has_unlimited_ammo() {
            self.ammo = ammo;
        }
    }

    /// Converts the rounds carried into clips of the vehicle's ammo type.
    #[must_use]
    pub fn clips(&self, ammo_rule: &ItemRule) -> i32 {
        if ammo_rule.clip_size > 0 {
            self.ammo() / ammo_rule.clip_size
        } else {
            self.ammo()
        }
    }
}

/// A soldier stationed at a base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Soldier {
    /// Unique identifier.
    pub id: SoldierId,
    /// Display name.
    pub name: String,
    /// Craft the soldier is assigned to.
    pub craft: Option<CraftId>,
    /// Store item of the armour worn, if it has one.
    pub armor_item: Option<ItemId>,
    /// Item types in the soldier's saved equipment layout.
    pub layout: Vec<ItemId>,
}

impl Soldier {
    /// Creates an unassigned soldier without armour or layout.
    #[must_use]
    pub fn new(id: SoldierId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            craft: None,
            armor_item: None,
            layout: Vec::new(),
        }
    }
}

/// A weapon mounted on a craft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CraftWeapon {
    /// Launcher store item.
    pub launcher: ItemId,
    /// Clip store item, if the weapon uses one.
    pub clip: Option<ItemId>,
    /// Clips currently loaded.
    pub clips_loaded: u32,
}

/// What a craft is doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CraftStatus {
    /// Ready to launch.
    #[default]
    Ready,
    /// Refuelling in the hangar.
    Refuelling,
    /// Rearming in the hangar.
    Rearming,
    /// Under repair.
    Repairs,
    /// Away from the base.
    Out,
}

/// A craft docked at a base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Craft {
    /// Unique identifier.
    pub id: CraftId,
    /// Craft rule name.
    pub rule: String,
    /// Display name.
    pub name: String,
    /// Current status.
    pub status: CraftStatus,
    /// Loose equipment in the hold.
    pub items: ItemContainer,
    /// Vehicles aboard.
    pub vehicles: Vec<Vehicle>,
    /// Mounted weapons.
    pub weapons: Vec<CraftWeapon>,
}

impl Craft {
    /// Creates an empty, ready craft.
    #[must_use]
    pub fn new(id: CraftId, rule: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            rule: rule.into(),
            name: name.into(),
            status: CraftStatus::Ready,
            items: ItemContainer::new(),
            vehicles: Vec::new(),
            weapons: Vec::new(),
        }
    }

    /// Number of vehicles of a type aboard.
    #[must_use]
    pub fn vehicle_count(&self, item: ItemId) -> usize {
        self.vehicles.iter().filter(|v| v.item() == item).count()
    }

    /// Crew space taken by vehicles.
    #[must_use]
    pub fn vehicle_space(&self) -> i32 {
        self.vehicles.iter().map(Vehicle::size).sum()
    }

    /// Number of launchers and clips of an item type mounted.
    #[must_use]
    pub fn armament_count(&self, item: ItemId) -> u32 {
        self.weapons
            .iter()
            .map(|w| {
                let launcher = u32::from(w.launcher == item);
                let clips = if w.clip == Some(item) { w.clips_loaded } else { 0 };
                launcher + clips
            })
            .sum()
    }

    /// Clips of an ammo type loaded into the craft's vehicles.
    #[must_use]
    pub fn vehicle_ammo_count(&self, ammo: ItemId, catalog: &Catalog) -> u32 {
        let Some(ammo_rule) = catalog.item(ammo) else {
            return 0;
        };
        self.vehicles
            .iter()
            .filter(|v| {
                catalog
                    .item(v.item())
                    .and_then(ItemRule::primary_ammo)
                    .is_some_and(|a| a == ammo)
            })
            .map(|v| u32::try_from(v.clips(ammo_rule)).unwrap_or(0))
            .sum()
    }

    /// Removes every vehicle and returns them, with their clips, as store items.
    pub fn unload_into(&mut self, stores: &mut ItemContainer, catalog: &Catalog) {
        for vehicle in self.vehicles.drain(..) {
            stores.add(vehicle.item(), 1);
            if let Some(ammo_rule) = catalog
                .item(vehicle.item())
                .and_then(ItemRule::primary_ammo)
                .and_then(|ammo| catalog.item(ammo))
            {
                if !vehicle.has_unlimited_ammo() {
                    stores.add(ammo_rule.id, u32::try_from(vehicle.clips(ammo_rule)).unwrap_or(0));
                }
            }
        }
        for weapon in self.weapons.drain(..) {
            stores.add(weapon.launcher, 1);
            if let Some(clip) = weapon.clip {
                stores.add(clip, weapon.clips_loaded);
            }
        }
        self.items.drain_into(stores);
    }
}

/// What a queued transfer carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferCargo {
    /// Stock of an item type.
    Item(ItemId),
    /// A soldier.
    Soldier(Soldier),
    /// A craft with everything aboard.
    Craft(Box<Craft>),
    /// Scientists.
    Scientist,
    /// Engineers.
    Engineer,
}

/// Cargo travelling to a base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    /// What travels.
    pub cargo: TransferCargo,
    /// How many (always 1 for soldiers and crafts).
    pub quantity: u32,
    /// Hours until arrival.
    pub hours: u32,
}

impl Transfer {
    /// Item stock in transit.
    #[must_use]
    pub const fn items(item: ItemId, quantity: u32, hours: u32) -> Self {
        Self {
            cargo: TransferCargo::Item(item),
            quantity,
            hours,
        }
    }

    /// The item type carried, if this is an item transfer.
    #[must_use]
    pub const fn item(&self) -> Option<ItemId> {
        match self.cargo {
            TransferCargo::Item(id) => Some(id),
            _ => None,
        }
    }
}

/// A player base.
#[derive(Clone, Debug, PartialEq)]
pub struct Base {
    /// Unique identifier.
    pub id: BaseId,
    /// Display name.
    pub name: String,
    /// General stores.
    pub storage: ItemContainer,
    /// Soldiers stationed here.
    pub soldiers: Vec<Soldier>,
    /// Crafts in the hangars (or out on missions).
    pub crafts: Vec<Craft>,
    /// Incoming transfers.
    pub transfers: Vec<Transfer>,
    /// Scientists employed.
    pub scientists: u32,
    /// Engineers employed.
    pub engineers: u32,
    /// Scientists assigned to research.
    pub allocated_scientists: u32,
    /// Engineers assigned to manufacturing.
    pub allocated_engineers: u32,
    /// Stores volume.
    pub stores_capacity: f64,
    /// Living quarters.
    pub quarters_capacity: u32,
    /// Hangars.
    pub hangar_capacity: u32,
}

impl Base {
    /// Creates an empty base.
    #[must_use]
    pub fn new(id: BaseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            storage: ItemContainer::new(),
            soldiers: Vec::new(),
            crafts: Vec::new(),
            transfers: Vec::new(),
            scientists: 0,
            engineers: 0,
            allocated_scientists: 0,
            allocated_engineers: 0,
            stores_capacity: 0.0,
            quarters_capacity: 0,
            hangar_capacity: 0,
        }
    }

    /// Looks up a docked craft.
    #[must_use]
    pub fn craft(&self, id: CraftId) -> Option<&Craft> {
        self.crafts.iter().find(|c| c.id == id)
    }

    /// Looks up a docked craft mutably.
    pub fn craft_mut(&mut self, id: CraftId) -> Option<&mut Craft> {
        self.crafts.iter_mut().find(|c| c.id == id)
    }

    /// Soldiers assigned to a craft.
    #[must_use]
    pub fn craft_crew(&self, craft: CraftId) -> usize {
        self.soldiers.iter().filter(|s| s.craft == Some(craft)).count()
    }

    /// Items of a type claimed by the equipment layouts of a craft's crew.
    #[must_use]
    pub fn claimed_by_crew(&self, craft: CraftId, item: ItemId) -> u32 {
        self.soldiers
            .iter()
            .filter(|s| s.craft == Some(craft))
            .map(|s| s.layout.iter().filter(|&&i| i == item).count())
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .sum()
    }

    /// Items of a type in incoming transfers.
    #[must_use]
    pub fn transfer_item_count(&self, item: ItemId) -> u32 {
        self.transfers
            .iter()
            .filter(|t| t.item() == Some(item))
            .map(|t| t.quantity)
            .sum()
    }

    /// Items of a type loose in craft holds.
    #[must_use]
    pub fn craft_item_count(&self, item: ItemId) -> u32 {
        self.crafts.iter().map(|c| c.items.quantity(item)).sum()
    }

    /// Armour store items worn by soldiers.
    #[must_use]
    pub fn soldier_armor_count(&self, item: ItemId) -> u32 {
        let worn = self
            .soldiers
            .iter()
            .filter(|s| s.armor_item == Some(item))
            .count();
        u32::try_from(worn).unwrap_or(u32::MAX)
    }

    /// Scientists not assigned to research.
    #[must_use]
    pub const fn available_scientists(&self) -> u32 {
        self.scientists.saturating_sub(self.allocated_scientists)
    }

    /// Engineers not assigned to manufacturing.
    #[must_use]
    pub const fn available_engineers(&self) -> u32 {
        self.engineers.saturating_sub(self.allocated_engineers)
    }

    /// Personnel living at the base, including incoming transfers.
    #[must_use]
    pub fn used_quarters(&self) -> u32 {
        let incoming: u32 = self
            .transfers
            .iter()
            .filter(|t| {
                matches!(
                    t.cargo,
                    TransferCargo::Soldier(_) | TransferCargo::Scientist | TransferCargo::Engineer
                )
            })
            .map(|t| t.quantity)
            .sum();
        let soldiers = u32::try_from(self.soldiers.len()).unwrap_or(u32::MAX);
        soldiers + self.scientists + self.engineers + incoming
    }

    /// Hangars in use, including incoming crafts.
    #[must_use]
    pub fn used_hangars(&self) -> u32 {
        let incoming = self
            .transfers
            .iter()
            .filter(|t| matches!(t.cargo, TransferCargo::Craft(_)))
            .count();
        u32::try_from(self.crafts.len() + incoming).unwrap_or(u32::MAX)
    }

    /// Stores volume in use, including incoming item transfers.
    #[must_use]
    pub fn used_stores(&self, catalog: &Catalog) -> f64 {
        let stored = self
            .storage
            .iter()
            .chain(self.transfers.iter().filter_map(|t| t.item().map(|i| (i, t.quantity))))
            .filter_map(|(item, qty)| catalog.item(item).map(|rule| rule.size * f64::from(qty)));
        stored.sum()
    }

    /// Returns true if stores would be over capacity after `offset` more volume.
    #[must_use]
    pub fn stores_overfull(&self, catalog: &Catalog, offset: f64) -> bool {
        self.used_stores(catalog) + offset > self.stores_capacity + STORES_TOLERANCE
    }
}

/// Rounding slack when comparing stores volumes.
pub const STORES_TOLERANCE: f64 = 0.05;

/// Everything the equipment screens can touch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SavedGame {
    /// Money available.
    pub funds: i64,
    /// Player bases.
    pub bases: Vec<Base>,
    /// Completed research topics.
    pub research: HashSet<String>,
}

impl SavedGame {
    /// Returns true if every listed topic has been researched.
    #[must_use]
    pub fn is_researched(&self, topics: &[String]) -> bool {
        topics.iter().all(|t| self.research.contains(t))
    }

    /// Looks up a base.
    ///
    /// # Errors
    ///
    /// Returns `BaseNotFound` for an unknown ID.
    pub fn base(&self, id: BaseId) -> LedgerResult<&Base> {
        self.bases
            .iter()
            .find(|b| b.id == id)
            .ok_or(LedgerError::BaseNotFound(id))
    }

    /// Looks up a base mutably.
    ///
    /// # Errors
    ///
    /// Returns `BaseNotFound` for an unknown ID.
    pub fn base_mut(&mut self, id: BaseId) -> LedgerResult<&mut Base> {
        self.bases
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(LedgerError::BaseNotFound(id))
    }

    /// Borrows two different bases mutably at once.
    ///
    /// # Errors
    ///
    /// Returns `BaseNotFound` if either is unknown, or if both IDs are the same.
    pub fn two_bases_mut(&mut self, a: BaseId, b: BaseId) -> LedgerResult<(&mut Base, &mut Base)> {
        let ia = self.position(a)?;
        let ib = self.position(b)?;
        if ia == ib {
            return Err(LedgerError::BaseNotFound(b));
        }
        if ia < ib {
            let (left, right) = self.bases.split_at_mut(ib);
            Ok((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.bases.split_at_mut(ia);
            Ok((&mut right[0], &mut left[ib]))
        }
    }

    fn position(&self, id: BaseId) -> LedgerResult<usize> {
        self.bases
            .iter()
            .position(|b| b.id == id)
            .ok_or(LedgerError::BaseNotFound(id))
    }

    /// Takes a snapshot for rollback.
    #[must_use]
    pub fn snapshot(&self) -> SavedGameSnapshot {
        SavedGameSnapshot {
            funds: self.funds,
            bases: self.bases.clone(),
        }
    }

    /// Restores from a snapshot.
    pub fn restore(&mut self, snapshot: SavedGameSnapshot) {
        self.funds = snapshot.funds;
        self.bases = snapshot.bases;
    }
}

/// Saved funds and bases.
#[derive(Clone, Debug)]
pub struct SavedGameSnapshot {
    funds: i64,
    bases: Vec<Base>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BattleType;

    fn shells() -> ItemRule {
        let mut rule = ItemRule::new(4, "Cannon Shells", BattleType::Ammo);
        rule.clip_size = 6;
        rule
    }

    #[test]
    fn test_vehicle_unlimited_ammo() {
        let mut tank = Vehicle::new(3, -1, 4);
        assert!(tank.has_unlimited_ammo());
        assert_eq!(tank.ammo(), UNLIMITED_AMMO);

        tank.set_ammo(10);
        assert_eq!(tank.ammo(), UNLIMITED_AMMO);
    }

    #[test]
    fn test_vehicle_clips() {
        let mut tank = Vehicle::new(3, 30, 4);
        assert_eq!(tank.clips(&shells()), 5);

        tank.set_ammo(12);
        assert_eq!(tank.clips(&shells()), 2);
    }

    #[test]
    fn test_armament_count() {
        let mut craft = Craft::new(1, "interceptor", "Interceptor-1");
        craft.weapons.push(CraftWeapon {
            launcher: 20,
            clip: Some(21),
            clips_loaded: 6,
        });
        assert_eq!(craft.armament_count(20), 1);
        assert_eq!(craft.armament_count(21), 6);
        assert_eq!(craft.armament_count(22), 0);
    }

    #[test]
    fn test_base_counts() {
        let mut base = Base::new(1, "Home");
        base.transfers.push(Transfer::items(5, 3, 24));
        base.transfers.push(Transfer::items(5, 2, 12));
        let mut craft = Craft::new(1, "skyranger", "Skyranger-1");
        craft.items.add(5, 4);
        base.crafts.push(craft);
        let mut soldier = Soldier::new(1, "Ada");
        soldier.armor_item = Some(9);
        soldier.craft = Some(1);
        soldier.layout = vec![5, 5, 6];
        base.soldiers.push(soldier);

        assert_eq!(base.transfer_item_count(5), 5);
        assert_eq!(base.craft_item_count(5), 4);
        assert_eq!(base.soldier_armor_count(9), 1);
        assert_eq!(base.craft_crew(1), 1);
        assert_eq!(base.claimed_by_crew(1, 5), 2);
    }

    #[test]
    fn test_two_bases_mut() {
        let mut game = SavedGame::default();
        game.bases.push(Base::new(1, "A"));
        game.bases.push(Base::new(2, "B"));

        let (b, a) = game.two_bases_mut(2, 1).unwrap();
        assert_eq!(b.id, 2);
        assert_eq!(a.id, 1);
        assert!(game.two_bases_mut(1, 1).is_err());
        assert!(game.two_bases_mut(1, 7).is_err());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut game = SavedGame::default();
        game.funds = 100;
        game.bases.push(Base::new(1, "A"));
        let snapshot = game.snapshot();

        game.funds = 0;
        game.bases.clear();
        game.restore(snapshot);

        assert_eq!(game.funds, 100);
        assert_eq!(game.bases.len(), 1);
    }
}
