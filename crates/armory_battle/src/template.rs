//! # Loadout Templates
//!
//! A template remembers where every carried item sat so the same layout
//! can be rebuilt on another unit from whatever lies on the ground.
//! Fixed weapons never move and are never recorded.

use armory_ledger::{Catalog, ItemId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BattleResult;
use crate::unit::{require_rule, BattleItem, BattleUnit};

/// One recorded item placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Item type.
    pub item: ItemId,
    /// Slot id.
    pub slot: String,
    /// Column inside the slot.
    pub x: i32,
    /// Row inside the slot.
    pub y: i32,
    /// Loaded clip type, for items that take one.
    pub ammo: Option<ItemId>,
    /// Primed fuse.
    pub fuse: Option<i32>,
}

/// Result of applying a template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Entries placed on the unit.
    pub placed: usize,
    /// Item types that could not be found on the ground, one per entry.
    pub missing: Vec<ItemId>,
}

impl ApplyReport {
    /// Every entry was placed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// A captured inventory layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutTemplate {
    entries: Vec<LayoutEntry>,
}

impl LoadoutTemplate {
    /// Records the unit's current layout.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` for an unknown item type.
    pub fn capture(unit: &BattleUnit, catalog: &Catalog) -> BattleResult<Self> {
        let mut entries = Vec::with_capacity(unit.inventory.len());
        for item in &unit.inventory {
            let rule = require_rule(catalog, item.rule)?;
            if rule.fixed {
                continue;
            }
            entries.push(LayoutEntry {
                item: item.rule,
                slot: item.slot.clone(),
                x: item.x,
                y: item.y,
                ammo: item.loaded_ammo_type().filter(|_| rule.needs_ammo()),
                fuse: item.fuse,
            });
        }
        debug!(unit = %unit.name, entries = entries.len(), "Loadout captured");
        Ok(Self { entries })
    }

    /// Recorded placements, in capture order.
    #[must_use]
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuilds the layout on `unit` from items on `ground`.
    ///
    /// The unit's own items go to the ground first. An empty template
    /// simply clears the unit. Entries that cannot be filled are reported
    /// and the rest are still placed.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` for an unknown item type.
    pub fn apply(
        &self,
        unit: &mut BattleUnit,
        ground: &mut Vec<BattleItem>,
        catalog: &Catalog,
    ) -> BattleResult<ApplyReport> {
        for entry in &self.entries {
            require_rule(catalog, entry.item)?;
        }
        clear(unit, ground, catalog)?;

        let mut report = ApplyReport::default();
        for entry in &self.entries {
            let needs_ammo = require_rule(catalog, entry.item)?.needs_ammo();
            if take_from_ground(entry, needs_ammo, unit, ground) {
                report.placed += 1;
            } else {
                report.missing.push(entry.item);
            }
        }

        if report.is_complete() {
            debug!(unit = %unit.name, placed = report.placed, "Loadout applied");
        } else {
            warn!(
                unit = %unit.name,
                missing = report.missing.len(),
                "Not enough items on the ground for loadout"
            );
        }
        Ok(report)
    }
}

/// Moves every non-fixed item the unit carries to the ground. Returns the
/// number of items dropped.
///
/// # Errors
///
/// Returns `ItemNotFound` for an unknown item type; nothing moves then.
pub fn clear(
    unit: &mut BattleUnit,
    ground: &mut Vec<BattleItem>,
    catalog: &Catalog,
) -> BattleResult<usize> {
    for item in &unit.inventory {
        require_rule(catalog, item.rule)?;
    }
    let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(&mut unit.inventory)
        .into_iter()
        .partition(|item| catalog.item(item.rule).is_some_and(|rule| rule.fixed));
    unit.inventory = kept;

    let count = dropped.len();
    ground.extend(dropped.into_iter().map(|mut item| {
        item.drop_to_ground();
        item
    }));
    Ok(count)
}

/// Finds the entry's item on the ground and puts it on the unit. A weapon
/// with the wrong clip is reloaded from loose ground ammo and picked up on
/// the second pass.
fn take_from_ground(
    entry: &LayoutEntry,
    needs_ammo: bool,
    unit: &mut BattleUnit,
    ground: &mut Vec<BattleItem>,
) -> bool {
    for _pass in 0..2 {
        let mut exact = None;
        let mut matched_weapon: Option<usize> = None;
        let mut matched_ammo = None;

        for (index, item) in ground.iter().enumerate() {
            if needs_ammo && entry.ammo == Some(item.rule) {
                matched_ammo = Some(index);
            }
            if item.rule != entry.item {
                continue;
            }
            // a fixed weapon already holds this position
            if unit.is_occupied(&entry.slot, entry.x, entry.y) {
                return true;
            }
            if needs_ammo && item.loaded_ammo_type() != entry.ammo {
                // prefer empty weapons
                if matched_weapon.map_or(true, |weapon| ground[weapon].ammo.is_some()) {
                    matched_weapon = Some(index);
                }
                continue;
            }
            exact = Some(index);
            break;
        }

        if let Some(index) = exact {
            let mut item = ground.remove(index);
            item.slot.clone_from(&entry.slot);
            item.x = entry.x;
            item.y = entry.y;
            item.fuse = entry.fuse;
            unit.inventory.push(item);
            return true;
        }

        let Some(weapon) = matched_weapon else {
            return false;
        };
        if entry.ammo.is_some() && matched_ammo.is_none() {
            return false;
        }
        reload(ground, weapon, matched_ammo);
    }
    false
}

/// Swaps the clip in a ground weapon for a loose ground clip, or just
/// unloads it when `clip` is `None`.
fn reload(ground: &mut Vec<BattleItem>, weapon: usize, clip: Option<usize>) {
    let mut weapon = weapon;
    let clip = clip.map(|index| {
        if index < weapon {
            weapon -= 1;
        }
        ground.remove(index)
    });
    let unloaded = std::mem::replace(&mut ground[weapon].ammo, clip.map(Box::new));
    if let Some(mut old) = unloaded {
        old.drop_to_ground();
        ground.push(*old);
    }
}
