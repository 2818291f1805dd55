//! # Placement Preview
//!
//! Predicts what a drag in progress would do to the selected unit: time
//! units left, carried weight, and accuracy with the held item. Nothing
//! here mutates the unit; the real move happens when the item is dropped.

use armory_ledger::{BattleType, Catalog, ItemRule};

use crate::error::BattleResult;
use crate::slots::{SlotKind, SlotRule, SlotTable, LEFT_HAND, RIGHT_HAND};
use crate::unit::{require_rule, BattleItem, BattleUnit, MedikitCharges};

/// Time units to unload a weapon with the unload button.
pub const UNLOAD_COST: i32 = 8;
/// Time units to load a clip into an empty weapon.
pub const LOAD_COST: i32 = 15;
/// Rounds value meaning the item never runs dry.
pub const UNLIMITED_ROUNDS: i32 = 255;
/// Accuracy kept when a two-handed item is used with the other hand full.
const TWO_HANDED_PENALTY: f64 = 0.8;

/// What the cursor is over while an item is held.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hover<'a> {
    /// Slot under the cursor.
    pub slot: Option<&'a str>,
    /// Item under the cursor.
    pub item: Option<&'a BattleItem>,
    /// The cursor is over the unload button.
    pub unload: bool,
}

/// Predicted weight against strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightPreview {
    /// Carried weight after the move.
    pub weight: i32,
    /// Unit strength.
    pub strength: i32,
}

impl WeightPreview {
    /// Carrying more than the unit's strength.
    #[must_use]
    pub const fn is_overloaded(&self) -> bool {
        self.weight > self.strength
    }
}

/// Everything the inventory header shows for a drag in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Time units left after the move. May be negative.
    pub time_units: i32,
    /// Weight after the move.
    pub weight: WeightPreview,
    /// Accuracy with the held item.
    pub accuracy: i32,
}

/// Rounds left in a weapon or clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounds {
    /// Nothing to show.
    None,
    /// A finite count.
    Count(i32),
    /// Never runs dry.
    Unlimited,
}

impl Rounds {
    fn from_raw(rounds: i32) -> Self {
        match rounds {
            UNLIMITED_ROUNDS => Self::Unlimited,
            n if n > 0 => Self::Count(n),
            _ => Self::None,
        }
    }
}

/// Stats shown for the item under the cursor. Zero means not shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemStats {
    /// Accuracy percentage.
    pub accuracy: i32,
    /// Damage.
    pub power: i32,
    /// Rounds left.
    pub rounds: Rounds,
    /// Medikit charges, for medikits.
    pub medikit: Option<MedikitCharges>,
}

impl ItemStats {
    const EMPTY: Self = Self {
        accuracy: 0,
        power: 0,
        rounds: Rounds::None,
        medikit: None,
    };
}

/// Preview calculator over one ruleset.
#[derive(Clone, Copy, Debug)]
pub struct InventoryPreview<'a> {
    catalog: &'a Catalog,
    slots: &'a SlotTable,
    show_more_stats: bool,
}

impl<'a> InventoryPreview<'a> {
    /// Creates a calculator. With `show_more_stats` off, time units are not
    /// previewed and accuracy uses the plain health ratio.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, slots: &'a SlotTable, show_more_stats: bool) -> Self {
        Self {
            catalog,
            slots,
            show_more_stats,
        }
    }

    /// Full header preview for a held item.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` or `SlotNotFound` for unknown handles.
    pub fn preview(
        &self,
        unit: &BattleUnit,
        held: Option<&BattleItem>,
        hover: Hover<'_>,
    ) -> BattleResult<PlacementPreview> {
        Ok(PlacementPreview {
            time_units: self.time_units(unit, held, hover)?,
            weight: self.weight(unit, held, hover.slot)?,
            accuracy: self.accuracy(unit, held, hover.slot, false)?,
        })
    }

    /// Time units left if the held item were dropped where the cursor is.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` or `SlotNotFound` for unknown handles.
    pub fn time_units(
        &self,
        unit: &BattleUnit,
        held: Option<&BattleItem>,
        hover: Hover<'_>,
    ) -> BattleResult<i32> {
        let mut time_units = unit.time_units;
        let Some(item) = held else {
            return Ok(time_units);
        };
        if !self.show_more_stats {
            return Ok(time_units);
        }

        let rule = require_rule(self.catalog, item.rule)?;
        if hover.unload && rule.needs_ammo() && item.ammo.is_some() {
            time_units -= UNLOAD_COST;
        } else if let Some(to) = hover.slot.filter(|to| *to != item.slot) {
            let loads_empty_weapon = match hover.item {
                Some(target) => {
                    require_rule(self.catalog, target.rule)?.needs_ammo() && target.ammo.is_none()
                }
                None => false,
            };
            time_units -= if loads_empty_weapon {
                LOAD_COST
            } else {
                self.slots.cost(&item.slot, to)?
            };
        }
        Ok(time_units)
    }

    /// Carried weight if the held item were dropped where the cursor is.
    ///
    /// An item picked up from the ground is assumed to end up on the unit.
    /// An item picked up from the unit only changes the weight when the
    /// cursor is over the ground.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` or `SlotNotFound` for unknown handles.
    pub fn weight(
        &self,
        unit: &BattleUnit,
        held: Option<&BattleItem>,
        hover_slot: Option<&str>,
    ) -> BattleResult<WeightPreview> {
        let mut weight = unit.carried_weight(self.catalog)?;
        if let Some(item) = held {
            let item_weight = item.weight(self.catalog)?;
            if self.slots.require(&item.slot)?.is_carried() {
                let to_ground = match hover_slot {
                    Some(to) => !self.slots.require(to)?.is_carried(),
                    None => false,
                };
                if to_ground {
                    weight -= item_weight;
                }
            } else {
                weight += item_weight;
            }
        }
        Ok(WeightPreview {
            weight,
            strength: unit.stats.strength,
        })
    }

    /// Accuracy with an item, or firing accuracy with none.
    ///
    /// `use_modifiers` adds melee skill and the two-handed penalty, and
    /// lets arm wounds count.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` or `SlotNotFound` for unknown handles.
    #[allow(clippy::cast_possible_truncation)]
    pub fn accuracy(
        &self,
        unit: &BattleUnit,
        item: Option<&BattleItem>,
        hover_slot: Option<&str>,
        use_modifiers: bool,
    ) -> BattleResult<i32> {
        let rule = item
            .map(|item| require_rule(self.catalog, item.rule))
            .transpose()?;
        let hover = hover_slot.map(|id| self.slots.require(id)).transpose()?;

        let base = match rule.map(|rule| rule.battle_type) {
            Some(BattleType::Melee) => unit.stats.melee,
            Some(battle_type) if battle_type.is_thrown() => unit.stats.throwing,
            _ => unit.stats.firing,
        };
        let mut accuracy = f64::from(base);

        let held = item.zip(rule).filter(|_| use_modifiers);
        if let Some((item, rule)) = held {
            if rule.battle_type == BattleType::Melee && rule.skill_applied {
                accuracy *= f64::from(rule.accuracy_melee) / 100.0;
            }
            if rule.two_handed && two_handed_penalty(unit, item, hover) {
                accuracy *= TWO_HANDED_PENALTY;
            }
        }

        if self.show_more_stats {
            let arm = held.map(|(item, rule)| {
                let hand = hover
                    .filter(|slot| slot.kind == SlotKind::Hand)
                    .map_or(item.slot.as_str(), |slot| slot.id.as_str());
                (hand, rule)
            });
            accuracy *= f64::from(unit.accuracy_modifier(arm)) / 100.0;
        } else {
            accuracy *= unit.health_ratio();
        }
        Ok(accuracy as i32)
    }

    /// Damage of an item: the loaded clip's if it has one, plus strength
    /// for strength-based weapons.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` for an unknown item type.
    pub fn power(&self, unit: &BattleUnit, item: &BattleItem) -> BattleResult<i32> {
        let rule = require_rule(self.catalog, item.rule)?;
        let mut power = match item.loaded_ammo().filter(|_| rule.needs_ammo()) {
            Some(clip) => require_rule(self.catalog, clip.rule)?.power,
            None => rule.power,
        };
        if rule.strength_applied {
            power += unit.stats.strength;
        }
        Ok(power)
    }

    /// Rounds left: the loaded clip's, else the item's own.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` for an unknown item type.
    pub fn rounds(&self, item: &BattleItem) -> BattleResult<Rounds> {
        let rule = require_rule(self.catalog, item.rule)?;
        Ok(Rounds::from_raw(rounds_of(rule, item)))
    }

    /// Stats line for the item under the cursor.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` or `SlotNotFound` for unknown handles.
    pub fn item_stats(
        &self,
        unit: &BattleUnit,
        item: &BattleItem,
        hover_slot: Option<&str>,
    ) -> BattleResult<ItemStats> {
        let rule = require_rule(self.catalog, item.rule)?;
        let stats = match rule.battle_type {
            BattleType::Medikit => ItemStats {
                medikit: Some(item.medikit),
                ..ItemStats::EMPTY
            },
            BattleType::Melee
            | BattleType::Flare
            | BattleType::Grenade
            | BattleType::ProximityGrenade
            | BattleType::Firearm => ItemStats {
                accuracy: self.accuracy(unit, Some(item), hover_slot, true)?,
                power: self.power(unit, item)?,
                rounds: self.rounds(item)?,
                medikit: None,
            },
            BattleType::Ammo => ItemStats {
                power: self.power(unit, item)?,
                rounds: self.rounds(item)?,
                ..ItemStats::EMPTY
            },
            _ => ItemStats::EMPTY,
        };
        Ok(stats)
    }
}

fn rounds_of(rule: &ItemRule, item: &BattleItem) -> i32 {
    match item.loaded_ammo().filter(|_| rule.needs_ammo()) {
        Some(clip) => clip.rounds,
        None => item.rounds,
    }
}

/// Whether a two-handed item loses accuracy. A hand the item is leaving,
/// or the hand it is about to go into, does not count as occupied.
fn two_handed_penalty(unit: &BattleUnit, item: &BattleItem, hover: Option<&SlotRule>) -> bool {
    let right_full = unit.right_hand().is_some();
    let left_full = unit.left_hand().is_some();
    if !right_full && !left_full {
        return false;
    }

    let from = item.slot.as_str();
    if (from == LEFT_HAND && !right_full) || (from == RIGHT_HAND && !left_full) {
        return false;
    }

    if let Some(slot) = hover.filter(|slot| slot.kind == SlotKind::Hand) {
        if slot.id == RIGHT_HAND && (from == LEFT_HAND || !left_full) {
            return false;
        }
        if slot.id == LEFT_HAND && (from == RIGHT_HAND || !right_full) {
            return false;
        }
    }
    true
}
