//! # Capacity Policy
//!
//! Pure functions over the running totals of a ledger. Nothing here
//! mutates; the transfer engine asks and then clamps.

use crate::catalog::ItemRule;
use crate::ledger::LedgerMode;
use crate::row::{Row, RowKind};

/// Fixed limits of the craft being equipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CraftLimits {
    /// Crew space shared by soldiers and vehicles.
    pub crew_space: i32,
    /// Vehicle slots.
    pub max_vehicles: i32,
    /// Loose item cap, 0 for none.
    pub max_items: i32,
}

/// Free room at a receiving base when the screen opened.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DestinationLimits {
    /// Stores volume.
    pub free_stores: f64,
    /// Living quarters.
    pub free_quarters: i32,
    /// Hangars.
    pub free_hangars: i32,
}

/// Running aggregates of a ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    /// Loose items on the craft, excluding vehicle ammo.
    pub craft_items: i32,
    /// Vehicles on the craft.
    pub craft_vehicles: i32,
    /// Crew space taken by soldiers and vehicles.
    pub craft_space_used: i32,
    /// Soldiers aboard.
    pub crew: i32,
    /// Money gained (sales) or spent (transfer costs).
    pub funds_delta: i64,
    /// Change of stores volume used at the source base.
    pub storage_delta: f64,
    /// Stores volume sent to the receiving base.
    pub dest_volume: f64,
    /// Personnel sent to the receiving base.
    pub dest_personnel: i32,
    /// Crafts sent to the receiving base.
    pub dest_crafts: i32,
}

impl Totals {
    /// Accounts for `delta` units of `row` moving toward the destination.
    ///
    /// `cascaded` marks vehicle ammo moved along with a vehicle, which does
    /// not count against the craft's item cap.
    pub fn record(&mut self, mode: &LedgerMode, row: &Row, delta: i32, cascaded: bool) {
        match mode {
            LedgerMode::CraftEquipment { .. } => match row.kind {
                RowKind::Vehicle(_) => {
                    self.craft_vehicles += delta;
                    self.craft_space_used += delta * row_footprint(row);
                }
                RowKind::Item(_) if !cascaded => self.craft_items += delta,
                _ => {}
            },
            LedgerMode::Sell => {
                self.funds_delta += i64::from(delta) * row.unit_cost;
                self.storage_delta -= f64::from(delta) * row.capacity_weight;
            }
            LedgerMode::Transfer { .. } => {
                self.funds_delta -= i64::from(delta) * row.unit_cost;
                match row.kind {
                    RowKind::Item(_) | RowKind::Vehicle(_) => {
                        self.dest_volume += f64::from(delta) * row.capacity_weight;
                    }
                    RowKind::Craft(_) => self.dest_crafts += delta,
                    RowKind::Soldier(_) | RowKind::Scientist | RowKind::Engineer => {
                        self.dest_personnel += delta;
                    }
                }
            }
        }
    }

    /// Recomputes totals from a baseline and the pending deltas of every row.
    #[must_use]
    pub fn tally(mode: &LedgerMode, baseline: &Self, rows: &[Row]) -> Self {
        let mut totals = *baseline;
        for row in rows {
            totals.record(mode, row, row.pending - row.pending_reserved, false);
            totals.record(mode, row, row.pending_reserved, true);
        }
        totals
    }
}

/// Crew space one unit of a row takes on a craft.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn row_footprint(row: &Row) -> i32 {
    row.capacity_weight.round() as i32
}

/// Crew space still free on the craft.
#[inline]
#[must_use]
pub const fn available_crew_space(limits: &CraftLimits, totals: &Totals) -> i32 {
    limits.crew_space - totals.craft_space_used
}

/// Vehicle slots the craft has.
#[inline]
#[must_use]
pub const fn max_vehicle_slots(limits: &CraftLimits) -> i32 {
    limits.max_vehicles
}

/// Vehicle slots still free on the craft.
#[inline]
#[must_use]
pub const fn remaining_vehicle_slots(limits: &CraftLimits, totals: &Totals) -> i32 {
    limits.max_vehicles - totals.craft_vehicles
}

/// Vehicles of `footprint` that still fit. Negative when the craft already
/// carries more than its current limits allow.
#[must_use]
pub fn vehicle_room(limits: &CraftLimits, totals: &Totals, footprint: i32) -> i32 {
    let by_space = available_crew_space(limits, totals).div_euclid(footprint.max(1));
    remaining_vehicle_slots(limits, totals).min(by_space)
}

/// Loose items the craft may still take, `None` when it has no cap.
#[must_use]
pub const fn remaining_item_cap(limits: &CraftLimits, totals: &Totals) -> Option<i32> {
    if limits.max_items > 0 {
        Some(limits.max_items - totals.craft_items)
    } else {
        None
    }
}

/// Loose item slots still free on the craft (`i32::MAX` when uncapped).
#[must_use]
pub fn available_cargo(limits: &CraftLimits, totals: &Totals) -> i32 {
    remaining_item_cap(limits, totals).map_or(i32::MAX, |left| left.max(0))
}

/// Clips of ammo loaded into each vehicle.
///
/// The vehicle's rounds divided by the clip's rounds when both are known,
/// otherwise the ammo's clip size taken as a plain count.
#[must_use]
pub fn clips_per_vehicle(vehicle: &ItemRule, ammo: &ItemRule) -> i32 {
    if ammo.clip_size > 0 && vehicle.clip_size > 0 {
        vehicle.clip_size / ammo.clip_size
    } else {
        ammo.clip_size
    }
}

/// Rounds a vehicle carries when it boards.
#[must_use]
pub fn vehicle_loaded_ammo(vehicle: &ItemRule, ammo: Option<&ItemRule>) -> i32 {
    match ammo {
        Some(ammo) if ammo.clip_size > 0 && vehicle.clip_size > 0 => vehicle.clip_size,
        Some(ammo) => ammo.clip_size,
        None => vehicle.clip_size,
    }
}

impl DestinationLimits {
    /// Units of `size` that still fit in the receiving stores.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn stores_room(&self, totals: &Totals, size: f64) -> i32 {
        if size <= 0.0 {
            return i32::MAX;
        }
        let free = self.free_stores - totals.dest_volume;
        if free <= 0.0 {
            return 0;
        }
        // f64 -> i32 casts saturate
        ((free + crate::savegame::STORES_TOLERANCE) / size).floor() as i32
    }

    /// Personnel that still fit in the receiving quarters.
    #[must_use]
    pub const fn quarters_room(&self, totals: &Totals) -> i32 {
        self.free_quarters - totals.dest_personnel
    }

    /// Crafts that still fit in the receiving hangars.
    #[must_use]
    pub const fn hangar_room(&self, totals: &Totals) -> i32 {
        self.free_hangars - totals.dest_crafts
    }
}
