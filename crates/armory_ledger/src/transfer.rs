//! # Transfer Engine
//!
//! Turns a requested move on one row into the largest consistent change:
//!
//! 1. Clamp to what the moving side still holds.
//! 2. Vehicles: clamp to free vehicle slots and crew space. When the craft
//!    already carries more than its limits allow, shed the excess instead.
//! 3. Vehicles that take ammo: pull `clips_per_vehicle` clips along per
//!    vehicle, clamping the vehicle count to the ammo available.
//! 4. Loose items: clamp to the craft's item cap.
//! 5. Base transfers: clamp to the receiving stores, quarters and hangars.
//!
//! Capacity clamps never fail. The caller gets the applied change and at
//! most one warning to show.

use std::fmt;

use tracing::{debug, warn};

use crate::capacity::{self, row_footprint};
use crate::catalog::ItemId;
use crate::error::LedgerResult;
use crate::ledger::{Ledger, LedgerMode};
use crate::row::{Direction, RowKind};

/// A clamp the player should be told about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferWarning {
    /// The craft's loose item cap was reached.
    NoMoreEquipmentAllowed {
        /// The cap.
        max_items: i32,
    },
    /// Not enough clips to arm the requested vehicles.
    NotEnoughAmmoToArm {
        /// Clips each vehicle needs.
        clips_per_vehicle: i32,
        /// Ammo display name.
        ammo: String,
    },
    /// The vehicle's ammo type is not listed on this screen.
    MissingAmmoRow {
        /// Vehicle display name.
        vehicle: String,
        /// Ammo type that has no row.
        ammo: ItemId,
    },
}

impl fmt::Display for TransferWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMoreEquipmentAllowed { max_items } => {
                write!(f, "no more equipment allowed on board (maximum {max_items})")
            }
            Self::NotEnoughAmmoToArm {
                clips_per_vehicle,
                ammo,
            } => write!(
                f,
                "not enough ammo to arm the HWP: {clips_per_vehicle} x {ammo} needed"
            ),
            Self::MissingAmmoRow { vehicle, ammo } => {
                write!(f, "{vehicle} cannot be armed: ammo {ammo} is not available")
            }
        }
    }
}

/// Result of one change request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeOutcome {
    /// Signed change applied to the row, positive toward the destination.
    pub applied: i32,
    /// Signed change applied to the linked ammo row.
    pub cascaded: i32,
    /// Clamp the player should be told about.
    pub warning: Option<TransferWarning>,
}

impl ChangeOutcome {
    fn warned(warning: TransferWarning) -> Self {
        Self {
            warning: Some(warning),
            ..Self::default()
        }
    }

    /// Returns true if nothing moved.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.applied == 0 && self.cascaded == 0
    }
}

impl Ledger {
    /// Requests moving up to `magnitude` units of row `index` in `direction`.
    ///
    /// Pass [`crate::MAX_CHANGE`] to move as much as possible. Zero or
    /// negative magnitudes are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RowOutOfRange` for a bad index. Capacity and ammo clamps are
    /// reported through [`ChangeOutcome::warning`], never as errors.
    pub fn request_change(
        &mut self,
        index: usize,
        magnitude: i32,
        direction: Direction,
    ) -> LedgerResult<ChangeOutcome> {
        let row = self.row(index)?;
        if magnitude <= 0 {
            return Ok(ChangeOutcome::default());
        }
        let kind = row.kind;
        let name = row.name.clone();
        let footprint = row_footprint(row);
        let size = row.capacity_weight;
        let available = row.available(direction);
        let link = row.vehicle.clone().filter(|l| l.clips_per_vehicle > 0);
        let craft_mode = matches!(self.mode, LedgerMode::CraftEquipment { .. });
        let is_vehicle = craft_mode && matches!(kind, RowKind::Vehicle(_));

        if is_vehicle && direction == Direction::ToDestination {
            let room = capacity::vehicle_room(&self.craft_limits, &self.totals, footprint);
            if room < 0 {
                return Ok(self.shed_vehicles(index, -room));
            }
        }

        let mut change = magnitude.min(available);
        if change <= 0 {
            return Ok(ChangeOutcome::default());
        }

        let mut warning = None;
        if is_vehicle {
            if direction == Direction::ToDestination {
                let room = capacity::vehicle_room(&self.craft_limits, &self.totals, footprint);
                change = change.min(room);
                if change <= 0 {
                    return Ok(ChangeOutcome::default());
                }
            }
            if let Some(link) = link {
                let Some(ammo_index) = self.row_for_item(link.ammo) else {
                    let missing = TransferWarning::MissingAmmoRow {
                        vehicle: name,
                        ammo: link.ammo,
                    };
                    warn!(row = index, %missing, "vehicle change abandoned");
                    return Ok(ChangeOutcome::warned(missing));
                };
                if direction == Direction::ToDestination {
                    let clips = self.rows[ammo_index].available(Direction::ToDestination);
                    let armed = clips / link.clips_per_vehicle;
                    if armed < change {
                        change = armed;
                        let clamp = TransferWarning::NotEnoughAmmoToArm {
                            clips_per_vehicle: link.clips_per_vehicle,
                            ammo: link.ammo_name.clone(),
                        };
                        warn!(row = index, %clamp, "vehicle change clamped");
                        warning = Some(clamp);
                    }
                    if change <= 0 {
                        return Ok(ChangeOutcome {
                            warning,
                            ..ChangeOutcome::default()
                        });
                    }
                }
                let delta = change * direction.sign();
                let cascaded = delta.saturating_mul(link.clips_per_vehicle);
                self.apply(index, delta, false);
                self.apply(ammo_index, cascaded, true);
                debug!(row = index, delta, ammo_row = ammo_index, cascaded, "vehicle moved");
                return Ok(ChangeOutcome {
                    applied: delta,
                    cascaded,
                    warning,
                });
            }
        } else if direction == Direction::ToDestination {
            match (self.mode, kind) {
                (LedgerMode::CraftEquipment { .. }, RowKind::Item(_)) => {
                    if let Some(left) =
                        capacity::remaining_item_cap(&self.craft_limits, &self.totals)
                    {
                        if change > left {
                            change = left.max(0);
                            let clamp = TransferWarning::NoMoreEquipmentAllowed {
                                max_items: self.craft_limits.max_items,
                            };
                            warn!(row = index, %clamp, "item change clamped");
                            warning = Some(clamp);
                        }
                    }
                }
                (LedgerMode::Transfer { .. }, _) => {
                    let room = match kind {
                        RowKind::Item(_) | RowKind::Vehicle(_) => {
                            self.dest_limits.stores_room(&self.totals, size)
                        }
                        RowKind::Craft(_) => self.dest_limits.hangar_room(&self.totals),
                        RowKind::Soldier(_) | RowKind::Scientist | RowKind::Engineer => {
                            self.dest_limits.quarters_room(&self.totals)
                        }
                    };
                    change = change.min(room.max(0));
                }
                _ => {}
            }
        }

        if change <= 0 {
            return Ok(ChangeOutcome {
                warning,
                ..ChangeOutcome::default()
            });
        }

        let delta = change * direction.sign();
        self.apply(index, delta, false);
        debug!(row = index, delta, pending = self.rows[index].pending, "row changed");
        Ok(ChangeOutcome {
            applied: delta,
            cascaded: 0,
            warning,
        })
    }

    /// Moves `count` vehicles of row `index` back off the craft, with their ammo.
    fn shed_vehicles(&mut self, index: usize, count: i32) -> ChangeOutcome {
        let row = &self.rows[index];
        let shed = count.min(row.available(Direction::ToSource));
        if shed <= 0 {
            return ChangeOutcome::default();
        }
        let link = row.vehicle.clone().filter(|l| l.clips_per_vehicle > 0);
        let delta = -shed;
        let mut cascaded = 0;
        if let Some(link) = link {
            let Some(ammo_index) = self.row_for_item(link.ammo) else {
                return ChangeOutcome::warned(TransferWarning::MissingAmmoRow {
                    vehicle: row.name.clone(),
                    ammo: link.ammo,
                });
            };
            cascaded = delta.saturating_mul(link.clips_per_vehicle);
            self.apply(ammo_index, cascaded, true);
        }
        self.apply(index, delta, false);
        warn!(row = index, shed, "craft over vehicle limits, excess vehicles returned");
        ChangeOutcome {
            applied: delta,
            cascaded,
            warning: None,
        }
    }

    /// Adds `delta` to a row's pending amount and updates the totals.
    fn apply(&mut self, index: usize, delta: i32, cascaded: bool) {
        let row = &mut self.rows[index];
        row.pending += delta;
        if cascaded {
            row.pending_reserved += delta;
        }
        self.totals.record(&self.mode, &self.rows[index], delta, cascaded);
    }

    /// Moves everything back from the destination, row by row. Returns the
    /// warnings produced on the way.
    pub fn clear_destination(&mut self) -> Vec<TransferWarning> {
        let mut warnings = Vec::new();
        for index in 0..self.rows.len() {
            if let Ok(outcome) = self.request_change(index, crate::MAX_CHANGE, Direction::ToSource) {
                warnings.extend(outcome.warning);
            }
        }
        warnings
    }

    /// Checks that the running totals match a full recount.
    #[must_use]
    pub fn totals_consistent(&self) -> bool {
        let recount = crate::capacity::Totals::tally(&self.mode, &self.baseline, &self.rows);
        let t = &self.totals;
        recount.craft_items == t.craft_items
            && recount.craft_vehicles == t.craft_vehicles
            && recount.craft_space_used == t.craft_space_used
            && recount.crew == t.crew
            && recount.funds_delta == t.funds_delta
            && recount.dest_personnel == t.dest_personnel
            && recount.dest_crafts == t.dest_crafts
            && (recount.storage_delta - t.storage_delta).abs() < 1e-6
            && (recount.dest_volume - t.dest_volume).abs() < 1e-6
    }
}
