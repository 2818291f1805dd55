//! # Ledger Rows
//!
//! One row per transactable type. A row snapshots the quantities of both
//! sides when the screen opens and then only accumulates a pending delta.
//!
//! Sign convention: a positive `pending` moves units toward the
//! destination (craft, market or receiving base).

use crate::catalog::ItemId;
use crate::savegame::{CraftId, SoldierId};

/// Sentinel magnitude meaning "as much as possible".
pub const MAX_CHANGE: i32 = i32::MAX;

/// What a row stands for. Payloads are handles, never owned entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// A named soldier.
    Soldier(SoldierId),
    /// A named craft.
    Craft(CraftId),
    /// Scientists as a headcount.
    Scientist,
    /// Engineers as a headcount.
    Engineer,
    /// Stock of an item type.
    Item(ItemId),
    /// Vehicles of an item type.
    Vehicle(ItemId),
}

impl RowKind {
    /// Item type behind an item or vehicle row.
    #[must_use]
    pub const fn item(self) -> Option<ItemId> {
        match self {
            Self::Item(id) | Self::Vehicle(id) => Some(id),
            _ => None,
        }
    }

    /// Returns true for soldiers, scientists and engineers.
    #[must_use]
    pub const fn is_personnel(self) -> bool {
        matches!(self, Self::Soldier(_) | Self::Scientist | Self::Engineer)
    }
}

/// Listing category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Every row.
    All,
    /// Soldiers, scientists and engineers.
    Personnel,
    /// Crafts and craft weapon parts.
    CraftArmament,
    /// Corpses and live aliens.
    Aliens,
    /// Battlefield equipment and armour.
    Equipment,
    /// Everything else.
    Components,
}

/// Which way a change moves units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the destination back to the source.
    ToSource,
    /// From the source to the destination.
    ToDestination,
}

impl Direction {
    /// +1 toward the destination, -1 toward the source.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::ToSource => -1,
            Self::ToDestination => 1,
        }
    }

    /// The other direction.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::ToSource => Self::ToDestination,
            Self::ToDestination => Self::ToSource,
        }
    }
}

/// How a vehicle row pulls its ammo along.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VehicleLink {
    /// Ammo item type.
    pub ammo: ItemId,
    /// Ammo display name, for warnings.
    pub ammo_name: String,
    /// Clips moved with each vehicle. Zero or less means no cascade.
    pub clips_per_vehicle: i32,
    /// Rounds a newly boarded vehicle carries.
    pub loaded_ammo: i32,
}

/// One transactable type tracked for the lifetime of a screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// What the row stands for.
    pub kind: RowKind,
    /// Display name.
    pub name: String,
    /// Price per unit (sale or transfer), zero where money is not involved.
    pub unit_cost: i64,
    /// Units on the source side when the screen opened.
    pub source_qty: i32,
    /// Units on the destination side when the screen opened.
    pub dest_qty: i32,
    /// Units on the source side committed elsewhere.
    pub reserved_src: i32,
    /// Units on the destination side committed elsewhere (vehicle ammo).
    pub reserved_dest: i32,
    /// Units already travelling in a separate transfer.
    pub in_transfer_qty: i32,
    /// Units claimed by crew equipment layouts. Display only.
    pub claimed_qty: Option<i32>,
    /// Uncommitted signed change.
    pub pending: i32,
    /// Part of `pending` that is vehicle ammo moved by a cascade.
    pub pending_reserved: i32,
    /// Capacity charged per unit moved toward the destination.
    pub capacity_weight: f64,
    /// Reserved units may not be moved by the player.
    pub protect_reserved: bool,
    /// Destination units can be moved back (false on the market).
    pub dest_is_movable: bool,
    /// Rendered in the ammo colour.
    pub ammo: bool,
    /// Listing category.
    pub category: Category,
    /// Ammo cascade for vehicles that need it.
    pub vehicle: Option<VehicleLink>,
}

impl Row {
    /// Creates a row with the given quantities and every other field neutral.
    #[must_use]
    pub fn new(kind: RowKind, name: impl Into<String>, source_qty: i32, dest_qty: i32) -> Self {
        Self {
            kind,
            name: name.into(),
            unit_cost: 0,
            source_qty,
            dest_qty,
            reserved_src: 0,
            reserved_dest: 0,
            in_transfer_qty: 0,
            claimed_qty: None,
            pending: 0,
            pending_reserved: 0,
            capacity_weight: 0.0,
            protect_reserved: true,
            dest_is_movable: true,
            ammo: false,
            category: Category::Equipment,
            vehicle: None,
        }
    }

    /// Units the player may still move in `direction`.
    #[must_use]
    pub fn available(&self, direction: Direction) -> i32 {
        let left = match direction {
            Direction::ToDestination => {
                let protected = if self.protect_reserved { self.reserved_src } else { 0 };
                self.source_qty - protected - self.pending
            }
            Direction::ToSource if self.dest_is_movable => {
                let protected = if self.protect_reserved {
                    self.reserved_dest + self.pending_reserved
                } else {
                    0
                };
                self.dest_qty + self.pending - protected
            }
            Direction::ToSource => self.pending,
        };
        left.max(0)
    }

    /// Units shown on the source side.
    #[inline]
    #[must_use]
    pub const fn source_after(&self) -> i32 {
        self.source_qty - self.pending
    }

    /// Units shown on the destination side.
    #[inline]
    #[must_use]
    pub const fn dest_after(&self) -> i32 {
        self.dest_qty + self.pending
    }

    /// Returns true if the player has changed this row.
    #[inline]
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.pending != 0
    }

    /// Item type behind the row, if any.
    #[inline]
    #[must_use]
    pub const fn item(&self) -> Option<ItemId> {
        self.kind.item()
    }
}
