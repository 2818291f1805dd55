//! # ARMORY Battle
//!
//! Battlescape inventory support:
//! - Slot classes and move costs loaded from TOML
//! - Drag previews for time units, weight and accuracy
//! - Item stats for the item under the cursor
//! - Loadout templates rebuilt from items on the ground
//!
//! Item rules are shared with the base screens through
//! [`armory_ledger::Catalog`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod preview;
pub mod slots;
pub mod template;
pub mod unit;

pub use error::{BattleError, BattleResult};
pub use preview::{
    Hover, InventoryPreview, ItemStats, PlacementPreview, Rounds, WeightPreview, LOAD_COST,
    UNLIMITED_ROUNDS, UNLOAD_COST,
};
pub use slots::{SlotKind, SlotRule, SlotTable, GROUND, LEFT_HAND, RIGHT_HAND};
pub use template::{clear, ApplyReport, LayoutEntry, LoadoutTemplate};
pub use unit::{BattleItem, BattleUnit, MedikitCharges, UnitStats, Wounds};
