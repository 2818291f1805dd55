//! # ARMORY
//!
//! Equipment handling for a base-building strategy game.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                            ARMORY                             │
//! ├───────────────────────────────────────────────────────────────┤
//! │                                                               │
//! │  ┌─────────────────┐        ┌─────────────────┐               │
//! │  │  armory_ui      │───────>│  armory_ledger  │               │
//! │  │                 │        │                 │               │
//! │  │  • Repeat timer │        │  • Catalog      │               │
//! │  │  • List events  │        │  • Rows/deltas  │               │
//! │  │  • Controller   │        │  • Commit       │               │
//! │  └─────────────────┘        └────────┬────────┘               │
//! │                                      │                        │
//! │                             ┌────────┴────────┐               │
//! │                             │  armory_battle  │               │
//! │                             │                 │               │
//! │                             │  • Slots        │               │
//! │                             │  • Previews     │               │
//! │                             │  • Templates    │               │
//! │                             └─────────────────┘               │
//! │                                                               │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data
//!
//! - [`RULESET`]: items, crafts and player options
//! - [`SLOTS`]: battlescape inventory slots and move costs

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub use armory_battle as battle;
pub use armory_ledger as ledger;
pub use armory_ui as ui;

pub use armory_battle::{BattleUnit, InventoryPreview, LoadoutTemplate, SlotTable};
pub use armory_ledger::{Catalog, Ledger, LedgerMode, SavedGame, ScreenOrigin};
pub use armory_ui::{ListEvent, RepeatConfig, ScreenController, TextList, WarningLog};

/// The shipped ruleset.
pub const RULESET: &str = include_str!("../data/ruleset.toml");

/// The shipped battlescape slot table.
pub const SLOTS: &str = include_str!("../data/slots.toml");

/// Parses the shipped ruleset.
///
/// # Errors
///
/// Returns `LedgerError::InvalidConfig` if the bundled file is malformed.
pub fn shipped_catalog() -> ledger::LedgerResult<Catalog> {
    Catalog::from_toml_str(RULESET)
}

/// Parses the shipped slot table.
///
/// # Errors
///
/// Returns `BattleError::InvalidConfig` if the bundled file is malformed.
pub fn shipped_slots() -> battle::BattleResult<SlotTable> {
    SlotTable::from_toml_str(SLOTS)
}
