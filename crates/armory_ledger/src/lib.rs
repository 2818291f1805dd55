//! # ARMORY Ledger
//!
//! Quantity reconciliation for the base equipment screens: craft
//! loadout, selling, and base-to-base transfers.
//!
//! ## Design Principles
//!
//! 1. **Preview before commit** - a screen edits pending deltas only; the savegame is untouched until confirm
//! 2. **Clamp, never fail** - capacity and ammo limits shrink a change and at most raise a warning
//! 3. **Linked rows move together** - a vehicle drags its ammo clips along in the same call
//! 4. **External configuration** - item and craft rules live in TOML files
//!
//! ## Example
//!
//! ```rust,ignore
//! use armory_ledger::{Catalog, Direction, Ledger, LedgerMode, ScreenOrigin, MAX_CHANGE};
//!
//! let catalog = Catalog::from_toml_file("data/ruleset.toml")?;
//! let mut ledger = Ledger::build(
//!     &game,
//!     base_id,
//!     LedgerMode::CraftEquipment { craft: craft_id },
//!     &catalog,
//!     ScreenOrigin::Geoscape,
//! )?;
//!
//! let outcome = ledger.request_change(row, MAX_CHANGE, Direction::ToDestination)?;
//! if let Some(warning) = outcome.warning {
//!     show(warning);
//! }
//! ledger.commit(&mut game, &catalog)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod capacity;
pub mod catalog;
pub mod commit;
pub mod container;
pub mod error;
pub mod ledger;
pub mod row;
pub mod savegame;
pub mod transfer;
pub mod view;

pub use capacity::{CraftLimits, DestinationLimits, Totals};
pub use catalog::{BattleType, Catalog, CraftRule, ItemId, ItemRule, LedgerOptions};
pub use commit::CommitReport;
pub use container::ItemContainer;
pub use error::{LedgerError, LedgerResult};
pub use ledger::{build_rows, item_category, Ledger, LedgerMode, ScreenOrigin};
pub use row::{Category, Direction, Row, RowKind, VehicleLink, MAX_CHANGE};
pub use savegame::{
    Base, BaseId, Craft, CraftId, CraftStatus, CraftWeapon, SavedGame, Soldier, SoldierId,
    Transfer, TransferCargo, Vehicle,
};
pub use transfer::{ChangeOutcome, TransferWarning};
pub use view::{format_funds, LedgerHeader, RowColor, RowView};
