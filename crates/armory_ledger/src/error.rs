//! # Ledger Error Types
//!
//! All hard failures the ledger can report. Capacity clamps and
//! warnings are not errors; see [`crate::transfer::TransferWarning`].

use thiserror::Error;

use crate::catalog::ItemId;
use crate::savegame::{BaseId, CraftId, SoldierId};

/// Errors that can occur while building, changing or committing a ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Item type not found in the catalog.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// Craft rule or craft entity not found.
    #[error("craft not found: {0}")]
    CraftNotFound(CraftId),

    /// Craft rule type not found in the catalog.
    #[error("craft rule not found: {0}")]
    CraftRuleNotFound(String),

    /// Base not found in the savegame.
    #[error("base not found: {0}")]
    BaseNotFound(BaseId),

    /// Soldier not found on the base.
    #[error("soldier not found: {0}")]
    SoldierNotFound(SoldierId),

    /// Row index does not address a ledger row.
    #[error("row {index} out of range ({len} rows)")]
    RowOutOfRange {
        /// Requested row.
        index: usize,
        /// Number of rows in the ledger.
        len: usize,
    },

    /// A container held less than the requested amount.
    #[error("insufficient quantity: need {required} of item {item_id}, have {available}")]
    InsufficientQuantity {
        /// The item that was short.
        item_id: ItemId,
        /// The amount required.
        required: u32,
        /// The amount available.
        available: u32,
    },

    /// Backing storage no longer matches the snapshot the ledger was built from.
    #[error("ledger is stale: {reason}")]
    StaleLedger {
        /// What did not match.
        reason: String,
    },

    /// Invalid ruleset file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
