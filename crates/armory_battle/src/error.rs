//! # Battle Error Types

use armory_ledger::ItemId;
use thiserror::Error;

/// Errors raised by inventory previews and loadout templates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// Item type not found in the catalog.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// Slot class not found in the slot table.
    #[error("slot not found: {0}")]
    SlotNotFound(String),

    /// Invalid slot table file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for battle inventory operations.
pub type BattleResult<T> = Result<T, BattleError>;
