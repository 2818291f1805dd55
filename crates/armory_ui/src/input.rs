//! Input events from an equipment list.
//!
//! Each list row has a left and a right arrow. What an arrow means depends
//! on the screen: on the craft screen the arrows point at the two sides,
//! on the trade screens the left arrow adds to the deal.

use armory_ledger::{Direction, LedgerMode};

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
}

/// One of the two arrows on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arrow {
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
}

/// Mouse wheel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wheel {
    /// Scrolled away from the player.
    Up,
    /// Scrolled toward the player.
    Down,
}

/// An input event on the list. `row` is the position in the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    /// Button pressed on an arrow.
    ArrowPress {
        /// Visible row.
        row: usize,
        /// Arrow pressed.
        arrow: Arrow,
        /// Button used.
        button: MouseButton,
    },
    /// Button released on an arrow.
    ArrowRelease {
        /// Arrow released.
        arrow: Arrow,
        /// Button used.
        button: MouseButton,
    },
    /// Full click on an arrow.
    ArrowClick {
        /// Visible row.
        row: usize,
        /// Arrow clicked.
        arrow: Arrow,
        /// Button used.
        button: MouseButton,
    },
    /// Wheel turned over a row.
    Wheel {
        /// Visible row.
        row: usize,
        /// Wheel direction.
        wheel: Wheel,
        /// Cursor is over the arrow column.
        over_arrows: bool,
    },
}

/// How arrows map to ledger directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowBinding {
    /// Left arrow toward base stores, right arrow toward the craft.
    Equipment,
    /// Left arrow adds to the deal, right arrow takes away.
    Trade,
}

impl ArrowBinding {
    /// Binding used by a ledger mode.
    #[must_use]
    pub const fn for_mode(mode: &LedgerMode) -> Self {
        match mode {
            LedgerMode::CraftEquipment { .. } => Self::Equipment,
            LedgerMode::Sell | LedgerMode::Transfer { .. } => Self::Trade,
        }
    }

    /// Direction an arrow moves items in.
    #[must_use]
    pub const fn direction(self, arrow: Arrow) -> Direction {
        match (self, arrow) {
            (Self::Equipment, Arrow::Left) | (Self::Trade, Arrow::Right) => Direction::ToSource,
            (Self::Equipment, Arrow::Right) | (Self::Trade, Arrow::Left) => {
                Direction::ToDestination
            }
        }
    }
}

impl Wheel {
    /// Direction the wheel moves items in. Up always adds to the destination.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Up => Direction::ToDestination,
            Self::Down => Direction::ToSource,
        }
    }
}
