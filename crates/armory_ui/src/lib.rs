//! # ARMORY UI
//!
//! Input handling for the equipment, sell and transfer screens.
//!
//! ## Pipeline
//!
//! ```text
//! ListEvent ─▶ ScreenController ─▶ Ledger::request_change
//!                  │    ▲                    │
//!                  │    └── RepeatTimer      ▼
//!                  └──────▶ RowListSurface / WarningSurface
//! ```
//!
//! Widgets are out of scope: a toolkit implements the two surface traits.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod controller;
pub mod input;
pub mod surface;
pub mod timer;

pub use controller::{ScreenController, MUST_RESOLVE_STORES, STORES_FULL};
pub use input::{Arrow, ArrowBinding, ListEvent, MouseButton, Wheel};
pub use surface::{Column, RowListSurface, TextList, WarningLog, WarningSurface};
pub use timer::{RepeatConfig, RepeatTimer, TimerState};
