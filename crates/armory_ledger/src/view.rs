//! # Display Fields
//!
//! Text and colour for each row and the screen header, derived from
//! ledger state on demand. Nothing here is cached.

use crate::error::LedgerResult;
use crate::ledger::{Ledger, LedgerMode};
use crate::row::Row;

/// Colour class of a listed row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowColor {
    /// Default list colour.
    Neutral,
    /// The row has (or is getting) units on the destination side.
    Changed,
    /// Untouched ammunition.
    Ammo,
}

/// Rendered cells of one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView {
    /// Name, indented for ammo.
    pub name: String,
    /// Units left on the source side.
    pub source: String,
    /// Units on the destination side.
    pub dest: String,
    /// Pending amount. Blank when zero on the alternate layout.
    pub pending: String,
    /// Reserved units as `(n)`, blank when none.
    pub reserved: String,
    /// Crew claims compared with the craft quantity: `> n`, `< n` or `  n`.
    pub claimed: String,
    /// Colour class.
    pub color: RowColor,
}

/// Derived values shown above the list.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerHeader {
    /// Crew space still free on the craft.
    pub space_available: i32,
    /// Crew space used on the craft.
    pub space_used: i32,
    /// Vehicles aboard and slots, as `n:max`.
    pub vehicle_usage: String,
    /// Soldiers aboard.
    pub crew: i32,
    /// Loose items aboard, as `n` or `n:max`.
    pub craft_items: String,
    /// Funds before the pending change.
    pub funds: i64,
    /// Money the pending change gains (positive) or costs (negative).
    pub pending_funds: i64,
    /// Funds line, `$1,000 (+$500)` when gaining.
    pub funds_text: String,
    /// Stores line, `used(+delta):capacity`.
    pub storage: String,
}

/// Formats money with thousands separators.
#[must_use]
pub fn format_funds(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if amount < 0 {
        grouped.push('-');
    }
    grouped.push('$');
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn format_volume(volume: f64) -> String {
    let text = format!("{volume:.1}");
    text.strip_suffix(".0").map_or(text.clone(), str::to_string)
}

fn claim_text(aboard: i32, claimed: i32) -> String {
    match aboard.cmp(&claimed) {
        std::cmp::Ordering::Greater => format!("> {claimed}"),
        std::cmp::Ordering::Less => format!("< {claimed}"),
        std::cmp::Ordering::Equal => format!("  {claimed}"),
    }
}

impl Ledger {
    /// Renders one row.
    ///
    /// # Errors
    ///
    /// Returns `RowOutOfRange` for a bad index.
    pub fn view(&self, index: usize) -> LedgerResult<RowView> {
        let row = self.row(index)?;
        Ok(self.render(row))
    }

    fn render(&self, row: &Row) -> RowView {
        let alternate = self.options.alternate_screen;
        let craft_mode = matches!(self.mode, LedgerMode::CraftEquipment { .. });

        let name = if row.ammo {
            format!("  {}", row.name)
        } else {
            row.name.clone()
        };

        let pending = if alternate && row.pending == 0 {
            String::new()
        } else {
            row.pending.to_string()
        };

        let reserved_units = if craft_mode {
            row.reserved_dest + row.pending_reserved
        } else {
            row.reserved_src
        };
        let reserved = if alternate && reserved_units != 0 {
            format!("({reserved_units})")
        } else {
            String::new()
        };

        let claimed = match row.claimed_qty {
            Some(claimed) if alternate => claim_text(row.dest_after(), claimed),
            _ => String::new(),
        };

        let color = if craft_mode {
            if row.dest_after() > 0 {
                RowColor::Changed
            } else if row.ammo {
                RowColor::Ammo
            } else {
                RowColor::Neutral
            }
        } else if row.pending > 0 {
            RowColor::Changed
        } else if row.ammo {
            RowColor::Ammo
        } else {
            RowColor::Neutral
        };

        RowView {
            name,
            source: row.source_after().to_string(),
            dest: row.dest_after().to_string(),
            pending,
            reserved,
            claimed,
            color,
        }
    }

    /// Renders the header values.
    #[must_use]
    pub fn header(&self) -> LedgerHeader {
        let totals = &self.totals;
        let limits = &self.craft_limits;

        let craft_items = if limits.max_items > 0 {
            format!("{}:{}", totals.craft_items, limits.max_items)
        } else {
            totals.craft_items.to_string()
        };

        let mut funds_text = format_funds(self.funds);
        if totals.funds_delta > 0 {
            funds_text.push_str(&format!(" (+{})", format_funds(totals.funds_delta)));
        }

        let mut storage = format_volume(self.used_stores);
        if totals.storage_delta.abs() > crate::savegame::STORES_TOLERANCE {
            let sign = if totals.storage_delta > 0.0 { "+" } else { "" };
            storage.push_str(&format!("({sign}{:.1})", totals.storage_delta));
        }
        storage.push(':');
        storage.push_str(&format_volume(self.stores_capacity));

        LedgerHeader {
            space_available: crate::capacity::available_crew_space(limits, totals),
            space_used: totals.craft_space_used,
            vehicle_usage: format!("{}:{}", totals.craft_vehicles, limits.max_vehicles),
            crew: totals.crew,
            craft_items,
            funds: self.funds,
            pending_funds: totals.funds_delta,
            funds_text,
            storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_funds() {
        assert_eq!(format_funds(0), "$0");
        assert_eq!(format_funds(999), "$999");
        assert_eq!(format_funds(1000), "$1,000");
        assert_eq!(format_funds(1_234_567), "$1,234,567");
        assert_eq!(format_funds(-50_000), "-$50,000");
    }

    #[test]
    fn test_claim_text() {
        assert_eq!(claim_text(3, 2), "> 2");
        assert_eq!(claim_text(1, 2), "< 2");
        assert_eq!(claim_text(2, 2), "  2");
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(7.0), "7");
        assert_eq!(format_volume(0.1 + 0.2), "0.3");
    }
}
