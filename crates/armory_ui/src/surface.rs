//! # Presentation Surfaces
//!
//! What the controller needs from a widget toolkit: a row list with
//! editable cells and a place to show warnings. The text implementations
//! keep everything in memory for headless runs and tests.

use armory_ledger::{LedgerHeader, RowColor, RowView};

/// A list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Item name.
    Name,
    /// Quantity on the source side.
    Source,
    /// Quantity on the destination side.
    Destination,
    /// Pending amount.
    Pending,
    /// Reserved annotation.
    Reserved,
    /// Crew claim annotation.
    Claimed,
}

impl Column {
    /// All columns, left to right.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Source,
        Self::Destination,
        Self::Pending,
        Self::Reserved,
        Self::Claimed,
    ];

    const fn position(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Source => 1,
            Self::Destination => 2,
            Self::Pending => 3,
            Self::Reserved => 4,
            Self::Claimed => 5,
        }
    }

    /// Cell text of this column in a rendered row.
    #[must_use]
    pub fn text(self, view: &RowView) -> &str {
        match self {
            Self::Name => &view.name,
            Self::Source => &view.source,
            Self::Destination => &view.dest,
            Self::Pending => &view.pending,
            Self::Reserved => &view.reserved,
            Self::Claimed => &view.claimed,
        }
    }
}

/// An addressable row list.
pub trait RowListSurface {
    /// Removes every row.
    fn clear_rows(&mut self);

    /// Appends a row.
    fn add_row(&mut self, view: &RowView);

    /// Replaces the text of one cell.
    fn set_cell_text(&mut self, row: usize, column: Column, text: &str);

    /// Replaces the colour of one row.
    fn set_row_color(&mut self, row: usize, color: RowColor);

    /// Replaces the header above the list.
    fn set_header(&mut self, header: &LedgerHeader);

    /// Rewrites every cell of a row.
    fn update_row(&mut self, row: usize, view: &RowView) {
        for column in Column::ALL {
            self.set_cell_text(row, column, column.text(view));
        }
        self.set_row_color(row, view.color);
    }
}

/// A modal message box.
pub trait WarningSurface {
    /// Shows a message.
    fn show_warning(&mut self, message: &str);
}

/// In-memory list.
#[derive(Debug, Clone, Default)]
pub struct TextList {
    rows: Vec<([String; 6], RowColor)>,
    header: Option<LedgerHeader>,
}

impl TextList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text of a cell, if the row exists.
    #[must_use]
    pub fn cell(&self, row: usize, column: Column) -> Option<&str> {
        self.rows
            .get(row)
            .map(|(cells, _)| cells[column.position()].as_str())
    }

    /// Colour of a row, if it exists.
    #[must_use]
    pub fn color(&self, row: usize) -> Option<RowColor> {
        self.rows.get(row).map(|(_, color)| *color)
    }

    /// Last header shown.
    #[must_use]
    pub fn header(&self) -> Option<&LedgerHeader> {
        self.header.as_ref()
    }

    /// One line per row, cells separated by ` | `.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(|(cells, _)| cells.join(" | ")).collect()
    }
}

impl RowListSurface for TextList {
    fn clear_rows(&mut self) {
        self.rows.clear();
    }

    fn add_row(&mut self, view: &RowView) {
        let cells = Column::ALL.map(|column| column.text(view).to_string());
        self.rows.push((cells, view.color));
    }

    fn set_cell_text(&mut self, row: usize, column: Column, text: &str) {
        if let Some((cells, _)) = self.rows.get_mut(row) {
            text.clone_into(&mut cells[column.position()]);
        }
    }

    fn set_row_color(&mut self, row: usize, color: RowColor) {
        if let Some((_, current)) = self.rows.get_mut(row) {
            *current = color;
        }
    }

    fn set_header(&mut self, header: &LedgerHeader) {
        self.header = Some(header.clone());
    }
}

/// Warning surface that records every message.
#[derive(Debug, Clone, Default)]
pub struct WarningLog {
    messages: Vec<String>,
}

impl WarningLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages shown so far.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl WarningSurface for WarningLog {
    fn show_warning(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(name: &str) -> RowView {
        RowView {
            name: name.to_string(),
            source: "10".to_string(),
            dest: "0".to_string(),
            pending: "0".to_string(),
            reserved: String::new(),
            claimed: String::new(),
            color: RowColor::Neutral,
        }
    }

    #[test]
    fn test_text_list_updates() {
        let mut list = TextList::new();
        list.add_row(&view("Rifle"));
        list.add_row(&view("Pistol"));
        assert_eq!(list.len(), 2);

        let mut moved = view("Pistol");
        moved.source = "7".to_string();
        moved.dest = "3".to_string();
        moved.color = RowColor::Changed;
        list.update_row(1, &moved);

        assert_eq!(list.cell(1, Column::Source), Some("7"));
        assert_eq!(list.cell(1, Column::Destination), Some("3"));
        assert_eq!(list.color(1), Some(RowColor::Changed));
        assert_eq!(list.cell(0, Column::Source), Some("10"));
        assert_eq!(list.lines()[0], "Rifle | 10 | 0 | 0 |  | ");
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut list = TextList::new();
        list.set_cell_text(3, Column::Name, "x");
        list.set_row_color(3, RowColor::Ammo);
        assert!(list.is_empty());
        assert_eq!(list.cell(3, Column::Name), None);
    }

    #[test]
    fn test_warning_log() {
        let mut log = WarningLog::new();
        log.show_warning("no more equipment allowed");
        assert_eq!(log.messages(), ["no more equipment allowed"]);
    }
}
