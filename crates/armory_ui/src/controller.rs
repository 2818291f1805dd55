//! # Screen Controller
//!
//! Turns list input into ledger change requests and keeps the list and
//! header in step with the ledger.
//!
//! - Left click on an arrow moves one unit.
//! - Right click moves as much as possible.
//! - Holding the left button repeats single moves on the repeat timer.
//! - The wheel over the arrow column moves the configured step.
//!
//! Any warning stops both timers, so a held button never keeps pushing
//! against a clamp.

use std::time::Duration;

use armory_ledger::{
    Catalog, Category, CommitReport, Direction, Ledger, LedgerError, LedgerResult, SavedGame,
    TransferWarning, MAX_CHANGE,
};
use tracing::{debug, warn};

use crate::input::{Arrow, ArrowBinding, ListEvent, MouseButton};
use crate::surface::{RowListSurface, WarningSurface};
use crate::timer::{RepeatConfig, RepeatTimer};

/// Message shown when confirming would overfill the stores.
pub const STORES_FULL: &str = "not enough store space";
/// Message shown when leaving a screen that opened over full stores.
pub const MUST_RESOLVE_STORES: &str = "stores are over capacity, remove items before leaving";

/// One open equipment, sell or transfer screen.
#[derive(Debug)]
pub struct ScreenController<L, W> {
    ledger: Ledger,
    list: L,
    warnings: W,
    binding: ArrowBinding,
    left_timer: RepeatTimer,
    right_timer: RepeatTimer,
    /// Visible row under the cursor.
    selected: Option<usize>,
    category: Category,
    /// Visible row to ledger row.
    visible: Vec<usize>,
    wheel_step: i32,
}

impl<L: RowListSurface, W: WarningSurface> ScreenController<L, W> {
    /// Opens a screen over a freshly built ledger and draws it.
    #[must_use]
    pub fn new(ledger: Ledger, list: L, warnings: W, repeat: RepeatConfig) -> Self {
        let binding = ArrowBinding::for_mode(&ledger.mode());
        let wheel_step = ledger.options().mouse_wheel_step;
        let visible = ledger.visible_rows(Category::All);
        let mut controller = Self {
            ledger,
            list,
            warnings,
            binding,
            left_timer: RepeatTimer::new(repeat),
            right_timer: RepeatTimer::new(repeat),
            selected: None,
            category: Category::All,
            visible,
            wheel_step,
        };
        controller.redraw();
        controller
    }

    /// The ledger being edited.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The row list.
    #[must_use]
    pub const fn list(&self) -> &L {
        &self.list
    }

    /// The warning surface.
    #[must_use]
    pub const fn warnings(&self) -> &W {
        &self.warnings
    }

    /// Category currently listed.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Ledger rows in list order.
    #[must_use]
    pub fn visible_rows(&self) -> &[usize] {
        &self.visible
    }

    /// Visible row last pressed, clicked or scrolled.
    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether a held arrow is repeating.
    #[must_use]
    pub const fn is_repeating(&self) -> bool {
        self.left_timer.is_running() || self.right_timer.is_running()
    }

    /// Closes the screen, handing back its parts.
    pub fn into_parts(self) -> (Ledger, L, W) {
        (self.ledger, self.list, self.warnings)
    }

    /// Handles one list event.
    ///
    /// # Errors
    ///
    /// Returns `RowOutOfRange` if the event names a row that is not listed.
    pub fn handle(&mut self, event: ListEvent) -> LedgerResult<()> {
        match event {
            ListEvent::ArrowPress { row, arrow, button } => {
                self.select(row)?;
                if button == MouseButton::Left {
                    self.timer_mut(arrow).start();
                }
            }
            ListEvent::ArrowRelease { arrow, button } => {
                if button == MouseButton::Left {
                    self.timer_mut(arrow).stop();
                }
            }
            ListEvent::ArrowClick { row, arrow, button } => {
                self.select(row)?;
                let direction = self.binding.direction(arrow);
                match button {
                    MouseButton::Left => {
                        self.change(1, direction)?;
                        self.left_timer.reset_interval();
                        self.right_timer.reset_interval();
                    }
                    MouseButton::Right => {
                        self.change(MAX_CHANGE, direction)?;
                    }
                    MouseButton::Middle => {}
                }
            }
            ListEvent::Wheel {
                row,
                wheel,
                over_arrows,
            } => {
                self.select(row)?;
                self.stop_timers();
                if over_arrows {
                    self.change(self.wheel_step, wheel.direction())?;
                }
            }
        }
        Ok(())
    }

    /// Advances the repeat timers and moves one unit per fire.
    ///
    /// # Errors
    ///
    /// Returns `RowOutOfRange` if the selected row vanished.
    pub fn think(&mut self, delta: Duration) -> LedgerResult<()> {
        for arrow in [Arrow::Left, Arrow::Right] {
            let fires = self.timer_mut(arrow).tick(delta);
            let direction = self.binding.direction(arrow);
            for _ in 0..fires {
                if self.selected.is_none() || !self.timer_mut(arrow).is_running() {
                    break;
                }
                self.change(1, direction)?;
            }
        }
        Ok(())
    }

    /// Lists only rows of `category`.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.visible = self.ledger.visible_rows(category);
        self.selected = None;
        self.stop_timers();
        self.redraw();
    }

    /// Moves everything back from the destination.
    pub fn clear(&mut self) {
        self.stop_timers();
        let warnings = self.ledger.clear_destination();
        if let Some(first) = warnings.first() {
            self.warnings.show_warning(&first.to_string());
        }
        debug!(warnings = warnings.len(), "Destination cleared");
        self.redraw();
    }

    /// Commits the pending changes. Returns `None` when the stores would
    /// overflow; the player is told and nothing is committed.
    ///
    /// # Errors
    ///
    /// Propagates commit errors; the savegame is left untouched then.
    pub fn confirm(
        &mut self,
        game: &mut SavedGame,
        catalog: &Catalog,
    ) -> LedgerResult<Option<CommitReport>> {
        self.stop_timers();
        if !self.ledger.can_confirm() {
            self.warnings.show_warning(STORES_FULL);
            return Ok(None);
        }
        let report = self.ledger.commit(game, catalog)?;
        // the committed ledger is a fresh build; rows may have come or gone
        self.refilter();
        Ok(Some(report))
    }

    /// Discards pending changes. Returns false if the screen may not be
    /// left yet.
    pub fn cancel(&mut self) -> bool {
        self.stop_timers();
        if !self.ledger.can_cancel() {
            self.warnings.show_warning(MUST_RESOLVE_STORES);
            return false;
        }
        self.ledger.rollback();
        self.redraw();
        true
    }

    /// Rebuilds the ledger from the savegame, after returning from a
    /// nested screen that may have changed the stores. Pending changes
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns the build error if the base or craft is gone.
    pub fn rebuild(&mut self, game: &SavedGame, catalog: &Catalog) -> LedgerResult<()> {
        self.ledger = Ledger::build(
            game,
            self.ledger.base(),
            self.ledger.mode(),
            catalog,
            self.ledger.origin(),
        )?;
        self.refilter();
        Ok(())
    }

    fn refilter(&mut self) {
        if !self.ledger.categories().contains(&self.category) {
            self.category = Category::All;
        }
        self.set_category(self.category);
    }

    fn select(&mut self, row: usize) -> LedgerResult<usize> {
        let index = self
            .visible
            .get(row)
            .copied()
            .ok_or(LedgerError::RowOutOfRange {
                index: row,
                len: self.visible.len(),
            })?;
        self.selected = Some(row);
        Ok(index)
    }

    fn timer_mut(&mut self, arrow: Arrow) -> &mut RepeatTimer {
        match arrow {
            Arrow::Left => &mut self.left_timer,
            Arrow::Right => &mut self.right_timer,
        }
    }

    fn stop_timers(&mut self) {
        self.left_timer.stop();
        self.right_timer.stop();
    }

    fn change(&mut self, magnitude: i32, direction: Direction) -> LedgerResult<()> {
        let Some(row) = self.selected else {
            return Ok(());
        };
        let index = self.select(row)?;
        let outcome = self.ledger.request_change(index, magnitude, direction)?;

        if let Some(warning) = &outcome.warning {
            self.stop_timers();
            self.report(warning);
        }
        if outcome.is_noop() {
            return Ok(());
        }

        self.refresh_row(index);
        if outcome.cascaded != 0 {
            let ammo_row = self
                .ledger
                .row(index)?
                .vehicle
                .as_ref()
                .and_then(|link| self.ledger.row_for_item(link.ammo));
            if let Some(ammo_row) = ammo_row {
                self.refresh_row(ammo_row);
            }
        }
        self.list.set_header(&self.ledger.header());
        Ok(())
    }

    fn report(&mut self, warning: &TransferWarning) {
        warn!(%warning, "Change clamped");
        self.warnings.show_warning(&warning.to_string());
    }

    fn refresh_row(&mut self, index: usize) {
        let Some(position) = self.visible.iter().position(|&visible| visible == index) else {
            return;
        };
        if let Ok(view) = self.ledger.view(index) {
            self.list.update_row(position, &view);
        }
    }

    fn redraw(&mut self) {
        self.list.clear_rows();
        for &index in &self.visible {
            if let Ok(view) = self.ledger.view(index) {
                self.list.add_row(&view);
            }
        }
        self.list.set_header(&self.ledger.header());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Wheel;
    use crate::surface::{Column, TextList, WarningLog};
    use armory_ledger::{Base, BattleType, Craft, CraftRule, ItemRule, LedgerMode, ScreenOrigin};

    fn catalog() -> Catalog {
        let mut rifle = ItemRule::new(1, "Rifle", BattleType::Firearm);
        rifle.size = 0.2;
        let mut clip = ItemRule::new(2, "Rifle Clip", BattleType::Ammo);
        clip.size = 0.1;
        let craft = CraftRule {
            id: "skyranger".to_string(),
            crew_space: 14,
            max_vehicles: 3,
            max_items: 12,
            sell_cost: 0,
            transfer_cost: 0,
            refuel_item: None,
        };
        Catalog::new(vec![rifle, clip], vec![craft]).unwrap()
    }

    fn game() -> SavedGame {
        let mut base = Base::new(1, "Cairo");
        base.storage.add(1, 30);
        base.storage.add(2, 40);
        base.crafts.push(Craft::new(1, "skyranger", "Skyranger-1"));
        SavedGame {
            funds: 0,
            bases: vec![base],
            ..SavedGame::default()
        }
    }

    fn controller() -> ScreenController<TextList, WarningLog> {
        let ledger = Ledger::build(
            &game(),
            1,
            LedgerMode::CraftEquipment { craft: 1 },
            &catalog(),
            ScreenOrigin::Geoscape,
        )
        .unwrap();
        ScreenController::new(ledger, TextList::new(), WarningLog::new(), RepeatConfig::default())
    }

    fn click(row: usize, arrow: Arrow, button: MouseButton) -> ListEvent {
        ListEvent::ArrowClick { row, arrow, button }
    }

    #[test]
    fn test_opens_with_all_rows_drawn() {
        let screen = controller();
        assert_eq!(screen.list().len(), 2);
        assert_eq!(screen.list().cell(0, Column::Name), Some("Rifle"));
        assert_eq!(screen.list().cell(1, Column::Name), Some("  Rifle Clip"));
        assert!(screen.list().header().is_some());
    }

    #[test]
    fn test_clicks_move_one_and_max() {
        let mut screen = controller();
        screen.handle(click(0, Arrow::Right, MouseButton::Left)).unwrap();
        assert_eq!(screen.ledger().rows()[0].pending, 1);
        assert_eq!(screen.list().cell(0, Column::Destination), Some("1"));

        screen.handle(click(0, Arrow::Right, MouseButton::Right)).unwrap();
        assert_eq!(screen.ledger().rows()[0].pending, 12);
        assert_eq!(screen.warnings().messages().len(), 1);

        screen.handle(click(0, Arrow::Left, MouseButton::Right)).unwrap();
        assert_eq!(screen.ledger().rows()[0].pending, 0);
    }

    #[test]
    fn test_wheel_only_over_arrows() {
        let mut screen = controller();
        let wheel = |over_arrows| ListEvent::Wheel {
            row: 1,
            wheel: Wheel::Up,
            over_arrows,
        };
        screen.handle(wheel(false)).unwrap();
        assert_eq!(screen.ledger().rows()[1].pending, 0);
        screen.handle(wheel(true)).unwrap();
        assert_eq!(screen.ledger().rows()[1].pending, 10);
    }

    #[test]
    fn test_bad_row_is_an_error() {
        let mut screen = controller();
        let err = screen
            .handle(click(5, Arrow::Right, MouseButton::Left))
            .unwrap_err();
        assert_eq!(err, LedgerError::RowOutOfRange { index: 5, len: 2 });
    }

    #[test]
    fn test_category_filter() {
        let mut screen = controller();
        screen.set_category(Category::Components);
        assert!(screen.list().is_empty());
        screen.set_category(Category::Equipment);
        assert_eq!(screen.visible_rows(), &[0, 1]);
    }
}
