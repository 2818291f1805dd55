//! # Item Containers
//!
//! Quantity-per-type storage used by base stores and craft holds.
//!
//! Entries with a zero count are never kept, so iteration only yields
//! item types that are actually present.

use std::collections::BTreeMap;

use crate::catalog::ItemId;
use crate::error::{LedgerError, LedgerResult};

/// Quantities of item types held by one store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemContainer {
    counts: BTreeMap<ItemId, u32>,
}

impl ItemContainer {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the quantity of an item type.
    #[inline]
    #[must_use]
    pub fn quantity(&self, item_id: ItemId) -> u32 {
        self.counts.get(&item_id).copied().unwrap_or(0)
    }

    /// Returns true if the container holds any of the item type.
    #[inline]
    #[must_use]
    pub fn contains(&self, item_id: ItemId) -> bool {
        self.counts.contains_key(&item_id)
    }

    /// Adds items. Saturates rather than wrapping.
    pub fn add(&mut self, item_id: ItemId, count: u32) {
        if count == 0 {
            return;
        }
        let entry = self.counts.entry(item_id).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Removes exactly `count` items.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientQuantity` and leaves the container untouched
    /// if fewer than `count` are held.
    pub fn remove(&mut self, item_id: ItemId, count: u32) -> LedgerResult<()> {
        let available = self.quantity(item_id);
        if available < count {
            return Err(LedgerError::InsufficientQuantity {
                item_id,
                required: count,
                available,
            });
        }
        self.set(item_id, available - count);
        Ok(())
    }

    /// Removes as many as possible, up to `count`. Returns the number removed.
    pub fn remove_up_to(&mut self, item_id: ItemId, count: u32) -> u32 {
        let available = self.quantity(item_id);
        let taken = available.min(count);
        self.set(item_id, available - taken);
        taken
    }

    /// Sets the quantity of an item type.
    pub fn set(&mut self, item_id: ItemId, count: u32) {
        if count == 0 {
            self.counts.remove(&item_id);
        } else {
            self.counts.insert(item_id, count);
        }
    }

    /// Total number of items across all types.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&count| u64::from(count)).sum()
    }

    /// Returns true if the container holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(item, quantity)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }

    /// Moves everything into another container.
    pub fn drain_into(&mut self, other: &mut Self) {
        for (item_id, count) in std::mem::take(&mut self.counts) {
            other.add(item_id, count);
        }
    }

    /// Takes a snapshot for rollback.
    #[must_use]
    pub fn snapshot(&self) -> ItemContainerSnapshot {
        ItemContainerSnapshot {
            counts: self.counts.clone(),
        }
    }

    /// Restores from a snapshot.
    pub fn restore(&mut self, snapshot: ItemContainerSnapshot) {
        self.counts = snapshot.counts;
    }
}

impl FromIterator<(ItemId, u32)> for ItemContainer {
    fn from_iter<T: IntoIterator<Item = (ItemId, u32)>>(iter: T) -> Self {
        let mut container = Self::new();
        for (item_id, count) in iter {
            container.add(item_id, count);
        }
        container
    }
}

/// Saved container contents.
#[derive(Clone, Debug)]
pub struct ItemContainerSnapshot {
    counts: BTreeMap<ItemId, u32>,
}
