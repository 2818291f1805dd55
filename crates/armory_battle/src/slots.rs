//! # Inventory Slots
//!
//! Slot classes a unit can put items into, and the time unit cost of
//! moving an item from one slot to another.
//!
//! ```toml
//! [[slots]]
//! id = "right_hand"
//! kind = "hand"
//! costs = { left_hand = 4, belt = 8, ground = 2 }
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{BattleError, BattleResult};

/// Slot id of the right hand.
pub const RIGHT_HAND: &str = "right_hand";
/// Slot id of the left hand.
pub const LEFT_HAND: &str = "left_hand";
/// Slot id of the ground under the unit.
pub const GROUND: &str = "ground";

/// Broad class of an inventory slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Carried on the body (belt, backpack, shoulders).
    #[default]
    Slot,
    /// Held in a hand.
    Hand,
    /// Lying on the ground.
    Ground,
}

/// One slot class and its outgoing move costs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SlotRule {
    /// Slot id.
    pub id: String,
    /// Slot class.
    #[serde(default)]
    pub kind: SlotKind,
    /// Time units to move an item from this slot to another, by target id.
    #[serde(default)]
    pub costs: HashMap<String, i32>,
}

impl SlotRule {
    /// Time units to move an item from this slot to `to`. Unlisted moves are free.
    #[must_use]
    pub fn cost(&self, to: &SlotRule) -> i32 {
        self.costs.get(&to.id).copied().unwrap_or(0)
    }

    /// Whether this slot is on the unit's body or in a hand.
    #[must_use]
    pub fn is_carried(&self) -> bool {
        self.kind != SlotKind::Ground
    }
}

#[derive(Deserialize)]
struct SlotFile {
    #[serde(default)]
    slots: Vec<SlotRule>,
}

/// All slot classes by id.
#[derive(Clone, Debug, Default)]
pub struct SlotTable {
    slots: HashMap<String, SlotRule>,
}

impl SlotTable {
    /// Builds a table from slot rules.
    ///
    /// # Errors
    ///
    /// Returns `BattleError::InvalidConfig` for duplicate ids or costs
    /// naming unknown slots.
    pub fn new(rules: Vec<SlotRule>) -> BattleResult<Self> {
        let mut slots = HashMap::with_capacity(rules.len());
        for rule in rules {
            let id = rule.id.clone();
            if slots.insert(id.clone(), rule).is_some() {
                return Err(BattleError::InvalidConfig(format!("slot {id} defined twice")));
            }
        }
        for rule in slots.values() {
            if let Some(target) = rule.costs.keys().find(|t| !slots.contains_key(*t)) {
                return Err(BattleError::InvalidConfig(format!(
                    "slot {} lists a cost to unknown slot {target}",
                    rule.id
                )));
            }
        }
        Ok(Self { slots })
    }

    /// Parses a TOML slot table.
    ///
    /// # Errors
    ///
    /// Returns `BattleError::InvalidConfig` if the document does not parse
    /// or fails validation.
    pub fn from_toml_str(source: &str) -> BattleResult<Self> {
        let file: SlotFile =
            toml::from_str(source).map_err(|e| BattleError::InvalidConfig(e.to_string()))?;
        Self::new(file.slots)
    }

    /// Looks up a slot.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SlotRule> {
        self.slots.get(id)
    }

    /// Looks up a slot that must exist.
    ///
    /// # Errors
    ///
    /// Returns `BattleError::SlotNotFound` if the id is unknown.
    pub fn require(&self, id: &str) -> BattleResult<&SlotRule> {
        self.get(id)
            .ok_or_else(|| BattleError::SlotNotFound(id.to_string()))
    }

    /// Time units to move an item between two slots.
    ///
    /// # Errors
    ///
    /// Returns `BattleError::SlotNotFound` if either id is unknown.
    pub fn cost(&self, from: &str, to: &str) -> BattleResult<i32> {
        Ok(self.require(from)?.cost(self.require(to)?))
    }

    /// Number of slot classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
        [[slots]]
        id = "right_hand"
        kind = "hand"
        costs = { left_hand = 4, belt = 8, ground = 2 }

        [[slots]]
        id = "left_hand"
        kind = "hand"
        costs = { right_hand = 4, ground = 2 }

        [[slots]]
        id = "belt"
        costs = { right_hand = 8 }

        [[slots]]
        id = "ground"
        kind = "ground"
        costs = { right_hand = 10 }
    "#;

    #[test]
    fn test_parse_and_cost() {
        let table = SlotTable::from_toml_str(TABLE).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.cost(RIGHT_HAND, "belt").unwrap(), 8);
        assert_eq!(table.cost(GROUND, RIGHT_HAND).unwrap(), 10);
        assert_eq!(table.cost("belt", GROUND).unwrap(), 0);
        assert_eq!(table.require("belt").unwrap().kind, SlotKind::Slot);
        assert!(!table.require(GROUND).unwrap().is_carried());
    }

    #[test]
    fn test_unknown_slot() {
        let table = SlotTable::from_toml_str(TABLE).unwrap();
        assert_eq!(
            table.cost("backpack", GROUND),
            Err(BattleError::SlotNotFound("backpack".to_string()))
        );
    }

    #[test]
    fn test_rejects_cost_to_unknown_slot() {
        let bad = r#"
            [[slots]]
            id = "belt"
            costs = { backpack = 3 }
        "#;
        assert!(matches!(
            SlotTable::from_toml_str(bad),
            Err(BattleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_slot() {
        let bad = r#"
            [[slots]]
            id = "belt"
            [[slots]]
            id = "belt"
        "#;
        assert!(SlotTable::from_toml_str(bad).is_err());
    }
}
