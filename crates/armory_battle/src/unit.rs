//! # Battle Units
//!
//! A soldier or vehicle on the battlefield and the items it carries.
//! Items on the ground are plain `BattleItem`s whose slot is [`GROUND`].

use armory_ledger::{Catalog, ItemId, ItemRule};

use crate::error::{BattleError, BattleResult};
use crate::slots::{GROUND, LEFT_HAND, RIGHT_HAND};

/// Medikit charges left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MedikitCharges {
    /// Painkiller doses.
    pub painkillers: i32,
    /// Stimulant doses.
    pub stimulants: i32,
    /// Healing doses.
    pub heals: i32,
}

/// One physical item on the battlefield.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleItem {
    /// Item type.
    pub rule: ItemId,
    /// Slot id the item sits in.
    pub slot: String,
    /// Column inside the slot grid.
    pub x: i32,
    /// Row inside the slot grid.
    pub y: i32,
    /// Loaded clip, if any.
    pub ammo: Option<Box<BattleItem>>,
    /// Primed fuse, in turns.
    pub fuse: Option<i32>,
    /// Rounds left in this item (clips, vehicle weapons). 255 is unlimited.
    pub rounds: i32,
    /// Medikit charges.
    pub medikit: MedikitCharges,
}

impl BattleItem {
    /// Creates an unloaded item in a slot at position (0, 0).
    #[must_use]
    pub fn new(rule: ItemId, slot: impl Into<String>) -> Self {
        Self {
            rule,
            slot: slot.into(),
            x: 0,
            y: 0,
            ammo: None,
            fuse: None,
            rounds: 0,
            medikit: MedikitCharges::default(),
        }
    }

    /// Creates an item lying on the ground.
    #[must_use]
    pub fn on_ground(rule: ItemId) -> Self {
        Self::new(rule, GROUND)
    }

    /// Moves the item to a slot position.
    #[must_use]
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets the rounds left.
    #[must_use]
    pub fn with_rounds(mut self, rounds: i32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Loads a clip.
    #[must_use]
    pub fn loaded_with(mut self, clip: BattleItem) -> Self {
        self.ammo = Some(Box::new(clip));
        self
    }

    /// The loaded clip.
    #[must_use]
    pub fn loaded_ammo(&self) -> Option<&BattleItem> {
        self.ammo.as_deref()
    }

    /// Loaded ammo type.
    #[must_use]
    pub fn loaded_ammo_type(&self) -> Option<ItemId> {
        self.ammo.as_ref().map(|clip| clip.rule)
    }

    /// Whether the item sits in the given slot position.
    #[must_use]
    pub fn occupies(&self, slot: &str, x: i32, y: i32) -> bool {
        self.slot == slot && self.x == x && self.y == y
    }

    /// Places the item on the ground.
    pub fn drop_to_ground(&mut self) {
        self.slot = GROUND.to_string();
        self.x = 0;
        self.y = 0;
    }

    /// Carried weight, including the loaded clip when the item takes one.
    ///
    /// # Errors
    ///
    /// Returns `BattleError::ItemNotFound` for an unknown item type.
    pub fn weight(&self, catalog: &Catalog) -> BattleResult<i32> {
        let rule = require_rule(catalog, self.rule)?;
        let mut weight = rule.weight;
        if rule.needs_ammo() {
            if let Some(clip) = self.loaded_ammo() {
                weight += require_rule(catalog, clip.rule)?.weight;
            }
        }
        Ok(weight)
    }
}

/// Looks up an item rule for the battlefield.
pub(crate) fn require_rule(catalog: &Catalog, id: ItemId) -> BattleResult<&ItemRule> {
    catalog.item(id).ok_or(BattleError::ItemNotFound(id))
}

/// Base statistics of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitStats {
    /// Time units per turn.
    pub time_units: i32,
    /// Maximum health.
    pub health: i32,
    /// Carrying strength.
    pub strength: i32,
    /// Firing accuracy.
    pub firing: i32,
    /// Throwing accuracy.
    pub throwing: i32,
    /// Melee accuracy.
    pub melee: i32,
}

/// Fatal wounds that affect accuracy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Wounds {
    /// Head wounds.
    pub head: i32,
    /// Right arm wounds.
    pub right_arm: i32,
    /// Left arm wounds.
    pub left_arm: i32,
}

/// A unit and its inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleUnit {
    /// Display name.
    pub name: String,
    /// Base statistics.
    pub stats: UnitStats,
    /// Time units left this turn.
    pub time_units: i32,
    /// Current health.
    pub health: i32,
    /// Current fatal wounds.
    pub wounds: Wounds,
    /// Items carried, in pickup order.
    pub inventory: Vec<BattleItem>,
}

impl BattleUnit {
    /// Creates an unhurt unit with full time units and nothing carried.
    #[must_use]
    pub fn new(name: impl Into<String>, stats: UnitStats) -> Self {
        Self {
            name: name.into(),
            stats,
            time_units: stats.time_units,
            health: stats.health,
            wounds: Wounds::default(),
            inventory: Vec::new(),
        }
    }

    /// The first item in a slot.
    #[must_use]
    pub fn item_in(&self, slot: &str) -> Option<&BattleItem> {
        self.inventory.iter().find(|item| item.slot == slot)
    }

    /// Item in the right hand.
    #[must_use]
    pub fn right_hand(&self) -> Option<&BattleItem> {
        self.item_in(RIGHT_HAND)
    }

    /// Item in the left hand.
    #[must_use]
    pub fn left_hand(&self) -> Option<&BattleItem> {
        self.item_in(LEFT_HAND)
    }

    /// Whether any carried item sits at a slot position.
    #[must_use]
    pub fn is_occupied(&self, slot: &str, x: i32, y: i32) -> bool {
        self.inventory.iter().any(|item| item.occupies(slot, x, y))
    }

    /// Total carried weight.
    ///
    /// # Errors
    ///
    /// Returns `BattleError::ItemNotFound` for an unknown item type.
    pub fn carried_weight(&self, catalog: &Catalog) -> BattleResult<i32> {
        self.inventory
            .iter()
            .try_fold(0, |total, item| Ok(total + item.weight(catalog)?))
    }

    /// Current health as a fraction of maximum health.
    #[must_use]
    pub fn health_ratio(&self) -> f64 {
        if self.stats.health <= 0 {
            return 1.0;
        }
        f64::from(self.health) / f64::from(self.stats.health)
    }

    /// Accuracy percentage left after wounds and lost health.
    ///
    /// `held` names the hand slot the item is (or would be) held in.
    /// Head wounds always count; arm wounds count for that arm, or both
    /// arms for a two-handed item. Never below 10.
    #[must_use]
    pub fn accuracy_modifier(&self, held: Option<(&str, &ItemRule)>) -> i32 {
        let mut wounds = self.wounds.head;
        if let Some((hand, rule)) = held {
            if rule.two_handed {
                wounds += self.wounds.right_arm + self.wounds.left_arm;
            } else if hand == RIGHT_HAND {
                wounds += self.wounds.right_arm;
            } else {
                wounds += self.wounds.left_arm;
            }
        }
        let health = if self.stats.health > 0 {
            25 * self.health / self.stats.health
        } else {
            25
        };
        (health + 75 - 10 * wounds).max(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armory_ledger::BattleType;

    fn stats() -> UnitStats {
        UnitStats {
            time_units: 60,
            health: 40,
            strength: 30,
            firing: 60,
            throwing: 70,
            melee: 50,
        }
    }

    fn catalog() -> Catalog {
        let mut rifle = ItemRule::new(1, "Rifle", BattleType::Firearm);
        rifle.weight = 8;
        rifle.compatible_ammo = vec![2];
        rifle.two_handed = true;
        let mut clip = ItemRule::new(2, "Rifle Clip", BattleType::Ammo);
        clip.weight = 3;
        let mut knife = ItemRule::new(3, "Knife", BattleType::Melee);
        knife.weight = 2;
        Catalog::new(vec![rifle, clip, knife], Vec::new()).unwrap()
    }

    #[test]
    fn test_weight_includes_loaded_clip() {
        let catalog = catalog();
        let loaded = BattleItem::new(1, RIGHT_HAND).loaded_with(BattleItem::on_ground(2));
        assert_eq!(loaded.weight(&catalog).unwrap(), 11);
        assert_eq!(BattleItem::new(1, RIGHT_HAND).weight(&catalog).unwrap(), 8);
    }

    #[test]
    fn test_carried_weight() {
        let catalog = catalog();
        let mut unit = BattleUnit::new("Zhang", stats());
        unit.inventory.push(BattleItem::new(1, RIGHT_HAND).loaded_with(BattleItem::on_ground(2)));
        unit.inventory.push(BattleItem::new(3, "belt"));
        assert_eq!(unit.carried_weight(&catalog).unwrap(), 13);

        unit.inventory.push(BattleItem::new(99, "belt"));
        assert_eq!(
            unit.carried_weight(&catalog),
            Err(BattleError::ItemNotFound(99))
        );
    }

    #[test]
    fn test_hand_lookup() {
        let mut unit = BattleUnit::new("Zhang", stats());
        unit.inventory.push(BattleItem::new(3, LEFT_HAND));
        assert!(unit.right_hand().is_none());
        assert_eq!(unit.left_hand().map(|item| item.rule), Some(3));
        assert!(unit.is_occupied(LEFT_HAND, 0, 0));
        assert!(!unit.is_occupied(LEFT_HAND, 1, 0));
    }

    #[test]
    fn test_accuracy_modifier() {
        let catalog = catalog();
        let mut unit = BattleUnit::new("Zhang", stats());
        assert_eq!(unit.accuracy_modifier(None), 100);

        unit.health = 20;
        unit.wounds = Wounds {
            head: 1,
            right_arm: 2,
            left_arm: 1,
        };
        // 12 + 75 - 10 * (1 + 2 + 1)
        let rifle = catalog.item(1).unwrap();
        assert_eq!(unit.accuracy_modifier(Some((LEFT_HAND, rifle))), 47);
        let knife = catalog.item(3).unwrap();
        assert_eq!(unit.accuracy_modifier(Some((LEFT_HAND, knife))), 67);
        assert_eq!(unit.accuracy_modifier(Some((RIGHT_HAND, knife))), 57);

        unit.wounds.head = 9;
        assert_eq!(unit.accuracy_modifier(None), 10);
    }
}
