//! # Ruleset Catalog
//!
//! Item, vehicle and craft rules, loaded once from a TOML ruleset.
//!
//! Catalog order is the order of `[[items]]` in the file; every ledger
//! lists its rows in that order.
//!
//! ```toml
//! [[items]]
//! id = 10
//! name = "Rifle"
//! battle_type = "firearm"
//! size = 0.2
//! weight = 8
//! compatible_ammo = [11]
//!
//! [[crafts]]
//! id = "skyranger"
//! crew_space = 14
//! max_vehicles = 3
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Unique identifier for an item type.
pub type ItemId = u32;

/// Crew space taken by a vehicle whose rule gives no footprint (a 2x2 unit).
pub const DEFAULT_VEHICLE_FOOTPRINT: i32 = 4;

/// How an item behaves on the battlefield.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleType {
    /// Not usable in battle (components, craft parts, armour store items).
    #[default]
    None,
    /// Ranged weapon.
    Firearm,
    /// Ammunition clip.
    Ammo,
    /// Melee weapon.
    Melee,
    /// Thrown grenade.
    Grenade,
    /// Proximity grenade.
    ProximityGrenade,
    /// Flare.
    Flare,
    /// Medical kit.
    Medikit,
    /// Motion scanner.
    Scanner,
    /// Mind probe.
    MindProbe,
    /// Psi amplifier.
    PsiAmp,
    /// Recovered corpse.
    Corpse,
}

impl BattleType {
    /// Returns true for items thrown by hand.
    #[must_use]
    pub const fn is_thrown(self) -> bool {
        matches!(self, Self::Grenade | Self::ProximityGrenade | Self::Flare)
    }
}

fn default_accuracy_melee() -> i32 {
    100
}

fn default_true() -> bool {
    true
}

/// An item type definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemRule {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Battlefield behaviour.
    #[serde(default)]
    pub battle_type: BattleType,
    /// Storage volume per unit.
    #[serde(default)]
    pub size: f64,
    /// Carried weight per unit.
    #[serde(default)]
    pub weight: i32,
    /// Rounds per clip (ammo) or rounds carried (vehicles).
    #[serde(default)]
    pub clip_size: i32,
    /// Ammo types this item accepts, preferred first.
    #[serde(default)]
    pub compatible_ammo: Vec<ItemId>,
    /// Fixed weapon: the item is a vehicle when stored on a craft.
    #[serde(default)]
    pub fixed: bool,
    /// Edge length of the vehicle unit in tiles.
    #[serde(default)]
    pub footprint: Option<i32>,
    /// Research topics that must be complete before the item is listed.
    #[serde(default)]
    pub requires: Vec<String>,
    /// Whether the item has an inventory sprite (can be equipped).
    #[serde(default = "default_true")]
    pub equippable: bool,
    /// Sale price.
    #[serde(default)]
    pub sell_cost: i64,
    /// Cost of moving one unit between bases.
    #[serde(default)]
    pub transfer_cost: i64,
    /// Live alien.
    #[serde(default)]
    pub alien: bool,
    /// Store item of a soldier armour.
    #[serde(default)]
    pub armor: bool,
    /// Launcher or clip of a craft weapon.
    #[serde(default)]
    pub craft_armament: bool,
    /// Needs both hands.
    #[serde(default)]
    pub two_handed: bool,
    /// Melee accuracy scales with the unit's melee skill.
    #[serde(default)]
    pub skill_applied: bool,
    /// Melee accuracy percentage.
    #[serde(default = "default_accuracy_melee")]
    pub accuracy_melee: i32,
    /// Damage adds the unit's strength.
    #[serde(default)]
    pub strength_applied: bool,
    /// Damage.
    #[serde(default)]
    pub power: i32,
}

impl ItemRule {
    /// Creates a rule with every optional field at its default.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>, battle_type: BattleType) -> Self {
        Self {
            id,
            name: name.into(),
            battle_type,
            size: 0.0,
            weight: 0,
            clip_size: 0,
            compatible_ammo: Vec::new(),
            fixed: false,
            footprint: None,
            requires: Vec::new(),
            equippable: true,
            sell_cost: 0,
            transfer_cost: 0,
            alien: false,
            armor: false,
            craft_armament: false,
            two_handed: false,
            skill_applied: false,
            accuracy_melee: default_accuracy_melee(),
            strength_applied: false,
            power: 0,
        }
    }

    /// Shown in the ammo colour: clips and clip-like components.
    #[must_use]
    pub fn is_ammo_like(&self) -> bool {
        self.battle_type == BattleType::Ammo
            || (self.battle_type == BattleType::None && self.clip_size > 0)
    }

    /// Whether the item takes a clip.
    #[must_use]
    pub fn needs_ammo(&self) -> bool {
        !self.compatible_ammo.is_empty()
    }

    /// Preferred ammo type.
    #[must_use]
    pub fn primary_ammo(&self) -> Option<ItemId> {
        self.compatible_ammo.first().copied()
    }

    /// Crew space one vehicle of this type takes on a craft.
    #[must_use]
    pub fn vehicle_footprint(&self) -> i32 {
        self.footprint.map_or(DEFAULT_VEHICLE_FOOTPRINT, |edge| edge * edge)
    }

    /// Listed on the craft equipment screen at all.
    #[must_use]
    pub fn is_craft_equipment(&self) -> bool {
        self.equippable && !matches!(self.battle_type, BattleType::None | BattleType::Corpse)
    }
}

/// A craft type definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftRule {
    /// Craft type name.
    pub id: String,
    /// Crew space shared by soldiers and vehicles.
    pub crew_space: i32,
    /// Maximum number of vehicles.
    pub max_vehicles: i32,
    /// Maximum number of loose items, 0 for no limit.
    #[serde(default)]
    pub max_items: i32,
    /// Sale price.
    #[serde(default)]
    pub sell_cost: i64,
    /// Cost of moving the craft between bases.
    #[serde(default)]
    pub transfer_cost: i64,
    /// Fuel item, if the craft refuels from stores.
    #[serde(default)]
    pub refuel_item: Option<ItemId>,
}

/// Player-facing options that change ledger behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerOptions {
    /// Items moved per mouse-wheel notch.
    pub mouse_wheel_step: i32,
    /// Base stores capacity is checked on the sell screen.
    pub storage_limits_enforced: bool,
    /// Live aliens may be sold.
    pub allow_selling_live_aliens: bool,
    /// Use the denser column layout (reservation annotations, blank zero amounts).
    pub alternate_screen: bool,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            mouse_wheel_step: 10,
            storage_limits_enforced: true,
            allow_selling_live_aliens: false,
            alternate_screen: false,
        }
    }
}

#[derive(Deserialize)]
struct RulesetFile {
    #[serde(default)]
    items: Vec<ItemRule>,
    #[serde(default)]
    crafts: Vec<CraftRule>,
    #[serde(default)]
    options: LedgerOptions,
}

/// All rules known to the game, in catalog order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    /// Item rules in catalog order.
    items: Vec<ItemRule>,
    /// Item ID to position in `items`.
    item_index: HashMap<ItemId, usize>,
    /// Craft rules by type name.
    crafts: HashMap<String, CraftRule>,
    /// Player options.
    options: LedgerOptions,
}

impl Catalog {
    /// Builds a catalog from rules.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidConfig` for duplicate IDs, ammo
    /// references to unknown items, or negative craft capacities.
    pub fn new(items: Vec<ItemRule>, crafts: Vec<CraftRule>) -> LedgerResult<Self> {
        let mut item_index = HashMap::with_capacity(items.len());
        for (position, rule) in items.iter().enumerate() {
            if item_index.insert(rule.id, position).is_some() {
                return Err(LedgerError::InvalidConfig(format!(
                    "item ID {} defined twice",
                    rule.id
                )));
            }
        }

        for rule in &items {
            if let Some(missing) = rule
                .compatible_ammo
                .iter()
                .find(|ammo| !item_index.contains_key(ammo))
            {
                return Err(LedgerError::InvalidConfig(format!(
                    "item {} lists unknown ammo {missing}",
                    rule.id
                )));
            }
        }

        let mut seen = HashSet::new();
        let mut by_name = HashMap::with_capacity(crafts.len());
        for craft in crafts {
            if craft.crew_space < 0 || craft.max_vehicles < 0 || craft.max_items < 0 {
                return Err(LedgerError::InvalidConfig(format!(
                    "craft {} has a negative capacity",
                    craft.id
                )));
            }
            if !seen.insert(craft.id.clone()) {
                return Err(LedgerError::InvalidConfig(format!(
                    "craft {} defined twice",
                    craft.id
                )));
            }
            by_name.insert(craft.id.clone(), craft);
        }

        Ok(Self {
            items,
            item_index,
            crafts: by_name,
            options: LedgerOptions::default(),
        })
    }

    /// Parses a TOML ruleset.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidConfig` if the document does not parse
    /// or fails validation.
    pub fn from_toml_str(source: &str) -> LedgerResult<Self> {
        let file: RulesetFile =
            toml::from_str(source).map_err(|e| LedgerError::InvalidConfig(e.to_string()))?;
        let mut catalog = Self::new(file.items, file.crafts)?;
        catalog.options = file.options;
        Ok(catalog)
    }

    /// Reads and parses a TOML ruleset file.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidConfig` if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Replaces the player options.
    #[must_use]
    pub fn with_options(mut self, options: LedgerOptions) -> Self {
        self.options = options;
        self
    }

    /// Player options.
    #[must_use]
    pub const fn options(&self) -> &LedgerOptions {
        &self.options
    }

    /// Looks up an item rule.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ItemRule> {
        self.item_index.get(&id).map(|&position| &self.items[position])
    }

    /// Looks up an item rule that must exist.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ItemNotFound` if the ID is unknown.
    pub fn require_item(&self, id: ItemId) -> LedgerResult<&ItemRule> {
        self.item(id).ok_or(LedgerError::ItemNotFound(id))
    }

    /// Item rules in catalog order.
    pub fn items(&self) -> impl Iterator<Item = &ItemRule> {
        self.items.iter()
    }

    /// Number of item rules.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Looks up a craft rule.
    #[must_use]
    pub fn craft_rule(&self, id: &str) -> Option<&CraftRule> {
        self.crafts.get(id)
    }

    /// Looks up a craft rule that must exist.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::CraftRuleNotFound` if the type is unknown.
    pub fn require_craft_rule(&self, id: &str) -> LedgerResult<&CraftRule> {
        self.craft_rule(id)
            .ok_or_else(|| LedgerError::CraftRuleNotFound(id.to_string()))
    }

    /// All craft rules, in no particular order.
    pub fn craft_rules(&self) -> impl Iterator<Item = &CraftRule> {
        self.crafts.values()
    }
}
