//! Character definition files.
//!
//! A definition is the JSON description a character is built from. Weapons
//! and armor may be written out in full or start from a [`catalog`] entry.
//! Only construction input lives here; runtime changes (toggles, statuses)
//! are not written back.
//!
//! [`catalog`]: crate::catalog

use crate::catalog;
use crate::character::Character;
use crate::condition::Condition;
use crate::critical::CriticalBonus;
use crate::dice::{Dice, DiceError};
use crate::effects::{Armor, Effect, Enchantment, StatisticItem, Weapon};
use crate::stats::{BaseSaves, Size, Statistic, Statistics, WeaponType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Errors from loading or building a definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Unknown catalog weapon: {0}")]
    UnknownWeapon(String),

    #[error("Unknown catalog armor: {0}")]
    UnknownArmor(String),

    #[error("Unknown enchantment: {0}")]
    UnknownEnchantment(String),

    #[error("Weapon {0} needs a catalog base or a type and damage")]
    IncompleteWeapon(String),

    #[error("Armor needs a catalog base or inline values")]
    IncompleteArmor,

    #[error("Invalid damage for {weapon}: {source}")]
    Dice {
        weapon: String,
        #[source]
        source: DiceError,
    },

    #[error("Duplicate effect name: {0}")]
    DuplicateEffect(String),
}

/// Current definition format version.
pub const DEFINITION_VERSION: u32 = 1;

fn current_version() -> u32 {
    DEFINITION_VERSION
}

fn default_level() -> i32 {
    1
}

/// A weapon, either inline or derived from a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponDefinition {
    pub name: String,
    /// Catalog weapon to start from.
    pub base: Option<String>,
    pub weapon_type: Option<WeaponType>,
    /// Dice notation, e.g. `1d8`.
    pub damage: Option<String>,
    pub critical: Option<CriticalBonus>,
    pub ranged: bool,
    pub light: bool,
    pub size: Option<Size>,
    pub enchantment_bonus: i32,
    pub enchantments: Vec<EnchantmentDefinition>,
}

/// An enchantment by name, optionally behind an on/off toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnchantmentDefinition {
    Name(String),
    Toggled { name: String, enabled: bool },
}

/// Armor or a shield, either inline or derived from a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorDefinition {
    /// Display name; defaults to the catalog name.
    pub name: Option<String>,
    pub base: Option<String>,
    pub armor: Option<Armor>,
    pub enhancement: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OffHandDefinition {
    Weapon(WeaponDefinition),
    Shield(ArmorDefinition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDefinition {
    Armor(ArmorDefinition),
    StatisticItem {
        name: String,
        stats: IndexMap<Statistic, i32>,
    },
    NaturalArmor {
        bonus: i32,
    },
    Protection {
        bonus: i32,
    },
    Resistance {
        bonus: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbilityDefinition {
    WeaponFocus {
        weapon_type: WeaponType,
    },
    WeaponTraining {
        weapon_type: WeaponType,
    },
    ImprovedCritical {
        weapon_type: WeaponType,
    },
    PowerAttack {
        #[serde(default)]
        enabled: bool,
    },
    Dodge,
}

/// Everything a character is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDefinition {
    #[serde(default = "current_version")]
    pub version: u32,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub base_attack_bonus: i32,
    #[serde(default)]
    pub base_saves: BaseSaves,
    #[serde(default)]
    pub main_hand: Option<WeaponDefinition>,
    #[serde(default)]
    pub off_hand: Option<OffHandDefinition>,
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
    #[serde(default)]
    pub abilities: Vec<AbilityDefinition>,
}

impl CharacterDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: DEFINITION_VERSION,
            name: name.into(),
            level: 1,
            size: Size::default(),
            statistics: Statistics::default(),
            base_attack_bonus: 0,
            base_saves: BaseSaves::default(),
            main_hand: None,
            off_hand: None,
            items: Vec::new(),
            abilities: Vec::new(),
        }
    }

    /// Parse a definition from JSON text.
    pub fn from_json(content: &str) -> Result<Self, DefinitionError> {
        let definition: Self = serde_json::from_str(content)?;
        if definition.version != DEFINITION_VERSION {
            return Err(DefinitionError::VersionMismatch {
                expected: DEFINITION_VERSION,
                found: definition.version,
            });
        }
        Ok(definition)
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), DefinitionError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    /// Build the character this definition describes.
    pub fn build(&self) -> Result<Character, DefinitionError> {
        let mut character = Character::new(self.name.clone());
        character.level = self.level;
        character.base_size = self.size;
        character.statistics = self.statistics.clone();
        character.base_attack_bonus = self.base_attack_bonus;
        character.base_saves = self.base_saves.clone();

        character.main_hand = self.main_hand.as_ref().map(build_weapon).transpose()?;
        character.off_hand = match &self.off_hand {
            Some(OffHandDefinition::Weapon(weapon)) => Some(build_weapon(weapon)?),
            Some(OffHandDefinition::Shield(shield)) => Some(build_armor(shield)?),
            None => None,
        };
        character.items = self
            .items
            .iter()
            .map(build_item)
            .collect::<Result<_, _>>()?;
        character.abilities = self.abilities.iter().map(build_ability).collect();

        let mut names = HashSet::new();
        for effect in character.all_effects() {
            if !names.insert(effect.name.as_str()) {
                return Err(DefinitionError::DuplicateEffect(effect.name.clone()));
            }
        }

        debug!(character = %character.name, effects = names.len(), "built character");
        Ok(character)
    }
}

/// Load a definition file and build its character.
pub async fn load_character(path: impl AsRef<Path>) -> Result<Character, DefinitionError> {
    CharacterDefinition::load_json(path).await?.build()
}

fn build_weapon(definition: &WeaponDefinition) -> Result<Effect, DefinitionError> {
    let base = match &definition.base {
        Some(name) => Some(
            catalog::get_weapon(name)
                .ok_or_else(|| DefinitionError::UnknownWeapon(name.clone()))?,
        ),
        None => None,
    };

    let name = if definition.name.trim().is_empty() {
        base.map(|entry| entry.name.to_string())
            .ok_or_else(|| DefinitionError::IncompleteWeapon(definition.name.clone()))?
    } else {
        definition.name.trim().to_string()
    };

    let damage = definition
        .damage
        .as_deref()
        .map(Dice::parse)
        .transpose()
        .map_err(|source| DefinitionError::Dice {
            weapon: name.clone(),
            source,
        })?;

    let mut weapon = match (base, definition.weapon_type, damage) {
        (Some(entry), _, _) => entry.weapon.clone(),
        (None, Some(weapon_type), Some(damage)) => Weapon::new(
            weapon_type,
            damage,
            definition.critical.clone().unwrap_or_default(),
        ),
        _ => return Err(DefinitionError::IncompleteWeapon(name)),
    };

    // Explicit fields override the catalog entry.
    if let Some(weapon_type) = definition.weapon_type {
        weapon.weapon_type = weapon_type;
    }
    if let Some(damage) = damage {
        weapon.base_damage = damage;
    }
    if let Some(critical) = &definition.critical {
        weapon.critical = critical.clone();
    }
    weapon.is_ranged |= definition.ranged;
    weapon.is_light |= definition.light;
    weapon.size = definition.size;
    weapon.enchantment_modifier = definition.enchantment_bonus;

    let mut seen = HashSet::new();
    for enchantment in &definition.enchantments {
        let effect = build_enchantment(enchantment)?;
        if !seen.insert(effect.name.clone()) {
            return Err(DefinitionError::DuplicateEffect(effect.name));
        }
        weapon = weapon.with_enchantment(effect);
    }

    Ok(Effect::weapon(name, weapon))
}

fn build_enchantment(definition: &EnchantmentDefinition) -> Result<Effect, DefinitionError> {
    let (name, toggle) = match definition {
        EnchantmentDefinition::Name(name) => (name, None),
        EnchantmentDefinition::Toggled { name, enabled } => (name, Some(*enabled)),
    };
    let enchantment = Enchantment::from_name(name)
        .ok_or_else(|| DefinitionError::UnknownEnchantment(name.clone()))?;
    let effect = Effect::from(enchantment);
    Ok(match toggle {
        Some(enabled) => effect.with_condition(Condition::toggle(enabled)),
        None => effect,
    })
}

fn build_armor(definition: &ArmorDefinition) -> Result<Effect, DefinitionError> {
    let (catalog_name, mut armor) = match (&definition.base, &definition.armor) {
        (Some(base), _) => {
            let entry = catalog::get_armor(base)
                .ok_or_else(|| DefinitionError::UnknownArmor(base.clone()))?;
            (Some(entry.name), entry.armor.clone())
        }
        (None, Some(armor)) => (None, armor.clone()),
        (None, None) => return Err(DefinitionError::IncompleteArmor),
    };
    if definition.enhancement != 0 {
        armor = armor.with_enhancement(definition.enhancement);
    }

    let name = match (&definition.name, catalog_name) {
        (Some(name), _) => name.clone(),
        (None, Some(base)) if definition.enhancement != 0 => {
            format!("{base} ({:+})", definition.enhancement)
        }
        (None, Some(base)) => base.to_string(),
        (None, None) => return Err(DefinitionError::IncompleteArmor),
    };
    Ok(Effect::armor(name, armor))
}

fn build_item(definition: &ItemDefinition) -> Result<Effect, DefinitionError> {
    Ok(match definition {
        ItemDefinition::Armor(armor) => build_armor(armor)?,
        ItemDefinition::StatisticItem { name, stats } => Effect::statistic_item(
            name.clone(),
            StatisticItem::new(stats.iter().map(|(stat, value)| (*stat, *value))),
        ),
        ItemDefinition::NaturalArmor { bonus } => Effect::amulet_of_natural_armor(*bonus),
        ItemDefinition::Protection { bonus } => Effect::ring_of_protection(*bonus),
        ItemDefinition::Resistance { bonus } => Effect::cloak_of_resistance(*bonus),
    })
}

fn build_ability(definition: &AbilityDefinition) -> Effect {
    match definition {
        AbilityDefinition::WeaponFocus { weapon_type } => Effect::weapon_focus(*weapon_type),
        AbilityDefinition::WeaponTraining { weapon_type } => {
            Effect::weapon_training(*weapon_type)
        }
        AbilityDefinition::ImprovedCritical { weapon_type } => {
            Effect::improved_critical(*weapon_type)
        }
        AbilityDefinition::PowerAttack { enabled } => {
            Effect::power_attack().with_condition(Condition::toggle(*enabled))
        }
        AbilityDefinition::Dodge => Effect::dodge(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ArmorBonus;

    #[test]
    fn test_minimal_definition() {
        let definition = CharacterDefinition::from_json(r#"{"name": "Commoner"}"#).unwrap();
        let character = definition.build().unwrap();
        assert_eq!(character.name, "Commoner");
        assert_eq!(character.level, 1);
        assert_eq!(character.base_size, Size::Medium);
        assert!(character.main_hand.is_none());
    }

    #[test]
    fn test_catalog_weapon_with_overrides() {
        let definition = WeaponDefinition {
            name: "Infernal Forge".to_string(),
            base: Some("warhammer".to_string()),
            enchantment_bonus: 3,
            enchantments: vec![EnchantmentDefinition::Name("Flaming Burst".to_string())],
            ..WeaponDefinition::default()
        };
        let effect = build_weapon(&definition).unwrap();
        assert_eq!(effect.name, "Infernal Forge");
        let weapon = effect.as_weapon().unwrap();
        assert_eq!(weapon.weapon_type, WeaponType::Hammer);
        assert_eq!(weapon.base_damage, Dice::new(1, 8));
        assert_eq!(weapon.enchantment_modifier, 3);
        assert_eq!(weapon.enchantments[0].name, "Flaming Burst");
    }

    #[test]
    fn test_inline_weapon() {
        let definition = WeaponDefinition {
            name: "Odd Blade".to_string(),
            weapon_type: Some(WeaponType::Sword),
            damage: Some("2d4".to_string()),
            critical: Some(CriticalBonus::new(18, 2)),
            ..WeaponDefinition::default()
        };
        let weapon = build_weapon(&definition).unwrap();
        assert_eq!(weapon.as_weapon().unwrap().base_damage, Dice::new(2, 4));

        let incomplete = WeaponDefinition {
            name: "Mystery".to_string(),
            ..WeaponDefinition::default()
        };
        assert!(matches!(
            build_weapon(&incomplete),
            Err(DefinitionError::IncompleteWeapon(_))
        ));

        let bad_dice = WeaponDefinition {
            damage: Some("1dx".to_string()),
            ..definition
        };
        assert!(matches!(
            build_weapon(&bad_dice),
            Err(DefinitionError::Dice { .. })
        ));
    }

    #[test]
    fn test_unknown_catalog_entries() {
        let weapon = WeaponDefinition {
            base: Some("Vorpal Spoon".to_string()),
            ..WeaponDefinition::default()
        };
        assert!(matches!(
            build_weapon(&weapon),
            Err(DefinitionError::UnknownWeapon(name)) if name == "Vorpal Spoon"
        ));

        let armor = ArmorDefinition {
            base: Some("Mithral Pajamas".to_string()),
            ..ArmorDefinition::default()
        };
        assert!(matches!(
            build_armor(&armor),
            Err(DefinitionError::UnknownArmor(_))
        ));

        let enchantment = EnchantmentDefinition::Name("Vorpal".to_string());
        assert!(matches!(
            build_enchantment(&enchantment),
            Err(DefinitionError::UnknownEnchantment(_))
        ));
    }

    #[test]
    fn test_toggled_enchantment() {
        let effect = build_enchantment(&EnchantmentDefinition::Toggled {
            name: "shock".to_string(),
            enabled: false,
        })
        .unwrap();
        assert_eq!(effect.name, "Shock");
        assert_eq!(effect.condition.enabled(), Some(false));
    }

    #[test]
    fn test_enhanced_catalog_armor_name() {
        let armor = build_armor(&ArmorDefinition {
            base: Some("Full Plate".to_string()),
            enhancement: 2,
            ..ArmorDefinition::default()
        })
        .unwrap();
        assert_eq!(armor.name, "Full Plate (+2)");
        assert_eq!(
            armor
                .as_armor()
                .unwrap()
                .armour_class_bonus()
                .get(&ArmorBonus::ArmorEnhancement),
            Some(&2)
        );
    }

    #[test]
    fn test_duplicate_effect_names_rejected() {
        let mut definition = CharacterDefinition::new("Ring Collector");
        definition.items.push(ItemDefinition::Protection { bonus: 1 });
        definition.items.push(ItemDefinition::Protection { bonus: 1 });
        assert!(matches!(
            definition.build(),
            Err(DefinitionError::DuplicateEffect(name)) if name == "Ring of Protection (+1)"
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let result = CharacterDefinition::from_json(r#"{"version": 7, "name": "Future"}"#);
        assert!(matches!(
            result,
            Err(DefinitionError::VersionMismatch {
                expected: 1,
                found: 7
            })
        ));
    }

    #[test]
    fn test_tagged_json_forms() {
        let json = r#"{
            "name": "Tagged",
            "off_hand": {"kind": "shield", "base": "Heavy Steel Shield"},
            "items": [
                {"kind": "statistic_item", "name": "Belt", "stats": {"Strength": 2}},
                {"kind": "resistance", "bonus": 2}
            ],
            "abilities": [
                {"kind": "power_attack", "enabled": true},
                {"kind": "weapon_focus", "weapon_type": "Axe"},
                {"kind": "dodge"}
            ]
        }"#;
        let character = CharacterDefinition::from_json(json).unwrap().build().unwrap();
        assert_eq!(
            character.off_hand.as_ref().map(|shield| shield.name.as_str()),
            Some("Heavy Steel Shield")
        );
        assert_eq!(character.items.len(), 2);
        assert_eq!(character.modified_statistic(Statistic::Strength), 12);
        assert_eq!(character.toggles(), vec![("Power Attack".to_string(), true)]);
    }
}
