//! Worn items: armor, shields and statistic-boosting gear.

use crate::stats::{ArmorBonus, Statistic};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// No practical cap on Dexterity to armor class.
pub const UNCAPPED_DEX: i32 = 99;

fn uncapped_dex() -> i32 {
    UNCAPPED_DEX
}

/// Armor or shield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    #[serde(default)]
    pub armour_bonus: i32,
    #[serde(default)]
    pub shield_bonus: i32,
    #[serde(default)]
    pub enhancement_bonus: i32,
    #[serde(default = "uncapped_dex")]
    pub max_dex_bonus: i32,
    /// Zero or negative.
    #[serde(default)]
    pub armor_check_penalty: i32,
    /// Arcane spell failure, in percent.
    #[serde(default)]
    pub spell_failure_chance: i32,
}

impl Armor {
    pub fn body(armour_bonus: i32, max_dex_bonus: i32, armor_check_penalty: i32) -> Self {
        Self {
            armour_bonus,
            shield_bonus: 0,
            enhancement_bonus: 0,
            max_dex_bonus,
            armor_check_penalty,
            spell_failure_chance: 0,
        }
    }

    pub fn shield(shield_bonus: i32, armor_check_penalty: i32) -> Self {
        Self {
            armour_bonus: 0,
            shield_bonus,
            enhancement_bonus: 0,
            max_dex_bonus: UNCAPPED_DEX,
            armor_check_penalty,
            spell_failure_chance: 0,
        }
    }

    pub fn with_enhancement(mut self, enhancement_bonus: i32) -> Self {
        self.enhancement_bonus = enhancement_bonus;
        self
    }

    pub fn with_spell_failure(mut self, percent: i32) -> Self {
        self.spell_failure_chance = percent;
        self
    }

    /// Enhancement only counts alongside the bonus it enhances.
    pub fn armour_class_bonus(&self) -> IndexMap<ArmorBonus, i32> {
        let mut bonuses = IndexMap::new();
        if self.shield_bonus != 0 {
            bonuses.insert(ArmorBonus::Shield, self.shield_bonus);
            if self.enhancement_bonus != 0 {
                bonuses.insert(ArmorBonus::ShieldEnhancement, self.enhancement_bonus);
            }
        }
        if self.armour_bonus != 0 {
            bonuses.insert(ArmorBonus::Armor, self.armour_bonus);
            if self.enhancement_bonus != 0 {
                bonuses.insert(ArmorBonus::ArmorEnhancement, self.enhancement_bonus);
            }
        }
        bonuses
    }
}

/// Item granting flat statistic increases, e.g. a belt of physical perfection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticItem {
    pub stats: IndexMap<Statistic, i32>,
}

impl StatisticItem {
    pub fn new(stats: impl IntoIterator<Item = (Statistic, i32)>) -> Self {
        Self {
            stats: stats.into_iter().collect(),
        }
    }

    pub fn get(&self, stat: Statistic) -> i32 {
        self.stats.get(&stat).copied().unwrap_or(0)
    }
}
