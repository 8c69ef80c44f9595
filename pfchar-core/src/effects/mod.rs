//! Effects: everything that modifies a character's combat numbers.
//!
//! Weapons, armor, worn items, feats, weapon enchantments and runtime statuses
//! all share one capability set. Each capability has a neutral default and
//! only the variants that care about it contribute:
//!
//! | capability            | default            |
//! |-----------------------|--------------------|
//! | `attack_bonus`        | `0`                |
//! | `damage_bonus`        | no dice            |
//! | `critical_bonus`      | passes through     |
//! | `armour_class_bonus`  | no categories      |
//! | `statistic_bonus`     | `0`                |
//! | `saves_bonuses`       | no saves           |
//! | `size_change`         | `0`                |
//!
//! The variant set is closed, so dispatch is a `match` on [`EffectKind`].

pub mod abilities;
pub mod items;
pub mod status;
pub mod weapon;

pub use items::{Armor, StatisticItem};
pub use status::{Status, StatusBuilder, StatusError};
pub use weapon::{Enchantment, Energy, Weapon};

use crate::character::Character;
use crate::condition::Condition;
use crate::critical::CriticalBonus;
use crate::dice::Dice;
use crate::stats::{ArmorBonus, Save, Statistic, WeaponType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The closed set of effect variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    Weapon(Weapon),
    Enchantment(Enchantment),
    Armor(Armor),
    StatisticItem(StatisticItem),
    /// Amulet of natural armor.
    NaturalArmor { bonus: i32 },
    /// Ring of protection.
    Protection { bonus: i32 },
    /// Cloak of resistance.
    Resistance { bonus: i32 },
    WeaponFocus,
    WeaponTraining,
    PowerAttack,
    ImprovedCritical,
    Dodge,
    Status(Status),
}

/// A named, conditionally applied modifier.
///
/// `name` is the display key of every breakdown this effect appears in and
/// must be unique among a character's effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
    #[serde(default)]
    pub condition: Condition,
    pub kind: EffectKind,
}

impl Effect {
    pub fn new(name: impl Into<String>, kind: EffectKind) -> Self {
        Self {
            name: name.into(),
            condition: Condition::Always,
            kind,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn weapon(name: impl Into<String>, weapon: Weapon) -> Self {
        Self::new(name, EffectKind::Weapon(weapon))
    }

    pub fn armor(name: impl Into<String>, armor: Armor) -> Self {
        Self::new(name, EffectKind::Armor(armor))
    }

    pub fn statistic_item(name: impl Into<String>, item: StatisticItem) -> Self {
        Self::new(name, EffectKind::StatisticItem(item))
    }

    pub fn amulet_of_natural_armor(bonus: i32) -> Self {
        Self::new(
            format!("Amulet of Natural Armor ({bonus:+})"),
            EffectKind::NaturalArmor { bonus },
        )
    }

    pub fn ring_of_protection(bonus: i32) -> Self {
        Self::new(
            format!("Ring of Protection ({bonus:+})"),
            EffectKind::Protection { bonus },
        )
    }

    pub fn cloak_of_resistance(bonus: i32) -> Self {
        Self::new(
            format!("Cloak of Resistance ({bonus:+})"),
            EffectKind::Resistance { bonus },
        )
    }

    pub fn weapon_focus(weapon_type: WeaponType) -> Self {
        Self::new("Weapon Focus", EffectKind::WeaponFocus)
            .with_condition(Condition::WeaponType(weapon_type))
    }

    pub fn weapon_training(weapon_type: WeaponType) -> Self {
        Self::new("Weapon Training", EffectKind::WeaponTraining)
            .with_condition(Condition::WeaponType(weapon_type))
    }

    /// Power Attack starts switched off.
    pub fn power_attack() -> Self {
        Self::new("Power Attack", EffectKind::PowerAttack).with_condition(Condition::toggle(false))
    }

    pub fn improved_critical(weapon_type: WeaponType) -> Self {
        Self::new("Improved Critical", EffectKind::ImprovedCritical)
            .with_condition(Condition::WeaponType(weapon_type))
    }

    pub fn dodge() -> Self {
        Self::new("Dodge", EffectKind::Dodge)
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match &self.kind {
            EffectKind::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn as_weapon_mut(&mut self) -> Option<&mut Weapon> {
        match &mut self.kind {
            EffectKind::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn as_armor(&self) -> Option<&Armor> {
        match &self.kind {
            EffectKind::Armor(armor) => Some(armor),
            _ => None,
        }
    }

    pub fn as_status(&self) -> Option<&Status> {
        match &self.kind {
            EffectKind::Status(status) => Some(status),
            _ => None,
        }
    }

    pub fn is_applicable(&self, character: &Character) -> bool {
        self.condition.evaluate(character)
    }

    pub fn attack_bonus(&self, character: &Character) -> i32 {
        match &self.kind {
            EffectKind::Weapon(weapon) => weapon.enchantment_modifier,
            EffectKind::WeaponFocus => 1,
            EffectKind::WeaponTraining => abilities::weapon_training_bonus(character.level),
            EffectKind::PowerAttack => {
                abilities::power_attack_penalty(character.base_attack_bonus)
            }
            EffectKind::StatisticItem(_) => self.attack_statistic_shift(character),
            EffectKind::Status(status) => status.attack + self.attack_statistic_shift(character),
            _ => 0,
        }
    }

    pub fn damage_bonus(&self, character: &Character) -> Vec<Dice> {
        match &self.kind {
            EffectKind::Weapon(weapon) => weapon.damage(character),
            EffectKind::Enchantment(enchantment) => enchantment.damage_dice(),
            EffectKind::WeaponTraining => {
                vec![Dice::fixed(abilities::weapon_training_bonus(character.level))]
            }
            EffectKind::PowerAttack => vec![Dice::fixed(abilities::power_attack_damage(
                character.base_attack_bonus,
                character.is_two_handed(),
            ))],
            EffectKind::StatisticItem(_) => {
                let shift = self.strength_damage_shift(character);
                if shift != 0 {
                    vec![Dice::fixed(shift)]
                } else {
                    Vec::new()
                }
            }
            EffectKind::Status(status) => {
                status.damage_dice(self.strength_damage_shift(character))
            }
            _ => Vec::new(),
        }
    }

    /// Transform the critical bonus produced so far.
    pub fn critical_bonus(&self, character: &Character, critical: CriticalBonus) -> CriticalBonus {
        match &self.kind {
            EffectKind::Weapon(weapon) => weapon.critical(character),
            EffectKind::Enchantment(enchantment) => enchantment.critical(critical),
            EffectKind::ImprovedCritical => critical.doubled_range(),
            _ => critical,
        }
    }

    pub fn armour_class_bonus(&self, _character: &Character) -> IndexMap<ArmorBonus, i32> {
        match &self.kind {
            EffectKind::Armor(armor) => armor.armour_class_bonus(),
            EffectKind::NaturalArmor { bonus } => IndexMap::from([(ArmorBonus::Natural, *bonus)]),
            EffectKind::Protection { bonus } => IndexMap::from([(ArmorBonus::Deflection, *bonus)]),
            EffectKind::Dodge => IndexMap::from([(ArmorBonus::Dodge, 1)]),
            EffectKind::Status(status) => status.armor_class.clone(),
            _ => IndexMap::new(),
        }
    }

    pub fn statistic_bonus(&self, stat: Statistic) -> i32 {
        match &self.kind {
            EffectKind::StatisticItem(item) => item.get(stat),
            EffectKind::Status(status) => status.statistics.get(&stat).copied().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn saves_bonuses(&self, _character: &Character) -> IndexMap<Save, i32> {
        match &self.kind {
            EffectKind::Resistance { bonus } => {
                Save::all().into_iter().map(|save| (save, *bonus)).collect()
            }
            EffectKind::Status(status) => status.saves.clone(),
            _ => IndexMap::new(),
        }
    }

    pub fn size_change(&self) -> i32 {
        match &self.kind {
            EffectKind::Status(status) => status.size_change,
            _ => 0,
        }
    }

    /// Whether this effect carries any statistic delta.
    fn changes_statistics(&self) -> bool {
        Statistic::all()
            .into_iter()
            .any(|stat| self.statistic_bonus(stat) != 0)
    }

    fn attack_statistic_shift(&self, character: &Character) -> i32 {
        if !self.changes_statistics() {
            return 0;
        }
        match character.attack_statistic() {
            Ok(stat) => character.statistic_shift(self, stat),
            Err(_) => 0,
        }
    }

    fn strength_damage_shift(&self, character: &Character) -> i32 {
        if !self.changes_statistics() {
            return 0;
        }
        let shift = character.statistic_shift(self, Statistic::Strength);
        if character.is_two_handed() {
            abilities::two_handed(shift)
        } else {
            shift
        }
    }
}
