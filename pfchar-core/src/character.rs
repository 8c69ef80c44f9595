//! The character aggregate and every derived combat number.
//!
//! Queries walk the character's effects in a fixed order (main hand, off
//! hand, items, abilities, statuses), skip those whose condition does not
//! hold, and return named breakdowns. Nothing is cached; every query
//! recomputes from current state.

use crate::critical::CriticalBonus;
use crate::dice::Dice;
use crate::effects::items::UNCAPPED_DEX;
use crate::effects::{abilities, Effect, StatusError, Weapon};
use crate::stats::{stat_modifier, ArmorBonus, BaseSaves, Save, Size, Statistic, Statistics};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Breakdown key of the base attack bonus; iterative attacks are derived from it.
pub const BAB_KEY: &str = "Base Attack Bonus";

/// Breakdown key of the base value of saves and CMD.
pub const BASE_KEY: &str = "Base";

const WEAPON_ENCHANTMENT_KEY: &str = "Weapon Enchantment";
const SIZE_KEY: &str = "Size";
const BASE_CMD: i32 = 10;
const RESERVED_KEYS: [&str; 4] = [BAB_KEY, BASE_KEY, WEAPON_ENCHANTMENT_KEY, SIZE_KEY];

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CharacterError {
    #[error("No weapon in main hand")]
    NoMainHand,
    #[error("No effect named {0}")]
    UnknownToggle(String),
    #[error("Effect {0} cannot be toggled")]
    NotToggleable(String),
    #[error("No status at index {index} ({len} active)")]
    StatusIndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Status(#[from] StatusError),
}

// ============================================================================
// Character
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub id: CharacterId,
    pub name: String,
    pub level: i32,

    // Core stats
    pub statistics: Statistics,
    pub base_size: Size,
    pub base_attack_bonus: i32,
    pub base_saves: BaseSaves,

    // Equipment
    pub main_hand: Option<Effect>,
    pub off_hand: Option<Effect>,
    pub items: Vec<Effect>,

    pub abilities: Vec<Effect>,
    /// Runtime statuses, in the order they were added.
    pub statuses: Vec<Effect>,

    /// Requested two-handed grip; see [`Character::is_two_handed`].
    #[serde(default)]
    pub two_handed: bool,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            level: 1,
            statistics: Statistics::default(),
            base_size: Size::default(),
            base_attack_bonus: 0,
            base_saves: BaseSaves::default(),
            main_hand: None,
            off_hand: None,
            items: Vec::new(),
            abilities: Vec::new(),
            statuses: Vec::new(),
            two_handed: false,
        }
    }

    fn main_weapon(&self) -> Result<(&Effect, &Weapon), CharacterError> {
        self.main_hand
            .as_ref()
            .and_then(|effect| effect.as_weapon().map(|weapon| (effect, weapon)))
            .ok_or(CharacterError::NoMainHand)
    }

    // ========================================================================
    // Two-handed grip
    // ========================================================================

    /// A melee weapon in the main hand and nothing in the off hand.
    pub fn can_be_two_handed(&self) -> bool {
        self.main_weapon().is_ok_and(|(_, weapon)| !weapon.is_ranged) && self.off_hand.is_none()
    }

    pub fn is_two_handed(&self) -> bool {
        self.two_handed && self.can_be_two_handed()
    }

    /// Flip the two-handed grip. Returns false, changing nothing, when the
    /// current equipment does not allow it.
    pub fn toggle_two_handed(&mut self) -> bool {
        if !self.can_be_two_handed() {
            warn!(character = %self.name, "two-handed grip not possible with current equipment");
            return false;
        }
        self.two_handed = !self.two_handed;
        debug!(character = %self.name, two_handed = self.two_handed, "toggled two-handed");
        true
    }

    // ========================================================================
    // Effect enumeration
    // ========================================================================

    /// Every effect in enumeration order, applicable or not.
    pub fn all_effects(&self) -> impl Iterator<Item = &Effect> + '_ {
        self.main_hand
            .iter()
            .chain(self.off_hand.iter())
            .chain(self.items.iter())
            .chain(self.abilities.iter())
            .chain(self.statuses.iter())
    }

    /// Effects whose condition currently holds.
    pub fn applicable_effects(&self) -> impl Iterator<Item = &Effect> + '_ {
        self.all_effects()
            .filter(move |effect| effect.is_applicable(self))
    }

    /// Applicable items, abilities and statuses; the hands are handled by
    /// each query on their own.
    fn applicable_modifiers(&self) -> impl Iterator<Item = &Effect> + '_ {
        self.items
            .iter()
            .chain(self.abilities.iter())
            .chain(self.statuses.iter())
            .filter(move |effect| effect.is_applicable(self))
    }

    fn hand_enchantments(&self) -> impl Iterator<Item = &Effect> + '_ {
        self.main_hand
            .iter()
            .chain(self.off_hand.iter())
            .filter_map(Effect::as_weapon)
            .flat_map(|weapon| weapon.enchantments.iter())
    }

    fn toggleable(&self) -> impl Iterator<Item = &Effect> + '_ {
        self.items
            .iter()
            .chain(self.abilities.iter())
            .chain(self.statuses.iter())
            .chain(self.hand_enchantments())
    }

    fn toggleable_mut(&mut self) -> impl Iterator<Item = &mut Effect> + '_ {
        let enchantments = self
            .main_hand
            .iter_mut()
            .chain(self.off_hand.iter_mut())
            .filter_map(Effect::as_weapon_mut)
            .flat_map(|weapon| weapon.enchantments_mut());
        self.items
            .iter_mut()
            .chain(self.abilities.iter_mut())
            .chain(self.statuses.iter_mut())
            .chain(enchantments)
    }

    /// Name and current flag of every toggle-gated effect.
    pub fn toggles(&self) -> Vec<(String, bool)> {
        self.toggleable()
            .filter_map(|effect| {
                effect
                    .condition
                    .enabled()
                    .map(|enabled| (effect.name.clone(), enabled))
            })
            .collect()
    }

    // ========================================================================
    // Statistics and size
    // ========================================================================

    /// Base value plus the deltas of every applicable effect.
    pub fn modified_statistic(&self, stat: Statistic) -> i32 {
        self.statistics.get(stat)
            + self
                .applicable_effects()
                .map(|effect| effect.statistic_bonus(stat))
                .sum::<i32>()
    }

    pub fn modified_modifier(&self, stat: Statistic) -> i32 {
        stat_modifier(self.modified_statistic(stat))
    }

    /// Change in `stat`'s modifier caused by `effect`'s delta.
    ///
    /// Deltas are applied one effect at a time in enumeration order, so the
    /// shifts of all applicable effects add up to
    /// `modifier(modified) - modifier(base)`. An effect not applicable to
    /// this character is measured as if it came last.
    pub fn statistic_shift(&self, effect: &Effect, stat: Statistic) -> i32 {
        let delta = effect.statistic_bonus(stat);
        if delta == 0 {
            return 0;
        }

        let mut running = self.statistics.get(stat);
        for other in self.applicable_effects() {
            if other.name == effect.name {
                break;
            }
            running += other.statistic_bonus(stat);
        }
        stat_modifier(running + delta) - stat_modifier(running)
    }

    /// Current size: the base size moved by every applicable size change.
    pub fn size(&self) -> Size {
        let change: i32 = self
            .applicable_effects()
            .map(Effect::size_change)
            .sum();
        self.base_size.shifted(change)
    }

    /// Dexterity for a ranged main hand, Strength otherwise.
    pub fn attack_statistic(&self) -> Result<Statistic, CharacterError> {
        let (_, weapon) = self.main_weapon()?;
        Ok(if weapon.is_ranged {
            Statistic::Dexterity
        } else {
            Statistic::Strength
        })
    }

    // ========================================================================
    // Offense
    // ========================================================================

    pub fn attack_bonus(&self) -> Result<IndexMap<String, i32>, CharacterError> {
        let (weapon_effect, _) = self.main_weapon()?;
        let stat = self.attack_statistic()?;

        let mut modifiers = IndexMap::new();
        modifiers.insert(BAB_KEY.to_string(), self.base_attack_bonus);
        if weapon_effect.is_applicable(self) {
            modifiers.insert(
                WEAPON_ENCHANTMENT_KEY.to_string(),
                weapon_effect.attack_bonus(self),
            );
        }
        modifiers.insert(stat.name().to_string(), self.statistics.modifier(stat));
        modifiers.insert(SIZE_KEY.to_string(), self.size().modifier());
        for effect in self.applicable_modifiers() {
            modifiers.insert(effect.name.clone(), effect.attack_bonus(self));
        }

        modifiers.retain(|name, value| *value != 0 || name == BAB_KEY);
        Ok(modifiers)
    }

    pub fn damage_bonus(&self) -> Result<IndexMap<String, Vec<Dice>>, CharacterError> {
        let (weapon_effect, _) = self.main_weapon()?;

        let mut modifiers = IndexMap::new();
        modifiers.insert(weapon_effect.name.clone(), weapon_effect.damage_bonus(self));
        if let Some(off_hand) = &self.off_hand {
            modifiers.insert(off_hand.name.clone(), off_hand.damage_bonus(self));
        }

        let mut strength = self.statistics.modifier(Statistic::Strength);
        if self.is_two_handed() {
            strength = abilities::two_handed(strength);
        }
        modifiers.insert(
            Statistic::Strength.name().to_string(),
            vec![Dice::fixed(strength)],
        );

        for effect in self.applicable_modifiers() {
            modifiers.insert(effect.name.clone(), effect.damage_bonus(self));
        }

        modifiers.retain(|_, dice| {
            dice.iter()
                .any(|die| die.is_variable() || die.flat_value() != 0)
        });
        Ok(modifiers)
    }

    /// The main hand's critical folded through every applicable item,
    /// ability and status.
    pub fn critical_bonus(&self) -> Result<CriticalBonus, CharacterError> {
        let (weapon_effect, _) = self.main_weapon()?;
        let base = weapon_effect.critical_bonus(self, CriticalBonus::default());
        Ok(self
            .applicable_modifiers()
            .fold(base, |critical, effect| effect.critical_bonus(self, critical)))
    }

    // ========================================================================
    // Defense
    // ========================================================================

    /// Armor class by category.
    ///
    /// Dodge bonuses add up. In every other category only the best bonus
    /// counts, while penalties always add.
    pub fn armour_bonuses(&self) -> IndexMap<ArmorBonus, i32> {
        let mut categories = ArmorStack::default();
        for effect in self.applicable_effects() {
            for (category, value) in effect.armour_class_bonus(self) {
                categories.add(category, value);
            }
        }
        let dexterity = self.modified_modifier(Statistic::Dexterity);
        categories.add(ArmorBonus::Dexterity, dexterity.min(self.max_dex_bonus()));
        categories.add(ArmorBonus::Size, self.size().modifier());
        categories.totals()
    }

    /// Lowest maximum Dexterity bonus of all worn armor.
    pub fn max_dex_bonus(&self) -> i32 {
        self.applicable_effects()
            .filter_map(Effect::as_armor)
            .map(|armor| armor.max_dex_bonus)
            .min()
            .unwrap_or(UNCAPPED_DEX)
    }

    /// Whether armor is currently limiting the Dexterity bonus.
    pub fn is_dex_capped(&self) -> bool {
        self.modified_modifier(Statistic::Dexterity) > self.max_dex_bonus()
    }

    pub fn armor_check_penalty(&self) -> i32 {
        self.applicable_effects()
            .filter_map(Effect::as_armor)
            .map(|armor| armor.armor_check_penalty)
            .sum()
    }

    /// Combat maneuver bonus.
    pub fn cmb(&self) -> IndexMap<String, i32> {
        let mut modifiers = IndexMap::new();
        modifiers.insert(BAB_KEY.to_string(), self.base_attack_bonus);
        modifiers.insert(
            Statistic::Strength.name().to_string(),
            self.modified_modifier(Statistic::Strength),
        );
        modifiers.insert(SIZE_KEY.to_string(), self.size().special_modifier());
        modifiers.retain(|name, value| *value != 0 || name == BAB_KEY);
        modifiers
    }

    /// Combat maneuver defense.
    pub fn cmd(&self) -> IndexMap<String, i32> {
        let mut modifiers = IndexMap::new();
        modifiers.insert(BASE_KEY.to_string(), BASE_CMD);
        modifiers.insert(BAB_KEY.to_string(), self.base_attack_bonus);
        for stat in [Statistic::Strength, Statistic::Dexterity] {
            modifiers.insert(stat.name().to_string(), self.modified_modifier(stat));
        }
        modifiers.insert(SIZE_KEY.to_string(), self.size().special_modifier());
        for (category, value) in self.armour_bonuses() {
            if category.applies_to_cmd() {
                modifiers.insert(category.name().to_string(), value);
            }
        }
        modifiers.retain(|name, value| *value != 0 || name == BASE_KEY || name == BAB_KEY);
        modifiers
    }

    /// Saving throw breakdowns.
    pub fn saves(&self) -> IndexMap<Save, IndexMap<String, i32>> {
        Save::all()
            .into_iter()
            .map(|save| (save, self.save(save)))
            .collect()
    }

    pub fn save(&self, save: Save) -> IndexMap<String, i32> {
        let stat = save.statistic();
        let mut modifiers = IndexMap::new();
        modifiers.insert(BASE_KEY.to_string(), self.base_saves.get(save));
        modifiers.insert(stat.name().to_string(), self.modified_modifier(stat));
        for effect in self.applicable_effects() {
            if let Some(value) = effect.saves_bonuses(self).get(&save) {
                modifiers.insert(effect.name.clone(), *value);
            }
        }
        modifiers.retain(|name, value| *value != 0 || name == BASE_KEY);
        modifiers
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Flip the toggle of the named item, ability, status or weapon
    /// enchantment. Returns the new flag.
    pub fn flip_toggle(&mut self, name: &str) -> Result<bool, CharacterError> {
        let character = self.name.clone();
        let effect = self
            .toggleable_mut()
            .find(|effect| effect.name == name)
            .ok_or_else(|| CharacterError::UnknownToggle(name.to_string()))?;
        if !effect.condition.flip() {
            return Err(CharacterError::NotToggleable(name.to_string()));
        }
        let enabled = effect.condition.enabled().unwrap_or(false);
        debug!(character = %character, effect = name, enabled, "flipped toggle");
        Ok(enabled)
    }

    /// Append a runtime status. Rejected statuses leave the list untouched.
    pub fn add_status(&mut self, mut status: Effect) -> Result<(), CharacterError> {
        let name = status.name.trim().to_string();
        let result = if name.is_empty() {
            Err(StatusError::EmptyName)
        } else if self.is_name_taken(&name) {
            Err(StatusError::DuplicateName(name.clone()))
        } else if !status
            .as_status()
            .is_some_and(|contribution| contribution.has_contribution())
        {
            Err(StatusError::NoContribution(name.clone()))
        } else {
            Ok(())
        };

        if let Err(err) = result {
            warn!(character = %self.name, error = %err, "rejected status");
            return Err(err.into());
        }

        debug!(character = %self.name, status = %name, "added status");
        status.name = name;
        self.statuses.push(status);
        Ok(())
    }

    /// Names already used as a breakdown key: every effect, every weapon
    /// enchantment and the fixed entries the queries insert themselves.
    fn is_name_taken(&self, name: &str) -> bool {
        RESERVED_KEYS.contains(&name)
            || Statistic::all().iter().any(|stat| stat.name() == name)
            || self
                .all_effects()
                .chain(self.hand_enchantments())
                .any(|effect| effect.name == name)
    }

    pub fn remove_status(&mut self, index: usize) -> Result<Effect, CharacterError> {
        if index >= self.statuses.len() {
            return Err(CharacterError::StatusIndexOutOfRange {
                index,
                len: self.statuses.len(),
            });
        }
        let status = self.statuses.remove(index);
        debug!(character = %self.name, status = %status.name, "removed status");
        Ok(status)
    }
}

/// Per-category accumulator for armor class bonuses.
#[derive(Default)]
struct ArmorStack {
    /// (bonus, penalty) per category, in first-seen order.
    categories: IndexMap<ArmorBonus, (i32, i32)>,
}

impl ArmorStack {
    fn add(&mut self, category: ArmorBonus, value: i32) {
        let (bonus, penalty) = self.categories.entry(category).or_insert((0, 0));
        if value < 0 {
            *penalty += value;
        } else if category.stacks() {
            *bonus += value;
        } else {
            *bonus = (*bonus).max(value);
        }
    }

    fn totals(self) -> IndexMap<ArmorBonus, i32> {
        self.categories
            .into_iter()
            .map(|(category, (bonus, penalty))| (category, bonus + penalty))
            .filter(|(_, value)| *value != 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::effects::{Armor, Enchantment, Energy, StatisticItem, StatusBuilder};
    use crate::stats::WeaponType;

    fn hammer() -> Effect {
        Effect::weapon(
            "Warhammer",
            Weapon::new(WeaponType::Hammer, Dice::new(1, 8), CriticalBonus::new(20, 3))
                .with_enchantment_modifier(3),
        )
    }

    fn bow() -> Effect {
        Effect::weapon(
            "Longbow",
            Weapon::new(WeaponType::Bow, Dice::new(1, 8), CriticalBonus::new(20, 3)).ranged(),
        )
    }

    fn fighter() -> Character {
        let mut character = Character::new("Fighter");
        character.level = 19;
        character.base_attack_bonus = 19;
        character.statistics.strength = 19;
        character.main_hand = Some(hammer());
        character
    }

    #[test]
    fn test_new_character_defaults() {
        let character = Character::new("Nobody");
        assert_eq!(character.level, 1);
        assert_eq!(character.size(), Size::Medium);
        assert_eq!(character.modified_statistic(Statistic::Wisdom), 10);
        assert!(!character.is_two_handed());
    }

    #[test]
    fn test_weapon_queries_need_main_hand() {
        let character = Character::new("Unarmed");
        assert_eq!(character.attack_statistic(), Err(CharacterError::NoMainHand));
        assert_eq!(character.attack_bonus(), Err(CharacterError::NoMainHand));
        assert_eq!(character.damage_bonus(), Err(CharacterError::NoMainHand));
        assert_eq!(character.critical_bonus(), Err(CharacterError::NoMainHand));
    }

    #[test]
    fn test_two_handed_requires_free_off_hand() {
        let mut character = fighter();
        character.off_hand = Some(Effect::armor("Heavy Shield", Armor::shield(2, -2)));
        assert!(!character.toggle_two_handed());
        assert!(!character.two_handed);

        character.two_handed = true;
        assert!(!character.is_two_handed());
    }

    #[test]
    fn test_two_handed_never_with_ranged() {
        let mut character = fighter();
        character.main_hand = Some(bow());
        character.two_handed = true;
        assert!(!character.can_be_two_handed());
        assert!(!character.is_two_handed());
        assert!(!character.toggle_two_handed());
    }

    #[test]
    fn test_toggle_two_handed_flips() {
        let mut character = fighter();
        assert!(character.toggle_two_handed());
        assert!(character.is_two_handed());
        assert!(character.toggle_two_handed());
        assert!(!character.is_two_handed());
    }

    #[test]
    fn test_ranged_attack_uses_dexterity() {
        let mut character = fighter();
        character.statistics.dexterity = 16;
        character.main_hand = Some(bow());
        let attack = character.attack_bonus().unwrap();
        assert_eq!(attack.get("Dexterity"), Some(&3));
        assert!(!attack.contains_key("Strength"));
    }

    #[test]
    fn test_attack_keeps_zero_base_attack_bonus() {
        let mut character = Character::new("Novice");
        character.main_hand = Some(Effect::weapon(
            "Club",
            Weapon::new(WeaponType::Hammer, Dice::new(1, 6), CriticalBonus::default()),
        ));
        let attack = character.attack_bonus().unwrap();
        assert_eq!(attack.len(), 1);
        assert_eq!(attack.get(BAB_KEY), Some(&0));
    }

    #[test]
    fn test_statistic_shift_telescopes() {
        let mut character = fighter();
        character.items.push(Effect::statistic_item(
            "Belt of Giant Strength (+4)",
            StatisticItem::new([(Statistic::Strength, 4)]),
        ));
        character.items.push(Effect::statistic_item(
            "Gauntlets of Might (+1)",
            StatisticItem::new([(Statistic::Strength, 1)]),
        ));

        // 19 -> 23 -> 24
        let belt = character.items[0].clone();
        let gauntlets = character.items[1].clone();
        assert_eq!(character.statistic_shift(&belt, Statistic::Strength), 2);
        assert_eq!(character.statistic_shift(&gauntlets, Statistic::Strength), 1);
        assert_eq!(
            character.modified_modifier(Statistic::Strength)
                - character.statistics.modifier(Statistic::Strength),
            3
        );

        let attack = character.attack_bonus().unwrap();
        assert_eq!(attack.get("Strength"), Some(&4));
        assert_eq!(attack.get("Belt of Giant Strength (+4)"), Some(&2));
        assert_eq!(attack.get("Gauntlets of Might (+1)"), Some(&1));
    }

    #[test]
    fn test_statistic_item_damage_two_handed() {
        let mut character = fighter();
        character.items.push(Effect::statistic_item(
            "Belt of Physical Perfection (+6)",
            StatisticItem::new([(Statistic::Strength, 6)]),
        ));
        character.two_handed = true;
        let damage = character.damage_bonus().unwrap();
        assert_eq!(
            damage.get("Belt of Physical Perfection (+6)"),
            Some(&vec![Dice::fixed(4)])
        );
        assert_eq!(damage.get("Strength"), Some(&vec![Dice::fixed(6)]));
    }

    #[test]
    fn test_power_attack_two_handed() {
        let mut character = fighter();
        character.base_attack_bonus = 16;
        character.abilities.push(Effect::power_attack());
        character.flip_toggle("Power Attack").unwrap();

        let damage = character.damage_bonus().unwrap();
        assert_eq!(damage.get("Power Attack"), Some(&vec![Dice::fixed(10)]));

        character.toggle_two_handed();
        let damage = character.damage_bonus().unwrap();
        assert_eq!(damage.get("Power Attack"), Some(&vec![Dice::fixed(15)]));
    }

    #[test]
    fn test_disabled_toggle_contributes_nothing() {
        let mut character = fighter();
        character.abilities.push(Effect::power_attack());
        assert!(!character
            .attack_bonus()
            .unwrap()
            .contains_key("Power Attack"));
        assert_eq!(
            character.toggles(),
            vec![("Power Attack".to_string(), false)]
        );
    }

    #[test]
    fn test_flip_toggle_errors() {
        let mut character = fighter();
        character.abilities.push(Effect::dodge());
        assert_eq!(
            character.flip_toggle("Cleave"),
            Err(CharacterError::UnknownToggle("Cleave".to_string()))
        );
        assert_eq!(
            character.flip_toggle("Dodge"),
            Err(CharacterError::NotToggleable("Dodge".to_string()))
        );
    }

    #[test]
    fn test_flip_weapon_enchantment() {
        let mut character = fighter();
        if let Some(weapon) = character.main_hand.as_mut().and_then(Effect::as_weapon_mut) {
            weapon.enchantments.push(
                Effect::from(Enchantment::Elemental(Energy::Fire))
                    .with_condition(Condition::toggle(false)),
            );
        }
        assert_eq!(character.damage_bonus().unwrap()["Warhammer"].len(), 1);
        assert_eq!(character.flip_toggle("Flaming"), Ok(true));
        assert_eq!(character.damage_bonus().unwrap()["Warhammer"].len(), 2);
        assert_eq!(character.toggles(), vec![("Flaming".to_string(), true)]);
    }

    #[test]
    fn test_armour_stacking() {
        let mut character = Character::new("Defender");
        character.statistics.dexterity = 14;
        character.items.push(Effect::ring_of_protection(2));
        character.items.push(Effect::ring_of_protection(1));
        character.abilities.push(Effect::dodge());
        character
            .add_status(
                StatusBuilder::new("Haste")
                    .armor_class(ArmorBonus::Dodge, 1)
                    .build(),
            )
            .unwrap();
        character
            .add_status(
                StatusBuilder::new("Shaken Defense")
                    .armor_class(ArmorBonus::Deflection, -1)
                    .build(),
            )
            .unwrap();

        let bonuses = character.armour_bonuses();
        assert_eq!(bonuses.get(&ArmorBonus::Deflection), Some(&1));
        assert_eq!(bonuses.get(&ArmorBonus::Dodge), Some(&2));
        assert_eq!(bonuses.get(&ArmorBonus::Dexterity), Some(&2));
        assert!(!bonuses.contains_key(&ArmorBonus::Size));
    }

    #[test]
    fn test_dexterity_capped_by_armor() {
        let mut character = Character::new("Knight");
        character.statistics.dexterity = 20;
        character
            .items
            .push(Effect::armor("Full Plate", Armor::body(9, 1, -6)));
        character
            .items
            .push(Effect::armor("Heavy Shield", Armor::shield(2, -2)));

        let bonuses = character.armour_bonuses();
        assert_eq!(bonuses.get(&ArmorBonus::Dexterity), Some(&1));
        assert!(character.is_dex_capped());
        assert_eq!(character.max_dex_bonus(), 1);
        assert_eq!(character.armor_check_penalty(), -8);
    }

    #[test]
    fn test_size_change_applies_everywhere() {
        let mut character = fighter();
        character
            .add_status(
                StatusBuilder::new("Enlarge Person")
                    .statistic(Statistic::Strength, 2)
                    .statistic(Statistic::Dexterity, -2)
                    .size_change(1)
                    .build(),
            )
            .unwrap();

        assert_eq!(character.size(), Size::Large);
        assert_eq!(character.attack_bonus().unwrap().get("Size"), Some(&-1));
        assert_eq!(
            character.damage_bonus().unwrap()["Warhammer"],
            vec![Dice::new(2, 6).with_modifier(3)]
        );
        assert_eq!(character.armour_bonuses().get(&ArmorBonus::Size), Some(&-1));
        assert_eq!(character.cmb().get("Size"), Some(&1));
    }

    #[test]
    fn test_cmb_and_cmd() {
        let mut character = fighter();
        character.statistics.dexterity = 14;
        character.items.push(Effect::ring_of_protection(2));
        character.abilities.push(Effect::dodge());

        let cmb = character.cmb();
        assert_eq!(cmb.get(BAB_KEY), Some(&19));
        assert_eq!(cmb.get("Strength"), Some(&4));
        assert_eq!(cmb.values().sum::<i32>(), 23);

        let cmd = character.cmd();
        assert_eq!(cmd.get(BASE_KEY), Some(&10));
        assert_eq!(cmd.get("Dexterity"), Some(&2));
        assert_eq!(cmd.get("Deflection"), Some(&2));
        assert_eq!(cmd.get("Dodge"), Some(&1));
        assert_eq!(cmd.values().sum::<i32>(), 38);
    }

    #[test]
    fn test_saves() {
        let mut character = fighter();
        character.base_saves = BaseSaves::new(11, 6, 6);
        character.statistics.constitution = 14;
        character.items.push(Effect::cloak_of_resistance(5));

        let saves = character.saves();
        let fortitude = &saves[&Save::Fortitude];
        assert_eq!(fortitude.get(BASE_KEY), Some(&11));
        assert_eq!(fortitude.get("Constitution"), Some(&2));
        assert_eq!(fortitude.get("Cloak of Resistance (+5)"), Some(&5));
        let reflex = &saves[&Save::Reflex];
        assert!(!reflex.contains_key("Dexterity"));
        assert_eq!(reflex.values().sum::<i32>(), 11);
    }

    #[test]
    fn test_add_status_validation() {
        let mut character = fighter();
        let bless = || StatusBuilder::new("Bless").attack(1).build();
        character.add_status(bless()).unwrap();

        assert_eq!(
            character.add_status(bless()),
            Err(CharacterError::Status(StatusError::DuplicateName(
                "Bless".to_string()
            )))
        );
        assert_eq!(
            character.add_status(StatusBuilder::new("   ").attack(1).build()),
            Err(CharacterError::Status(StatusError::EmptyName))
        );
        assert_eq!(
            character.add_status(StatusBuilder::new("Nothing").build()),
            Err(CharacterError::Status(StatusError::NoContribution(
                "Nothing".to_string()
            )))
        );
        assert_eq!(
            character.add_status(Effect::dodge()),
            Err(CharacterError::Status(StatusError::NoContribution(
                "Dodge".to_string()
            )))
        );
        assert_eq!(character.statuses.len(), 1);
    }

    #[test]
    fn test_status_name_cannot_shadow_breakdown_entries() {
        let mut character = fighter();
        character.main_hand = Some(Effect::weapon(
            "Warhammer",
            Weapon::new(WeaponType::Hammer, Dice::new(1, 8), CriticalBonus::new(20, 3))
                .with_enchantment_modifier(3)
                .with_enchantment(Enchantment::Burst(Energy::Fire).into()),
        ));
        character.abilities.push(Effect::weapon_focus(WeaponType::Hammer));
        character.items.push(Effect::ring_of_protection(2));
        let before = character.attack_bonus().unwrap();

        for taken in [
            "Weapon Focus",
            "Ring of Protection (+2)",
            "Warhammer",
            "Flaming Burst",
            BAB_KEY,
            BASE_KEY,
            "Weapon Enchantment",
            "Size",
            "Strength",
            "Wisdom",
        ] {
            assert_eq!(
                character.add_status(StatusBuilder::new(taken).attack(2).build()),
                Err(CharacterError::Status(StatusError::DuplicateName(
                    taken.to_string()
                ))),
                "{taken} should be rejected"
            );
        }
        assert!(character.statuses.is_empty());
        assert_eq!(character.attack_bonus().unwrap(), before);
        assert_eq!(before.get(BAB_KEY), Some(&19));
    }

    #[test]
    fn test_remove_status() {
        let mut character = fighter();
        character
            .add_status(StatusBuilder::new("Bless").attack(1).build())
            .unwrap();
        assert_eq!(
            character.remove_status(3),
            Err(CharacterError::StatusIndexOutOfRange { index: 3, len: 1 })
        );
        let removed = character.remove_status(0).unwrap();
        assert_eq!(removed.name, "Bless");
        assert!(character.statuses.is_empty());
    }

    #[test]
    fn test_status_damage_folds_into_strength_shift() {
        let mut character = fighter();
        character
            .add_status(
                StatusBuilder::new("Rage")
                    .statistic(Statistic::Strength, 4)
                    .damage(1)
                    .build(),
            )
            .unwrap();
        let damage = character.damage_bonus().unwrap();
        // Strength 19 -> 23: +2 from the shift, +1 flat
        assert_eq!(damage.get("Rage"), Some(&vec![Dice::fixed(3)]));
        assert_eq!(character.attack_bonus().unwrap().get("Rage"), Some(&2));
    }
}
