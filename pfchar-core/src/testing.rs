//! Sample characters and assertion helpers for tests.

use crate::character::Character;
use crate::critical::CriticalBonus;
use crate::dice::Dice;
use crate::effects::{Armor, Effect, Enchantment, Energy, StatisticItem, Weapon};
use crate::stats::{BaseSaves, Statistic, Statistics, WeaponType};
use indexmap::IndexMap;
use std::fmt::Debug;

/// A level 19 hammer fighter in full magical kit.
///
/// Power Attack starts off and the hammer is held in one hand.
pub fn sample_hammer_fighter() -> Character {
    let mut character = Character::new("Yoyu Tekko");
    character.level = 19;
    character.statistics = Statistics::new(19, 14, 14, 12, 12, 10);
    character.base_attack_bonus = 19;
    character.base_saves = BaseSaves::new(11, 6, 6);
    character.main_hand = Some(Effect::weapon(
        "Infernal Forge",
        Weapon::new(WeaponType::Hammer, Dice::new(1, 8), CriticalBonus::new(20, 3))
            .with_enchantment_modifier(3)
            .with_enchantment(Enchantment::Burst(Energy::Fire).into()),
    ));
    character.abilities = vec![
        Effect::power_attack(),
        Effect::weapon_focus(WeaponType::Hammer),
        Effect::weapon_training(WeaponType::Hammer),
        Effect::improved_critical(WeaponType::Hammer),
        Effect::dodge(),
    ];
    character.items = vec![
        Effect::statistic_item(
            "Belt of Physical Perfection (+6)",
            StatisticItem::new([
                (Statistic::Strength, 6),
                (Statistic::Dexterity, 6),
                (Statistic::Constitution, 6),
            ]),
        ),
        Effect::armor(
            "Celestial Armour",
            Armor::body(6, 8, -2)
                .with_enhancement(3)
                .with_spell_failure(15),
        ),
        Effect::armor(
            "Shield of the Sun",
            Armor::shield(2, -2)
                .with_enhancement(5)
                .with_spell_failure(15),
        ),
        Effect::amulet_of_natural_armor(3),
        Effect::ring_of_protection(2),
        Effect::cloak_of_resistance(5),
    ];
    character
}

/// A level 19 dagger wielder with a light kit.
pub fn sample_dagger_wielder() -> Character {
    let mut character = Character::new("Someone Else");
    character.level = 19;
    character.statistics = Statistics::new(13, 18, 14, 12, 14, 14);
    character.base_attack_bonus = 13;
    character.base_saves = BaseSaves::new(9, 6, 8);
    character.main_hand = Some(Effect::weapon(
        "Some Dagger",
        Weapon::new(WeaponType::Dagger, Dice::new(1, 6), CriticalBonus::new(19, 2))
            .with_enchantment_modifier(2)
            .light(),
    ));
    character.abilities = vec![Effect::dodge()];
    character.items = vec![
        Effect::statistic_item(
            "Headband of Charisma (+6)",
            StatisticItem::new([(Statistic::Charisma, 6)]),
        ),
        Effect::ring_of_protection(2),
        Effect::cloak_of_resistance(3),
    ];
    character
}

/// Assert that a named breakdown holds `expected` under `key`.
pub fn assert_entry<V: PartialEq + Debug>(breakdown: &IndexMap<String, V>, key: &str, expected: V) {
    match breakdown.get(key) {
        Some(actual) => assert_eq!(actual, &expected, "entry {key:?}"),
        None => panic!("missing entry {key:?} in {:?}", breakdown.keys().collect::<Vec<_>>()),
    }
}

/// Assert that a named breakdown has no entry under `key`.
pub fn assert_no_entry<V: Debug>(breakdown: &IndexMap<String, V>, key: &str) {
    assert!(
        !breakdown.contains_key(key),
        "unexpected entry {key:?}: {:?}",
        breakdown.get(key)
    );
}

/// Total of a named breakdown.
pub fn total(breakdown: &IndexMap<String, i32>) -> i32 {
    breakdown.values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_armed() {
        assert!(sample_hammer_fighter().attack_bonus().is_ok());
        assert!(sample_dagger_wielder().attack_bonus().is_ok());
    }

    #[test]
    fn test_sample_armor_limits() {
        let character = sample_hammer_fighter();
        assert_eq!(character.max_dex_bonus(), 8);
        assert_eq!(character.armor_check_penalty(), -4);
    }

    #[test]
    fn test_assert_helpers() {
        let mut breakdown = IndexMap::new();
        breakdown.insert("Strength".to_string(), 4);
        assert_entry(&breakdown, "Strength", 4);
        assert_no_entry(&breakdown, "Dexterity");
        assert_eq!(total(&breakdown), 4);
    }
}
