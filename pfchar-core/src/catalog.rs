//! Standard Pathfinder weapons and armor.
//!
//! Definitions can reference these by name instead of spelling out dice,
//! criticals and armor statistics.

use crate::critical::CriticalBonus;
use crate::dice::Dice;
use crate::effects::{Armor, Effect, Weapon};
use crate::stats::WeaponType;

/// A named catalog weapon.
#[derive(Debug, Clone)]
pub struct CatalogWeapon {
    pub name: &'static str,
    pub weapon: Weapon,
}

impl CatalogWeapon {
    fn new(
        name: &'static str,
        weapon_type: WeaponType,
        damage: Dice,
        crit_range: i32,
        crit_multiplier: i32,
    ) -> Self {
        Self {
            name,
            weapon: Weapon::new(
                weapon_type,
                damage,
                CriticalBonus::new(crit_range, crit_multiplier),
            ),
        }
    }

    fn ranged(mut self) -> Self {
        self.weapon = self.weapon.ranged();
        self
    }

    fn light(mut self) -> Self {
        self.weapon = self.weapon.light();
        self
    }

    pub fn to_effect(&self) -> Effect {
        Effect::weapon(self.name, self.weapon.clone())
    }
}

/// A named catalog armor or shield.
#[derive(Debug, Clone)]
pub struct CatalogArmor {
    pub name: &'static str,
    pub armor: Armor,
}

impl CatalogArmor {
    fn body(
        name: &'static str,
        bonus: i32,
        max_dex: i32,
        check_penalty: i32,
        spell_failure: i32,
    ) -> Self {
        Self {
            name,
            armor: Armor::body(bonus, max_dex, check_penalty).with_spell_failure(spell_failure),
        }
    }

    fn shield(name: &'static str, bonus: i32, check_penalty: i32, spell_failure: i32) -> Self {
        Self {
            name,
            armor: Armor::shield(bonus, check_penalty).with_spell_failure(spell_failure),
        }
    }

    fn max_dex(mut self, max_dex: i32) -> Self {
        self.armor.max_dex_bonus = max_dex;
        self
    }

    fn enhanced(mut self, bonus: i32) -> Self {
        self.armor = self.armor.with_enhancement(bonus);
        self
    }

    pub fn to_effect(&self) -> Effect {
        Effect::armor(self.name, self.armor.clone())
    }
}

/// Get a standard weapon by name, ignoring case.
pub fn get_weapon(name: &str) -> Option<&'static CatalogWeapon> {
    let name_lower = name.to_lowercase();
    WEAPONS
        .iter()
        .find(|w| w.name.to_lowercase() == name_lower)
}

/// Get a standard armor or shield by name, ignoring case.
pub fn get_armor(name: &str) -> Option<&'static CatalogArmor> {
    let name_lower = name.to_lowercase();
    ARMORS
        .iter()
        .find(|a| a.name.to_lowercase() == name_lower)
}

// ============================================================================
// Weapons
// ============================================================================

lazy_static::lazy_static! {
    /// Weapon damage is listed for Medium wielders.
    pub static ref WEAPONS: Vec<CatalogWeapon> = vec![
        // Light Melee Weapons
        CatalogWeapon::new("Dagger", WeaponType::Dagger, Dice::new(1, 4), 19, 2).light(),
        CatalogWeapon::new("Kukri", WeaponType::Dagger, Dice::new(1, 4), 18, 2).light(),
        CatalogWeapon::new("Short Sword", WeaponType::Sword, Dice::new(1, 6), 19, 2).light(),
        CatalogWeapon::new("Handaxe", WeaponType::Axe, Dice::new(1, 6), 20, 3).light(),
        CatalogWeapon::new("Light Hammer", WeaponType::Hammer, Dice::new(1, 4), 20, 2).light(),

        // One-Handed Melee Weapons
        CatalogWeapon::new("Longsword", WeaponType::Sword, Dice::new(1, 8), 19, 2),
        CatalogWeapon::new("Rapier", WeaponType::Sword, Dice::new(1, 6), 18, 2),
        CatalogWeapon::new("Scimitar", WeaponType::Sword, Dice::new(1, 6), 18, 2),
        CatalogWeapon::new("Bastard Sword", WeaponType::Sword, Dice::new(1, 10), 19, 2),
        CatalogWeapon::new("Battleaxe", WeaponType::Axe, Dice::new(1, 8), 20, 3),
        CatalogWeapon::new("Warhammer", WeaponType::Hammer, Dice::new(1, 8), 20, 3),

        // Two-Handed Melee Weapons
        CatalogWeapon::new("Greatsword", WeaponType::Sword, Dice::new(2, 6), 19, 2),
        CatalogWeapon::new("Falchion", WeaponType::Sword, Dice::new(2, 4), 18, 2),
        CatalogWeapon::new("Greataxe", WeaponType::Axe, Dice::new(1, 12), 20, 3),
        CatalogWeapon::new("Earth Breaker", WeaponType::Hammer, Dice::new(2, 6), 20, 3),
        CatalogWeapon::new("Glaive", WeaponType::Polearm, Dice::new(1, 10), 20, 3),
        CatalogWeapon::new("Halberd", WeaponType::Polearm, Dice::new(1, 10), 20, 3),
        CatalogWeapon::new("Guisarme", WeaponType::Polearm, Dice::new(2, 4), 20, 3),

        // Ranged Weapons
        CatalogWeapon::new("Shortbow", WeaponType::Bow, Dice::new(1, 6), 20, 3).ranged(),
        CatalogWeapon::new("Longbow", WeaponType::Bow, Dice::new(1, 8), 20, 3).ranged(),
        CatalogWeapon::new("Composite Longbow", WeaponType::Bow, Dice::new(1, 8), 20, 3).ranged(),
        CatalogWeapon::new("Light Crossbow", WeaponType::Crossbow, Dice::new(1, 8), 19, 2).ranged(),
        CatalogWeapon::new("Heavy Crossbow", WeaponType::Crossbow, Dice::new(1, 10), 19, 2)
            .ranged(),
    ];
}

// ============================================================================
// Armor
// ============================================================================

lazy_static::lazy_static! {
    pub static ref ARMORS: Vec<CatalogArmor> = vec![
        // Light Armor
        CatalogArmor::body("Padded", 1, 8, 0, 5),
        CatalogArmor::body("Leather", 2, 6, 0, 10),
        CatalogArmor::body("Studded Leather", 3, 5, -1, 15),
        CatalogArmor::body("Chain Shirt", 4, 4, -2, 20),

        // Medium Armor
        CatalogArmor::body("Hide", 4, 4, -3, 20),
        CatalogArmor::body("Scale Mail", 5, 3, -4, 25),
        CatalogArmor::body("Chainmail", 6, 2, -5, 30),
        CatalogArmor::body("Breastplate", 6, 3, -4, 25),

        // Heavy Armor
        CatalogArmor::body("Splint Mail", 7, 0, -7, 40),
        CatalogArmor::body("Banded Mail", 7, 1, -6, 35),
        CatalogArmor::body("Half-Plate", 8, 0, -7, 40),
        CatalogArmor::body("Full Plate", 9, 1, -6, 35),

        // Shields
        CatalogArmor::shield("Buckler", 1, -1, 5),
        CatalogArmor::shield("Light Steel Shield", 1, -1, 5),
        CatalogArmor::shield("Heavy Steel Shield", 2, -2, 15),
        CatalogArmor::shield("Tower Shield", 4, -10, 50).max_dex(2),

        // Specific Magic Armor
        CatalogArmor::body("Celestial Armour", 6, 8, -2, 15).enhanced(3),
        CatalogArmor::shield("Shield of the Sun", 2, -2, 15).enhanced(5),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ArmorBonus;

    #[test]
    fn test_weapon_lookup_ignores_case() {
        let warhammer = get_weapon("warhammer").unwrap();
        assert_eq!(warhammer.name, "Warhammer");
        assert_eq!(warhammer.weapon.weapon_type, WeaponType::Hammer);
        assert_eq!(warhammer.weapon.base_damage, Dice::new(1, 8));
        assert_eq!(warhammer.weapon.critical, CriticalBonus::new(20, 3));
        assert!(get_weapon("Vorpal Spoon").is_none());
    }

    #[test]
    fn test_ranged_and_light_flags() {
        assert!(get_weapon("Longbow").unwrap().weapon.is_ranged);
        assert!(get_weapon("Dagger").unwrap().weapon.is_light);
        assert!(!get_weapon("Greatsword").unwrap().weapon.is_ranged);
    }

    #[test]
    fn test_magic_armor_values() {
        let armour = get_armor("Celestial Armour").unwrap();
        assert_eq!(armour.armor.max_dex_bonus, 8);
        assert_eq!(armour.armor.spell_failure_chance, 15);
        let bonuses = armour.to_effect().as_armor().unwrap().armour_class_bonus();
        assert_eq!(bonuses.get(&ArmorBonus::ArmorEnhancement), Some(&3));

        let shield = get_armor("shield of the sun").unwrap();
        assert_eq!(shield.armor.shield_bonus, 2);
        assert_eq!(shield.armor.enhancement_bonus, 5);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<String> = WEAPONS
            .iter()
            .map(|w| w.name.to_lowercase())
            .chain(ARMORS.iter().map(|a| a.name.to_lowercase()))
            .collect();
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }
}
