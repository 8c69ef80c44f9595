//! Predicates deciding whether an effect currently applies.

use crate::character::Character;
use crate::stats::WeaponType;
use serde::{Deserialize, Serialize};

/// Gate evaluated against the character before an effect contributes.
///
/// A toggle stores its own flag; the character flips it by effect name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Condition {
    #[default]
    Always,
    /// Player-controlled on/off switch (Power Attack, a temporary buff).
    Toggle { enabled: bool },
    /// Holds while the main-hand weapon is of this type.
    WeaponType(WeaponType),
}

impl Condition {
    pub fn toggle(enabled: bool) -> Self {
        Condition::Toggle { enabled }
    }

    pub fn evaluate(&self, character: &Character) -> bool {
        match self {
            Condition::Always => true,
            Condition::Toggle { enabled } => *enabled,
            Condition::WeaponType(weapon_type) => character
                .main_hand
                .as_ref()
                .and_then(|weapon| weapon.as_weapon())
                .is_some_and(|weapon| weapon.weapon_type == *weapon_type),
        }
    }

    /// Current flag of a toggle; `None` for other conditions.
    pub fn enabled(&self) -> Option<bool> {
        match self {
            Condition::Toggle { enabled } => Some(*enabled),
            _ => None,
        }
    }

    /// Invert a toggle. Returns false, and changes nothing, for other conditions.
    pub fn flip(&mut self) -> bool {
        match self {
            Condition::Toggle { enabled } => {
                *enabled = !*enabled;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critical::CriticalBonus;
    use crate::dice::Dice;
    use crate::effects::{Effect, Weapon};

    fn hammer_wielder() -> Character {
        let mut character = Character::new("Tester");
        character.main_hand = Some(Effect::weapon(
            "Warhammer",
            Weapon::new(WeaponType::Hammer, Dice::new(1, 8), CriticalBonus::new(20, 3)),
        ));
        character
    }

    #[test]
    fn test_always_true() {
        let character = Character::new("Nobody");
        assert!(Condition::Always.evaluate(&character));
    }

    #[test]
    fn test_toggle_flip_twice_restores() {
        let character = Character::new("Nobody");
        let mut condition = Condition::toggle(false);
        assert!(!condition.evaluate(&character));
        assert!(condition.flip());
        assert!(condition.evaluate(&character));
        assert!(condition.flip());
        assert!(!condition.evaluate(&character));
    }

    #[test]
    fn test_flip_non_toggle_is_noop() {
        let mut condition = Condition::Always;
        assert!(!condition.flip());
        assert_eq!(condition, Condition::Always);
        assert_eq!(condition.enabled(), None);
    }

    #[test]
    fn test_weapon_type_match() {
        let character = hammer_wielder();
        assert!(Condition::WeaponType(WeaponType::Hammer).evaluate(&character));
        assert!(!Condition::WeaponType(WeaponType::Sword).evaluate(&character));
    }

    #[test]
    fn test_weapon_type_without_weapon() {
        let character = Character::new("Unarmed");
        assert!(!Condition::WeaponType(WeaponType::Hammer).evaluate(&character));
    }
}
