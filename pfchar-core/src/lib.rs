//! Pathfinder combat statistics engine.
//!
//! This crate provides:
//! - Composable effects (weapons, armor, items, feats, enchantments, statuses)
//! - Conditions gating when each effect applies
//! - Named breakdowns of attack, damage, critical, armor class, CMB/CMD and saves
//! - Weapon damage scaling by wielder size
//! - JSON character definitions
//!
//! # Quick Start
//!
//! ```
//! use pfchar_core::{CombatSheet, Character, Effect, StatusBuilder};
//! use pfchar_core::catalog;
//!
//! let mut character = Character::new("Valeros");
//! character.base_attack_bonus = 6;
//! character.statistics.strength = 16;
//! character.main_hand = catalog::get_weapon("Longsword").map(|entry| entry.to_effect());
//! character.abilities.push(Effect::power_attack());
//!
//! character.flip_toggle("Power Attack").unwrap();
//! character
//!     .add_status(StatusBuilder::new("Bless").attack(1).build())
//!     .unwrap();
//!
//! let attack = character.attack_bonus().unwrap();
//! assert_eq!(attack.values().sum::<i32>(), 8);
//! println!("{}", CombatSheet::new(&character));
//! ```

pub mod catalog;
pub mod character;
pub mod condition;
pub mod critical;
pub mod definition;
pub mod dice;
pub mod effects;
pub mod format;
pub mod progression;
pub mod roster;
pub mod stats;
pub mod testing;

// Primary public API
pub use character::{Character, CharacterError, CharacterId, BAB_KEY};
pub use condition::Condition;
pub use critical::CriticalBonus;
pub use definition::{load_character, CharacterDefinition, DefinitionError};
pub use dice::Dice;
pub use effects::{Effect, EffectKind, StatusBuilder, StatusError};
pub use format::CombatSheet;
pub use roster::Roster;
pub use stats::{ArmorBonus, Save, Size, Statistic, WeaponType};
