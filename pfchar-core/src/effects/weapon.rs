//! Weapons and the enchantments attached to them.

use super::{Effect, EffectKind};
use crate::character::Character;
use crate::critical::CriticalBonus;
use crate::dice::Dice;
use crate::progression;
use crate::stats::{Size, WeaponType};
use serde::{Deserialize, Serialize};

/// A wielded weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub weapon_type: WeaponType,
    /// Damage for a weapon sized for its wielder.
    pub base_damage: Dice,
    #[serde(default)]
    pub critical: CriticalBonus,
    #[serde(default)]
    pub is_ranged: bool,
    #[serde(default)]
    pub is_light: bool,
    /// Size the weapon was made for; `None` means the wielder's base size.
    #[serde(default)]
    pub size: Option<Size>,
    /// Enhancement bonus, added to attack and damage.
    #[serde(default)]
    pub enchantment_modifier: i32,
    /// Sub-effects, consulted in order while the weapon is wielded.
    #[serde(default)]
    pub enchantments: Vec<Effect>,
}

impl Weapon {
    pub fn new(weapon_type: WeaponType, base_damage: Dice, critical: CriticalBonus) -> Self {
        Self {
            weapon_type,
            base_damage,
            critical,
            is_ranged: false,
            is_light: false,
            size: None,
            enchantment_modifier: 0,
            enchantments: Vec::new(),
        }
    }

    pub fn ranged(mut self) -> Self {
        self.is_ranged = true;
        self
    }

    pub fn light(mut self) -> Self {
        self.is_light = true;
        self
    }

    pub fn with_enchantment_modifier(mut self, modifier: i32) -> Self {
        self.enchantment_modifier = modifier;
        self
    }

    pub fn with_enchantment(mut self, enchantment: Effect) -> Self {
        self.enchantments.push(enchantment);
        self
    }

    /// Base damage die for the wielder's current size.
    pub fn effective_base_damage(&self, character: &Character) -> Dice {
        let from = self.size.unwrap_or(character.base_size);
        let to = character.size();
        progression::resolve(self.base_damage.without_modifier(), from.steps_to(to), from)
    }

    /// Size-adjusted base die carrying the enchantment modifier, then every
    /// applicable enchantment's dice in list order.
    pub fn damage(&self, character: &Character) -> Vec<Dice> {
        let base = self
            .effective_base_damage(character)
            .with_modifier(self.enchantment_modifier);

        std::iter::once(base)
            .chain(
                self.enchantments
                    .iter()
                    .filter(|enchantment| enchantment.is_applicable(character))
                    .flat_map(|enchantment| enchantment.damage_bonus(character)),
            )
            .collect()
    }

    /// The weapon's own critical folded through its applicable enchantments.
    pub fn critical(&self, character: &Character) -> CriticalBonus {
        self.enchantments
            .iter()
            .filter(|enchantment| enchantment.is_applicable(character))
            .fold(self.critical.clone(), |critical, enchantment| {
                enchantment.critical_bonus(character, critical)
            })
    }

    pub fn enchantments_mut(&mut self) -> impl Iterator<Item = &mut Effect> {
        self.enchantments.iter_mut()
    }
}

/// Energy type of elemental enchantments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Energy {
    Fire,
    Cold,
    Electricity,
}

/// Weapon special abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Enchantment {
    /// +1d6 energy damage (flaming, frost, shock).
    Elemental(Energy),
    /// +1d6 energy damage, and extra d10s on a critical hit.
    Burst(Energy),
    /// Doubles the threat range.
    Keen,
}

impl Enchantment {
    pub fn all() -> [Enchantment; 7] {
        [
            Enchantment::Elemental(Energy::Fire),
            Enchantment::Elemental(Energy::Cold),
            Enchantment::Elemental(Energy::Electricity),
            Enchantment::Burst(Energy::Fire),
            Enchantment::Burst(Energy::Cold),
            Enchantment::Burst(Energy::Electricity),
            Enchantment::Keen,
        ]
    }

    /// Look up an enchantment by its display name, ignoring case.
    pub fn from_name(name: &str) -> Option<Enchantment> {
        Enchantment::all()
            .into_iter()
            .find(|enchantment| enchantment.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Enchantment::Elemental(Energy::Fire) => "Flaming",
            Enchantment::Elemental(Energy::Cold) => "Frost",
            Enchantment::Elemental(Energy::Electricity) => "Shock",
            Enchantment::Burst(Energy::Fire) => "Flaming Burst",
            Enchantment::Burst(Energy::Cold) => "Icy Burst",
            Enchantment::Burst(Energy::Electricity) => "Shocking Burst",
            Enchantment::Keen => "Keen",
        }
    }

    pub fn damage_dice(&self) -> Vec<Dice> {
        match self {
            Enchantment::Elemental(_) | Enchantment::Burst(_) => vec![Dice::new(1, 6)],
            Enchantment::Keen => Vec::new(),
        }
    }

    pub fn critical(&self, critical: CriticalBonus) -> CriticalBonus {
        match self {
            Enchantment::Burst(_) => {
                // 1d10 at x2, 2d10 at x3, 3d10 at x4
                let count = (critical.crit_multiplier - 1).max(1);
                critical.with_damage([Dice::new(count, 10)])
            }
            Enchantment::Keen => critical.doubled_range(),
            Enchantment::Elemental(_) => critical,
        }
    }
}

impl From<Enchantment> for Effect {
    fn from(enchantment: Enchantment) -> Self {
        Effect::new(enchantment.name(), EffectKind::Enchantment(enchantment))
    }
}
