//! Statistics, saves, armor class categories, sizes and weapon types.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Statistics
// ============================================================================

/// The six statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Statistic {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Statistic::Strength => "STR",
            Statistic::Dexterity => "DEX",
            Statistic::Constitution => "CON",
            Statistic::Intelligence => "INT",
            Statistic::Wisdom => "WIS",
            Statistic::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Strength => "Strength",
            Statistic::Dexterity => "Dexterity",
            Statistic::Constitution => "Constitution",
            Statistic::Intelligence => "Intelligence",
            Statistic::Wisdom => "Wisdom",
            Statistic::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Statistic; 6] {
        [
            Statistic::Strength,
            Statistic::Dexterity,
            Statistic::Constitution,
            Statistic::Intelligence,
            Statistic::Wisdom,
            Statistic::Charisma,
        ]
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Named groups of statistics, for statuses that touch several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatisticGroup {
    All,
    Physical,
    Mental,
}

impl StatisticGroup {
    pub fn members(&self) -> &'static [Statistic] {
        match self {
            StatisticGroup::All => &[
                Statistic::Strength,
                Statistic::Dexterity,
                Statistic::Constitution,
                Statistic::Intelligence,
                Statistic::Wisdom,
                Statistic::Charisma,
            ],
            StatisticGroup::Physical => &[
                Statistic::Strength,
                Statistic::Dexterity,
                Statistic::Constitution,
            ],
            StatisticGroup::Mental => &[
                Statistic::Intelligence,
                Statistic::Wisdom,
                Statistic::Charisma,
            ],
        }
    }
}

/// Modifier for a statistic value: `(value - 10) / 2`, rounded toward negative infinity.
pub fn stat_modifier(value: i32) -> i32 {
    (value - 10).div_euclid(2)
}

/// Base statistic values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Statistics {
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, stat: Statistic) -> i32 {
        match stat {
            Statistic::Strength => self.strength,
            Statistic::Dexterity => self.dexterity,
            Statistic::Constitution => self.constitution,
            Statistic::Intelligence => self.intelligence,
            Statistic::Wisdom => self.wisdom,
            Statistic::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, stat: Statistic, value: i32) {
        match stat {
            Statistic::Strength => self.strength = value,
            Statistic::Dexterity => self.dexterity = value,
            Statistic::Constitution => self.constitution = value,
            Statistic::Intelligence => self.intelligence = value,
            Statistic::Wisdom => self.wisdom = value,
            Statistic::Charisma => self.charisma = value,
        }
    }

    pub fn modifier(&self, stat: Statistic) -> i32 {
        stat_modifier(self.get(stat))
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Saving Throws
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Save {
    Fortitude,
    Reflex,
    Will,
}

impl Save {
    pub fn name(&self) -> &'static str {
        match self {
            Save::Fortitude => "Fortitude",
            Save::Reflex => "Reflex",
            Save::Will => "Will",
        }
    }

    /// The statistic whose modifier is added to this save.
    pub fn statistic(&self) -> Statistic {
        match self {
            Save::Fortitude => Statistic::Constitution,
            Save::Reflex => Statistic::Dexterity,
            Save::Will => Statistic::Wisdom,
        }
    }

    pub fn all() -> [Save; 3] {
        [Save::Fortitude, Save::Reflex, Save::Will]
    }
}

impl fmt::Display for Save {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Base saving throw totals (class progression), before statistics and items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSaves {
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
}

impl BaseSaves {
    pub fn new(fortitude: i32, reflex: i32, will: i32) -> Self {
        Self {
            fortitude,
            reflex,
            will,
        }
    }

    pub fn get(&self, save: Save) -> i32 {
        match save {
            Save::Fortitude => self.fortitude,
            Save::Reflex => self.reflex,
            Save::Will => self.will,
        }
    }
}

// ============================================================================
// Armor Class
// ============================================================================

/// Armor class bonus categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorBonus {
    Armor,
    ArmorEnhancement,
    Shield,
    ShieldEnhancement,
    Natural,
    Deflection,
    Dexterity,
    Dodge,
    Size,
    Insight,
    Luck,
    Morale,
    Sacred,
    Profane,
}

impl ArmorBonus {
    pub fn name(&self) -> &'static str {
        match self {
            ArmorBonus::Armor => "Armor",
            ArmorBonus::ArmorEnhancement => "Armor Enhancement",
            ArmorBonus::Shield => "Shield",
            ArmorBonus::ShieldEnhancement => "Shield Enhancement",
            ArmorBonus::Natural => "Natural",
            ArmorBonus::Deflection => "Deflection",
            ArmorBonus::Dexterity => "Dexterity",
            ArmorBonus::Dodge => "Dodge",
            ArmorBonus::Size => "Size",
            ArmorBonus::Insight => "Insight",
            ArmorBonus::Luck => "Luck",
            ArmorBonus::Morale => "Morale",
            ArmorBonus::Sacred => "Sacred",
            ArmorBonus::Profane => "Profane",
        }
    }

    /// Dodge bonuses from different sources add up; every other category keeps the best.
    pub fn stacks(&self) -> bool {
        matches!(self, ArmorBonus::Dodge)
    }

    /// Categories that also apply to combat maneuver defense.
    pub fn applies_to_cmd(&self) -> bool {
        matches!(
            self,
            ArmorBonus::Deflection
                | ArmorBonus::Dodge
                | ArmorBonus::Insight
                | ArmorBonus::Luck
                | ArmorBonus::Morale
                | ArmorBonus::Sacred
                | ArmorBonus::Profane
        )
    }
}

impl fmt::Display for ArmorBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Size
// ============================================================================

/// Creature sizes, smallest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Size {
    Fine,
    Diminutive,
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
    Colossal,
}

impl Size {
    pub fn all() -> [Size; 9] {
        [
            Size::Fine,
            Size::Diminutive,
            Size::Tiny,
            Size::Small,
            Size::Medium,
            Size::Large,
            Size::Huge,
            Size::Gargantuan,
            Size::Colossal,
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Size::Fine => "Fine",
            Size::Diminutive => "Diminutive",
            Size::Tiny => "Tiny",
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::Huge => "Huge",
            Size::Gargantuan => "Gargantuan",
            Size::Colossal => "Colossal",
        }
    }

    /// Signed number of categories from `self` to `other`.
    pub fn steps_to(&self, other: Size) -> i32 {
        other.index() as i32 - self.index() as i32
    }

    /// Move by `steps` categories, clamped to Fine..=Colossal.
    pub fn shifted(&self, steps: i32) -> Size {
        let sizes = Size::all();
        let index = (self.index() as i32 + steps).clamp(0, sizes.len() as i32 - 1);
        sizes[index as usize]
    }

    /// Size modifier applied to attack rolls and armor class.
    pub fn modifier(&self) -> i32 {
        match self {
            Size::Fine => 8,
            Size::Diminutive => 4,
            Size::Tiny => 2,
            Size::Small => 1,
            Size::Medium => 0,
            Size::Large => -1,
            Size::Huge => -2,
            Size::Gargantuan => -4,
            Size::Colossal => -8,
        }
    }

    /// Special size modifier applied to combat maneuvers.
    pub fn special_modifier(&self) -> i32 {
        -self.modifier()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Weapon Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    Sword,
    Axe,
    Bow,
    Hammer,
    Dagger,
    Polearm,
    Crossbow,
}

impl WeaponType {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponType::Sword => "Sword",
            WeaponType::Axe => "Axe",
            WeaponType::Bow => "Bow",
            WeaponType::Hammer => "Hammer",
            WeaponType::Dagger => "Dagger",
            WeaponType::Polearm => "Polearm",
            WeaponType::Crossbow => "Crossbow",
        }
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
