//! Text rendering of derived values and the combat sheet snapshot.

use crate::character::{Character, BAB_KEY};
use crate::critical::CriticalBonus;
use crate::dice::{combine_dice, combine_mapping, Dice};
use crate::stats::{stat_modifier, ArmorBonus, Save, Size, Statistic};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

pub const BASE_AC: i32 = 10;

/// Categories that do not count against touch attacks.
pub const IGNORE_TOUCH: [ArmorBonus; 3] =
    [ArmorBonus::Natural, ArmorBonus::Armor, ArmorBonus::Shield];

/// Categories lost when flat-footed.
pub const IGNORE_FLAT_FOOTED: [ArmorBonus; 2] = [ArmorBonus::Dexterity, ArmorBonus::Dodge];

/// `20/x2`, `19-20/x2`, `20/x3 (+2d6)`.
pub fn crit_to_string(critical: &CriticalBonus) -> String {
    let range = if critical.crit_range == 20 {
        "20".to_string()
    } else {
        format!("{}-20", critical.crit_range)
    };
    let mut out = format!("{range}/x{}", critical.crit_multiplier);
    if !critical.damage_bonus.is_empty() {
        out.push_str(&format!(" (+{})", combine_dice(&critical.damage_bonus)));
    }
    out
}

/// Full attack sequence, e.g. `+24/+19/+14/+9`: one extra attack at -5 for
/// every 5 points of base attack bonus above 5.
pub fn to_attack_string(attack: &IndexMap<String, i32>) -> String {
    let total: i32 = attack.values().sum();
    let mut bab = attack.get(BAB_KEY).copied().unwrap_or(0);
    let mut attacks = vec![total];
    while bab > 5 {
        bab -= 5;
        attacks.push(total - 5 * attacks.len() as i32);
    }
    attacks
        .iter()
        .map(|attack| format!("{attack:+}"))
        .collect::<Vec<_>>()
        .join("/")
}

pub fn total_ac(bonuses: &IndexMap<ArmorBonus, i32>) -> i32 {
    BASE_AC + bonuses.values().sum::<i32>()
}

pub fn touch_ac(bonuses: &IndexMap<ArmorBonus, i32>) -> i32 {
    ac_excluding(bonuses, &IGNORE_TOUCH)
}

pub fn flat_footed_ac(bonuses: &IndexMap<ArmorBonus, i32>) -> i32 {
    ac_excluding(bonuses, &IGNORE_FLAT_FOOTED)
}

fn ac_excluding(bonuses: &IndexMap<ArmorBonus, i32>, ignored: &[ArmorBonus]) -> i32 {
    BASE_AC
        + bonuses
            .iter()
            .filter(|(category, _)| !ignored.contains(category))
            .map(|(_, value)| value)
            .sum::<i32>()
}

// ============================================================================
// Combat sheet
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticLine {
    pub statistic: Statistic,
    pub base: i32,
    pub modified: i32,
}

impl fmt::Display for StatisticLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({:+})",
            self.statistic,
            self.base,
            stat_modifier(self.base)
        )?;
        if self.modified != self.base {
            write!(f, " -> {} ({:+})", self.modified, stat_modifier(self.modified))?;
        }
        Ok(())
    }
}

/// Weapon-dependent part of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offense {
    pub weapon: String,
    pub attack: IndexMap<String, i32>,
    pub damage: IndexMap<String, Vec<Dice>>,
    pub critical: CriticalBonus,
}

impl Offense {
    pub fn attack_string(&self) -> String {
        to_attack_string(&self.attack)
    }

    /// `1d8+1d6 +24/19-20/x3 (+2d10)`
    pub fn damage_string(&self) -> String {
        format!(
            "{}/{}",
            combine_mapping(&self.damage),
            crit_to_string(&self.critical)
        )
    }
}

/// Snapshot of every derived value of a character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatSheet {
    pub name: String,
    pub level: i32,
    pub size: Size,
    pub statistics: Vec<StatisticLine>,
    pub two_handed: bool,
    /// `None` without a weapon in the main hand.
    pub offense: Option<Offense>,
    pub armour: IndexMap<ArmorBonus, i32>,
    pub dex_capped: bool,
    pub armor_check_penalty: i32,
    pub cmb: IndexMap<String, i32>,
    pub cmd: IndexMap<String, i32>,
    pub saves: IndexMap<Save, IndexMap<String, i32>>,
    pub toggles: Vec<(String, bool)>,
    pub statuses: Vec<String>,
}

impl CombatSheet {
    pub fn new(character: &Character) -> Self {
        let offense = match (
            character.main_hand.as_ref(),
            character.attack_bonus(),
            character.damage_bonus(),
            character.critical_bonus(),
        ) {
            (Some(weapon), Ok(attack), Ok(damage), Ok(critical)) => Some(Offense {
                weapon: weapon.name.clone(),
                attack,
                damage,
                critical,
            }),
            _ => None,
        };

        Self {
            name: character.name.clone(),
            level: character.level,
            size: character.size(),
            statistics: Statistic::all()
                .into_iter()
                .map(|statistic| StatisticLine {
                    statistic,
                    base: character.statistics.get(statistic),
                    modified: character.modified_statistic(statistic),
                })
                .collect(),
            two_handed: character.is_two_handed(),
            offense,
            armour: character.armour_bonuses(),
            dex_capped: character.is_dex_capped(),
            armor_check_penalty: character.armor_check_penalty(),
            cmb: character.cmb(),
            cmd: character.cmd(),
            saves: character.saves(),
            toggles: character.toggles(),
            statuses: character
                .statuses
                .iter()
                .map(|status| status.name.clone())
                .collect(),
        }
    }

    pub fn total_ac(&self) -> i32 {
        total_ac(&self.armour)
    }

    pub fn touch_ac(&self) -> i32 {
        touch_ac(&self.armour)
    }

    pub fn flat_footed_ac(&self) -> i32 {
        flat_footed_ac(&self.armour)
    }
}

fn write_breakdown(f: &mut fmt::Formatter<'_>, modifiers: &IndexMap<String, i32>) -> fmt::Result {
    for (name, value) in modifiers {
        writeln!(f, "  {name}: {value:+}")?;
    }
    Ok(())
}

impl fmt::Display for CombatSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (level {}, {})", self.name, self.level, self.size)?;

        writeln!(f, "Statistics")?;
        for line in &self.statistics {
            writeln!(f, "  {line}")?;
        }

        writeln!(
            f,
            "Two Handed: {}",
            if self.two_handed { "on" } else { "off" }
        )?;

        match &self.offense {
            Some(offense) => {
                writeln!(f, "To Hit {}", offense.attack_string())?;
                write_breakdown(f, &offense.attack)?;
                writeln!(f, "Damage {}", offense.damage_string())?;
                for (name, dice) in &offense.damage {
                    writeln!(f, "  {name}: {}", combine_dice(dice))?;
                }
            }
            None => writeln!(f, "No weapon in main hand")?,
        }

        writeln!(
            f,
            "AC: {} (touch: {}, flat-footed: {})",
            self.total_ac(),
            self.touch_ac(),
            self.flat_footed_ac()
        )?;
        for (category, value) in &self.armour {
            if *category == ArmorBonus::Dexterity && self.dex_capped {
                writeln!(f, "  {category}: {value:+} (capped)")?;
            } else {
                writeln!(f, "  {category}: {value:+}")?;
            }
        }
        if self.armor_check_penalty != 0 {
            writeln!(f, "Armor Check Penalty: {:+}", self.armor_check_penalty)?;
        }

        writeln!(f, "CMB {:+}", self.cmb.values().sum::<i32>())?;
        write_breakdown(f, &self.cmb)?;
        writeln!(f, "CMD {:+}", self.cmd.values().sum::<i32>())?;
        write_breakdown(f, &self.cmd)?;
        for (save, modifiers) in &self.saves {
            writeln!(f, "{save} {:+}", modifiers.values().sum::<i32>())?;
            write_breakdown(f, modifiers)?;
        }

        if !self.toggles.is_empty() {
            writeln!(f, "Toggles")?;
            for (name, enabled) in &self.toggles {
                writeln!(f, "  {name}: {}", if *enabled { "on" } else { "off" })?;
            }
        }

        if self.statuses.is_empty() {
            writeln!(f, "No statuses active")?;
        } else {
            writeln!(f, "Statuses")?;
            for (index, name) in self.statuses.iter().enumerate() {
                writeln!(f, "  {index}: {name}")?;
            }
        }
        Ok(())
    }
}
