//! Critical hit threat range, multiplier and extra critical damage.

use crate::dice::Dice;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Critical hit behaviour of an attack.
///
/// Values are never modified in place: every effect that changes the critical
/// produces a new value from the one it is handed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalBonus {
    /// Lowest natural roll that threatens.
    pub crit_range: i32,
    pub crit_multiplier: i32,
    /// Extra dice rolled only on a confirmed critical.
    pub damage_bonus: Vec<Dice>,
}

impl CriticalBonus {
    pub fn new(crit_range: i32, crit_multiplier: i32) -> Self {
        Self {
            crit_range,
            crit_multiplier,
            damage_bonus: Vec::new(),
        }
    }

    pub fn with_damage(mut self, dice: impl IntoIterator<Item = Dice>) -> Self {
        self.damage_bonus.extend(dice);
        self
    }

    /// Double the threat range: 20 becomes 19-20, 19-20 becomes 17-20.
    pub fn doubled_range(&self) -> Self {
        Self {
            crit_range: 21 - (21 - self.crit_range) * 2,
            crit_multiplier: self.crit_multiplier,
            damage_bonus: self.damage_bonus.clone(),
        }
    }
}

impl Default for CriticalBonus {
    fn default() -> Self {
        Self::new(20, 2)
    }
}

impl fmt::Display for CriticalBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::crit_to_string(self))
    }
}
