//! Runtime statuses: named bundles of modifiers created while playing
//! (a spell buff, a temporary penalty).

use super::{Effect, EffectKind};
use crate::dice::Dice;
use crate::stats::{ArmorBonus, Save, Statistic, StatisticGroup};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a status was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("Status name is required")]
    EmptyName,
    #[error("Status name must be unique: {0}")]
    DuplicateName(String),
    #[error("Status {0} needs at least one non-default value")]
    NoContribution(String),
}

/// Every contribution a status can carry. All fields default to "nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub attack: i32,
    pub damage: i32,
    /// Extra damage dice; the flat `damage` is folded into the first one.
    pub dice: Vec<Dice>,
    pub statistics: IndexMap<Statistic, i32>,
    pub saves: IndexMap<Save, i32>,
    pub armor_class: IndexMap<ArmorBonus, i32>,
    pub size_change: i32,
}

impl Status {
    pub fn has_contribution(&self) -> bool {
        self.attack != 0
            || self.damage != 0
            || !self.dice.is_empty()
            || self.statistics.values().any(|v| *v != 0)
            || self.saves.values().any(|v| *v != 0)
            || self.armor_class.values().any(|v| *v != 0)
            || self.size_change != 0
    }

    /// Damage dice with `extra` (e.g. a Strength shift) added to the flat damage.
    pub fn damage_dice(&self, extra: i32) -> Vec<Dice> {
        let flat = self.damage + extra;
        let mut dice = self.dice.clone();
        match dice.first_mut() {
            Some(first) => first.modifier += flat,
            None if flat != 0 => dice.push(Dice::fixed(flat)),
            None => {}
        }
        dice
    }
}

/// Builds a status effect; zero-valued entries are dropped.
///
/// ```
/// use pfchar_core::effects::StatusBuilder;
///
/// let heroism = StatusBuilder::new("Heroism")
///     .attack(2)
///     .all_saves(2)
///     .build();
/// assert_eq!(heroism.name, "Heroism");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBuilder {
    name: String,
    status: Status,
}

impl StatusBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Status::default(),
        }
    }

    pub fn attack(mut self, value: i32) -> Self {
        self.status.attack = value;
        self
    }

    pub fn damage(mut self, value: i32) -> Self {
        self.status.damage = value;
        self
    }

    pub fn damage_dice(mut self, dice: Dice) -> Self {
        self.status.dice.push(dice);
        self
    }

    pub fn statistic(mut self, stat: Statistic, value: i32) -> Self {
        if value != 0 {
            self.status.statistics.insert(stat, value);
        }
        self
    }

    pub fn statistics(mut self, group: StatisticGroup, value: i32) -> Self {
        for stat in group.members() {
            self = self.statistic(*stat, value);
        }
        self
    }

    pub fn save(mut self, save: Save, value: i32) -> Self {
        if value != 0 {
            self.status.saves.insert(save, value);
        }
        self
    }

    pub fn all_saves(mut self, value: i32) -> Self {
        for save in Save::all() {
            self = self.save(save, value);
        }
        self
    }

    pub fn armor_class(mut self, category: ArmorBonus, value: i32) -> Self {
        if value != 0 {
            self.status.armor_class.insert(category, value);
        }
        self
    }

    pub fn size_change(mut self, steps: i32) -> Self {
        self.status.size_change = steps;
        self
    }

    /// The status as an always-on effect. The name is trimmed; validation
    /// against other statuses happens when it is added to a character.
    pub fn build(self) -> Effect {
        Effect::new(self.name.trim(), EffectKind::Status(self.status))
    }
}
