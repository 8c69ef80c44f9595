//! Dice terms for damage and bonus breakdowns.
//!
//! A [`Dice`] is either a variable term (`2d6`) or a fixed value (`sides <= 1`).
//! Lists of dice are combined into display strings such as `1d8+1d6 +7`,
//! where every flat part is folded into a single signed accumulator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("No dice specified")]
    NoDice,
}

/// A single damage or bonus term.
///
/// `sides <= 1` means the term is fixed and worth `num + modifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dice {
    pub num: i32,
    #[serde(default = "default_sides")]
    pub sides: u32,
    #[serde(default)]
    pub modifier: i32,
}

fn default_sides() -> u32 {
    1
}

impl Dice {
    /// A variable term, `num`d`sides`.
    pub const fn new(num: i32, sides: u32) -> Self {
        Self {
            num,
            sides,
            modifier: 0,
        }
    }

    /// A fixed value.
    pub const fn fixed(value: i32) -> Self {
        Self {
            num: value,
            sides: 1,
            modifier: 0,
        }
    }

    pub const fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn is_variable(&self) -> bool {
        self.sides > 1
    }

    /// The flat part of this term: `num + modifier` when fixed, `modifier` when variable.
    pub fn flat_value(&self) -> i32 {
        if self.is_variable() {
            self.modifier
        } else {
            self.num + self.modifier
        }
    }

    /// Same dice with the modifier dropped.
    pub fn without_modifier(&self) -> Self {
        Self::new(self.num, self.sides)
    }

    /// Total pip count, used when matching dice by magnitude.
    pub fn pips(&self) -> i64 {
        i64::from(self.num) * i64::from(self.sides)
    }

    /// Parse a single term: `1d8`, `d6`, `2d6+3`, `5`, `-1`.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let notation: String = notation
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if notation.is_empty() {
            return Err(DiceError::NoDice);
        }

        let Some(d_pos) = notation.find('d') else {
            let value: i32 = notation
                .parse()
                .map_err(|_| DiceError::InvalidNotation(notation.clone()))?;
            return Ok(Dice::fixed(value));
        };

        let count_str = &notation[..d_pos];
        let rest = &notation[d_pos + 1..];

        let num: i32 = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse()
                .map_err(|_| DiceError::InvalidNotation(notation.clone()))?
        };

        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(pos) => {
                let modifier: i32 = rest[pos..]
                    .parse()
                    .map_err(|_| DiceError::InvalidNotation(notation.clone()))?;
                (&rest[..pos], modifier)
            }
            None => (rest, 0),
        };

        let sides: u32 = sides_str
            .parse()
            .map_err(|_| DiceError::InvalidNotation(notation.clone()))?;
        if sides == 0 {
            return Err(DiceError::InvalidDieSize(sides));
        }

        Ok(Dice::new(num, sides).with_modifier(modifier))
    }
}

impl FromStr for Dice {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dice::parse(s)
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&combine_dice(std::slice::from_ref(self)))
    }
}

/// Combine dice into a display string.
///
/// Variable terms keep their input order and are joined with `+`; all flat
/// parts are summed and appended as a signed value when non-zero.
pub fn combine_dice<'a>(dice: impl IntoIterator<Item = &'a Dice>) -> String {
    let mut terms = Vec::new();
    let mut accumulator = 0;
    for die in dice {
        if die.is_variable() {
            terms.push(format!("{}d{}", die.num, die.sides));
        }
        accumulator += die.flat_value();
    }

    let mut out = terms.join("+");
    if accumulator != 0 {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("{accumulator:+}"));
    }
    out
}

/// Numeric flat total of a list of dice. Variable dice count only their modifier.
pub fn dice_total<'a>(dice: impl IntoIterator<Item = &'a Dice>) -> i32 {
    dice.into_iter().map(Dice::flat_value).sum()
}

/// Combine every list of a named damage mapping, in mapping order.
pub fn combine_mapping(modifiers: &IndexMap<String, Vec<Dice>>) -> String {
    combine_dice(modifiers.values().flatten())
}

/// Flat total of a named damage mapping; matches the accumulator of [`combine_mapping`].
pub fn total_modifier(modifiers: &IndexMap<String, Vec<Dice>>) -> i32 {
    dice_total(modifiers.values().flatten())
}
