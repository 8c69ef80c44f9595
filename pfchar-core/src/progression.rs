//! Weapon damage by wielder size.
//!
//! Follows the damage progression from the Pathfinder FAQ: a weapon's base
//! dice are located on a fixed table and walked up or down one size category
//! at a time.

use crate::dice::Dice;
use crate::stats::Size;
use tracing::debug;

/// The damage progression, smallest first.
pub const TABLE: [Dice; 20] = [
    Dice::new(1, 1),
    Dice::new(1, 2),
    Dice::new(1, 3),
    Dice::new(1, 4),
    Dice::new(1, 6),
    Dice::new(1, 8),
    Dice::new(1, 10),
    Dice::new(2, 6),
    Dice::new(2, 8),
    Dice::new(3, 6),
    Dice::new(3, 8),
    Dice::new(4, 6),
    Dice::new(4, 8),
    Dice::new(6, 6),
    Dice::new(6, 8),
    Dice::new(8, 6),
    Dice::new(8, 8),
    Dice::new(12, 6),
    Dice::new(12, 8),
    Dice::new(16, 6),
];

const D6_INDEX: usize = 4;
const D8_INDEX: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

fn exact_index(num: i32, sides: u32) -> Option<usize> {
    TABLE
        .iter()
        .position(|entry| entry.num == num && entry.sides == sides)
}

/// Table index for `dice`, falling back to the nearest entry when the dice
/// are not on the table.
///
/// Off-table d6 counts retry as the next lower d6 count in d8s; off-table d8
/// counts retry as the next higher d8 count in d6s. Anything else, or a retry
/// that misses, matches by total pips, ties going to the lower index.
pub fn closest_index(dice: &Dice) -> usize {
    if let Some(index) = exact_index(dice.num, dice.sides) {
        return index;
    }

    let retry = match dice.sides {
        6 => TABLE
            .iter()
            .filter(|entry| entry.sides == 6 && entry.num < dice.num)
            .map(|entry| entry.num)
            .max()
            .and_then(|num| exact_index(num, 8)),
        8 => TABLE
            .iter()
            .filter(|entry| entry.sides == 8 && entry.num > dice.num)
            .map(|entry| entry.num)
            .min()
            .and_then(|num| exact_index(num, 6)),
        _ => None,
    };
    if let Some(index) = retry {
        return index;
    }

    let pips = dice.pips();
    TABLE
        .iter()
        .enumerate()
        .min_by_key(|(index, entry)| ((entry.pips() - pips).abs(), *index))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

/// Growing doubles the step above 1d4 unless the working size is Small or
/// smaller. Shrinking doubles it above 1d8 unless the final size is Medium or
/// smaller.
fn step(index: usize, working: Size, target: Size, direction: Direction) -> usize {
    let last = TABLE.len() - 1;
    match direction {
        Direction::Up => {
            let steps = if working <= Size::Small || index < D6_INDEX {
                1
            } else {
                2
            };
            (index + steps).min(last)
        }
        Direction::Down => {
            let steps = if target <= Size::Medium || index <= D8_INDEX {
                1
            } else {
                2
            };
            index.saturating_sub(steps)
        }
    }
}

/// Resolve `dice` made for a `from`-sized creature, moved `delta` size
/// categories. A delta of zero returns the input untouched.
pub fn resolve(dice: Dice, delta: i32, from: Size) -> Dice {
    if delta == 0 {
        return dice;
    }

    let direction = if delta > 0 {
        Direction::Up
    } else {
        Direction::Down
    };
    let target = from.shifted(delta);
    let mut index = closest_index(&dice);
    let mut size = from;
    for _ in 0..delta.unsigned_abs() {
        index = step(index, size, target, direction);
        size = size.shifted(if delta > 0 { 1 } else { -1 });
    }

    let resolved = TABLE[index];
    debug!(from = %dice, to = %resolved, delta, size = %from, "resolved damage progression");
    resolved
}
