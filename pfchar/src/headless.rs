//! Line-oriented play mode.
//!
//! Reads one command per line from stdin and prints the result:
//! - `#sheet` prints the full combat sheet
//! - `#toggle <name>` flips a feat, item, status or enchantment
//! - `#status add <name> key=value...` adds a runtime status
//! - everything else is listed by `#help`

use anyhow::{anyhow, bail, Context, Result};
use pfchar_core::stats::StatisticGroup;
use pfchar_core::{ArmorBonus, Character, CombatSheet, Dice, Save, StatusBuilder, Statistic};
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  #sheet                           - Print the combat sheet
  #two-handed                      - Switch between one and two hands
  #toggle <name>                   - Flip a toggleable effect
  #status add <name> key=value...  - Add a status
  #status rm <index>               - Remove a status
  #statuses                        - List active statuses
  #help                            - Show this help
  #quit                            - Exit

Status keys:
  attack, damage, dice (e.g. dice=2d6), size,
  str, dex, con, int, wis, cha, all, physical, mental,
  fort, ref, will, saves,
  armor, shield, natural, deflection, dodge, insight, luck, morale, sacred, profane";

/// A parsed play-mode command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Sheet,
    TwoHanded,
    Toggle(String),
    AddStatus(StatusBuilder),
    RemoveStatus(usize),
    Statuses,
    Help,
    Quit,
}

/// Parse one input line. Lines must start with `#`.
pub fn parse_command(line: &str) -> Result<Command> {
    let body = line
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| anyhow!("Commands start with '#', try #help"))?;
    let mut parts = body.split_whitespace();
    let command = match parts.next() {
        Some("sheet") => Command::Sheet,
        Some("two-handed") => Command::TwoHanded,
        Some("toggle") => {
            let name = parts.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                bail!("Usage: #toggle <name>");
            }
            Command::Toggle(name)
        }
        Some("status") => match parts.next() {
            Some("add") => Command::AddStatus(parse_status(parts)?),
            Some("rm") | Some("remove") => {
                let index = parts.next().ok_or_else(|| anyhow!("Usage: #status rm <index>"))?;
                let index = index
                    .parse()
                    .with_context(|| format!("Invalid status index: {index}"))?;
                Command::RemoveStatus(index)
            }
            _ => bail!("Usage: #status add <name> key=value... | #status rm <index>"),
        },
        Some("statuses") => Command::Statuses,
        Some("help") => Command::Help,
        Some("quit") | Some("exit") => Command::Quit,
        Some(other) => bail!("Unknown command: #{other}"),
        None => bail!("Empty command, try #help"),
    };
    Ok(command)
}

/// Words before the first `key=value` pair form the status name.
fn parse_status<'a>(parts: impl Iterator<Item = &'a str>) -> Result<StatusBuilder> {
    let mut name = Vec::new();
    let mut pairs = Vec::new();
    for part in parts {
        match part.split_once('=') {
            Some(pair) => pairs.push(pair),
            None if pairs.is_empty() => name.push(part),
            None => bail!("Expected key=value, got {part}"),
        }
    }

    let mut builder = StatusBuilder::new(name.join(" "));
    for (key, value) in pairs {
        let key = key.to_lowercase();
        if key == "dice" {
            builder = builder.damage_dice(Dice::parse(value)?);
            continue;
        }
        let value: i32 = value
            .parse()
            .with_context(|| format!("Invalid value for {key}: {value}"))?;
        builder = apply_key(builder, &key, value)?;
    }
    Ok(builder)
}

fn apply_key(builder: StatusBuilder, key: &str, value: i32) -> Result<StatusBuilder> {
    let builder = match key {
        "attack" => builder.attack(value),
        "damage" => builder.damage(value),
        "size" => builder.size_change(value),
        "all" => builder.statistics(StatisticGroup::All, value),
        "physical" => builder.statistics(StatisticGroup::Physical, value),
        "mental" => builder.statistics(StatisticGroup::Mental, value),
        "fort" | "fortitude" => builder.save(Save::Fortitude, value),
        "ref" | "reflex" => builder.save(Save::Reflex, value),
        "will" => builder.save(Save::Will, value),
        "saves" => builder.all_saves(value),
        _ => {
            if let Some(stat) = Statistic::all()
                .into_iter()
                .find(|stat| stat.abbreviation().eq_ignore_ascii_case(key))
            {
                builder.statistic(stat, value)
            } else if let Some(category) = armor_category(key) {
                builder.armor_class(category, value)
            } else {
                bail!("Unknown status key: {key}");
            }
        }
    };
    Ok(builder)
}

fn armor_category(key: &str) -> Option<ArmorBonus> {
    let category = match key {
        "armor" => ArmorBonus::Armor,
        "shield" => ArmorBonus::Shield,
        "natural" => ArmorBonus::Natural,
        "deflection" => ArmorBonus::Deflection,
        "dodge" => ArmorBonus::Dodge,
        "insight" => ArmorBonus::Insight,
        "luck" => ArmorBonus::Luck,
        "morale" => ArmorBonus::Morale,
        "sacred" => ArmorBonus::Sacred,
        "profane" => ArmorBonus::Profane,
        _ => return None,
    };
    Some(category)
}

/// Apply a command and return the text to print. `Quit` yields nothing.
pub fn execute(character: &mut Character, command: Command) -> Result<String> {
    debug!(?command, "executing");
    let output = match command {
        Command::Sheet => CombatSheet::new(character).to_string(),
        Command::TwoHanded => {
            if character.toggle_two_handed() {
                let grip = if character.is_two_handed() { "on" } else { "off" };
                format!("[TWO HANDED] {grip}")
            } else {
                bail!("{} cannot wield the main hand two-handed", character.name);
            }
        }
        Command::Toggle(name) => {
            let enabled = character.flip_toggle(&name)?;
            format!("[TOGGLE] {name}: {}", if enabled { "on" } else { "off" })
        }
        Command::AddStatus(builder) => {
            let status = builder.build();
            let name = status.name.trim().to_string();
            character.add_status(status)?;
            format!("[STATUS] Added {name}")
        }
        Command::RemoveStatus(index) => {
            let status = character.remove_status(index)?;
            format!("[STATUS] Removed {}", status.name)
        }
        Command::Statuses => list_statuses(character),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    Ok(output)
}

fn list_statuses(character: &Character) -> String {
    if character.statuses.is_empty() {
        return "No statuses active".to_string();
    }
    character
        .statuses
        .iter()
        .enumerate()
        .map(|(index, status)| format!("  {index}: {}", status.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run the play loop until `#quit` or end of input.
pub fn run(mut character: Character) -> Result<()> {
    info!(character = %character.name, "starting play mode");
    println!("=== {} ===", character.name);
    println!("{}", CombatSheet::new(&character));
    println!();
    println!("Type #help for commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("Error reading input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_command(line) {
            Ok(Command::Quit) => {
                println!("Goodbye!");
                break;
            }
            Ok(command) => match execute(&mut character, command) {
                Ok(output) => println!("{output}"),
                Err(e) => println!("[ERROR] {e}"),
            },
            Err(e) => println!("[ERROR] {e}"),
        }
        stdout.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pfchar_core::testing::{sample_hammer_fighter, total};

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("#sheet").unwrap(), Command::Sheet);
        assert_eq!(parse_command("  #two-handed ").unwrap(), Command::TwoHanded);
        assert_eq!(parse_command("#statuses").unwrap(), Command::Statuses);
        assert_eq!(parse_command("#exit").unwrap(), Command::Quit);
        assert!(parse_command("sheet").is_err());
        assert!(parse_command("#dance").is_err());
    }

    #[test]
    fn test_parse_toggle_keeps_spaces() {
        assert_eq!(
            parse_command("#toggle Power Attack").unwrap(),
            Command::Toggle("Power Attack".to_string())
        );
        assert!(parse_command("#toggle").is_err());
    }

    #[test]
    fn test_parse_status_add() {
        let command = parse_command("#status add Enlarge Person str=2 dex=-2 size=1").unwrap();
        let expected = StatusBuilder::new("Enlarge Person")
            .statistic(Statistic::Strength, 2)
            .statistic(Statistic::Dexterity, -2)
            .size_change(1);
        assert_eq!(command, Command::AddStatus(expected));
    }

    #[test]
    fn test_parse_status_keys() {
        let command =
            parse_command("#status add Prayer attack=1 damage=1 saves=1 dice=1d6 deflection=2")
                .unwrap();
        let expected = StatusBuilder::new("Prayer")
            .attack(1)
            .damage(1)
            .all_saves(1)
            .damage_dice(Dice::new(1, 6))
            .armor_class(ArmorBonus::Deflection, 2);
        assert_eq!(command, Command::AddStatus(expected));
    }

    #[test]
    fn test_parse_status_errors() {
        assert!(parse_command("#status add Bless attack=one").is_err());
        assert!(parse_command("#status add Bless luck=1 extra").is_err());
        assert!(parse_command("#status add Bless speed=30").is_err());
        assert!(parse_command("#status rm").is_err());
        assert!(parse_command("#status rm first").is_err());
        assert_eq!(
            parse_command("#status rm 2").unwrap(),
            Command::RemoveStatus(2)
        );
    }

    #[test]
    fn test_execute_status_lifecycle() {
        let mut character = sample_hammer_fighter();
        let base = total(&character.attack_bonus().unwrap());

        let add = parse_command("#status add Bless attack=1").unwrap();
        assert_eq!(execute(&mut character, add).unwrap(), "[STATUS] Added Bless");
        assert_eq!(total(&character.attack_bonus().unwrap()), base + 1);
        assert_eq!(
            execute(&mut character, Command::Statuses).unwrap(),
            "  0: Bless"
        );

        let again = parse_command("#status add Bless attack=1").unwrap();
        assert!(execute(&mut character, again).is_err());

        let empty = parse_command("#status add Nothing").unwrap();
        assert!(execute(&mut character, empty).is_err());

        assert_eq!(
            execute(&mut character, Command::RemoveStatus(0)).unwrap(),
            "[STATUS] Removed Bless"
        );
        assert!(execute(&mut character, Command::RemoveStatus(0)).is_err());
        assert_eq!(
            execute(&mut character, Command::Statuses).unwrap(),
            "No statuses active"
        );
    }

    #[test]
    fn test_execute_toggles() {
        let mut character = sample_hammer_fighter();
        let output = execute(&mut character, Command::Toggle("Power Attack".into())).unwrap();
        assert_eq!(output, "[TOGGLE] Power Attack: on");
        assert!(execute(&mut character, Command::Toggle("Nonexistent".into())).is_err());

        let output = execute(&mut character, Command::TwoHanded).unwrap();
        assert_eq!(output, "[TWO HANDED] on");
    }
}
