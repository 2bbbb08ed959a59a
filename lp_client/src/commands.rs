use std::fmt;

use luigi_poker::entities::HAND_SIZE;

/// Everything a player can type at the table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Deal the next round without waiting.
    Deal,
    /// Toggle these hand slots (0-based) in or out of the exchange.
    Select(Vec<usize>),
    /// Exchange the selected cards.
    Exchange,
    /// Keep the hand as it is.
    Stand,
    Raise,
    Lower,
    /// Finish the round and compare hands.
    Validate,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A card number that isn't 1 through 5.
    InvalidCardNumber(String),
    /// `select` with nothing after it.
    MissingCardNumber,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCardNumber(value) => write!(
                f,
                "Invalid card '{value}'. Cards are numbered 1 to {HAND_SIZE} (e.g., 'select 2 4')"
            ),
            Self::MissingCardNumber => {
                write!(f, "Select which cards? (e.g., 'select 1 3')")
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
  1-5 | select N [N ...]   toggle cards for the exchange
  exchange | x             swap the selected cards
  stand | s                keep your hand
  raise | +                raise the wager (before the exchange)
  lower | -                lower the wager (before the exchange)
  validate | v             show down
  deal | d                 deal the next round now
  help | h                 show this help
  quit | q                 leave the table";

/// Parse a line of input into a [`Command`].
///
/// Card numbers are typed 1 through 5 and come back as 0-based slots.
///
/// # Examples
///
/// ```
/// use lp_client::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("stand"), Ok(Command::Stand));
/// assert_eq!(parse_command("3"), Ok(Command::Select(vec![2])));
/// assert_eq!(parse_command("select 1 5"), Ok(Command::Select(vec![0, 4])));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    match trimmed {
        "deal" | "d" => return Ok(Command::Deal),
        "exchange" | "x" => return Ok(Command::Exchange),
        "stand" | "s" => return Ok(Command::Stand),
        "raise" | "+" => return Ok(Command::Raise),
        "lower" | "-" => return Ok(Command::Lower),
        "validate" | "v" => return Ok(Command::Validate),
        "help" | "h" | "?" => return Ok(Command::Help),
        "quit" | "q" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"select") => parse_card_numbers(&parts[1..]),
        Some(first) if first.starts_with(|c: char| c.is_ascii_digit()) => {
            parse_card_numbers(&parts)
        }
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse "1 3 5" into slots [0, 2, 4].
fn parse_card_numbers(parts: &[&str]) -> Result<Command, ParseError> {
    if parts.is_empty() {
        return Err(ParseError::MissingCardNumber);
    }
    parts
        .iter()
        .map(|value| match value.parse::<usize>() {
            Ok(n) if (1..=HAND_SIZE).contains(&n) => Ok(n - 1),
            _ => Err(ParseError::InvalidCardNumber((*value).to_string())),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Command::Select)
}
