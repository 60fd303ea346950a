//! Cheat-code validation.
//!
//! A cheat code has the shape of a Canadian postal code (`A1B 2C3`). A
//! valid, unused code finishes the current level with a penalised score.

use crate::error::{ErrorSeverity, GameError};

/// Letters allowed in the first position.
const LEADING_LETTERS: &str = "ABCEGHJKLMNPRSTVXY";
/// Letters allowed in every later letter position.
const TRAILING_LETTERS: &str = "ABCEGHJKLMNPRSTVWXYZ";

/// Reasons a cheat submission is refused. None of them change the game.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CheatRejection {
    #[error("Must be in game.")]
    NotInGame,

    #[error("Must not be between levels.")]
    BetweenLevels,

    #[error("Cheat code is empty.")]
    Empty,

    #[error("Cheat code must be a valid postal code.")]
    Malformed,

    #[error("Cheat codes can not be reused.")]
    AlreadyUsed,
}

impl GameError for CheatRejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CheatRejection::NotInGame | CheatRejection::BetweenLevels => {
                ErrorSeverity::Recoverable
            }
            CheatRejection::Empty | CheatRejection::Malformed | CheatRejection::AlreadyUsed => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CheatRejection::NotInGame => "CHEAT_NOT_IN_GAME",
            CheatRejection::BetweenLevels => "CHEAT_BETWEEN_LEVELS",
            CheatRejection::Empty => "CHEAT_EMPTY",
            CheatRejection::Malformed => "CHEAT_MALFORMED",
            CheatRejection::AlreadyUsed => "CHEAT_ALREADY_USED",
        }
    }
}

/// A well-formed cheat code in canonical form: uppercase, no separator.
///
/// `"h3h 4h4"` and `"H3H4H4"` parse to the same code, so reuse checks are
/// insensitive to case and spacing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheatCode(String);

impl CheatCode {
    pub fn parse(input: &str) -> Result<Self, CheatRejection> {
        if input.is_empty() {
            return Err(CheatRejection::Empty);
        }

        let chars: Vec<char> = input.chars().collect();
        let (head, tail) = match chars.len() {
            6 => (&chars[..3], &chars[3..]),
            7 if chars[3].is_whitespace() => (&chars[..3], &chars[4..]),
            _ => return Err(CheatRejection::Malformed),
        };

        let mut canonical = String::with_capacity(6);
        for (index, ch) in head.iter().chain(tail).enumerate() {
            let upper = ch.to_ascii_uppercase();
            let valid = match index {
                0 => LEADING_LETTERS.contains(upper),
                1 | 3 | 5 => upper.is_ascii_digit(),
                _ => TRAILING_LETTERS.contains(upper),
            };
            if !valid {
                return Err(CheatRejection::Malformed);
            }
            canonical.push(upper);
        }

        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CheatCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", &self.0[..3], &self.0[3..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_postal_codes_with_or_without_space() {
        let spaced = CheatCode::parse("h3h 4h4").unwrap();
        let packed = CheatCode::parse("H3H4H4").unwrap();
        assert_eq!(spaced, packed);
        assert_eq!(spaced.as_str(), "H3H4H4");
        assert_eq!(spaced.to_string(), "H3H 4H4");
        assert!(CheatCode::parse("k1a\t0b1").is_ok());
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(CheatCode::parse(""), Err(CheatRejection::Empty));
    }

    #[test]
    fn rejects_malformed_codes() {
        for input in [
            "D3H 4H4",  // D never leads
            "W3H 4H4",  // W only trails
            "H3D 4H4",  // D never trails
            "H3H  4H4", // one separator at most
            "H3H-4H4",
            "33H 4H4",
            "H3H 4H",
            " H3H4H4",
            "H3H4H4 ",
        ] {
            assert_eq!(CheatCode::parse(input), Err(CheatRejection::Malformed), "{input}");
        }
    }

    #[test]
    fn trailing_positions_allow_w_and_z() {
        assert!(CheatCode::parse("A1W 2Z3").is_ok());
    }
}
