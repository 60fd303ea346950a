//! Token colors and the movement class each color selects.
//!
//! Color doubles as visual skin and movement rule selector. The table in
//! [`TokenColor::movement_class`] is total: adding a color only means adding
//! a row there.

use std::fmt;
use std::str::FromStr;

/// How a token of a given color is allowed to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementClass {
    /// One step in any of the eight directions onto an empty cell.
    Bounded,
    /// Swaps with any other token on the grid, regardless of distance.
    Swap,
    /// Never the source of a move.
    Immovable,
}

/// Color carried by a token, or required by a goal cell.
///
/// Names are parsed case-insensitively. Any name other than the three
/// classified colors becomes an [`TokenColor::Inert`] obstacle color, so a
/// level can introduce decorative tokens without code changes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TokenColor {
    Yellow,
    Magenta,
    Cyan,
    #[strum(default)]
    Inert(String),
}

impl TokenColor {
    /// Parses a color name from level data. Blank names mean "no color".
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        match TokenColor::from_str(name) {
            Ok(TokenColor::Inert(other)) => Some(TokenColor::Inert(other.to_ascii_lowercase())),
            Ok(color) => Some(color),
            Err(_) => Some(TokenColor::Inert(name.to_ascii_lowercase())),
        }
    }

    pub fn inert(name: impl Into<String>) -> Self {
        TokenColor::Inert(name.into().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        match self {
            TokenColor::Yellow => "yellow",
            TokenColor::Magenta => "magenta",
            TokenColor::Cyan => "cyan",
            TokenColor::Inert(name) => name,
        }
    }

    pub const fn movement_class(&self) -> MovementClass {
        match self {
            TokenColor::Yellow => MovementClass::Bounded,
            TokenColor::Magenta => MovementClass::Swap,
            TokenColor::Cyan | TokenColor::Inert(_) => MovementClass::Immovable,
        }
    }
}

impl fmt::Display for TokenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TokenColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TokenColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        TokenColor::parse(&name)
            .ok_or_else(|| serde::de::Error::custom("color name must not be blank"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_classified_colors_case_insensitively() {
        assert_eq!(TokenColor::parse("Yellow"), Some(TokenColor::Yellow));
        assert_eq!(TokenColor::parse("MAGENTA"), Some(TokenColor::Magenta));
        assert_eq!(TokenColor::parse(" cyan "), Some(TokenColor::Cyan));
    }

    #[test]
    fn unknown_names_become_inert() {
        assert_eq!(TokenColor::parse("Red"), Some(TokenColor::inert("red")));
        assert_eq!(
            TokenColor::parse("red").map(|color| color.movement_class()),
            Some(MovementClass::Immovable)
        );
    }

    #[test]
    fn blank_name_is_no_color() {
        assert_eq!(TokenColor::parse(""), None);
        assert_eq!(TokenColor::parse("   "), None);
    }

    #[test]
    fn movement_table_is_total() {
        assert_eq!(TokenColor::Yellow.movement_class(), MovementClass::Bounded);
        assert_eq!(TokenColor::Magenta.movement_class(), MovementClass::Swap);
        assert_eq!(TokenColor::Cyan.movement_class(), MovementClass::Immovable);
        assert_eq!(
            TokenColor::inert("stone").movement_class(),
            MovementClass::Immovable
        );
    }
}
