//! Prompt command parsing.
//!
//! Positions are typed as `x y` (column, row), zero-based from the top-left.
use puzzle_core::Position;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Start,
    Restart,
    /// Drag the token at `from` onto `to`.
    Move { from: Position, to: Position },
    /// Tap a cell; taps on a token select or swap it.
    Tap(Position),
    Clear,
    Cheat(String),
    Show,
    Scores,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("`{0}` is not a coordinate")]
    Coordinate(String),
}

pub const HELP: &str = "\
commands:
  start                 start a new game at level 1
  restart               rebuild the current level
  move <x> <y> <x> <y>  drag the token at the first cell onto the second
  tap <x> <y>           tap a cell (select, then tap a highlighted target)
  clear                 drop the current selection
  cheat <code>          submit a cheat code, e.g. `cheat H3H 4H4`
  show                  print the board
  scores                list finished games
  quit                  leave";

impl Input {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Ok(Input::Show);
        };

        match keyword.to_ascii_lowercase().as_str() {
            "start" | "new" => Ok(Input::Start),
            "restart" | "r" => Ok(Input::Restart),
            "move" | "m" => {
                let coords = coordinates(words, "move <x> <y> <x> <y>")?;
                let [fx, fy, tx, ty] = coords.as_slice() else {
                    return Err(ParseError::Usage("move <x> <y> <x> <y>"));
                };
                Ok(Input::Move {
                    from: Position::new(*fx, *fy),
                    to: Position::new(*tx, *ty),
                })
            }
            "tap" | "t" => {
                let coords = coordinates(words, "tap <x> <y>")?;
                let [x, y] = coords.as_slice() else {
                    return Err(ParseError::Usage("tap <x> <y>"));
                };
                Ok(Input::Tap(Position::new(*x, *y)))
            }
            "clear" | "c" => Ok(Input::Clear),
            "cheat" => {
                // Keep the rest of the line verbatim; the game normalises it.
                let code = line.trim_start()[keyword.len()..].trim();
                Ok(Input::Cheat(code.to_string()))
            }
            "show" | "s" => Ok(Input::Show),
            "scores" => Ok(Input::Scores),
            "help" | "?" => Ok(Input::Help),
            "quit" | "exit" | "q" => Ok(Input::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

fn coordinates<'a>(
    words: impl Iterator<Item = &'a str>,
    usage: &'static str,
) -> Result<Vec<i32>, ParseError> {
    let coords = words
        .map(|word| {
            word.parse::<i32>()
                .map_err(|_| ParseError::Coordinate(word.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if coords.is_empty() {
        return Err(ParseError::Usage(usage));
    }
    Ok(coords)
}
