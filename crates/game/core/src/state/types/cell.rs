use super::{Position, TokenColor, TokenId};

/// A grid position that holds at most one token.
///
/// `satisfied` is derived state. The grid recomputes it every time the
/// contained token changes, so it is never stale between commands.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    position: Position,
    goal: Option<TokenColor>,
    token: Option<TokenId>,
    satisfied: bool,
}

impl Cell {
    pub(crate) fn new(position: Position, goal: Option<TokenColor>) -> Self {
        Self {
            position,
            goal,
            token: None,
            satisfied: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Color this cell requires, if it is a goal cell.
    pub fn goal(&self) -> Option<&TokenColor> {
        self.goal.as_ref()
    }

    pub fn is_goal(&self) -> bool {
        self.goal.is_some()
    }

    pub fn token(&self) -> Option<TokenId> {
        self.token
    }

    pub fn is_occupied(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    pub(crate) fn set_token(&mut self, token: Option<TokenId>) {
        self.token = token;
    }

    /// Recomputes satisfaction against the contained token's color.
    ///
    /// Returns true when the value changed.
    pub(crate) fn refresh_satisfaction(&mut self, contained: Option<&TokenColor>) -> bool {
        let satisfied = match (&self.goal, contained) {
            (Some(goal), Some(color)) => goal == color,
            _ => false,
        };
        let changed = satisfied != self.satisfied;
        self.satisfied = satisfied;
        changed
    }
}
