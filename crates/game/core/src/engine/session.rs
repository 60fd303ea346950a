//! One playthrough of one level: grid, move counter and clock.

use crate::action::{MoveAction, MoveKind, is_level_won};
use crate::event::GameEvent;
use crate::state::{Grid, GridError, LevelDefinition, Timestamp};

use super::errors::SessionError;
use super::transition::drive_transition;

/// Score captured when a level is completed.
///
/// `time_seconds` is truncated to one decimal place.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ScoreRecord {
    pub level_index: usize,
    pub moves: u32,
    pub time_seconds: f64,
}

impl ScoreRecord {
    pub fn new(level_index: usize, moves: u32, elapsed_ms: u64) -> Self {
        Self {
            level_index,
            moves,
            time_seconds: (elapsed_ms / 100) as f64 / 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionPhase {
    Playing,
    /// Moves are frozen; the score is final.
    Complete(ScoreRecord),
}

/// Live scorekeeping context for one level attempt.
#[derive(Clone, Debug)]
pub struct LevelSession {
    level_index: usize,
    grid: Grid,
    move_count: u32,
    started_at: Timestamp,
    time_floor_ms: u64,
    phase: SessionPhase,
}

impl LevelSession {
    /// Builds the level's grid and starts its clock at `now`.
    pub fn start(
        level_index: usize,
        definition: &LevelDefinition,
        now: Timestamp,
    ) -> Result<Self, GridError> {
        Ok(Self {
            level_index,
            grid: Grid::from_definition(definition)?,
            move_count: 0,
            started_at: now,
            time_floor_ms: 0,
            phase: SessionPhase::Playing,
        })
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, SessionPhase::Complete(_))
    }

    pub fn score(&self) -> Option<ScoreRecord> {
        match self.phase {
            SessionPhase::Complete(score) => Some(score),
            SessionPhase::Playing => None,
        }
    }

    pub fn is_won(&self) -> bool {
        is_level_won(&self.grid)
    }

    /// Elapsed play time at `now`, including any penalty floor.
    pub fn elapsed_ms(&self, now: Timestamp) -> u64 {
        now.millis_since(self.started_at).max(self.time_floor_ms)
    }

    /// Executes one player move as an all-or-nothing unit.
    ///
    /// The transition runs against a staged grid; on success the grid is
    /// committed, the move is counted once (a swap included) and the win
    /// check runs. On failure nothing changes.
    pub fn attempt_move(
        &mut self,
        action: MoveAction,
        now: Timestamp,
        events: &mut Vec<GameEvent>,
    ) -> Result<MoveKind, SessionError> {
        if self.is_complete() {
            return Err(SessionError::LevelComplete {
                level_index: self.level_index,
            });
        }

        let mut staged = self.grid.clone();
        let mut staged_events = Vec::new();
        let kind = drive_transition(&action, &mut staged, &mut staged_events)
            .map_err(SessionError::Move)?;

        self.grid = staged;
        self.move_count += 1;
        events.extend(staged_events);
        events.push(GameEvent::MoveCounted {
            moves: self.move_count,
        });

        if self.is_won() {
            self.complete(now);
        }

        Ok(kind)
    }

    /// Raises the move count and elapsed time to at least the given floors.
    pub(crate) fn apply_penalty(&mut self, move_floor: u32, time_floor_ms: u64) {
        self.move_count = self.move_count.max(move_floor);
        self.time_floor_ms = self.time_floor_ms.max(time_floor_ms);
    }

    /// Freezes the session and returns its score. Idempotent.
    pub(crate) fn complete(&mut self, now: Timestamp) -> ScoreRecord {
        if let SessionPhase::Complete(score) = self.phase {
            return score;
        }
        let score = ScoreRecord::new(self.level_index, self.move_count, self.elapsed_ms(now));
        self.phase = SessionPhase::Complete(score);
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CellSpec, Position, TokenColor, TokenId};

    fn corridor() -> LevelDefinition {
        LevelDefinition::filled(3, 1)
            .with_cell(
                Position::ORIGIN,
                Some(CellSpec::empty().with_token(TokenColor::Yellow)),
            )
            .with_cell(
                Position::new(2, 0),
                Some(CellSpec::empty().with_goal(TokenColor::Yellow)),
            )
    }

    #[test]
    fn score_time_is_truncated_to_tenths() {
        assert_eq!(ScoreRecord::new(0, 3, 12_345).time_seconds, 12.3);
        assert_eq!(ScoreRecord::new(0, 3, 99).time_seconds, 0.0);
    }

    #[test]
    fn completes_on_winning_move_and_freezes() {
        let mut session = LevelSession::start(4, &corridor(), Timestamp(1_000)).unwrap();
        let mut events = Vec::new();

        session
            .attempt_move(
                MoveAction::new(TokenId(0), Position::new(1, 0)),
                Timestamp(2_000),
                &mut events,
            )
            .unwrap();
        assert!(!session.is_complete());

        session
            .attempt_move(
                MoveAction::new(TokenId(0), Position::new(2, 0)),
                Timestamp(3_550),
                &mut events,
            )
            .unwrap();

        let score = session.score().unwrap();
        assert_eq!(score.level_index, 4);
        assert_eq!(score.moves, 2);
        assert_eq!(score.time_seconds, 2.5);

        let frozen = session.attempt_move(
            MoveAction::new(TokenId(0), Position::new(1, 0)),
            Timestamp(4_000),
            &mut events,
        );
        assert_eq!(frozen, Err(SessionError::LevelComplete { level_index: 4 }));
    }

    #[test]
    fn failed_move_changes_nothing() {
        let mut session = LevelSession::start(0, &corridor(), Timestamp::ZERO).unwrap();
        let before = session.grid().clone();
        let mut events = Vec::new();

        let result = session.attempt_move(
            MoveAction::new(TokenId(0), Position::new(2, 0)),
            Timestamp(10),
            &mut events,
        );

        assert!(matches!(result, Err(SessionError::Move(_))));
        assert_eq!(session.grid(), &before);
        assert_eq!(session.move_count(), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn penalty_floors_only_raise() {
        let mut session = LevelSession::start(0, &corridor(), Timestamp(500)).unwrap();
        session.apply_penalty(50, 60_000);

        assert_eq!(session.move_count(), 50);
        let score = session.complete(Timestamp(1_500));
        assert_eq!(score.moves, 50);
        assert_eq!(score.time_seconds, 60.0);
        assert_eq!(session.complete(Timestamp(90_000)), score);
    }
}
