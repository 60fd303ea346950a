use std::collections::{BTreeMap, BTreeSet};

use crate::action::MoveAction;
use crate::config::GameConfig;
use crate::event::GameEvent;
use crate::state::{Grid, LevelDefinition, Position, Timestamp, TokenId};

use super::cheat::{CheatCode, CheatRejection};
use super::errors::SessionError;
use super::selection::{SelectionController, SelectionStep};
use super::session::{LevelSession, ScoreRecord};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GamePhase {
    /// No game has been started yet.
    #[default]
    Idle,
    Playing,
    /// The last level was completed; results were handed off.
    Finished,
}

/// Ordered per-level scores for one finished game.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameResults {
    pub scores: Vec<ScoreRecord>,
}

impl GameResults {
    pub fn moves(&self) -> Vec<u32> {
        self.scores.iter().map(|score| score.moves).collect()
    }

    pub fn times(&self) -> Vec<f64> {
        self.scores.iter().map(|score| score.time_seconds).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Whole-game context: level sequencing, scores, cheats and the active level.
///
/// Every mutating command returns the [`GameEvent`]s it produced. Commands
/// that fail return an error and leave the game exactly as it was.
///
/// The grace delay between a win and the next level is modelled as a flag:
/// the owner schedules the timer when it sees [`GameEvent::AdvancePending`]
/// and calls [`Game::fire_advance`] when it elapses.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    phase: GamePhase,
    level_index: usize,
    scores: BTreeMap<usize, ScoreRecord>,
    used_cheat_codes: BTreeSet<CheatCode>,
    session: Option<LevelSession>,
    pending_advance: bool,
    selection: SelectionController,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            phase: GamePhase::Idle,
            level_index: 0,
            scores: BTreeMap::new(),
            used_cheat_codes: BTreeSet::new(),
            session: None,
            pending_advance: false,
            selection: SelectionController::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_in_game(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn session(&self) -> Option<&LevelSession> {
        self.session.as_ref()
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.session.as_ref().map(LevelSession::grid)
    }

    pub fn is_advance_pending(&self) -> bool {
        self.pending_advance
    }

    pub fn active_token(&self) -> Option<TokenId> {
        self.selection.active()
    }

    /// Cells the active token could move onto.
    pub fn highlighted_targets(&self) -> BTreeSet<Position> {
        self.grid()
            .map(|grid| self.selection.targets(grid))
            .unwrap_or_default()
    }

    pub fn used_cheat_codes(&self) -> impl Iterator<Item = &CheatCode> {
        self.used_cheat_codes.iter()
    }

    /// Scores recorded so far, in level order.
    pub fn results(&self) -> GameResults {
        GameResults {
            scores: self.scores.values().copied().collect(),
        }
    }

    /// Elapsed-time readout in seconds, while a level is being played.
    ///
    /// `None` between levels and once the level is complete.
    pub fn clock_seconds(&self, now: Timestamp) -> Option<f64> {
        if self.pending_advance {
            return None;
        }
        let session = self.session.as_ref().filter(|s| !s.is_complete())?;
        Some(ScoreRecord::new(session.level_index(), 0, session.elapsed_ms(now)).time_seconds)
    }

    /// Starts a fresh game at level 0.
    ///
    /// Cancels any pending advance and clears recorded scores. Consumed cheat
    /// codes stay consumed.
    pub fn start_game(&mut self) -> Vec<GameEvent> {
        let mut events = self.cancel_advance();
        self.phase = GamePhase::Playing;
        self.level_index = 0;
        self.scores.clear();
        self.session = None;
        self.selection.clear();
        events.push(GameEvent::GameStarted);
        events
    }

    /// Builds the current level and starts its clock. Also used to restart.
    ///
    /// A level with no goal cells is complete as soon as it starts.
    pub fn start_level(
        &mut self,
        definition: &LevelDefinition,
        now: Timestamp,
    ) -> Result<Vec<GameEvent>, SessionError> {
        if !self.is_in_game() {
            return Err(SessionError::NotInGame);
        }
        if self.pending_advance {
            return Err(SessionError::AdvancePending);
        }

        let session = LevelSession::start(self.level_index, definition, now)?;
        let mut events = Vec::new();
        self.clear_selection_into(&mut events);
        self.session = Some(session);
        events.push(GameEvent::LevelStarted {
            level_index: self.level_index,
        });

        if self.session.as_ref().is_some_and(LevelSession::is_won) {
            self.finish_level(now, &mut events);
        }
        Ok(events)
    }

    /// Executes a direct move (drag and drop).
    pub fn attempt_move(
        &mut self,
        token: TokenId,
        target: Position,
        now: Timestamp,
    ) -> Result<Vec<GameEvent>, SessionError> {
        self.execute(MoveAction::new(token, target), now)
    }

    /// Tap on a token. Ignored when no level is in play.
    pub fn select_token(
        &mut self,
        token: TokenId,
        now: Timestamp,
    ) -> Result<Vec<GameEvent>, SessionError> {
        let Some(grid) = playable_grid(self.session.as_ref(), self.pending_advance) else {
            return Ok(Vec::new());
        };
        let step = self.selection.select_token(grid, token);
        self.apply_step(step, now)
    }

    /// Tap on a cell, hole or outside position. Ignored when no level is in play.
    pub fn select_cell(
        &mut self,
        position: Position,
        now: Timestamp,
    ) -> Result<Vec<GameEvent>, SessionError> {
        let Some(grid) = playable_grid(self.session.as_ref(), self.pending_advance) else {
            return Ok(Vec::new());
        };
        let step = self.selection.select_cell(grid, position);
        self.apply_step(step, now)
    }

    pub fn clear_selection(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.clear_selection_into(&mut events);
        events
    }

    /// Validates a cheat code and, if accepted, forces a penalised win.
    ///
    /// Checks run in order: a level must be in play, no advance may be
    /// pending, the code must be well formed and not consumed before.
    pub fn submit_cheat_code(
        &mut self,
        input: &str,
        now: Timestamp,
    ) -> Result<Vec<GameEvent>, CheatRejection> {
        if !self.is_in_game() || self.session.is_none() {
            return Err(CheatRejection::NotInGame);
        }
        if self.pending_advance || self.session.as_ref().is_some_and(LevelSession::is_complete) {
            return Err(CheatRejection::BetweenLevels);
        }
        let code = CheatCode::parse(input)?;
        if self.used_cheat_codes.contains(&code) {
            return Err(CheatRejection::AlreadyUsed);
        }

        let mut events = vec![GameEvent::CheatAccepted {
            code: code.to_string(),
        }];
        self.used_cheat_codes.insert(code);

        if let Some(session) = self.session.as_mut() {
            session.apply_penalty(self.config.cheat_move_floor, self.config.cheat_time_floor_ms);
            events.push(GameEvent::MoveCounted {
                moves: session.move_count(),
            });
        }
        self.finish_level(now, &mut events);
        Ok(events)
    }

    /// Consumes the pending advance and moves to the next level index.
    ///
    /// Returns no events if nothing was pending. The caller decides whether
    /// the new index is past the last level and, if so, calls [`Game::finish`].
    pub fn fire_advance(&mut self) -> Vec<GameEvent> {
        if !self.pending_advance {
            return Vec::new();
        }
        self.pending_advance = false;
        self.level_index += 1;
        self.session = None;
        vec![GameEvent::AdvanceFired {
            level_index: self.level_index,
        }]
    }

    pub fn cancel_advance(&mut self) -> Vec<GameEvent> {
        if !self.pending_advance {
            return Vec::new();
        }
        self.pending_advance = false;
        vec![GameEvent::AdvanceCancelled {
            level_index: self.level_index,
        }]
    }

    /// Ends the game and publishes its results.
    pub fn finish(&mut self) -> Vec<GameEvent> {
        let mut events = self.cancel_advance();
        self.clear_selection_into(&mut events);
        self.phase = GamePhase::Finished;
        self.session = None;
        events.push(GameEvent::GameFinished {
            results: self.results(),
        });
        events
    }

    fn apply_step(
        &mut self,
        step: SelectionStep,
        now: Timestamp,
    ) -> Result<Vec<GameEvent>, SessionError> {
        match step {
            SelectionStep::Activated { token, targets } => {
                Ok(vec![GameEvent::TokenSelected { token, targets }])
            }
            SelectionStep::Cleared(_) => Ok(vec![GameEvent::SelectionCleared]),
            SelectionStep::Commit(action) => {
                let mut events = vec![GameEvent::SelectionCleared];
                events.extend(self.execute(action, now)?);
                Ok(events)
            }
            SelectionStep::Unchanged => Ok(Vec::new()),
        }
    }

    fn execute(&mut self, action: MoveAction, now: Timestamp) -> Result<Vec<GameEvent>, SessionError> {
        if !self.is_in_game() {
            return Err(SessionError::NotInGame);
        }
        if self.pending_advance {
            return Err(SessionError::AdvancePending);
        }
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;

        let mut events = Vec::new();
        session.attempt_move(action, now, &mut events)?;

        if session.is_complete() {
            self.finish_level(now, &mut events);
        } else if self.selection.active() == Some(action.token) {
            self.clear_selection_into(&mut events);
        }
        Ok(events)
    }

    fn finish_level(&mut self, now: Timestamp, events: &mut Vec<GameEvent>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let score = session.complete(now);
        self.scores.insert(score.level_index, score);
        self.clear_selection_into(events);
        events.push(GameEvent::LevelWon { score });
        self.queue_advance(events);
    }

    fn queue_advance(&mut self, events: &mut Vec<GameEvent>) {
        if self.pending_advance {
            return;
        }
        self.pending_advance = true;
        events.push(GameEvent::AdvancePending {
            level_index: self.level_index,
            delay_ms: self.config.advance_delay_ms,
        });
    }

    fn clear_selection_into(&mut self, events: &mut Vec<GameEvent>) {
        if self.selection.clear().is_some() {
            events.push(GameEvent::SelectionCleared);
        }
    }
}

/// Grid of a level that still accepts input.
fn playable_grid(session: Option<&LevelSession>, pending_advance: bool) -> Option<&Grid> {
    if pending_advance {
        return None;
    }
    session
        .filter(|session| !session.is_complete())
        .map(LevelSession::grid)
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CellSpec, TokenColor};

    fn two_step_level() -> LevelDefinition {
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

    fn playing(definition: &LevelDefinition) -> Game {
        let mut game = Game::default();
        game.start_game();
        game.start_level(definition, Timestamp::ZERO).unwrap();
        game
    }

    #[test]
    fn commands_outside_a_game_are_refused() {
        let mut game = Game::default();
        assert_eq!(
            game.start_level(&two_step_level(), Timestamp::ZERO),
            Err(SessionError::NotInGame)
        );
        assert_eq!(
            game.attempt_move(TokenId(0), Position::new(1, 0), Timestamp::ZERO),
            Err(SessionError::NotInGame)
        );
        assert_eq!(
            game.submit_cheat_code("h3h 4h4", Timestamp::ZERO),
            Err(CheatRejection::NotInGame)
        );
    }

    #[test]
    fn winning_move_records_score_and_queues_one_advance() {
        let mut game = playing(&two_step_level());

        game.attempt_move(TokenId(0), Position::new(1, 0), Timestamp(400))
            .unwrap();
        let events = game
            .attempt_move(TokenId(0), Position::new(2, 0), Timestamp(1_250))
            .unwrap();

        let score = ScoreRecord::new(0, 2, 1_250);
        assert!(events.contains(&GameEvent::LevelWon { score }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::AdvancePending {
                level_index: 0,
                delay_ms: GameConfig::DEFAULT_ADVANCE_DELAY_MS
            })
        );
        assert!(game.is_advance_pending());
        assert_eq!(game.results().scores, vec![score]);
        assert_eq!(game.clock_seconds(Timestamp(2_000)), None);

        assert_eq!(
            game.start_level(&two_step_level(), Timestamp(1_300)),
            Err(SessionError::AdvancePending)
        );
    }

    #[test]
    fn fire_advance_moves_to_next_level_once() {
        let mut game = playing(&two_step_level());
        game.submit_cheat_code("h3h 4h4", Timestamp(10)).unwrap();

        assert_eq!(
            game.fire_advance(),
            vec![GameEvent::AdvanceFired { level_index: 1 }]
        );
        assert!(game.fire_advance().is_empty());
        assert_eq!(game.level_index(), 1);
        assert!(game.session().is_none());
    }

    #[test]
    fn start_game_cancels_pending_advance_but_keeps_cheats() {
        let mut game = playing(&two_step_level());
        game.submit_cheat_code("h3h 4h4", Timestamp(10)).unwrap();

        let events = game.start_game();
        assert_eq!(
            events,
            vec![
                GameEvent::AdvanceCancelled { level_index: 0 },
                GameEvent::GameStarted
            ]
        );
        assert!(!game.is_advance_pending());
        assert!(game.results().is_empty());

        game.start_level(&two_step_level(), Timestamp(20)).unwrap();
        assert_eq!(
            game.submit_cheat_code("H3H4H4", Timestamp(30)),
            Err(CheatRejection::AlreadyUsed)
        );
    }

    #[test]
    fn cheat_rejected_between_levels() {
        let mut game = playing(&two_step_level());
        game.submit_cheat_code("h3h 4h4", Timestamp(10)).unwrap();
        assert_eq!(
            game.submit_cheat_code("k1a 0b1", Timestamp(20)),
            Err(CheatRejection::BetweenLevels)
        );
    }

    #[test]
    fn restart_resets_moves_and_clock() {
        let level = two_step_level();
        let mut game = playing(&level);
        game.attempt_move(TokenId(0), Position::new(1, 0), Timestamp(500))
            .unwrap();

        game.start_level(&level, Timestamp(5_000)).unwrap();

        let session = game.session().unwrap();
        assert_eq!(session.move_count(), 0);
        assert_eq!(session.started_at(), Timestamp(5_000));
        assert_eq!(game.clock_seconds(Timestamp(6_560)), Some(1.5));
    }

    #[test]
    fn tap_to_move_commits_through_selection() {
        let mut game = playing(&two_step_level());

        let events = game.select_token(TokenId(0), Timestamp(1)).unwrap();
        assert!(matches!(events.as_slice(), [GameEvent::TokenSelected { .. }]));
        assert_eq!(game.highlighted_targets().len(), 1);

        let events = game.select_cell(Position::new(1, 0), Timestamp(2)).unwrap();
        assert_eq!(events.first(), Some(&GameEvent::SelectionCleared));
        assert!(events.contains(&GameEvent::MoveCounted { moves: 1 }));
        assert_eq!(game.active_token(), None);
    }

    #[test]
    fn level_without_goals_is_won_on_start() {
        let mut game = Game::default();
        game.start_game();
        let events = game
            .start_level(&LevelDefinition::filled(2, 2), Timestamp(100))
            .unwrap();
        assert!(events.iter().any(|event| matches!(event, GameEvent::LevelWon { .. })));
        assert!(game.is_advance_pending());
    }

    #[test]
    fn finish_hands_over_ordered_results() {
        let mut game = playing(&two_step_level());
        game.submit_cheat_code("h3h 4h4", Timestamp(10)).unwrap();
        game.fire_advance();

        let events = game.finish();
        let Some(GameEvent::GameFinished { results }) = events.last() else {
            panic!("expected GameFinished, got {events:?}");
        };
        assert_eq!(results.moves(), vec![50]);
        assert_eq!(results.times(), vec![60.0]);
        assert_eq!(game.phase(), GamePhase::Finished);
    }
}
