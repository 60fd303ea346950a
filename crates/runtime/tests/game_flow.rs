//! Runtime scenarios driven through [`RuntimeHandle`] on a paused clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use puzzle_content::LevelPack;
use puzzle_core::{
    CellSpec, CheatRejection, GameEvent, GamePhase, GridError, LevelDefinition, Position,
    SessionError, TokenColor, TokenId,
};
use runtime::{
    Event, GameSnapshot, InMemoryScoreRepo, LevelSource, Runtime, RuntimeError, RuntimeEvent, RuntimeHandle,
    ScoreRepository, SourceError, StaticLevelSource, Topic,
};

/// Yellow token one step left of its goal.
fn one_step_level() -> LevelDefinition {
    LevelDefinition::filled(2, 1)
        .with_cell(
            Position::ORIGIN,
            Some(CellSpec::empty().with_token(TokenColor::Yellow)),
        )
        .with_cell(
            Position::new(1, 0),
            Some(CellSpec::empty().with_goal(TokenColor::Yellow)),
        )
}

async fn start_runtime(levels: usize) -> (Runtime, RuntimeHandle, Arc<InMemoryScoreRepo>) {
    let scores = Arc::new(InMemoryScoreRepo::new());
    let runtime = Runtime::builder()
        .level_source(StaticLevelSource::from_levels(vec![one_step_level(); levels]))
        .score_repository(scores.clone())
        .build()
        .await
        .expect("runtime should build");
    let handle = runtime.handle();
    (runtime, handle, scores)
}

/// Waits for the first event on `rx` that `pick` accepts.
async fn wait_for<T>(
    rx: &mut broadcast::Receiver<Event>,
    mut pick: impl FnMut(&Event) -> Option<T>,
) -> T {
    loop {
        let event = rx.recv().await.expect("event bus closed");
        if let Some(found) = pick(&event) {
            return found;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn plays_every_level_and_submits_scores() {
    let (runtime, handle, scores) = start_runtime(2).await;
    let mut session_rx = handle.subscribe(Topic::Session);

    handle.start_game().await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, GamePhase::Playing);
    assert_eq!(snapshot.level_index, 0);
    assert_eq!(snapshot.level_count, Some(2));

    handle
        .attempt_move(TokenId(0), Position::new(1, 0))
        .await
        .unwrap();
    wait_for(&mut session_rx, |event| match event {
        Event::Game(GameEvent::LevelStarted { level_index: 1 }) => Some(()),
        _ => None,
    })
    .await;

    handle
        .attempt_move(TokenId(0), Position::new(1, 0))
        .await
        .unwrap();
    let results = wait_for(&mut session_rx, |event| match event {
        Event::Game(GameEvent::GameFinished { results }) => Some(results.clone()),
        _ => None,
    })
    .await;
    assert_eq!(results.moves(), vec![1, 1]);

    let stored = wait_for(&mut session_rx, |event| match event {
        Event::Runtime(RuntimeEvent::ScoresSubmitted { levels }) => Some(*levels),
        _ => None,
    })
    .await;
    assert_eq!(stored, 2);

    let history = scores.load_all().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].moves, vec![1, 1]);
    assert_eq!(handle.score_history().await.unwrap(), history);
    assert_eq!(handle.snapshot().await.unwrap().phase, GamePhase::Finished);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn next_level_waits_for_the_grace_delay() {
    let (_runtime, handle, _) = start_runtime(2).await;
    handle.start_game().await.unwrap();
    handle
        .attempt_move(TokenId(0), Position::new(1, 0))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(700)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.level_index, 0);
    assert!(snapshot.advance_pending);
    assert!(snapshot.level_complete);
    assert_eq!(snapshot.clock_seconds, None);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.level_index, 1);
    assert!(!snapshot.advance_pending);
    assert_eq!(snapshot.move_count, 0);
}

#[tokio::test(start_paused = true)]
async fn start_game_cancels_pending_advance() {
    let (_runtime, handle, _) = start_runtime(3).await;
    let mut session_rx = handle.subscribe(Topic::Session);

    handle.start_game().await.unwrap();
    handle
        .attempt_move(TokenId(0), Position::new(1, 0))
        .await
        .unwrap();
    handle.start_game().await.unwrap();

    wait_for(&mut session_rx, |event| match event {
        Event::Game(GameEvent::AdvanceCancelled { level_index: 0 }) => Some(()),
        _ => None,
    })
    .await;

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.level_index, 0);
    assert!(!snapshot.level_complete);
    assert!(!snapshot.advance_pending);
    assert!(snapshot.results.is_empty());
}

#[tokio::test(start_paused = true)]
async fn restart_is_ignored_between_levels() {
    let (_runtime, handle, _) = start_runtime(2).await;

    assert!(matches!(
        handle.restart_level().await,
        Err(RuntimeError::Session(SessionError::NotInGame))
    ));

    handle.start_game().await.unwrap();
    handle
        .attempt_move(TokenId(0), Position::new(1, 0))
        .await
        .unwrap();
    handle.restart_level().await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.advance_pending);
    assert_eq!(snapshot.move_count, 1);
}

#[tokio::test(start_paused = true)]
async fn cheat_codes_are_single_use() {
    let (_runtime, handle, _) = start_runtime(3).await;
    let mut cheat_rx = handle.subscribe(Topic::Cheat);
    handle.start_game().await.unwrap();

    let malformed = handle.submit_cheat_code("H3H-4H4").await.unwrap_err();
    assert!(matches!(
        malformed,
        RuntimeError::Cheat(CheatRejection::Malformed)
    ));
    assert!(malformed.is_rejection());
    let reason = wait_for(&mut cheat_rx, |event| match event {
        Event::Game(GameEvent::CheatRejected { reason }) => Some(reason.clone()),
        _ => None,
    })
    .await;
    assert_eq!(reason, CheatRejection::Malformed);

    handle.submit_cheat_code("h3h4h4").await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.level_complete);
    assert!(snapshot.move_count >= 50);

    assert!(matches!(
        handle.submit_cheat_code("K1A 2B3").await,
        Err(RuntimeError::Cheat(CheatRejection::BetweenLevels))
    ));

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert!(matches!(
        handle.submit_cheat_code("H3H 4H4").await,
        Err(RuntimeError::Cheat(CheatRejection::AlreadyUsed))
    ));
    handle.submit_cheat_code("K1A 2B3").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn tap_to_select_moves_the_token() {
    let (_runtime, handle, _) = start_runtime(1).await;
    let mut board_rx = handle.subscribe(Topic::Board);
    handle.start_game().await.unwrap();

    handle.select_token(TokenId(0)).await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.active_token, Some(TokenId(0)));
    assert!(snapshot.highlighted.contains(&Position::new(1, 0)));

    handle.select_cell(Position::new(1, 0)).await.unwrap();
    let moves = wait_for(&mut board_rx, |event| match event {
        Event::Game(GameEvent::MoveCounted { moves }) => Some(*moves),
        _ => None,
    })
    .await;
    assert_eq!(moves, 1);

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.active_token, None);
    assert!(snapshot.highlighted.is_empty());
    assert!(snapshot.level_complete);
}

#[tokio::test(start_paused = true)]
async fn rejected_moves_are_reported_on_the_board_topic() {
    let (_runtime, handle, _) = start_runtime(1).await;
    let mut board_rx = handle.subscribe(Topic::Board);
    handle.start_game().await.unwrap();

    let error = handle
        .attempt_move(TokenId(0), Position::new(5, 5))
        .await
        .unwrap_err();
    assert!(matches!(error, RuntimeError::Session(_)));
    assert!(error.game_error_code().is_some());

    let (token, target) = wait_for(&mut board_rx, |event| match event {
        Event::Runtime(RuntimeEvent::MoveRejected { token, target, .. }) => {
            Some((*token, *target))
        }
        _ => None,
    })
    .await;
    assert_eq!((token, target), (TokenId(0), Position::new(5, 5)));
    assert_eq!(handle.snapshot().await.unwrap().move_count, 0);
}

#[tokio::test(start_paused = true)]
async fn clock_ticks_while_a_level_is_in_play() {
    let (_runtime, handle, _) = start_runtime(1).await;
    let mut clock_rx = handle.subscribe(Topic::Clock);
    handle.start_game().await.unwrap();

    tokio::time::sleep(Duration::from_millis(350)).await;
    let seconds = wait_for(&mut clock_rx, |event| match event {
        Event::Runtime(RuntimeEvent::ClockTick { seconds, .. }) if *seconds > 0.0 => {
            Some(*seconds)
        }
        _ => None,
    })
    .await;
    assert!(seconds >= 0.1);
}

/// Fails a fixed number of fetches before serving a one-level pack.
struct FlakySource {
    failures_left: AtomicUsize,
}

#[async_trait]
impl LevelSource for FlakySource {
    async fn fetch(&self) -> Result<LevelPack, SourceError> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(SourceError::Unavailable("connection refused".to_string()));
        }
        Ok(LevelPack::new(vec![one_step_level()]))
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_is_retried_on_next_start() {
    let runtime = Runtime::builder()
        .level_source(FlakySource {
            failures_left: AtomicUsize::new(1),
        })
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut session_rx = handle.subscribe(Topic::Session);

    assert!(matches!(
        handle.start_game().await,
        Err(RuntimeError::Source(SourceError::Unavailable(_)))
    ));
    wait_for(&mut session_rx, |event| match event {
        Event::Runtime(RuntimeEvent::LevelLoadFailed { .. }) => Some(()),
        _ => None,
    })
    .await;
    assert!(handle.snapshot().await.unwrap().grid.is_none());

    handle.start_game().await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.grid.is_some());
    assert_eq!(snapshot.level_count, Some(1));
}

struct StalledSource;

#[async_trait]
impl LevelSource for StalledSource {
    async fn fetch(&self) -> Result<LevelPack, SourceError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(SourceError::Empty)
    }

    fn describe(&self) -> String {
        "stalled".to_string()
    }
}

#[tokio::test(start_paused = true)]
async fn stalled_fetch_times_out() {
    let runtime = Runtime::builder()
        .level_source(StalledSource)
        .build()
        .await
        .unwrap();

    let error = runtime.handle().start_game().await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Timeout {
            operation: "level fetch",
            timeout_ms: 1000
        }
    ));
}

#[tokio::test]
async fn build_requires_a_level_source() {
    assert!(matches!(
        Runtime::builder().build().await,
        Err(RuntimeError::MissingLevelSource)
    ));
}

#[tokio::test(start_paused = true)]
async fn snapshot_round_trips_through_json() {
    let (_runtime, handle, _) = start_runtime(2).await;
    handle.start_game().await.unwrap();
    handle.select_token(TokenId(0)).await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert!(!snapshot.highlighted.is_empty());

    let json = serde_json::to_string(&snapshot).unwrap();
    let decoded: GameSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, snapshot);
}

/// Second row is shorter than the first.
fn ragged_level() -> LevelDefinition {
    LevelDefinition::new(vec![
        vec![Some(CellSpec::empty().with_token(TokenColor::Yellow)), None],
        vec![None],
    ])
}

#[tokio::test(start_paused = true)]
async fn static_pack_rejects_ragged_levels() {
    let runtime = Runtime::builder()
        .level_source(StaticLevelSource::from_levels(vec![
            one_step_level(),
            ragged_level(),
        ]))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut session_rx = handle.subscribe(Topic::Session);

    assert!(matches!(
        handle.start_game().await,
        Err(RuntimeError::Source(SourceError::InvalidLevel { index: 1, .. }))
    ));
    wait_for(&mut session_rx, |event| match event {
        Event::Runtime(RuntimeEvent::LevelLoadFailed { .. }) => Some(()),
        _ => None,
    })
    .await;
}

/// Hands out its pack without building any grid.
struct UncheckedSource(LevelPack);

#[async_trait]
impl LevelSource for UncheckedSource {
    async fn fetch(&self) -> Result<LevelPack, SourceError> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "unchecked".to_string()
    }
}

#[tokio::test(start_paused = true)]
async fn unbuildable_level_is_reported() {
    let runtime = Runtime::builder()
        .level_source(UncheckedSource(LevelPack::new(vec![ragged_level()])))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut session_rx = handle.subscribe(Topic::Session);

    assert!(matches!(
        handle.start_game().await,
        Err(RuntimeError::Session(SessionError::Grid(GridError::RaggedRow { .. })))
    ));
    let error = wait_for(&mut session_rx, |event| match event {
        Event::Runtime(RuntimeEvent::LevelLoadFailed { error }) => Some(error.clone()),
        _ => None,
    })
    .await;
    assert!(error.contains("level could not be built"), "{error}");
    assert!(handle.snapshot().await.unwrap().grid.is_none());
}
