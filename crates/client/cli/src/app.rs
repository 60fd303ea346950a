//! Line-oriented game client built on the runtime handle.
use std::io::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use puzzle_content::ContentFactory;
use puzzle_core::{GameEvent, Position};
use runtime::{
    Event, FileLevelSource, FileScoreRepository, Runtime, RuntimeConfig, RuntimeError,
    RuntimeEvent, RuntimeHandle, Topic,
};

use crate::command::{HELP, Input};
use crate::config::CliConfig;
use crate::dirs;
use crate::render::{render_history, render_scores, render_snapshot};

pub struct CliApp {
    runtime: Runtime,
    handle: RuntimeHandle,
}

impl CliApp {
    /// Load content and scores locations, then spawn the runtime.
    pub async fn build(config: &CliConfig) -> Result<Self> {
        let data_dir = config
            .data_dir
            .clone()
            .unwrap_or_else(dirs::bundled_data_dir);
        let factory = ContentFactory::new(&data_dir);
        let game_config = factory
            .load_config()
            .with_context(|| format!("loading config from {}", data_dir.display()))?;

        let levels_path = config
            .levels_path
            .clone()
            .unwrap_or_else(|| factory.levels_path());
        let scores_path = config.scores_path.clone().unwrap_or_else(dirs::scores_path);
        let scores = FileScoreRepository::new(&scores_path)
            .with_context(|| format!("opening score log {}", scores_path.display()))?;

        let mut runtime_config = RuntimeConfig {
            game_config,
            ..RuntimeConfig::default()
        };
        if let Some(timeout) = config.io_timeout {
            runtime_config.io_timeout = timeout;
        }

        info!(
            levels = %levels_path.display(),
            scores = %scores_path.display(),
            "Starting runtime"
        );

        let runtime = Runtime::builder()
            .config(runtime_config)
            .level_source(FileLevelSource::new(levels_path))
            .score_repository(Arc::new(scores))
            .build()
            .await?;
        let handle = runtime.handle();

        Ok(Self { runtime, handle })
    }

    /// Read commands from stdin until `quit` or end of input.
    pub async fn run(self) -> Result<()> {
        let Self { runtime, handle } = self;
        let notifier = tokio::spawn(notify(handle.clone()));

        println!("{HELP}");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let input = match Input::parse(&line) {
                Ok(Input::Quit) => break,
                Ok(input) => input,
                Err(error) => {
                    println!("{error}");
                    continue;
                }
            };

            match execute(&handle, input).await {
                Ok(()) => {}
                Err(
                    error @ (RuntimeError::CommandChannelClosed
                    | RuntimeError::ReplyChannelClosed(_)),
                ) => {
                    notifier.abort();
                    return Err(error).context("runtime stopped");
                }
                Err(error) => {
                    debug!(error = %error, "Command failed");
                    println!("! {error}");
                }
            }
        }

        notifier.abort();
        drop(handle);
        runtime.shutdown().await?;
        Ok(())
    }
}

async fn execute(handle: &RuntimeHandle, input: Input) -> runtime::Result<()> {
    match input {
        Input::Start => handle.start_game().await?,
        Input::Restart => handle.restart_level().await?,
        Input::Move { from, to } => {
            let Some(token) = token_at(handle, from).await? else {
                println!("no token at {from}");
                return Ok(());
            };
            handle.attempt_move(token, to).await?;
        }
        Input::Tap(position) => match token_at(handle, position).await? {
            Some(token) => handle.select_token(token).await?,
            None => handle.select_cell(position).await?,
        },
        Input::Clear => handle.clear_selection().await?,
        Input::Cheat(code) => handle.submit_cheat_code(code).await?,
        Input::Show => {}
        Input::Scores => {
            print!("{}", render_history(&handle.score_history().await?));
            return Ok(());
        }
        Input::Help => {
            println!("{HELP}");
            return Ok(());
        }
        Input::Quit => return Ok(()),
    }

    print!("{}", render_snapshot(&handle.snapshot().await?));
    Ok(())
}

async fn token_at(
    handle: &RuntimeHandle,
    position: Position,
) -> runtime::Result<Option<puzzle_core::TokenId>> {
    let snapshot = handle.snapshot().await?;
    Ok(snapshot
        .grid
        .as_ref()
        .and_then(|grid| grid.token_at(position))
        .map(|token| token.id()))
}

/// Prints session and cheat notifications as they arrive.
async fn notify(handle: RuntimeHandle) {
    let mut session_rx = handle.subscribe(Topic::Session);
    let mut cheat_rx = handle.subscribe(Topic::Cheat);
    let mut advanced = false;

    loop {
        let received = tokio::select! {
            event = session_rx.recv() => event,
            event = cheat_rx.recv() => event,
        };
        let event = match received {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Notification stream lagged");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        match event {
            Event::Game(GameEvent::LevelWon { score }) => {
                println!(
                    "\nLevel {} complete: {} moves in {:.1}s",
                    score.level_index + 1,
                    score.moves,
                    score.time_seconds
                );
            }
            Event::Game(GameEvent::AdvanceFired { .. }) => advanced = true,
            Event::Game(GameEvent::LevelStarted { .. }) if advanced => {
                advanced = false;
                if let Ok(snapshot) = handle.snapshot().await {
                    print!("\n{}> ", render_snapshot(&snapshot));
                    let _ = std::io::stdout().flush();
                }
            }
            Event::Game(GameEvent::GameFinished { results }) => {
                println!("\nAll levels complete!");
                print!("{}", render_scores(&results.scores));
            }
            Event::Game(GameEvent::CheatAccepted { code }) => {
                println!("Cheat {code} accepted. Penalty applied.");
            }
            Event::Runtime(RuntimeEvent::ScoresSubmitted { levels }) => {
                info!(levels, "Scores saved");
                print!("Scores saved.\n> ");
                let _ = std::io::stdout().flush();
            }
            Event::Runtime(RuntimeEvent::ScoreSubmitFailed { error }) => {
                println!("Scores could not be saved: {error}");
            }
            Event::Runtime(RuntimeEvent::LevelLoadFailed { error }) => {
                println!("Levels could not be loaded: {error}. Type `start` to retry.");
            }
            _ => {}
        }
    }
}
