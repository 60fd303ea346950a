//! Plain-text board rendering.
//!
//! Each cell is three characters: the token letter (or `.`), the goal letter
//! in lowercase (or space), and a marker. `*` marks a satisfied goal, `>` the
//! selected token and `+` a legal target of the selection. Holes are blank.
use std::fmt::Write;

use puzzle_core::{GamePhase, Grid, Position, ScoreRecord, TokenColor};
use runtime::{GameSnapshot, ScoreSubmission};

pub fn render_snapshot(snapshot: &GameSnapshot) -> String {
    let mut out = String::new();

    match snapshot.phase {
        GamePhase::Idle => {
            out.push_str("No game in progress. Type `start` to begin.\n");
            return out;
        }
        GamePhase::Finished => {
            out.push_str("Game finished.\n");
            out.push_str(&render_scores(&snapshot.results.scores));
            return out;
        }
        GamePhase::Playing => {}
    }

    let level = snapshot.level_index + 1;
    let _ = match snapshot.level_count {
        Some(count) => write!(out, "Level {level}/{count}"),
        None => write!(out, "Level {level}"),
    };
    let _ = write!(out, "  moves {}", snapshot.move_count);
    if let Some(seconds) = snapshot.clock_seconds {
        let _ = write!(out, "  time {seconds:.1}s");
    }
    if snapshot.level_complete {
        out.push_str("  [complete]");
    }
    out.push('\n');

    match &snapshot.grid {
        Some(grid) => out.push_str(&render_grid(grid, snapshot)),
        None => out.push_str("(level not loaded)\n"),
    }
    out
}

pub fn render_grid(grid: &Grid, snapshot: &GameSnapshot) -> String {
    let mut out = String::from("   ");
    for x in 0..grid.width() {
        let _ = write!(out, "{x:<3}");
    }
    out.truncate(out.trim_end().len());
    out.push('\n');

    for y in 0..grid.height() as i32 {
        let _ = write!(out, "{y:<3}");
        for x in 0..grid.width() as i32 {
            out.push_str(&render_cell(grid, snapshot, Position::new(x, y)));
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

fn render_cell(grid: &Grid, snapshot: &GameSnapshot, position: Position) -> String {
    let Some(cell) = grid.cell(position) else {
        return "   ".to_string();
    };

    let token = grid.token_at(position);
    let fill = token.map_or('.', |token| color_letter(token.color()));
    let goal = cell
        .goal()
        .map_or(' ', |color| color_letter(color).to_ascii_lowercase());
    let marker = if token.is_some_and(|token| Some(token.id()) == snapshot.active_token) {
        '>'
    } else if snapshot.highlighted.contains(&position) {
        '+'
    } else if cell.is_satisfied() {
        '*'
    } else {
        ' '
    };
    [fill, goal, marker].iter().collect()
}

fn color_letter(color: &TokenColor) -> char {
    color
        .as_str()
        .chars()
        .next()
        .map_or('?', |letter| letter.to_ascii_uppercase())
}

pub fn render_scores(scores: &[ScoreRecord]) -> String {
    let mut out = String::new();
    for score in scores {
        let _ = writeln!(
            out,
            "  level {:>2}: {:>3} moves  {:>6.1}s",
            score.level_index + 1,
            score.moves,
            score.time_seconds
        );
    }
    out
}

pub fn render_history(history: &[ScoreSubmission]) -> String {
    if history.is_empty() {
        return "No finished games yet.\n".to_string();
    }
    let mut out = String::new();
    for (index, submission) in history.iter().enumerate() {
        let total_moves: u32 = submission.moves.iter().sum();
        let total_time: f64 = submission.times.iter().sum();
        let _ = writeln!(
            out,
            "game {}: {} levels, {} moves, {:.1}s",
            index + 1,
            submission.levels(),
            total_moves,
            total_time
        );
    }
    out
}
