//! Level pack loader.
//!
//! Two on-disk shapes are supported:
//!
//! - **JSON**: the published table shape. A pack is an array of levels, a
//!   level is an array of rows, and every row entry is either falsy (`null`,
//!   `false`, `0`, `""`) for a hole or a `[fill, goal]` pair of color names
//!   where `""` means none.
//! - **RON**: `Vec<LevelDefinition>` as serialized by puzzle-core.
//!
//! ```json
//! [
//!   [
//!     [["yellow", ""], ["", ""],  0],
//!     [["", ""],       ["", ""],  ["", "yellow"]]
//!   ]
//! ]
//! ```

use std::path::Path;

use anyhow::{Context, bail};
use puzzle_core::{CellSpec, Grid, LevelDefinition, TokenColor};
use serde_json::Value;

use crate::loaders::{LoadResult, read_file};

/// On-disk encoding of a level pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelFormat {
    Json,
    Ron,
}

impl LevelFormat {
    /// Picks a format from the file extension.
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(LevelFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(LevelFormat::Ron),
            _ => bail!("Unsupported level pack extension: {}", path.display()),
        }
    }
}

/// Ordered, validated set of levels for one game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelPack {
    levels: Vec<LevelDefinition>,
}

impl LevelPack {
    /// Wraps already-validated levels.
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }
}

/// Loader for level packs.
pub struct LevelLoader;

impl LevelLoader {
    /// Load a level pack, choosing the parser from the file extension.
    pub fn load(path: &Path) -> LoadResult<LevelPack> {
        let format = LevelFormat::from_path(path)?;
        let content = read_file(path)?;
        Self::parse(&content, format).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str, format: LevelFormat) -> LoadResult<LevelPack> {
        match format {
            LevelFormat::Json => Self::parse_json(content),
            LevelFormat::Ron => Self::parse_ron(content),
        }
    }

    pub fn parse_json(content: &str) -> LoadResult<LevelPack> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level JSON: {}", e))?;
        let Value::Array(levels) = root else {
            bail!("Level pack must be an array of levels");
        };

        let levels = levels
            .iter()
            .enumerate()
            .map(|(index, level)| {
                json_level(level).with_context(|| format!("level {index} is malformed"))
            })
            .collect::<LoadResult<Vec<_>>>()?;
        validate(levels)
    }

    pub fn parse_ron(content: &str) -> LoadResult<LevelPack> {
        let levels: Vec<LevelDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level RON: {}", e))?;
        validate(levels)
    }
}

/// Every level must build into a grid before the pack is accepted.
fn validate(levels: Vec<LevelDefinition>) -> LoadResult<LevelPack> {
    for (index, level) in levels.iter().enumerate() {
        Grid::from_definition(level).with_context(|| format!("level {index} is invalid"))?;
    }
    Ok(LevelPack::new(levels))
}

fn json_level(level: &Value) -> LoadResult<LevelDefinition> {
    let Value::Array(rows) = level else {
        bail!("expected an array of rows");
    };

    let mut table = Vec::with_capacity(rows.len());
    for (y, row) in rows.iter().enumerate() {
        let Value::Array(entries) = row else {
            bail!("row {y} is not an array");
        };
        let cells = entries
            .iter()
            .enumerate()
            .map(|(x, entry)| json_entry(entry).with_context(|| format!("entry ({x}, {y})")))
            .collect::<LoadResult<Vec<_>>>()?;
        table.push(cells);
    }

    // Short rows render as trailing gaps.
    let width = table.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut table {
        row.resize(width, None);
    }

    Ok(LevelDefinition::new(table))
}

fn json_entry(entry: &Value) -> LoadResult<Option<CellSpec>> {
    if is_falsy(entry) {
        return Ok(None);
    }
    let Value::Array(pair) = entry else {
        bail!("expected a hole or a [fill, goal] pair, found {entry}");
    };
    let [fill, goal] = pair.as_slice() else {
        bail!("expected exactly two colors, found {}", pair.len());
    };

    Ok(Some(CellSpec {
        token: json_color(fill)?,
        goal: json_color(goal)?,
    }))
}

fn json_color(value: &Value) -> LoadResult<Option<TokenColor>> {
    match value {
        Value::String(name) => Ok(TokenColor::parse(name)),
        Value::Null => Ok(None),
        other => bail!("color must be a string, found {other}"),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
