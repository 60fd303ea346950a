use async_trait::async_trait;
use puzzle_content::LevelPack;
use puzzle_core::{Grid, LevelDefinition};

use super::{LevelSource, SourceError};

/// Level source backed by an in-memory pack.
#[derive(Clone, Debug, Default)]
pub struct StaticLevelSource {
    pack: LevelPack,
}

impl StaticLevelSource {
    pub fn new(pack: LevelPack) -> Self {
        Self { pack }
    }

    /// Levels are checked when fetched, like a parsed pack.
    pub fn from_levels(levels: Vec<LevelDefinition>) -> Self {
        Self::new(LevelPack::new(levels))
    }
}

#[async_trait]
impl LevelSource for StaticLevelSource {
    async fn fetch(&self) -> Result<LevelPack, SourceError> {
        if self.pack.is_empty() {
            return Err(SourceError::Empty);
        }
        for (index, level) in self.pack.iter().enumerate() {
            Grid::from_definition(level)
                .map_err(|source| SourceError::InvalidLevel { index, source })?;
        }
        Ok(self.pack.clone())
    }

    fn describe(&self) -> String {
        format!("static pack ({} levels)", self.pack.len())
    }
}

#[cfg(test)]
mod tests {
    use puzzle_core::{CellSpec, GridError, TokenColor};

    use super::*;

    #[tokio::test]
    async fn rejects_ragged_levels() {
        let ragged = LevelDefinition::new(vec![
            vec![Some(CellSpec::empty().with_token(TokenColor::Yellow)), None],
            vec![None],
        ]);
        let source = StaticLevelSource::from_levels(vec![LevelDefinition::filled(2, 1), ragged]);

        assert!(matches!(
            source.fetch().await,
            Err(SourceError::InvalidLevel {
                index: 1,
                source: GridError::RaggedRow { row: 1, .. }
            })
        ));
    }

    #[tokio::test]
    async fn empty_pack_is_an_error() {
        let source = StaticLevelSource::default();
        assert!(matches!(source.fetch().await, Err(SourceError::Empty)));
        assert_eq!(source.describe(), "static pack (0 levels)");
    }
}
