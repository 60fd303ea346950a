use puzzle_core::{GameResults, ScoreRecord};
use serde::{Deserialize, Serialize};

/// Stored form of one finished game: parallel per-level arrays.
///
/// `times[i]` and `moves[i]` belong to level `i`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub times: Vec<f64>,
    pub moves: Vec<u32>,
}

impl ScoreSubmission {
    pub fn levels(&self) -> usize {
        self.times.len().min(self.moves.len())
    }

    /// Rebuilds per-level records. Extra entries in the longer array are ignored.
    pub fn to_results(&self) -> GameResults {
        GameResults {
            scores: self
                .times
                .iter()
                .zip(&self.moves)
                .enumerate()
                .map(|(level_index, (&time_seconds, &moves))| ScoreRecord {
                    level_index,
                    moves,
                    time_seconds,
                })
                .collect(),
        }
    }
}

impl From<&GameResults> for ScoreSubmission {
    fn from(results: &GameResults) -> Self {
        Self {
            times: results.times(),
            moves: results.moves(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuilds_records_from_parallel_arrays() {
        let submission = ScoreSubmission {
            times: vec![4.5, 12.0, 30.0],
            moves: vec![3, 9],
        };

        let results = submission.to_results();
        assert_eq!(submission.levels(), 2);
        assert_eq!(
            results.scores,
            vec![
                ScoreRecord {
                    level_index: 0,
                    moves: 3,
                    time_seconds: 4.5,
                },
                ScoreRecord {
                    level_index: 1,
                    moves: 9,
                    time_seconds: 12.0,
                },
            ]
        );
    }

    #[test]
    fn stored_form_matches_results() {
        let submission = ScoreSubmission {
            times: vec![2.0, 7.5],
            moves: vec![1, 6],
        };

        let results = submission.to_results();
        assert_eq!(ScoreSubmission::from(&results), submission);
    }
}
