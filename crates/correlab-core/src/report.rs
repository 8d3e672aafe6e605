//! Finished-game reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{GamePhase, GameState, Rank, RoundRecord};

/// Summary of one finished game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub total_rounds: u32,
    pub score: u32,
    pub max_score: u32,
    pub rank: Rank,
    /// Scored rounds in play order.
    pub history: Vec<RoundRecord>,
}

impl SessionReport {
    /// Build a report from a finished game; `None` while the game is running.
    pub fn from_state(state: &GameState) -> Option<Self> {
        if state.phase != GamePhase::Finished {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            total_rounds: state.total_rounds,
            score: state.score,
            max_score: state.max_score(),
            rank: state.rank()?,
            history: state.history.clone(),
        })
    }

    /// Mean absolute guessing error over the scored rounds.
    pub fn mean_error(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history
            .iter()
            .map(|r| (r.true_r - r.guess).abs())
            .sum::<f64>()
            / self.history.len() as f64
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Default file name, unique per report.
    pub fn file_name(&self) -> String {
        format!(
            "correlab-{}-{}.json",
            self.created_at.format("%Y%m%d-%H%M%S"),
            self.id.simple()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished_state() -> GameState {
        GameState {
            phase: GamePhase::Finished,
            round: 2,
            total_rounds: 2,
            score: 150,
            guess: 0.0,
            current: None,
            last_outcome: None,
            history: vec![
                RoundRecord {
                    round: 1,
                    true_r: 0.9,
                    guess: 0.9,
                    points: 100,
                },
                RoundRecord {
                    round: 2,
                    true_r: -0.5,
                    guess: -0.25,
                    points: 50,
                },
            ],
        }
    }

    #[test]
    fn built_only_from_finished_games() {
        let mut state = finished_state();
        let report = SessionReport::from_state(&state).unwrap();
        assert_eq!(report.max_score, 200);
        assert_eq!(report.rank, Rank::Analyst);
        assert!((report.mean_error() - 0.125).abs() < 1e-12);

        state.phase = GamePhase::Result;
        assert!(SessionReport::from_state(&state).is_none());
    }

    #[test]
    fn json_roundtrip() {
        let report = SessionReport::from_state(&finished_state()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(report.file_name());

        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(SessionReport::load_json(Path::new("/nonexistent/report.json")).is_err());
    }
}
