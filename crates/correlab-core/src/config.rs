//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::game::{GameSettings, DEFAULT_GUESS, POINTS_PER_ROUND, TOTAL_ROUNDS};

/// Top-level correlab configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelabConfig {
    /// Scored rounds per game.
    #[serde(default = "default_total_rounds")]
    pub total_rounds: u32,
    /// Points in each generated scatter.
    #[serde(default = "default_points_per_round")]
    pub points_per_round: usize,
    /// Offer a practice round first.
    #[serde(default = "default_true")]
    pub practice: bool,
    /// Guess preset at the start of every round.
    #[serde(default)]
    pub default_guess: f64,
    /// Fixed seed for repeatable games.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Catalog file or directory.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Where finished-game reports are written, if anywhere.
    #[serde(default)]
    pub report_dir: Option<PathBuf>,
}

fn default_total_rounds() -> u32 {
    TOTAL_ROUNDS
}
fn default_points_per_round() -> usize {
    POINTS_PER_ROUND
}
fn default_true() -> bool {
    true
}
fn default_catalog() -> PathBuf {
    PathBuf::from("./catalog")
}

impl Default for CorrelabConfig {
    fn default() -> Self {
        Self {
            total_rounds: default_total_rounds(),
            points_per_round: default_points_per_round(),
            practice: true,
            default_guess: DEFAULT_GUESS,
            seed: None,
            catalog: default_catalog(),
            report_dir: None,
        }
    }
}

impl CorrelabConfig {
    /// Game settings derived from this configuration.
    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            total_rounds: self.total_rounds,
            points_per_round: self.points_per_round,
            practice: self.practice,
            default_guess: self.default_guess,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.game_settings().validate()
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `correlab.toml` in the current directory
/// 2. `~/.config/correlab/config.toml`
///
/// Environment variable override: `CORRELAB_SEED`.
pub fn load_config_from(path: Option<&Path>) -> Result<CorrelabConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("correlab.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => parse_config_file(path)?,
        None => CorrelabConfig::default(),
    };

    if let Ok(seed) = std::env::var("CORRELAB_SEED") {
        config.seed = Some(
            seed.trim()
                .parse()
                .with_context(|| format!("CORRELAB_SEED is not a valid seed: {seed}"))?,
        );
    }

    config.validate()?;

    if let Some(path) = &config_path {
        tracing::debug!("loaded config from {}", path.display());
    }
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<CorrelabConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<CorrelabConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("correlab"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CorrelabConfig::default();
        assert_eq!(config.total_rounds, 5);
        assert_eq!(config.points_per_round, 30);
        assert!(config.practice);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
total_rounds = 3
seed = 42
catalog = "data/catalog.toml"
"#;
        let config: CorrelabConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.total_rounds, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.points_per_round, 30);
        assert_eq!(config.catalog, PathBuf::from("data/catalog.toml"));
        assert_eq!(config.game_settings().total_rounds, 3);
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from(Some(Path::new("/nonexistent/correlab.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("correlab.toml");
        std::fs::write(&path, "total_rounds = 0\n").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("total_rounds"));
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("correlab.toml");
        std::fs::write(&path, "practice = false\npoints_per_round = 12\n").unwrap();
        let config = parse_config_file(&path).unwrap();
        assert!(!config.practice);
        assert_eq!(config.points_per_round, 12);
    }
}
