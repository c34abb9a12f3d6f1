//! Hero draft win-rate prediction and pick/ban recommendation
//!
//! Estimates how hero selections and exclusions in a two-team draft affect
//! win probability, and recommends the next pick or ban that maximizes a
//! team's predicted win rate.

pub mod data;
pub mod features;
pub mod model;
pub mod predict;
pub mod training;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Side of the draft. Team1 is the side the training label refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Team1,
    Team2,
}

impl Team {
    /// The opposing side
    pub fn opponent(self) -> Team {
        match self {
            Team::Team1 => Team::Team2,
            Team::Team2 => Team::Team1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Team1 => write!(f, "team1"),
            Team::Team2 => write!(f, "team2"),
        }
    }
}

impl std::str::FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "team1" | "t1" | "1" | "blue" => Ok(Team::Team1),
            "team2" | "t2" | "2" | "red" => Ok(Team::Team2),
            _ => Err(format!("Unknown team: {}. Use team1/blue or team2/red.", s)),
        }
    }
}

/// A single historical game: picks and bans for both sides plus the outcome.
///
/// Pick order is draft order; ban order carries no meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub team1_picks: Vec<String>,
    pub team2_picks: Vec<String>,
    pub team1_bans: Vec<String>,
    pub team2_bans: Vec<String>,
    /// True if team1 won
    pub team1_won: bool,
}

/// Picks and bans for both teams at some point in the drafting process.
///
/// A given hero identifier is expected to appear in at most one of the four
/// sequences at any time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftState {
    pub team1_picks: Vec<String>,
    pub team2_picks: Vec<String>,
    pub team1_bans: Vec<String>,
    pub team2_bans: Vec<String>,
}

impl DraftState {
    pub fn picks(&self, team: Team) -> &[String] {
        match team {
            Team::Team1 => &self.team1_picks,
            Team::Team2 => &self.team2_picks,
        }
    }

    pub fn picks_mut(&mut self, team: Team) -> &mut Vec<String> {
        match team {
            Team::Team1 => &mut self.team1_picks,
            Team::Team2 => &mut self.team2_picks,
        }
    }

    pub fn bans(&self, team: Team) -> &[String] {
        match team {
            Team::Team1 => &self.team1_bans,
            Team::Team2 => &self.team2_bans,
        }
    }

    /// All hero identifiers present in any of the four sequences
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.team1_picks
            .iter()
            .chain(&self.team2_picks)
            .chain(&self.team1_bans)
            .chain(&self.team2_bans)
            .map(String::as_str)
    }
}

/// A ranked recommendation: a hero and the predicted win rate (or ban
/// priority) it would yield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub hero: String,
    pub score: f32,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Data error: {0}")]
    Data(String),

    #[error("Model artifact error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DraftError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub training: TrainingConfig,
    pub model: ModelConfig,
    pub stats: StatsConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    /// Fraction of examples held out for diagnostic evaluation
    pub holdout_fraction: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub hidden1: usize,
    pub hidden2: usize,
    pub dropout: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Laplace smoothing pseudo-count
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub games_path: String,
    pub model_path: String,
    pub stats_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            training: TrainingConfig {
                epochs: 300,
                learning_rate: 0.05,
                holdout_fraction: 0.2,
                seed: 42,
            },
            model: ModelConfig {
                hidden1: 128,
                hidden2: 64,
                dropout: 0.1,
            },
            stats: StatsConfig { alpha: 1.0 },
            data: DataConfig {
                games_path: "data/games.csv".to_string(),
                model_path: "model/draft_model".to_string(),
                stats_path: "model/draft_stats.json".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DraftError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| DraftError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DraftError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_team_parsing() {
        assert_eq!(Team::from_str("team1").unwrap(), Team::Team1);
        assert_eq!(Team::from_str("Blue").unwrap(), Team::Team1);
        assert_eq!(Team::from_str("red").unwrap(), Team::Team2);
        assert_eq!(Team::from_str("2").unwrap(), Team::Team2);
        assert!(Team::from_str("green").is_err());
    }

    #[test]
    fn test_team_opponent() {
        assert_eq!(Team::Team1.opponent(), Team::Team2);
        assert_eq!(Team::Team2.opponent(), Team::Team1);
    }

    #[test]
    fn test_draft_state_accessors() {
        let mut state = DraftState::default();
        state.picks_mut(Team::Team2).push("Ahri".to_string());
        assert!(state.picks(Team::Team1).is_empty());
        assert_eq!(state.picks(Team::Team2), ["Ahri".to_string()]);
        assert_eq!(state.all_names().count(), 1);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.training.epochs, config.training.epochs);
        assert_eq!(parsed.stats.alpha, config.stats.alpha);
        assert_eq!(parsed.data.games_path, config.data.games_path);
    }
}
