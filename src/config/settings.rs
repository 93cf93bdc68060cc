//! Settings configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file (defaults to ~/.gradestake/economy.db)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Wagering and odds tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomySettings {
    /// Free tier: largest stake as a fraction of total achievement points
    /// (total includes points currently staked)
    #[serde(default = "default_free_max_bet_percentage")]
    pub free_max_bet_percentage: f64,

    /// Lowest base score ever reported; also the reported value for a perfect average
    #[serde(default = "default_base_score_floor")]
    pub base_score_floor: f64,

    /// Fewer graded items than this adds a "limited data" factor
    #[serde(default = "default_limited_history_threshold")]
    pub limited_history_threshold: usize,

    /// Grade standard deviation above this adds a volatility factor
    #[serde(default = "default_volatility_stdev_threshold")]
    pub volatility_stdev_threshold: f64,
}

fn default_free_max_bet_percentage() -> f64 {
    0.25
}

fn default_base_score_floor() -> f64 {
    65.0
}

fn default_limited_history_threshold() -> usize {
    3
}

fn default_volatility_stdev_threshold() -> f64 {
    10.0
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            free_max_bet_percentage: default_free_max_bet_percentage(),
            base_score_floor: default_base_score_floor(),
            limited_history_threshold: default_limited_history_threshold(),
            volatility_stdev_threshold: default_volatility_stdev_threshold(),
        }
    }
}
