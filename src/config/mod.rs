//! Configuration loading and management

mod io;
mod settings;

pub use settings::{DatabaseSettings, EconomySettings};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure (`~/.gradestake/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage settings
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Wagering and odds tuning
    #[serde(default)]
    pub economy: EconomySettings,
}

impl Config {
    /// Database file to open: explicit setting or `~/.gradestake/economy.db`
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("economy.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.economy.free_max_bet_percentage, 0.25);
        assert_eq!(config.economy.base_score_floor, 65.0);
        assert_eq!(config.economy.limited_history_threshold, 3);
        assert_eq!(config.economy.volatility_stdev_threshold, 10.0);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_partial_section() {
        let config: Config = toml::from_str(
            r#"
            [economy]
            free_max_bet_percentage = 0.5

            [database]
            path = "/tmp/economy.db"
            "#,
        )
        .unwrap();
        assert_eq!(config.economy.free_max_bet_percentage, 0.5);
        assert_eq!(config.economy.base_score_floor, 65.0);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/economy.db"));
    }

    #[test]
    fn test_default_database_path() {
        let config = Config::default();
        assert!(config.database_path().ends_with(".gradestake/economy.db"));
    }
}
