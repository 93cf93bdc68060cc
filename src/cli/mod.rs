//! CLI command implementations

pub mod achievements;
pub mod estimate;
pub mod import;
pub mod init;
pub mod odds;
pub mod points;
pub mod resolve;
pub mod wager;
pub mod wagers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use serde::Serialize;

use gradestake::config::Config;
use gradestake::economy::{EconomyDb, EconomyManager, TracingSink};

/// Resolved settings shared by every command
pub struct Context {
    pub config: Config,
    pub db_path: PathBuf,
    pub json: bool,
}

impl Context {
    pub fn load(config_path: Option<&Path>, db_override: Option<PathBuf>, json: bool) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        let db_path = db_override.unwrap_or_else(|| config.database_path());
        tracing::debug!("Using economy db {}", db_path.display());

        Ok(Self {
            config,
            db_path,
            json,
        })
    }

    pub fn open_db(&self) -> Result<EconomyDb> {
        EconomyDb::open(&self.db_path)
    }

    pub fn economy(&self) -> Result<EconomyManager> {
        Ok(EconomyManager::from_db(
            self.open_db()?,
            self.config.economy.clone(),
            Arc::new(TracingSink),
        ))
    }

    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{}", out);
        Ok(())
    }
}
