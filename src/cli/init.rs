//! Init command implementation

use anyhow::{bail, Result};
use std::path::PathBuf;

use gradestake::config::Config;
use gradestake::economy::EconomyDb;

/// Write a default config and create the database schema
pub fn init_command(config_path: Option<PathBuf>, db: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    let mut config = Config::default();
    config.database.path = db;
    config.save_to_file(&config_path)?;
    println!("Created: {}", config_path.display());

    let db_path = config.database_path();
    EconomyDb::open(&db_path)?;
    println!("Database: {}", db_path.display());

    Ok(())
}
