//! SQLite database connection and schema management for the points economy
//!
//! Manages the `~/.gradestake/economy.db` database with automatic schema migration.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Database wrapper shared by all repositories
#[derive(Clone)]
pub struct EconomyDb {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl EconomyDb {
    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create economy dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open economy db: {}", path.display()))?;

        // Set first so concurrent openers wait instead of failing with SQLITE_BUSY
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        // WAL lets a second process read while a wager write is in flight
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Get a reference to the connection
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Economy DB lock poisoned")
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: settled wagers become read-only at the storage layer
        if version < 2 {
            conn.execute_batch(
                r#"
                CREATE TRIGGER IF NOT EXISTS wagers_immutable_once_resolved
                BEFORE UPDATE ON wagers
                WHEN OLD.resolved = 1
                BEGIN
                    SELECT RAISE(ABORT, 'wager is already resolved');
                END;
                "#,
            )?;
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }

    /// Delete all economy data for one user (achievements and wagers)
    pub fn reset_user(&self, user_id: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM wagers WHERE user_id = ?1", [user_id])?;
        conn.execute("DELETE FROM achievements WHERE user_id = ?1", [user_id])?;
        Ok(())
    }
}

/// SQL schema for the economy database
const SCHEMA_SQL: &str = r#"
-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);

-- ============================================
-- COURSEWORK (written by the LMS sync)
-- ============================================

CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    tier TEXT NOT NULL DEFAULT 'free',
    has_profile_picture INTEGER NOT NULL DEFAULT 0,
    dark_mode INTEGER NOT NULL DEFAULT 0,
    notifications_enabled INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS courses (
    user_id TEXT NOT NULL,
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    PRIMARY KEY (user_id, id)
);

CREATE TABLE IF NOT EXISTS assignments (
    user_id TEXT NOT NULL,
    id TEXT NOT NULL,
    course_id TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    kind TEXT NOT NULL DEFAULT 'assignment',
    score REAL,                           -- percent 0-100, NULL when ungraded
    placeholder INTEGER NOT NULL DEFAULT 0, -- score is an LMS placeholder, not a grade
    due_at INTEGER,
    completed INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, id)
);
CREATE INDEX IF NOT EXISTS idx_assignments_course ON assignments(user_id, course_id);

CREATE TABLE IF NOT EXISTS sync_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    synced_at INTEGER NOT NULL,
    UNIQUE (user_id, synced_at)
);
CREATE INDEX IF NOT EXISTS idx_sync_user ON sync_events(user_id);

-- ============================================
-- ECONOMY
-- ============================================

CREATE TABLE IF NOT EXISTS achievements (
    user_id TEXT NOT NULL,
    id TEXT NOT NULL,
    title TEXT NOT NULL,
    requirement_json TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    points INTEGER NOT NULL,
    progress INTEGER NOT NULL DEFAULT 0 CHECK (progress BETWEEN 0 AND 100),
    unlocked INTEGER NOT NULL DEFAULT 0,
    unlocked_at INTEGER,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, id),
    UNIQUE (user_id, title),
    CHECK (unlocked = (progress = 100))
);

CREATE TABLE IF NOT EXISTS wagers (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    item_id TEXT NOT NULL,
    course_id TEXT NOT NULL,
    amount REAL NOT NULL CHECK (amount > 0),
    multiplier REAL NOT NULL,
    base_score REAL NOT NULL,
    required_score REAL NOT NULL,
    tier TEXT NOT NULL,
    resolved INTEGER NOT NULL DEFAULT 0,
    won INTEGER NOT NULL DEFAULT 0,
    points_awarded REAL NOT NULL DEFAULT 0,
    actual_grade REAL,
    created_at INTEGER NOT NULL,
    resolved_at INTEGER
);
CREATE INDEX IF NOT EXISTS idx_wagers_user_open ON wagers(user_id, resolved);
"#;
