//! Storage seams
//!
//! Engines hold these as `Arc<dyn ...>` so tests can swap in fakes. The SQLite
//! implementations live in `repository.rs`.

use anyhow::Result;

use super::models::{AchievementRecord, GradedItem, Profile, Settlement, Wager};

/// Read access to records written by the LMS sync and account provider
pub trait CourseworkSource: Send + Sync {
    /// Profile for the user; a user without one is a free-tier default
    fn profile(&self, user_id: &str) -> Result<Profile>;

    /// Every gradable item the user has, across all courses
    fn items(&self, user_id: &str) -> Result<Vec<GradedItem>>;

    fn item(&self, user_id: &str, item_id: &str) -> Result<Option<GradedItem>>;

    /// Number of completed LMS syncs
    fn sync_count(&self, user_id: &str) -> Result<u64>;
}

/// Per-user achievement rows
pub trait AchievementStore: Send + Sync {
    fn list_achievements(&self, user_id: &str) -> Result<Vec<AchievementRecord>>;

    fn insert_achievement(&self, user_id: &str, record: &AchievementRecord) -> Result<()>;

    fn update_achievement_progress(
        &self,
        user_id: &str,
        achievement_id: &str,
        progress: u8,
        unlocked: bool,
    ) -> Result<()>;
}

/// Per-user wager rows
pub trait WagerStore: Send + Sync {
    /// All wagers, newest first
    fn list_wagers(&self, user_id: &str) -> Result<Vec<Wager>>;

    fn unresolved_wagers(&self, user_id: &str) -> Result<Vec<Wager>>;

    fn get_wager(&self, user_id: &str, wager_id: &str) -> Result<Option<Wager>>;

    /// Insert `wager` only if the user's spendable balance, recomputed
    /// atomically with the write, still covers `wager.amount`.
    ///
    /// Returns `false` when the balance no longer covers the stake.
    fn insert_wager_if_affordable(&self, wager: &Wager) -> Result<bool>;

    /// Apply the one-time settlement transition.
    ///
    /// Returns `false` when the wager was already resolved (no write happened).
    fn resolve_wager(&self, wager_id: &str, settlement: &Settlement) -> Result<bool>;
}
