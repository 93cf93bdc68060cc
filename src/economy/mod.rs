//! Points economy for gradestake
//!
//! Turns coursework activity into achievement points and lets users stake
//! those points on upcoming grades. State lives in a SQLite database
//! (`~/.gradestake/economy.db`).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │    LMS sync     │     │ Account service │
//! │ (grades, syncs) │     │ (tier, profile) │
//! └────────┬────────┘     └────────┬────────┘
//!          └───────────┬───────────┘
//!                      ▼
//!        MetricsCollector ──► AchievementEngine ──► achievements
//!                                                        │
//!                                  PointsLedger ◄────────┤
//!                                       │                │
//!        OddsEngine ──► WagerManager ───┴──► wagers ◄── SettlementEngine
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let economy = EconomyManager::with_path(&db_path, EconomySettings::default(), Arc::new(TracingSink))?;
//!
//! economy.evaluate_achievements("u1")?;
//! let wager = economy.create_wager("u1", "essay-3", 20.0, 1.3)?;
//!
//! // Later, once the grade has synced
//! let settled = economy.resolve_pending_wagers("u1")?;
//! ```

pub mod achievements;
mod db;
mod error;
mod events;
mod ledger;
mod metrics;
mod models;
mod odds;
mod repository;
mod store;
mod wagers;

pub use achievements::{
    Achievement, AchievementCategory, AchievementEngine, AchievementId, EvaluationReport, Level,
    LevelInfo, UnlockedAchievement, ACHIEVEMENTS,
};
pub use db::EconomyDb;
pub use error::{TierLimit, WagerError};
pub use events::{notify, EconomyEvent, EventSink, NullSink, TracingSink};
pub use ledger::{Balance, PointsLedger};
pub use metrics::{MetricsCollector, MetricsSnapshot, GRADE_THRESHOLDS};
pub use models::{
    AchievementRecord, Course, CourseworkSnapshot, GradedItem, ItemKind, Profile,
    ResolutionResult, Scope, Settlement, Tier, Wager, WagerStatus,
};
pub use odds::{
    max_multiplier, multiplier_from_score, OddsEngine, Quote, ScoreEstimate, TargetQuote,
};
pub use repository::{
    AchievementRepository, CourseworkRepository, WagerRepository, BALANCE_EPSILON,
};
pub use store::{AchievementStore, CourseworkSource, WagerStore};
pub use wagers::{SettlementEngine, WagerManager};

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::config::EconomySettings;

/// Service facade over the economy engines
///
/// Every engine gets its storage injected; `from_stores` accepts any
/// implementation of the storage traits.
pub struct EconomyManager {
    achievements: AchievementEngine,
    ledger: PointsLedger,
    odds: OddsEngine,
    wagers: WagerManager,
    settlement: SettlementEngine,
}

impl EconomyManager {
    /// Create an EconomyManager with a custom database path
    pub fn with_path(
        path: &Path,
        settings: EconomySettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let db = EconomyDb::open(path)?;
        Ok(Self::from_db(db, settings, sink))
    }

    /// Wire the SQLite repositories over an open database
    pub fn from_db(db: EconomyDb, settings: EconomySettings, sink: Arc<dyn EventSink>) -> Self {
        Self::from_stores(
            Arc::new(CourseworkRepository::new(db.clone())),
            Arc::new(AchievementRepository::new(db.clone())),
            Arc::new(WagerRepository::new(db)),
            settings,
            sink,
        )
    }

    pub fn from_stores(
        coursework: Arc<dyn CourseworkSource>,
        achievement_store: Arc<dyn AchievementStore>,
        wager_store: Arc<dyn WagerStore>,
        settings: EconomySettings,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let ledger = PointsLedger::new(achievement_store.clone(), wager_store.clone());
        let odds = OddsEngine::new(coursework.clone(), settings.clone());

        Self {
            achievements: AchievementEngine::new(
                MetricsCollector::new(coursework.clone()),
                achievement_store,
                sink.clone(),
            ),
            wagers: WagerManager::new(
                coursework.clone(),
                wager_store.clone(),
                ledger.clone(),
                odds.clone(),
                settings,
                sink.clone(),
            ),
            settlement: SettlementEngine::new(coursework, wager_store, sink),
            ledger,
            odds,
        }
    }

    // ============================================
    // ACHIEVEMENTS
    // ============================================

    /// Run an evaluation pass, then return the user's achievement rows
    pub fn get_achievements(&self, user_id: &str) -> Result<Vec<AchievementRecord>> {
        self.achievements.evaluate(user_id)?;
        self.achievements.achievements(user_id)
    }

    pub fn evaluate_achievements(&self, user_id: &str) -> Result<EvaluationReport> {
        self.achievements.evaluate(user_id)
    }

    // ============================================
    // POINTS
    // ============================================

    pub fn get_total_points(&self, user_id: &str) -> Result<f64> {
        self.ledger.total_points(user_id)
    }

    pub fn get_spendable_points(&self, user_id: &str) -> Result<f64> {
        self.ledger.spendable_balance(user_id)
    }

    pub fn get_balance(&self, user_id: &str) -> Result<Balance> {
        self.ledger.balance(user_id)
    }

    pub fn get_level(&self, user_id: &str) -> Result<LevelInfo> {
        Ok(LevelInfo::new(self.get_total_points(user_id)?))
    }

    // ============================================
    // ODDS
    // ============================================

    pub fn get_score_estimate(&self, user_id: &str, scope: &Scope) -> Result<ScoreEstimate> {
        self.odds.estimate(user_id, scope)
    }

    pub fn quote(&self, user_id: &str, item_id: &str, multiplier: f64) -> Result<Quote> {
        self.odds.quote(user_id, item_id, multiplier)
    }

    pub fn multiplier_for_target(
        &self,
        user_id: &str,
        item_id: &str,
        target: f64,
    ) -> Result<TargetQuote> {
        self.odds.multiplier_for_target(user_id, item_id, target)
    }

    // ============================================
    // WAGERS
    // ============================================

    pub fn create_wager(
        &self,
        user_id: &str,
        item_id: &str,
        amount: f64,
        multiplier: f64,
    ) -> std::result::Result<Wager, WagerError> {
        self.wagers.create_wager(user_id, item_id, amount, multiplier)
    }

    pub fn resolve_pending_wagers(&self, user_id: &str) -> Result<Vec<ResolutionResult>> {
        self.settlement.resolve_pending_wagers(user_id)
    }

    pub fn resolve_wager(&self, user_id: &str, wager_id: &str) -> Result<Option<ResolutionResult>> {
        self.settlement.resolve_wager(user_id, wager_id)
    }

    /// All wagers, newest first
    pub fn get_wagers(&self, user_id: &str) -> Result<Vec<Wager>> {
        self.wagers.wagers(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_economy_manager_roundtrip() {
        let dir = tempdir().unwrap();
        let db = EconomyDb::open(&dir.path().join("test_economy.db")).unwrap();
        let due = chrono::Utc::now().timestamp_millis() + 86_400_000;

        CourseworkRepository::new(db.clone())
            .apply_snapshot(&CourseworkSnapshot {
                user_id: "u1".to_string(),
                profile: Profile {
                    tier: Tier::Premium,
                    has_profile_picture: true,
                    ..Profile::default()
                },
                courses: vec![Course {
                    id: "c1".to_string(),
                    name: "Chemistry".to_string(),
                }],
                assignments: vec![GradedItem {
                    id: "lab-1".to_string(),
                    course_id: "c1".to_string(),
                    title: "Titration lab".to_string(),
                    kind: ItemKind::Assignment,
                    score: None,
                    placeholder: false,
                    due_at: Some(due),
                    completed: false,
                }],
                syncs: vec![1_700_000_000_000],
            })
            .unwrap();

        let coursework = CourseworkRepository::new(db.clone());
        let manager = EconomyManager::from_db(db, EconomySettings::default(), Arc::new(NullSink));

        // Connected (10) + Picture Perfect (10) + Sync Regular at 1/25 of 50
        let rows = manager.get_achievements("u1").unwrap();
        assert_eq!(rows.len(), ACHIEVEMENTS.len());
        assert!((manager.get_total_points("u1").unwrap() - 22.0).abs() < 1e-9);
        assert_eq!(manager.get_level("u1").unwrap().level, 1);

        let wager = manager.create_wager("u1", "lab-1", 20.0, 3.0).unwrap();
        // No history: base is floored at 65, premium 3.0x is +20
        assert_eq!(wager.required_score, 85.0);
        assert!((manager.get_spendable_points("u1").unwrap() - 2.0).abs() < 1e-9);

        coursework.set_score("u1", "lab-1", Some(91.0), false).unwrap();
        let results = manager.resolve_pending_wagers("u1").unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].won);
        assert_eq!(results[0].points_awarded, 60.0);

        // Stake of 20 returned as 60: net +40
        let balance = manager.get_balance("u1").unwrap();
        assert!((balance.total - 62.0).abs() < 1e-9);
        assert!((balance.spendable - 62.0).abs() < 1e-9);
        assert_eq!(balance.winnings, 60.0);
        assert_eq!(manager.get_wagers("u1").unwrap()[0].status(), WagerStatus::Won);
    }
}
