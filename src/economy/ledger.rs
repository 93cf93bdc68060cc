//! Points ledger
//!
//! Balances are computed views over achievement and wager rows. Nothing here
//! is stored, so the totals cannot drift from their inputs.
//!
//! A settled wager moves the total by `points_awarded - amount`: a loss
//! forfeits the stake, a win returns `amount * multiplier`.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use super::models::{AchievementRecord, Wager};
use super::store::{AchievementStore, WagerStore};

/// `Σ unlocked ? points : points * progress / 100`, never negative
pub fn achievement_points(records: &[AchievementRecord]) -> f64 {
    records
        .iter()
        .map(AchievementRecord::earned_points)
        .sum::<f64>()
        .max(0.0)
}

/// Net outcome of resolved wagers: `Σ points_awarded - amount`
pub fn settled_points(wagers: &[Wager]) -> f64 {
    wagers
        .iter()
        .filter(|w| w.resolved)
        .map(|w| w.points_awarded - w.amount)
        .sum()
}

/// Points locked in unresolved wagers
pub fn staked_points(wagers: &[Wager]) -> f64 {
    wagers.iter().filter(|w| !w.resolved).map(|w| w.amount).sum()
}

/// Achievement points plus settled outcomes, floored at zero
pub fn total_points(records: &[AchievementRecord], wagers: &[Wager]) -> f64 {
    (achievement_points(records) + settled_points(wagers)).max(0.0)
}

/// Unclamped `total - staked`; the wager insert guard compares against this
pub fn available_points(records: &[AchievementRecord], wagers: &[Wager]) -> f64 {
    total_points(records, wagers) - staked_points(wagers)
}

/// Point balances for one user
#[derive(Debug, Clone, Default, Serialize)]
pub struct Balance {
    /// Points earned from achievements alone
    pub achievements: f64,
    /// Net result of settled wagers (negative after losses)
    pub settled: f64,
    /// `max(0, achievements + settled)`, includes points currently staked
    pub total: f64,
    /// Sum of unresolved wager amounts
    pub staked: f64,
    /// `max(0, total - staked)`
    pub spendable: f64,
    pub open_wagers: usize,
    /// Gross payouts from won wagers
    pub winnings: f64,
}

impl Balance {
    pub fn from_rows(records: &[AchievementRecord], wagers: &[Wager]) -> Self {
        let total = total_points(records, wagers);
        let staked = staked_points(wagers);

        Self {
            achievements: achievement_points(records),
            settled: settled_points(wagers),
            total,
            staked,
            // A reversible rule can drop the total under what is already
            // staked; report zero rather than a debt
            spendable: (total - staked).max(0.0),
            open_wagers: wagers.iter().filter(|w| !w.resolved).count(),
            winnings: wagers
                .iter()
                .filter(|w| w.resolved && w.won)
                .map(|w| w.points_awarded)
                .sum(),
        }
    }
}

#[derive(Clone)]
pub struct PointsLedger {
    achievements: Arc<dyn AchievementStore>,
    wagers: Arc<dyn WagerStore>,
}

impl PointsLedger {
    pub fn new(achievements: Arc<dyn AchievementStore>, wagers: Arc<dyn WagerStore>) -> Self {
        Self {
            achievements,
            wagers,
        }
    }

    pub fn total_points(&self, user_id: &str) -> Result<f64> {
        Ok(self.balance(user_id)?.total)
    }

    pub fn spendable_balance(&self, user_id: &str) -> Result<f64> {
        Ok(self.balance(user_id)?.spendable)
    }

    /// All balances from a single read of each table
    pub fn balance(&self, user_id: &str) -> Result<Balance> {
        let records = self.achievements.list_achievements(user_id)?;
        let wagers = self.wagers.list_wagers(user_id)?;
        Ok(Balance::from_rows(&records, &wagers))
    }
}
