//! Wager creation
//!
//! Validation runs in a fixed order and stops at the first failure. The final
//! balance check is repeated inside the insert statement so two concurrent
//! requests cannot spend the same points.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::EconomySettings;
use crate::economy::error::{TierLimit, WagerError};
use crate::economy::events::{notify, EconomyEvent, EventSink};
use crate::economy::ledger::PointsLedger;
use crate::economy::models::{ItemKind, Tier, Wager};
use crate::economy::odds::{max_multiplier, OddsEngine};
use crate::economy::repository::BALANCE_EPSILON;
use crate::economy::store::{CourseworkSource, WagerStore};

pub struct WagerManager {
    coursework: Arc<dyn CourseworkSource>,
    wagers: Arc<dyn WagerStore>,
    ledger: PointsLedger,
    odds: OddsEngine,
    settings: EconomySettings,
    sink: Arc<dyn EventSink>,
}

impl WagerManager {
    pub fn new(
        coursework: Arc<dyn CourseworkSource>,
        wagers: Arc<dyn WagerStore>,
        ledger: PointsLedger,
        odds: OddsEngine,
        settings: EconomySettings,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            coursework,
            wagers,
            ledger,
            odds,
            settings,
            sink,
        }
    }

    /// Validate and place a wager on a not-yet-graded item
    pub fn create_wager(
        &self,
        user_id: &str,
        item_id: &str,
        amount: f64,
        multiplier: f64,
    ) -> Result<Wager, WagerError> {
        let item = self
            .coursework
            .item(user_id, item_id)?
            .ok_or_else(|| WagerError::ItemNotFound(item_id.to_string()))?;

        if item.is_graded() {
            return Err(WagerError::AlreadyGraded(item.id));
        }

        let now = Utc::now().timestamp_millis();
        if item.kind != ItemKind::Fixture && item.is_past_due(now) {
            return Err(WagerError::PastDue(item.id));
        }

        let tier = self.coursework.profile(user_id)?.tier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(WagerError::InvalidMultiplier(multiplier));
        }
        let cap = max_multiplier(tier);
        if multiplier > cap + BALANCE_EPSILON {
            return Err(WagerError::OverTierLimit {
                tier,
                limit: TierLimit::Multiplier {
                    requested: multiplier,
                    cap,
                },
            });
        }

        if !amount.is_finite() || amount <= 0.0 {
            return Err(WagerError::InvalidAmount(amount));
        }
        let balance = self.ledger.balance(user_id)?;
        if amount > balance.spendable + BALANCE_EPSILON {
            return Err(WagerError::InsufficientBalance {
                requested: amount,
                available: balance.spendable,
            });
        }

        // Measured against the total, which still includes staked points
        if tier == Tier::Free {
            let max = self.settings.free_max_bet_percentage * balance.total;
            if amount > max + BALANCE_EPSILON {
                return Err(WagerError::OverTierLimit {
                    tier,
                    limit: TierLimit::BetSize {
                        requested: amount,
                        max,
                    },
                });
            }
        }

        let estimate = self.odds.estimate_for_item(user_id, &item)?;
        let required_score = self.odds.required_score(estimate.base_score, multiplier, tier);

        let wager = Wager {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            item_id: item.id,
            course_id: item.course_id,
            amount,
            multiplier,
            base_score: estimate.base_score,
            required_score,
            tier,
            resolved: false,
            won: false,
            points_awarded: 0.0,
            actual_grade: None,
            created_at: now,
            resolved_at: None,
        };

        if !self.wagers.insert_wager_if_affordable(&wager)? {
            let available = self.ledger.spendable_balance(user_id)?;
            tracing::warn!(
                user_id,
                amount,
                available,
                "Wager lost a concurrent balance race"
            );
            return Err(WagerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        tracing::info!(
            user_id,
            wager_id = %wager.id,
            item_id = %wager.item_id,
            amount,
            multiplier,
            required_score,
            "Wager placed"
        );
        notify(
            self.sink.as_ref(),
            EconomyEvent::WagerPlaced {
                user_id: user_id.to_string(),
                wager_id: wager.id.clone(),
                amount,
                multiplier,
                required_score,
            },
        );

        Ok(wager)
    }

    /// All wagers for the user, newest first
    pub fn wagers(&self, user_id: &str) -> anyhow::Result<Vec<Wager>> {
        self.wagers.list_wagers(user_id)
    }
}
