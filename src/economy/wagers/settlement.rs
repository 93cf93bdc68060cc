//! Wager settlement
//!
//! `pending -> resolved{won|lost}` happens once per wager. The store's
//! conditional update decides which caller performs the transition; every
//! other attempt is a no-op.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;

use crate::economy::events::{notify, EconomyEvent, EventSink};
use crate::economy::models::{ResolutionResult, Settlement, Wager};
use crate::economy::store::{CourseworkSource, WagerStore};

pub struct SettlementEngine {
    coursework: Arc<dyn CourseworkSource>,
    wagers: Arc<dyn WagerStore>,
    sink: Arc<dyn EventSink>,
}

impl SettlementEngine {
    pub fn new(
        coursework: Arc<dyn CourseworkSource>,
        wagers: Arc<dyn WagerStore>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            coursework,
            wagers,
            sink,
        }
    }

    /// Settle every unresolved wager whose item now has a real grade.
    ///
    /// Store errors abort the pass; wagers settled before the error stay settled.
    pub fn resolve_pending_wagers(&self, user_id: &str) -> Result<Vec<ResolutionResult>> {
        let pending = self.wagers.unresolved_wagers(user_id)?;
        let mut results = Vec::new();

        for wager in &pending {
            if let Some(result) = self.settle(user_id, wager)? {
                results.push(result);
            }
        }

        tracing::debug!(
            user_id,
            pending = pending.len(),
            resolved = results.len(),
            "Settlement pass finished"
        );
        Ok(results)
    }

    /// Settle one wager. `None` when it is still waiting on a grade or was
    /// already resolved.
    pub fn resolve_wager(&self, user_id: &str, wager_id: &str) -> Result<Option<ResolutionResult>> {
        let wager = self
            .wagers
            .get_wager(user_id, wager_id)?
            .ok_or_else(|| anyhow!("Wager '{}' not found", wager_id))?;

        if wager.resolved {
            tracing::debug!(user_id, wager_id, "Wager already resolved");
            return Ok(None);
        }
        self.settle(user_id, &wager)
    }

    fn settle(&self, user_id: &str, wager: &Wager) -> Result<Option<ResolutionResult>> {
        let Some(item) = self.coursework.item(user_id, &wager.item_id)? else {
            tracing::warn!(
                user_id,
                wager_id = %wager.id,
                item_id = %wager.item_id,
                "Wagered assignment no longer exists, leaving wager pending"
            );
            return Ok(None);
        };

        let Some(actual_grade) = item.real_grade() else {
            return Ok(None);
        };

        let won = actual_grade >= wager.required_score;
        let settlement = Settlement {
            won,
            points_awarded: if won { wager.potential_payout() } else { 0.0 },
            actual_grade,
            resolved_at: Utc::now().timestamp_millis(),
        };

        if !self.wagers.resolve_wager(&wager.id, &settlement)? {
            tracing::debug!(user_id, wager_id = %wager.id, "Wager settled by another caller");
            return Ok(None);
        }

        tracing::info!(
            user_id,
            wager_id = %wager.id,
            actual_grade,
            required_score = wager.required_score,
            won,
            points_awarded = settlement.points_awarded,
            "Wager resolved"
        );
        notify(
            self.sink.as_ref(),
            EconomyEvent::WagerResolved {
                user_id: user_id.to_string(),
                wager_id: wager.id.clone(),
                won,
                points_awarded: settlement.points_awarded,
            },
        );

        Ok(Some(ResolutionResult {
            wager_id: wager.id.clone(),
            item_id: wager.item_id.clone(),
            actual_grade,
            required_score: wager.required_score,
            won,
            points_awarded: settlement.points_awarded,
            resolved_at: settlement.resolved_at,
        }))
    }
}
