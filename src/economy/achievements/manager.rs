//! Achievement engine
//!
//! Runs the fixed catalog against a metrics snapshot and writes each rule's
//! progress. Rules are independent: a failed write is logged and the pass
//! moves on to the next rule.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use super::checker::{plan, RuleAction};
use super::definitions::{Achievement, ACHIEVEMENTS};
use crate::economy::events::{notify, EconomyEvent, EventSink};
use crate::economy::metrics::{MetricsCollector, MetricsSnapshot};
use crate::economy::models::AchievementRecord;
use crate::economy::store::AchievementStore;

/// An achievement that was just unlocked
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    pub id: &'static str,
    pub title: &'static str,
    pub points: u32,
}

impl From<&'static Achievement> for UnlockedAchievement {
    fn from(a: &'static Achievement) -> Self {
        Self {
            id: a.id.as_str(),
            title: a.title,
            points: a.points,
        }
    }
}

/// What one evaluation pass did
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationReport {
    pub created: Vec<&'static str>,
    pub updated: Vec<&'static str>,
    pub unlocked: Vec<UnlockedAchievement>,
    /// Sticky rules already unlocked and excluded from recomputation
    pub skipped: Vec<&'static str>,
    /// Rules whose write failed
    pub failed: Vec<&'static str>,
    /// The pass ran on the zero-valued fallback snapshot
    pub degraded: bool,
}

/// Evaluates achievement rules and owns per-achievement point attribution
pub struct AchievementEngine {
    collector: MetricsCollector,
    store: Arc<dyn AchievementStore>,
    sink: Arc<dyn EventSink>,
}

impl AchievementEngine {
    pub fn new(
        collector: MetricsCollector,
        store: Arc<dyn AchievementStore>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            collector,
            store,
            sink,
        }
    }

    /// Collect metrics and evaluate every rule for the user
    pub fn evaluate(&self, user_id: &str) -> Result<EvaluationReport> {
        let metrics = self.collector.collect(user_id);
        self.evaluate_with(user_id, &metrics)
    }

    /// Evaluate every rule against an already collected snapshot
    pub fn evaluate_with(
        &self,
        user_id: &str,
        metrics: &MetricsSnapshot,
    ) -> Result<EvaluationReport> {
        let existing = self.store.list_achievements(user_id)?;
        let by_id: HashMap<&str, &AchievementRecord> =
            existing.iter().map(|r| (r.id.as_str(), r)).collect();

        let mut report = EvaluationReport {
            degraded: metrics.degraded,
            ..EvaluationReport::default()
        };

        for achievement in ACHIEVEMENTS {
            let id = achievement.id.as_str();
            let action = plan(achievement, by_id.get(id).copied(), metrics);

            let written = match action {
                RuleAction::Skip => {
                    report.skipped.push(id);
                    continue;
                }
                RuleAction::Unchanged => continue,
                RuleAction::Create { progress } => self
                    .store
                    .insert_achievement(user_id, &new_record(achievement, progress))
                    .map(|_| report.created.push(id)),
                RuleAction::Update { to, .. } => self
                    .store
                    .update_achievement_progress(user_id, id, to, to == 100)
                    .map(|_| report.updated.push(id)),
            };

            if let Err(e) = written {
                tracing::warn!(user_id, achievement = id, "Failed to write achievement: {:#}", e);
                report.failed.push(id);
                continue;
            }

            if action.unlocks() {
                tracing::debug!(user_id, achievement = id, "Achievement unlocked");
                notify(
                    self.sink.as_ref(),
                    EconomyEvent::AchievementUnlocked {
                        user_id: user_id.to_string(),
                        achievement_id: id.to_string(),
                        title: achievement.title.to_string(),
                        points: achievement.points,
                    },
                );
                report.unlocked.push(achievement.into());
            }
        }

        Ok(report)
    }

    /// Stored achievement rows for the user
    pub fn achievements(&self, user_id: &str) -> Result<Vec<AchievementRecord>> {
        self.store.list_achievements(user_id)
    }
}

fn new_record(achievement: &Achievement, progress: u8) -> AchievementRecord {
    let unlocked = progress == 100;
    AchievementRecord {
        id: achievement.id.as_str().to_string(),
        title: achievement.title.to_string(),
        requirement: achievement.requirement,
        difficulty: achievement.difficulty,
        points: achievement.points,
        progress,
        unlocked,
        unlocked_at: unlocked.then(|| chrono::Utc::now().timestamp_millis()),
    }
}
