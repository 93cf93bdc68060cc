//! Odds engine
//!
//! Estimates a base score from grade history and maps between multipliers and
//! required scores. The two mappings are defined independently and are not
//! exact inverses of each other:
//!
//! - [`multiplier_from_score`] treats a score gain as compound growth in 0.1x
//!   steps.
//! - [`OddsEngine::required_score`] interpolates a per-tier breakpoint table.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::Serialize;

use super::models::{GradedItem, Scope, Tier};
use super::store::CourseworkSource;
use crate::config::EconomySettings;

pub const FREE_MAX_MULTIPLIER: f64 = 1.5;
pub const PREMIUM_MAX_MULTIPLIER: f64 = 5.0;

/// Ceiling for [`multiplier_from_score`]
pub const SCORE_MULTIPLIER_CAP: f64 = 2.0;

pub const MIN_CONFIDENCE: f64 = 0.3;
pub const MAX_CONFIDENCE: f64 = 0.9;

/// Multiplier -> score offset from base
const FREE_BREAKPOINTS: &[(f64, f64)] = &[
    (1.0, 0.0),
    (1.1, 5.0),
    (1.2, 12.0),
    (1.3, 20.0),
    (1.4, 30.0),
    (1.5, 35.0),
];

const PREMIUM_BREAKPOINTS: &[(f64, f64)] = &[
    (1.0, 0.0),
    (1.5, 4.0),
    (2.0, 9.0),
    (2.5, 14.0),
    (3.0, 20.0),
    (3.5, 25.0),
    (4.0, 30.0),
    (4.5, 33.0),
    (5.0, 35.0),
];

const BREAKPOINT_EPSILON: f64 = 1e-9;

/// Largest multiplier a tier may wager at
pub fn max_multiplier(tier: Tier) -> f64 {
    match tier {
        Tier::Free => FREE_MAX_MULTIPLIER,
        Tier::Premium => PREMIUM_MAX_MULTIPLIER,
    }
}

fn breakpoints(tier: Tier) -> &'static [(f64, f64)] {
    match tier {
        Tier::Free => FREE_BREAKPOINTS,
        Tier::Premium => PREMIUM_BREAKPOINTS,
    }
}

/// Score offset for `multiplier`, linearly interpolated between the two
/// bracketing breakpoints. Clamped to the table's ends.
pub fn breakpoint_offset(multiplier: f64, tier: Tier) -> f64 {
    let table = breakpoints(tier);

    if let Some(&(_, offset)) = table
        .iter()
        .find(|(m, _)| (m - multiplier).abs() < BREAKPOINT_EPSILON)
    {
        return offset;
    }

    let (first_m, first_offset) = table[0];
    if multiplier <= first_m {
        return first_offset;
    }

    for pair in table.windows(2) {
        let (m0, o0) = pair[0];
        let (m1, o1) = pair[1];
        if multiplier <= m1 {
            return o0 + (multiplier - m0) / (m1 - m0) * (o1 - o0);
        }
    }

    table[table.len() - 1].1
}

/// Multiplier needed to move from `base` to `target`.
///
/// `increase / base = 1.1^increments - 1`, `multiplier = 1 + increments * 0.1`,
/// capped at [`SCORE_MULTIPLIER_CAP`].
pub fn multiplier_from_score(base: f64, target: f64) -> f64 {
    if target <= base {
        return 1.0;
    }
    if base <= 0.0 {
        return SCORE_MULTIPLIER_CAP;
    }

    let increase = target - base;
    let increments = (increase / base + 1.0).ln() / 1.1_f64.ln();
    (1.0 + increments * 0.1).min(SCORE_MULTIPLIER_CAP)
}

/// Historical performance estimate
#[derive(Debug, Clone, Serialize)]
pub struct ScoreEstimate {
    pub base_score: f64,
    /// 0.3 - 0.9
    pub confidence: f64,
    /// Human-readable notes on how the estimate was formed
    pub factors: Vec<String>,
    pub sample_size: usize,
}

/// Terms for a prospective wager, without creating it
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub item_id: String,
    pub course_id: String,
    pub tier: Tier,
    pub multiplier: f64,
    pub max_multiplier: f64,
    pub required_score: f64,
    pub estimate: ScoreEstimate,
}

/// Multiplier implied by aiming for a target score
#[derive(Debug, Clone, Serialize)]
pub struct TargetQuote {
    pub item_id: String,
    pub tier: Tier,
    pub target_score: f64,
    pub multiplier: f64,
    pub max_multiplier: f64,
    pub within_tier_cap: bool,
    pub estimate: ScoreEstimate,
}

#[derive(Clone)]
pub struct OddsEngine {
    source: Arc<dyn CourseworkSource>,
    settings: EconomySettings,
}

impl OddsEngine {
    pub fn new(source: Arc<dyn CourseworkSource>, settings: EconomySettings) -> Self {
        Self { source, settings }
    }

    /// Estimate from a list of past grades
    pub fn estimate_from_grades(&self, grades: &[f64]) -> ScoreEstimate {
        let floor = self.settings.base_score_floor;

        if grades.is_empty() {
            return ScoreEstimate {
                base_score: floor,
                confidence: MIN_CONFIDENCE,
                factors: vec!["No historical data".to_string()],
                sample_size: 0,
            };
        }

        let n = grades.len();
        let mean = grades.iter().sum::<f64>() / n as f64;
        let variance = grades.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n as f64;
        let stdev = variance.sqrt();

        let mut factors = Vec::new();
        let rounded = mean.round();
        let base_score = if rounded >= 100.0 {
            factors.push(format!(
                "Perfect average is reported as {:.0} to keep wagers from being free wins",
                floor
            ));
            floor
        } else if rounded < floor {
            factors.push(format!(
                "Average {:.0} is below the {:.0} floor",
                rounded, floor
            ));
            floor
        } else {
            rounded
        };

        if n < self.settings.limited_history_threshold {
            factors.push(format!(
                "Limited historical data ({} graded {})",
                n,
                if n == 1 { "item" } else { "items" }
            ));
        }
        if stdev > self.settings.volatility_stdev_threshold {
            factors.push(format!(
                "Grades vary widely (standard deviation {:.1})",
                stdev
            ));
        }

        ScoreEstimate {
            base_score,
            confidence: (1.0 - stdev / 20.0).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
            factors,
            sample_size: n,
        }
    }

    /// Estimate from every real grade in `scope`
    pub fn estimate(&self, user_id: &str, scope: &Scope) -> Result<ScoreEstimate> {
        let items = self.source.items(user_id)?;
        let grades: Vec<f64> = items
            .iter()
            .filter(|i| scope.matches(i))
            .filter_map(GradedItem::real_grade)
            .collect();
        Ok(self.estimate_from_grades(&grades))
    }

    /// Estimate for wagering on `item`: the item's course history (the item
    /// itself excluded), or the overall history if the course has none
    pub fn estimate_for_item(&self, user_id: &str, item: &GradedItem) -> Result<ScoreEstimate> {
        let items = self.source.items(user_id)?;
        let history = |scope: &Scope| -> Vec<f64> {
            items
                .iter()
                .filter(|i| i.id != item.id && scope.matches(i))
                .filter_map(GradedItem::real_grade)
                .collect()
        };

        let course = history(&Scope::Course(item.course_id.clone()));
        if !course.is_empty() {
            return Ok(self.estimate_from_grades(&course));
        }

        let overall = history(&Scope::Overall);
        let mut estimate = self.estimate_from_grades(&overall);
        if !overall.is_empty() {
            estimate
                .factors
                .push("No grades in this course yet, using overall average".to_string());
        }
        Ok(estimate)
    }

    /// Score needed to win at `multiplier`. Base is floored before offsetting
    /// and the result is capped at 100.
    pub fn required_score(&self, base: f64, multiplier: f64, tier: Tier) -> f64 {
        let base = base.max(self.settings.base_score_floor);
        (base + breakpoint_offset(multiplier, tier)).min(100.0)
    }

    pub fn quote(&self, user_id: &str, item_id: &str, multiplier: f64) -> Result<Quote> {
        let item = self.require_item(user_id, item_id)?;
        let tier = self.source.profile(user_id)?.tier;
        let estimate = self.estimate_for_item(user_id, &item)?;

        Ok(Quote {
            item_id: item.id,
            course_id: item.course_id,
            tier,
            multiplier,
            max_multiplier: max_multiplier(tier),
            required_score: self.required_score(estimate.base_score, multiplier, tier),
            estimate,
        })
    }

    pub fn multiplier_for_target(
        &self,
        user_id: &str,
        item_id: &str,
        target: f64,
    ) -> Result<TargetQuote> {
        let item = self.require_item(user_id, item_id)?;
        let tier = self.source.profile(user_id)?.tier;
        let estimate = self.estimate_for_item(user_id, &item)?;
        let multiplier = multiplier_from_score(estimate.base_score, target);

        Ok(TargetQuote {
            item_id: item.id,
            tier,
            target_score: target,
            multiplier,
            max_multiplier: max_multiplier(tier),
            within_tier_cap: multiplier <= max_multiplier(tier),
            estimate,
        })
    }

    fn require_item(&self, user_id: &str, item_id: &str) -> Result<GradedItem> {
        self.source
            .item(user_id, item_id)?
            .ok_or_else(|| anyhow!("Assignment '{}' not found", item_id))
    }
}
