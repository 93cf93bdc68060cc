//! Achievement progress calculation
//!
//! Pure functions: given a rule, the stored row (if any) and a metrics
//! snapshot, decide what the engine should write.

use super::definitions::{Achievement, Requirement, Scoring};
use crate::economy::metrics::MetricsSnapshot;
use crate::economy::models::AchievementRecord;

/// `min(100, round(current / required * 100))`
pub fn ratio_progress(current: u32, required: u32) -> u8 {
    if required == 0 {
        return 100;
    }
    let pct = (current as f64 / required as f64 * 100.0).round();
    pct.min(100.0) as u8
}

/// All or nothing
pub fn binary_progress(current: u32, required: u32) -> u8 {
    if current >= required { 100 } else { 0 }
}

/// Current and required counts for a requirement
pub fn counts(requirement: &Requirement, metrics: &MetricsSnapshot) -> (u32, u32) {
    match *requirement {
        Requirement::Count { metric, required } => (metrics.count(metric), required),
        Requirement::Flag { flag } => (metrics.flag(flag) as u32, 1),
        Requirement::CoursesAtThreshold { threshold, courses } => {
            (metrics.courses_at(threshold), courses)
        }
    }
}

/// Progress (0-100) for a rule against a snapshot
pub fn compute_progress(achievement: &Achievement, metrics: &MetricsSnapshot) -> u8 {
    let (current, required) = counts(&achievement.requirement, metrics);
    match achievement.scoring {
        Scoring::Ratio => ratio_progress(current, required),
        Scoring::Binary => binary_progress(current, required),
    }
}

/// What to do with one rule during an evaluation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Sticky and already unlocked
    Skip,
    /// No row yet; create it with this progress
    Create { progress: u8 },
    Update { from: u8, to: u8 },
    Unchanged,
}

impl RuleAction {
    /// True when this action moves the rule from locked to unlocked
    pub fn unlocks(&self) -> bool {
        match *self {
            Self::Create { progress } => progress == 100,
            Self::Update { from, to } => from < 100 && to == 100,
            Self::Skip | Self::Unchanged => false,
        }
    }
}

/// Decide the write for one rule.
///
/// A degraded snapshot carries no information, so it may create rows but
/// never lowers existing progress.
pub fn plan(
    achievement: &Achievement,
    existing: Option<&AchievementRecord>,
    metrics: &MetricsSnapshot,
) -> RuleAction {
    let Some(row) = existing else {
        return RuleAction::Create {
            progress: compute_progress(achievement, metrics),
        };
    };

    if achievement.is_sticky() && row.unlocked {
        return RuleAction::Skip;
    }

    let progress = compute_progress(achievement, metrics);
    if progress == row.progress {
        return RuleAction::Unchanged;
    }
    if metrics.degraded && progress < row.progress {
        return RuleAction::Unchanged;
    }
    RuleAction::Update {
        from: row.progress,
        to: progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::achievements::definitions::{AchievementId, Difficulty};
    use crate::economy::models::Profile;

    fn rule(id: AchievementId) -> &'static Achievement {
        Achievement::get(id).unwrap()
    }

    fn row_for(a: &Achievement, progress: u8) -> AchievementRecord {
        AchievementRecord {
            id: a.id.as_str().to_string(),
            title: a.title.to_string(),
            requirement: a.requirement,
            difficulty: Difficulty::Easy,
            points: a.points,
            progress,
            unlocked: progress == 100,
            unlocked_at: None,
        }
    }

    fn metrics_with_completed(n: u32) -> MetricsSnapshot {
        MetricsSnapshot {
            completed_items: n,
            ..MetricsSnapshot::default()
        }
    }

    #[test]
    fn test_ratio_progress() {
        assert_eq!(ratio_progress(0, 10), 0);
        assert_eq!(ratio_progress(3, 10), 30);
        assert_eq!(ratio_progress(1, 3), 33);
        assert_eq!(ratio_progress(2, 3), 67);
        assert_eq!(ratio_progress(5, 5), 100);
        assert_eq!(ratio_progress(50, 5), 100);
    }

    #[test]
    fn test_binary_has_no_partial_credit() {
        assert_eq!(binary_progress(4, 5), 0);
        assert_eq!(binary_progress(5, 5), 100);
        assert_eq!(binary_progress(9, 5), 100);
    }

    #[test]
    fn test_courses_at_threshold_counts() {
        let mut m = MetricsSnapshot::default();
        m.course_averages.insert("a".to_string(), 91.0);
        m.course_averages.insert("b".to_string(), 86.0);
        m.course_averages.insert("c".to_string(), 60.0);
        // Honor Roll: 3 courses >= 85, ratio scoring -> 2/3
        assert_eq!(compute_progress(rule(AchievementId::HonorRoll), &m), 67);
        // Passing Grade: 1 course >= 70, binary
        assert_eq!(compute_progress(rule(AchievementId::PassingGrade), &m), 100);
    }

    #[test]
    fn test_flag_requirement() {
        let on = MetricsSnapshot::from_records(
            &Profile {
                has_profile_picture: true,
                ..Profile::default()
            },
            &[],
            0,
        );
        let off = MetricsSnapshot::from_records(&Profile::default(), &[], 0);
        let a = rule(AchievementId::PicturePerfect);
        assert_eq!(compute_progress(a, &on), 100);
        assert_eq!(compute_progress(a, &off), 0);
    }

    #[test]
    fn test_plan_creates_with_current_progress() {
        let a = rule(AchievementId::TenSubmissions);
        assert_eq!(
            plan(a, None, &metrics_with_completed(10)),
            RuleAction::Create { progress: 100 }
        );
        assert!(plan(a, None, &metrics_with_completed(10)).unlocks());
        assert_eq!(
            plan(a, None, &metrics_with_completed(4)),
            RuleAction::Create { progress: 40 }
        );
    }

    #[test]
    fn test_plan_skips_unlocked_sticky_rule() {
        let a = rule(AchievementId::TenSubmissions);
        let row = row_for(a, 100);
        assert_eq!(plan(a, Some(&row), &metrics_with_completed(0)), RuleAction::Skip);
    }

    #[test]
    fn test_plan_regresses_reversible_rule() {
        let a = rule(AchievementId::PicturePerfect);
        let row = row_for(a, 100);
        let action = plan(a, Some(&row), &MetricsSnapshot::default());
        assert_eq!(action, RuleAction::Update { from: 100, to: 0 });
        assert!(!action.unlocks());
    }

    #[test]
    fn test_plan_ignores_regression_from_degraded_snapshot() {
        let a = rule(AchievementId::PicturePerfect);
        let row = row_for(a, 100);
        assert_eq!(
            plan(a, Some(&row), &MetricsSnapshot::unavailable()),
            RuleAction::Unchanged
        );

        let b = rule(AchievementId::TenSubmissions);
        let partial = row_for(b, 40);
        assert_eq!(
            plan(b, Some(&partial), &MetricsSnapshot::unavailable()),
            RuleAction::Unchanged
        );
    }

    #[test]
    fn test_plan_update_to_unlock() {
        let a = rule(AchievementId::TenSubmissions);
        let row = row_for(a, 90);
        let action = plan(a, Some(&row), &metrics_with_completed(10));
        assert_eq!(action, RuleAction::Update { from: 90, to: 100 });
        assert!(action.unlocks());
        assert_eq!(plan(a, Some(&row), &metrics_with_completed(9)), RuleAction::Unchanged);
    }
}
