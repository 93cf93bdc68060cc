//! Gamification: achievement catalog, evaluation engine and levels

mod checker;
mod definitions;
mod levels;
mod manager;

pub use checker::{binary_progress, compute_progress, ratio_progress, RuleAction};
pub use definitions::{
    Achievement, AchievementCategory, AchievementId, CountMetric, Difficulty, Persistence,
    PreferenceFlag, Requirement, Scoring, ACHIEVEMENTS,
};
pub use levels::{Level, LevelInfo, LEVELS};
pub use manager::{AchievementEngine, EvaluationReport, UnlockedAchievement};
