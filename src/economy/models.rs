//! Data models for the points economy
//!
//! Coursework records (profiles, courses, assignments) are owned by the LMS
//! sync collaborator and only read here. Achievement and wager rows are owned
//! by this crate.

use serde::{Deserialize, Serialize};

use super::achievements::{Difficulty, Requirement};

/// Account class that bounds multipliers and bet sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Premium,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

/// Kind of gradable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Assignment,
    Quiz,
    Exam,
    /// Test fixture items; exempt from the due-date check
    Fixture,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::Quiz => "quiz",
            Self::Exam => "exam",
            Self::Fixture => "fixture",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "assignment" => Some(Self::Assignment),
            "quiz" => Some(Self::Quiz),
            "exam" => Some(Self::Exam),
            "fixture" => Some(Self::Fixture),
            _ => None,
        }
    }
}

/// User profile as synced from the account provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub has_profile_picture: bool,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub notifications_enabled: bool,
}

/// A course the user is enrolled in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
}

/// A gradable item (assignment, quiz, exam) in one course
///
/// `score` is a percentage in 0-100. A stored score only counts as a grade
/// when the sync did not mark it as a placeholder, so a real zero and an
/// ungraded zero stay distinguishable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedItem {
    pub id: String,
    pub course_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub placeholder: bool,
    /// Due timestamp (ms since epoch)
    #[serde(default)]
    pub due_at: Option<i64>,
    #[serde(default)]
    pub completed: bool,
}

impl GradedItem {
    /// The grade, if the item carries a real (non-placeholder) score
    pub fn real_grade(&self) -> Option<f64> {
        match self.score {
            Some(score) if !self.placeholder => Some(score),
            _ => None,
        }
    }

    pub fn is_graded(&self) -> bool {
        self.real_grade().is_some()
    }

    pub fn is_past_due(&self, now_ms: i64) -> bool {
        self.due_at.is_some_and(|due| due < now_ms)
    }
}

/// Everything the LMS sync writes for one user, used by `gradestake import`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseworkSnapshot {
    pub user_id: String,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub assignments: Vec<GradedItem>,
    /// Timestamps (ms) of completed LMS syncs
    #[serde(default)]
    pub syncs: Vec<i64>,
}

/// Which grades feed a score estimate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Overall,
    Course(String),
}

impl Scope {
    pub fn matches(&self, item: &GradedItem) -> bool {
        match self {
            Self::Overall => true,
            Self::Course(id) => &item.course_id == id,
        }
    }
}

/// Persisted per-user achievement state
#[derive(Debug, Clone, Serialize)]
pub struct AchievementRecord {
    /// Stable rule key (e.g. "honor_roll")
    pub id: String,
    pub title: String,
    pub requirement: Requirement,
    pub difficulty: Difficulty,
    pub points: u32,
    /// 0-100
    pub progress: u8,
    /// Holds iff `progress == 100`
    pub unlocked: bool,
    pub unlocked_at: Option<i64>,
}

impl AchievementRecord {
    /// Point credit: full when unlocked, pro-rated while in progress
    pub fn earned_points(&self) -> f64 {
        if self.unlocked {
            self.points as f64
        } else {
            self.points as f64 * self.progress as f64 / 100.0
        }
    }
}

/// Lifecycle state of a wager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WagerStatus {
    Pending,
    Won,
    Lost,
}

impl WagerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

/// A stake placed against a future grade
#[derive(Debug, Clone, Serialize)]
pub struct Wager {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    pub course_id: String,
    pub amount: f64,
    pub multiplier: f64,
    pub base_score: f64,
    /// Frozen at creation
    pub required_score: f64,
    pub tier: Tier,
    pub resolved: bool,
    /// Meaningful only once resolved
    pub won: bool,
    pub points_awarded: f64,
    pub actual_grade: Option<f64>,
    pub created_at: i64,
    pub resolved_at: Option<i64>,
}

impl Wager {
    pub fn status(&self) -> WagerStatus {
        match (self.resolved, self.won) {
            (false, _) => WagerStatus::Pending,
            (true, true) => WagerStatus::Won,
            (true, false) => WagerStatus::Lost,
        }
    }

    /// Payout if the wager were won
    pub fn potential_payout(&self) -> f64 {
        self.amount * self.multiplier
    }
}

/// Outcome written by the one-time settlement transition
#[derive(Debug, Clone, Copy)]
pub struct Settlement {
    pub won: bool,
    pub points_awarded: f64,
    pub actual_grade: f64,
    pub resolved_at: i64,
}

/// Result of settling one wager
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionResult {
    pub wager_id: String,
    pub item_id: String,
    pub actual_grade: f64,
    pub required_score: f64,
    pub won: bool,
    pub points_awarded: f64,
    pub resolved_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(score: Option<f64>, placeholder: bool) -> GradedItem {
        GradedItem {
            id: "a1".to_string(),
            course_id: "c1".to_string(),
            title: "Essay".to_string(),
            kind: ItemKind::Assignment,
            score,
            placeholder,
            due_at: None,
            completed: false,
        }
    }

    #[test]
    fn test_real_zero_is_a_grade() {
        assert_eq!(item(Some(0.0), false).real_grade(), Some(0.0));
    }

    #[test]
    fn test_placeholder_zero_is_not_a_grade() {
        assert!(!item(Some(0.0), true).is_graded());
        assert!(!item(None, false).is_graded());
    }

    #[test]
    fn test_past_due() {
        let mut i = item(None, false);
        assert!(!i.is_past_due(1_000));
        i.due_at = Some(500);
        assert!(i.is_past_due(1_000));
        assert!(!i.is_past_due(500));
    }

    #[test]
    fn test_wager_status() {
        let mut w = Wager {
            id: "w".to_string(),
            user_id: "u".to_string(),
            item_id: "a".to_string(),
            course_id: "c".to_string(),
            amount: 10.0,
            multiplier: 1.5,
            base_score: 65.0,
            required_score: 100.0,
            tier: Tier::Free,
            resolved: false,
            won: false,
            points_awarded: 0.0,
            actual_grade: None,
            created_at: 0,
            resolved_at: None,
        };
        assert_eq!(w.status(), WagerStatus::Pending);
        assert!((w.potential_payout() - 15.0).abs() < 1e-9);
        w.resolved = true;
        assert_eq!(w.status(), WagerStatus::Lost);
        w.won = true;
        assert_eq!(w.status(), WagerStatus::Won);
    }
}
