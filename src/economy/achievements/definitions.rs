//! Achievement definitions and metadata
//!
//! The catalog is fixed. Each rule declares how progress is scored and
//! whether an unlock is permanent, so the engine never has to infer either.

use serde::{Deserialize, Serialize};

/// Unique identifier for each achievement rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementId {
    // Assignment milestones
    FirstSubmission,
    TenSubmissions,
    FiftySubmissions,
    Centurion,

    // Perfect scores
    Perfectionist,
    FlawlessFive,
    PerfectTen,

    // Course standing
    PassingGrade,
    SolidStanding,
    HonorRoll,
    DeansList,

    // LMS sync
    Connected,
    SyncRegular,

    // Profile preferences
    PicturePerfect,
    NightMode,
    InTheLoop,
}

impl AchievementId {
    /// Get the string ID for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstSubmission => "first_submission",
            Self::TenSubmissions => "ten_submissions",
            Self::FiftySubmissions => "fifty_submissions",
            Self::Centurion => "centurion",
            Self::Perfectionist => "perfectionist",
            Self::FlawlessFive => "flawless_five",
            Self::PerfectTen => "perfect_ten",
            Self::PassingGrade => "passing_grade",
            Self::SolidStanding => "solid_standing",
            Self::HonorRoll => "honor_roll",
            Self::DeansList => "deans_list",
            Self::Connected => "connected",
            Self::SyncRegular => "sync_regular",
            Self::PicturePerfect => "picture_perfect",
            Self::NightMode => "night_mode",
            Self::InTheLoop => "in_the_loop",
        }
    }

    /// Parse from database string
    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|id| id.as_str() == s)
    }

    /// Get all achievement IDs
    pub fn all() -> &'static [AchievementId] {
        &[
            Self::FirstSubmission,
            Self::TenSubmissions,
            Self::FiftySubmissions,
            Self::Centurion,
            Self::Perfectionist,
            Self::FlawlessFive,
            Self::PerfectTen,
            Self::PassingGrade,
            Self::SolidStanding,
            Self::HonorRoll,
            Self::DeansList,
            Self::Connected,
            Self::SyncRegular,
            Self::PicturePerfect,
            Self::NightMode,
            Self::InTheLoop,
        ]
    }
}

/// Achievement category for grouping in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementCategory {
    Milestone,
    Mastery,
    Standing,
    Sync,
    Profile,
}

impl AchievementCategory {
    /// Listing order
    pub const ALL: [AchievementCategory; 5] = [
        Self::Milestone,
        Self::Mastery,
        Self::Standing,
        Self::Sync,
        Self::Profile,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Milestone => "Milestones",
            Self::Mastery => "Mastery",
            Self::Standing => "Course Standing",
            Self::Sync => "Sync",
            Self::Profile => "Profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Legendary,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Legendary => "legendary",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "legendary" => Some(Self::Legendary),
            _ => None,
        }
    }
}

/// Counters in the metrics snapshot a rule can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMetric {
    CompletedItems,
    PerfectScores,
    LmsSyncs,
}

/// UI preference flags a rule can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceFlag {
    ProfilePicture,
    DarkMode,
    Notifications,
}

/// What a rule measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// `metric >= required`
    Count { metric: CountMetric, required: u32 },
    /// A boolean preference is set
    Flag { flag: PreferenceFlag },
    /// At least `courses` courses average `threshold` or better
    CoursesAtThreshold { threshold: u8, courses: u32 },
}

/// How progress is derived from the current count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    /// `min(100, round(current / required * 100))`
    Ratio,
    /// 100 once satisfied, otherwise 0
    Binary,
}

/// Whether an unlock can be taken back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Excluded from recomputation once unlocked
    Sticky,
    /// Re-evaluated every pass, may fall back to 0
    Reversible,
}

/// Achievement definition with all metadata
#[derive(Debug, Clone)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub difficulty: Difficulty,
    pub points: u32,
    pub requirement: Requirement,
    pub scoring: Scoring,
    pub persistence: Persistence,
}

/// All achievement definitions
pub static ACHIEVEMENTS: &[Achievement] = &[
    // === MILESTONE ===
    Achievement {
        id: AchievementId::FirstSubmission,
        title: "First Steps",
        description: "Complete your first assignment",
        category: AchievementCategory::Milestone,
        difficulty: Difficulty::Easy,
        points: 10,
        requirement: Requirement::Count {
            metric: CountMetric::CompletedItems,
            required: 1,
        },
        scoring: Scoring::Ratio,
        persistence: Persistence::Sticky,
    },
    Achievement {
        id: AchievementId::TenSubmissions,
        title: "Getting Into Gear",
        description: "Complete 10 assignments",
        category: AchievementCategory::Milestone,
        difficulty: Difficulty::Easy,
        points: 25,
        requirement: Requirement::Count {
            metric: CountMetric::CompletedItems,
            required: 10,
        },
        scoring: Scoring::Ratio,
        persistence: Persistence::Sticky,
    },
    Achievement {
        id: AchievementId::FiftySubmissions,
        title: "Assignment Machine",
        description: "Complete 50 assignments",
        category: AchievementCategory::Milestone,
        difficulty: Difficulty::Medium,
        points: 75,
        requirement: Requirement::Count {
            metric: CountMetric::CompletedItems,
            required: 50,
        },
        scoring: Scoring::Ratio,
        persistence: Persistence::Sticky,
    },
    Achievement {
        id: AchievementId::Centurion,
        title: "Centurion",
        description: "Complete 100 assignments",
        category: AchievementCategory::Milestone,
        difficulty: Difficulty::Hard,
        points: 150,
        requirement: Requirement::Count {
            metric: CountMetric::CompletedItems,
            required: 100,
        },
        scoring: Scoring::Ratio,
        persistence: Persistence::Sticky,
    },
    // === MASTERY ===
    Achievement {
        id: AchievementId::Perfectionist,
        title: "Perfectionist",
        description: "Score 100% on an assignment",
        category: AchievementCategory::Mastery,
        difficulty: Difficulty::Easy,
        points: 20,
        requirement: Requirement::Count {
            metric: CountMetric::PerfectScores,
            required: 1,
        },
        scoring: Scoring::Binary,
        persistence: Persistence::Sticky,
    },
    Achievement {
        id: AchievementId::FlawlessFive,
        title: "Flawless Five",
        description: "Score 100% on 5 assignments",
        category: AchievementCategory::Mastery,
        difficulty: Difficulty::Medium,
        points: 60,
        requirement: Requirement::Count {
            metric: CountMetric::PerfectScores,
            required: 5,
        },
        scoring: Scoring::Ratio,
        persistence: Persistence::Sticky,
    },
    Achievement {
        id: AchievementId::PerfectTen,
        title: "Perfect Ten",
        description: "Score 100% on 10 assignments",
        category: AchievementCategory::Mastery,
        difficulty: Difficulty::Hard,
        points: 120,
        requirement: Requirement::Count {
            metric: CountMetric::PerfectScores,
            required: 10,
        },
        scoring: Scoring::Ratio,
        persistence: Persistence::Sticky,
    },
    // === STANDING ===
    Achievement {
        id: AchievementId::PassingGrade,
        title: "Passing Grade",
        description: "Hold a 70% average in any course",
        category: AchievementCategory::Standing,
        difficulty: Difficulty::Easy,
        points: 15,
        requirement: Requirement::CoursesAtThreshold {
            threshold: 70,
            courses: 1,
        },
        scoring: Scoring::Binary,
        persistence: Persistence::Reversible,
    },
    Achievement {
        id: AchievementId::SolidStanding,
        title: "Solid Standing",
        description: "Hold a 75% average in 2 courses",
        category: AchievementCategory::Standing,
        difficulty: Difficulty::Medium,
        points: 40,
        requirement: Requirement::CoursesAtThreshold {
            threshold: 75,
            courses: 2,
        },
        scoring: Scoring::Ratio,
        persistence: Persistence::Reversible,
    },
    Achievement {
        id: AchievementId::HonorRoll,
        title: "Honor Roll",
        description: "Hold an 85% average in 3 courses",
        category: AchievementCategory::Standing,
        difficulty: Difficulty::Hard,
        points: 100,
        requirement: Requirement::CoursesAtThreshold {
            threshold: 85,
            courses: 3,
        },
        scoring: Scoring::Ratio,
        persistence: Persistence::Reversible,
    },
    Achievement {
        id: AchievementId::DeansList,
        title: "Dean's List",
        description: "Hold a 90% average in 4 courses",
        category: AchievementCategory::Standing,
        difficulty: Difficulty::Legendary,
        points: 200,
        requirement: Requirement::CoursesAtThreshold {
            threshold: 90,
            courses: 4,
        },
        scoring: Scoring::Ratio,
        persistence: Persistence::Reversible,
    },
    // === SYNC ===
    Achievement {
        id: AchievementId::Connected,
        title: "Connected",
        description: "Sync with your LMS for the first time",
        category: AchievementCategory::Sync,
        difficulty: Difficulty::Easy,
        points: 10,
        requirement: Requirement::Count {
            metric: CountMetric::LmsSyncs,
            required: 1,
        },
        scoring: Scoring::Binary,
        persistence: Persistence::Sticky,
    },
    Achievement {
        id: AchievementId::SyncRegular,
        title: "Sync Regular",
        description: "Sync with your LMS 25 times",
        category: AchievementCategory::Sync,
        difficulty: Difficulty::Medium,
        points: 50,
        requirement: Requirement::Count {
            metric: CountMetric::LmsSyncs,
            required: 25,
        },
        scoring: Scoring::Ratio,
        persistence: Persistence::Sticky,
    },
    // === PROFILE ===
    Achievement {
        id: AchievementId::PicturePerfect,
        title: "Picture Perfect",
        description: "Upload a profile picture",
        category: AchievementCategory::Profile,
        difficulty: Difficulty::Easy,
        points: 10,
        requirement: Requirement::Flag {
            flag: PreferenceFlag::ProfilePicture,
        },
        scoring: Scoring::Binary,
        persistence: Persistence::Reversible,
    },
    Achievement {
        id: AchievementId::NightMode,
        title: "Night Mode",
        description: "Switch to the dark theme",
        category: AchievementCategory::Profile,
        difficulty: Difficulty::Easy,
        points: 5,
        requirement: Requirement::Flag {
            flag: PreferenceFlag::DarkMode,
        },
        scoring: Scoring::Binary,
        persistence: Persistence::Reversible,
    },
    Achievement {
        id: AchievementId::InTheLoop,
        title: "In The Loop",
        description: "Turn on deadline notifications",
        category: AchievementCategory::Profile,
        difficulty: Difficulty::Easy,
        points: 5,
        requirement: Requirement::Flag {
            flag: PreferenceFlag::Notifications,
        },
        scoring: Scoring::Binary,
        persistence: Persistence::Reversible,
    },
];

impl Achievement {
    /// Get achievement definition by ID
    pub fn get(id: AchievementId) -> Option<&'static Achievement> {
        ACHIEVEMENTS.iter().find(|a| a.id == id)
    }

    /// Get total number of achievements
    pub fn total_count() -> usize {
        ACHIEVEMENTS.len()
    }

    /// Get total possible points from all achievements
    pub fn total_points() -> u32 {
        ACHIEVEMENTS.iter().map(|a| a.points).sum()
    }

    pub fn is_sticky(&self) -> bool {
        self.persistence == Persistence::Sticky
    }
}
