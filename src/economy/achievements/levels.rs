//! Point levels
//!
//! Maps total points to a level and title through a monotonic threshold table.

use serde::Serialize;

/// Level definition
#[derive(Debug, Clone)]
pub struct Level {
    pub level: u32,
    pub points_required: u32,
    pub title: &'static str,
}

/// All level definitions (must be sorted by level, thresholds strictly increasing)
pub static LEVELS: &[Level] = &[
    Level {
        level: 1,
        points_required: 0,
        title: "Freshman",
    },
    Level {
        level: 2,
        points_required: 25,
        title: "Freshman",
    },
    Level {
        level: 3,
        points_required: 60,
        title: "Sophomore",
    },
    Level {
        level: 4,
        points_required: 110,
        title: "Sophomore",
    },
    Level {
        level: 5,
        points_required: 175,
        title: "Junior",
    },
    Level {
        level: 6,
        points_required: 250,
        title: "Junior",
    },
    Level {
        level: 7,
        points_required: 350,
        title: "Senior",
    },
    Level {
        level: 8,
        points_required: 475,
        title: "Senior",
    },
    Level {
        level: 9,
        points_required: 625,
        title: "Graduate",
    },
    Level {
        level: 10,
        points_required: 800,
        title: "Scholar",
    },
    Level {
        level: 11,
        points_required: 1000,
        title: "Valedictorian",
    },
];

impl Level {
    /// Level reached with the given points
    pub fn for_points(points: f64) -> &'static Level {
        LEVELS
            .iter()
            .rev()
            .find(|l| points >= l.points_required as f64)
            .unwrap_or(&LEVELS[0])
    }

    /// Points needed for the level after `current_level` (None if max level)
    pub fn points_for_next(current_level: u32) -> Option<u32> {
        LEVELS
            .iter()
            .find(|l| l.level == current_level + 1)
            .map(|l| l.points_required)
    }

    pub fn max_level() -> u32 {
        LEVELS.last().map(|l| l.level).unwrap_or(1)
    }
}

fn progress_between(points: f64, current: u32, next: Option<u32>) -> f64 {
    match next {
        Some(next) if next > current => {
            ((points - current as f64) / (next - current) as f64).clamp(0.0, 1.0)
        }
        _ => 1.0,
    }
}

/// Level standing derived from a point total
#[derive(Debug, Clone, Default, Serialize)]
pub struct LevelInfo {
    pub level: u32,
    pub title: String,
    pub points: f64,
    /// Points needed for current level
    pub current_level_points: u32,
    /// Points needed for next level (None if max)
    pub next_level_points: Option<u32>,
    pub points_to_next: Option<f64>,
    /// Progress to next level (0.0 - 1.0)
    pub progress: f64,
}

impl LevelInfo {
    pub fn new(points: f64) -> Self {
        let points = points.max(0.0);
        let level = Level::for_points(points);
        let next = Level::points_for_next(level.level);

        Self {
            level: level.level,
            title: level.title.to_string(),
            points,
            current_level_points: level.points_required,
            next_level_points: next,
            points_to_next: next.map(|n| n as f64 - points),
            progress: progress_between(points, level.points_required, next),
        }
    }
}
