//! Shared test utilities for economy integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use tempfile::TempDir;

use gradestake::config::EconomySettings;
use gradestake::economy::{
    Course, CourseworkRepository, CourseworkSnapshot, EconomyDb, EconomyEvent, EconomyManager,
    GradedItem, ItemKind, Profile, Tier,
};

pub const USER: &str = "student-1";

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A throwaway economy database with the manager wired to an event channel
pub struct TestEconomy {
    pub dir: TempDir,
    pub db: EconomyDb,
    pub coursework: CourseworkRepository,
    pub manager: EconomyManager,
    pub events: Receiver<EconomyEvent>,
}

impl TestEconomy {
    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("economy.db")
    }

    /// Store a snapshot the way the LMS sync would
    pub fn sync(&self, snapshot: &CourseworkSnapshot) {
        self.coursework
            .apply_snapshot(snapshot)
            .expect("Failed to apply snapshot");
    }

    pub fn grade(&self, item_id: &str, score: f64) {
        self.coursework
            .set_score(USER, item_id, Some(score), false)
            .expect("Failed to set score");
    }

    /// Drain and count events matching `pred`
    pub fn count_events(&self, pred: impl Fn(&EconomyEvent) -> bool) -> usize {
        self.events.try_iter().filter(|e| pred(e)).count()
    }
}

pub fn create_test_economy() -> TestEconomy {
    create_test_economy_with(EconomySettings::default())
}

pub fn create_test_economy_with(settings: EconomySettings) -> TestEconomy {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = EconomyDb::open(&dir.path().join("economy.db")).expect("Failed to open economy db");
    let (tx, events) = mpsc::channel();

    TestEconomy {
        coursework: CourseworkRepository::new(db.clone()),
        manager: EconomyManager::from_db(db.clone(), settings, Arc::new(tx)),
        events,
        db,
        dir,
    }
}

/// Fluent builder for coursework snapshots
pub struct SnapshotBuilder {
    snapshot: CourseworkSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            snapshot: CourseworkSnapshot {
                user_id: USER.to_string(),
                profile: Profile::default(),
                courses: Vec::new(),
                assignments: Vec::new(),
                syncs: Vec::new(),
            },
        }
    }

    pub fn tier(mut self, tier: Tier) -> Self {
        self.snapshot.profile.tier = tier;
        self
    }

    pub fn profile_picture(mut self, on: bool) -> Self {
        self.snapshot.profile.has_profile_picture = on;
        self
    }

    pub fn syncs(mut self, count: i64) -> Self {
        self.snapshot.syncs = (1..=count).map(|i| 1_700_000_000_000 + i).collect();
        self
    }

    fn item(mut self, id: &str, course: &str, kind: ItemKind, score: Option<f64>, due_at: Option<i64>) -> Self {
        if !self.snapshot.courses.iter().any(|c| c.id == course) {
            self.snapshot.courses.push(Course {
                id: course.to_string(),
                name: course.to_uppercase(),
            });
        }
        self.snapshot.assignments.push(GradedItem {
            id: id.to_string(),
            course_id: course.to_string(),
            title: id.to_string(),
            kind,
            score,
            placeholder: false,
            due_at,
            completed: score.is_some(),
        });
        self
    }

    /// An item that already carries a real grade
    pub fn graded(self, id: &str, course: &str, score: f64) -> Self {
        self.item(id, course, ItemKind::Assignment, Some(score), Some(now_ms() - 7 * DAY_MS))
    }

    /// An ungraded item due tomorrow
    pub fn upcoming(self, id: &str, course: &str) -> Self {
        self.item(id, course, ItemKind::Assignment, None, Some(now_ms() + DAY_MS))
    }

    /// An ungraded item whose due date passed yesterday
    pub fn overdue(self, id: &str, course: &str) -> Self {
        self.item(id, course, ItemKind::Assignment, None, Some(now_ms() - DAY_MS))
    }

    /// A past-due fixture item (exempt from the due-date check)
    pub fn fixture(self, id: &str, course: &str) -> Self {
        self.item(id, course, ItemKind::Fixture, None, Some(now_ms() - DAY_MS))
    }

    /// An item whose zero score the LMS marked as a placeholder
    pub fn placeholder_zero(mut self, id: &str, course: &str) -> Self {
        self = self.upcoming(id, course);
        if let Some(item) = self.snapshot.assignments.last_mut() {
            item.score = Some(0.0);
            item.placeholder = true;
        }
        self
    }

    pub fn build(self) -> CourseworkSnapshot {
        self.snapshot
    }
}

/// Premium user worth exactly 22 points once evaluated:
/// Connected (10) + Picture Perfect (10) + Sync Regular at 1/25 of 50 (2)
pub fn funded_premium_user(env: &TestEconomy, upcoming: &[&str]) {
    let mut builder = SnapshotBuilder::new()
        .tier(Tier::Premium)
        .profile_picture(true)
        .syncs(1);
    for id in upcoming {
        builder = builder.upcoming(id, "chem");
    }
    env.sync(&builder.build());
    env.manager
        .evaluate_achievements(USER)
        .expect("Failed to evaluate achievements");
}
