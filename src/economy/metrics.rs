//! Activity metrics for achievement evaluation
//!
//! The snapshot is never persisted; it is recomputed from coursework records
//! on every evaluation pass.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use super::achievements::{CountMetric, PreferenceFlag};
use super::models::{GradedItem, Profile};
use super::store::CourseworkSource;

/// Course-average thresholds reported in `courses_at_threshold`
pub const GRADE_THRESHOLDS: [u8; 5] = [70, 75, 80, 85, 90];

/// Derived counts for one user
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub completed_items: u32,
    pub perfect_scores: u32,
    /// Threshold -> number of courses averaging at or above it
    pub courses_at_threshold: BTreeMap<u8, u32>,
    /// Course id -> average of real grades
    pub course_averages: BTreeMap<String, f64>,
    pub lms_syncs: u32,
    pub profile_picture: bool,
    pub dark_mode: bool,
    pub notifications: bool,
    /// The store was unreachable and every value above is zero.
    /// Treat as "no data", not "nothing achieved".
    pub degraded: bool,
}

impl MetricsSnapshot {
    /// Zero-valued snapshot returned when the store cannot be read
    pub fn unavailable() -> Self {
        Self {
            courses_at_threshold: GRADE_THRESHOLDS.iter().map(|t| (*t, 0)).collect(),
            degraded: true,
            ..Self::default()
        }
    }

    /// Build a snapshot from raw coursework records
    pub fn from_records(profile: &Profile, items: &[GradedItem], lms_syncs: u64) -> Self {
        let completed_items = items
            .iter()
            .filter(|i| i.completed || i.is_graded())
            .count() as u32;
        let perfect_scores = items
            .iter()
            .filter_map(GradedItem::real_grade)
            .filter(|g| *g >= 100.0)
            .count() as u32;

        let mut per_course: BTreeMap<String, (f64, u32)> = BTreeMap::new();
        for item in items {
            if let Some(grade) = item.real_grade() {
                let entry = per_course.entry(item.course_id.clone()).or_default();
                entry.0 += grade;
                entry.1 += 1;
            }
        }
        let course_averages: BTreeMap<String, f64> = per_course
            .into_iter()
            .map(|(course, (sum, n))| (course, sum / n as f64))
            .collect();

        let mut snapshot = Self {
            completed_items,
            perfect_scores,
            course_averages,
            lms_syncs: lms_syncs.min(u32::MAX as u64) as u32,
            profile_picture: profile.has_profile_picture,
            dark_mode: profile.dark_mode,
            notifications: profile.notifications_enabled,
            ..Self::default()
        };
        snapshot.courses_at_threshold = GRADE_THRESHOLDS
            .iter()
            .map(|t| (*t, snapshot.courses_at(*t)))
            .collect();
        snapshot
    }

    /// Number of courses averaging `threshold` or better
    pub fn courses_at(&self, threshold: u8) -> u32 {
        self.course_averages
            .values()
            .filter(|avg| **avg >= threshold as f64)
            .count() as u32
    }

    pub fn count(&self, metric: CountMetric) -> u32 {
        match metric {
            CountMetric::CompletedItems => self.completed_items,
            CountMetric::PerfectScores => self.perfect_scores,
            CountMetric::LmsSyncs => self.lms_syncs,
        }
    }

    pub fn flag(&self, flag: PreferenceFlag) -> bool {
        match flag {
            PreferenceFlag::ProfilePicture => self.profile_picture,
            PreferenceFlag::DarkMode => self.dark_mode,
            PreferenceFlag::Notifications => self.notifications,
        }
    }
}

/// Reads coursework records and derives a [`MetricsSnapshot`]
#[derive(Clone)]
pub struct MetricsCollector {
    source: Arc<dyn CourseworkSource>,
}

impl MetricsCollector {
    pub fn new(source: Arc<dyn CourseworkSource>) -> Self {
        Self { source }
    }

    /// Collect metrics for a user.
    ///
    /// Never fails: a read error yields [`MetricsSnapshot::unavailable`].
    pub fn collect(&self, user_id: &str) -> MetricsSnapshot {
        match self.try_collect(user_id) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(user_id, "Failed to collect metrics, using empty snapshot: {:#}", e);
                MetricsSnapshot::unavailable()
            }
        }
    }

    fn try_collect(&self, user_id: &str) -> Result<MetricsSnapshot> {
        let profile = self.source.profile(user_id)?;
        let items = self.source.items(user_id)?;
        let syncs = self.source.sync_count(user_id)?;
        Ok(MetricsSnapshot::from_records(&profile, &items, syncs))
    }
}
