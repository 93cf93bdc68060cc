//! SQLite repositories for coursework, achievements and wagers

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

use super::achievements::{Difficulty, Requirement};
use super::db::EconomyDb;
use super::models::{
    AchievementRecord, CourseworkSnapshot, GradedItem, ItemKind, Profile, Settlement, Tier, Wager,
};
use super::store::{AchievementStore, CourseworkSource, WagerStore};

/// Slack for comparing balances computed in SQL against ones computed in Rust
pub const BALANCE_EPSILON: f64 = 1e-9;

// ============================================
// COURSEWORK REPOSITORY
// ============================================

/// Read side for the LMS-synced records, plus the writes the sync performs
pub struct CourseworkRepository {
    db: EconomyDb,
}

impl CourseworkRepository {
    pub fn new(db: EconomyDb) -> Self {
        Self { db }
    }

    /// Upsert everything in a sync snapshot in one transaction
    pub fn apply_snapshot(&self, snapshot: &CourseworkSnapshot) -> Result<()> {
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        let user = &snapshot.user_id;

        tx.execute(
            r#"
            INSERT INTO profiles (user_id, tier, has_profile_picture, dark_mode, notifications_enabled)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id) DO UPDATE SET
                tier = ?2, has_profile_picture = ?3, dark_mode = ?4, notifications_enabled = ?5
            "#,
            params![
                user,
                snapshot.profile.tier.as_str(),
                snapshot.profile.has_profile_picture,
                snapshot.profile.dark_mode,
                snapshot.profile.notifications_enabled,
            ],
        )
        .context("Failed to upsert profile")?;

        for course in &snapshot.courses {
            tx.execute(
                r#"
                INSERT INTO courses (user_id, id, name) VALUES (?1, ?2, ?3)
                ON CONFLICT(user_id, id) DO UPDATE SET name = ?3
                "#,
                params![user, course.id, course.name],
            )
            .with_context(|| format!("Failed to upsert course {}", course.id))?;
        }

        for item in &snapshot.assignments {
            tx.execute(
                r#"
                INSERT INTO assignments (user_id, id, course_id, title, kind, score, placeholder, due_at, completed)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(user_id, id) DO UPDATE SET
                    course_id = ?3, title = ?4, kind = ?5, score = ?6,
                    placeholder = ?7, due_at = ?8, completed = ?9
                "#,
                params![
                    user,
                    item.id,
                    item.course_id,
                    item.title,
                    item.kind.as_str(),
                    item.score,
                    item.placeholder,
                    item.due_at,
                    item.completed,
                ],
            )
            .with_context(|| format!("Failed to upsert assignment {}", item.id))?;
        }

        for synced_at in &snapshot.syncs {
            tx.execute(
                "INSERT OR IGNORE INTO sync_events (user_id, synced_at) VALUES (?1, ?2)",
                params![user, synced_at],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Record a grade (or placeholder) for one item
    pub fn set_score(
        &self,
        user_id: &str,
        item_id: &str,
        score: Option<f64>,
        placeholder: bool,
    ) -> Result<()> {
        let conn = self.db.conn();
        let changed = conn.execute(
            "UPDATE assignments SET score = ?3, placeholder = ?4 WHERE user_id = ?1 AND id = ?2",
            params![user_id, item_id, score, placeholder],
        )?;
        if changed == 0 {
            anyhow::bail!("Unknown assignment {} for user {}", item_id, user_id);
        }
        Ok(())
    }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<GradedItem> {
    let kind: String = row.get(3)?;
    Ok(GradedItem {
        id: row.get(0)?,
        course_id: row.get(1)?,
        title: row.get(2)?,
        kind: ItemKind::from_str(&kind).unwrap_or_default(),
        score: row.get(4)?,
        placeholder: row.get(5)?,
        due_at: row.get(6)?,
        completed: row.get(7)?,
    })
}

const ITEM_COLUMNS: &str = "id, course_id, title, kind, score, placeholder, due_at, completed";

impl CourseworkSource for CourseworkRepository {
    fn profile(&self, user_id: &str) -> Result<Profile> {
        let conn = self.db.conn();
        let profile = conn
            .query_row(
                "SELECT tier, has_profile_picture, dark_mode, notifications_enabled FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| {
                    let tier: String = row.get(0)?;
                    Ok(Profile {
                        tier: Tier::from_str(&tier).unwrap_or_default(),
                        has_profile_picture: row.get(1)?,
                        dark_mode: row.get(2)?,
                        notifications_enabled: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(profile.unwrap_or_default())
    }

    fn items(&self, user_id: &str) -> Result<Vec<GradedItem>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM assignments WHERE user_id = ?1 ORDER BY course_id, due_at",
            ITEM_COLUMNS
        ))?;
        let items = stmt
            .query_map(params![user_id], item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn item(&self, user_id: &str, item_id: &str) -> Result<Option<GradedItem>> {
        let conn = self.db.conn();
        let item = conn
            .query_row(
                &format!(
                    "SELECT {} FROM assignments WHERE user_id = ?1 AND id = ?2",
                    ITEM_COLUMNS
                ),
                params![user_id, item_id],
                item_from_row,
            )
            .optional()?;
        Ok(item)
    }

    fn sync_count(&self, user_id: &str) -> Result<u64> {
        let conn = self.db.conn();
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM sync_events WHERE user_id = ?1",
            params![user_id],
            |r| r.get(0),
        )?;
        Ok(count)
    }
}

// ============================================
// ACHIEVEMENT REPOSITORY
// ============================================

pub struct AchievementRepository {
    db: EconomyDb,
}

impl AchievementRepository {
    pub fn new(db: EconomyDb) -> Self {
        Self { db }
    }
}

fn achievement_from_row(row: &Row<'_>) -> rusqlite::Result<AchievementRecord> {
    let requirement_json: String = row.get(2)?;
    let requirement: Requirement = serde_json::from_str(&requirement_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    let difficulty: String = row.get(3)?;
    let difficulty = Difficulty::from_str(&difficulty).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("unknown difficulty '{}'", difficulty).into(),
        )
    })?;
    Ok(AchievementRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        requirement,
        difficulty,
        points: row.get(4)?,
        progress: row.get(5)?,
        unlocked: row.get(6)?,
        unlocked_at: row.get(7)?,
    })
}

impl AchievementStore for AchievementRepository {
    fn list_achievements(&self, user_id: &str) -> Result<Vec<AchievementRecord>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, title, requirement_json, difficulty, points, progress, unlocked, unlocked_at
            FROM achievements WHERE user_id = ?1 ORDER BY rowid
            "#,
        )?;
        let records = stmt
            .query_map(params![user_id], achievement_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn insert_achievement(&self, user_id: &str, record: &AchievementRecord) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let requirement_json = serde_json::to_string(&record.requirement)?;
        let conn = self.db.conn();
        conn.execute(
            r#"
            INSERT INTO achievements
                (user_id, id, title, requirement_json, difficulty, points, progress, unlocked, unlocked_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                user_id,
                record.id,
                record.title,
                requirement_json,
                record.difficulty.as_str(),
                record.points,
                record.progress,
                record.unlocked,
                record.unlocked_at,
                now,
            ],
        )
        .with_context(|| format!("Failed to create achievement {}", record.id))?;
        Ok(())
    }

    fn update_achievement_progress(
        &self,
        user_id: &str,
        achievement_id: &str,
        progress: u8,
        unlocked: bool,
    ) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let conn = self.db.conn();
        // unlocked_at keeps the first unlock time while unlocked, cleared on regression
        conn.execute(
            r#"
            UPDATE achievements SET
                progress = ?3,
                unlocked = ?4,
                unlocked_at = CASE
                    WHEN ?4 = 0 THEN NULL
                    WHEN unlocked_at IS NULL THEN ?5
                    ELSE unlocked_at
                END,
                updated_at = ?5
            WHERE user_id = ?1 AND id = ?2
            "#,
            params![user_id, achievement_id, progress, unlocked, now],
        )
        .with_context(|| format!("Failed to update achievement {}", achievement_id))?;
        Ok(())
    }
}

// ============================================
// WAGER REPOSITORY
// ============================================

pub struct WagerRepository {
    db: EconomyDb,
}

impl WagerRepository {
    pub fn new(db: EconomyDb) -> Self {
        Self { db }
    }
}

const WAGER_COLUMNS: &str = "id, user_id, item_id, course_id, amount, multiplier, base_score, \
     required_score, tier, resolved, won, points_awarded, actual_grade, created_at, resolved_at";

fn wager_from_row(row: &Row<'_>) -> rusqlite::Result<Wager> {
    let tier: String = row.get(8)?;
    Ok(Wager {
        id: row.get(0)?,
        user_id: row.get(1)?,
        item_id: row.get(2)?,
        course_id: row.get(3)?,
        amount: row.get(4)?,
        multiplier: row.get(5)?,
        base_score: row.get(6)?,
        required_score: row.get(7)?,
        tier: Tier::from_str(&tier).unwrap_or_default(),
        resolved: row.get(9)?,
        won: row.get(10)?,
        points_awarded: row.get(11)?,
        actual_grade: row.get(12)?,
        created_at: row.get(13)?,
        resolved_at: row.get(14)?,
    })
}

impl WagerStore for WagerRepository {
    fn list_wagers(&self, user_id: &str) -> Result<Vec<Wager>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM wagers WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
            WAGER_COLUMNS
        ))?;
        let wagers = stmt
            .query_map(params![user_id], wager_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(wagers)
    }

    fn unresolved_wagers(&self, user_id: &str) -> Result<Vec<Wager>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM wagers WHERE user_id = ?1 AND resolved = 0 ORDER BY created_at, rowid",
            WAGER_COLUMNS
        ))?;
        let wagers = stmt
            .query_map(params![user_id], wager_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(wagers)
    }

    fn get_wager(&self, user_id: &str, wager_id: &str) -> Result<Option<Wager>> {
        let conn = self.db.conn();
        let wager = conn
            .query_row(
                &format!("SELECT {} FROM wagers WHERE user_id = ?1 AND id = ?2", WAGER_COLUMNS),
                params![user_id, wager_id],
                wager_from_row,
            )
            .optional()?;
        Ok(wager)
    }

    fn insert_wager_if_affordable(&self, wager: &Wager) -> Result<bool> {
        let conn = self.db.conn();
        // Single statement: the balance is re-derived from achievement and
        // wager rows at write time, so two racing inserts cannot both pass.
        // Mirrors `ledger::available_points`.
        let inserted = conn
            .execute(
                r#"
                INSERT INTO wagers
                    (id, user_id, item_id, course_id, amount, multiplier, base_score,
                     required_score, tier, resolved, won, points_awarded, created_at)
                SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, 0, 0, ?10
                WHERE MAX(0, (
                    SELECT COALESCE(SUM(CASE WHEN unlocked = 1 THEN points
                                             ELSE points * progress / 100.0 END), 0)
                    FROM achievements WHERE user_id = ?2
                ) + (
                    SELECT COALESCE(SUM(points_awarded - amount), 0)
                    FROM wagers WHERE user_id = ?2 AND resolved = 1
                )) - (
                    SELECT COALESCE(SUM(amount), 0)
                    FROM wagers WHERE user_id = ?2 AND resolved = 0
                ) >= ?5 - ?11
                "#,
                params![
                    wager.id,
                    wager.user_id,
                    wager.item_id,
                    wager.course_id,
                    wager.amount,
                    wager.multiplier,
                    wager.base_score,
                    wager.required_score,
                    wager.tier.as_str(),
                    wager.created_at,
                    BALANCE_EPSILON,
                ],
            )
            .context("Failed to insert wager")?;
        Ok(inserted == 1)
    }

    fn resolve_wager(&self, wager_id: &str, settlement: &Settlement) -> Result<bool> {
        let conn = self.db.conn();
        let changed = conn
            .execute(
                r#"
                UPDATE wagers SET
                    resolved = 1, won = ?2, points_awarded = ?3, actual_grade = ?4, resolved_at = ?5
                WHERE id = ?1 AND resolved = 0
                "#,
                params![
                    wager_id,
                    settlement.won,
                    settlement.points_awarded,
                    settlement.actual_grade,
                    settlement.resolved_at,
                ],
            )
            .with_context(|| format!("Failed to resolve wager {}", wager_id))?;
        Ok(changed == 1)
    }
}
