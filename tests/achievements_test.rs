//! Integration tests for achievement evaluation

mod common;

use gradestake::economy::{AchievementId, AchievementRecord, EconomyEvent, ACHIEVEMENTS};

use common::{create_test_economy, SnapshotBuilder, TestEconomy, USER};

fn row(env: &TestEconomy, id: AchievementId) -> AchievementRecord {
    env.manager
        .get_achievements(USER)
        .unwrap()
        .into_iter()
        .find(|r| r.id == id.as_str())
        .unwrap_or_else(|| panic!("no row for {}", id.as_str()))
}

fn five_perfect_scores() -> SnapshotBuilder {
    (1..=5).fold(SnapshotBuilder::new(), |b, i| {
        b.graded(&format!("hw-{i}"), "math", 100.0)
    })
}

#[test]
fn test_satisfied_rule_initializes_unlocked_on_first_pass() {
    let env = create_test_economy();
    env.sync(&five_perfect_scores().build());

    // No rows exist yet; Flawless Five needs 5 perfect scores and there are 5
    let report = env.manager.evaluate_achievements(USER).unwrap();
    assert_eq!(report.created.len(), ACHIEVEMENTS.len());
    assert!(report.updated.is_empty());
    assert!(report.unlocked.iter().any(|u| u.id == "flawless_five"));

    let flawless = row(&env, AchievementId::FlawlessFive);
    assert_eq!(flawless.progress, 100);
    assert!(flawless.unlocked);
    assert!(flawless.unlocked_at.is_some());
}

#[test]
fn test_ratio_rules_carry_partial_progress() {
    let env = create_test_economy();
    env.sync(&five_perfect_scores().build());
    env.manager.evaluate_achievements(USER).unwrap();

    let ten = row(&env, AchievementId::TenSubmissions);
    assert_eq!(ten.progress, 50);
    assert!(!ten.unlocked);
    assert!((ten.earned_points() - 12.5).abs() < 1e-9);

    // Binary rule below its requirement gets nothing
    let connected = row(&env, AchievementId::Connected);
    assert_eq!(connected.progress, 0);
}

#[test]
fn test_sticky_unlock_survives_regression() {
    let env = create_test_economy();
    env.sync(&five_perfect_scores().build());
    env.manager.evaluate_achievements(USER).unwrap();

    // Regrade every perfect score; the metric now says zero perfect scores
    for i in 1..=5 {
        env.grade(&format!("hw-{i}"), 60.0);
    }
    let report = env.manager.evaluate_achievements(USER).unwrap();
    assert!(report.skipped.contains(&"flawless_five"));
    assert!(report.skipped.contains(&"perfectionist"));

    let flawless = row(&env, AchievementId::FlawlessFive);
    assert_eq!(flawless.progress, 100);
    assert!(flawless.unlocked);
}

#[test]
fn test_reversible_rule_falls_back() {
    let env = create_test_economy();
    env.sync(&SnapshotBuilder::new().profile_picture(true).build());
    env.manager.evaluate_achievements(USER).unwrap();
    assert!(row(&env, AchievementId::PicturePerfect).unlocked);

    env.sync(&SnapshotBuilder::new().profile_picture(false).build());
    let report = env.manager.evaluate_achievements(USER).unwrap();
    assert!(report.updated.contains(&"picture_perfect"));

    let picture = row(&env, AchievementId::PicturePerfect);
    assert_eq!(picture.progress, 0);
    assert!(!picture.unlocked);
    assert!(picture.unlocked_at.is_none());
}

#[test]
fn test_course_standing_tracks_averages() {
    let env = create_test_economy();
    env.sync(
        &SnapshotBuilder::new()
            .graded("m1", "math", 92.0)
            .graded("b1", "bio", 88.0)
            .graded("h1", "hist", 71.0)
            .build(),
    );
    env.manager.evaluate_achievements(USER).unwrap();

    assert!(row(&env, AchievementId::PassingGrade).unlocked);
    // 2 of 3 courses at 85+
    assert_eq!(row(&env, AchievementId::HonorRoll).progress, 67);
    // 1 of 4 courses at 90+
    assert_eq!(row(&env, AchievementId::DeansList).progress, 25);
}

#[test]
fn test_unlock_notifies_once() {
    let env = create_test_economy();
    env.sync(&SnapshotBuilder::new().syncs(1).build());

    env.manager.evaluate_achievements(USER).unwrap();
    env.manager.evaluate_achievements(USER).unwrap();

    let unlocks = env.count_events(|e| {
        matches!(e, EconomyEvent::AchievementUnlocked { achievement_id, .. } if achievement_id == "connected")
    });
    assert_eq!(unlocks, 1);
}

#[test]
fn test_level_follows_total_points() {
    let env = create_test_economy();
    env.sync(&five_perfect_scores().syncs(1).build());
    env.manager.evaluate_achievements(USER).unwrap();

    let total = env.manager.get_total_points(USER).unwrap();
    let level = env.manager.get_level(USER).unwrap();
    assert_eq!(level.points, total);
    assert!(level.level > 1);
}
