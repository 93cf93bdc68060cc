//! Integration tests for the points ledger

mod common;

use gradestake::economy::{Balance, Tier, WagerError};

use common::{create_test_economy, funded_premium_user, SnapshotBuilder, TestEconomy, USER};

fn assert_identity(env: &TestEconomy) -> Balance {
    let total = env.manager.get_total_points(USER).unwrap();
    let spendable = env.manager.get_spendable_points(USER).unwrap();
    let open_stake: f64 = env
        .manager
        .get_wagers(USER)
        .unwrap()
        .iter()
        .filter(|w| !w.resolved)
        .map(|w| w.amount)
        .sum();

    assert!((spendable - (total - open_stake).max(0.0)).abs() < 1e-9);
    assert!(total >= 0.0);
    assert!(spendable >= 0.0);
    env.manager.get_balance(USER).unwrap()
}

#[test]
fn test_new_user_has_nothing() {
    let env = create_test_economy();
    let balance = assert_identity(&env);
    assert_eq!(balance.total, 0.0);
    assert_eq!(balance.spendable, 0.0);
}

#[test]
fn test_spendable_identity_through_wager_lifecycle() {
    let env = create_test_economy();
    funded_premium_user(&env, &["lab-1", "lab-2", "lab-3"]);
    assert_eq!(assert_identity(&env).total, 22.0);

    env.manager.create_wager(USER, "lab-1", 7.0, 2.0).unwrap();
    env.manager.create_wager(USER, "lab-2", 4.5, 1.0).unwrap();
    let balance = assert_identity(&env);
    assert_eq!(balance.staked, 11.5);
    assert_eq!(balance.open_wagers, 2);

    // lab-1 wins (base 65, 2.0x needs 74), lab-2 loses
    env.grade("lab-1", 80.0);
    env.grade("lab-2", 40.0);
    env.manager.resolve_pending_wagers(USER).unwrap();

    // 22 + (14 - 7) - 4.5
    let balance = assert_identity(&env);
    assert_eq!(balance.staked, 0.0);
    assert_eq!(balance.winnings, 14.0);
    assert_eq!(balance.settled, 2.5);
    assert_eq!(balance.total, 24.5);
    assert_eq!(balance.spendable, 24.5);

    env.manager.create_wager(USER, "lab-3", balance.spendable, 1.0).unwrap();
    assert!(assert_identity(&env).spendable.abs() < 1e-9);
}

#[test]
fn test_lost_wager_forfeits_stake() {
    let env = create_test_economy();
    funded_premium_user(&env, &["lab-1"]);

    env.manager.create_wager(USER, "lab-1", 10.0, 3.0).unwrap();
    env.grade("lab-1", 10.0);
    env.manager.resolve_pending_wagers(USER).unwrap();

    let balance = assert_identity(&env);
    assert_eq!(balance.total, 12.0);
    assert_eq!(balance.spendable, 12.0);
    assert_eq!(balance.achievements, 22.0);
}

#[test]
fn test_won_wager_pays_into_total() {
    let env = create_test_economy();
    funded_premium_user(&env, &["lab-1"]);

    // Premium 3.0x from base 65 needs 85; pays 30 on a stake of 10
    env.manager.create_wager(USER, "lab-1", 10.0, 3.0).unwrap();
    env.grade("lab-1", 99.0);
    env.manager.resolve_pending_wagers(USER).unwrap();

    let balance = assert_identity(&env);
    assert_eq!(balance.total, 42.0);
    assert_eq!(balance.spendable, 42.0);
    assert_eq!(env.manager.get_level(USER).unwrap().points, 42.0);
}

#[test]
fn test_winnings_can_be_staked_again() {
    let env = create_test_economy();
    funded_premium_user(&env, &["lab-1", "lab-2"]);

    env.manager.create_wager(USER, "lab-1", 22.0, 2.0).unwrap();
    env.grade("lab-1", 100.0);
    env.manager.resolve_pending_wagers(USER).unwrap();

    // 44 spendable now, more than achievements alone could cover
    env.manager.create_wager(USER, "lab-2", 40.0, 1.0).unwrap();
    assert!((assert_identity(&env).spendable - 4.0).abs() < 1e-9);
}

#[test]
fn test_regression_below_stake_reports_zero_spendable() {
    let env = create_test_economy();
    funded_premium_user(&env, &["lab-1", "lab-2"]);
    env.manager.create_wager(USER, "lab-1", 22.0, 1.0).unwrap();

    // Picture Perfect is reversible: removing the picture drops 10 points
    env.sync(
        &SnapshotBuilder::new()
            .tier(Tier::Premium)
            .profile_picture(false)
            .syncs(1)
            .build(),
    );
    env.manager.evaluate_achievements(USER).unwrap();

    let balance = assert_identity(&env);
    assert_eq!(balance.total, 12.0);
    assert_eq!(balance.staked, 22.0);
    assert_eq!(balance.spendable, 0.0);

    assert!(matches!(
        env.manager.create_wager(USER, "lab-2", 1.0, 1.0),
        Err(WagerError::InsufficientBalance { .. })
    ));
}

#[test]
fn test_failed_wager_leaves_balance_untouched() {
    let env = create_test_economy();
    funded_premium_user(&env, &["lab-1"]);
    let before = assert_identity(&env);

    assert!(env.manager.create_wager(USER, "lab-1", 500.0, 1.0).is_err());
    assert!(env.manager.create_wager(USER, "lab-1", 5.0, 9.0).is_err());
    assert!(env.manager.create_wager(USER, "missing", 5.0, 1.0).is_err());

    let after = assert_identity(&env);
    assert_eq!(before.spendable, after.spendable);
    assert_eq!(after.open_wagers, 0);
}
