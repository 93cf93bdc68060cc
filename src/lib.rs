//! gradestake - points economy for coursework
//!
//! Students earn achievement points from their coursework activity (submissions,
//! perfect scores, course standing, LMS syncs, profile setup) and can stake those
//! points on upcoming grades. A wager pays `amount * multiplier` when the grade
//! reaches the required score frozen at creation.
//!
//! ## Components
//!
//! - **Achievements**: a fixed rule catalog evaluated against activity metrics
//! - **Ledger**: total and spendable balances, always derived from stored rows
//! - **Odds**: base-score estimates and multiplier/score mappings per tier
//! - **Wagers**: validated placement and one-time settlement
//!
//! Coursework records are written by the LMS sync; this crate only reads them
//! (`gradestake import` stands in for the sync).

pub mod config;
pub mod economy;
