//! Wager rejection taxonomy

use std::fmt;

use super::models::Tier;

/// Which tier limit a wager exceeded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierLimit {
    /// Multiplier above the tier's cap
    Multiplier { requested: f64, cap: f64 },
    /// Free tier stake above `free_max_bet_percentage` of total points
    BetSize { requested: f64, max: f64 },
}

impl fmt::Display for TierLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Multiplier { requested, cap } => {
                write!(f, "multiplier {:.2}x exceeds the {:.1}x cap", requested, cap)
            }
            Self::BetSize { requested, max } => {
                write!(f, "stake {:.2} exceeds the maximum bet of {:.2}", requested, max)
            }
        }
    }
}

/// Why a wager was rejected
///
/// Validation variants are never partially applied. `Store` covers data
/// errors: the operation fails closed instead of using default values.
#[derive(Debug, thiserror::Error)]
pub enum WagerError {
    #[error("assignment '{0}' is already graded")]
    AlreadyGraded(String),

    #[error("assignment '{0}' is past due")]
    PastDue(String),

    #[error("over {} tier limit: {limit}", .tier.as_str())]
    OverTierLimit { tier: Tier, limit: TierLimit },

    #[error("invalid wager amount: {0}")]
    InvalidAmount(f64),

    #[error("invalid multiplier: {0} (must be at least 1.0)")]
    InvalidMultiplier(f64),

    #[error("insufficient balance: requested {requested:.2}, available {available:.2}")]
    InsufficientBalance { requested: f64, available: f64 },

    #[error("assignment '{0}' not found")]
    ItemNotFound(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
