//! Wager placement and settlement

mod manager;
mod settlement;

pub use manager::WagerManager;
pub use settlement::SettlementEngine;
