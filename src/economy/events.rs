//! Economy events and the sinks that receive them
//!
//! Delivery is fire-and-forget: it happens after the state write and a sink
//! failure is logged, never returned to the caller.

use std::sync::mpsc::Sender;

use anyhow::{anyhow, Result};
use serde::Serialize;

/// Events emitted by the engines
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EconomyEvent {
    AchievementUnlocked {
        user_id: String,
        achievement_id: String,
        title: String,
        points: u32,
    },
    WagerPlaced {
        user_id: String,
        wager_id: String,
        amount: f64,
        multiplier: f64,
        required_score: f64,
    },
    WagerResolved {
        user_id: String,
        wager_id: String,
        won: bool,
        points_awarded: f64,
    },
}

/// Receiver of economy events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EconomyEvent) -> Result<()>;
}

impl EventSink for Sender<EconomyEvent> {
    fn emit(&self, event: EconomyEvent) -> Result<()> {
        self.send(event).map_err(|_| anyhow!("event receiver dropped"))
    }
}

/// Discards every event
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: EconomyEvent) -> Result<()> {
        Ok(())
    }
}

/// Writes events to the log
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: EconomyEvent) -> Result<()> {
        match &event {
            EconomyEvent::AchievementUnlocked { user_id, title, points, .. } => {
                tracing::info!(user_id = %user_id, points, "Achievement unlocked: {}", title);
            }
            EconomyEvent::WagerPlaced { user_id, wager_id, amount, .. } => {
                tracing::info!(user_id = %user_id, wager_id = %wager_id, amount, "Wager placed");
            }
            EconomyEvent::WagerResolved { user_id, wager_id, won, points_awarded } => {
                tracing::info!(
                    user_id = %user_id,
                    wager_id = %wager_id,
                    won,
                    points_awarded,
                    "Wager resolved"
                );
            }
        }
        Ok(())
    }
}

/// Deliver an event, logging (not propagating) any sink failure
pub fn notify(sink: &dyn EventSink, event: EconomyEvent) {
    if let Err(e) = sink.emit(event) {
        tracing::warn!("Failed to deliver economy event: {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn unlocked() -> EconomyEvent {
        EconomyEvent::AchievementUnlocked {
            user_id: "u1".to_string(),
            achievement_id: "connected".to_string(),
            title: "Connected".to_string(),
            points: 10,
        }
    }

    #[test]
    fn test_channel_sink_delivers() {
        let (tx, rx) = mpsc::channel();
        notify(&tx, unlocked());
        assert_eq!(rx.try_recv().unwrap(), unlocked());
    }

    #[test]
    fn test_dropped_receiver_does_not_panic() {
        let (tx, rx) = mpsc::channel::<EconomyEvent>();
        drop(rx);
        assert!(tx.emit(unlocked()).is_err());
        notify(&tx, unlocked());
    }

    #[test]
    fn test_event_json_tag() {
        let json = serde_json::to_value(unlocked()).unwrap();
        assert_eq!(json["event"], "achievement_unlocked");
        assert_eq!(json["points"], 10);
    }
}
