//! Broadcast bus for encounter events.
//!
//! Events are best-effort: publishing with no subscribers is not an error,
//! and a subscriber that falls behind by more than the buffer sees
//! `RecvError::Lagged` and skips ahead.
use game_core::{BattleOutcome, BattlePhase, Uid};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::animation::AnimationCue;

/// Which synchronization point a timeout hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncSignal {
    Apply,
    Complete,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEvent {
    PhaseChanged { phase: BattlePhase, round: u32 },
    TurnStarted { actor: Uid },
    /// A new battle log line.
    Log { line: String },
    Cue(AnimationCue),
    SignalTimedOut { signal: SyncSignal },
    Ended { outcome: BattleOutcome, forced: bool },
}

#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<BattleEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: BattleEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("no subscribers for battle event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BattleEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(128)
    }
}
