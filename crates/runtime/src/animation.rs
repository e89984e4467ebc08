//! Animation collaborator contract.
//!
//! The runtime hands every resolved action to an [`AnimationPlayer`] as an
//! [`AnimationCue`] and gets back two signals: `apply`, fired at the frame
//! where the hit lands, and `complete`, fired when playback ends. A player
//! that drops a sender counts as having fired it. The rules never wait on a
//! signal forever; the runner applies and completes on timeout.
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use game_core::{EffectResult, Uid};
use serde::Serialize;
use tokio::sync::oneshot;

/// What to play for one resolved action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnimationCue {
    /// Opaque script id from the action definition.
    pub script: String,
    pub subject: Uid,
    pub targets: Vec<Uid>,
}

impl AnimationCue {
    pub fn from_effect(effect: &EffectResult) -> Self {
        Self {
            script: effect.script.clone(),
            subject: effect.subject,
            targets: effect.targets.clone(),
        }
    }
}

/// Receiving half of a cue's synchronization points.
#[derive(Debug)]
pub struct AnimationSignals {
    pub apply: oneshot::Receiver<()>,
    pub complete: oneshot::Receiver<()>,
}

/// Sending half of a cue's synchronization points.
#[derive(Debug)]
pub struct AnimationTriggers {
    apply: Option<oneshot::Sender<()>>,
    complete: Option<oneshot::Sender<()>>,
}

impl AnimationSignals {
    pub fn channel() -> (AnimationTriggers, AnimationSignals) {
        let (apply_tx, apply_rx) = oneshot::channel();
        let (complete_tx, complete_rx) = oneshot::channel();
        (
            AnimationTriggers {
                apply: Some(apply_tx),
                complete: Some(complete_tx),
            },
            AnimationSignals {
                apply: apply_rx,
                complete: complete_rx,
            },
        )
    }
}

impl AnimationTriggers {
    /// Fires the apply signal. Later calls do nothing.
    pub fn apply(&mut self) {
        if let Some(tx) = self.apply.take() {
            let _ = tx.send(());
        }
    }

    /// Fires the complete signal, firing apply first if it is still pending.
    pub fn complete(&mut self) {
        self.apply();
        if let Some(tx) = self.complete.take() {
            let _ = tx.send(());
        }
    }
}

/// Plays cues and reports the synchronization points.
#[async_trait]
pub trait AnimationPlayer: Send + Sync {
    async fn play(&self, cue: AnimationCue) -> AnimationSignals;
}

/// Fires both signals immediately. Used for headless simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantPlayer;

#[async_trait]
impl AnimationPlayer for InstantPlayer {
    async fn play(&self, cue: AnimationCue) -> AnimationSignals {
        tracing::trace!(script = %cue.script, "instant cue");
        let (mut triggers, signals) = AnimationSignals::channel();
        triggers.complete();
        signals
    }
}

/// Fires apply and complete after fixed delays measured from the cue.
#[derive(Clone, Copy, Debug)]
pub struct TimedPlayer {
    pub apply_after: Duration,
    pub complete_after: Duration,
}

impl TimedPlayer {
    pub fn new(apply_after: Duration, complete_after: Duration) -> Self {
        Self {
            apply_after,
            complete_after: complete_after.max(apply_after),
        }
    }
}

#[async_trait]
impl AnimationPlayer for TimedPlayer {
    async fn play(&self, cue: AnimationCue) -> AnimationSignals {
        let (mut triggers, signals) = AnimationSignals::channel();
        let apply_after = self.apply_after;
        let remaining = self.complete_after.saturating_sub(apply_after);
        tokio::spawn(async move {
            tokio::time::sleep(apply_after).await;
            triggers.apply();
            tokio::time::sleep(remaining).await;
            triggers.complete();
            tracing::trace!(script = %cue.script, "timed cue finished");
        });
        signals
    }
}

/// Never fires either signal. Holds every sender so the receivers stay
/// pending until the runner times out.
#[derive(Debug, Default)]
pub struct StalledPlayer {
    held: Mutex<Vec<AnimationTriggers>>,
}

impl StalledPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cues received so far.
    pub fn cues_played(&self) -> usize {
        self.held.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl AnimationPlayer for StalledPlayer {
    async fn play(&self, _cue: AnimationCue) -> AnimationSignals {
        let (triggers, signals) = AnimationSignals::channel();
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(triggers);
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue() -> AnimationCue {
        AnimationCue {
            script: "flash".into(),
            subject: Uid(1),
            targets: vec![Uid(2)],
        }
    }

    #[tokio::test]
    async fn instant_player_fires_both() {
        let signals = InstantPlayer.play(cue()).await;
        assert!(signals.apply.await.is_ok());
        assert!(signals.complete.await.is_ok());
    }

    #[tokio::test]
    async fn complete_fires_pending_apply() {
        let (mut triggers, signals) = AnimationSignals::channel();
        triggers.complete();
        triggers.apply();
        assert!(signals.apply.await.is_ok());
        assert!(signals.complete.await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn timed_player_waits() {
        let player = TimedPlayer::new(Duration::from_millis(100), Duration::from_millis(300));
        let mut signals = player.play(cue()).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(signals.apply.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(signals.apply.try_recv().is_ok());
        assert!(signals.complete.await.is_ok());
    }

    #[tokio::test]
    async fn stalled_player_keeps_signals_pending() {
        let player = StalledPlayer::new();
        let mut signals = player.play(cue()).await;
        assert_eq!(player.cues_played(), 1);
        assert_eq!(
            signals.apply.try_recv(),
            Err(oneshot::error::TryRecvError::Empty)
        );
    }
}
