//! Async encounter driver.
//!
//! [`EncounterRunner`] owns one [`BattleManager`] and plays it to the end:
//!
//! 1. pick the acting creature's action (the ally provider, or the policy)
//! 2. hand the resolved effect to the [`AnimationPlayer`]
//! 3. apply on the player's apply signal, or when the apply timeout passes
//! 4. complete on the complete signal, or when the complete timeout passes
//!
//! A force-end sent through the [`EncounterHandle`] preempts any of those
//! waits. The manager then drops the in-flight resolution, so a signal that
//! arrives late never touches the ended encounter.
use std::sync::Arc;
use std::time::Duration;

use game_core::{
    Actor, BattleError, BattleManager, BattleOutcome, BattlePhase, Resolution, SelectOutcome,
    Side, Ticket, Uid, VictoryReport,
};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::animation::{AnimationCue, AnimationPlayer, AnimationSignals};
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{BattleEvent, EventBus, SyncSignal};
use crate::provider::{ActionChoice, ActionProvider};

/// Cloneable control surface for a running encounter.
#[derive(Clone, Debug)]
pub struct EncounterHandle {
    commands: mpsc::Sender<BattleOutcome>,
    bus: EventBus,
}

impl EncounterHandle {
    /// Ends the encounter with `outcome` at the runner's next suspension point.
    pub async fn force_end(&self, outcome: BattleOutcome) -> Result<()> {
        self.commands
            .send(outcome)
            .await
            .map_err(|_| RuntimeError::EncounterClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BattleEvent> {
        self.bus.subscribe()
    }
}

/// Final state of a finished encounter.
#[derive(Clone, Debug)]
pub struct EncounterSummary {
    pub outcome: BattleOutcome,
    /// True if the outcome came from a force-end.
    pub forced: bool,
    pub rounds: u32,
    pub log: Vec<String>,
    pub victory: Option<VictoryReport>,
    pub allies: Vec<Actor>,
    /// Synchronization points that were reached by timeout.
    pub timeouts: u32,
}

enum Waited<T> {
    Ready(T),
    TimedOut,
    Forced(BattleOutcome),
}

pub struct EncounterRunner {
    manager: BattleManager,
    player: Arc<dyn AnimationPlayer>,
    provider: Option<Arc<dyn ActionProvider>>,
    bus: EventBus,
    commands: mpsc::Receiver<BattleOutcome>,
    apply_timeout: Duration,
    complete_timeout: Duration,
    floor: u32,
    log_seen: usize,
    last_phase: Option<(BattlePhase, u32)>,
    timeouts: u32,
    forced: bool,
}

impl EncounterRunner {
    pub fn new(
        manager: BattleManager,
        player: Arc<dyn AnimationPlayer>,
        config: &RuntimeConfig,
    ) -> (Self, EncounterHandle) {
        let (tx, rx) = mpsc::channel(4);
        let bus = EventBus::new(config.event_buffer);
        let handle = EncounterHandle {
            commands: tx,
            bus: bus.clone(),
        };
        let runner = Self {
            manager,
            player,
            provider: None,
            bus,
            commands: rx,
            apply_timeout: config.apply_timeout,
            complete_timeout: config.complete_timeout,
            floor: 1,
            log_seen: 0,
            last_phase: None,
            timeouts: 0,
            forced: false,
        };
        (runner, handle)
    }

    /// Routes ally turns through `provider` instead of the battle policy.
    pub fn with_provider(mut self, provider: Arc<dyn ActionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Dungeon floor the rewards are paid for.
    pub fn on_floor(mut self, floor: u32) -> Self {
        self.floor = floor.max(1);
        self
    }

    pub fn manager(&self) -> &BattleManager {
        &self.manager
    }

    /// Runs the encounter on its own task.
    pub fn spawn(self) -> JoinHandle<Result<EncounterSummary>> {
        tokio::spawn(self.run())
    }

    /// Plays the encounter to a terminal phase and settles it.
    ///
    /// A stalled encounter fails with [`BattleError::RoundLimit`] once the
    /// configured round cap is passed.
    pub async fn run(mut self) -> Result<EncounterSummary> {
        self.publish_progress();
        while !self.manager.is_over() {
            if let Ok(outcome) = self.commands.try_recv() {
                self.force_end(outcome);
                break;
            }
            self.manager.check_round_limit()?;
            self.play_turn().await?;
            self.publish_progress();
        }
        self.finish()
    }

    async fn play_turn(&mut self) -> Result<()> {
        let actor = self
            .manager
            .current_actor()
            .ok_or(BattleError::UnexpectedPhase {
                operation: "play a turn",
                phase: self.manager.phase(),
            })?;
        self.bus.publish(BattleEvent::TurnStarted { actor });

        let choice = match self.choose(actor).await {
            Waited::Ready(choice) => choice,
            Waited::Forced(outcome) => {
                self.force_end(outcome);
                return Ok(());
            }
            Waited::TimedOut => ActionChoice::Auto,
        };

        let selected = match choice {
            ActionChoice::Auto => self.manager.auto_select()?,
            ActionChoice::Act { action, targets } => {
                self.manager.select_action(actor, &action, targets)?
            }
            ActionChoice::Flee => {
                self.manager.flee(actor)?;
                return Ok(());
            }
        };

        match selected {
            SelectOutcome::Resolving(resolution) => self.play_resolution(resolution).await,
            SelectOutcome::Forfeited(_) | SelectOutcome::Skipped => Ok(()),
        }
    }

    async fn choose(&mut self, actor: Uid) -> Waited<ActionChoice> {
        let is_ally = self.manager.state().side_of(actor) == Some(Side::Ally);
        let Some(provider) = self.provider.clone().filter(|_| is_ally) else {
            return Waited::Ready(ActionChoice::Auto);
        };

        tokio::select! {
            biased;
            Some(outcome) = self.commands.recv() => Waited::Forced(outcome),
            choice = provider.choose(actor, self.manager.state()) => match choice {
                Ok(choice) => Waited::Ready(choice),
                Err(err) => {
                    tracing::warn!(%actor, %err, "provider failed, using the battle policy");
                    Waited::Ready(ActionChoice::Auto)
                }
            },
        }
    }

    async fn play_resolution(&mut self, resolution: Resolution) -> Result<()> {
        let ticket = resolution.ticket;
        let cue = AnimationCue::from_effect(&resolution.effect);
        self.bus.publish(BattleEvent::Cue(cue.clone()));
        let AnimationSignals { apply, complete } = self.player.play(cue).await;

        if let Waited::Forced(outcome) =
            self.wait_signal(apply, self.apply_timeout, SyncSignal::Apply).await
        {
            return self.abandon(ticket, outcome);
        }
        self.manager.apply(ticket)?;
        self.publish_progress();

        if let Waited::Forced(outcome) = self
            .wait_signal(complete, self.complete_timeout, SyncSignal::Complete)
            .await
        {
            return self.abandon(ticket, outcome);
        }
        self.manager.complete(ticket)?;
        Ok(())
    }

    async fn wait_signal(
        &mut self,
        signal: oneshot::Receiver<()>,
        timeout: Duration,
        which: SyncSignal,
    ) -> Waited<()> {
        tokio::select! {
            biased;
            Some(outcome) = self.commands.recv() => Waited::Forced(outcome),
            _ = signal => Waited::Ready(()),
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!(signal = ?which, ?timeout, "animation signal timed out");
                self.timeouts += 1;
                self.bus.publish(BattleEvent::SignalTimedOut { signal: which });
                Waited::TimedOut
            }
        }
    }

    fn abandon(&mut self, ticket: Ticket, outcome: BattleOutcome) -> Result<()> {
        self.force_end(outcome);
        let status = self.manager.apply(ticket)?;
        tracing::debug!(?status, "in-flight resolution dropped");
        Ok(())
    }

    fn force_end(&mut self, outcome: BattleOutcome) {
        if self.manager.end(outcome) {
            self.forced = true;
            tracing::info!(%outcome, "encounter force-ended");
        }
    }

    fn publish_progress(&mut self) {
        let log = self.manager.log();
        for line in log.since(self.log_seen) {
            self.bus.publish(BattleEvent::Log { line: line.clone() });
        }
        self.log_seen = log.len();

        let current = (self.manager.phase(), self.manager.round());
        if self.last_phase != Some(current) {
            self.last_phase = Some(current);
            self.bus.publish(BattleEvent::PhaseChanged {
                phase: current.0,
                round: current.1,
            });
        }
    }

    fn finish(mut self) -> Result<EncounterSummary> {
        let outcome = self.manager.outcome().ok_or(BattleError::UnexpectedPhase {
            operation: "finish",
            phase: self.manager.phase(),
        })?;
        let victory = self.manager.conclude(self.floor)?;
        self.publish_progress();
        self.bus.publish(BattleEvent::Ended {
            outcome,
            forced: self.forced,
        });
        tracing::info!(
            %outcome,
            forced = self.forced,
            rounds = self.manager.round(),
            timeouts = self.timeouts,
            "encounter finished"
        );

        Ok(EncounterSummary {
            outcome,
            forced: self.forced,
            rounds: self.manager.round(),
            log: self.manager.log().entries().to_vec(),
            victory,
            timeouts: self.timeouts,
            allies: self.manager.into_allies(),
        })
    }
}
