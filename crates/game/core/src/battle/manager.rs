//! Encounter orchestration.
//!
//! The manager owns one [`BattleState`] and drives it through the phase
//! machine. Resolution is split around two synchronization points:
//!
//! 1. [`BattleManager::select_action`] resolves an action into an
//!    [`EffectResult`] and hands out a [`Ticket`]; nothing has changed yet.
//! 2. [`BattleManager::apply`] mutates state exactly once for that ticket.
//! 3. [`BattleManager::complete`] advances to the next turn.
//!
//! Callers may apply and complete immediately, or wait for an animation in
//! between. A forced [`BattleManager::end`] invalidates every outstanding
//! ticket, so late callbacks are suppressed.

use std::sync::Arc;

use crate::action::{
    Action, ActionError, ActionObject, ActionResolver, EffectResult, lookup_action,
    select_targets,
};
use crate::env::{PcgRng, RollStream, Services, StatusExpiry};
use crate::stats::{Actor, Uid};

use super::{
    BattleError, BattleLog, BattleOutcome, BattlePhase, BattleState, Side, VictoryReport, apply,
    passives, policy, rewards, turns,
};

/// How deep on-death casts may chain before further triggers are dropped.
const MAX_TRIGGER_DEPTH: u8 = 8;

/// Handle to one in-flight resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    generation: u64,
    serial: u64,
}

/// A resolved action waiting for its apply and complete signals.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub ticket: Ticket,
    pub effect: EffectResult,
}

/// Result of selecting an action for the acting creature.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    /// The action resolved; apply and complete the ticket next.
    Resolving(Resolution),
    /// The action could not be resolved. The turn is lost and the encounter
    /// goes on.
    Forfeited(ActionError),
    /// The creature had nothing usable and waited.
    Skipped,
}

/// Answer to an apply or complete signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    Applied,
    Completed,
    /// The signal was already handled for this ticket.
    Duplicate,
    /// The encounter was force-ended after the ticket was issued.
    Suppressed,
}

#[derive(Clone, Debug)]
struct Pending {
    ticket: Ticket,
    result: EffectResult,
    applied: bool,
}

/// Runs a single encounter from `INIT` to a terminal phase.
#[derive(Debug)]
pub struct BattleManager {
    services: Arc<Services>,
    rng: PcgRng,
    seed: u64,
    nonce: u64,
    generation: u64,
    serial: u64,
    state: BattleState,
    pending: Option<Pending>,
    concluded: bool,
}

impl BattleManager {
    /// Validates the encounter and opens the first round.
    ///
    /// # Errors
    ///
    /// - [`BattleError::InvalidEncounter`] if a side is empty or already
    ///   defeated, or two combatants share a uid
    /// - [`BattleError::Service`] if configuration is not registered
    pub fn start(
        services: Arc<Services>,
        allies: Vec<Actor>,
        enemies: Vec<Actor>,
        seed: u64,
    ) -> Result<Self, BattleError> {
        Self::start_with_leader(services, allies, enemies, seed, None)
    }

    /// Like [`BattleManager::start`], with `leader` opening every round while
    /// it stands, regardless of speed.
    ///
    /// # Errors
    ///
    /// As [`BattleManager::start`], plus [`BattleError::InvalidEncounter`] if
    /// `leader` is not one of the allies.
    pub fn start_with_leader(
        services: Arc<Services>,
        allies: Vec<Actor>,
        enemies: Vec<Actor>,
        seed: u64,
        leader: Option<Uid>,
    ) -> Result<Self, BattleError> {
        services.config()?;
        if allies.is_empty() {
            return Err(BattleError::InvalidEncounter("no allies".into()));
        }
        if enemies.is_empty() {
            return Err(BattleError::InvalidEncounter("no enemies".into()));
        }
        if !allies.iter().any(Actor::is_alive) {
            return Err(BattleError::InvalidEncounter("every ally is down".into()));
        }
        if !enemies.iter().any(Actor::is_alive) {
            return Err(BattleError::InvalidEncounter("every enemy is down".into()));
        }
        let mut uids: Vec<Uid> = allies.iter().chain(&enemies).map(Actor::uid).collect();
        uids.sort_unstable();
        if let Some(pair) = uids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(BattleError::InvalidEncounter(format!(
                "duplicate combatant {}",
                pair[0]
            )));
        }
        if let Some(leader) = leader
            && !allies.iter().any(|ally| ally.uid() == leader)
        {
            return Err(BattleError::InvalidEncounter(format!(
                "leader {leader} is not in the party"
            )));
        }

        let mut manager = Self {
            services,
            rng: PcgRng,
            seed,
            nonce: 0,
            generation: 0,
            serial: 0,
            state: BattleState::new(allies, enemies),
            pending: None,
            concluded: false,
        };
        manager.state.leader = leader;

        let names: Vec<&str> = manager.state.enemies.iter().map(Actor::name).collect();
        let line = format!("Enemies: {}", names.join(", "));
        manager.state.log.push(line);
        tracing::info!(
            allies = manager.state.allies.len(),
            enemies = manager.state.enemies.len(),
            seed,
            "encounter started"
        );

        manager.begin_round();
        Ok(manager)
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn phase(&self) -> BattlePhase {
        self.state.phase
    }

    pub fn allies(&self) -> &[Actor] {
        &self.state.allies
    }

    pub fn enemies(&self) -> &[Actor] {
        &self.state.enemies
    }

    pub fn log(&self) -> &BattleLog {
        &self.state.log
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }

    /// Creature whose turn it is, if a turn is open.
    pub fn current_actor(&self) -> Option<Uid> {
        self.state.current_actor()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.state.phase.outcome()
    }

    pub fn is_over(&self) -> bool {
        self.state.phase.is_terminal()
    }

    /// Ticket of the resolution awaiting its signals, if any.
    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending.as_ref().map(|pending| pending.ticket)
    }

    /// Resolves `action_id` for the acting creature.
    ///
    /// Without explicit `targets` the action's target pattern picks them.
    ///
    /// # Errors
    ///
    /// - [`BattleError::UnexpectedPhase`] outside an ally or enemy turn
    /// - [`BattleError::NotActorsTurn`] if `actor` is not the acting creature
    ///
    /// Failures of the action itself forfeit the turn and come back as
    /// [`SelectOutcome::Forfeited`].
    pub fn select_action(
        &mut self,
        actor: Uid,
        action_id: &str,
        targets: Option<Vec<Uid>>,
    ) -> Result<SelectOutcome, BattleError> {
        self.expect_turn_of(actor, "select an action")?;

        let object = match lookup_action(&self.services, action_id) {
            Ok(object) => object,
            Err(err) => return Ok(self.forfeit(actor, err)),
        };
        let targets = match targets {
            Some(targets) => {
                if let Some(missing) = targets.iter().find(|uid| self.state.actor(**uid).is_none()) {
                    return Ok(self.forfeit(actor, ActionError::TargetNotFound(*missing)));
                }
                targets
            }
            None => self.default_targets(actor, &object),
        };

        Ok(self.resolve_turn(Action {
            subject: actor,
            object,
            targets,
        }))
    }

    /// Lets the policy pick the acting creature's action.
    ///
    /// # Errors
    ///
    /// [`BattleError::UnexpectedPhase`] outside an ally or enemy turn.
    pub fn auto_select(&mut self) -> Result<SelectOutcome, BattleError> {
        let actor = self.current_actor().ok_or(BattleError::UnexpectedPhase {
            operation: "auto-select an action",
            phase: self.state.phase,
        })?;

        self.nonce += 1;
        let rng = self.rng;
        let mut rolls = RollStream::new(&rng, self.seed, self.nonce);
        let choice = self
            .state
            .actor(actor)
            .and_then(|subject| policy::choose_action(&self.services, &self.state, subject, &mut rolls));

        match choice {
            Some(choice) => Ok(self.resolve_turn(Action {
                subject: actor,
                object: choice.object,
                targets: choice.targets,
            })),
            None => {
                let line = format!("{} waits", self.state.name_of(actor));
                self.state.log.push(line);
                self.advance_turn();
                Ok(SelectOutcome::Skipped)
            }
        }
    }

    /// The acting ally leads the party out of the encounter.
    ///
    /// # Errors
    ///
    /// - [`BattleError::UnexpectedPhase`] outside an ally turn
    /// - [`BattleError::NotActorsTurn`] if `actor` is not the acting creature
    pub fn flee(&mut self, actor: Uid) -> Result<(), BattleError> {
        if self.state.phase != BattlePhase::AllyTurn {
            return Err(BattleError::UnexpectedPhase {
                operation: "flee",
                phase: self.state.phase,
            });
        }
        self.expect_turn_of(actor, "flee")?;
        let line = format!("{} flees the battle", self.state.name_of(actor));
        self.state.log.push(line);
        self.finish(BattleOutcome::Flee);
        Ok(())
    }

    /// Apply signal: mutates state for `ticket` exactly once.
    ///
    /// Also fires turn-heal and on-death passives, then checks for the end
    /// of the encounter.
    ///
    /// # Errors
    ///
    /// [`BattleError::UnknownTicket`] if the ticket was never issued here.
    pub fn apply(&mut self, ticket: Ticket) -> Result<SyncStatus, BattleError> {
        if let Some(status) = self.screen(ticket)? {
            return Ok(status);
        }
        let Some(pending) = self.pending.as_mut().filter(|p| p.ticket == ticket) else {
            return Ok(SyncStatus::Duplicate);
        };
        if pending.applied {
            return Ok(SyncStatus::Duplicate);
        }
        pending.applied = true;
        let result = pending.result.clone();

        let defeated = apply::apply_result(&mut self.state, &self.services, &result);
        self.trigger_death_casts(defeated, 0);
        passives::on_turn(&mut self.state, &self.services);

        self.state.phase = BattlePhase::CheckEnd;
        self.check_end();
        Ok(SyncStatus::Applied)
    }

    /// Complete signal: closes `ticket` and advances to the next turn.
    ///
    /// A ticket that was never applied is applied first.
    ///
    /// # Errors
    ///
    /// [`BattleError::UnknownTicket`] if the ticket was never issued here.
    pub fn complete(&mut self, ticket: Ticket) -> Result<SyncStatus, BattleError> {
        if let Some(status) = self.screen(ticket)? {
            return Ok(status);
        }
        let applied = match &self.pending {
            Some(pending) if pending.ticket == ticket => pending.applied,
            _ => return Ok(SyncStatus::Duplicate),
        };
        if !applied {
            self.apply(ticket)?;
        }
        self.pending = None;
        if !self.is_over() {
            self.advance_turn();
        }
        Ok(SyncStatus::Completed)
    }

    /// Forces the encounter into `outcome`.
    ///
    /// Every ticket issued so far is suppressed. Returns false if the
    /// encounter had already ended.
    pub fn end(&mut self, outcome: BattleOutcome) -> bool {
        if self.is_over() {
            return false;
        }
        self.generation += 1;
        self.pending = None;
        self.state.log.push(format!("The encounter is called: {outcome}"));
        self.finish(outcome);
        true
    }

    /// Fails once the encounter has run past the configured `max_rounds`.
    ///
    /// The phase is left alone: only an explicit flee or a force-end may
    /// settle a stalled encounter.
    ///
    /// # Errors
    ///
    /// [`BattleError::RoundLimit`] when the current round is beyond the cap.
    pub fn check_round_limit(&self) -> Result<(), BattleError> {
        let max_rounds = self.services.config()?.battle.max_rounds;
        if !self.is_over() && self.state.round > max_rounds {
            return Err(BattleError::RoundLimit { max_rounds });
        }
        Ok(())
    }

    /// Plays one turn with the policy, applying and completing at once.
    ///
    /// # Errors
    ///
    /// - [`BattleError::UnexpectedPhase`] if the encounter is over
    /// - [`BattleError::RoundLimit`] once `max_rounds` rounds have been played
    pub fn step(&mut self) -> Result<SelectOutcome, BattleError> {
        if self.is_over() {
            return Err(BattleError::UnexpectedPhase {
                operation: "step",
                phase: self.state.phase,
            });
        }
        self.check_round_limit()?;
        if let Some(ticket) = self.pending_ticket() {
            self.complete(ticket)?;
            if self.is_over() {
                return Ok(SelectOutcome::Skipped);
            }
        }
        let outcome = self.auto_select()?;
        if let SelectOutcome::Resolving(resolution) = &outcome {
            self.apply(resolution.ticket)?;
            self.complete(resolution.ticket)?;
        }
        Ok(outcome)
    }

    /// Steps until the encounter ends.
    ///
    /// Terminates: a stalled encounter fails with [`BattleError::RoundLimit`]
    /// and stays open.
    pub fn run_to_end(&mut self) -> Result<BattleOutcome, BattleError> {
        loop {
            if let Some(outcome) = self.outcome() {
                return Ok(outcome);
            }
            self.step()?;
        }
    }

    /// Settles a finished encounter.
    ///
    /// Runs post-battle passives, pays out rewards for a win on `floor`, and
    /// clears per-battle state from the allies.
    ///
    /// # Errors
    ///
    /// - [`BattleError::UnexpectedPhase`] if the encounter is still running
    /// - [`BattleError::AlreadyConcluded`] on a second call
    pub fn conclude(&mut self, floor: u32) -> Result<Option<VictoryReport>, BattleError> {
        let Some(outcome) = self.outcome() else {
            return Err(BattleError::UnexpectedPhase {
                operation: "conclude",
                phase: self.state.phase,
            });
        };
        if self.concluded {
            return Err(BattleError::AlreadyConcluded);
        }
        self.concluded = true;

        let services = Arc::clone(&self.services);
        self.nonce += 1;
        let rng = self.rng;
        let mut rolls = RollStream::new(&rng, self.seed, self.nonce);
        passives::after_battle(&mut self.state, &services, &mut rolls);

        let report = if outcome == BattleOutcome::Win {
            Some(rewards::settle_victory(
                &mut self.state,
                &services.config()?.rewards,
                services.exp_table()?,
                floor,
            ))
        } else {
            None
        };

        for ally in &mut self.state.allies {
            ally.end_battle();
        }
        Ok(report)
    }

    /// Hands the party back after the encounter.
    pub fn into_allies(self) -> Vec<Actor> {
        self.state.allies
    }

    fn expect_turn_of(&self, actor: Uid, operation: &'static str) -> Result<(), BattleError> {
        if !self.state.phase.is_turn() {
            return Err(BattleError::UnexpectedPhase {
                operation,
                phase: self.state.phase,
            });
        }
        let current = self.current_actor();
        if current != Some(actor) {
            return Err(BattleError::NotActorsTurn { actor, current });
        }
        Ok(())
    }

    /// Filters tickets that need no work. `Ok(None)` means the ticket is live.
    fn screen(&self, ticket: Ticket) -> Result<Option<SyncStatus>, BattleError> {
        if ticket.generation > self.generation || ticket.serial > self.serial {
            return Err(BattleError::UnknownTicket(ticket));
        }
        if ticket.generation < self.generation {
            tracing::debug!(?ticket, "suppressed stale resolution signal");
            return Ok(Some(SyncStatus::Suppressed));
        }
        Ok(None)
    }

    fn default_targets(&mut self, actor: Uid, object: &ActionObject) -> Vec<Uid> {
        let Some((subject, side)) = self
            .state
            .actor(actor)
            .zip(self.state.side_of(actor))
        else {
            return Vec::new();
        };
        let row_size = self
            .services
            .config()
            .map(|config| config.battle.ally_first_row_size)
            .unwrap_or_default();
        let (friends, foes) = self.state.sides_for(side);

        self.nonce += 1;
        let rng = self.rng;
        let mut rolls = RollStream::new(&rng, self.seed, self.nonce);
        select_targets(object.target(), subject, friends, foes, row_size, &mut rolls)
    }

    fn resolve_turn(&mut self, action: Action) -> SelectOutcome {
        self.nonce += 1;
        let services = Arc::clone(&self.services);
        let rng = self.rng;
        let resolved = ActionResolver::new(&services, &rng, self.seed, self.nonce).and_then(
            |mut resolver| {
                let subject = self
                    .state
                    .actor(action.subject)
                    .ok_or(ActionError::SubjectNotFound(action.subject))?;
                let targets: Vec<&Actor> = action
                    .targets
                    .iter()
                    .filter_map(|uid| self.state.actor(*uid))
                    .collect();
                resolver.resolve(subject, &action.object, &targets)
            },
        );

        match resolved {
            Ok(effect) => {
                let line = format!(
                    "{} prepares {}",
                    self.state.name_of(action.subject),
                    effect.action_name
                );
                self.state.log.push(line);
                self.serial += 1;
                let ticket = Ticket {
                    generation: self.generation,
                    serial: self.serial,
                };
                self.pending = Some(Pending {
                    ticket,
                    result: effect.clone(),
                    applied: false,
                });
                self.state.phase = BattlePhase::Resolving;
                SelectOutcome::Resolving(Resolution { ticket, effect })
            }
            Err(err) => self.forfeit(action.subject, err),
        }
    }

    fn forfeit(&mut self, actor: Uid, err: ActionError) -> SelectOutcome {
        tracing::warn!(%actor, %err, "action forfeited");
        let line = format!("{} falters: {err}", self.state.name_of(actor));
        self.state.log.push(line);
        self.advance_turn();
        SelectOutcome::Forfeited(err)
    }

    /// Resolves and applies on-death casts of `defeated`, chaining into
    /// further casts up to [`MAX_TRIGGER_DEPTH`].
    fn trigger_death_casts(&mut self, defeated: Vec<Uid>, depth: u8) {
        if defeated.is_empty() {
            return;
        }
        if depth >= MAX_TRIGGER_DEPTH {
            tracing::warn!(depth, "on-death cast chain cut short");
            return;
        }
        let services = Arc::clone(&self.services);
        let row_size = services
            .config()
            .map(|config| config.battle.ally_first_row_size)
            .unwrap_or_default();

        for (caster, skill_id) in passives::death_casts(&self.state, &services, &defeated) {
            let object = match lookup_action(&services, &skill_id) {
                Ok(object) => object,
                Err(err) => {
                    tracing::warn!(%caster, skill = %skill_id, %err, "on-death cast skipped");
                    continue;
                }
            };
            let Some(side) = self.state.side_of(caster) else {
                continue;
            };

            self.nonce += 1;
            let rng = self.rng;
            let mut rolls = RollStream::new(&rng, self.seed, self.nonce);
            let resolved = self.state.actor(caster).map(|subject| {
                let (friends, foes) = self.state.sides_for(side);
                let targets =
                    select_targets(object.target(), subject, friends, foes, row_size, &mut rolls);
                let targets: Vec<&Actor> = targets
                    .iter()
                    .filter_map(|uid| self.state.actor(*uid))
                    .collect();
                ActionResolver::new(&services, &rng, self.seed, self.nonce)
                    .and_then(|mut resolver| resolver.resolve_triggered(subject, &object, &targets))
            });

            match resolved {
                Some(Ok(effect)) => {
                    let newly = apply::apply_result(&mut self.state, &services, &effect);
                    self.trigger_death_casts(newly, depth + 1);
                }
                Some(Err(err)) => {
                    tracing::warn!(%caster, skill = %skill_id, %err, "on-death cast fizzled");
                }
                None => {}
            }
        }
    }

    fn begin_round(&mut self) {
        if self.check_end() {
            return;
        }
        self.state.round += 1;
        let line = format!("Round {}", self.state.round);
        self.state.log.push(line);

        if let Ok(statuses) = self.services.statuses() {
            let expires_now = |id: &String| {
                statuses
                    .get(id)
                    .is_ok_and(|status| status.expires() == StatusExpiry::RoundStart)
            };
            for actor in self.state.allies.iter_mut().chain(self.state.enemies.iter_mut()) {
                actor.retain_statuses(|id| !expires_now(id));
            }
        }

        self.state.queue = turns::turn_order(self.state.combatants(), self.state.leader);
        self.state.turn_index = 0;
        self.open_turn();
    }

    /// Sets the phase for the creature at `turn_index`, skipping anyone who
    /// fell earlier in the round.
    fn open_turn(&mut self) {
        while let Some(uid) = self.state.queue.get(self.state.turn_index).copied() {
            let side = self
                .state
                .actor(uid)
                .filter(|actor| actor.is_alive())
                .and(self.state.side_of(uid));
            if let Some(side) = side {
                self.state.phase = side.turn_phase();
                let line = format!("{}'s turn", self.state.name_of(uid));
                self.state.log.push(line);
                tracing::debug!(actor = %uid, %side, round = self.state.round, "turn opened");
                return;
            }
            self.state.turn_index += 1;
        }
        self.begin_round();
    }

    fn advance_turn(&mut self) {
        if self.check_end() {
            return;
        }
        self.state.turn_index += 1;
        self.open_turn();
    }

    /// Ends the encounter if a side is down. Both sides down counts as a loss.
    fn check_end(&mut self) -> bool {
        if self.is_over() {
            return true;
        }
        if self.state.is_defeated(Side::Ally) {
            self.finish(BattleOutcome::Lose);
            true
        } else if self.state.is_defeated(Side::Enemy) {
            self.finish(BattleOutcome::Win);
            true
        } else {
            false
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        let line = match outcome {
            BattleOutcome::Win => "Victory!",
            BattleOutcome::Lose => "The party has fallen",
            BattleOutcome::Flee => "Got away safely",
        };
        self.state.log.push(line);
        self.state.phase = outcome.phase();
        tracing::info!(%outcome, round = self.state.round, "encounter ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::test_support::{actor, services, services_with};

    fn duel(services: &Arc<Services>, ally: &str, enemy: &str) -> BattleManager {
        BattleManager::start(
            Arc::clone(services),
            vec![actor(services, ally, 1, 1)],
            vec![actor(services, enemy, 2, 1)],
            7,
        )
        .unwrap()
    }

    #[test]
    fn one_on_one_runs_to_a_verdict() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "goblin");
        assert_eq!(battle.phase(), BattlePhase::AllyTurn);
        assert_eq!(battle.current_actor(), Some(Uid(1)));

        let outcome = battle.run_to_end().unwrap();
        assert_eq!(outcome, BattleOutcome::Win);
        assert_eq!(battle.phase(), BattlePhase::Win);
        // 12 damage per hit against 18 HP; the goblin answers once.
        assert_eq!(battle.round(), 2);
        assert_eq!(battle.allies()[0].hp(), 24);
        assert!(battle.log().contains("Hero hits Goblin for 12 damage"));
        assert!(battle.log().contains("Goblin is defeated"));
        assert_eq!(battle.log().last(), Some("Victory!"));
    }

    #[test]
    fn empty_side_is_rejected() {
        let services = Arc::new(services());
        let err = BattleManager::start(
            Arc::clone(&services),
            vec![actor(&services, "hero", 1, 1)],
            vec![],
            0,
        )
        .unwrap_err();
        assert!(matches!(err, BattleError::InvalidEncounter(_)));

        let err = BattleManager::start(
            Arc::clone(&services),
            vec![actor(&services, "hero", 1, 1)],
            vec![actor(&services, "goblin", 1, 1)],
            0,
        )
        .unwrap_err();
        assert!(matches!(err, BattleError::InvalidEncounter(_)));
    }

    #[test]
    fn signals_apply_once_then_complete() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "goblin");

        let SelectOutcome::Resolving(resolution) =
            battle.select_action(Uid(1), "attack", None).unwrap()
        else {
            panic!("attack should resolve");
        };
        assert_eq!(battle.phase(), BattlePhase::Resolving);
        assert_eq!(battle.enemies()[0].hp(), 18);

        let ticket = resolution.ticket;
        assert_eq!(battle.apply(ticket).unwrap(), SyncStatus::Applied);
        assert_eq!(battle.apply(ticket).unwrap(), SyncStatus::Duplicate);
        assert_eq!(battle.enemies()[0].hp(), 6);
        assert_eq!(battle.phase(), BattlePhase::CheckEnd);

        assert_eq!(battle.complete(ticket).unwrap(), SyncStatus::Completed);
        assert_eq!(battle.complete(ticket).unwrap(), SyncStatus::Duplicate);
        assert_eq!(battle.current_actor(), Some(Uid(2)));
        assert_eq!(battle.phase(), BattlePhase::EnemyTurn);
    }

    #[test]
    fn complete_without_apply_still_applies() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "goblin");
        let SelectOutcome::Resolving(resolution) =
            battle.select_action(Uid(1), "attack", None).unwrap()
        else {
            panic!("attack should resolve");
        };

        assert_eq!(
            battle.complete(resolution.ticket).unwrap(),
            SyncStatus::Completed
        );
        assert_eq!(battle.enemies()[0].hp(), 6);
    }

    #[test]
    fn force_end_suppresses_in_flight_resolution() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "goblin");
        let SelectOutcome::Resolving(resolution) =
            battle.select_action(Uid(1), "attack", None).unwrap()
        else {
            panic!("attack should resolve");
        };

        assert!(battle.end(BattleOutcome::Lose));
        assert!(!battle.end(BattleOutcome::Win));
        assert_eq!(battle.phase(), BattlePhase::Lose);

        assert_eq!(
            battle.apply(resolution.ticket).unwrap(),
            SyncStatus::Suppressed
        );
        assert_eq!(
            battle.complete(resolution.ticket).unwrap(),
            SyncStatus::Suppressed
        );
        assert_eq!(battle.enemies()[0].hp(), 18);
        assert!(battle.select_action(Uid(1), "attack", None).is_err());
    }

    #[test]
    fn wrong_actor_is_refused() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "goblin");
        assert_eq!(
            battle.select_action(Uid(2), "attack", None).unwrap_err(),
            BattleError::NotActorsTurn {
                actor: Uid(2),
                current: Some(Uid(1)),
            }
        );
    }

    #[test]
    fn unknown_action_forfeits_the_turn() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "goblin");

        let outcome = battle.select_action(Uid(1), "warp", None).unwrap();
        assert_eq!(
            outcome,
            SelectOutcome::Forfeited(ActionError::UnknownAction("warp".into()))
        );
        assert_eq!(battle.current_actor(), Some(Uid(2)));
        assert!(battle.log().contains("Hero falters"));

        let outcome = battle
            .select_action(Uid(2), "attack", Some(vec![Uid(9)]))
            .unwrap();
        assert_eq!(
            outcome,
            SelectOutcome::Forfeited(ActionError::TargetNotFound(Uid(9)))
        );
    }

    #[test]
    fn fleeing_ends_on_an_ally_turn() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "goblin");
        battle.flee(Uid(1)).unwrap();
        assert_eq!(battle.outcome(), Some(BattleOutcome::Flee));
        assert!(battle.log().contains("Hero flees the battle"));
        assert_eq!(battle.conclude(1).unwrap(), None);
        assert_eq!(battle.conclude(1).unwrap_err(), BattleError::AlreadyConcluded);
    }

    #[test]
    fn falling_bomb_explodes() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "bomb");

        assert_eq!(battle.run_to_end().unwrap(), BattleOutcome::Win);
        assert_eq!(battle.allies()[0].hp(), 25);
        assert!(battle.log().contains("Bomb uses blast"));
    }

    #[test]
    fn stalled_encounter_stops_at_the_round_cap_without_fleeing() {
        let mut config = GameConfig::default();
        config.battle.max_rounds = 3;
        let services = Arc::new(services_with(config));
        let mut battle = duel(&services, "blind_slime", "blind_slime");

        assert_eq!(
            battle.run_to_end().unwrap_err(),
            BattleError::RoundLimit { max_rounds: 3 }
        );
        assert_eq!(battle.outcome(), None);
        assert!(battle.phase().is_turn());
        assert!(!battle.log().contains("Got away safely"));
        assert!(battle.step().is_err());

        // Only an explicit flee reaches FLEE.
        let actor = battle.current_actor().unwrap();
        battle.flee(actor).unwrap();
        assert_eq!(battle.outcome(), Some(BattleOutcome::Flee));
        assert_eq!(battle.check_round_limit(), Ok(()));
    }

    #[test]
    fn every_transition_is_logged() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "goblin");
        assert_eq!(battle.log().last(), Some("Hero's turn"));

        let before = battle.log().len();
        let SelectOutcome::Resolving(resolution) =
            battle.select_action(Uid(1), "attack", None).unwrap()
        else {
            panic!("attack should resolve");
        };
        assert_eq!(battle.phase(), BattlePhase::Resolving);
        assert_eq!(battle.log().len(), before + 1);
        assert_eq!(battle.log().last(), Some("Hero prepares attack"));

        let before = battle.log().len();
        battle.apply(resolution.ticket).unwrap();
        assert_eq!(battle.phase(), BattlePhase::CheckEnd);
        assert!(battle.log().len() > before);

        let before = battle.log().len();
        battle.complete(resolution.ticket).unwrap();
        assert_eq!(battle.phase(), BattlePhase::EnemyTurn);
        assert_eq!(battle.log().len(), before + 1);
        assert_eq!(battle.log().last(), Some("Goblin's turn"));
    }

    #[test]
    fn leader_acts_first_despite_speed() {
        let services = Arc::new(services());
        let battle = BattleManager::start_with_leader(
            Arc::clone(&services),
            vec![
                actor(&services, "hero", 1, 1),
                actor(&services, "goblin", 2, 1),
            ],
            vec![actor(&services, "pixie", 3, 1)],
            7,
            Some(Uid(2)),
        )
        .unwrap();
        assert_eq!(battle.current_actor(), Some(Uid(2)));
        assert_eq!(battle.state().queue(), &[Uid(2), Uid(1), Uid(3)]);

        let err = BattleManager::start_with_leader(
            Arc::clone(&services),
            vec![actor(&services, "hero", 1, 1)],
            vec![actor(&services, "goblin", 2, 1)],
            7,
            Some(Uid(2)),
        )
        .unwrap_err();
        assert!(matches!(err, BattleError::InvalidEncounter(_)));
    }

    #[test]
    fn victory_pays_out() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "goblin");
        battle.run_to_end().unwrap();

        let report = battle.conclude(2).unwrap().unwrap();
        assert_eq!(report.gold, 40);
        assert_eq!(report.exp_for(Uid(1)), Some(10));
        let hero = &battle.into_allies()[0];
        assert_eq!(hero.exp(), 10);
        assert!(hero.statuses().is_empty());
    }

    #[test]
    fn stale_ticket_from_the_future_is_unknown() {
        let services = Arc::new(services());
        let mut battle = duel(&services, "hero", "goblin");
        let bogus = Ticket {
            generation: 0,
            serial: 5,
        };
        assert_eq!(
            battle.apply(bogus).unwrap_err(),
            BattleError::UnknownTicket(bogus)
        );
    }
}
