use crate::stats::{Actor, Uid};

use super::{BattleLog, BattlePhase, Side};

/// Authoritative state of one encounter.
///
/// Owned exclusively by its [`BattleManager`](super::BattleManager) and
/// discarded when the encounter ends.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub(crate) allies: Vec<Actor>,
    pub(crate) enemies: Vec<Actor>,
    pub(crate) phase: BattlePhase,
    pub(crate) round: u32,
    /// Acting order of the current round.
    pub(crate) queue: Vec<Uid>,
    /// Index into `queue` of the creature whose turn it is.
    pub(crate) turn_index: usize,
    /// Ally who opens every round while standing.
    pub(crate) leader: Option<Uid>,
    pub(crate) log: BattleLog,
}

impl BattleState {
    pub(crate) fn new(allies: Vec<Actor>, enemies: Vec<Actor>) -> Self {
        Self {
            allies,
            enemies,
            phase: BattlePhase::Init,
            round: 0,
            queue: Vec::new(),
            turn_index: 0,
            leader: None,
            log: BattleLog::new(),
        }
    }

    pub fn allies(&self) -> &[Actor] {
        &self.allies
    }

    pub fn enemies(&self) -> &[Actor] {
        &self.enemies
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn leader(&self) -> Option<Uid> {
        self.leader
    }

    pub fn queue(&self) -> &[Uid] {
        &self.queue
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    /// Creature whose turn it is, if a turn is open.
    pub fn current_actor(&self) -> Option<Uid> {
        if self.phase.is_turn() {
            self.queue.get(self.turn_index).copied()
        } else {
            None
        }
    }

    pub fn side(&self, side: Side) -> &[Actor] {
        match side {
            Side::Ally => &self.allies,
            Side::Enemy => &self.enemies,
        }
    }

    pub fn side_of(&self, uid: Uid) -> Option<Side> {
        if self.allies.iter().any(|a| a.uid() == uid) {
            Some(Side::Ally)
        } else if self.enemies.iter().any(|a| a.uid() == uid) {
            Some(Side::Enemy)
        } else {
            None
        }
    }

    pub fn actor(&self, uid: Uid) -> Option<&Actor> {
        self.combatants().find(|a| a.uid() == uid)
    }

    pub(crate) fn actor_mut(&mut self, uid: Uid) -> Option<&mut Actor> {
        self.allies
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|a| a.uid() == uid)
    }

    /// `(friends, foes)` from the point of view of `side`.
    pub fn sides_for(&self, side: Side) -> (&[Actor], &[Actor]) {
        (self.side(side), self.side(side.opposite()))
    }

    pub fn combatants(&self) -> impl Iterator<Item = &Actor> {
        self.allies.iter().chain(self.enemies.iter())
    }

    pub fn is_defeated(&self, side: Side) -> bool {
        self.side(side).iter().all(|a| !a.is_alive())
    }

    /// Display name of `uid`, or its uid when unknown.
    pub fn name_of(&self, uid: Uid) -> String {
        self.actor(uid)
            .map(|a| a.name().to_owned())
            .unwrap_or_else(|| uid.to_string())
    }
}
