//! Encounter-level errors.

use crate::action::ActionError;
use crate::env::ServiceError;
use crate::error::{ErrorSeverity, GameError};
use crate::registry::RegistryError;
use crate::stats::Uid;

use super::{BattlePhase, Ticket};

/// Errors returned by the battle manager's public surface.
///
/// Per-action failures are not errors here: they forfeit the turn and are
/// reported through [`SelectOutcome::Forfeited`](super::SelectOutcome::Forfeited).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    /// The encounter cannot start.
    #[error("invalid encounter: {0}")]
    InvalidEncounter(String),

    /// An action was selected for someone other than the acting creature.
    #[error("not {actor}'s turn")]
    NotActorsTurn { actor: Uid, current: Option<Uid> },

    /// The call does not fit the current phase.
    #[error("cannot {operation} during {phase}")]
    UnexpectedPhase {
        operation: &'static str,
        phase: BattlePhase,
    },

    /// The ticket never belonged to this encounter.
    #[error("unknown resolution ticket {0:?}")]
    UnknownTicket(Ticket),

    /// No encounter pool covers the requested floor.
    #[error("dungeon '{dungeon}' has no encounter pool for floor {floor}")]
    NoEncounterPool { dungeon: String, floor: u32 },

    /// The encounter ran past the configured round cap without a verdict.
    #[error("encounter exceeded {max_rounds} rounds")]
    RoundLimit { max_rounds: u32 },

    /// The encounter was already concluded.
    #[error("encounter already concluded")]
    AlreadyConcluded,

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidEncounter(_)
            | Self::NotActorsTurn { .. }
            | Self::UnexpectedPhase { .. }
            | Self::UnknownTicket(_)
            | Self::NoEncounterPool { .. }
            | Self::AlreadyConcluded => ErrorSeverity::Validation,
            Self::RoundLimit { .. } => ErrorSeverity::Recoverable,
            Self::Service(err) => err.severity(),
            Self::Registry(err) => err.severity(),
            Self::Action(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEncounter(_) => "BATTLE_INVALID_ENCOUNTER",
            Self::NotActorsTurn { .. } => "BATTLE_NOT_ACTORS_TURN",
            Self::UnexpectedPhase { .. } => "BATTLE_UNEXPECTED_PHASE",
            Self::UnknownTicket(_) => "BATTLE_UNKNOWN_TICKET",
            Self::NoEncounterPool { .. } => "BATTLE_NO_ENCOUNTER_POOL",
            Self::RoundLimit { .. } => "BATTLE_ROUND_LIMIT",
            Self::AlreadyConcluded => "BATTLE_ALREADY_CONCLUDED",
            Self::Service(err) => err.error_code(),
            Self::Registry(err) => err.error_code(),
            Self::Action(err) => err.error_code(),
        }
    }
}
