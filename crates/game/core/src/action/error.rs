//! Action validation and resolution errors.

use crate::env::ServiceError;
use crate::error::{ErrorSeverity, GameError};
use crate::registry::RegistryError;
use crate::stats::Uid;

/// Errors that forfeit a single action.
///
/// None of these end the encounter; the battle manager logs them and moves
/// on to the next turn.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The id is present in neither the skill nor the item registry.
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("acting creature {0} is not in the encounter")]
    SubjectNotFound(Uid),

    #[error("acting creature {0} is down")]
    SubjectDown(Uid),

    #[error("'{0}' has no valid targets")]
    NoTargets(String),

    #[error("not enough MP: need {needed}, have {available}")]
    InsufficientMp { needed: u32, available: u32 },

    #[error("target {0} is not in the encounter")]
    TargetNotFound(Uid),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Service(err) => err.severity(),
            Self::Registry(err) => err.severity(),
            Self::SubjectNotFound(_) => ErrorSeverity::Internal,
            Self::SubjectDown(_) | Self::TargetNotFound(_) => ErrorSeverity::Validation,
            Self::UnknownAction(_)
            | Self::NoTargets(_)
            | Self::InsufficientMp { .. }
            | Self::UnknownStatus(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAction(_) => "ACTION_UNKNOWN",
            Self::Service(err) => err.error_code(),
            Self::Registry(err) => err.error_code(),
            Self::SubjectNotFound(_) => "ACTION_SUBJECT_NOT_FOUND",
            Self::SubjectDown(_) => "ACTION_SUBJECT_DOWN",
            Self::NoTargets(_) => "ACTION_NO_TARGETS",
            Self::InsufficientMp { .. } => "ACTION_INSUFFICIENT_MP",
            Self::TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            Self::UnknownStatus(_) => "ACTION_UNKNOWN_STATUS",
        }
    }
}
