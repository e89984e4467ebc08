//! Registry lookup and resolution errors.

use crate::error::{ErrorSeverity, GameError};

use super::DefinitionKind;

/// Errors raised while looking up or resolving a definition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The requested id is not registered.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: DefinitionKind, id: String },

    /// Walking the `inherits` chain revisited an id.
    #[error("{kind} inheritance cycle: {}", .chain.join(" -> "))]
    Cycle {
        kind: DefinitionKind,
        chain: Vec<String>,
    },

    /// A definition names a parent that is not registered.
    #[error("{kind} '{id}' inherits from unknown '{parent}'")]
    MissingParent {
        kind: DefinitionKind,
        id: String,
        parent: String,
    },
}

impl RegistryError {
    /// Content kind the failing lookup targeted.
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::NotFound { kind, .. }
            | Self::Cycle { kind, .. }
            | Self::MissingParent { kind, .. } => *kind,
        }
    }
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Validation,
            Self::Cycle { .. } | Self::MissingParent { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "REGISTRY_NOT_FOUND",
            Self::Cycle { .. } => "REGISTRY_CYCLE",
            Self::MissingParent { .. } => "REGISTRY_MISSING_PARENT",
        }
    }
}
