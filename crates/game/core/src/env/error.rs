//! Service container errors.

use crate::error::{ErrorSeverity, GameError};

use super::ServiceName;

/// Errors raised while wiring or querying the [`Services`](super::Services) container.
///
/// All of them indicate a startup-ordering bug, never a content problem, so
/// they are fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service was never registered.
    #[error("service '{0}' not registered")]
    NotRegistered(ServiceName),

    /// A service was registered before the services it depends on.
    #[error("service '{service}' registered before its dependency '{missing}'")]
    OutOfOrder {
        service: ServiceName,
        missing: ServiceName,
    },

    /// A service was registered twice.
    #[error("service '{0}' already registered")]
    AlreadyRegistered(ServiceName),

    /// The named service is not a definition registry.
    #[error("service '{0}' is not a registry")]
    NotARegistry(ServiceName),

    /// No service carries this name.
    #[error("unknown service name '{0}'")]
    UnknownName(String),
}

impl GameError for ServiceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotRegistered(_) => "SERVICE_NOT_REGISTERED",
            Self::OutOfOrder { .. } => "SERVICE_OUT_OF_ORDER",
            Self::AlreadyRegistered(_) => "SERVICE_ALREADY_REGISTERED",
            Self::NotARegistry(_) => "SERVICE_NOT_A_REGISTRY",
            Self::UnknownName(_) => "SERVICE_UNKNOWN_NAME",
        }
    }
}
