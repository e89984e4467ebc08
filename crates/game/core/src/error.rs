//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (`RegistryError`, `ActionError`, `BattleError`, ...)
//! live next to the code that raises them. This module provides the shared
//! classification used by callers to decide whether a failure aborts startup,
//! forfeits a single action, or is simply rejected.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each subsystem has its own error enum with specific variants
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Stable Codes**: Every variant exposes a static code for logs and tests

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: The offending action is forfeited, the encounter continues
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Malformed content or startup ordering bugs; startup must halt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - isolated to the current turn.
    ///
    /// Examples: action id missing at battle time, not enough MP
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: encounter without enemies, acting out of turn
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: acting actor missing from the roster
    Internal,

    /// Fatal error - content tables or service wiring are broken.
    ///
    /// Examples: inheritance cycle, unregistered service
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or broken content.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
