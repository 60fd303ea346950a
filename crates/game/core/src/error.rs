//! Common error infrastructure for puzzle-core.
//!
//! Domain-specific errors (`GridError`, `MoveError`, `SessionError`,
//! `CheatRejection`) live next to the operations they guard. This module holds
//! the classification shared by all of them so callers can pick a recovery
//! strategy without matching on every variant.
//!
//! Nothing inside the state machine is fatal: invariants are kept by
//! construction, so every error here leaves the game in its prior state.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: expected transiently (e.g. an illegal drop during a drag)
/// - **Validation**: invalid input that should not be retried unchanged
/// - **Internal**: unexpected state inconsistency that indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - try another action.
    ///
    /// Examples: target not legal for this token, level already complete
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown token, malformed cheat code, ragged level table
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: containment desync between a token and its cell
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all puzzle-core errors.
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
    /// Used as the reason code reported to presentation layers.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
