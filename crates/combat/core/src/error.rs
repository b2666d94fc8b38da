//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`DiceError`, `SessionError`, `ResolveError`) live
//! next to the code that produces them. This module holds the shared
//! classification used by every one of them so callers can decide whether to
//! surface, retry, or abort.
//!
//! Invalid transitions are not errors at all: submitting input in the wrong
//! phase is reported as [`crate::engine::Transition::Ignored`].

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with the same or an alternative input.
    ///
    /// Examples: ability id not offered for this encounter
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: malformed dice notation in a content file
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the session cannot be created or cannot continue.
    ///
    /// Examples: unknown boss id, boss without abilities, malformed dice
    /// reached during resolution
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
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics, structured logs, and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
