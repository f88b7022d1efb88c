//! Error and outcome types for the dispatcher.
//!
//! - [`CheckOutcome`]: what a single dispatch cycle did (`Dispatched`,
//!   `NotFound`, `Reverted`, ...). None of these are failures: a missing route is
//!   handed to the not-found handler and a vetoed navigation is simply undone.
//! - [`NavigationError`]: the failures that do reach the caller: a route
//!   handler returning `Err`, or the platform refusing an address write.
//! - [`ParseModeError`]: returned when parsing a [`Mode`](crate::Mode) from text.
//!
//! # Examples
//!
//! ```
//! use spa_navigator::CheckOutcome;
//!
//! let outcome = CheckOutcome::Dispatched { uri: "user/42".into() };
//! assert!(outcome.is_dispatched());
//! assert_eq!(outcome.uri(), Some("user/42"));
//!
//! assert!(CheckOutcome::Reverted.uri().is_none());
//! ```

use std::fmt;

/// Error returned by a route handler.
pub type HandlerError = Box<dyn std::error::Error + 'static>;

/// Result type every route handler returns.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Check outcome
// ============================================================================

/// Outcome of one dispatch cycle started by [`Router::check`](crate::Router::check).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// A route matched and its handler ran.
    Dispatched { uri: String },
    /// No route matched; the not-found handler ran.
    NotFound { uri: String },
    /// A route matched but the secure hook refused the page.
    Denied { uri: String },
    /// The previous page's unload callback vetoed the navigation and the
    /// address was put back.
    Reverted,
    /// The unload callback answered asynchronously; the router waits for
    /// [`Router::settle`](crate::Router::settle) or
    /// [`Router::resume`](crate::Router::resume).
    Suspended,
    /// A transition is already suspended; this cycle did nothing.
    Busy,
    /// A listener event was ignored (no listener, echo, or skip flag).
    Skipped,
}

impl CheckOutcome {
    /// Check if a handler ran
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched { .. })
    }

    /// Check if the not-found handler ran
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the secure hook denied the page
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }

    /// Check if the navigation was undone
    pub fn is_reverted(&self) -> bool {
        matches!(self, Self::Reverted)
    }

    /// Check if the router is waiting on an unload decision
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended)
    }

    /// The fragment this cycle committed, if it committed one.
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Dispatched { uri } | Self::NotFound { uri } | Self::Denied { uri } => Some(uri),
            _ => None,
        }
    }
}

// ============================================================================
// Navigation error
// ============================================================================

/// Failures surfaced to the caller of a navigation operation.
#[derive(Debug)]
pub enum NavigationError {
    /// A route handler returned an error. The router does not catch it.
    Handler { uri: String, source: HandlerError },

    /// The platform could not update the address or the history.
    Platform { message: String },
}

impl NavigationError {
    /// Build a platform error from any displayable message.
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::Handler { uri, source } => {
                write!(f, "Handler for '{}' failed: {}", uri, source)
            }
            NavigationError::Platform { message } => {
                write!(f, "Platform navigation failed: {}", message)
            }
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigationError::Handler { source, .. } => Some(source.as_ref()),
            NavigationError::Platform { .. } => None,
        }
    }
}

/// A routing mode name that is neither `history` nor `hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    pub input: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown routing mode '{}' (expected 'history' or 'hash')",
            self.input
        )
    }
}

impl std::error::Error for ParseModeError {}

// ============================================================================
// Tests
// ============================================================================
