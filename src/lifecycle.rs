//! Page lifecycle: leaving a page.
//!
//! A route can register an unload callback through
//! [`PageOptions::on_unload`](crate::PageOptions::on_unload). Once that route's
//! page has been dispatched, the router asks the callback before it leaves the
//! page:
//!
//! 1. on the next dispatch cycle ([`UnloadReason::Navigation`]), and
//! 2. when the host is about to discard the page itself
//!    ([`UnloadReason::PageExit`]), via
//!    [`Router::confirm_exit`](crate::Router::confirm_exit).
//!
//! The callback answers with an [`UnloadDecision`]. A [`Deferred`] answer lets
//! the page ask the user asynchronously (a confirmation dialog); the router
//! suspends until the future resolves. A page exit cannot wait, so a deferred
//! answer counts as leaving there.
//!
//! [`Deferred`]: UnloadDecision::Deferred
//!
//! # Example
//!
//! ```
//! use spa_navigator::{UnloadDecision, UnloadReason};
//!
//! let has_unsaved_changes = true;
//! let on_unload = move |reason: UnloadReason| {
//!     if has_unsaved_changes && reason == UnloadReason::Navigation {
//!         UnloadDecision::deferred(async { false })
//!     } else {
//!         UnloadDecision::Leave
//!     }
//! };
//!
//! assert!(on_unload(UnloadReason::PageExit).allows_leaving());
//! assert!(on_unload(UnloadReason::Navigation).is_deferred());
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Future resolving to `true` when the page may be left.
pub type UnloadFuture = Pin<Box<dyn Future<Output = bool>>>;

/// Why the router is asking the current page to unload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadReason {
    /// The router is about to dispatch another fragment.
    Navigation,
    /// The host is about to discard the page (tab close, external link).
    PageExit,
}

/// Answer of an unload callback.
pub enum UnloadDecision {
    /// Allow leaving the page.
    Leave,
    /// Keep the page; the router puts the address back.
    Stay,
    /// Decide later.
    Deferred(UnloadFuture),
}

impl UnloadDecision {
    /// Wrap a future as a deferred decision.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = bool> + 'static,
    {
        Self::Deferred(Box::pin(future))
    }

    /// `true` only for an immediate [`Leave`](Self::Leave).
    pub fn allows_leaving(&self) -> bool {
        matches!(self, Self::Leave)
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl From<bool> for UnloadDecision {
    fn from(leave: bool) -> Self {
        if leave {
            Self::Leave
        } else {
            Self::Stay
        }
    }
}

impl fmt::Debug for UnloadDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leave => f.write_str("Leave"),
            Self::Stay => f.write_str("Stay"),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_from_bool() {
        assert!(UnloadDecision::from(true).allows_leaving());
        assert!(matches!(UnloadDecision::from(false), UnloadDecision::Stay));
    }

    #[test]
    fn test_deferred_decision_resolves() {
        let decision = UnloadDecision::deferred(async { true });
        assert!(decision.is_deferred());
        assert!(!decision.allows_leaving());
        match decision {
            UnloadDecision::Deferred(future) => assert!(pollster::block_on(future)),
            other => panic!("Expected Deferred, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_hides_future() {
        let decision = UnloadDecision::deferred(async { false });
        assert_eq!(format!("{:?}", decision), "Deferred(..)");
    }
}
