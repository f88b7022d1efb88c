//! The browser surface the router drives.
//!
//! The router reads the address, writes it, walks the session history and
//! listens for navigation events. All of that goes through [`Platform`], which
//! the router owns. Two implementations ship with the crate:
//!
//! - [`MemoryPlatform`](crate::MemoryPlatform): an in-memory browser, used by
//!   tests and by hosts that are not a browser.
//! - `WebPlatform` (feature `web`, `wasm32` only): `window.location` and
//!   `window.history`.
//!
//! # Listener slot
//!
//! A platform has a single listener slot. [`Platform::listen`] replaces
//! whatever was attached before and [`Platform::unlisten`] empties it. Events
//! are delivered to the router by the host, either one at a time through
//! [`Router::handle_event`](crate::Router::handle_event) or by draining
//! [`Platform::poll_event`] with
//! [`Router::process_events`](crate::Router::process_events).

use crate::error::NavigationError;
use crate::NavState;
use std::fmt;
use std::rc::Rc;

/// The parts of the address the router cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Path, always starting with `/`.
    pub pathname: String,
    /// Query including the leading `?`, or empty.
    pub search: String,
    /// Hash including the leading `#`, or empty.
    pub hash: String,
}

impl Location {
    /// Split a URL path such as `/app/user?tab=1#top` into its parts.
    ///
    /// ```
    /// use spa_navigator::Location;
    ///
    /// let location = Location::parse("/app/user?tab=1#top");
    /// assert_eq!(location.pathname, "/app/user");
    /// assert_eq!(location.search, "?tab=1");
    /// assert_eq!(location.hash, "#top");
    /// ```
    pub fn parse(url: &str) -> Self {
        let (before_hash, hash) = match url.find('#') {
            Some(pos) => (&url[..pos], &url[pos..]),
            None => (url, ""),
        };
        let (pathname, search) = match before_hash.find('?') {
            Some(pos) => (&before_hash[..pos], &before_hash[pos..]),
            None => (before_hash, ""),
        };
        let pathname = if pathname.starts_with('/') {
            pathname.to_string()
        } else {
            format!("/{}", pathname)
        };
        Self {
            pathname,
            search: if search == "?" { String::new() } else { search.to_string() },
            hash: if hash == "#" { String::new() } else { hash.to_string() },
        }
    }

    /// Reassemble the address as `pathname + search + hash`.
    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Which platform event the listener slot subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// `popstate`, used in history mode.
    PopState,
    /// `hashchange`, used in hash mode.
    HashChange,
}

/// A navigation event reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    PopState,
    HashChange,
}

impl NavigationEvent {
    /// The listener kind that receives this event.
    pub fn kind(self) -> ListenerKind {
        match self {
            NavigationEvent::PopState => ListenerKind::PopState,
            NavigationEvent::HashChange => ListenerKind::HashChange,
        }
    }
}

/// Host predicate consulted when the page itself is about to be discarded.
///
/// `true` lets the page go without a confirmation prompt. Hosts usually wire
/// it to [`Router::confirm_exit`](crate::Router::confirm_exit).
#[derive(Clone)]
pub struct ExitCheck(Rc<dyn Fn() -> bool>);

impl ExitCheck {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Self(Rc::new(f))
    }

    /// Ask the predicate.
    pub fn allows_exit(&self) -> bool {
        (self.0)()
    }
}

impl fmt::Debug for ExitCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExitCheck")
    }
}

/// Whether an armed exit guard should prompt. Without a predicate the guard
/// always prompts.
pub fn exit_prompt_due(check: Option<&ExitCheck>) -> bool {
    !check.is_some_and(ExitCheck::allows_exit)
}

/// Address, history and event primitives of a browser-like host.
///
/// Writes return `Result` so bindings that can fail (the DOM throws on
/// cross-origin URLs, for instance) report it; the in-memory platform never
/// fails.
pub trait Platform {
    /// `false` when the host has no `history.pushState`; the router then
    /// falls back to hash mode.
    fn supports_push_state(&self) -> bool;

    /// Current address.
    fn location(&self) -> Location;

    /// State attached to the current session history entry.
    fn history_state(&self) -> Option<NavState>;

    /// `history.pushState(state, "", url)`. Fires no event.
    fn push_state(&mut self, state: Option<&NavState>, url: &str) -> Result<(), NavigationError>;

    /// `history.replaceState(state, "", url)`. Fires no event.
    fn replace_state(&mut self, state: Option<&NavState>, url: &str)
        -> Result<(), NavigationError>;

    /// `location.hash = hash`. Adds a history entry and fires `hashchange`
    /// when the hash actually changes.
    fn set_hash(&mut self, hash: &str) -> Result<(), NavigationError>;

    /// Replace the current entry with the same address and a new hash.
    /// Fires `hashchange` when the hash actually changes.
    fn replace_hash(&mut self, hash: &str) -> Result<(), NavigationError>;

    /// `history.go(delta)`. Fires `popstate` (and `hashchange` when the hash
    /// differs) when the traversal lands somewhere.
    fn go(&mut self, delta: i32) -> Result<(), NavigationError>;

    /// Attach the single listener slot, replacing any previous subscription.
    fn listen(&mut self, kind: ListenerKind);

    /// Empty the listener slot. Idempotent.
    fn unlisten(&mut self);

    /// Ask the host to consult the router before the page itself is
    /// discarded (tab close, external navigation).
    fn set_exit_guard(&mut self, armed: bool);

    /// Next queued event for the attached listener, if the platform queues
    /// events.
    fn poll_event(&mut self) -> Option<NavigationEvent> {
        None
    }
}
