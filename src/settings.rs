//! Router configuration.
//!
//! [`RouterSettings`] is a builder collecting everything a
//! [`Router`](crate::Router) is constructed with: initial routes, mode, root,
//! hooks, the not-found handler and the hash history bound.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{Mode, Route, RouterSettings};
//!
//! let settings = RouterSettings::new()
//!     .mode("hash".parse::<Mode>().unwrap())
//!     .root("/app")
//!     .route(Route::new("about", |_page| Ok(())))
//!     .before(|page| println!("entering {}", page.uri))
//!     .page404(|uri| eprintln!("no route for {}", uri));
//!
//! assert_eq!(settings.mode, Mode::Hash);
//! assert_eq!(settings.routes.len(), 1);
//! ```

use crate::error::ParseModeError;
use crate::page::Page;
use crate::route::Route;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Hook run with every page before its handler.
pub type BeforeHook = Rc<dyn Fn(&Page)>;

/// Hook deciding whether a matched page may be shown.
pub type SecureHook = Rc<dyn Fn(&Page) -> bool>;

/// Handler receiving fragments no route matched.
pub type NotFoundHandler = Rc<dyn Fn(&str)>;

/// Default capacity of the hash-mode history stack.
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// How the router addresses pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Path-based addresses through `history.pushState`.
    #[default]
    History,
    /// Addresses in the URL hash.
    Hash,
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "history" => Ok(Mode::History),
            "hash" => Ok(Mode::Hash),
            _ => Err(ParseModeError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::History => f.write_str("history"),
            Mode::Hash => f.write_str("hash"),
        }
    }
}

/// Optional hooks around dispatch.
#[derive(Clone, Default)]
pub struct Hooks {
    pub before: Option<BeforeHook>,
    pub secure: Option<SecureHook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.is_some())
            .field("secure", &self.secure.is_some())
            .finish()
    }
}

/// Construction settings for a [`Router`](crate::Router).
#[derive(Clone)]
pub struct RouterSettings {
    pub routes: Vec<Route>,
    pub mode: Mode,
    pub root: String,
    pub hooks: Hooks,
    pub page404: NotFoundHandler,
    pub history_capacity: usize,
}

impl RouterSettings {
    /// Defaults: no routes, history mode, root `/`, no hooks, logging 404.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            mode: Mode::History,
            root: "/".to_string(),
            hooks: Hooks::default(),
            page404: default_page404(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Root prefix, history mode only. Empty means `/`.
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Page) + 'static,
    {
        self.hooks.before = Some(Rc::new(hook));
        self
    }

    pub fn secure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Page) -> bool + 'static,
    {
        self.hooks.secure = Some(Rc::new(hook));
        self
    }

    pub fn page404<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        self.page404 = Rc::new(handler);
        self
    }

    /// Maximum number of hash-mode history entries kept. Zero is treated as one.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterSettings")
            .field("routes", &self.routes.len())
            .field("mode", &self.mode)
            .field("root", &self.root)
            .field("hooks", &self.hooks)
            .field("history_capacity", &self.history_capacity)
            .finish_non_exhaustive()
    }
}

/// Not-found handler used when none is configured.
pub fn default_page404() -> NotFoundHandler {
    Rc::new(|uri: &str| {
        warn_log!("404. Page not found: '{}'", uri);
    })
}

/// Normalise a root prefix to `/` or `/segment/.../`.
pub(crate) fn normalize_root(root: &str) -> String {
    let trimmed = crate::fragment::trim_slashes(root);
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
