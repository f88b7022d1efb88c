//! Per-dispatch page context.

use crate::lifecycle::{UnloadDecision, UnloadReason};
use crate::params::{QueryParams, RouteParams};
use crate::NavState;
use std::fmt;
use std::rc::Rc;

/// Unload callback registered through [`PageOptions::on_unload`].
pub type UnloadCallback = Rc<dyn Fn(UnloadReason) -> UnloadDecision>;

/// Per-route options, handed to the page when the route matches.
#[derive(Clone, Default)]
pub struct PageOptions {
    pub(crate) unload: Option<UnloadCallback>,
}

impl PageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask `callback` before leaving this route's page.
    pub fn on_unload<F>(mut self, callback: F) -> Self
    where
        F: Fn(UnloadReason) -> UnloadDecision + 'static,
    {
        self.unload = Some(Rc::new(callback));
        self
    }

    pub fn has_unload(&self) -> bool {
        self.unload.is_some()
    }

    pub(crate) fn unload_callback(&self) -> Option<&UnloadCallback> {
        self.unload.as_ref()
    }
}

impl fmt::Debug for PageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageOptions")
            .field("has_unload", &self.unload.is_some())
            .finish()
    }
}

/// Snapshot handed to a route handler, the before hook and the secure hook.
///
/// Built fresh for every successful match.
#[derive(Debug, Clone)]
pub struct Page {
    /// The matched fragment.
    pub uri: String,
    /// Query parameters of the address.
    pub query: QueryParams,
    /// Positional captures, in placeholder order.
    pub params: Vec<String>,
    /// Captures of `{name}` placeholders.
    pub named: RouteParams,
    /// State passed to the navigation that led here, if any.
    pub state: Option<NavState>,
    /// Options of the matched route.
    pub options: PageOptions,
}

impl Page {
    /// Positional capture `index`.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}
