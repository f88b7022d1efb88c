//! The router: route table, dispatcher, listener and navigation.
//!
//! # Dispatch cycle
//!
//! Every [`Router::check`] call runs one cycle:
//!
//! 1. **Unload guard**: the last dispatched page's unload callback is asked
//!    whether it may be left. `Stay` puts the address back and ends the cycle
//!    with [`CheckOutcome::Reverted`]; `Deferred` suspends the router until
//!    [`Router::settle`] (or [`Router::resume`]) delivers the answer.
//! 2. **Resolve** the fragment from the platform address.
//! 3. **Record** it in the hash history (hash mode only).
//! 4. **Match** routes in insertion order. The first match builds a [`Page`],
//!    runs the before hook, the secure hook, then the handler.
//! 5. **Not found**: no route matched; the not-found handler gets the
//!    fragment.
//!
//! While a transition is suspended every further cycle returns
//! [`CheckOutcome::Busy`] without touching anything.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{MemoryPlatform, Mode, Router, RouterSettings};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = seen.clone();
//!
//! let mut router = Router::new(
//!     MemoryPlatform::new("/app/"),
//!     RouterSettings::new().mode(Mode::History).root("/app"),
//! );
//! router.add("user/{id}", move |page| {
//!     log.borrow_mut().push(page.params.clone());
//!     Ok(())
//! });
//!
//! router.navigate_to("user/42?tab=info", None, false).unwrap();
//! assert_eq!(*seen.borrow(), vec![vec!["42".to_string()]]);
//! assert_eq!(router.current(), Some("user/42"));
//! ```

use crate::error::{CheckOutcome, NavigationError};
use crate::fragment::{self, trim_slashes};
use crate::history::{HistoryMode, HistoryStack};
use crate::lifecycle::{UnloadDecision, UnloadFuture, UnloadReason};
use crate::page::{Page, PageOptions};
use crate::params::QueryParams;
use crate::platform::{ListenerKind, Location, NavigationEvent, Platform};
use crate::route::{Route, RouteKey, RouteTable};
use crate::rule::Rule;
use crate::settings::{normalize_root, Hooks, Mode, NotFoundHandler, RouterSettings};
use crate::{HandlerResult, NavState};
use std::fmt;

/// How the router last wrote the address, used to undo it on a veto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressWrite {
    /// Nothing written since the last cycle; the change came from outside.
    External,
    Push,
    Replace,
}

/// A cycle waiting on an asynchronous unload decision.
struct PendingTransition {
    decision: Option<UnloadFuture>,
}

/// Client-side router over a [`Platform`].
pub struct Router<P: Platform> {
    platform: P,
    routes: RouteTable,
    mode: Mode,
    root: String,
    hooks: Hooks,
    page404: NotFoundHandler,
    history: HistoryStack,
    /// Fragment of the last completed cycle.
    current: Option<String>,
    /// Address of the last completed cycle.
    committed: Option<Location>,
    /// Navigation state the committed address was entered with.
    committed_state: Option<NavState>,
    /// Options of the last dispatched page.
    page_options: Option<PageOptions>,
    pending_state: Option<NavState>,
    pending: Option<PendingTransition>,
    last_write: AddressWrite,
    skip_next_event: bool,
    listening: bool,
}

impl<P: Platform> Router<P> {
    /// Build a router over `platform`.
    ///
    /// The mode falls back to [`Mode::Hash`] when the platform has no
    /// push-state support.
    pub fn new(platform: P, settings: RouterSettings) -> Self {
        let mode = effective_mode(settings.mode, &platform);
        let root = normalize_root(&settings.root);
        info_log!("Router created in {} mode with root '{}'", mode, root);

        let mut router = Self {
            platform,
            routes: RouteTable::new(),
            mode,
            root,
            hooks: settings.hooks,
            page404: settings.page404,
            history: HistoryStack::new(settings.history_capacity),
            current: None,
            committed: None,
            committed_state: None,
            page_options: None,
            pending_state: None,
            pending: None,
            last_write: AddressWrite::External,
            skip_next_event: false,
            listening: false,
        };
        for route in settings.routes {
            router.add_route(route);
        }
        router
    }

    // ========================================================================
    // Route table
    // ========================================================================

    /// Register `f` for `rule`.
    pub fn add<F>(&mut self, rule: impl Into<Rule>, f: F) -> &mut Self
    where
        F: Fn(&Page) -> HandlerResult + 'static,
    {
        self.add_route(Route::new(rule, f))
    }

    /// Register `f` for `rule` with page options.
    pub fn add_with_options<F>(
        &mut self,
        rule: impl Into<Rule>,
        f: F,
        options: PageOptions,
    ) -> &mut Self
    where
        F: Fn(&Page) -> HandlerResult + 'static,
    {
        self.add_route(Route::new(rule, f).options(options))
    }

    /// Register a prepared route.
    pub fn add_route(&mut self, route: Route) -> &mut Self {
        info_log!("Registered route '{}'", route.rule());
        self.routes.push(route);
        self
    }

    /// Remove the first route matching `key` (a handler or a rule).
    pub fn remove(&mut self, key: impl Into<RouteKey>) -> &mut Self {
        if let Some(_entry) = self.routes.remove(&key.into()) {
            info_log!("Removed route '{}'", _entry.pattern.as_str());
        } else {
            debug_log!("No route to remove");
        }
        self
    }

    /// Clear routes, mode, root and hash history, and detach the listener.
    pub fn reset(&mut self) -> &mut Self {
        info_log!("Resetting router");
        self.routes.clear();
        self.mode = effective_mode(Mode::default(), &self.platform);
        self.root = "/".to_string();
        self.history.clear();
        self.page_options = None;
        self.pending_state = None;
        self.pending = None;
        self.last_write = AddressWrite::External;
        self.skip_next_event = false;
        self.platform.set_exit_guard(false);
        self.remove_uri_listener()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Run one dispatch cycle against the current address.
    ///
    /// Handler errors are returned as [`NavigationError::Handler`].
    pub fn check(&mut self) -> Result<CheckOutcome, NavigationError> {
        if self.pending.is_some() {
            debug_log!("Transition suspended, ignoring check");
            return Ok(CheckOutcome::Busy);
        }

        if let Some(callback) = self
            .page_options
            .as_ref()
            .and_then(PageOptions::unload_callback)
            .cloned()
        {
            match callback(UnloadReason::Navigation) {
                UnloadDecision::Leave => {}
                UnloadDecision::Stay => return self.revert(),
                UnloadDecision::Deferred(future) => {
                    debug_log!("Unload decision deferred, suspending");
                    self.pending = Some(PendingTransition {
                        decision: Some(future),
                    });
                    return Ok(CheckOutcome::Suspended);
                }
            }
        }

        self.dispatch()
    }

    /// Wait for the suspended unload decision and finish the cycle.
    ///
    /// Returns [`CheckOutcome::Skipped`] when nothing is suspended, and
    /// [`CheckOutcome::Busy`] when the decision was already taken with
    /// [`take_unload_decision`](Self::take_unload_decision).
    #[allow(clippy::future_not_send)]
    pub async fn settle(&mut self) -> Result<CheckOutcome, NavigationError> {
        if self.pending.is_none() {
            return Ok(CheckOutcome::Skipped);
        }
        let Some(decision) = self.take_unload_decision() else {
            return Ok(CheckOutcome::Busy);
        };
        let leave = decision.await;
        self.resume(leave)
    }

    /// Take the suspended decision to drive it elsewhere; report the answer
    /// with [`resume`](Self::resume).
    pub fn take_unload_decision(&mut self) -> Option<UnloadFuture> {
        self.pending.as_mut()?.decision.take()
    }

    /// Finish a suspended cycle: `true` dispatches the current address,
    /// `false` reverts it.
    pub fn resume(&mut self, leave: bool) -> Result<CheckOutcome, NavigationError> {
        if self.pending.take().is_none() {
            return Ok(CheckOutcome::Skipped);
        }
        debug_log!("Resuming suspended transition (leave: {})", leave);
        if leave {
            self.dispatch()
        } else {
            self.revert()
        }
    }

    /// Ask the current page whether the host may discard it.
    ///
    /// A deferred answer cannot be awaited here and counts as leaving.
    pub fn confirm_exit(&self) -> bool {
        let Some(callback) = self
            .page_options
            .as_ref()
            .and_then(PageOptions::unload_callback)
        else {
            return true;
        };
        !matches!(callback(UnloadReason::PageExit), UnloadDecision::Stay)
    }

    fn dispatch(&mut self) -> Result<CheckOutcome, NavigationError> {
        let location = self.platform.location();
        let uri = fragment::resolve(&location, self.mode, &self.root);
        let state = match self.pending_state.take() {
            Some(state) => Some(state),
            None if self.mode == Mode::History => self.platform.history_state(),
            None => None,
        };
        self.last_write = AddressWrite::External;

        if self.mode == Mode::Hash {
            self.history.record(&uri, state.clone());
        }
        self.current = Some(uri.clone());
        self.committed = Some(location.clone());
        self.committed_state.clone_from(&state);
        self.page_options = None;

        let Some((params, named, options, handler)) = self.routes.find(&uri).map(|found| {
            (
                found.params,
                found.entry.pattern.named(&uri).unwrap_or_default(),
                found.entry.options.clone(),
                found.entry.handler.clone(),
            )
        }) else {
            debug_log!("No route for '{}'", uri);
            self.platform.set_exit_guard(false);
            (self.page404)(&uri);
            return Ok(CheckOutcome::NotFound { uri });
        };

        let page = Page {
            uri: uri.clone(),
            query: fragment::resolve_query(&location, self.mode),
            params,
            named,
            state,
            options,
        };
        debug_log!("Dispatching '{}' with params {:?}", uri, page.params);

        if let Some(before) = &self.hooks.before {
            before(&page);
        }
        if let Some(secure) = &self.hooks.secure {
            if !secure(&page) {
                warn_log!("Secure hook denied '{}'", uri);
                self.platform.set_exit_guard(false);
                return Ok(CheckOutcome::Denied { uri });
            }
        }

        handler(&page).map_err(|source| {
            error_log!("Handler for '{}' failed: {}", uri, source);
            NavigationError::Handler {
                uri: uri.clone(),
                source,
            }
        })?;

        self.platform.set_exit_guard(page.options.has_unload());
        self.page_options = Some(page.options);
        Ok(CheckOutcome::Dispatched { uri })
    }

    /// Undo the address change that started a vetoed cycle.
    fn revert(&mut self) -> Result<CheckOutcome, NavigationError> {
        self.pending_state = None;
        self.history.set_mode(HistoryMode::Add);
        let write = std::mem::replace(&mut self.last_write, AddressWrite::External);

        let Some(committed) = self.committed.clone() else {
            return Ok(CheckOutcome::Reverted);
        };
        if self.same_address(&committed, &self.platform.location()) {
            return Ok(CheckOutcome::Reverted);
        }

        warn_log!(
            "Navigation vetoed by unload callback, restoring '{}'",
            committed.href()
        );
        let fires_event = match (self.mode, write) {
            (Mode::History, AddressWrite::Push) => {
                self.platform.go(-1)?;
                true
            }
            (Mode::History, AddressWrite::Replace) => {
                let state = self.committed_state.clone();
                self.platform.replace_state(state.as_ref(), &committed.href())?;
                false
            }
            (Mode::History, AddressWrite::External) => {
                // The traversal direction is unknown. Re-enter the committed
                // address as a new entry; the one moved to stays untouched.
                let state = self.committed_state.clone();
                self.platform.push_state(state.as_ref(), &committed.href())?;
                false
            }
            (Mode::Hash, _) => {
                self.platform.replace_hash(&committed.hash)?;
                true
            }
        };
        // The correction itself fires an event; don't dispatch it.
        self.skip_next_event = fires_event && self.listening;
        Ok(CheckOutcome::Reverted)
    }

    // ========================================================================
    // Listener
    // ========================================================================

    /// Subscribe to the platform event matching the mode.
    pub fn add_uri_listener(&mut self) -> &mut Self {
        let kind = self.listener_kind();
        info_log!("Listening for {:?}", kind);
        self.platform.listen(kind);
        self.listening = true;
        self.current = Some(self.fragment());
        self.committed = Some(self.platform.location());
        self
    }

    /// Detach the listener. Idempotent.
    pub fn remove_uri_listener(&mut self) -> &mut Self {
        if self.listening {
            info_log!("Listener removed");
        }
        self.platform.unlisten();
        self.listening = false;
        self
    }

    /// Feed one platform event to the router.
    ///
    /// Ignored without a listener, for the wrong event kind, when the skip
    /// flag is armed, or when the address still equals the committed one
    /// (the router's own writes echo back as events). A change of query
    /// alone is a new address.
    pub fn handle_event(&mut self, event: NavigationEvent) -> Result<CheckOutcome, NavigationError> {
        if !self.listening || event.kind() != self.listener_kind() {
            trace_log!("Ignoring {:?}: no matching listener", event);
            return Ok(CheckOutcome::Skipped);
        }
        if std::mem::take(&mut self.skip_next_event) {
            trace_log!("Skipping {:?} caused by an address correction", event);
            return Ok(CheckOutcome::Skipped);
        }
        let location = self.platform.location();
        if self
            .committed
            .as_ref()
            .is_some_and(|committed| self.same_address(committed, &location))
        {
            trace_log!("Ignoring {:?}: address unchanged", event);
            return Ok(CheckOutcome::Skipped);
        }
        self.check()
    }

    /// Drain [`Platform::poll_event`] through [`handle_event`](Self::handle_event).
    pub fn process_events(&mut self) -> Result<Vec<CheckOutcome>, NavigationError> {
        let mut outcomes = Vec::new();
        while let Some(event) = self.platform.poll_event() {
            outcomes.push(self.handle_event(event)?);
        }
        Ok(outcomes)
    }

    /// Compare the parts of two addresses the mode routes on: path and
    /// query in history mode, the hash in hash mode.
    fn same_address(&self, a: &Location, b: &Location) -> bool {
        match self.mode {
            Mode::History => a.pathname == b.pathname && a.search == b.search,
            Mode::Hash => a.hash == b.hash,
        }
    }

    fn listener_kind(&self) -> ListenerKind {
        match self.mode {
            Mode::History => ListenerKind::PopState,
            Mode::Hash => ListenerKind::HashChange,
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Go to `path`, adding a history entry.
    ///
    /// `silent` updates the address without dispatching.
    pub fn navigate_to(
        &mut self,
        path: &str,
        state: Option<NavState>,
        silent: bool,
    ) -> Result<&mut Self, NavigationError> {
        self.write_address(path, state, silent, AddressWrite::Push)
    }

    /// Go to `path`, replacing the current history entry.
    pub fn redirect_to(
        &mut self,
        path: &str,
        state: Option<NavState>,
        silent: bool,
    ) -> Result<&mut Self, NavigationError> {
        self.write_address(path, state, silent, AddressWrite::Replace)
    }

    fn write_address(
        &mut self,
        path: &str,
        state: Option<NavState>,
        silent: bool,
        write: AddressWrite,
    ) -> Result<&mut Self, NavigationError> {
        if self.pending.is_some() {
            debug_log!("Transition suspended, ignoring navigation to '{}'", path);
            return Ok(self);
        }
        let path = trim_slashes(path);
        debug_log!("{:?} '{}' (silent: {})", write, path, silent);

        match (self.mode, write) {
            (Mode::History, AddressWrite::Replace) => {
                let url = format!("{}{}", self.root, path);
                self.platform.replace_state(state.as_ref(), &url)?;
            }
            (Mode::History, _) => {
                let url = format!("{}{}", self.root, path);
                self.platform.push_state(state.as_ref(), &url)?;
            }
            (Mode::Hash, AddressWrite::Replace) => {
                if !silent {
                    self.history.set_mode(HistoryMode::Replace);
                }
                self.platform.replace_hash(path)?;
            }
            (Mode::Hash, _) => self.platform.set_hash(path)?,
        }

        if silent {
            self.history.set_mode(HistoryMode::Add);
            self.current = Some(self.fragment());
            self.committed = Some(self.platform.location());
            self.committed_state = state;
            return Ok(self);
        }

        self.pending_state = state;
        self.last_write = write;
        self.check()?;
        Ok(self)
    }

    /// Dispatch the current address again, without asking the unload
    /// callback. In hash mode the current history entry is reused, state
    /// included, as long as the address still shows it.
    pub fn refresh(&mut self) -> Result<&mut Self, NavigationError> {
        if self.pending.is_some() {
            return Ok(self);
        }
        if self.mode == Mode::Hash {
            let fragment = self.fragment();
            // Hold the cursor entry only while the address still shows it;
            // after a silent navigation the fragment is recorded as new.
            if let (Some(cursor), Some(entry)) = (self.history.cursor(), self.history.current()) {
                if entry.path == fragment {
                    self.pending_state = entry.state.clone();
                    self.history.set_mode(HistoryMode::Hold(cursor));
                }
            }
        }
        self.dispatch()?;
        Ok(self)
    }

    /// History mode: native `history.go(n)`, relative.
    /// Hash mode: jump to entry `n` of the hash history, absolute.
    pub fn go(&mut self, n: i32) -> Result<&mut Self, NavigationError> {
        match self.mode {
            Mode::History => {
                self.platform.go(n)?;
                Ok(self)
            }
            Mode::Hash => match usize::try_from(n) {
                Ok(index) => self.go_to_entry(index),
                Err(_) => Ok(self),
            },
        }
    }

    /// One step back.
    pub fn back(&mut self) -> Result<&mut Self, NavigationError> {
        match self.mode {
            Mode::History => self.go(-1),
            Mode::Hash => match self.history.cursor().and_then(|c| c.checked_sub(1)) {
                Some(index) => self.go_to_entry(index),
                None => Ok(self),
            },
        }
    }

    /// One step forward.
    pub fn forward(&mut self) -> Result<&mut Self, NavigationError> {
        match self.mode {
            Mode::History => self.go(1),
            Mode::Hash => match self.history.cursor() {
                Some(cursor) => self.go_to_entry(cursor + 1),
                None => Ok(self),
            },
        }
    }

    fn go_to_entry(&mut self, index: usize) -> Result<&mut Self, NavigationError> {
        let Some(entry) = self.history.get(index).cloned() else {
            trace_log!("No hash history entry at {}", index);
            return Ok(self);
        };
        if self.pending.is_some() {
            return Ok(self);
        }
        self.history.set_mode(HistoryMode::Hold(index));
        self.navigate_to(&entry.path, entry.state, false)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Normalised root prefix (`/` or `/segment/`).
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Fragment of the last completed cycle.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Fragment of the platform address right now.
    pub fn fragment(&self) -> String {
        fragment::resolve(&self.platform.location(), self.mode, &self.root)
    }

    /// Query parameters of the platform address right now.
    pub fn query(&self) -> QueryParams {
        fragment::resolve_query(&self.platform.location(), self.mode)
    }

    /// Hash-mode history.
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_suspended(&self) -> bool {
        self.pending.is_some()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<P: Platform + fmt::Debug> fmt::Debug for Router<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("platform", &self.platform)
            .field("routes", &self.routes.len())
            .field("mode", &self.mode)
            .field("root", &self.root)
            .field("current", &self.current)
            .field("history", &self.history.len())
            .field("listening", &self.listening)
            .field("suspended", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

fn effective_mode<P: Platform>(requested: Mode, platform: &P) -> Mode {
    if requested == Mode::History && !platform.supports_push_state() {
        info_log!("pushState unavailable, falling back to hash mode");
        Mode::Hash
    } else {
        requested
    }
}
