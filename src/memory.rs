//! In-memory browser.
//!
//! [`MemoryPlatform`] keeps a session history of addresses and states, a
//! single listener slot, and a queue of navigation events, with the same
//! firing rules as a browser:
//!
//! - `pushState` / `replaceState` never fire events.
//! - Setting the hash to a different value adds an entry and fires
//!   `hashchange`; setting it to the current value does nothing.
//! - `go(delta)` fires `popstate`, plus `hashchange` when the hash differs.
//!
//! Events are only queued for the kind of listener attached at the time, and
//! detaching the listener drops the queue.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{ListenerKind, MemoryPlatform, NavigationEvent, Platform};
//!
//! let mut platform = MemoryPlatform::new("/index.html");
//! platform.listen(ListenerKind::HashChange);
//! platform.set_hash("about").unwrap();
//!
//! assert_eq!(platform.location().hash, "#about");
//! assert_eq!(platform.poll_event(), Some(NavigationEvent::HashChange));
//! assert_eq!(platform.poll_event(), None);
//! ```

use crate::error::NavigationError;
use crate::platform::{exit_prompt_due, ExitCheck, ListenerKind, Location, NavigationEvent, Platform};
use crate::NavState;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct Entry {
    location: Location,
    state: Option<NavState>,
}

/// Browser emulation backed by plain collections.
#[derive(Debug, Clone)]
pub struct MemoryPlatform {
    entries: Vec<Entry>,
    index: usize,
    push_state: bool,
    listener: Option<ListenerKind>,
    events: VecDeque<NavigationEvent>,
    exit_guard: bool,
    exit_check: Option<ExitCheck>,
}

impl MemoryPlatform {
    /// Start at `url` with push-state support.
    pub fn new(url: &str) -> Self {
        Self {
            entries: vec![Entry {
                location: Location::parse(url),
                state: None,
            }],
            index: 0,
            push_state: true,
            listener: None,
            events: VecDeque::new(),
            exit_guard: false,
            exit_check: None,
        }
    }

    /// Emulate a host without `history.pushState`.
    pub fn without_push_state(mut self) -> Self {
        self.push_state = false;
        self
    }

    /// Predicate asked before the page is discarded while the exit guard is
    /// armed.
    pub fn on_exit_check<F>(mut self, check: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.exit_check = Some(ExitCheck::new(check));
        self
    }

    /// Number of session history entries.
    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    /// Addresses of all session history entries, oldest first.
    pub fn history_urls(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.location.href()).collect()
    }

    /// Position of the current entry.
    pub fn history_index(&self) -> usize {
        self.index
    }

    /// Currently attached listener.
    pub fn listener(&self) -> Option<ListenerKind> {
        self.listener
    }

    /// Events waiting to be delivered.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Whether the router asked to be consulted before the page is discarded.
    pub fn exit_guard_armed(&self) -> bool {
        self.exit_guard
    }

    /// Whether discarding the page now would show a confirmation prompt.
    pub fn exit_prompted(&self) -> bool {
        self.exit_guard && exit_prompt_due(self.exit_check.as_ref())
    }

    fn current(&self) -> &Entry {
        &self.entries[self.index]
    }

    fn push_entry(&mut self, entry: Entry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
    }

    fn fire(&mut self, event: NavigationEvent) {
        if self.listener == Some(event.kind()) {
            trace_log!("Queueing {:?}", event);
            self.events.push_back(event);
        }
    }

    fn with_hash(&self, hash: &str) -> Location {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        Location {
            hash: if hash.is_empty() {
                String::new()
            } else {
                format!("#{}", hash)
            },
            ..self.current().location.clone()
        }
    }
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Platform for MemoryPlatform {
    fn supports_push_state(&self) -> bool {
        self.push_state
    }

    fn location(&self) -> Location {
        self.current().location.clone()
    }

    fn history_state(&self) -> Option<NavState> {
        self.current().state.clone()
    }

    fn push_state(&mut self, state: Option<&NavState>, url: &str) -> Result<(), NavigationError> {
        if !self.push_state {
            return Err(NavigationError::platform("pushState is not supported"));
        }
        self.push_entry(Entry {
            location: Location::parse(url),
            state: state.cloned(),
        });
        Ok(())
    }

    fn replace_state(
        &mut self,
        state: Option<&NavState>,
        url: &str,
    ) -> Result<(), NavigationError> {
        if !self.push_state {
            return Err(NavigationError::platform("replaceState is not supported"));
        }
        let index = self.index;
        self.entries[index] = Entry {
            location: Location::parse(url),
            state: state.cloned(),
        };
        Ok(())
    }

    fn set_hash(&mut self, hash: &str) -> Result<(), NavigationError> {
        let location = self.with_hash(hash);
        if location == self.current().location {
            return Ok(());
        }
        self.push_entry(Entry {
            location,
            state: None,
        });
        self.fire(NavigationEvent::HashChange);
        Ok(())
    }

    fn replace_hash(&mut self, hash: &str) -> Result<(), NavigationError> {
        let location = self.with_hash(hash);
        if location == self.current().location {
            return Ok(());
        }
        let index = self.index;
        self.entries[index] = Entry {
            location,
            state: None,
        };
        self.fire(NavigationEvent::HashChange);
        Ok(())
    }

    fn go(&mut self, delta: i32) -> Result<(), NavigationError> {
        let target = i64::try_from(self.index).unwrap_or(i64::MAX) + i64::from(delta);
        let Ok(target) = usize::try_from(target) else {
            return Ok(());
        };
        if delta == 0 || target >= self.entries.len() {
            return Ok(());
        }
        let previous_hash = self.current().location.hash.clone();
        self.index = target;
        self.fire(NavigationEvent::PopState);
        if self.current().location.hash != previous_hash {
            self.fire(NavigationEvent::HashChange);
        }
        Ok(())
    }

    fn listen(&mut self, kind: ListenerKind) {
        if self.listener != Some(kind) {
            self.events.clear();
        }
        self.listener = Some(kind);
    }

    fn unlisten(&mut self) {
        self.listener = None;
        self.events.clear();
    }

    fn set_exit_guard(&mut self, armed: bool) {
        self.exit_guard = armed;
    }

    fn poll_event(&mut self) -> Option<NavigationEvent> {
        self.events.pop_front()
    }
}
