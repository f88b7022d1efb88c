//! Hash-mode history emulation.
//!
//! Hash navigation has no positional history the router can inspect, so in
//! hash mode the router keeps its own stack of visited fragments and the state
//! they were visited with. [`HistoryStack`] is that stack: a bounded list of
//! [`HistoryEntry`] values with a cursor.
//!
//! Every dispatch cycle records the resolved fragment according to the stack's
//! [`HistoryMode`]:
//!
//! | Mode        | Effect                                                   |
//! |-------------|----------------------------------------------------------|
//! | `Add`       | drop entries after the cursor, append, cursor to the tip |
//! | `Hold(i)`   | nothing appended, cursor moves to `i` (set by `go`)      |
//! | `Replace`   | overwrite the entry at the cursor (set by `redirect_to`) |
//!
//! The mode falls back to `Add` after each record.
//!
//! # Example
//!
//! ```
//! use spa_navigator::history::{HistoryMode, HistoryStack};
//!
//! let mut stack = HistoryStack::new(16);
//! stack.record("a", None);
//! stack.record("b", None);
//! stack.record("c", None);
//!
//! // back to "b", then somewhere new: "c" is gone
//! stack.set_mode(HistoryMode::Hold(1));
//! stack.record("b", None);
//! stack.record("d", None);
//!
//! let paths: Vec<_> = stack.iter().map(|e| e.path.as_str()).collect();
//! assert_eq!(paths, ["a", "b", "d"]);
//! assert_eq!(stack.cursor(), Some(2));
//! ```

use crate::NavState;
use std::collections::VecDeque;

/// A visited fragment and the state it was visited with.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub path: String,
    pub state: Option<NavState>,
}

/// How the next [`HistoryStack::record`] treats the stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryMode {
    #[default]
    Add,
    /// Traversal to an existing entry; nothing is appended.
    Hold(usize),
    /// Overwrite the current entry.
    Replace,
}

/// Bounded stack of visited entries with a cursor.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    capacity: usize,
    mode: HistoryMode,
}

impl HistoryStack {
    /// Create an empty stack keeping at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
            mode: HistoryMode::Add,
        }
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: HistoryMode) {
        self.mode = mode;
    }

    /// Record a dispatched fragment according to the current mode, then reset
    /// the mode to [`HistoryMode::Add`].
    pub fn record(&mut self, path: &str, state: Option<NavState>) {
        let entry = HistoryEntry {
            path: path.to_string(),
            state,
        };
        match std::mem::take(&mut self.mode) {
            HistoryMode::Add => self.push(entry),
            HistoryMode::Hold(index) if index < self.entries.len() => {
                trace_log!("Holding history at {} for '{}'", index, path);
                self.cursor = index;
            }
            HistoryMode::Hold(_) => self.push(entry),
            HistoryMode::Replace => self.replace(entry),
        }
    }

    /// Drop the future branch, append `entry` and move the cursor to it.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.truncate_after_cursor();
        trace_log!("Pushing '{}' onto hash history", entry.path);
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Overwrite the entry at the cursor, or push into an empty stack.
    pub fn replace(&mut self, entry: HistoryEntry) {
        match self.entries.get_mut(self.cursor) {
            Some(slot) => *slot = entry,
            None => self.push(entry),
        }
    }

    /// Remove every entry after the cursor.
    pub fn truncate_after_cursor(&mut self) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Cursor position, `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.cursor)
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor().and_then(|index| self.entries.get(index))
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor().is_some_and(|cursor| cursor > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor()
            .is_some_and(|cursor| cursor + 1 < self.entries.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget every entry and reset the mode.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.mode = HistoryMode::Add;
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(crate::settings::DEFAULT_HISTORY_CAPACITY)
    }
}
