//! Session history
//!
//! The window's joint session history: pushState, replaceState and
//! traversal by delta.

use serde::{Deserialize, Serialize};
use url::Url;

/// State object stored with entries this engine creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryState {
    /// Entry was written by the navigation engine
    pub spa: bool,
}

impl HistoryState {
    /// State of an engine-owned entry
    pub const ENGINE: HistoryState = HistoryState { spa: true };
}

/// History entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: Url,
    pub title: String,
    /// JSON-serialized state
    pub state: Option<String>,
}

impl HistoryEntry {
    /// Whether the entry carries the engine's marker state
    pub fn is_engine_owned(&self) -> bool {
        self.state
            .as_deref()
            .and_then(|s| serde_json::from_str::<HistoryState>(s).ok())
            .is_some_and(|state| state.spa)
    }
}

/// History manager
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    current: usize,
}

impl SessionHistory {
    /// History holding only the entry of the initial full load
    pub fn new(url: Url, title: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url,
                title: title.to_string(),
                state: None,
            }],
            current: 0,
        }
    }

    /// Push a new entry, dropping any forward entries
    pub fn push_state(&mut self, state: Option<String>, title: String, url: Url) {
        self.entries.truncate(self.current + 1);
        self.entries.push(HistoryEntry { url, title, state });
        self.current = self.entries.len() - 1;
    }

    /// Replace the current entry
    pub fn replace_state(&mut self, state: Option<String>, title: String, url: Url) {
        if let Some(entry) = self.entries.get_mut(self.current) {
            *entry = HistoryEntry { url, title, state };
        }
    }

    /// Go back one entry
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        self.go(-1)
    }

    /// Go forward one entry
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        self.go(1)
    }

    /// Move by `delta` entries; out-of-range and zero deltas do nothing
    pub fn go(&mut self, delta: isize) -> Option<&HistoryEntry> {
        if delta == 0 {
            return None;
        }
        let target = self.current.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.current = target;
        self.entries.get(target)
    }

    /// Get current entry
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.current]
    }

    /// Index of the current entry
    pub fn index(&self) -> usize {
        self.current
    }

    /// Get history length
    pub fn length(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
