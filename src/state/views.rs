//! Per-entry transient UI state.

use std::collections::HashMap;

/// Scroll offsets of one expanded entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryViewState {
    /// First pretty-printed line shown.
    pub vertical_scroll: usize,
    /// Columns hidden on the left.
    pub horizontal_scroll: usize,
}

/// Expanded entries and their scroll state, keyed by entry index.
///
/// Only expanded entries have a record: collapsing removes it, so memory stays
/// bounded by what the user has actually opened.
#[derive(Debug, Clone, Default)]
pub struct EntryViews {
    expanded: HashMap<usize, EntryViewState>,
}

impl EntryViews {
    /// True if the entry at `index` is expanded.
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains_key(&index)
    }

    /// View state of `index`; collapsed entries report the default.
    pub fn get(&self, index: usize) -> EntryViewState {
        self.expanded.get(&index).copied().unwrap_or_default()
    }

    /// Mutable view state of an expanded entry.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut EntryViewState> {
        self.expanded.get_mut(&index)
    }

    /// Flip `index` between expanded and collapsed. Returns the new expanded flag.
    ///
    /// Expanding starts at scroll 0; collapsing discards the scroll record.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.expanded.remove(&index).is_some() {
            false
        } else {
            self.expanded.insert(index, EntryViewState::default());
            true
        }
    }

    /// Number of expanded entries.
    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    /// Collapse everything.
    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}
