//! Session state: everything the viewer knows, owned by the event loop.

use std::time::Duration;

use tracing::debug;

use crate::model::{Cursor, EntryDocument, Page, SearchQuery};
use crate::state::fetch::{Command, FetchKind, FetchOutcome, Stream, StreamTracker};
use crate::state::{
    date_filter, pagination, search, EntryViews, Prompt, StatusId, StatusKind, StatusLine,
};

/// Prefetch is triggered once the selection is this close to the loaded end.
pub const PREFETCH_WINDOW: usize = 5;

/// How long short confirmations stay on the status row.
pub const SHORT_STATUS: Duration = Duration::from_secs(2);

/// How long results and errors stay on the status row.
pub const LONG_STATUS: Duration = Duration::from_secs(3);

// ===== EntrySequence =====

/// Ordered entries loaded so far. Grows only by appending, except on reload.
#[derive(Debug, Clone, Default)]
pub struct EntrySequence {
    entries: Vec<EntryDocument>,
}

impl EntrySequence {
    /// Sequence holding `entries` in order.
    pub fn new(entries: Vec<EntryDocument>) -> Self {
        Self { entries }
    }

    /// Number of loaded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&EntryDocument> {
        self.entries.get(index)
    }

    /// All entries in order.
    pub fn as_slice(&self) -> &[EntryDocument] {
        &self.entries
    }

    /// Append a page's entries after the existing ones.
    pub fn append(&mut self, entries: Vec<EntryDocument>) {
        self.entries.extend(entries);
    }
}

// ===== PaginationState =====

/// Where the next page comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Continuation token from the last page.
    pub cursor: Option<Cursor>,
    /// Server reported more pages.
    pub has_more: bool,
    /// Server-reported total, when known.
    pub total: Option<u64>,
}

impl PaginationState {
    /// Pagination as described by `page`.
    pub fn from_page(page: &Page) -> Self {
        Self {
            cursor: page.next_cursor.clone(),
            has_more: page.has_more,
            total: page.total,
        }
    }

    /// Overwrite with the values of a newer page.
    pub fn absorb(&mut self, page: &Page) {
        *self = Self::from_page(page);
    }

    /// A continuation fetch is possible.
    pub fn can_fetch(&self) -> bool {
        self.has_more && self.cursor.is_some()
    }
}

// ===== SearchState =====

/// Lifecycle of a server-side search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// No search.
    Idle,
    /// First page requested.
    Pending,
    /// At least one result loaded.
    Results,
    /// The search finished with nothing found.
    NoMatches,
}

/// Active search and its result sequence.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub(crate) phase: SearchPhase,
    pub(crate) query: Option<SearchQuery>,
    pub(crate) results: EntrySequence,
    pub(crate) pagination: PaginationState,
    pub(crate) matches: Vec<usize>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::idle()
    }
}

impl SearchState {
    /// No active search.
    pub fn idle() -> Self {
        Self {
            phase: SearchPhase::Idle,
            query: None,
            results: EntrySequence::default(),
            pagination: PaginationState::default(),
            matches: Vec::new(),
        }
    }

    pub(crate) fn pending(query: SearchQuery) -> Self {
        Self {
            phase: SearchPhase::Pending,
            query: Some(query),
            ..Self::idle()
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// True unless idle.
    pub fn is_active(&self) -> bool {
        self.phase != SearchPhase::Idle
    }

    /// The submitted query.
    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    /// Results loaded so far.
    pub fn results(&self) -> &EntrySequence {
        &self.results
    }

    /// Pagination of the result sequence.
    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    /// Indices into the results that matched. Every server result is a match.
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }
}

// ===== DateFilterState =====

/// Date range as the user typed it. Empty strings are unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFilterState {
    /// Start spec.
    pub start: String,
    /// End spec.
    pub end: String,
}

impl DateFilterState {
    /// Filter from typed specs; surrounding whitespace is dropped.
    pub fn from_specs(start: &str, end: &str) -> Self {
        Self {
            start: start.trim().to_string(),
            end: end.trim().to_string(),
        }
    }

    /// Either bound is set.
    pub fn is_active(&self) -> bool {
        !self.start.is_empty() || !self.end.is_empty()
    }

    /// Header label such as `[-1h to now]`, `[from -1h]` or `[until now]`.
    pub fn label(&self) -> Option<String> {
        match (self.start.is_empty(), self.end.is_empty()) {
            (false, false) => Some(format!("[{} to {}]", self.start, self.end)),
            (false, true) => Some(format!("[from {}]", self.start)),
            (true, false) => Some(format!("[until {}]", self.end)),
            (true, true) => None,
        }
    }
}

// ===== SessionMode =====

/// Which sequence is on screen and how the header reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Plain browse sequence.
    Browsing,
    /// Search results.
    Searching,
    /// Browse sequence restricted to a date range.
    DateFiltering,
}

// ===== SessionState =====

/// Complete viewer state. Mutated only on the event loop thread.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) browse: EntrySequence,
    pub(crate) pagination: PaginationState,
    pub(crate) search: SearchState,
    pub(crate) date_filter: DateFilterState,
    pub(crate) mode: SessionMode,
    pub(crate) selected: usize,
    pub(crate) browse_selection: usize,
    pub(crate) row_hscroll: usize,
    pub(crate) views: EntryViews,
    pub(crate) status: StatusLine,
    pub(crate) prompt: Option<Prompt>,
    pub(crate) browse_stream: StreamTracker,
    pub(crate) search_stream: StreamTracker,
    pub(crate) reload_stream: StreamTracker,
    commands: Vec<Command>,
}

impl SessionState {
    /// Session showing the first page of the browse sequence.
    pub fn new(first_page: Page) -> Self {
        let pagination = PaginationState::from_page(&first_page);
        Self {
            browse: EntrySequence::new(first_page.entries),
            pagination,
            search: SearchState::idle(),
            date_filter: DateFilterState::default(),
            mode: SessionMode::Browsing,
            selected: 0,
            browse_selection: 0,
            row_hscroll: 0,
            views: EntryViews::default(),
            status: StatusLine::default(),
            prompt: None,
            browse_stream: StreamTracker::default(),
            search_stream: StreamTracker::default(),
            reload_stream: StreamTracker::default(),
            commands: Vec::new(),
        }
    }

    /// Record the date range the first page was fetched with.
    pub fn with_date_filter(mut self, filter: DateFilterState) -> Self {
        self.date_filter = filter;
        self.mode = self.resting_mode();
        self
    }

    // ===== Accessors =====

    /// Current mode.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Sequence on screen: search results while searching, else browse entries.
    pub fn entries(&self) -> &EntrySequence {
        match self.mode {
            SessionMode::Searching => &self.search.results,
            SessionMode::Browsing | SessionMode::DateFiltering => &self.browse,
        }
    }

    /// Browse entries regardless of mode.
    pub fn browse_entries(&self) -> &EntrySequence {
        &self.browse
    }

    /// Pagination of the sequence on screen.
    pub fn pagination(&self) -> &PaginationState {
        match self.mode {
            SessionMode::Searching => &self.search.pagination,
            SessionMode::Browsing | SessionMode::DateFiltering => &self.pagination,
        }
    }

    /// Search state.
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Date filter in effect.
    pub fn date_filter(&self) -> &DateFilterState {
        &self.date_filter
    }

    /// Index of the selected entry in [`Self::entries`].
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The selected entry.
    pub fn current_entry(&self) -> Option<&EntryDocument> {
        self.entries().get(self.selected)
    }

    /// Expanded entries.
    pub fn views(&self) -> &EntryViews {
        &self.views
    }

    /// Horizontal offset of the selected row while it is collapsed.
    pub fn row_hscroll(&self) -> usize {
        self.row_hscroll
    }

    /// Status row.
    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Open prompt, if any.
    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// A fetch for the sequence on screen (or a reload) is outstanding.
    pub fn is_loading(&self) -> bool {
        self.reload_stream.in_flight()
            || match self.mode {
                SessionMode::Searching => self.search_stream.in_flight(),
                SessionMode::Browsing | SessionMode::DateFiltering => {
                    self.browse_stream.in_flight()
                }
            }
    }

    // ===== Selection =====

    /// Move the selection to `index`, clamped to the sequence.
    pub fn select(&mut self, index: usize) {
        let clamped = self.clamp_index(index);
        if clamped != self.selected {
            self.row_hscroll = 0;
        }
        self.selected = clamped;
    }

    /// Re-establish `0 <= selected < len` (or 0 when empty).
    pub fn clamp_selection(&mut self) {
        self.selected = self.clamp_index(self.selected);
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.entries().len().saturating_sub(1))
    }

    /// Horizontal offset of the selected entry, expanded or not.
    pub fn current_hscroll(&self) -> usize {
        if self.views.is_expanded(self.selected) {
            self.views.get(self.selected).horizontal_scroll
        } else {
            self.row_hscroll
        }
    }

    pub(crate) fn set_current_hscroll(&mut self, offset: usize) {
        match self.views.get_mut(self.selected) {
            Some(view) => view.horizontal_scroll = offset,
            None => self.row_hscroll = offset,
        }
    }

    /// Drop all per-entry view state; used when the sequence on screen changes.
    pub(crate) fn reset_views(&mut self) {
        self.views.clear();
        self.row_hscroll = 0;
    }

    /// Browsing or DateFiltering, depending on the date filter.
    pub(crate) fn resting_mode(&self) -> SessionMode {
        if self.date_filter.is_active() {
            SessionMode::DateFiltering
        } else {
            SessionMode::Browsing
        }
    }

    // ===== Status =====

    /// Show a message until something replaces it.
    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) -> StatusId {
        self.status.set(text, kind)
    }

    /// Show a message and schedule it to clear after `delay`.
    pub fn flash_status(&mut self, text: impl Into<String>, kind: StatusKind, delay: Duration) {
        let id = self.status.set(text, kind);
        self.commands.push(Command::ClearStatusAfter { id, delay });
    }

    /// Timer callback: clear message `id` if it is still shown.
    pub fn clear_status(&mut self, id: StatusId) {
        self.status.clear_if(id);
    }

    // ===== Commands =====

    pub(crate) fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Drain side effects queued since the last call.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    // ===== Fetch results =====

    /// Route a finished fetch to the controller that requested it.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) {
        let FetchOutcome { request, result } = outcome;
        debug!(
            stream = ?request.ticket.stream,
            generation = request.ticket.generation,
            ok = result.is_ok(),
            "Fetch finished"
        );
        match (request.ticket.stream, request.kind) {
            (Stream::Browse, FetchKind::Page { .. }) => {
                pagination::apply_page(self, request.ticket.generation, result)
            }
            (Stream::Search, FetchKind::Page { cursor, .. }) => {
                search::apply_results(self, request.ticket.generation, cursor.is_none(), result)
            }
            (
                Stream::Reload,
                FetchKind::Reload {
                    start_spec,
                    end_spec,
                    search_generation,
                    ..
                },
            ) => date_filter::apply_reload(
                self,
                request.ticket.generation,
                DateFilterState::from_specs(&start_spec, &end_spec),
                search_generation,
                result,
            ),
            (stream, _) => debug!(?stream, "Ignoring fetch outcome with mismatched kind"),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
