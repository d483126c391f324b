//! Server-side search (pure state transitions).
//!
//! Search results live in their own sequence. Submitting a search switches the
//! screen to it; clearing restores the browse sequence and its selection.

use tracing::{debug, info, warn};

use crate::model::{FetchError, Page, SearchQuery};
use crate::state::fetch::{Command, FetchKind, FetchRequest, FetchTicket, Stream};
use crate::state::pagination::near_end;
use crate::state::session::{LONG_STATUS, SHORT_STATUS};
use crate::state::{EntrySequence, PaginationState, SearchPhase, SearchState, SessionMode};
use crate::state::{SessionState, StatusKind};

/// Submit the prompt text. Blank input clears any active search.
pub fn submit(state: &mut SessionState, raw: &str) {
    match SearchQuery::new(raw.trim()) {
        Some(query) => start(state, query),
        None => clear(state),
    }
}

/// Start a new search, superseding any search in flight.
pub fn start(state: &mut SessionState, query: SearchQuery) {
    if state.mode != SessionMode::Searching {
        state.browse_selection = state.selected;
    }
    let generation = state.search_stream.restart();
    info!(query = query.as_str(), generation, "Starting search");

    state.search = SearchState::pending(query.clone());
    state.mode = SessionMode::Searching;
    state.selected = 0;
    state.reset_views();
    state.set_status(
        format!("Searching for '{}'...", query.as_str()),
        StatusKind::Progress,
    );
    state.push_command(Command::Fetch(FetchRequest {
        ticket: FetchTicket {
            stream: Stream::Search,
            generation,
        },
        kind: FetchKind::Page {
            cursor: None,
            query: Some(query),
        },
    }));
}

/// Leave search mode and return to the browse sequence. No-op when idle.
pub fn clear(state: &mut SessionState) {
    if !state.search.is_active() {
        return;
    }
    state.search_stream.bump();
    state.search = SearchState::idle();
    state.mode = state.resting_mode();
    state.selected = state.browse_selection;
    state.clamp_selection();
    state.reset_views();
    info!("Search cleared");
    state.flash_status(
        "Search cleared - back to normal mode",
        StatusKind::Info,
        SHORT_STATUS,
    );
}

pub(crate) fn maybe_load_more_results(state: &mut SessionState, lookahead: usize) -> bool {
    if state.search_stream.in_flight() || state.search.phase != SearchPhase::Results {
        return false;
    }
    let (Some(cursor), Some(query)) = (
        state.search.pagination.cursor.clone(),
        state.search.query.clone(),
    ) else {
        return false;
    };
    if !state.search.pagination.has_more
        || !near_end(state.selected, state.search.results.len(), lookahead)
    {
        return false;
    }

    let generation = state.search_stream.begin();
    debug!(generation, cursor = cursor.as_str(), "Requesting more search results");
    state.set_status("Loading more search results...", StatusKind::Progress);
    state.push_command(Command::Fetch(FetchRequest {
        ticket: FetchTicket {
            stream: Stream::Search,
            generation,
        },
        kind: FetchKind::Page {
            cursor: Some(cursor),
            query: Some(query),
        },
    }));
    true
}

/// Apply a page of search results.
///
/// A failed first page abandons the search; a failed continuation leaves the
/// results in place so a later trigger retries.
pub fn apply_results(
    state: &mut SessionState,
    generation: u64,
    first_page: bool,
    result: Result<Page, FetchError>,
) {
    if !state.search_stream.is_current(generation) {
        debug!(generation, "Discarding stale search results");
        return;
    }
    state.search_stream.finish();
    let query = state
        .search
        .query
        .as_ref()
        .map(|q| q.as_str().to_string())
        .unwrap_or_default();

    match (result, first_page) {
        (Ok(page), true) => {
            let count = page.len();
            state.search.pagination = PaginationState::from_page(&page);
            state.search.matches = (0..count).collect();
            state.search.results = EntrySequence::new(page.entries);
            info!(query = %query, count, "Search returned");
            if count == 0 {
                state.search.phase = SearchPhase::NoMatches;
                state.flash_status(
                    format!("No matches for '{query}' (Esc: clear search)"),
                    StatusKind::Info,
                    LONG_STATUS,
                );
            } else {
                state.search.phase = SearchPhase::Results;
                let total = state
                    .search
                    .pagination
                    .total
                    .map_or_else(|| count.to_string(), |t| t.to_string());
                state.flash_status(
                    format!("Found {total} results for '{query}' (Esc: clear search)"),
                    StatusKind::Info,
                    LONG_STATUS,
                );
            }
        }
        (Ok(page), false) => {
            let count = page.len();
            let offset = state.search.results.len();
            state.search.pagination.absorb(&page);
            state.search.matches.extend(offset..offset + count);
            state.search.results.append(page.entries);
            let loaded = state.search.results.len();
            let total = state
                .search
                .pagination
                .total
                .map_or_else(|| loaded.to_string(), |t| t.to_string());
            state.flash_status(
                format!("Loaded {count} more results ({total} total)"),
                StatusKind::Info,
                SHORT_STATUS,
            );
        }
        (Err(err), true) => {
            warn!(query = %query, error = %err, "Search failed");
            state.search_stream.bump();
            state.search = SearchState::idle();
            state.mode = state.resting_mode();
            state.selected = state.browse_selection;
            state.reset_views();
            state.flash_status(
                format!("Search error: {err}"),
                StatusKind::Error,
                LONG_STATUS,
            );
        }
        (Err(err), false) => {
            warn!(query = %query, error = %err, "Failed to load more search results");
            state.flash_status(
                format!("Error loading: {err}"),
                StatusKind::Error,
                LONG_STATUS,
            );
        }
    }
    state.clamp_selection();
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
