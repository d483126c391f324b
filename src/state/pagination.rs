//! Continuation loading for the sequence on screen (pure state transitions).
//!
//! Requests are queued as commands; results come back through [`apply_page`].

use tracing::{debug, info, warn};

use crate::model::{FetchError, Page};
use crate::state::fetch::{Command, FetchKind, FetchRequest, FetchTicket, Stream};
use crate::state::session::{LONG_STATUS, PREFETCH_WINDOW, SHORT_STATUS};
use crate::state::{search, SessionMode, SessionState, StatusKind};

/// Request the next page if the selection is near the loaded end.
///
/// Returns true if a fetch was queued.
pub fn maybe_load_more(state: &mut SessionState) -> bool {
    maybe_load_more_within(state, PREFETCH_WINDOW)
}

/// Like [`maybe_load_more`] with a custom lookahead, used by page jumps.
pub fn maybe_load_more_within(state: &mut SessionState, lookahead: usize) -> bool {
    match state.mode() {
        SessionMode::Searching => search::maybe_load_more_results(state, lookahead),
        SessionMode::Browsing | SessionMode::DateFiltering => load_more_browse(state, lookahead),
    }
}

/// True when `selected` is within `lookahead` entries of the end of `len`.
pub fn near_end(selected: usize, len: usize, lookahead: usize) -> bool {
    selected + lookahead >= len
}

fn load_more_browse(state: &mut SessionState, lookahead: usize) -> bool {
    if state.browse_stream.in_flight() || state.reload_stream.in_flight() {
        return false;
    }
    let Some(cursor) = state.pagination.cursor.clone() else {
        return false;
    };
    if !state.pagination.has_more || !near_end(state.selected, state.browse.len(), lookahead) {
        return false;
    }

    let generation = state.browse_stream.begin();
    debug!(generation, cursor = cursor.as_str(), "Requesting next page");
    state.set_status("Loading more...", StatusKind::Progress);
    state.push_command(Command::Fetch(FetchRequest {
        ticket: FetchTicket {
            stream: Stream::Browse,
            generation,
        },
        kind: FetchKind::Page {
            cursor: Some(cursor),
            query: None,
        },
    }));
    true
}

/// Apply a continuation page of the browse sequence.
///
/// Outcomes from an older generation are dropped. On error the sequence and
/// cursor are left as they were so a later trigger retries.
pub fn apply_page(state: &mut SessionState, generation: u64, result: Result<Page, FetchError>) {
    if !state.browse_stream.is_current(generation) {
        debug!(generation, "Discarding stale page");
        return;
    }
    state.browse_stream.finish();

    match result {
        Ok(page) => {
            let count = page.len();
            state.pagination.absorb(&page);
            state.browse.append(page.entries);
            info!(count, loaded = state.browse.len(), "Loaded page");
            state.flash_status(
                format!("Loaded {count} new entries"),
                StatusKind::Info,
                SHORT_STATUS,
            );
        }
        Err(err) => {
            warn!(error = %err, "Failed to load page");
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
#[path = "pagination_tests.rs"]
mod tests;
