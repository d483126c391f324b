//! Date-range reloads (pure state transitions).

use tracing::{debug, info, warn};

use crate::model::{FetchError, Page};
use crate::source::time_spec;
use crate::state::fetch::{Command, FetchKind, FetchRequest, FetchTicket, Stream};
use crate::state::session::LONG_STATUS;
use crate::state::{DateFilterState, EntrySequence, PaginationState, SearchState, SessionState};
use crate::state::StatusKind;

/// Resolve both specs and queue a reload. Blank specs mean unbounded.
///
/// On a resolution error nothing changes except the status row.
/// Returns true if a reload was queued.
pub fn request_reload(state: &mut SessionState, start: &str, end: &str) -> bool {
    let range = match time_spec::resolve_range(start, end) {
        Ok(range) => range,
        Err(err) => {
            debug!(error = %err, "Rejected date filter");
            state.flash_status(format!("Error: {err}"), StatusKind::Error, LONG_STATUS);
            return false;
        }
    };

    let generation = state.reload_stream.restart();
    info!(start, end, generation, "Reloading with date filter");
    let message = if range.is_unbounded() {
        "Reloading without date filter..."
    } else {
        "Loading logs with date filter..."
    };
    state.set_status(message, StatusKind::Progress);
    state.push_command(Command::Fetch(FetchRequest {
        ticket: FetchTicket {
            stream: Stream::Reload,
            generation,
        },
        kind: FetchKind::Reload {
            range,
            start_spec: start.trim().to_string(),
            end_spec: end.trim().to_string(),
            search_generation: state.search_stream.generation(),
        },
    }));
    true
}

/// Replace the browse sequence with a reload result.
///
/// Clears the active search unless a newer search was submitted after the
/// reload was requested. A failed reload leaves everything untouched.
pub fn apply_reload(
    state: &mut SessionState,
    generation: u64,
    filter: DateFilterState,
    search_generation: u64,
    result: Result<Page, FetchError>,
) {
    if !state.reload_stream.is_current(generation) {
        debug!(generation, "Discarding stale reload");
        return;
    }
    state.reload_stream.finish();

    let page = match result {
        Ok(page) => page,
        Err(err) => {
            warn!(error = %err, "Reload failed");
            state.flash_status(
                format!("Error loading: {err}"),
                StatusKind::Error,
                LONG_STATUS,
            );
            return;
        }
    };

    let count = page.len();
    info!(count, filter = ?filter.label(), "Reload finished");
    state.pagination = PaginationState::from_page(&page);
    state.browse = EntrySequence::new(page.entries);
    state.browse_stream.bump();
    state.browse_selection = 0;
    state.date_filter = filter;

    let newer_search = !state.search_stream.is_current(search_generation);
    if !newer_search && state.search.is_active() {
        state.search_stream.bump();
        state.search = SearchState::idle();
    }
    if !state.search.is_active() {
        state.mode = state.resting_mode();
        state.selected = 0;
        state.reset_views();
    }

    let message = if count == 0 {
        "No logs found for the specified date range".to_string()
    } else if state.date_filter.is_active() {
        format!("Loaded {count} entries (filtered)")
    } else {
        format!("Loaded {count} entries")
    };
    state.flash_status(message, StatusKind::Info, LONG_STATUS);
    state.clamp_selection();
}

#[cfg(test)]
#[path = "date_filter_tests.rs"]
mod tests;
