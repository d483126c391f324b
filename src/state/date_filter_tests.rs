//! Tests for date-range reloads.

use super::*;
use crate::state::fetch::{execute, Command, FetchRequest};
use crate::state::{search, SearchPhase, SessionMode};
use crate::test_harness::{entries, entry, run_pending, session_from, FakeSource};

fn queued_fetches(state: &mut SessionState) -> Vec<FetchRequest> {
    state
        .take_commands()
        .into_iter()
        .filter_map(|c| match c {
            Command::Fetch(request) => Some(request),
            Command::ClearStatusAfter { .. } => None,
        })
        .collect()
}

fn source_with_reload() -> FakeSource {
    FakeSource::paged(entries(30), 12)
        .with_reload_entries(vec![entry("recent a"), entry("recent b"), entry("recent c")])
}

#[test]
fn invalid_spec_leaves_state_untouched() {
    let source = source_with_reload();
    let mut state = session_from(&source);
    state.select(4);

    assert!(!request_reload(&mut state, "yesterday", ""));

    assert!(queued_fetches(&mut state).is_empty());
    assert_eq!(state.selected(), 4);
    assert_eq!(state.entries().len(), 12);
    let status = state.status().current().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.starts_with("Error: "));
}

#[test]
fn out_of_range_offset_is_a_status_error() {
    let source = source_with_reload();
    let mut state = session_from(&source);

    assert!(!request_reload(&mut state, "-999999999d", ""));

    assert!(queued_fetches(&mut state).is_empty());
    assert_eq!(state.entries().len(), 12);
    let status = state.status().current().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.contains("-999999999d"));
}

#[test]
fn reload_replaces_browse_sequence() {
    let source = source_with_reload();
    let mut state = session_from(&source);
    state.select(9);
    state.views.toggle(9);

    assert!(request_reload(&mut state, "-1h", ""));
    assert!(state.is_loading());
    run_pending(&mut state, &source);

    assert_eq!(source.reload_calls(), 1);
    assert_eq!(state.mode(), SessionMode::DateFiltering);
    assert_eq!(state.entries().len(), 3);
    assert_eq!(state.selected(), 0);
    assert_eq!(state.views().expanded_count(), 0);
    assert_eq!(state.date_filter().label().as_deref(), Some("[from -1h]"));
    assert_eq!(
        state.status().current().unwrap().text,
        "Loaded 3 entries (filtered)"
    );
}

#[test]
fn reload_clears_active_search() {
    // GIVEN: an active search with results
    let source = source_with_reload();
    let mut state = session_from(&source);
    search::submit(&mut state, "entry 1");
    run_pending(&mut state, &source);
    assert_eq!(state.search().phase(), SearchPhase::Results);

    // WHEN: a date filter is applied
    request_reload(&mut state, "-1h", "now");
    let fetches = queued_fetches(&mut state);
    assert_eq!(fetches.len(), 1);
    for request in fetches {
        state.apply_fetch(execute(&source, request));
    }

    // THEN: the search is gone and the reloaded sequence is shown
    assert!(!state.search().is_active());
    assert_eq!(state.mode(), SessionMode::DateFiltering);
    assert_eq!(state.selected(), 0);
    assert_eq!(
        state.current_entry().unwrap().message_text().as_deref(),
        Some("recent a")
    );
}

#[test]
fn blank_specs_clear_filter() {
    let source = source_with_reload();
    let mut state = session_from(&source);
    request_reload(&mut state, "-1h", "");
    run_pending(&mut state, &source);
    assert_eq!(state.mode(), SessionMode::DateFiltering);

    let queued = request_reload(&mut state, "", "");
    let fetches = queued_fetches(&mut state);
    assert!(queued);
    assert!(matches!(
        &fetches[0].kind,
        FetchKind::Reload { range, .. } if range.is_unbounded()
    ));
    for request in fetches {
        state.apply_fetch(execute(&source, request));
    }

    assert_eq!(state.mode(), SessionMode::Browsing);
    assert!(!state.date_filter().is_active());
}

#[test]
fn search_submitted_during_reload_survives() {
    // GIVEN: a reload in flight
    let source = source_with_reload();
    let mut state = session_from(&source);
    request_reload(&mut state, "-1h", "");

    // WHEN: a search is submitted before the reload lands
    search::submit(&mut state, "entry 2");
    run_pending(&mut state, &source);

    // THEN: the search stays on screen; the browse sequence was still replaced
    assert_eq!(state.mode(), SessionMode::Searching);
    assert_eq!(state.search().phase(), SearchPhase::Results);
    assert_eq!(state.browse_entries().len(), 3);
    assert_eq!(state.date_filter().label().as_deref(), Some("[from -1h]"));

    // Clearing the search returns to the filtered sequence
    search::clear(&mut state);
    assert_eq!(state.mode(), SessionMode::DateFiltering);
    assert_eq!(state.selected(), 0);
}

#[test]
fn reload_discards_page_in_flight() {
    let source = source_with_reload();
    let mut state = session_from(&source);
    state.select(11);
    crate::state::pagination::maybe_load_more(&mut state);
    let stale_page = queued_fetches(&mut state);

    request_reload(&mut state, "-1h", "");
    run_pending(&mut state, &source);
    for request in stale_page {
        state.apply_fetch(execute(&source, request));
    }

    assert_eq!(state.entries().len(), 3);
}

#[test]
fn newer_reload_supersedes_older() {
    let source = source_with_reload();
    let mut state = session_from(&source);
    request_reload(&mut state, "-1h", "");
    let first = queued_fetches(&mut state);
    request_reload(&mut state, "-2d", "");
    run_pending(&mut state, &source);

    for request in first {
        state.apply_fetch(execute(&source, request));
    }

    assert_eq!(state.date_filter().label().as_deref(), Some("[from -2d]"));
}

#[test]
fn failed_reload_keeps_sequence() {
    let source = source_with_reload();
    let mut state = session_from(&source);
    state.select(5);
    request_reload(&mut state, "-1h", "");
    source.set_failing(true);

    run_pending(&mut state, &source);

    assert_eq!(state.entries().len(), 12);
    assert_eq!(state.selected(), 5);
    assert_eq!(state.mode(), SessionMode::Browsing);
    assert!(!state.is_loading());
}

#[test]
fn empty_reload_reports_no_logs() {
    let source = FakeSource::paged(entries(30), 12).with_reload_entries(Vec::new());
    let mut state = session_from(&source);

    request_reload(&mut state, "-1h", "");
    run_pending(&mut state, &source);

    assert!(state.entries().is_empty());
    assert_eq!(
        state.status().current().unwrap().text,
        "No logs found for the specified date range"
    );
}
