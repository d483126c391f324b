//! Tests for session state bookkeeping.

use super::*;
use crate::state::fetch::{FetchRequest, FetchTicket};
use crate::test_harness::{entries, page};

fn session(n: usize) -> SessionState {
    SessionState::new(page(entries(n), true, Some("next")))
}

// ===== Construction =====

#[test]
fn new_session_shows_first_page() {
    let state = session(12);

    assert_eq!(state.mode(), SessionMode::Browsing);
    assert_eq!(state.entries().len(), 12);
    assert_eq!(state.selected(), 0);
    assert!(state.pagination().can_fetch());
    assert!(!state.is_loading());
}

#[test]
fn date_filter_at_startup_sets_mode() {
    let state = session(3).with_date_filter(DateFilterState::from_specs("-1h", ""));

    assert_eq!(state.mode(), SessionMode::DateFiltering);
    assert_eq!(state.date_filter().label().as_deref(), Some("[from -1h]"));
}

#[test]
fn blank_date_filter_keeps_browsing() {
    let state = session(3).with_date_filter(DateFilterState::from_specs(" ", ""));
    assert_eq!(state.mode(), SessionMode::Browsing);
}

// ===== Selection =====

#[test]
fn select_clamps_to_last_entry() {
    let mut state = session(5);
    state.select(99);
    assert_eq!(state.selected(), 4);
}

#[test]
fn select_on_empty_sequence_stays_zero() {
    let mut state = SessionState::new(page(Vec::new(), false, None));
    state.select(3);
    assert_eq!(state.selected(), 0);
    assert!(state.current_entry().is_none());
}

#[test]
fn moving_selection_resets_row_hscroll() {
    // GIVEN: a collapsed row scrolled horizontally
    let mut state = session(5);
    state.set_current_hscroll(30);
    assert_eq!(state.row_hscroll(), 30);

    // WHEN: selecting the same row again
    state.select(0);
    // THEN: the offset is kept
    assert_eq!(state.row_hscroll(), 30);

    // WHEN: moving to another row
    state.select(1);
    // THEN: the offset resets
    assert_eq!(state.row_hscroll(), 0);
}

#[test]
fn hscroll_of_expanded_entry_lives_in_views() {
    let mut state = session(5);
    state.views.toggle(0);

    state.set_current_hscroll(12);

    assert_eq!(state.views().get(0).horizontal_scroll, 12);
    assert_eq!(state.row_hscroll(), 0);
    assert_eq!(state.current_hscroll(), 12);
}

// ===== Status and commands =====

#[test]
fn flash_status_schedules_clear() {
    let mut state = session(1);
    state.flash_status("Loaded 3 new entries", StatusKind::Info, SHORT_STATUS);

    let commands = state.take_commands();
    let id = state.status().current().unwrap().id;
    assert_eq!(
        commands,
        vec![Command::ClearStatusAfter {
            id,
            delay: SHORT_STATUS
        }]
    );
    assert!(state.take_commands().is_empty());
}

#[test]
fn clear_status_ignores_replaced_message() {
    let mut state = session(1);
    state.flash_status("first", StatusKind::Info, SHORT_STATUS);
    let first = state.status().current().unwrap().id;
    state.set_status("second", StatusKind::Progress);

    state.clear_status(first);

    assert_eq!(state.status().current().unwrap().text, "second");
}

#[test]
fn mismatched_outcome_is_ignored() {
    let mut state = session(2);
    state.apply_fetch(FetchOutcome {
        request: FetchRequest {
            ticket: FetchTicket {
                stream: Stream::Browse,
                generation: 0,
            },
            kind: FetchKind::Reload {
                range: Default::default(),
                start_spec: String::new(),
                end_spec: String::new(),
                search_generation: 0,
            },
        },
        result: Ok(page(entries(9), false, None)),
    });

    assert_eq!(state.entries().len(), 2);
}

// ===== Value types =====

#[test]
fn date_filter_labels() {
    assert_eq!(
        DateFilterState::from_specs("-1h", "now").label().as_deref(),
        Some("[-1h to now]")
    );
    assert_eq!(
        DateFilterState::from_specs("", "now").label().as_deref(),
        Some("[until now]")
    );
    assert_eq!(DateFilterState::from_specs("", "").label(), None);
}

#[test]
fn pagination_needs_cursor_and_more() {
    let mut pagination = PaginationState::from_page(&page(Vec::new(), true, None));
    assert!(!pagination.can_fetch());

    pagination.absorb(&page(Vec::new(), true, Some("c")));
    assert!(pagination.can_fetch());

    pagination.absorb(&page(Vec::new(), false, Some("c")));
    assert!(!pagination.can_fetch());
}

#[test]
fn entry_sequence_appends_in_order() {
    let mut sequence = EntrySequence::new(entries(2));
    sequence.append(entries(3));

    assert_eq!(sequence.len(), 5);
    assert_eq!(
        sequence.get(2).unwrap().message_text().as_deref(),
        Some("entry 0")
    );
}
