//! End-to-end scenarios driven through the public key and render API.

mod acceptance_harness;

use acceptance_harness::{entries, entry, AcceptanceTestHarness, MemorySource};
use crossterm::event::KeyCode;
use tailview::state::{Flow, SearchPhase, SessionMode};

// ===== Navigation =====

#[test]
fn four_steps_down_keep_selection_centered() {
    // GIVEN: 12 loaded entries and a 5-row content area
    let source = MemorySource::new(entries(12), 50);
    let mut harness = AcceptanceTestHarness::start(source, 10, 80);

    // WHEN: j is pressed four times
    for _ in 0..4 {
        harness.press_char('j');
    }

    // THEN: entry 4 is selected and entries 2..=6 are on screen
    assert_eq!(harness.state.selected(), 4);
    let rows = harness.content_rows();
    assert_eq!(rows.len(), 5);
    for (row, index) in rows.iter().zip(2..=6) {
        assert!(
            row.ends_with(&format!("entry {index}")),
            "row {row:?} should show entry {index}"
        );
    }
    assert!(rows[2].starts_with("▶ "));
}

#[test]
fn bottom_jump_shows_last_entry_in_last_row() {
    // GIVEN: 500 loaded entries and a 20-row content area
    let source = MemorySource::new(entries(500), 500);
    let mut harness = AcceptanceTestHarness::start(source, 25, 80);

    // WHEN: G is pressed
    harness.press_char('G');

    // THEN: the last entry is selected and drawn in the last content row
    assert_eq!(harness.state.selected(), 499);
    let rows = harness.content_rows();
    assert_eq!(rows.len(), 20);
    assert!(rows[19].starts_with("▶ "));
    assert!(rows[19].ends_with("entry 499"));
    assert!(rows[0].ends_with("entry 480"));
    assert_eq!(harness.pending_fetches(), 0);
}

#[test]
fn quit_key_ends_session() {
    let source = MemorySource::new(entries(3), 50);
    let mut harness = AcceptanceTestHarness::start(source, 10, 80);

    assert_eq!(harness.press_char('j'), Flow::Continue);
    assert_eq!(harness.press_char('q'), Flow::Quit);
}

// ===== Pagination =====

#[test]
fn approaching_end_fetches_exactly_one_page() {
    // GIVEN: 20 entries served 10 at a time, first page loaded
    let source = MemorySource::new(entries(20), 10);
    let mut harness = AcceptanceTestHarness::start(source, 10, 80);
    assert_eq!(harness.state.entries().len(), 10);

    // WHEN: the selection moves to within five of the end, and further
    for _ in 0..7 {
        harness.press_char('j');
    }

    // THEN: a single fetch was issued while it was in flight
    assert_eq!(harness.pending_fetches(), 1);
    let selected = harness.state.selected();
    assert_eq!(selected, 7);

    // WHEN: the fetch completes
    harness.complete_fetches();

    // THEN: the page is appended and the selection stays put
    assert_eq!(harness.state.entries().len(), 20);
    assert_eq!(harness.state.selected(), selected);
    assert_eq!(harness.source.fetches(), 2);
    assert_eq!(
        harness.state.entries().get(10).and_then(|e| e.message_text()),
        Some("entry 10".to_string())
    );
}

// ===== Search =====

#[test]
fn search_shows_matching_results() {
    // GIVEN: a stream where three entries mention "timeout"
    let mut docs = entries(10);
    docs.insert(2, entry("connection timeout"));
    docs.insert(5, entry("read timeout after 30s"));
    docs.push(entry("Timeout waiting for lock"));
    let source = MemorySource::new(docs, 50);
    let mut harness = AcceptanceTestHarness::start(source, 10, 80);
    harness.press_char('j');

    // WHEN: "timeout" is searched
    harness.press_char('/');
    harness.type_text("timeout");
    harness.press(KeyCode::Enter);

    // THEN: the search is pending until the fetch completes
    assert_eq!(harness.state.mode(), SessionMode::Searching);
    assert_eq!(harness.state.search().phase(), SearchPhase::Pending);
    harness.complete_fetches();

    assert_eq!(harness.state.mode(), SessionMode::Searching);
    assert_eq!(harness.state.entries().len(), 3);
    assert_eq!(harness.state.selected(), 0);
    assert!(harness.screen()[0].starts_with("Search Results for 'timeout'"));

    // WHEN: the search is cleared
    harness.press(KeyCode::Esc);

    // THEN: browsing resumes where it left off
    assert_eq!(harness.state.mode(), SessionMode::Browsing);
    assert_eq!(harness.state.entries().len(), 13);
    assert_eq!(harness.state.selected(), 1);
}

// ===== Date filter =====

#[test]
fn date_filter_replaces_sequence() {
    // GIVEN: an expanded entry in the browse sequence
    let source = MemorySource::new(entries(30), 50).with_reload_entries(entries(4));
    let mut harness = AcceptanceTestHarness::start(source, 12, 80);
    harness.press_char('j');
    harness.press_char('j');
    harness.press_char(' ');
    assert_eq!(harness.state.views().expanded_count(), 1);

    // WHEN: a start of "-1h" and an empty end are entered
    harness.press_char('f');
    harness.type_text("-1h");
    harness.press(KeyCode::Enter);
    harness.press(KeyCode::Enter);
    harness.complete_fetches();

    // THEN: the reloaded sequence replaces the old one from the top
    assert_eq!(harness.source.reloads(), 1);
    assert_eq!(harness.state.entries().len(), 4);
    assert_eq!(harness.state.selected(), 0);
    assert_eq!(harness.state.views().expanded_count(), 0);
    assert_eq!(harness.state.mode(), SessionMode::DateFiltering);
    assert!(harness.state.date_filter().is_active());
    assert!(harness.screen()[0].contains("[from -1h]"));
}

#[test]
fn invalid_date_leaves_sequence_alone() {
    let source = MemorySource::new(entries(30), 50);
    let mut harness = AcceptanceTestHarness::start(source, 12, 80);

    harness.press_char('f');
    harness.type_text("yesterday-ish");
    harness.press(KeyCode::Enter);
    harness.press(KeyCode::Enter);

    assert_eq!(harness.pending_fetches(), 0);
    assert_eq!(harness.state.entries().len(), 30);
    assert_eq!(harness.state.mode(), SessionMode::Browsing);
}
