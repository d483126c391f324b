//! Navigation: selection movement, expanded-entry scrolling and horizontal
//! scrolling (pure state transitions).
//!
//! Any movement toward the loaded end may queue a continuation fetch.

use unicode_width::UnicodeWidthStr;

use crate::state::pagination::{maybe_load_more, maybe_load_more_within};
use crate::state::session::PREFETCH_WINDOW;
use crate::state::viewport::{clamp_hscroll, ViewportDimensions, ROW_PREFIX_WIDTH};
use crate::state::SessionState;

/// Columns moved per horizontal scroll step.
pub const HSCROLL_STEP: usize = 10;

/// Down: scroll inside an expanded entry until its last line, then advance.
pub fn scroll_down(state: &mut SessionState) {
    let index = state.selected();
    let Some(entry) = state.current_entry() else {
        return;
    };
    let line_count = entry.pretty_lines().len();
    if let Some(view) = state.views.get_mut(index) {
        if view.vertical_scroll + 1 < line_count {
            view.vertical_scroll += 1;
            return;
        }
    }
    select_next(state);
}

/// Up: scroll back inside an expanded entry until its first line, then retreat.
pub fn scroll_up(state: &mut SessionState) {
    let index = state.selected();
    if let Some(view) = state.views.get_mut(index) {
        if view.vertical_scroll > 0 {
            view.vertical_scroll -= 1;
            return;
        }
    }
    select_previous(state);
}

/// Move the selection down one entry.
pub fn select_next(state: &mut SessionState) {
    state.select(state.selected() + 1);
    maybe_load_more(state);
}

/// Move the selection up one entry.
pub fn select_previous(state: &mut SessionState) {
    state.select(state.selected().saturating_sub(1));
}

/// Jump down one viewport, prefetching if the jump lands near the end.
pub fn page_down(state: &mut SessionState, viewport: ViewportDimensions) {
    state.select(state.selected() + viewport.height);
    maybe_load_more_within(state, viewport.height.max(PREFETCH_WINDOW));
}

/// Jump up one viewport.
pub fn page_up(state: &mut SessionState, viewport: ViewportDimensions) {
    state.select(state.selected().saturating_sub(viewport.height));
}

/// Select the first entry.
pub fn scroll_to_top(state: &mut SessionState) {
    state.select(0);
}

/// Select the last loaded entry and prefetch.
pub fn scroll_to_bottom(state: &mut SessionState, viewport: ViewportDimensions) {
    state.select(state.entries().len().saturating_sub(1));
    maybe_load_more_within(state, viewport.height.max(PREFETCH_WINDOW));
}

/// Widest rendered line of the selected entry, including the selection marker.
pub fn current_line_width(state: &SessionState) -> usize {
    let Some(entry) = state.current_entry() else {
        return 0;
    };
    let content = if state.views().is_expanded(state.selected()) {
        entry
            .pretty_lines()
            .iter()
            .map(|line| line.width())
            .max()
            .unwrap_or(0)
    } else {
        entry.summary().text().width()
    };
    content + ROW_PREFIX_WIDTH
}

/// Scroll the selected entry right by [`HSCROLL_STEP`], clamped to its overflow.
pub fn scroll_right(state: &mut SessionState, viewport: ViewportDimensions) {
    let width = current_line_width(state);
    let offset = clamp_hscroll(state.current_hscroll() + HSCROLL_STEP, width, viewport.width);
    state.set_current_hscroll(offset);
}

/// Scroll the selected entry left by [`HSCROLL_STEP`].
pub fn scroll_left(state: &mut SessionState, viewport: ViewportDimensions) {
    let width = current_line_width(state);
    let offset = clamp_hscroll(
        state.current_hscroll().saturating_sub(HSCROLL_STEP),
        width,
        viewport.width,
    );
    state.set_current_hscroll(offset);
}

#[cfg(test)]
#[path = "scroll_handler_tests.rs"]
mod tests;
