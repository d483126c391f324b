//! Expand/collapse of the selected entry (pure state transition).

use tracing::debug;

use crate::state::SessionState;

/// Toggle the selected entry. Expanding starts at the top of its JSON;
/// collapsing forgets its scroll offsets.
pub fn toggle_current(state: &mut SessionState) {
    if state.entries().is_empty() {
        return;
    }
    let index = state.selected();
    let expanded = state.views.toggle(index);
    state.row_hscroll = 0;
    debug!(index, expanded, "Toggled entry");
}
