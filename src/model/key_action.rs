//! Domain-level keyboard actions independent of key bindings.

/// Logical actions the viewer understands.
///
/// These represent user intent, not specific keys. The mapping from decoded
/// `crossterm::event::KeyEvent`s to `KeyAction`s is owned by
/// [`KeyBindings`](crate::config::KeyBindings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the viewer. Default: q/Q/Ctrl+c
    Quit,
    /// Clear the active search. Default: Esc
    CancelSearch,
    /// Open the search prompt. Default: /
    StartSearch,
    /// Open the date-range prompt. Default: f/F
    StartDateFilter,
    /// Move to the next result while a search is active. Default: n
    NextMatch,
    /// Move to the previous result while a search is active. Default: N
    PrevMatch,
    /// Move selection down, or scroll expanded content down. Default: j/↓
    ScrollDown,
    /// Move selection up, or scroll expanded content up. Default: k/↑
    ScrollUp,
    /// Scroll the current row left. Default: ←
    ScrollLeft,
    /// Scroll the current row right. Default: →
    ScrollRight,
    /// Jump down one viewport height. Default: d/D/Page Down
    PageDown,
    /// Jump up one viewport height. Default: u/U/Page Up
    PageUp,
    /// Jump to the first entry. Default: g/Home
    ScrollToTop,
    /// Jump to the last loaded entry. Default: G/End
    ScrollToBottom,
    /// Expand or collapse the current entry. Default: Space/Enter
    ToggleExpand,
}
