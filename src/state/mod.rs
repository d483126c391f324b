//! Session state and its transitions (pure).
//!
//! Everything here is synchronous and free of I/O. Network work is requested
//! through [`fetch::Command`] values that the event loop drains with
//! [`SessionState::take_commands`], and results come back through
//! [`SessionState::apply_fetch`]. This keeps every transition testable without
//! a terminal or a server.

pub mod date_filter;
pub mod dispatcher;
pub mod expand_handler;
pub mod fetch;
pub mod pagination;
pub mod prompt;
pub mod scroll_handler;
pub mod search;
pub mod session;
pub mod status;
pub mod viewport;
pub mod views;

pub use dispatcher::{handle_key, Flow};
pub use fetch::{Command, FetchOutcome, FetchRequest};
pub use prompt::{Prompt, PromptKind};
pub use session::{
    DateFilterState, EntrySequence, PaginationState, SearchPhase, SearchState, SessionMode,
    SessionState, PREFETCH_WINDOW,
};
pub use status::{StatusId, StatusKind, StatusLine, StatusMessage};
pub use viewport::{TermSize, ViewportDimensions};
pub use views::{EntryViewState, EntryViews};
