//! Background fetch plumbing.
//!
//! Controllers never perform I/O. They describe the fetch they want as a
//! [`FetchRequest`], the event loop runs it off-thread via [`execute`], and the
//! resulting [`FetchOutcome`] is fed back into the session on the loop thread.
//! Each request carries a [`FetchTicket`]; outcomes whose ticket is no longer
//! current are discarded.

use std::time::Duration;

use crate::model::{Cursor, FetchError, Page, SearchQuery, TimeRange};
use crate::source::LogSource;
use crate::state::StatusId;

/// Independent fetch streams. Each has its own generation and in-flight flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Continuation pages of the browse sequence.
    Browse,
    /// First and continuation pages of a search.
    Search,
    /// Full reload for a new date range.
    Reload,
}

/// Identifies which request an outcome answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    /// Stream the request belongs to.
    pub stream: Stream,
    /// Stream generation at request time.
    pub generation: u64,
}

/// What to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    /// One page, optionally continuing from `cursor` and filtered by `query`.
    Page {
        /// Continuation cursor; `None` requests the first page.
        cursor: Option<Cursor>,
        /// Search filter.
        query: Option<SearchQuery>,
    },
    /// First page for a new time range.
    Reload {
        /// Resolved range.
        range: TimeRange,
        /// Start as typed, kept for the header label.
        start_spec: String,
        /// End as typed, kept for the header label.
        end_spec: String,
        /// Search generation when the reload was requested.
        search_generation: u64,
    },
}

/// A fetch the event loop should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Routing and staleness information.
    pub ticket: FetchTicket,
    /// What to fetch.
    pub kind: FetchKind,
}

/// Result of running a [`FetchRequest`].
#[derive(Debug)]
pub struct FetchOutcome {
    /// The request that produced this outcome.
    pub request: FetchRequest,
    /// Page or failure.
    pub result: Result<Page, FetchError>,
}

/// Side effects requested by the session for the event loop to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a fetch in the background.
    Fetch(FetchRequest),
    /// Clear status message `id` after `delay`, if it is still shown.
    ClearStatusAfter {
        /// Message to clear.
        id: StatusId,
        /// How long to wait.
        delay: Duration,
    },
}

/// Run `request` against `source`, blocking the calling thread.
pub fn execute(source: &dyn LogSource, request: FetchRequest) -> FetchOutcome {
    let result = match &request.kind {
        FetchKind::Page { cursor, query } => source.fetch(cursor.as_ref(), query.as_ref()),
        FetchKind::Reload { range, .. } => source.reload(range),
    };
    FetchOutcome { request, result }
}

/// Generation counter and in-flight flag of one [`Stream`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StreamTracker {
    generation: u64,
    in_flight: bool,
}

impl StreamTracker {
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Mark a request in flight under the current generation.
    pub(crate) fn begin(&mut self) -> u64 {
        self.in_flight = true;
        self.generation
    }

    /// Invalidate whatever is outstanding.
    pub(crate) fn bump(&mut self) {
        self.generation += 1;
        self.in_flight = false;
    }

    /// Invalidate whatever is outstanding and start a new request.
    pub(crate) fn restart(&mut self) -> u64 {
        self.bump();
        self.begin()
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub(crate) fn finish(&mut self) {
        self.in_flight = false;
    }
}
