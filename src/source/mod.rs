//! Remote log sources.
//!
//! The viewer core only sees the [`LogSource`] trait: a `fetch` for the next
//! page of the plain or searched stream, and a `reload` for a fresh query over a
//! new time range. [`HttpSource`] talks to the real service.

use crate::model::{Cursor, FetchError, Page, SearchQuery, TimeRange};

pub mod http;
pub mod streams;
pub mod time_spec;

pub use http::{HttpSource, HttpSourceConfig};

/// Boundary to the remote log service.
///
/// Implementations are called from background worker threads, hence the
/// `Send + Sync` bound.
pub trait LogSource: Send + Sync {
    /// Fetch one page.
    ///
    /// `cursor = None` requests the first page. `query = Some(..)` requests
    /// server-side filtered results instead of the plain stream.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport, status, or decode failure.
    fn fetch(&self, cursor: Option<&Cursor>, query: Option<&SearchQuery>)
        -> Result<Page, FetchError>;

    /// Re-run the original stream query bounded by `range`, returning its first page.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport, status, or decode failure.
    fn reload(&self, range: &TimeRange) -> Result<Page, FetchError>;
}
