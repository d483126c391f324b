//! One page of results from the remote log service.

use crate::model::EntryDocument;
use chrono::{DateTime, Utc};

// ===== Cursor =====

/// Opaque pagination token. Never empty.
///
/// The server signals "no further page" with a missing or empty cursor, both of
/// which become `None` at the boundary, so holding a `Cursor` always means a
/// follow-up request is possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Smart constructor: returns `None` for an empty token.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// The token as sent back to the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ===== SearchQuery =====

/// Validated server-side search query. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Smart constructor: returns `None` if the query is empty or whitespace-only.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// The query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ===== TimeRange =====

/// Resolved time bounds for a reload. `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive lower bound.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

// ===== Page =====

/// Response shape shared by `fetch` and `reload`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Entries on this page, in server order.
    pub entries: Vec<EntryDocument>,
    /// Whether the server reports more pages.
    pub has_more: bool,
    /// Total matching entries; `None` when unknown (e.g. tailing without a range).
    pub total: Option<u64>,
    /// Token for the next page.
    pub next_cursor: Option<Cursor>,
}

impl Page {
    /// Number of entries on this page.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the page carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_rejects_empty() {
        assert!(Cursor::new("").is_none());
        assert_eq!(Cursor::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn search_query_rejects_blank() {
        assert!(SearchQuery::new("").is_none());
        assert!(SearchQuery::new("   ").is_none());
        assert_eq!(SearchQuery::new("timeout").unwrap().as_str(), "timeout");
    }

    #[test]
    fn default_range_is_unbounded() {
        assert!(TimeRange::default().is_unbounded());
        let range = TimeRange {
            start: Some(Utc::now()),
            end: None,
        };
        assert!(!range.is_unbounded());
    }
}
