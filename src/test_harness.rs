//! Test fixtures: an in-memory log source and entry builders.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde_json::json;

use crate::model::{Cursor, EntryDocument, FetchError, Page, SearchQuery, TimeRange};
use crate::source::LogSource;
use crate::state::fetch::{execute, Command};
use crate::state::SessionState;

/// `n` entries with messages `entry 0` .. `entry n-1`.
pub fn entries(n: usize) -> Vec<EntryDocument> {
    (0..n).map(|i| entry(&format!("entry {i}"))).collect()
}

/// One info-level entry with `message`.
pub fn entry(message: &str) -> EntryDocument {
    EntryDocument::from_json(json!({
        "timestamp": "2025-01-01T00:00:00Z",
        "level": "info",
        "message": message,
    }))
    .expect("object literal")
}

/// A page holding `entries`.
pub fn page(entries: Vec<EntryDocument>, has_more: bool, cursor: Option<&str>) -> Page {
    let total = Some(entries.len() as u64);
    Page {
        entries,
        has_more,
        total,
        next_cursor: cursor.and_then(Cursor::new),
    }
}

/// Serves a fixed entry list in pages. Cursors are decimal offsets.
///
/// Searches match entries whose message contains the query, case-insensitively.
/// `reload` serves `reload_entries` when set, else the full list.
pub struct FakeSource {
    entries: Vec<EntryDocument>,
    reload_entries: Option<Vec<EntryDocument>>,
    page_size: usize,
    failing: AtomicBool,
    fetch_calls: AtomicUsize,
    reload_calls: AtomicUsize,
}

impl FakeSource {
    pub fn paged(entries: Vec<EntryDocument>, page_size: usize) -> Self {
        Self {
            entries,
            reload_entries: None,
            page_size,
            failing: AtomicBool::new(false),
            fetch_calls: AtomicUsize::new(0),
            reload_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_reload_entries(mut self, entries: Vec<EntryDocument>) -> Self {
        self.reload_entries = Some(entries);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn reload_calls(&self) -> usize {
        self.reload_calls.load(Ordering::SeqCst)
    }

    fn serve(&self, all: &[EntryDocument], cursor: Option<&Cursor>) -> Result<Page, FetchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                status: "503 Service Unavailable".to_string(),
                body: String::new(),
            });
        }
        let offset = cursor
            .and_then(|c| c.as_str().parse::<usize>().ok())
            .unwrap_or(0)
            .min(all.len());
        let end = (offset + self.page_size).min(all.len());
        let has_more = end < all.len();
        Ok(Page {
            entries: all[offset..end].to_vec(),
            has_more,
            total: Some(all.len() as u64),
            next_cursor: if has_more {
                Cursor::new(end.to_string())
            } else {
                None
            },
        })
    }
}

impl LogSource for FakeSource {
    fn fetch(
        &self,
        cursor: Option<&Cursor>,
        query: Option<&SearchQuery>,
    ) -> Result<Page, FetchError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match query {
            Some(query) => {
                let needle = query.as_str().to_lowercase();
                let matching: Vec<EntryDocument> = self
                    .entries
                    .iter()
                    .filter(|e| {
                        e.message_text()
                            .is_some_and(|m| m.to_lowercase().contains(&needle))
                    })
                    .cloned()
                    .collect();
                self.serve(&matching, cursor)
            }
            None => self.serve(&self.entries, cursor),
        }
    }

    fn reload(&self, _range: &TimeRange) -> Result<Page, FetchError> {
        self.reload_calls.fetch_add(1, Ordering::SeqCst);
        let all = self.reload_entries.as_deref().unwrap_or(&self.entries);
        self.serve(all, None)
    }
}

/// Run every queued fetch synchronously and feed the outcomes back.
///
/// Status timers are dropped. Returns the number of fetches performed.
pub fn run_pending(state: &mut SessionState, source: &dyn LogSource) -> usize {
    let mut performed = 0;
    loop {
        let fetches: Vec<_> = state
            .take_commands()
            .into_iter()
            .filter_map(|command| match command {
                Command::Fetch(request) => Some(request),
                Command::ClearStatusAfter { .. } => None,
            })
            .collect();
        if fetches.is_empty() {
            return performed;
        }
        for request in fetches {
            performed += 1;
            let outcome = execute(source, request);
            state.apply_fetch(outcome);
        }
    }
}

/// Session started from the first page of `source`.
pub fn session_from(source: &FakeSource) -> SessionState {
    let first = source.fetch(None, None).expect("first page");
    SessionState::new(first)
}
