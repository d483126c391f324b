//! Acceptance test harness.
//!
//! Drives a [`SessionState`] the way the event loop does: keys go through the
//! dispatcher, queued fetches run synchronously against an in-memory source,
//! and frames are rendered as plain text.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use tailview::config::KeyBindings;
use tailview::model::{Cursor, EntryDocument, FetchError, Page, SearchQuery, TimeRange};
use tailview::source::LogSource;
use tailview::state::fetch::{execute, Command, FetchRequest};
use tailview::state::{handle_key, Flow, SessionState, TermSize};
use tailview::view::format::line_text;
use tailview::view::{render_frame, Palette};

/// `n` entries with messages `entry 0` .. `entry n-1`.
pub fn entries(n: usize) -> Vec<EntryDocument> {
    (0..n).map(|i| entry(&format!("entry {i}"))).collect()
}

/// One entry with `message`.
pub fn entry(message: &str) -> EntryDocument {
    EntryDocument::from_json(json!({
        "timestamp": "2025-01-01T00:00:00Z",
        "level": "info",
        "message": message,
    }))
    .expect("object literal")
}

/// Serves entries in pages with decimal-offset cursors.
pub struct MemorySource {
    entries: Vec<EntryDocument>,
    reload_entries: Vec<EntryDocument>,
    page_size: usize,
    fetches: AtomicUsize,
    reloads: AtomicUsize,
}

impl MemorySource {
    pub fn new(entries: Vec<EntryDocument>, page_size: usize) -> Self {
        Self {
            reload_entries: entries.clone(),
            entries,
            page_size,
            fetches: AtomicUsize::new(0),
            reloads: AtomicUsize::new(0),
        }
    }

    pub fn with_reload_entries(mut self, entries: Vec<EntryDocument>) -> Self {
        self.reload_entries = entries;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    fn serve(&self, all: &[EntryDocument], cursor: Option<&Cursor>) -> Page {
        let offset = cursor
            .and_then(|c| c.as_str().parse::<usize>().ok())
            .unwrap_or(0)
            .min(all.len());
        let end = (offset + self.page_size).min(all.len());
        let has_more = end < all.len();
        Page {
            entries: all[offset..end].to_vec(),
            has_more,
            total: Some(all.len() as u64),
            next_cursor: if has_more {
                Cursor::new(end.to_string())
            } else {
                None
            },
        }
    }
}

impl LogSource for MemorySource {
    fn fetch(
        &self,
        cursor: Option<&Cursor>,
        query: Option<&SearchQuery>,
    ) -> Result<Page, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let Some(query) = query else {
            return Ok(self.serve(&self.entries, cursor));
        };
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
        Ok(self.serve(&matching, cursor))
    }

    fn reload(&self, _range: &TimeRange) -> Result<Page, FetchError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(self.serve(&self.reload_entries, None))
    }
}

/// A viewer session without a terminal.
pub struct AcceptanceTestHarness {
    pub state: SessionState,
    pub source: MemorySource,
    bindings: KeyBindings,
    size: TermSize,
    queued: Vec<FetchRequest>,
}

impl AcceptanceTestHarness {
    /// Start from the source's first page on a `rows` x `cols` terminal.
    pub fn start(source: MemorySource, rows: u16, cols: u16) -> Self {
        let first = source.fetch(None, None).expect("first page");
        Self {
            state: SessionState::new(first),
            source,
            bindings: KeyBindings::default(),
            size: TermSize { rows, cols },
            queued: Vec::new(),
        }
    }

    /// Press a key; queued fetches are held until [`Self::complete_fetches`].
    pub fn press(&mut self, code: KeyCode) -> Flow {
        let flow = handle_key(
            &mut self.state,
            &self.bindings,
            KeyEvent::new(code, KeyModifiers::NONE),
            self.size.viewport(),
        );
        self.collect_commands();
        flow
    }

    /// Press a character key.
    pub fn press_char(&mut self, ch: char) -> Flow {
        self.press(KeyCode::Char(ch))
    }

    /// Type text one key at a time.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_char(ch);
        }
    }

    fn collect_commands(&mut self) {
        for command in self.state.take_commands() {
            if let Command::Fetch(request) = command {
                self.queued.push(request);
            }
        }
    }

    /// Fetches issued and not yet completed.
    pub fn pending_fetches(&self) -> usize {
        self.queued.len()
    }

    /// Run held fetches and apply their outcomes in order.
    pub fn complete_fetches(&mut self) {
        while !self.queued.is_empty() {
            for request in std::mem::take(&mut self.queued) {
                let outcome = execute(&self.source, request);
                self.state.apply_fetch(outcome);
            }
            self.collect_commands();
        }
    }

    /// Rendered content rows as plain text.
    pub fn content_rows(&self) -> Vec<String> {
        let rows = self.screen();
        rows[3..rows.len() - 2].to_vec()
    }

    /// Whole rendered screen as plain text.
    pub fn screen(&self) -> Vec<String> {
        render_frame(&self.state, self.size, Palette::plain())
            .lines
            .iter()
            .map(|line| line_text(line).trim_end().to_string())
            .collect()
    }
}
