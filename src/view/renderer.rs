//! Frame rendering (pure).
//!
//! [`render_frame`] turns a [`SessionState`] and terminal size into exactly
//! `rows` styled lines: header, status, rule, content, rule, footer. Nothing
//! here touches the terminal, so frames can be asserted on directly.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::EntryDocument;
use crate::state::viewport::{clamp_hscroll, visible_window, TermSize};
use crate::state::{SearchPhase, SessionMode, SessionState};
use crate::view::format::{collapsed_line, NO_MARKER, SELECTION_MARKER};
use crate::view::styles::Palette;

/// Key hint appended to the header.
const HEADER_HINT: &str = " - j/k: navigate, Space: expand, q: quit";

/// A rendered frame plus where the terminal cursor should sit, if visible.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    /// One entry per terminal row.
    pub lines: Vec<Line<'static>>,
    /// Cursor position `(column, row)` while a prompt is open.
    pub cursor: Option<(u16, u16)>,
}

/// Build the frame for `state` at `size`.
pub fn render_frame(state: &SessionState, size: TermSize, palette: Palette) -> RenderedFrame {
    let width = usize::from(size.cols).max(1);
    let viewport = size.viewport();

    let mut lines = Vec::with_capacity(usize::from(size.rows));
    lines.push(header_line(state, width, palette));
    let (status, cursor) = status_line(state, width, palette);
    lines.push(status);
    lines.push(rule(width, palette));
    lines.extend(content_lines(state, viewport.height, width, palette));
    lines.push(rule(width, palette));
    lines.push(Line::styled(
        truncate(&footer_text(state, viewport.height), width),
        palette.dim(),
    ));
    lines.truncate(usize::from(size.rows));

    RenderedFrame { lines, cursor }
}

// ===== Chrome =====

fn header_line(state: &SessionState, width: usize, palette: Palette) -> Line<'static> {
    if let Some(hint) = state.prompt().and_then(|prompt| prompt.hint()) {
        return Line::styled(truncate(hint, width), palette.dim());
    }
    Line::styled(truncate(&header_text(state), width), palette.header())
}

/// Header text: title, counts, date label and loading marker.
pub fn header_text(state: &SessionState) -> String {
    let loaded = state.entries().len();
    let pagination = state.pagination();
    let counts = match pagination.total {
        Some(total) => format!("{loaded} loaded of {total} total"),
        None if pagination.has_more => format!("{loaded} loaded, more available"),
        None => format!("{loaded} loaded"),
    };

    let mut text = match (state.mode(), state.search().query()) {
        (SessionMode::Searching, Some(query)) => {
            format!("Search Results for '{}' ({counts})", query.as_str())
        }
        _ => format!("Logs ({counts})"),
    };
    if let Some(label) = state.date_filter().label() {
        text.push(' ');
        text.push_str(&label);
    }
    if state.is_loading() {
        text.push_str(" (loading...)");
    }
    text.push_str(HEADER_HINT);
    text
}

fn status_line(
    state: &SessionState,
    width: usize,
    palette: Palette,
) -> (Line<'static>, Option<(u16, u16)>) {
    if let Some(prompt) = state.prompt() {
        let label = prompt.label();
        let typed: String = prompt.input().chars().take(prompt.cursor()).collect();
        let column = (label.width() + typed.width()).min(width.saturating_sub(1));
        let line = window_line(
            Line::from(vec![
                Span::styled(label, palette.prompt()),
                Span::raw(prompt.input().to_string()),
            ]),
            0,
            width,
        );
        let column = u16::try_from(column).unwrap_or(u16::MAX);
        return (line, Some((column, 1)));
    }

    let line = match state.status().current() {
        Some(message) => Line::styled(
            truncate(&message.text, width),
            palette.status(message.kind),
        ),
        None => Line::default(),
    };
    (line, None)
}

fn rule(width: usize, palette: Palette) -> Line<'static> {
    Line::styled("─".repeat(width), palette.dim())
}

/// Footer text: position, pagination hint and key help.
pub fn footer_text(state: &SessionState, height: usize) -> String {
    let len = state.entries().len();
    let mut parts = Vec::new();

    if len == 0 {
        parts.push("No entries".to_string());
    } else {
        let current = state.selected() + 1;
        let mut position = format!("Entry {current}/{len}");
        if len > height {
            position.push_str(&format!(" [{}%]", current * 100 / len));
        }
        parts.push(position);
    }
    if state.pagination().can_fetch() {
        parts.push("More available (will auto-load)".to_string());
    }
    parts.push("/: search".to_string());
    if state.search().is_active() {
        parts.push("Esc: clear search".to_string());
    } else {
        parts.push("f: date filter".to_string());
    }
    parts.push("Space: expand".to_string());
    parts.push("q: quit".to_string());
    parts.join(" | ")
}

// ===== Content =====

fn content_lines(
    state: &SessionState,
    height: usize,
    width: usize,
    palette: Palette,
) -> Vec<Line<'static>> {
    let entries = state.entries();
    let mut rows = Vec::with_capacity(height);

    if entries.is_empty() {
        rows.push(Line::styled(
            truncate(&placeholder_text(state), width),
            palette.dim(),
        ));
    } else {
        let selected = state.selected();
        let window = visible_window(selected, entries.len(), height);
        let start = first_visible(state, window.start, selected, height);

        for (index, entry) in entries.as_slice().iter().enumerate().skip(start) {
            if rows.len() >= height {
                break;
            }
            let remaining = height - rows.len();
            rows.extend(entry_lines(state, index, entry, remaining, width, palette));
        }
    }

    rows.resize(height, Line::default());
    rows
}

fn placeholder_text(state: &SessionState) -> String {
    let query = state
        .search()
        .query()
        .map(|q| q.as_str().to_string())
        .unwrap_or_default();
    match (state.mode(), state.search().phase()) {
        (SessionMode::Searching, SearchPhase::Pending) => format!("Searching for '{query}'..."),
        (SessionMode::Searching, _) => {
            format!("No matches for '{query}'. Press Esc to return.")
        }
        _ => "No log entries to display.".to_string(),
    }
}

/// Pull the window start forward until expanded entries above the selection
/// no longer push it off-screen.
fn first_visible(state: &SessionState, start: usize, selected: usize, height: usize) -> usize {
    let mut start = start;
    while start < selected {
        let above: usize = (start..selected).map(|i| entry_rows(state, i)).sum();
        if above < height {
            break;
        }
        start += 1;
    }
    start
}

/// Rows entry `index` occupies when nothing clips it.
fn entry_rows(state: &SessionState, index: usize) -> usize {
    if !state.views().is_expanded(index) {
        return 1;
    }
    let Some(entry) = state.entries().get(index) else {
        return 1;
    };
    let total = entry.pretty_lines().len().max(1);
    let scroll = state.views().get(index).vertical_scroll.min(total - 1);
    total - scroll + usize::from(scroll > 0)
}

fn entry_lines(
    state: &SessionState,
    index: usize,
    entry: &EntryDocument,
    budget: usize,
    width: usize,
    palette: Palette,
) -> Vec<Line<'static>> {
    let is_selected = index == state.selected();
    let marker = if is_selected {
        Span::styled(SELECTION_MARKER, palette.marker())
    } else {
        Span::raw(NO_MARKER)
    };

    if !state.views().is_expanded(index) {
        let offset = if is_selected { state.row_hscroll() } else { 0 };
        let mut line = collapsed_line(entry, palette);
        line.spans.insert(0, marker);
        return vec![window_line(line, offset, width)];
    }

    let view = state.views().get(index);
    let json = entry.pretty_lines();
    let total = json.len().max(1);
    let scroll = view.vertical_scroll.min(total - 1);

    let mut lines = Vec::new();
    let mut marker = Some(marker);
    for text in json.iter().skip(scroll).take(budget) {
        let prefix = marker.take().unwrap_or_else(|| Span::raw(NO_MARKER));
        let line = Line::from(vec![prefix, Span::raw(text.clone())]);
        lines.push(window_line(line, view.horizontal_scroll, width));
    }

    let shown = lines.len();
    let clipped = scroll > 0 || scroll + shown < json.len();
    if clipped && lines.len() < budget {
        let indicator = format!("  [Lines {}-{} of {}]", scroll + 1, scroll + shown, json.len());
        lines.push(Line::styled(truncate(&indicator, width), palette.dim()));
    }
    lines
}

// ===== Horizontal windowing =====

/// Show `width` columns of `line` starting at `offset`.
///
/// Lines that fit are returned unchanged. Otherwise the offset is clamped, and
/// `<` / `>` replace the first / last visible cell when content is hidden on
/// that side.
pub fn window_line(line: Line<'static>, offset: usize, width: usize) -> Line<'static> {
    let total = line.width();
    if total <= width {
        return line;
    }
    let offset = clamp_hscroll(offset, total, width);
    let end = offset + width;

    let mut cells: Vec<(char, Style)> = Vec::with_capacity(width);
    let mut column = 0;
    for span in &line.spans {
        for ch in span.content.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if column >= offset && column + ch_width <= end {
                cells.push((ch, span.style));
            }
            column += ch_width;
        }
    }

    if cells.len() > 2 {
        if offset > 0 {
            cells[0].0 = '<';
        }
        if end < total {
            if let Some(last) = cells.last_mut() {
                last.0 = '>';
            }
        }
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = cells.first().map(|(_, style)| *style).unwrap_or_default();
    for (ch, style) in cells {
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans).style(line.style)
}

/// Cut `text` to `width` columns, ending in `...` when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width - 3 {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out.push_str("...");
    out
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
