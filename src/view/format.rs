//! One-line summaries of log entries.

use ratatui::text::{Line, Span};

use crate::model::{EntryDocument, Summary};
use crate::view::styles::Palette;

/// Prefix of the selected row, [`ROW_PREFIX_WIDTH`](crate::state::viewport::ROW_PREFIX_WIDTH) wide.
pub const SELECTION_MARKER: &str = "▶ ";

/// Prefix of every other row.
pub const NO_MARKER: &str = "  ";

/// Collapsed rendering of `entry`, without the selection prefix.
///
/// Styles the parts of [`EntryDocument::summary`]: a raw message is colored by
/// level, otherwise the timestamp and level get their own colors.
pub fn collapsed_line(entry: &EntryDocument, palette: Palette) -> Line<'static> {
    match entry.summary() {
        Summary::Raw { text, level } => {
            let style = level
                .as_deref()
                .map(|level| palette.level(level))
                .unwrap_or_default();
            Line::from(Span::styled(text, style))
        }
        Summary::Fields {
            timestamp,
            level,
            message,
        } => {
            let mut spans = Vec::new();
            if let Some(timestamp) = timestamp {
                spans.push(Span::styled(timestamp, palette.timestamp()));
            }
            if let Some(level) = level {
                let style = palette.level(&level);
                push_separated(&mut spans, Span::styled(level, style));
            }
            if let Some(message) = message {
                push_separated(&mut spans, Span::raw(message));
            }
            Line::from(spans)
        }
        Summary::Json(json) => Line::from(json),
    }
}

/// Concatenated content of a line's spans.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn push_separated(spans: &mut Vec<Span<'static>>, span: Span<'static>) {
    if !spans.is_empty() {
        spans.push(Span::raw(" "));
    }
    spans.push(span);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> EntryDocument {
        EntryDocument::from_json(value).expect("object")
    }

    #[test]
    fn level_span_is_colored() {
        let entry = doc(json!({"level": "error", "message": "boom"}));
        let line = collapsed_line(&entry, Palette::default());
        assert_eq!(line.spans[0].content, "ERROR");
        assert_eq!(line.spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn raw_message_is_shown_whole() {
        let entry = doc(json!({
            "raw_message": "127.0.0.1 GET /health 200",
            "timestamp": "ignored",
            "fields": {"level": "info"}
        }));
        let line = collapsed_line(&entry, Palette::default());
        assert_eq!(line_text(&line), "127.0.0.1 GET /health 200");
        assert_eq!(line.spans[0].style.fg, Some(Color::Cyan));
    }

    #[test]
    fn raw_message_without_level_is_unstyled() {
        let entry = doc(json!({"raw_message": "plain"}));
        let line = collapsed_line(&entry, Palette::default());
        assert_eq!(line.spans[0].style.fg, None);
    }

    #[test]
    fn plain_line_matches_summary_text() {
        let entry = doc(json!({
            "timestamp": "2025-01-01T10:00:00Z",
            "level": "warn",
            "message": "disk almost\nfull"
        }));
        let line = collapsed_line(&entry, Palette::plain());
        assert_eq!(line_text(&line), entry.summary().text());
        assert_eq!(line_text(&line), "2025-01-01T10:00:00Z WARN disk almost full");
    }

    #[test]
    fn markers_fill_the_prefix_column() {
        use crate::state::viewport::ROW_PREFIX_WIDTH;
        use unicode_width::UnicodeWidthStr;

        assert_eq!(SELECTION_MARKER.width(), ROW_PREFIX_WIDTH);
        assert_eq!(NO_MARKER.width(), ROW_PREFIX_WIDTH);
    }
}
