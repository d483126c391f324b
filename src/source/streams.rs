//! Stream picker shown before the viewer when no stream was given.
//!
//! Only the listing and choice logic lives here; `main` does the printing and
//! reads the answer.

use serde::Deserialize;

/// One stream the account can read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamSummary {
    /// Numeric database id.
    #[serde(default)]
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Identifier used in log URLs.
    pub stream_id: String,
    /// Free-form description, may be empty.
    #[serde(default)]
    pub description: String,
}

/// Wire shape of `GET /api/user/streams`.
#[derive(Debug, Deserialize)]
pub(crate) struct StreamsResponse {
    #[serde(default)]
    pub(crate) streams: Vec<StreamSummary>,
}

/// Position of the configured default stream in `streams`.
pub fn default_index(streams: &[StreamSummary], default_stream: Option<&str>) -> Option<usize> {
    let default_stream = default_stream?.trim();
    if default_stream.is_empty() {
        return None;
    }
    streams.iter().position(|s| s.stream_id == default_stream)
}

/// Numbered menu, one line per stream: `[1] name (description) (default)`.
///
/// The stream id stands in for an empty description.
pub fn menu_lines(streams: &[StreamSummary], default: Option<usize>) -> Vec<String> {
    streams
        .iter()
        .enumerate()
        .map(|(i, stream)| {
            let description = if stream.description.is_empty() {
                &stream.stream_id
            } else {
                &stream.description
            };
            let marker = if default == Some(i) { " (default)" } else { "" };
            format!("[{}] {} ({description}){marker}", i + 1, stream.name)
        })
        .collect()
}

/// Question printed after the menu.
pub fn prompt_text(default: Option<usize>) -> String {
    match default {
        Some(i) => format!(
            "Select stream (enter number, or press Enter for default [{}]): ",
            i + 1
        ),
        None => "Select stream (enter number): ".to_string(),
    }
}

/// Resolve the typed answer to an index into a list of `count` streams.
///
/// Blank input picks the default; anything else must be a 1-based number in
/// range. Returns `None` for an invalid answer.
pub fn parse_selection(input: &str, count: usize, default: Option<usize>) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return default;
    }
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
}
