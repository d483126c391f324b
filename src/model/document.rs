//! Opaque structured log documents.
//!
//! The remote service returns each log line as an arbitrary JSON object. The
//! viewer treats it as an opaque tree of [`FieldValue`]s and only reaches into
//! a handful of well-known display fields (message, timestamp, level).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Candidate keys for the human-readable message, first present wins.
pub const MESSAGE_KEYS: [&str; 5] = ["raw_message", "message", "msg", "body", "description"];

/// Candidate keys for the entry timestamp, first present wins.
pub const TIMESTAMP_KEYS: [&str; 5] = ["timestamp", "time", "created_at", "datetime", "logged_at"];

// ===== FieldValue =====

/// A single value inside an [`EntryDocument`].
///
/// Sum type over everything a JSON document can hold, so field extraction can
/// pattern-match instead of probing a dynamically typed map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number (integer or float, preserved as received).
    Number(serde_json::Number),
    /// JSON string.
    String(String),
    /// JSON array.
    List(Vec<FieldValue>),
    /// Nested JSON object.
    Document(EntryDocument),
}

impl FieldValue {
    /// Render the value as display text.
    ///
    /// Strings are returned verbatim, integral numbers drop their fractional
    /// part, `null` is empty, and lists/documents become compact JSON.
    pub fn display_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::String(s) => s.clone(),
            FieldValue::Number(n) => number_text(n),
            FieldValue::List(_) | FieldValue::Document(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    /// Borrow the nested document, if this value is one.
    pub fn as_document(&self) -> Option<&EntryDocument> {
        match self {
            FieldValue::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        Some(f) => format!("{f:.6}"),
        None => n.to_string(),
    }
}

// ===== Summary =====

/// One-line summary of an entry, every part already flattened to one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// A non-empty `raw_message`, shown whole.
    Raw {
        /// The message.
        text: String,
        /// Level, used only for color.
        level: Option<String>,
    },
    /// `timestamp LEVEL message`; at least one part is present.
    Fields {
        /// Timestamp as sent.
        timestamp: Option<String>,
        /// Upper-cased level.
        level: Option<String>,
        /// Message text.
        message: Option<String>,
    },
    /// None of the display fields exist: compact JSON.
    Json(String),
}

impl Summary {
    /// Plain text, parts joined by single spaces.
    pub fn text(&self) -> String {
        match self {
            Summary::Raw { text, .. } | Summary::Json(text) => text.clone(),
            Summary::Fields {
                timestamp,
                level,
                message,
            } => [timestamp, level, message]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Replace line breaks and tabs so a value occupies exactly one row.
fn single_line(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect()
}

// ===== EntryDocument =====

/// One log entry as returned by the remote service.
///
/// Immutable once fetched. Keys are kept sorted so pretty-printing is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryDocument {
    fields: BTreeMap<String, FieldValue>,
}

impl EntryDocument {
    /// Build a document from already-typed fields.
    pub fn from_fields(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    /// Parse a document from a JSON value. Returns `None` unless it is an object.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First non-empty display text among `keys`, also trying each key lower-cased.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| {
            self.non_empty_text(key)
                .or_else(|| self.non_empty_text(&key.to_lowercase()))
        })
    }

    fn non_empty_text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(FieldValue::display_text)
            .filter(|text| !text.is_empty())
    }

    /// The `raw_message` field when it is a non-empty string.
    ///
    /// Raw messages are already formatted log lines and are shown as-is.
    pub fn raw_message(&self) -> Option<&str> {
        match self.get("raw_message") {
            Some(FieldValue::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Human-readable message text.
    pub fn message_text(&self) -> Option<String> {
        self.first_text(&MESSAGE_KEYS)
    }

    /// Timestamp text as sent by the server (not parsed).
    pub fn timestamp_text(&self) -> Option<String> {
        self.first_text(&TIMESTAMP_KEYS)
    }

    /// Upper-cased severity level from `fields.level`, falling back to top-level `level`.
    pub fn level(&self) -> Option<String> {
        let nested = self
            .get("fields")
            .and_then(FieldValue::as_document)
            .and_then(|fields| fields.get("level"))
            .map(FieldValue::display_text);

        nested
            .or_else(|| self.first_text(&["level", "LEVEL"]))
            .map(|level| level.to_uppercase())
            .filter(|level| !level.is_empty())
    }

    /// One-line summary used for collapsed rows.
    pub fn summary(&self) -> Summary {
        let level = self.level();
        if let Some(raw) = self.raw_message() {
            return Summary::Raw {
                text: single_line(raw),
                level,
            };
        }

        let timestamp = self.timestamp_text().map(|t| single_line(&t));
        let message = self.message_text().map(|m| single_line(&m));
        if timestamp.is_none() && level.is_none() && message.is_none() {
            return Summary::Json(self.to_compact_json());
        }
        Summary::Fields {
            timestamp,
            level,
            message,
        }
    }

    /// Compact single-line JSON rendering.
    pub fn to_compact_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Pretty-printed JSON, one element per line, two-space indent.
    pub fn pretty_lines(&self) -> Vec<String> {
        serde_json::to_string_pretty(self)
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}
