//! Error types for tailview.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - top-level error returned from startup and the viewer loop
//!   - [`FetchError`] - a request to the log service failed
//!   - [`TimeSpecError`] - a flexible time specification could not be resolved
//!   - [`ConfigError`](crate::config::ConfigError) and
//!     [`LoggingError`](crate::logging::LoggingError)
//!   - `std::io::Error` - terminal failures
//!
//! # Recovery Strategy
//!
//! Failures of background loads (pagination, search, date-filter reload) are
//! **non-fatal**: they surface as a transient status line and leave the session
//! untouched so the next trigger can retry. Only failures before the viewer
//! starts (configuration, initial query) propagate out of `main`.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The initial query failed.
    #[error("Failed to fetch logs: {0}")]
    Fetch(#[from] FetchError),

    /// A `--from`/`--to` value was not a valid time specification.
    #[error(transparent)]
    TimeSpec(#[from] TimeSpecError),

    /// No access token was configured.
    #[error("No authentication found: pass --token or set access_token in the config file")]
    MissingToken,

    /// The account has no streams to pick from.
    #[error("No streams found. Please create a stream first at {0}")]
    NoStreams(String),

    /// The stream picker answer was not a listed number.
    #[error("Invalid selection")]
    InvalidSelection,

    /// Stdin/stdout are not attached to a terminal.
    #[error("The interactive viewer requires a terminal")]
    NotATerminal,

    /// Terminal I/O failed.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// A request to the remote log service failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("request failed: {status}")]
    Status {
        /// HTTP status code and reason, e.g. `503 Service Unavailable`.
        status: String,
        /// Response body, trimmed.
        body: String,
    },

    /// The configured base URL cannot carry a request path.
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),

    /// The body was not the expected JSON shape.
    #[error("parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A flexible time specification could not be resolved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeSpecError {
    /// A `-<n><unit>` value was malformed.
    #[error("invalid relative duration {0:?}")]
    InvalidDuration(String),

    /// The value matched none of the accepted layouts.
    #[error("could not parse time value {0:?}")]
    Unrecognized(String),
}
