//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Service used when neither the config file nor the CLI names one.
pub const DEFAULT_BASE_URL: &str = "https://app.tailstream.io";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permissions, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/tailview/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Base URL of the log service.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token for the log service.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Stream preselected in the picker shown when `--stream-id` is not given.
    #[serde(default)]
    pub default_stream: Option<String>,

    /// Entries requested per page.
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Sort direction, `asc` or `desc`.
    #[serde(default)]
    pub direction: Option<String>,

    /// HTTP timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Disable colors.
    #[serde(default)]
    pub no_color: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Base URL of the log service.
    pub base_url: String,
    /// Bearer token, if any source provided one.
    pub access_token: Option<String>,
    /// Stream to open, when chosen on the command line.
    pub stream_id: Option<String>,
    /// Stream offered as the default when picking one interactively.
    pub default_stream: Option<String>,
    /// Entries requested per page.
    pub per_page: u32,
    /// Sort direction.
    pub direction: String,
    /// HTTP timeout.
    pub timeout: Duration,
    /// Disable colors.
    pub no_color: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

// Tokens must never end up in the trace log.
impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("stream_id", &self.stream_id)
            .field("default_stream", &self.default_stream)
            .field("per_page", &self.per_page)
            .field("direction", &self.direction)
            .field("timeout", &self.timeout)
            .field("no_color", &self.no_color)
            .field("log_file_path", &self.log_file_path)
            .finish()
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            stream_id: None,
            default_stream: None,
            per_page: 200,
            direction: "desc".to_string(),
            timeout: Duration::from_secs(15),
            no_color: false,
            log_file_path: default_log_path(),
        }
    }
}

/// CLI values that take precedence over every other source.
///
/// `None` means the flag was not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--base-url`
    pub base_url: Option<String>,
    /// `--token`
    pub token: Option<String>,
    /// `--stream-id`
    pub stream_id: Option<String>,
    /// `--per-page`
    pub per_page: Option<u32>,
    /// `--sort`
    pub direction: Option<String>,
    /// `--timeout` (seconds)
    pub timeout_secs: Option<u64>,
    /// `--no-color` (only `Some(true)` when the flag is present)
    pub no_color: Option<bool>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/tailview/tailview.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("tailview").join("tailview.log")
    } else {
        PathBuf::from("tailview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/tailview/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tailview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `TAILVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/tailview/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("TAILVIEW_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        base_url: config.base_url.unwrap_or(defaults.base_url),
        access_token: config.access_token.or(defaults.access_token),
        stream_id: defaults.stream_id,
        default_stream: config.default_stream.or(defaults.default_stream),
        per_page: config.per_page.unwrap_or(defaults.per_page),
        direction: config.direction.unwrap_or(defaults.direction),
        timeout: config
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout),
        no_color: config.no_color.unwrap_or(defaults.no_color),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `TAILVIEW_BASE_URL`: Override base URL
/// - `TAILVIEW_TOKEN`: Override access token
/// - `NO_COLOR`: Any value disables colors
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(base_url) = std::env::var("TAILVIEW_BASE_URL") {
        config.base_url = base_url;
    }

    if let Ok(token) = std::env::var("TAILVIEW_TOKEN") {
        config.access_token = Some(token);
    }

    if std::env::var_os("NO_COLOR").is_some() {
        config.no_color = true;
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(token) = cli.token {
        config.access_token = Some(token);
    }
    if let Some(stream_id) = cli.stream_id {
        config.stream_id = Some(stream_id);
    }
    if let Some(per_page) = cli.per_page {
        config.per_page = per_page;
    }
    if let Some(direction) = cli.direction {
        config.direction = direction;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(no_color) = cli.no_color {
        config.no_color = no_color;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
