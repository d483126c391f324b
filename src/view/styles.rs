//! Color palette for entries and chrome.

use ratatui::style::{Color, Modifier, Style};

use crate::state::StatusKind;

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Any `--no-color` flag or `NO_COLOR` value disables colors.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Explicit setting, for tests and callers that already resolved it.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== Palette =====

/// Styles used by the renderer. With colors disabled every style is plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    config: ColorConfig,
}

impl Palette {
    /// Palette honoring `config`.
    pub fn new(config: ColorConfig) -> Self {
        Self { config }
    }

    /// Palette with no styling at all.
    pub fn plain() -> Self {
        Self::new(ColorConfig::new(false))
    }

    fn fg(self, color: Color) -> Style {
        if self.config.colors_enabled() {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }

    /// Color for a severity level (already upper-cased).
    pub fn level(self, level: &str) -> Style {
        let color = match level {
            "ERROR" | "ERR" | "CRITICAL" | "FATAL" => Color::Red,
            "WARN" | "WARNING" => Color::Yellow,
            "INFO" => Color::Cyan,
            "DEBUG" => Color::Magenta,
            "TRACE" => Color::DarkGray,
            _ => Color::White,
        };
        self.fg(color)
    }

    /// Timestamp column.
    pub fn timestamp(self) -> Style {
        self.fg(Color::DarkGray)
    }

    /// Selection marker.
    pub fn marker(self) -> Style {
        if self.config.colors_enabled() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }

    /// Header row.
    pub fn header(self) -> Style {
        if self.config.colors_enabled() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }

    /// Horizontal rules, footer and clipping hints.
    pub fn dim(self) -> Style {
        self.fg(Color::DarkGray)
    }

    /// Status row message.
    pub fn status(self, kind: StatusKind) -> Style {
        match kind {
            StatusKind::Info | StatusKind::Progress => self.fg(Color::Yellow),
            StatusKind::Error => self.fg(Color::Red),
        }
    }

    /// Prompt label.
    pub fn prompt(self) -> Style {
        self.fg(Color::Green)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(ColorConfig::new(true))
    }
}
