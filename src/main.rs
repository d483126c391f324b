//! tailview - Entry Point

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tailview::config::{CliOverrides, ResolvedConfig};
use tailview::model::AppError;
use tailview::source::{streams, time_spec, HttpSource, HttpSourceConfig, LogSource};
use tailview::state::{DateFilterState, SessionState};
use tailview::view::{ColorConfig, Palette};
use tracing::{error, info};

/// tailview - interactive terminal viewer for remote log streams
#[derive(Parser, Debug)]
#[command(name = "tailview")]
#[command(version)]
#[command(about = "Browse, search and date-filter a paginated remote log stream")]
pub struct Args {
    /// Service base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Access token (bearer)
    #[arg(long)]
    pub token: Option<String>,

    /// Stream to view (prompts with a list of your streams when omitted)
    #[arg(long)]
    pub stream_id: Option<String>,

    /// Start of the time range (e.g. -1h, now, 2025-01-15, 2025-01-15 14:30)
    #[arg(long, allow_hyphen_values = true)]
    pub from: Option<String>,

    /// End of the time range
    #[arg(long, allow_hyphen_values = true)]
    pub to: Option<String>,

    /// Entries per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub per_page: Option<u32>,

    /// Sort direction
    #[arg(long, value_parser = ["asc", "desc"])]
    pub sort: Option<String>,

    /// Only show entries with this level (repeatable)
    #[arg(long = "level")]
    pub levels: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            stream_id: self.stream_id.clone(),
            per_page: self.per_page,
            direction: self.sort.clone(),
            timeout_secs: self.timeout,
            no_color: self.no_color.then_some(true),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = tailview::config::load_config_with_precedence(args.config.clone())?;
        let merged = tailview::config::merge_config(config_file);
        let with_env = tailview::config::apply_env_overrides(merged);
        tailview::config::apply_cli_overrides(with_env, args.overrides())
    };

    tailview::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let token = config.access_token.clone().ok_or(AppError::MissingToken)?;
    let stream_id = match config.stream_id.clone() {
        Some(stream_id) => stream_id,
        None => select_stream(&config, &token)?,
    };
    let from = args.from.clone().unwrap_or_default();
    let to = args.to.clone().unwrap_or_default();
    let range = time_spec::resolve_range(&from, &to).map_err(AppError::from)?;

    let source = HttpSource::new(HttpSourceConfig {
        base_url: config.base_url.clone(),
        token,
        stream_id,
        per_page: config.per_page,
        direction: config.direction.clone(),
        levels: args.levels.clone(),
        range,
        timeout: config.timeout,
    })
    .map_err(AppError::from)?;

    eprintln!("Fetching logs...");
    let first_page = source.fetch(None, None).map_err(|err| {
        error!(error = %err, "Initial fetch failed");
        AppError::from(err)
    })?;
    info!(
        count = first_page.len(),
        has_more = first_page.has_more,
        "Initial page loaded"
    );

    if first_page.is_empty() {
        println!("No logs matched your filters.");
        return Ok(());
    }

    let state =
        SessionState::new(first_page).with_date_filter(DateFilterState::from_specs(&from, &to));
    let palette = Palette::new(ColorConfig::from_env_and_args(config.no_color));

    tailview::view::run_viewer(state, Arc::new(source), palette)?;

    Ok(())
}

/// Ask which stream to open, offering the configured default.
fn select_stream(config: &ResolvedConfig, token: &str) -> Result<String, AppError> {
    println!("Fetching your streams...");
    let available = HttpSource::list_streams(&config.base_url, token, config.timeout)?;
    if available.is_empty() {
        return Err(AppError::NoStreams(config.base_url.clone()));
    }
    let default = streams::default_index(&available, config.default_stream.as_deref());

    let mut stdout = io::stdout().lock();
    writeln!(stdout)?;
    writeln!(stdout, "Available streams:")?;
    for line in streams::menu_lines(&available, default) {
        writeln!(stdout, "{line}")?;
    }
    writeln!(stdout)?;
    write!(stdout, "{}", streams::prompt_text(default))?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let index = streams::parse_selection(&answer, available.len(), default)
        .ok_or(AppError::InvalidSelection)?;
    let chosen = &available[index];

    if answer.trim().is_empty() {
        writeln!(stdout, "Using default: {}", chosen.name)?;
    } else {
        writeln!(stdout, "Selected: {}", chosen.name)?;
    }
    writeln!(stdout)?;
    info!(stream_id = %chosen.stream_id, "Stream selected");
    Ok(chosen.stream_id.clone())
}
