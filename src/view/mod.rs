//! Terminal UI (impure shell).
//!
//! [`ViewerApp`] owns the session state and is its only writer. Keys, fetch
//! results, status timers and resizes all arrive as [`AppEvent`]s on one
//! channel; the app applies each, launches whatever work the state queued,
//! and redraws.

pub mod format;
pub mod renderer;
pub mod styles;
pub mod terminal;

pub use renderer::{render_frame, RenderedFrame};
pub use styles::{ColorConfig, Palette};

use std::io::{self, IsTerminal};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;
use ratatui::{Terminal, TerminalOptions, Viewport};
use tracing::{debug, info};

use crate::config::KeyBindings;
use crate::model::AppError;
use crate::source::LogSource;
use crate::state::fetch::{self, Command, FetchOutcome, FetchRequest};
use crate::state::{handle_key, Flow, SessionState, StatusId, TermSize};
use terminal::{spawn_input_reader, terminal_size, TerminalGuard};

/// How often the loop re-checks the terminal size when nothing happens.
const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Everything the event loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    /// A decoded key press.
    Key(KeyEvent),
    /// A background fetch finished.
    Fetched(FetchOutcome),
    /// A status timer fired.
    ClearStatus(StatusId),
    /// The terminal was resized.
    Resize,
    /// Stdin reached end of input.
    InputClosed,
}

/// Main viewer application.
///
/// Generic over backend to support testing with TestBackend.
pub struct ViewerApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    state: SessionState,
    key_bindings: KeyBindings,
    palette: Palette,
    source: Arc<dyn LogSource>,
    events: Sender<AppEvent>,
    size: TermSize,
    drawn_size: Option<TermSize>,
}

impl<B> ViewerApp<B>
where
    B: Backend,
{
    /// Assemble an app around an already-initialized terminal.
    pub fn new(
        terminal: Terminal<B>,
        state: SessionState,
        source: Arc<dyn LogSource>,
        palette: Palette,
        events: Sender<AppEvent>,
        size: TermSize,
    ) -> Self {
        Self {
            terminal,
            state,
            key_bindings: KeyBindings::default(),
            palette,
            source,
            events,
            size,
            drawn_size: None,
        }
    }

    /// Session state (read-only).
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Terminal (read-only), for inspecting the backend.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Apply one event to the session.
    pub fn handle_event(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Key(key) => {
                let viewport = self.size.viewport();
                return handle_key(&mut self.state, &self.key_bindings, key, viewport);
            }
            AppEvent::Fetched(outcome) => self.state.apply_fetch(outcome),
            AppEvent::ClearStatus(id) => self.state.clear_status(id),
            AppEvent::Resize => self.resize(terminal_size()),
            AppEvent::InputClosed => {
                info!("Input closed, exiting");
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Record a new terminal size; the next draw adapts to it.
    pub fn resize(&mut self, size: TermSize) {
        if size != self.size {
            debug!(rows = size.rows, cols = size.cols, "Terminal resized");
            self.size = size;
        }
    }

    /// Launch the work the session queued: fetch threads and status timers.
    pub fn dispatch_commands(&mut self) {
        for command in self.state.take_commands() {
            match command {
                Command::Fetch(request) => self.spawn_fetch(request),
                Command::ClearStatusAfter { id, delay } => {
                    let events = self.events.clone();
                    thread::spawn(move || {
                        thread::sleep(delay);
                        let _ = events.send(AppEvent::ClearStatus(id));
                    });
                }
            }
        }
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        debug!(stream = ?request.ticket.stream, "Spawning fetch");
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        thread::spawn(move || {
            let outcome = fetch::execute(source.as_ref(), request);
            let _ = events.send(AppEvent::Fetched(outcome));
        });
    }

    /// Render the current state.
    pub fn draw(&mut self) -> io::Result<()> {
        let size = self.size;
        if self.drawn_size.is_some_and(|drawn| drawn != size) {
            self.terminal
                .resize(Rect::new(0, 0, size.cols, size.rows))?;
        }
        self.drawn_size = Some(size);

        let frame = render_frame(&self.state, size, self.palette);
        self.terminal.draw(|f| {
            let area = f.area();
            f.render_widget(Paragraph::new(frame.lines), area);
            if let Some(position) = frame.cursor {
                f.set_cursor_position(position);
            }
        })?;
        Ok(())
    }
}

/// Run the interactive viewer until the user quits.
///
/// Logging must be initialized by the caller. The terminal is restored on
/// every exit path, including errors and panics.
///
/// # Errors
///
/// `AppError::NotATerminal` when stdin or stdout is not a terminal;
/// `AppError::Terminal` for terminal I/O failures.
pub fn run_viewer(
    state: SessionState,
    source: Arc<dyn LogSource>,
    palette: Palette,
) -> Result<(), AppError> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(AppError::NotATerminal);
    }

    let guard = TerminalGuard::acquire()?;
    let (events, inbox) = mpsc::channel();
    #[cfg(unix)]
    let signals = terminal::SignalGuard::install(events.clone())?;
    spawn_input_reader(events.clone());

    let size = terminal_size();
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Fixed(Rect::new(0, 0, size.cols, size.rows)),
        },
    )?;
    let mut app = ViewerApp::new(terminal, state, source, palette, events, size);
    info!(rows = size.rows, cols = size.cols, "Viewer started");

    app.draw()?;
    loop {
        let event = match inbox.recv_timeout(TICK_INTERVAL) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => AppEvent::Resize,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        if app.handle_event(event) == Flow::Quit {
            break;
        }
        app.dispatch_commands();
        app.draw()?;
    }

    info!("Viewer stopped");
    #[cfg(unix)]
    drop(signals);
    drop(guard);
    Ok(())
}

#[cfg(test)]
#[path = "viewer_tests.rs"]
mod tests;
