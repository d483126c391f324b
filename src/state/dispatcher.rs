//! Key dispatch: the single entry point from input to state transitions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::config::KeyBindings;
use crate::model::KeyAction;
use crate::state::prompt::PromptSubmit;
use crate::state::viewport::ViewportDimensions;
use crate::state::{date_filter, expand_handler, scroll_handler, search};
use crate::state::{Prompt, SessionState};

/// Whether the event loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep going.
    Continue,
    /// Restore the terminal and exit.
    Quit,
}

/// Handle one key press.
///
/// While a prompt is open every key edits the prompt, except Ctrl+C which
/// always quits.
pub fn handle_key(
    state: &mut SessionState,
    bindings: &KeyBindings,
    key: KeyEvent,
    viewport: ViewportDimensions,
) -> Flow {
    if is_interrupt(key) {
        return Flow::Quit;
    }
    if state.prompt.is_some() {
        handle_prompt_key(state, key);
        return Flow::Continue;
    }
    match bindings.get(key) {
        Some(action) => handle_action(state, action, viewport),
        None => {
            debug!(?key, "Unbound key");
            Flow::Continue
        }
    }
}

fn is_interrupt(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Apply a bound action.
pub fn handle_action(
    state: &mut SessionState,
    action: KeyAction,
    viewport: ViewportDimensions,
) -> Flow {
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::CancelSearch => search::clear(state),
        KeyAction::StartSearch => state.prompt = Some(Prompt::search()),
        KeyAction::StartDateFilter => state.prompt = Some(Prompt::date_start()),
        KeyAction::NextMatch => {
            if state.search().is_active() {
                scroll_handler::select_next(state);
            }
        }
        KeyAction::PrevMatch => {
            if state.search().is_active() {
                scroll_handler::select_previous(state);
            }
        }
        KeyAction::ScrollDown => scroll_handler::scroll_down(state),
        KeyAction::ScrollUp => scroll_handler::scroll_up(state),
        KeyAction::ScrollLeft => scroll_handler::scroll_left(state, viewport),
        KeyAction::ScrollRight => scroll_handler::scroll_right(state, viewport),
        KeyAction::PageDown => scroll_handler::page_down(state, viewport),
        KeyAction::PageUp => scroll_handler::page_up(state, viewport),
        KeyAction::ScrollToTop => scroll_handler::scroll_to_top(state),
        KeyAction::ScrollToBottom => scroll_handler::scroll_to_bottom(state, viewport),
        KeyAction::ToggleExpand => expand_handler::toggle_current(state),
    }
    Flow::Continue
}

fn handle_prompt_key(state: &mut SessionState, key: KeyEvent) {
    let Some(mut prompt) = state.prompt.take() else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            debug!(label = prompt.label(), "Prompt cancelled");
        }
        KeyCode::Enter => submit_prompt(state, prompt),
        KeyCode::Backspace => {
            prompt.backspace();
            state.prompt = Some(prompt);
        }
        KeyCode::Left => {
            prompt.cursor_left();
            state.prompt = Some(prompt);
        }
        KeyCode::Right => {
            prompt.cursor_right();
            state.prompt = Some(prompt);
        }
        KeyCode::Char(ch) if !ch.is_control() => {
            prompt.insert(ch);
            state.prompt = Some(prompt);
        }
        _ => state.prompt = Some(prompt),
    }
}

fn submit_prompt(state: &mut SessionState, prompt: Prompt) {
    match prompt.submit() {
        PromptSubmit::Search(text) => search::submit(state, &text),
        PromptSubmit::Next(next) => state.prompt = Some(next),
        PromptSubmit::DateRange { start, end } => {
            date_filter::request_reload(state, &start, &end);
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
