//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps decoded keyboard events to domain actions.
///
/// Provides less(1)/vim-style defaults. Printable keys are decoded without
/// modifiers, so upper-case letters are bound by their character alone.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }

    /// Bind (or rebind) a key.
    pub fn bind(&mut self, key: KeyEvent, action: KeyAction) {
        self.bindings.insert(key, action);
    }

    fn bind_char(&mut self, ch: char, action: KeyAction) {
        self.bind(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE), action);
    }

    fn bind_code(&mut self, code: KeyCode, action: KeyAction) {
        self.bind(KeyEvent::new(code, KeyModifiers::NONE), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: HashMap::new(),
        };

        // Application
        keys.bind_char('q', KeyAction::Quit);
        keys.bind_char('Q', KeyAction::Quit);
        keys.bind(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyAction::Quit,
        );

        // Line navigation
        keys.bind_char('j', KeyAction::ScrollDown);
        keys.bind_char('k', KeyAction::ScrollUp);
        keys.bind_code(KeyCode::Down, KeyAction::ScrollDown);
        keys.bind_code(KeyCode::Up, KeyAction::ScrollUp);
        keys.bind_code(KeyCode::Left, KeyAction::ScrollLeft);
        keys.bind_code(KeyCode::Right, KeyAction::ScrollRight);

        // Page navigation
        keys.bind_char('d', KeyAction::PageDown);
        keys.bind_char('D', KeyAction::PageDown);
        keys.bind_char('u', KeyAction::PageUp);
        keys.bind_char('U', KeyAction::PageUp);
        keys.bind_code(KeyCode::PageDown, KeyAction::PageDown);
        keys.bind_code(KeyCode::PageUp, KeyAction::PageUp);
        keys.bind_char('g', KeyAction::ScrollToTop);
        keys.bind_char('G', KeyAction::ScrollToBottom);
        keys.bind_code(KeyCode::Home, KeyAction::ScrollToTop);
        keys.bind_code(KeyCode::End, KeyAction::ScrollToBottom);

        // Entry interaction
        keys.bind_char(' ', KeyAction::ToggleExpand);
        keys.bind_code(KeyCode::Enter, KeyAction::ToggleExpand);

        // Search and filtering
        keys.bind_char('/', KeyAction::StartSearch);
        keys.bind_char('f', KeyAction::StartDateFilter);
        keys.bind_char('F', KeyAction::StartDateFilter);
        keys.bind_char('n', KeyAction::NextMatch);
        keys.bind_char('N', KeyAction::PrevMatch);
        keys.bind_code(KeyCode::Esc, KeyAction::CancelSearch);

        keys
    }
}
