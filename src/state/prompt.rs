//! Line prompts for search and date-filter input (pure state transitions).
//!
//! A prompt replaces the status row while open. Keys are routed here instead
//! of the normal bindings until Enter or Esc.

/// Which question the prompt is asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Search query.
    Search,
    /// First half of the date filter.
    DateStart,
    /// Second half of the date filter, remembering the start.
    DateEnd {
        /// Start spec entered in the previous step.
        start: String,
    },
}

/// An open prompt: what is asked, the text typed so far, and the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    kind: PromptKind,
    input: String,
    /// Caret position in characters.
    cursor: usize,
}

/// What submitting a prompt asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSubmit {
    /// Run (or clear, if blank) a search.
    Search(String),
    /// Ask the next question.
    Next(Prompt),
    /// Reload with the given start and end specs.
    DateRange {
        /// Start spec.
        start: String,
        /// End spec.
        end: String,
    },
}

impl Prompt {
    /// Empty search prompt.
    pub fn search() -> Self {
        Self::with_kind(PromptKind::Search)
    }

    /// Empty start-time prompt.
    pub fn date_start() -> Self {
        Self::with_kind(PromptKind::DateStart)
    }

    fn with_kind(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
            cursor: 0,
        }
    }

    /// The question being asked.
    pub fn kind(&self) -> &PromptKind {
        &self.kind
    }

    /// Label shown before the input.
    pub fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::Search => "Search: ",
            PromptKind::DateStart => "Start time: ",
            PromptKind::DateEnd { .. } => "End time (optional): ",
        }
    }

    /// Usage hint shown in the header while a date prompt is open.
    pub fn hint(&self) -> Option<&'static str> {
        match self.kind {
            PromptKind::Search => None,
            PromptKind::DateStart | PromptKind::DateEnd { .. } => Some(
                "Time examples: -1h, -30m, -2d, now, 2025-01-15, 2025-01-15 14:30 (blank: no limit)",
            ),
        }
    }

    /// Text typed so far.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Caret position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map_or(self.input.len(), |(offset, _)| offset)
    }

    /// Insert `ch` at the caret.
    pub fn insert(&mut self, ch: char) {
        let offset = self.byte_offset(self.cursor);
        self.input.insert(offset, ch);
        self.cursor += 1;
    }

    /// Delete the character before the caret.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let offset = self.byte_offset(self.cursor - 1);
        self.input.remove(offset);
        self.cursor -= 1;
    }

    /// Move the caret left, stopping at 0.
    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the caret right, stopping at the end.
    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    /// Finish this prompt.
    pub fn submit(self) -> PromptSubmit {
        match self.kind {
            PromptKind::Search => PromptSubmit::Search(self.input),
            PromptKind::DateStart => PromptSubmit::Next(Self::with_kind(PromptKind::DateEnd {
                start: self.input,
            })),
            PromptKind::DateEnd { start } => PromptSubmit::DateRange {
                start,
                end: self.input,
            },
        }
    }
}
