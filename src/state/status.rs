//! Transient status line.

/// Identity of one status message, used to clear only what a timer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusId(u64);

/// How a status message is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Informational result.
    Info,
    /// Work in progress.
    Progress,
    /// Something failed.
    Error,
}

/// A message shown on the status row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Identity of this message.
    pub id: StatusId,
    /// Text to show.
    pub text: String,
    /// Styling class.
    pub kind: StatusKind,
}

/// Holder of the current status message.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    current: Option<StatusMessage>,
    next_id: u64,
}

impl StatusLine {
    /// Replace the current message. Returns its id.
    pub fn set(&mut self, text: impl Into<String>, kind: StatusKind) -> StatusId {
        self.next_id += 1;
        let id = StatusId(self.next_id);
        self.current = Some(StatusMessage {
            id,
            text: text.into(),
            kind,
        });
        id
    }

    /// Clear the message only if it is still `id`. Returns whether it was cleared.
    pub fn clear_if(&mut self, id: StatusId) -> bool {
        if self.current.as_ref().is_some_and(|msg| msg.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// The current message, if any.
    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }
}
