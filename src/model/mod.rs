//! Domain model types (pure).
//!
//! All types in this module are plain data with smart constructors.

pub mod document;
pub mod error;
pub mod key_action;
pub mod page;

// Re-export for convenience
pub use document::{EntryDocument, FieldValue, Summary};
pub use error::{AppError, FetchError, TimeSpecError};
pub use key_action::KeyAction;
pub use page::{Cursor, Page, SearchQuery, TimeRange};
