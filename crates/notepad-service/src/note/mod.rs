//! Note lifecycle: CRUD, sharing, publishing, and status changes.

pub mod service;
pub mod view;

pub use service::{NoteService, NoteUpdate, ShareOutcome};
pub use view::FormattedNote;
