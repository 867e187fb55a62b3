//! Note domain entities.

pub mod model;
pub mod share;
pub mod status;

pub use model::{CreateNote, Note};
pub use share::NoteShare;
pub use status::NoteStatus;
