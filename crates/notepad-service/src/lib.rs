//! # notepad-service
//!
//! Business logic for Notepad Plus. Each service receives its stores and
//! collaborators as `Arc`s at construction time and takes a
//! [`RequestContext`] for the acting user.

pub mod auth;
pub mod context;
pub mod drive;
pub mod note;
pub mod notification;
pub mod preference;
pub mod user;

pub use auth::{AuthService, AuthSession, RegisterInput};
pub use context::RequestContext;
pub use drive::{
    BlobStore, ByteStream, DriveService, FolderWithFiles, LocalBlobStore, StoredBlob, UploadInput,
};
pub use note::{FormattedNote, NoteService, NoteUpdate, ShareOutcome};
pub use notification::{NoopPusher, NotificationPusher, NotificationService};
pub use preference::PreferenceService;
pub use user::UserService;
