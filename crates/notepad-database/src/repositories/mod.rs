//! PostgreSQL implementations of the storage traits.

pub mod file;
pub mod folder;
pub mod note;
pub mod notification;
pub mod preference;
pub mod share;
pub mod token;
pub mod user;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use note::NoteRepository;
pub use notification::NotificationRepository;
pub use preference::PreferenceRepository;
pub use share::ShareRepository;
pub use token::TokenRepository;
pub use user::UserRepository;
