//! # notepad-database
//!
//! PostgreSQL connection management, the storage traits used by the
//! service layer, and their two implementations: sqlx repositories and an
//! in-memory database for tests and local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryDatabase;
pub use store::{
    FileStore, FolderStore, NoteStats, NoteStore, NotificationStore, PreferenceStore, ShareStore,
    Stores, TokenStore, UserStore,
};
