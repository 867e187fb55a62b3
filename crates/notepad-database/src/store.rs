//! Storage traits shared by the PostgreSQL repositories and the in-memory
//! backend, plus the [`Stores`] bundle handed to the service layer.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use notepad_core::result::AppResult;
use notepad_core::types::{FileId, FolderId, NoteId, NotificationId, UserId};
use notepad_entity::file::{CreateDriveFile, DriveFile};
use notepad_entity::folder::{CreateFolder, Folder};
use notepad_entity::note::{CreateNote, Note, NoteShare};
use notepad_entity::notification::{
    CreateNotification, Notification, NotificationPreferences, UpdatePreferences,
};
use notepad_entity::token::UserToken;
use notepad_entity::user::{CreateUser, User};

use crate::memory::MemoryDatabase;
use crate::repositories::{
    FileRepository, FolderRepository, NoteRepository, NotificationRepository,
    PreferenceRepository, ShareRepository, TokenRepository, UserRepository,
};

/// Aggregate note counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStats {
    /// All notes.
    pub total_notes: i64,
    /// Notes with status `Public`.
    pub public_notes: i64,
    /// Notes with status `Shared`.
    pub shared_notes: i64,
    /// Rows in the share table.
    pub note_shares: i64,
    /// Registered users.
    pub users: i64,
}

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync + Debug + 'static {
    /// Insert a new user.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user whose username or email equals `login`.
    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>>;

    /// Fetch several users at once. Unknown ids are skipped.
    async fn find_many(&self, ids: &[UserId]) -> AppResult<Vec<User>>;

    /// Whether the username is taken.
    async fn username_exists(&self, username: &str) -> AppResult<bool>;

    /// Whether the email is taken.
    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    /// Users whose username or email contains `term`, ignoring case.
    async fn search(&self, term: &str, limit: i64) -> AppResult<Vec<User>>;

    /// Every user, ordered by id.
    async fn list_all(&self) -> AppResult<Vec<User>>;

    /// One keyset page of user ids greater than `after`, skipping `exclude`.
    async fn list_ids_after(
        &self,
        exclude: UserId,
        after: Option<UserId>,
        limit: i64,
    ) -> AppResult<Vec<UserId>>;
}

/// Session token persistence.
#[async_trait]
pub trait TokenStore: Send + Sync + Debug + 'static {
    /// Store a freshly issued token.
    async fn create(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<UserToken>;

    /// Find a token issued to `user_id` that has not expired at `now`.
    async fn find_valid(
        &self,
        token: &str,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserToken>>;
}

/// Note persistence.
#[async_trait]
pub trait NoteStore: Send + Sync + Debug + 'static {
    /// Insert a new personal note.
    async fn create(&self, data: &CreateNote) -> AppResult<Note>;

    /// Find a note by id.
    async fn find_by_id(&self, id: NoteId) -> AppResult<Option<Note>>;

    /// Notes owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Note>>;

    /// Notes shared with `user`, most recently updated first.
    async fn list_shared_with(&self, user: UserId) -> AppResult<Vec<Note>>;

    /// Public notes, newest first.
    async fn list_public(&self) -> AppResult<Vec<Note>>;

    /// Persist title, content, category, status, flag, and `updated_at`.
    async fn update(&self, note: &Note) -> AppResult<Note>;

    /// Delete a note with its shares and notifications. Returns `false` if
    /// the note did not exist.
    async fn delete(&self, id: NoteId) -> AppResult<bool>;

    /// Aggregate counters.
    async fn stats(&self) -> AppResult<NoteStats>;
}

/// Note share persistence.
#[async_trait]
pub trait ShareStore: Send + Sync + Debug + 'static {
    /// Insert a grant unless one already exists. Returns the new row, or
    /// `None` when the pair was already present.
    async fn insert_if_absent(&self, note: NoteId, user: UserId) -> AppResult<Option<NoteShare>>;

    /// Number of grants on a note.
    async fn count_for_note(&self, note: NoteId) -> AppResult<i64>;
}

/// Notification persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync + Debug + 'static {
    /// Insert one notification.
    async fn create(&self, data: &CreateNotification) -> AppResult<Notification>;

    /// Insert a batch of notifications in one statement.
    async fn create_many(&self, data: &[CreateNotification]) -> AppResult<Vec<Notification>>;

    /// Latest notifications for a user.
    async fn list_for_user(&self, user: UserId, limit: i64) -> AppResult<Vec<Notification>>;

    /// Mark a notification read if `user` is its recipient.
    async fn mark_read(&self, id: NotificationId, user: UserId)
    -> AppResult<Option<Notification>>;

    /// Mark every unread notification of a user read. Returns the count.
    async fn mark_all_read(&self, user: UserId) -> AppResult<u64>;

    /// Number of unread notifications.
    async fn unread_count(&self, user: UserId) -> AppResult<i64>;

    /// Notifications referring to a note.
    async fn count_for_note(&self, note: NoteId) -> AppResult<i64>;
}

/// Notification preference persistence.
#[async_trait]
pub trait PreferenceStore: Send + Sync + Debug + 'static {
    /// Find a user's preferences.
    async fn find(&self, user: UserId) -> AppResult<Option<NotificationPreferences>>;

    /// Create the default row, or return the existing one.
    async fn create_default(&self, user: UserId) -> AppResult<NotificationPreferences>;

    /// Overwrite the switches. `None` when the user has no row.
    async fn update(
        &self,
        user: UserId,
        data: UpdatePreferences,
    ) -> AppResult<Option<NotificationPreferences>>;
}

/// Folder persistence.
#[async_trait]
pub trait FolderStore: Send + Sync + Debug + 'static {
    /// Insert a folder.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Find a folder only if `owner` owns it.
    async fn find_owned(&self, id: FolderId, owner: UserId) -> AppResult<Option<Folder>>;

    /// Folders of an owner ordered by name.
    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Folder>>;

    /// Delete a folder, its descendants, and every file inside them.
    /// Returns the removed files so their blobs can be cleaned up.
    async fn delete_tree(&self, id: FolderId) -> AppResult<Vec<DriveFile>>;
}

/// Drive file persistence.
#[async_trait]
pub trait FileStore: Send + Sync + Debug + 'static {
    /// Insert a file row.
    async fn create(&self, data: &CreateDriveFile) -> AppResult<DriveFile>;

    /// Find a file by id.
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<DriveFile>>;

    /// Files of an owner directly inside `folder`, or at the root when
    /// `folder` is `None`, newest upload first.
    async fn list_in_folder(
        &self,
        owner: UserId,
        folder: Option<FolderId>,
    ) -> AppResult<Vec<DriveFile>>;

    /// Every file of an owner that sits inside some folder.
    async fn list_in_folders(&self, owner: UserId) -> AppResult<Vec<DriveFile>>;

    /// Delete a file row. Returns `false` if it did not exist.
    async fn delete(&self, id: FileId) -> AppResult<bool>;
}

/// Every store the application needs, behind trait objects.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Users.
    pub users: Arc<dyn UserStore>,
    /// Session tokens.
    pub tokens: Arc<dyn TokenStore>,
    /// Notes.
    pub notes: Arc<dyn NoteStore>,
    /// Note shares.
    pub shares: Arc<dyn ShareStore>,
    /// Notifications.
    pub notifications: Arc<dyn NotificationStore>,
    /// Notification preferences.
    pub preferences: Arc<dyn PreferenceStore>,
    /// Folders.
    pub folders: Arc<dyn FolderStore>,
    /// Drive files.
    pub files: Arc<dyn FileStore>,
}

impl Stores {
    /// Stores backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            tokens: Arc::new(TokenRepository::new(pool.clone())),
            notes: Arc::new(NoteRepository::new(pool.clone())),
            shares: Arc::new(ShareRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            preferences: Arc::new(PreferenceRepository::new(pool.clone())),
            folders: Arc::new(FolderRepository::new(pool.clone())),
            files: Arc::new(FileRepository::new(pool)),
        }
    }

    /// Stores backed by one shared in-process database.
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryDatabase::new()))
    }

    /// Stores backed by an existing in-process database.
    pub fn from_memory(db: Arc<MemoryDatabase>) -> Self {
        Self {
            users: db.clone(),
            tokens: db.clone(),
            notes: db.clone(),
            shares: db.clone(),
            notifications: db.clone(),
            preferences: db.clone(),
            folders: db.clone(),
            files: db,
        }
    }
}
