//! In-process implementation of every store.
//!
//! Used by the test suites and by `database.backend = "memory"`. All tables
//! live behind one lock so multi-table operations (note delete, folder tree
//! delete) are atomic in the same way a transaction is, and the same cascade
//! rules as the SQL schema are applied by hand.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use notepad_core::error::AppError;
use notepad_core::result::AppResult;
use notepad_core::types::{FileId, FolderId, NoteId, NotificationId, UserId};
use notepad_entity::file::{CreateDriveFile, DriveFile};
use notepad_entity::folder::{CreateFolder, Folder};
use notepad_entity::note::{CreateNote, Note, NoteShare, NoteStatus};
use notepad_entity::notification::{
    CreateNotification, Notification, NotificationPreferences, UpdatePreferences,
};
use notepad_entity::token::UserToken;
use notepad_entity::user::{CreateUser, User};

use crate::store::{
    FileStore, FolderStore, NoteStats, NoteStore, NotificationStore, PreferenceStore, ShareStore,
    TokenStore, UserStore,
};

/// Tables and their serial counters.
#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<UserId, User>,
    tokens: Vec<UserToken>,
    notes: BTreeMap<NoteId, Note>,
    shares: Vec<NoteShare>,
    notifications: BTreeMap<NotificationId, Notification>,
    preferences: BTreeMap<UserId, NotificationPreferences>,
    folders: BTreeMap<FolderId, Folder>,
    files: BTreeMap<FileId, DriveFile>,
    next_id: i32,
}

impl MemoryState {
    /// Next serial value. One sequence is shared by all tables.
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory database implementing all storage traits.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    state: RwLock<MemoryState>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files, across all users.
    pub async fn file_count(&self) -> usize {
        self.state.read().await.files.len()
    }

    /// Number of stored folders, across all users.
    pub async fn folder_count(&self) -> usize {
        self.state.read().await.folders.len()
    }

    /// Overwrite a token's expiry. Lets tests age a session without waiting.
    pub async fn set_token_expiry(&self, token: &str, expires_at: DateTime<Utc>) -> bool {
        let mut state = self.state.write().await;
        match state.tokens.iter_mut().find(|t| t.token == token) {
            Some(row) => {
                row.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}

fn newest_first<T, F>(rows: &mut [T], key: F)
where
    F: Fn(&T) -> (DateTime<Utc>, i32),
{
    rows.sort_by_key(|row| Reverse(key(row)));
}

#[async_trait]
impl UserStore for MemoryDatabase {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == data.username) {
            return Err(AppError::validation("Username already exists"));
        }
        if state.users.values().any(|u| u.email == data.email) {
            return Err(AppError::validation("Email already registered"));
        }
        let user = User {
            id: UserId(state.next_id()),
            username: data.username.clone(),
            email: data.email.clone(),
            name: data.name.clone(),
            password_hash: data.password_hash.clone(),
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == login || u.email == login)
            .cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.users.get(id).cloned()).collect())
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.values().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.values().any(|u| u.email == email))
    }

    async fn search(&self, term: &str, limit: i64) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let mut found: Vec<User> = state
            .users
            .values()
            .filter(|u| u.matches_term(term))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.username.cmp(&b.username));
        found.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(found)
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn list_ids_after(
        &self,
        exclude: UserId,
        after: Option<UserId>,
        limit: i64,
    ) -> AppResult<Vec<UserId>> {
        let state = self.state.read().await;
        let floor = after.unwrap_or(UserId(0));
        Ok(state
            .users
            .keys()
            .copied()
            .filter(|id| *id != exclude && *id > floor)
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }
}

#[async_trait]
impl TokenStore for MemoryDatabase {
    async fn create(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<UserToken> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(AppError::database("Token references an unknown user"));
        }
        let row = UserToken {
            id: state.next_id(),
            user_id,
            token: token.to_string(),
            created_at: Utc::now(),
            expires_at,
        };
        state.tokens.push(row.clone());
        Ok(row)
    }

    async fn find_valid(
        &self,
        token: &str,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserToken>> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .iter()
            .find(|t| t.token == token && t.user_id == user_id && !t.is_expired_at(now))
            .cloned())
    }
}

#[async_trait]
impl NoteStore for MemoryDatabase {
    async fn create(&self, data: &CreateNote) -> AppResult<Note> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let note = Note {
            id: NoteId(state.next_id()),
            title: data.title.clone(),
            content: data.content.clone(),
            category: data.category.clone(),
            owner_id: data.owner_id,
            status: NoteStatus::Personal,
            is_public: false,
            created_at: now,
            updated_at: now,
        };
        state.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn find_by_id(&self, id: NoteId) -> AppResult<Option<Note>> {
        Ok(self.state.read().await.notes.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Note>> {
        let state = self.state.read().await;
        let mut notes: Vec<Note> = state
            .notes
            .values()
            .filter(|n| n.owner_id == owner)
            .cloned()
            .collect();
        newest_first(&mut notes, |n| (n.created_at, n.id.get()));
        Ok(notes)
    }

    async fn list_shared_with(&self, user: UserId) -> AppResult<Vec<Note>> {
        let state = self.state.read().await;
        let mut notes: Vec<Note> = state
            .shares
            .iter()
            .filter(|s| s.user_id == user)
            .filter_map(|s| state.notes.get(&s.note_id).cloned())
            .collect();
        newest_first(&mut notes, |n| (n.updated_at, n.id.get()));
        Ok(notes)
    }

    async fn list_public(&self) -> AppResult<Vec<Note>> {
        let state = self.state.read().await;
        let mut notes: Vec<Note> = state.notes.values().filter(|n| n.is_public).cloned().collect();
        newest_first(&mut notes, |n| (n.created_at, n.id.get()));
        Ok(notes)
    }

    async fn update(&self, note: &Note) -> AppResult<Note> {
        if note.is_public != note.status.is_public() {
            return Err(AppError::database("Note public flag does not match its status"));
        }
        let mut state = self.state.write().await;
        match state.notes.get_mut(&note.id) {
            Some(row) => {
                *row = note.clone();
                Ok(row.clone())
            }
            None => Err(AppError::database("Updated note no longer exists")),
        }
    }

    async fn delete(&self, id: NoteId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.notes.remove(&id).is_none() {
            return Ok(false);
        }
        state.shares.retain(|s| s.note_id != id);
        state.notifications.retain(|_, n| n.note_id != Some(id));
        Ok(true)
    }

    async fn stats(&self) -> AppResult<NoteStats> {
        let state = self.state.read().await;
        let count_status = |status: NoteStatus| {
            state.notes.values().filter(|n| n.status == status).count() as i64
        };
        Ok(NoteStats {
            total_notes: state.notes.len() as i64,
            public_notes: count_status(NoteStatus::Public),
            shared_notes: count_status(NoteStatus::Shared),
            note_shares: state.shares.len() as i64,
            users: state.users.len() as i64,
        })
    }
}

#[async_trait]
impl ShareStore for MemoryDatabase {
    async fn insert_if_absent(&self, note: NoteId, user: UserId) -> AppResult<Option<NoteShare>> {
        let mut state = self.state.write().await;
        if !state.notes.contains_key(&note) || !state.users.contains_key(&user) {
            return Err(AppError::database("Share references an unknown note or user"));
        }
        if state.shares.iter().any(|s| s.note_id == note && s.user_id == user) {
            return Ok(None);
        }
        let share = NoteShare {
            id: state.next_id(),
            note_id: note,
            user_id: user,
            shared_at: Utc::now(),
        };
        state.shares.push(share.clone());
        Ok(Some(share))
    }

    async fn count_for_note(&self, note: NoteId) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state.shares.iter().filter(|s| s.note_id == note).count() as i64)
    }
}

fn insert_notification(state: &mut MemoryState, data: &CreateNotification) -> Notification {
    let row = Notification {
        id: NotificationId(state.next_id()),
        user_id: data.user_id,
        message: data.message.clone(),
        notification_type: data.notification_type,
        note_id: data.note_id,
        created_at: Utc::now(),
        is_read: false,
    };
    state.notifications.insert(row.id, row.clone());
    row
}

#[async_trait]
impl NotificationStore for MemoryDatabase {
    async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        let mut state = self.state.write().await;
        Ok(insert_notification(&mut state, data))
    }

    async fn create_many(&self, data: &[CreateNotification]) -> AppResult<Vec<Notification>> {
        let mut state = self.state.write().await;
        Ok(data.iter().map(|d| insert_notification(&mut state, d)).collect())
    }

    async fn list_for_user(&self, user: UserId, limit: i64) -> AppResult<Vec<Notification>> {
        let state = self.state.read().await;
        let mut rows: Vec<Notification> = state
            .notifications
            .values()
            .filter(|n| n.user_id == user)
            .cloned()
            .collect();
        newest_first(&mut rows, |n| (n.created_at, n.id.get()));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user: UserId,
    ) -> AppResult<Option<Notification>> {
        let mut state = self.state.write().await;
        match state.notifications.get_mut(&id) {
            Some(row) if row.user_id == user => {
                row.is_read = true;
                Ok(Some(row.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_all_read(&self, user: UserId) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut changed = 0;
        for row in state.notifications.values_mut() {
            if row.user_id == user && !row.is_read {
                row.is_read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn unread_count(&self, user: UserId) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .values()
            .filter(|n| n.user_id == user && n.is_unread())
            .count() as i64)
    }

    async fn count_for_note(&self, note: NoteId) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .values()
            .filter(|n| n.note_id == Some(note))
            .count() as i64)
    }
}

#[async_trait]
impl PreferenceStore for MemoryDatabase {
    async fn find(&self, user: UserId) -> AppResult<Option<NotificationPreferences>> {
        Ok(self.state.read().await.preferences.get(&user).cloned())
    }

    async fn create_default(&self, user: UserId) -> AppResult<NotificationPreferences> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.preferences.get(&user) {
            return Ok(existing.clone());
        }
        let defaults = UpdatePreferences::default();
        let row = NotificationPreferences {
            id: state.next_id(),
            user_id: user,
            notify_on_public: defaults.notify_on_public,
            notify_on_shared: defaults.notify_on_shared,
            email_notifications: defaults.email_notifications,
        };
        state.preferences.insert(user, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        user: UserId,
        data: UpdatePreferences,
    ) -> AppResult<Option<NotificationPreferences>> {
        let mut state = self.state.write().await;
        Ok(state.preferences.get_mut(&user).map(|row| {
            row.notify_on_public = data.notify_on_public;
            row.notify_on_shared = data.notify_on_shared;
            row.email_notifications = data.email_notifications;
            row.clone()
        }))
    }
}

#[async_trait]
impl FolderStore for MemoryDatabase {
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        if let Some(parent) = data.parent_folder_id {
            if !state.folders.contains_key(&parent) {
                return Err(AppError::database("Parent folder does not exist"));
            }
        }
        let folder = Folder {
            id: FolderId(state.next_id()),
            name: data.name.clone(),
            owner_id: data.owner_id,
            parent_folder_id: data.parent_folder_id,
            created_at: Utc::now(),
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn find_owned(&self, id: FolderId, owner: UserId) -> AppResult<Option<Folder>> {
        let state = self.state.read().await;
        Ok(state
            .folders
            .get(&id)
            .filter(|f| f.owner_id == owner)
            .cloned())
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let mut folders: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.owner_id == owner)
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(folders)
    }

    async fn delete_tree(&self, id: FolderId) -> AppResult<Vec<DriveFile>> {
        let mut state = self.state.write().await;
        if !state.folders.contains_key(&id) {
            return Ok(Vec::new());
        }

        let mut subtree: HashSet<FolderId> = HashSet::from([id]);
        loop {
            let children: Vec<FolderId> = state
                .folders
                .values()
                .filter(|f| {
                    f.parent_folder_id.is_some_and(|p| subtree.contains(&p))
                        && !subtree.contains(&f.id)
                })
                .map(|f| f.id)
                .collect();
            if children.is_empty() {
                break;
            }
            subtree.extend(children);
        }

        let doomed: Vec<FileId> = state
            .files
            .values()
            .filter(|f| f.folder_id.is_some_and(|fid| subtree.contains(&fid)))
            .map(|f| f.id)
            .collect();
        let removed = doomed
            .iter()
            .filter_map(|fid| state.files.remove(fid))
            .collect();
        state.folders.retain(|fid, _| !subtree.contains(fid));
        Ok(removed)
    }
}

#[async_trait]
impl FileStore for MemoryDatabase {
    async fn create(&self, data: &CreateDriveFile) -> AppResult<DriveFile> {
        let mut state = self.state.write().await;
        if let Some(folder) = data.folder_id {
            if !state.folders.contains_key(&folder) {
                return Err(AppError::database("File references an unknown folder"));
            }
        }
        let file = DriveFile {
            id: FileId(state.next_id()),
            name: data.name.clone(),
            content_type: data.content_type.clone(),
            size: data.size,
            path: data.path.clone(),
            owner_id: data.owner_id,
            folder_id: data.folder_id,
            uploaded_at: Utc::now(),
            is_public: false,
        };
        state.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn find_by_id(&self, id: FileId) -> AppResult<Option<DriveFile>> {
        Ok(self.state.read().await.files.get(&id).cloned())
    }

    async fn list_in_folder(
        &self,
        owner: UserId,
        folder: Option<FolderId>,
    ) -> AppResult<Vec<DriveFile>> {
        let state = self.state.read().await;
        let mut files: Vec<DriveFile> = state
            .files
            .values()
            .filter(|f| f.owner_id == owner && f.folder_id == folder)
            .cloned()
            .collect();
        newest_first(&mut files, |f| (f.uploaded_at, f.id.get()));
        Ok(files)
    }

    async fn list_in_folders(&self, owner: UserId) -> AppResult<Vec<DriveFile>> {
        let state = self.state.read().await;
        let mut files: Vec<DriveFile> = state
            .files
            .values()
            .filter(|f| f.owner_id == owner && f.folder_id.is_some())
            .cloned()
            .collect();
        newest_first(&mut files, |f| (f.uploaded_at, f.id.get()));
        Ok(files)
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        Ok(self.state.write().await.files.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use notepad_entity::notification::NotificationType;

    async fn user(db: &MemoryDatabase, name: &str) -> User {
        UserStore::create(
            db,
            &CreateUser {
                username: name.to_string(),
                email: format!("{name}@example.com"),
                name: name.to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap()
    }

    async fn note(db: &MemoryDatabase, owner: UserId) -> Note {
        NoteStore::create(
            db,
            &CreateNote {
                title: "Plans".to_string(),
                content: "body".to_string(),
                category: None,
                owner_id: owner,
            },
        )
        .await
        .unwrap()
    }

    async fn folder(db: &MemoryDatabase, owner: UserId, parent: Option<FolderId>) -> Folder {
        FolderStore::create(
            db,
            &CreateFolder {
                name: "f".to_string(),
                owner_id: owner,
                parent_folder_id: parent,
            },
        )
        .await
        .unwrap()
    }

    async fn file(db: &MemoryDatabase, owner: UserId, folder: Option<FolderId>) -> DriveFile {
        FileStore::create(
            db,
            &CreateDriveFile {
                name: "a.txt".to_string(),
                content_type: "text/plain".to_string(),
                size: 3,
                path: "uploads/a.txt".to_string(),
                owner_id: owner,
                folder_id: folder,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_username_is_validation_error() {
        let db = MemoryDatabase::new();
        user(&db, "alice").await;
        let err = UserStore::create(
            &db,
            &CreateUser {
                username: "alice".to_string(),
                email: "other@example.com".to_string(),
                name: String::new(),
                password_hash: "h".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, notepad_core::error::ErrorKind::Validation);
        assert_eq!(err.message, "Username already exists");
    }

    #[tokio::test]
    async fn test_share_insert_is_idempotent() {
        let db = MemoryDatabase::new();
        let alice = user(&db, "alice").await;
        let bob = user(&db, "bob").await;
        let n = note(&db, alice.id).await;

        assert!(db.insert_if_absent(n.id, bob.id).await.unwrap().is_some());
        assert!(db.insert_if_absent(n.id, bob.id).await.unwrap().is_none());
        assert_eq!(ShareStore::count_for_note(&db, n.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_note_delete_cascades() {
        let db = MemoryDatabase::new();
        let alice = user(&db, "alice").await;
        let bob = user(&db, "bob").await;
        let n = note(&db, alice.id).await;
        db.insert_if_absent(n.id, bob.id).await.unwrap();
        NotificationStore::create(
            &db,
            &CreateNotification::note_shared(bob.id, "alice", n.id, &n.title),
        )
        .await
        .unwrap();

        assert!(NoteStore::delete(&db, n.id).await.unwrap());
        assert_eq!(ShareStore::count_for_note(&db, n.id).await.unwrap(), 0);
        assert_eq!(NotificationStore::count_for_note(&db, n.id).await.unwrap(), 0);
        assert!(!NoteStore::delete(&db, n.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_token_not_found() {
        let db = MemoryDatabase::new();
        let alice = user(&db, "alice").await;
        let now = Utc::now();
        TokenStore::create(&db, alice.id, "tok", now + Duration::hours(1))
            .await
            .unwrap();

        assert!(db.find_valid("tok", alice.id, now).await.unwrap().is_some());
        assert!(db.find_valid("tok", UserId(999), now).await.unwrap().is_none());
        assert!(
            db.find_valid("tok", alice.id, now + Duration::hours(2))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_folder_tree_delete_spares_siblings() {
        let db = MemoryDatabase::new();
        let alice = user(&db, "alice").await;
        let target = folder(&db, alice.id, None).await;
        let child = folder(&db, alice.id, Some(target.id)).await;
        let sibling = folder(&db, alice.id, None).await;
        file(&db, alice.id, Some(target.id)).await;
        file(&db, alice.id, Some(child.id)).await;
        let kept = file(&db, alice.id, Some(sibling.id)).await;
        let root = file(&db, alice.id, None).await;

        let removed = db.delete_tree(target.id).await.unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(db.folder_count().await, 1);
        assert!(FileStore::find_by_id(&db, kept.id).await.unwrap().is_some());
        assert!(FileStore::find_by_id(&db, root.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_keyset_paging_skips_excluded_user() {
        let db = MemoryDatabase::new();
        let a = user(&db, "a").await;
        let b = user(&db, "b").await;
        let c = user(&db, "c").await;

        let first = db.list_ids_after(a.id, None, 1).await.unwrap();
        assert_eq!(first, vec![b.id]);
        let second = db.list_ids_after(a.id, Some(b.id), 1).await.unwrap();
        assert_eq!(second, vec![c.id]);
        assert!(db.list_ids_after(a.id, Some(c.id), 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_read_requires_recipient() {
        let db = MemoryDatabase::new();
        let alice = user(&db, "alice").await;
        let bob = user(&db, "bob").await;
        let created = NotificationStore::create(
            &db,
            &CreateNotification {
                user_id: bob.id,
                message: "hi".to_string(),
                notification_type: NotificationType::NoteShared,
                note_id: None,
            },
        )
        .await
        .unwrap();

        assert!(db.mark_read(created.id, alice.id).await.unwrap().is_none());
        assert_eq!(db.unread_count(bob.id).await.unwrap(), 1);
        assert!(db.mark_read(created.id, bob.id).await.unwrap().is_some());
        assert_eq!(db.unread_count(bob.id).await.unwrap(), 0);
    }
}
