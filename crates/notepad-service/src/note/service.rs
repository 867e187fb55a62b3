//! Note CRUD, sharing, and publishing.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use notepad_core::error::AppError;
use notepad_core::types::{NoteId, UserId};
use notepad_database::{NoteStats, NoteStore, ShareStore, UserStore};
use notepad_entity::note::{CreateNote, Note, NoteStatus};
use notepad_entity::notification::CreateNotification;

use crate::context::RequestContext;
use crate::notification::NotificationService;

use super::view::FormattedNote;

/// Fields a note update may change. Empty or missing fields are kept.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

/// Result of a share request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareOutcome {
    pub note_id: NoteId,
    pub shared_with_user_id: UserId,
    /// `false` when the collaborator already had access.
    #[serde(skip)]
    pub created: bool,
}

/// Implements every note operation exposed under `/api/notes`.
#[derive(Debug, Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteStore>,
    shares: Arc<dyn ShareStore>,
    users: Arc<dyn UserStore>,
    notifications: Arc<NotificationService>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl NoteService {
    /// Creates a new note service.
    pub fn new(
        notes: Arc<dyn NoteStore>,
        shares: Arc<dyn ShareStore>,
        users: Arc<dyn UserStore>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            notes,
            shares,
            users,
            notifications,
        }
    }

    /// Resolve owner usernames for a list of notes.
    async fn format_many(&self, notes: Vec<Note>) -> Result<Vec<FormattedNote>, AppError> {
        let owner_ids: Vec<UserId> = notes
            .iter()
            .map(|n| n.owner_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let owners = self.users.find_many(&owner_ids).await?;
        Ok(FormattedNote::many(notes, &owners))
    }

    async fn format_one(&self, note: Note) -> Result<FormattedNote, AppError> {
        let owner = self
            .users
            .find_by_id(note.owner_id)
            .await?
            .map(|u| u.username);
        Ok(FormattedNote::new(note, owner))
    }

    async fn load(&self, id: NoteId) -> Result<Note, AppError> {
        self.notes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Note not found"))
    }

    /// Load a note and require the caller to own it.
    async fn load_owned(&self, ctx: &RequestContext, id: NoteId) -> Result<Note, AppError> {
        let note = self.load(id).await?;
        if !note.is_owned_by(ctx.user_id) {
            warn!(user_id = %ctx.user_id, note_id = %id, "Non-owner attempted to modify note");
            return Err(AppError::forbidden("You do not own this note"));
        }
        Ok(note)
    }

    /// The caller's notes, newest first.
    pub async fn list_mine(&self, ctx: &RequestContext) -> Result<Vec<FormattedNote>, AppError> {
        let notes = self.notes.list_by_owner(ctx.user_id).await?;
        self.format_many(notes).await
    }

    /// Notes shared with the caller, most recently updated first.
    pub async fn list_shared_with_me(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<FormattedNote>, AppError> {
        let notes = self.notes.list_shared_with(ctx.user_id).await?;
        self.format_many(notes).await
    }

    /// Public notes, newest first.
    pub async fn list_public(&self) -> Result<Vec<FormattedNote>, AppError> {
        let notes = self.notes.list_public().await?;
        self.format_many(notes).await
    }

    /// Create a personal note owned by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        title: String,
        content: String,
        category: Option<String>,
    ) -> Result<FormattedNote, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        let note = self
            .notes
            .create(&CreateNote {
                title,
                content,
                category: non_empty(category),
                owner_id: ctx.user_id,
            })
            .await?;
        info!(user_id = %ctx.user_id, note_id = %note.id, "Note created");
        self.format_one(note).await
    }

    /// Apply a partial update to an owned note.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: NoteId,
        changes: NoteUpdate,
    ) -> Result<FormattedNote, AppError> {
        let mut note = self.load_owned(ctx, id).await?;
        if let Some(title) = non_empty(changes.title) {
            note.title = title;
        }
        if let Some(content) = non_empty(changes.content) {
            note.content = content;
        }
        if let Some(category) = non_empty(changes.category) {
            note.category = Some(category);
        }
        note.updated_at = Utc::now();

        let saved = self.notes.update(&note).await?;
        info!(user_id = %ctx.user_id, note_id = %id, "Note updated");
        self.format_one(saved).await
    }

    /// Delete an owned note with its shares and notifications.
    pub async fn delete(&self, ctx: &RequestContext, id: NoteId) -> Result<(), AppError> {
        let note = self.load(id).await?;
        if !note.is_owned_by(ctx.user_id) {
            warn!(user_id = %ctx.user_id, note_id = %id, "Non-owner attempted to delete note");
            return Err(AppError::authentication("Only the note owner can delete it"));
        }
        if !self.notes.delete(id).await? {
            return Err(AppError::not_found("Note not found"));
        }
        info!(user_id = %ctx.user_id, note_id = %id, "Note deleted");
        Ok(())
    }

    /// Grant `collaborator` access to an owned note.
    ///
    /// Repeating a share is a no-op: no second row and no second
    /// notification.
    pub async fn share(
        &self,
        ctx: &RequestContext,
        id: NoteId,
        collaborator: UserId,
    ) -> Result<ShareOutcome, AppError> {
        let mut note = self.load_owned(ctx, id).await?;
        if collaborator == ctx.user_id {
            return Err(AppError::validation("You cannot share a note with yourself"));
        }
        if self.users.find_by_id(collaborator).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let outcome = ShareOutcome {
            note_id: id,
            shared_with_user_id: collaborator,
            created: false,
        };
        if self.shares.insert_if_absent(id, collaborator).await?.is_none() {
            info!(note_id = %id, collaborator = %collaborator, "Note already shared");
            return Ok(outcome);
        }

        let next = note.status.after_share();
        if next != note.status {
            note.apply_status(next);
            note.updated_at = Utc::now();
            note = self.notes.update(&note).await?;
        }

        let owner = self.owner_name(ctx.user_id).await?;
        self.notifications
            .notify(CreateNotification::note_shared(
                collaborator,
                &owner,
                note.id,
                &note.title,
            ))
            .await?;

        info!(user_id = %ctx.user_id, note_id = %id, collaborator = %collaborator, "Note shared");
        Ok(ShareOutcome {
            created: true,
            ..outcome
        })
    }

    /// Publish an owned note and notify every other user.
    ///
    /// Publishing an already public note changes nothing and sends nothing.
    pub async fn make_public(
        &self,
        ctx: &RequestContext,
        id: NoteId,
    ) -> Result<FormattedNote, AppError> {
        let mut note = self.load_owned(ctx, id).await?;
        if note.status == NoteStatus::Public {
            return self.format_one(note).await;
        }

        note.apply_status(NoteStatus::Public);
        note.updated_at = Utc::now();
        let note = self.notes.update(&note).await?;

        let owner = self.owner_name(ctx.user_id).await?;
        let recipients = self.fan_out_public(&note, &owner).await?;
        info!(user_id = %ctx.user_id, note_id = %id, recipients, "Note published");
        self.format_one(note).await
    }

    /// Walk every other user in keyset pages and notify each page with one
    /// batched insert.
    async fn fan_out_public(&self, note: &Note, owner: &str) -> Result<usize, AppError> {
        let batch_size = self.notifications.fanout_batch_size();
        let mut after = None;
        let mut total = 0;
        loop {
            let ids = self
                .users
                .list_ids_after(note.owner_id, after, batch_size)
                .await?;
            let Some(last) = ids.last().copied() else {
                break;
            };
            let batch = ids
                .iter()
                .map(|&user| CreateNotification::new_public_note(user, owner, note.id, &note.title))
                .collect();
            total += self.notifications.notify_batch(batch).await?;
            if (ids.len() as i64) < batch_size {
                break;
            }
            after = Some(last);
        }
        Ok(total)
    }

    /// Set the status of an owned note directly. No notifications are sent.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        id: NoteId,
        status: NoteStatus,
    ) -> Result<FormattedNote, AppError> {
        let mut note = self.load_owned(ctx, id).await?;
        note.apply_status(status);
        note.updated_at = Utc::now();
        let note = self.notes.update(&note).await?;
        info!(user_id = %ctx.user_id, note_id = %id, status = %status, "Note status changed");
        self.format_one(note).await
    }

    /// Aggregate counters across all notes.
    pub async fn stats(&self) -> Result<NoteStats, AppError> {
        self.notes.stats().await
    }

    async fn owner_name(&self, id: UserId) -> Result<String, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .map(|u| u.username)
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use notepad_core::config::NotificationConfig;
    use notepad_core::error::ErrorKind;
    use notepad_database::{NotificationStore, Stores};
    use notepad_entity::notification::{Notification, NotificationType};
    use notepad_entity::user::CreateUser;

    use super::*;
    use crate::notification::NotificationPusher;

    #[derive(Debug, Default)]
    struct RecordingPusher {
        pushed: Mutex<Vec<(UserId, NotificationType)>>,
    }

    #[async_trait]
    impl NotificationPusher for RecordingPusher {
        async fn push(&self, user: UserId, notification: &Notification) -> usize {
            self.pushed
                .lock()
                .unwrap()
                .push((user, notification.notification_type));
            1
        }
    }

    struct Fixture {
        stores: Stores,
        pusher: Arc<RecordingPusher>,
        service: NoteService,
    }

    fn fixture(batch_size: i64) -> Fixture {
        let stores = Stores::in_memory();
        let pusher = Arc::new(RecordingPusher::default());
        let notifications = Arc::new(NotificationService::new(
            stores.notifications.clone(),
            pusher.clone(),
            NotificationConfig {
                fanout_batch_size: batch_size,
                ..NotificationConfig::default()
            },
        ));
        let service = NoteService::new(
            stores.notes.clone(),
            stores.shares.clone(),
            stores.users.clone(),
            notifications,
        );
        Fixture {
            stores,
            pusher,
            service,
        }
    }

    async fn user(stores: &Stores, name: &str) -> UserId {
        stores
            .users
            .create(&CreateUser {
                username: name.to_string(),
                email: format!("{name}@example.com"),
                name: name.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_share_twice_yields_one_row_and_one_notification() {
        let f = fixture(500);
        let alice = user(&f.stores, "alice").await;
        let bob = user(&f.stores, "bob").await;
        let ctx = RequestContext::new(alice, "127.0.0.1");
        let note = f
            .service
            .create(&ctx, "Plans".into(), "body".into(), None)
            .await
            .unwrap();

        let first = f.service.share(&ctx, note.id, bob).await.unwrap();
        let second = f.service.share(&ctx, note.id, bob).await.unwrap();
        assert!(first.created);
        assert!(!second.created);

        assert_eq!(f.stores.shares.count_for_note(note.id).await.unwrap(), 1);
        assert_eq!(
            f.stores.notifications.count_for_note(note.id).await.unwrap(),
            1
        );
        assert_eq!(f.pusher.pushed.lock().unwrap().len(), 1);

        let stored = f.stores.notes.find_by_id(note.id).await.unwrap().unwrap();
        assert_eq!(stored.status, NoteStatus::Shared);
        assert!(!stored.is_public);
    }

    #[tokio::test]
    async fn test_share_rules() {
        let f = fixture(500);
        let alice = user(&f.stores, "alice").await;
        let bob = user(&f.stores, "bob").await;
        let alice_ctx = RequestContext::new(alice, "127.0.0.1");
        let bob_ctx = RequestContext::new(bob, "127.0.0.1");
        let note = f
            .service
            .create(&alice_ctx, "Plans".into(), "body".into(), None)
            .await
            .unwrap();

        let err = f.service.share(&alice_ctx, note.id, alice).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = f.service.share(&bob_ctx, note.id, alice).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        let err = f
            .service
            .share(&alice_ctx, note.id, UserId(9999))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = f
            .service
            .share(&alice_ctx, NoteId(9999), bob)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_make_public_fans_out_in_batches_once() {
        let f = fixture(2);
        let alice = user(&f.stores, "alice").await;
        for name in ["b", "c", "d", "e", "g"] {
            user(&f.stores, name).await;
        }
        let ctx = RequestContext::new(alice, "127.0.0.1");
        let note = f
            .service
            .create(&ctx, "Plans".into(), "body".into(), None)
            .await
            .unwrap();

        let published = f.service.make_public(&ctx, note.id).await.unwrap();
        assert!(published.is_public);
        assert_eq!(published.status, NoteStatus::Public);
        assert_eq!(
            f.stores.notifications.count_for_note(note.id).await.unwrap(),
            5
        );

        f.service.make_public(&ctx, note.id).await.unwrap();
        assert_eq!(
            f.stores.notifications.count_for_note(note.id).await.unwrap(),
            5
        );
        let pushed = f.pusher.pushed.lock().unwrap();
        assert_eq!(pushed.len(), 5);
        assert!(pushed.iter().all(|(u, k)| *u != alice && *k == NotificationType::NewPublicNote));
    }

    #[tokio::test]
    async fn test_share_keeps_public_status() {
        let f = fixture(500);
        let alice = user(&f.stores, "alice").await;
        let bob = user(&f.stores, "bob").await;
        let ctx = RequestContext::new(alice, "127.0.0.1");
        let note = f
            .service
            .create(&ctx, "Plans".into(), "body".into(), None)
            .await
            .unwrap();
        f.service.make_public(&ctx, note.id).await.unwrap();
        f.service.share(&ctx, note.id, bob).await.unwrap();

        let stored = f.stores.notes.find_by_id(note.id).await.unwrap().unwrap();
        assert_eq!(stored.status, NoteStatus::Public);
        assert!(stored.is_public);
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_unauthorized() {
        let f = fixture(500);
        let alice = user(&f.stores, "alice").await;
        let bob = user(&f.stores, "bob").await;
        let note = f
            .service
            .create(
                &RequestContext::new(alice, "127.0.0.1"),
                "Plans".into(),
                "body".into(),
                None,
            )
            .await
            .unwrap();

        let err = f
            .service
            .delete(&RequestContext::new(bob, "127.0.0.1"), note.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Only the note owner can delete it");
    }

    #[tokio::test]
    async fn test_update_keeps_empty_fields() {
        let f = fixture(500);
        let alice = user(&f.stores, "alice").await;
        let ctx = RequestContext::new(alice, "127.0.0.1");
        let note = f
            .service
            .create(&ctx, "Plans".into(), "body".into(), Some("work".into()))
            .await
            .unwrap();

        let updated = f
            .service
            .update(
                &ctx,
                note.id,
                NoteUpdate {
                    title: Some("New plans".into()),
                    content: Some(String::new()),
                    category: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "New plans");
        assert_eq!(updated.content, "body");
        assert_eq!(updated.category.as_deref(), Some("work"));
        assert_eq!(updated.owner.as_deref(), Some("alice"));
    }
}
