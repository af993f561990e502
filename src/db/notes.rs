use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Note, NoteDraft, Suggestion};
use crate::models::note::DEFAULT_COLOR;

use super::{Collection, Storage, StoreError};

/// Source of "now" for note timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Notes collection (`notes.json`).
///
/// Soft-deleted notes stay in the document forever but are invisible to every
/// read and mutation below except [`NoteStore::list_all`].
#[derive(Clone)]
pub struct NoteStore {
    notes: Arc<Collection<Vec<Note>>>,
    clock: Clock,
}

impl NoteStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_clock(storage, Arc::new(Utc::now))
    }

    pub fn with_clock(storage: Arc<dyn Storage>, clock: Clock) -> Self {
        Self {
            notes: Arc::new(Collection::new(storage)),
            clock,
        }
    }

    /// Every stored note, soft-deleted ones included, in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Note>, StoreError> {
        self.notes.load().await
    }

    /// Live notes of `user_id`, most recently updated first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Note>, StoreError> {
        let mut notes: Vec<Note> = self
            .notes
            .load()
            .await?
            .into_iter()
            .filter(|n| n.is_visible_to(user_id))
            .collect();
        // stable: equal timestamps keep insertion order
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    pub async fn get_by_id(&self, id: &str, user_id: &str) -> Result<Option<Note>, StoreError> {
        Ok(self
            .notes
            .load()
            .await?
            .into_iter()
            .find(|n| n.id == id && n.is_visible_to(user_id)))
    }

    pub async fn create(&self, user_id: &str, draft: &NoteDraft) -> Result<Note, StoreError> {
        let now = (self.clock)();
        let note = Note {
            id: Uuid::now_v7().to_string(),
            owner_id: user_id.to_string(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            category: draft.category(),
            is_favorite: false,
            is_pinned: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            color: DEFAULT_COLOR.to_string(),
            tags: Vec::new(),
            suggestions: Vec::new(),
        };

        let note = self
            .notes
            .update(move |notes| {
                notes.push(note.clone());
                Ok(note)
            })
            .await?;

        tracing::debug!("Created note {} for user {user_id}", note.id);
        Ok(note)
    }

    /// Overwrite title, content and category. `None` when no live note matches.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        draft: &NoteDraft,
    ) -> Result<Option<Note>, StoreError> {
        let category = draft.category();
        self.modify(id, user_id, |note, now| {
            note.title = draft.title.clone();
            note.content = draft.content.clone();
            note.category = category;
            note.updated_at = now;
        })
        .await
    }

    pub async fn soft_delete(&self, id: &str, user_id: &str) -> Result<Option<Note>, StoreError> {
        let deleted = self
            .modify(id, user_id, |note, now| {
                note.deleted_at = Some(now);
                note.updated_at = now;
            })
            .await?;
        if deleted.is_some() {
            tracing::debug!("Soft-deleted note {id}");
        }
        Ok(deleted)
    }

    pub async fn toggle_favorite(&self, id: &str, user_id: &str) -> Result<Option<Note>, StoreError> {
        self.modify(id, user_id, |note, now| {
            note.is_favorite = !note.is_favorite;
            note.updated_at = now;
        })
        .await
    }

    pub async fn toggle_pin(&self, id: &str, user_id: &str) -> Result<Option<Note>, StoreError> {
        self.modify(id, user_id, |note, now| {
            note.is_pinned = !note.is_pinned;
            note.updated_at = now;
        })
        .await
    }

    /// Attach advisory suggestions. Does not count as a user edit, so
    /// `updated_at` is left alone.
    pub async fn set_suggestions(
        &self,
        id: &str,
        user_id: &str,
        suggestions: Vec<Suggestion>,
    ) -> Result<Option<Note>, StoreError> {
        self.modify(id, user_id, move |note, _| {
            note.suggestions = suggestions;
        })
        .await
    }

    /// Case-insensitive substring match on title or content, in
    /// [`NoteStore::list_for_user`] order.
    pub async fn search(&self, user_id: &str, query: &str) -> Result<Vec<Note>, StoreError> {
        let notes = self.list_for_user(user_id).await?;
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return Ok(notes);
        }

        Ok(notes
            .into_iter()
            .filter(|n| {
                n.title.to_lowercase().contains(&needle) || n.content.to_lowercase().contains(&needle)
            })
            .collect())
    }

    async fn modify<F>(&self, id: &str, user_id: &str, f: F) -> Result<Option<Note>, StoreError>
    where
        F: FnOnce(&mut Note, DateTime<Utc>) + Send,
    {
        let now = (self.clock)();
        self.notes
            .update(|notes| {
                Ok(notes
                    .iter_mut()
                    .find(|n| n.id == id && n.is_visible_to(user_id))
                    .map(|note| {
                        f(note, now);
                        note.clone()
                    }))
            })
            .await
    }
}
