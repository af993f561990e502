//! Side-channel hooks fired after note and account changes.
//!
//! Hooks are advisory: they run on a spawned task after the request has
//! done its store work, and a failing hook only produces a log line.

pub mod email;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Note, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    Created,
    Updated,
    Deleted,
}

impl NoteEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteEvent::Created => "note.created",
            NoteEvent::Updated => "note.updated",
            NoteEvent::Deleted => "note.deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountEvent {
    Registered,
    LoggedIn,
}

#[async_trait]
pub trait Hook: Send + Sync {
    fn name(&self) -> &str;

    async fn on_note_event(&self, user: &User, note: &Note, event: NoteEvent) -> Result<(), String>;

    async fn on_account_event(&self, _user: &User, _event: AccountEvent) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Arc<dyn Hook>) {
        tracing::info!("Registered hook {}", hook.name());
        self.hooks.push(hook);
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook for a note event in the background.
    pub fn note_event(&self, user: &User, note: &Note, event: NoteEvent) -> Option<tokio::task::JoinHandle<()>> {
        if self.hooks.is_empty() {
            return None;
        }
        let hooks = self.hooks.clone();
        let user = user.clone();
        let note = note.clone();

        Some(tokio::spawn(async move {
            for hook in &hooks {
                if let Err(e) = hook.on_note_event(&user, &note, event).await {
                    tracing::error!("Hook {} failed on {} for note {}: {e}", hook.name(), event.as_str(), note.id);
                }
            }
        }))
    }

    /// Run every hook for an account event in the background.
    pub fn account_event(&self, user: &User, event: AccountEvent) -> Option<tokio::task::JoinHandle<()>> {
        if self.hooks.is_empty() {
            return None;
        }
        let hooks = self.hooks.clone();
        let user = user.clone();

        Some(tokio::spawn(async move {
            for hook in &hooks {
                if let Err(e) = hook.on_account_event(&user, event).await {
                    tracing::error!("Hook {} failed on {event:?} for user {}: {e}", hook.name(), user.id);
                }
            }
        }))
    }
}
