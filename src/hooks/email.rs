use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::SettingsStore;
use crate::email::{templates, Mailer};
use crate::models::{Note, User};

use super::{AccountEvent, Hook, NoteEvent};

/// Mails the note owner about important notes, deletions, registration and logins.
///
/// Nothing is sent unless both the global `emailNotifications` setting and the
/// user's own preference are on.
pub struct EmailNotifier {
    mailer: Arc<dyn Mailer>,
    settings: SettingsStore,
    base_url: String,
}

impl EmailNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, settings: SettingsStore, base_url: String) -> Self {
        Self {
            mailer,
            settings,
            base_url,
        }
    }

    async fn enabled_for(&self, user: &User) -> Result<bool, String> {
        if !user.preferences.email_notifications {
            return Ok(false);
        }
        let settings = self
            .settings
            .get()
            .await
            .map_err(|e| format!("Failed to read settings: {e}"))?;
        Ok(settings.email_notifications)
    }
}

/// Work and important categories, or "urgent" anywhere in the title.
pub fn is_important(note: &Note) -> bool {
    let category = note.category.to_lowercase();
    category == "work" || category == "important" || note.title.to_lowercase().contains("urgent")
}

/// Subject and body for a note event, or `None` when the event is not mailed.
pub fn note_mail(user: &User, note: &Note, event: NoteEvent) -> Result<Option<(String, String)>, String> {
    let mail = match event {
        NoteEvent::Created if is_important(note) => (
            format!("New Important Note Created: {}", note.title),
            templates::render_important_note(&user.username, &note.title, &note.category)?,
        ),
        NoteEvent::Deleted => {
            let when = note.deleted_at.unwrap_or(note.updated_at);
            (
                format!("Note Deleted: {}", note.title),
                templates::render_note_deleted(&user.username, &note.title, &format_time(when))?,
            )
        }
        _ => return Ok(None),
    };
    Ok(Some(mail))
}

fn format_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[async_trait]
impl Hook for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn on_note_event(&self, user: &User, note: &Note, event: NoteEvent) -> Result<(), String> {
        let Some((subject, body)) = note_mail(user, note, event)? else {
            return Ok(());
        };
        if !self.enabled_for(user).await? {
            return Ok(());
        }

        self.mailer.send(&user.email, &subject, &body).await?;
        tracing::debug!("Sent {} mail for note {}", event.as_str(), note.id);
        Ok(())
    }

    async fn on_account_event(&self, user: &User, event: AccountEvent) -> Result<(), String> {
        if !self.enabled_for(user).await? {
            return Ok(());
        }

        let (subject, body) = match event {
            AccountEvent::Registered => (
                "Welcome to Notekeeper!".to_string(),
                templates::render_welcome(&user.username, &self.base_url)?,
            ),
            AccountEvent::LoggedIn => (
                "New Login to Your Notekeeper Account".to_string(),
                templates::render_login_alert(&user.username, &format_time(Utc::now()))?,
            ),
        };
        self.mailer.send(&user.email, &subject, &body).await
    }
}
