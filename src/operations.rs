//! Request-level flows shared by the JSON API and the HTML pages.
//!
//! Each function validates input, calls the stores, fires hooks and writes the
//! audit line, so `routes` and `views` only differ in how they respond.

use crate::auth::extractor::AuthUser;
use crate::auth::password::MIN_PASSWORD_LEN;
use crate::config::RegistrationMode;
use crate::error::AppError;
use crate::hooks::{AccountEvent, NoteEvent};
use crate::middleware::audit;
use crate::models::{Note, NoteDraft, PreferencesPatch, User};
use crate::state::SharedState;
use crate::suggestions;

fn note_not_found() -> AppError {
    AppError::NotFound("Note not found".to_string())
}

pub async fn register(
    state: &SharedState,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    if state.config.registration == RegistrationMode::Closed {
        return Err(AppError::Forbidden("Registration is disabled.".to_string()));
    }

    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("All fields are required.".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Please enter a valid email address.".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }

    let user = state.db.users.register(username, email, password).await?;

    audit::log_event(&user.id, "user.registered", "user", &user.id);
    state.hooks.account_event(&user, AccountEvent::Registered);
    Ok(user)
}

pub async fn login(state: &SharedState, email: &str, password: &str) -> Result<User, AppError> {
    let email = email.trim();
    if state.login_limiter.check(email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let user = match state.db.users.verify_credentials(email, password).await {
        Ok(user) => user,
        Err(e) => {
            let err = AppError::from(e);
            if matches!(err, AppError::InvalidCredentials) {
                state.login_limiter.record_failure(email);
            }
            return Err(err);
        }
    };
    state.login_limiter.reset(email);

    audit::log_event(&user.id, "user.login", "user", &user.id);
    state.hooks.account_event(&user, AccountEvent::LoggedIn);
    Ok(user)
}

/// The stored record behind a session. A session whose user no longer exists is unauthenticated.
pub async fn current_user(state: &SharedState, auth: &AuthUser) -> Result<User, AppError> {
    state
        .db
        .users
        .find_by_id(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Session user no longer exists".to_string()))
}

pub async fn update_preferences(
    state: &SharedState,
    user: &User,
    patch: PreferencesPatch,
) -> Result<User, AppError> {
    let updated = state.db.users.update_preferences(&user.id, patch).await?;
    audit::log_event(&user.id, "user.preferences_updated", "user", &user.id);
    Ok(updated)
}

/// Listing, or search results when `query` is non-blank.
pub async fn list_notes(
    state: &SharedState,
    user: &User,
    query: Option<&str>,
) -> Result<Vec<Note>, AppError> {
    let notes = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => state.db.notes.search(&user.id, q).await?,
        None => state.db.notes.list_for_user(&user.id).await?,
    };
    Ok(notes
        .into_iter()
        .map(|note| hide_suggestions(state, user, note))
        .collect())
}

pub async fn get_note(state: &SharedState, user: &User, id: &str) -> Result<Note, AppError> {
    let note = state
        .db
        .notes
        .get_by_id(id, &user.id)
        .await?
        .ok_or_else(note_not_found)?;
    Ok(hide_suggestions(state, user, note))
}

fn validate_draft(draft: &NoteDraft) -> Result<(), AppError> {
    if draft.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required.".to_string()));
    }
    Ok(())
}

pub async fn create_note(state: &SharedState, user: &User, draft: &NoteDraft) -> Result<Note, AppError> {
    validate_draft(draft)?;

    let note = state.db.notes.create(&user.id, draft).await?;
    let note = attach_suggestions(state, user, note).await?;

    audit::log_event(&user.id, NoteEvent::Created.as_str(), "note", &note.id);
    state.hooks.note_event(user, &note, NoteEvent::Created);
    Ok(note)
}

pub async fn update_note(
    state: &SharedState,
    user: &User,
    id: &str,
    draft: &NoteDraft,
) -> Result<Note, AppError> {
    validate_draft(draft)?;

    let note = state
        .db
        .notes
        .update(id, &user.id, draft)
        .await?
        .ok_or_else(note_not_found)?;
    let note = attach_suggestions(state, user, note).await?;

    audit::log_event(&user.id, NoteEvent::Updated.as_str(), "note", &note.id);
    state.hooks.note_event(user, &note, NoteEvent::Updated);
    Ok(note)
}

pub async fn delete_note(state: &SharedState, user: &User, id: &str) -> Result<Note, AppError> {
    let note = state
        .db
        .notes
        .soft_delete(id, &user.id)
        .await?
        .ok_or_else(note_not_found)?;

    audit::log_event(&user.id, NoteEvent::Deleted.as_str(), "note", &note.id);
    state.hooks.note_event(user, &note, NoteEvent::Deleted);
    Ok(note)
}

pub async fn toggle_favorite(state: &SharedState, user: &User, id: &str) -> Result<Note, AppError> {
    let note = state
        .db
        .notes
        .toggle_favorite(id, &user.id)
        .await?
        .ok_or_else(note_not_found)?;
    audit::log_event(&user.id, "note.favorite_toggled", "note", &note.id);
    Ok(hide_suggestions(state, user, note))
}

pub async fn toggle_pin(state: &SharedState, user: &User, id: &str) -> Result<Note, AppError> {
    let note = state
        .db
        .notes
        .toggle_pin(id, &user.id)
        .await?
        .ok_or_else(note_not_found)?;
    audit::log_event(&user.id, "note.pin_toggled", "note", &note.id);
    Ok(hide_suggestions(state, user, note))
}

fn suggestions_enabled(state: &SharedState, user: &User) -> bool {
    state.config.features.ai_suggestions && user.preferences.ai_suggestions
}

/// Drop stored suggestions from a note being returned to a user who has them switched off.
fn hide_suggestions(state: &SharedState, user: &User, mut note: Note) -> Note {
    if !suggestions_enabled(state, user) {
        note.suggestions.clear();
    }
    note
}

/// Recompute keyword suggestions after an edit. When suggestions are off for
/// this deployment or user, any stored ones are cleared instead.
async fn attach_suggestions(state: &SharedState, user: &User, note: Note) -> Result<Note, AppError> {
    let suggestions = if suggestions_enabled(state, user) {
        suggestions::suggest(&note.content)
    } else {
        Vec::new()
    };
    if suggestions == note.suggestions {
        return Ok(note);
    }

    let updated = state
        .db
        .notes
        .set_suggestions(&note.id, &user.id, suggestions)
        .await?;
    Ok(updated.unwrap_or(note))
}
