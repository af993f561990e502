use askama::Template;
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::models::note::DEFAULT_CATEGORY;
use crate::models::NoteDraft;
use crate::operations;
use crate::state::SharedState;

use super::{error_response, redirect_with, render, require_user, theme, to_dashboard, ActionForm, Notice};

#[derive(Template)]
#[template(path = "notes/form.html")]
struct NoteFormTemplate {
    theme: String,
    error: Option<String>,
    /// Empty for a new note.
    note_id: String,
    title: String,
    content: String,
    category: String,
}

#[derive(Debug, Clone, Copy)]
pub enum Toggle {
    Favorite,
    Pin,
}

fn draft_from(form: &ActionForm) -> NoteDraft {
    NoteDraft {
        title: form.title.clone().unwrap_or_default(),
        content: form.content.clone().unwrap_or_default(),
        category: form.category.clone(),
    }
}

async fn form_page(
    state: &SharedState,
    status: StatusCode,
    note_id: &str,
    draft: NoteDraft,
    error: Option<String>,
) -> Response {
    let template = NoteFormTemplate {
        theme: theme(state).await,
        error,
        note_id: note_id.to_string(),
        category: draft.category(),
        title: draft.title,
        content: draft.content,
    };
    render(status, &template)
}

pub async fn create_page(state: &SharedState, jar: &CookieJar) -> Response {
    if let Err(e) = require_user(state, jar).await {
        return error_response(state, e).await;
    }
    let draft = NoteDraft::new("", "", DEFAULT_CATEGORY);
    form_page(state, StatusCode::OK, "", draft, None).await
}

pub async fn edit_page(state: &SharedState, jar: &CookieJar, id: &str) -> Response {
    let note = match require_user(state, jar).await {
        Ok(user) => operations::get_note(state, &user, id).await,
        Err(e) => Err(e),
    };
    match note {
        Ok(note) => {
            let draft = NoteDraft::new(note.title, note.content, &note.category);
            form_page(state, StatusCode::OK, &note.id, draft, None).await
        }
        Err(e) => error_response(state, e).await,
    }
}

pub async fn create(state: &SharedState, jar: &CookieJar, form: &ActionForm) -> Response {
    let user = match require_user(state, jar).await {
        Ok(user) => user,
        Err(e) => return error_response(state, e).await,
    };

    let draft = draft_from(form);
    match operations::create_note(state, &user, &draft).await {
        Ok(_) => redirect_with("dashboard", Notice::NoteCreated),
        Err(AppError::BadRequest(msg)) => {
            form_page(state, StatusCode::BAD_REQUEST, "", draft, Some(msg)).await
        }
        Err(e) => error_response(state, e).await,
    }
}

pub async fn update(state: &SharedState, jar: &CookieJar, form: &ActionForm) -> Response {
    let user = match require_user(state, jar).await {
        Ok(user) => user,
        Err(e) => return error_response(state, e).await,
    };

    let id = form.note_id.as_deref().unwrap_or_default();
    let draft = draft_from(form);
    match operations::update_note(state, &user, id, &draft).await {
        Ok(_) => redirect_with("dashboard", Notice::NoteUpdated),
        Err(AppError::BadRequest(msg)) => {
            form_page(state, StatusCode::BAD_REQUEST, id, draft, Some(msg)).await
        }
        Err(e) => error_response(state, e).await,
    }
}

pub async fn delete(state: &SharedState, jar: &CookieJar, form: &ActionForm) -> Response {
    let user = match require_user(state, jar).await {
        Ok(user) => user,
        Err(e) => return error_response(state, e).await,
    };

    let id = form.note_id.as_deref().unwrap_or_default();
    match operations::delete_note(state, &user, id).await {
        Ok(_) => redirect_with("dashboard", Notice::NoteDeleted),
        Err(e) => error_response(state, e).await,
    }
}

/// Flip a flag and return to the dashboard.
pub async fn toggle(state: &SharedState, jar: &CookieJar, id: &str, which: Toggle) -> Response {
    let user = match require_user(state, jar).await {
        Ok(user) => user,
        Err(e) => return error_response(state, e).await,
    };

    let result = match which {
        Toggle::Favorite => operations::toggle_favorite(state, &user, id).await,
        Toggle::Pin => operations::toggle_pin(state, &user, id).await,
    };
    match result {
        Ok(_) => to_dashboard(),
        Err(e) => error_response(state, e).await,
    }
}
