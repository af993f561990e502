use askama::Template;
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use crate::models::{Note, Suggestion};
use crate::operations;
use crate::state::SharedState;

use super::{error_response, render, require_user, theme};

#[derive(Template)]
#[template(path = "dashboard/index.html")]
#[allow(dead_code)]
struct DashboardTemplate {
    theme: String,
    user_name: String,
    notice: Option<String>,
    search: String,
    total: usize,
    pinned: Vec<NoteCard>,
    others: Vec<NoteCard>,
}

#[allow(dead_code)]
pub(crate) struct NoteCard {
    id: String,
    title: String,
    content: String,
    category: String,
    is_favorite: bool,
    is_pinned: bool,
    updated_at: String,
    suggestions: Vec<Suggestion>,
}

impl From<Note> for NoteCard {
    fn from(note: Note) -> Self {
        Self {
            updated_at: note.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            id: note.id,
            title: note.title,
            content: note.content,
            category: note.category,
            is_favorite: note.is_favorite,
            is_pinned: note.is_pinned,
            suggestions: note.suggestions,
        }
    }
}

/// Split a listing into pinned and unpinned notes, each keeping the listing order.
pub fn partition_pinned(notes: Vec<Note>) -> (Vec<Note>, Vec<Note>) {
    notes.into_iter().partition(|n| n.is_pinned)
}

pub async fn page(
    state: &SharedState,
    jar: &CookieJar,
    search: Option<&str>,
    notice: Option<String>,
) -> Response {
    let user = match require_user(state, jar).await {
        Ok(user) => user,
        Err(e) => return error_response(state, e).await,
    };

    let notes = match operations::list_notes(state, &user, search).await {
        Ok(notes) => notes,
        Err(e) => return error_response(state, e).await,
    };

    let total = notes.len();
    let (pinned, others) = partition_pinned(notes);
    let template = DashboardTemplate {
        theme: theme(state).await,
        user_name: user.username,
        notice,
        search: search.unwrap_or_default().to_string(),
        total,
        pinned: pinned.into_iter().map(NoteCard::from).collect(),
        others: others.into_iter().map(NoteCard::from).collect(),
    };
    render(StatusCode::OK, &template)
}
