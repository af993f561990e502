use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::{Note, NoteDraft};
use crate::operations;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Note>>, AppError> {
    let user = operations::current_user(&state, &auth).await?;
    let notes = operations::list_notes(&state, &user, q.search.as_deref()).await?;
    Ok(Json(notes))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(draft): Json<NoteDraft>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let user = operations::current_user(&state, &auth).await?;
    let note = operations::create_note(&state, &user, &draft).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, AppError> {
    let user = operations::current_user(&state, &auth).await?;
    Ok(Json(operations::get_note(&state, &user, &id).await?))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(draft): Json<NoteDraft>,
) -> Result<Json<Note>, AppError> {
    let user = operations::current_user(&state, &auth).await?;
    Ok(Json(operations::update_note(&state, &user, &id, &draft).await?))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = operations::current_user(&state, &auth).await?;
    operations::delete_note(&state, &user, &id).await?;
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

pub async fn toggle_favorite(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, AppError> {
    let user = operations::current_user(&state, &auth).await?;
    Ok(Json(operations::toggle_favorite(&state, &user, &id).await?))
}

pub async fn toggle_pin(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, AppError> {
    let user = operations::current_user(&state, &auth).await?;
    Ok(Json(operations::toggle_pin(&state, &user, &id).await?))
}
