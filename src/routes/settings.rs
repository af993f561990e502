use axum::extract::State;
use axum::Json;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::{Preferences, PreferencesPatch};
use crate::operations;
use crate::state::SharedState;

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Preferences>, AppError> {
    let user = operations::current_user(&state, &auth).await?;
    Ok(Json(user.preferences))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(patch): Json<PreferencesPatch>,
) -> Result<Json<Preferences>, AppError> {
    let user = operations::current_user(&state, &auth).await?;
    let user = operations::update_preferences(&state, &user, patch).await?;
    Ok(Json(user.preferences))
}
