use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::models::Suggestion;
use crate::suggestions;

#[derive(Deserialize)]
pub struct SuggestRequest {
    pub content: String,
}

pub async fn suggest(_auth: AuthUser, Json(req): Json<SuggestRequest>) -> Json<Vec<Suggestion>> {
    Json(suggestions::suggest(&req.content))
}
