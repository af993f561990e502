pub mod auth;
pub mod notes;
pub mod settings;
pub mod suggestions;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/me", get(auth::me))
        // Notes
        .route("/api/v1/notes", get(notes::list).post(notes::create))
        .route(
            "/api/v1/notes/{id}",
            get(notes::get).put(notes::update).delete(notes::delete),
        )
        .route("/api/v1/notes/{id}/favorite", post(notes::toggle_favorite))
        .route("/api/v1/notes/{id}/pin", post(notes::toggle_pin))
        // Preferences
        .route("/api/v1/settings", get(settings::get).put(settings::update))
        // Suggestions
        .route("/api/v1/suggestions", post(suggestions::suggest))
}
