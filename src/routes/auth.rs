use axum::extract::State;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::extractor::AuthUser;
use crate::auth::session;
use crate::error::AppError;
use crate::models::UserProfile;
use crate::operations;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let user = operations::register(&state, &req.username, &req.email, &req.password).await?;

    let (jar, token) = session::start(&user.id, &state.config)?;
    Ok((jar, Json(AuthResponse {
        token,
        user: UserProfile::from(&user),
    })))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let user = operations::login(&state, &req.email, &req.password).await?;

    let (jar, token) = session::start(&user.id, &state.config)?;
    Ok((jar, Json(AuthResponse {
        token,
        user: UserProfile::from(&user),
    })))
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (session::end(), Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

pub async fn me(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<UserProfile>, AppError> {
    let user = operations::current_user(&state, &auth).await?;
    Ok(Json(UserProfile::from(&user)))
}
