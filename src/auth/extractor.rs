use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::jwt;
use crate::auth::session::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::SharedState;

/// The user behind a valid session cookie or bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl AuthUser {
    /// Session from the cookie jar alone; `None` when absent, forged or expired.
    pub fn from_jar(jar: &CookieJar, state: &SharedState) -> Option<Self> {
        let cookie = jar.get(SESSION_COOKIE)?;
        jwt::decode_token(cookie.value(), &state.config.session_secret)
            .ok()
            .map(|claims| AuthUser {
                user_id: claims.sub,
            })
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Try Bearer token from Authorization header first
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header.to_str().map_err(|_| {
                AppError::Unauthenticated("Invalid authorization header".to_string())
            })?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let claims = jwt::decode_token(token, &state.config.session_secret).map_err(
                    |_| AppError::Unauthenticated("Invalid or expired session".to_string()),
                )?;

                return Ok(AuthUser {
                    user_id: claims.sub,
                });
            }
        }

        let jar = CookieJar::from_headers(&parts.headers);
        if jar.get(SESSION_COOKIE).is_some() {
            return AuthUser::from_jar(&jar, state).ok_or_else(|| {
                AppError::Unauthenticated("Invalid or expired session".to_string())
            });
        }

        Err(AppError::Unauthenticated("Please log in first.".to_string()))
    }
}
