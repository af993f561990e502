use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;

use crate::auth::jwt::{encode_token, Claims};
use crate::config::Config;
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "session";

/// Sign a session token for `user_id` and wrap it in the session cookie.
pub fn start(user_id: &str, config: &Config) -> Result<(CookieJar, String), AppError> {
    let claims = Claims::new(user_id, config.session_ttl_hours);
    let token = encode_token(&claims, &config.session_secret).map_err(AppError::Internal)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(config.session_ttl_hours))
        .build();

    Ok((CookieJar::new().add(cookie), token))
}

pub fn end() -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(cookie)
}
