use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

pub const LOGIN_PATH: &str = "/?action=login";

/// Middleware that redirects 401 responses to the login page for browser requests.
pub async fn redirect_unauthorized(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if response.status() == StatusCode::UNAUTHORIZED {
        Redirect::to(LOGIN_PATH).into_response()
    } else {
        response
    }
}
