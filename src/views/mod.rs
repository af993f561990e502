pub mod auth;
pub mod dashboard;
pub mod notes;
pub mod settings;

use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::auth::session;
use crate::error::AppError;
use crate::middleware::auth_redirect::LOGIN_PATH;
use crate::models::User;
use crate::operations;
use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new().route("/", get(show).post(submit))
}

/// Query string of `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub action: Option<String>,
    pub search: Option<String>,
    pub id: Option<String>,
    pub notice: Option<String>,
    pub toggle_favorite: Option<String>,
    pub toggle_pin: Option<String>,
}

/// Form body of `POST /`; which fields matter depends on `action`.
#[derive(Debug, Default, Deserialize)]
pub struct ActionForm {
    #[serde(default)]
    pub action: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub note_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub email_notifications: Option<String>,
    pub ai_suggestions: Option<String>,
}

/// Status messages carried across redirects as a fixed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Welcome,
    LoggedOut,
    NoteCreated,
    NoteUpdated,
    NoteDeleted,
    NoteNotFound,
    SettingsSaved,
}

impl Notice {
    pub fn code(&self) -> &'static str {
        match self {
            Notice::Welcome => "welcome",
            Notice::LoggedOut => "logged_out",
            Notice::NoteCreated => "note_created",
            Notice::NoteUpdated => "note_updated",
            Notice::NoteDeleted => "note_deleted",
            Notice::NoteNotFound => "note_not_found",
            Notice::SettingsSaved => "settings_saved",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        [
            Notice::Welcome,
            Notice::LoggedOut,
            Notice::NoteCreated,
            Notice::NoteUpdated,
            Notice::NoteDeleted,
            Notice::NoteNotFound,
            Notice::SettingsSaved,
        ]
        .into_iter()
        .find(|n| n.code() == code)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::Welcome => "Welcome! Your account has been created.",
            Notice::LoggedOut => "You have been logged out.",
            Notice::NoteCreated => "Note created successfully!",
            Notice::NoteUpdated => "Note updated successfully!",
            Notice::NoteDeleted => "Note deleted successfully!",
            Notice::NoteNotFound => "That note could not be found.",
            Notice::SettingsSaved => "Settings updated successfully!",
        }
    }
}

pub(crate) fn notice_message(code: Option<&str>) -> Option<String> {
    code.and_then(Notice::from_code).map(|n| n.message().to_string())
}

pub(crate) fn redirect_with(action: &str, notice: Notice) -> Response {
    Redirect::to(&format!("/?action={action}&notice={}", notice.code())).into_response()
}

pub(crate) fn to_dashboard() -> Response {
    Redirect::to("/?action=dashboard").into_response()
}

pub(crate) fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template render failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Page theme from the settings document; cosmetic, so failures fall back to the default.
pub(crate) async fn theme(state: &SharedState) -> String {
    state
        .db
        .settings
        .get()
        .await
        .map(|s| s.theme.as_str().to_string())
        .unwrap_or_else(|_| "light".to_string())
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    theme: String,
    status: u16,
    message: String,
}

/// Map a failed page action to a browser response: login redirect, dashboard
/// notice, or an error page.
pub(crate) async fn error_response(state: &SharedState, err: AppError) -> Response {
    match err {
        AppError::Unauthenticated(_) => (session::end(), Redirect::to(LOGIN_PATH)).into_response(),
        AppError::NotFound(_) => redirect_with("dashboard", Notice::NoteNotFound),
        err => {
            let status = err.status();
            let template = ErrorTemplate {
                theme: theme(state).await,
                status: status.as_u16(),
                message: err.public_message(),
            };
            render(status, &template)
        }
    }
}

/// The logged-in user, or `Unauthenticated`.
pub(crate) async fn require_user(state: &SharedState, jar: &CookieJar) -> Result<User, AppError> {
    let auth = AuthUser::from_jar(jar, state)
        .ok_or_else(|| AppError::Unauthenticated("Please log in first.".to_string()))?;
    operations::current_user(state, &auth).await
}

/// `GET /?action=...`
pub async fn show(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(q): Query<PageQuery>,
) -> Response {
    if let Some(id) = q.toggle_favorite.as_deref() {
        return notes::toggle(&state, &jar, id, notes::Toggle::Favorite).await;
    }
    if let Some(id) = q.toggle_pin.as_deref() {
        return notes::toggle(&state, &jar, id, notes::Toggle::Pin).await;
    }

    let notice = notice_message(q.notice.as_deref());
    match q.action.as_deref().unwrap_or("dashboard") {
        "login" => auth::login_page(&state, &jar, notice).await,
        "register" => auth::register_page(&state, &jar, notice).await,
        "logout" => auth::logout(),
        "create_note" => notes::create_page(&state, &jar).await,
        "edit_note" => notes::edit_page(&state, &jar, q.id.as_deref().unwrap_or_default()).await,
        "settings" | "ai_settings" => settings::page(&state, &jar, notice).await,
        _ => dashboard::page(&state, &jar, q.search.as_deref(), notice).await,
    }
}

/// `POST /` with an `action` form field.
pub async fn submit(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<ActionForm>,
) -> Response {
    match form.action.as_str() {
        "login" => auth::login(&state, &form).await,
        "register" => auth::register(&state, &form).await,
        "create_note" => notes::create(&state, &jar, &form).await,
        "update_note" => notes::update(&state, &jar, &form).await,
        "delete_note" => notes::delete(&state, &jar, &form).await,
        "toggle_favorite" => {
            notes::toggle(&state, &jar, form.note_id.as_deref().unwrap_or_default(), notes::Toggle::Favorite).await
        }
        "toggle_pin" => {
            notes::toggle(&state, &jar, form.note_id.as_deref().unwrap_or_default(), notes::Toggle::Pin).await
        }
        "update_settings" | "update_ai_settings" => settings::update(&state, &jar, &form).await,
        other => {
            tracing::debug!("Unknown form action '{other}'");
            to_dashboard()
        }
    }
}
