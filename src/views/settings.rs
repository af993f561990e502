use askama::Template;
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use crate::models::PreferencesPatch;
use crate::operations;
use crate::state::SharedState;

use super::{error_response, redirect_with, render, require_user, theme, ActionForm, Notice};

#[derive(Template)]
#[template(path = "settings/index.html")]
struct SettingsTemplate {
    theme: String,
    notice: Option<String>,
    user_name: String,
    user_email: String,
    email_notifications: bool,
    ai_suggestions: bool,
    email_available: bool,
    ai_available: bool,
}

pub async fn page(state: &SharedState, jar: &CookieJar, notice: Option<String>) -> Response {
    let user = match require_user(state, jar).await {
        Ok(user) => user,
        Err(e) => return error_response(state, e).await,
    };

    let template = SettingsTemplate {
        theme: theme(state).await,
        notice,
        user_name: user.username,
        user_email: user.email,
        email_notifications: user.preferences.email_notifications,
        ai_suggestions: user.preferences.ai_suggestions,
        email_available: state.config.features.email_notifications,
        ai_available: state.config.features.ai_suggestions,
    };
    render(StatusCode::OK, &template)
}

/// Unchecked boxes are absent from the form, so absence means off.
fn patch_from(form: &ActionForm) -> PreferencesPatch {
    PreferencesPatch {
        email_notifications: Some(form.email_notifications.is_some()),
        ai_suggestions: Some(form.ai_suggestions.is_some()),
    }
}

pub async fn update(state: &SharedState, jar: &CookieJar, form: &ActionForm) -> Response {
    let user = match require_user(state, jar).await {
        Ok(user) => user,
        Err(e) => return error_response(state, e).await,
    };

    match operations::update_preferences(state, &user, patch_from(form)).await {
        Ok(_) => redirect_with("settings", Notice::SettingsSaved),
        Err(e) => error_response(state, e).await,
    }
}
