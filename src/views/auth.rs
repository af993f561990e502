use askama::Template;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use crate::auth::extractor::AuthUser;
use crate::auth::session;
use crate::config::RegistrationMode;
use crate::error::AppError;
use crate::operations;
use crate::state::SharedState;

use super::{error_response, redirect_with, render, theme, to_dashboard, ActionForm, Notice};

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    theme: String,
    notice: Option<String>,
    error: Option<String>,
    email: String,
    registration_open: bool,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    theme: String,
    /// False hides the form.
    open: bool,
    error: Option<String>,
    username: String,
    email: String,
}

fn logged_in(state: &SharedState, jar: &CookieJar) -> bool {
    AuthUser::from_jar(jar, state).is_some()
}

pub async fn login_page(state: &SharedState, jar: &CookieJar, notice: Option<String>) -> Response {
    // If already logged in, redirect to dashboard
    if logged_in(state, jar) {
        return to_dashboard();
    }

    let template = LoginTemplate {
        theme: theme(state).await,
        notice,
        error: None,
        email: String::new(),
        registration_open: state.config.registration == RegistrationMode::Open,
    };
    render(StatusCode::OK, &template)
}

pub async fn register_page(state: &SharedState, jar: &CookieJar, _notice: Option<String>) -> Response {
    if logged_in(state, jar) {
        return to_dashboard();
    }

    if state.config.registration == RegistrationMode::Closed {
        let err = AppError::Forbidden("Registration is disabled.".to_string());
        let template = RegisterTemplate {
            theme: theme(state).await,
            open: false,
            error: Some(err.public_message()),
            username: String::new(),
            email: String::new(),
        };
        return render(err.status(), &template);
    }

    let template = RegisterTemplate {
        theme: theme(state).await,
        open: true,
        error: None,
        username: String::new(),
        email: String::new(),
    };
    render(StatusCode::OK, &template)
}

pub fn logout() -> Response {
    (session::end(), redirect_with("login", Notice::LoggedOut)).into_response()
}

pub async fn login(state: &SharedState, form: &ActionForm) -> Response {
    let email = form.email.clone().unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();

    let err = match operations::login(state, &email, password).await {
        Ok(user) => {
            return match session::start(&user.id, &state.config) {
                Ok((jar, _)) => (jar, to_dashboard()).into_response(),
                Err(e) => error_response(state, e).await,
            };
        }
        Err(e) => e,
    };

    match err {
        AppError::InvalidCredentials | AppError::RateLimited(_) | AppError::BadRequest(_) => {
            let template = LoginTemplate {
                theme: theme(state).await,
                notice: None,
                error: Some(err.public_message()),
                email,
                registration_open: state.config.registration == RegistrationMode::Open,
            };
            // 200 so the unauthorized redirect layer leaves the page alone
            render(StatusCode::OK, &template)
        }
        err => error_response(state, err).await,
    }
}

pub async fn register(state: &SharedState, form: &ActionForm) -> Response {
    let username = form.username.clone().unwrap_or_default();
    let email = form.email.clone().unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();

    let err = match operations::register(state, &username, &email, password).await {
        Ok(user) => {
            return match session::start(&user.id, &state.config) {
                Ok((jar, _)) => (jar, redirect_with("dashboard", Notice::Welcome)).into_response(),
                Err(e) => error_response(state, e).await,
            };
        }
        Err(e) => e,
    };

    match err {
        AppError::EmailAlreadyRegistered | AppError::BadRequest(_) | AppError::Forbidden(_) => {
            let template = RegisterTemplate {
                theme: theme(state).await,
                open: state.config.registration == RegistrationMode::Open,
                error: Some(err.public_message()),
                username,
                email,
            };
            render(err.status(), &template)
        }
        err => error_response(state, err).await,
    }
}
