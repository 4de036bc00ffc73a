//! Admin login and logout.

use axum::{
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
    Form,
};
use minijinja::context;
use serde::Deserialize;

use super::redirect;
use crate::auth::{
    clear_cookie_headers, verify_admin_token, AdminSession, INVALID_TOKEN_MESSAGE,
};
use crate::db::Repository;
use crate::errors::AppError;
use crate::AppState;

/// Login form body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub token: String,
}

/// GET /admin/login - Show the login form.
pub async fn login_form(
    State(state): State<AppState>,
    repo: Repository,
) -> Result<Response, AppError> {
    render_login(&state, repo, None).await
}

/// POST /admin/login - Check the token and start an admin session.
pub async fn login(
    State(state): State<AppState>,
    repo: Repository,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if verify_admin_token(&form.token, &state.config.admin_token) {
        tracing::info!("Admin logged in");
        let cookies = AdminSession::admin().set_cookie_headers(&state.cookies);
        return Ok((AppendHeaders(cookies), redirect(&state, "/admin")).into_response());
    }

    tracing::warn!("Rejected admin login attempt");
    render_login(&state, repo, Some(INVALID_TOKEN_MESSAGE)).await
}

/// POST /admin/logout - Drop admin rights from the session.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookies = clear_cookie_headers(&state.cookies);
    (AppendHeaders(cookies), redirect(&state, "/feed")).into_response()
}

async fn render_login(
    state: &AppState,
    mut repo: Repository,
    error: Option<&str>,
) -> Result<Response, AppError> {
    let settings = repo.get_settings().await?;
    let token_set = !state.config.admin_token.is_empty();

    let page = state.views.render(
        "admin_login.html",
        context! { settings, error, token_set },
    )?;
    Ok(page.into_response())
}
