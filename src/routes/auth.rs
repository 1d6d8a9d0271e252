/**
 * Authentication Routes
 * Credential and GitHub sign-in, admin login with rollback, logout and session
 */
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::accounts;
use crate::db::models::{Role, User};
use crate::error::{AppError, AppResult};
use crate::extractors::{AppJson, AppQuery, MaybeSession};
use crate::oauth;
use crate::session::{self, Session};
use crate::state::AppState;

use super::{ErrorResponse, SuccessResponse};

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: Session,
    /// Same token as the cookie, for `Authorization: Bearer` clients.
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Appends a `Set-Cookie` header to an already built response.
fn with_cookie(mut res: Response, cookie: String) -> Response {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            res.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => tracing::error!("Invalid cookie header: {}", e),
    }
    res
}

fn validate_login(payload: &LoginRequest) -> AppResult<()> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

fn start_session(state: &AppState, user: &User) -> AppResult<Response> {
    let session = Session::from(user);
    let token = session::issue_token(&session, &state.settings.session).map_err(|e| {
        tracing::error!("Failed to sign session token: {}", e);
        AppError::Internal("could not issue session".to_string())
    })?;
    let cookie = session::session_cookie(&token, &state.settings.session);

    let res = Json(LoginResponse {
        success: true,
        user: session,
        token,
    })
    .into_response();
    Ok(with_cookie(res, cookie))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Response> {
    validate_login(&payload)?;

    let user = accounts::authenticate(state.users.as_ref(), &payload.email, &payload.password).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
    start_session(&state, &user)
}

async fn authenticate_admin(state: &AppState, payload: &LoginRequest) -> AppResult<Response> {
    validate_login(payload)?;
    let user = accounts::authenticate(state.users.as_ref(), &payload.email, &payload.password).await?;
    if user.role != Role::Admin {
        tracing::warn!(user_id = %user.id, "Admin login refused for non-admin account");
        return Err(AppError::Forbidden(
            "Access denied. Admin privileges required.".to_string(),
        ));
    }
    tracing::info!(user_id = %user.id, "Admin signed in");
    start_session(state, &user)
}

/// POST /api/auth/admin-login
/// Clears any existing session before checking credentials. A valid account
/// without the admin role is signed straight back out and gets 403.
pub async fn admin_login(
    State(state): State<AppState>,
    payload: Result<AppJson<LoginRequest>, AppError>,
) -> Response {
    let outcome = match payload {
        Ok(AppJson(payload)) => authenticate_admin(&state, &payload).await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(res) => res,
        Err(e) => with_cookie(
            e.into_response(),
            session::clear_session_cookie(&state.settings.session),
        ),
    }
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, MaybeSession(session): MaybeSession) -> Response {
    if let Some(session) = session {
        tracing::info!(user_id = %session.id, "Signed out");
    }
    with_cookie(
        Json(SuccessResponse::ok()).into_response(),
        session::clear_session_cookie(&state.settings.session),
    )
}

/// GET /api/auth/session
pub async fn current_session(MaybeSession(session): MaybeSession) -> Json<Option<Session>> {
    Json(session)
}

/// GET /api/auth/github
pub async fn github(State(state): State<AppState>) -> AppResult<Response> {
    let github = state
        .settings
        .github
        .as_ref()
        .ok_or_else(|| AppError::NotFound("GitHub sign-in is not configured".to_string()))?;

    let oauth_state = oauth::new_state();
    let url = oauth::authorize_url(github, &oauth_state);
    Ok((
        AppendHeaders([(
            SET_COOKIE,
            session::oauth_state_cookie(&oauth_state, &state.settings.session),
        )]),
        Redirect::to(&url),
    )
        .into_response())
}

fn oauth_failure(state: &AppState, reason: &str) -> Response {
    (
        AppendHeaders([(
            SET_COOKIE,
            session::clear_oauth_state_cookie(&state.settings.session),
        )]),
        Redirect::to(&format!("/auth/login?error={}", reason)),
    )
        .into_response()
}

/// GET /api/auth/github/callback
pub async fn github_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppQuery(query): AppQuery<CallbackQuery>,
) -> Response {
    let Some(github) = state.settings.github.as_ref() else {
        return (
            axum::http::StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("GitHub sign-in is not configured")),
        )
            .into_response();
    };

    if let Some(error) = query.error.as_deref() {
        tracing::warn!("GitHub returned an error: {}", error);
        return oauth_failure(&state, "OAuthCallback");
    }

    let expected = session::cookie_value(&headers, session::OAUTH_STATE_COOKIE);
    let (Some(code), Some(returned)) = (query.code.as_deref(), query.state.as_deref()) else {
        return oauth_failure(&state, "OAuthCallback");
    };
    if expected != Some(returned) {
        tracing::warn!("OAuth state mismatch");
        return oauth_failure(&state, "OAuthState");
    }

    let profile = match oauth::exchange_code(&state.http, github, code).await {
        Ok(token) => oauth::fetch_profile(&state.http, &token).await,
        Err(e) => Err(e),
    };
    let profile = match profile {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("GitHub sign-in failed: {}", e);
            return oauth_failure(&state, "OAuthSignin");
        }
    };

    let user = match accounts::find_or_create_oauth(state.users.as_ref(), &profile.email, profile.name).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Could not resolve OAuth account: {}", e);
            return oauth_failure(&state, "OAuthAccount");
        }
    };

    let session = Session::from(&user);
    let token = match session::issue_token(&session, &state.settings.session) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to sign session token: {}", e);
            return oauth_failure(&state, "OAuthSignin");
        }
    };
    tracing::info!(user_id = %user.id, "Signed in with GitHub");

    (
        AppendHeaders([
            (SET_COOKIE, session::session_cookie(&token, &state.settings.session)),
            (SET_COOKIE, session::clear_oauth_state_cookie(&state.settings.session)),
        ]),
        Redirect::to("/"),
    )
        .into_response()
}
