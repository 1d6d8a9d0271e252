use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::session::{self, Session};
use crate::state::AppState;

/// `Json<T>` whose rejection renders as an `AppError` JSON body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query<T>` with the same rejection handling as [`AppJson`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Session if the request carries a valid token, `None` otherwise.
pub struct MaybeSession(pub Option<Session>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session::token_from_headers(&parts.headers)
            .and_then(|token| session::verify_token(token, &state.settings.session));
        Ok(MaybeSession(session))
    }
}

/// Any signed-in account. 401 otherwise.
pub struct AuthSession(pub Session);

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeSession(session) = MaybeSession::from_request_parts(parts, state).await?;
        session.map(AuthSession).ok_or_else(AppError::unauthorized)
    }
}

/// Role ADMIN required. Anonymous and non-admin callers both get 401.
pub struct AdminSession(pub Session);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthSession(session) = AuthSession::from_request_parts(parts, state).await?;
        if !session.is_admin() {
            tracing::warn!(user_id = %session.id, "Non-admin session rejected on admin route");
            return Err(AppError::unauthorized());
        }
        Ok(AdminSession(session))
    }
}
