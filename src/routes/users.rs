/**
 * User Routes
 * Admin-only account management
 */
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::accounts::{self, CreateAccount, UpdateAccount};
use crate::db::models::{Role, User};
use crate::error::AppResult;
use crate::extractors::{AdminSession, AppJson, AppQuery};
use crate::routes::projects::parse_id;
use crate::routes::{IdQuery, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub id: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(accounts::list_users(state.users.as_ref()).await?))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = accounts::create_user(
        state.users.as_ref(),
        CreateAccount {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            role: payload.role.unwrap_or_default(),
        },
        state.settings.bcrypt_cost,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users
pub async fn update_user(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let id = parse_id(payload.id.as_deref(), "User")?;
    let user = accounts::update_user(
        state.users.as_ref(),
        id,
        UpdateAccount {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            role: payload.role,
        },
        state.settings.bcrypt_cost,
    )
    .await?;
    Ok(Json(user))
}

/// DELETE /api/users?id=
pub async fn delete_user(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    AppQuery(query): AppQuery<IdQuery>,
) -> AppResult<Json<SuccessResponse>> {
    let id = parse_id(query.id.as_deref(), "User")?;
    accounts::delete_user(state.users.as_ref(), id, session.id).await?;
    Ok(Json(SuccessResponse::ok()))
}
