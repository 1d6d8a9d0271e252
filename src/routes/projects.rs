/**
 * Project Routes
 * Public listing plus admin create, update and delete
 */
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::models::{NewProject, Project, ProjectChanges};
use crate::db::StoreError;
use crate::error::{AppError, AppResult};
use crate::extractors::{AdminSession, AppJson, AppQuery};
use crate::routes::{IdQuery, SuccessResponse};
use crate::state::AppState;

/// PUT body: the id travels with the fields.
#[derive(Debug, Deserialize)]
pub struct ProjectUpdate {
    pub id: Option<String>,
    #[serde(flatten)]
    pub changes: ProjectChanges,
}

pub(crate) fn parse_id(raw: Option<&str>, what: &str) -> AppResult<Uuid> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} ID required", what)))?;
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{} not found", what)))
}

fn not_found(e: StoreError) -> AppError {
    match e {
        StoreError::NotFound => AppError::NotFound("Project not found".to_string()),
        other => other.into(),
    }
}

/// GET /api/projects
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = state.projects.list().await?;
    Ok(Json(projects))
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    AppJson(payload): AppJson<NewProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and description are required".to_string(),
        ));
    }

    let project = state.projects.create(payload).await?;
    tracing::info!(project_id = %project.id, user_id = %session.id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/projects
pub async fn update_project(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    AppJson(payload): AppJson<ProjectUpdate>,
) -> AppResult<Json<Project>> {
    let id = parse_id(payload.id.as_deref(), "Project")?;
    let changes = payload.changes;

    let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
    if blank(&changes.title) || blank(&changes.description) {
        return Err(AppError::Validation(
            "Title and description cannot be empty".to_string(),
        ));
    }

    let project = state.projects.update(id, changes).await.map_err(not_found)?;
    tracing::info!(project_id = %project.id, user_id = %session.id, "Project updated");
    Ok(Json(project))
}

/// DELETE /api/projects?id=
pub async fn delete_project(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    AppQuery(query): AppQuery<IdQuery>,
) -> AppResult<Json<SuccessResponse>> {
    let id = parse_id(query.id.as_deref(), "Project")?;
    state.projects.delete(id).await.map_err(not_found)?;
    tracing::info!(project_id = %id, user_id = %session.id, "Project deleted");
    Ok(Json(SuccessResponse::ok()))
}
