/**
 * Health Routes
 * Liveness, database reachability and readiness
 */
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::state::AppState;

lazy_static::lazy_static! {
    static ref SERVER_START: Instant = Instant::now();
}

pub fn init_start_time() {
    lazy_static::initialize(&SERVER_START);
}

/// Database probe result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseCheck {
    /// `healthy`, `unhealthy`, or `disabled` when running without a database.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyChecks {
    pub database: String,
    pub uploads: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime: u64,
    /// `database` or `no-database`
    pub mode: String,
    pub checks: ReadyChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleHealthResponse {
    pub status: String,
}

async fn check_database(state: &AppState) -> DatabaseCheck {
    if !state.has_database() {
        return DatabaseCheck {
            status: "disabled".to_string(),
            response_time: None,
            error: None,
        };
    }
    match crate::db::health_check(state.db.as_ref()).await {
        Ok(duration) => DatabaseCheck {
            status: "healthy".to_string(),
            response_time: Some(duration.as_millis() as u64),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            DatabaseCheck {
                status: "unhealthy".to_string(),
                response_time: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// GET /health
pub async fn health_ping() -> Json<SimpleHealthResponse> {
    Json(SimpleHealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /health/database
pub async fn health_database(State(state): State<AppState>) -> Json<DatabaseCheck> {
    Json(check_database(&state).await)
}

/// GET /health/ready
/// The site serves (with defaults) even when the database is down, so this
/// reports ready as long as the process is up and says which mode it is in.
pub async fn health_ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let database = check_database(&state).await;

    Json(ReadyResponse {
        status: "ready".to_string(),
        timestamp: Utc::now(),
        uptime: SERVER_START.elapsed().as_secs(),
        mode: if state.has_database() {
            "database".to_string()
        } else {
            "no-database".to_string()
        },
        checks: ReadyChecks {
            database: database.status,
            uploads: state.uploads.name().to_string(),
        },
    })
}
