/**
 * Routes Module
 * HTTP handlers for the public site, the auth flows and the admin API
 */
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod background;
pub mod config;
pub mod health;
pub mod pages;
pub mod projects;
pub mod theme;
pub mod upload;
pub mod users;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            hint: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// `?id=` selector used by the admin delete endpoints.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}
