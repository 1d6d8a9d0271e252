use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Settings;
use crate::db::{ConfigStore, ProjectStore, UserStore};
use crate::storage::UploadStore;

/// Shared by every handler. Stores are trait objects so the no-database
/// fallback and the test doubles plug in without touching the routes.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub site_config: Arc<dyn ConfigStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub users: Arc<dyn UserStore>,
    pub uploads: Arc<dyn UploadStore>,
    pub http: reqwest::Client,
    /// `None` when running without a database.
    pub db: Option<PgPool>,
}

impl AppState {
    pub fn has_database(&self) -> bool {
        self.db.is_some()
    }
}
