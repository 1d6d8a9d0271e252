//! Store interfaces shared by the Postgres backend and the no-database fallback.

use async_trait::async_trait;
use uuid::Uuid;

use super::models::{
    NewProject, NewUser, Project, ProjectChanges, SiteConfigEntry, UserChanges, UserRow,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value site configuration. `upsert` is the only write path.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get_all(&self) -> StoreResult<Vec<SiteConfigEntry>>;

    async fn get(&self, key: &str) -> StoreResult<Option<SiteConfigEntry>>;

    async fn upsert(&self, key: &str, value: &str) -> StoreResult<SiteConfigEntry>;
}

/// Portfolio entries, listed newest first.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Project>>;

    async fn create(&self, project: NewProject) -> StoreResult<Project>;

    /// Fails with [`StoreError::NotFound`] when `id` does not exist.
    async fn update(&self, id: Uuid, changes: ProjectChanges) -> StoreResult<Project>;

    /// Fails with [`StoreError::NotFound`] when `id` does not exist.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

/// Accounts. Rows carry the password hash; callers strip it before replying.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<UserRow>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRow>>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRow>>;

    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn create(&self, user: NewUser) -> StoreResult<UserRow>;

    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<UserRow>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}
