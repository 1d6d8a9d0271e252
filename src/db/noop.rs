//! Fallback used when no database is configured at startup.
//!
//! Reads come back empty and writes are accepted and discarded, so public
//! pages keep rendering with their defaults instead of failing.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::models::{
    NewProject, NewUser, Project, ProjectChanges, SiteConfigEntry, UserChanges, UserRow,
};
use super::store::{ConfigStore, ProjectStore, StoreError, StoreResult, UserStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl ConfigStore for NoopStore {
    async fn get_all(&self) -> StoreResult<Vec<SiteConfigEntry>> {
        Ok(Vec::new())
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<SiteConfigEntry>> {
        Ok(None)
    }

    async fn upsert(&self, key: &str, value: &str) -> StoreResult<SiteConfigEntry> {
        tracing::debug!(key = %key, "no database configured, config write discarded");
        Ok(SiteConfigEntry {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

#[async_trait]
impl ProjectStore for NoopStore {
    async fn list(&self) -> StoreResult<Vec<Project>> {
        Ok(Vec::new())
    }

    async fn create(&self, project: NewProject) -> StoreResult<Project> {
        tracing::debug!("no database configured, project write discarded");
        Ok(Project {
            id: Uuid::new_v4(),
            title: project.title,
            title_th: project.title_th,
            description: project.description,
            description_th: project.description_th,
            image_url: project.image_url,
            tags: project.tags,
            link: project.link,
            created_at: Utc::now(),
        })
    }

    async fn update(&self, _id: Uuid, _changes: ProjectChanges) -> StoreResult<Project> {
        Err(StoreError::NotFound)
    }

    async fn delete(&self, _id: Uuid) -> StoreResult<()> {
        Err(StoreError::NotFound)
    }
}

#[async_trait]
impl UserStore for NoopStore {
    async fn list(&self) -> StoreResult<Vec<UserRow>> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: Uuid) -> StoreResult<Option<UserRow>> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &str) -> StoreResult<Option<UserRow>> {
        Ok(None)
    }

    async fn create(&self, user: NewUser) -> StoreResult<UserRow> {
        tracing::debug!("no database configured, user write discarded");
        let now = Utc::now();
        Ok(UserRow {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password: None,
            role: user.role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, _id: Uuid, _changes: UserChanges) -> StoreResult<UserRow> {
        Err(StoreError::NotFound)
    }

    async fn delete(&self, _id: Uuid) -> StoreResult<()> {
        Err(StoreError::NotFound)
    }
}
