//! In-memory store used by the unit tests. Mirrors the Postgres constraints
//! (unique config key, unique case-insensitive email, newest-first listing).

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::{
    atomic::{AtomicBool, AtomicI64, Ordering},
    Mutex,
};
use uuid::Uuid;

use super::models::{
    NewProject, NewUser, Project, ProjectChanges, SiteConfigEntry, UserChanges, UserRow,
};
use super::store::{ConfigStore, ProjectStore, StoreError, StoreResult, UserStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    config: Mutex<Vec<SiteConfigEntry>>,
    projects: Mutex<Vec<Project>>,
    users: Mutex<Vec<UserRow>>,
    unavailable: AtomicBool,
    clock: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails, standing in for an unreachable database.
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.unavailable.store(true, Ordering::SeqCst);
        store
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    /// Strictly increasing timestamps so ordering is deterministic.
    fn tick(&self) -> chrono::DateTime<Utc> {
        let n = self.clock.fetch_add(1, Ordering::SeqCst);
        Utc::now() + Duration::milliseconds(n)
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get_all(&self) -> StoreResult<Vec<SiteConfigEntry>> {
        self.check()?;
        Ok(self.config.lock().unwrap().clone())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<SiteConfigEntry>> {
        self.check()?;
        Ok(self
            .config
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.key == key)
            .cloned())
    }

    async fn upsert(&self, key: &str, value: &str) -> StoreResult<SiteConfigEntry> {
        self.check()?;
        let mut rows = self.config.lock().unwrap();
        match rows.iter_mut().find(|e| e.key == key) {
            Some(existing) => {
                existing.value = value.to_string();
                Ok(existing.clone())
            }
            None => {
                let entry = SiteConfigEntry {
                    key: key.to_string(),
                    value: value.to_string(),
                };
                rows.push(entry.clone());
                Ok(entry)
            }
        }
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Project>> {
        self.check()?;
        let mut rows = self.projects.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create(&self, project: NewProject) -> StoreResult<Project> {
        self.check()?;
        let row = Project {
            id: Uuid::new_v4(),
            title: project.title,
            title_th: project.title_th,
            description: project.description,
            description_th: project.description_th,
            image_url: project.image_url,
            tags: project.tags,
            link: project.link,
            created_at: self.tick(),
        };
        self.projects.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: ProjectChanges) -> StoreResult<Project> {
        self.check()?;
        let mut rows = self.projects.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(v) = changes.title {
            row.title = v;
        }
        if let Some(v) = changes.title_th {
            row.title_th = Some(v);
        }
        if let Some(v) = changes.description {
            row.description = v;
        }
        if let Some(v) = changes.description_th {
            row.description_th = Some(v);
        }
        if let Some(v) = changes.image_url {
            row.image_url = v;
        }
        if let Some(v) = changes.tags {
            row.tags = v;
        }
        if let Some(v) = changes.link {
            row.link = Some(v);
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.check()?;
        let mut rows = self.projects.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<UserRow>> {
        self.check()?;
        let mut rows = self.users.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRow>> {
        self.check()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRow>> {
        self.check()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> StoreResult<UserRow> {
        self.check()?;
        let mut rows = self.users.lock().unwrap();
        if rows.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Conflict("User".to_string()));
        }
        let now = self.tick();
        let row = UserRow {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password: user.password_hash,
            role: user.role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<UserRow> {
        self.check()?;
        let now = self.tick();
        let mut rows = self.users.lock().unwrap();
        if let Some(email) = &changes.email {
            if rows
                .iter()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(email))
            {
                return Err(StoreError::Conflict("User".to_string()));
            }
        }
        let row = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(v) = changes.email {
            row.email = v;
        }
        if let Some(v) = changes.password_hash {
            row.password = Some(v);
        }
        if let Some(v) = changes.name {
            row.name = Some(v);
        }
        if let Some(v) = changes.role {
            row.role = v.as_str().to_string();
        }
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.check()?;
        let mut rows = self.users.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
