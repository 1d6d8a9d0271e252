use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{
    NewProject, NewUser, Project, ProjectChanges, SiteConfigEntry, UserChanges, UserRow,
};
use super::store::{ConfigStore, ProjectStore, StoreError, StoreResult, UserStore};

const PROJECT_COLUMNS: &str =
    "id, title, title_th, description, description_th, image_url, tags, link, created_at";

const USER_COLUMNS: &str = "id, name, email, password, role, created_at, updated_at";

/// Store backed by the Postgres pool created at startup.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation onto [`StoreError::Conflict`].
fn conflict_or(e: sqlx::Error, what: &str) -> StoreError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Conflict(what.to_string()),
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl ConfigStore for PgStore {
    async fn get_all(&self) -> StoreResult<Vec<SiteConfigEntry>> {
        let rows = sqlx::query_as::<_, SiteConfigEntry>(
            "SELECT key, value FROM site_config ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<SiteConfigEntry>> {
        let row = sqlx::query_as::<_, SiteConfigEntry>(
            "SELECT key, value FROM site_config WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert(&self, key: &str, value: &str) -> StoreResult<SiteConfigEntry> {
        let row = sqlx::query_as::<_, SiteConfigEntry>(
            r#"
            INSERT INTO site_config (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            RETURNING key, value
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list(&self) -> StoreResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, project: NewProject) -> StoreResult<Project> {
        let row = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (title, title_th, description, description_th, image_url, tags, link)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(&project.title)
        .bind(&project.title_th)
        .bind(&project.description)
        .bind(&project.description_th)
        .bind(&project.image_url)
        .bind(&project.tags)
        .bind(&project.link)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: ProjectChanges) -> StoreResult<Project> {
        let row = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects SET
                title = COALESCE($2, title),
                title_th = COALESCE($3, title_th),
                description = COALESCE($4, description),
                description_th = COALESCE($5, description_th),
                image_url = COALESCE($6, image_url),
                tags = COALESCE($7, tags),
                link = COALESCE($8, link)
            WHERE id = $1
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.title_th)
        .bind(&changes.description)
        .bind(&changes.description_th)
        .bind(&changes.image_url)
        .bind(&changes.tags)
        .bind(&changes.link)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list(&self) -> StoreResult<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, user: NewUser) -> StoreResult<UserRow> {
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, password, name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, now(), now())
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, "User"))
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                password = COALESCE($3, password),
                name = COALESCE($4, name),
                role = COALESCE($5, role),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(&changes.name)
        .bind(changes.role.map(|r| r.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or(e, "User"))?;
        row.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
