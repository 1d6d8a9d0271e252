//! Database Models - structs representing database tables (used by sqlx/serde).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of the `site_config` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SiteConfigEntry {
    pub key: String,
    pub value: String,
}

/// Portfolio project model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "title_th")]
    pub title_th: Option<String>,
    pub description: String,
    #[serde(rename = "description_th")]
    pub description_th: Option<String>,
    pub image_url: String,
    pub tags: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Tags are stored comma-joined; blanks are dropped.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// New project for insertion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    #[serde(default, rename = "title_th")]
    pub title_th: Option<String>,
    pub description: String,
    #[serde(default, rename = "description_th")]
    pub description_th: Option<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Project update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChanges {
    pub title: Option<String>,
    #[serde(rename = "title_th")]
    pub title_th: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "description_th")]
    pub description_th: Option<String>,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub link: Option<String>,
}

/// Account role carried in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// Parses the stored role column. Anything unrecognised is treated as `USER`.
    pub fn from_db(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "ADMIN" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `users` row, including the password hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub password: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as exposed by the API: no password field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: Role::from_db(&row.role),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// New user for insertion. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub role: Role,
}

/// User update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(tags: &str) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: "Nova".to_string(),
            title_th: None,
            description: "desc".to_string(),
            description_th: None,
            image_url: String::new(),
            tags: tags.to_string(),
            link: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_tag_list_trims_and_drops_blanks() {
        assert_eq!(project(" Rust, Axum ,,SQL ").tag_list(), vec!["Rust", "Axum", "SQL"]);
        assert!(project("").tag_list().is_empty());
    }

    #[test]
    fn test_project_serializes_with_wire_names() {
        let json = serde_json::to_value(project("a")).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("title_th").is_some());
        assert!(json.get("description_th").is_some());
    }

    #[test]
    fn test_role_round_trips_through_db_text() {
        assert_eq!(Role::from_db("ADMIN"), Role::Admin);
        assert_eq!(Role::from_db("admin"), Role::Admin);
        assert_eq!(Role::from_db("USER"), Role::User);
        assert_eq!(Role::from_db("something"), Role::User);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn test_user_has_no_password_field() {
        let row = UserRow {
            id: Uuid::new_v4(),
            name: Some("Ada".to_string()),
            email: "ada@example.com".to_string(),
            password: Some("$2b$04$hash".to_string()),
            role: "ADMIN".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(User::from(row)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "ADMIN");
    }
}
