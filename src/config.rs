/*!
 * Settings
 * Everything the process reads from the environment, resolved once at startup
 */
use std::collections::HashMap;
use std::path::PathBuf;

use crate::db::DbConfig;

/// Placeholder secret; refused in production.
pub const DEFAULT_SESSION_SECRET: &str = "default-session-secret-change-in-production";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn parse(value: Option<&String>) -> Self {
        match value.map(|s| s.to_ascii_lowercase()) {
            Some(v) if v == "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub secret: String,
    pub ttl_days: i64,
    /// Adds `Secure` to session cookies.
    pub secure_cookie: bool,
}

/// Admin account created at startup when missing.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub credential: AdminCredential,
    /// `ADMIN_RESET_PASSWORD=true`: re-apply the credential and the ADMIN
    /// role to an existing account on startup.
    pub reset: bool,
}

#[derive(Debug, Clone)]
pub enum AdminCredential {
    Plain(String),
    Hash(String),
}

#[derive(Debug, Clone)]
pub struct GithubSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    pub url: String,
    pub key: String,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Cloud bucket; local directory otherwise.
    pub supabase: Option<SupabaseSettings>,
    pub upload_dir: PathBuf,
    pub public_prefix: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub site_url: String,
    pub database: Option<DbConfig>,
    pub session: SessionSettings,
    pub bcrypt_cost: u32,
    pub admin_seed: Option<AdminSeed>,
    pub github: Option<GithubSettings>,
    pub storage: StorageSettings,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let get = |name: &str| -> Option<String> {
            vars.get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = Environment::parse(vars.get("ENVIRONMENT"));
        let port = get("PORT").and_then(|s| s.parse().ok()).unwrap_or(3000);
        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let site_url = get("SITE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let session = SessionSettings {
            secret: get("SESSION_SECRET")
                .or_else(|| get("NEXTAUTH_SECRET"))
                .unwrap_or_else(|| DEFAULT_SESSION_SECRET.to_string()),
            ttl_days: get("SESSION_TTL_DAYS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            secure_cookie: environment.is_production(),
        };

        let bcrypt_cost = get("BCRYPT_COST")
            .and_then(|s| s.parse().ok())
            .unwrap_or(bcrypt::DEFAULT_COST);

        let admin_seed = get("ADMIN_EMAIL").and_then(|email| {
            let credential = get("ADMIN_PASSWORD_HASH")
                .map(AdminCredential::Hash)
                .or_else(|| get("ADMIN_PASSWORD").map(AdminCredential::Plain))?;
            let reset = get("ADMIN_RESET_PASSWORD")
                .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));
            Some(AdminSeed {
                email,
                credential,
                reset,
            })
        });

        let github = match (get("GITHUB_ID"), get("GITHUB_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(GithubSettings {
                client_id,
                client_secret,
                redirect_url: format!("{}/api/auth/github/callback", site_url),
            }),
            _ => None,
        };

        let supabase_url = get("SUPABASE_URL").or_else(|| get("NEXT_PUBLIC_SUPABASE_URL"));
        let supabase_key = get("SUPABASE_SERVICE_ROLE_KEY")
            .or_else(|| get("SUPABASE_ANON_KEY"))
            .or_else(|| get("NEXT_PUBLIC_SUPABASE_ANON_KEY"));
        let supabase = match (supabase_url, supabase_key) {
            (Some(url), Some(key)) => Some(SupabaseSettings {
                url: url.trim_end_matches('/').to_string(),
                key,
                bucket: get("SUPABASE_BUCKET").unwrap_or_else(|| "uploads".to_string()),
            }),
            _ => None,
        };

        let storage = StorageSettings {
            supabase,
            upload_dir: PathBuf::from(
                get("UPLOAD_DIR").unwrap_or_else(|| "public/uploads".to_string()),
            ),
            public_prefix: "/uploads".to_string(),
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .or_else(|| get("FRONTEND_ORIGIN").map(|o| vec![o]))
            .unwrap_or_default();

        Self {
            environment,
            host,
            port,
            site_url,
            database: DbConfig::from_vars(vars),
            session,
            bcrypt_cost,
            admin_seed,
            github,
            storage,
            allowed_origins,
        }
    }

    /// Startup checks that must stop the process in production.
    pub fn validate(&self) -> Result<(), String> {
        if self.environment.is_production() && self.session.secret == DEFAULT_SESSION_SECRET {
            return Err(
                "SESSION_SECRET must be set to a secure, unique value in production".to_string(),
            );
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(format!("BCRYPT_COST must be between 4 and 31, got {}", self.bcrypt_cost));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_environment() {
        let s = Settings::from_vars(&HashMap::new());
        assert_eq!(s.environment, Environment::Development);
        assert_eq!(s.port, 3000);
        assert!(s.database.is_none());
        assert!(s.storage.supabase.is_none());
        assert!(s.github.is_none());
        assert!(s.admin_seed.is_none());
        assert_eq!(s.storage.upload_dir, PathBuf::from("public/uploads"));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_production_refuses_default_secret() {
        let s = Settings::from_vars(&vars(&[("ENVIRONMENT", "production")]));
        assert!(s.validate().is_err());

        let s = Settings::from_vars(&vars(&[
            ("ENVIRONMENT", "production"),
            ("NEXTAUTH_SECRET", "a-real-secret"),
        ]));
        assert!(s.validate().is_ok());
        assert!(s.session.secure_cookie);
    }

    #[test]
    fn test_cloud_storage_needs_url_and_key() {
        let s = Settings::from_vars(&vars(&[("SUPABASE_URL", "https://x.supabase.co")]));
        assert!(s.storage.supabase.is_none());

        let s = Settings::from_vars(&vars(&[
            ("SUPABASE_URL", "https://x.supabase.co/"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
        ]));
        let supabase = s.storage.supabase.unwrap();
        assert_eq!(supabase.url, "https://x.supabase.co");
        assert_eq!(supabase.bucket, "uploads");
    }

    #[test]
    fn test_admin_seed_prefers_hash() {
        let s = Settings::from_vars(&vars(&[
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "plain"),
            ("ADMIN_PASSWORD_HASH", "$2b$12$hash"),
        ]));
        let seed = s.admin_seed.unwrap();
        assert!(matches!(seed.credential, AdminCredential::Hash(_)));
        assert!(!seed.reset);

        let s = Settings::from_vars(&vars(&[("ADMIN_EMAIL", "admin@example.com")]));
        assert!(s.admin_seed.is_none());
    }

    #[test]
    fn test_admin_reset_flag() {
        let s = Settings::from_vars(&vars(&[
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "plain"),
            ("ADMIN_RESET_PASSWORD", "TRUE"),
        ]));
        assert!(s.admin_seed.unwrap().reset);
    }

    #[test]
    fn test_github_redirect_uses_site_url() {
        let s = Settings::from_vars(&vars(&[
            ("GITHUB_ID", "id"),
            ("GITHUB_SECRET", "secret"),
            ("SITE_URL", "https://me.dev/"),
        ]));
        assert_eq!(
            s.github.unwrap().redirect_url,
            "https://me.dev/api/auth/github/callback"
        );
    }

    #[test]
    fn test_allowed_origins_fall_back_to_frontend_origin() {
        let s = Settings::from_vars(&vars(&[("FRONTEND_ORIGIN", "https://me.dev")]));
        assert_eq!(s.allowed_origins, vec!["https://me.dev"]);
    }
}
