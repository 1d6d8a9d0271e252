use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::Environment;

/// Logging settings read from `LOG_LEVEL`, `LOG_DIR` and `ENVIRONMENT`.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub directory: PathBuf,
    /// JSON lines instead of the pretty console format.
    pub json: bool,
}

impl LogConfig {
    pub fn from_env() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let environment = Environment::parse(vars.get("ENVIRONMENT"));
        let level = vars
            .get("LOG_LEVEL")
            .map(|v| v.trim().to_lowercase())
            .filter(|v| is_level(v))
            .unwrap_or_else(|| {
                if environment.is_production() {
                    "info".to_string()
                } else {
                    "debug".to_string()
                }
            });

        Self {
            level,
            directory: vars
                .get("LOG_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
            json: environment.is_production(),
        }
    }

    /// Used when `RUST_LOG` is not set.
    pub fn default_filter(&self) -> String {
        format!(
            "portfolio_site={},tower_http=debug,axum=debug,sqlx=warn",
            self.level
        )
    }
}

fn is_level(value: &str) -> bool {
    matches!(value, "trace" | "debug" | "info" | "warn" | "error")
}
