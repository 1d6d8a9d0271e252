//! Portfolio Site - library for app logic and testing

pub mod accounts;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod oauth;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, trace::TraceLayer,
};

use crate::config::Settings;
use crate::db::{ConfigStore, NoopStore, PgStore, ProjectStore, UserStore};
use crate::logging::LogConfig;
use crate::state::AppState;

/// Multipart framing headroom on top of the file ceiling, so an oversize
/// file reaches the handler and gets the upload-specific 413 message.
const UPLOAD_BODY_LIMIT: usize = storage::MAX_UPLOAD_BYTES + 64 * 1024;

/// Everything else (JSON bodies) stays well below this.
const GLOBAL_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// CORS from `ALLOWED_ORIGINS` / `FRONTEND_ORIGIN`, local dev origins otherwise.
pub fn configure_cors(allowed_origins: &[String]) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    if origins.is_empty() {
        origins = vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ];
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors(&state.settings.allowed_origins);
    let uploads_dir = ServeDir::new(&state.settings.storage.upload_dir);

    Router::new()
        // Public pages
        .route("/", get(routes::pages::home))
        .route("/about", get(routes::pages::about))
        .route("/portfolio", get(routes::pages::portfolio))
        .route("/contact", get(routes::pages::contact))
        .route("/auth/login", get(routes::pages::login))
        .route("/auth/admin-login", get(routes::pages::admin_login))
        .route("/admin", get(routes::pages::admin))
        // Auth
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/admin-login", post(routes::auth::admin_login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/auth/session", get(routes::auth::current_session))
        .route("/api/auth/github", get(routes::auth::github))
        .route("/api/auth/github/callback", get(routes::auth::github_callback))
        // Admin API
        .route(
            "/api/admin/config",
            get(routes::config::list_config).post(routes::config::update_config),
        )
        .route("/api/admin/timeline", post(routes::config::update_timeline))
        .route(
            "/api/admin/generate-bg",
            post(routes::background::generate_background),
        )
        .route(
            "/api/projects",
            get(routes::projects::list_projects)
                .post(routes::projects::create_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/api/users",
            get(routes::users::list_users)
                .post(routes::users::create_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route(
            "/api/upload",
            post(routes::upload::upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/theme", get(routes::theme::get_theme))
        // Health
        .route("/health", get(routes::health::health_ping))
        .route("/health/database", get(routes::health::health_database))
        .route("/health/ready", get(routes::health::health_ready))
        // Files
        .nest_service("/static", ServeDir::new("static"))
        .nest_service("/uploads", uploads_dir)
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(TraceLayer::new_for_http().make_span_with(logging::middleware::make_request_span))
        .layer(logging::middleware::request_id_layer())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(GLOBAL_BODY_LIMIT))
        .layer(cors)
}

fn shared_stores<S>(store: Arc<S>) -> (Arc<dyn ConfigStore>, Arc<dyn ProjectStore>, Arc<dyn UserStore>)
where
    S: ConfigStore + ProjectStore + UserStore + 'static,
{
    (store.clone(), store.clone(), store)
}

/// Connects the database when configured and picks the upload backend.
/// A database that cannot be reached at startup puts the site in
/// no-database mode: reads come back empty and writes are discarded.
pub async fn build_state(settings: Settings) -> AppState {
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        });

    let pool = match &settings.database {
        Some(config) => match db::init_pool(config).await {
            Ok(pool) => {
                if let Err(e) = db::run_migrations(&pool).await {
                    tracing::error!("Failed to run database migrations: {}", e);
                }
                Some(pool)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize database pool: {}. Continuing without database.",
                    e
                );
                None
            }
        },
        None => {
            tracing::info!("No database URL set. Running without database connection.");
            None
        }
    };

    let (site_config, projects, users) = match &pool {
        Some(pool) => shared_stores(Arc::new(PgStore::new(pool.clone()))),
        None => shared_stores(Arc::new(NoopStore)),
    };

    match (&settings.admin_seed, pool.is_some()) {
        (Some(seed), true) => {
            if let Err(e) = accounts::ensure_admin(users.as_ref(), seed, settings.bcrypt_cost).await {
                tracing::error!("Could not create admin account: {}", e);
            }
        }
        (Some(_), false) => {
            tracing::warn!("ADMIN_EMAIL is set but there is no database; admin account not created");
        }
        (None, _) => {
            tracing::info!("ADMIN_EMAIL not set; no admin account seeded");
        }
    }

    let uploads = storage::select_backend(&settings.storage, http.clone());

    AppState {
        settings: Arc::new(settings),
        site_config,
        projects,
        users,
        uploads,
        http,
        db: pool,
    }
}

/// Run the server (used by main).
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Held for the whole process; dropping them loses buffered log lines.
    let _log_guards = logging::init(&LogConfig::from_env());

    routes::health::init_start_time();

    let settings = Settings::from_env();
    settings.validate().map_err(anyhow::Error::msg)?;
    if settings.environment.is_production() && settings.admin_seed.is_none() {
        tracing::warn!("SECURITY: ADMIN_EMAIL is not set. Create an admin account before going live.");
    }

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .context("Invalid HOST/PORT configuration")?;

    let site_url = settings.site_url.clone();
    let state = build_state(settings).await;
    let app = create_app(state);

    tracing::info!(site_url = %site_url, "Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
