use axum::{extract::State, Json};

use crate::content::{SiteContent, ThemeSettings};
use crate::state::AppState;

/// Reads the config store once; any failure falls back to the defaults.
pub async fn load_content(state: &AppState) -> SiteContent {
    match state.site_config.get_all().await {
        Ok(entries) => SiteContent::from_entries(entries),
        Err(e) => {
            tracing::warn!("Site config unavailable, rendering defaults: {}", e);
            SiteContent::default()
        }
    }
}

/// GET /api/theme
/// Always 200; store failures yield the default theme.
pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeSettings> {
    Json(load_content(&state).await.theme())
}
