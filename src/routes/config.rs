/**
 * Site Configuration Routes
 * Admin read and upsert of the key-value site settings
 */
use axum::{extract::State, Json};
use serde::Deserialize;

use crate::content::{timeline, ConfigKey, TimelineItem};
use crate::db::models::SiteConfigEntry;
use crate::error::{AppError, AppResult};
use crate::extractors::{AdminSession, AppJson, AppQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConfigUpdate {
    pub key: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigQuery {
    pub key: Option<String>,
}

/// GET /api/admin/config, or `?key=` for a single entry (`[]` when unset).
pub async fn list_config(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    AppQuery(query): AppQuery<ConfigQuery>,
) -> AppResult<Json<Vec<SiteConfigEntry>>> {
    let Some(key) = query.key.filter(|k| !k.is_empty()) else {
        return Ok(Json(state.site_config.get_all().await?));
    };
    let key = ConfigKey::parse(&key)
        .ok_or_else(|| AppError::Validation(format!("Unknown configuration key: {}", key)))?;

    let entry = state.site_config.get(key.as_str()).await?;
    Ok(Json(entry.into_iter().collect()))
}

/// POST /api/admin/config
/// Creates the key on first write, replaces its value afterwards.
pub async fn update_config(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    AppJson(payload): AppJson<ConfigUpdate>,
) -> AppResult<Json<SiteConfigEntry>> {
    let (Some(key), Some(value)) = (payload.key.filter(|k| !k.is_empty()), payload.value) else {
        return Err(AppError::Validation("Missing key or value".to_string()));
    };
    let key = ConfigKey::parse(&key)
        .ok_or_else(|| AppError::Validation(format!("Unknown configuration key: {}", key)))?;

    let value = match key {
        ConfigKey::AboutTimeline => {
            let items = timeline::decode(&value)
                .map_err(|e| AppError::Validation(format!("Invalid timeline JSON: {}", e)))?;
            timeline::normalize(items).map_err(AppError::Validation)?
        }
        _ => value,
    };

    let entry = state.site_config.upsert(key.as_str(), &value).await?;
    tracing::info!(key = %key, user_id = %session.id, "Site config updated");
    Ok(Json(entry))
}

/// POST /api/admin/timeline
/// Replaces the whole About timeline in one write.
pub async fn update_timeline(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    AppJson(items): AppJson<Vec<TimelineItem>>,
) -> AppResult<Json<Vec<TimelineItem>>> {
    let value = timeline::normalize(items).map_err(AppError::Validation)?;
    let entry = state
        .site_config
        .upsert(ConfigKey::AboutTimeline.as_str(), &value)
        .await?;

    tracing::info!(user_id = %session.id, "Timeline updated");
    Ok(Json(timeline::parse(&entry.value)))
}

#[cfg(test)]
mod tests {
    use crate::db::ConfigStore;
    use crate::testing::{json_request, send, TestApp};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_row_with_last_value() {
        let app = TestApp::new();
        let (_, token) = app.admin_token().await;

        for value in ["Hello", "Hi there"] {
            let (status, _, _) = send(
                app.router(),
                json_request(
                    "POST",
                    "/api/admin/config",
                    Some(&token),
                    &json!({ "key": "hero_title", "value": value }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let all = app.store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].key, "hero_title");
        assert_eq!(all[0].value, "Hi there");
    }

    #[tokio::test]
    async fn test_unauthenticated_write_is_rejected_and_not_stored() {
        let app = TestApp::new();
        let (status, _, _) = send(
            app.router(),
            json_request(
                "POST",
                "/api/admin/config",
                None,
                &json!({ "key": "hero_title", "value": "Hacked" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(app.store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_admin_write_is_rejected() {
        let app = TestApp::new();
        let (_, token) = app
            .sign_in_as("user@example.com", "pw", crate::db::models::Role::User)
            .await;
        let (status, _, _) = send(
            app.router(),
            json_request(
                "POST",
                "/api/admin/config",
                Some(&token),
                &json!({ "key": "hero_title", "value": "x" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_key_and_missing_value_are_rejected() {
        let app = TestApp::new();
        let (_, token) = app.admin_token().await;

        for body in [
            json!({ "key": "not_a_key", "value": "x" }),
            json!({ "key": "hero_title" }),
        ] {
            let (status, _, _) = send(
                app.router(),
                json_request("POST", "/api/admin/config", Some(&token), &body),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        assert!(app.store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_value_is_accepted() {
        let app = TestApp::new();
        let (_, token) = app.admin_token().await;
        let (status, _, _) = send(
            app.router(),
            json_request(
                "POST",
                "/api/admin/config",
                Some(&token),
                &json!({ "key": "theme_background_image", "value": "" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_timeline_json_is_rejected() {
        let app = TestApp::new();
        let (_, token) = app.admin_token().await;
        let (status, _, _) = send(
            app.router(),
            json_request(
                "POST",
                "/api/admin/config",
                Some(&token),
                &json!({ "key": "about_timeline", "value": "[{oops" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_timeline_batch_is_resequenced() {
        let app = TestApp::new();
        let (_, token) = app.admin_token().await;
        let body = json!([
            { "id": "a", "year": "2020", "title": "First", "description": "", "order": 7 },
            { "id": "b", "year": "2024", "title": "Second", "description": "", "order": 3 }
        ]);

        let (status, _, bytes) = send(
            app.router(),
            json_request("POST", "/api/admin/timeline", Some(&token), &body),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let saved: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(saved[0]["id"], "a");
        assert_eq!(saved[0]["order"], 0);
        assert_eq!(saved[1]["id"], "b");
        assert_eq!(saved[1]["order"], 1);

        let stored = app.store.get("about_timeline").await.unwrap().unwrap();
        assert!(stored.value.contains("\"First\""));
    }

    #[tokio::test]
    async fn test_list_config_requires_admin() {
        let app = TestApp::new();
        let (status, _, _) = send(
            app.router(),
            crate::testing::empty_request("GET", "/api/admin/config", None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_mistyped_body_gets_json_validation_error() {
        let app = TestApp::new();
        let (_, token) = app.admin_token().await;
        let (status, headers, bytes) = send(
            app.router(),
            json_request(
                "POST",
                "/api/admin/config",
                Some(&token),
                &json!({ "key": 5, "value": "x" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("key"));
        assert!(app.store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_content_type_gets_json_error() {
        let app = TestApp::new();
        let (_, token) = app.admin_token().await;
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/api/admin/config")
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::from(r#"{"key":"hero_title","value":"x"}"#))
            .unwrap();

        let (status, _, bytes) = send(app.router(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_single_key_lookup() {
        let app = TestApp::new();
        let (_, token) = app.admin_token().await;
        app.store.upsert("hero_title", "Hello").await.unwrap();
        app.store.upsert("hero_subtitle", "World").await.unwrap();

        let get = |uri: &str| crate::testing::empty_request("GET", uri, Some(&token));

        let (status, _, bytes) = send(app.router(), get("/api/admin/config?key=hero_title")).await;
        assert_eq!(status, StatusCode::OK);
        let entries: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(entries.as_array().unwrap().len(), 1);
        assert_eq!(entries[0]["value"], "Hello");

        let (status, _, bytes) = send(app.router(), get("/api/admin/config?key=contact_email")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&bytes[..], b"[]");

        let (status, _, _) = send(app.router(), get("/api/admin/config?key=not_a_key")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
