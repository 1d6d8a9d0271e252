//! Shared fixtures for the route tests.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::accounts::{self, CreateAccount};
use crate::config::Settings;
use crate::db::memory::MemoryStore;
use crate::db::models::Role;
use crate::session::{self, Session};
use crate::state::AppState;
use crate::storage::{StorageError, UploadStore};

/// Records stored files instead of writing them anywhere.
#[derive(Default)]
pub struct RecordingUploads {
    pub stored: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait]
impl UploadStore for RecordingUploads {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        self.stored.lock().unwrap().push((
            filename.to_string(),
            content_type.to_string(),
            bytes.len(),
        ));
        Ok(format!("/uploads/{}", filename))
    }
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::from_vars(&HashMap::new());
    settings.session.secret = "test-secret".to_string();
    settings.bcrypt_cost = 4;
    settings
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub uploads: Arc<RecordingUploads>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        let uploads = Arc::new(RecordingUploads::default());
        let state = AppState {
            settings: Arc::new(test_settings()),
            site_config: store.clone(),
            projects: store.clone(),
            users: store.clone(),
            uploads: uploads.clone(),
            http: reqwest::Client::new(),
            db: None,
        };
        Self {
            state,
            store,
            uploads,
        }
    }

    pub fn router(&self) -> Router {
        crate::create_app(self.state.clone())
    }

    /// Creates an account and returns a session token for it.
    pub async fn sign_in_as(&self, email: &str, password: &str, role: Role) -> (Session, String) {
        let user = accounts::create_user(
            self.store.as_ref(),
            CreateAccount {
                email: email.to_string(),
                password: password.to_string(),
                name: None,
                role,
            },
            4,
        )
        .await
        .unwrap();
        let session = Session::from(&user);
        let token = session::issue_token(&session, &self.state.settings.session).unwrap();
        (session, token)
    }

    pub async fn admin_token(&self) -> (Session, String) {
        self.sign_in_as("admin@example.com", "admin-pass", Role::Admin)
            .await
    }
}

pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Bytes) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes)
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}
