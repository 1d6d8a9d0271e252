/**
 * Sessions
 * HS256 tokens carried in an HttpOnly cookie or a Bearer header
 */
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionSettings;
use crate::db::models::{Role, User};

pub const SESSION_COOKIE: &str = "portfolio_session";
pub const OAUTH_STATE_COOKIE: &str = "portfolio_oauth_state";

/// Token payload; the session is rebuilt from this on every request.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// What `GET /api/auth/session` returns and what guards hand to handlers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

pub fn issue_token(
    session: &Session,
    settings: &SessionSettings,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: session.id.to_string(),
        email: session.email.clone(),
        name: session.name.clone(),
        role: session.role,
        exp: (now + Duration::days(settings.ttl_days)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
}

/// `None` for a bad signature, an expired token or a malformed subject.
pub fn verify_token(token: &str, settings: &SessionSettings) -> Option<Session> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| tracing::debug!("Rejected session token: {}", e))
    .ok()?;

    let claims = data.claims;
    Some(Session {
        id: Uuid::parse_str(&claims.sub).ok()?,
        email: claims.email,
        name: claims.name,
        role: claims.role,
    })
}

pub fn session_cookie(token: &str, settings: &SessionSettings) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        SESSION_COOKIE,
        token,
        settings.ttl_days * 24 * 3600,
        secure_suffix(settings)
    )
}

pub fn clear_session_cookie(settings: &SessionSettings) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{}",
        SESSION_COOKIE,
        secure_suffix(settings)
    )
}

pub fn oauth_state_cookie(state: &str, settings: &SessionSettings) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/api/auth; Max-Age=600{}",
        OAUTH_STATE_COOKIE,
        state,
        secure_suffix(settings)
    )
}

pub fn clear_oauth_state_cookie(settings: &SessionSettings) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/api/auth; Max-Age=0{}",
        OAUTH_STATE_COOKIE,
        secure_suffix(settings)
    )
}

fn secure_suffix(settings: &SessionSettings) -> &'static str {
    if settings.secure_cookie {
        "; Secure"
    } else {
        ""
    }
}

pub fn cookie_value<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let (key, val) = cookie.split_once('=')?;
            if key.trim() == name {
                Some(val.trim())
            } else {
                None
            }
        })
        .filter(|v| !v.is_empty())
}

/// Cookie first, then `Authorization: Bearer`.
pub fn token_from_headers(headers: &axum::http::HeaderMap) -> Option<&str> {
    cookie_value(headers, SESSION_COOKIE).or_else(|| {
        headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}
