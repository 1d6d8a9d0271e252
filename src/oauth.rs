//! GitHub OAuth: authorize redirect, code exchange and profile lookup.

use rand::distr::{Alphanumeric, SampleString};
use reqwest::Url;
use serde::Deserialize;

use crate::config::GithubSettings;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "portfolio-site";

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("request to GitHub failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub rejected the code: {0}")]
    Exchange(String),

    #[error("GitHub account has no verified email")]
    NoEmail,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// Identity read back from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GithubProfile {
    pub email: String,
    pub name: Option<String>,
}

/// Random value round-tripped through the provider to bind the callback to this browser.
pub fn new_state() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 32)
}

pub fn authorize_url(settings: &GithubSettings, state: &str) -> String {
    Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", settings.client_id.as_str()),
            ("redirect_uri", settings.redirect_url.as_str()),
            ("scope", "read:user user:email"),
            ("state", state),
        ],
    )
    .map(String::from)
    .unwrap_or_else(|_| AUTHORIZE_URL.to_string())
}

pub async fn exchange_code(
    http: &reqwest::Client,
    settings: &GithubSettings,
    code: &str,
) -> Result<String, OAuthError> {
    let res: TokenResponse = http
        .post(TOKEN_URL)
        .header(reqwest::header::ACCEPT, "application/json")
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .form(&[
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", settings.redirect_url.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    match res.access_token {
        Some(token) => Ok(token),
        None => Err(OAuthError::Exchange(
            res.error_description
                .or(res.error)
                .unwrap_or_else(|| "no access token returned".to_string()),
        )),
    }
}

pub async fn fetch_profile(http: &reqwest::Client, access_token: &str) -> Result<GithubProfile, OAuthError> {
    let user: GithubUser = http
        .get(format!("{}/user", API_URL))
        .bearer_auth(access_token)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let email = match user.email.filter(|e| !e.is_empty()) {
        Some(email) => email,
        None => {
            let emails: Vec<GithubEmail> = http
                .get(format!("{}/user/emails", API_URL))
                .bearer_auth(access_token)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .header(reqwest::header::ACCEPT, "application/vnd.github+json")
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            primary_email(emails).ok_or(OAuthError::NoEmail)?
        }
    };

    Ok(GithubProfile {
        email,
        name: user.name.or(Some(user.login)),
    })
}

fn primary_email(emails: Vec<GithubEmail>) -> Option<String> {
    let mut verified: Vec<GithubEmail> = emails.into_iter().filter(|e| e.verified).collect();
    verified.sort_by_key(|e| !e.primary);
    verified.into_iter().next().map(|e| e.email)
}
