/**
 * Page Routes
 * Server-rendered public site, login forms and the admin dashboard shell
 */
use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::content::{ConfigKey, FieldKind, KeyGroup, Locale, SiteContent, ThemeSettings, TimelineItem};
use crate::db::models::Project;
use crate::extractors::MaybeSession;
use crate::routes::theme::load_content;
use crate::session::Session;
use crate::state::AppState;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// Navbar, theme variables and footer shared by every page.
pub struct Layout {
    pub locale: Locale,
    pub active: &'static str,
    pub theme: ThemeSettings,
    pub footer_text: String,
    pub social_github: String,
    pub social_linkedin: String,
    pub social_twitter: String,
    pub session: Option<Session>,
}

impl Layout {
    fn new(content: &SiteContent, locale: Locale, active: &'static str, session: Option<Session>) -> Self {
        let social = |key| content.raw(key).unwrap_or_default().to_string();
        Self {
            locale,
            active,
            theme: content.theme(),
            footer_text: content.localized(ConfigKey::FooterText, locale),
            social_github: social(ConfigKey::SocialGithub),
            social_linkedin: social(ConfigKey::SocialLinkedin),
            social_twitter: social(ConfigKey::SocialTwitter),
            session,
        }
    }

    /// English or Thai UI string for the current locale.
    pub fn t<'a>(&self, en: &'a str, th: &'a str) -> &'a str {
        self.locale.pick(en, Some(th))
    }

    pub fn lang(&self) -> &'static str {
        self.locale.code()
    }

    /// Link target of the language switch.
    pub fn switch_href(&self) -> String {
        match self.locale {
            Locale::En => format!("{}?lang=th", self.active),
            Locale::Th => self.active.to_string(),
        }
    }

    pub fn switch_label(&self) -> &'static str {
        match self.locale {
            Locale::En => "ไทย",
            Locale::Th => "EN",
        }
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    /// Appends `?lang=th` to internal links while browsing in Thai.
    pub fn href(&self, path: &str) -> String {
        match self.locale {
            Locale::En => path.to_string(),
            Locale::Th => format!("{}?lang=th", path),
        }
    }
}

/// A project with its text already resolved for the page language.
pub struct ProjectCard {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub link: String,
}

impl ProjectCard {
    fn new(project: &Project, locale: Locale) -> Self {
        Self {
            title: locale
                .pick(&project.title, project.title_th.as_deref())
                .to_string(),
            description: locale
                .pick(&project.description, project.description_th.as_deref())
                .to_string(),
            image_url: project.image_url.clone(),
            tags: project.tag_list(),
            link: project.link.clone().unwrap_or_default(),
        }
    }
}

pub struct TimelineEntry {
    pub year: String,
    pub title: String,
    pub description: String,
    pub color: String,
}

impl TimelineEntry {
    fn new(item: &TimelineItem, locale: Locale) -> Self {
        Self {
            year: item.year.clone(),
            title: locale.pick(&item.title, item.title_th.as_deref()).to_string(),
            description: locale
                .pick(&item.description, item.description_th.as_deref())
                .to_string(),
            color: item.color.clone(),
        }
    }
}

async fn load_projects(state: &AppState, locale: Locale) -> Vec<ProjectCard> {
    match state.projects.list().await {
        Ok(projects) => projects.iter().map(|p| ProjectCard::new(p, locale)).collect(),
        Err(e) => {
            tracing::warn!("Projects unavailable, rendering empty list: {}", e);
            Vec::new()
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_description: String,
    pub hero_image: String,
    pub featured: Vec<ProjectCard>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub layout: Layout,
    pub about_me: String,
    pub about_image: String,
    pub timeline: Vec<TimelineEntry>,
    pub skills: Vec<String>,
    pub strategic_skills: Vec<String>,
}

#[derive(Template)]
#[template(path = "portfolio.html")]
pub struct PortfolioTemplate {
    pub layout: Layout,
    pub projects: Vec<ProjectCard>,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub email: String,
    pub address: String,
    pub background: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    /// Admin form posts to the admin endpoint and lands on `/admin`.
    pub admin: bool,
    pub github_enabled: bool,
}

pub struct FieldView {
    pub key: &'static str,
    pub label: String,
    pub kind: &'static str,
    pub value: String,
    pub placeholder: &'static str,
}

pub struct FieldGroup {
    pub id: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldView>,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub layout: Layout,
    pub groups: Vec<FieldGroup>,
    pub timeline_json: String,
    pub has_database: bool,
    pub upload_backend: &'static str,
    pub max_upload_bytes: usize,
}

/// GET /
pub async fn home(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<LangQuery>,
) -> Html<HomeTemplate> {
    let locale = Locale::parse(query.lang.as_deref());
    let content = load_content(&state).await;
    let mut featured = load_projects(&state, locale).await;
    featured.truncate(3);

    Html(HomeTemplate {
        hero_title: content.localized(ConfigKey::HeroTitle, locale),
        hero_subtitle: content.localized(ConfigKey::HeroSubtitle, locale),
        hero_description: content.localized(ConfigKey::HeroDescription, locale),
        hero_image: content.get(ConfigKey::HeroImage),
        featured,
        layout: Layout::new(&content, locale, "/", session),
    })
}

/// GET /about
pub async fn about(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<LangQuery>,
) -> Html<AboutTemplate> {
    let locale = Locale::parse(query.lang.as_deref());
    let content = load_content(&state).await;

    Html(AboutTemplate {
        about_me: content.localized(ConfigKey::AboutMe, locale),
        about_image: content.get(ConfigKey::AboutImage),
        timeline: content
            .timeline()
            .iter()
            .map(|item| TimelineEntry::new(item, locale))
            .collect(),
        skills: content.list(ConfigKey::SkillsList),
        strategic_skills: content.list(ConfigKey::SkillsStrategic),
        layout: Layout::new(&content, locale, "/about", session),
    })
}

/// GET /portfolio
pub async fn portfolio(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<LangQuery>,
) -> Html<PortfolioTemplate> {
    let locale = Locale::parse(query.lang.as_deref());
    let content = load_content(&state).await;

    Html(PortfolioTemplate {
        projects: load_projects(&state, locale).await,
        layout: Layout::new(&content, locale, "/portfolio", session),
    })
}

/// GET /contact
pub async fn contact(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<LangQuery>,
) -> Html<ContactTemplate> {
    let locale = Locale::parse(query.lang.as_deref());
    let content = load_content(&state).await;

    Html(ContactTemplate {
        title: content.localized(ConfigKey::ContactTitle, locale),
        subtitle: content.localized(ConfigKey::ContactSubtitle, locale),
        description: content.localized(ConfigKey::ContactDescription, locale),
        email: content.get(ConfigKey::ContactEmail),
        address: content.localized(ConfigKey::ContactAddress, locale),
        background: content.get(ConfigKey::ContactBackground),
        layout: Layout::new(&content, locale, "/contact", session),
    })
}

async fn login_page(
    state: &AppState,
    session: Option<Session>,
    query: LangQuery,
    admin: bool,
) -> Html<LoginTemplate> {
    let locale = Locale::parse(query.lang.as_deref());
    let content = load_content(state).await;
    let active = if admin { "/auth/admin-login" } else { "/auth/login" };

    Html(LoginTemplate {
        layout: Layout::new(&content, locale, active, session),
        admin,
        github_enabled: state.settings.github.is_some() && !admin,
    })
}

/// GET /auth/login
pub async fn login(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<LangQuery>,
) -> Html<LoginTemplate> {
    login_page(&state, session, query, false).await
}

/// GET /auth/admin-login
pub async fn admin_login(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<LangQuery>,
) -> Html<LoginTemplate> {
    login_page(&state, session, query, true).await
}

/// GET /admin
/// Anonymous visitors go to the admin login, signed-in non-admins to the home page.
pub async fn admin(State(state): State<AppState>, MaybeSession(session): MaybeSession) -> Response {
    let session = match session {
        None => return Redirect::to("/auth/admin-login").into_response(),
        Some(s) if !s.is_admin() => {
            tracing::warn!(user_id = %s.id, "Non-admin redirected away from dashboard");
            return Redirect::to("/").into_response();
        }
        Some(s) => s,
    };

    let content = load_content(&state).await;
    let groups = KeyGroup::ALL
        .iter()
        .map(|group| FieldGroup {
            id: group.id(),
            title: group.title(),
            fields: ConfigKey::in_group(*group)
                .filter(|k| k.kind() != FieldKind::Json)
                .map(|key| FieldView {
                    key: key.as_str(),
                    label: key.label(),
                    kind: key.kind().as_str(),
                    value: content.raw(key).unwrap_or_default().to_string(),
                    placeholder: key.default_value(),
                })
                .collect(),
        })
        .collect();

    let timeline_json = serde_json::to_string(&content.timeline()).unwrap_or_else(|_| "[]".to_string());

    Html(AdminTemplate {
        layout: Layout::new(&content, Locale::En, "/admin", Some(session)),
        groups,
        timeline_json,
        has_database: state.has_database(),
        upload_backend: state.uploads.name(),
        max_upload_bytes: crate::storage::MAX_UPLOAD_BYTES,
    })
    .into_response()
}
