/*!
 * Site Content
 * Typed view over the key-value site configuration
 */
pub mod keys;
pub mod theme;
pub mod timeline;

use std::collections::HashMap;

use crate::db::models::SiteConfigEntry;

pub use keys::{ConfigKey, FieldKind, KeyGroup};
pub use theme::ThemeSettings;
pub use timeline::TimelineItem;

/// Display language for the public pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Th,
}

impl Locale {
    /// Anything other than `th` falls back to English.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "th" => Locale::Th,
            _ => Locale::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Th => "th",
        }
    }

    /// Picks the Thai text when present and non-empty, English otherwise.
    pub fn pick<'a>(&self, en: &'a str, th: Option<&'a str>) -> &'a str {
        match (self, th) {
            (Locale::Th, Some(th)) if !th.trim().is_empty() => th,
            _ => en,
        }
    }
}

/// Site configuration rows keyed by name, with defaults applied on read.
///
/// Built from whatever the store returned; an empty map is a valid state and
/// renders every key with its default.
#[derive(Debug, Clone, Default)]
pub struct SiteContent {
    values: HashMap<String, String>,
}

impl SiteContent {
    pub fn from_entries(entries: Vec<SiteConfigEntry>) -> Self {
        Self {
            values: entries.into_iter().map(|e| (e.key, e.value)).collect(),
        }
    }

    /// The stored value, if any. Empty strings count as absent.
    pub fn raw(&self, key: ConfigKey) -> Option<&str> {
        self.values
            .get(key.as_str())
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// The stored value or the key's default.
    pub fn get(&self, key: ConfigKey) -> String {
        self.raw(key)
            .map(str::to_string)
            .unwrap_or_else(|| key.default_value().to_string())
    }

    /// For Thai: `key_th`, then `key`, then the Thai default, then the default.
    pub fn localized(&self, key: ConfigKey, locale: Locale) -> String {
        if locale == Locale::Th {
            if let Some(th_key) = key.thai_variant() {
                if let Some(v) = self.raw(th_key) {
                    return v.to_string();
                }
                if let Some(v) = self.raw(key) {
                    return v.to_string();
                }
                let th_default = th_key.default_value();
                if !th_default.is_empty() {
                    return th_default.to_string();
                }
            }
        }
        self.get(key)
    }

    /// Comma-separated list value, trimmed.
    pub fn list(&self, key: ConfigKey) -> Vec<String> {
        self.get(key)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The about-page timeline; see [`timeline::parse`].
    pub fn timeline(&self) -> Vec<TimelineItem> {
        match self.raw(ConfigKey::AboutTimeline) {
            Some(raw) => timeline::parse(raw),
            None => timeline::default_items(),
        }
    }

    pub fn theme(&self) -> ThemeSettings {
        ThemeSettings::from_content(self)
    }
}
