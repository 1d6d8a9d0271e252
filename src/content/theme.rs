use serde::{Deserialize, Serialize};

use super::{ConfigKey, SiteContent};

/// Payload of `GET /api/theme`; also feeds the CSS variables of every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub background_image: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self::from_content(&SiteContent::default())
    }
}

impl ThemeSettings {
    pub fn from_content(content: &SiteContent) -> Self {
        Self {
            primary_color: content.get(ConfigKey::ThemePrimaryColor),
            secondary_color: content.get(ConfigKey::ThemeSecondaryColor),
            font_family: content.get(ConfigKey::ThemeFontFamily),
            background_image: content.get(ConfigKey::ThemeBackgroundImage),
        }
    }
}
