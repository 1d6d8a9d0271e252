//! The closed set of configuration keys the site understands.

/// Dashboard tab a key is edited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyGroup {
    Home,
    About,
    Contact,
    Global,
    Theme,
}

impl KeyGroup {
    pub const ALL: &'static [KeyGroup] = &[
        KeyGroup::Home,
        KeyGroup::About,
        KeyGroup::Contact,
        KeyGroup::Global,
        KeyGroup::Theme,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            KeyGroup::Home => "home",
            KeyGroup::About => "about",
            KeyGroup::Contact => "contact",
            KeyGroup::Global => "global",
            KeyGroup::Theme => "theme",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            KeyGroup::Home => "Home",
            KeyGroup::About => "About",
            KeyGroup::Contact => "Contact",
            KeyGroup::Global => "Global",
            KeyGroup::Theme => "Theme",
        }
    }
}

/// How the dashboard edits a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Image,
    Color,
    Json,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::LongText => "long_text",
            FieldKind::Image => "image",
            FieldKind::Color => "color",
            FieldKind::Json => "json",
        }
    }
}

macro_rules! config_keys {
    ($( $variant:ident => $name:literal, $group:ident, $kind:ident, $default:expr; )*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ConfigKey {
            $( $variant, )*
        }

        impl ConfigKey {
            pub const ALL: &'static [ConfigKey] = &[ $( ConfigKey::$variant, )* ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( ConfigKey::$variant => $name, )*
                }
            }

            pub fn group(&self) -> KeyGroup {
                match self {
                    $( ConfigKey::$variant => KeyGroup::$group, )*
                }
            }

            pub fn kind(&self) -> FieldKind {
                match self {
                    $( ConfigKey::$variant => FieldKind::$kind, )*
                }
            }

            /// Value rendered when the key is absent from the store.
            pub fn default_value(&self) -> &'static str {
                match self {
                    $( ConfigKey::$variant => $default, )*
                }
            }
        }
    };
}

config_keys! {
    HeroTitle => "hero_title", Home, Text, "[Your Name]";
    HeroTitleTh => "hero_title_th", Home, Text, "[ชื่อของคุณ]";
    HeroSubtitle => "hero_subtitle", Home, Text, "Creative Designer | Full-stack Developer";
    HeroSubtitleTh => "hero_subtitle_th", Home, Text, "นักออกแบบสร้างสรรค์ | นักพัฒนา Full-stack";
    HeroDescription => "hero_description", Home, LongText,
        "Turning ideas into innovation with years of experience.";
    HeroDescriptionTh => "hero_description_th", Home, LongText,
        "เปลี่ยนไอเดียให้เป็นนวัตกรรมด้วยประสบการณ์หลายปี";
    HeroImage => "hero_image", Home, Image,
        "https://images.unsplash.com/photo-1451187580459-43490279c0fa?q=80&w=2072&auto=format&fit=crop";

    AboutMe => "about_me", About, LongText,
        "I am passionate about building innovative solutions...";
    AboutMeTh => "about_me_th", About, LongText, "ฉันมีความหลงใหลในการสร้างสรรค์นวัตกรรม...";
    AboutImage => "about_image", About, Image, "";
    AboutTimeline => "about_timeline", About, Json, "";
    SkillsList => "skills_list", About, Text, "React, Next.js, TypeScript, Tailwind CSS, Node.js";
    SkillsStrategic => "skills_strategic", About, Text,
        "Problem Solving, Team Leadership, Fast Learner, Communication, Agile Methodology, Critical Thinking";

    ContactTitle => "contact_title", Contact, Text, "Signal Transmissions";
    ContactTitleTh => "contact_title_th", Contact, Text, "ส่งสัญญาณการติดต่อ";
    ContactSubtitle => "contact_subtitle", Contact, Text, "Establish Connection";
    ContactSubtitleTh => "contact_subtitle_th", Contact, Text, "สร้างการเชื่อมต่อ";
    ContactDescription => "contact_description", Contact, LongText,
        "Interested in synchronized innovation? Feel free to initiate a signal for collaborations across the digital galaxy.";
    ContactDescriptionTh => "contact_description_th", Contact, LongText,
        "สนใจในนวัตกรรมที่สอดประสานกันหรือไม่? รู้สึกอิสระที่จะเริ่มส่งสัญญาณเพื่อความร่วมมือในกาแล็กซีดิจิทัล";
    ContactEmail => "contact_email", Contact, Text, "your.email@example.com";
    ContactAddress => "contact_address", Contact, Text, "Earth, Solar System";
    ContactAddressTh => "contact_address_th", Contact, Text, "โลก, ระบบสุริยะ";
    ContactBackground => "contact_background", Contact, Image, "";
    SocialGithub => "social_github", Contact, Text, "";
    SocialLinkedin => "social_linkedin", Contact, Text, "";
    SocialTwitter => "social_twitter", Contact, Text, "";

    FooterText => "footer_text", Global, Text,
        "© 2026 Dark Star Portfolio. Built for the Cosmic Age.";
    FooterTextTh => "footer_text_th", Global, Text,
        "© 2026 Dark Star Portfolio. สร้างขึ้นเพื่อยุคคอสมิก";

    ThemePrimaryColor => "theme_primary_color", Theme, Color, "#3b82f6";
    ThemeSecondaryColor => "theme_secondary_color", Theme, Color, "#8b5cf6";
    ThemeFontFamily => "theme_font_family", Theme, Text, "Inter";
    ThemeBackgroundImage => "theme_background_image", Theme, Image, "";
}

impl ConfigKey {
    /// Exact match on the wire name.
    pub fn parse(name: &str) -> Option<Self> {
        ConfigKey::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    /// `hero_title` -> `hero_title_th`, when that key exists.
    pub fn thai_variant(&self) -> Option<Self> {
        ConfigKey::parse(&format!("{}_th", self.as_str()))
    }

    /// Human label derived from the wire name: `hero_title_th` -> `Hero Title (TH)`.
    pub fn label(&self) -> String {
        let name = self.as_str();
        let (base, suffix) = match name.strip_suffix("_th") {
            Some(base) => (base, " (TH)"),
            None => (name, ""),
        };
        let words: Vec<String> = base
            .split('_')
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect();
        format!("{}{}", words.join(" "), suffix)
    }

    pub fn in_group(group: KeyGroup) -> impl Iterator<Item = ConfigKey> {
        ConfigKey::ALL.iter().copied().filter(move |k| k.group() == group)
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
