use serde::{Deserialize, Serialize};

/// Application-wide settings stored in `settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub email_notifications: bool,
    pub theme: Theme,
    pub auto_save: bool,
    pub rich_text_editor: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            theme: Theme::Light,
            auto_save: true,
            rich_text_editor: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}
