use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "enabled")]
    pub email_notifications: bool,
    #[serde(default = "enabled")]
    pub ai_suggestions: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            ai_suggestions: true,
        }
    }
}

/// Partial update of [`Preferences`]; `None` leaves a flag untouched.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub email_notifications: Option<bool>,
    pub ai_suggestions: Option<bool>,
}

impl Preferences {
    pub fn merge(&mut self, patch: PreferencesPatch) {
        if let Some(v) = patch.email_notifications {
            self.email_notifications = v;
        }
        if let Some(v) = patch.ai_suggestions {
            self.ai_suggestions = v;
        }
    }
}

fn enabled() -> bool {
    true
}

/// Public view of a user, without the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub preferences: Preferences,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            preferences: user.preferences,
        }
    }
}
