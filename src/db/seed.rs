use chrono::Utc;

use crate::auth::password;
use crate::models::{NoteDraft, Preferences, User};

use super::{Database, StoreError};

pub const DEMO_USER_ID: &str = "admin";
pub const DEMO_EMAIL: &str = "admin@example.com";
pub const DEMO_PASSWORD: &str = "admin123";

const WELCOME_TITLE: &str = "Welcome to Notekeeper!";
const WELCOME_BODY: &str = "## Welcome to your notes\n\n\
This is a sample note to get you started. You can:\n\
- Create new notes\n\
- Organize them by category\n\
- Search through your content\n\
- Mark favorites\n\
- Pin important notes\n\
- Get email notifications\n\n\
### Getting started\n\
1. Create your first note\n\
2. Explore the settings\n\
3. Enable email notifications";

/// Create the demo account and its welcome note when no users exist yet.
/// Returns whether anything was seeded.
pub async fn seed_demo(db: &Database) -> Result<bool, StoreError> {
    if db.users.count().await? > 0 {
        return Ok(false);
    }

    let password_hash = password::hash(DEMO_PASSWORD).map_err(StoreError::Internal)?;
    let admin = db
        .users
        .insert(User {
            id: DEMO_USER_ID.to_string(),
            username: "admin".to_string(),
            email: DEMO_EMAIL.to_string(),
            password_hash,
            created_at: Utc::now(),
            preferences: Preferences::default(),
        })
        .await?;

    db.notes
        .create(&admin.id, &NoteDraft::new(WELCOME_TITLE, WELCOME_BODY, "general"))
        .await?;

    tracing::warn!("Seeded demo account {DEMO_EMAIL} with the default password; change it");
    Ok(true)
}
