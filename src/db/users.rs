use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::auth::password;
use crate::models::{Preferences, PreferencesPatch, User};

use super::{Collection, Storage, StoreError};

/// Users collection (`users.json`).
#[derive(Clone)]
pub struct AccountStore {
    users: Arc<Collection<Vec<User>>>,
}

impl AccountStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            users: Arc::new(Collection::new(storage)),
        }
    }

    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.users.load().await
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.users.load().await?.len())
    }

    /// Exact, case-sensitive match on the stored email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.load().await?.into_iter().find(|u| u.email == email))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.load().await?.into_iter().find(|u| u.id == id))
    }

    /// Unknown email and wrong password are both [`StoreError::InvalidCredentials`].
    pub async fn verify_credentials(&self, email: &str, secret: &str) -> Result<User, StoreError> {
        let Some(user) = self.find_by_email(email).await? else {
            password::verify_dummy(secret);
            return Err(StoreError::InvalidCredentials);
        };

        let valid = password::verify(secret, &user.password_hash)
            .map_err(|e| StoreError::Corrupt(format!("user {}: {e}", user.id)))?;
        if valid {
            Ok(user)
        } else {
            Err(StoreError::InvalidCredentials)
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        secret: &str,
    ) -> Result<User, StoreError> {
        if self.find_by_email(email).await?.is_some() {
            return Err(StoreError::EmailTaken);
        }

        let password_hash = password::hash(secret).map_err(StoreError::Internal)?;
        self.insert(User {
            id: Uuid::now_v7().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now(),
            preferences: Preferences::default(),
        })
        .await
    }

    /// Append a fully built user. The email check is repeated under the writer
    /// lock so two concurrent registrations cannot both claim an address.
    pub async fn insert(&self, user: User) -> Result<User, StoreError> {
        let user = self
            .users
            .update(move |users| {
                if users.iter().any(|u| u.email == user.email) {
                    return Err(StoreError::EmailTaken);
                }
                users.push(user.clone());
                Ok(user)
            })
            .await?;

        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    pub async fn update_preferences(
        &self,
        user_id: &str,
        patch: PreferencesPatch,
    ) -> Result<User, StoreError> {
        self.users
            .update(|users| {
                let user = users
                    .iter_mut()
                    .find(|u| u.id == user_id)
                    .ok_or(StoreError::NotFound)?;
                user.preferences.merge(patch);
                Ok(user.clone())
            })
            .await
    }
}
