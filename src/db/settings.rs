use std::sync::Arc;

use crate::models::AppSettings;

use super::{Collection, Storage, StoreError};

/// Application-wide settings (`settings.json`), maintained by the operator.
#[derive(Clone)]
pub struct SettingsStore {
    settings: Arc<Collection<AppSettings>>,
}

impl SettingsStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            settings: Arc::new(Collection::new(storage)),
        }
    }

    pub async fn get(&self) -> Result<AppSettings, StoreError> {
        self.settings.load().await
    }

    /// Write the document back with any missing keys filled in.
    pub async fn ensure_defaults(&self) -> Result<AppSettings, StoreError> {
        self.settings.update(|settings| Ok(settings.clone())).await
    }
}
