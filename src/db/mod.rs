//! JSON-document persistence.
//!
//! Every store sits on a [`Collection`], which decodes one whole JSON document
//! from an injected [`Storage`] handle, lets the caller mutate it in memory and
//! writes the whole document back. Writers to one collection are serialized by
//! a per-collection lock; readers always reload from storage.

pub mod file;
pub mod memory;
pub mod notes;
pub mod seed;
pub mod settings;
pub mod users;

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use notes::{Clock, NoteStore};
pub use settings::SettingsStore;
pub use users::AccountStore;

pub const USERS_FILE: &str = "users.json";
pub const NOTES_FILE: &str = "notes.json";
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug)]
pub enum StoreError {
    /// The backing storage could not be read or written.
    Unavailable(String),
    /// The stored document exists but does not decode.
    Corrupt(String),
    EmailTaken,
    InvalidCredentials,
    NotFound,
    Internal(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            StoreError::Corrupt(msg) => write!(f, "corrupt document: {msg}"),
            StoreError::EmailTaken => write!(f, "email already registered"),
            StoreError::InvalidCredentials => write!(f, "invalid credentials"),
            StoreError::NotFound => write!(f, "not found"),
            StoreError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Byte-level handle to a single JSON document.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Human-readable location, used in logs and error messages.
    fn describe(&self) -> String;

    /// Returns `None` when the document has never been written.
    async fn read(&self) -> Result<Option<Vec<u8>>, StoreError>;

    async fn write(&self, bytes: &[u8]) -> Result<(), StoreError>;
}

pub struct Collection<T> {
    storage: Arc<dyn Storage>,
    writer: Mutex<()>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync,
{
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            writer: Mutex::new(()),
            _doc: PhantomData,
        }
    }

    /// Decode the whole document. Missing or blank documents decode as `T::default()`.
    pub async fn load(&self) -> Result<T, StoreError> {
        match self.storage.read().await? {
            None => Ok(T::default()),
            Some(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(T::default()),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.storage.describe()))),
        }
    }

    pub async fn save(&self, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::Internal(format!("encode {}: {e}", self.storage.describe())))?;
        self.storage.write(&bytes).await
    }

    /// Load, mutate and save under the writer lock. Nothing is written when `f` fails.
    pub async fn update<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut T) -> Result<R, StoreError> + Send,
        R: Send,
    {
        let _guard = self.writer.lock().await;
        let mut value = self.load().await?;
        let result = f(&mut value)?;
        self.save(&value).await?;
        Ok(result)
    }
}

/// The three stores of the application.
#[derive(Clone)]
pub struct Database {
    pub users: AccountStore,
    pub notes: NoteStore,
    pub settings: SettingsStore,
}

impl Database {
    /// Open (and create if needed) the JSON files under `data_dir`.
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(data_dir).await.map_err(|e| {
            StoreError::Unavailable(format!("create {}: {e}", data_dir.display()))
        })?;

        let db = Self {
            users: AccountStore::new(Arc::new(FileStorage::new(data_dir.join(USERS_FILE)))),
            notes: NoteStore::new(Arc::new(FileStorage::new(data_dir.join(NOTES_FILE)))),
            settings: SettingsStore::new(Arc::new(FileStorage::new(data_dir.join(SETTINGS_FILE)))),
        };
        db.settings.ensure_defaults().await?;

        tracing::info!("Data directory ready at {}", data_dir.display());
        Ok(db)
    }

    pub fn in_memory() -> Self {
        Self {
            users: AccountStore::new(Arc::new(MemoryStorage::new())),
            notes: NoteStore::new(Arc::new(MemoryStorage::new())),
            settings: SettingsStore::new(Arc::new(MemoryStorage::new())),
        }
    }
}
