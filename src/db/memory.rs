use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{Storage, StoreError};

/// In-memory document, used by tests and [`super::Database::in_memory`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: Mutex<Option<Vec<u8>>>,
    offline: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(bytes: Vec<u8>) -> Self {
        Self {
            contents: Mutex::new(Some(bytes)),
            offline: AtomicBool::new(false),
        }
    }

    /// Make every subsequent read and write fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory storage offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_online()?;
        let guard = self
            .contents
            .lock()
            .map_err(|_| StoreError::Internal("memory storage poisoned".to_string()))?;
        Ok(guard.clone())
    }

    async fn write(&self, bytes: &[u8]) -> Result<(), StoreError> {
        self.check_online()?;
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| StoreError::Internal("memory storage poisoned".to_string()))?;
        *guard = Some(bytes.to_vec());
        Ok(())
    }
}
