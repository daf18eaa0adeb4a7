//! In-memory blob store for testing and embedding.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::BlobStore;

/// Error type for in-memory store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InMemoryError {
    /// The store was created unavailable (simulates a full or blocked slot).
    #[error("Storage unavailable")]
    Unavailable,
}

/// In-memory single-slot store.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    slot: Mutex<Option<String>>,
    unavailable: bool,
}

impl InMemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `text`.
    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(text.into())),
            unavailable: false,
        }
    }

    /// Create a store whose every access fails.
    pub fn unavailable() -> Self {
        Self {
            slot: Mutex::new(None),
            unavailable: true,
        }
    }

    /// Current slot contents.
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    type Error = InMemoryError;

    async fn read(&self) -> Result<Option<String>, Self::Error> {
        if self.unavailable {
            return Err(InMemoryError::Unavailable);
        }
        Ok(self.slot.lock().clone())
    }

    async fn write(&self, text: &str) -> Result<(), Self::Error> {
        if self.unavailable {
            return Err(InMemoryError::Unavailable);
        }
        *self.slot.lock() = Some(text.to_string());
        Ok(())
    }
}
