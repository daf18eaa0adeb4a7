//! Persisted-state storage.
//!
//! A store holds a single slot: the most recent export text. An absent
//! slot means "no data yet" and is reported as [`LoadOutcome::Empty`],
//! never as a failure.

pub mod memory;

#[cfg(feature = "fs")]
pub mod file;

use async_trait::async_trait;

use crate::serializer::{ExportError, Serializer};
use crate::types::{ExportDocument, Topic};

/// Trait for single-slot blob storage backends.
///
/// Reads and writes are the only suspension points in the crate. A failed
/// read is terminal for the operation that issued it; nothing retries.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync;

    /// Fetch the slot contents, `None` if nothing was ever written.
    async fn read(&self) -> Result<Option<String>, Self::Error>;

    /// Replace the slot contents.
    async fn write(&self, text: &str) -> Result<(), Self::Error>;
}

/// Result of loading the persisted slot.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The slot held a valid document.
    Loaded(ExportDocument),
    /// The slot is empty.
    Empty,
    /// The slot could not be read, parsed or validated.
    Failed(ExportError),
}

impl LoadOutcome {
    /// Check whether the slot was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Get the failure if present.
    pub fn error(&self) -> Option<&ExportError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Loaded topics, or `fallback` when empty or failed.
    pub fn topics_or(self, fallback: Vec<Topic>) -> Vec<Topic> {
        match self {
            Self::Loaded(document) => document.into_topics(),
            Self::Empty | Self::Failed(_) => fallback,
        }
    }
}

/// Load and validate the persisted export.
pub async fn load_export_data<S: BlobStore>(store: &S, serializer: &Serializer) -> LoadOutcome {
    let text = match store.read().await {
        Ok(Some(text)) if !text.is_empty() => text,
        Ok(_) => return LoadOutcome::Empty,
        Err(e) => return LoadOutcome::Failed(ExportError::from_store(e)),
    };

    match serializer.deserialize(&text) {
        Ok(document) => LoadOutcome::Loaded(document),
        Err(e) => LoadOutcome::Failed(e),
    }
}

/// Validate, render and persist `document`.
///
/// Nothing is written unless rendering succeeds.
pub async fn save_export_data<S: BlobStore>(
    store: &S,
    serializer: &Serializer,
    document: &ExportDocument,
) -> Result<(), ExportError> {
    let text = serializer.render(document)?;
    store.write(&text).await.map_err(ExportError::from_store)?;
    tracing::info!(
        topic_count = document.topics.len(),
        bytes = text.len(),
        "Saved export data"
    );
    Ok(())
}

pub use memory::InMemoryBlobStore;

#[cfg(feature = "fs")]
pub use file::FileBlobStore;
