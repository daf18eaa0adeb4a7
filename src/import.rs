//! Import with fallback.
//!
//! An import never leaves the caller with a blank or half-applied
//! collection: on any failure the caller-supplied fallback is used and a
//! diagnostic is logged.

use crate::serializer::{ExportError, Serializer};
use crate::store::{load_export_data, BlobStore, LoadOutcome};
use crate::types::Topic;

/// Topics to display after an import attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Imported {
    /// Imported topics, or the fallback.
    pub topics: Vec<Topic>,
    /// Why the fallback was used, if the import failed.
    pub error: Option<ExportError>,
}

impl Imported {
    /// Check whether the fallback replaced the import because of an error.
    pub fn fell_back(&self) -> bool {
        self.error.is_some()
    }

    fn fallback(fallback: Vec<Topic>, error: ExportError) -> Self {
        tracing::warn!(
            error = %error,
            issue_count = error.issues().len(),
            fallback_count = fallback.len(),
            "Import failed, using fallback topics"
        );
        for issue in error.issues() {
            tracing::debug!(path = %issue.path, message = %issue.message, "Import issue");
        }
        Self { topics: fallback, error: Some(error) }
    }
}

/// Parse `text`, or use `fallback` if it is malformed or invalid.
pub fn import_or_default(text: &str, fallback: Vec<Topic>, serializer: &Serializer) -> Imported {
    match serializer.deserialize(text) {
        Ok(document) => Imported { topics: document.into_topics(), error: None },
        Err(e) => Imported::fallback(fallback, e),
    }
}

/// Load from `source`, or use `fallback`.
///
/// An empty source is not an error: the fallback is used silently.
pub async fn import_from<S: BlobStore>(source: &S, fallback: Vec<Topic>, serializer: &Serializer) -> Imported {
    match load_export_data(source, serializer).await {
        LoadOutcome::Loaded(document) => Imported { topics: document.into_topics(), error: None },
        LoadOutcome::Empty => {
            tracing::debug!("Import source empty, using fallback topics");
            Imported { topics: fallback, error: None }
        }
        LoadOutcome::Failed(e) => Imported::fallback(fallback, e),
    }
}
