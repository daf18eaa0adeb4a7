//! The versioned export envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::iso_timestamp;
use super::topic::Topic;

/// Version stamps written on every export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// Application version, `number.number.number`.
    pub sem_ver: String,
    /// Document shape version.
    #[serde(deserialize_with = "super::integral::deserialize_u32")]
    pub schema_version: u32,
    /// ISO-8601 export time, stored verbatim.
    pub iso_exported_at: String,
}

/// Portable form of a topic collection.
///
/// Built on demand for export and consumed immediately on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Version stamps.
    pub metadata: ExportMetadata,
    /// Topics in display order. May be empty.
    pub topics: Vec<Topic>,
}

impl ExportDocument {
    /// Wrap `topics` with the given version stamps and export time.
    pub fn new(
        topics: Vec<Topic>,
        sem_ver: impl Into<String>,
        schema_version: u32,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            metadata: ExportMetadata {
                sem_ver: sem_ver.into(),
                schema_version,
                iso_exported_at: iso_timestamp(exported_at),
            },
            topics,
        }
    }

    /// Consume the document, keeping only the topics.
    pub fn into_topics(self) -> Vec<Topic> {
        self.topics
    }
}
