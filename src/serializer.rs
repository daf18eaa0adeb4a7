//! Export serialization.
//!
//! Converts a topic collection to and from the versioned export text.
//! Validation always runs before any text is produced or accepted, so a
//! caller never receives a partially valid document.
//!
//! ## Round Trip
//!
//! For every document `d` that passes validation,
//! `deserialize(render(d)) == d`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::ExportSettings;
use crate::types::{ExportDocument, Topic};
use crate::validate::{check_export, validate, ValidationError, ROOT_PATH};

/// Why an export or import failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// The text is not well-formed JSON.
    #[error("JSON parse error: {0}")]
    Parse(String),
    /// The data violates the export schema.
    #[error("Export document failed validation with {} error(s)", .0.len())]
    Invalid(Vec<ValidationError>),
    /// The document could not be rendered to text.
    #[error("Unable to stringify export document: {0}")]
    Render(String),
    /// Reading or writing the backing store failed.
    #[error("Unable to access storage: {0}")]
    Storage(String),
}

impl ExportError {
    /// Create a storage error from any error type.
    pub fn from_store<E: std::error::Error>(e: E) -> Self {
        Self::Storage(e.to_string())
    }

    /// Flatten into path-qualified issues for display.
    ///
    /// Everything but schema errors becomes a single issue at `root`.
    pub fn issues(&self) -> Vec<ValidationError> {
        match self {
            Self::Invalid(errors) => errors.clone(),
            other => vec![ValidationError::new(ROOT_PATH, other.to_string())],
        }
    }

    /// True for malformed input text, as opposed to schema violations.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Converts topics to and from export text.
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    settings: ExportSettings,
}

impl Serializer {
    /// Create a serializer with custom settings.
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    /// Active settings.
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Wrap `topics` in an envelope stamped with the current settings.
    pub fn document(&self, topics: Vec<Topic>, exported_at: DateTime<Utc>) -> ExportDocument {
        ExportDocument::new(topics, self.settings.sem_ver.clone(), self.settings.schema_version, exported_at)
    }

    /// Export `topics`, stamped with the current time.
    pub fn serialize(&self, topics: &[Topic]) -> Result<String, ExportError> {
        self.serialize_at(topics, Utc::now())
    }

    /// Export `topics`, stamped with `exported_at`.
    pub fn serialize_at(&self, topics: &[Topic], exported_at: DateTime<Utc>) -> Result<String, ExportError> {
        let document = self.document(topics.to_vec(), exported_at);
        self.render(&document)
    }

    /// Validate an existing document and render it to text.
    pub fn render(&self, document: &ExportDocument) -> Result<String, ExportError> {
        let value = serde_json::to_value(document).map_err(|e| ExportError::Render(e.to_string()))?;

        let errors = check_export(&value, ROOT_PATH);
        if !errors.is_empty() {
            tracing::warn!(
                error_count = errors.len(),
                first = %errors[0],
                "Export rejected by validation"
            );
            return Err(ExportError::Invalid(errors));
        }

        // Render from the typed document so fields keep declaration order.
        let text = if self.settings.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        };
        text.map_err(|e| ExportError::Render(e.to_string()))
    }

    /// Parse and validate export text.
    pub fn deserialize(&self, text: &str) -> Result<ExportDocument, ExportError> {
        let value: Value = serde_json::from_str(text).map_err(|e| ExportError::Parse(e.to_string()))?;
        validate(value, ROOT_PATH).map_err(ExportError::Invalid)
    }
}

/// Export `topics` with default settings.
pub fn serialize(topics: &[Topic]) -> Result<String, ExportError> {
    Serializer::default().serialize(topics)
}

/// Parse and validate export text with default settings.
pub fn deserialize(text: &str) -> Result<ExportDocument, ExportError> {
    Serializer::default().deserialize(text)
}
