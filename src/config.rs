//! Configuration for export and the `jarctl` binary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{EXPORT_FILE_NAME, EXPORT_SCHEMA_VERSION, EXPORT_SEM_VER};

/// Stamps and formatting applied to every export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Application version written to `metadata.semVer`.
    pub sem_ver: String,
    /// Written to `metadata.schemaVersion`.
    pub schema_version: u32,
    /// Indent output with two spaces.
    pub pretty: bool,
}

impl ExportSettings {
    /// Override the semantic version.
    pub fn with_sem_ver(mut self, sem_ver: impl Into<String>) -> Self {
        self.sem_ver = sem_ver.into();
        self
    }

    /// Override the schema version.
    pub fn with_schema_version(mut self, schema_version: u32) -> Self {
        self.schema_version = schema_version;
        self
    }

    /// Emit compact single-line JSON.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            sem_ver: EXPORT_SEM_VER.to_string(),
            schema_version: EXPORT_SCHEMA_VERSION,
            pretty: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for terminals.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parse `json` / `pretty`; anything else is `None`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Runtime configuration, read from the environment.
///
/// | Variable | Default |
/// |----------|---------|
/// | `JAR_STORAGE_PATH` | `jars-export.json` |
/// | `LOG_FORMAT` | `pretty` |
/// | `JAR_EXPORT_COMPACT` | unset (pretty output) |
#[derive(Debug, Clone)]
pub struct JarConfig {
    /// File holding the persisted export blob.
    pub storage_path: PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
    /// Export stamps and formatting.
    pub export: ExportSettings,
}

impl JarConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let storage_path = lookup("JAR_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => LogFormat::from_str(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unknown LOG_FORMAT, using pretty");
                LogFormat::Pretty
            }),
            None => LogFormat::Pretty,
        };

        let compact = lookup("JAR_EXPORT_COMPACT")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let export = if compact {
            ExportSettings::default().compact()
        } else {
            ExportSettings::default()
        };

        Self { storage_path, log_format, export }
    }
}

impl Default for JarConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
