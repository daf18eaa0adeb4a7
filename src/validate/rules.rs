//! Declarative constraint table for the export schema.
//!
//! Every leaf field of the export document has one [`FieldRule`] here.
//! The structural walk in the parent module only decides *where* a rule
//! applies; *what* is allowed lives in [`EXPORT_CONSTRAINTS`].

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime};
use regex_lite::Regex;
use serde_json::Value;

use super::ValidationError;
use crate::types::Reaction;

/// Named string formats shared by several fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `number.number.number`.
    SemVer,
    /// ISO-8601 date-time that also parses as a real timestamp.
    IsoDate,
}

impl Format {
    /// Human description used in error messages.
    pub fn description(&self) -> &'static str {
        match self {
            Self::SemVer => "number.number.number",
            Self::IsoDate => "ISO 8601 format (YYYY-MM-DDTHH:mm:ss)",
        }
    }

    fn pattern(&self) -> &'static Regex {
        static SEM_VER: OnceLock<Regex> = OnceLock::new();
        static ISO_DATE: OnceLock<Regex> = OnceLock::new();

        match self {
            Self::SemVer => SEM_VER.get_or_init(|| {
                Regex::new(r"^\d+\.\d+\.\d+$").expect("static semver pattern")
            }),
            Self::IsoDate => ISO_DATE.get_or_init(|| {
                Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("static date pattern")
            }),
        }
    }

    /// Semantic check run after the pattern matched.
    fn accepts(&self, value: &str) -> bool {
        match self {
            Self::SemVer => true,
            Self::IsoDate => is_real_timestamp(value),
        }
    }
}

/// Accept RFC 3339 (offset or `Z`) or a naive date-time with optional fraction.
fn is_real_timestamp(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Constraint on a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
    /// String with optional length bounds, in characters.
    Text {
        /// Minimum length.
        min_len: Option<usize>,
        /// Maximum length.
        max_len: Option<usize>,
    },
    /// Finite number with optional bounds.
    Number {
        /// Inclusive lower bound.
        min: Option<i64>,
        /// Inclusive upper bound.
        max: Option<i64>,
        /// Reject values with a fractional part.
        integer: bool,
    },
    /// String drawn from a fixed set.
    OneOf(&'static [&'static str]),
    /// String in a named format.
    Format(Format),
    /// Array; items are walked by the caller.
    List {
        /// Reject empty arrays.
        nonempty: bool,
        /// Require exactly this many items.
        exact_len: Option<usize>,
    },
}

impl FieldRule {
    const fn text(min_len: usize, max_len: Option<usize>) -> Self {
        Self::Text { min_len: Some(min_len), max_len }
    }

    /// Check `value` at `path`. Every rule yields at most one error.
    pub fn check(&self, value: &Value, path: &str) -> Option<ValidationError> {
        let message = match self {
            Self::Text { min_len, max_len } => check_text(value, *min_len, *max_len),
            Self::Number { min, max, integer } => check_number(value, *min, *max, *integer),
            Self::OneOf(allowed) => check_one_of(value, allowed),
            Self::Format(format) => check_format(value, *format),
            Self::List { nonempty, exact_len } => check_list(value, *nonempty, *exact_len),
        }?;
        Some(ValidationError::new(path, message))
    }
}

fn check_text(value: &Value, min_len: Option<usize>, max_len: Option<usize>) -> Option<String> {
    let Some(s) = value.as_str() else {
        return Some("Must be a string".to_string());
    };
    let len = s.chars().count();
    if let Some(min) = min_len.filter(|min| len < *min) {
        return Some(format!("Must be at least {min} characters"));
    }
    if let Some(max) = max_len.filter(|max| len > *max) {
        return Some(format!("Must be at most {max} characters"));
    }
    None
}

fn check_number(value: &Value, min: Option<i64>, max: Option<i64>, integer: bool) -> Option<String> {
    let Value::Number(number) = value else {
        return Some("Must be a number".to_string());
    };
    let Some(n) = number.as_f64().filter(|n| n.is_finite()) else {
        return Some("Must be a valid number".to_string());
    };
    let is_integer = number.is_i64() || number.is_u64() || n.fract() == 0.0;
    if integer && !is_integer {
        return Some("Must be an integer".to_string());
    }
    if let Some(min) = min.filter(|min| n < *min as f64) {
        return Some(format!("Must be at least {min}"));
    }
    if let Some(max) = max.filter(|max| n > *max as f64) {
        return Some(format!("Must be at most {max}"));
    }
    None
}

fn check_one_of(value: &Value, allowed: &[&str]) -> Option<String> {
    let Some(s) = value.as_str() else {
        return Some("Must be a string".to_string());
    };
    if allowed.contains(&s) {
        None
    } else {
        Some(format!("Must be one of: {}", allowed.join(", ")))
    }
}

fn check_format(value: &Value, format: Format) -> Option<String> {
    let Some(s) = value.as_str() else {
        return Some("Must be a string".to_string());
    };
    if !format.pattern().is_match(s) {
        return Some(format!("Must match format: {}", format.description()));
    }
    if !format.accepts(s) {
        return Some(format!("Invalid {}", format.description()));
    }
    None
}

fn check_list(value: &Value, nonempty: bool, exact_len: Option<usize>) -> Option<String> {
    let Some(items) = value.as_array() else {
        return Some("Must be an array".to_string());
    };
    if nonempty && items.is_empty() {
        return Some("Must contain at least one item".to_string());
    }
    if let Some(len) = exact_len.filter(|len| items.len() != *len) {
        return Some(format!("Must contain exactly {len} items"));
    }
    None
}

/// Rules for a tag.
#[derive(Debug, Clone, Copy)]
pub struct TagRules {
    /// `name`.
    pub name: FieldRule,
}

/// Rules for an emotion's metadata.
#[derive(Debug, Clone, Copy)]
pub struct EmotionMetadataRules {
    /// `authorName`.
    pub author_name: FieldRule,
    /// `isoCreatedAt`.
    pub iso_created_at: FieldRule,
    /// `isoUpdatedAt`.
    pub iso_updated_at: FieldRule,
}

/// Rules for an emotion.
#[derive(Debug, Clone, Copy)]
pub struct EmotionRules {
    /// `metadata.*`.
    pub metadata: EmotionMetadataRules,
    /// `producer`.
    pub producer: FieldRule,
    /// `reaction`.
    pub reaction: FieldRule,
    /// `strength`.
    pub strength: FieldRule,
}

/// Rules for a topic's metadata.
#[derive(Debug, Clone, Copy)]
pub struct TopicMetadataRules {
    /// `id`.
    pub id: FieldRule,
    /// `tags`.
    pub tags: FieldRule,
}

/// Rules for a topic.
#[derive(Debug, Clone, Copy)]
pub struct TopicRules {
    /// `metadata.*`.
    pub metadata: TopicMetadataRules,
    /// `name`.
    pub name: FieldRule,
    /// `emotions`.
    pub emotions: FieldRule,
}

/// Rules for the export envelope metadata.
#[derive(Debug, Clone, Copy)]
pub struct ExportMetadataRules {
    /// `semVer`.
    pub sem_ver: FieldRule,
    /// `schemaVersion`.
    pub schema_version: FieldRule,
    /// `isoExportedAt`.
    pub iso_exported_at: FieldRule,
}

/// Rules for the export envelope.
#[derive(Debug, Clone, Copy)]
pub struct ExportRules {
    /// `metadata.*`.
    pub metadata: ExportMetadataRules,
    /// `topics`.
    pub topics: FieldRule,
}

/// The whole constraint table.
#[derive(Debug, Clone, Copy)]
pub struct ExportConstraints {
    /// Tag rules.
    pub tag: TagRules,
    /// Emotion rules.
    pub emotion: EmotionRules,
    /// Topic rules.
    pub topic: TopicRules,
    /// Envelope rules.
    pub export: ExportRules,
}

/// Constraints for schema version 1.
pub const EXPORT_CONSTRAINTS: ExportConstraints = ExportConstraints {
    tag: TagRules {
        name: FieldRule::text(1, Some(20)),
    },
    emotion: EmotionRules {
        metadata: EmotionMetadataRules {
            author_name: FieldRule::text(1, None),
            iso_created_at: FieldRule::Format(Format::IsoDate),
            iso_updated_at: FieldRule::Format(Format::IsoDate),
        },
        producer: FieldRule::text(1, Some(20)),
        reaction: FieldRule::OneOf(&Reaction::NAMES),
        strength: FieldRule::Number { min: Some(0), max: Some(100), integer: true },
    },
    topic: TopicRules {
        metadata: TopicMetadataRules {
            id: FieldRule::text(1, None),
            tags: FieldRule::List { nonempty: true, exact_len: None },
        },
        name: FieldRule::text(1, None),
        emotions: FieldRule::List { nonempty: true, exact_len: Some(2) },
    },
    export: ExportRules {
        metadata: ExportMetadataRules {
            sem_ver: FieldRule::Format(Format::SemVer),
            schema_version: FieldRule::Number { min: Some(0), max: Some(u32::MAX as i64), integer: true },
            iso_exported_at: FieldRule::Format(Format::IsoDate),
        },
        topics: FieldRule::List { nonempty: false, exact_len: None },
    },
};
