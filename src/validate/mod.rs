//! Structural validation of untyped export data.
//!
//! The walk visits every field of the candidate and collects every
//! violation. It never stops at the first failing field: only a node that
//! fails its own type check ("Must be an object") skips its children, and
//! its siblings are still visited.
//!
//! ## Paths
//!
//! Errors carry an accessor path from the root, e.g.
//! `root.topics[2].emotions[1].strength`.
//!
//! ## Narrowing
//!
//! On success the candidate is deserialized into the typed model without
//! being modified. The structural rules are strictly tighter than the
//! typed model, so narrowing a checked value cannot fail in practice.
//! Fields the schema does not name are accepted and dropped.

pub mod rules;

use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Emotion, ExportDocument, Tag, Topic};
use rules::{FieldRule, EXPORT_CONSTRAINTS};

/// Root path used for whole-document validation.
pub const ROOT_PATH: &str = "root";

/// A single violation, located by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    /// Accessor path from the root.
    pub path: String,
    /// Self-contained description.
    pub message: String,
}

impl ValidationError {
    /// Create an error.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), message: message.into() }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of validating a value as `T`.
pub type Validated<T> = Result<T, Vec<ValidationError>>;

/// Validate `candidate` as an [`ExportDocument`] rooted at `root_path`.
pub fn validate(candidate: Value, root_path: &str) -> Validated<ExportDocument> {
    let errors = check_export(&candidate, root_path);
    narrow(candidate, root_path, errors)
}

/// Collect every violation in `candidate` without narrowing it.
pub fn check_export(candidate: &Value, root_path: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    walk_export(candidate, root_path, &mut errors);
    errors
}

/// Validate a standalone tag, rooted at `tag`.
pub fn validate_tag(candidate: Value) -> Validated<Tag> {
    let mut errors = Vec::new();
    walk_tag(&candidate, "tag", &mut errors);
    narrow(candidate, "tag", errors)
}

/// Validate a standalone emotion, rooted at `emotion`.
pub fn validate_emotion(candidate: Value) -> Validated<Emotion> {
    let mut errors = Vec::new();
    walk_emotion(&candidate, "emotion", &mut errors);
    narrow(candidate, "emotion", errors)
}

/// Validate a standalone topic, rooted at `topic`.
pub fn validate_topic(candidate: Value) -> Validated<Topic> {
    let mut errors = Vec::new();
    walk_topic(&candidate, "topic", &mut errors);
    narrow(candidate, "topic", errors)
}

fn narrow<T: DeserializeOwned>(candidate: Value, root_path: &str, errors: Vec<ValidationError>) -> Validated<T> {
    if !errors.is_empty() {
        return Err(errors);
    }
    serde_json::from_value(candidate).map_err(|e| {
        vec![ValidationError::new(root_path, format!("Does not match the expected shape: {e}"))]
    })
}

fn field_path(path: &str, name: &str) -> String {
    format!("{path}.{name}")
}

fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

/// Type-level object check. `None` means the caller stops descending.
fn expect_object<'a>(value: &'a Value, path: &str, errors: &mut Vec<ValidationError>) -> Option<&'a Map<String, Value>> {
    let object = value.as_object();
    if object.is_none() {
        errors.push(ValidationError::new(path, "Must be an object"));
    }
    object
}

/// Apply a leaf rule to `object[name]`. A missing field is checked as null.
fn check_field(object: &Map<String, Value>, name: &str, rule: FieldRule, path: &str, errors: &mut Vec<ValidationError>) {
    let value = object.get(name).unwrap_or(&Value::Null);
    errors.extend(rule.check(value, &field_path(path, name)));
}

/// Apply a list rule to `object[name]` and walk its items if it passes.
fn walk_list(
    object: &Map<String, Value>,
    name: &str,
    rule: FieldRule,
    path: &str,
    errors: &mut Vec<ValidationError>,
    walk_item: fn(&Value, &str, &mut Vec<ValidationError>),
) {
    let value = object.get(name).unwrap_or(&Value::Null);
    let list_path = field_path(path, name);
    if let Some(error) = rule.check(value, &list_path) {
        errors.push(error);
        return;
    }
    for (index, item) in value.as_array().into_iter().flatten().enumerate() {
        walk_item(item, &index_path(&list_path, index), errors);
    }
}

fn walk_export(value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(object) = expect_object(value, path, errors) else {
        return;
    };
    let rules = &EXPORT_CONSTRAINTS.export;

    let metadata_path = field_path(path, "metadata");
    if let Some(metadata) = expect_object(object.get("metadata").unwrap_or(&Value::Null), &metadata_path, errors) {
        check_field(metadata, "semVer", rules.metadata.sem_ver, &metadata_path, errors);
        check_field(metadata, "schemaVersion", rules.metadata.schema_version, &metadata_path, errors);
        check_field(metadata, "isoExportedAt", rules.metadata.iso_exported_at, &metadata_path, errors);
    }

    walk_list(object, "topics", rules.topics, path, errors, walk_topic);
    check_unique_ids(object.get("topics"), &field_path(path, "topics"), errors);
}

/// Topic ids are the reconciliation key and must not repeat.
///
/// Only ids that are themselves valid strings take part; later
/// occurrences are reported, the first one is kept.
fn check_unique_ids(topics: Option<&Value>, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(topics) = topics.and_then(Value::as_array) else {
        return;
    };
    let mut seen = HashSet::new();
    for (index, topic) in topics.iter().enumerate() {
        let id = topic.pointer("/metadata/id").and_then(Value::as_str);
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            if !seen.insert(id) {
                let id_path = format!("{}.metadata.id", index_path(path, index));
                errors.push(ValidationError::new(id_path, "Must be unique within topics"));
            }
        }
    }
}

fn walk_topic(value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(object) = expect_object(value, path, errors) else {
        return;
    };
    let rules = &EXPORT_CONSTRAINTS.topic;

    let metadata_path = field_path(path, "metadata");
    if let Some(metadata) = expect_object(object.get("metadata").unwrap_or(&Value::Null), &metadata_path, errors) {
        check_field(metadata, "id", rules.metadata.id, &metadata_path, errors);
        walk_list(metadata, "tags", rules.metadata.tags, &metadata_path, errors, walk_tag);
    }

    check_field(object, "name", rules.name, path, errors);
    walk_list(object, "emotions", rules.emotions, path, errors, walk_emotion);
}

fn walk_tag(value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(object) = expect_object(value, path, errors) else {
        return;
    };
    check_field(object, "name", EXPORT_CONSTRAINTS.tag.name, path, errors);
}

fn walk_emotion(value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(object) = expect_object(value, path, errors) else {
        return;
    };
    let rules = &EXPORT_CONSTRAINTS.emotion;

    let metadata_path = field_path(path, "metadata");
    if let Some(metadata) = expect_object(object.get("metadata").unwrap_or(&Value::Null), &metadata_path, errors) {
        check_field(metadata, "authorName", rules.metadata.author_name, &metadata_path, errors);
        check_field(metadata, "isoCreatedAt", rules.metadata.iso_created_at, &metadata_path, errors);
        check_field(metadata, "isoUpdatedAt", rules.metadata.iso_updated_at, &metadata_path, errors);
    }

    check_field(object, "producer", rules.producer, path, errors);
    check_field(object, "reaction", rules.reaction, path, errors);
    check_field(object, "strength", rules.strength, path, errors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn emotion(producer: &str) -> Value {
        json!({
            "metadata": {
                "authorName": "Unknown",
                "isoCreatedAt": "2024-01-01T00:00:00.000Z",
                "isoUpdatedAt": "2024-01-01T00:00:00.000Z"
            },
            "producer": producer,
            "reaction": "neutral",
            "strength": 50
        })
    }

    fn topic(id: &str) -> Value {
        json!({
            "metadata": { "id": id, "tags": [{ "name": "default" }] },
            "name": "Quality Time",
            "emotions": [emotion("G"), emotion("R")]
        })
    }

    fn document(topics: Vec<Value>) -> Value {
        json!({
            "metadata": {
                "semVer": "1.0.0",
                "schemaVersion": 1,
                "isoExportedAt": "2024-01-01T00:00:00.000Z"
            },
            "topics": topics
        })
    }

    fn paths(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_valid_document_narrows() {
        let doc = validate(document(vec![topic("a"), topic("b")]), ROOT_PATH).unwrap();
        assert_eq!(doc.topics.len(), 2);
        assert_eq!(doc.topics[1].id().as_str(), "b");
        assert_eq!(doc.metadata.schema_version, 1);
    }

    #[test]
    fn test_empty_topics_is_valid() {
        assert!(validate(document(vec![]), ROOT_PATH).is_ok());
    }

    #[test]
    fn test_not_an_object() {
        let errors = validate(json!([1, 2]), ROOT_PATH).unwrap_err();
        assert_eq!(errors, vec![ValidationError::new("root", "Must be an object")]);
    }

    #[test]
    fn test_topics_must_be_array() {
        let mut doc = document(vec![]);
        doc["topics"] = json!({});
        let errors = validate(doc, ROOT_PATH).unwrap_err();
        assert_eq!(errors, vec![ValidationError::new("root.topics", "Must be an array")]);
    }

    #[test]
    fn test_missing_metadata_fields() {
        let doc = json!({ "metadata": {}, "topics": [] });
        let errors = validate(doc, ROOT_PATH).unwrap_err();
        assert_eq!(
            paths(&errors),
            vec!["root.metadata.semVer", "root.metadata.schemaVersion", "root.metadata.isoExportedAt"]
        );
    }

    #[test]
    fn test_schema_version_bounded_at_field() {
        let mut doc = document(vec![]);
        doc["metadata"]["schemaVersion"] = json!(4_294_967_296u64);
        let errors = validate(doc, ROOT_PATH).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::new("root.metadata.schemaVersion", "Must be at most 4294967295")]
        );

        let mut doc = document(vec![]);
        doc["metadata"]["schemaVersion"] = json!(u32::MAX);
        assert_eq!(validate(doc, ROOT_PATH).unwrap().metadata.schema_version, u32::MAX);
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let mut doc = document(vec![topic("a")]);
        doc["topics"][0]["color"] = json!("#ff0000");
        doc["extra"] = json!(true);

        let narrowed = validate(doc, ROOT_PATH).unwrap();
        let rendered = serde_json::to_value(&narrowed).unwrap();
        assert!(rendered.get("extra").is_none());
        assert!(rendered["topics"][0].get("color").is_none());
    }

    #[test]
    fn test_collects_errors_across_subtrees() {
        let mut bad_topic = topic("b");
        bad_topic["name"] = json!("");
        bad_topic["emotions"][1]["strength"] = json!(101);
        bad_topic["emotions"][0]["reaction"] = json!("angry");
        bad_topic["metadata"]["tags"][0]["name"] = json!("a tag name that is far too long");

        let mut doc = document(vec![topic("a"), bad_topic, json!("nope")]);
        doc["metadata"]["semVer"] = json!("v1");

        let errors = validate(doc, ROOT_PATH).unwrap_err();
        assert_eq!(
            paths(&errors),
            vec![
                "root.metadata.semVer",
                "root.topics[1].metadata.tags[0].name",
                "root.topics[1].name",
                "root.topics[1].emotions[0].reaction",
                "root.topics[1].emotions[1].strength",
                "root.topics[2]",
            ]
        );
        assert_eq!(errors[4].message, "Must be at most 100");
        assert_eq!(errors[5].message, "Must be an object");
    }

    #[test]
    fn test_emotions_length() {
        let mut empty = topic("a");
        empty["emotions"] = json!([]);
        let errors = validate(document(vec![empty]), ROOT_PATH).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::new("root.topics[0].emotions", "Must contain at least one item")]
        );

        let mut three = topic("a");
        three["emotions"] = json!([emotion("G"), emotion("R"), emotion("B")]);
        let errors = validate(document(vec![three]), ROOT_PATH).unwrap_err();
        assert_eq!(errors[0].message, "Must contain exactly 2 items");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let errors = validate(document(vec![topic("a"), topic("b"), topic("a")]), ROOT_PATH).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::new("root.topics[2].metadata.id", "Must be unique within topics")]
        );
    }

    #[test]
    fn test_custom_root_path() {
        let errors = check_export(&json!(null), "import");
        assert_eq!(paths(&errors), vec!["import"]);
    }

    #[test]
    fn test_component_validators() {
        assert!(validate_tag(json!({ "name": "work" })).is_ok());
        let errors = validate_tag(json!({ "name": "" })).unwrap_err();
        assert_eq!(errors[0].path, "tag.name");

        let mut bad = emotion("G");
        bad["strength"] = json!("50");
        let errors = validate_emotion(bad).unwrap_err();
        assert_eq!(errors, vec![ValidationError::new("emotion.strength", "Must be a number")]);

        let parsed = validate_topic(topic("x")).unwrap();
        assert_eq!(parsed.id().as_str(), "x");
    }

    #[test]
    fn test_integral_float_strength_narrows() {
        let mut t = topic("a");
        t["emotions"][0]["strength"] = json!(40.0);
        let doc = validate(document(vec![t]), ROOT_PATH).unwrap();
        assert_eq!(doc.topics[0].left().strength.get(), 40);
    }
}
