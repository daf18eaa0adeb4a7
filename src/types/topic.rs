//! Topic types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::emotion::Emotion;
use super::ids::IdGenerator;
use super::tag::Tag;

/// Name given to topics created without one.
pub const DEFAULT_TOPIC_NAME: &str = "New Topic";

/// Producer labels of the two sides of a new topic.
pub const DEFAULT_PRODUCERS: [&str; 2] = ["G", "R"];

/// Unique identifier of a topic within a collection.
///
/// Opaque; assigned at creation and never reassigned. This is the
/// reconciliation key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(String);

impl TopicId {
    /// Wrap an id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TopicId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TopicId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identity and tags of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMetadata {
    /// Reconciliation key.
    pub id: TopicId,
    /// Non-empty on the wire.
    pub tags: Vec<Tag>,
}

/// A named topic with exactly two emotions.
///
/// `emotions[0]` is the left side and `emotions[1]` the right side.
/// The sides are never swapped implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Identity and tags.
    pub metadata: TopicMetadata,
    /// Display label.
    pub name: String,
    /// Left and right sides.
    pub emotions: [Emotion; 2],
}

impl Topic {
    /// Create a topic with default fields and a fresh id from `ids`.
    ///
    /// Defaults: name "New Topic", a single "default" tag, and two neutral
    /// 50% emotions produced by "G" and "R".
    pub fn new(ids: &mut impl IdGenerator, now: DateTime<Utc>) -> Self {
        let [left, right] = DEFAULT_PRODUCERS;
        Self {
            metadata: TopicMetadata {
                id: ids.next_id(),
                tags: vec![Tag::default()],
            },
            name: DEFAULT_TOPIC_NAME.to_string(),
            emotions: [Emotion::new(left, now), Emotion::new(right, now)],
        }
    }

    /// Topic id.
    pub fn id(&self) -> &TopicId {
        &self.metadata.id
    }

    /// Replace the id.
    pub fn with_id(mut self, id: impl Into<TopicId>) -> Self {
        self.metadata.id = id.into();
        self
    }

    /// Replace the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace both emotions.
    pub fn with_emotions(mut self, emotions: [Emotion; 2]) -> Self {
        self.emotions = emotions;
        self
    }

    /// Replace the tags.
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.metadata.tags = tags;
        self
    }

    /// Left side.
    pub fn left(&self) -> &Emotion {
        &self.emotions[0]
    }

    /// Right side.
    pub fn right(&self) -> &Emotion {
        &self.emotions[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Reaction, SequentialIds};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_default_topic() {
        let mut ids = SequentialIds::default();
        let topic = Topic::new(&mut ids, now());

        assert_eq!(topic.id().as_str(), "new-topic-0");
        assert_eq!(topic.name, "New Topic");
        assert_eq!(topic.metadata.tags, vec![Tag::new("default")]);
        assert_eq!(topic.left().producer, "G");
        assert_eq!(topic.right().producer, "R");
        assert!(topic.emotions.iter().all(|e| e.reaction == Reaction::Neutral));
    }

    #[test]
    fn test_ids_are_fresh_per_topic() {
        let mut ids = SequentialIds::default();
        let a = Topic::new(&mut ids, now());
        let b = Topic::new(&mut ids, now());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_wire_shape() {
        let mut ids = SequentialIds::default();
        let topic = Topic::new(&mut ids, now()).with_name("Quality Time");
        let value = serde_json::to_value(&topic).unwrap();

        assert_eq!(value["metadata"]["id"], "new-topic-0");
        assert_eq!(value["metadata"]["tags"][0]["name"], "default");
        assert_eq!(value["name"], "Quality Time");
        assert_eq!(value["emotions"].as_array().unwrap().len(), 2);
        assert_eq!(value["emotions"][1]["metadata"]["authorName"], "Unknown");
        assert_eq!(value["emotions"][0]["strength"], 50);
        assert_eq!(value["emotions"][0]["reaction"], "neutral");
    }
}
