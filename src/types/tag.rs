//! Topic tags.

use serde::{Deserialize, Serialize};

/// Name given to the tag every new topic starts with.
pub const DEFAULT_TAG_NAME: &str = "default";

/// A label attached to a topic. Owned by its topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name, 1–20 characters on the wire.
    pub name: String,
}

impl Tag {
    /// Create a tag.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::new(DEFAULT_TAG_NAME)
    }
}
