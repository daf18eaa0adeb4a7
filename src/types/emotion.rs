//! Emotion types: one side of a topic's reaction.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::iso_timestamp;

/// Author recorded on emotions created locally.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Strength given to freshly created emotions.
pub const DEFAULT_STRENGTH: u8 = 50;

/// Qualitative reaction category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    /// Good feeling.
    Positive,
    /// Undecided.
    Neutral,
    /// Bad feeling.
    Negative,
}

impl Reaction {
    /// Every reaction, in the order the wire format lists them.
    pub const ALL: [Reaction; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Wire names of [`Reaction::ALL`], same order.
    pub const NAMES: [&'static str; 3] = ["positive", "neutral", "negative"];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// Parse a wire name. Exact match only.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Fill color renderers use for this reaction.
    pub fn hex_color(&self) -> &'static str {
        match self {
            Self::Positive => "#44ff44",
            Self::Neutral => "#ffdd44",
            Self::Negative => "#ff4444",
        }
    }
}

impl Default for Reaction {
    fn default() -> Self {
        Self::Neutral
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an out-of-range strength.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Strength must be between 0 and {max}, got {value}")]
pub struct StrengthError {
    /// Rejected value.
    pub value: u64,
    /// Upper bound.
    pub max: u8,
}

/// Reaction strength as a whole percentage, 0–100.
///
/// Never clamped: out-of-range input is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Strength(u8);

impl Strength {
    /// Largest allowed strength.
    pub const MAX: u8 = 100;

    /// Create a strength, rejecting values above [`Strength::MAX`].
    pub fn new(value: u8) -> Result<Self, StrengthError> {
        if value > Self::MAX {
            return Err(StrengthError { value: value.into(), max: Self::MAX });
        }
        Ok(Self(value))
    }

    /// Percentage value.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self(DEFAULT_STRENGTH)
    }
}

impl TryFrom<u64> for Strength {
    type Error = StrengthError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| StrengthError { value, max: Self::MAX })
            .and_then(Self::new)
    }
}

impl<'de> Deserialize<'de> for Strength {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = super::integral::deserialize_u64(deserializer)?;
        Strength::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Authorship and timestamps of an emotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionMetadata {
    /// Who recorded the emotion.
    pub author_name: String,
    /// ISO-8601 creation time, stored verbatim.
    pub iso_created_at: String,
    /// ISO-8601 last update time, stored verbatim.
    pub iso_updated_at: String,
}

/// One side of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emotion {
    /// Authorship metadata.
    pub metadata: EmotionMetadata,
    /// What produces the emotion, e.g. "Giving" or "Bob".
    pub producer: String,
    /// Reaction category.
    pub reaction: Reaction,
    /// Strength, 0–100.
    pub strength: Strength,
}

impl Emotion {
    /// Neutral, 50% emotion for `producer`, created and updated at `now`.
    pub fn new(producer: impl Into<String>, now: DateTime<Utc>) -> Self {
        let stamp = iso_timestamp(now);
        Self {
            metadata: EmotionMetadata {
                author_name: DEFAULT_AUTHOR.to_string(),
                iso_created_at: stamp.clone(),
                iso_updated_at: stamp,
            },
            producer: producer.into(),
            reaction: Reaction::default(),
            strength: Strength::default(),
        }
    }

    /// Set the reaction.
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reaction = reaction;
        self
    }

    /// Set the strength.
    pub fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.metadata.author_name = author.into();
        self
    }

    /// Record an edit made at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.metadata.iso_updated_at = iso_timestamp(now);
    }
}
