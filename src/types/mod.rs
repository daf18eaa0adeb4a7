//! Core types for the jar kernel.

pub mod ids;
pub mod tag;
pub mod emotion;
pub mod topic;
pub mod export;
mod integral;

use chrono::{DateTime, SecondsFormat, Utc};

pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use tag::Tag;
pub use emotion::{Emotion, EmotionMetadata, Reaction, Strength, StrengthError};
pub use topic::{Topic, TopicId, TopicMetadata};
pub use export::{ExportDocument, ExportMetadata};

/// Format a timestamp the way every document field stores it.
///
/// UTC, millisecond precision, `Z` suffix (`2024-05-01T12:00:00.000Z`).
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(iso_timestamp(at), "2024-05-01T12:00:00.000Z");
    }
}
