//! Starter collection shown before the user has any data.

use chrono::{DateTime, Utc};

use crate::types::{IdGenerator, Topic};

/// Names of the starter topics, in display order.
pub const DEFAULT_TOPIC_NAMES: [&str; 5] = [
    "Words of Affirmation",
    "Acts of Service",
    "Receiving Gifts",
    "Quality Time",
    "Physical Touch",
];

/// Build the starter topics with fresh ids from `ids`.
pub fn default_topics(ids: &mut impl IdGenerator, now: DateTime<Utc>) -> Vec<Topic> {
    DEFAULT_TOPIC_NAMES
        .iter()
        .map(|name| Topic::new(ids, now).with_name(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::Serializer;
    use crate::types::SequentialIds;

    #[test]
    fn test_default_topics_are_exportable() {
        let now = Utc::now();
        let topics = default_topics(&mut SequentialIds::default(), now);

        assert_eq!(topics.len(), 5);
        assert_eq!(topics[0].name, "Words of Affirmation");
        assert_eq!(topics[4].id().as_str(), "new-topic-4");
        assert!(Serializer::default().serialize_at(&topics, now).is_ok());
    }
}
