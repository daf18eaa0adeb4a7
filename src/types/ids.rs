//! Topic id generation.
//!
//! Ids are opaque strings assigned once at creation. Generation is an
//! injected capability so tests can create topics deterministically.

use uuid::Uuid;

use super::topic::TopicId;

/// Source of fresh topic ids.
pub trait IdGenerator {
    /// Produce an id not previously returned by this generator.
    fn next_id(&mut self) -> TopicId;
}

/// Random v4 UUID ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> TopicId {
        TopicId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic `prefix-0`, `prefix-1`, ... ids.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Default prefix for sequential ids.
    pub const DEFAULT_PREFIX: &'static str = "new-topic";

    /// Create a generator with a custom prefix, starting at 0.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: 0 }
    }

    /// Start counting from `next` instead of 0.
    pub fn starting_at(mut self, next: u64) -> Self {
        self.next = next;
        self
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> TopicId {
        let id = TopicId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> TopicId {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.next_id().as_str(), "new-topic-0");
        assert_eq!(ids.next_id().as_str(), "new-topic-1");

        let mut custom = SequentialIds::new("jar").starting_at(7);
        assert_eq!(custom.next_id().as_str(), "jar-7");
    }

    #[test]
    fn test_uuid_ids_are_distinct() {
        let mut ids = UuidGenerator;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }
}
