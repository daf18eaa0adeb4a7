//! Topic board: the caller side of reconciliation.
//!
//! Owns the rendered topic list and the id generator, routes every
//! membership change through [`reconcile`], and applies the result. A
//! board is single-writer; wrap it yourself if it must be shared.

use chrono::{DateTime, Utc};

use crate::reconcile::{reconcile, ChangeSet, KeyedList, ReconcileError, Trigger};
use crate::serializer::{ExportError, Serializer};
use crate::types::{IdGenerator, Topic, TopicId};

/// Result of a board operation: the change set that was applied.
pub type BoardResult = Result<ChangeSet<Topic>, ReconcileError<TopicId>>;

/// Ordered topic collection with focus.
#[derive(Debug, Clone)]
pub struct Board<G: IdGenerator> {
    list: KeyedList<Topic>,
    ids: G,
}

impl<G: IdGenerator> Board<G> {
    /// Create an empty board.
    pub fn new(ids: G) -> Self {
        Self { list: KeyedList::new(), ids }
    }

    /// Topics in display order.
    pub fn topics(&self) -> &[Topic] {
        self.list.items()
    }

    /// Rendered list.
    pub fn list(&self) -> &KeyedList<Topic> {
        &self.list
    }

    /// Rendered list, for focus moves and direct edits.
    pub fn list_mut(&mut self) -> &mut KeyedList<Topic> {
        &mut self.list
    }

    /// Focused topic id.
    pub fn focus(&self) -> Option<&TopicId> {
        self.list.focus()
    }

    /// Topic with `id`, for direct property edits.
    pub fn topic_mut(&mut self, id: &TopicId) -> Option<&mut Topic> {
        self.list.get_mut(id)
    }

    /// Create a default topic right after the focused one and focus it.
    pub fn add_topic(&mut self, now: DateTime<Utc>) -> BoardResult {
        let topic = Topic::new(&mut self.ids, now);
        let id = topic.id().clone();

        let mut desired = self.list.items().to_vec();
        desired.push(topic);
        let changes = self.commit(&desired, Trigger::Add)?;

        self.list.set_focus(&id);
        tracing::debug!(topic_id = %id, "Added topic");
        Ok(changes)
    }

    /// Remove the topic with `id`. Focus falls back to a neighbour.
    pub fn remove_topic(&mut self, id: &TopicId) -> BoardResult {
        let desired: Vec<Topic> = self
            .list
            .iter()
            .filter(|topic| topic.id() != id)
            .cloned()
            .collect();
        self.commit(&desired, Trigger::Replace)
    }

    /// Replace the whole collection, e.g. after an import.
    ///
    /// Topics whose ids are already rendered keep their rendered state.
    pub fn replace_all(&mut self, topics: &[Topic]) -> BoardResult {
        self.commit(topics, Trigger::Replace)
    }

    /// Export the current topics.
    pub fn export(&self, serializer: &Serializer, now: DateTime<Utc>) -> Result<String, ExportError> {
        serializer.serialize_at(self.list.items(), now)
    }

    fn commit(&mut self, desired: &[Topic], trigger: Trigger) -> BoardResult {
        let changes = reconcile(&self.list, desired, trigger)?;
        self.list.apply(changes.clone());
        Ok(changes)
    }
}
