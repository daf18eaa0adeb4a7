//! Keyed list reconciliation.
//!
//! The reconciler compares the rendered list against a desired list and
//! emits the minimal [`ChangeSet`] that brings the rendered list in line.
//!
//! ## Contract
//!
//! - Identity is the key alone; item contents are never compared.
//! - Keys present on both sides are never touched. There is no update
//!   operation: edits to an existing item go to the item directly.
//! - Inserts come first, in desired order, then removals, in rendered order.
//! - Reconciling against the applied result yields an empty change set.
//! - Reordering of existing keys is not reconciled.
//!
//! ## Insert Anchoring
//!
//! A bulk [`Trigger::Replace`] appends new items at the end. A single-item
//! [`Trigger::Add`] places new items right after the focused item, or at the
//! end when nothing holds focus.
//!
//! ## Callers
//!
//! The reconciler never mutates the rendered list; callers apply the change
//! set themselves (see [`KeyedList::apply`]) and must not interleave calls.

pub mod focus;
pub mod list;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::types::{Topic, TopicId};

pub use focus::{next_key, pick_fallback_focus, previous_key};
pub use list::KeyedList;

/// An item with a stable identity.
pub trait Keyed {
    /// Identity type.
    type Key: Clone + Eq + Hash + fmt::Debug;

    /// Identity of this item.
    fn key(&self) -> &Self::Key;
}

impl Keyed for Topic {
    type Key = TopicId;

    fn key(&self) -> &TopicId {
        &self.metadata.id
    }
}

/// What caused a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The user added a single item.
    Add,
    /// The whole collection was replaced, e.g. by an import.
    Replace,
}

/// Where an inserted item goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor<K> {
    /// After every existing item.
    End,
    /// Immediately after the item with this key.
    After(K),
}

/// One structural operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T: Keyed> {
    /// Add a new item.
    Insert {
        /// The item.
        item: T,
        /// Placement.
        anchor: Anchor<T::Key>,
    },
    /// Drop an item.
    Remove {
        /// Key of the removed item.
        key: T::Key,
        /// Where focus goes if the removed item held it.
        fallback_focus: Option<T::Key>,
    },
}

impl<T: Keyed> Change<T> {
    /// Key the operation applies to.
    pub fn key(&self) -> &T::Key {
        match self {
            Self::Insert { item, .. } => item.key(),
            Self::Remove { key, .. } => key,
        }
    }

    /// Check if this is an insert.
    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert { .. })
    }
}

/// Ordered operations produced by one reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet<T: Keyed> {
    changes: Vec<Change<T>>,
    focus_after: Option<T::Key>,
}

impl<T: Keyed> ChangeSet<T> {
    /// Operations in application order.
    pub fn changes(&self) -> &[Change<T>] {
        &self.changes
    }

    /// Consume into the operations.
    pub fn into_changes(self) -> Vec<Change<T>> {
        self.changes
    }

    /// Focused key once every operation has been applied.
    pub fn focus_after(&self) -> Option<&T::Key> {
        self.focus_after.as_ref()
    }

    /// Check if nothing needs to change.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Number of inserts.
    pub fn insert_count(&self) -> usize {
        self.changes.iter().filter(|c| c.is_insert()).count()
    }

    /// Number of removals.
    pub fn remove_count(&self) -> usize {
        self.changes.len() - self.insert_count()
    }
}

/// Error type for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError<K: fmt::Debug> {
    /// The desired list names the same key twice.
    #[error("Duplicate key in desired items: {0:?}")]
    DuplicateKey(K),
}

/// Compute the operations that turn `current` into `desired`.
///
/// Fails only if `desired` contains a duplicate key.
pub fn reconcile<T: Keyed + Clone>(
    current: &KeyedList<T>,
    desired: &[T],
    trigger: Trigger,
) -> Result<ChangeSet<T>, ReconcileError<T::Key>> {
    let mut desired_keys = HashSet::with_capacity(desired.len());
    for item in desired {
        if !desired_keys.insert(item.key()) {
            return Err(ReconcileError::DuplicateKey(item.key().clone()));
        }
    }

    let current_keys = current.keys();
    let rendered: HashSet<&T::Key> = current_keys.iter().collect();

    // Simulated rendered order, so removal fallbacks see the same
    // adjacency the caller will see while applying.
    let (mut anchor, insert_at) = match (trigger, current.focus()) {
        (Trigger::Add, Some(focused)) => (
            Anchor::After(focused.clone()),
            current.position(focused).map(|i| i + 1),
        ),
        _ => (Anchor::End, None),
    };

    let mut changes = Vec::new();
    let mut inserted = Vec::new();
    for item in desired.iter().filter(|item| !rendered.contains(item.key())) {
        let key = item.key().clone();
        changes.push(Change::Insert { item: item.clone(), anchor: anchor.clone() });
        if let Anchor::After(_) = anchor {
            // Successive new items chain after each other.
            anchor = Anchor::After(key.clone());
        }
        inserted.push(key);
    }

    let mut order = current_keys.clone();
    let insert_at = insert_at.unwrap_or(order.len());
    order.splice(insert_at..insert_at, inserted);

    // Doubly linked view over `order`; removals unlink in constant time.
    let index: HashMap<&T::Key, usize> = order.iter().enumerate().map(|(i, k)| (k, i)).collect();
    let mut prev: Vec<Option<usize>> = (0..order.len()).map(|i| i.checked_sub(1)).collect();
    let mut next: Vec<Option<usize>> = (0..order.len())
        .map(|i| Some(i + 1).filter(|j| *j < order.len()))
        .collect();

    let mut focus_after = current.focus().cloned();
    for key in current_keys.iter().filter(|k| !desired_keys.contains(*k)) {
        let Some(&i) = index.get(key) else {
            continue;
        };
        // Previous live sibling, else next: the `pick_fallback_focus` policy.
        let fallback_focus = prev[i].or(next[i]).map(|j| order[j].clone());
        if let Some(p) = prev[i] {
            next[p] = next[i];
        }
        if let Some(n) = next[i] {
            prev[n] = prev[i];
        }

        if focus_after.as_ref() == Some(key) {
            focus_after = fallback_focus.clone();
        }
        changes.push(Change::Remove { key: key.clone(), fallback_focus });
    }

    let change_set = ChangeSet { changes, focus_after };
    tracing::debug!(
        trigger = ?trigger,
        inserts = change_set.insert_count(),
        removals = change_set.remove_count(),
        "Reconciled keyed list"
    );
    Ok(change_set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str);

    impl Keyed for Item {
        type Key = &'static str;

        fn key(&self) -> &&'static str {
            &self.0
        }
    }

    fn list(keys: &[&'static str]) -> KeyedList<Item> {
        KeyedList::from_items(keys.iter().map(|k| Item(*k)).collect()).unwrap()
    }

    fn items(keys: &[&'static str]) -> Vec<Item> {
        keys.iter().map(|k| Item(*k)).collect()
    }

    #[test]
    fn test_minimal_changes() {
        let current = list(&["a", "b", "c"]);
        let changes = reconcile(&current, &items(&["b", "c", "d"]), Trigger::Replace).unwrap();

        assert_eq!(
            changes.changes(),
            &[
                Change::Insert { item: Item("d"), anchor: Anchor::End },
                Change::Remove { key: "a", fallback_focus: Some("b") },
            ]
        );
    }

    #[test]
    fn test_identical_keys_no_changes() {
        let current = list(&["a", "b"]);
        assert!(reconcile(&current, &items(&["a", "b"]), Trigger::Replace).unwrap().is_empty());
        // Reordering is not reconciled.
        assert!(reconcile(&current, &items(&["b", "a"]), Trigger::Replace).unwrap().is_empty());
    }

    #[test]
    fn test_empty_desired_removes_everything() {
        let current = list(&["a", "b"]);
        let changes = reconcile(&current, &[], Trigger::Replace).unwrap();
        assert_eq!(changes.insert_count(), 0);
        assert_eq!(changes.remove_count(), 2);
    }

    #[test]
    fn test_add_anchors_after_focus() {
        let mut current = list(&["a", "b", "c"]);
        current.set_focus(&"b");

        let changes = reconcile(&current, &items(&["a", "b", "c", "new"]), Trigger::Add).unwrap();
        assert_eq!(
            changes.changes(),
            &[Change::Insert { item: Item("new"), anchor: Anchor::After("b") }]
        );

        current.apply(changes);
        assert_eq!(current.keys(), vec!["a", "b", "new", "c"]);
    }

    #[test]
    fn test_add_without_focus_appends() {
        let current = list(&["a", "b"]);
        let changes = reconcile(&current, &items(&["a", "b", "n"]), Trigger::Add).unwrap();
        assert_eq!(changes.changes(), &[Change::Insert { item: Item("n"), anchor: Anchor::End }]);
    }

    #[test]
    fn test_replace_ignores_focus() {
        let mut current = list(&["a", "b"]);
        current.set_focus(&"a");
        let changes = reconcile(&current, &items(&["a", "b", "n"]), Trigger::Replace).unwrap();
        assert_eq!(changes.changes(), &[Change::Insert { item: Item("n"), anchor: Anchor::End }]);
    }

    #[test]
    fn test_several_adds_chain_after_focus() {
        let mut current = list(&["a", "b"]);
        current.set_focus(&"a");
        let changes = reconcile(&current, &items(&["x", "a", "b", "y"]), Trigger::Add).unwrap();
        current.apply(changes);
        assert_eq!(current.keys(), vec!["a", "x", "y", "b"]);
    }

    #[test]
    fn test_removing_focused_moves_focus() {
        let mut current = list(&["a", "b", "c"]);
        current.set_focus(&"b");

        let changes = reconcile(&current, &items(&["a", "c"]), Trigger::Replace).unwrap();
        assert_eq!(changes.focus_after(), Some(&"a"));

        current.apply(changes);
        assert_eq!(current.focus(), Some(&"a"));
    }

    #[test]
    fn test_focus_follows_successive_removals() {
        let mut current = list(&["a", "b", "c"]);
        current.set_focus(&"b");

        // a goes first and leaves b focused; b then falls back to c.
        let changes = reconcile(&current, &items(&["c"]), Trigger::Replace).unwrap();
        assert_eq!(changes.focus_after(), Some(&"c"));

        current.apply(changes);
        assert_eq!(current.keys(), vec!["c"]);
        assert_eq!(current.focus(), Some(&"c"));
    }

    #[test]
    fn test_fallbacks_match_sequential_policy() {
        let keys = ["a", "b", "c", "d", "e", "f", "g"];
        let current = list(&keys);
        let desired = items(&["b", "e", "new"]);

        let changes = reconcile(&current, &desired, Trigger::Replace).unwrap();

        let mut order: Vec<&str> = keys.to_vec();
        order.push("new");
        for change in changes.changes() {
            if let Change::Remove { key, fallback_focus } = change {
                assert_eq!(*fallback_focus, pick_fallback_focus(key, &order), "removing {key}");
                order.retain(|k| k != key);
            }
        }
        assert_eq!(order, ["b", "e", "new"]);
    }

    #[test]
    fn test_large_list_reconciles() {
        let keys: Vec<&'static str> = (0..2_000)
            .map(|i| &*Box::leak(format!("k{i}").into_boxed_str()))
            .collect();
        let mut current = list(&keys[..1_500]);
        current.set_focus(&keys[750]);

        let changes = reconcile(&current, &items(&keys[500..]), Trigger::Add).unwrap();
        assert_eq!(changes.insert_count(), 500);
        assert_eq!(changes.remove_count(), 500);

        current.apply(changes);
        assert_eq!(current.len(), 1_500);
        assert_eq!(current.position(&keys[1_500]), Some(251));
        assert_eq!(current.focus(), Some(&keys[750]));
    }

    #[test]
    fn test_removing_sole_item_clears_focus() {
        let mut current = list(&["a"]);
        current.set_focus(&"a");
        let changes = reconcile(&current, &[], Trigger::Replace).unwrap();
        assert_eq!(changes.focus_after(), None);
        current.apply(changes);
        assert!(current.is_empty());
        assert_eq!(current.focus(), None);
    }

    #[test]
    fn test_duplicate_desired_key_rejected() {
        let current = list(&["a"]);
        let err = reconcile(&current, &items(&["a", "b", "b"]), Trigger::Replace).unwrap_err();
        assert_eq!(err, ReconcileError::DuplicateKey("b"));
    }

    #[test]
    fn test_idempotent_after_apply() {
        let mut current = list(&["a", "b", "c", "d"]);
        current.set_focus(&"c");
        let desired = items(&["e", "b", "f", "d"]);

        let changes = reconcile(&current, &desired, Trigger::Add).unwrap();
        current.apply(changes);
        assert!(reconcile(&current, &desired, Trigger::Add).unwrap().is_empty());
    }
}
