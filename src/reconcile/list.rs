//! Ordered, uniquely keyed list with a focus cursor.
//!
//! This is the reference "rendered" side of reconciliation: it holds
//! items in display order and applies [`ChangeSet`]s.

use std::collections::HashSet;

use super::focus::{next_key, previous_key};
use super::{Anchor, Change, ChangeSet, Keyed, ReconcileError};

/// Items in display order plus the currently focused key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedList<T: Keyed> {
    items: Vec<T>,
    focus: Option<T::Key>,
}

impl<T: Keyed> Default for KeyedList<T> {
    fn default() -> Self {
        Self { items: Vec::new(), focus: None }
    }
}

impl<T: Keyed> KeyedList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from `items`, rejecting duplicate keys. Nothing is focused.
    pub fn from_items(items: Vec<T>) -> Result<Self, ReconcileError<T::Key>> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.key()) {
                return Err(ReconcileError::DuplicateKey(item.key().clone()));
            }
        }
        Ok(Self { items, focus: None })
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keys in display order.
    pub fn keys(&self) -> Vec<T::Key> {
        self.items.iter().map(|item| item.key().clone()).collect()
    }

    /// Items in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Iterate items in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Consume into the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Display position of `key`.
    pub fn position(&self, key: &T::Key) -> Option<usize> {
        self.items.iter().position(|item| item.key() == key)
    }

    /// Check if `key` is present.
    pub fn contains(&self, key: &T::Key) -> bool {
        self.position(key).is_some()
    }

    /// Item with `key`.
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Mutable item with `key`, for direct property edits.
    ///
    /// Changing the key through this reference breaks reconciliation.
    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.key() == key)
    }

    /// Focused key.
    pub fn focus(&self) -> Option<&T::Key> {
        self.focus.as_ref()
    }

    /// Focus `key`. Returns false, leaving focus unchanged, if absent.
    pub fn set_focus(&mut self, key: &T::Key) -> bool {
        if !self.contains(key) {
            return false;
        }
        self.focus = Some(key.clone());
        true
    }

    /// Drop focus.
    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// Move focus one item forward; stays put at the end.
    ///
    /// With nothing focused, focuses the first item.
    pub fn focus_next(&mut self) -> Option<&T::Key> {
        let keys = self.keys();
        let target = match &self.focus {
            Some(current) => next_key(current, &keys).or_else(|| self.focus.clone()),
            None => keys.first().cloned(),
        };
        self.focus = target;
        self.focus.as_ref()
    }

    /// Move focus one item back; stays put at the start.
    ///
    /// With nothing focused, focuses the last item.
    pub fn focus_previous(&mut self) -> Option<&T::Key> {
        let keys = self.keys();
        let target = match &self.focus {
            Some(current) => previous_key(current, &keys).or_else(|| self.focus.clone()),
            None => keys.last().cloned(),
        };
        self.focus = target;
        self.focus.as_ref()
    }

    /// Apply `changes` in order.
    ///
    /// An insert anchored after a key that is no longer present goes to the
    /// end. Removing the focused item moves focus to the change's fallback.
    pub fn apply(&mut self, changes: ChangeSet<T>) {
        for change in changes.into_changes() {
            match change {
                Change::Insert { item, anchor } => {
                    let index = match &anchor {
                        Anchor::End => self.items.len(),
                        Anchor::After(after) => match self.position(after) {
                            Some(i) => i + 1,
                            None => {
                                tracing::debug!(anchor = ?after, "Insert anchor missing, appending");
                                self.items.len()
                            }
                        },
                    };
                    self.items.insert(index, item);
                }
                Change::Remove { key, fallback_focus } => {
                    if let Some(index) = self.position(&key) {
                        self.items.remove(index);
                    }
                    if self.focus.as_ref() == Some(&key) {
                        self.focus = fallback_focus;
                    }
                }
            }
        }
    }
}

impl<'a, T: Keyed> IntoIterator for &'a KeyedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
