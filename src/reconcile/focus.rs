//! Focus adjacency policy.
//!
//! After a removal, focus moves to a visually adjacent item: the previous
//! sibling if there is one, otherwise the next. Navigation helpers stop at
//! the ends of the sequence instead of wrapping.

/// Key to focus after removing `removed` from `ordered`.
///
/// `ordered` is the sequence *before* the removal. Returns `None` when the
/// removed key was the only one, or is not in the sequence.
pub fn pick_fallback_focus<K: PartialEq + Clone>(removed: &K, ordered: &[K]) -> Option<K> {
    let index = ordered.iter().position(|k| k == removed)?;
    if index > 0 {
        return Some(ordered[index - 1].clone());
    }
    ordered.get(index + 1).cloned()
}

/// Key after `current`, or `None` at the end or if `current` is absent.
pub fn next_key<K: PartialEq + Clone>(current: &K, ordered: &[K]) -> Option<K> {
    let index = ordered.iter().position(|k| k == current)?;
    ordered.get(index + 1).cloned()
}

/// Key before `current`, or `None` at the start or if `current` is absent.
pub fn previous_key<K: PartialEq + Clone>(current: &K, ordered: &[K]) -> Option<K> {
    let index = ordered.iter().position(|k| k == current)?;
    index.checked_sub(1).map(|i| ordered[i].clone())
}
