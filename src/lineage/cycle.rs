//! Cycle guard for re-parenting
//!
//! When an existing project (or milestone) is edited, neither it nor anything
//! below it may become its new parent. [`is_descendant_or_self`] is the
//! predicate; [`parent_candidates`] applies it to a candidate list.

use std::collections::{HashMap, HashSet, VecDeque};

use super::maps::NestedIndex;
use crate::domain::Nested;

/// True iff `candidate == ancestor`, or `ancestor` is reached walking up from `candidate`.
///
/// A repeated node stops the walk and yields `false`.
pub fn is_descendant_or_self<T: Nested>(candidate: T::Id, ancestor: T::Id, by_id: &HashMap<T::Id, &T>) -> bool {
    if candidate == ancestor {
        return true;
    }

    let mut seen = HashSet::from([candidate]);
    let mut current = by_id.get(&candidate).copied();

    while let Some(node) = current {
        let Some(parent) = node.parent_id() else {
            return false;
        };
        if parent == ancestor {
            return true;
        }
        if !seen.insert(parent) {
            tracing::debug!(?candidate, ?ancestor, "cycle detected while checking descent");
            return false;
        }
        current = by_id.get(&parent).copied();
    }
    false
}

/// True iff `candidate` sits strictly below `ancestor`
pub fn belongs_under<T: Nested>(candidate: T::Id, ancestor: T::Id, by_id: &HashMap<T::Id, &T>) -> bool {
    candidate != ancestor && is_descendant_or_self(candidate, ancestor, by_id)
}

/// Every id strictly below `root`, breadth-first
pub fn descendants_of<T: Nested>(root: T::Id, index: &NestedIndex<'_, T>) -> Vec<T::Id> {
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    let mut out = Vec::new();

    while let Some(id) = queue.pop_front() {
        for &child in index.children(id) {
            if seen.insert(child) {
                out.push(child);
                queue.push_back(child);
            }
        }
    }
    out
}

/// Drops `editing` and its descendants from `candidates`
pub fn parent_candidates<'a, T: Nested>(
    editing: T::Id,
    candidates: impl IntoIterator<Item = &'a T>,
    by_id: &HashMap<T::Id, &T>,
) -> Vec<&'a T>
where
    T: 'a,
{
    candidates
        .into_iter()
        .filter(|c| !is_descendant_or_self(c.id(), editing, by_id))
        .collect()
}
