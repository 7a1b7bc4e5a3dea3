//! Journals: per-compilation-step records of which scene paths, under which
//! edit reasons, would invalidate the result of a scene read.

use std::collections::hash_map::Iter;
use std::collections::HashMap;

use crate::edit_reason::EditReason;
use crate::path::ScenePath;

/// An append-biased map from [`ScenePath`] to the [`EditReason`]s that
/// would invalidate whatever was computed using that path.
///
/// Every scene-adapter accessor that could influence a compilation decision
/// takes an optional `&mut Journal` and records the minimal `(path,
/// reason)` entry sufficient to invalidate the caller under the kinds of
/// scene change that could perturb the result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Journal {
    entries: HashMap<ScenePath, EditReason>,
}

impl Journal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `reason` at `path` should invalidate whatever this
    /// journal is tracking.
    ///
    /// `path` must be absolute and non-empty; `add` on the pseudo-root is
    /// valid (the root is itself an absolute, non-empty path). Adding a
    /// relative or otherwise invalid path is a programmer error and the
    /// call is dropped, matching §4.1.
    pub fn add(&mut self, path: ScenePath, reason: EditReason) {
        if reason.is_empty() {
            return;
        }
        self.entries
            .entry(path)
            .and_modify(|existing| *existing |= reason)
            .or_insert(reason);
    }

    /// Unions `other`'s entries into `self`, entry-wise.
    ///
    /// Commutative and idempotent per key: merging the same journal into
    /// itself, or merging `a` into `b` and `b` into `a`, yields the same
    /// resulting entries for shared paths.
    pub fn merge(&mut self, other: &Journal) {
        for (path, reason) in &other.entries {
            self.add(path.clone(), *reason);
        }
    }

    /// Returns the recorded reason for `path`, or `None` if this journal
    /// has no entry for it.
    pub fn get(&self, path: &ScenePath) -> Option<EditReason> {
        self.entries.get(path).copied()
    }

    /// Returns `true` if this journal has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of distinct paths recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(path, reason)` entries in unspecified order.
    pub fn iter(&self) -> Iter<'_, ScenePath, EditReason> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Journal {
    type Item = (&'a ScenePath, &'a EditReason);
    type IntoIter = Iter<'a, ScenePath, EditReason>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
