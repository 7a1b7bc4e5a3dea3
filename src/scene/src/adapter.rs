//! The read-only, journaling view over the composed scene that the
//! compilation core consumes but never owns (§1, §6).

use std::collections::HashSet;
use std::sync::Arc;

use sc_repr::{EditReason, Journal, ScenePath};

use crate::object::{Prim, Relationship};

/// The scene adapter contract.
///
/// Every method that could influence a compilation decision accepts a
/// `&mut Journal` and records the minimal `(path, reason)` entries that
/// would invalidate the result (§4.1). Implementations must be thread-safe:
/// many compilation tasks read the same adapter concurrently.
pub trait SceneAdapter: Send + Sync {
    /// The scene's pseudo-root, the ancestor of every other prim.
    fn pseudo_root(&self) -> Arc<dyn Prim>;

    /// Resolves `path` to a prim, journaling `(path, ResyncedObject)`.
    fn get_prim(&self, path: &ScenePath, journal: &mut Journal) -> Option<Arc<dyn Prim>>;

    /// Resolves `path` to an attribute, journaling the owning prim's
    /// property list.
    fn get_attribute(
        &self,
        path: &ScenePath,
        journal: &mut Journal,
    ) -> Option<Arc<dyn crate::object::Attribute>>;

    /// Resolves `path` to a relationship, journaling the owning prim's
    /// property list.
    fn get_relationship(&self, path: &ScenePath, journal: &mut Journal) -> Option<Arc<dyn Relationship>>;

    /// Follows relationship forwarding (§3): if a target names another
    /// relationship, its targets are substituted in, transitively, with
    /// cycle detection via a visited-path set.
    ///
    /// Returns each reachable non-relationship target exactly once, in
    /// the order first discovered.
    fn forwarded_targets(&self, relationship: &Arc<dyn Relationship>, journal: &mut Journal) -> Vec<ScenePath> {
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        let mut seen_outputs = HashSet::new();
        let mut stack = vec![Arc::clone(relationship)];
        while let Some(rel) = stack.pop() {
            if !visited.insert(rel.path().clone()) {
                continue;
            }
            for target in rel.target_paths(journal) {
                match self.get_relationship(&target, journal) {
                    Some(forwarded) => stack.push(forwarded),
                    None => {
                        if seen_outputs.insert(target.clone()) {
                            out.push(target);
                        }
                    }
                }
            }
        }
        out
    }
}

/// Journals the minimal entry for "reading this prim's parent".
pub fn journal_parent_read(journal: &mut Journal, prim_path: &ScenePath) {
    journal.add(prim_path.clone(), EditReason::RESYNCED_OBJECT);
}

/// Journals the minimal entry for "checking whether this object still
/// exists".
pub fn journal_existence_read(journal: &mut Journal, path: &ScenePath) {
    journal.add(path.clone(), EditReason::RESYNCED_OBJECT);
}

/// Journals the minimal entry for "reading this prim's property list"
/// (attribute/relationship lookup by name).
pub fn journal_property_list_read(journal: &mut Journal, prim_path: &ScenePath) {
    journal.add(prim_path.clone(), EditReason::CHANGED_PROPERTY_LIST);
}

/// Journals the minimal entry for "reading this relationship's targets".
pub fn journal_target_read(journal: &mut Journal, relationship_path: &ScenePath) {
    journal.add(
        relationship_path.clone(),
        EditReason::RESYNCED_OBJECT | EditReason::CHANGED_TARGET_PATHS,
    );
}
