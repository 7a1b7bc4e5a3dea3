//! The uncompilation table (§4.7): a scene-path-keyed index of rule sets,
//! supporting both point lookup (a single path changed) and recursive
//! extraction (a whole subtree was resynced).

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use sc_repr::ScenePath;

use super::rule_set::UncompilationRuleSet;

/// Maps scene paths to the rule sets recorded against them.
///
/// Backed by a `BTreeMap` so paths are kept in sorted order, which is the
/// natural shape for the recursive-resync case (a subtree's paths are
/// contiguous once ordered lexicographically by component). The actual
/// subtree extraction still verifies each candidate with
/// [`ScenePath::is_prefix_of`] rather than relying on that ordering alone,
/// since sibling names that share a string prefix (`/A` and `/AB`) are not
/// guaranteed to bound a contiguous range.
#[derive(Default)]
pub struct UncompilationTable {
    paths: RwLock<BTreeMap<ScenePath, Arc<UncompilationRuleSet>>>,
}

impl UncompilationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rule set for `path`, creating an empty one if absent.
    pub fn rule_set_for(&self, path: &ScenePath) -> Arc<UncompilationRuleSet> {
        if let Some(existing) = self.paths.read().get(path) {
            return Arc::clone(existing);
        }
        let mut paths = self.paths.write();
        Arc::clone(
            paths
                .entry(path.clone())
                .or_insert_with(|| Arc::new(UncompilationRuleSet::new())),
        )
    }

    /// Returns the rule set for `path`, or `None` if nothing was ever
    /// recorded against it.
    pub fn find(&self, path: &ScenePath) -> Option<Arc<UncompilationRuleSet>> {
        self.paths.read().get(path).cloned()
    }

    /// Removes and returns every `(path, rule set)` pair whose path is
    /// `prefix` itself or lies beneath it, for recursive resync.
    ///
    /// Empty rule sets left behind by earlier point lookups are pruned.
    pub fn extract_prefixed(&self, prefix: &ScenePath) -> Vec<(ScenePath, Arc<UncompilationRuleSet>)> {
        let mut paths = self.paths.write();
        let matching: Vec<ScenePath> = paths
            .keys()
            .filter(|path| prefix.is_prefix_of(path))
            .cloned()
            .collect();
        matching
            .into_iter()
            .map(|path| {
                let rules = paths.remove(&path).expect("collected from this map");
                (path, rules)
            })
            .collect()
    }

    /// Drops `path`'s entry if its rule set is now empty, keeping the
    /// table from accumulating dead entries for paths whose rules were
    /// all consumed by point lookups rather than a prefix extraction.
    pub fn prune_if_empty(&self, path: &ScenePath) {
        let mut paths = self.paths.write();
        if paths.get(path).is_some_and(|rules| rules.is_empty()) {
            paths.remove(path);
        }
    }

    pub fn len(&self) -> usize {
        self.paths.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uncompile::target::UncompilationTarget;
    use crate::uncompile::rule_set::UncompilationRule;
    use sc_network::Network;
    use sc_repr::EditReason;

    fn path(s: &str) -> ScenePath {
        ScenePath::new(s).unwrap()
    }

    fn rule() -> UncompilationRule {
        let network = Network::new();
        let node = network.create_node("n", vec![], Box::new(())).id();
        UncompilationRule {
            target: UncompilationTarget::Node(node),
            reasons: EditReason::RESYNCED_OBJECT,
        }
    }

    #[test]
    fn extract_prefixed_collects_descendants_but_not_prefix_sharing_siblings() {
        let table = UncompilationTable::new();
        table.rule_set_for(&path("/Root")).push(rule());
        table.rule_set_for(&path("/Root/Child")).push(rule());
        table.rule_set_for(&path("/RootSibling")).push(rule());

        let extracted = table.extract_prefixed(&path("/Root"));
        let extracted_paths: Vec<_> = extracted.iter().map(|(p, _)| p.as_str().to_string()).collect();
        assert_eq!(extracted_paths.len(), 2);
        assert!(extracted_paths.contains(&"/Root".to_string()));
        assert!(extracted_paths.contains(&"/Root/Child".to_string()));
        assert!(table.find(&path("/RootSibling")).is_some());
        assert!(table.find(&path("/Root")).is_none());
    }

    #[test]
    fn prune_if_empty_removes_drained_entries() {
        let table = UncompilationTable::new();
        let rule_set = table.rule_set_for(&path("/Root"));
        let r = rule();
        rule_set.push(r);
        rule_set.take_all();
        table.prune_if_empty(&path("/Root"));
        assert!(table.is_empty());
    }
}
