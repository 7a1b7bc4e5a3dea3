//! The compiled-output cache (§3, §4.4): a concurrent, at-most-one-write
//! map from output-key identity to masked output.

use dashmap::DashMap;
use sc_network::{MaskedOutput, NodeId};
use sc_scene::OutputKeyIdentity;

/// Concurrent insert/find by [`OutputKeyIdentity`].
///
/// An entry holding `Some(maskedOutput)` is a normal memo; an entry
/// holding `None` is a valid memo too, meaning "already determined to
/// have no output" (e.g. a leaf that resolved to zero sources) — it is
/// distinct from the key being entirely absent, which means "not computed
/// yet" (§4.4).
#[derive(Default)]
pub struct CompiledOutputCache {
    forward: DashMap<OutputKeyIdentity, Option<MaskedOutput>>,
    reverse: DashMap<NodeId, Vec<OutputKeyIdentity>>,
}

impl CompiledOutputCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `key`. The outer `Option` is "is there a memo at all";
    /// the inner one is the (possibly null) masked output.
    pub fn get(&self, key: &OutputKeyIdentity) -> Option<Option<MaskedOutput>> {
        self.forward.get(key).map(|v| v.clone())
    }

    /// Inserts `value` for `key` if and only if no entry exists yet.
    ///
    /// Returns `true` if this call won the race and installed `value`;
    /// `false` if another task had already written an entry (the caller
    /// should re-read via [`CompiledOutputCache::get`] to observe the
    /// winner — first-writer-wins, §4.6 "Ordering and tie-breaks").
    pub fn insert_if_absent(&self, key: OutputKeyIdentity, value: Option<MaskedOutput>) -> bool {
        use dashmap::mapref::entry::Entry;
        match self.forward.entry(key.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                if let Some(masked) = &value {
                    self.reverse.entry(masked.node).or_default().push(key);
                }
                entry.insert(value);
                true
            }
        }
    }

    /// Removes every forward entry whose masked output belongs to
    /// `node_id`, plus the reverse-index entry, per §4.4's `eraseByNodeId`.
    ///
    /// Single-threaded: called only by the uncompiler, which never runs
    /// concurrently with compilation (§5).
    pub fn erase_by_node_id(&self, node_id: NodeId) {
        if let Some((_, identities)) = self.reverse.remove(&node_id) {
            for identity in identities {
                self.forward.remove(&identity);
            }
        }
    }

    /// The number of distinct output keys currently memoized, mostly for
    /// tests.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns `true` if the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_repr::{DefinitionId, Mask, ScenePath};

    fn identity(path: &str, def: u64) -> OutputKeyIdentity {
        OutputKeyIdentity::new(ScenePath::new(path).unwrap(), DefinitionId::from_raw(def))
    }

    #[test]
    fn second_insert_for_same_key_loses() {
        let cache = CompiledOutputCache::new();
        let key = identity("/A", 0);
        let node = sc_network::Network::new().create_node("n", vec![], Box::new(())).id();
        let won = cache.insert_if_absent(
            key.clone(),
            Some(MaskedOutput {
                node,
                mask: Mask::All,
            }),
        );
        assert!(won);
        let lost = cache.insert_if_absent(key, None);
        assert!(!lost);
    }

    #[test]
    fn erase_by_node_id_removes_only_that_nodes_entries() {
        let cache = CompiledOutputCache::new();
        let network = sc_network::Network::new();
        let node_a = network.create_node("a", vec![], Box::new(())).id();
        let node_b = network.create_node("b", vec![], Box::new(())).id();

        let key_a = identity("/A", 0);
        let key_b = identity("/B", 1);
        cache.insert_if_absent(
            key_a.clone(),
            Some(MaskedOutput {
                node: node_a,
                mask: Mask::All,
            }),
        );
        cache.insert_if_absent(
            key_b.clone(),
            Some(MaskedOutput {
                node: node_b,
                mask: Mask::All,
            }),
        );

        cache.erase_by_node_id(node_a);
        assert!(cache.get(&key_a).is_none());
        assert!(cache.get(&key_b).is_some());
    }
}
