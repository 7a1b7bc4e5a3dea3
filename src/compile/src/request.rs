//! Request/retention bookkeeping (§15 supplement, grounded on
//! `pxr/exec/exec/requestTracker.*`): tracks which value keys a host has
//! asked for, so that after an uncompilation round the host can be told
//! which previously-compiled results are now stale and worth
//! re-requesting.
//!
//! This does not re-run any computation — evaluation is out of scope
//! (§1) — it only reports which of a request's value keys lost their
//! producing node.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use sc_network::NodeId;
use sc_scene::Object;

/// An opaque handle identifying one registered request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// One value key within a registered request: the provider/computation
/// pair the host asked for, and the node that ended up producing it (if
/// compilation succeeded).
#[derive(Clone)]
pub struct TrackedValueKey {
    pub provider: Object,
    pub computation_name: String,
    pub node: Option<NodeId>,
}

/// Tracks outstanding requests across compilation rounds.
///
/// A `Program` does not own one of these directly — hosts that want
/// invalidation notifications construct one alongside their `Program` and
/// register each `compile` call's results with it.
#[derive(Default)]
pub struct RequestTracker {
    next_token: AtomicU64,
    requests: DashMap<RequestToken, Vec<TrackedValueKey>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a completed request's value keys, returning a token the
    /// host can later use to stop tracking it.
    pub fn register(&self, value_keys: Vec<TrackedValueKey>) -> RequestToken {
        let token = RequestToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.requests.insert(token, value_keys);
        token
    }

    /// Stops tracking `token`'s request.
    pub fn forget(&self, token: RequestToken) {
        self.requests.remove(&token);
    }

    /// Given the set of nodes deleted by an uncompilation round, returns
    /// the `(token, index)` pairs of tracked value keys whose producing
    /// node was among them — the host's cue to re-request those keys.
    pub fn invalidated_by(&self, deleted_nodes: &[NodeId]) -> Vec<(RequestToken, usize)> {
        let mut stale = Vec::new();
        for entry in self.requests.iter() {
            let token = *entry.key();
            for (index, value_key) in entry.value().iter().enumerate() {
                if value_key
                    .node
                    .is_some_and(|node| deleted_nodes.contains(&node))
                {
                    stale.push((token, index));
                }
            }
        }
        stale
    }

    /// The number of requests currently tracked, mostly for tests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_scene::memory::MemoryScene;
    use sc_scene::SceneAdapter;

    fn value_key(node: Option<NodeId>) -> TrackedValueKey {
        let scene = MemoryScene::new();
        let mut journal = sc_repr::Journal::new();
        let provider = Object::Prim(scene.pseudo_root());
        let _ = &mut journal;
        TrackedValueKey {
            provider,
            computation_name: "computeTime".to_string(),
            node,
        }
    }

    #[test]
    fn invalidated_by_reports_only_tracked_keys_whose_node_was_deleted() {
        let tracker = RequestTracker::new();
        let network = sc_network::Network::new();
        let surviving = network.create_node("a", vec![], Box::new(())).id();
        let deleted = network.create_node("b", vec![], Box::new(())).id();

        let token = tracker.register(vec![value_key(Some(surviving)), value_key(Some(deleted))]);

        let stale = tracker.invalidated_by(&[deleted]);
        assert_eq!(stale, vec![(token, 1)]);
    }

    #[test]
    fn forget_removes_a_request_from_tracking() {
        let tracker = RequestTracker::new();
        let token = tracker.register(vec![value_key(None)]);
        assert_eq!(tracker.len(), 1);
        tracker.forget(token);
        assert!(tracker.is_empty());
    }
}
