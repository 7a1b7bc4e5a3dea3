//! Node recompilation info (§3, §9 "Arenas and indices"): a dense,
//! grow-only side table holding what is needed to recompile an input
//! after uncompilation — the provider object and the input-key vector the
//! node's definition was compiled with.

use std::sync::Arc;

use sc_ore::arena::GrowOnlyArena;
use sc_network::NodeId;
use sc_repr::InputKey;
use sc_scene::Object;

/// What is needed to rebuild one of a node's disconnected inputs without
/// re-deriving it from scratch: the provider the node's definition was
/// compiled against, and the input keys that definition declared.
#[derive(Clone)]
pub struct NodeRecompilationInfo {
    /// The provider object the node's computation definition was
    /// compiled at.
    pub provider: Object,
    /// The input keys the definition declared for that provider, in
    /// definition order.
    pub input_keys: Arc<Vec<InputKey>>,
}

/// Side table keyed densely by node index (§3).
///
/// Set exactly once per node, immediately after the node is inserted into
/// the network; cleared on node deletion. Backed by
/// [`GrowOnlyArena`], so concurrent appenders for distinct nodes never
/// race on construction.
#[derive(Default)]
pub struct NodeRecompilationInfoTable {
    arena: GrowOnlyArena<NodeRecompilationInfo>,
}

impl NodeRecompilationInfoTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records recompilation info for `node`. Must be called at most once
    /// per node, before the node becomes reachable from any other node's
    /// input (§3 invariant 3).
    pub fn set(&self, node: NodeId, info: NodeRecompilationInfo) {
        self.arena.set(node.raw() as usize, info);
    }

    /// Returns the recompilation info for `node`, if it still exists.
    pub fn get(&self, node: NodeId) -> Option<NodeRecompilationInfo> {
        self.arena.get(node.raw() as usize)
    }

    /// Clears the entry for `node`, on node deletion.
    pub fn clear(&self, node: NodeId) {
        self.arena.clear(node.raw() as usize);
    }
}
