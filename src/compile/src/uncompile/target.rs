//! Uncompilation targets (§4.7): what a rule tears down when the scene
//! condition it guards is invalidated.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sc_network::NodeId;

/// A node input, identified by the node that owns it and the input's
/// declared name.
///
/// Several uncompilation rules — one per path the input's resolution read
/// from — can name the same input. They share one `InputTarget` (cloned,
/// not reconstructed), so that whichever rule fires first to disconnect
/// the input also flips the shared `valid` flag, and the remaining rules
/// for the same input see it already invalid without re-touching the
/// network.
#[derive(Clone)]
pub struct InputTarget {
    node: NodeId,
    input_name: Arc<str>,
    valid: Arc<AtomicBool>,
}

impl InputTarget {
    /// Creates a fresh, valid target for `node`'s `input_name` input.
    pub fn new(node: NodeId, input_name: impl Into<Arc<str>>) -> Self {
        InputTarget {
            node,
            input_name: input_name.into(),
            valid: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Returns `true` if this input has not yet been uncompiled.
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Flips the shared flag to invalid. Returns `true` if this call was
    /// the one that did it (the caller should disconnect the input);
    /// returns `false` if another rule already invalidated it.
    pub fn invalidate(&self) -> bool {
        self.valid
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// What a single uncompilation rule tears down.
#[derive(Clone)]
pub enum UncompilationTarget {
    /// The whole node: deleted from the network, its cache entries erased,
    /// its recompilation info cleared.
    Node(NodeId),
    /// One of a node's inputs: disconnected, so the node becomes a
    /// candidate for input recompilation rather than being deleted
    /// outright.
    Input(InputTarget),
}

impl UncompilationTarget {
    /// The node this target ultimately affects, for diagnostics and for
    /// deduplicating "was this node already handled" during a resync.
    pub fn node(&self) -> NodeId {
        match self {
            UncompilationTarget::Node(node) => *node,
            UncompilationTarget::Input(input) => input.node(),
        }
    }
}
