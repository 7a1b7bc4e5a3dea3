//! Network nodes.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use sc_ore::id::IdGenerator;

use crate::masked_output::MaskedOutput;

/// A node's unique, never-reused (for its lifetime) identity.
///
/// A `NodeId` is only reused once its node has been deleted *and* no
/// uncompilation target still references it (§3 invariant 1); this crate
/// never reuses a `NodeId` at all, since ids are minted from a
/// process-lifetime monotonic counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        NodeId(raw)
    }

    /// Returns the raw numeric value, for debug names and logging.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NEXT_NODE_ID: IdGenerator = IdGenerator::new();

pub(crate) fn next_node_id() -> NodeId {
    NodeId(NEXT_NODE_ID.next_id())
}

/// A single named input connector: the set of masked outputs currently
/// feeding that input.
#[derive(Default)]
pub struct InputConnector {
    pub(crate) sources: Vec<MaskedOutput>,
}

impl InputConnector {
    /// Returns the masked outputs currently connected to this input, in
    /// the order they were connected.
    pub fn sources(&self) -> &[MaskedOutput] {
        &self.sources
    }
}

/// A node in the compiled dataflow network.
///
/// Nodes are opaque to the compilation core: the `payload` is whatever the
/// computation definition's node factory constructed (an attribute value
/// query, a marker type for the leaf/time nodes, etc.) and is only ever
/// downcast by the evaluation engine, which is out of scope here.
pub struct Node {
    id: NodeId,
    debug_name: RwLock<String>,
    declared_inputs: Vec<String>,
    inputs: DashMap<String, InputConnector>,
    payload: Box<dyn Any + Send + Sync>,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        debug_name: String,
        declared_inputs: Vec<String>,
        payload: Box<dyn Any + Send + Sync>,
    ) -> Arc<Node> {
        Arc::new(Node {
            id,
            debug_name: RwLock::new(debug_name),
            declared_inputs,
            inputs: DashMap::new(),
            payload,
        })
    }

    /// This node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// This node's current debug name.
    pub fn debug_name(&self) -> String {
        self.debug_name.read().clone()
    }

    /// Overwrites this node's debug name.
    ///
    /// Used by the `OutputProviding` compilation task, which only knows
    /// the output key identity (and hence a meaningful debug name) after
    /// the node has already been constructed (§4.6 Stage B).
    pub fn set_debug_name(&self, name: String) {
        *self.debug_name.write() = name;
    }

    /// The input names this node was constructed with. Connecting to any
    /// other name fails with [`crate::NetworkError::UnknownInput`].
    pub fn declared_inputs(&self) -> &[String] {
        &self.declared_inputs
    }

    /// Returns `true` if `name` is one of this node's declared inputs.
    pub fn has_input(&self, name: &str) -> bool {
        self.declared_inputs.iter().any(|n| n == name)
    }

    /// Returns the current sources feeding the named input, if the input
    /// exists and has at least one connection.
    pub fn input_sources(&self, name: &str) -> Option<Vec<MaskedOutput>> {
        self.inputs.get(name).map(|c| c.sources.clone())
    }

    /// Returns the names of inputs that currently have at least one
    /// incoming connection.
    pub fn connected_input_names(&self) -> Vec<String> {
        self.inputs.iter().map(|e| e.key().clone()).collect()
    }

    /// Downcasts this node's opaque payload to `T`.
    pub fn payload<T: 'static>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    pub(crate) fn connect(&self, input_name: &str, sources: &[MaskedOutput]) {
        let mut entry = self.inputs.entry(input_name.to_string()).or_default();
        entry.sources.extend_from_slice(sources);
    }

    pub(crate) fn disconnect(&self, input_name: &str) {
        self.inputs.remove(input_name);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("debug_name", &self.debug_name.read())
            .field("declared_inputs", &self.declared_inputs)
            .finish_non_exhaustive()
    }
}
