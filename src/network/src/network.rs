//! The compiled dataflow network: owns all live nodes and their
//! connections.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tracing::trace;

use crate::masked_output::MaskedOutput;
use crate::node::{next_node_id, Node, NodeId};

/// Failure modes of network mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// `connect`/`disconnect` named a node id the network does not
    /// contain.
    #[error("node {0} does not exist in the network")]
    NodeNotFound(NodeId),
    /// `connect` named an input the node was not constructed with.
    #[error("node {node} has no input named {input:?}")]
    UnknownInput {
        /// The node that was connected to.
        node: NodeId,
        /// The input name that does not exist on that node.
        input: String,
    },
}

/// The topological structure of nodes and connections.
///
/// Per §5, the network is mutated only by compilation tasks (adding nodes
/// and connections) and the uncompiler (deleting nodes and disconnecting
/// inputs); those two never run concurrently with each other, though many
/// compilation tasks add concurrently with each other. `Network` is
/// therefore safe to share behind an `Arc` without an outer lock: all of
/// its internal collections are already individually concurrent.
#[derive(Default)]
pub struct Network {
    nodes: DashMap<NodeId, Arc<Node>>,
}

impl Network {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs and inserts a new node, returning a handle to it.
    ///
    /// `declared_inputs` fixes the set of input names `connect` will
    /// later accept for this node; `payload` is the node-kind-specific,
    /// evaluation-engine-owned state (opaque to this crate).
    pub fn create_node(
        &self,
        debug_name: impl Into<String>,
        declared_inputs: Vec<String>,
        payload: Box<dyn std::any::Any + Send + Sync>,
    ) -> Arc<Node> {
        let id = next_node_id();
        let node = Node::new(id, debug_name.into(), declared_inputs, payload);
        self.nodes.insert(id, Arc::clone(&node));
        trace!(node = %id, "created node");
        node
    }

    /// Returns a handle to the node with id `id`, if it is still present.
    pub fn get(&self, id: NodeId) -> Option<Arc<Node>> {
        self.nodes.get(&id).map(|e| Arc::clone(e.value()))
    }

    /// Returns `true` if `id` currently names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns the number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Connects `sources` to the input named `input_name` on `node_id`.
    ///
    /// `sources` is appended to any sources already connected to that
    /// input (multiple calls accumulate, matching `Program::connect`
    /// being invoked once per input key but possibly with several
    /// resolved sources).
    pub fn connect(
        &self,
        node_id: NodeId,
        input_name: &str,
        sources: &[MaskedOutput],
    ) -> Result<(), NetworkError> {
        let node = self
            .nodes
            .get(&node_id)
            .ok_or(NetworkError::NodeNotFound(node_id))?;
        if !node.has_input(input_name) {
            return Err(NetworkError::UnknownInput {
                node: node_id,
                input: input_name.to_string(),
            });
        }
        node.connect(input_name, sources);
        Ok(())
    }

    /// Disconnects all sources from the named input on `node_id`.
    pub fn disconnect(&self, node_id: NodeId, input_name: &str) -> Result<(), NetworkError> {
        let node = self
            .nodes
            .get(&node_id)
            .ok_or(NetworkError::NodeNotFound(node_id))?;
        node.disconnect(input_name);
        Ok(())
    }

    /// Removes and returns the node with id `id`, if present.
    ///
    /// The network does not itself purge compiled-output-cache entries or
    /// recompilation info referencing the deleted node; the uncompiler is
    /// responsible for that ordering (§3 invariant 2).
    pub fn delete_node(&self, id: NodeId) -> Option<Arc<Node>> {
        let removed = self.nodes.remove(&id).map(|(_, node)| node);
        if removed.is_some() {
            trace!(node = %id, "deleted node");
        }
        removed
    }

    /// Iterates over every live node id, mostly for debugging/tests.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|e| *e.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_to_unknown_input_fails() {
        let network = Network::new();
        let node = network.create_node("n0", vec!["time".into()], Box::new(()));
        let err = network
            .connect(node.id(), "bogus", &[])
            .expect_err("unknown input should fail");
        assert!(matches!(err, NetworkError::UnknownInput { .. }));
    }

    #[test]
    fn connect_accumulates_sources() {
        let network = Network::new();
        let time = network.create_node("time", vec![], Box::new(()));
        let consumer = network.create_node("consumer", vec!["time".into()], Box::new(()));
        network
            .connect(consumer.id(), "time", &[MaskedOutput::all(time.id())])
            .unwrap();
        assert_eq!(
            consumer.input_sources("time").unwrap(),
            vec![MaskedOutput::all(time.id())]
        );
    }

    #[test]
    fn delete_node_removes_it_from_the_network() {
        let network = Network::new();
        let node = network.create_node("n0", vec![], Box::new(()));
        assert!(network.contains(node.id()));
        network.delete_node(node.id());
        assert!(!network.contains(node.id()));
    }
}
