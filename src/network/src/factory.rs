//! The seam between computation definitions and the concrete compiler.
//!
//! `sc-scene`'s `ComputationDefinition::create_node` needs to mint network
//! nodes and, for computations that read the current time, obtain the
//! singleton time input node — without depending on `sc-compile`'s
//! `Program`, which would make the workspace's dependency graph circular
//! (`sc-compile` already depends on `sc-scene` to walk computation
//! definitions). `NodeFactoryContext` is the abstract boundary: `sc-scene`
//! depends only on this trait, and `Program` is its sole implementation.

use std::any::Any;
use std::sync::Arc;

use sc_repr::Journal;

use crate::node::{Node, NodeId};

/// What a computation definition needs from the compiler while building
/// its node during an `OutputProviding` or `InputRecompilation` task.
///
/// Many `OutputProviding` tasks run concurrently (§5), so every method
/// here takes `&self`: implementations must reach their own interior
/// mutability, the way `Network` already does via its `DashMap`.
pub trait NodeFactoryContext: Send + Sync {
    /// Creates a new node in the network owned by this context.
    ///
    /// `journal` is passed through so implementations that must record
    /// "this node was created in response to edits at these paths" (for
    /// uncompilation bookkeeping) can do so; this crate's own `Network`
    /// does not need it.
    fn create_node(
        &self,
        journal: &Journal,
        debug_name: String,
        declared_inputs: Vec<String>,
        payload: Box<dyn Any + Send + Sync>,
    ) -> Arc<Node>;

    /// Returns the id of the process-wide singleton node supplying the
    /// current time, creating it on first use.
    fn time_input_node(&self) -> NodeId;
}
