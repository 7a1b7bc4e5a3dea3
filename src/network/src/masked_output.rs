//! Masked outputs: a reference to a node's output together with a mask
//! selecting the live elements.

use sc_repr::Mask;

use crate::node::NodeId;

/// A `(nodeOutput, mask)` pair.
///
/// Nodes in this core expose a single, implicit output (§3's "output
/// connectors (each value-bearing)" collapses, for this workspace, to one
/// output per node — see `DESIGN.md` for the simplification), so a
/// `MaskedOutput` only needs to name the producing node plus the mask
/// selecting which of its elements are live on a given connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskedOutput {
    /// The node providing the value.
    pub node: NodeId,
    /// The live elements of that node's output.
    pub mask: Mask,
}

impl MaskedOutput {
    /// Builds a masked output selecting all elements of `node`'s output.
    pub fn all(node: NodeId) -> Self {
        MaskedOutput {
            node,
            mask: Mask::All,
        }
    }
}
