//! The compiled dataflow network.
//!
//! This crate models the parts of §3's "Network node" / "Masked output"
//! that the compilation core must read and write: nodes, their named input
//! connectors, and the masked outputs those connectors hold. Node
//! *evaluation* is out of scope (owned by the external evaluation engine,
//! §1); nodes here carry an opaque payload the compilation core never
//! inspects.

pub mod dot;
pub mod factory;
pub mod masked_output;
pub mod network;
pub mod node;

pub use factory::NodeFactoryContext;
pub use masked_output::MaskedOutput;
pub use network::{Network, NetworkError};
pub use node::{Node, NodeId};
