//! Data model for the compilation engine.
//!
//! This crate carries no compilation logic; it is the shared vocabulary
//! (§3 of the specification) that every other crate in the workspace
//! builds on: interned scene paths, the edit-reason bitset, journals of
//! scene reads, and the input/output key types that describe a compilation
//! request.

pub mod def_id;
pub mod edit_reason;
pub mod input_key;
pub mod journal;
pub mod mask;
pub mod path;
pub mod result_type;

pub use def_id::{DefinitionId, DefinitionIdGenerator};
pub use edit_reason::EditReason;
pub use input_key::{
    DynamicTraversal, InputKey, LocalTraversal, LocalTraversalStep, ProviderResolution,
};
pub use journal::Journal;
pub use mask::Mask;
pub use path::{PathError, ScenePath};
pub use result_type::ResultType;
