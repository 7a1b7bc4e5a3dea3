//! Errors surfaced by the scene adapter contract and the definition
//! registry.

use sc_repr::ScenePath;
use thiserror::Error;

/// Failure modes a [`crate::adapter::SceneAdapter`] implementation may
/// report.
///
/// These are distinct from compilation failures (§7): a `SceneError`
/// means the adapter itself could not answer the query (the path does not
/// name a live object, or names one of the wrong kind), not that a
/// computation failed to resolve.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No live object exists at this path.
    #[error("no object at path {0}")]
    NotFound(ScenePath),
    /// The object at this path exists but is not the kind the caller
    /// asked for (e.g. `getAttribute` on a path naming a relationship).
    #[error("object at {path} is not a {expected}")]
    WrongKind {
        /// The path whose object was the wrong kind.
        path: ScenePath,
        /// The kind the caller expected (`"prim"`, `"attribute"`, ...).
        expected: &'static str,
    },
    /// A registry lookup named a builtin-prefixed computation name for
    /// registration by a non-builtin definition.
    #[error("computation name {0:?} uses the reserved builtin prefix \"__\"")]
    BuiltinPrefixAbuse(String),
    /// A registry load attempted to register two definitions for the same
    /// `(schemaConfigKey, computationName)`.
    #[error("duplicate computation definition {computation_name:?} for schema config {schema_config_key:?}")]
    DuplicateDefinition {
        /// The schema configuration key the duplicate was registered
        /// under.
        schema_config_key: String,
        /// The computation name that was already registered.
        computation_name: String,
    },
}
