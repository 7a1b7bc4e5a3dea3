//! The diagnostic channel compilation and uncompilation failures flow
//! through, per §7: nothing here is ever returned as an `Err` from the
//! public `compile` entry point.

use parking_lot::Mutex;
use sc_repr::{EditReason, ScenePath};
use thiserror::Error;

/// A single failure recorded during compilation or uncompilation.
///
/// None of these stop compilation: the producing task publishes a null
/// masked output and the request surfaces `None` at that index (§4.6
/// "Failure semantics", §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompilationDiagnostic {
    /// No computation definition answers `computation_name` at `provider`.
    #[error("no computation definition named {computation_name:?} at {provider}")]
    NoDefinition {
        /// The provider the lookup was attempted against.
        provider: ScenePath,
        /// The computation name that was not found.
        computation_name: String,
    },
    /// An input's resolved result type does not match what the
    /// definition expects.
    #[error("result type mismatch for input {input_name:?} at {provider}")]
    ResultTypeMismatch {
        /// The provider the mismatched input belongs to.
        provider: ScenePath,
        /// The input whose resolved type did not match.
        input_name: String,
    },
    /// A leaf request's resolver produced zero sources.
    #[error("leaf request at {0} resolved to zero sources")]
    LeafResolvedToZeroSources(ScenePath),
    /// A leaf request's resolver produced more than one source.
    #[error("leaf request at {0} resolved to more than one source")]
    LeafResolvedToMultipleSources(ScenePath),
    /// A non-optional input remained unfilled after Stage B.
    #[error("required input {input_name:?} at {provider} could not be filled")]
    RequiredInputUnfilled {
        /// The provider whose input was left unfilled.
        provider: ScenePath,
        /// The name of the unfilled input.
        input_name: String,
    },
    /// `connect` named an input the node does not declare.
    #[error("connection to non-existent input {input_name:?} on node for {provider}")]
    ConnectionToNonExistentInput {
        /// The provider whose node rejected the connection.
        provider: ScenePath,
        /// The input name that does not exist.
        input_name: String,
    },
    /// An input key specified the reserved, unrealised
    /// `RelationshipTargetedObjects` dynamic traversal (§9 Open Questions).
    #[error("relationship-targeted-objects traversal is not realised by this core (origin {0})")]
    RelationshipTargetedObjectsUnsupported(ScenePath),
    /// A coding error: a node's evaluation callback, or some other
    /// programmer invariant, failed unexpectedly. Not the caller's fault.
    #[error("coding error: {0}")]
    CodingError(String),
    /// An edit reason outside the known bitset was observed and ignored.
    #[error("unknown edit reason {reason:?} at {path} ignored")]
    UnknownEditReasonIgnored {
        /// The path the unrecognized change targeted.
        path: ScenePath,
        /// The raw bits observed.
        reason: EditReason,
    },
}

/// A thread-safe sink collecting diagnostics across all tasks in one
/// compilation round.
///
/// Any compilation task may push into this concurrently; the caller of
/// `compile` drains it once the round quiesces.
#[derive(Default)]
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<CompilationDiagnostic>>,
}

impl DiagnosticSink {
    /// Creates an empty sink pre-sized to `capacity_hint` entries.
    pub fn with_capacity(capacity_hint: usize) -> Self {
        DiagnosticSink {
            diagnostics: Mutex::new(Vec::with_capacity(capacity_hint)),
        }
    }

    /// Records a diagnostic, also logging it at `warn` level.
    pub fn push(&self, diagnostic: CompilationDiagnostic) {
        tracing::warn!(%diagnostic, "compilation diagnostic");
        self.diagnostics.lock().push(diagnostic);
    }

    /// Drains and returns every diagnostic recorded so far.
    pub fn drain(&self) -> Vec<CompilationDiagnostic> {
        std::mem::take(&mut self.diagnostics.lock())
    }

    /// Returns `true` if no diagnostics have been recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.lock().is_empty()
    }
}
