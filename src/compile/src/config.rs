//! Compiler configuration.

/// Tunables for a [`crate::program::Program`] / [`crate::compiler::compile`]
/// instance.
///
/// There is deliberately no "strict mode" or feature flag here: the core's
/// error-handling taxonomy (§7) is fixed by the specification, not
/// configurable per embedder.
#[derive(Clone, Debug)]
pub struct CompilerConfig {
    /// Bounds how many top-level compilation tasks (`Leaf`,
    /// `InputRecompilation`) a single `compile` round runs concurrently,
    /// mirroring the isolated task arena of §5: a round backed by a small
    /// arena can't flood the ambient Tokio runtime with compilation work
    /// regardless of how large the request batch is. Enforced with a
    /// `tokio::sync::Semaphore` sized to this value and held for the
    /// duration of each such task (`task::enter_arena`), not a dedicated
    /// runtime or OS thread pool — this core doesn't own the runtime it
    /// compiles on, so "isolated task arena" is realised as a concurrency
    /// bound rather than a literal separate thread pool. `None` leaves the
    /// round unbounded.
    pub task_arena_threads: Option<usize>,
    /// Prefix used when building a leaf node's debug name (§4.6 Stage B),
    /// so embedders can distinguish multiple `Program`s in shared logs.
    pub leaf_debug_name_prefix: String,
    /// A hint for how many diagnostics a single `compile` call is expected
    /// to produce, used to pre-size the diagnostic sink's buffer.
    pub diagnostics_capacity_hint: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            task_arena_threads: None,
            leaf_debug_name_prefix: "leaf".to_string(),
            diagnostics_capacity_hint: 16,
        }
    }
}
