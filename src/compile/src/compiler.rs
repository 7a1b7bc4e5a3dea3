//! The top-level compile entry point (§6 "Request surface"): a batch of
//! value keys in, a masked output (or `None`) per key out, plus whatever
//! diagnostics the round produced.

use sc_network::MaskedOutput;
use sc_scene::{DefinitionRegistry, Object, SceneAdapter};

use crate::config::CompilerConfig;
use crate::diagnostics::CompilationDiagnostic;
use crate::diagnostics::DiagnosticSink;
use crate::program::Program;
use crate::task::input_recompilation::recompile_input;
use crate::task::leaf::compile_leaf;
use crate::task::TaskContext;

/// One requested `(provider, computation)` pair.
pub type ValueKey = (Object, String);

/// Compiles `value_keys` against `program`, `adapter` and `registry`.
///
/// Asserts (`debug_assert!`) that no other round is already in flight on
/// `program` — two overlapping `compile` calls on the same `Program` would
/// violate §5's "network mutated only by compilation tasks and the
/// uncompiler, and these two do not overlap in time" invariant from the
/// other direction (two compilation rounds overlapping each other is
/// likewise disallowed by this core, which processes one round at a
/// time).
pub async fn compile(
    program: &Program,
    adapter: &dyn SceneAdapter,
    registry: &dyn DefinitionRegistry,
    config: &CompilerConfig,
    value_keys: &[ValueKey],
) -> (Vec<Option<MaskedOutput>>, Vec<CompilationDiagnostic>) {
    let round_started = program.begin_round();
    debug_assert!(round_started, "compile rounds on one Program must not overlap");

    let task_sync = program.new_round_task_sync();
    let diagnostics = DiagnosticSink::with_capacity(config.diagnostics_capacity_hint);
    let task_arena = config.task_arena_threads.map(tokio::sync::Semaphore::new);
    let ctx = TaskContext {
        adapter,
        registry,
        network: program.network(),
        cache: program.cache(),
        task_sync: &task_sync,
        recompile_info: program.recompile_info(),
        uncompilation: program.uncompilation(),
        diagnostics: &diagnostics,
        node_factory: program,
        config,
        task_arena: task_arena.as_ref(),
    };

    // §4.7's closing paragraph: inputs the uncompiler disconnected since
    // the last round re-enter the task graph here, before this round's own
    // requests are compiled, so a leaf that happens to resolve through a
    // just-recompiled node sees it already reconnected.
    let pending_recompilations = program.take_pending_recompilations();
    if !pending_recompilations.is_empty() {
        let recompile_futures = pending_recompilations
            .into_iter()
            .map(|target| recompile_input(ctx, target));
        futures::future::join_all(recompile_futures).await;
    }

    let futures = value_keys
        .iter()
        .enumerate()
        .map(|(index, (provider, computation_name))| compile_leaf(ctx, provider, computation_name, index));
    let results = futures::future::join_all(futures).await;

    if round_started {
        program.end_round();
    }
    (results, diagnostics.drain())
}
