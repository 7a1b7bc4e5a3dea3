//! The compilation task graph (§4.6): four task kinds sharing one context.
//!
//! The specification describes tasks in terms of a reference-counted,
//! stage/respawn scheduler (§4.6 "Task stages") running inside an isolated
//! TBB task arena. Per §9 ("Coroutines / async control flow"), this is
//! realised instead with ordinary `async fn`s: a task's stages are just
//! sequential `.await` points, "publishing a subtask" is spawning (or
//! simply awaiting) another `async fn`, and "suspend until every subtask
//! finishes" is `futures::future::join_all`. The externally observable
//! contract — per-output-key single production, happens-before ordering
//! between a node's connection step and `markDone`, fan-out/fan-in over a
//! node's input keys — is unchanged; see `DESIGN.md`.

pub mod input_recompilation;
pub mod input_resolving;
pub mod leaf;
pub mod output_providing;

use tokio::sync::{Semaphore, SemaphorePermit};

use sc_network::{Network, NodeFactoryContext};
use sc_scene::{DefinitionRegistry, SceneAdapter};

use crate::cache::CompiledOutputCache;
use crate::config::CompilerConfig;
use crate::diagnostics::DiagnosticSink;
use crate::task_sync::TaskSync;
use crate::uncompile::{NodeRecompilationInfoTable, UncompilationTable};

/// Everything a compilation task needs, borrowed for the duration of one
/// `compile` call. Plain references, so `Copy`: every task function takes
/// its context by value and fans it out to subtasks without needing an
/// `Arc` wrapper.
#[derive(Clone, Copy)]
pub struct TaskContext<'a> {
    pub adapter: &'a dyn SceneAdapter,
    pub registry: &'a dyn DefinitionRegistry,
    pub network: &'a Network,
    pub cache: &'a CompiledOutputCache,
    pub task_sync: &'a TaskSync,
    pub recompile_info: &'a NodeRecompilationInfoTable,
    pub uncompilation: &'a UncompilationTable,
    pub diagnostics: &'a DiagnosticSink,
    pub node_factory: &'a dyn NodeFactoryContext,
    pub config: &'a CompilerConfig,
    /// Bounds how many top-level tasks (`Leaf`, `InputRecompilation`) this
    /// round may run at once, per [`CompilerConfig::task_arena_threads`].
    /// `None` when the config leaves the round unbounded.
    pub task_arena: Option<&'a Semaphore>,
}

/// Acquires a permit from `ctx.task_arena`, if the round has one, for the
/// lifetime of the returned guard. Every top-level task kind spawned
/// directly by `compiler::compile` (`Leaf`, `InputRecompilation`) holds one
/// of these across its body, so the round never runs more of them
/// concurrently than `CompilerConfig::task_arena_threads` allows; task
/// kinds reached only as a continuation of one of these (`OutputProviding`,
/// `InputResolving`) don't acquire their own, since they're the same
/// logical task rather than a new one entering the arena.
pub(crate) async fn enter_arena<'a>(ctx: &TaskContext<'a>) -> Option<SemaphorePermit<'a>> {
    match ctx.task_arena {
        Some(sem) => Some(sem.acquire().await.expect("task arena semaphore is never closed")),
        None => None,
    }
}
