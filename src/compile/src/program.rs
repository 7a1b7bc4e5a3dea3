//! The Program (§4.8): the one object per execution system that serialises
//! network mutation and owns every piece of compiled/uncompiled state.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use sc_network::{Network, NodeFactoryContext, NodeId};
use sc_repr::Journal;

use crate::cache::CompiledOutputCache;
use crate::task_sync::TaskSync;
use crate::uncompile::{InputTarget, NodeRecompilationInfoTable, UncompilationTable};

/// Owns the compiled network and every index kept alongside it.
///
/// All node construction goes through [`Program::create_node`] (forwarded
/// by computation definitions via the [`NodeFactoryContext`] impl below);
/// all input connection goes through [`Program::connect`]. Both record
/// uncompilation rules from the journal they are given, so nothing a
/// compilation task builds can outlive the scene condition it was built
/// from (§4.8).
pub struct Program {
    network: Network,
    cache: CompiledOutputCache,
    uncompilation: UncompilationTable,
    recompile_info: NodeRecompilationInfoTable,
    time_node: OnceCell<NodeId>,
    compiling: AtomicBool,
    pending_recompilations: Mutex<Vec<InputTarget>>,
}

impl Default for Program {
    fn default() -> Self {
        Program {
            network: Network::new(),
            cache: CompiledOutputCache::new(),
            uncompilation: UncompilationTable::new(),
            recompile_info: NodeRecompilationInfoTable::new(),
            time_node: OnceCell::new(),
            compiling: AtomicBool::new(false),
            pending_recompilations: Mutex::new(Vec::new()),
        }
    }
}

impl Program {
    /// Creates an empty program: no nodes, no compiled output, an
    /// as-yet-unrealised time singleton.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn cache(&self) -> &CompiledOutputCache {
        &self.cache
    }

    pub fn uncompilation(&self) -> &UncompilationTable {
        &self.uncompilation
    }

    pub fn recompile_info(&self) -> &NodeRecompilationInfoTable {
        &self.recompile_info
    }

    /// Applies a scene change: the entry point hosts call on a scene
    /// notification, in place of calling `uncompile::uncompile_change`
    /// directly. Tears down whatever the uncompilation table has recorded
    /// for `path`/`reasons` exactly as that free function does, then
    /// queues the inputs it disconnects for an `InputRecompilation` task
    /// each at the start of the next `compile` round (§4.7's closing
    /// paragraph: disconnected inputs "re-enter the task graph on the next
    /// request").
    pub fn uncompile(&self, path: &sc_repr::ScenePath, reasons: sc_repr::EditReason) -> Vec<InputTarget> {
        let disconnected = crate::uncompile::uncompile_change(
            &self.uncompilation,
            &self.network,
            &self.cache,
            &self.recompile_info,
            path,
            reasons,
        );
        if !disconnected.is_empty() {
            self.pending_recompilations.lock().extend(disconnected.iter().cloned());
        }
        disconnected
    }

    /// Queues `targets` — typically the `Vec<InputTarget>` returned by
    /// `uncompile::uncompile_change` when called directly rather than
    /// through [`Program::uncompile`] — for an `InputRecompilation` task
    /// each at the start of the next `compile` round.
    pub fn queue_recompilations(&self, targets: Vec<InputTarget>) {
        if targets.is_empty() {
            return;
        }
        self.pending_recompilations.lock().extend(targets);
    }

    /// Drains every input queued since the last call. Called once at the
    /// start of `compiler::compile`.
    pub fn take_pending_recompilations(&self) -> Vec<InputTarget> {
        std::mem::take(&mut *self.pending_recompilations.lock())
    }

    /// Creates a fresh [`TaskSync`] for one compilation round. A round's
    /// task-sync state never persists past the round that created it
    /// (§4.5 doc comment on `TaskSync`).
    pub fn new_round_task_sync(&self) -> TaskSync {
        TaskSync::new()
    }

    /// `true` while a compilation round is in flight.
    ///
    /// Purely a debug-assertion aid (§5's "no compilation task executes
    /// concurrently with any uncompilation"): `sc_compile::compiler::compile`
    /// flips this around the round, and uncompilation entry points assert
    /// it is `false` before mutating the network.
    pub fn is_compiling(&self) -> bool {
        self.compiling.load(Ordering::Acquire)
    }

    /// Marks a compilation round as starting. Returns `false` (and does
    /// not flip the flag) if a round was already in flight, which would
    /// be a programmer error: this core never overlaps compilation with
    /// itself across concurrent `compile` calls on one `Program`.
    pub fn begin_round(&self) -> bool {
        self.compiling
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Marks the in-flight compilation round as finished.
    pub fn end_round(&self) {
        self.compiling.store(false, Ordering::Release);
    }
}

impl NodeFactoryContext for Program {
    fn create_node(
        &self,
        journal: &Journal,
        debug_name: String,
        declared_inputs: Vec<String>,
        payload: Box<dyn Any + Send + Sync>,
    ) -> Arc<sc_network::Node> {
        let node = self.network.create_node(debug_name, declared_inputs, payload);
        crate::uncompile::add_rules_for_node(&self.uncompilation, node.id(), journal);
        node
    }

    fn time_input_node(&self) -> NodeId {
        *self.time_node.get_or_init(|| {
            self.network
                .create_node("time", Vec::new(), Box::new(()))
                .id()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_input_node_is_a_stable_singleton() {
        let program = Program::new();
        let first = program.time_input_node();
        let second = program.time_input_node();
        assert_eq!(first, second);
        assert_eq!(program.network().node_count(), 1);
    }

    #[test]
    fn create_node_records_uncompilation_rules_from_the_journal() {
        let program = Program::new();
        let mut journal = Journal::new();
        journal.add(
            sc_repr::ScenePath::new("/A").unwrap(),
            sc_repr::EditReason::RESYNCED_OBJECT,
        );
        let node = program.create_node(&journal, "n".to_string(), Vec::new(), Box::new(()));
        assert!(program
            .uncompilation()
            .find(&sc_repr::ScenePath::new("/A").unwrap())
            .is_some());
        assert!(program.network().contains(node.id()));
    }

    #[test]
    fn queued_recompilations_drain_exactly_once() {
        let program = Program::new();
        let node = program.network().create_node("n", vec!["time".to_string()], Box::new(())).id();
        let target = InputTarget::new(node, "time");

        assert!(program.take_pending_recompilations().is_empty());

        program.queue_recompilations(vec![target.clone()]);
        let drained = program.take_pending_recompilations();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].node(), node);
        assert!(program.take_pending_recompilations().is_empty());
    }

    #[test]
    fn uncompile_queues_the_inputs_it_disconnects() {
        let program = Program::new();
        let node = program
            .network()
            .create_node("n", vec!["time".to_string()], Box::new(()))
            .id();
        let path = sc_repr::ScenePath::new("/A").unwrap();

        let target = InputTarget::new(node, "time");
        program.network().connect(
            node,
            "time",
            &[sc_network::MaskedOutput::all(program.time_input_node())],
        ).unwrap();
        crate::uncompile::add_rules_for_input(
            program.uncompilation(),
            &target,
            &{
                let mut journal = Journal::new();
                journal.add(path.clone(), sc_repr::EditReason::CHANGED_TARGET_PATHS);
                journal
            },
        );

        let disconnected = program.uncompile(&path, sc_repr::EditReason::CHANGED_TARGET_PATHS);
        assert_eq!(disconnected.len(), 1);
        assert_eq!(disconnected[0].node(), node);

        let drained = program.take_pending_recompilations();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].node(), node);
    }
}
