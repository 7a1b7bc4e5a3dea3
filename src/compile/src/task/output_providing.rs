//! The OutputProviding task (§4.6): compiles one claimed output key into a
//! network node.

use std::sync::Arc;

use futures::future::BoxFuture;
use sc_network::MaskedOutput;
use sc_repr::{EditReason, Journal};
use sc_scene::OutputKey;

use crate::diagnostics::CompilationDiagnostic;
use crate::uncompile::{add_rules_for_input, InputTarget, NodeRecompilationInfo};

use super::input_resolving::resolve_input_key;
use super::TaskContext;

/// Compiles `output_key`, returning the masked output produced (`None` if
/// the definition's node factory could not be satisfied).
///
/// The caller must already hold this key's `Claimed` task-sync outcome;
/// this function is responsible for eventually calling `mark_done`.
pub async fn compile_output_providing(ctx: TaskContext<'_>, output_key: OutputKey) -> Option<MaskedOutput> {
    let identity = output_key.identity();

    // Stage A: record that this node depends on the provider's existence,
    // ask the definition for its inputs, and fan out an InputResolving
    // subtask per input key.
    let mut node_journal = Journal::new();
    node_journal.add(output_key.provider.path().clone(), EditReason::RESYNCED_OBJECT);
    let input_keys = output_key
        .definition
        .input_keys(&output_key.provider, &mut node_journal);

    let provider = output_key.provider.clone();
    let input_futures: Vec<BoxFuture<'_, (Vec<Option<MaskedOutput>>, Journal)>> = input_keys
        .iter()
        .map(|input_key| {
            let provider = provider.clone();
            Box::pin(async move {
                let mut input_journal = Journal::new();
                let sources = resolve_input_key(ctx, &provider, input_key, &mut input_journal).await;
                (sources, input_journal)
            }) as BoxFuture<'_, (Vec<Option<MaskedOutput>>, Journal)>
        })
        .collect();
    let resolved = futures::future::join_all(input_futures).await;

    // Stage B: build the node, connect its inputs in definition order, and
    // publish the result.
    //
    // Uncompilation rules for the node's own construction journal are not
    // added here: that is `NodeFactoryContext::create_node`'s job (it owns
    // the journal the node was actually built from). A definition whose
    // factory returns a pre-existing node instead of creating one - the
    // built-in time computation, wired to the program's singleton time
    // node - must not gain a rule tying that shared node's lifetime to
    // this particular provider's resync.
    let node = output_key
        .definition
        .create_node(&output_key.provider, &node_journal, ctx.node_factory);
    if let Some(handle) = ctx.network.get(node) {
        handle.set_debug_name(format!("{}@{}", output_key.definition.computation_name(), output_key.provider.path()));
    }
    ctx.recompile_info.set(
        node,
        NodeRecompilationInfo {
            provider: output_key.provider.clone(),
            input_keys: Arc::new(input_keys.clone()),
        },
    );

    for (input_key, (slot_values, input_journal)) in input_keys.iter().zip(resolved.into_iter()) {
        let sources: Vec<MaskedOutput> = slot_values.into_iter().flatten().collect();
        if sources.is_empty() {
            if !input_key.optional {
                ctx.diagnostics.push(CompilationDiagnostic::RequiredInputUnfilled {
                    provider: output_key.provider.path().clone(),
                    input_name: input_key.input_name.clone(),
                });
            }
        } else if let Err(_err) = ctx.network.connect(node, &input_key.input_name, &sources) {
            ctx.diagnostics.push(CompilationDiagnostic::ConnectionToNonExistentInput {
                provider: output_key.provider.path().clone(),
                input_name: input_key.input_name.clone(),
            });
        }
        let target = InputTarget::new(node, input_key.input_name.clone());
        add_rules_for_input(ctx.uncompilation, &target, &input_journal);
    }

    let masked = MaskedOutput::all(node);
    ctx.cache.insert_if_absent(identity.clone(), Some(masked.clone()));
    ctx.task_sync.mark_done(&identity);
    Some(masked)
}
