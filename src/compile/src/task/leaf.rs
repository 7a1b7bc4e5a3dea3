//! The Leaf task (§4.6): one per requested `(provider, computation)` value
//! key.

use sc_network::MaskedOutput;
use sc_repr::{InputKey, Journal};
use sc_scene::Object;

use crate::diagnostics::CompilationDiagnostic;
use crate::uncompile::add_rules_for_node;

use super::input_resolving::resolve_input_key;
use super::{enter_arena, TaskContext};

/// The sole declared input of every leaf node: the single resolved source
/// the requested value key compiled to.
pub(crate) const LEAF_SOURCE_INPUT: &str = "source";

/// Compiles the requested `(provider, computation_name)` value key.
///
/// Unlike an `OutputProviding` node, a leaf node is not memoized in the
/// compiled-output cache (it has no `DefinitionId`, only a position in the
/// caller's request batch) — a fresh leaf node is created for every
/// `compile` call. It is still registered against the uncompilation table
/// so that, if the scene conditions behind its single source change
/// before the caller issues its next request, the stale node is torn down
/// rather than left dangling (see `DESIGN.md`).
///
/// The leaf node itself is never what's handed back to the caller: it
/// exists only as a durable sink that keeps the resolved source output
/// connected (and therefore alive and tracked) for as long as the request
/// lives. The masked output returned here is the *source's*, so repeat
/// requests for the same already-compiled output — the builtin time
/// input chief among them — resolve to the same node every time, with a
/// fresh leaf sink wrapped around it on each call.
pub async fn compile_leaf(
    ctx: TaskContext<'_>,
    provider: &Object,
    computation_name: &str,
    leaf_index: usize,
) -> Option<MaskedOutput> {
    let _permit = enter_arena(&ctx).await;

    let input_key = InputKey::leaf(LEAF_SOURCE_INPUT, computation_name.to_string());

    let mut journal = Journal::new();
    let sources = resolve_input_key(ctx, provider, &input_key, &mut journal).await;
    let resolved: Vec<MaskedOutput> = sources.into_iter().flatten().collect();

    match resolved.len() {
        1 => {
            let source = resolved.into_iter().next().unwrap();
            let debug_name = format!(
                "{}#{leaf_index}@{}",
                ctx.config.leaf_debug_name_prefix,
                provider.path()
            );
            let node = ctx.network.create_node(
                debug_name,
                vec![LEAF_SOURCE_INPUT.to_string()],
                Box::new(()),
            );
            if ctx
                .network
                .connect(node.id(), LEAF_SOURCE_INPUT, &[source.clone()])
                .is_err()
            {
                ctx.diagnostics.push(CompilationDiagnostic::ConnectionToNonExistentInput {
                    provider: provider.path().clone(),
                    input_name: LEAF_SOURCE_INPUT.to_string(),
                });
                return None;
            }
            add_rules_for_node(ctx.uncompilation, node.id(), &journal);
            Some(source)
        }
        0 => {
            ctx.diagnostics.push(CompilationDiagnostic::LeafResolvedToZeroSources(
                provider.path().clone(),
            ));
            None
        }
        _ => {
            ctx.diagnostics
                .push(CompilationDiagnostic::LeafResolvedToMultipleSources(
                    provider.path().clone(),
                ));
            None
        }
    }
}
