//! The InputRecompilation task (§4.6): re-resolves one input the
//! uncompiler has just disconnected.

use sc_network::MaskedOutput;
use sc_repr::Journal;

use crate::diagnostics::CompilationDiagnostic;
use crate::uncompile::{add_rules_for_input, InputTarget};

use super::input_resolving::resolve_input_key;
use super::leaf::LEAF_SOURCE_INPUT;
use super::{enter_arena, TaskContext};

/// Re-resolves the input named by `target` (already disconnected by the
/// uncompiler) and reconnects it if resolution succeeds.
///
/// `target`'s valid flag has already been cleared by the uncompiler; a
/// fresh [`InputTarget`] is registered for whatever rules this
/// recompilation records, so future invalidations of the new source are
/// tracked independently of the old one.
pub async fn recompile_input(ctx: TaskContext<'_>, target: InputTarget) {
    let _permit = enter_arena(&ctx).await;

    let Some(info) = ctx.recompile_info.get(target.node()) else {
        // The node itself is gone (e.g. a NodeTarget rule fired for the
        // same change); nothing to recompile.
        return;
    };
    let Some(input_key) = info
        .input_keys
        .iter()
        .find(|key| key.input_name == target.input_name())
    else {
        ctx.diagnostics.push(CompilationDiagnostic::CodingError(format!(
            "node {} has no recorded input key named {:?}",
            target.node(),
            target.input_name()
        )));
        return;
    };

    let mut journal = Journal::new();
    let sources = resolve_input_key(ctx, &info.provider, input_key, &mut journal).await;
    let resolved: Vec<MaskedOutput> = sources.into_iter().flatten().collect();

    let is_leaf_source = target.input_name() == LEAF_SOURCE_INPUT;
    if is_leaf_source && resolved.len() != 1 {
        let diagnostic = if resolved.is_empty() {
            CompilationDiagnostic::LeafResolvedToZeroSources(info.provider.path().clone())
        } else {
            CompilationDiagnostic::LeafResolvedToMultipleSources(info.provider.path().clone())
        };
        ctx.diagnostics.push(diagnostic);
        return;
    }

    if resolved.is_empty() {
        if !input_key.optional {
            ctx.diagnostics.push(CompilationDiagnostic::RequiredInputUnfilled {
                provider: info.provider.path().clone(),
                input_name: input_key.input_name.clone(),
            });
        }
        return;
    }

    if ctx
        .network
        .connect(target.node(), &input_key.input_name, &resolved)
        .is_err()
    {
        ctx.diagnostics.push(CompilationDiagnostic::ConnectionToNonExistentInput {
            provider: info.provider.path().clone(),
            input_name: input_key.input_name.clone(),
        });
        return;
    }

    let fresh_target = InputTarget::new(target.node(), input_key.input_name.clone());
    add_rules_for_input(ctx.uncompilation, &fresh_target, &journal);
}
