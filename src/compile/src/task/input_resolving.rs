//! The InputResolving task (§4.6): resolves one input key to its source
//! masked outputs, producing an `OutputProviding` subtask for any output
//! key nobody else is already producing.

use futures::future::BoxFuture;
use sc_network::MaskedOutput;
use sc_repr::{InputKey, Journal};
use sc_scene::Object;

use crate::resolve::resolve_input;
use crate::task_sync::ClaimOutcome;

use super::output_providing::compile_output_providing;
use super::TaskContext;

/// Resolves `input_key` relative to `origin`, returning one slot per
/// output key the resolver produced.
///
/// Stage A: consult the resolver, then for each output key either copy an
/// existing cache memo, claim production, or wait on the task already
/// producing it. Stage B (the re-consult after waiting, and the "null
/// outputs only for optional inputs" check) is the caller's
/// responsibility, since it differs between the leaf, OutputProviding and
/// InputRecompilation callers (§4.6).
pub async fn resolve_input_key(
    ctx: TaskContext<'_>,
    origin: &Object,
    input_key: &InputKey,
    journal: &mut Journal,
) -> Vec<Option<MaskedOutput>> {
    let output_keys = resolve_input(ctx.adapter, ctx.registry, origin, input_key, journal, ctx.diagnostics);

    let mut results: Vec<Option<MaskedOutput>> = vec![None; output_keys.len()];
    let mut pending: Vec<(usize, BoxFuture<'_, Option<MaskedOutput>>)> = Vec::new();

    for (idx, output_key) in output_keys.into_iter().enumerate() {
        let identity = output_key.identity();
        if let Some(memo) = ctx.cache.get(&identity) {
            results[idx] = memo;
            continue;
        }
        match ctx.task_sync.claim(identity.clone()) {
            ClaimOutcome::Done => {
                results[idx] = ctx.cache.get(&identity).flatten();
            }
            ClaimOutcome::Claimed => {
                pending.push((
                    idx,
                    Box::pin(async move { compile_output_providing(ctx, output_key).await }),
                ));
            }
            ClaimOutcome::Wait(handle) => {
                let cache = ctx.cache;
                pending.push((
                    idx,
                    Box::pin(async move {
                        handle.wait().await;
                        cache.get(&identity).flatten()
                    }),
                ));
            }
        }
    }

    if !pending.is_empty() {
        let (indices, futures): (Vec<usize>, Vec<_>) = pending.into_iter().unzip();
        let resolved = futures::future::join_all(futures).await;
        for (idx, value) in indices.into_iter().zip(resolved) {
            results[idx] = value;
        }
    }

    results
}
