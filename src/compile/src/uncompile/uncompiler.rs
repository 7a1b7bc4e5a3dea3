//! The uncompiler (§4.7): reacts to a scene-change notification by tearing
//! down whatever compiled state the change invalidates.
//!
//! Runs single-threaded, after compilation for the current round has
//! quiesced (§5 "no compilation task executes concurrently with any
//! uncompilation").

use sc_network::Network;
use sc_repr::{EditReason, ScenePath};
use tracing::debug_span;

use crate::cache::CompiledOutputCache;

use super::recompile_info::NodeRecompilationInfoTable;
use super::rule_set::{UncompilationRule, UncompilationRuleSet};
use super::table::UncompilationTable;
use super::target::{InputTarget, UncompilationTarget};

/// Tears down whatever the table has recorded for a change at `path` with
/// the given `reasons`, returning the inputs newly disconnected by this
/// call (candidates for an `InputRecompilation` task at the start of the
/// next request).
pub fn uncompile_change(
    table: &UncompilationTable,
    network: &Network,
    cache: &CompiledOutputCache,
    recompile_info: &NodeRecompilationInfoTable,
    path: &ScenePath,
    reasons: EditReason,
) -> Vec<InputTarget> {
    let _span = debug_span!("uncompile", path = %path, reasons = ?reasons).entered();
    let mut disconnected = Vec::new();

    if reasons.contains(EditReason::RESYNCED_OBJECT) {
        for (_, rule_set) in table.extract_prefixed(path) {
            process_rule_set(&rule_set, network, cache, recompile_info, reasons, true, &mut disconnected);
        }
    } else if let Some(rule_set) = table.find(path) {
        process_rule_set(&rule_set, network, cache, recompile_info, reasons, false, &mut disconnected);
        table.prune_if_empty(path);
    }

    disconnected
}

/// Step 3 of §4.7: iterate a rule set's matching rules and apply their
/// targets.
///
/// `extracted` is `true` when this rule set was pulled out whole by a
/// recursive resync: in that case a rule whose target is already invalid
/// is simply dropped (the whole set is being discarded anyway), rather
/// than needing individual erasure bookkeeping.
fn process_rule_set(
    rule_set: &UncompilationRuleSet,
    network: &Network,
    cache: &CompiledOutputCache,
    recompile_info: &NodeRecompilationInfoTable,
    reasons: EditReason,
    extracted: bool,
    disconnected: &mut Vec<InputTarget>,
) {
    let candidates = if extracted {
        rule_set.take_all()
    } else {
        rule_set.take_matching(reasons)
    };

    for rule in candidates {
        apply_rule(rule, network, cache, recompile_info, disconnected);
    }
}

fn apply_rule(
    rule: UncompilationRule,
    network: &Network,
    cache: &CompiledOutputCache,
    recompile_info: &NodeRecompilationInfoTable,
    disconnected: &mut Vec<InputTarget>,
) {
    match rule.target {
        UncompilationTarget::Node(node_id) => {
            if !network.contains(node_id) {
                return;
            }
            cache.erase_by_node_id(node_id);
            recompile_info.clear(node_id);
            let _ = network.delete_node(node_id);
        }
        UncompilationTarget::Input(input) => {
            if !input.invalidate() {
                return;
            }
            let _ = network.disconnect(input.node(), input.input_name());
            disconnected.push(input);
        }
    }
}
