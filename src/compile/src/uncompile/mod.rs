//! Uncompilation (§4.7): rule sets keyed by scene path, applied against the
//! network when a scene change invalidates compiled state.

pub mod recompile_info;
pub mod rule_set;
pub mod table;
pub mod target;
pub mod uncompiler;

pub use recompile_info::{NodeRecompilationInfo, NodeRecompilationInfoTable};
pub use rule_set::{UncompilationRule, UncompilationRuleSet};
pub use table::UncompilationTable;
pub use target::{InputTarget, UncompilationTarget};
pub use uncompiler::uncompile_change;

use sc_repr::Journal;

/// §4.7 `AddRulesForNode`: records one rule per journal entry, all naming
/// `node` as a whole.
pub fn add_rules_for_node(table: &UncompilationTable, node: sc_network::NodeId, journal: &Journal) {
    for (path, reasons) in journal {
        table.rule_set_for(path).push(UncompilationRule {
            target: UncompilationTarget::Node(node),
            reasons: *reasons,
        });
    }
}

/// §4.7 `AddRulesForInput`: records one rule per journal entry, all naming
/// the same shared [`InputTarget`] so a single disconnect invalidates
/// every rule for that input at once.
pub fn add_rules_for_input(table: &UncompilationTable, target: &InputTarget, journal: &Journal) {
    for (path, reasons) in journal {
        table.rule_set_for(path).push(UncompilationRule {
            target: UncompilationTarget::Input(target.clone()),
            reasons: *reasons,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_network::Network;
    use sc_repr::{EditReason, ScenePath};

    #[test]
    fn add_rules_for_node_mirrors_every_journal_entry() {
        let table = UncompilationTable::new();
        let network = Network::new();
        let node = network.create_node("n", vec![], Box::new(())).id();

        let mut journal = Journal::new();
        journal.add(ScenePath::new("/A").unwrap(), EditReason::RESYNCED_OBJECT);
        journal.add(ScenePath::new("/B").unwrap(), EditReason::CHANGED_PROPERTY_LIST);
        add_rules_for_node(&table, node, &journal);

        assert_eq!(table.len(), 2);
        assert!(!table.find(&ScenePath::new("/A").unwrap()).unwrap().is_empty());
        assert!(!table.find(&ScenePath::new("/B").unwrap()).unwrap().is_empty());
    }
}
