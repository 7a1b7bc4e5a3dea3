//! Graphviz dump of a network, for interactive debugging.
//!
//! Grounded on the original `Program::GraphNetwork(filename)` debug hook
//! (see `SPEC_FULL.md` §15): a quick way to eyeball the compiled graph
//! without attaching a debugger.

use std::fmt::Write as _;

use crate::network::Network;

impl Network {
    /// Renders the network as a Graphviz `digraph`.
    ///
    /// Each node is labeled with its debug name and id; an edge is drawn
    /// from a source node to a consuming node's input, labeled with the
    /// input name.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph network {{");
        let _ = writeln!(out, "  rankdir=LR;");
        for id in self.node_ids() {
            let Some(node) = self.get(id) else { continue };
            let _ = writeln!(
                out,
                "  n{} [label=\"{} ({})\"];",
                id.raw(),
                escape(&node.debug_name()),
                id
            );
            for input_name in node.connected_input_names() {
                let Some(sources) = node.input_sources(&input_name) else {
                    continue;
                };
                for source in sources {
                    let _ = writeln!(
                        out,
                        "  n{} -> n{} [label=\"{}\"];",
                        source.node.raw(),
                        id.raw(),
                        escape(&input_name)
                    );
                }
            }
        }
        let _ = writeln!(out, "}}");
        out
    }
}

fn escape(s: &str) -> String {
    s.replace('"', "\\\"")
}
