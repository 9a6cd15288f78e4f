//! petgraph export and recursion detection.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use depscan_core::errors::CallGraphError;
use depscan_core::types::FxHashMap;

use super::table::MethodTable;

impl MethodTable {
    /// Directed graph of resolved calls. Nodes are method names in sorted
    /// order; calls to unknown names are left out.
    pub fn to_graph(&self) -> Result<DiGraph<String, ()>, CallGraphError> {
        let defs = self.snapshot()?;
        let mut graph = DiGraph::with_capacity(defs.len(), 0);
        let mut index: FxHashMap<&str, NodeIndex> = FxHashMap::default();
        for def in &defs {
            index.insert(def.name.as_str(), graph.add_node(def.name.clone()));
        }
        for def in &defs {
            let from = index[def.name.as_str()];
            for callee in &def.dependencies {
                if let Some(&to) = index.get(callee.as_str()) {
                    graph.add_edge(from, to, ());
                }
            }
        }
        Ok(graph)
    }

    /// Groups of mutually recursive methods, plus methods that call
    /// themselves through a one-element cycle. Each group is sorted, and
    /// groups are sorted by their first member.
    pub fn find_cycles(&self) -> Result<Vec<Vec<String>>, CallGraphError> {
        let graph = self.to_graph()?;
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut names: Vec<String> = scc.iter().map(|&n| graph[n].clone()).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        Ok(cycles)
    }
}
