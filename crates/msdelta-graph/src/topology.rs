//! Structural queries over a service graph.
//!
//! Projects an [`MsGraph`] onto a petgraph `DiGraph` so that standard graph
//! algorithms (strongly connected components, neighbor walks) can run over
//! the service dependencies.

use crate::graph::MsGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

/// Service dependency graph with name lookups.
///
/// Nodes are microservice names; edge weights are request counts.
#[derive(Debug, Clone, Default)]
pub struct ServiceTopology {
    graph: DiGraph<String, usize>,
    by_name: HashMap<String, NodeIndex>,
}

impl ServiceTopology {
    /// Projects a snapshot. Link endpoints missing from the node list
    /// (filtered-out services) are added as well.
    pub fn from_graph(graph: &MsGraph) -> Self {
        let mut topology = Self::default();

        for node in &graph.nodes {
            topology.intern(&node.name);
        }
        for link in graph.links.values() {
            let from = topology.intern(&link.source);
            let to = topology.intern(&link.target);
            topology.graph.add_edge(from, to, link.requests.len());
        }

        topology
    }

    fn intern(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.by_name.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.by_name.insert(name.to_string(), idx);
        idx
    }

    pub fn service_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Services `name` sends requests to, sorted.
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Services that send requests to `name`, sorted.
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.by_name.get(name) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.graph.node_weight(n))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Groups of services that depend on each other in a cycle.
    ///
    /// Each group is sorted by name and groups are sorted by their first
    /// member, so output is stable across runs.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }
}

impl MsGraph {
    pub fn topology(&self) -> ServiceTopology {
        ServiceTopology::from_graph(self)
    }

    /// Cycles of mutually dependent services.
    pub fn dependency_cycles(&self) -> Vec<Vec<String>> {
        self.topology().cycles()
    }
}
