//! Call graph over decomposed functions and its deterministic order.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use crate::decompose::decomposer::DecomposedFunction;

#[derive(Debug, Clone)]
struct CallNode {
    name: String,
    depth: usize,
}

/// Edges run callee → caller, so a topological order lists dependencies first.
#[derive(Debug, Default)]
pub struct CallGraph {
    graph: DiGraph<CallNode, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl CallGraph {
    /// Only edges between decomposed functions are kept; self-calls are dropped.
    pub fn from_functions(functions: &[DecomposedFunction]) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        for function in functions {
            let idx = graph.add_node(CallNode {
                name: function.name.clone(),
                depth: function.depth,
            });
            nodes.insert(function.name.clone(), idx);
        }

        for function in functions {
            let caller = nodes[&function.name];
            for dependency in &function.dependencies {
                if dependency == &function.name {
                    continue;
                }
                if let Some(&callee) = nodes.get(dependency) {
                    graph.add_edge(callee, caller, ());
                }
            }
        }

        Self { graph, nodes }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Kahn's algorithm; among ready functions the deepest goes first, then
    /// the lexicographically smallest name. Functions left on a cycle follow
    /// in insertion order.
    pub fn dependency_order(&self) -> Vec<String> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
            .collect();

        let mut ready: BTreeSet<(Reverse<usize>, String, NodeIndex)> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx.index()] == 0)
            .map(|idx| self.ready_key(idx))
            .collect();

        let mut placed = vec![false; self.graph.node_count()];
        let mut order = Vec::with_capacity(self.graph.node_count());

        while let Some((_, name, idx)) = ready.pop_first() {
            placed[idx.index()] = true;
            order.push(name);

            for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                let degree = &mut in_degree[dependent.index()];
                *degree = degree.saturating_sub(1);
                if *degree == 0 {
                    ready.insert(self.ready_key(dependent));
                }
            }
        }

        for idx in self.graph.node_indices() {
            if !placed[idx.index()] {
                order.push(self.graph[idx].name.clone());
            }
        }

        order
    }

    fn ready_key(&self, idx: NodeIndex) -> (Reverse<usize>, String, NodeIndex) {
        let node = &self.graph[idx];
        (Reverse(node.depth), node.name.clone(), idx)
    }
}
