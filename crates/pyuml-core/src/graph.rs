//! Inheritance graph wrapper using petgraph::DiGraph keyed by class name

use crate::model::InheritanceEdge;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Directed graph of `child -> parent` edges.
///
/// Only used for diagnostics. The emitted diagram never depends on it.
pub struct InheritanceGraph {
    inner: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for InheritanceGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InheritanceGraph")
            .field("class_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl InheritanceGraph {
    pub fn new() -> Self {
        InheritanceGraph {
            inner: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a InheritanceEdge>,
    {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(name) {
            return *idx;
        }
        let idx = self.inner.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn add_edge(&mut self, edge: &InheritanceEdge) {
        let child = self.node(&edge.child);
        let parent = self.node(&edge.parent);
        self.inner.add_edge(child, parent, ());
    }

    pub fn class_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Every inheritance cycle, self-inheritance included.
    ///
    /// Each cycle lists its class names sorted, and cycles are sorted by
    /// their first name.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.inner)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || self.inner.contains_edge(component[0], component[0])
            })
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .map(|idx| self.inner[idx].clone())
                    .collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }
}

impl Default for InheritanceGraph {
    fn default() -> Self {
        Self::new()
    }
}
