//! Transitive-edge subgraph using petgraph::DiGraph, for cycle diagnostics

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use crate::edges::EdgeSet;
use crate::model::{DependencyKind, DocumentId};

/// The part of the dependency graph that propagates: transitive edges only.
pub struct TransitiveGraph<'a> {
    inner: DiGraph<&'a DocumentId, DependencyKind>,
    indices: HashMap<&'a DocumentId, NodeIndex>,
}

impl std::fmt::Debug for TransitiveGraph<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitiveGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl<'a> TransitiveGraph<'a> {
    pub fn from_edges(edges: &'a EdgeSet) -> Self {
        let mut graph = TransitiveGraph {
            inner: DiGraph::new(),
            indices: HashMap::new(),
        };
        for item in edges.iter().filter(|item| item.transitive) {
            let from = graph.node(&item.from);
            let to = graph.node(&item.to);
            graph.inner.add_edge(from, to, item.kind);
        }
        graph
    }

    fn node(&mut self, doc: &'a DocumentId) -> NodeIndex {
        if let Some(&idx) = self.indices.get(doc) {
            return idx;
        }
        let idx = self.inner.add_node(doc);
        self.indices.insert(doc, idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Documents reachable from `start` through transitive edges, `start` included.
    pub fn reachable(&self, start: &DocumentId) -> HashSet<&'a DocumentId> {
        let mut reached = HashSet::new();
        let Some(&idx) = self.indices.get(start) else {
            return reached;
        };
        let mut dfs = Dfs::new(&self.inner, idx);
        while let Some(next) = dfs.next(&self.inner) {
            reached.insert(self.inner[next]);
        }
        reached
    }

    /// Strongly connected components with more than one document, each sorted,
    /// ordered by their first member.
    pub fn cycles(&self) -> Vec<Vec<DocumentId>> {
        let mut cycles: Vec<Vec<DocumentId>> = tarjan_scc(&self.inner)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut docs: Vec<DocumentId> =
                    component.into_iter().map(|idx| self.inner[idx].clone()).collect();
                docs.sort();
                docs
            })
            .collect();
        cycles.sort();
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DependencyItem;

    fn edge(from: &str, to: &str, transitive: bool) -> DependencyItem {
        DependencyItem::new(
            DocumentId::main(from),
            DocumentId::main(to),
            DependencyKind::Include,
            transitive,
        )
    }

    #[test]
    fn test_only_transitive_edges_kept() {
        let edges: EdgeSet = [edge("a", "b", true), edge("b", "c", false)].into_iter().collect();
        let graph = TransitiveGraph::from_edges(&edges);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_reachable_follows_transitive_chain() {
        let edges: EdgeSet = [
            edge("a", "b", true),
            edge("b", "c", true),
            edge("c", "d", false),
        ]
        .into_iter()
        .collect();
        let graph = TransitiveGraph::from_edges(&edges);

        let reached = graph.reachable(&DocumentId::main("a"));
        assert_eq!(reached.len(), 3);
        assert!(!reached.contains(&DocumentId::main("d")));
        assert!(graph.reachable(&DocumentId::main("d")).is_empty());
    }

    #[test]
    fn test_cycles_detected() {
        let edges: EdgeSet = [
            edge("a", "b", true),
            edge("b", "a", true),
            edge("c", "d", true),
            edge("d", "c", false),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            edges.transitive_cycles(),
            vec![vec![DocumentId::main("a"), DocumentId::main("b")]]
        );
    }
}
