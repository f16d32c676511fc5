//! The frozen edge set handed from the accumulator to the closure builder

use std::collections::{HashMap, HashSet};

use crate::closure::ClosureBuilder;
use crate::graph::TransitiveGraph;
use crate::map::DependencyMap;
use crate::model::{DependencyItem, DocumentId};

/// Deduplicated, read-only set of recorded dependency edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet {
    items: HashSet<DependencyItem>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyItem> {
        self.items.iter()
    }

    pub fn contains(&self, item: &DependencyItem) -> bool {
        self.items.contains(item)
    }

    /// Every document that is the source of at least one edge, sorted.
    pub fn sources(&self) -> Vec<&DocumentId> {
        let mut sources: Vec<&DocumentId> = self
            .items
            .iter()
            .map(|item| &item.from)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        sources.sort();
        sources
    }

    /// Edges grouped by source document.
    pub(crate) fn adjacency(&self) -> HashMap<&DocumentId, Vec<&DependencyItem>> {
        let mut adjacency: HashMap<&DocumentId, Vec<&DependencyItem>> = HashMap::new();
        for item in &self.items {
            adjacency.entry(&item.from).or_default().push(item);
        }
        adjacency
    }

    /// Flatten the edges into per-document dependency closures.
    pub fn build(&self) -> DependencyMap {
        ClosureBuilder::new(self).build()
    }

    /// Groups of documents that reach each other through transitive edges.
    pub fn transitive_cycles(&self) -> Vec<Vec<DocumentId>> {
        TransitiveGraph::from_edges(self).cycles()
    }
}

impl FromIterator<DependencyItem> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = DependencyItem>>(iter: I) -> Self {
        EdgeSet {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a DependencyItem;
    type IntoIter = std::collections::hash_set::Iter<'a, DependencyItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
