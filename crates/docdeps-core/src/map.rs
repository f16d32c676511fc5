//! The flattened, read-only dependency map

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize, Serializer};

use crate::model::{DependencyItem, DocumentId};

/// One row of a rendered dependency map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEntry {
    pub source: DocumentId,
    /// Sorted flattened dependencies; every item's `from` is `source`.
    pub dependencies: Vec<DependencyItem>,
}

/// Document → complete set of dependencies (direct and transitive).
///
/// Built once by the closure builder and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    entries: HashMap<DocumentId, HashSet<DependencyItem>>,
}

impl DependencyMap {
    pub(crate) fn from_entries(entries: HashMap<DocumentId, HashSet<DependencyItem>>) -> Self {
        DependencyMap { entries }
    }

    pub fn get(&self, source: &DocumentId) -> Option<&HashSet<DependencyItem>> {
        self.entries.get(source)
    }

    /// Sorted dependencies of `source`; empty when it has none.
    pub fn dependencies_of(&self, source: &DocumentId) -> Vec<DependencyItem> {
        let mut items: Vec<DependencyItem> = self
            .entries
            .get(source)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        items.sort();
        items
    }

    pub fn contains(&self, item: &DependencyItem) -> bool {
        self.entries
            .get(&item.from)
            .is_some_and(|set| set.contains(item))
    }

    /// Whether `source` depends on `target` through any kind of edge.
    pub fn depends_on(&self, source: &DocumentId, target: &DocumentId) -> bool {
        self.entries
            .get(source)
            .is_some_and(|set| set.iter().any(|item| item.to == *target))
    }

    /// Sorted sources whose flattened set contains `target`.
    pub fn dependents_of(&self, target: &DocumentId) -> Vec<&DocumentId> {
        let mut dependents: Vec<&DocumentId> = self
            .iter()
            .filter(|(_, set)| set.iter().any(|item| item.to == *target))
            .map(|(source, _)| source)
            .collect();
        dependents.sort();
        dependents
    }

    /// All sources, sorted.
    pub fn sources(&self) -> Vec<&DocumentId> {
        let mut sources: Vec<&DocumentId> = self.entries.keys().collect();
        sources.sort();
        sources
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of items across every flattened set.
    pub fn total_dependencies(&self) -> usize {
        self.entries.values().map(HashSet::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &HashSet<DependencyItem>)> {
        self.entries.iter()
    }

    /// Sorted rows, for rendering.
    pub fn entries(&self) -> Vec<DependencyEntry> {
        self.sources()
            .into_iter()
            .map(|source| DependencyEntry {
                source: source.clone(),
                dependencies: self.dependencies_of(source),
            })
            .collect()
    }
}

impl Serialize for DependencyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries())
    }
}
