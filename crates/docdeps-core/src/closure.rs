//! Flattening of recorded edges into per-document dependency closures
//!
//! For every source document the builder walks its edges depth first. Every
//! edge met on the way is re-attributed to the source document, keeping the
//! destination, kind and transitive flag of that hop. Only transitive edges
//! are expanded further. Sources are processed one after another, and an
//! already finished source met as a transitive destination donates its closure
//! instead of being walked again.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::edges::EdgeSet;
use crate::map::DependencyMap;
use crate::model::{DependencyItem, DocumentId};

/// Order in which source documents are flattened.
///
/// Only affects how many closures are reused, never the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrder {
    #[default]
    Sorted,
    Reverse,
}

/// Counters collected while flattening.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClosureStats {
    /// Documents with at least one outgoing edge.
    pub sources: usize,
    pub input_edges: usize,
    /// Edges across all flattened sets.
    pub output_edges: usize,
    /// Times a finished closure was copied instead of walked.
    pub reused_closures: usize,
    /// Times a destination's edges were pushed for expansion.
    pub expanded_nodes: usize,
}

/// Computes the dependency map for a frozen edge set.
#[derive(Debug, Clone, Copy)]
pub struct ClosureBuilder<'a> {
    edges: &'a EdgeSet,
}

impl<'a> ClosureBuilder<'a> {
    pub fn new(edges: &'a EdgeSet) -> Self {
        ClosureBuilder { edges }
    }

    /// Flatten every source in sorted order.
    pub fn build(&self) -> DependencyMap {
        self.build_with_stats(SourceOrder::Sorted).0
    }

    pub fn build_with_stats(&self, order: SourceOrder) -> (DependencyMap, ClosureStats) {
        let mut sources = self.edges.sources();
        if order == SourceOrder::Reverse {
            sources.reverse();
        }
        self.flatten(sources)
    }

    /// Flatten sources in the given order.
    ///
    /// Documents that are not sources are skipped; sources missing from
    /// `order` are flattened afterwards in sorted order.
    pub fn build_ordered<'o, I>(&self, order: I) -> DependencyMap
    where
        I: IntoIterator<Item = &'o DocumentId>,
    {
        self.build_ordered_with_stats(order).0
    }

    pub fn build_ordered_with_stats<'o, I>(&self, order: I) -> (DependencyMap, ClosureStats)
    where
        I: IntoIterator<Item = &'o DocumentId>,
    {
        let sources = self.edges.sources();
        let known: HashSet<&DocumentId> = sources.iter().copied().collect();

        let mut seen: HashSet<&DocumentId> = HashSet::with_capacity(sources.len());
        let mut ordered: Vec<&'a DocumentId> = Vec::with_capacity(sources.len());
        for doc in order {
            // Re-borrow from the edge set so the order list can be dropped early.
            if let Some(&source) = known.get(doc) {
                if seen.insert(source) {
                    ordered.push(source);
                }
            }
        }
        for source in sources {
            if seen.insert(source) {
                ordered.push(source);
            }
        }

        self.flatten(ordered)
    }

    fn flatten(&self, order: Vec<&'a DocumentId>) -> (DependencyMap, ClosureStats) {
        let adjacency = self.edges.adjacency();
        let mut finished: HashMap<DocumentId, HashSet<DependencyItem>> =
            HashMap::with_capacity(adjacency.len());
        let mut stats = ClosureStats {
            sources: adjacency.len(),
            input_edges: self.edges.len(),
            ..ClosureStats::default()
        };

        for from in order {
            let Some(direct) = adjacency.get(from) else {
                continue;
            };

            let mut result: HashSet<DependencyItem> = HashSet::new();
            let mut visited: HashSet<&DocumentId> = HashSet::from([from]);
            let mut stack: Vec<&DependencyItem> = direct.clone();
            let mut reused = 0usize;

            while let Some(current) = stack.pop() {
                result.insert(current.with_source(from));
                if !current.transitive {
                    continue;
                }

                if current.to != *from {
                    if let Some(donor) = finished.get(&current.to) {
                        result.extend(donor.iter().map(|item| item.with_source(from)));
                        reused += 1;
                        continue;
                    }
                }

                if let Some(next) = adjacency.get(&current.to) {
                    if visited.insert(&current.to) {
                        stats.expanded_nodes += 1;
                        stack.extend(next.iter().copied());
                    }
                }
            }

            debug!(
                source = %from,
                direct = direct.len(),
                flattened = result.len(),
                reused,
                "flattened dependencies"
            );
            stats.reused_closures += reused;
            stats.output_edges += result.len();
            finished.insert(from.clone(), result);
        }

        info!(
            sources = stats.sources,
            input_edges = stats.input_edges,
            output_edges = stats.output_edges,
            reused_closures = stats.reused_closures,
            "built dependency map"
        );
        (DependencyMap::from_entries(finished), stats)
    }
}
