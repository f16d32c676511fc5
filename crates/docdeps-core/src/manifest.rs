//! JSON build manifest: the recorded output of a build's edge producers

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::accumulator::EdgeAccumulator;
use crate::error::{Error, Result};
use crate::model::{DependencyKind, DocumentId};
use crate::resolver::OriginalTable;

/// A copy and the original it was made from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalEntry {
    pub copy: DocumentId,
    pub original: DocumentId,
}

/// One reported edge, as a producer emitted it (before filtering).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: DocumentId,
    #[serde(default)]
    pub to: Option<DocumentId>,
    pub kind: DependencyKind,
    #[serde(default)]
    pub transitive: bool,
}

impl EdgeRecord {
    /// Replay this record into an accumulator.
    pub fn record_into(&self, accumulator: &EdgeAccumulator) {
        accumulator.record_edge(self.from.clone(), self.to.clone(), self.kind, self.transitive);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    #[serde(default)]
    pub originals: Vec<OriginalEntry>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl BuildManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json)
    }

    /// Canonical resolution table built from the `originals` section.
    pub fn original_table(&self) -> OriginalTable {
        self.originals
            .iter()
            .map(|entry| (entry.copy.clone(), entry.original.clone()))
            .collect()
    }

    /// Edge records grouped by reporting document, one group per build worker.
    pub fn work_units(&self) -> Vec<(&DocumentId, Vec<&EdgeRecord>)> {
        let mut units: BTreeMap<&DocumentId, Vec<&EdgeRecord>> = BTreeMap::new();
        for record in &self.edges {
            units.entry(&record.from).or_default().push(record);
        }
        units.into_iter().collect()
    }
}
