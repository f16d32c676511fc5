//! docdeps core — Build-time document dependency accumulation and flattening

pub mod accumulator;
pub mod closure;
pub mod config;
pub mod edges;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod map;
pub mod model;
pub mod resolver;


#[cfg(test)]
pub mod test_utils;

pub use accumulator::{EdgeAccumulator, FreezeError, RecordStats, Rejection, WriteGate};
pub use closure::{ClosureBuilder, ClosureStats, SourceOrder};
pub use config::{BuildConfig, CONFIG_FILE};
pub use edges::EdgeSet;
pub use error::{Error, Result};
pub use graph::TransitiveGraph;
pub use manifest::{BuildManifest, EdgeRecord, OriginalEntry};
pub use map::{DependencyEntry, DependencyMap};
pub use model::{DependencyItem, DependencyKind, DocumentId, Origin};
pub use resolver::{CanonicalResolver, NoResolution, OriginalTable};
