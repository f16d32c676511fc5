//! Concurrent accumulation of raw dependency edges
//!
//! Build workers report edges here while documents are processed. Each edge is
//! filtered and canonicalized before it is stored; filtered edges are dropped
//! silently. Once every worker is done, the accumulator is frozen into an
//! [`EdgeSet`] and handed to the closure builder.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashSet;
use serde::Serialize;
use tracing::{debug, trace};

use crate::edges::EdgeSet;
use crate::error::Error;
use crate::model::{DependencyItem, DependencyKind, DocumentId};
use crate::resolver::CanonicalResolver;

/// Write-coordination gate shared between the accumulator and any reader of
/// build state elsewhere in the pipeline.
///
/// Every insertion holds the write side; readers holding the read side never
/// observe a half-applied insertion.
#[derive(Debug, Clone, Default)]
pub struct WriteGate {
    lock: Arc<RwLock<()>>,
}

impl WriteGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ()> {
        // The lock guards no data, so a poisoned gate is still usable.
        self.lock.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Why an edge was dropped instead of recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The edge had no destination.
    MissingTarget,
    /// Source and destination were the same document.
    SelfReference,
    /// The source was a fallback copy.
    FallbackSource,
    /// Both ends resolved to the same original document.
    SameOriginal,
}

/// Recording counters, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    /// Edges stored for the first time.
    pub recorded: usize,
    /// Accepted edges that were already stored.
    pub duplicates: usize,
    pub missing_target: usize,
    pub self_reference: usize,
    pub fallback_source: usize,
    pub same_original: usize,
}

impl RecordStats {
    pub fn rejected(&self) -> usize {
        self.missing_target + self.self_reference + self.fallback_source + self.same_original
    }
}

#[derive(Debug, Default)]
struct Counters {
    recorded: AtomicUsize,
    duplicates: AtomicUsize,
    missing_target: AtomicUsize,
    self_reference: AtomicUsize,
    fallback_source: AtomicUsize,
    same_original: AtomicUsize,
}

impl Counters {
    fn reject(&self, reason: Rejection) {
        let counter = match reason {
            Rejection::MissingTarget => &self.missing_target,
            Rejection::SelfReference => &self.self_reference,
            Rejection::FallbackSource => &self.fallback_source,
            Rejection::SameOriginal => &self.same_original,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> RecordStats {
        RecordStats {
            recorded: self.recorded.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            missing_target: self.missing_target.load(Ordering::Relaxed),
            self_reference: self.self_reference.load(Ordering::Relaxed),
            fallback_source: self.fallback_source.load(Ordering::Relaxed),
            same_original: self.same_original.load(Ordering::Relaxed),
        }
    }
}

/// A freeze attempt made while other handles to the accumulator were alive.
///
/// Carries the caller's handle back so nothing recorded is lost; retry once
/// the producers have dropped theirs.
#[derive(Debug, thiserror::Error)]
#[error("cannot freeze dependency accumulator: {handles} other handle(s) still alive")]
pub struct FreezeError {
    handles: usize,
    accumulator: Arc<EdgeAccumulator>,
}

impl FreezeError {
    /// Other handles alive at the time of the attempt.
    pub fn handles(&self) -> usize {
        self.handles
    }

    pub fn into_accumulator(self) -> Arc<EdgeAccumulator> {
        self.accumulator
    }
}

impl From<FreezeError> for Error {
    fn from(err: FreezeError) -> Self {
        Error::WritersActive {
            handles: err.handles,
        }
    }
}

/// Thread-safe, write-only store of dependency edges for one build run.
pub struct EdgeAccumulator {
    edges: DashSet<DependencyItem>,
    resolver: Arc<dyn CanonicalResolver>,
    gate: WriteGate,
    counters: Counters,
}

impl fmt::Debug for EdgeAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeAccumulator")
            .field("edge_count", &self.edges.len())
            .field("stats", &self.counters.snapshot())
            .finish()
    }
}

impl EdgeAccumulator {
    pub fn new(resolver: impl CanonicalResolver + 'static) -> Self {
        Self::with_gate(resolver, WriteGate::new())
    }

    /// Create an accumulator that serializes insertions through an existing gate.
    pub fn with_gate(resolver: impl CanonicalResolver + 'static, gate: WriteGate) -> Self {
        EdgeAccumulator {
            edges: DashSet::new(),
            resolver: Arc::new(resolver),
            gate,
            counters: Counters::default(),
        }
    }

    pub fn gate(&self) -> &WriteGate {
        &self.gate
    }

    /// Record that `from` depends on `to`.
    ///
    /// Edges without a destination, self edges, edges from fallback copies and
    /// edges between two copies of the same original are dropped. Otherwise
    /// both ends are replaced by their canonical originals and the edge is
    /// stored.
    pub fn record_edge(
        &self,
        from: DocumentId,
        to: Option<DocumentId>,
        kind: DependencyKind,
        transitive: bool,
    ) {
        match self.admit(from, to, kind, transitive) {
            Ok(item) => {
                trace!(%item, "recording dependency");
                let inserted = {
                    let _guard = self.gate.write();
                    self.edges.insert(item)
                };
                if inserted {
                    self.counters.recorded.fetch_add(1, Ordering::Relaxed);
                } else {
                    self.counters.duplicates.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(reason) => self.counters.reject(reason),
        }
    }

    /// Record a non-transitive dependency.
    pub fn record_dependency(&self, from: DocumentId, to: DocumentId, kind: DependencyKind) {
        self.record_edge(from, Some(to), kind, false);
    }

    fn admit(
        &self,
        from: DocumentId,
        to: Option<DocumentId>,
        kind: DependencyKind,
        transitive: bool,
    ) -> std::result::Result<DependencyItem, Rejection> {
        let Some(to) = to else {
            trace!(%from, ?kind, "dropping dependency without target");
            return Err(Rejection::MissingTarget);
        };
        if from == to {
            trace!(%from, ?kind, "dropping self dependency");
            return Err(Rejection::SelfReference);
        }
        if from.is_fallback() {
            trace!(%from, %to, ?kind, "dropping dependency from fallback document");
            return Err(Rejection::FallbackSource);
        }

        let from = self.resolver.canonical(&from);
        let to = self.resolver.canonical(&to);
        if from == to {
            trace!(original = %from, ?kind, "dropping dependency between copies of one document");
            return Err(Rejection::SameOriginal);
        }

        Ok(DependencyItem::new(from, to, kind, transitive))
    }

    /// Number of distinct edges stored so far.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn stats(&self) -> RecordStats {
        self.counters.snapshot()
    }

    /// A consistent, sorted copy of the edges recorded so far.
    pub fn snapshot(&self) -> Vec<DependencyItem> {
        let mut items: Vec<DependencyItem> = {
            let _guard = self.gate.read();
            self.edges.iter().map(|r| r.key().clone()).collect()
        };
        items.sort();
        items
    }

    /// End the write phase and hand the edges over for flattening.
    pub fn freeze(self) -> EdgeSet {
        let stats = self.counters.snapshot();
        debug!(
            edges = self.edges.len(),
            duplicates = stats.duplicates,
            rejected = stats.rejected(),
            "freezing dependency accumulator"
        );
        self.edges.into_iter().collect()
    }

    /// Freeze a shared accumulator.
    ///
    /// Fails with a [`FreezeError`] holding the handle while any other handle
    /// is alive, since a producer could still be recording.
    pub fn try_freeze(this: Arc<Self>) -> std::result::Result<EdgeSet, FreezeError> {
        Arc::try_unwrap(this)
            .map(Self::freeze)
            .map_err(|accumulator| FreezeError {
                handles: Arc::strong_count(&accumulator) - 1,
                accumulator,
            })
    }
}
