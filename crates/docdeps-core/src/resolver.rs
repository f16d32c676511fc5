//! Canonical document resolution

use crate::model::DocumentId;
use dashmap::DashMap;

/// Maps a duplicated or localized copy to the document it was copied from.
///
/// Implementations must be pure: the same input always resolves the same way
/// for the duration of a build.
pub trait CanonicalResolver: Send + Sync {
    /// The original of `doc`, or `None` when `doc` is already canonical.
    fn resolve_original(&self, doc: &DocumentId) -> Option<DocumentId>;

    /// `doc`'s original, or `doc` itself.
    fn canonical(&self, doc: &DocumentId) -> DocumentId {
        self.resolve_original(doc).unwrap_or_else(|| doc.clone())
    }
}

/// Treats every document as canonical.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolution;

impl CanonicalResolver for NoResolution {
    fn resolve_original(&self, _doc: &DocumentId) -> Option<DocumentId> {
        None
    }
}

impl<F> CanonicalResolver for F
where
    F: Fn(&DocumentId) -> Option<DocumentId> + Send + Sync,
{
    fn resolve_original(&self, doc: &DocumentId) -> Option<DocumentId> {
        self(doc)
    }
}

/// Copy → original lookup table. Thread-safe for concurrent registration.
#[derive(Debug, Default)]
pub struct OriginalTable {
    originals: DashMap<DocumentId, DocumentId>,
}

impl OriginalTable {
    pub fn new() -> Self {
        OriginalTable {
            originals: DashMap::new(),
        }
    }

    /// Register `copy` as a duplicate of `original`.
    ///
    /// Registering a document as its own copy is ignored.
    pub fn insert(&self, copy: DocumentId, original: DocumentId) {
        if copy == original {
            return;
        }
        self.originals.insert(copy, original);
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}

impl FromIterator<(DocumentId, DocumentId)> for OriginalTable {
    fn from_iter<I: IntoIterator<Item = (DocumentId, DocumentId)>>(iter: I) -> Self {
        let table = OriginalTable::new();
        for (copy, original) in iter {
            table.insert(copy, original);
        }
        table
    }
}

impl CanonicalResolver for OriginalTable {
    fn resolve_original(&self, doc: &DocumentId) -> Option<DocumentId> {
        self.originals.get(doc).map(|r| r.value().clone())
    }
}
