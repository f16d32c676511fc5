//! Core data structures for the document dependency graph

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// A document owned by the repository being built.
    #[default]
    Main,
    /// A copy pulled in from a fallback repository. Never an edge source.
    Fallback,
    /// A document from a dependency repository.
    Dependency,
    /// A document produced during the build.
    Generated,
}

/// Identity of a source document: its path plus its origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId {
    pub path: PathBuf,
    #[serde(default)]
    pub origin: Origin,
}

impl DocumentId {
    pub fn new(path: impl Into<PathBuf>, origin: Origin) -> Self {
        DocumentId {
            path: path.into(),
            origin,
        }
    }

    /// A document with [`Origin::Main`].
    pub fn main(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Origin::Main)
    }

    /// A document with [`Origin::Fallback`].
    pub fn fallback(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Origin::Fallback)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == Origin::Fallback
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Origin::Main => write!(f, "{}", self.path.display()),
            origin => write!(f, "{} ({:?})", self.path.display(), origin),
        }
    }
}

/// What kind of relationship a dependency edge represents.
///
/// The graph carries this tag through unchanged; it never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    // ── Content composition ─────────────────────────────────
    Include,
    Template,
    Metadata,

    // ── References ──────────────────────────────────────────
    Link,
    Uid,
    Redirect,

    // ── Binary assets ───────────────────────────────────────
    Resource,
}

/// A directed dependency edge between two documents.
///
/// Two items are the same edge when all four fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyItem {
    pub from: DocumentId,
    pub to: DocumentId,
    pub kind: DependencyKind,
    /// Whether the destination's own dependencies fold into the source's closure.
    pub transitive: bool,
}

impl DependencyItem {
    pub fn new(from: DocumentId, to: DocumentId, kind: DependencyKind, transitive: bool) -> Self {
        DependencyItem {
            from,
            to,
            kind,
            transitive,
        }
    }

    /// The same hop re-attributed to another source document.
    pub fn with_source(&self, from: &DocumentId) -> Self {
        DependencyItem {
            from: from.clone(),
            to: self.to.clone(),
            kind: self.kind,
            transitive: self.transitive,
        }
    }
}

impl fmt::Display for DependencyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.transitive { "=>" } else { "->" };
        write!(f, "{} {} {} [{:?}]", self.from, arrow, self.to, self.kind)
    }
}
