//! Test utilities for docdeps

use crate::model::{DependencyItem, DependencyKind, DocumentId};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A main-origin document.
pub fn doc(path: &str) -> DocumentId {
    DocumentId::main(path)
}

pub fn edge(from: &str, to: &str, kind: DependencyKind, transitive: bool) -> DependencyItem {
    DependencyItem::new(doc(from), doc(to), kind, transitive)
}

/// A small documentation site: a landing page that includes a shared snippet,
/// which itself pulls in a template, plus a localized copy of the landing page.
pub const SITE_MANIFEST: &str = r#"{
    "originals": [
        { "copy": { "path": "fr/index.md" }, "original": { "path": "index.md" } }
    ],
    "edges": [
        { "from": { "path": "index.md" }, "to": { "path": "snippets/intro.md" }, "kind": "include", "transitive": true },
        { "from": { "path": "fr/index.md" }, "to": { "path": "index.md" }, "kind": "link" },
        { "from": { "path": "fr/index.md" }, "to": { "path": "guide.md" }, "kind": "link" },
        { "from": { "path": "snippets/intro.md" }, "to": { "path": "templates/note.tmpl" }, "kind": "template", "transitive": true },
        { "from": { "path": "guide.md" }, "to": { "path": "index.md" }, "kind": "link" },
        { "from": { "path": "guide.md" }, "to": { "path": "guide.md" }, "kind": "link" },
        { "from": { "path": "old.md", "origin": "fallback" }, "to": { "path": "guide.md" }, "kind": "redirect" }
    ]
}"#;

/// Write `contents` to `name` inside a fresh temporary directory.
pub fn write_temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_temp_file() {
        let (_dir, path) = write_temp_file("manifest.json", SITE_MANIFEST);
        assert!(path.exists());
    }
}
