//! Workspace loading
//!
//! Walks the root with the `ignore` crate (gitignore-aware), reads every
//! document the gate accepts and fills an `AnchorIndex` keyed by root-relative
//! path, versioned by content hash. With the `parallel` feature, reading and
//! scanning run on rayon; inserting into the index stays sequential.

use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{Config, DocumentGate};
use crate::core::file_reader::read_document;
use crate::core::paths::{make_relative, normalize_path, resolve_under};
use crate::core::util::HashAlgorithm;
use crate::index::document::{DocumentId, DocumentIndex, DocumentVersion};
use crate::index::store::AnchorIndex;
use crate::markers::scan::Scanner;

/// A document read from disk
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub id: DocumentId,
    pub path: PathBuf,
    pub text: String,
    /// Non-UTF-8 bytes were replaced
    pub lossy: bool,
}

impl LoadedDocument {
    pub fn version(&self, hash: HashAlgorithm) -> DocumentVersion {
        DocumentVersion::of_text(&self.text, hash)
    }
}

/// Identity of `path` under `root`: the relative path with '/' separators
pub fn document_id(root: &Path, path: &Path) -> DocumentId {
    make_relative(path, root)
        .unwrap_or_else(|| normalize_path(path))
        .into()
}

/// Supported documents under `root`, sorted
pub fn collect_documents(root: &Path, gate: &impl DocumentGate) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true);

    let mut paths = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::debug!("walk error: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        if gate.is_supported_document(path) {
            paths.push(path.to_path_buf());
        }
    }

    paths.sort();
    paths
}

/// Read one document; `file` is resolved against `root` unless absolute
pub fn load_document(root: &Path, file: &Path, config: &Config) -> Result<LoadedDocument> {
    let full = resolve_under(root, file);
    let path = fs::canonicalize(&full)
        .with_context(|| format!("Cannot open document {}", full.display()))?;

    let read = read_document(&path, config.max_file_size);
    let Some(text) = read.content else {
        bail!(
            "Skipped {}: {}",
            path.display(),
            read.skip_reason.unwrap_or_default()
        );
    };

    if read.lossy_conversion {
        log::warn!("{}: not valid UTF-8, decoded lossily", path.display());
    }

    Ok(LoadedDocument {
        id: document_id(root, &path),
        path,
        text,
        lossy: read.lossy_conversion,
    })
}

fn build_one(root: &Path, path: &Path, config: &Config, scanner: &Scanner) -> Option<DocumentIndex> {
    let read = read_document(path, config.max_file_size);
    let text = match read.content {
        Some(text) => text,
        None => {
            log::debug!(
                "skipping {}: {}",
                path.display(),
                read.skip_reason.unwrap_or_default()
            );
            return None;
        }
    };

    let id = document_id(root, path);
    let version = DocumentVersion::of_text(&text, config.hash);
    Some(DocumentIndex::build(id, version, &text, scanner))
}

/// Index every supported document under `root`
pub fn load_index(root: &Path, config: &Config) -> Result<AnchorIndex> {
    let scanner = config.scanner().context("Invalid marker syntax")?;
    let paths = collect_documents(root, config);

    #[cfg(feature = "parallel")]
    let built: Vec<DocumentIndex> = paths
        .par_iter()
        .filter_map(|path| build_one(root, path, config, &scanner))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let built: Vec<DocumentIndex> = paths
        .iter()
        .filter_map(|path| build_one(root, path, config, &scanner))
        .collect();

    let mut index = AnchorIndex::with_scanner(scanner);
    for document in built {
        index.insert(document);
    }

    log::debug!(
        "indexed {} of {} candidate documents under {}",
        index.len(),
        paths.len(),
        root.display()
    );
    Ok(index)
}

/// Index the workspace and make sure `document` is in it, even if the walk skipped it
pub fn load_index_with(
    root: &Path,
    config: &Config,
    document: &LoadedDocument,
) -> Result<AnchorIndex> {
    let mut index = load_index(root, config)?;
    index.ensure_processed(&document.id, &document.version(config.hash), &document.text);
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn root() -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        write(temp.path(), "src/a.rs", "// [[anchor:setup|Setup]]\n");
        write(temp.path(), "src/b.rs", "// [[link:setup]]\n");
        write(temp.path(), "notes/readme.md", "[[anchor:notes]]\n");
        write(temp.path(), "image.png", "[[anchor:nope]]");
        temp
    }

    #[test]
    fn test_collect_documents_filters_by_gate() {
        let temp = root();
        let root = fs::canonicalize(temp.path()).unwrap();
        let docs: Vec<_> = collect_documents(&root, &Config::default())
            .iter()
            .map(|p| document_id(&root, p).to_string())
            .collect();
        assert_eq!(docs, vec!["notes/readme.md", "src/a.rs", "src/b.rs"]);
    }

    #[test]
    fn test_collect_documents_respects_gitignore() {
        let temp = root();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        write(temp.path(), ".gitignore", "notes/\n");

        let root = fs::canonicalize(temp.path()).unwrap();
        let docs = collect_documents(&root, &Config::default());
        assert!(docs.iter().all(|p| !p.ends_with("notes/readme.md")));
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_load_index() {
        let temp = root();
        let root = fs::canonicalize(temp.path()).unwrap();
        let index = load_index(&root, &Config::default()).unwrap();

        assert_eq!(index.len(), 3);
        let a = index.get(&DocumentId::new("src/a.rs")).unwrap();
        assert!(a.anchor("setup").is_some());
        assert!(matches!(a.version(), DocumentVersion::ContentHash(_)));
    }

    #[test]
    fn test_load_index_with_sha1_versions() {
        let temp = root();
        let root = fs::canonicalize(temp.path()).unwrap();
        let config = Config {
            hash: HashAlgorithm::Sha1,
            ..Default::default()
        };
        let index = load_index(&root, &config).unwrap();

        let a = index.get(&DocumentId::new("src/a.rs")).unwrap();
        match a.version() {
            DocumentVersion::ContentHash(hash) => assert_eq!(hash.len(), 40),
            other => panic!("unexpected version {:?}", other),
        }

        let doc = load_document(&root, Path::new("src/a.rs"), &config).unwrap();
        assert_eq!(&doc.version(config.hash), a.version());
    }

    #[test]
    fn test_load_document_relative() {
        let temp = root();
        let root = fs::canonicalize(temp.path()).unwrap();
        let doc = load_document(&root, Path::new("src/b.rs"), &Config::default()).unwrap();

        assert_eq!(doc.id.as_str(), "src/b.rs");
        assert_eq!(doc.text, "// [[link:setup]]\n");
        assert!(!doc.lossy);
    }

    #[test]
    fn test_load_document_missing() {
        let temp = root();
        let root = fs::canonicalize(temp.path()).unwrap();
        assert!(load_document(&root, Path::new("src/zzz.rs"), &Config::default()).is_err());
    }

    #[test]
    fn test_load_index_with_unlisted_document() {
        let temp = root();
        let root = fs::canonicalize(temp.path()).unwrap();
        write(&root, "script.weird", "[[link:setup]]");

        let config = Config::default();
        let doc = load_document(&root, Path::new("script.weird"), &config).unwrap();
        let index = load_index_with(&root, &config, &doc).unwrap();
        assert!(index.is_file_processed(&doc.id));
        assert_eq!(index.len(), 4);
    }
}
