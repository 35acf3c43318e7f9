//! Anchor index - processed documents keyed by identity
//!
//! The host owns one `AnchorIndex` for its whole lifetime and passes it to
//! whatever needs it. Entries are replaced wholesale when a document's
//! version changes; nothing is patched incrementally.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::index::document::{DocumentId, DocumentIndex, DocumentVersion};
use crate::markers::scan::Scanner;

/// Counters for cache behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Documents scanned (first scans and rescans)
    pub scans: u64,
    /// Requests served from the cache without scanning
    pub cache_hits: u64,
    /// Requests that found an older version and rescanned
    pub stale_rescans: u64,
}

#[derive(Debug, Default)]
pub struct AnchorIndex {
    scanner: Scanner,
    documents: BTreeMap<DocumentId, Arc<DocumentIndex>>,
    stats: IndexStats,
}

impl AnchorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scanner(scanner: Scanner) -> Self {
        Self {
            scanner,
            documents: BTreeMap::new(),
            stats: IndexStats::default(),
        }
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Return the index for `(id, version)`, scanning `text` only if needed.
    ///
    /// The same version always yields the same `Arc`. Any other version
    /// replaces the cached entry.
    pub fn ensure_processed(
        &mut self,
        id: &DocumentId,
        version: &DocumentVersion,
        text: &str,
    ) -> Arc<DocumentIndex> {
        if let Some(existing) = self.documents.get(id) {
            if existing.version() == version {
                self.stats.cache_hits += 1;
                return Arc::clone(existing);
            }

            log::debug!(
                "stale index for {} ({} -> {}), rescanning",
                id,
                existing.version(),
                version
            );
            self.stats.stale_rescans += 1;
        }

        let index = DocumentIndex::build(id.clone(), version.clone(), text, &self.scanner);
        self.insert(index)
    }

    /// Store an index built elsewhere, replacing any entry for the same document
    pub fn insert(&mut self, index: DocumentIndex) -> Arc<DocumentIndex> {
        self.stats.scans += 1;
        log::trace!(
            "indexed {} at {}: {} anchors, {} links",
            index.id(),
            index.version(),
            index.anchors().len(),
            index.links().len()
        );

        let index = Arc::new(index);
        self.documents.insert(index.id().clone(), Arc::clone(&index));
        index
    }

    /// Whether any index exists for the document
    pub fn is_file_processed(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    /// Drop the cached index so the next request rescans.
    ///
    /// Returns whether an entry existed.
    pub fn invalidate(&mut self, id: &DocumentId) -> bool {
        self.documents.remove(id).is_some()
    }

    /// Forget a document the host has closed
    pub fn close(&mut self, id: &DocumentId) {
        if self.invalidate(id) {
            log::trace!("closed {}", id);
        }
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Arc<DocumentIndex>> {
        self.documents.get(id)
    }

    /// Processed documents in lexicographic identity order
    pub fn documents(&self) -> impl Iterator<Item = &DocumentIndex> {
        self.documents.values().map(|index| index.as_ref())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }
}
