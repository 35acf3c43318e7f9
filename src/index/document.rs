//! Per-document index

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::core::text::{SourceText, Span};
use crate::core::util::{hash_bytes, HashAlgorithm};
use crate::markers::marker::{Marker, MarkerKind};
use crate::markers::scan::{ScanAnomaly, ScanOutput, Scanner};

/// Stable, ordered document identity (a root-relative path in the CLI host)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What the host uses to tell one revision of a document from the next
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentVersion {
    /// Monotonic edit counter maintained by the host
    Counter(i64),
    /// Hash of the document text
    ContentHash(String),
}

impl DocumentVersion {
    /// Content-hash version of `text`
    pub fn of_text(text: &str, algorithm: HashAlgorithm) -> Self {
        DocumentVersion::ContentHash(hash_bytes(text.as_bytes(), algorithm))
    }
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentVersion::Counter(n) => write!(f, "v{}", n),
            DocumentVersion::ContentHash(hash) => write!(f, "#{}", hash),
        }
    }
}

/// A second definition of an anchor name within one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateAnchor {
    pub name: String,
    /// The definition that was kept
    pub first: Span,
    /// The definition that was dropped
    pub duplicate: Span,
}

/// Markers of one document revision
///
/// Immutable once built: a new revision gets a new index.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    id: DocumentId,
    version: DocumentVersion,
    source: SourceText,
    anchors: Vec<Marker>,
    anchor_slots: HashMap<String, usize>,
    links: Vec<Marker>,
    /// Later definitions of an already defined name; decorated, never resolved
    duplicates: Vec<Marker>,
    conflicts: Vec<DuplicateAnchor>,
    anomalies: Vec<ScanAnomaly>,
}

impl DocumentIndex {
    /// Scan `text` and index the result
    pub fn build(id: DocumentId, version: DocumentVersion, text: &str, scanner: &Scanner) -> Self {
        let output = scanner.scan(text);
        Self::from_scan(id, version, text, output)
    }

    /// Index an existing scan of `text`
    pub fn from_scan(
        id: DocumentId,
        version: DocumentVersion,
        text: &str,
        output: ScanOutput,
    ) -> Self {
        let mut anchors: Vec<Marker> = Vec::new();
        let mut anchor_slots = HashMap::new();
        let mut links = Vec::new();
        let mut duplicates = Vec::new();
        let mut conflicts = Vec::new();

        for marker in output.markers {
            match marker.kind {
                MarkerKind::Link => links.push(marker),
                MarkerKind::Anchor => match anchor_slots.get(&marker.name) {
                    Some(&slot) => {
                        let first: &Marker = &anchors[slot];
                        conflicts.push(DuplicateAnchor {
                            name: marker.name.clone(),
                            first: first.source,
                            duplicate: marker.source,
                        });
                        duplicates.push(marker);
                    }
                    None => {
                        anchor_slots.insert(marker.name.clone(), anchors.len());
                        anchors.push(marker);
                    }
                },
            }
        }

        if !conflicts.is_empty() {
            log::debug!(
                "{}: {} duplicate anchor definition(s) dropped",
                id,
                conflicts.len()
            );
        }

        Self {
            id,
            version,
            source: SourceText::new(text),
            anchors,
            anchor_slots,
            links,
            duplicates,
            conflicts,
            anomalies: output.anomalies,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn version(&self) -> &DocumentVersion {
        &self.version
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn text(&self) -> &str {
        self.source.as_str()
    }

    /// The unique anchor definition for `name`
    pub fn anchor(&self, name: &str) -> Option<&Marker> {
        self.anchor_slots.get(name).map(|&slot| &self.anchors[slot])
    }

    /// Anchors in document order, one per name
    pub fn anchors(&self) -> &[Marker] {
        &self.anchors
    }

    /// Links in document order
    pub fn links(&self) -> &[Marker] {
        &self.links
    }

    /// Anchors dropped because their name was already defined
    pub fn duplicates(&self) -> &[Marker] {
        &self.duplicates
    }

    /// Every well-formed marker in document order, duplicates included
    pub fn markers(&self) -> Vec<&Marker> {
        let mut markers: Vec<&Marker> = self
            .anchors
            .iter()
            .chain(&self.duplicates)
            .chain(&self.links)
            .collect();
        markers.sort_by_key(|m| m.source.start);
        markers
    }

    pub fn conflicts(&self) -> &[DuplicateAnchor] {
        &self.conflicts
    }

    pub fn anomalies(&self) -> &[ScanAnomaly] {
        &self.anomalies
    }
}
