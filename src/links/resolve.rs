//! Link resolution
//!
//! A link names an anchor. Lookup order:
//! 1. the link's own document
//! 2. every other indexed document, in lexicographic identity order, when a
//!    project index is supplied
//!
//! Several cross-document matches make the link ambiguous; resolution never
//! picks one silently. Resolution only reads the indexes it is given.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::index::document::{DocumentId, DocumentIndex};
use crate::index::store::AnchorIndex;
use crate::markers::marker::Marker;

/// Where links may find their anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionScope {
    /// Only the link's own document
    Document,
    /// Every processed document
    #[default]
    Project,
}

impl FromStr for ResolutionScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "document" | "file" => Ok(ResolutionScope::Document),
            "project" | "workspace" => Ok(ResolutionScope::Project),
            _ => Err(format!("Unknown scope: {}", s)),
        }
    }
}

impl ResolutionScope {
    /// The project index to pass to `resolve` under this scope
    pub fn project<'a>(&self, index: &'a AnchorIndex) -> Option<&'a AnchorIndex> {
        match self {
            ResolutionScope::Document => None,
            ResolutionScope::Project => Some(index),
        }
    }
}

/// An anchor definition and the document it lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorTarget<'a> {
    pub document: &'a DocumentId,
    pub anchor: &'a Marker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Resolved(AnchorTarget<'a>),
    Unresolved,
    /// Candidates in lexicographic document order
    Ambiguous(Vec<AnchorTarget<'a>>),
}

impl<'a> Resolution<'a> {
    pub fn status(&self) -> &'static str {
        match self {
            Resolution::Resolved(_) => "resolved",
            Resolution::Unresolved => "unresolved",
            Resolution::Ambiguous(_) => "ambiguous",
        }
    }

    /// Where a navigating host should go: the target, or the first ambiguous candidate
    pub fn preferred(&self) -> Option<AnchorTarget<'a>> {
        match self {
            Resolution::Resolved(target) => Some(*target),
            Resolution::Ambiguous(candidates) => candidates.first().copied(),
            Resolution::Unresolved => None,
        }
    }
}

/// A link paired with its resolution; derived on demand, never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink<'a> {
    pub link: &'a Marker,
    pub resolution: Resolution<'a>,
}

impl<'a> ResolvedLink<'a> {
    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, Resolution::Resolved(_))
    }

    /// The unique target, if resolution succeeded
    pub fn target(&self) -> Option<AnchorTarget<'a>> {
        match &self.resolution {
            Resolution::Resolved(target) => Some(*target),
            _ => None,
        }
    }
}

/// Find the anchor called `name` as seen from `document`
pub fn find_anchor<'a>(
    name: &str,
    document: &'a DocumentIndex,
    project: Option<&'a AnchorIndex>,
) -> Resolution<'a> {
    if let Some(anchor) = document.anchor(name) {
        return Resolution::Resolved(AnchorTarget {
            document: document.id(),
            anchor,
        });
    }

    let Some(project) = project else {
        return Resolution::Unresolved;
    };

    let mut candidates: Vec<AnchorTarget<'a>> = project
        .documents()
        .filter(|other| other.id() != document.id())
        .filter_map(|other| {
            other.anchor(name).map(|anchor| AnchorTarget {
                document: other.id(),
                anchor,
            })
        })
        .collect();

    match candidates.len() {
        0 => Resolution::Unresolved,
        1 => Resolution::Resolved(candidates.remove(0)),
        _ => Resolution::Ambiguous(candidates),
    }
}

/// Resolve one link of `document`
pub fn resolve<'a>(
    link: &'a Marker,
    document: &'a DocumentIndex,
    project: Option<&'a AnchorIndex>,
) -> ResolvedLink<'a> {
    debug_assert!(link.is_link(), "resolving non-link marker {}", link.name);
    ResolvedLink {
        link,
        resolution: find_anchor(&link.name, document, project),
    }
}

/// Resolve every link of `document`, in document order
pub fn resolve_all<'a>(
    document: &'a DocumentIndex,
    project: Option<&'a AnchorIndex>,
) -> Vec<ResolvedLink<'a>> {
    document
        .links()
        .iter()
        .map(|link| resolve(link, document, project))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::document::DocumentVersion;
    use std::sync::Arc;

    fn process(index: &mut AnchorIndex, id: &str, text: &str) -> Arc<DocumentIndex> {
        index.ensure_processed(&DocumentId::new(id), &DocumentVersion::Counter(1), text)
    }

    #[test]
    fn test_resolve_same_document() {
        let mut index = AnchorIndex::new();
        let doc = process(
            &mut index,
            "a.rs",
            "// [[anchor:setup]] see below\n// [[link:setup]]",
        );

        let resolved = resolve(&doc.links()[0], &doc, None);
        let target = resolved.target().unwrap();
        assert_eq!(target.anchor.name, "setup");
        assert_eq!(target.document.as_str(), "a.rs");
        assert_eq!(target.anchor, doc.anchor("setup").unwrap());
    }

    #[test]
    fn test_resolve_missing_is_unresolved() {
        let mut index = AnchorIndex::new();
        process(&mut index, "a.rs", "// [[anchor:setup]]");
        let doc = process(&mut index, "b.rs", "// [[link:missing]]");

        let resolved = resolve(&doc.links()[0], &doc, Some(&index));
        assert_eq!(resolved.resolution, Resolution::Unresolved);
        assert_eq!(resolved.resolution.status(), "unresolved");
        assert!(resolved.resolution.preferred().is_none());
    }

    #[test]
    fn test_resolve_cross_document_needs_project() {
        let mut index = AnchorIndex::new();
        process(&mut index, "a.rs", "// [[anchor:setup]]");
        let doc = process(&mut index, "b.rs", "// [[link:setup]]");

        assert!(!resolve(&doc.links()[0], &doc, None).is_resolved());

        let resolved = resolve(&doc.links()[0], &doc, Some(&index));
        assert_eq!(resolved.target().unwrap().document.as_str(), "a.rs");
    }

    #[test]
    fn test_same_document_wins_over_project() {
        let mut index = AnchorIndex::new();
        process(&mut index, "a.rs", "[[anchor:x]]");
        let doc = process(&mut index, "b.rs", "[[anchor:x]] [[link:x]]");

        let resolved = resolve(&doc.links()[0], &doc, Some(&index));
        assert_eq!(resolved.target().unwrap().document.as_str(), "b.rs");
    }

    #[test]
    fn test_ambiguous_cross_document() {
        let mut index = AnchorIndex::new();
        process(&mut index, "z.rs", "[[anchor:ready]]");
        process(&mut index, "m.rs", "[[anchor:ready]]");
        let doc = process(&mut index, "a.rs", "[[link:ready]]");

        let resolved = resolve(&doc.links()[0], &doc, Some(&index));
        match &resolved.resolution {
            Resolution::Ambiguous(candidates) => {
                let docs: Vec<_> = candidates.iter().map(|c| c.document.as_str()).collect();
                assert_eq!(docs, vec!["m.rs", "z.rs"]);
            }
            other => panic!("expected ambiguous, got {:?}", other),
        }
        assert_eq!(
            resolved.resolution.preferred().unwrap().document.as_str(),
            "m.rs"
        );
        assert!(resolved.target().is_none());
    }

    #[test]
    fn test_resolve_all_in_document_order() {
        let mut index = AnchorIndex::new();
        let doc = process(&mut index, "a.rs", "[[link:b]] [[anchor:a]] [[link:a]]");

        let all = resolve_all(&doc, None);
        assert_eq!(all.len(), 2);
        assert!(!all[0].is_resolved());
        assert!(all[1].is_resolved());
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let mut index = AnchorIndex::new();
        let doc = process(&mut index, "a.rs", "[[anchor:a]] [[link:a]]");

        let first = resolve(&doc.links()[0], &doc, Some(&index));
        let second = resolve(&doc.links()[0], &doc, Some(&index));
        assert_eq!(first, second);
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!(
            "document".parse::<ResolutionScope>().unwrap(),
            ResolutionScope::Document
        );
        assert_eq!(
            "Project".parse::<ResolutionScope>().unwrap(),
            ResolutionScope::Project
        );
        assert!("galaxy".parse::<ResolutionScope>().is_err());
    }

    #[test]
    fn test_scope_selects_project() {
        let index = AnchorIndex::new();
        assert!(ResolutionScope::Document.project(&index).is_none());
        assert!(ResolutionScope::Project.project(&index).is_some());
    }
}
