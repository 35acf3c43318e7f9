//! Decoration range builder
//!
//! Splits every marker of a document into the spans a renderer needs:
//! - hidden: delimiter text that should not be visible
//! - anchor_display / link_display: resting labels
//! - anchor_display_active / link_display_active: labels of the marker under the cursor
//!
//! The builder only reads the index. Unresolved links are decorated like any other.

use serde::Serialize;

use crate::core::text::{Position, Span};
use crate::index::document::DocumentIndex;
use crate::markers::marker::{Marker, MarkerKind};

/// One of the five range sets handed to a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationSet {
    AnchorDisplay,
    AnchorDisplayActive,
    LinkDisplay,
    LinkDisplayActive,
    Hidden,
}

impl DecorationSet {
    pub const ALL: [DecorationSet; 5] = [
        DecorationSet::AnchorDisplay,
        DecorationSet::AnchorDisplayActive,
        DecorationSet::LinkDisplay,
        DecorationSet::LinkDisplayActive,
        DecorationSet::Hidden,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DecorationSet::AnchorDisplay => "anchor_display",
            DecorationSet::AnchorDisplayActive => "anchor_display_active",
            DecorationSet::LinkDisplay => "link_display",
            DecorationSet::LinkDisplayActive => "link_display_active",
            DecorationSet::Hidden => "hidden",
        }
    }

    fn display(kind: MarkerKind, active: bool) -> Self {
        match (kind, active) {
            (MarkerKind::Anchor, false) => DecorationSet::AnchorDisplay,
            (MarkerKind::Anchor, true) => DecorationSet::AnchorDisplayActive,
            (MarkerKind::Link, false) => DecorationSet::LinkDisplay,
            (MarkerKind::Link, true) => DecorationSet::LinkDisplayActive,
        }
    }
}

/// A marker the cursor sits on, labelled or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveMarker {
    pub kind: MarkerKind,
    pub name: String,
    pub source: Span,
}

/// The five range sets for one document and cursor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecorationRanges {
    pub anchor_display: Vec<Span>,
    pub anchor_display_active: Vec<Span>,
    pub link_display: Vec<Span>,
    pub link_display_active: Vec<Span>,
    pub hidden: Vec<Span>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub active: Vec<ActiveMarker>,
}

impl DecorationRanges {
    pub fn get(&self, set: DecorationSet) -> &[Span] {
        match set {
            DecorationSet::AnchorDisplay => &self.anchor_display,
            DecorationSet::AnchorDisplayActive => &self.anchor_display_active,
            DecorationSet::LinkDisplay => &self.link_display,
            DecorationSet::LinkDisplayActive => &self.link_display_active,
            DecorationSet::Hidden => &self.hidden,
        }
    }

    fn get_mut(&mut self, set: DecorationSet) -> &mut Vec<Span> {
        match set {
            DecorationSet::AnchorDisplay => &mut self.anchor_display,
            DecorationSet::AnchorDisplayActive => &mut self.anchor_display_active,
            DecorationSet::LinkDisplay => &mut self.link_display,
            DecorationSet::LinkDisplayActive => &mut self.link_display_active,
            DecorationSet::Hidden => &mut self.hidden,
        }
    }

    /// All five sets in a fixed order
    pub fn sets(&self) -> impl Iterator<Item = (DecorationSet, &[Span])> + '_ {
        DecorationSet::ALL.into_iter().map(move |set| (set, self.get(set)))
    }

    /// Markers classified active for this cursor
    pub fn active_markers(&self) -> &[ActiveMarker] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.sets().all(|(_, spans)| spans.is_empty())
    }

    fn add_marker(&mut self, marker: &Marker, active: bool) {
        self.hidden.extend(marker.hidden_spans());
        if let Some(label) = marker.label {
            self.get_mut(DecorationSet::display(marker.kind, active))
                .push(label);
        }
        if active {
            self.active.push(ActiveMarker {
                kind: marker.kind,
                name: marker.name.clone(),
                source: marker.source,
            });
        }
    }

    fn normalize(&mut self) {
        for set in DecorationSet::ALL {
            let spans = self.get_mut(set);
            spans.sort();
            spans.dedup();
        }
        self.active.sort_by_key(|m| m.source);
    }
}

/// Compute the decoration sets for `document` with the cursor at `cursor`.
///
/// A cursor that does not map into the text is treated as no cursor.
pub fn build(document: &DocumentIndex, cursor: Option<Position>) -> DecorationRanges {
    let offset = cursor.and_then(|position| {
        let offset = document.source().offset_of(position);
        if offset.is_none() {
            log::trace!(
                "{}: cursor {} outside the text, ignoring",
                document.id(),
                position
            );
        }
        offset
    });
    build_at_offset(document, offset)
}

/// Same as `build`, with the cursor given as a byte offset
pub fn build_at_offset(document: &DocumentIndex, cursor: Option<usize>) -> DecorationRanges {
    let mut ranges = DecorationRanges::default();

    for marker in document.markers() {
        let active = cursor.is_some_and(|offset| marker.source.contains_inclusive(offset));
        ranges.add_marker(marker, active);
    }

    ranges.normalize();
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::document::{DocumentId, DocumentVersion};
    use crate::markers::scan::Scanner;

    fn index(text: &str) -> DocumentIndex {
        DocumentIndex::build(
            DocumentId::new("a.rs"),
            DocumentVersion::Counter(1),
            text,
            &Scanner::default(),
        )
    }

    #[test]
    fn test_pure_anchor_is_hidden_only() {
        let text = "// [[anchor:setup]] see below";
        let doc = index(text);
        let ranges = build(&doc, None);

        assert_eq!(ranges.hidden.len(), 1);
        assert_eq!(ranges.hidden[0].slice(text), "[[anchor:setup]]");
        assert!(ranges.anchor_display.is_empty());
        assert!(ranges.anchor_display_active.is_empty());
        assert!(ranges.active.is_empty());
    }

    #[test]
    fn test_labelled_markers_split() {
        let text = "[[anchor:a|Alpha]] and [[link:a|go to alpha]]";
        let doc = index(text);
        let ranges = build(&doc, None);

        let hidden: Vec<_> = ranges.hidden.iter().map(|s| s.slice(text)).collect();
        assert_eq!(hidden, vec!["[[anchor:a|", "]]", "[[link:a|", "]]"]);
        assert_eq!(ranges.anchor_display[0].slice(text), "Alpha");
        assert_eq!(ranges.link_display[0].slice(text), "go to alpha");
    }

    #[test]
    fn test_cursor_inside_pure_anchor_marks_active() {
        let text = "// [[anchor:setup]] see below";
        let doc = index(text);
        let ranges = build(&doc, Some(Position::new(0, 6)));

        assert!(ranges.anchor_display.is_empty());
        assert!(ranges.anchor_display_active.is_empty());
        assert_eq!(ranges.active.len(), 1);
        assert_eq!(ranges.active[0].name, "setup");
        assert_eq!(ranges.hidden.len(), 1);
    }

    #[test]
    fn test_cursor_inside_labelled_anchor() {
        let text = "// [[anchor:setup|Setup]]";
        let doc = index(text);
        let ranges = build(&doc, Some(Position::new(0, 20)));

        assert_eq!(ranges.anchor_display_active.len(), 1);
        assert_eq!(ranges.anchor_display_active[0].slice(text), "Setup");
        assert!(ranges.anchor_display.is_empty());
    }

    #[test]
    fn test_active_boundaries_inclusive() {
        let text = "ab[[link:x|X]]cd";
        let doc = index(text);

        let at_start = build_at_offset(&doc, Some(2));
        assert_eq!(at_start.link_display_active.len(), 1);

        let at_end = build_at_offset(&doc, Some(14));
        assert_eq!(at_end.link_display_active.len(), 1);

        let outside = build_at_offset(&doc, Some(15));
        assert!(outside.link_display_active.is_empty());
        assert_eq!(outside.link_display.len(), 1);
    }

    #[test]
    fn test_cursor_outside_markers_has_no_active_sets() {
        let text = "[[anchor:a|A]]\nplain line\n[[link:a|to A]]\n";
        let doc = index(text);

        for character in 0..10 {
            let ranges = build(&doc, Some(Position::new(1, character)));
            assert!(ranges.anchor_display_active.is_empty());
            assert!(ranges.link_display_active.is_empty());
            assert!(ranges.active.is_empty());
        }
    }

    #[test]
    fn test_stale_cursor_is_ignored() {
        let text = "[[anchor:a|A]]";
        let doc = index(text);

        assert_eq!(build(&doc, Some(Position::new(7, 0))), build(&doc, None));
        assert_eq!(build(&doc, Some(Position::new(0, 99))), build(&doc, None));
    }

    #[test]
    fn test_unresolved_link_still_displayed() {
        let text = "[[link:missing|nowhere]]";
        let doc = index(text);
        let ranges = build(&doc, None);
        assert_eq!(ranges.link_display[0].slice(text), "nowhere");
    }

    #[test]
    fn test_build_is_idempotent() {
        let text = "[[link:b|B]] [[anchor:a]] [[anchor:b|B]] [[link:a]]";
        let doc = index(text);
        let cursor = Some(Position::new(0, 3));
        assert_eq!(build(&doc, cursor), build(&doc, cursor));
    }

    #[test]
    fn test_sets_sorted_by_start() {
        let text = "[[link:b|B]] [[anchor:a|A]] [[link:c|C]] [[anchor:d|D]]";
        let doc = index(text);
        let ranges = build(&doc, None);

        for (_, spans) in ranges.sets() {
            for pair in spans.windows(2) {
                assert!(pair[0].start < pair[1].start);
                assert!(!pair[0].overlaps(&pair[1]));
            }
        }
    }

    #[test]
    fn test_duplicate_anchor_is_decorated() {
        let text = "[[anchor:ready|First]]\n[[anchor:ready|again]]";
        let doc = index(text);
        let ranges = build(&doc, None);

        let hidden: Vec<_> = ranges.hidden.iter().map(|s| s.slice(text)).collect();
        assert_eq!(
            hidden,
            vec!["[[anchor:ready|", "]]", "[[anchor:ready|", "]]"]
        );
        let labels: Vec<_> = ranges.anchor_display.iter().map(|s| s.slice(text)).collect();
        assert_eq!(labels, vec!["First", "again"]);
    }

    #[test]
    fn test_hidden_and_labels_tile_every_marker() {
        let text = "// [[anchor:a]] x [[anchor:b|Bee]]\n[[link:a|to a]] [[link:zz]]\n\
                    [[anchor:b|again]]\n";
        let doc = index(text);
        let ranges = build(&doc, None);
        let scanned = Scanner::default().scan(text).markers;
        assert_eq!(scanned.len(), 5);

        let mut pieces: Vec<Span> = ranges
            .sets()
            .flat_map(|(_, spans)| spans.iter().copied())
            .collect();
        pieces.sort();

        for marker in &scanned {
            let inside: Vec<Span> = pieces
                .iter()
                .copied()
                .filter(|s| marker.source.start <= s.start && s.end <= marker.source.end)
                .collect();

            let mut cursor = marker.source.start;
            for piece in &inside {
                assert_eq!(piece.start, cursor, "gap or overlap in {}", marker.name);
                cursor = piece.end;
            }
            assert_eq!(cursor, marker.source.end);
        }

        let covered: usize = pieces.iter().map(Span::len).sum();
        let sources: usize = scanned.iter().map(|m| m.source.len()).sum();
        assert_eq!(covered, sources);
    }

    #[test]
    fn test_set_names() {
        let names: Vec<_> = DecorationSet::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "anchor_display",
                "anchor_display_active",
                "link_display",
                "link_display_active",
                "hidden"
            ]
        );
    }
}
