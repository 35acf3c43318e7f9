//! Rendering sinks
//!
//! A sink receives the five decoration sets and owns everything visual.
//! Provides:
//! - RecordingSink: keeps every application, for callers that emit data
//! - PreviewSink: renders the document as a terminal would show it decorated

use colored::{Color, Colorize};

use crate::config::DecorationStyle;
use crate::core::text::Span;
use crate::decorations::{DecorationRanges, DecorationSet};
use crate::index::document::{DocumentId, DocumentIndex};

pub trait RenderSink {
    /// Replace the decorations of `document` with `ranges`
    fn apply(&mut self, document: &DocumentIndex, ranges: &DecorationRanges);

    /// Drop every decoration of a closed document
    fn clear(&mut self, _document: &DocumentId) {}
}

/// Remembers what was applied, in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    applied: Vec<(DocumentId, DecorationRanges)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &[(DocumentId, DecorationRanges)] {
        &self.applied
    }

    pub fn last(&self) -> Option<&(DocumentId, DecorationRanges)> {
        self.applied.last()
    }

    /// The most recent ranges applied to `document`
    pub fn current(&self, document: &DocumentId) -> Option<&DecorationRanges> {
        self.applied
            .iter()
            .rev()
            .find(|(id, _)| id == document)
            .map(|(_, ranges)| ranges)
    }

    pub fn count(&self) -> usize {
        self.applied.len()
    }
}

impl RenderSink for RecordingSink {
    fn apply(&mut self, document: &DocumentIndex, ranges: &DecorationRanges) {
        self.applied.push((document.id().clone(), ranges.clone()));
    }

    fn clear(&mut self, document: &DocumentId) {
        self.applied.retain(|(id, _)| id != document);
    }
}

/// Renders decorated text for a terminal
#[derive(Debug)]
pub struct PreviewSink {
    style: DecorationStyle,
    color: bool,
    output: Option<String>,
}

impl PreviewSink {
    pub fn new(style: DecorationStyle, color: bool) -> Self {
        Self {
            style,
            color,
            output: None,
        }
    }

    /// The last rendering
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn into_output(self) -> Option<String> {
        self.output
    }
}

impl RenderSink for PreviewSink {
    fn apply(&mut self, document: &DocumentIndex, ranges: &DecorationRanges) {
        self.output = Some(render_preview(
            document.text(),
            ranges,
            &self.style,
            self.color,
        ));
    }

    fn clear(&mut self, _document: &DocumentId) {
        self.output = None;
    }
}

fn paint(text: &str, color: &str, bold: bool) -> String {
    let painted = match color {
        "inherit" | "" => text.normal(),
        name => match name.parse::<Color>() {
            Ok(color) => text.color(color),
            Err(_) => text.normal(),
        },
    };
    if bold {
        painted.bold().to_string()
    } else {
        painted.to_string()
    }
}

/// Document text with hidden spans removed, labels styled, and icons after resting labels
pub fn render_preview(
    text: &str,
    ranges: &DecorationRanges,
    style: &DecorationStyle,
    color: bool,
) -> String {
    let mut pieces: Vec<(Span, DecorationSet)> = ranges
        .sets()
        .flat_map(|(set, spans)| spans.iter().map(move |span| (*span, set)))
        .collect();
    pieces.sort_by_key(|(span, _)| *span);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for (span, set) in pieces {
        if span.start < cursor {
            continue;
        }
        out.push_str(&text[cursor..span.start]);
        cursor = span.end;

        let label = span.slice(text);
        let (label_color, icon) = match set {
            DecorationSet::Hidden => continue,
            DecorationSet::AnchorDisplay => (
                style.anchor_color.as_str(),
                style.anchor_icon_enabled.then_some(style.anchor_icon.as_str()),
            ),
            DecorationSet::LinkDisplay => (
                style.link_color.as_str(),
                style.link_icon_enabled.then_some(style.link_icon.as_str()),
            ),
            DecorationSet::AnchorDisplayActive | DecorationSet::LinkDisplayActive => {
                ("inherit", None)
            }
        };

        if color {
            out.push_str(&paint(label, label_color, true));
        } else {
            out.push_str(label);
        }
        if let Some(icon) = icon.filter(|i| !i.is_empty()) {
            out.push(' ');
            out.push_str(icon);
        }
    }

    out.push_str(&text[cursor.min(text.len())..]);
    out
}
