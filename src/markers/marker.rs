//! Located marker occurrences

use serde::{Deserialize, Serialize};

use crate::core::text::Span;

/// Whether a marker defines a target or refers to one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Anchor,
    Link,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Anchor => "anchor",
            MarkerKind::Link => "link",
        }
    }
}

/// An anchor or link found in document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,

    /// Anchor name, or the anchor name a link refers to
    pub name: String,

    /// The raw marker text including delimiters
    pub source: Span,

    /// Visible label inside the marker; `None` for pure tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Span>,
}

impl Marker {
    pub fn is_anchor(&self) -> bool {
        self.kind == MarkerKind::Anchor
    }

    pub fn is_link(&self) -> bool {
        self.kind == MarkerKind::Link
    }

    /// The delimiter portions of the marker: everything in `source` except the label.
    ///
    /// Together with `label` these tile `source` exactly.
    pub fn hidden_spans(&self) -> Vec<Span> {
        match self.label {
            None => vec![self.source],
            Some(label) => [
                Span::new(self.source.start, label.start),
                Span::new(label.end, self.source.end),
            ]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect(),
        }
    }

    pub fn raw_text<'a>(&self, text: &'a str) -> &'a str {
        self.source.slice(text)
    }

    pub fn label_text<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.label.map(|l| l.slice(text))
    }
}
