//! Marker scanner
//!
//! Scans document text for anchor and link markers. Markers are recognised
//! anywhere in the text, inside comments or not; the scanner never looks at
//! the host language. Scanning never fails: malformed and overlapping markers
//! are skipped and reported as anomalies.

use serde::Serialize;

use crate::core::text::Span;
use crate::error::Result;
use crate::markers::marker::{Marker, MarkerKind};
use crate::markers::syntax::{CompiledSyntax, MarkerSyntax, DEFAULT_SYNTAX};

/// Why a marker-like occurrence was not kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    /// Starts like a marker but does not parse
    Malformed,
    /// Well-formed, but starts inside an earlier marker
    Overlapping,
}

/// A non-fatal scanning problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanAnomaly {
    pub kind: AnomalyKind,

    /// For malformed markers, the recognised prefix; for overlapping ones, the
    /// discarded marker
    pub span: Span,

    /// Name of the discarded marker, when it parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Markers in document order plus everything that was skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    pub markers: Vec<Marker>,
    pub anomalies: Vec<ScanAnomaly>,
}

/// Scanner bound to one marker grammar
#[derive(Debug, Clone)]
pub struct Scanner {
    syntax: CompiledSyntax,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            syntax: DEFAULT_SYNTAX.clone(),
        }
    }
}

impl Scanner {
    pub fn new(syntax: &MarkerSyntax) -> Result<Self> {
        Ok(Self {
            syntax: syntax.compile()?,
        })
    }

    pub fn syntax(&self) -> &MarkerSyntax {
        self.syntax.syntax()
    }

    /// Find every well-formed marker in `text`, in document order.
    ///
    /// Each occurrence of the open delimiter is a candidate, including ones
    /// that overlap a previous candidate. A candidate that starts inside the
    /// last kept marker is discarded; the leftmost marker always wins.
    pub fn scan(&self, text: &str) -> ScanOutput {
        let open = self.syntax.syntax().open.as_str();
        let step = open.chars().next().map(char::len_utf8).unwrap_or(1);

        let mut output = ScanOutput::default();
        let mut kept_end = 0usize;
        let mut from = 0usize;

        while let Some(found) = text[from..].find(open) {
            let start = from + found;
            from = start + step;

            let rest = window(text, start);
            match self.syntax.marker.captures(rest) {
                Some(caps) => {
                    let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
                    let source = Span::new(start, start + whole);
                    let name = caps
                        .name("name")
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default();

                    if start < kept_end {
                        output.anomalies.push(ScanAnomaly {
                            kind: AnomalyKind::Overlapping,
                            span: source,
                            name: Some(name),
                        });
                        continue;
                    }

                    let kind = caps
                        .name("kind")
                        .map(|m| self.syntax.kind_of(m.as_str()))
                        .unwrap_or(MarkerKind::Link);
                    let label = caps
                        .name("label")
                        .map(|m| Span::new(start + m.start(), start + m.end()));

                    kept_end = source.end;
                    output.markers.push(Marker {
                        kind,
                        name,
                        source,
                        label,
                    });
                }
                None => {
                    // Marker-looking text inside a kept marker's label is just label text.
                    if start < kept_end {
                        continue;
                    }
                    if let Some(prefix) = self.syntax.prefix.find(rest) {
                        output.anomalies.push(ScanAnomaly {
                            kind: AnomalyKind::Malformed,
                            span: Span::new(start, start + prefix.end()),
                            name: None,
                        });
                    }
                }
            }
        }

        if !output.anomalies.is_empty() {
            log::debug!(
                "scan kept {} markers, skipped {} anomalies",
                output.markers.len(),
                output.anomalies.len()
            );
        }

        output
    }
}

/// Longest marker, in bytes, the scanner will match.
///
/// Bounds the regex work per candidate so a long line full of open
/// delimiters stays linear.
pub const MAX_MARKER_LEN: usize = 1024;

/// `text` from `start`, cut to at most `MAX_MARKER_LEN` bytes on a char boundary
fn window(text: &str, start: usize) -> &str {
    let mut end = (start + MAX_MARKER_LEN).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[start..end]
}

/// Scan with the default grammar
pub fn scan(text: &str) -> ScanOutput {
    Scanner::default().scan(text)
}
