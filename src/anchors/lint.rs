//! Marker linting
//!
//! Checks for:
//! - Malformed markers (look like markers, do not parse)
//! - Overlapping markers (start inside an earlier marker)
//! - Duplicate anchor names within one document
//! - Links that resolve to no anchor, or to several

use anyhow::Result;
use serde_json::json;
use std::path::Path;

use crate::config::Config;
use crate::core::model::{Confidence, ResultError, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::text::{Span, TextRange};
use crate::core::util::truncate_string;
use crate::host::workspace::load_index;
use crate::index::document::DocumentIndex;
use crate::index::store::AnchorIndex;
use crate::links::{resolve_all, Resolution, ResolutionScope};
use crate::markers::marker::MarkerKind;
use crate::markers::scan::AnomalyKind;

/// Longest marker excerpt quoted in a message
const MAX_EXCERPT_BYTES: usize = 60;

/// Lint issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    Error,
    Warning,
}

impl LintSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            LintSeverity::Error => "error",
            LintSeverity::Warning => "warning",
        }
    }
}

/// A lint issue
#[derive(Debug, Clone)]
pub struct LintIssue {
    pub severity: LintSeverity,
    pub code: &'static str,
    pub message: String,
    pub path: String,
    pub span: Span,
    pub range: TextRange,
}

impl LintIssue {
    fn new(
        severity: LintSeverity,
        code: &'static str,
        message: String,
        document: &DocumentIndex,
        span: Span,
    ) -> Self {
        Self {
            severity,
            code,
            message,
            path: document.id().to_string(),
            span,
            range: document.source().range_of(span),
        }
    }

    pub fn to_result_item(&self) -> ResultItem {
        let mut item = ResultItem::issue(self.path.clone(), self.code, self.span, self.range)
            .with_excerpt(self.message.clone())
            .with_confidence(match self.severity {
                LintSeverity::Error => Confidence::High,
                LintSeverity::Warning => Confidence::Medium,
            })
            .with_data(json!({ "severity": self.severity.as_str() }));
        item.errors.push(ResultError::new(self.code, &self.message));
        item
    }
}

fn excerpt(document: &DocumentIndex, span: Span) -> String {
    let (text, truncated) = truncate_string(span.slice(document.text()), MAX_EXCERPT_BYTES);
    if truncated {
        format!("{}...", text)
    } else {
        text
    }
}

/// Lint one document against the project
pub fn lint_document(
    document: &DocumentIndex,
    index: &AnchorIndex,
    scope: ResolutionScope,
) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    let syntax = index.scanner().syntax();

    for anomaly in document.anomalies() {
        let issue = match anomaly.kind {
            AnomalyKind::Malformed => LintIssue::new(
                LintSeverity::Warning,
                "MALFORMED_MARKER",
                format!(
                    "Malformed marker near `{}`: expected {} or {}",
                    excerpt(document, anomaly.span),
                    syntax.format(MarkerKind::Anchor, "NAME", None),
                    syntax.format(MarkerKind::Link, "NAME", Some("Label")),
                ),
                document,
                anomaly.span,
            ),
            AnomalyKind::Overlapping => LintIssue::new(
                LintSeverity::Warning,
                "OVERLAPPING_MARKER",
                format!(
                    "Marker `{}` starts inside another marker and is ignored",
                    excerpt(document, anomaly.span)
                ),
                document,
                anomaly.span,
            ),
        };
        issues.push(issue);
    }

    for conflict in document.conflicts() {
        let first = document.source().position_of(conflict.first.start);
        issues.push(LintIssue::new(
            LintSeverity::Warning,
            "DUPLICATE_ANCHOR",
            format!(
                "Anchor '{}' is already defined at {}; this definition is ignored",
                conflict.name, first
            ),
            document,
            conflict.duplicate,
        ));
    }

    for resolved in resolve_all(document, scope.project(index)) {
        let link = resolved.link;
        match &resolved.resolution {
            Resolution::Resolved(_) => {}
            Resolution::Unresolved => issues.push(LintIssue::new(
                LintSeverity::Error,
                "UNRESOLVED_LINK",
                format!("Link '{}' does not match any anchor", link.name),
                document,
                link.source,
            )),
            Resolution::Ambiguous(candidates) => {
                let places: Vec<_> = candidates.iter().map(|c| c.document.as_str()).collect();
                issues.push(LintIssue::new(
                    LintSeverity::Warning,
                    "AMBIGUOUS_LINK",
                    format!(
                        "Link '{}' matches anchors in {} documents: {}",
                        link.name,
                        candidates.len(),
                        places.join(", ")
                    ),
                    document,
                    link.source,
                ));
            }
        }
    }

    issues
}

/// Lint every indexed document, in document order
pub fn lint_index(index: &AnchorIndex, scope: ResolutionScope) -> Vec<LintIssue> {
    let mut issues: Vec<LintIssue> = index
        .documents()
        .flat_map(|document| lint_document(document, index, scope))
        .collect();
    issues.sort_by(|a, b| a.path.cmp(&b.path).then(a.span.start.cmp(&b.span.start)));
    issues
}

/// Run the lint command
pub fn run_lint(root: &Path, config: &Config, render_config: RenderConfig) -> Result<()> {
    let index = load_index(root, config)?;
    let issues = lint_index(&index, config.scope);

    let result_set: ResultSet = issues.iter().map(LintIssue::to_result_item).collect();

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
