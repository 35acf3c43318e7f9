//! Unified Result Model
//!
//! Every command maps its findings to this model before rendering output.

use serde::{Deserialize, Serialize};

use crate::core::text::{Span, TextRange};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Anchor,
    Link,
    Decoration,
    Issue,
}

/// Confidence level of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Version the document index was built from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Document size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultError {
    pub code: String,
    pub message: String,
}

impl ResultError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands must produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Document path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Marker or set name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Byte span within the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,

    /// The same span as zero-based line/character positions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<TextRange>,

    /// Covered text (may be truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (resolution targets, decoration set, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Confidence level
    pub confidence: Confidence,

    /// Metadata
    #[serde(default)]
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResultError>,
}

impl ResultItem {
    fn located(kind: Kind, path: impl Into<String>, span: Span, range: TextRange) -> Self {
        Self {
            kind,
            path: Some(path.into()),
            name: None,
            span: Some(span),
            range: Some(range),
            excerpt: None,
            data: None,
            confidence: Confidence::High,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new anchor result
    pub fn anchor(
        path: impl Into<String>,
        name: impl Into<String>,
        span: Span,
        range: TextRange,
    ) -> Self {
        Self::located(Kind::Anchor, path, span, range).with_name(name)
    }

    /// Create a new link result
    pub fn link(
        path: impl Into<String>,
        name: impl Into<String>,
        span: Span,
        range: TextRange,
    ) -> Self {
        Self::located(Kind::Link, path, span, range).with_name(name)
    }

    /// Create a new decoration result; `name` is the decoration set
    pub fn decoration(
        path: impl Into<String>,
        set: impl Into<String>,
        span: Span,
        range: TextRange,
    ) -> Self {
        Self::located(Kind::Decoration, path, span, range).with_name(set)
    }

    /// Create a new lint issue result; `name` is the issue code
    pub fn issue(
        path: impl Into<String>,
        code: impl Into<String>,
        span: Span,
        range: TextRange,
    ) -> Self {
        Self::located(Kind::Issue, path, span, range).with_name(code)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set confidence level
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Sort items by path and span start for stable output
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb).then_with(|| match (&a.span, &b.span) {
                (Some(sa), Some(sb)) => sa.cmp(sb),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::text::Position;

    fn range(line: u32) -> TextRange {
        TextRange {
            start: Position::new(line, 0),
            end: Position::new(line, 4),
        }
    }

    #[test]
    fn test_result_item_anchor() {
        let item = ResultItem::anchor("src/a.rs", "setup", Span::new(3, 19), range(0));
        assert_eq!(item.kind, Kind::Anchor);
        assert_eq!(item.name.as_deref(), Some("setup"));
        assert_eq!(item.span, Some(Span::new(3, 19)));
    }

    #[test]
    fn test_result_set_sort_by_path_then_span() {
        let mut set = ResultSet::new();
        set.push(ResultItem::link("b.rs", "x", Span::new(0, 4), range(0)));
        set.push(ResultItem::link("a.rs", "y", Span::new(9, 12), range(1)));
        set.push(ResultItem::link("a.rs", "z", Span::new(2, 5), range(0)));
        set.sort();

        let order: Vec<_> = set.items.iter().map(|i| i.name.clone().unwrap()).collect();
        assert_eq!(order, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_result_set_sort_with_none_paths() {
        let mut set = ResultSet::new();
        let mut pathless = ResultItem::link("a.rs", "x", Span::new(0, 1), range(0));
        pathless.path = None;
        set.push(pathless);
        set.push(ResultItem::anchor("a.rs", "a", Span::new(0, 1), range(0)));
        set.sort();

        // Items with path should come before items without
        assert!(set.items[0].path.is_some());
    }

    #[test]
    fn test_result_set_from_iter() {
        let items = vec![
            ResultItem::anchor("a.rs", "a", Span::new(0, 1), range(0)),
            ResultItem::link("a.rs", "a", Span::new(2, 3), range(0)),
        ];
        let set: ResultSet = items.into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_kind_serialization() {
        let item = ResultItem::decoration("a.rs", "hidden", Span::new(0, 2), range(0));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"decoration\""));
        assert!(json.contains("\"name\":\"hidden\""));
    }

    #[test]
    fn test_data_embedded_directly() {
        let item = ResultItem::link("a.rs", "x", Span::new(0, 1), range(0))
            .with_data(serde_json::json!({ "status": "unresolved" }))
            .with_confidence(Confidence::Low);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"data\":{\"status\":\"unresolved\"}"));
        assert!(json.contains("\"confidence\":\"low\""));
    }

    #[test]
    fn test_result_item_deserialization() {
        let json = r#"{"kind":"anchor","path":"a.rs","name":"setup","confidence":"high"}"#;
        let item: ResultItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, Kind::Anchor);
        assert!(item.meta.version.is_none());
    }
}
