//! Marker grammar
//!
//! Default forms:
//!
//! ```text
//! [[anchor:NAME]]            pure anchor tag
//! [[anchor:NAME|Label]]      anchor with visible label
//! [[link:NAME]]              pure link tag
//! [[link:NAME|Label]]        link with visible label
//! ```
//!
//! `NAME` is `[A-Za-z0-9_][A-Za-z0-9_.-]*`. A label is at least one character,
//! never crosses a line break, and ends at the first closing delimiter.
//! Delimiters, keywords and the label separator are configurable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::markers::marker::MarkerKind;

/// Pattern for marker names, shared by every grammar
const NAME_PATTERN: &str = r"[A-Za-z0-9_][A-Za-z0-9_.\-]*";

/// Configurable delimiters and keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSyntax {
    pub open: String,
    pub close: String,
    pub anchor_keyword: String,
    pub link_keyword: String,
    pub label_separator: String,
}

impl Default for MarkerSyntax {
    fn default() -> Self {
        Self {
            open: "[[".to_string(),
            close: "]]".to_string(),
            anchor_keyword: "anchor".to_string(),
            link_keyword: "link".to_string(),
            label_separator: "|".to_string(),
        }
    }
}

impl MarkerSyntax {
    /// Reject grammars that would make markers ambiguous or unmatchable
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(Error::InvalidSyntax { reason });

        for (field, value) in [
            ("open", &self.open),
            ("close", &self.close),
            ("label_separator", &self.label_separator),
        ] {
            if value.is_empty() {
                return invalid(format!("`{}` must not be empty", field));
            }
            if value.contains('\n') || value.contains('\r') {
                return invalid(format!("`{}` must not contain line breaks", field));
            }
        }

        for (field, value) in [
            ("anchor_keyword", &self.anchor_keyword),
            ("link_keyword", &self.link_keyword),
        ] {
            if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return invalid(format!(
                    "`{}` must be a non-empty ASCII identifier, got `{}`",
                    field, value
                ));
            }
        }

        if self.anchor_keyword == self.link_keyword {
            return invalid("anchor and link keywords must differ".to_string());
        }

        Ok(())
    }

    pub fn keyword(&self, kind: MarkerKind) -> &str {
        match kind {
            MarkerKind::Anchor => &self.anchor_keyword,
            MarkerKind::Link => &self.link_keyword,
        }
    }

    /// Compile the grammar into anchored regexes
    pub fn compile(&self) -> Result<CompiledSyntax> {
        self.validate()?;

        let open = regex::escape(&self.open);
        let close = regex::escape(&self.close);
        let keywords = format!(
            "{}|{}",
            regex::escape(&self.anchor_keyword),
            regex::escape(&self.link_keyword)
        );

        let marker = format!(
            r"^{open}(?P<kind>{keywords}):(?P<name>{name})(?:{sep}(?P<label>[^\r\n]+?))?{close}",
            open = open,
            keywords = keywords,
            name = NAME_PATTERN,
            sep = regex::escape(&self.label_separator),
            close = close,
        );
        let prefix = format!(r"^{}(?:{}):", open, keywords);

        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| Error::InvalidSyntax {
                reason: e.to_string(),
            })
        };

        Ok(CompiledSyntax {
            marker: compile(&marker)?,
            prefix: compile(&prefix)?,
            syntax: self.clone(),
        })
    }

    /// Render a marker in this grammar
    pub fn format(&self, kind: MarkerKind, name: &str, label: Option<&str>) -> String {
        match label {
            Some(label) => format!(
                "{}{}:{}{}{}{}",
                self.open,
                self.keyword(kind),
                name,
                self.label_separator,
                label,
                self.close
            ),
            None => format!("{}{}:{}{}", self.open, self.keyword(kind), name, self.close),
        }
    }
}

/// Regexes for one grammar, anchored at a candidate open delimiter
#[derive(Debug, Clone)]
pub struct CompiledSyntax {
    /// A complete, well-formed marker
    pub(crate) marker: Regex,
    /// Open delimiter followed by a keyword and `:`: anything matching this
    /// but not `marker` is malformed
    pub(crate) prefix: Regex,
    pub(crate) syntax: MarkerSyntax,
}

impl CompiledSyntax {
    pub fn syntax(&self) -> &MarkerSyntax {
        &self.syntax
    }

    pub(crate) fn kind_of(&self, keyword: &str) -> MarkerKind {
        if keyword == self.syntax.anchor_keyword {
            MarkerKind::Anchor
        } else {
            MarkerKind::Link
        }
    }
}

/// The default grammar, compiled once
pub static DEFAULT_SYNTAX: Lazy<CompiledSyntax> = Lazy::new(|| {
    MarkerSyntax::default()
        .compile()
        .expect("default marker syntax must compile")
});
