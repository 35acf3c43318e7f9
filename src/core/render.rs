//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render to a writer
    pub fn render_to<W: Write>(
        &self,
        result_set: &ResultSet,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(result_set);
        writer.write_all(output.as_bytes())
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown, one section per kind
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut anchors = Vec::new();
        let mut links = Vec::new();
        let mut decorations = Vec::new();
        let mut issues = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Anchor => anchors.push(item),
                Kind::Link => links.push(item),
                Kind::Decoration => decorations.push(item),
                Kind::Issue => issues.push(item),
            }
        }

        let sections = [
            ("Issues", issues),
            ("Anchors", anchors),
            ("Links", links),
            ("Decorations", decorations),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            output.push_str(&format!("## {}\n\n", title));
            for item in items {
                self.render_item_md(&mut output, item);
            }
            output.push('\n');
        }

        output
    }

    fn render_item_md(&self, output: &mut String, item: &ResultItem) {
        output.push('-');
        if let Some(name) = &item.name {
            output.push_str(&format!(" **{}**", name));
        }
        if let Some(path) = &item.path {
            output.push_str(&format!(" `{}`", path));
        }
        if let Some(range) = &item.range {
            output.push_str(&format!(" ({} - {})", range.start, range.end));
        }
        if let Some(excerpt) = &item.excerpt {
            output.push_str(&format!(": `{}`", excerpt));
        }
        for error in &item.errors {
            output.push_str(&format!(" [{}] {}", error.code, error.message));
        }
        output.push('\n');
    }

    /// Render as raw output (for debugging)
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone())
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ResultError, ResultItem};
    use crate::core::text::{Position, Span, TextRange};

    fn anchor(path: &str, name: &str) -> ResultItem {
        let range = TextRange {
            start: Position::new(2, 3),
            end: Position::new(2, 19),
        };
        ResultItem::anchor(path, name, Span::new(10, 26), range)
    }

    #[test]
    fn test_render_jsonl() {
        let mut result_set = ResultSet::new();
        result_set.push(anchor("src/main.rs", "setup"));
        result_set.push(anchor("src/lib.rs", "ready"));

        let output = Renderer::new(OutputFormat::Jsonl).render(&result_set);

        assert!(output.contains("src/main.rs"));
        assert!(output.contains("ready"));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_render_json() {
        let mut result_set = ResultSet::new();
        result_set.push(anchor("src/main.rs", "setup"));

        let output = Renderer::new(OutputFormat::Json).render(&result_set);

        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
    }

    #[test]
    fn test_output_format_parse_invalid() {
        let result = "invalid".parse::<OutputFormat>();
        assert!(result.unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_render_json_pretty() {
        let mut result_set = ResultSet::new();
        result_set.push(anchor("src/main.rs", "setup"));

        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let output = Renderer::with_config(config).render(&result_set);

        assert!(output.contains("  "));
    }

    #[test]
    fn test_render_markdown_empty() {
        let output = Renderer::new(OutputFormat::Markdown).render(&ResultSet::new());
        assert!(output.is_empty());
    }

    #[test]
    fn test_render_markdown_sections() {
        let mut result_set = ResultSet::new();
        result_set.push(anchor("doc.rs", "setup").with_excerpt("[[anchor:setup]]"));
        let mut issue = ResultItem::issue(
            "doc.rs",
            "UNRESOLVED_LINK",
            Span::new(30, 40),
            TextRange {
                start: Position::new(3, 0),
                end: Position::new(3, 10),
            },
        );
        issue
            .errors
            .push(ResultError::new("UNRESOLVED_LINK", "Link 'x' does not match any anchor"));
        result_set.push(issue);

        let output = Renderer::new(OutputFormat::Markdown).render(&result_set);

        assert!(output.contains("## Issues"));
        assert!(output.contains("[UNRESOLVED_LINK] Link 'x' does not match any anchor"));
        assert!(output.find("## Issues") < output.find("## Anchors"));
        assert!(output.contains("## Anchors"));
        assert!(output.contains("**setup**"));
        assert!(output.contains("(2:3 - 2:19)"));
    }

    #[test]
    fn test_render_raw() {
        let mut result_set = ResultSet::new();
        result_set.push(anchor("a.rs", "a").with_excerpt("content 1"));
        result_set.push(anchor("b.rs", "b").with_excerpt("content 2"));

        let output = Renderer::new(OutputFormat::Raw).render(&result_set);

        assert_eq!(output, "content 1\n---\ncontent 2");
    }

    #[test]
    fn test_render_to_writer() {
        let mut result_set = ResultSet::new();
        result_set.push(anchor("test.rs", "a"));

        let mut buffer = Vec::new();
        Renderer::new(OutputFormat::Json)
            .render_to(&result_set, &mut buffer)
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("test.rs"));
    }
}
