//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::encode::code_fence;
use crate::core::model::{Kind, ResultItem, ResultSet};
use serde::Serialize;

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
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
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

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Option<String> {
        let encoded = if self.config.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.ok()
    }

    /// One JSON object per line; blank-line separated when pretty
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        let separator = if self.config.pretty { "\n\n" } else { "\n" };
        result_set
            .items
            .iter()
            .filter_map(|item| self.to_json(item))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn render_json(&self, result_set: &ResultSet) -> String {
        self.to_json(&result_set.items)
            .unwrap_or_else(|| "[]".to_string())
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut files = Vec::new();
        let mut summaries = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::File => files.push(item),
                Kind::Summary => summaries.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !files.is_empty() {
            output.push_str("## Files\n\n");
            for item in files {
                render_file_md(&mut output, item);
            }
        }

        if !summaries.is_empty() {
            output.push_str("## Summary\n\n");
            for item in summaries {
                if let Some(data) = &item.data {
                    let json = serde_json::to_string_pretty(data).unwrap_or_default();
                    output.push_str("```json\n");
                    output.push_str(&json);
                    output.push_str("\n```\n\n");
                }
            }
        }

        output
    }

    /// Render as raw output: file contents only
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone())
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}

fn render_file_md(output: &mut String, item: &ResultItem) {
    if let Some(path) = &item.path {
        output.push_str(&format!("### `{}`", path));
        if let Some(tokens) = item.tokens {
            output.push_str(&format!(" ({} tokens)", tokens));
        }
        output.push('\n');
    }

    if let Some(excerpt) = &item.excerpt {
        let fence = code_fence(excerpt);
        output.push('\n');
        output.push_str(&fence);
        output.push_str(item.language.as_deref().unwrap_or(""));
        output.push('\n');
        output.push_str(excerpt);
        if !excerpt.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&fence);
        output.push('\n');
    }

    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ItemError, SourceFile};

    fn renderer(format: OutputFormat) -> Renderer {
        Renderer::with_config(RenderConfig::with_pretty(format, false))
    }

    fn sample_set() -> ResultSet {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::source(
            &SourceFile::new("src/main.rs", "fn main() {}\n", "rust"),
            12,
        ));
        result_set.push(ResultItem::source(
            &SourceFile::new("tool.py", "print(1)", "python"),
            4,
        ));
        result_set
    }

    #[test]
    fn test_render_jsonl() {
        let output = renderer(OutputFormat::Jsonl).render(&sample_set());
        assert_eq!(output.lines().count(), 2);

        let first: serde_json::Value =
            serde_json::from_str(output.lines().next().unwrap()).unwrap();
        assert_eq!(first["kind"], "file");
        assert_eq!(first["path"], "src/main.rs");
        assert_eq!(first["language"], "rust");
        assert_eq!(first["tokens"], 12);
    }

    #[test]
    fn test_render_json() {
        let output = renderer(OutputFormat::Json).render(&sample_set());
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_render_json_pretty() {
        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let output = Renderer::with_config(config).render(&sample_set());
        assert!(output.contains("  "));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);

        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
    }

    #[test]
    fn test_render_markdown_files() {
        let output = renderer(OutputFormat::Markdown).render(&sample_set());
        assert!(output.contains("## Files"));
        assert!(output.contains("### `src/main.rs` (12 tokens)"));
        assert!(output.contains("```rust\nfn main() {}\n```"));
        assert!(output.contains("```python\nprint(1)\n```"));
    }

    #[test]
    fn test_render_markdown_fence_grows_past_content() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::source(
            &SourceFile::new("README.md", "```sh\nls\n```\n", "markdown"),
            5,
        ));
        let output = renderer(OutputFormat::Markdown).render(&result_set);
        assert!(output.contains("````markdown\n"));
    }

    #[test]
    fn test_render_markdown_summary_and_errors() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::summary(serde_json::json!({"includeGlob": "**/*.rs"})));
        result_set.push(ResultItem::error(ItemError::new(
            "CONFIGURATION_ERROR",
            "no file extensions configured",
        )));

        let output = renderer(OutputFormat::Markdown).render(&result_set);
        assert!(output.contains("## Errors"));
        assert!(output.contains("**CONFIGURATION_ERROR**"));
        assert!(output.contains("## Summary"));
        assert!(output.contains("\"includeGlob\": \"**/*.rs\""));
    }

    #[test]
    fn test_render_markdown_empty() {
        let output = renderer(OutputFormat::Markdown).render(&ResultSet::new());
        assert!(output.is_empty());
    }

    #[test]
    fn test_render_raw() {
        let output = renderer(OutputFormat::Raw).render(&sample_set());
        assert_eq!(output, "fn main() {}\n\n---\nprint(1)");
    }
}
