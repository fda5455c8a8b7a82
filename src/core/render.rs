//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
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
    /// Create a new render config with pretty option
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
        }
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
        let sections = [
            (Kind::Error, "Errors"),
            (Kind::Skipped, "Skipped"),
            (Kind::Collection, "Collections"),
            (Kind::Document, "Documents"),
            (Kind::Tile, "Tiles"),
            (Kind::Removed, "Removed"),
        ];

        let mut output = String::new();
        for (kind, title) in sections {
            let items: Vec<&ResultItem> =
                result_set.items.iter().filter(|i| i.kind == kind).collect();
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
        match (&item.id, &item.path) {
            (Some(id), _) => output.push_str(&format!("- **{}**", id)),
            (None, Some(path)) => output.push_str(&format!("- `{}`", path)),
            (None, None) => output.push('-'),
        }
        if let Some(project) = &item.project {
            output.push_str(&format!(" `{}`", project));
        }
        if let Some(layout) = &item.layout {
            output.push_str(&format!(" (layout: {})", layout));
        }
        output.push('\n');

        if !item.layers.is_empty() {
            output.push_str(&format!("  - layers: {}\n", item.layers.join(", ")));
        }
        if let Some(documents) = item.documents {
            output.push_str(&format!("  - documents: {}\n", documents));
        }
        for error in &item.errors {
            output.push_str(&format!("  - **{}**: {}\n", error.code, error.message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ItemError;

    fn sample() -> ResultSet {
        let mut set = ResultSet::new();
        set.push(
            ResultItem::collection("abc", "/data/a.qgs")
                .with_layout("tc")
                .with_layers(vec!["roads".to_string(), "rivers".to_string()])
                .with_documents(3),
        );
        set.push(ResultItem::removed("/cache/def"));
        set
    }

    fn render(format: OutputFormat, set: &ResultSet) -> String {
        Renderer::with_config(RenderConfig::with_pretty(format, false)).render(set)
    }

    #[test]
    fn test_render_jsonl() {
        let output = render(OutputFormat::Jsonl, &sample());
        assert_eq!(output.lines().count(), 2);
        assert!(output.contains(r#""kind":"collection""#));
        assert!(output.contains("/cache/def"));
    }

    #[test]
    fn test_render_json() {
        let output = render(OutputFormat::Json, &sample());
        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
    }

    #[test]
    fn test_render_json_pretty() {
        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let output = Renderer::with_config(config).render(&sample());
        assert!(output.contains("  "));
    }

    #[test]
    fn test_render_markdown() {
        let output = render(OutputFormat::Markdown, &sample());
        assert!(output.contains("## Collections"));
        assert!(output.contains("**abc**"));
        assert!(output.contains("layers: roads, rivers"));
        assert!(output.contains("documents: 3"));
        assert!(output.contains("## Removed"));
        assert!(!output.contains("## Errors"));
    }

    #[test]
    fn test_render_markdown_errors() {
        let mut set = ResultSet::new();
        set.push(ResultItem::error(ItemError::new("NOT_FOUND", "No projects found")));
        let output = render(OutputFormat::Markdown, &set);
        assert!(output.starts_with("## Errors"));
        assert!(output.contains("**NOT_FOUND**: No projects found"));
    }

    #[test]
    fn test_render_markdown_empty() {
        let output = render(OutputFormat::Markdown, &ResultSet::new());
        assert!(output.is_empty());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("raw".parse::<OutputFormat>().unwrap_err().contains("Unknown format"));
    }
}
