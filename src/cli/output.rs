use std::fmt::Write as FmtWrite;

use crate::models::{Collection, ContentItem, QueryResults};
use crate::services::IngestReport;

pub trait Formatter {
    fn format_query_results(&self, results: &QueryResults) -> String;
    fn format_collections(&self, collections: &[Collection]) -> String;
    fn format_items(&self, items: &[ContentItem]) -> String;
    fn format_ingest_report(&self, report: &IngestReport) -> String;
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub embedding_api: String,
    pub embedding_model: String,
    pub dimension: usize,
    pub api_key_present: bool,
    pub store_connected: bool,
    pub collections: u64,
    pub items: u64,
}

fn preview(content: &str, max_chars: usize) -> String {
    let short: String = content.chars().take(max_chars).collect();
    if content.chars().count() > max_chars {
        format!("{}...", short)
    } else {
        short
    }
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_query_results(&self, results: &QueryResults) -> String {
        if results.is_empty() {
            return format!(
                "No results in \"{}\" for: {}\n",
                results.collection, results.query
            );
        }

        let mut output = String::new();
        writeln!(output, "Results in \"{}\" for: \"{}\"", results.collection, results.query)
            .unwrap();
        writeln!(
            output,
            "Found {} results in {}ms\n",
            results.len(),
            results.duration_ms
        )
        .unwrap();

        for (i, hit) in results.hits.iter().enumerate() {
            writeln!(output, "{}. [Score: {:.3}] ({})", i + 1, hit.score, hit.content_type)
                .unwrap();
            for line in preview(&hit.content, 200).lines() {
                writeln!(output, "   {}", line).unwrap();
            }
            writeln!(output).unwrap();
        }

        output
    }

    fn format_collections(&self, collections: &[Collection]) -> String {
        if collections.is_empty() {
            return "No collections.\n".to_string();
        }

        let mut output = String::new();
        writeln!(output, "Collections").unwrap();
        writeln!(output, "-----------").unwrap();
        for collection in collections {
            let state = if collection.is_active {
                "active"
            } else {
                "inactive"
            };
            writeln!(
                output,
                "  {}  {} ({}, created {})",
                collection.slug,
                collection.name,
                state,
                collection.created_at.format("%Y-%m-%d")
            )
            .unwrap();
        }
        output
    }

    fn format_items(&self, items: &[ContentItem]) -> String {
        if items.is_empty() {
            return "No items.\n".to_string();
        }

        let mut output = String::new();
        writeln!(output, "Items ({})", items.len()).unwrap();
        writeln!(output, "-----").unwrap();
        for item in items {
            writeln!(
                output,
                "  [{}] {}  {}",
                item.content_type,
                item.created_at.format("%Y-%m-%d %H:%M"),
                preview(&item.content, 80)
            )
            .unwrap();
        }
        output
    }

    fn format_ingest_report(&self, report: &IngestReport) -> String {
        let mut output = String::new();
        writeln!(output, "Ingest Complete").unwrap();
        writeln!(output, "---------------").unwrap();
        writeln!(output, "Chunks stored: {}", report.succeeded).unwrap();
        writeln!(output, "Chunks failed: {}", report.failed.len()).unwrap();
        for failure in &report.failed {
            writeln!(output, "  chunk {}: {}", failure.index, failure.error).unwrap();
        }
        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Status").unwrap();
        writeln!(output, "------").unwrap();
        writeln!(output, "Embedding API: {}", status.embedding_api).unwrap();
        writeln!(output, "  Model:       {}", status.embedding_model).unwrap();
        writeln!(output, "  Dimension:   {}", status.dimension).unwrap();
        let key = if status.api_key_present {
            "[SET]"
        } else {
            "[MISSING]"
        };
        writeln!(output, "  API key:     {}", key).unwrap();
        writeln!(output).unwrap();

        let store_status = if status.store_connected {
            "[CONNECTED]"
        } else {
            "[DISCONNECTED]"
        };
        writeln!(output, "Content Store: {}", store_status).unwrap();
        if status.store_connected {
            writeln!(output, "  Collections: {}", status.collections).unwrap();
            writeln!(output, "  Items:       {}", status.items).unwrap();
        }
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}\n", error)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, json: &serde_json::Value) -> String {
        if self.pretty {
            serde_json::to_string_pretty(json).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string(json).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
    }
}

impl Formatter for JsonFormatter {
    fn format_query_results(&self, results: &QueryResults) -> String {
        let json = serde_json::to_value(results)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }));
        self.render(&json)
    }

    fn format_collections(&self, collections: &[Collection]) -> String {
        let json = serde_json::to_value(collections)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }));
        self.render(&json)
    }

    fn format_items(&self, items: &[ContentItem]) -> String {
        // Embeddings are elided from listings.
        let items_array: Vec<serde_json::Value> = items
            .iter()
            .map(|item| {
                serde_json::json!({
                    "id": item.id,
                    "collection_id": item.collection_id,
                    "content": item.content,
                    "content_type": item.content_type,
                    "metadata": item.metadata,
                    "created_at": item.created_at,
                })
            })
            .collect();
        self.render(&serde_json::json!({ "items": items_array }))
    }

    fn format_ingest_report(&self, report: &IngestReport) -> String {
        let failed: Vec<serde_json::Value> = report
            .failed
            .iter()
            .map(|f| serde_json::json!({ "index": f.index, "reason": f.error.to_string() }))
            .collect();
        self.render(&serde_json::json!({
            "succeeded": report.succeeded,
            "failed": failed,
        }))
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        self.render(&serde_json::json!({
            "embedding": {
                "api": status.embedding_api,
                "model": status.embedding_model,
                "dimension": status.dimension,
                "api_key_present": status.api_key_present,
            },
            "store": {
                "connected": status.store_connected,
                "collections": status.collections,
                "items": status.items,
            }
        }))
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({ "message": message }).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({ "error": error }).to_string()
    }
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format_query_results(&self, results: &QueryResults) -> String {
        if results.is_empty() {
            return format!(
                "## No results\n\nCollection: `{}`\nQuery: `{}`\n",
                results.collection, results.query
            );
        }

        let mut output = String::new();
        writeln!(output, "## Search Results\n").unwrap();
        writeln!(output, "**Collection:** `{}`\n", results.collection).unwrap();
        writeln!(output, "**Query:** `{}`\n", results.query).unwrap();
        writeln!(
            output,
            "Found {} results in {}ms\n",
            results.len(),
            results.duration_ms
        )
        .unwrap();

        for (i, hit) in results.hits.iter().enumerate() {
            writeln!(output, "### {}. Score: {:.3}\n", i + 1, hit.score).unwrap();
            writeln!(output, "**Type:** {}\n", hit.content_type).unwrap();
            writeln!(output, "```").unwrap();
            writeln!(output, "{}", hit.content).unwrap();
            writeln!(output, "```\n").unwrap();
        }

        output
    }

    fn format_collections(&self, collections: &[Collection]) -> String {
        if collections.is_empty() {
            return "## Collections\n\n*None.*\n".to_string();
        }

        let mut output = String::new();
        writeln!(output, "## Collections\n").unwrap();
        writeln!(output, "| Slug | Name | Active | Created |").unwrap();
        writeln!(output, "|------|------|--------|---------|").unwrap();
        for collection in collections {
            writeln!(
                output,
                "| `{}` | {} | {} | {} |",
                collection.slug,
                collection.name,
                collection.is_active,
                collection.created_at.format("%Y-%m-%d")
            )
            .unwrap();
        }
        output
    }

    fn format_items(&self, items: &[ContentItem]) -> String {
        if items.is_empty() {
            return "## Items\n\n*None.*\n".to_string();
        }

        let mut output = String::new();
        writeln!(output, "## Items\n").unwrap();
        writeln!(output, "| Type | Created | Content |").unwrap();
        writeln!(output, "|------|---------|---------|").unwrap();
        for item in items {
            writeln!(
                output,
                "| {} | {} | {} |",
                item.content_type,
                item.created_at.format("%Y-%m-%d"),
                preview(&item.content, 80).replace('|', "\\|")
            )
            .unwrap();
        }
        output
    }

    fn format_ingest_report(&self, report: &IngestReport) -> String {
        let mut output = String::new();
        writeln!(output, "## Ingest Complete\n").unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Chunks stored | {} |", report.succeeded).unwrap();
        writeln!(output, "| Chunks failed | {} |", report.failed.len()).unwrap();
        if !report.failed.is_empty() {
            writeln!(output, "\n### Failures\n").unwrap();
            for failure in &report.failed {
                writeln!(output, "- chunk {}: {}", failure.index, failure.error).unwrap();
            }
        }
        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "## Status\n").unwrap();
        writeln!(output, "### Embedding API\n").unwrap();
        writeln!(output, "- **Endpoint:** `{}`", status.embedding_api).unwrap();
        writeln!(output, "- **Model:** {}", status.embedding_model).unwrap();
        writeln!(output, "- **Dimension:** {}", status.dimension).unwrap();
        writeln!(output, "- **API key:** {}", if status.api_key_present { "set" } else { "missing" })
            .unwrap();
        writeln!(output).unwrap();

        let store_status = if status.store_connected { "✅" } else { "❌" };
        writeln!(output, "### Content Store {}\n", store_status).unwrap();
        writeln!(output, "- **Collections:** {}", status.collections).unwrap();
        writeln!(output, "- **Items:** {}", status.items).unwrap();
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("> {}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("> ⚠️ **Error:** {}\n", error)
    }
}

pub fn get_formatter(format: crate::models::OutputFormat) -> Box<dyn Formatter> {
    use crate::models::OutputFormat;
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentType, OutputFormat, SearchHit};
    use uuid::Uuid;

    fn sample_results() -> QueryResults {
        QueryResults::new(
            "q".to_string(),
            "demo".to_string(),
            vec![SearchHit {
                item_id: Uuid::new_v4(),
                score: 0.987,
                content: "Check this out".to_string(),
                content_type: ContentType::Tweet,
            }],
            7,
        )
    }

    #[test]
    fn test_text_formatter_query_results() {
        let out = TextFormatter.format_query_results(&sample_results());
        assert!(out.contains("Score: 0.987"));
        assert!(out.contains("Check this out"));
    }

    #[test]
    fn test_json_formatter_is_valid_json() {
        let out = JsonFormatter::new(false).format_query_results(&sample_results());
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["collection"], "demo");
    }

    #[test]
    fn test_get_formatter_variants() {
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Markdown] {
            let formatter = get_formatter(format);
            assert!(!formatter.format_message("hello").is_empty());
        }
    }
}
