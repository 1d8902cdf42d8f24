//! Run summary generation
//!
//! A human-readable Markdown report of one harvest run, written next to the
//! documents, plus a console rendering of the same statistics.

use crate::document::Document;
use chrono::{DateTime, Utc};

/// Statistics for one harvest run
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: String,
    pub seeds: Vec<String>,
    pub total_documents: usize,
    pub empty_documents: usize,
    pub total_characters: usize,
    /// `(source URL, content length)` per document, in output order
    pub documents: Vec<(String, usize)>,
}

impl HarvestSummary {
    /// Collects statistics over the emitted documents
    pub fn from_documents(
        documents: &[Document],
        seeds: Vec<String>,
        config_hash: String,
        started_at: DateTime<Utc>,
    ) -> Self {
        let lengths: Vec<(String, usize)> = documents
            .iter()
            .map(|d| (d.source_url().to_string(), d.content.chars().count()))
            .collect();

        Self {
            started_at,
            finished_at: Utc::now(),
            config_hash,
            seeds,
            total_documents: documents.len(),
            empty_documents: documents.iter().filter(|d| d.is_empty()).count(),
            total_characters: lengths.iter().map(|(_, len)| len).sum(),
            documents: lengths,
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Share of documents with content, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_documents == 0 {
            return 0.0;
        }
        let filled = self.total_documents - self.empty_documents;
        (filled as f64 / self.total_documents as f64) * 100.0
    }
}

/// Formats a run summary as Markdown
pub fn format_markdown_summary(summary: &HarvestSummary) -> String {
    let mut md = String::new();

    md.push_str("# Sumi-Harvest Run Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        summary.duration_seconds()
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    md.push_str("## Seeds\n\n");
    for seed in &summary.seeds {
        md.push_str(&format!("- {}\n", seed));
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Documents**: {}\n", summary.total_documents));
    md.push_str(&format!("- **Empty Documents**: {}\n", summary.empty_documents));
    md.push_str(&format!("- **Characters**: {}\n", summary.total_characters));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        summary.success_rate()
    ));

    if !summary.documents.is_empty() {
        md.push_str("## Documents\n\n");
        md.push_str("| URL | Characters |\n");
        md.push_str("|-----|------------|\n");
        for (url, len) in summary.documents.iter().take(50) {
            md.push_str(&format!("| {} | {} |\n", url, len));
        }
        if summary.documents.len() > 50 {
            md.push_str(&format!(
                "\n... and {} more\n",
                summary.documents.len() - 50
            ));
        }
        md.push('\n');
    }

    md
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    println!("=== Sumi-Harvest Run ===\n");
    println!("Duration:         {} seconds", summary.duration_seconds());
    println!("Config hash:      {}", summary.config_hash);
    println!("Documents:        {}", summary.total_documents);
    println!("Empty documents:  {}", summary.empty_documents);
    println!("Characters:       {}", summary.total_characters);
    println!("Success rate:     {:.2}%", summary.success_rate());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> HarvestSummary {
        let mut filled = Document::empty("https://example.gov/a");
        filled.set_content("Grant programme details".to_string());
        let docs = vec![filled, Document::empty("https://example.gov/b")];

        HarvestSummary::from_documents(
            &docs,
            vec!["https://example.gov/a".to_string()],
            "abc123".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_statistics() {
        let summary = summary();
        assert_eq!(summary.total_documents, 2);
        assert_eq!(summary.empty_documents, 1);
        assert_eq!(summary.total_characters, 23);
        assert!((summary.success_rate() - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_success_rate_without_documents() {
        let summary = HarvestSummary::from_documents(&[], vec![], String::new(), Utc::now());
        assert_eq!(summary.success_rate(), 0.0);
    }

    #[test]
    fn test_format_markdown_summary() {
        let markdown = format_markdown_summary(&summary());
        assert!(markdown.contains("# Sumi-Harvest Run Summary"));
        assert!(markdown.contains("- **Config Hash**: abc123"));
        assert!(markdown.contains("| https://example.gov/a | 23 |"));
        assert!(markdown.contains("| https://example.gov/b | 0 |"));
    }
}
