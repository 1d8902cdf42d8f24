use crate::{HarvestError, Result};
use async_trait::async_trait;

/// URL suffixes routed to the binary extractor instead of HTML normalization
const BINARY_DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];

/// Text extraction for binary document formats (PDF, Word)
///
/// Failures are reported as errors; callers turn them into empty-content
/// documents.
#[async_trait]
pub trait BinaryExtractor: Send + Sync {
    async fn extract_text(&self, url: &str) -> Result<String>;
}

/// Extractor used when no binary backend is wired in
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedExtractor;

#[async_trait]
impl BinaryExtractor for UnsupportedExtractor {
    async fn extract_text(&self, url: &str) -> Result<String> {
        Err(HarvestError::Extraction {
            url: url.to_string(),
            message: "no binary document extractor configured".to_string(),
        })
    }
}

/// Returns true for links that end in a binary document extension
pub fn is_binary_document(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    BINARY_DOCUMENT_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(ext))
}

/// Returns true for Content-Type values of binary documents
pub fn is_binary_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("application/pdf")
        || content_type.contains("application/msword")
        || content_type.contains("wordprocessingml")
}
