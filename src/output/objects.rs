//! Rendering documents into `{key, bytes}` objects for the destination store

use super::titles::TitleGenerator;
use crate::collab::StoredObject;
use crate::document::Document;
use chrono::{DateTime, Utc};

/// Formats one document as Markdown
///
/// The body is the source URL as a heading, the content, then a
/// `Created At` footer.
pub fn format_document(document: &Document, created_at: DateTime<Utc>) -> String {
    format!(
        "# {}\n\n{}\n\nCreated At: {}",
        document.source_url(),
        document.content,
        created_at.to_rfc3339()
    )
}

/// Renders documents into store objects named after their source URLs
///
/// Each call owns a fresh [`TitleGenerator`], so `Untitled N` numbering
/// restarts per run.
pub fn render_objects(documents: &[Document]) -> Vec<StoredObject> {
    let mut titles = TitleGenerator::new();
    let created_at = Utc::now();

    documents
        .iter()
        .map(|document| StoredObject {
            key: format!("{}.md", titles.title_for(document.source_url())),
            bytes: format_document(document, created_at).into_bytes(),
        })
        .collect()
}
