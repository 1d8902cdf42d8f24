use crate::document::Document;
use serde::Serialize;

/// Stage a progress event was emitted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    Scraping,
    Completed,
}

/// Observational progress event; callbacks cannot slow or stop a run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub status: ProgressStatus,
    pub current_document_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_document: Option<Document>,
}

impl Progress {
    pub fn scraping(current: usize, total: usize, url: impl Into<String>) -> Self {
        Self {
            current,
            total,
            status: ProgressStatus::Scraping,
            current_document_url: Some(url.into()),
            current_document: None,
        }
    }
}

/// Progress callback signature
pub type ProgressFn = dyn Fn(&Progress) + Send + Sync;
