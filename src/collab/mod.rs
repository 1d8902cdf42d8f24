//! External collaborator capabilities
//!
//! The harvest run talks to three collaborators through traits so that
//! deployments can plug in their own backends:
//! - [`BinaryExtractor`]: text extraction for PDF/Word documents
//! - [`DocumentCache`]: optional cache of scraped documents
//! - [`DocumentStore`]: destination for the emitted documents

mod cache;
mod extractor;
mod store;

pub use cache::{cache_key, DocumentCache, MemoryCache, NoopCache};
pub use extractor::{
    is_binary_content_type, is_binary_document, BinaryExtractor, UnsupportedExtractor,
};
pub use store::{DirectoryStore, DocumentStore, MemoryStore, StoredObject};
