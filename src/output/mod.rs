//! Output module for emitted documents
//!
//! This module handles:
//! - Rendering documents into `{key, bytes}` objects for the destination store
//! - Run-scoped document titles
//! - Markdown and console summaries of a harvest run

mod objects;
mod summary;
mod titles;

pub use objects::{format_document, render_objects};
pub use summary::{format_markdown_summary, print_summary, HarvestSummary};
pub use titles::TitleGenerator;

/// Object key of the run summary
pub const SUMMARY_KEY: &str = "_harvest-summary.md";
