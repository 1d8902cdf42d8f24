//! Integration tests for Sumi-Harvest
//!
//! These tests use wiremock to create mock HTTP servers and exercise the page
//! fetcher, the crawl frontier and the full document pipeline end-to-end.

mod common;
mod crawl_tests;
mod page_fetcher_tests;
mod pipeline_tests;
