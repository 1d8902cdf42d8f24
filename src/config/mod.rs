//! Configuration module for Sumi-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvest will follow links {} layers deep", config.crawl.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, CrawlConfig, CrawlMode, CrawlerMode, FetchConfig, HostOverride, OutputConfig,
    PageOptions, StrategyKind, UserAgentConfig,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
