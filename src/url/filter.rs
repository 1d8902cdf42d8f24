//! Link admission for the crawl frontier
//!
//! A discovered link is enqueued only if every predicate below passes:
//!
//! - no `#` fragment
//! - not a static asset or binary file
//! - not a social network host or `mailto:` target
//! - same site as a seed (hosts compared without `www.`) and under that seed's path
//! - path depth below the seed within the configured maximum
//! - path matches no exclude pattern
//! - path matches an include pattern, when includes are configured
//! - not one of the seeds themselves, outside the first level
//! - allowed by the politeness policy
//!
//! Cheap string checks run first; the robots matcher runs last.

use super::domain::site_host;
use super::matcher::{is_file, is_social_or_email};
use super::normalize::{canonicalize, path_depth};
use crate::config::CrawlConfig;
use crate::robots::PolitenessPolicy;
use crate::ConfigError;
use regex::Regex;
use tracing::debug;
use url::Url;

/// Compiled admission rules for one crawl run
#[derive(Debug, Clone)]
pub struct LinkFilter {
    seeds: Vec<Url>,
    canonical_seeds: Vec<String>,
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
    max_depth: usize,
}

impl LinkFilter {
    /// Compiles the filter from a crawl configuration
    ///
    /// Empty pattern strings are ignored, so `excludes = [""]` behaves like
    /// no excludes at all.
    pub fn new(config: &CrawlConfig) -> Result<Self, ConfigError> {
        let mut seeds = Vec::new();
        let mut canonical_seeds = Vec::new();

        for seed in config.seed_urls() {
            let canonical = canonicalize(&seed)
                .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;
            let url = Url::parse(&canonical)
                .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;
            seeds.push(url);
            canonical_seeds.push(canonical);
        }

        Ok(Self {
            seeds,
            canonical_seeds,
            includes: compile_patterns(&config.includes)?,
            excludes: compile_patterns(&config.excludes)?,
            max_depth: config.max_depth,
        })
    }

    /// Canonical forms of the seed URLs, in configuration order
    pub fn seeds(&self) -> &[String] {
        &self.canonical_seeds
    }

    /// Decides whether a discovered link may be enqueued
    ///
    /// Depth is counted in path segments below the seed's own path, not from
    /// the site root, so a seed at `/a/b` admits `/a/b/c` at depth 1.
    ///
    /// # Arguments
    ///
    /// * `link` - Absolute URL of the candidate
    /// * `first_level` - True when checking entry points; seeds are only rejected outside it
    /// * `policy` - Politeness policy for the run
    pub fn admit(&self, link: &str, first_level: bool, policy: &PolitenessPolicy) -> bool {
        if has_fragment(link) {
            debug!("Skipping {}: fragment link", link);
            return false;
        }

        if is_file(link) || is_social_or_email(link) {
            debug!("Skipping {}: file or social link", link);
            return false;
        }

        let url = match Url::parse(link) {
            Ok(url) => url,
            Err(_) => return false,
        };

        let Some(depth) = self.depth_below_seed(&url) else {
            debug!("Skipping {}: outside seed sites", link);
            return false;
        };

        if !within_depth(depth, self.max_depth) {
            debug!("Skipping {}: depth {} exceeds {}", link, depth, self.max_depth);
            return false;
        }

        let path = url.path();

        if matches_any(&self.excludes, path) {
            debug!("Skipping {}: matches exclude pattern", link);
            return false;
        }

        if !self.includes.is_empty() && !matches_any(&self.includes, path) {
            debug!("Skipping {}: matches no include pattern", link);
            return false;
        }

        if !first_level && self.is_seed(link) {
            return false;
        }

        if !policy.is_allowed(link) {
            debug!("Skipping {}: disallowed by robots.txt", link);
            return false;
        }

        true
    }

    /// Path depth of `url` below the closest seed that contains it
    ///
    /// Returns `None` when no seed shares the site host and path prefix.
    fn depth_below_seed(&self, url: &Url) -> Option<usize> {
        let host = site_host(url)?;
        let link_depth = path_depth(url.path());

        self.seeds
            .iter()
            .filter(|seed| site_host(seed).as_deref() == Some(host.as_str()))
            .filter(|seed| url.path().starts_with(seed.path()))
            .map(|seed| link_depth.saturating_sub(path_depth(seed.path())))
            .min()
    }

    fn is_seed(&self, link: &str) -> bool {
        match canonicalize(link) {
            Ok(canonical) => self.canonical_seeds.iter().any(|s| *s == canonical),
            Err(_) => false,
        }
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| {
            Regex::new(p)
                .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
        })
        .collect()
}

fn has_fragment(link: &str) -> bool {
    link.contains('#')
}

fn within_depth(depth: usize, max_depth: usize) -> bool {
    depth <= max_depth
}

fn matches_any(patterns: &[Regex], path: &str) -> bool {
    patterns.iter().any(|re| re.is_match(path))
}
