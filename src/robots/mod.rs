//! Robots.txt handling module
//!
//! The politeness policy is derived once per run from the seed origin's
//! `robots.txt` and is read-only afterwards. Any failure to fetch the file
//! degrades to a policy that allows everything.

mod parser;

pub use parser::ParsedRobots;

use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

/// Allow/deny decisions for one origin and one agent identity
#[derive(Debug, Clone)]
pub struct PolitenessPolicy {
    robots: ParsedRobots,
    agent: String,
}

impl PolitenessPolicy {
    /// Builds a policy from already-fetched robots.txt content
    pub fn from_content(content: &str, agent: &str) -> Self {
        Self {
            robots: ParsedRobots::from_content(content),
            agent: agent.to_string(),
        }
    }

    /// Builds a policy that allows every URL
    pub fn allow_all(agent: &str) -> Self {
        Self {
            robots: ParsedRobots::allow_all(),
            agent: agent.to_string(),
        }
    }

    /// Fetches `{origin}/robots.txt` and builds the policy
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for the fetch
    /// * `origin` - Any URL on the target origin; only scheme, host and port are used
    /// * `agent` - Agent identity checked against `User-agent` groups
    ///
    /// # Returns
    ///
    /// The parsed policy, or an allow-all policy if the file could not be
    /// fetched. This never fails.
    pub async fn load(client: &Client, origin: &Url, agent: &str) -> Self {
        let robots_url = match origin.join("/robots.txt") {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot build robots.txt URL for {}: {}", origin, e);
                return Self::allow_all(agent);
            }
        };

        debug!("Fetching {}", robots_url);

        let response = match client.get(robots_url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("robots.txt unavailable at {}: {}; allowing all", robots_url, e);
                return Self::allow_all(agent);
            }
        };

        if !response.status().is_success() {
            warn!(
                "robots.txt at {} returned {}; allowing all",
                robots_url,
                response.status()
            );
            return Self::allow_all(agent);
        }

        match response.text().await {
            Ok(body) => {
                info!("Loaded robots.txt from {} ({} bytes)", robots_url, body.len());
                Self::from_content(&body, agent)
            }
            Err(e) => {
                warn!("Failed to read robots.txt body from {}: {}", robots_url, e);
                Self::allow_all(agent)
            }
        }
    }

    /// Returns true when the run's agent may fetch `url`
    pub fn is_allowed(&self, url: &str) -> bool {
        self.robots.is_allowed(url, &self.agent)
    }

    /// Agent identity this policy answers for
    pub fn agent(&self) -> &str {
        &self.agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_content() {
        let policy = PolitenessPolicy::from_content("User-agent: *\nDisallow: /admin", "HarvestBot");
        assert!(policy.is_allowed("https://example.gov/grants"));
        assert!(!policy.is_allowed("https://example.gov/admin/users"));
        assert_eq!(policy.agent(), "HarvestBot");
    }

    #[test]
    fn test_allow_all_policy() {
        let policy = PolitenessPolicy::allow_all("HarvestBot");
        assert!(policy.is_allowed("https://example.gov/admin"));
    }

    #[tokio::test]
    async fn test_load_unreachable_origin_allows_all() {
        let client = Client::new();
        let origin = Url::parse("http://127.0.0.1:1/").unwrap();
        let policy = PolitenessPolicy::load(&client, &origin, "HarvestBot").await;
        assert!(policy.is_allowed("http://127.0.0.1:1/anything"));
    }
}
