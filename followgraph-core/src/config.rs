//! Process configuration and its defaults.
//!
//! The binary fills these from command-line flags (with environment
//! fallbacks); library users can construct them directly.

use followgraph_scanner::error::Result;
use followgraph_scanner::GitHubFetcher;
use std::time::Duration;

pub use followgraph_scanner::fetcher::GITHUB_API_URL;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Maximum number of followers returned for one request.
pub const MAX_FOLLOWER_COUNT: usize = 100;
/// Maximum depth of followers returned for one request.
pub const MAX_FOLLOWER_DEPTH: usize = 4;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WORKERS: usize = 1;

/// Node and depth caps for a single crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    pub max_followers: usize,
    pub max_depth: usize,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_followers: MAX_FOLLOWER_COUNT,
            max_depth: MAX_FOLLOWER_DEPTH,
        }
    }
}

impl CrawlLimits {
    /// Applies caller-requested limits without letting them exceed `self`.
    pub fn clamp(&self, max_followers: Option<usize>, max_depth: Option<usize>) -> CrawlLimits {
        CrawlLimits {
            max_followers: max_followers.map_or(self.max_followers, |n| n.min(self.max_followers)),
            max_depth: max_depth.map_or(self.max_depth, |d| d.min(self.max_depth)),
        }
    }
}

/// Where and how follower lists are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub max_pages: usize,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_url: GITHUB_API_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_pages: 1,
        }
    }
}

impl GitHubConfig {
    pub fn build_fetcher(&self) -> Result<GitHubFetcher> {
        let mut fetcher = GitHubFetcher::with_timeout(&self.base_url, self.timeout_secs)?
            .with_max_pages(self.max_pages);
        if let Some(ref token) = self.token
            && !token.is_empty()
        {
            fetcher = fetcher.with_token(token.clone());
        }
        Ok(fetcher)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub limits: CrawlLimits,
    pub workers: usize,
    pub deadline_secs: Option<u64>,
    pub github: GitHubConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            limits: CrawlLimits::default(),
            workers: DEFAULT_WORKERS,
            deadline_secs: None,
            github: GitHubConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}
