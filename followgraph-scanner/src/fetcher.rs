use crate::error::{CrawlError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, LINK};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Source of follower lists, one call per username.
#[async_trait]
pub trait FollowerFetcher: Send + Sync {
    /// Returns the logins following `username`, in API order.
    async fn fetch_followers(&self, username: &str) -> Result<Vec<String>>;
}

/// Entry of the `/users/{username}/followers` response. Other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Follower {
    pub login: String,
}

pub struct GitHubFetcher {
    client: Client,
    base_url: Url,
    token: Option<String>,
    max_pages: usize,
}

impl GitHubFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, 10)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self> {
        if timeout_secs == 0 {
            return Err(CrawlError::InvalidInput(
                "request timeout must be at least 1 second".to_string(),
            ));
        }
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(CrawlError::InvalidInput(format!(
                "base URL cannot carry a path: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("followgraph/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(16)
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: None,
            max_pages: 1,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Follow `rel="next"` links for up to `max_pages` requests per user.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token is only ever sent to the configured API origin.
    fn is_same_origin(&self, url: &Url) -> bool {
        let same = url.origin() == self.base_url.origin();
        if !same {
            warn!(
                "Not following pagination link to foreign origin {}",
                url.origin().ascii_serialization()
            );
        }
        same
    }

    fn followers_url(&self, username: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CrawlError::InvalidInput(format!("bad base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(&["users", username, "followers"]);
        Ok(url)
    }

    async fn fetch_page(&self, url: Url) -> Result<(Vec<Follower>, Option<Url>)> {
        debug!("Fetching {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(ref token) = self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();

        if is_rate_limited(status, response.headers()) {
            let reset = response
                .headers()
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .map(|s| format!(" (resets at {})", s))
                .unwrap_or_default();
            return Err(CrawlError::RateLimited(format!(
                "GET {} returned HTTP {}{}",
                url, status, reset
            )));
        }

        if !status.is_success() {
            return Err(CrawlError::FetchFailed(format!(
                "GET {} returned HTTP {}",
                url, status
            )));
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_page_link);

        let followers = response.json::<Vec<Follower>>().await?;
        Ok((followers, next))
    }
}

#[async_trait]
impl FollowerFetcher for GitHubFetcher {
    async fn fetch_followers(&self, username: &str) -> Result<Vec<String>> {
        let mut url = Some(self.followers_url(username)?);
        let mut logins = Vec::new();
        let mut pages = 0;

        while let Some(page_url) = url.take() {
            let (followers, next) = self.fetch_page(page_url).await?;
            logins.extend(followers.into_iter().map(|f| f.login));
            pages += 1;
            if pages < self.max_pages {
                url = next.filter(|next| self.is_same_origin(next));
            }
        }

        debug!("{} has {} followers ({} page(s))", username, logins.len(), pages);
        Ok(logins)
    }
}

fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    status == StatusCode::FORBIDDEN
        && headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|remaining| remaining.trim() == "0")
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header.
fn next_page_link(header: &str) -> Option<Url> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}
