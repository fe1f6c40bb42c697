use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrawlError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),
}

impl CrawlError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CrawlError::RateLimited(_))
    }
}

// Transport and body-decoding failures from the HTTP client.
impl From<reqwest::Error> for CrawlError {
    fn from(err: reqwest::Error) -> Self {
        CrawlError::FetchFailed(err.to_string())
    }
}

impl From<url::ParseError> for CrawlError {
    fn from(err: url::ParseError) -> Self {
        CrawlError::FetchFailed(format!("invalid URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
